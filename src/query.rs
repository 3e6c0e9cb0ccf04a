//! Query definitions: the SQL text, its parameters and, for paginated
//! queries, the page specification.

use std::fmt;

use crate::errors::cursor::ConfigError;

/// A single SQLite value, used for parameters and for the pagination boundary.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
    #[default]
    Null,
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{i}"),
            Value::Real(r) => write!(f, "{r}"),
            Value::Text(s) => f.write_str(s),
            Value::Blob(b) => write!(f, "<{} bytes>", b.len()),
            Value::Null => f.write_str("NULL"),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Real(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Integer(value as i64)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Blob(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// Where a parameter goes: a 1-based position or a name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamKey {
    Index(i32),
    Name(String),
}

impl ParamKey {
    /// Names without a `:`, `@` or `$` prefix are looked up as `:name`.
    pub fn name(name: &str) -> Self {
        if name.starts_with([':', '@', '$']) {
            ParamKey::Name(name.to_owned())
        } else {
            ParamKey::Name(format!(":{name}"))
        }
    }
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamKey::Index(i) => write!(f, "?{i}"),
            ParamKey::Name(n) => f.write_str(n),
        }
    }
}

impl From<i32> for ParamKey {
    fn from(index: i32) -> Self {
        ParamKey::Index(index)
    }
}

impl From<&str> for ParamKey {
    fn from(name: &str) -> Self {
        ParamKey::name(name)
    }
}

impl From<String> for ParamKey {
    fn from(name: String) -> Self {
        ParamKey::name(&name)
    }
}

/// Ordered parameter list. Setting a key twice replaces the earlier value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    entries: Vec<(ParamKey, Value)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// `?1, ?2, ...` in the order given.
    pub fn positional<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let entries = values
            .into_iter()
            .zip(1..)
            .map(|(value, index)| (ParamKey::Index(index), value.into()))
            .collect();
        Params { entries }
    }

    pub fn with(mut self, key: impl Into<ParamKey>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<ParamKey>, value: impl Into<Value>) -> &mut Self {
        let key = key.into();
        let value = value.into();

        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
        self
    }

    pub fn get(&self, key: &ParamKey) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(ParamKey, Value)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// SQL text plus the parameters bound on every execution.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    sql: String,
    params: Params,
}

impl Query {
    pub fn new(sql: impl Into<String>) -> Self {
        Query {
            sql: sql.into(),
            params: Params::new(),
        }
    }

    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sql.trim().is_empty() {
            return Err(ConfigError::EmptySql);
        }
        Ok(())
    }
}

/// How a paginated query walks its identifier column.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSpec {
    page_size: u32,
    identifier_column: String,
    identifier_param: Option<String>,
    start_after: Value,
}

impl PageSpec {
    /// SQLite orders every integer, real and text value after `i64::MIN`,
    /// so the first page starts before any row.
    pub const START: Value = Value::Integer(i64::MIN);

    pub fn new(page_size: u32, identifier_column: impl Into<String>) -> Self {
        PageSpec {
            page_size,
            identifier_column: identifier_column.into(),
            identifier_param: None,
            start_after: Self::START,
        }
    }

    /// Defaults to `:<identifier column>`.
    pub fn with_identifier_param(mut self, name: impl Into<String>) -> Self {
        self.identifier_param = Some(name.into());
        self
    }

    pub fn starting_after(mut self, value: impl Into<Value>) -> Self {
        self.start_after = value.into();
        self
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn identifier_column(&self) -> &str {
        &self.identifier_column
    }

    pub fn identifier_param(&self) -> ParamKey {
        match &self.identifier_param {
            Some(name) => ParamKey::name(name),
            None => ParamKey::name(&self.identifier_column),
        }
    }

    pub fn start_after(&self) -> &Value {
        &self.start_after
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.identifier_column.trim().is_empty() {
            return Err(ConfigError::EmptyIdentifierColumn);
        }
        if self.page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        Ok(())
    }
}
