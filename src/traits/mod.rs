pub mod bind_record;
pub mod from_column;
pub mod to_sql;
