pub mod connection;
pub mod row;
pub mod statement;

#[cfg(test)]
mod connection_test;
