//! sqlquery - SQL query descriptor
//!
//! A validated, copyable description of a SQL query (text, positional
//! parameters, timeout and cursor buffer size) consumed by a query service
//! at submission time.

pub mod config_validator;
pub mod query;
pub mod query_config;

pub use query::{
    ErrorKind, QueryError, QueryResult, QueryTimeout, SqlQuery, DEFAULT_CURSOR_BUFFER_SIZE,
    DEFAULT_TIMEOUT, TIMEOUT_NOT_SET,
};
pub use query_config::SqlQueryConfig;
