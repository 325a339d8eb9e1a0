//! # SQL Query Descriptor
//!
//! Definition of a SQL query to be submitted to a query service: the SQL text,
//! positional parameters, an execution timeout and the cursor buffer size.
//!
//! The descriptor is mutable. The executing service reads its properties once
//! when execution starts, so changes made afterwards do not affect a query that
//! is already running. Take a [`SqlQuery::copy`] before reusing an instance for
//! the next submission.
//!
//! # What This Module Does NOT Do
//!
//! - **No SQL parsing**: the text is only checked for presence
//! - **No placeholder counting**: parameters are not matched against `?` markers
//! - **No default resolution**: `-1` timeouts are resolved by the executor
//! - **No synchronization**: an instance must not be mutated from several threads

mod errors;
mod timeout;

pub use errors::{ErrorKind, QueryError, QueryResult};
pub use timeout::QueryTimeout;

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::query_config::SqlQueryConfig;

/// Value for the timeout that is not set.
pub const TIMEOUT_NOT_SET: i64 = -1;

/// Default timeout.
pub const DEFAULT_TIMEOUT: i64 = TIMEOUT_NOT_SET;

/// Default cursor buffer size (rows).
pub const DEFAULT_CURSOR_BUFFER_SIZE: i32 = 4096;

/// SQL query descriptor
///
/// Equality and hashing are structural over all four properties. Since the
/// type is mutable, an instance used as a key in a hash-based collection must
/// not be mutated while it is stored there.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawSqlQuery", into = "RawSqlQuery")]
pub struct SqlQuery {
    sql: String,
    parameters: Option<Vec<Value>>,
    timeout_ms: i64,
    cursor_buffer_size: i32,
}

impl SqlQuery {
    /// Create a query with default timeout and cursor buffer size.
    ///
    /// Fails with [`QueryError::EmptySql`] if `sql` is empty.
    pub fn new(sql: impl Into<String>) -> QueryResult<Self> {
        let sql = sql.into();
        validate_sql(Some(&sql))?;

        Ok(Self {
            sql,
            parameters: None,
            timeout_ms: DEFAULT_TIMEOUT,
            cursor_buffer_size: DEFAULT_CURSOR_BUFFER_SIZE,
        })
    }

    /// Create a query seeded with the configured timeout and cursor buffer size.
    pub fn with_config(sql: impl Into<String>, config: &SqlQueryConfig) -> QueryResult<Self> {
        let mut query = Self::new(sql)?;
        query
            .set_timeout(config.timeout_ms)?
            .set_cursor_buffer_size(config.cursor_buffer_size)?;
        Ok(query)
    }

    /// Gets the SQL query to be executed.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Sets the SQL query to be executed. The query cannot be empty.
    pub fn set_sql(&mut self, sql: impl Into<String>) -> QueryResult<&mut Self> {
        self.set_sql_opt(Some(sql.into()))
    }

    /// Sets the SQL query from an optional value.
    ///
    /// Fails with [`QueryError::NullSql`] if `sql` is `None`.
    pub fn set_sql_opt(&mut self, sql: Option<String>) -> QueryResult<&mut Self> {
        validate_sql(sql.as_deref())?;
        if let Some(sql) = sql {
            self.sql = sql;
        }
        Ok(self)
    }

    /// Gets the query parameters. Empty if none were set.
    pub fn parameters(&self) -> &[Value] {
        self.parameters.as_deref().unwrap_or(&[])
    }

    /// Sets the query parameters.
    ///
    /// Parameter placeholders are defined in the query with the `?` character.
    /// The given values are copied; `None` or an empty slice clears the
    /// parameters.
    pub fn set_parameters(&mut self, parameters: Option<&[Value]>) -> &mut Self {
        self.parameters = match parameters {
            Some(parameters) if !parameters.is_empty() => Some(parameters.to_vec()),
            _ => None,
        };
        self
    }

    /// Adds a single parameter to the end of the parameters list.
    pub fn add_parameter(&mut self, parameter: impl Into<Value>) -> &mut Self {
        self.parameters
            .get_or_insert_with(|| Vec::with_capacity(1))
            .push(parameter.into());
        self
    }

    /// Clears the query parameters.
    pub fn clear_parameters(&mut self) -> &mut Self {
        self.parameters = None;
        self
    }

    /// Gets the query timeout in milliseconds.
    pub fn timeout(&self) -> i64 {
        self.timeout_ms
    }

    /// Gets the query timeout as a [`QueryTimeout`].
    pub fn timeout_kind(&self) -> QueryTimeout {
        // timeout_ms is validated on every write
        QueryTimeout::from_millis(self.timeout_ms).unwrap_or(QueryTimeout::NotSet)
    }

    /// Sets the query timeout in milliseconds.
    ///
    /// If the timeout is reached for a running query, the executor cancels it
    /// forcefully. `0` means no timeout; [`TIMEOUT_NOT_SET`] means the
    /// executor's configured default is used. Other negative values are
    /// rejected.
    pub fn set_timeout(&mut self, timeout_ms: i64) -> QueryResult<&mut Self> {
        if timeout_ms < 0 && timeout_ms != TIMEOUT_NOT_SET {
            return Err(rejected("timeout_ms", QueryError::InvalidTimeout(timeout_ms)));
        }

        self.timeout_ms = timeout_ms;
        Ok(self)
    }

    /// Sets the query timeout from a [`QueryTimeout`].
    pub fn set_query_timeout(&mut self, timeout: QueryTimeout) -> &mut Self {
        self.timeout_ms = timeout.as_millis();
        self
    }

    /// Gets the cursor buffer size (measured in the number of rows).
    pub fn cursor_buffer_size(&self) -> i32 {
        self.cursor_buffer_size
    }

    /// Sets the cursor buffer size (measured in the number of rows).
    ///
    /// Rows ready to be consumed are put into the cursor's buffer. When the
    /// buffer holds this many rows, the executor applies backpressure, possibly
    /// halting the query until rows are consumed. Only positive values are
    /// allowed.
    pub fn set_cursor_buffer_size(&mut self, cursor_buffer_size: i32) -> QueryResult<&mut Self> {
        if cursor_buffer_size <= 0 {
            return Err(rejected(
                "cursor_buffer_size",
                QueryError::InvalidCursorBufferSize(i64::from(cursor_buffer_size)),
            ));
        }

        self.cursor_buffer_size = cursor_buffer_size;
        Ok(self)
    }

    /// Consuming variant of [`SqlQuery::add_parameter`]
    pub fn with_parameter(mut self, parameter: impl Into<Value>) -> Self {
        self.add_parameter(parameter);
        self
    }

    /// Consuming variant of [`SqlQuery::set_parameters`]
    pub fn with_parameters(mut self, parameters: &[Value]) -> Self {
        self.set_parameters(Some(parameters));
        self
    }

    /// Consuming variant of [`SqlQuery::set_timeout`]
    pub fn with_timeout(mut self, timeout_ms: i64) -> QueryResult<Self> {
        self.set_timeout(timeout_ms)?;
        Ok(self)
    }

    /// Consuming variant of [`SqlQuery::set_cursor_buffer_size`]
    pub fn with_cursor_buffer_size(mut self, cursor_buffer_size: i32) -> QueryResult<Self> {
        self.set_cursor_buffer_size(cursor_buffer_size)?;
        Ok(self)
    }

    /// Creates an independent copy of this instance.
    ///
    /// The parameter list is reallocated; parameter values are cloned as is.
    pub fn copy(&self) -> Self {
        self.clone()
    }
}

impl TryFrom<Option<String>> for SqlQuery {
    type Error = QueryError;

    fn try_from(sql: Option<String>) -> QueryResult<Self> {
        match sql {
            Some(sql) => Self::new(sql),
            None => Err(rejected("sql", QueryError::NullSql)),
        }
    }
}

impl PartialEq for SqlQuery {
    fn eq(&self, other: &Self) -> bool {
        self.sql == other.sql
            && self.parameters() == other.parameters()
            && self.timeout_ms == other.timeout_ms
            && self.cursor_buffer_size == other.cursor_buffer_size
    }
}

impl Eq for SqlQuery {}

impl Hash for SqlQuery {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.sql.hash(state);
        let parameters = self.parameters();
        parameters.len().hash(state);
        for parameter in parameters {
            hash_value(parameter, state);
        }
        self.timeout_ms.hash(state);
        self.cursor_buffer_size.hash(state);
    }
}

impl fmt::Display for SqlQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SqlQuery{{sql={}, parameters=[", self.sql)?;
        for (i, parameter) in self.parameters().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", parameter)?;
        }
        write!(
            f,
            "], timeout={}, cursorBufferSize={}}}",
            self.timeout_ms, self.cursor_buffer_size
        )
    }
}

/// Serialized form of [`SqlQuery`]
#[derive(Serialize, Deserialize)]
struct RawSqlQuery {
    #[serde(default)]
    sql: Option<String>,
    #[serde(default)]
    parameters: Option<Vec<Value>>,
    #[serde(default = "default_timeout_ms")]
    timeout_ms: i64,
    #[serde(default = "default_cursor_buffer_size")]
    cursor_buffer_size: i32,
}

fn default_timeout_ms() -> i64 {
    DEFAULT_TIMEOUT
}

fn default_cursor_buffer_size() -> i32 {
    DEFAULT_CURSOR_BUFFER_SIZE
}

impl TryFrom<RawSqlQuery> for SqlQuery {
    type Error = QueryError;

    fn try_from(raw: RawSqlQuery) -> QueryResult<Self> {
        let mut query = SqlQuery::try_from(raw.sql)?;
        query
            .set_parameters(raw.parameters.as_deref())
            .set_timeout(raw.timeout_ms)?
            .set_cursor_buffer_size(raw.cursor_buffer_size)?;
        Ok(query)
    }
}

impl From<SqlQuery> for RawSqlQuery {
    fn from(query: SqlQuery) -> Self {
        Self {
            sql: Some(query.sql),
            parameters: Some(query.parameters.unwrap_or_default()),
            timeout_ms: query.timeout_ms,
            cursor_buffer_size: query.cursor_buffer_size,
        }
    }
}

fn validate_sql(sql: Option<&str>) -> QueryResult<()> {
    match sql {
        None => Err(rejected("sql", QueryError::NullSql)),
        Some("") => Err(rejected("sql", QueryError::EmptySql)),
        Some(_) => Ok(()),
    }
}

fn rejected(field: &'static str, error: QueryError) -> QueryError {
    tracing::debug!(field, code = error.code(), error = %error, "sql_query_rejected");
    error
}

/// Hash a JSON value consistently with its `PartialEq`.
///
/// Object entries are hashed in key order and `-0.0` hashes like `0.0`.
fn hash_value<H: Hasher>(value: &Value, state: &mut H) {
    match value {
        Value::Null => 0u8.hash(state),
        Value::Bool(b) => {
            1u8.hash(state);
            b.hash(state);
        }
        Value::Number(n) => {
            2u8.hash(state);
            if let Some(u) = n.as_u64() {
                0u8.hash(state);
                u.hash(state);
            } else if let Some(i) = n.as_i64() {
                1u8.hash(state);
                i.hash(state);
            } else if let Some(f) = n.as_f64() {
                2u8.hash(state);
                let f = if f == 0.0 { 0.0f64 } else { f };
                f.to_bits().hash(state);
            }
        }
        Value::String(s) => {
            3u8.hash(state);
            s.hash(state);
        }
        Value::Array(items) => {
            4u8.hash(state);
            items.len().hash(state);
            for item in items {
                hash_value(item, state);
            }
        }
        Value::Object(map) => {
            5u8.hash(state);
            map.len().hash(state);
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            for (key, item) in entries {
                key.hash(state);
                hash_value(item, state);
            }
        }
    }
}
