//! Typed view over the raw millisecond timeout.

use std::fmt;
use std::time::Duration;

use super::TIMEOUT_NOT_SET;

/// Classification of a query timeout value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryTimeout {
    /// Defer to the default configured by the executing service (`-1`)
    NotSet,
    /// No timeout (`0`)
    Unbounded,
    /// Cancel the query after this many milliseconds (`> 0`)
    Millis(u64),
}

impl QueryTimeout {
    /// Classify a raw millisecond value.
    ///
    /// Returns `None` for negative values other than `-1`.
    pub fn from_millis(ms: i64) -> Option<Self> {
        match ms {
            TIMEOUT_NOT_SET => Some(QueryTimeout::NotSet),
            0 => Some(QueryTimeout::Unbounded),
            ms if ms > 0 => Some(QueryTimeout::Millis(ms as u64)),
            _ => None,
        }
    }

    /// Raw millisecond value, `-1` for [`QueryTimeout::NotSet`].
    ///
    /// `Millis` values beyond `i64::MAX` saturate.
    pub fn as_millis(&self) -> i64 {
        match self {
            QueryTimeout::NotSet => TIMEOUT_NOT_SET,
            QueryTimeout::Unbounded => 0,
            QueryTimeout::Millis(ms) => i64::try_from(*ms).unwrap_or(i64::MAX),
        }
    }

    /// Explicit cancellation deadline, if one is set.
    pub fn duration(&self) -> Option<Duration> {
        match self {
            QueryTimeout::Millis(ms) => Some(Duration::from_millis(*ms)),
            QueryTimeout::NotSet | QueryTimeout::Unbounded => None,
        }
    }
}

impl fmt::Display for QueryTimeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryTimeout::NotSet => write!(f, "default"),
            QueryTimeout::Unbounded => write!(f, "none"),
            QueryTimeout::Millis(ms) => write!(f, "{}ms", ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert_eq!(QueryTimeout::from_millis(-1), Some(QueryTimeout::NotSet));
        assert_eq!(QueryTimeout::from_millis(0), Some(QueryTimeout::Unbounded));
        assert_eq!(QueryTimeout::from_millis(250), Some(QueryTimeout::Millis(250)));
        assert_eq!(QueryTimeout::from_millis(-2), None);
        assert_eq!(QueryTimeout::from_millis(i64::MIN), None);
    }

    #[test]
    fn test_sentinel_is_not_unbounded() {
        assert_ne!(QueryTimeout::NotSet, QueryTimeout::Unbounded);
        assert_eq!(QueryTimeout::NotSet.duration(), None);
        assert_eq!(QueryTimeout::Unbounded.duration(), None);
        assert_eq!(
            QueryTimeout::Millis(1500).duration(),
            Some(Duration::from_millis(1500))
        );
    }

    #[test]
    fn test_as_millis() {
        assert_eq!(QueryTimeout::NotSet.as_millis(), -1);
        assert_eq!(QueryTimeout::Unbounded.as_millis(), 0);
        assert_eq!(QueryTimeout::Millis(u64::MAX).as_millis(), i64::MAX);
        assert_eq!(QueryTimeout::Millis(5000).to_string(), "5000ms");
    }
}
