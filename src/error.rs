/// Error types for Tab Sorter
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SorterError {
    /// A browser API call rejected
    #[error("{op} failed: {message}")]
    Host { op: &'static str, message: String },
    #[error("failed to decode {0}")]
    Decode(String),
    #[error("unknown preference: {0}")]
    UnknownPreference(String),
    #[error("invalid value {value:?} for preference {key}")]
    InvalidPreference { key: String, value: String },
}

impl SorterError {
    pub fn host(op: &'static str, message: impl Into<String>) -> SorterError {
        SorterError::Host {
            op,
            message: message.into(),
        }
    }
}

pub type Result<T, E = SorterError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            SorterError::host("tabs.move", "no such tab").to_string(),
            "tabs.move failed: no such tab"
        );
        assert_eq!(
            SorterError::InvalidPreference {
                key: "sortMode".to_string(),
                value: "sideways".to_string(),
            }
            .to_string(),
            "invalid value \"sideways\" for preference sortMode"
        );
    }
}
