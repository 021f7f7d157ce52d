use thiserror::Error;

/// Failures at the edges of the engine (decoding input, loading config).
///
/// Consolidation itself never fails; malformed events degrade instead.
#[derive(Error, Debug)]
pub enum TimelineError {
    #[error("Invalid event log JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid timeline config: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TimelineError {
    /// True when the caller supplied bad data, as opposed to an environment failure.
    pub fn is_input_error(&self) -> bool {
        match self {
            TimelineError::Json(_) | TimelineError::Config(_) => true,
            TimelineError::Io(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, TimelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_error_is_input_error() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = TimelineError::from(err);
        assert!(err.is_input_error());
        assert!(err.to_string().starts_with("Invalid event log JSON"));
    }

    #[test]
    fn test_io_error_is_not_input_error() {
        let err = TimelineError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert!(!err.is_input_error());
    }
}
