//! Domain error types.

/// Top-level error type for bartrader.
#[derive(Debug, thiserror::Error)]
pub enum BarTraderError {
    #[error("malformed update at {timestamp}: {reason}")]
    MalformedUpdate { timestamp: String, reason: String },

    #[error("invariant violated: {reason}")]
    InvariantViolation { reason: String },

    #[error("execution boundary rejected order group {oca_group}: {reason}")]
    Execution { oca_group: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("feed error: {reason}")]
    Feed { reason: String },

    #[error("timezone error: {reason}")]
    Timezone { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl BarTraderError {
    pub fn config_invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        BarTraderError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&BarTraderError> for std::process::ExitCode {
    fn from(err: &BarTraderError) -> Self {
        let code: u8 = match err {
            BarTraderError::Io(_) => 1,
            BarTraderError::ConfigParse { .. }
            | BarTraderError::ConfigMissing { .. }
            | BarTraderError::ConfigInvalid { .. } => 2,
            BarTraderError::Feed { .. }
            | BarTraderError::Timezone { .. }
            | BarTraderError::MalformedUpdate { .. } => 3,
            BarTraderError::Execution { .. } => 4,
            BarTraderError::InvariantViolation { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
