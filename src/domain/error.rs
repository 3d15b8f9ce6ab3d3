//! Domain error types.

/// Top-level error type for equant.
///
/// Numeric degeneracies inside the indicator and metrics code never surface
/// here; they resolve to documented defaults instead.
#[derive(Debug, thiserror::Error)]
pub enum EquantError {
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

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("insufficient data: have {bars} bars, need at least {minimum}")]
    InsufficientData { bars: usize, minimum: usize },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&EquantError> for std::process::ExitCode {
    fn from(err: &EquantError) -> Self {
        let code: u8 = match err {
            EquantError::Io(_) => 1,
            EquantError::ConfigParse { .. }
            | EquantError::ConfigMissing { .. }
            | EquantError::ConfigInvalid { .. } => 2,
            EquantError::Data { .. } => 3,
            EquantError::InvalidParameter { .. } => 4,
            EquantError::InsufficientData { .. } => 5,
            EquantError::Report { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}
