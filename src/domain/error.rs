//! Crate error type.
//!
//! Configuration problems are fatal and raised before the simulation loop
//! starts. Data sparsity (series shorter than an indicator period, missing
//! optional fields) is never an error: the evaluator degrades to neutral
//! signals and field fallbacks instead.

/// Top-level error type for kabusim.
#[derive(Debug, thiserror::Error)]
pub enum KabusimError {
    #[error("unknown indicator: {id}")]
    UnknownIndicator { id: String },

    #[error("indicator {indicator}: missing required parameter {param}")]
    MissingParam { indicator: String, param: String },

    #[error("indicator {indicator}: invalid value for {param}: {reason}")]
    InvalidParam {
        indicator: String,
        param: String,
        reason: String,
    },

    #[error("condition group {group} must contain at least one condition")]
    EmptyConditionGroup { group: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("no quote data for {code}")]
    NoData { code: String },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&KabusimError> for std::process::ExitCode {
    fn from(err: &KabusimError) -> Self {
        let code: u8 = match err {
            KabusimError::Io(_) => 1,
            KabusimError::ConfigMissing { .. } | KabusimError::ConfigInvalid { .. } => 2,
            KabusimError::UnknownIndicator { .. }
            | KabusimError::MissingParam { .. }
            | KabusimError::InvalidParam { .. }
            | KabusimError::EmptyConditionGroup { .. }
            | KabusimError::Json(_) => 3,
            KabusimError::NoData { .. } | KabusimError::Data { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
