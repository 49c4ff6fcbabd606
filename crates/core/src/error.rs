use crate::game::Phase;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid params json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: String) -> Self {
        ConfigError::Invalid { field, reason }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("cannot {op} while {phase:?}")]
    InvalidTransition { op: &'static str, phase: Phase },
    #[error(transparent)]
    Config(#[from] ConfigError),
}
