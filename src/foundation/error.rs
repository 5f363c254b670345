/// Crate result alias.
pub type SplicerResult<T> = Result<T, SplicerError>;

/// Terminal failures surfaced by composition.
///
/// Reference drops and rounding drift never show up here; they are reported as
/// [`Diagnostic`](crate::Diagnostic)s next to the composed timeline.
#[derive(thiserror::Error, Debug)]
pub enum SplicerError {
    /// Target duration missing, non-finite or non-positive.
    #[error("invalid target: {0}")]
    InvalidTarget(String),

    /// Neither library nor owned candidates were supplied.
    #[error("empty candidate pool")]
    EmptyPool,

    /// Every content reference was dropped during resolution.
    #[error("no content: {0}")]
    NoContent(String),

    /// Malformed request or timeline values.
    #[error("validation error: {0}")]
    Validation(String),

    /// JSON (de)serialization failure.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Anything else, usually bubbled up from a collaborator.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Coarse failure category reported to the caller at the composition boundary.
///
/// `NoContent` and `NoValidTarget` tell the caller to retry upstream selection rather than
/// re-run composition with the same inputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCategory {
    /// The requested target duration is unusable.
    NoValidTarget,
    /// Nothing renderable survived (or was ever supplied).
    NoContent,
    /// The request (or a produced timeline) is malformed.
    InvalidRequest,
}

impl SplicerError {
    /// Build an [`SplicerError::InvalidTarget`].
    pub fn invalid_target(msg: impl Into<String>) -> Self {
        Self::InvalidTarget(msg.into())
    }

    /// Build an [`SplicerError::NoContent`].
    pub fn no_content(msg: impl Into<String>) -> Self {
        Self::NoContent(msg.into())
    }

    /// Build an [`SplicerError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build an [`SplicerError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Category to report to the caller.
    pub fn category(&self) -> FailureCategory {
        match self {
            Self::InvalidTarget(_) => FailureCategory::NoValidTarget,
            Self::EmptyPool | Self::NoContent(_) => FailureCategory::NoContent,
            Self::Validation(_) | Self::Serde(_) | Self::Other(_) => {
                FailureCategory::InvalidRequest
            }
        }
    }
}

impl From<serde_json::Error> for SplicerError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
