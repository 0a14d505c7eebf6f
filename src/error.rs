use std::fmt;
use thiserror::Error;

/// The external call that failed. `Backend` covers the backend call as a
/// whole, e.g. when the wrapping transport times it out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamStage {
    Upload,
    Metadata,
    Backend,
}

impl fmt::Display for UpstreamStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamStage::Upload => write!(f, "upload"),
            UpstreamStage::Metadata => write!(f, "metadata"),
            UpstreamStage::Backend => write!(f, "backend"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    MissingInput,
    UpstreamFailure,
    MalformedBackendResponse,
    UnexpectedFailure,
}

// Main palette error type
#[derive(Error, Debug)]
pub enum PaletteError {
    #[error("No image file uploaded")]
    MissingInput,
    #[error("Upstream {stage} call failed with status {status}: {body}")]
    UpstreamFailure {
        stage: UpstreamStage,
        status: u16,
        body: String,
    },
    #[error("Malformed backend response: {0}")]
    MalformedBackendResponse(String),
    #[error("Unexpected failure: {0}")]
    Unexpected(String),
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl PaletteError {
    pub fn upstream(stage: UpstreamStage, status: u16, body: impl Into<String>) -> Self {
        PaletteError::UpstreamFailure {
            stage,
            status,
            body: body.into(),
        }
    }

    pub fn malformed(detail: impl Into<String>) -> Self {
        PaletteError::MalformedBackendResponse(detail.into())
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            PaletteError::MissingInput => FailureKind::MissingInput,
            PaletteError::UpstreamFailure { .. } => FailureKind::UpstreamFailure,
            PaletteError::MalformedBackendResponse(_) => FailureKind::MalformedBackendResponse,
            PaletteError::Unexpected(_) | PaletteError::Configuration(_) => {
                FailureKind::UnexpectedFailure
            }
        }
    }

    /// HTTP-equivalent status surfaced to the caller.
    pub fn status_code(&self) -> u16 {
        match self {
            PaletteError::MissingInput => 400,
            PaletteError::UpstreamFailure { status, .. } => *status,
            _ => 500,
        }
    }
}

impl From<config::ConfigError> for PaletteError {
    fn from(error: config::ConfigError) -> Self {
        PaletteError::Configuration(error.to_string())
    }
}

impl From<tokio::task::JoinError> for PaletteError {
    fn from(error: tokio::task::JoinError) -> Self {
        PaletteError::Unexpected(format!("Quantizer task failed: {}", error))
    }
}
