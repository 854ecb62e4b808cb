use thiserror::Error;

/// Failures contained inside the engine. None of these reach the host page;
/// the worst outcome is an empty background.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("drawing surface unavailable: {0}")]
    SurfaceUnavailable(String),
    #[error("shader compile failed: {0}")]
    ShaderCompile(String),
    #[error("shader program link failed: {0}")]
    ShaderLink(String),
    #[error("preference store error: {0}")]
    Preference(String),
}

impl EngineError {
    pub fn surface(reason: impl Into<String>) -> Self {
        Self::SurfaceUnavailable(reason.into())
    }
}
