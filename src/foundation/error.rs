/// Convenience result type used across the engine.
pub type DecorResult<T> = Result<T, DecorError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Asset and configuration problems are normally absorbed by the engine (missing sprites are
/// skipped, a broken config falls back to defaults); these variants surface when a caller asks
/// for the strict form of an operation or misuses a paint target.
#[derive(thiserror::Error, Debug)]
pub enum DecorError {
    /// Invalid caller-provided data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Configuration could not be read or understood.
    #[error("config error: {0}")]
    Config(String),

    /// An asset could not be resolved, read or decoded.
    #[error("asset error: {0}")]
    Asset(String),

    /// Paint target misuse or rasterization failure.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DecorError {
    /// Build a [`DecorError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`DecorError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`DecorError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`DecorError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`DecorError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for DecorError {
    fn from(e: serde_json::Error) -> Self {
        Self::serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
