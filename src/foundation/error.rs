use crate::render::backend::BackendKind;

/// Convenience result type used across retouch.
pub type RetouchResult<T> = Result<T, RetouchError>;

/// Top-level error taxonomy used by the rendering and layout APIs.
#[derive(thiserror::Error, Debug)]
pub enum RetouchError {
    /// An operation was rendered against a backend it has no path for.
    #[error("unsupported backend: operation '{operation}' has no {backend:?} path")]
    UnsupportedBackend {
        /// Identifier of the operation that was invoked.
        operation: &'static str,
        /// Backend the renderer was constructed with.
        backend: BackendKind,
    },

    /// A shader-capable operation was constructed without a shader program.
    #[error("missing shader program for operation '{0}'")]
    MissingShaderProgram(&'static str),

    /// The text measurement capability produced an unusable width.
    #[error("invalid measurement: width {width} for {text:?}")]
    InvalidMeasurement {
        /// The string that was measured.
        text: String,
        /// The width reported for it.
        width: f64,
    },

    /// Invalid caller-provided data.
    #[error("validation error: {0}")]
    Validation(String),

    /// A shader device rejected a program.
    #[error("shader compile error: {0}")]
    ShaderCompile(String),

    /// GPU device setup or execution failure.
    #[error("gpu error: {0}")]
    Gpu(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RetouchError {
    /// Build a [`RetouchError::UnsupportedBackend`] value.
    pub fn unsupported_backend(operation: &'static str, backend: BackendKind) -> Self {
        Self::UnsupportedBackend { operation, backend }
    }

    /// Build a [`RetouchError::InvalidMeasurement`] value.
    pub fn invalid_measurement(text: impl Into<String>, width: f64) -> Self {
        Self::InvalidMeasurement {
            text: text.into(),
            width,
        }
    }

    /// Build a [`RetouchError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`RetouchError::ShaderCompile`] value.
    pub fn shader_compile(msg: impl Into<String>) -> Self {
        Self::ShaderCompile(msg.into())
    }

    /// Build a [`RetouchError::Gpu`] value.
    pub fn gpu(msg: impl Into<String>) -> Self {
        Self::Gpu(msg.into())
    }

    /// Build a [`RetouchError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
