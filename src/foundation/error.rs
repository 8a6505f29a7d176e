/// Crate-wide result alias.
pub type FlameResult<T> = Result<T, FlameError>;

/// Errors surfaced by the variation pipeline.
///
/// Numeric degeneracy is never reported here: every variation absorbs it locally.
#[derive(thiserror::Error, Debug)]
pub enum FlameError {
    /// Unknown parameter name passed to a variation setter.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// No registered variation has this exact name.
    #[error("unknown variation: {0}")]
    UnknownVariation(String),

    /// A function was asked for a capability it does not declare.
    #[error("unsupported capability '{capability}' for variation '{name}'")]
    UnsupportedCapability {
        /// Variation name.
        name: String,
        /// Missing capability.
        capability: String,
    },

    /// Kernel source failed to lex, parse, lower or execute.
    #[error("kernel error: {0}")]
    Kernel(String),

    /// Invalid flame/session configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// JSON boundary failure.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Anything else.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FlameError {
    /// Build [`FlameError::InvalidParameter`].
    pub fn invalid_parameter(name: impl Into<String>) -> Self {
        Self::InvalidParameter(name.into())
    }

    /// Build [`FlameError::UnknownVariation`].
    pub fn unknown_variation(name: impl Into<String>) -> Self {
        Self::UnknownVariation(name.into())
    }

    /// Build [`FlameError::UnsupportedCapability`].
    pub fn unsupported(name: impl Into<String>, capability: impl Into<String>) -> Self {
        Self::UnsupportedCapability {
            name: name.into(),
            capability: capability.into(),
        }
    }

    /// Build [`FlameError::Kernel`].
    pub fn kernel(msg: impl Into<String>) -> Self {
        Self::Kernel(msg.into())
    }

    /// Build [`FlameError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build [`FlameError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
