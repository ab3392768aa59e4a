//! Error type shared by the terrain, fire and scene modules.

use thiserror::Error;

/// Errors returned by terrain construction, fire placement and scene setup.
///
/// All of these are precondition violations detected up front; nothing in
/// the crate performs I/O or partial updates that would need recovery.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FirePlaceError {
    /// A parameter was outside its valid range.
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument {
        /// Name of the offending parameter (e.g. `"width"`, `"face_index"`)
        name: &'static str,
        /// What was wrong with it, including the value seen
        reason: String,
    },

    /// A scene configuration document could not be parsed or serialized.
    #[error("scene config: {0}")]
    Config(String),
}

impl FirePlaceError {
    /// Create an [`FirePlaceError::InvalidArgument`] for the named parameter.
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }

    /// Reject a float that must be finite and strictly positive.
    pub(crate) fn require_positive(name: &'static str, value: f32) -> Result<()> {
        if value.is_finite() && value > 0.0 {
            Ok(())
        } else {
            Err(Self::invalid(
                name,
                format!("must be finite and positive, got {value}"),
            ))
        }
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, FirePlaceError>;
