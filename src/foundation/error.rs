/// Convenience result type used across mapviz.
pub type VizResult<T> = Result<T, VizError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Expression trees are static once bound, so every error is surfaced
/// synchronously and rejects the whole style.
#[derive(thiserror::Error, Debug)]
pub enum VizError {
    /// Bad literal argument: wrong arity or an out-of-domain constant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Operand type incompatible with a node's declared signature.
    #[error("type error: {0}")]
    Type(String),

    /// An internal algorithm reached a state believed unreachable.
    #[error("invariant violated: {0}")]
    Invariant(String),

    /// Style expression text could not be parsed.
    #[error("parse error at byte {offset}: {message}")]
    Parse {
        /// Byte offset into the source text.
        offset: usize,
        /// Human readable description.
        message: String,
    },

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Image loading or decoding failures.
    #[error("image error: {0}")]
    Image(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl VizError {
    /// Build a [`VizError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`VizError::Type`] value.
    pub fn type_error(msg: impl Into<String>) -> Self {
        Self::Type(msg.into())
    }

    /// Build a [`VizError::Invariant`] value.
    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::Invariant(msg.into())
    }

    /// Build a [`VizError::Parse`] value.
    pub fn parse(offset: usize, msg: impl Into<String>) -> Self {
        Self::Parse {
            offset,
            message: msg.into(),
        }
    }

    /// Build a [`VizError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Build a [`VizError::Image`] value.
    pub fn image(msg: impl Into<String>) -> Self {
        Self::Image(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
