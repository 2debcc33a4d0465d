/// Convenience result type used across showertrack.
pub type ShowerResult<T> = Result<T, ShowerError>;

/// Top-level error taxonomy used by reconstruction APIs.
#[derive(thiserror::Error, Debug)]
pub enum ShowerError {
    /// Byte stream does not split into whole 48-byte frames.
    #[error("format error at byte offset {offset}: {len} trailing bytes do not form a whole frame")]
    Format {
        /// Offset of the first byte of the incomplete frame.
        offset: u64,
        /// Number of bytes available for the incomplete frame.
        len: usize,
    },

    /// Invalid caller-provided options or inputs.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while parsing the intermediate text format.
    #[error("parse error: {0}")]
    Parse(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ShowerError {
    /// Build a [`ShowerError::Format`] value.
    pub fn format(offset: u64, len: usize) -> Self {
        Self::Format { offset, len }
    }

    /// Build a [`ShowerError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ShowerError::Parse`] value.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Build a [`ShowerError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
