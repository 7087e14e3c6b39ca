/// Convenience result type used across memeframe.
pub type MemeResult<T> = Result<T, MemeError>;

/// Top-level error taxonomy used by compositor APIs.
///
/// Out-of-range text parameters are not represented here: the text layer model clamps them.
#[derive(thiserror::Error, Debug)]
pub enum MemeError {
    /// The source image could not be fetched or decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// Encoding a composited image failed.
    #[error("export error: {0}")]
    Export(String),

    /// A render was requested while no valid source image is available.
    #[error("no source image available")]
    NoSource,

    /// Invalid configuration or caller-provided data.
    #[error("validation error: {0}")]
    Validation(String),

    /// A remote collaborator (generation, publish, feed) reported a failure.
    #[error("remote error: {0}")]
    Remote(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MemeError {
    /// Build a [`MemeError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`MemeError::Export`] value.
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Build a [`MemeError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`MemeError::Remote`] value.
    pub fn remote(msg: impl Into<String>) -> Self {
        Self::Remote(msg.into())
    }

    /// Build a [`MemeError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Return `true` for failures that leave the session without a usable source image.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_) | Self::NoSource)
    }
}

impl From<serde_json::Error> for MemeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
