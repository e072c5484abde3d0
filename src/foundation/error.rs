/// Convenience result type used across goban-anim.
pub type GobanResult<T> = Result<T, GobanError>;

/// Top-level error taxonomy used by rendering APIs.
///
/// Rejected moves and records with nothing to draw are not errors; they are reported through
/// [`crate::MoveResult`] and [`crate::RenderOutcome`] respectively.
#[derive(thiserror::Error, Debug)]
pub enum GobanError {
    /// Malformed record data (unparsable size, move number, or record text).
    #[error("record error: {0}")]
    Record(String),

    /// Viewport planning could not produce a window.
    #[error("layout error: {0}")]
    Layout(String),

    /// Compositing or graphics preparation failed.
    #[error("render error: {0}")]
    Render(String),

    /// Writing the raster or animated output failed.
    #[error("encode error: {0}")]
    Encode(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GobanError {
    /// Build a [`GobanError::Record`] value.
    pub fn record(msg: impl Into<String>) -> Self {
        Self::Record(msg.into())
    }

    /// Build a [`GobanError::Layout`] value.
    pub fn layout(msg: impl Into<String>) -> Self {
        Self::Layout(msg.into())
    }

    /// Build a [`GobanError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`GobanError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
