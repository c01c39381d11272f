/// Crate-wide result alias.
pub type RaceResult<T> = Result<T, RaceError>;

/// Errors surfaced by the engine.
///
/// Recoverable conditions (degenerate scale domains, out-of-range seeks, stale ticks) never show
/// up here; they are handled where they happen and reported through `tracing` and
/// [`crate::TickOutcome`].
#[derive(thiserror::Error, Debug)]
pub enum RaceError {
    /// Dataset rejected at load time.
    #[error("invalid dataset: {0}")]
    InvalidDataset(String),

    /// Configuration rejected by validation.
    #[error("config error: {0}")]
    Config(String),

    /// A playback control was called in a state that does not accept it.
    #[error("playback error: {0}")]
    Playback(String),

    /// A frame sink failed.
    #[error("sink error: {0}")]
    Sink(String),

    /// JSON (de)serialization failed.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Anything else, with its source preserved.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RaceError {
    /// Build a [`RaceError::InvalidDataset`].
    pub fn invalid_dataset(msg: impl Into<String>) -> Self {
        Self::InvalidDataset(msg.into())
    }

    /// Build a [`RaceError::Config`].
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`RaceError::Playback`].
    pub fn playback(msg: impl Into<String>) -> Self {
        Self::Playback(msg.into())
    }

    /// Build a [`RaceError::Sink`].
    pub fn sink(msg: impl Into<String>) -> Self {
        Self::Sink(msg.into())
    }

    /// Build a [`RaceError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
