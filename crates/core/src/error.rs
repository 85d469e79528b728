use isound_transport::Millis;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TimelineError {
    #[error("timeline duration of {requested}ms cannot hold a clip of {longest_clip}ms")]
    InvalidDurationSelection { requested: Millis, longest_clip: Millis },

    #[error("invalid timeline duration: {0}ms")]
    InvalidDuration(Millis),

    #[error("playback speed must be positive and finite, got {0}")]
    InvalidSpeed(f64),

    #[error("clip index {index} out of range (registry holds {len} clips)")]
    ClipIndexOutOfRange { index: usize, len: usize },

    #[error("invalid clip: {0}")]
    InvalidClip(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error reading '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}
