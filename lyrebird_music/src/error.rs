// Error types for generation and export.
//
// Generation errors are all caller-input problems, detected before any note
// is produced: a request either yields a complete sequence or one of these.
// Export errors cover the serializer side (file I/O, JSON, MIDI range);
// config errors cover loading a request file.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("unknown key: {0:?}")]
    UnknownKey(String),
    #[error("invalid tempo: {0} BPM (must be > 0)")]
    InvalidTempo(u32),
    #[error("scale has {len} pitches, need at least {min}")]
    InvalidScale { len: usize, min: usize },
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    #[error("invalid octave bases {bases:?}: {reason}")]
    InvalidOctaveBases { bases: Vec<i32>, reason: String },
}

impl GenerationError {
    pub(crate) fn param(name: &'static str, reason: impl Into<String>) -> Self {
        GenerationError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("MIDI error: {0}")]
    Midi(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GenerationError>;
