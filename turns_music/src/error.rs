// Error type for pitch parsing, ornament partitioning, and rendering.

use thiserror::Error;
use turns_smf::SmfError;

#[derive(Debug, Error)]
pub enum TurnError {
    #[error("invalid pitch name: {0:?}")]
    InvalidPitchName(String),

    #[error("unknown turn variant: {0:?}")]
    UnknownVariant(String),

    #[error("duration must be greater than 0")]
    InvalidDuration,

    #[error("invalid meter: {0:?} (expected duple or triple)")]
    InvalidMeter(String),

    /// A pitch with no 7-bit MIDI key, or a principal whose auxiliary notes
    /// would leave the `i32` range.
    #[error("pitch {0} is out of range (MIDI keys are 0..=127)")]
    PitchOutOfRange(i32),

    #[error("invalid note {0:?} (expected TRACK:PITCH:DURATION[:VARIANT])")]
    InvalidNoteSpec(String),

    #[error("failed to parse MIDI file: {0}")]
    MidiParse(String),

    #[error(transparent)]
    Smf(#[from] SmfError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TurnError>;
