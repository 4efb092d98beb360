// Error type for track building and SMF encoding.
//
// Every failure in this crate is local and synchronous: the caller gets an
// `SmfError` and no bytes have been committed to the sink for the failing
// call (see `writer.rs` for how multi-track output is sized up front).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SmfError {
    /// A note with zero duration reached the track builder.
    #[error("note duration must be greater than 0")]
    InvalidDuration,

    /// A track body does not fit the 4-byte chunk length field.
    #[error("track {track} body is {len} bytes, exceeding the chunk length field")]
    TrackTooLarge { track: u16, len: u64 },

    /// An inter-event delta exceeds the largest 4-byte variable-length quantity.
    #[error("delta of {0} ticks cannot be encoded as a variable-length quantity")]
    DeltaTooLarge(u32),

    /// A track's running tick cursor overflowed.
    #[error("tick cursor overflowed on track {track}")]
    TickOverflow { track: u16 },

    /// Note keys are 7-bit.
    #[error("note key {0} is outside 0..=127")]
    KeyOutOfRange(u8),

    /// The header's track count field is 16 bits wide.
    #[error("{0} tracks do not fit the header track count")]
    TooManyTracks(usize),

    #[error("invalid encoder config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SmfError>;
