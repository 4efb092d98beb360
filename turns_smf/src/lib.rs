// turns_smf — Standard MIDI File output for ornamented note streams.
//
// Takes the flat, chronological list of `(track, key, duration)` notes that
// the ornament expansion in `turns_music` produces and turns it into a
// Format 1 SMF. The crate knows nothing about ornaments; it is the format
// half of the pipeline.
//
// Module overview:
// - `track.rs`:  `TrackNote` / `TimedEvent` and the track builder, which lays
//                notes end to end on independent per-track tick cursors.
// - `vlq.rs`:    Variable-length quantity encode/decode for delta times.
// - `writer.rs`: The SMF encoder. Seek-and-patch for seekable sinks,
//                buffer-then-commit for append-only ones.
// - `config.rs`: `SmfConfig` (division, channel, program, velocities),
//                loadable from JSON.
// - `error.rs`:  `SmfError` and the crate `Result` alias.
//
// Everything is synchronous and allocation-bounded by input size. There is
// no global state; two encodes in parallel share nothing.

pub mod config;
pub mod error;
pub mod track;
pub mod vlq;
pub mod writer;

pub use config::SmfConfig;
pub use error::{Result, SmfError};
pub use track::{NoteKind, TimedEvent, TrackMap, TrackNote, build_tracks};
pub use vlq::{MAX_VLQ, read_vlq, write_vlq};
pub use writer::{encode_smf, write_smf, write_smf_buffered, write_smf_file};
