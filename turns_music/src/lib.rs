// Turn ornament expansion.
//
// Replaces annotated melody notes with ornamental "turns" (a quick figure
// around the principal note using upper and lower auxiliaries) and renders
// the result as a Standard MIDI File via `turns_smf`.
//
// Pipeline: pitch names -> partition each ornamented note -> flat track-note
// stream -> per-track timed events -> SMF bytes.
//
// Architecture:
// - pitch.rs: Note name <-> pitch number ("C4" = 60), sharp spellings only
// - catalog.rs: The static table of 55 named variants (shape + offsets)
// - partition.rs: Meter, and the per-shape, per-meter duration slicing that
//   expands one note into its ornament events
// - expand.rs: ScoreNote / Treatment, the expansion pipeline, the
//   caller-owned VariantUsage tally, and render_midi / render_midi_file
// - error.rs: TurnError
//
// The `turns` binary (main.rs) wraps this in a small CLI.
//
// Everything here is deterministic. Which notes to ornament, and with which
// variant, is decided by the caller before any of this code runs.

pub mod catalog;
pub mod error;
pub mod expand;
pub mod partition;
pub mod pitch;

pub use catalog::{Shape, VARIANTS, Variant, lookup};
pub use error::{Result, TurnError};
pub use expand::{
    ScoreNote, Treatment, VariantUsage, expand_notes, render_midi, render_midi_file,
};
pub use partition::{Meter, OrnamentEvent, partition, partition_variant};
pub use pitch::{parse_pitch_name, pitch_name};
