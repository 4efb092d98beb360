// Note expansion: from annotated melody notes to a flat track-note stream.
//
// This is the glue between the partitioner and the SMF crate. Each input
// `ScoreNote` carries a `Treatment`: left alone (`Plain`), eligible but kept
// as written (`Original`), or replaced by a named turn (`Ornament`). The
// caller has already made those decisions; nothing here is random.
//
// Ornamented notes are partitioned and their segments appended in order.
// Segments of zero length (a duration too short to split) are dropped,
// because the track builder only accepts positive durations; the remaining
// segments still sum to the original duration.
//
// Usage statistics are an explicit `VariantUsage` value owned by the caller
// and updated only when a whole call succeeds.

use crate::catalog;
use crate::error::{Result, TurnError};
use crate::partition::{Meter, partition_variant};
use crate::pitch::{midi_key, parse_pitch_name};
use serde::Serialize;
use std::collections::BTreeMap;
use std::str::FromStr;
use std::path::Path;
use turns_smf::{SmfConfig, TrackNote, build_tracks, encode_smf, write_smf_file};

/// Variant column value marking an eligible note left unornamented.
pub const ORIGINAL_MARKER: &str = "ORIGINAL";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Treatment {
    /// Not a candidate for ornamentation.
    Plain,
    /// A candidate that was left as written.
    Original,
    /// Replace with the named variant.
    Ornament(String),
}

/// One note of the input melody.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreNote {
    pub track: u16,
    pub pitch: i32,
    pub duration: u32,
    pub treatment: Treatment,
}

impl ScoreNote {
    pub fn plain(track: u16, pitch: i32, duration: u32) -> Self {
        ScoreNote {
            track,
            pitch,
            duration,
            treatment: Treatment::Plain,
        }
    }

    pub fn ornamented(track: u16, pitch: i32, duration: u32, variant: &str) -> Self {
        ScoreNote {
            track,
            pitch,
            duration,
            treatment: Treatment::Ornament(variant.to_string()),
        }
    }
}

/// Parses `TRACK:PITCH:DURATION[:VARIANT]`, where PITCH is a note name or a
/// pitch number and VARIANT is a catalog id or `ORIGINAL`.
impl FromStr for ScoreNote {
    type Err = TurnError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || TurnError::InvalidNoteSpec(s.to_string());
        let fields: Vec<&str> = s.split(':').collect();
        if !(3..=4).contains(&fields.len()) {
            return Err(invalid());
        }

        let track: u16 = fields[0].parse().map_err(|_| invalid())?;
        let pitch = match fields[1].parse::<i32>() {
            Ok(number) => number,
            Err(_) => parse_pitch_name(fields[1])?,
        };
        let duration: u32 = fields[2].parse().map_err(|_| invalid())?;
        let treatment = match fields.get(3) {
            None | Some(&"") => Treatment::Plain,
            Some(&ORIGINAL_MARKER) => Treatment::Original,
            Some(id) => Treatment::Ornament((*id).to_string()),
        };

        Ok(ScoreNote {
            track,
            pitch,
            duration,
            treatment,
        })
    }
}

/// Running counts of how notes were treated.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct VariantUsage {
    counts: BTreeMap<String, usize>,
    eligible: usize,
    ornamented: usize,
}

impl VariantUsage {
    pub fn new() -> Self {
        Self::default()
    }

    fn record_original(&mut self) {
        self.eligible += 1;
    }

    fn record_ornament(&mut self, variant_id: &str) {
        self.eligible += 1;
        self.ornamented += 1;
        *self.counts.entry(variant_id.to_string()).or_insert(0) += 1;
    }

    /// Fold another tally into this one.
    pub fn merge(&mut self, other: VariantUsage) {
        self.eligible += other.eligible;
        self.ornamented += other.ornamented;
        for (id, n) in other.counts {
            *self.counts.entry(id).or_insert(0) += n;
        }
    }

    /// How many notes were replaced by `variant_id`.
    pub fn count(&self, variant_id: &str) -> usize {
        self.counts.get(variant_id).copied().unwrap_or(0)
    }

    /// Per-variant counts in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(id, &n)| (id.as_str(), n))
    }

    /// Notes that were candidates (`Original` or `Ornament`).
    pub fn eligible(&self) -> usize {
        self.eligible
    }

    pub fn ornamented(&self) -> usize {
        self.ornamented
    }

    /// Share of eligible notes that were ornamented, 0-100. Zero when
    /// nothing was eligible.
    pub fn percentage(&self) -> f64 {
        if self.eligible == 0 {
            0.0
        } else {
            self.ornamented as f64 / self.eligible as f64 * 100.0
        }
    }
}

/// Expand one note, appending its track notes to `out`.
fn expand_into(
    note: &ScoreNote,
    meter: Meter,
    usage: &mut VariantUsage,
    out: &mut Vec<TrackNote>,
) -> Result<()> {
    if note.duration == 0 {
        return Err(TurnError::InvalidDuration);
    }

    let id = match &note.treatment {
        Treatment::Plain => {
            out.push(TrackNote::new(note.track, midi_key(note.pitch)?, note.duration));
            return Ok(());
        }
        Treatment::Original => {
            out.push(TrackNote::new(note.track, midi_key(note.pitch)?, note.duration));
            usage.record_original();
            return Ok(());
        }
        Treatment::Ornament(id) => id,
    };

    let variant = catalog::lookup(id)?;
    let events = partition_variant(note.pitch, note.duration, meter, variant)?;
    let mut dropped = 0;
    for event in events {
        if event.duration == 0 {
            dropped += 1;
            continue;
        }
        out.push(TrackNote::new(note.track, midi_key(event.pitch)?, event.duration));
    }
    if dropped > 0 {
        log::debug!(
            "{} on pitch {} ({} ticks): dropped {dropped} zero-length segments",
            variant.id,
            note.pitch,
            note.duration
        );
    }

    usage.record_ornament(variant.id);
    Ok(())
}

/// Expand a melody into the flat note stream the track builder consumes.
///
/// Either every note expands and `usage` is updated, or an error is returned
/// and `usage` is left untouched.
pub fn expand_notes(
    notes: &[ScoreNote],
    meter: Meter,
    usage: &mut VariantUsage,
) -> Result<Vec<TrackNote>> {
    let mut local = VariantUsage::new();
    let mut out = Vec::with_capacity(notes.len());
    for note in notes {
        expand_into(note, meter, &mut local, &mut out)?;
    }
    log::debug!(
        "expanded {} notes into {} track notes ({} ornamented)",
        notes.len(),
        out.len(),
        local.ornamented()
    );
    usage.merge(local);
    Ok(out)
}

/// Expand a melody and encode it as a Standard MIDI File.
pub fn render_midi(
    notes: &[ScoreNote],
    meter: Meter,
    config: &SmfConfig,
) -> Result<(Vec<u8>, VariantUsage)> {
    let mut usage = VariantUsage::new();
    let track_notes = expand_notes(notes, meter, &mut usage)?;
    let tracks = build_tracks(&track_notes)?;
    let bytes = encode_smf(&tracks, config)?;
    Ok((bytes, usage))
}

/// Expand a melody and write it as a Standard MIDI File at `path`.
///
/// Nothing is written unless the whole melody expands and encodes.
pub fn render_midi_file(
    notes: &[ScoreNote],
    meter: Meter,
    config: &SmfConfig,
    path: &Path,
) -> Result<VariantUsage> {
    let mut usage = VariantUsage::new();
    let track_notes = expand_notes(notes, meter, &mut usage)?;
    let tracks = build_tracks(&track_notes)?;
    write_smf_file(path, &tracks, config)?;
    Ok(usage)
}
