// Pitch names.
//
// Converts between note names like "C4", "F#3", "A-1" and integer pitch
// numbers on the MIDI scale (C4 = 60). The octave is `pitch / 12 - 1` and the
// pitch class is `pitch % 12`, both with floor semantics so negative pitches
// still get a well-defined name. Only the twelve sharp spellings are
// recognized; flats are rejected rather than normalized.

use crate::error::{Result, TurnError};

/// Pitch class spellings indexed by `pitch % 12`.
pub const PITCH_CLASSES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Name of a pitch number, e.g. 60 -> "C4", 61 -> "C#4", 0 -> "C-1".
pub fn pitch_name(pitch: i32) -> String {
    let octave = pitch.div_euclid(12) - 1;
    let class = pitch.rem_euclid(12) as usize;
    format!("{}{}", PITCH_CLASSES[class], octave)
}

/// Parse a note name into a pitch number.
///
/// The trailing digits (with an optional leading minus) are the octave and
/// everything before them is the pitch class spelling.
pub fn parse_pitch_name(name: &str) -> Result<i32> {
    let invalid = || TurnError::InvalidPitchName(name.to_string());

    let digits_start = name.find(|c: char| c.is_ascii_digit()).ok_or_else(invalid)?;
    let octave_start = if name[..digits_start].ends_with('-') {
        digits_start - 1
    } else {
        digits_start
    };

    let (class_str, octave_str) = name.split_at(octave_start);
    let class = PITCH_CLASSES
        .iter()
        .position(|&spelling| spelling == class_str)
        .ok_or_else(invalid)?;
    let octave: i32 = octave_str.parse().map_err(|_| invalid())?;

    // The intermediate octave base can leave i32 range even when the final
    // pitch fits, e.g. "E-178956972" -> i32::MIN.
    let pitch = (i64::from(octave) + 1) * 12 + class as i64;
    i32::try_from(pitch).map_err(|_| invalid())
}

/// Narrow a pitch number to a MIDI key.
pub fn midi_key(pitch: i32) -> Result<u8> {
    u8::try_from(pitch)
        .ok()
        .filter(|&key| key <= 127)
        .ok_or(TurnError::PitchOutOfRange(pitch))
}
