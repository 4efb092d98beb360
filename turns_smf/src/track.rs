// Track event building.
//
// Turns a chronological stream of `TrackNote`s into per-track lists of
// timestamped note-on / note-off events. Each track has its own tick cursor
// starting at 0; a note occupies `[cursor, cursor + duration)` and the
// cursor then advances by the duration, so notes within a track are laid
// end to end with no gaps. Rests are not represented here; a caller wanting
// silence has to spend the ticks some other way.
//
// The cursors live in a local map for the duration of one `build_tracks`
// call. Nothing is retained between calls.

use crate::error::{Result, SmfError};
use std::collections::BTreeMap;

/// One note as consumed by the builder: which track, which key, how long.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrackNote {
    pub track: u16,
    /// MIDI key number, 0-127.
    pub key: u8,
    /// Duration in ticks. Must be nonzero.
    pub duration: u32,
}

impl TrackNote {
    pub fn new(track: u16, key: u8, duration: u32) -> Self {
        TrackNote {
            track,
            key,
            duration,
        }
    }
}

/// Note-on or note-off.
///
/// `Off` sorts before `On`, which is the tie-break the encoder relies on
/// when a release and a new onset share a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NoteKind {
    Off,
    On,
}

/// A note-on or note-off at an absolute tick within its track.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimedEvent {
    pub track: u16,
    pub key: u8,
    pub tick: u32,
    pub kind: NoteKind,
}

impl TimedEvent {
    /// Sort key used by the encoder: tick first, then `Off` before `On`.
    pub fn order_key(&self) -> (u32, NoteKind) {
        (self.tick, self.kind)
    }
}

/// Per-track event lists keyed by track id. `BTreeMap` so iteration is in
/// ascending track order, which is the order tracks are written in.
pub type TrackMap = BTreeMap<u16, Vec<TimedEvent>>;

/// Build timestamped events for every track in `notes`.
///
/// Fails on a zero duration, a key above 127, or a track whose cursor would
/// overflow `u32`. On failure nothing is returned for any track.
pub fn build_tracks(notes: &[TrackNote]) -> Result<TrackMap> {
    let mut cursors: BTreeMap<u16, u32> = BTreeMap::new();
    let mut tracks = TrackMap::new();

    for note in notes {
        if note.duration == 0 {
            return Err(SmfError::InvalidDuration);
        }
        if note.key > 127 {
            return Err(SmfError::KeyOutOfRange(note.key));
        }

        let cursor = cursors.entry(note.track).or_insert(0);
        let start = *cursor;
        let end = start
            .checked_add(note.duration)
            .ok_or(SmfError::TickOverflow { track: note.track })?;

        let events = tracks.entry(note.track).or_default();
        events.push(TimedEvent {
            track: note.track,
            key: note.key,
            tick: start,
            kind: NoteKind::On,
        });
        events.push(TimedEvent {
            track: note.track,
            key: note.key,
            tick: end,
            kind: NoteKind::Off,
        });

        *cursor = end;
    }

    log::debug!(
        "built {} events across {} tracks from {} notes",
        tracks.values().map(Vec::len).sum::<usize>(),
        tracks.len(),
        notes.len()
    );
    Ok(tracks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn on(track: u16, key: u8, tick: u32) -> TimedEvent {
        TimedEvent {
            track,
            key,
            tick,
            kind: NoteKind::On,
        }
    }

    fn off(track: u16, key: u8, tick: u32) -> TimedEvent {
        TimedEvent {
            track,
            key,
            tick,
            kind: NoteKind::Off,
        }
    }

    #[test]
    fn sequential_notes_on_one_track() {
        let notes = [TrackNote::new(1, 60, 100), TrackNote::new(1, 62, 50)];
        let tracks = build_tracks(&notes).unwrap();

        assert_eq!(tracks.len(), 1);
        assert_eq!(
            tracks[&1],
            vec![on(1, 60, 0), off(1, 60, 100), on(1, 62, 100), off(1, 62, 150)]
        );
    }

    #[test]
    fn tracks_keep_independent_cursors() {
        let notes = [
            TrackNote::new(2, 48, 300),
            TrackNote::new(1, 60, 100),
            TrackNote::new(2, 50, 10),
            TrackNote::new(1, 64, 20),
        ];
        let tracks = build_tracks(&notes).unwrap();

        assert_eq!(tracks.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(
            tracks[&1],
            vec![on(1, 60, 0), off(1, 60, 100), on(1, 64, 100), off(1, 64, 120)]
        );
        assert_eq!(
            tracks[&2],
            vec![on(2, 48, 0), off(2, 48, 300), on(2, 50, 300), off(2, 50, 310)]
        );
    }

    #[test]
    fn empty_input_yields_no_tracks() {
        assert!(build_tracks(&[]).unwrap().is_empty());
    }

    #[test]
    fn rejects_zero_duration() {
        let notes = [TrackNote::new(1, 60, 100), TrackNote::new(1, 60, 0)];
        assert!(matches!(
            build_tracks(&notes),
            Err(SmfError::InvalidDuration)
        ));
    }

    #[test]
    fn rejects_eight_bit_key() {
        let notes = [TrackNote::new(1, 128, 10)];
        assert!(matches!(
            build_tracks(&notes),
            Err(SmfError::KeyOutOfRange(128))
        ));
    }

    #[test]
    fn rejects_cursor_overflow() {
        let notes = [TrackNote::new(3, 60, u32::MAX), TrackNote::new(3, 60, 1)];
        assert!(matches!(
            build_tracks(&notes),
            Err(SmfError::TickOverflow { track: 3 })
        ));
    }

    #[test]
    fn off_sorts_before_on_at_equal_tick() {
        let mut events = vec![on(1, 62, 100), off(1, 60, 100), on(1, 60, 0)];
        events.sort_by_key(TimedEvent::order_key);
        assert_eq!(events, vec![on(1, 60, 0), off(1, 60, 100), on(1, 62, 100)]);
    }
}
