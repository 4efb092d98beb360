// Cross-checks the encoder against an independent SMF parser.
//
// Every file produced here is parsed back with `midly`; the test then walks
// the parsed events and reconstructs absolute ticks per track. This catches
// framing mistakes (wrong chunk lengths, malformed VLQs, stray bytes) that
// byte-slice assertions in the unit tests could miss.

use midly::{Format, MetaMessage, MidiMessage, Smf, Timing, TrackEventKind};
use turns_smf::{NoteKind, SmfConfig, TrackNote, build_tracks, encode_smf};

/// Flatten a parsed track into (absolute tick, key, kind) triples, skipping
/// the setup and end-of-track events.
fn notes_of(track: &[midly::TrackEvent]) -> Vec<(u32, u8, NoteKind)> {
    let mut tick = 0u32;
    let mut out = Vec::new();
    for event in track {
        tick += event.delta.as_int();
        if let TrackEventKind::Midi { message, .. } = event.kind {
            match message {
                MidiMessage::NoteOn { key, .. } => out.push((tick, key.as_int(), NoteKind::On)),
                MidiMessage::NoteOff { key, .. } => out.push((tick, key.as_int(), NoteKind::Off)),
                _ => {}
            }
        }
    }
    out
}

#[test]
fn parses_as_format_one_with_division_1024() {
    let tracks = build_tracks(&[TrackNote::new(1, 60, 480), TrackNote::new(2, 67, 480)]).unwrap();
    let bytes = encode_smf(&tracks, &SmfConfig::default()).unwrap();

    let smf = Smf::parse(&bytes).unwrap();
    assert_eq!(smf.header.format, Format::Parallel);
    assert_eq!(smf.header.timing, Timing::Metrical(1024.into()));
    assert_eq!(smf.tracks.len(), 2);
}

#[test]
fn each_track_starts_with_program_change_and_ends_cleanly() {
    let tracks = build_tracks(&[TrackNote::new(1, 60, 100)]).unwrap();
    let bytes = encode_smf(&tracks, &SmfConfig::default()).unwrap();
    let smf = Smf::parse(&bytes).unwrap();

    let track = &smf.tracks[0];
    match track[0].kind {
        TrackEventKind::Midi {
            channel,
            message: MidiMessage::ProgramChange { program },
        } => {
            assert_eq!(channel.as_int(), 0);
            assert_eq!(program.as_int(), 0);
        }
        other => panic!("expected program change, got {other:?}"),
    }
    assert_eq!(track[0].delta.as_int(), 0);
    assert!(matches!(
        track.last().unwrap().kind,
        TrackEventKind::Meta(MetaMessage::EndOfTrack)
    ));
}

#[test]
fn absolute_ticks_survive_round_trip() {
    let notes = [
        TrackNote::new(1, 62, 120),
        TrackNote::new(1, 60, 120),
        TrackNote::new(1, 59, 20_000),
        TrackNote::new(1, 60, 3_000_000),
        TrackNote::new(4, 48, 1),
    ];
    let tracks = build_tracks(&notes).unwrap();
    let bytes = encode_smf(&tracks, &SmfConfig::default()).unwrap();
    let smf = Smf::parse(&bytes).unwrap();

    assert_eq!(
        notes_of(&smf.tracks[0]),
        vec![
            (0, 62, NoteKind::On),
            (120, 62, NoteKind::Off),
            (120, 60, NoteKind::On),
            (240, 60, NoteKind::Off),
            (240, 59, NoteKind::On),
            (20_240, 59, NoteKind::Off),
            (20_240, 60, NoteKind::On),
            (3_020_240, 60, NoteKind::Off),
        ]
    );
    assert_eq!(
        notes_of(&smf.tracks[1]),
        vec![(0, 48, NoteKind::On), (1, 48, NoteKind::Off)]
    );
}

#[test]
fn no_same_tick_overlap_for_repeated_key() {
    // A repeated key: the release of the first must precede the second onset.
    let tracks = build_tracks(&[TrackNote::new(1, 60, 50), TrackNote::new(1, 60, 50)]).unwrap();
    let bytes = encode_smf(&tracks, &SmfConfig::default()).unwrap();
    let smf = Smf::parse(&bytes).unwrap();

    let notes = notes_of(&smf.tracks[0]);
    let mut sounding = 0i32;
    for &(_, _, kind) in &notes {
        sounding += if kind == NoteKind::On { 1 } else { -1 };
        assert!(sounding <= 1, "overlapping notes in {notes:?}");
    }
    assert_eq!(sounding, 0);
}
