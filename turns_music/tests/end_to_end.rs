// End-to-end: melody in, Standard MIDI File out, parsed back with midly.
//
// Covers the full pipeline (pitch names -> partition -> expansion -> track
// building -> encoding) and the `turns` binary itself.

use std::process::Command;

use midly::{MidiMessage, Smf, TrackEventKind};
use turns_music::{
    Meter, ScoreNote, Treatment, VARIANTS, VariantUsage, expand_notes, partition, render_midi,
};
use turns_smf::SmfConfig;

/// (absolute tick, key, is_on) for every note event in a parsed track.
fn note_events(track: &[midly::TrackEvent]) -> Vec<(u32, u8, bool)> {
    let mut tick = 0;
    let mut out = Vec::new();
    for event in track {
        tick += event.delta.as_int();
        if let TrackEventKind::Midi { message, .. } = event.kind {
            match message {
                MidiMessage::NoteOn { key, .. } => out.push((tick, key.as_int(), true)),
                MidiMessage::NoteOff { key, .. } => out.push((tick, key.as_int(), false)),
                _ => {}
            }
        }
    }
    out
}

#[test]
fn turn_on_middle_c_renders_four_notes() {
    let notes: Vec<ScoreNote> = vec!["1:C4:480:Turn".parse().unwrap()];
    let (bytes, usage) = render_midi(&notes, Meter::Duple, &SmfConfig::default()).unwrap();
    assert_eq!(usage.count("Turn"), 1);

    let smf = Smf::parse(&bytes).unwrap();
    assert_eq!(smf.tracks.len(), 1);
    assert_eq!(
        note_events(&smf.tracks[0]),
        vec![
            (0, 62, true),
            (120, 62, false),
            (120, 60, true),
            (240, 60, false),
            (240, 59, true),
            (360, 59, false),
            (360, 60, true),
            (480, 60, false),
        ]
    );
}

#[test]
fn ornamented_track_keeps_its_length() {
    // The ornament must not shift anything after it on the same track.
    let notes = [
        ScoreNote::ornamented(1, 64, 1001, "FBTurnSF"),
        ScoreNote::plain(1, 67, 512),
        ScoreNote::plain(2, 48, 1513),
    ];
    let (bytes, _) = render_midi(&notes, Meter::Triple, &SmfConfig::default()).unwrap();
    let smf = Smf::parse(&bytes).unwrap();

    let melody = note_events(&smf.tracks[0]);
    assert_eq!(melody[melody.len() - 2], (1001, 67, true));
    assert_eq!(melody[melody.len() - 1], (1513, 67, false));

    let bass = note_events(&smf.tracks[1]);
    assert_eq!(bass, vec![(0, 48, true), (1513, 48, false)]);
}

#[test]
fn every_variant_renders_in_both_meters() {
    for variant in &VARIANTS {
        for meter in [Meter::Duple, Meter::Triple] {
            let notes = [ScoreNote::ornamented(1, 60, 960, variant.id)];
            let (bytes, _) = render_midi(&notes, meter, &SmfConfig::default()).unwrap();
            let smf = Smf::parse(&bytes).unwrap();

            let events = note_events(&smf.tracks[0]);
            let expected = partition(60, 960, meter, variant.id).unwrap();
            assert_eq!(events.len(), expected.len() * 2, "{} {meter}", variant.id);
            assert_eq!(events.last().unwrap().0, 960, "{} {meter}", variant.id);
        }
    }
}

#[test]
fn usage_tally_over_a_session() {
    let mut usage = VariantUsage::new();
    let melody: Vec<ScoreNote> = ["1:C4:480:Turn", "1:D4:480:ORIGINAL", "1:E4:480:TT", "1:F4:480"]
        .iter()
        .map(|s| s.parse().unwrap())
        .collect();
    assert_eq!(melody[3].treatment, Treatment::Plain);

    let out = expand_notes(&melody, Meter::Duple, &mut usage).unwrap();
    assert_eq!(out.len(), 4 + 1 + 6 + 1);
    assert_eq!(usage.eligible(), 3);
    assert_eq!(usage.ornamented(), 2);
    assert!((usage.percentage() - 66.666).abs() < 0.01);
}

#[test]
fn cli_renders_and_inspects() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("melody.mid");

    let status = Command::new(env!("CARGO_BIN_EXE_turns"))
        .args(["render", "--meter", "triple", "-o"])
        .arg(&out)
        .args(["1:C4:480:Turn", "1:62:240", "2:G3:720:ORIGINAL"])
        .status()
        .unwrap();
    assert!(status.success());

    let bytes = std::fs::read(&out).unwrap();
    let smf = Smf::parse(&bytes).unwrap();
    assert_eq!(smf.tracks.len(), 2);

    let inspect = Command::new(env!("CARGO_BIN_EXE_turns"))
        .arg("inspect")
        .arg(&out)
        .output()
        .unwrap();
    assert!(inspect.status.success());
    let text = String::from_utf8(inspect.stdout).unwrap();
    assert!(text.contains("note-on  D4"), "{text}");
    assert!(text.contains("end of track"));
}

#[test]
fn cli_rejects_unknown_variant() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("bad.mid");

    let output = Command::new(env!("CARGO_BIN_EXE_turns"))
        .args(["render", "-o"])
        .arg(&out)
        .arg("1:C4:480:NotAVariant")
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("NotAVariant"));
    assert!(!out.exists());
}

#[test]
fn cli_lists_variants_as_json() {
    let output = Command::new(env!("CARGO_BIN_EXE_turns"))
        .args(["variants", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let listed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(listed.as_array().unwrap().len(), VARIANTS.len());
}
