// Turns CLI entry point.
//
// Expands a melody given on the command line into turn ornaments and writes
// a Standard MIDI File, lists the variant catalog, or dumps an existing MIDI
// file for inspection.
//
// Usage:
//   turns render [--meter duple|triple] [--config smf.json] [-o out.mid] NOTE...
//       NOTE is TRACK:PITCH:DURATION[:VARIANT], e.g. 1:C4:480:Turn.
//       PITCH is a note name (C4, F#3) or a number (60). VARIANT is a catalog
//       id, or ORIGINAL for an eligible note left as written; omit it for a
//       plain note.
//   turns variants [--json]
//   turns inspect FILE.mid
//
// Logging goes through env_logger; set RUST_LOG=debug to see expansion and
// encoding detail.

use std::path::{Path, PathBuf};
use std::process;

use midly::{MetaMessage, MidiMessage, Smf, TrackEventKind};
use turns_music::catalog::variants_of;
use turns_music::{
    Meter, Result, ScoreNote, Shape, TurnError, VARIANTS, VariantUsage, pitch_name,
    render_midi_file,
};
use turns_smf::SmfConfig;

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let result = match args.first().map(String::as_str) {
        Some("render") => run_render(&args[1..]),
        Some("variants") => run_variants(&args[1..]),
        Some("inspect") => run_inspect(&args[1..]),
        _ => {
            print_usage();
            process::exit(2);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  turns render [--meter duple|triple] [--config smf.json] [-o out.mid] NOTE...");
    eprintln!("  turns variants [--json]");
    eprintln!("  turns inspect FILE.mid");
}

struct RenderArgs {
    meter: Meter,
    config: Option<PathBuf>,
    output: PathBuf,
    notes: Vec<ScoreNote>,
}

/// Parse `render` arguments. Missing flag values exit immediately, the same
/// way unknown subcommands do.
fn parse_render_args(args: &[String]) -> Result<RenderArgs> {
    let mut parsed = RenderArgs {
        meter: Meter::Duple,
        config: None,
        output: PathBuf::from("turns.mid"),
        notes: Vec::new(),
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--meter" => {
                i += 1;
                parsed.meter = require_value(args, i, "--meter").parse()?;
            }
            "--config" => {
                i += 1;
                parsed.config = Some(PathBuf::from(require_value(args, i, "--config")));
            }
            "-o" | "--output" => {
                i += 1;
                parsed.output = PathBuf::from(require_value(args, i, "--output"));
            }
            note => parsed.notes.push(note.parse()?),
        }
        i += 1;
    }
    Ok(parsed)
}

fn require_value<'a>(args: &'a [String], i: usize, flag: &str) -> &'a str {
    match args.get(i) {
        Some(value) => value.as_str(),
        None => {
            eprintln!("{flag} requires a value");
            process::exit(1);
        }
    }
}

fn run_render(args: &[String]) -> Result<()> {
    let parsed = parse_render_args(args)?;
    if parsed.notes.is_empty() {
        print_usage();
        process::exit(2);
    }

    let config = match &parsed.config {
        Some(path) => SmfConfig::load(path)?,
        None => SmfConfig::default(),
    };

    let usage = render_midi_file(&parsed.notes, parsed.meter, &config, &parsed.output)?;

    print_summary(&usage, parsed.notes.len(), parsed.meter, &parsed.output);
    Ok(())
}

fn print_summary(usage: &VariantUsage, note_count: usize, meter: Meter, output: &Path) {
    println!("Transformation statistics ({meter} meter):");
    println!("  Input notes: {note_count}");
    println!("  Eligible notes: {}", usage.eligible());
    println!("  Notes transformed: {}", usage.ornamented());
    println!("  Transformation percentage: {:.1}%", usage.percentage());
    if usage.ornamented() > 0 {
        println!("  Variants used:");
        for (id, count) in usage.iter() {
            println!("    {id}: {count} times");
        }
    }
    println!("Wrote {}", output.display());
}

fn run_variants(args: &[String]) -> Result<()> {
    if args.iter().any(|a| a == "--json") {
        let json = serde_json::to_string_pretty(&VARIANTS[..])?;
        println!("{json}");
        return Ok(());
    }

    for shape in Shape::ALL {
        println!("{shape}:");
        for v in variants_of(shape) {
            let under = v
                .under_lower
                .map(|u| format!(" under {u:+}"))
                .unwrap_or_default();
            println!(
                "  {:<12} upper {:+} lower {:+}{under}  {}",
                v.id, v.upper, v.lower, v.description
            );
        }
    }
    Ok(())
}

fn run_inspect(args: &[String]) -> Result<()> {
    let Some(path) = args.first() else {
        print_usage();
        process::exit(2);
    };

    let data = std::fs::read(path)?;
    let smf = Smf::parse(&data).map_err(|e| TurnError::MidiParse(e.to_string()))?;

    println!(
        "{path}: format {:?}, timing {:?}, {} tracks",
        smf.header.format,
        smf.header.timing,
        smf.tracks.len()
    );
    for (i, track) in smf.tracks.iter().enumerate() {
        println!("Track {i} ({} events):", track.len());
        let mut tick: u64 = 0;
        for event in track {
            tick += u64::from(event.delta.as_int());
            println!("  {tick:>8}  {}", describe(&event.kind));
        }
    }
    Ok(())
}

fn describe(kind: &TrackEventKind) -> String {
    match kind {
        TrackEventKind::Midi { channel, message } => {
            let ch = channel.as_int();
            match message {
                MidiMessage::NoteOn { key, vel } => format!(
                    "ch{ch} note-on  {:<4} vel {}",
                    pitch_name(i32::from(key.as_int())),
                    vel.as_int()
                ),
                MidiMessage::NoteOff { key, vel } => format!(
                    "ch{ch} note-off {:<4} vel {}",
                    pitch_name(i32::from(key.as_int())),
                    vel.as_int()
                ),
                MidiMessage::ProgramChange { program } => {
                    format!("ch{ch} program {}", program.as_int())
                }
                other => format!("ch{ch} {other:?}"),
            }
        }
        TrackEventKind::Meta(MetaMessage::EndOfTrack) => "end of track".to_string(),
        other => format!("{other:?}"),
    }
}
