// Standard MIDI File encoding.
//
// Serializes a `TrackMap` into a Format 1 (multi-track, shared timebase)
// SMF:
//
//   MThd | len=6 | format=1 | track count | division
//   MTrk | len   | body                          (once per track, ascending id)
//
// Each track body is: a program-change setup event at delta 0, then one
// (delta VLQ, 3-byte note command) pair per event in `(tick, Off-before-On)`
// order, then the end-of-track meta event `00 FF 2F 00`.
//
// Two sink flavours:
// - `write_smf` needs `Write + Seek`. It writes a zero length placeholder
//   after each `MTrk` tag, streams the body, then seeks back and patches the
//   real length in place.
// - `write_smf_buffered` only needs `Write`. It assembles the whole file in
//   memory and commits it with a single `write_all`, for sinks that cannot
//   seek (pipes, sockets).
// Both produce identical bytes.
//
// Before anything is written, every track is sorted and its body length is
// computed from the event list. Oversized tracks, unencodable deltas, and
// bad keys are reported at that point, so a failing call never leaves a
// half-written file behind (I/O errors aside).

use crate::config::SmfConfig;
use crate::error::{Result, SmfError};
use crate::track::{NoteKind, TimedEvent, TrackMap};
use crate::vlq::{vlq_len, write_vlq};
use std::io::{Cursor, Seek, SeekFrom, Write};
use std::path::Path;

pub const HEADER_TAG: &[u8; 4] = b"MThd";
pub const TRACK_TAG: &[u8; 4] = b"MTrk";

/// Length of the MThd chunk body.
const HEADER_LEN: u32 = 6;

/// Format 1: several tracks played simultaneously.
const FORMAT_PARALLEL: u16 = 1;

/// Delta 0, meta event 0x2F, length 0.
pub const END_OF_TRACK: [u8; 4] = [0x00, 0xFF, 0x2F, 0x00];

const NOTE_OFF: u8 = 0x80;
const NOTE_ON: u8 = 0x90;
const PROGRAM_CHANGE: u8 = 0xC0;

/// Bytes taken by the setup event: delta 0, status, program.
const SETUP_LEN: u64 = 3;

/// A track that passed validation: events in output order plus the exact
/// body length they will encode to.
struct PreparedTrack {
    id: u16,
    events: Vec<TimedEvent>,
    body_len: u32,
}

/// Convert a measured body length into the 4-byte chunk length field.
pub fn checked_chunk_len(track: u16, len: u64) -> Result<u32> {
    u32::try_from(len).map_err(|_| SmfError::TrackTooLarge { track, len })
}

/// Sort and size every track. Returns the header track count alongside.
fn prepare(tracks: &TrackMap) -> Result<(u16, Vec<PreparedTrack>)> {
    let count = u16::try_from(tracks.len()).map_err(|_| SmfError::TooManyTracks(tracks.len()))?;

    let mut prepared = Vec::with_capacity(tracks.len());
    for (&id, events) in tracks {
        let mut events = events.clone();
        // Stable, so same-tick same-kind events keep their input order.
        events.sort_by_key(TimedEvent::order_key);

        let mut len = SETUP_LEN + END_OF_TRACK.len() as u64;
        let mut prev_tick = 0u32;
        for event in &events {
            if event.key > 127 {
                return Err(SmfError::KeyOutOfRange(event.key));
            }
            len += vlq_len(event.tick - prev_tick)? as u64 + 3;
            prev_tick = event.tick;
        }

        let body_len = checked_chunk_len(id, len)?;
        prepared.push(PreparedTrack {
            id,
            events,
            body_len,
        });
    }
    Ok((count, prepared))
}

fn write_header<W: Write>(writer: &mut W, track_count: u16, config: &SmfConfig) -> Result<()> {
    writer.write_all(HEADER_TAG)?;
    writer.write_all(&HEADER_LEN.to_be_bytes())?;
    writer.write_all(&FORMAT_PARALLEL.to_be_bytes())?;
    writer.write_all(&track_count.to_be_bytes())?;
    writer.write_all(&config.division.to_be_bytes())?;
    Ok(())
}

/// Write one track body (everything after the length field).
fn write_body<W: Write>(writer: &mut W, track: &PreparedTrack, config: &SmfConfig) -> Result<()> {
    let channel = config.channel & 0x0F;
    writer.write_all(&[0x00, PROGRAM_CHANGE | channel, config.program])?;

    let mut prev_tick = 0u32;
    for event in &track.events {
        write_vlq(writer, event.tick - prev_tick)?;
        prev_tick = event.tick;

        let command = match event.kind {
            NoteKind::On => [NOTE_ON | channel, event.key, config.note_on_velocity],
            NoteKind::Off => [NOTE_OFF | channel, event.key, config.note_off_velocity],
        };
        writer.write_all(&command)?;
    }

    writer.write_all(&END_OF_TRACK)?;
    Ok(())
}

/// Encode `tracks` into a seekable sink, patching each track length in place.
pub fn write_smf<W: Write + Seek>(
    sink: &mut W,
    tracks: &TrackMap,
    config: &SmfConfig,
) -> Result<()> {
    config.validate()?;
    let (count, prepared) = prepare(tracks)?;
    if count == 0 {
        log::warn!("encoding a file with no tracks");
    }

    write_header(sink, count, config)?;
    for track in &prepared {
        sink.write_all(TRACK_TAG)?;
        let len_pos = sink.stream_position()?;
        sink.write_all(&[0u8; 4])?;
        let body_start = sink.stream_position()?;

        write_body(sink, track, config)?;

        let body_end = sink.stream_position()?;
        let len = checked_chunk_len(track.id, body_end - body_start)?;
        debug_assert_eq!(len, track.body_len);
        sink.seek(SeekFrom::Start(len_pos))?;
        sink.write_all(&len.to_be_bytes())?;
        sink.seek(SeekFrom::Start(body_end))?;

        log::debug!(
            "track {}: {} events, {} body bytes",
            track.id,
            track.events.len(),
            len
        );
    }
    sink.flush()?;
    Ok(())
}

/// Encode `tracks` into an append-only sink. The file is assembled in memory
/// and handed to the sink in one write.
pub fn write_smf_buffered<W: Write>(
    sink: &mut W,
    tracks: &TrackMap,
    config: &SmfConfig,
) -> Result<()> {
    config.validate()?;
    let (count, prepared) = prepare(tracks)?;

    let total: usize = 14 + prepared.iter().map(|t| 8 + t.body_len as usize).sum::<usize>();
    let mut out = Vec::with_capacity(total);
    write_header(&mut out, count, config)?;

    let mut body = Vec::new();
    for track in &prepared {
        body.clear();
        write_body(&mut body, track, config)?;
        let len = checked_chunk_len(track.id, body.len() as u64)?;
        out.extend_from_slice(TRACK_TAG);
        out.extend_from_slice(&len.to_be_bytes());
        out.extend_from_slice(&body);
    }

    sink.write_all(&out)?;
    sink.flush()?;
    Ok(())
}

/// Encode `tracks` into a fresh byte vector.
pub fn encode_smf(tracks: &TrackMap, config: &SmfConfig) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    write_smf(&mut cursor, tracks, config)?;
    Ok(cursor.into_inner())
}

/// Encode `tracks` and write them to `path`.
///
/// The file is only created once encoding has succeeded, so an encode error
/// leaves any existing file at `path` untouched.
pub fn write_smf_file(path: &Path, tracks: &TrackMap, config: &SmfConfig) -> Result<()> {
    let bytes = encode_smf(tracks, config)?;
    std::fs::write(path, &bytes)?;
    log::info!(
        "wrote {} tracks ({} bytes) to {}",
        tracks.len(),
        bytes.len(),
        path.display()
    );
    Ok(())
}
