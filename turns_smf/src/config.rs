// Encoder configuration.
//
// `SmfConfig` holds the handful of constants that end up in the output
// bytes: the header division, the channel every event is sent on, the
// program selected by the setup event at the start of each track, and the
// note-on / note-off velocities. `SmfConfig::default()` is the canonical
// format (division 1024, piano on channel 0, velocity 100 on / 0 off), and
// the byte-exact tests in `writer.rs` are written against it.
//
// Configs can be loaded from JSON so the `turns` binary can retarget the
// output without recompiling. Missing fields fall back to the defaults.

use crate::error::{Result, SmfError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Ticks per quarter note written to the header by default.
pub const DEFAULT_DIVISION: u16 = 1024;

/// Velocity used for every note-on by default.
pub const DEFAULT_NOTE_ON_VELOCITY: u8 = 100;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmfConfig {
    /// Ticks per quarter note. Must be nonzero and below 0x8000 (the high
    /// bit would switch the header to SMPTE timing).
    pub division: u16,
    /// MIDI channel, 0-15.
    pub channel: u8,
    /// Program number for the setup event at tick 0 of each track.
    pub program: u8,
    pub note_on_velocity: u8,
    pub note_off_velocity: u8,
}

impl Default for SmfConfig {
    fn default() -> Self {
        SmfConfig {
            division: DEFAULT_DIVISION,
            channel: 0,
            program: 0,
            note_on_velocity: DEFAULT_NOTE_ON_VELOCITY,
            note_off_velocity: 0,
        }
    }
}

impl SmfConfig {
    /// Load a config from a JSON file and validate it.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let config: SmfConfig = serde_json::from_str(&data)?;
        config.validate()?;
        log::debug!("loaded encoder config from {}: {config:?}", path.display());
        Ok(config)
    }

    /// Check that every field fits the bit width it is written with.
    pub fn validate(&self) -> Result<()> {
        if self.division == 0 || self.division & 0x8000 != 0 {
            return Err(SmfError::InvalidConfig(format!(
                "division {} must be in 1..=32767",
                self.division
            )));
        }
        if self.channel > 15 {
            return Err(SmfError::InvalidConfig(format!(
                "channel {} must be in 0..=15",
                self.channel
            )));
        }
        for (name, value) in [
            ("program", self.program),
            ("note_on_velocity", self.note_on_velocity),
            ("note_off_velocity", self.note_off_velocity),
        ] {
            if value > 127 {
                return Err(SmfError::InvalidConfig(format!(
                    "{name} {value} must be in 0..=127"
                )));
            }
        }
        Ok(())
    }
}
