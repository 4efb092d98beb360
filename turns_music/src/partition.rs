// Ornament partitioning.
//
// Expands one principal note into the sequence of (pitch, duration) events
// that make up a turn. The variant's shape picks a slicing function and the
// variant's offsets pick the auxiliary pitches; the meter picks between the
// duple and triple version of the slicing.
//
// All arithmetic is integer tick division. Whatever the divisions leave over
// is folded into the final event, so the durations always sum to exactly the
// input duration. Short notes can therefore produce zero-length leading
// segments (e.g. a 3-tick Basic turn is 0, 0, 0, 3); they are returned as-is
// and it is up to the caller to decide what to do with them.
//
// The slicing is a 12-entry table, one function per (shape, meter). Several
// shapes have identical duple and triple arithmetic and some do not:
// FrontBack and BetweenNotes differ between meters, and FrontBack in triple
// meter ends on the upper auxiliary rather than the principal and never
// visits the under-lower note. The identical pairs are still separate table
// entries so either meter can be changed on its own.

use crate::catalog::{self, Shape, Variant};
use crate::error::{Result, TurnError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Meter {
    Duple,
    Triple,
}

impl FromStr for Meter {
    type Err = TurnError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "duple" => Ok(Meter::Duple),
            "triple" => Ok(Meter::Triple),
            _ => Err(TurnError::InvalidMeter(s.to_string())),
        }
    }
}

impl fmt::Display for Meter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Meter::Duple => f.write_str("duple"),
            Meter::Triple => f.write_str("triple"),
        }
    }
}

/// One note of an expanded ornament.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct OrnamentEvent {
    pub pitch: i32,
    pub duration: u32,
}

impl From<(i32, u32)> for OrnamentEvent {
    fn from((pitch, duration): (i32, u32)) -> Self {
        OrnamentEvent { pitch, duration }
    }
}

/// Absolute pitches for one application of a variant.
#[derive(Clone, Copy, Debug)]
struct Voicing {
    principal: i32,
    upper: i32,
    lower: i32,
    under_lower: i32,
}

impl Voicing {
    fn new(principal: i32, variant: &Variant) -> Result<Self> {
        let offset = |delta: i32| {
            principal
                .checked_add(delta)
                .ok_or(TurnError::PitchOutOfRange(principal))
        };
        Ok(Voicing {
            principal,
            upper: offset(variant.upper)?,
            lower: offset(variant.lower)?,
            under_lower: offset(variant.under_lower.unwrap_or(variant.lower))?,
        })
    }
}

/// Accumulates fixed-size segments and closes with the remainder.
struct Segments {
    total: u32,
    used: u32,
    events: Vec<OrnamentEvent>,
}

impl Segments {
    fn new(total: u32) -> Self {
        Segments {
            total,
            used: 0,
            events: Vec::with_capacity(6),
        }
    }

    fn push(mut self, pitch: i32, duration: u32) -> Self {
        self.used += duration;
        self.events.push(OrnamentEvent { pitch, duration });
        self
    }

    /// Append the final event with whatever duration is left.
    fn finish(mut self, pitch: i32) -> Vec<OrnamentEvent> {
        debug_assert!(self.used <= self.total);
        self.events.push(OrnamentEvent {
            pitch,
            duration: self.total - self.used,
        });
        self.events
    }
}

/// `duration * num / den` without intermediate overflow.
fn fraction(duration: u32, num: u64, den: u64) -> u32 {
    // num <= den at every call site, so the result fits back into u32.
    (u64::from(duration) * num / den) as u32
}

type PartitionFn = fn(&Voicing, u32) -> Vec<OrnamentEvent>;

fn partition_fn(shape: Shape, meter: Meter) -> PartitionFn {
    match (shape, meter) {
        (Shape::Basic, Meter::Duple) => basic_duple,
        (Shape::Basic, Meter::Triple) => basic_triple,
        (Shape::FrontBack, Meter::Duple) => front_back_duple,
        (Shape::FrontBack, Meter::Triple) => front_back_triple,
        (Shape::BetweenNotes, Meter::Duple) => between_duple,
        (Shape::BetweenNotes, Meter::Triple) => between_triple,
        (Shape::Trilled, Meter::Duple) => trilled_duple,
        (Shape::Trilled, Meter::Triple) => trilled_triple,
        (Shape::P32, Meter::Duple) => p32_duple,
        (Shape::P32, Meter::Triple) => p32_triple,
        (Shape::Snapped, Meter::Duple) => snapped_duple,
        (Shape::Snapped, Meter::Triple) => snapped_triple,
    }
}

fn basic_duple(v: &Voicing, d: u32) -> Vec<OrnamentEvent> {
    let s = d / 4;
    Segments::new(d)
        .push(v.upper, s)
        .push(v.principal, s)
        .push(v.lower, s)
        .finish(v.principal)
}

fn basic_triple(v: &Voicing, d: u32) -> Vec<OrnamentEvent> {
    let s = d / 4;
    Segments::new(d)
        .push(v.upper, s)
        .push(v.principal, s)
        .push(v.lower, s)
        .finish(v.principal)
}

fn front_back_duple(v: &Voicing, d: u32) -> Vec<OrnamentEvent> {
    let s = d / 8;
    Segments::new(d)
        .push(v.upper, s)
        .push(v.principal, s)
        .push(v.lower, s)
        .push(v.under_lower, s)
        .push(v.lower, s)
        .finish(v.principal)
}

fn front_back_triple(v: &Voicing, d: u32) -> Vec<OrnamentEvent> {
    let s = d / 5;
    Segments::new(d)
        .push(v.upper, s)
        .push(v.principal, s)
        .push(v.lower, s)
        .push(v.principal, s)
        .finish(v.upper)
}

fn between_duple(v: &Voicing, d: u32) -> Vec<OrnamentEvent> {
    let s = d / 8;
    Segments::new(d)
        .push(v.principal, d / 2)
        .push(v.upper, s)
        .push(v.principal, s)
        .push(v.lower, s)
        .finish(v.principal)
}

fn between_triple(v: &Voicing, d: u32) -> Vec<OrnamentEvent> {
    let s = d / 8;
    let q = d / 4;
    Segments::new(d)
        .push(v.principal, s)
        .push(v.upper, q)
        .push(v.principal, q)
        .push(v.lower, q)
        .finish(v.principal)
}

fn trilled_duple(v: &Voicing, d: u32) -> Vec<OrnamentEvent> {
    let s = d / 8;
    Segments::new(d)
        .push(v.upper, s)
        .push(v.principal, s)
        .push(v.upper, s)
        .push(v.principal, s)
        .push(v.lower, s)
        .finish(v.principal)
}

fn trilled_triple(v: &Voicing, d: u32) -> Vec<OrnamentEvent> {
    let s = d / 8;
    Segments::new(d)
        .push(v.upper, s)
        .push(v.principal, s)
        .push(v.upper, s)
        .push(v.principal, s)
        .push(v.lower, s)
        .finish(v.principal)
}

fn p32_duple(v: &Voicing, d: u32) -> Vec<OrnamentEvent> {
    let long = fraction(d, 3, 8);
    let s = d / 8;
    Segments::new(d)
        .push(v.upper, long)
        .push(v.principal, s)
        .push(v.lower, s)
        .finish(v.principal)
}

fn p32_triple(v: &Voicing, d: u32) -> Vec<OrnamentEvent> {
    let long = fraction(d, 3, 8);
    let s = d / 8;
    Segments::new(d)
        .push(v.upper, long)
        .push(v.principal, s)
        .push(v.lower, s)
        .finish(v.principal)
}

fn snapped_duple(v: &Voicing, d: u32) -> Vec<OrnamentEvent> {
    let s = d / 6;
    Segments::new(d)
        .push(v.upper, s)
        .push(v.principal, s)
        .push(v.lower, s)
        .finish(v.principal)
}

fn snapped_triple(v: &Voicing, d: u32) -> Vec<OrnamentEvent> {
    let s = d / 6;
    Segments::new(d)
        .push(v.upper, s)
        .push(v.principal, s)
        .push(v.lower, s)
        .finish(v.principal)
}

/// Expand `principal` held for `duration` ticks using an already-resolved
/// variant.
pub fn partition_variant(
    principal: i32,
    duration: u32,
    meter: Meter,
    variant: &Variant,
) -> Result<Vec<OrnamentEvent>> {
    if duration == 0 {
        return Err(TurnError::InvalidDuration);
    }
    let voicing = Voicing::new(principal, variant)?;
    Ok(partition_fn(variant.shape, meter)(&voicing, duration))
}

/// Expand `principal` held for `duration` ticks into the named turn variant.
///
/// Pure: the same arguments always produce the same events. Fails with
/// `InvalidDuration` for a zero duration, `UnknownVariant` for an
/// identifier not in the catalog, and `PitchOutOfRange` when an auxiliary
/// pitch would leave the `i32` range.
pub fn partition(
    principal: i32,
    duration: u32,
    meter: Meter,
    variant_id: &str,
) -> Result<Vec<OrnamentEvent>> {
    if duration == 0 {
        return Err(TurnError::InvalidDuration);
    }
    let variant = catalog::lookup(variant_id)?;
    partition_variant(principal, duration, meter, variant)
}
