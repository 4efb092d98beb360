// The turn variant catalog.
//
// Every named ornament is one row in `VARIANTS`: an identifier, the shape
// family that decides how the duration is sliced (see `partition.rs`), and
// the semitone offsets of the auxiliary notes relative to the principal.
// The table is plain static data. Nothing mutates it, so concurrent lookups
// need no synchronization.
//
// Offsets are signed semitones: `upper` is added for the upper auxiliary,
// `lower` for the lower auxiliary. `under_lower` only exists for the
// front-and-back family, whose duple form dips to a second, deeper note
// below the lower auxiliary; its distance varies per row.
//
// Identifiers are opaque names. The offsets in the table are authoritative,
// not anything the name suggests. Several rows share offsets under
// different names; they stay distinct because callers select by name.

use crate::error::{Result, TurnError};
use serde::Serialize;
use std::fmt;

/// How a variant slices the principal note's duration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Shape {
    /// Upper, principal, lower, principal in equal quarters.
    Basic,
    /// Upper, principal, lower, under-lower, lower, principal (duple) or a
    /// five-way split ending on the upper auxiliary (triple).
    FrontBack,
    /// A held principal, then the turn figure.
    BetweenNotes,
    /// Upper/principal repeated before the lower auxiliary.
    Trilled,
    /// A long upper auxiliary (3/8) followed by short notes.
    P32,
    /// Four notes in sixths, the last holding the remainder.
    Snapped,
}

impl Shape {
    pub const ALL: [Shape; 6] = [
        Shape::Basic,
        Shape::FrontBack,
        Shape::BetweenNotes,
        Shape::Trilled,
        Shape::P32,
        Shape::Snapped,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Shape::Basic => "basic",
            Shape::FrontBack => "front-back",
            Shape::BetweenNotes => "between-notes",
            Shape::Trilled => "trilled",
            Shape::P32 => "p32",
            Shape::Snapped => "snapped",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One catalog row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Variant {
    pub id: &'static str,
    pub shape: Shape,
    /// Semitones from the principal to the upper auxiliary.
    pub upper: i32,
    /// Semitones from the principal to the lower auxiliary.
    pub lower: i32,
    /// Semitones from the principal to the under-lower auxiliary
    /// (front-and-back family only).
    pub under_lower: Option<i32>,
    pub description: &'static str,
}

const fn variant(
    id: &'static str,
    shape: Shape,
    upper: i32,
    lower: i32,
    description: &'static str,
) -> Variant {
    Variant {
        id,
        shape,
        upper,
        lower,
        under_lower: None,
        description,
    }
}

const fn front_back(
    id: &'static str,
    upper: i32,
    lower: i32,
    under_lower: i32,
    description: &'static str,
) -> Variant {
    Variant {
        id,
        shape: Shape::FrontBack,
        upper,
        lower,
        under_lower: Some(under_lower),
        description,
    }
}

use Shape::{Basic, BetweenNotes, P32, Snapped, Trilled};

/// Every known variant, in presentation order.
pub static VARIANTS: [Variant; 55] = [
    // Basic
    variant("Turn", Basic, 2, -1, "Whole step above, principal note, half step below"),
    variant("FTurnF", Basic, 1, -2, "Half step above, principal note, whole step below"),
    variant("FTurnS", Basic, 2, -2, "Whole step above, principal note, whole step below"),
    variant("BTurnF", Basic, 2, -1, "Whole step above, principal note, half step below"),
    variant("BTurnS", Basic, 2, -2, "Whole step above, principal note, whole step below"),
    // Front and back
    front_back("FBTurnF", 1, -1, -4, "Half step above, principal, half step below"),
    front_back("FBTurnS", 1, -2, -4, "Half step above, principal, whole step below"),
    front_back("FBTurnFF", 1, -1, -3, "Front/back - half step above/below"),
    front_back("FBTurnSS", 2, -2, -4, "Front/back - whole step above/below"),
    front_back("FBTurnFS", 1, -2, -4, "Front half step, back whole step"),
    front_back("FBTurnSF", 2, -1, -4, "Front whole step, back half step"),
    // Between notes
    variant("BNT", BetweenNotes, 2, -1, "Between notes - regular turn"),
    variant("BNFTurnF", BetweenNotes, 1, -1, "Between notes - half step above/below"),
    variant("BNFTurnS", BetweenNotes, 2, -2, "Between notes - whole step above/below"),
    variant("BNBTurn", BetweenNotes, 1, -2, "Between notes - whole step variant"),
    variant("BNBTurnS", BetweenNotes, 1, -3, "Between notes - whole step variant 2"),
    variant("BNFBTurnF", BetweenNotes, 3, -1, "Between notes - front/back half step"),
    variant("BNFBTurnS", BetweenNotes, 3, -2, "Between notes - front/back whole step"),
    variant("BNFBTurnFF", BetweenNotes, 2, -3, "Between notes - front/back half steps"),
    variant("BNFBTurnSS", BetweenNotes, 4, -2, "Between notes - front/back whole steps"),
    variant("BNFBTurnFS", BetweenNotes, 2, -4, "Between notes - front half, back whole"),
    variant("BNFBTurnSF", BetweenNotes, 3, -3, "Between notes - front whole, back half"),
    // Trilled
    variant("TT", Trilled, 2, -1, "Trilled regular turn"),
    variant("TFTurnF", Trilled, 1, -2, "Trilled half step above, whole step below"),
    variant("TFTurnS", Trilled, 2, -2, "Trilled whole step above/below"),
    variant("TBTurnF", Trilled, 2, -1, "Trilled whole step above, half step below"),
    variant("TBTurnS", Trilled, 2, -2, "Trilled whole step above/below"),
    variant("TFBTurnF", Trilled, 1, -1, "Trilled front/back half step"),
    variant("TFBTurnS", Trilled, 1, -2, "Trilled front/back whole step"),
    variant("TFBTurnFF", Trilled, 1, -1, "Trilled front/back half steps"),
    variant("TFBTurnSS", Trilled, 2, -2, "Trilled front/back whole steps"),
    variant("TFBTurnFS", Trilled, 1, -2, "Trilled front half, back whole"),
    variant("TFBTurnSF", Trilled, 2, -1, "Trilled front whole, back half"),
    // P32
    variant("P32T", P32, 2, -1, "P32 regular turn"),
    variant("P32FTurnF", P32, 1, -2, "P32 half step above, whole step below"),
    variant("P32FTurnS", P32, 2, -2, "P32 whole step above/below"),
    variant("P32BTurnF", P32, 2, -1, "P32 whole step above, half step below"),
    variant("P32BTurnS", P32, 2, -2, "P32 whole step above/below"),
    variant("P32FBTurnF", P32, 1, -1, "P32 front/back half step"),
    variant("P32FBTurnS", P32, 1, -2, "P32 front/back whole step"),
    variant("P32FBTurnFF", P32, 1, -1, "P32 front/back half steps"),
    variant("P32FBTurnSS", P32, 2, -2, "P32 front/back whole steps"),
    variant("P32FBTurnFS", P32, 1, -2, "P32 front half, back whole"),
    variant("P32FBTurnSF", P32, 2, -1, "P32 front whole, back half"),
    // Snapped
    variant("ST", Snapped, 2, -1, "Snapped regular turn"),
    variant("SFTurnF", Snapped, 1, -2, "Snapped half step above, whole step below"),
    variant("SFTurnS", Snapped, 2, -2, "Snapped whole step above/below"),
    variant("SBTurnF", Snapped, 2, -1, "Snapped whole step above, half step below"),
    variant("SBTurnS", Snapped, 2, -2, "Snapped whole step above/below"),
    variant("SFBTurnF", Snapped, 1, -1, "Snapped front/back half step"),
    variant("SFBTurnS", Snapped, 1, -2, "Snapped front/back whole step"),
    variant("SFBTurnFF", Snapped, 1, -1, "Snapped front/back half steps"),
    variant("SFBTurnSS", Snapped, 2, -2, "Snapped front/back whole steps"),
    variant("SFBTurnFS", Snapped, 1, -2, "Snapped front half, back whole"),
    variant("SFBTurnSF", Snapped, 2, -1, "Snapped front whole, back half"),
];

/// Look up a variant by its exact (case-sensitive) identifier.
pub fn lookup(id: &str) -> Result<&'static Variant> {
    VARIANTS
        .iter()
        .find(|v| v.id == id)
        .ok_or_else(|| TurnError::UnknownVariant(id.to_string()))
}

/// All variants of one shape, in catalog order.
pub fn variants_of(shape: Shape) -> impl Iterator<Item = &'static Variant> {
    VARIANTS.iter().filter(move |v| v.shape == shape)
}
