//! Token and node kinds, and the per-kind child shape table.
//!
//! Every layout kind declares its child slots up front: the expected kind of
//! each slot (which doubles as the kind synthesized when a required slot is
//! cleared) and whether the slot is required. All arity checks and missing-node
//! defaults are driven by this table.

use thiserror::Error;

#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(u16)]
pub enum SyntaxKind {
    LEFT_PAREN,
    RIGHT_PAREN,
    LEFT_BRACE,
    RIGHT_BRACE,
    EQ,
    PLUS,
    SEMICOLON,

    FN_KW,
    LET_KW,
    NAME,

    NUMBER,

    UNKNOWN,
    EOF,

    SOURCE_FILE,
    FN_DECL,
    LET_STMT,
    EXPR_STMT,
    BINARY_EXPR,
    PAREN_EXPR,
    LITERAL,
    NAME_REF,
    ERROR,

    STMT_LIST,
    ARG_LIST,
}

/// One child slot of a fixed-arity layout kind.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Slot {
    /// Expected kind of the child, and the kind synthesized as a missing
    /// placeholder when a required slot is cleared.
    pub default: SyntaxKind,
    /// Required slots can never be absent; clearing them produces a missing
    /// placeholder. Optional slots store a literal absence instead.
    pub required: bool,
}

impl Slot {
    const fn required(default: SyntaxKind) -> Self {
        Self { default, required: true }
    }

    const fn optional(default: SyntaxKind) -> Self {
        Self { default, required: false }
    }
}

/// The runtime shape a kind dictates for its nodes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Shape {
    /// Leaf token carrying text and trivia.
    Token,
    /// Layout node with a fixed, per-slot declared child list.
    Fixed(&'static [Slot]),
    /// Homogeneous, variable-length, ordered child sequence.
    Collection,
}

use SyntaxKind::*;

const SOURCE_FILE_SLOTS: &[Slot] = &[Slot::required(STMT_LIST)];

const FN_DECL_SLOTS: &[Slot] = &[
    Slot::required(FN_KW),
    Slot::required(NAME),
    Slot::optional(ARG_LIST),
    Slot::required(LEFT_BRACE),
    Slot::required(STMT_LIST),
    Slot::required(RIGHT_BRACE),
];

const LET_STMT_SLOTS: &[Slot] = &[
    Slot::required(LET_KW),
    Slot::required(NAME),
    Slot::required(EQ),
    Slot::required(ERROR),
    Slot::optional(SEMICOLON),
];

const EXPR_STMT_SLOTS: &[Slot] = &[Slot::required(ERROR), Slot::optional(SEMICOLON)];

const BINARY_EXPR_SLOTS: &[Slot] =
    &[Slot::required(ERROR), Slot::required(PLUS), Slot::required(ERROR)];

const PAREN_EXPR_SLOTS: &[Slot] =
    &[Slot::required(LEFT_PAREN), Slot::required(ERROR), Slot::required(RIGHT_PAREN)];

const LITERAL_SLOTS: &[Slot] = &[Slot::required(NUMBER)];

const NAME_REF_SLOTS: &[Slot] = &[Slot::required(NAME)];

impl SyntaxKind {
    pub const ALL: [Self; 24] = [
        LEFT_PAREN,
        RIGHT_PAREN,
        LEFT_BRACE,
        RIGHT_BRACE,
        EQ,
        PLUS,
        SEMICOLON,
        FN_KW,
        LET_KW,
        NAME,
        NUMBER,
        UNKNOWN,
        EOF,
        SOURCE_FILE,
        FN_DECL,
        LET_STMT,
        EXPR_STMT,
        BINARY_EXPR,
        PAREN_EXPR,
        LITERAL,
        NAME_REF,
        ERROR,
        STMT_LIST,
        ARG_LIST,
    ];

    /// Returns the shape this kind dictates for its nodes.
    pub const fn shape(self) -> Shape {
        match self {
            SOURCE_FILE => Shape::Fixed(SOURCE_FILE_SLOTS),
            FN_DECL => Shape::Fixed(FN_DECL_SLOTS),
            LET_STMT => Shape::Fixed(LET_STMT_SLOTS),
            EXPR_STMT => Shape::Fixed(EXPR_STMT_SLOTS),
            BINARY_EXPR => Shape::Fixed(BINARY_EXPR_SLOTS),
            PAREN_EXPR => Shape::Fixed(PAREN_EXPR_SLOTS),
            LITERAL => Shape::Fixed(LITERAL_SLOTS),
            NAME_REF => Shape::Fixed(NAME_REF_SLOTS),
            STMT_LIST | ARG_LIST | ERROR => Shape::Collection,
            _ => Shape::Token,
        }
    }

    #[inline]
    pub const fn is_token(self) -> bool {
        matches!(self.shape(), Shape::Token)
    }

    #[inline]
    pub const fn is_layout(self) -> bool {
        !self.is_token()
    }

    #[inline]
    pub const fn is_collection(self) -> bool {
        matches!(self.shape(), Shape::Collection)
    }

    /// Returns the slot table for a fixed-arity layout kind.
    #[inline]
    pub const fn slots(self) -> Option<&'static [Slot]> {
        match self.shape() {
            Shape::Fixed(slots) => Some(slots),
            _ => None,
        }
    }

    /// Returns the declared child count for a fixed-arity layout kind.
    #[inline]
    pub const fn arity(self) -> Option<usize> {
        match self.shape() {
            Shape::Fixed(slots) => Some(slots.len()),
            _ => None,
        }
    }
}

/// Fingerprint of the kind-to-shape table shared by a tree's producer and its
/// consumers. A producer records `STRUCTURE_ID`; a consumer verifies it before
/// navigating, since a mismatched table would silently misread child slots.
pub const STRUCTURE_ID: u64 = structure_id();

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

const fn fnv(hash: u64, value: u64) -> u64 {
    let mut hash = hash;
    let bytes = value.to_le_bytes();
    let mut i = 0;
    while i < bytes.len() {
        hash = (hash ^ bytes[i] as u64).wrapping_mul(FNV_PRIME);
        i += 1;
    }
    hash
}

const fn structure_id() -> u64 {
    let mut hash = FNV_OFFSET;
    let mut i = 0;
    while i < SyntaxKind::ALL.len() {
        let kind = SyntaxKind::ALL[i];
        hash = fnv(hash, kind as u64);
        match kind.shape() {
            Shape::Token => hash = fnv(hash, 0),
            Shape::Collection => hash = fnv(hash, 1),
            Shape::Fixed(slots) => {
                hash = fnv(hash, 2);
                hash = fnv(hash, slots.len() as u64);
                let mut j = 0;
                while j < slots.len() {
                    hash = fnv(hash, slots[j].default as u64);
                    hash = fnv(hash, slots[j].required as u64);
                    j += 1;
                }
            }
        }
        i += 1;
    }
    hash
}

/// The kind-to-shape table a raw-node producer used does not match ours.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
#[error("syntax structure mismatch: tree built with table {found:#018x}, expected {expected:#018x}")]
pub struct StructureIdMismatch {
    pub expected: u64,
    pub found: u64,
}

/// Checks a producer's structure id against ours.
///
/// Must pass before any tree handed over from that producer is navigated.
pub fn verify_structure_id(found: u64) -> Result<(), StructureIdMismatch> {
    if found == STRUCTURE_ID {
        Ok(())
    } else {
        Err(StructureIdMismatch { expected: STRUCTURE_ID, found })
    }
}
