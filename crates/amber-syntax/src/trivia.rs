//! Trivia pieces attached to the leading or trailing edge of tokens.
//!
//! Unlike trees that retain the source buffer and only record trivia lengths,
//! pieces here own their text: a tree must reproduce its exact source bytes
//! with nothing but the nodes themselves.

use std::fmt;

use text_size::TextSize;
use triomphe::ThinArc;

/// Kinds of trivia stored alongside tokens.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TriviaPieceKind {
    Whitespace,
    Newline,
    LineComment,
    BlockComment,
}

/// A trivia fragment with its kind and exact text.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct TriviaPiece {
    pub kind: TriviaPieceKind,
    pub text: Box<str>,
}

impl TriviaPiece {
    /// Creates a new trivia piece with the given kind and text.
    pub fn new(kind: TriviaPieceKind, text: impl Into<Box<str>>) -> Self {
        Self { kind, text: text.into() }
    }

    pub fn whitespace(text: impl Into<Box<str>>) -> Self {
        Self::new(TriviaPieceKind::Whitespace, text)
    }

    pub fn newline(text: impl Into<Box<str>>) -> Self {
        Self::new(TriviaPieceKind::Newline, text)
    }

    pub fn line_comment(text: impl Into<Box<str>>) -> Self {
        Self::new(TriviaPieceKind::LineComment, text)
    }

    pub fn block_comment(text: impl Into<Box<str>>) -> Self {
        Self::new(TriviaPieceKind::BlockComment, text)
    }

    #[inline]
    pub fn len(&self) -> TextSize {
        TextSize::of(&*self.text)
    }
}

/// An ordered sequence of trivia pieces with a cached total length.
#[derive(Clone, Eq, Hash, PartialEq)]
pub struct GreenTrivia {
    ptr: Option<ThinArc<TextSize, TriviaPiece>>,
}

impl GreenTrivia {
    pub fn new(pieces: impl IntoIterator<Item = TriviaPiece>) -> Self {
        let pieces = pieces.into_iter().collect::<Vec<_>>();
        if pieces.is_empty() {
            return Self::empty();
        }
        let total_len = pieces.iter().map(TriviaPiece::len).sum();
        Self { ptr: Some(ThinArc::from_header_and_iter(total_len, pieces.into_iter())) }
    }

    pub const fn empty() -> Self {
        Self { ptr: None }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ptr.is_none()
    }

    /// Total text length of all pieces. O(1), read from the header.
    pub fn len(&self) -> TextSize {
        match &self.ptr {
            None => TextSize::new(0),
            Some(ptr) => ptr.header.header,
        }
    }

    pub fn pieces(&self) -> &[TriviaPiece] {
        match &self.ptr {
            None => &[],
            Some(ptr) => &ptr.slice,
        }
    }
}

impl fmt::Display for GreenTrivia {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for piece in self.pieces() {
            f.write_str(&piece.text)?;
        }
        Ok(())
    }
}

impl fmt::Debug for GreenTrivia {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GreenTrivia")
            .field("pieces", &self.pieces())
            .field("total_len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_sums_pieces() {
        let trivia = GreenTrivia::new([
            TriviaPiece::whitespace("  "),
            TriviaPiece::line_comment("// hi"),
            TriviaPiece::newline("\n"),
        ]);

        assert_eq!(trivia.len(), TextSize::new(8));
        assert_eq!(trivia.pieces().len(), 3);
        assert_eq!(trivia.to_string(), "  // hi\n");
    }

    #[test]
    fn block_comments_carry_their_full_spelling() {
        let piece = TriviaPiece::block_comment("/* multi\n   line */");
        assert_eq!(piece.kind, TriviaPieceKind::BlockComment);
        assert_eq!(piece.len(), TextSize::new(19));

        let trivia = GreenTrivia::new([piece, TriviaPiece::newline("\n")]);
        assert_eq!(trivia.to_string(), "/* multi\n   line */\n");
    }

    #[test]
    fn empty_is_zero_length() {
        let trivia = GreenTrivia::empty();
        assert!(trivia.is_empty());
        assert_eq!(trivia.len(), TextSize::new(0));
        assert_eq!(trivia.pieces(), &[]);
        assert_eq!(trivia.to_string(), "");
    }
}
