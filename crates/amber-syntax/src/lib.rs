//! Full-fidelity, persistent syntax trees.
//!
//! Every byte of the original source, trivia and malformed fragments
//! included, is recoverable from the tree. Edits are copy-on-write: they
//! build a new spine to the root and share every untouched subtree with the
//! original, which stays valid. Raw (green) storage is immutable and
//! atomically reference counted, so it can be shared across threads;
//! positioned views are cheap single-threaded cursors reconstructed on
//! demand.

/// Typed wrappers and total kind dispatch over the raw tree.
pub mod ast;
mod cursor;
mod green;
mod syntax;
mod syntax_kind;
mod trivia;

/// Preorder traversal over nodes and tokens.
pub use cursor::{Preorder, Tokens, WalkEvent};
/// Raw, structurally shared tree storage.
pub use green::{GreenElement, GreenNode, GreenToken, NodeOrToken, Presence};
/// Positioned, identity-bearing views.
pub use syntax::{NodeId, SyntaxChildren, SyntaxElement, SyntaxNode, SyntaxToken};
/// Token and node kinds, their declared shapes, and table versioning.
pub use syntax_kind::{
    Shape, Slot, StructureIdMismatch, SyntaxKind, STRUCTURE_ID, verify_structure_id,
};
/// Trivia pieces attached to tokens.
pub use trivia::{GreenTrivia, TriviaPiece, TriviaPieceKind};
