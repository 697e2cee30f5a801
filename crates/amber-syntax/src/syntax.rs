//! Positioned, parent-linked views over the raw green tree.
//!
//! A view pairs a green element with its parent view and slot index. Absolute
//! offsets and identity are computed lazily from the parent chain and memoized
//! on the view instance, never written back to the shared green node. Views
//! are cheap `Rc` cursors and deliberately not `Send`: threads should
//! navigate independently from a shared green root instead.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use text_size::{TextRange, TextSize};

use crate::syntax_kind::Shape;
use crate::{
    GreenElement, GreenNode, GreenToken, GreenTrivia, NodeOrToken, Presence, SyntaxKind,
};

/// Ticket distinguishing independently materialized roots. Views compare
/// equal only within one lineage.
static NEXT_LINEAGE: AtomicU64 = AtomicU64::new(0);

/// Session-scoped identity of one logical tree position.
///
/// Equality and hashing of views go through this, not through structural
/// content: two navigations to the same slot of the same materialized root
/// agree, independently built roots never do.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct NodeId {
    lineage: u64,
    index: u32,
}

struct SyntaxData {
    green: GreenElement,
    parent: Option<SyntaxNode>,
    /// Slot index of this element in its parent.
    slot: u32,
    lineage: u64,
    offset: Cell<Option<TextSize>>,
    index_in_tree: Cell<Option<u32>>,
}

impl SyntaxData {
    fn new(green: GreenElement, parent: SyntaxNode, slot: usize) -> Rc<Self> {
        let lineage = parent.data.lineage;
        Rc::new(Self {
            green,
            parent: Some(parent),
            slot: slot as u32,
            lineage,
            offset: Cell::new(None),
            index_in_tree: Cell::new(None),
        })
    }

    /// Absolute byte offset: parent offset plus the lengths of preceding
    /// siblings. Memoized on first use.
    fn offset(&self) -> TextSize {
        if let Some(offset) = self.offset.get() {
            return offset;
        }
        let parent = self.parent.as_ref().expect("non-root views always have a parent");
        let preceding: TextSize = parent
            .green()
            .children()
            .iter()
            .take(self.slot as usize)
            .flatten()
            .map(GreenElement::text_len)
            .sum();
        let offset = parent.data.offset() + preceding;
        self.offset.set(Some(offset));
        offset
    }

    /// Preorder index of this element within its tree. Memoized on first use.
    fn index_in_tree(&self) -> u32 {
        if let Some(index) = self.index_in_tree.get() {
            return index;
        }
        let parent = self.parent.as_ref().expect("non-root views always have a parent");
        let preceding: u32 = parent
            .green()
            .children()
            .iter()
            .take(self.slot as usize)
            .flatten()
            .map(GreenElement::descendant_count)
            .sum();
        let index = parent.data.index_in_tree() + 1 + preceding;
        self.index_in_tree.set(Some(index));
        index
    }

    fn id(&self) -> NodeId {
        NodeId { lineage: self.lineage, index: self.index_in_tree() }
    }
}

/// Positioned view of a layout green node.
#[derive(Clone)]
pub struct SyntaxNode {
    data: Rc<SyntaxData>,
}

/// Positioned view of a green token.
#[derive(Clone)]
pub struct SyntaxToken {
    data: Rc<SyntaxData>,
}

/// Node or token view.
pub type SyntaxElement = NodeOrToken<SyntaxNode, SyntaxToken>;

impl SyntaxNode {
    /// Wraps a green root into a fresh lineage at offset 0.
    pub fn new_root(green: GreenNode) -> Self {
        Self {
            data: Rc::new(SyntaxData {
                green: green.into(),
                parent: None,
                slot: 0,
                lineage: NEXT_LINEAGE.fetch_add(1, Ordering::Relaxed),
                offset: Cell::new(Some(TextSize::new(0))),
                index_in_tree: Cell::new(Some(0)),
            }),
        }
    }

    /// The underlying green node.
    #[inline]
    pub fn green(&self) -> &GreenNode {
        match &self.data.green {
            NodeOrToken::Node(node) => node,
            NodeOrToken::Token(_) => unreachable!("SyntaxNode always wraps a green node"),
        }
    }

    #[inline]
    pub fn kind(&self) -> SyntaxKind {
        self.green().kind()
    }

    #[inline]
    pub fn presence(&self) -> Presence {
        self.green().presence()
    }

    #[inline]
    pub fn is_missing(&self) -> bool {
        self.green().is_missing()
    }

    /// Session identity of this logical position.
    #[inline]
    pub fn id(&self) -> NodeId {
        self.data.id()
    }

    /// Absolute byte offset of this node. Lazy, memoized on the view.
    #[inline]
    pub fn offset(&self) -> TextSize {
        self.data.offset()
    }

    #[inline]
    pub fn text_range(&self) -> TextRange {
        TextRange::at(self.offset(), self.green().text_len())
    }

    /// Reconstructed source text of this subtree.
    pub fn text(&self) -> String {
        self.green().to_string()
    }

    #[inline]
    pub fn parent(&self) -> Option<&Self> {
        self.data.parent.as_ref()
    }

    /// Slot index of this node in its parent.
    #[inline]
    pub fn slot(&self) -> usize {
        self.data.slot as usize
    }

    pub fn ancestors(&self) -> impl Iterator<Item = &Self> {
        std::iter::successors(Some(self), |node| node.parent())
    }

    /// The child at `slot`, or `None` if the slot is absent.
    pub fn child(&self, slot: usize) -> Option<SyntaxElement> {
        let green = self.green().child(slot)?.clone();
        let data = SyntaxData::new(green, self.clone(), slot);
        Some(match &data.green {
            NodeOrToken::Node(_) => NodeOrToken::Node(SyntaxNode { data }),
            NodeOrToken::Token(_) => NodeOrToken::Token(SyntaxToken { data }),
        })
    }

    /// The child node at `slot`; panics if the slot holds a token.
    #[track_caller]
    pub fn child_node(&self, slot: usize) -> Option<Self> {
        self.child(slot).map(|child| match child {
            NodeOrToken::Node(node) => node,
            NodeOrToken::Token(token) => {
                panic!("slot {slot} of {:?} holds token {:?}", self.kind(), token.kind())
            }
        })
    }

    /// The child token at `slot`; panics if the slot holds a node.
    #[track_caller]
    pub fn child_token(&self, slot: usize) -> Option<SyntaxToken> {
        self.child(slot).map(|child| match child {
            NodeOrToken::Token(token) => token,
            NodeOrToken::Node(node) => {
                panic!("slot {slot} of {:?} holds node {:?}", self.kind(), node.kind())
            }
        })
    }

    /// Iterates present children in slot order.
    pub fn children(&self) -> SyntaxChildren {
        let back = self.green().children().len();
        SyntaxChildren { parent: self.clone(), front: 0, back }
    }

    pub fn next_sibling(&self) -> Option<SyntaxElement> {
        let parent = self.parent()?;
        (self.slot() + 1..parent.green().children().len())
            .find_map(|slot| parent.child(slot))
    }

    pub fn prev_sibling(&self) -> Option<SyntaxElement> {
        let parent = self.parent()?;
        (0..self.slot()).rev().find_map(|slot| parent.child(slot))
    }

    /// First token in this subtree, if it has any.
    pub fn first_token(&self) -> Option<SyntaxToken> {
        self.children().find_map(|child| match child {
            NodeOrToken::Token(token) => Some(token),
            NodeOrToken::Node(node) => node.first_token(),
        })
    }

    /// Last token in this subtree, if it has any.
    pub fn last_token(&self) -> Option<SyntaxToken> {
        self.children().rev().find_map(|child| match child {
            NodeOrToken::Token(token) => Some(token),
            NodeOrToken::Node(node) => node.last_token(),
        })
    }

    /// Replaces the child at `slot` and rebuilds the spine to the root.
    ///
    /// Returns the node corresponding to `self` in the newly rooted tree.
    /// `self` and everything reachable from it stay valid and untouched; all
    /// subtrees off the edited spine are shared between both trees.
    #[track_caller]
    pub fn replacing_child(&self, slot: usize, new_child: Option<GreenElement>) -> Self {
        self.with_green(self.green().with_child(slot, new_child))
    }

    /// Appends an element to this collection node, rebuilding the spine.
    #[track_caller]
    pub fn appending(&self, element: GreenElement) -> Self {
        self.with_green(self.green().append(element))
    }

    /// Appends `element` to the collection in `slot`, synthesizing an empty
    /// collection of the slot's declared kind if the slot is absent.
    #[track_caller]
    pub fn adding_element(&self, slot: usize, element: GreenElement) -> Self {
        let collection = match self.green().child(slot) {
            Some(NodeOrToken::Node(collection)) => {
                assert!(
                    collection.kind().is_collection(),
                    "slot {slot} of {:?} holds non-collection {:?}",
                    self.kind(),
                    collection.kind(),
                );
                collection.append(element)
            }
            Some(NodeOrToken::Token(token)) => {
                panic!("slot {slot} of {:?} holds token {:?}", self.kind(), token.kind())
            }
            None => {
                let Shape::Fixed(slots) = self.kind().shape() else {
                    panic!("{:?} has no declared slots", self.kind())
                };
                let kind = slots[slot].default;
                assert!(
                    kind.is_collection(),
                    "slot {slot} of {:?} is declared as {kind:?}, not a collection",
                    self.kind(),
                );
                GreenNode::new(kind, Vec::new()).append(element)
            }
        };
        self.replacing_child(slot, Some(collection.into()))
    }

    /// Rebuilds the ancestor chain around a replacement green node for
    /// `self`, then descends back to the corresponding position.
    fn with_green(&self, green: GreenNode) -> Self {
        match self.parent() {
            None => Self::new_root(green),
            Some(parent) => {
                let parent_green = parent.green().with_child(self.slot(), Some(green.into()));
                let new_parent = parent.with_green(parent_green);
                match new_parent.child(self.slot()) {
                    Some(NodeOrToken::Node(node)) => node,
                    _ => unreachable!("replaced slot holds the replacement node"),
                }
            }
        }
    }
}

impl PartialEq for SyntaxNode {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for SyntaxNode {}

impl std::hash::Hash for SyntaxNode {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Debug for SyntaxNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{:?}", self.kind(), self.text_range())
    }
}

impl fmt::Display for SyntaxNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.green(), f)
    }
}

impl SyntaxToken {
    /// The underlying green token.
    #[inline]
    pub fn green(&self) -> &GreenToken {
        match &self.data.green {
            NodeOrToken::Token(token) => token,
            NodeOrToken::Node(_) => unreachable!("SyntaxToken always wraps a green token"),
        }
    }

    #[inline]
    pub fn kind(&self) -> SyntaxKind {
        self.green().kind()
    }

    #[inline]
    pub fn presence(&self) -> Presence {
        self.green().presence()
    }

    #[inline]
    pub fn is_missing(&self) -> bool {
        self.green().is_missing()
    }

    #[inline]
    pub fn id(&self) -> NodeId {
        self.data.id()
    }

    /// Absolute byte offset of this token, leading trivia included.
    #[inline]
    pub fn offset(&self) -> TextSize {
        self.data.offset()
    }

    /// Range including attached trivia.
    #[inline]
    pub fn text_range(&self) -> TextRange {
        TextRange::at(self.offset(), self.green().text_len())
    }

    /// Range of the significant spelling, trivia excluded.
    pub fn trimmed_range(&self) -> TextRange {
        let green = self.green();
        let start = self.offset() + green.leading().len();
        TextRange::at(start, TextSize::of(green.text()))
    }

    /// The token's significant spelling.
    #[inline]
    pub fn text(&self) -> &str {
        self.green().text()
    }

    #[inline]
    pub fn parent(&self) -> &SyntaxNode {
        self.data.parent.as_ref().expect("tokens are never roots")
    }

    /// Slot index of this token in its parent.
    #[inline]
    pub fn slot(&self) -> usize {
        self.data.slot as usize
    }

    /// Replaces the leading trivia, rebuilding the spine to the root.
    ///
    /// Returns the token corresponding to `self` in the new tree.
    pub fn with_leading_trivia(&self, trivia: GreenTrivia) -> Self {
        self.replacing_green(self.green().with_leading(trivia))
    }

    /// Replaces the trailing trivia, rebuilding the spine to the root.
    pub fn with_trailing_trivia(&self, trivia: GreenTrivia) -> Self {
        self.replacing_green(self.green().with_trailing(trivia))
    }

    /// Replaces the spelling, keeping trivia, rebuilding the spine.
    pub fn with_text(&self, text: &str) -> Self {
        self.replacing_green(self.green().with_text(text))
    }

    fn replacing_green(&self, green: GreenToken) -> Self {
        let new_parent = self.parent().replacing_child(self.slot(), Some(green.into()));
        match new_parent.child(self.slot()) {
            Some(NodeOrToken::Token(token)) => token,
            _ => unreachable!("replaced slot holds the replacement token"),
        }
    }
}

impl PartialEq for SyntaxToken {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for SyntaxToken {}

impl std::hash::Hash for SyntaxToken {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Debug for SyntaxToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{:?} {:?}", self.kind(), self.text_range(), self.text())
    }
}

impl fmt::Display for SyntaxToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.green(), f)
    }
}

impl SyntaxElement {
    pub fn kind(&self) -> SyntaxKind {
        match self {
            NodeOrToken::Node(node) => node.kind(),
            NodeOrToken::Token(token) => token.kind(),
        }
    }

    pub fn presence(&self) -> Presence {
        match self {
            NodeOrToken::Node(node) => node.presence(),
            NodeOrToken::Token(token) => token.presence(),
        }
    }

    pub fn id(&self) -> NodeId {
        match self {
            NodeOrToken::Node(node) => node.id(),
            NodeOrToken::Token(token) => token.id(),
        }
    }

    pub fn text_range(&self) -> TextRange {
        match self {
            NodeOrToken::Node(node) => node.text_range(),
            NodeOrToken::Token(token) => token.text_range(),
        }
    }
}

/// Iterator over a node's present children in slot order.
pub struct SyntaxChildren {
    parent: SyntaxNode,
    front: usize,
    back: usize,
}

impl Iterator for SyntaxChildren {
    type Item = SyntaxElement;

    fn next(&mut self) -> Option<Self::Item> {
        while self.front < self.back {
            let slot = self.front;
            self.front += 1;
            if let Some(child) = self.parent.child(slot) {
                return Some(child);
            }
        }
        None
    }
}

impl DoubleEndedIterator for SyntaxChildren {
    fn next_back(&mut self) -> Option<Self::Item> {
        while self.back > self.front {
            self.back -= 1;
            if let Some(child) = self.parent.child(self.back) {
                return Some(child);
            }
        }
        None
    }
}
