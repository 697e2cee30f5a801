//! Immutable, reference-counted raw tree storage.
//!
//! Green nodes carry kind, presence, children, and cached totals, but no
//! parent links or absolute positions. They are shared freely across tree
//! versions: every edit builds a new spine to the root and keeps references
//! to all untouched subtrees.

use std::fmt;

use text_size::TextSize;
use triomphe::Arc;

use crate::syntax_kind::Shape;
use crate::{GreenTrivia, SyntaxKind};

/// Node or token wrapper used at both the green and positioned layers.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum NodeOrToken<N, T> {
    Node(N),
    Token(T),
}

impl<N, T> NodeOrToken<N, T> {
    pub fn into_node(self) -> Option<N> {
        match self {
            NodeOrToken::Node(node) => Some(node),
            NodeOrToken::Token(_) => None,
        }
    }

    pub fn into_token(self) -> Option<T> {
        match self {
            NodeOrToken::Node(_) => None,
            NodeOrToken::Token(token) => Some(token),
        }
    }

    pub fn as_node(&self) -> Option<&N> {
        match self {
            NodeOrToken::Node(node) => Some(node),
            NodeOrToken::Token(_) => None,
        }
    }

    pub fn as_token(&self) -> Option<&T> {
        match self {
            NodeOrToken::Node(_) => None,
            NodeOrToken::Token(token) => Some(token),
        }
    }
}

/// Whether a node holds real parsed content or stands in for content the
/// parser could not produce. Distinct from an *absent* optional slot, which
/// is the literal lack of a child.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Presence {
    Present,
    Missing,
}

pub type GreenElement = NodeOrToken<GreenNode, GreenToken>;

impl GreenElement {
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

    pub fn text_len(&self) -> TextSize {
        match self {
            NodeOrToken::Node(node) => node.text_len(),
            NodeOrToken::Token(token) => token.text_len(),
        }
    }

    /// Number of green elements in this subtree, including the element itself.
    pub(crate) fn descendant_count(&self) -> u32 {
        match self {
            NodeOrToken::Node(node) => node.data.descendant_count,
            NodeOrToken::Token(_) => 1,
        }
    }

    /// Synthesizes the zero-length missing placeholder for `kind`.
    pub fn missing(kind: SyntaxKind) -> Self {
        if kind.is_token() {
            NodeOrToken::Token(GreenToken::missing(kind))
        } else {
            NodeOrToken::Node(GreenNode::missing(kind))
        }
    }

    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        match (a, b) {
            (NodeOrToken::Node(a), NodeOrToken::Node(b)) => GreenNode::ptr_eq(a, b),
            (NodeOrToken::Token(a), NodeOrToken::Token(b)) => GreenToken::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for GreenElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeOrToken::Node(node) => fmt::Display::fmt(node, f),
            NodeOrToken::Token(token) => fmt::Display::fmt(token, f),
        }
    }
}

impl From<GreenNode> for GreenElement {
    fn from(node: GreenNode) -> Self {
        NodeOrToken::Node(node)
    }
}

impl From<GreenToken> for GreenElement {
    fn from(token: GreenToken) -> Self {
        NodeOrToken::Token(token)
    }
}

#[derive(Debug, Eq, Hash, PartialEq)]
struct GreenTokenData {
    kind: SyntaxKind,
    presence: Presence,
    leading: GreenTrivia,
    text: Box<str>,
    trailing: GreenTrivia,
    text_len: TextSize,
}

/// Leaf of the raw tree: kind, presence, trivia on both edges, and the
/// token's significant spelling.
#[derive(Clone, Eq, Hash, PartialEq)]
pub struct GreenToken {
    data: Arc<GreenTokenData>,
}

impl GreenToken {
    #[track_caller]
    pub fn new(
        kind: SyntaxKind,
        leading: GreenTrivia,
        text: impl Into<Box<str>>,
        trailing: GreenTrivia,
    ) -> Self {
        Self::with_presence(kind, leading, text.into(), trailing, Presence::Present)
    }

    /// Synthesizes a zero-length placeholder for a token the parser could not
    /// produce.
    #[track_caller]
    pub fn missing(kind: SyntaxKind) -> Self {
        Self::with_presence(kind, GreenTrivia::empty(), "".into(), GreenTrivia::empty(), Presence::Missing)
    }

    #[track_caller]
    fn with_presence(
        kind: SyntaxKind,
        leading: GreenTrivia,
        text: Box<str>,
        trailing: GreenTrivia,
        presence: Presence,
    ) -> Self {
        assert!(kind.is_token(), "{kind:?} is not a token kind");
        let text_len = leading.len() + TextSize::of(&*text) + trailing.len();
        Self { data: Arc::new(GreenTokenData { kind, presence, leading, text, trailing, text_len }) }
    }

    #[inline]
    pub fn kind(&self) -> SyntaxKind {
        self.data.kind
    }

    #[inline]
    pub fn presence(&self) -> Presence {
        self.data.presence
    }

    #[inline]
    pub fn is_missing(&self) -> bool {
        self.data.presence == Presence::Missing
    }

    #[inline]
    pub fn leading(&self) -> &GreenTrivia {
        &self.data.leading
    }

    #[inline]
    pub fn trailing(&self) -> &GreenTrivia {
        &self.data.trailing
    }

    /// The token's significant spelling, excluding trivia.
    #[inline]
    pub fn text(&self) -> &str {
        &self.data.text
    }

    /// Total length: leading trivia + text + trailing trivia. O(1).
    #[inline]
    pub fn text_len(&self) -> TextSize {
        self.data.text_len
    }

    /// Returns a new token with the leading trivia replaced.
    pub fn with_leading(&self, leading: GreenTrivia) -> Self {
        Self::with_presence(
            self.kind(),
            leading,
            self.data.text.clone(),
            self.data.trailing.clone(),
            self.presence(),
        )
    }

    /// Returns a new token with the trailing trivia replaced.
    pub fn with_trailing(&self, trailing: GreenTrivia) -> Self {
        Self::with_presence(
            self.kind(),
            self.data.leading.clone(),
            self.data.text.clone(),
            trailing,
            self.presence(),
        )
    }

    /// Returns a new token with the spelling replaced, trivia kept.
    pub fn with_text(&self, text: impl Into<Box<str>>) -> Self {
        Self::with_presence(
            self.kind(),
            self.data.leading.clone(),
            text.into(),
            self.data.trailing.clone(),
            self.presence(),
        )
    }

    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.data, &b.data)
    }
}

impl fmt::Display for GreenToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.data.leading, self.data.text, self.data.trailing)
    }
}

impl fmt::Debug for GreenToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind())?;
        if self.is_missing() {
            write!(f, " (missing)")?;
        }
        write!(f, " {:?}", self.text())
    }
}

#[derive(Debug, Eq, Hash, PartialEq)]
struct GreenNodeData {
    kind: SyntaxKind,
    presence: Presence,
    children: Box<[Option<GreenElement>]>,
    text_len: TextSize,
    descendant_count: u32,
}

/// Interior raw node: an ordered list of optional child slots.
///
/// For fixed-arity kinds the slot count always equals the kind's declared
/// arity; an absent optional slot is `None`. Collection kinds hold any number
/// of present children.
#[derive(Clone, Eq, Hash, PartialEq)]
pub struct GreenNode {
    data: Arc<GreenNodeData>,
}

impl GreenNode {
    /// Constructs a layout node, checking the child list against the kind's
    /// declared shape. Shape violations are parser bugs and panic.
    #[track_caller]
    pub fn new(kind: SyntaxKind, children: Vec<Option<GreenElement>>) -> Self {
        match kind.shape() {
            Shape::Token => panic!("{kind:?} is a token kind, not a layout kind"),
            Shape::Fixed(slots) => {
                assert!(
                    children.len() == slots.len(),
                    "{kind:?} requires {} children, got {}",
                    slots.len(),
                    children.len(),
                );
                for (index, (slot, child)) in slots.iter().zip(&children).enumerate() {
                    assert!(
                        !slot.required || child.is_some(),
                        "{kind:?} slot {index} is required; pass a missing placeholder instead of clearing it",
                    );
                }
            }
            Shape::Collection => {
                assert!(
                    children.iter().all(Option::is_some),
                    "collection {kind:?} cannot hold absent slots",
                );
            }
        }
        Self::with_presence(kind, children, Presence::Present)
    }

    /// Synthesizes a zero-length placeholder layout for `kind`.
    ///
    /// Required slots are filled with their own per-slot missing defaults so
    /// traversal over the placeholder needs no special cases; optional slots
    /// stay absent. Collections come out empty.
    #[track_caller]
    pub fn missing(kind: SyntaxKind) -> Self {
        let children = match kind.shape() {
            Shape::Token => panic!("{kind:?} is a token kind, not a layout kind"),
            Shape::Fixed(slots) => slots
                .iter()
                .map(|slot| slot.required.then(|| GreenElement::missing(slot.default)))
                .collect(),
            Shape::Collection => Vec::new(),
        };
        Self::with_presence(kind, children, Presence::Missing)
    }

    fn with_presence(
        kind: SyntaxKind,
        children: Vec<Option<GreenElement>>,
        presence: Presence,
    ) -> Self {
        let text_len = children.iter().flatten().map(GreenElement::text_len).sum();
        let descendant_count =
            1 + children.iter().flatten().map(GreenElement::descendant_count).sum::<u32>();
        let children = children.into_boxed_slice();
        Self {
            data: Arc::new(GreenNodeData { kind, presence, children, text_len, descendant_count }),
        }
    }

    #[inline]
    pub fn kind(&self) -> SyntaxKind {
        self.data.kind
    }

    #[inline]
    pub fn presence(&self) -> Presence {
        self.data.presence
    }

    #[inline]
    pub fn is_missing(&self) -> bool {
        self.data.presence == Presence::Missing
    }

    /// Total source length of all present children. O(1), cached.
    #[inline]
    pub fn text_len(&self) -> TextSize {
        self.data.text_len
    }

    pub(crate) fn descendant_count(&self) -> u32 {
        self.data.descendant_count
    }

    /// All child slots, absent ones included.
    #[inline]
    pub fn children(&self) -> &[Option<GreenElement>] {
        &self.data.children
    }

    /// The child at `index`, or `None` if the slot is absent. A present but
    /// missing placeholder child is returned like any other child.
    #[inline]
    pub fn child(&self, index: usize) -> Option<&GreenElement> {
        self.data.children.get(index).and_then(Option::as_ref)
    }

    /// Returns a new node with the slot at `index` replaced; every other
    /// child is shared with `self` by reference.
    ///
    /// Clearing a required slot substitutes that slot's declared missing
    /// default, so the tree shape stays navigable. Clearing an optional slot
    /// stores a literal absence. Collection elements cannot be cleared.
    #[track_caller]
    pub fn with_child(&self, index: usize, new_child: Option<GreenElement>) -> Self {
        let kind = self.kind();
        let new_child = match kind.shape() {
            Shape::Token => unreachable!(),
            Shape::Fixed(slots) => {
                assert!(index < slots.len(), "{kind:?} has no slot {index}");
                let slot = slots[index];
                match new_child {
                    Some(child) => Some(child),
                    None if slot.required => Some(GreenElement::missing(slot.default)),
                    None => None,
                }
            }
            Shape::Collection => {
                assert!(index < self.data.children.len(), "{kind:?} has no element {index}");
                Some(new_child.expect("collection elements cannot be cleared"))
            }
        };

        let mut children = self.data.children.to_vec();
        children[index] = new_child;
        Self::with_presence(kind, children, self.presence())
    }

    /// Returns a new collection node with `element` appended; existing
    /// children are shared with `self` by reference.
    #[track_caller]
    pub fn append(&self, element: GreenElement) -> Self {
        let kind = self.kind();
        assert!(kind.is_collection(), "cannot append to non-collection {kind:?}");
        let mut children = self.data.children.to_vec();
        children.push(Some(element));
        Self::with_presence(kind, children, Presence::Present)
    }

    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.data, &b.data)
    }
}

impl fmt::Display for GreenNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for child in self.data.children.iter().flatten() {
            fmt::Display::fmt(child, f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for GreenNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind())?;
        if self.is_missing() {
            write!(f, " (missing)")?;
        }
        write!(f, " [{} children]", self.data.children.len())
    }
}
