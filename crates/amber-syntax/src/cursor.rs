//! Preorder traversal over positioned views.

use std::fmt::Write as _;

use crate::syntax::SyntaxChildren;
use crate::{NodeOrToken, Presence, SyntaxNode, SyntaxToken};

/// Preorder walk event including tokens.
#[derive(Clone, Debug)]
pub enum WalkEvent {
    Enter(SyntaxNode),
    Leave(SyntaxNode),
    Token(SyntaxToken),
}

/// Preorder traversal over nodes and tokens.
pub struct Preorder {
    stack: Vec<(SyntaxNode, SyntaxChildren)>,
    root: Option<SyntaxNode>,
    pending: Option<WalkEvent>,
}

impl Preorder {
    pub(crate) fn new(start: SyntaxNode) -> Self {
        Self { stack: Vec::with_capacity(16), root: Some(start), pending: None }
    }

    /// Skips the rest of the current subtree. The subtree's `Leave` event is
    /// still delivered, keeping enters and leaves paired.
    pub fn skip_subtree(&mut self) {
        let (node, _) = self.stack.pop().expect("must have a subtree to skip");
        self.pending = Some(WalkEvent::Leave(node));
    }
}

impl Iterator for Preorder {
    type Item = WalkEvent;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(event) = self.pending.take() {
            return Some(event);
        }
        let Some((_, active_node)) = self.stack.last_mut() else {
            let root = self.root.take()?;
            self.stack.push((root.clone(), root.children()));
            return Some(WalkEvent::Enter(root));
        };
        match active_node.next() {
            Some(NodeOrToken::Node(child)) => {
                self.stack.push((child.clone(), child.children()));
                Some(WalkEvent::Enter(child))
            }
            Some(NodeOrToken::Token(child)) => Some(WalkEvent::Token(child)),
            None => {
                let (exited_node, _) = self.stack.pop().expect("should have an exited-from node");
                Some(WalkEvent::Leave(exited_node))
            }
        }
    }
}

/// In-order stream of the tokens spanned by a node.
pub struct Tokens {
    inner: Preorder,
}

impl Iterator for Tokens {
    type Item = SyntaxToken;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.find_map(|event| match event {
            WalkEvent::Token(token) => Some(token),
            _ => None,
        })
    }
}

impl SyntaxNode {
    /// Returns a preorder iterator over nodes and tokens.
    pub fn preorder_with_tokens(&self) -> Preorder {
        Preorder::new(self.clone())
    }

    /// Returns the tokens spanned by this node, in source order.
    pub fn tokens(&self) -> Tokens {
        Tokens { inner: self.preorder_with_tokens() }
    }

    /// Renders the tree structure as an indented dump, one element per line.
    pub fn debug_dump(&self) -> String {
        let mut out = String::new();
        let mut depth = 0usize;
        for event in self.preorder_with_tokens() {
            match event {
                WalkEvent::Enter(node) => {
                    let missing =
                        if node.presence() == Presence::Missing { " (missing)" } else { "" };
                    writeln!(out, "{:indent$}{node:?}{missing}", "", indent = depth * 2).unwrap();
                    depth += 1;
                }
                WalkEvent::Leave(_) => depth -= 1,
                WalkEvent::Token(token) => {
                    let missing =
                        if token.presence() == Presence::Missing { " (missing)" } else { "" };
                    writeln!(out, "{:indent$}{token:?}{missing}", "", indent = depth * 2).unwrap();
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use expect_test::expect;

    use crate::SyntaxKind::*;
    use crate::{GreenNode, GreenToken, GreenTrivia, SyntaxNode, TriviaPiece, WalkEvent};

    fn spaced(kind: crate::SyntaxKind, text: &str) -> GreenToken {
        GreenToken::new(
            kind,
            GreenTrivia::empty(),
            text,
            GreenTrivia::new([TriviaPiece::whitespace(" ")]),
        )
    }

    fn tree() -> SyntaxNode {
        let literal = GreenNode::new(
            LITERAL,
            vec![Some(GreenToken::new(NUMBER, GreenTrivia::empty(), "1", GreenTrivia::empty()).into())],
        );
        let stmt = GreenNode::new(
            LET_STMT,
            vec![
                Some(spaced(LET_KW, "let").into()),
                Some(spaced(NAME, "x").into()),
                Some(spaced(EQ, "=").into()),
                Some(literal.into()),
                None,
            ],
        );
        let list = GreenNode::new(STMT_LIST, vec![Some(stmt.into())]);
        SyntaxNode::new_root(GreenNode::new(SOURCE_FILE, vec![Some(list.into())]))
    }

    #[test]
    fn tokens_stream_in_source_order() {
        let root = tree();
        let texts: Vec<_> = root.tokens().map(|token| token.text().to_owned()).collect();
        assert_eq!(texts, ["let", "x", "=", "1"]);

        let reconstructed: String =
            root.tokens().map(|token| token.green().to_string()).collect();
        assert_eq!(reconstructed, root.text());
    }

    #[test]
    fn skip_subtree_keeps_events_balanced() {
        let root = tree();
        let mut preorder = root.preorder_with_tokens();

        let mut enters = 0usize;
        let mut leaves = 0usize;
        let mut tokens = Vec::new();
        while let Some(event) = preorder.next() {
            match event {
                WalkEvent::Enter(node) => {
                    enters += 1;
                    if node.kind() == LET_STMT {
                        preorder.skip_subtree();
                    }
                }
                WalkEvent::Leave(_) => leaves += 1,
                WalkEvent::Token(token) => tokens.push(token.text().to_owned()),
            }
        }

        assert_eq!(enters, leaves);
        // The skipped statement's tokens never surface.
        assert!(tokens.is_empty());
    }

    #[test]
    fn debug_dump_shows_structure() {
        let root = tree();
        expect![[r#"
            SOURCE_FILE@0..9
              STMT_LIST@0..9
                LET_STMT@0..9
                  LET_KW@0..4 "let"
                  NAME@4..6 "x"
                  EQ@6..8 "="
                  LITERAL@8..9
                    NUMBER@8..9 "1"
        "#]]
        .assert_eq(&root.debug_dump());
    }

    #[test]
    fn debug_dump_marks_missing_placeholders() {
        let root = tree();
        let stmt = root.child_node(0).unwrap().child_node(0).unwrap();
        let cleared = stmt.replacing_child(3, None);

        expect![[r#"
            LET_STMT@0..8
              LET_KW@0..4 "let"
              NAME@4..6 "x"
              EQ@6..8 "="
              ERROR@8..8 (missing)
        "#]]
        .assert_eq(&cleared.debug_dump());
    }
}
