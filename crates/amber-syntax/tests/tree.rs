//! End-to-end scenarios over the public tree API: exact-text round trips,
//! error recovery placeholders, list building, and persistence across edits.

use amber_syntax::SyntaxKind::{self, *};
use amber_syntax::{
    GreenElement, GreenNode, GreenToken, GreenTrivia, Presence, STRUCTURE_ID, SyntaxNode,
    TriviaPiece, verify_structure_id,
};

fn token(kind: SyntaxKind, text: &str) -> GreenElement {
    GreenToken::new(kind, GreenTrivia::empty(), text, GreenTrivia::empty()).into()
}

fn token_with(
    kind: SyntaxKind,
    leading: GreenTrivia,
    text: &str,
    trailing: GreenTrivia,
) -> GreenElement {
    GreenToken::new(kind, leading, text, trailing).into()
}

fn ws(text: &str) -> GreenTrivia {
    GreenTrivia::new([TriviaPiece::whitespace(text)])
}

fn literal(number: &str) -> GreenNode {
    GreenNode::new(LITERAL, vec![Some(token(NUMBER, number))])
}

/// Builds the tree a conforming parser would produce for
/// `let x = 1 // done\n`, trivia attached exactly as lexed.
fn let_x_with_comment() -> SyntaxNode {
    let trailing = GreenTrivia::new([
        TriviaPiece::whitespace(" "),
        TriviaPiece::line_comment("// done"),
        TriviaPiece::newline("\n"),
    ]);
    let initializer =
        GreenNode::new(LITERAL, vec![Some(token_with(NUMBER, GreenTrivia::empty(), "1", trailing))]);
    let stmt = GreenNode::new(
        LET_STMT,
        vec![
            Some(token_with(LET_KW, GreenTrivia::empty(), "let", ws(" "))),
            Some(token_with(NAME, GreenTrivia::empty(), "x", ws(" "))),
            Some(token_with(EQ, GreenTrivia::empty(), "=", ws(" "))),
            Some(initializer.into()),
            None,
        ],
    );
    let list = GreenNode::new(STMT_LIST, vec![Some(stmt.into())]);
    SyntaxNode::new_root(GreenNode::new(SOURCE_FILE, vec![Some(list.into())]))
}

#[test]
fn reconstruction_is_byte_exact() {
    let root = let_x_with_comment();
    assert_eq!(root.text(), "let x = 1 // done\n");

    // The same text falls out of an in-order token walk.
    let walked: String = root.tokens().map(|token| token.green().to_string()).collect();
    assert_eq!(walked, "let x = 1 // done\n");
}

#[test]
fn simple_edit_scenario() {
    let root = let_x_with_comment();
    let stmt = root.child_node(0).unwrap().child_node(0).unwrap();

    let edited = stmt.replacing_child(3, Some(literal("2").into()));

    // New content, new identity; the comment was attached to the replaced
    // token, so it goes with it.
    assert_eq!(edited.text(), "let x = 2");
    assert_ne!(edited.id(), stmt.id());

    // The original tree is untouched and still reads the old child.
    assert_eq!(stmt.text(), "let x = 1 // done\n");

    // `let`, `x`, `=` are the same raw tokens in both trees, not copies.
    for slot in [0, 1, 2] {
        assert!(GreenElement::ptr_eq(
            stmt.green().child(slot).unwrap(),
            edited.green().child(slot).unwrap(),
        ));
    }
}

#[test]
fn error_recovery_scenario() {
    // `let x =` with the initializer never parsed: the parser substitutes a
    // missing placeholder for the required slot.
    let stmt = GreenNode::new(
        LET_STMT,
        vec![
            Some(token_with(LET_KW, GreenTrivia::empty(), "let", ws(" "))),
            Some(token_with(NAME, GreenTrivia::empty(), "x", ws(" "))),
            Some(token(EQ, "=")),
            Some(GreenElement::missing(ERROR)),
            None,
        ],
    );
    let list = GreenNode::new(STMT_LIST, vec![Some(stmt.into())]);
    let root = SyntaxNode::new_root(GreenNode::new(SOURCE_FILE, vec![Some(list.into())]));

    // No characters were invented for the placeholder.
    assert_eq!(root.text(), "let x =");

    let placeholder =
        root.child_node(0).unwrap().child_node(0).unwrap().child_node(3).unwrap();
    assert_eq!(placeholder.presence(), Presence::Missing);
    assert_eq!(placeholder.text_range().len(), 0.into());
}

#[test]
fn list_append_scenario() {
    let statements = [
        ("1", "one"),
        ("2", "two"),
        ("3", "three"),
    ];

    let mut list = SyntaxNode::new_root(GreenNode::new(STMT_LIST, Vec::new()));
    for (number, comment) in statements {
        let trailing = GreenTrivia::new([
            TriviaPiece::line_comment(format!("//{comment}")),
            TriviaPiece::newline("\n"),
        ]);
        let expr =
            GreenNode::new(LITERAL, vec![Some(token_with(NUMBER, GreenTrivia::empty(), number, trailing))]);
        let stmt = GreenNode::new(EXPR_STMT, vec![Some(expr.into()), None]);
        list = list.appending(stmt.into());
    }

    assert_eq!(list.green().children().len(), 3);
    assert_eq!(list.text(), "1//one\n2//two\n3//three\n");

    let kinds: Vec<_> = list.children().map(|child| child.kind()).collect();
    assert_eq!(kinds, [EXPR_STMT, EXPR_STMT, EXPR_STMT]);
}

#[test]
fn every_prior_node_survives_an_edit() {
    let root = let_x_with_comment();
    let before: Vec<_> = root.tokens().map(|token| token.text().to_owned()).collect();

    let stmt = root.child_node(0).unwrap().child_node(0).unwrap();
    let _edited = stmt.replacing_child(3, Some(literal("2").into()));

    let after: Vec<_> = root.tokens().map(|token| token.text().to_owned()).collect();
    assert_eq!(before, after);
}

#[test]
fn structure_id_gates_foreign_trees() {
    assert!(verify_structure_id(STRUCTURE_ID).is_ok());

    let err = verify_structure_id(0).unwrap_err();
    assert_eq!(err.expected, STRUCTURE_ID);
    assert_eq!(
        err.to_string(),
        format!(
            "syntax structure mismatch: tree built with table 0x0000000000000000, expected {STRUCTURE_ID:#018x}"
        )
    );
}

#[test]
fn green_storage_is_thread_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<GreenNode>();
    assert_send_sync::<GreenToken>();
    assert_send_sync::<GreenElement>();

    let root = let_x_with_comment();
    let green = root.green().clone();
    let text = std::thread::spawn(move || SyntaxNode::new_root(green).text())
        .join()
        .unwrap();
    assert_eq!(text, "let x = 1 // done\n");
}
