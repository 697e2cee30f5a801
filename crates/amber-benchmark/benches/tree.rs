use std::hint::black_box;

use amber_syntax::SyntaxKind::*;
use amber_syntax::{
    GreenElement, GreenNode, GreenToken, GreenTrivia, SyntaxKind, SyntaxNode, TriviaPiece,
};
use codspeed_criterion_compat::{Criterion, criterion_group, criterion_main};

fn token(kind: SyntaxKind, text: &str) -> GreenElement {
    GreenToken::new(
        kind,
        GreenTrivia::empty(),
        text,
        GreenTrivia::new([TriviaPiece::whitespace(" ")]),
    )
    .into()
}

fn build_file(stmts: usize) -> GreenNode {
    let mut list = GreenNode::new(STMT_LIST, Vec::new());
    for index in 0..stmts {
        let literal = GreenNode::new(LITERAL, vec![Some(token(NUMBER, &index.to_string()))]);
        let stmt = GreenNode::new(
            LET_STMT,
            vec![
                Some(token(LET_KW, "let")),
                Some(token(NAME, "x")),
                Some(token(EQ, "=")),
                Some(literal.into()),
                Some(token(SEMICOLON, ";")),
            ],
        );
        list = list.append(stmt.into());
    }
    GreenNode::new(SOURCE_FILE, vec![Some(list.into())])
}

fn benchmark_build(c: &mut Criterion) {
    c.bench_function("build 1k statements", |b| b.iter(|| black_box(build_file(1_000))));
}

fn benchmark_walk(c: &mut Criterion) {
    let root = SyntaxNode::new_root(build_file(1_000));
    c.bench_function("walk tokens", |b| b.iter(|| black_box(root.tokens().count())));
    c.bench_function("reconstruct text", |b| b.iter(|| black_box(root.text())));
}

fn benchmark_edit(c: &mut Criterion) {
    let root = SyntaxNode::new_root(build_file(1_000));
    let replacement = GreenNode::new(LITERAL, vec![Some(token(NUMBER, "42"))]);

    c.bench_function("replace one initializer", |b| {
        b.iter(|| {
            let stmt = root.child_node(0).unwrap().child_node(500).unwrap();
            black_box(stmt.replacing_child(3, Some(replacement.clone().into())))
        })
    });
}

criterion_group!(benches, benchmark_build, benchmark_walk, benchmark_edit);
criterion_main!(benches);
