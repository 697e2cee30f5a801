//! Typed wrappers and kind dispatch over positioned views.
//!
//! Category enums (`Stmt`, `Expr`) expose a total `make`: every kind maps to
//! some shape, with `Unknown` as the designated catch-all for error
//! placeholders and unclassified content. `cast` is the checked narrowing to
//! one concrete shape; `expect_cast` traps on mismatch, which indicates a
//! parser or grammar bug rather than a runtime condition.
//!
//! The full generated accessor layer lives outside this crate; the wrappers
//! here exist to pin down the primitives it is built from: slot lookup, kind
//! dispatch, the with-er/append mutations, and trivia replacement.

use crate::SyntaxKind::*;
use crate::{GreenElement, GreenNode, SyntaxNode, SyntaxToken};

pub trait AstNode {
    fn cast(syntax: SyntaxNode) -> Option<Self>
    where
        Self: Sized;

    fn syntax(&self) -> &SyntaxNode;

    /// Narrows to this shape, trapping if the node has a different kind.
    #[track_caller]
    fn expect_cast(syntax: SyntaxNode) -> Self
    where
        Self: Sized,
    {
        let kind = syntax.kind();
        Self::cast(syntax).unwrap_or_else(|| panic!("expected a different shape, got {kind:?}"))
    }
}

macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Clone, Debug, Eq, PartialEq)]
        pub struct $name(SyntaxNode);

        impl AstNode for $name {
            fn cast(syntax: SyntaxNode) -> Option<Self> {
                (syntax.kind() == $kind).then_some(Self(syntax))
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

ast_node!(SourceFile, SOURCE_FILE);
ast_node!(FnDecl, FN_DECL);
ast_node!(LetStmt, LET_STMT);
ast_node!(ExprStmt, EXPR_STMT);
ast_node!(BinaryExpr, BINARY_EXPR);
ast_node!(ParenExpr, PAREN_EXPR);
ast_node!(Literal, LITERAL);
ast_node!(NameRef, NAME_REF);
ast_node!(StmtList, STMT_LIST);
ast_node!(ArgList, ARG_LIST);

/// Any statement shape.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Stmt {
    Let(LetStmt),
    Expr(ExprStmt),
    Fn(FnDecl),
    Unknown(SyntaxNode),
}

impl Stmt {
    /// Total dispatch: every node maps to some statement shape.
    pub fn make(syntax: SyntaxNode) -> Self {
        match syntax.kind() {
            LET_STMT => Self::Let(LetStmt(syntax)),
            EXPR_STMT => Self::Expr(ExprStmt(syntax)),
            FN_DECL => Self::Fn(FnDecl(syntax)),
            _ => Self::Unknown(syntax),
        }
    }

    pub fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::Let(stmt) => stmt.syntax(),
            Self::Expr(stmt) => stmt.syntax(),
            Self::Fn(stmt) => stmt.syntax(),
            Self::Unknown(syntax) => syntax,
        }
    }
}

/// Any expression shape.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Expr {
    Literal(Literal),
    Binary(BinaryExpr),
    Paren(ParenExpr),
    NameRef(NameRef),
    Unknown(SyntaxNode),
}

impl Expr {
    /// Total dispatch: every node maps to some expression shape.
    pub fn make(syntax: SyntaxNode) -> Self {
        match syntax.kind() {
            LITERAL => Self::Literal(Literal(syntax)),
            BINARY_EXPR => Self::Binary(BinaryExpr(syntax)),
            PAREN_EXPR => Self::Paren(ParenExpr(syntax)),
            NAME_REF => Self::NameRef(NameRef(syntax)),
            _ => Self::Unknown(syntax),
        }
    }

    pub fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::Literal(expr) => expr.syntax(),
            Self::Binary(expr) => expr.syntax(),
            Self::Paren(expr) => expr.syntax(),
            Self::NameRef(expr) => expr.syntax(),
            Self::Unknown(syntax) => syntax,
        }
    }
}

impl SourceFile {
    pub fn new(green: GreenNode) -> Self {
        Self::expect_cast(SyntaxNode::new_root(green))
    }

    pub fn stmts(&self) -> Option<StmtList> {
        self.0.child_node(0).map(StmtList::expect_cast)
    }
}

impl FnDecl {
    pub fn name(&self) -> Option<SyntaxToken> {
        self.0.child_token(1)
    }

    pub fn args(&self) -> Option<ArgList> {
        self.0.child_node(2).map(ArgList::expect_cast)
    }

    pub fn body(&self) -> Option<StmtList> {
        self.0.child_node(4).map(StmtList::expect_cast)
    }
}

impl LetStmt {
    pub fn let_token(&self) -> Option<SyntaxToken> {
        self.0.child_token(0)
    }

    pub fn name(&self) -> Option<SyntaxToken> {
        self.0.child_token(1)
    }

    pub fn eq_token(&self) -> Option<SyntaxToken> {
        self.0.child_token(2)
    }

    pub fn initializer(&self) -> Option<Expr> {
        self.0.child_node(3).map(Expr::make)
    }

    pub fn semicolon(&self) -> Option<SyntaxToken> {
        self.0.child_token(4)
    }

    /// Replaces the initializer. Passing `None` clears a required slot, so
    /// the result holds a zero-length missing placeholder there.
    pub fn with_initializer(&self, expr: Option<GreenNode>) -> Self {
        Self::expect_cast(self.0.replacing_child(3, expr.map(GreenElement::from)))
    }
}

impl ExprStmt {
    pub fn expr(&self) -> Option<Expr> {
        self.0.child_node(0).map(Expr::make)
    }
}

impl BinaryExpr {
    pub fn lhs(&self) -> Option<Expr> {
        self.0.child_node(0).map(Expr::make)
    }

    pub fn op(&self) -> Option<SyntaxToken> {
        self.0.child_token(1)
    }

    pub fn rhs(&self) -> Option<Expr> {
        self.0.child_node(2).map(Expr::make)
    }
}

impl ParenExpr {
    pub fn expr(&self) -> Option<Expr> {
        self.0.child_node(1).map(Expr::make)
    }
}

impl Literal {
    pub fn token(&self) -> Option<SyntaxToken> {
        self.0.child_token(0)
    }
}

impl NameRef {
    pub fn token(&self) -> Option<SyntaxToken> {
        self.0.child_token(0)
    }
}

impl StmtList {
    pub fn len(&self) -> usize {
        self.0.green().children().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<Stmt> {
        self.0.child_node(index).map(Stmt::make)
    }

    pub fn iter(&self) -> impl Iterator<Item = Stmt> + '_ {
        (0..self.len()).filter_map(|index| self.get(index))
    }

    /// Appends a statement, returning the list in the newly rooted tree.
    pub fn push(&self, stmt: GreenNode) -> Self {
        Self::expect_cast(self.0.appending(stmt.into()))
    }
}

impl ArgList {
    pub fn len(&self) -> usize {
        self.0.green().children().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<Expr> {
        self.0.child_node(index).map(Expr::make)
    }

    pub fn iter(&self) -> impl Iterator<Item = Expr> + '_ {
        (0..self.len()).filter_map(|index| self.get(index))
    }

    /// Appends an argument, returning the list in the newly rooted tree.
    pub fn push(&self, arg: GreenNode) -> Self {
        Self::expect_cast(self.0.appending(arg.into()))
    }
}
