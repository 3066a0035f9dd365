use common::Value;

/// Binary operators, ordered here roughly by binding strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Or,
    And,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    /// `x in xs`: membership in a list, or substring of a string.
    In,
    NotIn,
    /// `xs contains x`: the mirror of `In` with operands swapped.
    Contains,
    /// `s startswith p` / `s endswith p`: string prefix and suffix tests.
    StartsWith,
    EndsWith,
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
}

/// A parsed expression tree. Field nodes resolve against the snapshot at
/// evaluation time; everything else is self-contained.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Value),
    Field(String),
    List(Vec<Expr>),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
}
