use crate::expression::binary::BinaryOp;
use crate::expression::unary::UnaryOp;

/// Parsed style expression before lowering into an arena.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Expr {
    Number(f64),
    /// Quoted text: a category literal, or an image URL inside `imageList`.
    Text(String),
    /// Hex color literal, `#` included.
    Hex(String),
    /// Bare identifier: a named color or a named palette.
    Ident(String),
    Prop(String),
    Array(Vec<Expr>),
    Unary {
        op: UnaryOp,
        expr: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Call {
        func: String,
        args: Vec<Expr>,
        /// Byte offset of the function name.
        offset: usize,
    },
}
