//! Lowering of parsed expressions into arena nodes.

use crate::color::palettes::named_palette;
use crate::color::rgba::Rgba;
use crate::expression::arena::ExprArena;
use crate::expression::ast::Expr;
use crate::expression::binary::BinaryOp;
use crate::expression::classifier::ClassifierMethod;
use crate::expression::parser::parse_expr;
use crate::expression::unary::UnaryOp;
use crate::foundation::error::{VizError, VizResult};
use crate::foundation::ids::NodeId;
use crate::types::check_arity;

/// `(name, min arity, max arity)` of every non-operator function.
const FUNCTIONS: &[(&str, usize, usize)] = &[
    ("ramp", 2, 3),
    ("buckets", 2, 2),
    ("top", 2, 2),
    ("linear", 1, 3),
    ("globalEqIntervals", 2, 2),
    ("globalQuantiles", 2, 2),
    ("globalStandardDev", 2, 3),
    ("imageList", 1, 1),
    ("rgba", 4, 4),
    ("now", 0, 0),
];

const DEFAULT_CLASS_SIZE: f64 = 1.0;

fn arity_of(func: &str) -> Option<(&'static str, usize, usize)> {
    if let Some(&(name, min, max)) = FUNCTIONS
        .iter()
        .find(|(name, _, _)| name.eq_ignore_ascii_case(func))
    {
        return Some((name, min, max));
    }
    if let Some(op) = UnaryOp::from_name(&func.to_ascii_lowercase()) {
        return Some((op.name(), 1, 1));
    }
    BinaryOp::from_name(&func.to_ascii_lowercase()).map(|op| (op.name(), 2, 2))
}

impl ExprArena {
    /// Parse `src` and lower it into this arena; returns the root.
    pub fn parse(&mut self, src: &str) -> VizResult<NodeId> {
        let expr = parse_expr(src)?;
        self.lower(&expr)
    }

    pub(crate) fn lower(&mut self, expr: &Expr) -> VizResult<NodeId> {
        match expr {
            Expr::Number(v) => Ok(self.number(*v)),
            Expr::Text(s) => Ok(self.category(s.clone())),
            Expr::Hex(s) => self.hex_color(s),
            Expr::Ident(name) => {
                if let Some(c) = Rgba::from_name(name) {
                    Ok(self.color(c))
                } else if named_palette(name).is_some() {
                    self.palette(name)
                } else {
                    Err(VizError::validation(format!(
                        "unknown identifier '{name}': expected a color or palette name"
                    )))
                }
            }
            Expr::Prop(name) => Ok(self.property(name.clone())),
            Expr::Array(items) => {
                let elems = items
                    .iter()
                    .map(|e| self.lower(e))
                    .collect::<VizResult<Vec<_>>>()?;
                Ok(self.array(elems))
            }
            Expr::Unary { op, expr } => {
                let input = self.lower(expr)?;
                Ok(self.unary(*op, input))
            }
            Expr::Binary { op, left, right } => {
                let l = self.lower(left)?;
                let r = self.lower(right)?;
                Ok(self.binary(*op, l, r))
            }
            Expr::Call { func, args, offset } => self.lower_call(func, args, *offset),
        }
    }

    fn lower_call(&mut self, func: &str, args: &[Expr], offset: usize) -> VizResult<NodeId> {
        let Some((name, min, max)) = arity_of(func) else {
            return Err(VizError::validation(format!(
                "unknown function '{func}' at byte {offset}"
            )));
        };
        check_arity(name, min, max, args.len())?;

        if let Some(op) = UnaryOp::from_name(name) {
            let input = self.lower(&args[0])?;
            return Ok(self.unary(op, input));
        }
        if let Some(op) = BinaryOp::from_name(name) {
            let l = self.lower(&args[0])?;
            let r = self.lower(&args[1])?;
            return Ok(self.binary(op, l, r));
        }

        match name {
            "ramp" => {
                let input = self.lower(&args[0])?;
                let palette = self.lower(&args[1])?;
                let others = args.get(2).map(|e| self.lower(e)).transpose()?;
                self.ramp(input, palette, others)
            }
            "buckets" => {
                let input = self.lower(&args[0])?;
                let Expr::Array(items) = &args[1] else {
                    return Err(VizError::validation(
                        "buckets: invalid parameter 'list' (#1): expected a [..] list",
                    ));
                };
                let list = items
                    .iter()
                    .map(|e| self.lower(e))
                    .collect::<VizResult<Vec<_>>>()?;
                self.buckets(input, list)
            }
            "top" => {
                let property = self.lower(&args[0])?;
                let count = literal_number(name, "buckets", 1, &args[1])?;
                self.top(property, count)
            }
            "linear" => {
                if args.len() == 2 {
                    return Err(VizError::validation(
                        "linear: expected either 1 or 3 arguments, got 2",
                    ));
                }
                let input = self.lower(&args[0])?;
                let bounds = match (args.get(1), args.get(2)) {
                    (Some(min), Some(max)) => Some((self.lower(min)?, self.lower(max)?)),
                    _ => None,
                };
                Ok(self.linear(input, bounds))
            }
            "globalEqIntervals" | "globalQuantiles" | "globalStandardDev" => {
                let input = self.lower(&args[0])?;
                let buckets = literal_number(name, "buckets", 1, &args[1])?;
                let method = match name {
                    "globalEqIntervals" => ClassifierMethod::GlobalEqIntervals,
                    "globalQuantiles" => ClassifierMethod::GlobalQuantiles,
                    _ => ClassifierMethod::GlobalStandardDev {
                        class_size: args
                            .get(2)
                            .map(|e| literal_number(name, "classSize", 2, e))
                            .transpose()?
                            .unwrap_or(DEFAULT_CLASS_SIZE),
                    },
                };
                self.classifier(input, method, buckets)
            }
            "imageList" => {
                let Expr::Array(items) = &args[0] else {
                    return Err(VizError::validation(
                        "imageList: invalid parameter 'urls' (#0): expected a [..] list",
                    ));
                };
                let urls = items
                    .iter()
                    .map(|e| match e {
                        Expr::Text(s) => Ok(s.clone()),
                        _ => Err(VizError::validation(
                            "imageList: invalid parameter 'urls' (#0): expected quoted URLs",
                        )),
                    })
                    .collect::<VizResult<Vec<_>>>()?;
                self.image_list(urls)
            }
            "rgba" => {
                let parts = args
                    .iter()
                    .map(|e| self.lower(e))
                    .collect::<VizResult<Vec<_>>>()?;
                Ok(self.rgba(parts[0], parts[1], parts[2], parts[3]))
            }
            "now" => Ok(self.now()),
            _ => Err(VizError::invariant(format!(
                "function '{name}' has an arity entry but no lowering"
            ))),
        }
    }
}

/// Constant numeric argument; `-n` is accepted.
fn literal_number(func: &str, param: &str, index: usize, expr: &Expr) -> VizResult<f64> {
    match expr {
        Expr::Number(v) => Ok(*v),
        Expr::Unary {
            op: UnaryOp::Neg,
            expr,
        } => literal_number(func, param, index, expr).map(|v| -v),
        _ => Err(VizError::validation(format!(
            "{func}: invalid parameter '{param}' (#{index}): expected a number literal"
        ))),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/expression/lower.rs"]
mod tests;
