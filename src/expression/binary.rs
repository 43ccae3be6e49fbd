//! Binary operator family: one signature table and one GLSL template per operator.

use crate::color::rgba::Rgba;
use crate::expression::value::Value;
use crate::foundation::error::{VizError, VizResult};
use crate::foundation::ids::NodeId;
use crate::types::{
    CATEGORIES_TO_NUMBER, COLORS_TO_COLOR, DATES_TO_DATES, NUMBER_AND_COLOR_TO_COLOR,
    NUMBERS_TO_NUMBER, SignatureMask, ValueType, signature_of,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

type HostFn = fn(&Value, &Value) -> Value;

/// Static configuration of one operator.
pub(crate) struct BinarySpec {
    pub(crate) name: &'static str,
    pub(crate) allowed: SignatureMask,
    pub(crate) methods: &'static [(SignatureMask, HostFn)],
    pub(crate) glsl: fn(&str, &str) -> String,
    /// Comparisons and logic always produce a number.
    pub(crate) yields_number: bool,
}

#[derive(Debug)]
pub(crate) struct BinaryNode {
    pub(crate) op: BinaryOp,
    pub(crate) left: NodeId,
    pub(crate) right: NodeId,
    pub(crate) signature: Option<SignatureMask>,
}

impl BinaryOp {
    pub fn name(self) -> &'static str {
        self.spec().name
    }

    pub(crate) fn from_name(name: &str) -> Option<Self> {
        ALL.iter().copied().find(|op| op.name() == name)
    }

    pub(crate) fn spec(self) -> &'static BinarySpec {
        match self {
            Self::Add => &ADD,
            Self::Sub => &SUB,
            Self::Mul => &MUL,
            Self::Div => &DIV,
            Self::Mod => &MOD,
            Self::Pow => &POW,
            Self::Eq => &EQ,
            Self::Ne => &NE,
            Self::Lt => &LT,
            Self::Le => &LE,
            Self::Gt => &GT,
            Self::Ge => &GE,
            Self::And => &AND,
            Self::Or => &OR,
        }
    }
}

const ALL: [BinaryOp; 14] = [
    BinaryOp::Add,
    BinaryOp::Sub,
    BinaryOp::Mul,
    BinaryOp::Div,
    BinaryOp::Mod,
    BinaryOp::Pow,
    BinaryOp::Eq,
    BinaryOp::Ne,
    BinaryOp::Lt,
    BinaryOp::Le,
    BinaryOp::Gt,
    BinaryOp::Ge,
    BinaryOp::And,
    BinaryOp::Or,
];

/// Match operand types against the operator's mask; returns the signature bit and output type.
pub(crate) fn resolve_signature(
    op: BinaryOp,
    left: Option<ValueType>,
    right: Option<ValueType>,
) -> VizResult<(SignatureMask, ValueType)> {
    let spec = op.spec();
    let (Some(a), Some(b)) = (left, right) else {
        return Err(VizError::type_error(format!(
            "{}: operand types are unresolved",
            spec.name
        )));
    };

    let sig = signature_of(a, b);
    if sig & spec.allowed == 0 {
        // Blame the right operand when the left one can pair with something.
        let left_ok = ALL_TYPES
            .iter()
            .any(|&t| signature_of(a, t) & spec.allowed != 0);
        let (param, index, ty) = if left_ok { ("y", 1, b) } else { ("x", 0, a) };
        return Err(VizError::type_error(format!(
            "{}: invalid parameter '{param}' (#{index}) of type {ty} (other operand: {})",
            spec.name,
            if left_ok { a } else { b }
        )));
    }

    let out = if spec.yields_number {
        ValueType::Number
    } else {
        match sig {
            NUMBER_AND_COLOR_TO_COLOR | COLORS_TO_COLOR => ValueType::Color,
            DATES_TO_DATES => ValueType::Date,
            _ => ValueType::Number,
        }
    };
    Ok((sig, out))
}

const ALL_TYPES: [ValueType; 5] = [
    ValueType::Number,
    ValueType::Category,
    ValueType::Color,
    ValueType::Date,
    ValueType::Image,
];

pub(crate) fn eval_binary(op: BinaryOp, sig: SignatureMask, a: &Value, b: &Value) -> Value {
    match op.spec().methods.iter().find(|(mask, _)| *mask == sig) {
        Some((_, f)) => f(a, b),
        None => Value::Null,
    }
}

fn bool_num(v: bool) -> Value {
    Value::Number(if v { 1.0 } else { 0.0 })
}

fn unit_of(v: &Value) -> [f64; 4] {
    match v {
        Value::Color(c) => c.to_unit(),
        other => [other.as_f64(); 4],
    }
}

fn color_op(a: &Value, b: &Value, f: fn(f64, f64) -> f64) -> Value {
    let (x, y) = (unit_of(a), unit_of(b));
    Value::Color(Rgba::from_unit([
        f(x[0], y[0]),
        f(x[1], y[1]),
        f(x[2], y[2]),
        f(x[3], y[3]),
    ]))
}

/// GLSL `mod`, which floors instead of truncating.
fn glsl_mod(x: f64, y: f64) -> f64 {
    x - y * (x / y).floor()
}

fn add_numbers(a: &Value, b: &Value) -> Value {
    Value::Number(a.as_f64() + b.as_f64())
}
fn add_colors(a: &Value, b: &Value) -> Value {
    color_op(a, b, |x, y| x + y)
}
fn sub_numbers(a: &Value, b: &Value) -> Value {
    Value::Number(a.as_f64() - b.as_f64())
}
fn sub_colors(a: &Value, b: &Value) -> Value {
    color_op(a, b, |x, y| x - y)
}
fn mul_numbers(a: &Value, b: &Value) -> Value {
    Value::Number(a.as_f64() * b.as_f64())
}
fn mul_colors(a: &Value, b: &Value) -> Value {
    color_op(a, b, |x, y| x * y)
}
fn div_numbers(a: &Value, b: &Value) -> Value {
    Value::Number(a.as_f64() / b.as_f64())
}
fn div_colors(a: &Value, b: &Value) -> Value {
    color_op(a, b, |x, y| x / y)
}
fn mod_numbers(a: &Value, b: &Value) -> Value {
    Value::Number(glsl_mod(a.as_f64(), b.as_f64()))
}
fn pow_numbers(a: &Value, b: &Value) -> Value {
    Value::Number(a.as_f64().powf(b.as_f64()))
}
fn eq_values(a: &Value, b: &Value) -> Value {
    bool_num(a.as_f64() == b.as_f64())
}
fn ne_values(a: &Value, b: &Value) -> Value {
    bool_num(a.as_f64() != b.as_f64())
}
fn lt_values(a: &Value, b: &Value) -> Value {
    bool_num(a.as_f64() < b.as_f64())
}
fn le_values(a: &Value, b: &Value) -> Value {
    bool_num(a.as_f64() <= b.as_f64())
}
fn gt_values(a: &Value, b: &Value) -> Value {
    bool_num(a.as_f64() > b.as_f64())
}
fn ge_values(a: &Value, b: &Value) -> Value {
    bool_num(a.as_f64() >= b.as_f64())
}
fn and_numbers(a: &Value, b: &Value) -> Value {
    Value::Number(a.as_f64() * b.as_f64())
}
fn or_numbers(a: &Value, b: &Value) -> Value {
    Value::Number((a.as_f64() + b.as_f64()).min(1.0))
}

static ADD: BinarySpec = BinarySpec {
    name: "add",
    allowed: NUMBERS_TO_NUMBER | COLORS_TO_COLOR,
    methods: &[
        (NUMBERS_TO_NUMBER, add_numbers),
        (COLORS_TO_COLOR, add_colors),
    ],
    glsl: |x, y| format!("({x} + {y})"),
    yields_number: false,
};

static SUB: BinarySpec = BinarySpec {
    name: "sub",
    allowed: NUMBERS_TO_NUMBER | COLORS_TO_COLOR,
    methods: &[
        (NUMBERS_TO_NUMBER, sub_numbers),
        (COLORS_TO_COLOR, sub_colors),
    ],
    glsl: |x, y| format!("({x} - {y})"),
    yields_number: false,
};

static MUL: BinarySpec = BinarySpec {
    name: "mul",
    allowed: NUMBERS_TO_NUMBER | NUMBER_AND_COLOR_TO_COLOR | COLORS_TO_COLOR,
    methods: &[
        (NUMBERS_TO_NUMBER, mul_numbers),
        (NUMBER_AND_COLOR_TO_COLOR, mul_colors),
        (COLORS_TO_COLOR, mul_colors),
    ],
    glsl: |x, y| format!("({x} * {y})"),
    yields_number: false,
};

static DIV: BinarySpec = BinarySpec {
    name: "div",
    allowed: NUMBERS_TO_NUMBER | NUMBER_AND_COLOR_TO_COLOR,
    methods: &[
        (NUMBERS_TO_NUMBER, div_numbers),
        (NUMBER_AND_COLOR_TO_COLOR, div_colors),
    ],
    glsl: |x, y| format!("({x} / {y})"),
    yields_number: false,
};

static MOD: BinarySpec = BinarySpec {
    name: "mod",
    allowed: NUMBERS_TO_NUMBER,
    methods: &[(NUMBERS_TO_NUMBER, mod_numbers)],
    glsl: |x, y| format!("mod({x}, {y})"),
    yields_number: false,
};

static POW: BinarySpec = BinarySpec {
    name: "pow",
    allowed: NUMBERS_TO_NUMBER,
    methods: &[(NUMBERS_TO_NUMBER, pow_numbers)],
    glsl: |x, y| format!("pow({x}, {y})"),
    yields_number: false,
};

static EQ: BinarySpec = BinarySpec {
    name: "eq",
    allowed: NUMBERS_TO_NUMBER | CATEGORIES_TO_NUMBER | DATES_TO_DATES,
    methods: &[
        (NUMBERS_TO_NUMBER, eq_values),
        (CATEGORIES_TO_NUMBER, eq_values),
        (DATES_TO_DATES, eq_values),
    ],
    glsl: |x, y| format!("({x}=={y}? 1.:0.)"),
    yields_number: true,
};

static NE: BinarySpec = BinarySpec {
    name: "neq",
    allowed: NUMBERS_TO_NUMBER | CATEGORIES_TO_NUMBER | DATES_TO_DATES,
    methods: &[
        (NUMBERS_TO_NUMBER, ne_values),
        (CATEGORIES_TO_NUMBER, ne_values),
        (DATES_TO_DATES, ne_values),
    ],
    glsl: |x, y| format!("({x}!={y}? 1.:0.)"),
    yields_number: true,
};

static LT: BinarySpec = BinarySpec {
    name: "lt",
    allowed: NUMBERS_TO_NUMBER | DATES_TO_DATES,
    methods: &[(NUMBERS_TO_NUMBER, lt_values), (DATES_TO_DATES, lt_values)],
    glsl: |x, y| format!("({x}<{y}? 1.:0.)"),
    yields_number: true,
};

static LE: BinarySpec = BinarySpec {
    name: "lte",
    allowed: NUMBERS_TO_NUMBER | DATES_TO_DATES,
    methods: &[(NUMBERS_TO_NUMBER, le_values), (DATES_TO_DATES, le_values)],
    glsl: |x, y| format!("({x}<={y}? 1.:0.)"),
    yields_number: true,
};

static GT: BinarySpec = BinarySpec {
    name: "gt",
    allowed: NUMBERS_TO_NUMBER | DATES_TO_DATES,
    methods: &[(NUMBERS_TO_NUMBER, gt_values), (DATES_TO_DATES, gt_values)],
    glsl: |x, y| format!("({x}>{y}? 1.:0.)"),
    yields_number: true,
};

static GE: BinarySpec = BinarySpec {
    name: "gte",
    allowed: NUMBERS_TO_NUMBER | DATES_TO_DATES,
    methods: &[(NUMBERS_TO_NUMBER, ge_values), (DATES_TO_DATES, ge_values)],
    glsl: |x, y| format!("({x}>={y}? 1.:0.)"),
    yields_number: true,
};

static AND: BinarySpec = BinarySpec {
    name: "and",
    allowed: NUMBERS_TO_NUMBER,
    methods: &[(NUMBERS_TO_NUMBER, and_numbers)],
    glsl: |x, y| format!("({x} * {y})"),
    yields_number: true,
};

static OR: BinarySpec = BinarySpec {
    name: "or",
    allowed: NUMBERS_TO_NUMBER,
    methods: &[(NUMBERS_TO_NUMBER, or_numbers)],
    glsl: |x, y| format!("min({x} + {y}, 1.)"),
    yields_number: true,
};

#[cfg(test)]
#[path = "../../tests/unit/expression/binary.rs"]
mod tests;
