use crate::foundation::ids::NodeId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
    Abs,
    Sign,
    Sqrt,
    Log,
    Sin,
    Cos,
    Tan,
    Floor,
    Ceil,
}

#[derive(Debug)]
pub(crate) struct UnaryNode {
    pub(crate) op: UnaryOp,
    pub(crate) input: NodeId,
}

const ALL: [UnaryOp; 11] = [
    UnaryOp::Neg,
    UnaryOp::Not,
    UnaryOp::Abs,
    UnaryOp::Sign,
    UnaryOp::Sqrt,
    UnaryOp::Log,
    UnaryOp::Sin,
    UnaryOp::Cos,
    UnaryOp::Tan,
    UnaryOp::Floor,
    UnaryOp::Ceil,
];

impl UnaryOp {
    pub fn name(self) -> &'static str {
        match self {
            Self::Neg => "neg",
            Self::Not => "not",
            Self::Abs => "abs",
            Self::Sign => "sign",
            Self::Sqrt => "sqrt",
            Self::Log => "log",
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Floor => "floor",
            Self::Ceil => "ceil",
        }
    }

    pub(crate) fn from_name(name: &str) -> Option<Self> {
        ALL.iter().copied().find(|op| op.name() == name)
    }

    pub(crate) fn eval(self, x: f64) -> f64 {
        match self {
            Self::Neg => -x,
            Self::Not => 1.0 - x,
            Self::Abs => x.abs(),
            // GLSL sign(): 0 stays 0.
            Self::Sign => {
                if x > 0.0 {
                    1.0
                } else if x < 0.0 {
                    -1.0
                } else {
                    x
                }
            }
            Self::Sqrt => x.sqrt(),
            Self::Log => x.ln(),
            Self::Sin => x.sin(),
            Self::Cos => x.cos(),
            Self::Tan => x.tan(),
            Self::Floor => x.floor(),
            Self::Ceil => x.ceil(),
        }
    }

    pub(crate) fn glsl(self, x: &str) -> String {
        match self {
            Self::Neg => format!("(-{x})"),
            Self::Not => format!("(1.0 - {x})"),
            Self::Abs => format!("abs({x})"),
            Self::Sign => format!("sign({x})"),
            Self::Sqrt => format!("sqrt({x})"),
            Self::Log => format!("log({x})"),
            Self::Sin => format!("sin({x})"),
            Self::Cos => format!("cos({x})"),
            Self::Tan => format!("tan({x})"),
            Self::Floor => format!("floor({x})"),
            Self::Ceil => format!("ceil({x})"),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/expression/unary.rs"]
mod tests;
