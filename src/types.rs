//! Value kinds of the expression language and the signature masks used by operators.

use crate::foundation::error::{VizError, VizResult};
use std::fmt;

/// Output kind of an expression node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueType {
    Number,
    Category,
    Color,
    Date,
    Image,
}

impl ValueType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Category => "category",
            Self::Color => "color",
            Self::Date => "date",
            Self::Image => "image",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bitmask over the operand-type pairs an operator accepts.
pub type SignatureMask = u8;

pub const UNSUPPORTED_SIGNATURE: SignatureMask = 0;
pub const NUMBERS_TO_NUMBER: SignatureMask = 1;
pub const NUMBER_AND_COLOR_TO_COLOR: SignatureMask = 2;
pub const COLORS_TO_COLOR: SignatureMask = 4;
pub const CATEGORIES_TO_NUMBER: SignatureMask = 8;
pub const IMAGES_TO_IMAGE: SignatureMask = 16;
pub const DATES_TO_DATES: SignatureMask = 32;

/// Classify a pair of operand types into exactly one signature bit.
pub fn signature_of(a: ValueType, b: ValueType) -> SignatureMask {
    use ValueType::*;
    match (a, b) {
        (Number, Number) => NUMBERS_TO_NUMBER,
        (Number, Color) | (Color, Number) => NUMBER_AND_COLOR_TO_COLOR,
        (Color, Color) => COLORS_TO_COLOR,
        (Category, Category) => CATEGORIES_TO_NUMBER,
        (Image, Image) => IMAGES_TO_IMAGE,
        (Date, Date) => DATES_TO_DATES,
        _ => UNSUPPORTED_SIGNATURE,
    }
}

/// Generic arity check shared by every constructor.
pub(crate) fn check_arity(name: &str, min: usize, max: usize, got: usize) -> VizResult<()> {
    if got > max {
        return Err(VizError::validation(format!(
            "{name}: expected at most {max} argument(s), got {got}"
        )));
    }
    if got < min {
        return Err(VizError::validation(format!(
            "{name}: expected at least {min} argument(s), got {got}"
        )));
    }
    Ok(())
}

/// Fail with a type error unless `actual` is one of `expected`.
pub(crate) fn check_type(
    name: &str,
    param: &str,
    index: usize,
    expected: &[ValueType],
    actual: Option<ValueType>,
) -> VizResult<ValueType> {
    match actual {
        Some(t) if expected.contains(&t) => Ok(t),
        other => {
            let expected = expected
                .iter()
                .map(|t| t.as_str())
                .collect::<Vec<_>>()
                .join(" | ");
            let actual = other.map_or("unresolved", ValueType::as_str);
            Err(VizError::type_error(format!(
                "{name}: invalid parameter '{param}' (#{index}): expected {expected}, got {actual}"
            )))
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/types.rs"]
mod tests;
