use crate::color::rgba::Rgba;
use crate::foundation::ids::CategoryId;

/// Host-side result of evaluating an expression for one feature.
///
/// Booleans are encoded as numbers (`1` / `0`), matching the shader side.
/// `Null` means "no value": the feature is not rendered.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Category(CategoryId),
    Color(Rgba),
    /// Milliseconds since the Unix epoch.
    Date(f64),
    /// Image reference (URL or path).
    Image(String),
    Null,
}

impl Value {
    /// Numeric view used by operators; categories compare by id.
    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Number(v) | Self::Date(v) => *v,
            Self::Category(id) => f64::from(id.0),
            Self::Color(_) | Self::Image(_) | Self::Null => f64::NAN,
        }
    }

    pub fn as_color(&self) -> Option<Rgba> {
        match self {
            Self::Color(c) => Some(*c),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<Rgba> for Value {
    fn from(c: Rgba) -> Self {
        Self::Color(c)
    }
}
