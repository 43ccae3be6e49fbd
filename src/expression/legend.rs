use crate::expression::value::Value;
use crate::foundation::error::{VizError, VizResult};

/// Upper bound on numeric legend samples.
pub const MAX_SAMPLES: usize = 100;
pub const DEFAULT_SAMPLES: usize = 10;
pub const DEFAULT_OTHERS_LABEL: &str = "CARTOVL_OTHERS";

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LegendOptions {
    /// Evenly spaced samples taken for numeric inputs.
    pub samples: usize,
    /// Key of the trailing "others" entry of categorical legends.
    pub others_label: String,
}

impl Default for LegendOptions {
    fn default() -> Self {
        Self {
            samples: DEFAULT_SAMPLES,
            others_label: DEFAULT_OTHERS_LABEL.to_owned(),
        }
    }
}

impl LegendOptions {
    pub(crate) fn validate(&self) -> VizResult<()> {
        if self.samples == 0 || self.samples > MAX_SAMPLES {
            return Err(VizError::validation(format!(
                "legend samples must be in 1..={MAX_SAMPLES}, got {}",
                self.samples
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendKind {
    Category,
    Number,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum LegendKey {
    Name(String),
    Number(f64),
    /// `[lower, upper]`; `None` marks an open end.
    Range([Option<f64>; 2]),
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct LegendEntry {
    pub key: LegendKey,
    pub value: Value,
}

/// Key to output mapping of one ramp, as consumed by legend UIs.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Legend {
    #[serde(rename = "type")]
    pub kind: LegendKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    pub data: Vec<LegendEntry>,
}

#[cfg(test)]
#[path = "../../tests/unit/expression/legend.rs"]
mod tests;
