//! Classification of a continuous input into ordered classes.
//!
//! A classifier with `N` classes keeps `N - 1` breakpoints. Evaluation returns
//! `k / max(N - 1, 1)` for the first breakpoint `k` the value does not exceed,
//! and the constant `1` when the value is above every breakpoint.

use std::sync::RwLock;

use crate::foundation::error::{VizError, VizResult};
use crate::foundation::ids::NodeId;
use crate::metadata::PropertyMeta;

/// Strategy used to place breakpoints from dataset statistics.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClassifierMethod {
    /// Evenly spaced over the property's `[min, max]`.
    GlobalEqIntervals,
    /// Quantiles of the property sample.
    GlobalQuantiles,
    /// Centered on the mean, `class_size` standard deviations apart.
    GlobalStandardDev { class_size: f64 },
}

impl ClassifierMethod {
    pub fn name(self) -> &'static str {
        match self {
            Self::GlobalEqIntervals => "globalEqIntervals",
            Self::GlobalQuantiles => "globalQuantiles",
            Self::GlobalStandardDev { .. } => "globalStandardDev",
        }
    }
}

#[derive(Debug)]
pub(crate) struct ClassifierNode {
    pub(crate) input: NodeId,
    pub(crate) method: ClassifierMethod,
    pub(crate) num_categories: usize,
    pub(crate) breakpoints: RwLock<Vec<f64>>,
}

impl ClassifierNode {
    pub(crate) fn new(input: NodeId, method: ClassifierMethod, buckets: f64) -> VizResult<Self> {
        if !(buckets.is_finite() && buckets.fract() == 0.0 && buckets >= 2.0) {
            return Err(VizError::validation(format!(
                "{}: invalid parameter 'buckets' (#1): expected an integer >= 2, got {buckets}",
                method.name()
            )));
        }
        if let ClassifierMethod::GlobalStandardDev { class_size } = method
            && !(class_size.is_finite() && class_size > 0.0)
        {
            return Err(VizError::validation(format!(
                "globalStandardDev: invalid parameter 'classSize' (#2): expected a positive number, got {class_size}"
            )));
        }
        let num_categories = buckets as usize;
        Ok(Self {
            input,
            method,
            num_categories,
            breakpoints: RwLock::new(vec![0.0; num_categories - 1]),
        })
    }

    pub(crate) fn breakpoints(&self) -> VizResult<Vec<f64>> {
        self.breakpoints
            .read()
            .map(|bp| bp.clone())
            .map_err(|_| VizError::invariant("classifier breakpoints lock poisoned"))
    }

    /// Recompute breakpoints from the input property's statistics.
    pub(crate) fn gen_breakpoints(&self, property: &str, meta: &PropertyMeta) -> VizResult<()> {
        let generated = generate(self.method, self.num_categories, property, meta)?;
        tracing::debug!(
            method = self.method.name(),
            property,
            breakpoints = ?generated,
            "classifier breakpoints regenerated"
        );
        let mut slot = self
            .breakpoints
            .write()
            .map_err(|_| VizError::invariant("classifier breakpoints lock poisoned"))?;
        *slot = generated;
        Ok(())
    }

    pub(crate) fn classify(&self, value: f64) -> VizResult<f64> {
        let bps = self
            .breakpoints
            .read()
            .map_err(|_| VizError::invariant("classifier breakpoints lock poisoned"))?;
        if bps.len() + 1 != self.num_categories {
            return Err(VizError::invariant(format!(
                "classifier has {} breakpoints for {} classes",
                bps.len(),
                self.num_categories
            )));
        }
        let divisor = self.num_categories.saturating_sub(1).max(1) as f64;
        Ok(bps
            .iter()
            .position(|bp| value <= *bp)
            .map_or(1.0, |i| i as f64 / divisor))
    }
}

fn generate(
    method: ClassifierMethod,
    num_categories: usize,
    property: &str,
    meta: &PropertyMeta,
) -> VizResult<Vec<f64>> {
    let count = num_categories - 1;
    match method {
        ClassifierMethod::GlobalEqIntervals => {
            let (Some(min), Some(max)) = (meta.min, meta.max) else {
                return Err(VizError::validation(format!(
                    "globalEqIntervals: property '{property}' has no min/max statistics"
                )));
            };
            if max < min {
                return Err(VizError::validation(format!(
                    "globalEqIntervals: property '{property}' has max {max} < min {min}"
                )));
            }
            let n = num_categories as f64;
            Ok((0..count)
                .map(|i| min + (max - min) * (i + 1) as f64 / n)
                .collect())
        }
        ClassifierMethod::GlobalQuantiles => {
            let mut sample: Vec<f64> = meta.sample.iter().copied().filter(|v| !v.is_nan()).collect();
            if sample.is_empty() {
                return Err(VizError::validation(format!(
                    "globalQuantiles: property '{property}' has no sample"
                )));
            }
            sample.sort_by(f64::total_cmp);
            let len = sample.len();
            Ok((0..count)
                .map(|i| sample[((i + 1) * len / num_categories).min(len - 1)])
                .collect())
        }
        ClassifierMethod::GlobalStandardDev { class_size } => {
            let (avg, stddev) = mean_and_stddev(property, meta)?;
            let center = (num_categories as f64 - 2.0) / 2.0;
            Ok((0..count)
                .map(|i| avg + (i as f64 - center) * class_size * stddev)
                .collect())
        }
    }
}

fn mean_and_stddev(property: &str, meta: &PropertyMeta) -> VizResult<(f64, f64)> {
    if let (Some(avg), Some(stddev)) = (meta.avg, meta.stddev) {
        return Ok((avg, stddev));
    }
    let sample: Vec<f64> = meta.sample.iter().copied().filter(|v| !v.is_nan()).collect();
    if sample.is_empty() {
        return Err(VizError::validation(format!(
            "globalStandardDev: property '{property}' has neither avg/stddev nor a sample"
        )));
    }
    let n = sample.len() as f64;
    let avg = sample.iter().sum::<f64>() / n;
    let var = sample.iter().map(|v| (v - avg) * (v - avg)).sum::<f64>() / n;
    Ok((avg, var.sqrt()))
}

#[cfg(test)]
#[path = "../../tests/unit/expression/classifier.rs"]
mod tests;
