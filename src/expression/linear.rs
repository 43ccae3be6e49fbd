use crate::foundation::ids::NodeId;

/// `(x - min) / (max - min)`; bounds default to the property's metadata range.
#[derive(Debug)]
pub(crate) struct LinearNode {
    pub(crate) input: NodeId,
    pub(crate) min: Option<NodeId>,
    pub(crate) max: Option<NodeId>,
}

pub(crate) fn normalize(x: f64, min: f64, max: f64) -> f64 {
    (x - min) / (max - min)
}
