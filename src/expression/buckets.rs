use crate::expression::value::Value;
use crate::foundation::ids::NodeId;

/// Explicit classification: numeric thresholds or a list of categories.
#[derive(Debug)]
pub(crate) struct BucketsNode {
    pub(crate) input: NodeId,
    pub(crate) list: Vec<NodeId>,
    pub(crate) categorical: bool,
}

impl BucketsNode {
    pub(crate) fn num_categories(&self) -> usize {
        self.list.len() + 1
    }
}

/// Index of the bucket `value` falls in; `bounds.len()` is the trailing "others" bucket.
pub(crate) fn bucket_index(value: &Value, bounds: &[Value], categorical: bool) -> usize {
    let hit = if categorical {
        match value {
            Value::Category(id) => bounds
                .iter()
                .position(|b| matches!(b, Value::Category(other) if other == id)),
            _ => None,
        }
    } else {
        let v = value.as_f64();
        bounds.iter().position(|b| v < b.as_f64())
    };
    hit.unwrap_or(bounds.len())
}

#[cfg(test)]
#[path = "../../tests/unit/expression/buckets.rs"]
mod tests;
