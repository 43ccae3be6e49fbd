use std::collections::HashMap;

use crate::expression::value::Value;
use crate::feature::{Feature, PropertyValue};
use crate::foundation::ids::CategoryId;
use crate::metadata::{Metadata, PropertyKind};

#[derive(Debug)]
pub(crate) struct PropertyNode {
    pub(crate) name: String,
    pub(crate) kind: Option<PropertyKind>,
}

impl PropertyNode {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: None,
        }
    }

    /// Missing numbers read as NaN, unknown categories as [`Value::Null`].
    pub(crate) fn eval(&self, metadata: &Metadata, feature: &dyn Feature) -> Value {
        let raw = feature.property(&self.name);
        match self.kind {
            Some(PropertyKind::Category) => match raw {
                Some(PropertyValue::Text(name)) => metadata
                    .categories()
                    .id(name)
                    .map_or(Value::Null, Value::Category),
                _ => Value::Null,
            },
            Some(PropertyKind::Date) => Value::Date(number_of(raw)),
            Some(PropertyKind::Number) | None => Value::Number(number_of(raw)),
        }
    }
}

fn number_of(raw: Option<&PropertyValue>) -> f64 {
    match raw {
        Some(PropertyValue::Number(v)) => *v,
        Some(PropertyValue::Text(s)) => s.trim().parse().unwrap_or(f64::NAN),
        None => f64::NAN,
    }
}

/// Frequency rank of every category of `property`, keyed by dataset-wide id.
pub(crate) fn category_ranks(
    metadata: &Metadata,
    property: &str,
    limit: Option<usize>,
) -> HashMap<CategoryId, usize> {
    let Some(meta) = metadata.properties.get(property) else {
        return HashMap::new();
    };
    let table = metadata.categories();
    meta.categories
        .iter()
        .take(limit.unwrap_or(usize::MAX))
        .enumerate()
        .filter_map(|(rank, c)| table.id(&c.name).map(|id| (id, rank)))
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/expression/property.rs"]
mod tests;
