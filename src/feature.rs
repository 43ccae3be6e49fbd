use std::collections::{BTreeMap, HashMap};

/// Raw property value handed over by the tile pipeline.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Number(f64),
    Text(String),
}

/// Read-only, name-indexed view of one feature.
pub trait Feature {
    fn property(&self, name: &str) -> Option<&PropertyValue>;
}

impl Feature for HashMap<String, PropertyValue> {
    fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.get(name)
    }
}

impl Feature for BTreeMap<String, PropertyValue> {
    fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.get(name)
    }
}

/// Feature without properties, used for constant sub-expressions.
pub struct EmptyFeature;

impl Feature for EmptyFeature {
    fn property(&self, _name: &str) -> Option<&PropertyValue> {
        None
    }
}

/// Single-property feature built for legend sampling.
pub(crate) struct SingleProperty {
    name: String,
    value: PropertyValue,
}

impl SingleProperty {
    pub(crate) fn new(name: &str, value: PropertyValue) -> Self {
        Self {
            name: name.to_owned(),
            value,
        }
    }
}

impl Feature for SingleProperty {
    fn property(&self, name: &str) -> Option<&PropertyValue> {
        (name == self.name).then_some(&self.value)
    }
}
