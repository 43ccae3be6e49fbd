//! Dataset description consumed by `bind_metadata`.

use crate::foundation::error::{VizError, VizResult};
use crate::foundation::ids::CategoryId;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

/// Storage kind of a dataset property.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    Number,
    Category,
    Date,
}

/// One category of a property together with its frequency in the dataset.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CategoryStat {
    pub name: String,
    #[serde(default)]
    pub frequency: u64,
}

/// Statistics of one property.
///
/// `categories` is kept sorted by descending frequency; the position in that
/// list is the property-local category index.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PropertyMeta {
    #[serde(rename = "type")]
    pub kind: PropertyKind,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub avg: Option<f64>,
    #[serde(default)]
    pub stddev: Option<f64>,
    #[serde(default)]
    pub sample: Vec<f64>,
    #[serde(default)]
    pub categories: Vec<CategoryStat>,
}

impl PropertyMeta {
    pub fn number(min: f64, max: f64) -> Self {
        Self {
            kind: PropertyKind::Number,
            min: Some(min),
            max: Some(max),
            avg: None,
            stddev: None,
            sample: Vec::new(),
            categories: Vec::new(),
        }
    }

    pub fn category<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Self {
            kind: PropertyKind::Category,
            min: None,
            max: None,
            avg: None,
            stddev: None,
            sample: Vec::new(),
            categories: names
                .into_iter()
                .map(|name| CategoryStat {
                    name: name.into(),
                    frequency: 0,
                })
                .collect(),
        }
    }

    pub fn with_sample(mut self, sample: Vec<f64>) -> Self {
        self.sample = sample;
        self
    }

    pub fn with_stats(mut self, avg: f64, stddev: f64) -> Self {
        self.avg = Some(avg);
        self.stddev = Some(stddev);
        self
    }
}

/// Bijective name <-> id mapping shared by every node bound to one metadata.
#[derive(Clone, Debug, Default)]
pub struct CategoryTable {
    names: Vec<String>,
    ids: HashMap<String, CategoryId>,
}

impl CategoryTable {
    pub fn intern(&mut self, name: &str) -> CategoryId {
        if let Some(id) = self.ids.get(name) {
            return *id;
        }
        let id = CategoryId(self.names.len() as u32);
        self.names.push(name.to_owned());
        self.ids.insert(name.to_owned(), id);
        id
    }

    pub fn id(&self, name: &str) -> Option<CategoryId> {
        self.ids.get(name).copied()
    }

    pub fn name(&self, id: CategoryId) -> Option<&str> {
        self.names.get(id.0 as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct MetadataDef {
    properties: BTreeMap<String, PropertyMeta>,
    #[serde(default = "default_id_property")]
    id_property: String,
}

fn default_id_property() -> String {
    "cartodb_id".to_owned()
}

/// Dataset metadata: property kinds, ranges and category tables.
#[derive(Clone, Debug)]
pub struct Metadata {
    pub properties: BTreeMap<String, PropertyMeta>,
    pub id_property: String,
    categories: Arc<CategoryTable>,
}

impl Metadata {
    pub fn new(properties: BTreeMap<String, PropertyMeta>, id_property: impl Into<String>) -> Self {
        let mut properties = properties;
        let mut table = CategoryTable::default();
        for meta in properties.values_mut() {
            meta.categories.sort_by(|a, b| b.frequency.cmp(&a.frequency));
            for c in &meta.categories {
                table.intern(&c.name);
            }
        }
        Self {
            properties,
            id_property: id_property.into(),
            categories: Arc::new(table),
        }
    }

    pub fn from_json(json: &str) -> VizResult<Self> {
        let def: MetadataDef =
            serde_json::from_str(json).map_err(|e| VizError::serde(e.to_string()))?;
        Ok(Self::new(def.properties, def.id_property))
    }

    pub fn from_path(path: &Path) -> VizResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            VizError::Other(anyhow::Error::new(e).context(format!(
                "read metadata '{}'",
                path.display()
            )))
        })?;
        Self::from_json(&json)
    }

    pub fn property(&self, name: &str) -> VizResult<&PropertyMeta> {
        self.properties.get(name).ok_or_else(|| {
            VizError::validation(format!("property '{name}' is not in the metadata"))
        })
    }

    /// Shared category table; cloning the `Arc` never copies the mapping.
    pub fn categories(&self) -> &Arc<CategoryTable> {
        &self.categories
    }

    /// Property-local index of `name` (its frequency rank), if present.
    pub fn category_index(&self, property: &str, name: &str) -> Option<usize> {
        self.properties
            .get(property)?
            .categories
            .iter()
            .position(|c| c.name == name)
    }
}

#[cfg(test)]
#[path = "../tests/unit/metadata.rs"]
mod tests;
