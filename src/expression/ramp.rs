//! `ramp(input, palette[, othersColor])`: maps a classified or normalized
//! input onto colors, numbers or images.
//!
//! Output mode is picked once at bind time from the palette kind. Color ramps
//! read a 256-entry CIELAB lookup table on the host and blend the same stops
//! in the generated shader; both follow [`PiecewiseLinear`].

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::color::rgba::Rgba;
use crate::expression::arena::{ExprArena, ExprKind};
use crate::expression::interp::{
    LookupTable, PiecewiseLinear, color_value_index, compute_color_ramp_texture,
    compute_numeric_ramp_texture,
};
use crate::expression::legend::{Legend, LegendEntry, LegendKey, LegendKind, LegendOptions};
use crate::expression::palette::{ColorSource, InputRole, PaletteDesc, colors_for_ramp};
use crate::expression::property::category_ranks;
use crate::expression::value::Value;
use crate::feature::{EmptyFeature, Feature, PropertyValue, SingleProperty};
use crate::foundation::error::{VizError, VizResult};
use crate::foundation::ids::{CategoryId, NodeId, TextureHandle};
use crate::metadata::Metadata;
use crate::types::{ValueType, check_type};
use crate::uniforms::UniformSink;

const DEFAULT_OTHERS_COLOR: &str = "gray";

/// Arena-wide ramp defaults.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RampOptions {
    /// Named color used for "others" when a ramp has no explicit one.
    pub others_color: String,
}

impl Default for RampOptions {
    fn default() -> Self {
        Self {
            others_color: DEFAULT_OTHERS_COLOR.to_owned(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RampMode {
    Number,
    Color,
    Image,
}

/// Shape decisions taken at bind time.
#[derive(Debug)]
pub(crate) struct RampBinding {
    pub(crate) role: InputRole,
    pub(crate) mode: RampMode,
    pub(crate) num_categories: Option<usize>,
    /// Node whose category id selects the slot, for property and top roles.
    pub(crate) index_source: NodeId,
    pub(crate) ranks: HashMap<CategoryId, usize>,
    /// Slot used when a category has no rank.
    pub(crate) rank_fallback: f64,
}

impl RampBinding {
    /// Upper end of the index space; the lower end is always 0.
    pub(crate) fn max_index(&self) -> f64 {
        match (self.role, self.num_categories) {
            (InputRole::Classifier, _) | (_, None) => 1.0,
            (_, Some(n)) => n as f64 - 1.0,
        }
    }
}

#[derive(Debug)]
struct CachedTable {
    num_categories: Option<usize>,
    table: Arc<LookupTable>,
}

#[derive(Debug)]
struct UploadedTable {
    num_categories: Option<usize>,
    handle: TextureHandle,
}

#[derive(Debug)]
pub(crate) struct RampNode {
    pub(crate) input: NodeId,
    pub(crate) palette_node: NodeId,
    pub(crate) palette: PaletteDesc,
    pub(crate) others: Option<NodeId>,
    pub(crate) binding: Option<RampBinding>,
    table: RwLock<Option<CachedTable>>,
    uploaded: RwLock<Option<UploadedTable>>,
}

impl RampNode {
    pub(crate) fn binding(&self) -> VizResult<&RampBinding> {
        self.binding
            .as_ref()
            .ok_or_else(|| VizError::validation("ramp is not bound to metadata"))
    }
}

fn lock_poisoned(_: impl std::fmt::Debug) -> VizError {
    VizError::invariant("ramp cache lock poisoned")
}

impl ExprArena {
    /// Build `ramp(input, palette[, others])`.
    ///
    /// The palette kind is classified here and never changes: a named palette,
    /// an image list, or an array whose first element decides between a color
    /// array and a number array.
    pub fn ramp(
        &mut self,
        input: NodeId,
        palette: NodeId,
        others: Option<NodeId>,
    ) -> VizResult<NodeId> {
        let desc = match self.kind(palette)? {
            ExprKind::Palette(p) => PaletteDesc::Named(*p),
            ExprKind::ImageList(_) => PaletteDesc::Images(palette),
            ExprKind::Array(elems) => {
                let Some(first) = elems.first() else {
                    return Err(VizError::validation(
                        "ramp: invalid parameter 'palette' (#1): empty palette",
                    ));
                };
                if self.static_type(*first) == Some(ValueType::Color) {
                    PaletteDesc::Colors(elems.clone())
                } else if elems.len() < 2 {
                    return Err(VizError::validation(
                        "ramp: invalid parameter 'palette' (#1): a number palette needs at least two values",
                    ));
                } else {
                    PaletteDesc::Numbers(elems.clone())
                }
            }
            _ => {
                return Err(VizError::type_error(
                    "ramp: invalid parameter 'palette' (#1): expected a palette, an array or an image list",
                ));
            }
        };
        Ok(self.push_ramp(RampNode {
            input,
            palette_node: palette,
            palette: desc,
            others,
            binding: None,
            table: RwLock::new(None),
            uploaded: RwLock::new(None),
        }))
    }

    pub(crate) fn resolve_ramp(
        &mut self,
        id: NodeId,
        meta: &Metadata,
    ) -> VizResult<Option<ValueType>> {
        let (mut input, palette, others) = match self.kind(id)? {
            ExprKind::Ramp(r) => (r.input, r.palette.clone(), r.others),
            _ => return Err(VizError::invariant("resolve_ramp on a non-ramp node")),
        };

        // Bare numeric properties are normalized over their metadata range.
        if let ExprKind::Property(_) = self.kind(input)?
            && matches!(self.ty(input), Some(ValueType::Number | ValueType::Date))
        {
            let linear = self.linear(input, None);
            let ty = self.resolve_linear(linear, input, None, meta)?;
            self.mark_bound(linear, ty)?;
            input = linear;
        }

        let input_ty = check_type(
            "ramp",
            "input",
            0,
            &[ValueType::Number, ValueType::Category],
            self.ty(input),
        )?;

        let binding = self.ramp_binding(input, input_ty, &palette, meta)?;
        self.check_palette(&palette, input_ty)?;
        if let Some(o) = others {
            check_type("ramp", "othersColor", 2, &[ValueType::Color], self.ty(o))?;
            self.require_constant(o)?;
        }

        let ty = match binding.mode {
            RampMode::Number => ValueType::Number,
            RampMode::Color => ValueType::Color,
            RampMode::Image => ValueType::Image,
        };
        if let ExprKind::Ramp(r) = self.kind_mut(id)? {
            r.input = input;
            r.binding = Some(binding);
        }
        Ok(Some(ty))
    }

    fn ramp_binding(
        &self,
        input: NodeId,
        input_ty: ValueType,
        palette: &PaletteDesc,
        meta: &Metadata,
    ) -> VizResult<RampBinding> {
        let mut binding = RampBinding {
            role: InputRole::Generic,
            mode: match palette {
                PaletteDesc::Numbers(_) => RampMode::Number,
                PaletteDesc::Named(_) | PaletteDesc::Colors(_) => RampMode::Color,
                PaletteDesc::Images(_) => RampMode::Image,
            },
            num_categories: None,
            index_source: input,
            ranks: HashMap::new(),
            rank_fallback: f64::NAN,
        };

        match self.kind(input)? {
            ExprKind::Property(p) if input_ty == ValueType::Category => {
                let n = meta.property(&p.name)?.categories.len();
                binding.role = InputRole::Property;
                binding.num_categories = Some(n);
                binding.ranks = category_ranks(meta, &p.name, None);
            }
            ExprKind::Top(t) => {
                let ExprKind::Property(p) = self.kind(t.property)? else {
                    return Err(VizError::invariant("top input is not a property"));
                };
                binding.role = InputRole::Top;
                binding.num_categories = Some(t.num_categories());
                binding.index_source = t.property;
                binding.ranks = category_ranks(meta, &p.name, Some(t.count));
                binding.rank_fallback = t.count as f64;
            }
            ExprKind::Buckets(b) => {
                binding.role = InputRole::Buckets;
                binding.num_categories = Some(b.num_categories());
            }
            ExprKind::Classifier(c) => {
                binding.role = InputRole::Classifier;
                binding.num_categories = Some(c.num_categories);
            }
            _ if input_ty == ValueType::Category => {
                return Err(VizError::type_error(
                    "ramp: invalid parameter 'input' (#0): category input must be a property, top, buckets or a classifier",
                ));
            }
            _ => {}
        }
        Ok(binding)
    }

    fn check_palette(&self, palette: &PaletteDesc, input_ty: ValueType) -> VizResult<()> {
        match palette {
            PaletteDesc::Named(_) => Ok(()),
            PaletteDesc::Numbers(elems) => {
                for e in elems {
                    check_type("ramp", "palette", 1, &[ValueType::Number], self.ty(*e))?;
                }
                Ok(())
            }
            PaletteDesc::Colors(elems) => {
                for e in elems {
                    check_type("ramp", "palette", 1, &[ValueType::Color], self.ty(*e))?;
                    self.require_constant(*e)?;
                }
                Ok(())
            }
            PaletteDesc::Images(_) => {
                check_type("ramp", "input", 0, &[ValueType::Category], Some(input_ty))?;
                Ok(())
            }
        }
    }

    fn require_constant(&self, id: NodeId) -> VizResult<()> {
        if self.depends_on_feature(id)? {
            return Err(VizError::validation(
                "ramp: palettes must be formed by constant expressions, they cannot depend on feature properties",
            ));
        }
        Ok(())
    }

    fn ramp_node(&self, id: NodeId) -> VizResult<&RampNode> {
        match self.kind(id)? {
            ExprKind::Ramp(r) => Ok(r),
            _ => Err(VizError::type_error(format!(
                "expression #{id} is not a ramp"
            ))),
        }
    }

    pub fn ramp_mode(&self, id: NodeId) -> VizResult<RampMode> {
        Ok(self.ramp_node(id)?.binding()?.mode)
    }

    /// Category count seen by the ramp; `None` for numeric inputs.
    pub fn ramp_num_categories(&self, id: NodeId) -> VizResult<Option<usize>> {
        Ok(self.ramp_node(id)?.binding()?.num_categories)
    }

    fn others_color(&self, ramp: &RampNode) -> VizResult<Rgba> {
        match ramp.others {
            Some(o) => self.eval(o, &EmptyFeature)?.as_color().ok_or_else(|| {
                VizError::validation("ramp: others color must evaluate to a color")
            }),
            None => {
                let name = &self.ramp_options().others_color;
                Rgba::from_name(name).ok_or_else(|| {
                    VizError::validation(format!("ramp: unknown others color '{name}'"))
                })
            }
        }
    }

    /// Stops of a color ramp after category/"others" resolution.
    pub(crate) fn ramp_colors(&self, ramp: &RampNode) -> VizResult<Vec<Rgba>> {
        let binding = ramp.binding()?;
        let source = match &ramp.palette {
            PaletteDesc::Named(p) => ColorSource::Named(*p),
            PaletteDesc::Colors(elems) => ColorSource::Literal(
                elems
                    .iter()
                    .map(|e| {
                        self.eval(*e, &EmptyFeature)?
                            .as_color()
                            .filter(|c| !c.has_nan())
                            .ok_or_else(|| {
                                VizError::validation(
                                    "ramp: palettes must be formed by constant expressions",
                                )
                            })
                    })
                    .collect::<VizResult<Vec<_>>>()?,
            ),
            PaletteDesc::Numbers(_) | PaletteDesc::Images(_) => {
                return Err(VizError::invariant("ramp_colors on a non-color palette"));
            }
        };
        colors_for_ramp(
            binding.role,
            &source,
            binding.num_categories,
            self.others_color(ramp)?,
        )
    }

    fn ramp_numbers(&self, ramp: &RampNode, feature: &dyn Feature) -> VizResult<Vec<f64>> {
        let PaletteDesc::Numbers(elems) = &ramp.palette else {
            return Err(VizError::invariant("ramp_numbers on a non-number palette"));
        };
        elems
            .iter()
            .map(|e| self.eval(*e, feature).map(|v| v.as_f64()))
            .collect()
    }

    /// Current lookup table, recomputed when the category count changed or
    /// the palette is animated.
    pub fn ramp_lookup_table(&self, id: NodeId) -> VizResult<Arc<LookupTable>> {
        self.table_for(self.ramp_node(id)?)
    }

    fn table_for(&self, ramp: &RampNode) -> VizResult<Arc<LookupTable>> {
        let binding = ramp.binding()?;
        let animated = self.is_animated(ramp.palette_node)?;
        if !animated
            && let Some(cached) = ramp.table.read().map_err(lock_poisoned)?.as_ref()
            && cached.num_categories == binding.num_categories
        {
            return Ok(Arc::clone(&cached.table));
        }

        let table = Arc::new(match binding.mode {
            RampMode::Color => compute_color_ramp_texture(&self.ramp_colors(ramp)?)?,
            RampMode::Number => {
                compute_numeric_ramp_texture(&self.ramp_numbers(ramp, &EmptyFeature)?)?
            }
            RampMode::Image => {
                return Err(VizError::invariant("image ramps have no lookup table"));
            }
        });
        tracing::debug!(
            palette = ramp.palette.kind_name(),
            mode = ?binding.mode,
            categories = ?binding.num_categories,
            animated,
            "ramp lookup table recomputed"
        );
        *ramp.table.write().map_err(lock_poisoned)? = Some(CachedTable {
            num_categories: binding.num_categories,
            table: Arc::clone(&table),
        });
        Ok(table)
    }

    fn ramp_index(&self, ramp: &RampNode, feature: &dyn Feature) -> VizResult<f64> {
        let binding = ramp.binding()?;
        match binding.role {
            InputRole::Property | InputRole::Top => {
                Ok(match self.eval(binding.index_source, feature)? {
                    Value::Category(c) => binding
                        .ranks
                        .get(&c)
                        .map_or(binding.rank_fallback, |r| *r as f64),
                    _ => binding.rank_fallback,
                })
            }
            _ => Ok(self.eval(ramp.input, feature)?.as_f64()),
        }
    }

    pub(crate) fn eval_ramp(&self, ramp: &RampNode, feature: &dyn Feature) -> VizResult<Value> {
        let index = self.ramp_index(ramp, feature)?;
        self.ramp_value_at(ramp, index, feature)
    }

    /// Output for an already resolved index.
    fn ramp_value_at(
        &self,
        ramp: &RampNode,
        index: f64,
        feature: &dyn Feature,
    ) -> VizResult<Value> {
        let binding = ramp.binding()?;
        let m = index / binding.max_index();
        match binding.mode {
            RampMode::Image => {
                let slot = match (binding.role, binding.num_categories) {
                    (InputRole::Classifier, Some(n)) => (index * (n as f64 - 1.0)).round(),
                    _ => index,
                };
                let PaletteDesc::Images(list) = ramp.palette else {
                    return Err(VizError::invariant("image ramp without an image list"));
                };
                let ExprKind::ImageList(list) = self.kind(list)? else {
                    return Err(VizError::invariant("image palette is not an image list"));
                };
                if !(slot.is_finite() && slot >= 0.0) {
                    return Ok(Value::Null);
                }
                Ok(list
                    .urls
                    .get(slot as usize)
                    .map_or(Value::Null, |url| Value::Image(url.clone())))
            }
            RampMode::Number => {
                let m = if m.is_finite() { m.clamp(0.0, 1.0) } else { m };
                let curve = PiecewiseLinear::new(self.ramp_numbers(ramp, feature)?)?;
                let v = curve.eval(m);
                Ok(if v.is_nan() {
                    Value::Null
                } else {
                    Value::Number(v)
                })
            }
            RampMode::Color => {
                let table = self.table_for(ramp)?;
                let Some(slot) = color_value_index(m) else {
                    return Ok(Value::Null);
                };
                let color = table.color_at(slot).ok_or_else(|| {
                    VizError::invariant(format!("ramp lookup table has no slot {slot}"))
                })?;
                Ok(if color.has_nan() {
                    Value::Null
                } else {
                    Value::Color(color)
                })
            }
        }
    }

    pub(crate) fn pre_draw_ramp(
        &self,
        id: NodeId,
        ramp: &RampNode,
        sink: &mut dyn UniformSink,
    ) -> VizResult<()> {
        let binding = ramp.binding()?;
        if binding.mode == RampMode::Image {
            return Ok(());
        }
        sink.set_float(&format!("rampMax{id}"), binding.max_index() as f32);

        let table = self.table_for(ramp)?;
        let animated = self.is_animated(ramp.palette_node)?;
        let name = format!("rampTexture{id}");
        let mut uploaded = ramp.uploaded.write().map_err(lock_poisoned)?;
        match uploaded.as_ref() {
            Some(u) if !animated && u.num_categories == binding.num_categories => {
                sink.bind_texture(&name, u.handle);
            }
            _ => {
                let handle = sink.upload_lookup_table(&name, &table);
                tracing::debug!(ramp = %id, "ramp lookup table uploaded");
                *uploaded = Some(UploadedTable {
                    num_categories: binding.num_categories,
                    handle,
                });
            }
        }
        Ok(())
    }

    /// Key to output summary of a ramp.
    #[tracing::instrument(skip(self, options))]
    pub fn legend(&self, id: NodeId, options: &LegendOptions) -> VizResult<Legend> {
        options.validate()?;
        let ramp = self.ramp_node(id)?;
        let binding = ramp.binding()?;
        match binding.num_categories {
            None => self.numeric_legend(ramp, options),
            Some(n) => self.category_legend(ramp, n, options),
        }
    }

    fn numeric_legend(&self, ramp: &RampNode, options: &LegendOptions) -> VizResult<Legend> {
        let (property, min, max) = match self.kind(ramp.input)? {
            ExprKind::Linear(l) => match (self.kind(l.input)?, l.min, l.max) {
                (ExprKind::Property(p), Some(min), Some(max)) => (
                    p.name.clone(),
                    self.eval(min, &EmptyFeature)?.as_f64(),
                    self.eval(max, &EmptyFeature)?.as_f64(),
                ),
                _ => {
                    return Err(VizError::type_error(
                        "legend: numeric ramps need linear(property) as input",
                    ));
                }
            },
            _ => {
                return Err(VizError::type_error(
                    "legend: numeric ramps need linear(property) as input",
                ));
            }
        };

        let step = (max - min) / options.samples as f64;
        let data = (0..options.samples)
            .map(|k| {
                let key = min + k as f64 * step;
                let feature = SingleProperty::new(&property, PropertyValue::Number(key));
                Ok(LegendEntry {
                    key: LegendKey::Number(key),
                    value: self.eval_ramp(ramp, &feature)?,
                })
            })
            .collect::<VizResult<Vec<_>>>()?;

        Ok(Legend {
            kind: LegendKind::Number,
            min: Some(min),
            max: Some(max),
            data,
        })
    }

    fn category_legend(
        &self,
        ramp: &RampNode,
        n: usize,
        options: &LegendOptions,
    ) -> VizResult<Legend> {
        let binding = ramp.binding()?;
        let keys = self.category_keys(ramp, n)?;
        let divisor = n.saturating_sub(1).max(1) as f64;

        let data = keys
            .into_iter()
            .enumerate()
            .filter_map(|(i, key)| {
                let key = if i + 1 == n {
                    LegendKey::Name(options.others_label.clone())
                } else {
                    key?
                };
                let index = if binding.role == InputRole::Classifier {
                    i as f64 / divisor
                } else {
                    i as f64
                };
                Some(
                    self.ramp_value_at(ramp, index, &EmptyFeature)
                        .map(|value| LegendEntry { key, value }),
                )
            })
            .collect::<VizResult<Vec<_>>>()?;

        Ok(Legend {
            kind: LegendKind::Category,
            min: None,
            max: None,
            data,
        })
    }

    /// One key per category slot; the last one is replaced by the "others" label.
    /// Slots past the known categories of a property are `None` and left out of the legend.
    fn category_keys(&self, ramp: &RampNode, n: usize) -> VizResult<Vec<Option<LegendKey>>> {
        let binding = ramp.binding()?;
        let meta = self.bound_metadata()?;

        let keys = match binding.role {
            InputRole::Property | InputRole::Top => {
                let ExprKind::Property(p) = self.kind(binding.index_source)? else {
                    return Err(VizError::invariant("category ramp without a property"));
                };
                let cats = &meta.property(&p.name)?.categories;
                (0..n)
                    .map(|i| cats.get(i).map(|c| LegendKey::Name(c.name.clone())))
                    .collect()
            }
            InputRole::Buckets => {
                let ExprKind::Buckets(b) = self.kind(ramp.input)? else {
                    return Err(VizError::invariant("buckets role without buckets input"));
                };
                let mut lower = None;
                let mut keys = Vec::with_capacity(n);
                for elem in &b.list {
                    keys.push(Some(match self.kind(*elem)? {
                        ExprKind::Category { name, .. } => LegendKey::Name(name.clone()),
                        _ => {
                            let upper = self.eval(*elem, &EmptyFeature)?.as_f64();
                            let key = LegendKey::Range([lower, Some(upper)]);
                            lower = Some(upper);
                            key
                        }
                    }));
                }
                keys.push(None);
                keys
            }
            InputRole::Classifier => {
                let ExprKind::Classifier(c) = self.kind(ramp.input)? else {
                    return Err(VizError::invariant("classifier role without classifier input"));
                };
                class_ranges(&c.breakpoints()?)
                    .into_iter()
                    .map(|range| Some(LegendKey::Range(range)))
                    .collect()
            }
            InputRole::Generic => {
                return Err(VizError::invariant("generic ramp input has no categories"));
            }
        };
        Ok(keys)
    }

    /// `[lower, upper]` range and normalized value of every class of a classifier.
    pub fn classifier_legend(&self, id: NodeId) -> VizResult<Vec<LegendEntry>> {
        let ExprKind::Classifier(c) = self.kind(id)? else {
            return Err(VizError::type_error(format!(
                "expression #{id} is not a classifier"
            )));
        };
        let ranges = class_ranges(&c.breakpoints()?);
        let divisor = c.num_categories.saturating_sub(1).max(1) as f64;
        Ok(ranges
            .into_iter()
            .enumerate()
            .map(|(i, range)| LegendEntry {
                key: LegendKey::Range(range),
                value: Value::Number(i as f64 / divisor),
            })
            .collect())
    }
}

fn class_ranges(breakpoints: &[f64]) -> Vec<[Option<f64>; 2]> {
    let mut lower = None;
    let mut out: Vec<[Option<f64>; 2]> = breakpoints
        .iter()
        .map(|bp| {
            let range = [lower, Some(*bp)];
            lower = Some(*bp);
            range
        })
        .collect();
    out.push([lower, None]);
    out
}

#[cfg(test)]
#[path = "../../tests/unit/expression/ramp.rs"]
mod tests;
