//! Arena-owned expression trees.
//!
//! Every node of a style lives in one [`ExprArena`] and is addressed by a
//! [`NodeId`]. The arena owns the tree exclusively: a node is referenced by at
//! most one parent, is bound to metadata exactly once, and is dropped together
//! with the arena.

use std::fmt;
use std::sync::Arc;

use rayon::prelude::*;
use smallvec::SmallVec;

use crate::color::palettes::{NamedPalette, named_palette};
use crate::color::rgba::Rgba;
use crate::expression::binary::{BinaryNode, BinaryOp, eval_binary, resolve_signature};
use crate::expression::buckets::{BucketsNode, bucket_index};
use crate::expression::classifier::{ClassifierMethod, ClassifierNode};
use crate::expression::image_list::{ImageListNode, ImageLoader, sampler_name};
use crate::expression::linear::{LinearNode, normalize};
use crate::expression::property::{PropertyNode, category_ranks};
use crate::expression::ramp::{RampNode, RampOptions};
use crate::expression::top::TopNode;
use crate::expression::unary::{UnaryNode, UnaryOp};
use crate::expression::value::Value;
use crate::feature::Feature;
use crate::foundation::error::{VizError, VizResult};
use crate::foundation::ids::{CategoryId, NodeId};
use crate::metadata::{Metadata, PropertyKind};
use crate::types::{ValueType, check_type};
use crate::uniforms::UniformSink;

pub(crate) type Children = SmallVec<[NodeId; 4]>;

#[derive(Debug)]
pub(crate) enum ExprKind {
    Number(f64),
    Category {
        name: String,
        id: Option<CategoryId>,
    },
    Color(Rgba),
    Rgba([NodeId; 4]),
    Now,
    Property(PropertyNode),
    Unary(UnaryNode),
    Binary(BinaryNode),
    Linear(LinearNode),
    Buckets(BucketsNode),
    Top(TopNode),
    Classifier(ClassifierNode),
    ImageList(ImageListNode),
    Palette(&'static NamedPalette),
    Array(Vec<NodeId>),
    Ramp(RampNode),
}

#[derive(Debug)]
pub(crate) struct Node {
    pub(crate) kind: ExprKind,
    /// Output type; fixed once `bound` is set.
    pub(crate) ty: Option<ValueType>,
    pub(crate) bound: bool,
}

/// Owner of one or more expression trees sharing a metadata snapshot.
#[derive(Debug, Default)]
pub struct ExprArena {
    nodes: Vec<Node>,
    metadata: Option<Arc<Metadata>>,
    time: f64,
    ramp_options: RampOptions,
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn metadata(&self) -> Option<&Arc<Metadata>> {
        self.metadata.as_ref()
    }

    /// Animation clock read by `now()`, in seconds.
    pub fn set_time(&mut self, seconds: f64) {
        self.time = seconds;
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn with_ramp_options(mut self, options: RampOptions) -> Self {
        self.ramp_options = options;
        self
    }

    pub fn ramp_options(&self) -> &RampOptions {
        &self.ramp_options
    }

    /// Resolved output type; `None` before binding and for palettes.
    pub fn output_type(&self, id: NodeId) -> Option<ValueType> {
        self.nodes.get(id.index()).and_then(|n| n.ty)
    }

    pub fn is_bound(&self, id: NodeId) -> bool {
        self.nodes.get(id.index()).is_some_and(|n| n.bound)
    }

    pub(crate) fn node(&self, id: NodeId) -> VizResult<&Node> {
        self.nodes
            .get(id.index())
            .ok_or_else(|| VizError::invariant(format!("expression #{id} does not exist")))
    }

    pub(crate) fn kind(&self, id: NodeId) -> VizResult<&ExprKind> {
        self.node(id).map(|n| &n.kind)
    }

    pub(crate) fn kind_mut(&mut self, id: NodeId) -> VizResult<&mut ExprKind> {
        self.nodes
            .get_mut(id.index())
            .map(|n| &mut n.kind)
            .ok_or_else(|| VizError::invariant(format!("expression #{id} does not exist")))
    }

    pub(crate) fn ty(&self, id: NodeId) -> Option<ValueType> {
        self.output_type(id)
    }

    pub(crate) fn bound_metadata(&self) -> VizResult<&Arc<Metadata>> {
        self.metadata
            .as_ref()
            .ok_or_else(|| VizError::validation("expression is not bound to metadata"))
    }

    fn push(&mut self, kind: ExprKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind,
            ty: None,
            bound: false,
        });
        id
    }

    /// Push a node created during binding; it is bound on arrival.
    pub(crate) fn push_bound(&mut self, kind: ExprKind, ty: Option<ValueType>) -> NodeId {
        let id = self.push(kind);
        let node = &mut self.nodes[id.index()];
        node.ty = ty;
        node.bound = true;
        id
    }

    /// Mark a node pushed during its parent's binding as bound.
    pub(crate) fn mark_bound(&mut self, id: NodeId, ty: Option<ValueType>) -> VizResult<()> {
        let node = self
            .nodes
            .get_mut(id.index())
            .ok_or_else(|| VizError::invariant(format!("expression #{id} does not exist")))?;
        node.ty = ty;
        node.bound = true;
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Builders

    pub fn number(&mut self, value: f64) -> NodeId {
        self.push(ExprKind::Number(value))
    }

    pub fn category(&mut self, name: impl Into<String>) -> NodeId {
        self.push(ExprKind::Category {
            name: name.into(),
            id: None,
        })
    }

    pub fn color(&mut self, color: Rgba) -> NodeId {
        self.push(ExprKind::Color(color))
    }

    pub fn hex_color(&mut self, hex: &str) -> VizResult<NodeId> {
        Rgba::from_hex(hex).map(|c| self.color(c))
    }

    pub fn named_color(&mut self, name: &str) -> VizResult<NodeId> {
        Rgba::from_name(name)
            .map(|c| self.color(c))
            .ok_or_else(|| VizError::validation(format!("unknown color name '{name}'")))
    }

    /// `rgba(r, g, b, a)` with channels in `0..=255` and alpha in `[0, 1]`.
    pub fn rgba(&mut self, r: NodeId, g: NodeId, b: NodeId, a: NodeId) -> NodeId {
        self.push(ExprKind::Rgba([r, g, b, a]))
    }

    pub fn now(&mut self) -> NodeId {
        self.push(ExprKind::Now)
    }

    pub fn property(&mut self, name: impl Into<String>) -> NodeId {
        self.push(ExprKind::Property(PropertyNode::new(name)))
    }

    pub fn unary(&mut self, op: UnaryOp, input: NodeId) -> NodeId {
        self.push(ExprKind::Unary(UnaryNode { op, input }))
    }

    pub fn binary(&mut self, op: BinaryOp, left: NodeId, right: NodeId) -> NodeId {
        self.push(ExprKind::Binary(BinaryNode {
            op,
            left,
            right,
            signature: None,
        }))
    }

    /// `linear(input[, min, max])`; without bounds the property's metadata range is used.
    pub fn linear(&mut self, input: NodeId, bounds: Option<(NodeId, NodeId)>) -> NodeId {
        self.push(ExprKind::Linear(LinearNode {
            input,
            min: bounds.map(|b| b.0),
            max: bounds.map(|b| b.1),
        }))
    }

    pub fn buckets(&mut self, input: NodeId, list: Vec<NodeId>) -> VizResult<NodeId> {
        if list.is_empty() {
            return Err(VizError::validation(
                "buckets: invalid parameter 'list' (#1): expected at least one breakpoint",
            ));
        }
        Ok(self.push(ExprKind::Buckets(BucketsNode {
            input,
            list,
            categorical: false,
        })))
    }

    pub fn top(&mut self, property: NodeId, count: f64) -> VizResult<NodeId> {
        if !matches!(self.kind(property)?, ExprKind::Property(_)) {
            return Err(VizError::type_error(
                "top: invalid parameter 'property' (#0): expected a property",
            ));
        }
        if !(count.is_finite() && count.fract() == 0.0 && count >= 1.0) {
            return Err(VizError::validation(format!(
                "top: invalid parameter 'buckets' (#1): expected an integer >= 1, got {count}"
            )));
        }
        Ok(self.push(ExprKind::Top(TopNode {
            property,
            count: count as usize,
            members: Vec::new(),
        })))
    }

    pub fn classifier(
        &mut self,
        input: NodeId,
        method: ClassifierMethod,
        buckets: f64,
    ) -> VizResult<NodeId> {
        let node = ClassifierNode::new(input, method, buckets)?;
        Ok(self.push(ExprKind::Classifier(node)))
    }

    pub fn image_list(&mut self, urls: Vec<String>) -> VizResult<NodeId> {
        let node = ImageListNode::new(urls)?;
        Ok(self.push(ExprKind::ImageList(node)))
    }

    pub fn palette(&mut self, name: &str) -> VizResult<NodeId> {
        named_palette(name)
            .map(|p| self.push(ExprKind::Palette(p)))
            .ok_or_else(|| VizError::validation(format!("unknown palette '{name}'")))
    }

    pub fn array(&mut self, elems: Vec<NodeId>) -> NodeId {
        self.push(ExprKind::Array(elems))
    }

    pub(crate) fn push_ramp(&mut self, node: RampNode) -> NodeId {
        self.push(ExprKind::Ramp(node))
    }

    // ---------------------------------------------------------------------
    // Structure

    pub(crate) fn children(&self, id: NodeId) -> VizResult<Children> {
        let mut out = Children::new();
        match self.kind(id)? {
            ExprKind::Number(_)
            | ExprKind::Category { .. }
            | ExprKind::Color(_)
            | ExprKind::Now
            | ExprKind::Property(_)
            | ExprKind::ImageList(_)
            | ExprKind::Palette(_) => {}
            ExprKind::Rgba(parts) => out.extend_from_slice(parts),
            ExprKind::Unary(u) => out.push(u.input),
            ExprKind::Binary(b) => out.extend([b.left, b.right]),
            ExprKind::Linear(l) => {
                out.push(l.input);
                out.extend(l.min);
                out.extend(l.max);
            }
            ExprKind::Buckets(b) => {
                out.push(b.input);
                out.extend_from_slice(&b.list);
            }
            ExprKind::Top(t) => out.push(t.property),
            ExprKind::Classifier(c) => out.push(c.input),
            ExprKind::Array(elems) => out.extend_from_slice(elems),
            ExprKind::Ramp(r) => {
                out.extend([r.input, r.palette_node]);
                out.extend(r.others);
            }
        }
        Ok(out)
    }

    fn any_node(&self, id: NodeId, pred: &dyn Fn(&ExprKind) -> bool) -> VizResult<bool> {
        if pred(self.kind(id)?) {
            return Ok(true);
        }
        for child in self.children(id)? {
            if self.any_node(child, pred)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Whether the subtree reads the animation clock.
    pub(crate) fn is_animated(&self, id: NodeId) -> VizResult<bool> {
        self.any_node(id, &|k| matches!(k, ExprKind::Now))
    }

    pub(crate) fn depends_on_feature(&self, id: NodeId) -> VizResult<bool> {
        self.any_node(id, &|k| matches!(k, ExprKind::Property(_)))
    }

    /// Type known without metadata; used to classify palettes at construction.
    pub(crate) fn static_type(&self, id: NodeId) -> Option<ValueType> {
        match self.kind(id).ok()? {
            ExprKind::Number(_) | ExprKind::Now | ExprKind::Unary(_) | ExprKind::Linear(_) => {
                Some(ValueType::Number)
            }
            ExprKind::Category { .. } => Some(ValueType::Category),
            ExprKind::Color(_) | ExprKind::Rgba(_) => Some(ValueType::Color),
            ExprKind::Binary(b) => {
                resolve_signature(b.op, self.static_type(b.left), self.static_type(b.right))
                    .ok()
                    .map(|(_, ty)| ty)
            }
            _ => None,
        }
    }

    // ---------------------------------------------------------------------
    // Binding

    /// Resolve types and shapes of the tree under `root` against `metadata`.
    ///
    /// Children bind before their parent. Binding happens once per node; all
    /// roots of one arena share the same metadata snapshot.
    #[tracing::instrument(skip(self, metadata))]
    pub fn bind_metadata(&mut self, root: NodeId, metadata: Arc<Metadata>) -> VizResult<()> {
        if let Some(current) = &self.metadata
            && !Arc::ptr_eq(current, &metadata)
        {
            return Err(VizError::validation(
                "arena is already bound to a different metadata snapshot",
            ));
        }
        self.node(root)?;
        self.metadata = Some(metadata);
        self.bind_node(root)
    }

    fn bind_node(&mut self, id: NodeId) -> VizResult<()> {
        if self.node(id)?.bound {
            return Err(VizError::validation(format!(
                "expression #{id} is already bound"
            )));
        }
        for child in self.children(id)? {
            self.bind_node(child)?;
        }
        let ty = self.resolve(id)?;
        let node = &mut self.nodes[id.index()];
        node.ty = ty;
        node.bound = true;
        Ok(())
    }

    fn resolve(&mut self, id: NodeId) -> VizResult<Option<ValueType>> {
        let meta = Arc::clone(self.bound_metadata()?);
        match self.kind(id)? {
            ExprKind::Number(_) | ExprKind::Now => Ok(Some(ValueType::Number)),
            ExprKind::Color(_) => Ok(Some(ValueType::Color)),
            ExprKind::Category { name, .. } => {
                let resolved = meta.categories().id(name);
                if let ExprKind::Category { id: slot, .. } = self.kind_mut(id)? {
                    *slot = resolved;
                }
                Ok(Some(ValueType::Category))
            }
            ExprKind::Rgba(parts) => {
                for (i, (part, param)) in parts.iter().zip(["r", "g", "b", "a"]).enumerate() {
                    check_type("rgba", param, i, &[ValueType::Number], self.ty(*part))?;
                }
                Ok(Some(ValueType::Color))
            }
            ExprKind::Property(p) => {
                let kind = meta.property(&p.name)?.kind;
                if let ExprKind::Property(p) = self.kind_mut(id)? {
                    p.kind = Some(kind);
                }
                Ok(Some(match kind {
                    PropertyKind::Number => ValueType::Number,
                    PropertyKind::Category => ValueType::Category,
                    PropertyKind::Date => ValueType::Date,
                }))
            }
            ExprKind::Unary(u) => {
                check_type(u.op.name(), "x", 0, &[ValueType::Number], self.ty(u.input))?;
                Ok(Some(ValueType::Number))
            }
            ExprKind::Binary(b) => {
                let (sig, out) = resolve_signature(b.op, self.ty(b.left), self.ty(b.right))?;
                if let ExprKind::Binary(b) = self.kind_mut(id)? {
                    b.signature = Some(sig);
                }
                Ok(Some(out))
            }
            ExprKind::Linear(l) => {
                let (input, bounds) = (l.input, l.min.zip(l.max));
                self.resolve_linear(id, input, bounds, &meta)
            }
            ExprKind::Buckets(b) => {
                let input_ty = check_type(
                    "buckets",
                    "input",
                    0,
                    &[ValueType::Number, ValueType::Category],
                    self.ty(b.input),
                )?;
                for elem in &b.list {
                    check_type("buckets", "list", 1, &[input_ty], self.ty(*elem))?;
                }
                if let ExprKind::Buckets(b) = self.kind_mut(id)? {
                    b.categorical = input_ty == ValueType::Category;
                }
                Ok(Some(ValueType::Category))
            }
            ExprKind::Top(t) => {
                check_type(
                    "top",
                    "property",
                    0,
                    &[ValueType::Category],
                    self.ty(t.property),
                )?;
                let ExprKind::Property(p) = self.kind(t.property)? else {
                    return Err(VizError::invariant("top input is not a property"));
                };
                let mut ranked: Vec<(CategoryId, usize)> =
                    category_ranks(&meta, &p.name, Some(t.count))
                        .into_iter()
                        .collect();
                ranked.sort_by_key(|(_, rank)| *rank);
                if let ExprKind::Top(t) = self.kind_mut(id)? {
                    t.members = ranked.into_iter().map(|(cid, _)| cid).collect();
                }
                Ok(Some(ValueType::Category))
            }
            ExprKind::Classifier(c) => {
                let name = c.method.name();
                check_type(name, "input", 0, &[ValueType::Number], self.ty(c.input))?;
                let ExprKind::Property(p) = self.kind(c.input)? else {
                    return Err(VizError::type_error(format!(
                        "{name}: invalid parameter 'input' (#0): expected a property"
                    )));
                };
                c.gen_breakpoints(&p.name, meta.property(&p.name)?)?;
                Ok(Some(ValueType::Category))
            }
            ExprKind::ImageList(_) => Ok(Some(ValueType::Image)),
            ExprKind::Palette(_) | ExprKind::Array(_) => Ok(None),
            ExprKind::Ramp(_) => self.resolve_ramp(id, &meta),
        }
    }

    pub(crate) fn resolve_linear(
        &mut self,
        id: NodeId,
        input: NodeId,
        bounds: Option<(NodeId, NodeId)>,
        meta: &Metadata,
    ) -> VizResult<Option<ValueType>> {
        let accepted = [ValueType::Number, ValueType::Date];
        check_type("linear", "input", 0, &accepted, self.ty(input))?;
        if let Some((min, max)) = bounds {
            check_type("linear", "min", 1, &accepted, self.ty(min))?;
            check_type("linear", "max", 2, &accepted, self.ty(max))?;
            return Ok(Some(ValueType::Number));
        }

        let ExprKind::Property(p) = self.kind(input)? else {
            return Err(VizError::validation(
                "linear: min and max are required unless the input is a property",
            ));
        };
        let pm = meta.property(&p.name)?;
        let (Some(lo), Some(hi)) = (pm.min, pm.max) else {
            return Err(VizError::validation(format!(
                "linear: property '{}' has no min/max statistics",
                p.name
            )));
        };
        let min = self.push_bound(ExprKind::Number(lo), Some(ValueType::Number));
        let max = self.push_bound(ExprKind::Number(hi), Some(ValueType::Number));
        if let ExprKind::Linear(l) = self.kind_mut(id)? {
            l.min = Some(min);
            l.max = Some(max);
        }
        Ok(Some(ValueType::Number))
    }

    // ---------------------------------------------------------------------
    // Host evaluation

    /// Evaluate `id` for one feature.
    ///
    /// Numeric failures (NaN, out-of-range lookups) surface as
    /// [`Value::Null`]; errors are reserved for unbound trees and broken
    /// internal invariants.
    pub fn eval(&self, id: NodeId, feature: &dyn Feature) -> VizResult<Value> {
        let node = self.node(id)?;
        if !node.bound {
            return Err(VizError::validation(format!(
                "expression #{id} is not bound to metadata"
            )));
        }
        match &node.kind {
            ExprKind::Number(v) => Ok(Value::Number(*v)),
            ExprKind::Category { id: cat, .. } => Ok(cat.map_or(Value::Null, Value::Category)),
            ExprKind::Color(c) => Ok(Value::Color(*c)),
            ExprKind::Rgba(parts) => {
                let mut ch = [0.0; 4];
                for (slot, part) in ch.iter_mut().zip(parts) {
                    *slot = self.eval(*part, feature)?.as_f64();
                }
                Ok(Value::Color(Rgba::new(ch[0], ch[1], ch[2], ch[3])))
            }
            ExprKind::Now => Ok(Value::Number(self.time)),
            ExprKind::Property(p) => Ok(p.eval(self.bound_metadata()?, feature)),
            ExprKind::Unary(u) => Ok(Value::Number(
                u.op.eval(self.eval(u.input, feature)?.as_f64()),
            )),
            ExprKind::Binary(b) => {
                let sig = b.signature.ok_or_else(|| {
                    VizError::invariant(format!("{}: bound without a signature", b.op.name()))
                })?;
                let left = self.eval(b.left, feature)?;
                let right = self.eval(b.right, feature)?;
                Ok(eval_binary(b.op, sig, &left, &right))
            }
            ExprKind::Linear(l) => {
                let (Some(min), Some(max)) = (l.min, l.max) else {
                    return Err(VizError::invariant("linear bound without bounds"));
                };
                let x = self.eval(l.input, feature)?.as_f64();
                let lo = self.eval(min, feature)?.as_f64();
                let hi = self.eval(max, feature)?.as_f64();
                Ok(Value::Number(normalize(x, lo, hi)))
            }
            ExprKind::Buckets(b) => {
                let value = self.eval(b.input, feature)?;
                let bounds = b
                    .list
                    .iter()
                    .map(|e| self.eval(*e, feature))
                    .collect::<VizResult<Vec<_>>>()?;
                Ok(Value::Number(
                    bucket_index(&value, &bounds, b.categorical) as f64,
                ))
            }
            ExprKind::Top(t) => Ok(match self.eval(t.property, feature)? {
                Value::Category(c) if t.members.contains(&c) => Value::Category(c),
                _ => Value::Null,
            }),
            ExprKind::Classifier(c) => {
                let v = self.eval(c.input, feature)?.as_f64();
                Ok(Value::Number(c.classify(v)?))
            }
            ExprKind::Ramp(r) => self.eval_ramp(r, feature),
            ExprKind::ImageList(_) | ExprKind::Palette(_) | ExprKind::Array(_) => {
                Err(VizError::type_error(format!(
                    "expression #{id} is a palette and has no per-feature value"
                )))
            }
        }
    }

    // ---------------------------------------------------------------------
    // GPU resources

    /// Decode every image referenced under `root`; loads run in parallel.
    #[tracing::instrument(skip(self, loader))]
    pub fn load_images(&mut self, root: NodeId, loader: &dyn ImageLoader) -> VizResult<()> {
        let mut jobs = Vec::new();
        self.collect_image_jobs(root, &mut jobs)?;
        tracing::debug!(images = jobs.len(), "loading images");

        let loaded = jobs
            .par_iter()
            .map(|(node, k, url)| loader.load(url).map(|img| (*node, *k, Arc::new(img))))
            .collect::<VizResult<Vec<_>>>()?;

        for (node, k, img) in loaded {
            if let ExprKind::ImageList(list) = self.kind_mut(node)? {
                list.images[k] = Some(img);
            }
        }
        Ok(())
    }

    fn collect_image_jobs(
        &self,
        id: NodeId,
        jobs: &mut Vec<(NodeId, usize, String)>,
    ) -> VizResult<()> {
        if let ExprKind::ImageList(list) = self.kind(id)? {
            jobs.extend(
                list.urls
                    .iter()
                    .enumerate()
                    .map(|(k, url)| (id, k, url.clone())),
            );
        }
        for child in self.children(id)? {
            self.collect_image_jobs(child, jobs)?;
        }
        Ok(())
    }

    /// Per-draw uniform and texture upload for the tree under `root`.
    #[tracing::instrument(skip(self, sink))]
    pub fn pre_draw(&self, root: NodeId, sink: &mut dyn UniformSink) -> VizResult<()> {
        self.pre_draw_node(root, sink)
    }

    fn pre_draw_node(&self, id: NodeId, sink: &mut dyn UniformSink) -> VizResult<()> {
        for child in self.children(id)? {
            self.pre_draw_node(child, sink)?;
        }
        match self.kind(id)? {
            ExprKind::Now => sink.set_float(&format!("now{id}"), self.time as f32),
            ExprKind::Classifier(c) => {
                if let ExprKind::Property(p) = self.kind(c.input)? {
                    c.gen_breakpoints(&p.name, self.bound_metadata()?.property(&p.name)?)?;
                }
                for (k, bp) in c.breakpoints()?.iter().enumerate() {
                    sink.set_float(&format!("classifier{id}_bp{k}"), *bp as f32);
                }
            }
            ExprKind::ImageList(list) => {
                if !list.is_loaded() {
                    return Err(VizError::validation(format!(
                        "imageList #{id}: images are not loaded"
                    )));
                }
                let mut textures = list
                    .textures
                    .write()
                    .map_err(|_| VizError::invariant("image texture lock poisoned"))?;
                for (k, (image, handle)) in list.images.iter().zip(textures.iter_mut()).enumerate()
                {
                    let name = sampler_name(id, k);
                    if let Some(h) = *handle {
                        sink.bind_texture(&name, h);
                    } else if let Some(img) = image {
                        *handle = Some(sink.upload_image(&name, img));
                    }
                }
            }
            ExprKind::Ramp(r) => self.pre_draw_ramp(id, r, sink)?,
            _ => {}
        }
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Text form

    /// Canonical text of the subtree, in function-call form.
    pub fn display(&self, id: NodeId) -> ExprDisplay<'_> {
        ExprDisplay { arena: self, id }
    }
}

pub struct ExprDisplay<'a> {
    arena: &'a ExprArena,
    id: NodeId,
}

impl ExprDisplay<'_> {
    fn child(&self, id: NodeId) -> Self {
        Self {
            arena: self.arena,
            id,
        }
    }

    fn list(&self, f: &mut fmt::Formatter<'_>, ids: &[NodeId]) -> fmt::Result {
        for (i, id) in ids.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", self.child(*id))?;
        }
        Ok(())
    }
}

impl fmt::Display for ExprDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Ok(kind) = self.arena.kind(self.id) else {
            return write!(f, "<missing #{}>", self.id);
        };
        match kind {
            ExprKind::Number(v) => write!(f, "{v}"),
            ExprKind::Category { name, .. } => write!(f, "'{name}'"),
            ExprKind::Color(c) => write!(f, "rgba({}, {}, {}, {})", c.r, c.g, c.b, c.a),
            ExprKind::Rgba(parts) => {
                f.write_str("rgba(")?;
                self.list(f, parts)?;
                f.write_str(")")
            }
            ExprKind::Now => f.write_str("now()"),
            ExprKind::Property(p) => write!(f, "${}", p.name),
            ExprKind::Unary(u) => write!(f, "{}({})", u.op.name(), self.child(u.input)),
            ExprKind::Binary(b) => write!(
                f,
                "{}({}, {})",
                b.op.name(),
                self.child(b.left),
                self.child(b.right)
            ),
            ExprKind::Linear(l) => match (l.min, l.max) {
                (Some(min), Some(max)) => write!(
                    f,
                    "linear({}, {}, {})",
                    self.child(l.input),
                    self.child(min),
                    self.child(max)
                ),
                _ => write!(f, "linear({})", self.child(l.input)),
            },
            ExprKind::Buckets(b) => {
                write!(f, "buckets({}, [", self.child(b.input))?;
                self.list(f, &b.list)?;
                f.write_str("])")
            }
            ExprKind::Top(t) => write!(f, "top({}, {})", self.child(t.property), t.count),
            ExprKind::Classifier(c) => {
                write!(
                    f,
                    "{}({}, {}",
                    c.method.name(),
                    self.child(c.input),
                    c.num_categories
                )?;
                if let ClassifierMethod::GlobalStandardDev { class_size } = c.method {
                    write!(f, ", {class_size}")?;
                }
                f.write_str(")")
            }
            ExprKind::ImageList(list) => {
                f.write_str("imageList([")?;
                for (i, url) in list.urls.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "'{url}'")?;
                }
                f.write_str("])")
            }
            ExprKind::Palette(p) => f.write_str(p.name),
            ExprKind::Array(elems) => {
                f.write_str("[")?;
                self.list(f, elems)?;
                f.write_str("]")
            }
            ExprKind::Ramp(r) => {
                write!(f, "ramp({}, {}", self.child(r.input), self.child(r.palette_node))?;
                if let Some(others) = r.others {
                    write!(f, ", {}", self.child(others))?;
                }
                f.write_str(")")
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/expression/arena.rs"]
mod tests;
