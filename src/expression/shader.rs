//! GLSL generation.
//!
//! Every node returns a [`ShaderSource`]: declarations that must precede the
//! shader body plus an inline expression. Declarations are named after the
//! node id and wrapped in `#ifndef DEF_<id>` guards, so concatenating the
//! prefaces of several roots of one arena never redeclares anything.

use std::fmt::Write as _;

use crate::color::cielab::{CIELAB_GLSL, rgba_to_cielab};
use crate::expression::arena::{ExprArena, ExprKind};
use crate::expression::image_list::{ImageListNode, sampler_name};
use crate::expression::interp::{glsl_blend, glsl_lab};
use crate::expression::palette::{InputRole, PaletteDesc};
use crate::expression::ramp::{RampMode, RampNode};
use crate::foundation::error::{VizError, VizResult};
use crate::foundation::ids::NodeId;
use crate::foundation::math::glsl_float;

/// Declarations plus inline expression of one subtree.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct ShaderSource {
    pub preface: String,
    pub inline: String,
}

impl ShaderSource {
    /// Preface followed by a `main`-free assignment of the inline value.
    pub fn program(&self, target: &str) -> String {
        format!("{}{target} = {};\n", self.preface, self.inline)
    }
}

/// Maps a property name to the GLSL expression reading it.
pub type PropertyResolver<'a> = dyn Fn(&str) -> String + 'a;

/// Default resolver: one float attribute per property, `prop_<name>`.
pub fn attribute_resolver(name: &str) -> String {
    let mut out = String::from("prop_");
    out.extend(
        name.chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' }),
    );
    out
}

fn guarded(id: NodeId, body: &str) -> String {
    format!("#ifndef DEF_{id}\n#define DEF_{id}\n{body}#endif\n")
}

impl ExprArena {
    /// GLSL for the subtree under `id`; the tree must be bound.
    pub fn to_shader_source(
        &self,
        id: NodeId,
        resolver: &PropertyResolver<'_>,
    ) -> VizResult<ShaderSource> {
        if !self.is_bound(id) {
            return Err(VizError::validation(format!(
                "expression #{id} is not bound to metadata"
            )));
        }
        self.glsl(id, resolver)
    }

    fn glsl(&self, id: NodeId, resolver: &PropertyResolver<'_>) -> VizResult<ShaderSource> {
        let mut preface = String::new();
        let child = |child: NodeId, preface: &mut String| -> VizResult<String> {
            let src = self.glsl(child, resolver)?;
            preface.push_str(&src.preface);
            Ok(src.inline)
        };

        let (own, inline) = match self.kind(id)? {
            ExprKind::Number(v) => (String::new(), glsl_float(*v)),
            ExprKind::Category { id: cat, .. } => (
                String::new(),
                glsl_float(cat.map_or(-1.0, |c| f64::from(c.0))),
            ),
            ExprKind::Color(c) => {
                let [r, g, b, a] = c.to_unit();
                (
                    String::new(),
                    format!(
                        "vec4({}, {}, {}, {})",
                        glsl_float(r),
                        glsl_float(g),
                        glsl_float(b),
                        glsl_float(a)
                    ),
                )
            }
            ExprKind::Rgba([r, g, b, a]) => {
                let r = child(*r, &mut preface)?;
                let g = child(*g, &mut preface)?;
                let b = child(*b, &mut preface)?;
                let a = child(*a, &mut preface)?;
                (
                    String::new(),
                    format!("vec4(({r}) / 255., ({g}) / 255., ({b}) / 255., {a})"),
                )
            }
            ExprKind::Now => (format!("uniform float now{id};\n"), format!("now{id}")),
            ExprKind::Property(p) => (String::new(), resolver(&p.name)),
            ExprKind::Unary(u) => {
                let x = child(u.input, &mut preface)?;
                (String::new(), u.op.glsl(&x))
            }
            ExprKind::Binary(b) => {
                let l = child(b.left, &mut preface)?;
                let r = child(b.right, &mut preface)?;
                (String::new(), (b.op.spec().glsl)(&l, &r))
            }
            ExprKind::Linear(l) => {
                let (Some(min), Some(max)) = (l.min, l.max) else {
                    return Err(VizError::invariant("linear bound without bounds"));
                };
                let x = child(l.input, &mut preface)?;
                let min = child(min, &mut preface)?;
                let max = child(max, &mut preface)?;
                (
                    String::new(),
                    format!("((({x}) - ({min})) / (({max}) - ({min})))"),
                )
            }
            ExprKind::Buckets(b) => {
                let x = child(b.input, &mut preface)?;
                let cmp = if b.categorical { "==" } else { "<" };
                let mut body = format!("float buckets{id}(float x) {{\n");
                for (i, elem) in b.list.iter().enumerate() {
                    let bound = child(*elem, &mut preface)?;
                    let _ = writeln!(
                        body,
                        "    if (x {cmp} ({bound})) return {};",
                        glsl_float(i as f64)
                    );
                }
                let _ = writeln!(body, "    return {};\n}}", glsl_float(b.list.len() as f64));
                (body, format!("buckets{id}({x})"))
            }
            ExprKind::Top(t) => {
                let x = child(t.property, &mut preface)?;
                let mut body = format!("float top{id}(float x) {{\n");
                for member in &t.members {
                    let v = glsl_float(f64::from(member.0));
                    let _ = writeln!(body, "    if (x == {v}) return {v};");
                }
                body.push_str("    return -1.;\n}\n");
                (body, format!("top{id}({x})"))
            }
            ExprKind::Classifier(c) => {
                let x = child(c.input, &mut preface)?;
                let breakpoints = c.breakpoints()?;
                let divisor = c.num_categories.saturating_sub(1).max(1) as f64;
                let mut body = String::new();
                for k in 0..breakpoints.len() {
                    let _ = writeln!(body, "uniform float classifier{id}_bp{k};");
                }
                let _ = writeln!(body, "float classifier{id}(float x) {{");
                for k in 0..breakpoints.len() {
                    let _ = writeln!(
                        body,
                        "    if (x <= classifier{id}_bp{k}) return {};",
                        glsl_float(k as f64 / divisor)
                    );
                }
                body.push_str("    return 1.;\n}\n");
                (body, format!("classifier{id}({x})"))
            }
            ExprKind::Ramp(r) => self.ramp_glsl(id, r, resolver, &mut preface)?,
            ExprKind::ImageList(_) | ExprKind::Palette(_) | ExprKind::Array(_) => {
                return Err(VizError::type_error(format!(
                    "expression #{id} is a palette and has no shader value"
                )));
            }
        };

        if !own.is_empty() {
            preface.push_str(&guarded(id, &own));
        }
        Ok(ShaderSource { preface, inline })
    }

    fn ramp_glsl(
        &self,
        id: NodeId,
        ramp: &RampNode,
        resolver: &PropertyResolver<'_>,
        preface: &mut String,
    ) -> VizResult<(String, String)> {
        let binding = ramp.binding()?;
        let input = self.glsl(ramp.input, resolver)?;
        preface.push_str(&input.preface);

        let mut own = String::new();
        let index = match binding.role {
            InputRole::Property | InputRole::Top => {
                let source = self.glsl(binding.index_source, resolver)?;
                preface.push_str(&source.preface);
                let mut ranked: Vec<_> = binding.ranks.iter().collect();
                ranked.sort_by_key(|(_, rank)| **rank);
                let fallback = if binding.role == InputRole::Top {
                    binding.rank_fallback
                } else {
                    0.0
                };
                let _ = writeln!(own, "float ramp_cat{id}(float c) {{");
                for (cat, rank) in ranked {
                    let _ = writeln!(
                        own,
                        "    if (c == {}) return {};",
                        glsl_float(f64::from(cat.0)),
                        glsl_float(*rank as f64)
                    );
                }
                let _ = writeln!(own, "    return {};\n}}", glsl_float(fallback));
                format!("ramp_cat{id}({})", source.inline)
            }
            _ => input.inline,
        };

        let inline = match binding.mode {
            RampMode::Color => {
                preface.push_str(CIELAB_GLSL);
                let stops: Vec<String> = self
                    .ramp_colors(ramp)?
                    .into_iter()
                    .map(|c| glsl_lab(rgba_to_cielab(c)))
                    .collect();
                let _ = writeln!(own, "uniform float rampMax{id};");
                let _ = writeln!(own, "uniform sampler2D rampTexture{id};");
                let _ = writeln!(
                    own,
                    "vec4 ramp_color{id}(float x) {{\n    return {};\n}}",
                    glsl_blend(&stops, "x")
                );
                format!("cielabToSRGBA(ramp_color{id}(({index}) / rampMax{id}))")
            }
            RampMode::Number => {
                let PaletteDesc::Numbers(elems) = &ramp.palette else {
                    return Err(VizError::invariant("number ramp without a number palette"));
                };
                let mut stops = Vec::with_capacity(elems.len());
                for elem in elems {
                    let src = self.glsl(*elem, resolver)?;
                    preface.push_str(&src.preface);
                    stops.push(src.inline);
                }
                let _ = writeln!(own, "uniform float rampMax{id};");
                let _ = writeln!(own, "uniform sampler2D rampTexture{id};");
                let _ = writeln!(
                    own,
                    "float ramp_num{id}(float x) {{\n    return {};\n}}",
                    glsl_blend(&stops, "x")
                );
                format!("ramp_num{id}(({index}) / rampMax{id})")
            }
            RampMode::Image => {
                let PaletteDesc::Images(list_id) = ramp.palette else {
                    return Err(VizError::invariant("image ramp without an image list"));
                };
                let ExprKind::ImageList(list) = self.kind(list_id)? else {
                    return Err(VizError::invariant("image palette is not an image list"));
                };
                preface.push_str(&guarded(list_id, &image_list_glsl(list_id, list)));
                let slot = match (binding.role, binding.num_categories) {
                    (InputRole::Classifier, Some(n)) => format!(
                        "floor(({index}) * {} + 0.5)",
                        glsl_float(n as f64 - 1.0)
                    ),
                    _ => index,
                };
                format!("imageList{list_id}(imageUV, {slot})")
            }
        };
        Ok((own, inline))
    }
}

fn image_list_glsl(id: NodeId, list: &ImageListNode) -> String {
    let mut out = String::new();
    for k in 0..list.urls.len() {
        let _ = writeln!(out, "uniform sampler2D {};", sampler_name(id, k));
    }
    let _ = writeln!(out, "vec4 imageList{id}(vec2 imageUV, float cat) {{");
    for k in 0..list.urls.len() {
        let _ = writeln!(
            out,
            "    if (cat == {}) return texture2D({}, imageUV);",
            glsl_float(k as f64),
            sampler_name(id, k)
        );
    }
    out.push_str("    return vec4(0.);\n}\n");
    out
}

#[cfg(test)]
#[path = "../../tests/unit/expression/shader.rs"]
mod tests;
