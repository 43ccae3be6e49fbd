//! Multi-property styles.
//!
//! A style is a list of `name: expression` lines. Every property becomes one
//! root of a shared [`ExprArena`], and all roots are bound to the same
//! metadata snapshot.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::expression::arena::ExprArena;
use crate::expression::image_list::ImageLoader;
use crate::expression::legend::{Legend, LegendOptions};
use crate::expression::ramp::RampOptions;
use crate::expression::shader::{PropertyResolver, ShaderSource};
use crate::expression::value::Value;
use crate::feature::Feature;
use crate::foundation::error::{VizError, VizResult};
use crate::foundation::ids::NodeId;
use crate::metadata::Metadata;
use crate::uniforms::UniformSink;

/// Shader text of a whole style: one shared preface, one inline value per property.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct StyleShader {
    pub preface: String,
    pub properties: BTreeMap<String, String>,
}

#[derive(Debug)]
pub struct Style {
    arena: ExprArena,
    roots: Vec<(String, NodeId)>,
}

fn is_property_name(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Split style text into `(name, expression, byte offset of the expression)`.
fn split_properties(src: &str) -> VizResult<Vec<(String, String, usize)>> {
    let mut out: Vec<(String, String, usize)> = Vec::new();
    let mut offset = 0;
    for line in src.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with("//") {
            continue;
        }
        if let Some((name, expr)) = line.split_once(':')
            && is_property_name(name.trim())
        {
            let expr_offset = line_start + name.len() + 1;
            out.push((name.trim().to_owned(), expr.to_owned(), expr_offset));
            continue;
        }
        match out.last_mut() {
            Some((_, expr, _)) => expr.push_str(line),
            None => {
                return Err(VizError::parse(
                    line_start,
                    "expected 'name: expression' at the start of the style",
                ));
            }
        }
    }
    Ok(out)
}

impl Style {
    pub fn parse(src: &str) -> VizResult<Self> {
        Self::parse_with(src, RampOptions::default())
    }

    pub fn parse_with(src: &str, ramp_options: RampOptions) -> VizResult<Self> {
        let mut arena = ExprArena::new().with_ramp_options(ramp_options);
        let mut roots: Vec<(String, NodeId)> = Vec::new();
        for (name, expr, offset) in split_properties(src)? {
            if roots.iter().any(|(n, _)| *n == name) {
                return Err(VizError::validation(format!(
                    "style property '{name}' is defined twice"
                )));
            }
            let root = arena.parse(&expr).map_err(|e| match e {
                VizError::Parse { offset: at, message } => VizError::Parse {
                    offset: offset + at,
                    message: format!("{name}: {message}"),
                },
                other => other,
            })?;
            roots.push((name, root));
        }
        if roots.is_empty() {
            return Err(VizError::validation("style has no properties"));
        }
        Ok(Self { arena, roots })
    }

    /// Bind every property to one metadata snapshot.
    #[tracing::instrument(skip(self, metadata))]
    pub fn compile(&mut self, metadata: Arc<Metadata>) -> VizResult<()> {
        for (name, root) in &self.roots {
            self.arena
                .bind_metadata(*root, Arc::clone(&metadata))
                .map_err(|e| prefix_error(name, e))?;
        }
        tracing::debug!(properties = self.roots.len(), "style compiled");
        Ok(())
    }

    pub fn arena(&self) -> &ExprArena {
        &self.arena
    }

    pub fn arena_mut(&mut self) -> &mut ExprArena {
        &mut self.arena
    }

    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.roots.iter().map(|(n, _)| n.as_str())
    }

    pub fn root(&self, name: &str) -> VizResult<NodeId> {
        self.roots
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, id)| *id)
            .ok_or_else(|| VizError::validation(format!("style has no property '{name}'")))
    }

    pub fn eval(&self, name: &str, feature: &dyn Feature) -> VizResult<Value> {
        self.arena.eval(self.root(name)?, feature)
    }

    pub fn legend(&self, name: &str, options: &LegendOptions) -> VizResult<Legend> {
        self.arena.legend(self.root(name)?, options)
    }

    pub fn load_images(&mut self, loader: &dyn ImageLoader) -> VizResult<()> {
        for (_, root) in &self.roots {
            self.arena.load_images(*root, loader)?;
        }
        Ok(())
    }

    pub fn pre_draw(&self, sink: &mut dyn UniformSink) -> VizResult<()> {
        for (_, root) in &self.roots {
            self.arena.pre_draw(*root, sink)?;
        }
        Ok(())
    }

    pub fn shader_source(
        &self,
        name: &str,
        resolver: &PropertyResolver<'_>,
    ) -> VizResult<ShaderSource> {
        self.arena.to_shader_source(self.root(name)?, resolver)
    }

    /// Shader text for every property; prefaces are concatenated in property order.
    pub fn shader(&self, resolver: &PropertyResolver<'_>) -> VizResult<StyleShader> {
        let mut out = StyleShader::default();
        for (name, root) in &self.roots {
            let src = self
                .arena
                .to_shader_source(*root, resolver)
                .map_err(|e| prefix_error(name, e))?;
            out.preface.push_str(&src.preface);
            out.properties.insert(name.clone(), src.inline);
        }
        Ok(out)
    }
}

fn prefix_error(name: &str, err: VizError) -> VizError {
    match err {
        VizError::Validation(m) => VizError::Validation(format!("{name}: {m}")),
        VizError::Type(m) => VizError::Type(format!("{name}: {m}")),
        other => other,
    }
}

#[cfg(test)]
#[path = "../tests/unit/style.rs"]
mod tests;
