//! Palette descriptors and the category-to-color resolution rules.
//!
//! A palette is classified once when the ramp is built ([`PaletteDesc`]) and
//! resolved into concrete values by pure functions; nothing here mutates a
//! node in place.

use crate::color::palettes::NamedPalette;
use crate::color::rgba::Rgba;
use crate::foundation::error::VizResult;
use crate::foundation::ids::NodeId;

/// How a ramp reads its input, decided once at bind time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum InputRole {
    /// Bare category property; indexed by its frequency rank.
    Property,
    Buckets,
    Top,
    Classifier,
    /// Any numeric expression, already normalized to `[0, 1]`.
    Generic,
}

#[derive(Clone, Debug)]
pub(crate) enum PaletteDesc {
    Named(&'static NamedPalette),
    Colors(Vec<NodeId>),
    Numbers(Vec<NodeId>),
    Images(NodeId),
}

impl PaletteDesc {
    pub(crate) fn kind_name(&self) -> &'static str {
        match self {
            Self::Named(_) => "palette",
            Self::Colors(_) => "color-array",
            Self::Numbers(_) => "number-array",
            Self::Images(_) => "image-list",
        }
    }
}

/// Color source after resolution.
#[derive(Clone, Debug)]
pub(crate) enum ColorSource {
    Named(&'static NamedPalette),
    Literal(Vec<Rgba>),
}

/// Final stop list fed to the lookup table and the shader blend.
pub(crate) fn colors_for_ramp(
    role: InputRole,
    source: &ColorSource,
    num_categories: Option<usize>,
    others: Rgba,
) -> VizResult<Vec<Rgba>> {
    match source {
        ColorSource::Named(palette) => colors_from_named(role, palette, num_categories, others),
        ColorSource::Literal(colors) => Ok(match num_categories {
            Some(n) => colors_from_literal(role, colors, n, others),
            None => colors.clone(),
        }),
    }
}

fn colors_from_named(
    role: InputRole,
    palette: &NamedPalette,
    num_categories: Option<usize>,
    default_others: Rgba,
) -> VizResult<Vec<Rgba>> {
    let mut colors = palette.sub_palette_or_longest(num_categories)?;
    let qualitative = palette.is_qualitative();

    let Some(n) = num_categories else {
        if qualitative {
            colors.pop();
        }
        return Ok(colors);
    };

    let others = match role {
        InputRole::Buckets => {
            if qualitative {
                colors.get(n).copied().unwrap_or(default_others)
            } else {
                colors.push(default_others);
                default_others
            }
        }
        InputRole::Top => {
            if qualitative {
                colors.last().copied().unwrap_or(default_others)
            } else {
                default_others
            }
        }
        InputRole::Property | InputRole::Classifier | InputRole::Generic => {
            if qualitative {
                colors.pop();
                colors.get(n).copied().unwrap_or(default_others)
            } else {
                default_others
            }
        }
    };
    Ok(avoid_showing_interpolation(n, &colors, others))
}

fn colors_from_literal(role: InputRole, colors: &[Rgba], n: usize, others: Rgba) -> Vec<Rgba> {
    let len = colors.len();
    if role == InputRole::Classifier && n < len {
        return colors.to_vec();
    }
    if role == InputRole::Property {
        return colors.to_vec();
    }
    if n < len {
        return avoid_showing_interpolation(n, colors, colors[n]);
    }
    let mut with_others = colors.to_vec();
    with_others.push(others);
    if n > len {
        return with_others;
    }
    avoid_showing_interpolation(n, &with_others, others)
}

/// Keep the first `n` colors and put `others` in slot `n`, if the list reaches it.
pub(crate) fn avoid_showing_interpolation(n: usize, colors: &[Rgba], others: Rgba) -> Vec<Rgba> {
    let mut out: Vec<Rgba> = colors.iter().take(n).copied().collect();
    if colors.len() > n {
        out.push(others);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/expression/palette.rs"]
mod tests;
