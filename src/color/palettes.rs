//! Named color palettes (CARTOcolors subset).
//!
//! Qualitative palettes end with a neutral "others" color; their sub-palette
//! for `n` categories is the first `n` colors followed by that neutral one.
//! Quantitative palettes are tabulated per class count.

use crate::color::rgba::Rgba;
use crate::foundation::error::VizResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaletteTone {
    /// Discrete colors, never interpolated between categories.
    Qualitative,
    /// Continuous ramp.
    Quantitative,
}

#[derive(Debug)]
enum Tabulation {
    Qualitative(&'static [&'static str]),
    Quantitative(&'static [&'static [&'static str]]),
}

#[derive(Debug)]
pub struct NamedPalette {
    pub name: &'static str,
    table: Tabulation,
}

impl NamedPalette {
    pub fn tone(&self) -> PaletteTone {
        match self.table {
            Tabulation::Qualitative(_) => PaletteTone::Qualitative,
            Tabulation::Quantitative(_) => PaletteTone::Quantitative,
        }
    }

    pub fn is_qualitative(&self) -> bool {
        self.tone() == PaletteTone::Qualitative
    }

    /// Sub-palette tabulated for exactly `n` classes.
    pub fn sub_palette(&self, n: usize) -> VizResult<Option<Vec<Rgba>>> {
        match self.table {
            Tabulation::Qualitative(colors) => {
                if n < 2 || n >= colors.len() {
                    return Ok(None);
                }
                let mut hex: Vec<&str> = colors[..n].to_vec();
                hex.push(colors[colors.len() - 1]);
                parse_all(&hex).map(Some)
            }
            Tabulation::Quantitative(subs) => match subs.iter().find(|s| s.len() == n) {
                Some(s) => parse_all(s).map(Some),
                None => Ok(None),
            },
        }
    }

    pub fn longest_sub_palette(&self) -> VizResult<Vec<Rgba>> {
        match self.table {
            Tabulation::Qualitative(colors) => parse_all(colors),
            Tabulation::Quantitative(subs) => {
                let longest = subs.iter().max_by_key(|s| s.len()).copied().unwrap_or(&[]);
                parse_all(longest)
            }
        }
    }

    /// Sub-palette for `n` classes, falling back to the longest one.
    pub fn sub_palette_or_longest(&self, n: Option<usize>) -> VizResult<Vec<Rgba>> {
        if let Some(n) = n
            && let Some(colors) = self.sub_palette(n)?
        {
            return Ok(colors);
        }
        if let Some(n) = n {
            tracing::warn!(
                palette = self.name,
                classes = n,
                "no sub-palette for class count, using the longest one"
            );
        }
        self.longest_sub_palette()
    }
}

fn parse_all(hex: &[&str]) -> VizResult<Vec<Rgba>> {
    hex.iter().map(|h| Rgba::from_hex(h)).collect()
}

pub static PRISM: NamedPalette = NamedPalette {
    name: "prism",
    table: Tabulation::Qualitative(&[
        "#5F4690", "#1D6996", "#38A6A5", "#0F8554", "#73AF48", "#EDAD08", "#E17C05", "#CC503E",
        "#94346E", "#6F4070", "#994E95", "#666666",
    ]),
};

pub static BOLD: NamedPalette = NamedPalette {
    name: "bold",
    table: Tabulation::Qualitative(&[
        "#7F3C8D", "#11A579", "#3969AC", "#F2B701", "#E73F74", "#80BA5A", "#E68310", "#008695",
        "#CF1C90", "#f97b72", "#4b4b8f", "#A5AA99",
    ]),
};

pub static VIVID: NamedPalette = NamedPalette {
    name: "vivid",
    table: Tabulation::Qualitative(&[
        "#E58606", "#5D69B1", "#52BCA3", "#99C945", "#CC61B0", "#24796C", "#DAA51B", "#2F8AC4",
        "#764E9F", "#ED645A", "#CC3A8E", "#A5AA99",
    ]),
};

pub static SUNSET: NamedPalette = NamedPalette {
    name: "sunset",
    table: Tabulation::Quantitative(&[
        &["#f3e79b", "#5c53a5"],
        &["#f3e79b", "#eb7f86", "#5c53a5"],
        &["#f3e79b", "#f8a07e", "#ce6693", "#5c53a5"],
        &["#f3e79b", "#fab27f", "#eb7f86", "#b95e9a", "#5c53a5"],
        &["#f3e79b", "#fac484", "#f8a07e", "#eb7f86", "#ce6693", "#5c53a5"],
        &[
            "#f3e79b", "#fac484", "#f8a07e", "#eb7f86", "#ce6693", "#a059a0", "#5c53a5",
        ],
    ]),
};

pub static BURG: NamedPalette = NamedPalette {
    name: "burg",
    table: Tabulation::Quantitative(&[&[
        "#ffc6c4", "#f4a3a8", "#e38191", "#cc607d", "#ad466c", "#8b3058", "#672044",
    ]]),
};

pub static EMRLD: NamedPalette = NamedPalette {
    name: "emrld",
    table: Tabulation::Quantitative(&[&[
        "#d3f2a3", "#97e196", "#6cc08b", "#4c9b82", "#217a79", "#105965", "#074050",
    ]]),
};

static ALL: [&NamedPalette; 6] = [&PRISM, &BOLD, &VIVID, &SUNSET, &BURG, &EMRLD];

/// Case-insensitive palette lookup.
pub fn named_palette(name: &str) -> Option<&'static NamedPalette> {
    ALL.iter()
        .copied()
        .find(|p| p.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
#[path = "../../tests/unit/color/palettes.rs"]
mod tests;
