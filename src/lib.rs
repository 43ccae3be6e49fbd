//! mapviz evaluates data-driven map styling expressions twice: on the host,
//! per feature, and as generated GLSL executed on the GPU.
//!
//! The public API is arena-oriented:
//!
//! - Parse a style into an [`ExprArena`] (or a multi-property [`Style`])
//! - Bind it once to a [`Metadata`] snapshot
//! - Evaluate features with [`ExprArena::eval`], generate shader text with
//!   [`ExprArena::to_shader_source`], upload per-draw state through a
//!   [`UniformSink`], and extract legends from ramps
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod color;
pub(crate) mod expression;
pub(crate) mod feature;
pub(crate) mod metadata;
/// Multi-property styles.
pub mod style;
pub(crate) mod types;
pub(crate) mod uniforms;

pub use crate::foundation::error::{VizError, VizResult};
pub use crate::foundation::ids::{CategoryId, NodeId, TextureHandle};

pub use crate::color::cielab::{Lab, cielab_to_srgb, srgb_to_cielab};
pub use crate::color::palettes::{NamedPalette, PaletteTone, named_palette};
pub use crate::color::rgba::Rgba;
pub use crate::expression::arena::{ExprArena, ExprDisplay};
pub use crate::expression::binary::BinaryOp;
pub use crate::expression::classifier::ClassifierMethod;
pub use crate::expression::image_list::{DecodedImage, FileImageLoader, ImageLoader, decode_image};
pub use crate::expression::interp::{LOOKUP_TABLE_SIZE, LookupTable};
pub use crate::expression::legend::{
    DEFAULT_OTHERS_LABEL, DEFAULT_SAMPLES, Legend, LegendEntry, LegendKey, LegendKind,
    LegendOptions, MAX_SAMPLES,
};
pub use crate::expression::ramp::{RampMode, RampOptions};
pub use crate::expression::shader::{PropertyResolver, ShaderSource, attribute_resolver};
pub use crate::expression::unary::UnaryOp;
pub use crate::expression::value::Value;
pub use crate::feature::{EmptyFeature, Feature, PropertyValue};
pub use crate::metadata::{CategoryStat, CategoryTable, Metadata, PropertyKind, PropertyMeta};
pub use crate::style::{Style, StyleShader};
pub use crate::types::{
    CATEGORIES_TO_NUMBER, COLORS_TO_COLOR, DATES_TO_DATES, IMAGES_TO_IMAGE,
    NUMBER_AND_COLOR_TO_COLOR, NUMBERS_TO_NUMBER, SignatureMask, UNSUPPORTED_SIGNATURE, ValueType,
    signature_of,
};
pub use crate::uniforms::{InMemoryUniforms, UniformSink};
