pub(crate) mod cielab;
pub(crate) mod named;
pub(crate) mod palettes;
pub(crate) mod rgba;
