use std::fmt;

/// Index of a node inside an [`ExprArena`](crate::ExprArena).
///
/// Ids are dense and only meaningful for the arena that issued them. Shader
/// identifiers (`rampMax<id>`, `ramp_color<id>`, ...) are derived from them, so
/// two nodes of one arena can never generate colliding names.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct NodeId(pub u32);

impl NodeId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Dataset-wide category id handed out by a [`CategoryTable`](crate::CategoryTable).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct CategoryId(pub u32);

/// Opaque handle of a texture uploaded through a [`UniformSink`](crate::UniformSink).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);
