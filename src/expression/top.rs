use crate::foundation::ids::{CategoryId, NodeId};

/// The `count` most frequent categories of a property; everything else is "others".
#[derive(Debug)]
pub(crate) struct TopNode {
    pub(crate) property: NodeId,
    pub(crate) count: usize,
    /// Kept categories by descending frequency; filled at bind time.
    pub(crate) members: Vec<CategoryId>,
}

impl TopNode {
    pub(crate) fn num_categories(&self) -> usize {
        self.count + 1
    }
}
