//! Error types for tree mutation and layout

use thiserror::Error;

use super::node::NodeId;

/// Contract violations reported by the tree and config APIs
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LayoutError {
    /// The id refers to a node that was freed or belongs to another tree
    #[error("node {id:?} does not exist")]
    UnknownNode { id: NodeId },

    /// Nodes with a measure function take their size from it and cannot have children
    #[error("cannot add a child to node {parent:?}: it has a measure function")]
    ChildOfMeasuredNode { parent: NodeId },

    #[error("cannot set a measure function on node {id:?}: it has {children} children")]
    MeasureFuncWithChildren { id: NodeId, children: usize },

    /// A child must be detached from its owner before it is inserted elsewhere
    #[error("child {child:?} is already owned by {owner:?}")]
    ChildAlreadyOwned { child: NodeId, owner: NodeId },

    /// Writing to a shared node would change every tree that lists it
    #[error("node {id:?} is shared with a cloned tree; edit it through its owner with update_child_style")]
    SharedNode { id: NodeId },

    #[error("child {child:?} appears more than once in the child list")]
    DuplicateChild { child: NodeId },

    #[error("child index {index} out of bounds for {len} children")]
    ChildIndexOutOfBounds { index: usize, len: usize },

    #[error("cannot reset node {id:?}: {reason}")]
    InvalidReset { id: NodeId, reason: String },

    #[error("only leaf nodes with a measure function may be marked dirty manually, {id:?} has none")]
    DirtyWithoutMeasureFunc { id: NodeId },

    #[error("point scale factor must not be negative, got {value}")]
    InvalidScaleFactor { value: f32 },
}

impl LayoutError {
    /// Create an unknown node error
    pub fn unknown(id: NodeId) -> Self {
        Self::UnknownNode { id }
    }

    /// Create an out-of-bounds child index error
    pub fn index_out_of_bounds(index: usize, len: usize) -> Self {
        Self::ChildIndexOutOfBounds { index, len }
    }

    /// Create an invalid reset error
    pub fn invalid_reset(id: NodeId, reason: impl Into<String>) -> Self {
        Self::InvalidReset {
            id,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_out_of_bounds_display() {
        let err = LayoutError::index_out_of_bounds(4, 2);
        assert!(err.to_string().contains("index 4"));
        assert!(err.to_string().contains("2 children"));
    }

    #[test]
    fn test_invalid_reset_display() {
        let err = LayoutError::invalid_reset(NodeId::default(), "it still has an owner");
        assert!(err.to_string().contains("still has an owner"));
    }

    #[test]
    fn test_scale_factor_display() {
        let err = LayoutError::InvalidScaleFactor { value: -2.0 };
        assert!(err.to_string().contains("-2"));
    }
}
