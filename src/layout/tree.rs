//! Arena of layout nodes and the operations that mutate it
//!
//! Nodes live in a [`SlotMap`] and refer to each other by [`NodeId`]. A
//! parent lists its children; each child records the parent that owns it.
//! A child whose `owner` differs from the parent listing it is shared with
//! another tree and is cloned before that parent writes to it.

use std::any::Any;
use std::rc::Rc;

use slotmap::SlotMap;

use super::config::{CloneNodeFunc, Config};
use super::error::LayoutError;
use super::node::{Node, NodeId};
use super::results::LayoutResults;
use super::style::{Style, DEFAULT_FLEX_GROW, DEFAULT_FLEX_SHRINK, WEB_DEFAULT_FLEX_SHRINK};
use super::types::{
    Align, Dimension, Direction, Display, Edge, FlexDirection, Justify, MeasureMode, NodeType,
    Overflow, PositionType, Size, Wrap,
};
use super::value::{FloatOptional, Value};

/// Owns every node of one or more layout trees
#[derive(Debug)]
pub struct Tree {
    pub(crate) nodes: SlotMap<NodeId, Node>,
    pub(crate) config: Rc<Config>,
    pub(crate) generation: u32,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create a tree whose new nodes share `config`
    pub fn with_config(config: Config) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            config: Rc::new(config),
            generation: 0,
        }
    }

    pub fn config(&self) -> &Rc<Config> {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn node(&self, id: NodeId) -> Result<&Node, LayoutError> {
        self.nodes.get(id).ok_or(LayoutError::unknown(id))
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, LayoutError> {
        self.nodes.get_mut(id).ok_or(LayoutError::unknown(id))
    }

    pub fn layout(&self, id: NodeId) -> Result<&LayoutResults, LayoutError> {
        Ok(&self.node(id)?.layout)
    }

    pub fn style(&self, id: NodeId) -> Result<&Style, LayoutError> {
        Ok(&self.node(id)?.style)
    }

    // -- lifecycle --

    /// Add a detached node using the tree's config
    pub fn new_node(&mut self) -> NodeId {
        let config = self.config.clone();
        self.new_node_with_config(config)
    }

    pub fn new_node_with_config(&mut self, config: Rc<Config>) -> NodeId {
        self.nodes.insert(Node::new(config))
    }

    /// Remove a node, detaching it from its owner. Children it owns become detached.
    ///
    /// A node still listed by a cloned parent cannot be freed.
    pub fn free(&mut self, id: NodeId) -> Result<(), LayoutError> {
        let node = self.node(id)?;
        if node.is_shared() {
            return Err(LayoutError::SharedNode { id });
        }
        if let Some(owner) = node.owner {
            if let Some(owner_node) = self.nodes.get_mut(owner) {
                owner_node.children.retain(|c| *c != id);
            }
        }

        if let Some(node) = self.nodes.remove(id) {
            for child in node.children {
                self.unlist(id, child);
            }
        }
        Ok(())
    }

    pub fn free_recursive(&mut self, root: NodeId) -> Result<(), LayoutError> {
        self.free_recursive_with_cleanup(root, &mut |_| {})
    }

    /// Free `root` and every descendant it owns, calling `cleanup` on each
    /// node before it is removed. Children shared with another tree are left alone.
    pub fn free_recursive_with_cleanup(
        &mut self,
        root: NodeId,
        cleanup: &mut dyn FnMut(&Node),
    ) -> Result<(), LayoutError> {
        loop {
            let node = self.node(root)?;
            let Some(&child) = node.children.first() else {
                break;
            };
            if self.node(child)?.owner != Some(root) {
                break;
            }
            self.remove_child(root, child)?;
            if !self.node(child)?.is_shared() {
                self.free_recursive_with_cleanup(child, cleanup)?;
            }
        }
        cleanup(self.node(root)?);
        self.free(root)
    }

    /// Shallow copy: the clone shares the original's children and has no owner
    pub fn clone_node(&mut self, id: NodeId) -> Result<NodeId, LayoutError> {
        let mut node = self.node(id)?.clone();
        node.owner = None;
        node.shared_count = 0;
        let children = node.children.clone();
        let copy = self.nodes.insert(node);
        self.share_children(&children);
        Ok(copy)
    }

    /// Copy a whole subtree; every copied child is owned by its copied parent
    pub fn deep_clone(&mut self, id: NodeId) -> Result<NodeId, LayoutError> {
        let mut node = self.node(id)?.clone();
        node.owner = None;
        node.shared_count = 0;
        let children = std::mem::take(&mut node.children);
        let copy = self.nodes.insert(node);

        let mut cloned = Vec::with_capacity(children.len());
        for child in children {
            let child_copy = self.deep_clone(child)?;
            self.node_mut(child_copy)?.owner = Some(copy);
            cloned.push(child_copy);
        }
        self.node_mut(copy)?.children = cloned;
        Ok(copy)
    }

    /// Restore a detached leaf to a fresh state, keeping its config
    pub fn reset(&mut self, id: NodeId) -> Result<(), LayoutError> {
        let node = self.node(id)?;
        if !node.children.is_empty() {
            return Err(LayoutError::invalid_reset(
                id,
                "it still has children attached",
            ));
        }
        if node.owner.is_some() {
            return Err(LayoutError::invalid_reset(id, "it is still attached to an owner"));
        }
        if node.is_shared() {
            return Err(LayoutError::invalid_reset(id, "it is listed by a cloned parent"));
        }
        let config = node.config.clone();
        *self.node_mut(id)? = Node::new(config);
        Ok(())
    }

    // -- children --

    pub fn child_count(&self, id: NodeId) -> Result<usize, LayoutError> {
        Ok(self.node(id)?.children.len())
    }

    pub fn child(&self, id: NodeId, index: usize) -> Result<Option<NodeId>, LayoutError> {
        Ok(self.node(id)?.children.get(index).copied())
    }

    pub fn children(&self, id: NodeId) -> Result<&[NodeId], LayoutError> {
        Ok(&self.node(id)?.children)
    }

    /// The node that owns `id`, if any
    pub fn owner(&self, id: NodeId) -> Result<Option<NodeId>, LayoutError> {
        Ok(self.node(id)?.owner)
    }

    pub fn insert_child(
        &mut self,
        owner: NodeId,
        child: NodeId,
        index: usize,
    ) -> Result<(), LayoutError> {
        if let Some(current) = self.node(child)?.owner {
            return Err(LayoutError::ChildAlreadyOwned {
                child,
                owner: current,
            });
        }
        let parent = self.node(owner)?;
        if parent.measure.is_some() {
            return Err(LayoutError::ChildOfMeasuredNode { parent: owner });
        }
        if index > parent.children.len() {
            return Err(LayoutError::index_out_of_bounds(index, parent.children.len()));
        }

        self.clone_children_if_needed(owner)?;
        self.node_mut(owner)?.children.insert(index, child);
        self.node_mut(child)?.owner = Some(owner);
        self.mark_dirty_and_propagate(owner)
    }

    /// Append `child` after the existing children
    pub fn add_child(&mut self, owner: NodeId, child: NodeId) -> Result<(), LayoutError> {
        let index = self.child_count(owner)?;
        self.insert_child(owner, child, index)
    }

    /// Detach `child` from `owner`. A shared child list is copied first, minus the removed child.
    pub fn remove_child(&mut self, owner: NodeId, child: NodeId) -> Result<(), LayoutError> {
        let children = self.node(owner)?.children.clone();
        let Some(&first) = children.first() else {
            return Ok(());
        };

        if self.node(first)?.owner == Some(owner) {
            let parent = self.node_mut(owner)?;
            let Some(index) = parent.children.iter().position(|c| *c == child) else {
                return Ok(());
            };
            parent.children.remove(index);
            let removed = self.node_mut(child)?;
            removed.layout = LayoutResults::default();
            removed.owner = None;
            return self.mark_dirty_and_propagate(owner);
        }

        let callback = self.node(owner)?.config.clone_node_callback.clone();
        let mut kept = Vec::with_capacity(children.len());
        for old in children {
            if old == child {
                self.mark_dirty_and_propagate(owner)?;
            } else {
                let copy = self.clone_for_owner(old, owner, kept.len(), callback.as_ref())?;
                kept.push(copy);
            }
            self.unlist(owner, old);
        }
        self.node_mut(owner)?.children = kept;
        Ok(())
    }

    pub fn remove_all_children(&mut self, owner: NodeId) -> Result<(), LayoutError> {
        let children = std::mem::take(&mut self.node_mut(owner)?.children);
        let Some(&first) = children.first() else {
            return Ok(());
        };
        let owned = self.node(first)?.owner == Some(owner);
        for child in children {
            if owned {
                self.node_mut(child)?.layout = LayoutResults::default();
            }
            self.unlist(owner, child);
        }
        self.mark_dirty_and_propagate(owner)
    }

    /// Put `new_child` where `old_child` was
    pub fn replace_child(
        &mut self,
        owner: NodeId,
        old_child: NodeId,
        new_child: NodeId,
    ) -> Result<(), LayoutError> {
        let index = self
            .node(owner)?
            .children
            .iter()
            .position(|c| *c == old_child)
            .ok_or(LayoutError::unknown(old_child))?;
        if let Some(current) = self.node(new_child)?.owner {
            if current != owner {
                return Err(LayoutError::ChildAlreadyOwned {
                    child: new_child,
                    owner: current,
                });
            }
        }

        self.clone_children_if_needed(owner)?;
        let replaced = std::mem::replace(&mut self.node_mut(owner)?.children[index], new_child);
        if let Some(old) = self.nodes.get_mut(replaced) {
            if old.owner == Some(owner) {
                old.layout = LayoutResults::default();
            }
        }
        self.unlist(owner, replaced);
        self.node_mut(new_child)?.owner = Some(owner);
        self.mark_dirty_and_propagate(owner)
    }

    /// Replace the whole child list. Children kept from the old list are left untouched.
    pub fn set_children(&mut self, owner: NodeId, children: &[NodeId]) -> Result<(), LayoutError> {
        if self.node(owner)?.measure.is_some() && !children.is_empty() {
            return Err(LayoutError::ChildOfMeasuredNode { parent: owner });
        }
        for (index, &child) in children.iter().enumerate() {
            if children[..index].contains(&child) {
                return Err(LayoutError::DuplicateChild { child });
            }
            if let Some(current) = self.node(child)?.owner {
                if current != owner {
                    return Err(LayoutError::ChildAlreadyOwned {
                        child,
                        owner: current,
                    });
                }
            }
        }

        let old = std::mem::take(&mut self.node_mut(owner)?.children);
        for &old_child in &old {
            if !children.contains(&old_child) {
                if let Some(node) = self.nodes.get_mut(old_child) {
                    if node.owner == Some(owner) {
                        node.layout = LayoutResults::default();
                    }
                }
            }
            self.unlist(owner, old_child);
        }
        if old.is_empty() && children.is_empty() {
            return Ok(());
        }

        self.node_mut(owner)?.children = children.to_vec();
        for child in children {
            self.node_mut(*child)?.owner = Some(owner);
        }
        self.mark_dirty_and_propagate(owner)
    }

    // -- copy-on-write --

    /// Give `owner` private copies of its children if they are shared with another tree.
    ///
    /// The child list is private when its first child is owned by `owner`.
    pub fn clone_children_if_needed(&mut self, owner: NodeId) -> Result<(), LayoutError> {
        let node = self.node(owner)?;
        let Some(&first) = node.children.first() else {
            return Ok(());
        };
        if self.node(first)?.owner == Some(owner) {
            return Ok(());
        }

        let children = node.children.clone();
        let callback = node.config.clone_node_callback.clone();
        let mut copies = Vec::with_capacity(children.len());
        for (index, child) in children.into_iter().enumerate() {
            copies.push(self.clone_for_owner(child, owner, index, callback.as_ref())?);
            self.unlist(owner, child);
        }
        self.node_mut(owner)?.children = copies;
        Ok(())
    }

    fn clone_for_owner(
        &mut self,
        child: NodeId,
        owner: NodeId,
        index: usize,
        callback: Option<&CloneNodeFunc>,
    ) -> Result<NodeId, LayoutError> {
        let original = self.node(child)?;
        let mut copy = callback
            .and_then(|callback| callback(original, owner, index))
            .unwrap_or_else(|| original.clone());
        copy.owner = Some(owner);
        copy.shared_count = 0;
        let grandchildren = copy.children.clone();
        let id = self.nodes.insert(copy);
        self.share_children(&grandchildren);
        Ok(id)
    }

    /// Record that a new parent lists `children` without owning them
    fn share_children(&mut self, children: &[NodeId]) {
        for &child in children {
            if let Some(node) = self.nodes.get_mut(child) {
                node.shared_count += 1;
            }
        }
    }

    /// Drop `parent`'s claim on `child` after `parent` stops listing it
    fn unlist(&mut self, parent: NodeId, child: NodeId) {
        let Some(node) = self.nodes.get_mut(child) else {
            return;
        };
        if node.owner == Some(parent) {
            node.owner = None;
        } else {
            node.shared_count = node.shared_count.saturating_sub(1);
        }
    }

    /// Child `index` of `owner`, cloned first if it is shared with another tree
    pub fn child_for_write(&mut self, owner: NodeId, index: usize) -> Result<NodeId, LayoutError> {
        let len = self.child_count(owner)?;
        if index >= len {
            return Err(LayoutError::index_out_of_bounds(index, len));
        }
        self.clone_children_if_needed(owner)?;
        let child = self.node(owner)?.children[index];
        if !self.node(child)?.is_shared() {
            return Ok(child);
        }

        // Owned here but still listed by a clone: the clone keeps the original
        let callback = self.node(owner)?.config.clone_node_callback.clone();
        let copy = self.clone_for_owner(child, owner, index, callback.as_ref())?;
        self.node_mut(owner)?.children[index] = copy;
        self.unlist(owner, child);
        Ok(copy)
    }

    /// Edit the style of a child through its owner, copying shared children first
    pub fn update_child_style(
        &mut self,
        owner: NodeId,
        index: usize,
        f: impl FnOnce(&mut Style),
    ) -> Result<NodeId, LayoutError> {
        let child = self.child_for_write(owner, index)?;
        self.update_style(child, f)?;
        Ok(child)
    }

    // -- dirty tracking --

    /// Set the dirty flag. Becoming dirty propagates to the owner chain.
    pub fn set_dirty(&mut self, id: NodeId, dirty: bool) -> Result<(), LayoutError> {
        if dirty {
            self.mark_dirty_and_propagate(id)
        } else {
            self.node_mut(id)?.is_dirty = false;
            Ok(())
        }
    }

    /// Request a re-measure of a leaf whose content changed
    pub fn mark_dirty(&mut self, id: NodeId) -> Result<(), LayoutError> {
        if self.node(id)?.measure.is_none() {
            return Err(LayoutError::DirtyWithoutMeasureFunc { id });
        }
        self.mark_dirty_and_propagate(id)
    }

    /// Mark `id` and its ancestors dirty, stopping at the first one already dirty
    pub fn mark_dirty_and_propagate(&mut self, id: NodeId) -> Result<(), LayoutError> {
        self.node(id)?;
        let mut current = Some(id);
        while let Some(id) = current {
            let Some(node) = self.nodes.get_mut(id) else {
                break;
            };
            if node.is_dirty {
                break;
            }
            node.is_dirty = true;
            node.layout.computed_flex_basis = FloatOptional::UNDEFINED;
            if let Some(dirtied) = node.dirtied.clone() {
                dirtied(node);
            }
            current = node.owner;
        }
        Ok(())
    }

    /// Force a full recompute of a subtree. Intended for benchmarks.
    pub fn mark_dirty_and_propagate_to_descendants(&mut self, id: NodeId) -> Result<(), LayoutError> {
        let node = self.node_mut(id)?;
        node.is_dirty = true;
        node.layout.computed_flex_basis = FloatOptional::UNDEFINED;
        let children = node.children.clone();
        for child in children {
            self.mark_dirty_and_propagate_to_descendants(child)?;
        }
        Ok(())
    }

    pub fn is_dirty(&self, id: NodeId) -> Result<bool, LayoutError> {
        Ok(self.node(id)?.is_dirty)
    }

    pub fn has_new_layout(&self, id: NodeId) -> Result<bool, LayoutError> {
        Ok(self.node(id)?.has_new_layout)
    }

    /// Acknowledge a new layout so the next change can be detected
    pub fn set_has_new_layout(&mut self, id: NodeId, value: bool) -> Result<(), LayoutError> {
        self.node_mut(id)?.has_new_layout = value;
        Ok(())
    }

    // -- callbacks and context --

    /// Install a measure function; the node becomes a text leaf
    pub fn set_measure_func(
        &mut self,
        id: NodeId,
        measure: impl Fn(&Node, FloatOptional, MeasureMode, FloatOptional, MeasureMode) -> Size + 'static,
    ) -> Result<(), LayoutError> {
        let node = self.node_mut(id)?;
        if !node.children.is_empty() {
            return Err(LayoutError::MeasureFuncWithChildren {
                id,
                children: node.children.len(),
            });
        }
        node.measure = Some(Rc::new(measure));
        node.node_type = NodeType::Text;
        Ok(())
    }

    pub fn clear_measure_func(&mut self, id: NodeId) -> Result<(), LayoutError> {
        let node = self.node_mut(id)?;
        node.measure = None;
        node.node_type = NodeType::Default;
        Ok(())
    }

    pub fn set_baseline_func(
        &mut self,
        id: NodeId,
        baseline: impl Fn(&Node, f32, f32) -> f32 + 'static,
    ) -> Result<(), LayoutError> {
        self.node_mut(id)?.baseline = Some(Rc::new(baseline));
        Ok(())
    }

    pub fn clear_baseline_func(&mut self, id: NodeId) -> Result<(), LayoutError> {
        self.node_mut(id)?.baseline = None;
        Ok(())
    }

    pub fn set_dirtied_func(
        &mut self,
        id: NodeId,
        dirtied: impl Fn(&Node) + 'static,
    ) -> Result<(), LayoutError> {
        self.node_mut(id)?.dirtied = Some(Rc::new(dirtied));
        Ok(())
    }

    pub fn clear_dirtied_func(&mut self, id: NodeId) -> Result<(), LayoutError> {
        self.node_mut(id)?.dirtied = None;
        Ok(())
    }

    pub fn set_print_func(
        &mut self,
        id: NodeId,
        print: impl Fn(&Node) -> String + 'static,
    ) -> Result<(), LayoutError> {
        self.node_mut(id)?.print = Some(Rc::new(print));
        Ok(())
    }

    pub fn clear_print_func(&mut self, id: NodeId) -> Result<(), LayoutError> {
        self.node_mut(id)?.print = None;
        Ok(())
    }

    pub fn set_context(&mut self, id: NodeId, context: Option<Rc<dyn Any>>) -> Result<(), LayoutError> {
        self.node_mut(id)?.context = context;
        Ok(())
    }

    pub fn set_node_type(&mut self, id: NodeId, node_type: NodeType) -> Result<(), LayoutError> {
        self.node_mut(id)?.node_type = node_type;
        Ok(())
    }

    /// Make this child the one its owner aligns baselines against
    pub fn set_is_reference_baseline(&mut self, id: NodeId, value: bool) -> Result<(), LayoutError> {
        let node = self.node_mut(id)?;
        if node.is_reference_baseline != value {
            node.is_reference_baseline = value;
            self.mark_dirty_and_propagate(id)?;
        }
        Ok(())
    }

    /// Point a node at a different config; the node is re-laid out on the next pass
    pub fn set_node_config(&mut self, id: NodeId, config: Rc<Config>) -> Result<(), LayoutError> {
        self.node_mut(id)?.config = config;
        self.mark_dirty_and_propagate(id)
    }

    // -- style --

    /// Edit a node's style in place; the node is marked dirty only if something changed.
    ///
    /// Fails with [`LayoutError::SharedNode`] while a cloned parent also lists
    /// the node; use [`Tree::update_child_style`] to write through one owner.
    pub fn update_style(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&mut Style),
    ) -> Result<(), LayoutError> {
        let node = self.node_mut(id)?;
        if node.is_shared() {
            return Err(LayoutError::SharedNode { id });
        }
        let before = node.style.clone();
        f(&mut node.style);
        if node.style != before {
            self.mark_dirty_and_propagate(id)?;
        }
        Ok(())
    }

    pub fn set_style(&mut self, id: NodeId, style: Style) -> Result<(), LayoutError> {
        self.update_style(id, |s| *s = style)
    }

    /// Copy the style of `src` onto `dst`
    pub fn copy_style(&mut self, dst: NodeId, src: NodeId) -> Result<(), LayoutError> {
        let style = self.node(src)?.style.clone();
        self.set_style(dst, style)
    }

    pub fn set_flex(&mut self, id: NodeId, flex: f32) -> Result<(), LayoutError> {
        self.update_style(id, |s| s.flex = FloatOptional::new(flex))
    }

    pub fn flex(&self, id: NodeId) -> Result<FloatOptional, LayoutError> {
        Ok(self.node(id)?.style.flex)
    }

    pub fn set_flex_grow(&mut self, id: NodeId, grow: f32) -> Result<(), LayoutError> {
        self.update_style(id, |s| s.flex_grow = FloatOptional::new(grow))
    }

    /// Style flex-grow, or the default when unset
    pub fn flex_grow(&self, id: NodeId) -> Result<f32, LayoutError> {
        Ok(self.node(id)?.style.flex_grow.unwrap_or(DEFAULT_FLEX_GROW))
    }

    pub fn set_flex_shrink(&mut self, id: NodeId, shrink: f32) -> Result<(), LayoutError> {
        self.update_style(id, |s| s.flex_shrink = FloatOptional::new(shrink))
    }

    pub fn flex_shrink(&self, id: NodeId) -> Result<f32, LayoutError> {
        let node = self.node(id)?;
        let default = if node.config.use_web_defaults {
            WEB_DEFAULT_FLEX_SHRINK
        } else {
            DEFAULT_FLEX_SHRINK
        };
        Ok(node.style.flex_shrink.unwrap_or(default))
    }

    pub fn set_aspect_ratio(&mut self, id: NodeId, ratio: f32) -> Result<(), LayoutError> {
        self.update_style(id, |s| s.aspect_ratio = FloatOptional::new(ratio))
    }

    pub fn aspect_ratio(&self, id: NodeId) -> Result<FloatOptional, LayoutError> {
        Ok(self.node(id)?.style.aspect_ratio)
    }

    pub fn set_margin(&mut self, id: NodeId, edge: Edge, value: Value) -> Result<(), LayoutError> {
        self.update_style(id, |s| s.margin[edge.index()] = value)
    }

    pub fn margin(&self, id: NodeId, edge: Edge) -> Result<Value, LayoutError> {
        Ok(self.node(id)?.style.margin(edge))
    }

    pub fn set_padding(&mut self, id: NodeId, edge: Edge, value: Value) -> Result<(), LayoutError> {
        self.update_style(id, |s| s.padding[edge.index()] = value)
    }

    pub fn padding(&self, id: NodeId, edge: Edge) -> Result<Value, LayoutError> {
        Ok(self.node(id)?.style.padding(edge))
    }

    /// Borders are widths in points
    pub fn set_border(&mut self, id: NodeId, edge: Edge, width: f32) -> Result<(), LayoutError> {
        self.update_style(id, |s| s.border[edge.index()] = Value::point(width))
    }

    pub fn border(&self, id: NodeId, edge: Edge) -> Result<Value, LayoutError> {
        Ok(self.node(id)?.style.border(edge))
    }

    pub fn set_position(&mut self, id: NodeId, edge: Edge, value: Value) -> Result<(), LayoutError> {
        self.update_style(id, |s| s.position[edge.index()] = value)
    }

    pub fn position(&self, id: NodeId, edge: Edge) -> Result<Value, LayoutError> {
        Ok(self.node(id)?.style.position(edge))
    }

    pub fn set_dimension(
        &mut self,
        id: NodeId,
        dimension: Dimension,
        value: Value,
    ) -> Result<(), LayoutError> {
        self.update_style(id, |s| s.dimensions[dimension.index()] = value)
    }

    pub fn set_min_dimension(
        &mut self,
        id: NodeId,
        dimension: Dimension,
        value: Value,
    ) -> Result<(), LayoutError> {
        self.update_style(id, |s| s.min_dimensions[dimension.index()] = value)
    }

    pub fn set_max_dimension(
        &mut self,
        id: NodeId,
        dimension: Dimension,
        value: Value,
    ) -> Result<(), LayoutError> {
        self.update_style(id, |s| s.max_dimensions[dimension.index()] = value)
    }
}

/// Setter and getter pairs for style fields that are stored as given
macro_rules! style_accessors {
    ($($setter:ident, $getter:ident => $field:ident: $ty:ty;)+) => {
        impl Tree {
            $(
                pub fn $setter(&mut self, id: NodeId, value: $ty) -> Result<(), LayoutError> {
                    self.update_style(id, |s| s.$field = value)
                }

                pub fn $getter(&self, id: NodeId) -> Result<$ty, LayoutError> {
                    Ok(self.node(id)?.style.$field)
                }
            )+
        }
    };
}

style_accessors! {
    set_direction, direction => direction: Direction;
    set_flex_direction, flex_direction => flex_direction: FlexDirection;
    set_justify_content, justify_content => justify_content: Justify;
    set_align_content, align_content => align_content: Align;
    set_align_items, align_items => align_items: Align;
    set_align_self, align_self => align_self: Align;
    set_position_type, position_type => position_type: PositionType;
    set_flex_wrap, flex_wrap => flex_wrap: Wrap;
    set_overflow, overflow => overflow: Overflow;
    set_display, display => display: Display;
    set_flex_basis, flex_basis => flex_basis: Value;
}

/// Per-dimension shorthands over [`Tree::set_dimension`] and friends
macro_rules! dimension_accessors {
    ($($setter:ident, $getter:ident => $array:ident[$dim:expr];)+) => {
        impl Tree {
            $(
                pub fn $setter(&mut self, id: NodeId, value: Value) -> Result<(), LayoutError> {
                    self.update_style(id, |s| s.$array[$dim.index()] = value)
                }

                pub fn $getter(&self, id: NodeId) -> Result<Value, LayoutError> {
                    Ok(self.node(id)?.style.$array[$dim.index()])
                }
            )+
        }
    };
}

dimension_accessors! {
    set_width, width => dimensions[Dimension::Width];
    set_height, height => dimensions[Dimension::Height];
    set_min_width, min_width => min_dimensions[Dimension::Width];
    set_min_height, min_height => min_dimensions[Dimension::Height];
    set_max_width, max_width => max_dimensions[Dimension::Width];
    set_max_height, max_height => max_dimensions[Dimension::Height];
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    fn tree_with_children(count: usize) -> (Tree, NodeId, Vec<NodeId>) {
        let mut tree = Tree::new();
        let root = tree.new_node();
        let children: Vec<_> = (0..count)
            .map(|i| {
                let child = tree.new_node();
                tree.insert_child(root, child, i).expect("insert child");
                child
            })
            .collect();
        (tree, root, children)
    }

    #[test]
    fn test_insert_sets_owner_and_dirties() {
        let (tree, root, children) = tree_with_children(2);
        assert_eq!(tree.children(root).unwrap(), children.as_slice());
        assert_eq!(tree.owner(children[0]).unwrap(), Some(root));
        assert!(tree.is_dirty(root).unwrap());
    }

    #[test]
    fn test_insert_rejects_owned_child() {
        let (mut tree, _, children) = tree_with_children(1);
        let other = tree.new_node();
        let err = tree.insert_child(other, children[0], 0).unwrap_err();
        assert!(matches!(err, LayoutError::ChildAlreadyOwned { .. }));
    }

    #[test]
    fn test_insert_rejects_bad_index() {
        let mut tree = Tree::new();
        let root = tree.new_node();
        let child = tree.new_node();
        let err = tree.insert_child(root, child, 3).unwrap_err();
        assert_eq!(err, LayoutError::index_out_of_bounds(3, 0));
    }

    #[test]
    fn test_measured_node_cannot_have_children() {
        let mut tree = Tree::new();
        let leaf = tree.new_node();
        tree.set_measure_func(leaf, |_, _, _, _, _| Size::new(1.0, 1.0))
            .unwrap();
        assert_eq!(tree.node(leaf).unwrap().node_type(), NodeType::Text);

        let child = tree.new_node();
        let err = tree.insert_child(leaf, child, 0).unwrap_err();
        assert_eq!(err, LayoutError::ChildOfMeasuredNode { parent: leaf });

        let (mut tree, root, _) = tree_with_children(1);
        let err = tree
            .set_measure_func(root, |_, _, _, _, _| Size::new(1.0, 1.0))
            .unwrap_err();
        assert!(matches!(err, LayoutError::MeasureFuncWithChildren { children: 1, .. }));
    }

    #[test]
    fn test_remove_child_clears_owner() {
        let (mut tree, root, children) = tree_with_children(3);
        tree.remove_child(root, children[1]).unwrap();
        assert_eq!(tree.children(root).unwrap(), &[children[0], children[2]]);
        assert_eq!(tree.owner(children[1]).unwrap(), None);
    }

    #[test]
    fn test_remove_child_from_shared_list_copies_the_rest() {
        let (mut tree, root, children) = tree_with_children(3);
        let copy = tree.clone_node(root).unwrap();

        tree.remove_child(copy, children[0]).unwrap();

        let remaining = tree.children(copy).unwrap().to_vec();
        assert_eq!(remaining.len(), 2);
        assert!(!remaining.contains(&children[1]));
        for child in &remaining {
            assert_eq!(tree.owner(*child).unwrap(), Some(copy));
        }
        assert_eq!(tree.children(root).unwrap(), children.as_slice());
    }

    #[test]
    fn test_set_children_detaches_dropped_nodes() {
        let (mut tree, root, children) = tree_with_children(2);
        let extra = tree.new_node();
        tree.set_children(root, &[children[1], extra]).unwrap();

        assert_eq!(tree.owner(children[0]).unwrap(), None);
        assert_eq!(tree.owner(children[1]).unwrap(), Some(root));
        assert_eq!(tree.owner(extra).unwrap(), Some(root));
    }

    #[test]
    fn test_set_children_rejects_foreign_and_duplicate_children() {
        let (mut tree, root, children) = tree_with_children(1);
        let other = tree.new_node();
        let loose = tree.new_node();

        let err = tree.set_children(other, &[children[0]]).unwrap_err();
        assert_eq!(
            err,
            LayoutError::ChildAlreadyOwned {
                child: children[0],
                owner: root
            }
        );
        assert_eq!(tree.owner(children[0]).unwrap(), Some(root));

        let err = tree.set_children(other, &[loose, loose]).unwrap_err();
        assert_eq!(err, LayoutError::DuplicateChild { child: loose });
        assert!(tree.children(other).unwrap().is_empty());
    }

    #[test]
    fn test_replace_child() {
        let (mut tree, root, children) = tree_with_children(2);
        let replacement = tree.new_node();
        tree.replace_child(root, children[0], replacement).unwrap();
        assert_eq!(tree.children(root).unwrap(), &[replacement, children[1]]);
        assert_eq!(tree.owner(children[0]).unwrap(), None);
    }

    #[test]
    fn test_reset_requires_detached_leaf() {
        let (mut tree, root, children) = tree_with_children(1);
        assert!(tree.reset(root).is_err());
        assert!(tree.reset(children[0]).is_err());

        tree.remove_child(root, children[0]).unwrap();
        tree.set_width(children[0], Value::point(10.0)).unwrap();
        tree.reset(children[0]).unwrap();
        assert_eq!(tree.width(children[0]).unwrap(), Value::Auto);
    }

    #[test]
    fn test_free_recursive_skips_shared_children() {
        let (mut tree, root, children) = tree_with_children(2);
        let copy = tree.clone_node(root).unwrap();
        let freed = Cell::new(0);

        tree.free_recursive_with_cleanup(copy, &mut |_| freed.set(freed.get() + 1))
            .unwrap();

        assert_eq!(freed.get(), 1);
        assert!(tree.contains(children[0]));
        assert!(!tree.contains(copy));

        tree.free_recursive(root).unwrap();
        assert!(tree.is_empty());
    }

    #[test]
    fn test_free_refuses_shared_child() {
        let (mut tree, root, children) = tree_with_children(2);
        let copy = tree.clone_node(root).unwrap();

        let err = tree.free(children[0]).unwrap_err();
        assert_eq!(err, LayoutError::SharedNode { id: children[0] });
        assert_eq!(tree.children(copy).unwrap(), children.as_slice());

        tree.calculate_layout(copy, 100.0, 100.0, Direction::Ltr).unwrap();
        tree.calculate_layout(root, 100.0, 100.0, Direction::Ltr).unwrap();

        tree.free_recursive(copy).unwrap();
        assert!(!tree.node(children[0]).unwrap().is_shared());
        tree.free(children[0]).unwrap();
        assert_eq!(tree.children(root).unwrap(), &[children[1]]);
    }

    #[test]
    fn test_shared_child_style_goes_through_owner() {
        let (mut tree, root, children) = tree_with_children(2);
        let copy = tree.clone_node(root).unwrap();

        let err = tree.set_width(children[0], Value::point(77.0)).unwrap_err();
        assert_eq!(err, LayoutError::SharedNode { id: children[0] });
        assert_eq!(tree.width(children[0]).unwrap(), Value::Auto);

        let written = tree
            .update_child_style(root, 0, |style| {
                style.dimensions[Dimension::Width.index()] = Value::point(77.0)
            })
            .unwrap();
        assert_ne!(written, children[0]);
        assert_eq!(tree.width(written).unwrap(), Value::point(77.0));
        assert_eq!(tree.owner(written).unwrap(), Some(root));
        assert_eq!(tree.children(copy).unwrap(), children.as_slice());
        assert_eq!(tree.width(children[0]).unwrap(), Value::Auto);

        // The copy still lists the original; writing through it makes its own copy
        assert_eq!(tree.owner(children[0]).unwrap(), None);
        assert!(tree.node(children[0]).unwrap().is_shared());
        let private = tree
            .update_child_style(copy, 0, |style| {
                style.dimensions[Dimension::Width.index()] = Value::point(5.0)
            })
            .unwrap();
        assert_eq!(tree.owner(private).unwrap(), Some(copy));
        assert!(!tree.node(children[0]).unwrap().is_shared());
        tree.set_width(children[0], Value::point(9.0)).unwrap();
    }

    #[test]
    fn test_free_detaches_from_owner() {
        let (mut tree, root, children) = tree_with_children(2);
        tree.free(children[0]).unwrap();
        assert_eq!(tree.children(root).unwrap(), &[children[1]]);
        assert!(tree.node(children[0]).is_err());
    }

    #[test]
    fn test_dirty_propagation_stops_at_dirty_ancestor() {
        let (mut tree, root, children) = tree_with_children(1);
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        tree.set_dirtied_func(root, move |_| counter.set(counter.get() + 1))
            .unwrap();

        tree.set_dirty(root, false).unwrap();
        tree.set_dirty(children[0], false).unwrap();

        tree.mark_dirty_and_propagate(children[0]).unwrap();
        tree.mark_dirty_and_propagate(children[0]).unwrap();
        tree.set_width(children[0], Value::point(5.0)).unwrap();

        assert!(tree.is_dirty(root).unwrap());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_unchanged_style_does_not_dirty() {
        let mut tree = Tree::new();
        let node = tree.new_node();
        tree.set_dirty(node, false).unwrap();
        tree.set_flex_direction(node, FlexDirection::Column).unwrap();
        assert!(!tree.is_dirty(node).unwrap());
        tree.set_flex_direction(node, FlexDirection::Row).unwrap();
        assert!(tree.is_dirty(node).unwrap());
    }

    #[test]
    fn test_mark_dirty_requires_measure_func() {
        let mut tree = Tree::new();
        let node = tree.new_node();
        assert_eq!(
            tree.mark_dirty(node).unwrap_err(),
            LayoutError::DirtyWithoutMeasureFunc { id: node }
        );
    }

    #[test]
    fn test_flex_shrink_default_follows_config() {
        let mut tree = Tree::with_config(Config::new().with_web_defaults(true));
        let node = tree.new_node();
        assert_eq!(tree.flex_shrink(node).unwrap(), 1.0);
        assert_eq!(tree.flex_direction(node).unwrap(), FlexDirection::Row);
        assert_eq!(tree.flex_grow(node).unwrap(), 0.0);
    }

    #[test]
    fn test_deep_clone_owns_copies() {
        let (mut tree, root, children) = tree_with_children(2);
        let copy = tree.deep_clone(root).unwrap();
        let copied = tree.children(copy).unwrap().to_vec();
        assert_eq!(copied.len(), 2);
        for (original, copied) in children.iter().zip(&copied) {
            assert_ne!(original, copied);
            assert_eq!(tree.owner(*copied).unwrap(), Some(copy));
        }
    }
}
