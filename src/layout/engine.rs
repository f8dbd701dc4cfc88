//! Layout pass driver
//!
//! [`Tree::calculate_layout`] sizes and positions a subtree. Each node is
//! visited through [`LayoutPass::layout_node_internal`], which consults the
//! node's measurement cache before running the flexbox algorithm in
//! [`LayoutPass::layout_impl`].

use std::rc::Rc;

use super::cache::{find_cached_result, CacheSlot};
use super::config::Config;
use super::error::LayoutError;
use super::node::{Node, NodeId};
use super::results::{CachedMeasurement, MAX_CACHED_RESULT_COUNT};
use super::rounding::round_to_pixel_grid;
use super::tree::Tree;
use super::types::{
    Dimension, Direction, Display, Edge, FlexDirection, LogLevel, MeasureMode, Overflow,
    PositionType, PrintOptions, Wrap,
};
use super::value::FloatOptional;

/// Counters collected during one call to [`Tree::calculate_layout`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutStats {
    /// Nodes laid out in full
    pub layouts: usize,
    /// Nodes sized without positioning their children
    pub measures: usize,
    /// Deepest use of any node's measurement ring buffer
    pub max_measure_cache: usize,
    pub cached_layouts: usize,
    pub cached_measures: usize,
    /// Calls into user measure functions
    pub measure_callbacks: usize,
    /// Most freeze iterations needed to resolve flexible lengths on one line
    pub max_flex_iterations: usize,
}

/// Mutable state threaded through one recursive layout pass
pub(crate) struct LayoutPass<'a> {
    pub(crate) tree: &'a mut Tree,
    pub(crate) generation: u32,
    pub(crate) stats: LayoutStats,
    depth: usize,
}

impl Tree {
    /// Lay out the subtree rooted at `root` inside the given owner size.
    ///
    /// Sizes accept anything convertible to [`FloatOptional`]; NaN or `None`
    /// mean the owner size is unknown. Results are read back through
    /// [`Tree::layout`].
    pub fn calculate_layout(
        &mut self,
        root: NodeId,
        owner_width: impl Into<FloatOptional>,
        owner_height: impl Into<FloatOptional>,
        owner_direction: Direction,
    ) -> Result<LayoutStats, LayoutError> {
        let owner_width = owner_width.into();
        let owner_height = owner_height.into();

        let node = self.node_mut(root)?;
        node.resolve_dimension();
        let (width, width_mode) = root_constraint(node, FlexDirection::Row, owner_width, owner_width);
        let (height, height_mode) =
            root_constraint(node, FlexDirection::Column, owner_height, owner_width);
        let config = node.config.clone();

        self.generation = self.generation.wrapping_add(1);
        let stats = self.run_root_pass(
            root,
            [width, height],
            [width_mode, height_mode],
            [owner_width, owner_height],
            owner_direction,
        );
        self.clear_dirty_recursive(root);

        if config.print_tree {
            let dump = self.to_string_with_options(root, PrintOptions::all())?;
            config.log(self.get(root), LogLevel::Debug, &dump);
        }

        if config.should_diff_layout_without_legacy_stretch_behaviour
            && self.node(root)?.layout.did_use_legacy_flag
        {
            self.diff_without_legacy_stretch(
                root,
                [width, height],
                [width_mode, height_mode],
                [owner_width, owner_height],
                owner_direction,
            )?;
        }

        Ok(stats)
    }

    fn run_root_pass(
        &mut self,
        root: NodeId,
        available: [FloatOptional; 2],
        modes: [MeasureMode; 2],
        owner: [FloatOptional; 2],
        owner_direction: Direction,
    ) -> LayoutStats {
        let generation = self.generation;
        let mut pass = LayoutPass::new(self, generation);
        let laid_out = pass.layout_node_internal(
            root,
            available[0],
            available[1],
            owner_direction,
            modes[0],
            modes[1],
            owner[0],
            owner[1],
            true,
            "initial",
        );
        if laid_out {
            let direction = pass.node(root).layout.direction;
            pass.set_position(root, direction, owner[0], owner[1], owner[0]);
            let scale = pass.node(root).config.point_scale_factor;
            round_to_pixel_grid(pass.tree, root, scale, 0.0, 0.0);
        }
        pass.stats
    }

    fn clear_dirty_recursive(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        node.is_dirty = false;
        let children = node.children.clone();
        for child in children {
            self.clear_dirty_recursive(child);
        }
    }

    /// Lay out a copy of the tree with legacy stretching disabled and record
    /// on `root` whether the result differs.
    fn diff_without_legacy_stretch(
        &mut self,
        root: NodeId,
        available: [FloatOptional; 2],
        modes: [MeasureMode; 2],
        owner: [FloatOptional; 2],
        owner_direction: Direction,
    ) -> Result<(), LayoutError> {
        let copy = self.deep_clone(root)?;
        self.disable_legacy_stretch_recursive(copy);
        self.mark_dirty_and_propagate_to_descendants(copy)?;
        self.node_mut(copy)?.resolve_dimension();

        self.generation = self.generation.wrapping_add(1);
        self.run_root_pass(copy, available, modes, owner, owner_direction);
        self.clear_dirty_recursive(copy);

        let differs = !self.layout_trees_equal(copy, root);
        self.node_mut(root)?.layout.does_legacy_stretch_flag_affect_layout = differs;
        tracing::debug!(?root, differs, "compared layout without legacy stretch");

        self.free_recursive(copy)
    }

    fn disable_legacy_stretch_recursive(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        if node.config.use_legacy_stretch_behaviour {
            let mut config = Config::clone(&node.config);
            config.use_legacy_stretch_behaviour = false;
            node.config = Rc::new(config);
        }
        let children = node.children.clone();
        for child in children {
            self.disable_legacy_stretch_recursive(child);
        }
    }

    fn layout_trees_equal(&self, a: NodeId, b: NodeId) -> bool {
        let (Some(left), Some(right)) = (self.get(a), self.get(b)) else {
            return false;
        };
        left.layout.same_geometry(&right.layout)
            && left.children.len() == right.children.len()
            && left
                .children
                .iter()
                .zip(&right.children)
                .all(|(l, r)| self.layout_trees_equal(*l, *r))
    }
}

/// Available size and mode for the root on one axis
fn root_constraint(
    node: &Node,
    axis: FlexDirection,
    owner_size: FloatOptional,
    owner_width: FloatOptional,
) -> (FloatOptional, MeasureMode) {
    let dimension = axis.dimension();
    if node.is_style_dim_defined(axis, owner_size) {
        let size = node.resolved_dimension(dimension).resolve(owner_size)
            + node.margin_for_axis(axis, owner_width);
        return (size, MeasureMode::Exactly);
    }
    let max = node.style.max_dimension(dimension).resolve(owner_size);
    if max.is_defined() {
        return (max, MeasureMode::AtMost);
    }
    let mode = if owner_size.is_defined() {
        MeasureMode::Exactly
    } else {
        MeasureMode::Undefined
    };
    (owner_size, mode)
}

/// Cap a size request at the node's max dimension
pub(crate) fn constrain_max_size_for_mode(
    node: &Node,
    axis: FlexDirection,
    owner_axis_size: FloatOptional,
    owner_width: FloatOptional,
    mode: &mut MeasureMode,
    size: &mut FloatOptional,
) {
    let max_size = node
        .style
        .max_dimension(axis.dimension())
        .resolve(owner_axis_size)
        + node.margin_for_axis(axis, owner_width);
    match mode {
        MeasureMode::Exactly | MeasureMode::AtMost => {
            if max_size.is_defined() && !(*size < max_size) {
                *size = max_size;
            }
        }
        MeasureMode::Undefined => {
            if max_size.is_defined() {
                *mode = MeasureMode::AtMost;
                *size = max_size;
            }
        }
    }
}

impl<'a> LayoutPass<'a> {
    pub(crate) fn new(tree: &'a mut Tree, generation: u32) -> Self {
        Self {
            tree,
            generation,
            stats: LayoutStats::default(),
            depth: 0,
        }
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.tree.nodes[id]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.tree.nodes[id]
    }

    pub(crate) fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.tree.nodes[id].children.clone()
    }

    /// Lay out or measure `id`, reusing a cached result when the request is compatible.
    ///
    /// Returns true when the node was actually recomputed.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn layout_node_internal(
        &mut self,
        id: NodeId,
        available_width: FloatOptional,
        available_height: FloatOptional,
        owner_direction: Direction,
        width_mode: MeasureMode,
        height_mode: MeasureMode,
        owner_width: FloatOptional,
        owner_height: FloatOptional,
        perform_layout: bool,
        reason: &'static str,
    ) -> bool {
        let generation = self.generation;
        self.depth += 1;

        let node = self.node_mut(id);
        let need_to_visit = (node.is_dirty && node.layout.generation_count != generation)
            || node.layout.last_owner_direction != Some(owner_direction);
        if need_to_visit {
            let layout = &mut node.layout;
            layout.next_cached_measurements_index = 0;
            layout.cached_layout = CachedMeasurement::default();
        }

        let node = self.node(id);
        let cached = find_cached_result(
            node,
            available_width,
            available_height,
            width_mode,
            height_mode,
            owner_width,
            perform_layout,
        );

        match cached {
            Some(slot) if !need_to_visit => {
                let layout = &mut self.node_mut(id).layout;
                let entry = match slot {
                    CacheSlot::Layout => layout.cached_layout,
                    CacheSlot::Measurement(index) => layout.cached_measurements[index],
                };
                layout.measured_dimensions = [
                    FloatOptional::new(entry.computed_width),
                    FloatOptional::new(entry.computed_height),
                ];
                if perform_layout {
                    self.stats.cached_layouts += 1;
                } else {
                    self.stats.cached_measures += 1;
                }
                tracing::trace!(
                    depth = self.depth,
                    reason,
                    width = entry.computed_width,
                    height = entry.computed_height,
                    "cache hit"
                );
            }
            _ => {
                tracing::trace!(
                    depth = self.depth,
                    reason,
                    %available_width,
                    %available_height,
                    ?width_mode,
                    ?height_mode,
                    perform_layout,
                    "visit"
                );
                self.layout_impl(
                    id,
                    available_width,
                    available_height,
                    owner_direction,
                    width_mode,
                    height_mode,
                    owner_width,
                    owner_height,
                    perform_layout,
                );

                let depth = self.depth;
                let layout = &mut self.node_mut(id).layout;
                layout.last_owner_direction = Some(owner_direction);

                if cached.is_none() {
                    if layout.next_cached_measurements_index == MAX_CACHED_RESULT_COUNT {
                        tracing::trace!(depth, "out of cache entries");
                        layout.next_cached_measurements_index = 0;
                    }
                    let used = layout.next_cached_measurements_index + 1;

                    let entry = CachedMeasurement {
                        available_width,
                        available_height,
                        width_measure_mode: Some(width_mode),
                        height_measure_mode: Some(height_mode),
                        computed_width: layout.measured_dimensions[0].unwrap_or(-1.0),
                        computed_height: layout.measured_dimensions[1].unwrap_or(-1.0),
                    };
                    if perform_layout {
                        layout.cached_layout = entry;
                    } else {
                        let index = layout.next_cached_measurements_index;
                        layout.cached_measurements[index] = entry;
                        layout.next_cached_measurements_index += 1;
                    }
                    self.stats.max_measure_cache = self.stats.max_measure_cache.max(used);
                }
            }
        }

        let node = self.node_mut(id);
        if perform_layout {
            node.layout.dimensions = node.layout.measured_dimensions;
            node.has_new_layout = true;
        }
        node.layout.generation_count = generation;
        self.depth -= 1;

        need_to_visit || cached.is_none()
    }

    /// Offset a node from its owner by its margins and relative position
    pub(crate) fn set_position(
        &mut self,
        id: NodeId,
        direction: Direction,
        main_size: FloatOptional,
        cross_size: FloatOptional,
        owner_width: FloatOptional,
    ) {
        let node = self.node(id);
        // Roots always lay out left to right
        let direction = if node.owner.is_some() {
            direction
        } else {
            Direction::Ltr
        };
        let main_axis = node.style.flex_direction.resolve(direction);
        let cross_axis = main_axis.cross(direction);

        let relative_main = node.relative_position(main_axis, main_size);
        let relative_cross = node.relative_position(cross_axis, cross_size);
        let positions = [
            (main_axis.leading_edge(), node.leading_margin(main_axis, owner_width) + relative_main),
            (main_axis.trailing_edge(), node.trailing_margin(main_axis, owner_width) + relative_main),
            (cross_axis.leading_edge(), node.leading_margin(cross_axis, owner_width) + relative_cross),
            (cross_axis.trailing_edge(), node.trailing_margin(cross_axis, owner_width) + relative_cross),
        ];

        let layout = &mut self.node_mut(id).layout;
        for (edge, value) in positions {
            layout.set_position(edge, value);
        }
    }

    /// The flexbox algorithm proper: size `id` and, when `perform_layout` is
    /// set, position its children.
    ///
    /// Available sizes include the node's margins. An undefined size must be
    /// paired with [`MeasureMode::Undefined`].
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn layout_impl(
        &mut self,
        id: NodeId,
        available_width: FloatOptional,
        available_height: FloatOptional,
        owner_direction: Direction,
        width_mode: MeasureMode,
        height_mode: MeasureMode,
        owner_width: FloatOptional,
        owner_height: FloatOptional,
        perform_layout: bool,
    ) {
        debug_assert!(available_width.is_defined() || width_mode == MeasureMode::Undefined);
        debug_assert!(available_height.is_defined() || height_mode == MeasureMode::Undefined);

        if perform_layout {
            self.stats.layouts += 1;
        } else {
            self.stats.measures += 1;
        }

        let direction = self.node(id).resolve_direction(owner_direction);
        self.resolve_box_edges(id, direction, owner_width);

        if self.node(id).measure.is_some() {
            self.measure_leaf(
                id,
                available_width,
                available_height,
                width_mode,
                height_mode,
                owner_width,
                owner_height,
            );
            return;
        }

        if self.node(id).children.is_empty() {
            self.size_empty_container(
                id,
                available_width,
                available_height,
                width_mode,
                height_mode,
                owner_width,
                owner_height,
            );
            return;
        }

        if !perform_layout
            && self.size_fixed_container(
                id,
                available_width,
                available_height,
                width_mode,
                height_mode,
                owner_width,
                owner_height,
            )
        {
            return;
        }

        // Work on private copies of any children shared with another tree
        if let Err(err) = self.tree.clone_children_if_needed(id) {
            tracing::error!(%err, "could not copy shared children");
        }
        self.node_mut(id).layout.had_overflow = false;

        // STEP 1: values used by the rest of the algorithm
        let node = self.node(id);
        let style = &node.style;
        let main_axis = style.flex_direction.resolve(direction);
        let cross_axis = main_axis.cross(direction);
        let is_main_axis_row = main_axis.is_row();
        let is_wrap = style.flex_wrap != Wrap::NoWrap;
        let overflow = style.overflow;
        let flex_wrap = style.flex_wrap;

        let main_owner_size = if is_main_axis_row { owner_width } else { owner_height };
        let cross_owner_size = if is_main_axis_row { owner_height } else { owner_width };

        let leading_padding_and_border_cross =
            node.leading_padding_and_border(cross_axis, owner_width);
        let padding_and_border_main = node.padding_and_border_for_axis(main_axis, owner_width);
        let padding_and_border_cross = node.padding_and_border_for_axis(cross_axis, owner_width);

        let mut measure_mode_main = if is_main_axis_row { width_mode } else { height_mode };
        let measure_mode_cross = if is_main_axis_row { height_mode } else { width_mode };

        let (padding_and_border_row, padding_and_border_column) = if is_main_axis_row {
            (padding_and_border_main, padding_and_border_cross)
        } else {
            (padding_and_border_cross, padding_and_border_main)
        };
        let margin_row = node.margin_for_axis(FlexDirection::Row, owner_width);
        let margin_column = node.margin_for_axis(FlexDirection::Column, owner_width);

        let min_inner_width =
            style.min_dimension(Dimension::Width).resolve(owner_width) - padding_and_border_row;
        let max_inner_width =
            style.max_dimension(Dimension::Width).resolve(owner_width) - padding_and_border_row;
        let min_inner_height = style.min_dimension(Dimension::Height).resolve(owner_height)
            - padding_and_border_column;
        let max_inner_height = style.max_dimension(Dimension::Height).resolve(owner_height)
            - padding_and_border_column;
        let (min_inner_main, max_inner_main) = if is_main_axis_row {
            (min_inner_width, max_inner_width)
        } else {
            (min_inner_height, max_inner_height)
        };
        let use_legacy_stretch = node.config.use_legacy_stretch_behaviour;

        // STEP 2: available size on the main and cross axes
        let available_inner_width =
            self.available_inner_dim(id, FlexDirection::Row, available_width, owner_width);
        let available_inner_height =
            self.available_inner_dim(id, FlexDirection::Column, available_height, owner_height);
        let mut available_inner_main = if is_main_axis_row {
            available_inner_width
        } else {
            available_inner_height
        };
        let available_inner_cross = if is_main_axis_row {
            available_inner_height
        } else {
            available_inner_width
        };

        // STEP 3: flex basis of every child
        let total_outer_flex_basis = self.compute_flex_basis_for_children(
            id,
            available_inner_width,
            available_inner_height,
            width_mode,
            height_mode,
            direction,
            main_axis,
            perform_layout,
        );

        let flex_basis_overflows = measure_mode_main != MeasureMode::Undefined
            && FloatOptional::new(total_outer_flex_basis) > available_inner_main;
        if is_wrap && flex_basis_overflows && measure_mode_main == MeasureMode::AtMost {
            measure_mode_main = MeasureMode::Exactly;
        }

        // STEP 4: collect children into lines
        let child_count = self.node(id).children.len();
        let mut start_of_line = 0;
        let mut line_count = 0;
        let mut total_line_cross_dim = 0.0f32;
        let mut max_line_main_dim = 0.0f32;

        while start_of_line < child_count {
            let mut line = self.collect_flex_line(
                id,
                owner_direction,
                main_owner_size,
                available_inner_width,
                available_inner_main,
                start_of_line,
                line_count,
            );
            let end_of_line = line.end_index;

            // Measuring with an exact cross size needs no flexing
            let can_skip_flex = !perform_layout && measure_mode_cross == MeasureMode::Exactly;

            // STEP 5: resolve flexible lengths on the main axis
            let mut size_based_on_content = false;
            if measure_mode_main != MeasureMode::Exactly {
                let consumed = FloatOptional::new(line.size_consumed);
                if min_inner_main.is_defined() && consumed < min_inner_main {
                    available_inner_main = min_inner_main;
                } else if max_inner_main.is_defined() && consumed > max_inner_main {
                    available_inner_main = max_inner_main;
                } else {
                    if use_legacy_stretch {
                        self.node_mut(id).layout.did_use_legacy_flag = true;
                    }
                    size_based_on_content = !use_legacy_stretch;
                }
            }

            match available_inner_main.get() {
                Some(available) if !size_based_on_content => {
                    line.remaining_free_space = available - line.size_consumed;
                }
                _ if line.size_consumed < 0.0 => {
                    line.remaining_free_space = -line.size_consumed;
                }
                _ => {}
            }

            if !can_skip_flex {
                self.resolve_flexible_length(
                    id,
                    &mut line,
                    main_axis,
                    cross_axis,
                    main_owner_size,
                    available_inner_main,
                    available_inner_cross,
                    available_inner_width,
                    available_inner_height,
                    flex_basis_overflows,
                    measure_mode_cross,
                    perform_layout,
                );
            }

            let clips = self.node(id).style.overflow != Overflow::Visible;
            if clips && line.remaining_free_space < 0.0 {
                self.node_mut(id).layout.had_overflow = true;
            }

            // STEP 6: main-axis justification and cross-axis size
            self.justify_main_axis(
                id,
                &mut line,
                start_of_line,
                main_axis,
                cross_axis,
                measure_mode_main,
                measure_mode_cross,
                main_owner_size,
                owner_width,
                available_inner_main,
                available_inner_cross,
                available_inner_width,
                perform_layout,
            );

            let node = self.node(id);
            let mut container_cross_axis = available_inner_cross;
            if matches!(measure_mode_cross, MeasureMode::Undefined | MeasureMode::AtMost) {
                container_cross_axis = FloatOptional::new(
                    node.bound_axis(
                        cross_axis,
                        FloatOptional::new(line.cross_dim + padding_and_border_cross),
                        cross_owner_size,
                        owner_width,
                    ) - padding_and_border_cross,
                );
            }

            if !is_wrap && measure_mode_cross == MeasureMode::Exactly {
                line.cross_dim = available_inner_cross.unwrap_or(line.cross_dim);
            }

            line.cross_dim = node.bound_axis(
                cross_axis,
                FloatOptional::new(line.cross_dim + padding_and_border_cross),
                cross_owner_size,
                owner_width,
            ) - padding_and_border_cross;

            // STEP 7: cross-axis alignment within the line
            if perform_layout {
                self.align_line_cross_axis(
                    id,
                    &line,
                    start_of_line,
                    direction,
                    main_axis,
                    cross_axis,
                    leading_padding_and_border_cross,
                    total_line_cross_dim,
                    container_cross_axis,
                    available_inner_main,
                    available_inner_cross,
                    available_inner_width,
                    available_inner_height,
                );
            }

            total_line_cross_dim += line.cross_dim;
            max_line_main_dim = max_line_main_dim.max(line.main_dim);
            line_count += 1;
            start_of_line = end_of_line;
        }

        // STEP 8: align-content across lines
        if perform_layout && (line_count > 1 || self.is_baseline_layout(id)) {
            self.align_content(
                id,
                line_count,
                direction,
                main_axis,
                cross_axis,
                leading_padding_and_border_cross,
                total_line_cross_dim,
                available_inner_cross,
                available_inner_width,
                available_inner_height,
            );
        }

        // STEP 9: final dimensions
        let node = self.node(id);
        let mut measured = [
            node.bound_axis(
                FlexDirection::Row,
                available_width - margin_row,
                owner_width,
                owner_width,
            ),
            node.bound_axis(
                FlexDirection::Column,
                available_height - margin_column,
                owner_height,
                owner_width,
            ),
        ];

        let main_index = main_axis.dimension().index();
        if measure_mode_main == MeasureMode::Undefined
            || (overflow != Overflow::Scroll && measure_mode_main == MeasureMode::AtMost)
        {
            measured[main_index] = node.bound_axis(
                main_axis,
                FloatOptional::new(max_line_main_dim),
                main_owner_size,
                owner_width,
            );
        } else if measure_mode_main == MeasureMode::AtMost && overflow == Overflow::Scroll {
            measured[main_index] = (available_inner_main + padding_and_border_main)
                .min(node.bound_axis_within_min_max(
                    main_axis,
                    FloatOptional::new(max_line_main_dim),
                    main_owner_size,
                ))
                .max(FloatOptional::new(padding_and_border_main))
                .unwrap_or(padding_and_border_main);
        }

        let cross_index = cross_axis.dimension().index();
        let total_cross = total_line_cross_dim + padding_and_border_cross;
        if measure_mode_cross == MeasureMode::Undefined
            || (overflow != Overflow::Scroll && measure_mode_cross == MeasureMode::AtMost)
        {
            measured[cross_index] = node.bound_axis(
                cross_axis,
                FloatOptional::new(total_cross),
                cross_owner_size,
                owner_width,
            );
        } else if measure_mode_cross == MeasureMode::AtMost && overflow == Overflow::Scroll {
            measured[cross_index] = (available_inner_cross + padding_and_border_cross)
                .min(node.bound_axis_within_min_max(
                    cross_axis,
                    FloatOptional::new(total_cross),
                    cross_owner_size,
                ))
                .max(FloatOptional::new(padding_and_border_cross))
                .unwrap_or(padding_and_border_cross);
        }

        self.node_mut(id).layout.measured_dimensions =
            [FloatOptional::new(measured[0]), FloatOptional::new(measured[1])];

        // Lines were placed top to bottom; flip them for wrap-reverse
        if perform_layout && flex_wrap == Wrap::WrapReverse {
            let container_cross = measured[cross_index];
            let leading = cross_axis.leading_edge();
            for child in self.children(id) {
                let child = self.node_mut(child);
                if child.style.position_type == PositionType::Relative {
                    let position = container_cross
                        - child.layout.position_at(leading)
                        - child.layout.measured(cross_axis.dimension());
                    child.layout.set_position(leading, position);
                }
            }
        }

        if perform_layout {
            // STEP 10: absolutely positioned children
            let absolute_mode = if is_main_axis_row {
                measure_mode_main
            } else {
                measure_mode_cross
            };
            for child in self.children(id) {
                if self.node(child).style.position_type != PositionType::Absolute {
                    continue;
                }
                self.absolute_layout_child(
                    id,
                    child,
                    available_inner_width,
                    absolute_mode,
                    available_inner_height,
                    direction,
                );
            }

            // STEP 11: trailing positions for reversed axes
            let needs_main_trailing = main_axis.is_reverse();
            let needs_cross_trailing = cross_axis.is_reverse();
            if needs_main_trailing || needs_cross_trailing {
                for child in self.children(id) {
                    if self.node(child).style.display == Display::None {
                        continue;
                    }
                    if needs_main_trailing {
                        self.set_child_trailing_position(id, child, main_axis);
                    }
                    if needs_cross_trailing {
                        self.set_child_trailing_position(id, child, cross_axis);
                    }
                }
            }
        }
    }

    /// Record the resolved margin, border and padding of a node
    fn resolve_box_edges(&mut self, id: NodeId, direction: Direction, owner_width: FloatOptional) {
        let node = self.node_mut(id);
        node.layout.direction = direction;
        let row = FlexDirection::Row.resolve(direction);
        let column = FlexDirection::Column.resolve(direction);

        let margin = [
            (Edge::Start, node.leading_margin(row, owner_width)),
            (Edge::End, node.trailing_margin(row, owner_width)),
            (Edge::Top, node.leading_margin(column, owner_width)),
            (Edge::Bottom, node.trailing_margin(column, owner_width)),
        ];
        let border = [
            (Edge::Start, node.leading_border(row)),
            (Edge::End, node.trailing_border(row)),
            (Edge::Top, node.leading_border(column)),
            (Edge::Bottom, node.trailing_border(column)),
        ];
        let padding = [
            (Edge::Start, node.leading_padding(row, owner_width)),
            (Edge::End, node.trailing_padding(row, owner_width)),
            (Edge::Top, node.leading_padding(column, owner_width)),
            (Edge::Bottom, node.trailing_padding(column, owner_width)),
        ];

        let layout = &mut node.layout;
        for (edge, value) in margin {
            layout.margin[edge.index()] = value;
        }
        for (edge, value) in border {
            layout.border[edge.index()] = value;
        }
        for (edge, value) in padding {
            layout.padding[edge.index()] = value;
        }
    }

    /// Size a leaf through its measure function
    #[allow(clippy::too_many_arguments)]
    fn measure_leaf(
        &mut self,
        id: NodeId,
        available_width: FloatOptional,
        available_height: FloatOptional,
        width_mode: MeasureMode,
        height_mode: MeasureMode,
        owner_width: FloatOptional,
        owner_height: FloatOptional,
    ) {
        let node = self.node(id);
        let padding_and_border_row =
            node.padding_and_border_for_axis(FlexDirection::Row, available_width);
        let padding_and_border_column =
            node.padding_and_border_for_axis(FlexDirection::Column, available_width);
        let margin_row = node.margin_for_axis(FlexDirection::Row, available_width);
        let margin_column = node.margin_for_axis(FlexDirection::Column, available_width);

        // Never ask for a negative size
        let inner_width =
            available_width.map(|w| (w - margin_row - padding_and_border_row).max(0.0));
        let inner_height =
            available_height.map(|h| (h - margin_column - padding_and_border_column).max(0.0));

        let exact_width = available_width - margin_row;
        let exact_height = available_height - margin_column;

        let (width, height, called) = match (&node.measure, width_mode, height_mode) {
            (Some(measure), mode_w, mode_h)
                if !(mode_w == MeasureMode::Exactly && mode_h == MeasureMode::Exactly) =>
            {
                let size = measure(node, inner_width, width_mode, inner_height, height_mode);
                let width = if width_mode == MeasureMode::Exactly {
                    exact_width
                } else {
                    FloatOptional::new(size.width + padding_and_border_row)
                };
                let height = if height_mode == MeasureMode::Exactly {
                    exact_height
                } else {
                    FloatOptional::new(size.height + padding_and_border_column)
                };
                (width, height, true)
            }
            _ => (exact_width, exact_height, false),
        };

        let measured = [
            node.bound_axis(FlexDirection::Row, width, owner_width, owner_width),
            node.bound_axis(FlexDirection::Column, height, owner_height, owner_width),
        ];
        if called {
            self.stats.measure_callbacks += 1;
        }
        self.node_mut(id).layout.measured_dimensions =
            [FloatOptional::new(measured[0]), FloatOptional::new(measured[1])];
    }

    /// A container without children is as large as its padding and border
    /// unless an exact size is requested
    #[allow(clippy::too_many_arguments)]
    fn size_empty_container(
        &mut self,
        id: NodeId,
        available_width: FloatOptional,
        available_height: FloatOptional,
        width_mode: MeasureMode,
        height_mode: MeasureMode,
        owner_width: FloatOptional,
        owner_height: FloatOptional,
    ) {
        let node = self.node(id);
        let axes = [
            (FlexDirection::Row, available_width, width_mode, owner_width),
            (FlexDirection::Column, available_height, height_mode, owner_height),
        ];
        let measured = axes.map(|(axis, available, mode, owner_size)| {
            let size = if mode == MeasureMode::Exactly {
                available - node.margin_for_axis(axis, owner_width)
            } else {
                FloatOptional::new(node.padding_and_border_for_axis(axis, owner_width))
            };
            FloatOptional::new(node.bound_axis(axis, size, owner_size, owner_width))
        });
        self.node_mut(id).layout.measured_dimensions = measured;
    }

    /// Skip the algorithm when a measurement can only have one answer
    #[allow(clippy::too_many_arguments)]
    fn size_fixed_container(
        &mut self,
        id: NodeId,
        available_width: FloatOptional,
        available_height: FloatOptional,
        width_mode: MeasureMode,
        height_mode: MeasureMode,
        owner_width: FloatOptional,
        owner_height: FloatOptional,
    ) -> bool {
        let collapsed = |available: FloatOptional, mode: MeasureMode| {
            mode == MeasureMode::AtMost && available <= 0.0
        };
        let fixed = collapsed(available_width, width_mode)
            || collapsed(available_height, height_mode)
            || (width_mode == MeasureMode::Exactly && height_mode == MeasureMode::Exactly);
        if !fixed {
            return false;
        }

        let node = self.node(id);
        let axes = [
            (FlexDirection::Row, available_width, width_mode, owner_width),
            (FlexDirection::Column, available_height, height_mode, owner_height),
        ];
        let measured = axes.map(|(axis, available, mode, owner_size)| {
            let size = if available.is_undefined()
                || (mode == MeasureMode::AtMost && available < 0.0)
            {
                FloatOptional::new(0.0)
            } else {
                available - node.margin_for_axis(axis, owner_width)
            };
            FloatOptional::new(node.bound_axis(axis, size, owner_size, owner_width))
        });
        self.node_mut(id).layout.measured_dimensions = measured;
        true
    }

    /// Hidden subtrees get an empty layout
    pub(crate) fn zero_out_layout_recursive(&mut self, id: NodeId) {
        let node = self.node_mut(id);
        node.layout = Default::default();
        node.layout.dimensions = [FloatOptional::new(0.0); 2];
        node.has_new_layout = true;
        node.is_dirty = false;
        if let Err(err) = self.tree.clone_children_if_needed(id) {
            tracing::error!(%err, "could not copy shared children");
        }
        for child in self.children(id) {
            self.zero_out_layout_recursive(child);
        }
    }

    /// Space inside margins, padding and border, clamped to the min/max constraints
    pub(crate) fn available_inner_dim(
        &self,
        id: NodeId,
        axis: FlexDirection,
        available: FloatOptional,
        owner_size: FloatOptional,
    ) -> FloatOptional {
        let node = self.node(id);
        let dimension = axis.dimension();
        let margin = node.margin_for_axis(axis, owner_size);
        let padding_and_border = node.padding_and_border_for_axis(axis, owner_size);

        let inner = available - margin - padding_and_border;
        let Some(inner) = inner.get() else {
            return inner;
        };

        let min_inner = node
            .style
            .min_dimension(dimension)
            .resolve(owner_size)
            .map(|min| min - padding_and_border)
            .unwrap_or(0.0);
        let max_inner = node
            .style
            .max_dimension(dimension)
            .resolve(owner_size)
            .map(|max| max - padding_and_border)
            .unwrap_or(f32::MAX);
        FloatOptional::new(inner.min(max_inner).max(min_inner))
    }
}
