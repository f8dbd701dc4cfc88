//! Flex basis, line breaking and resolution of flexible lengths

use super::align::align_item;
use super::engine::{constrain_max_size_for_mode, LayoutPass};
use super::node::NodeId;
use super::types::{
    Align, Direction, Display, ExperimentalFeature, FlexDirection, Justify, MeasureMode, Overflow,
    PositionType, Wrap,
};
use super::value::{floats_equal, FloatOptional, Value};

/// Children that share one flex line and the space bookkeeping for it
#[derive(Debug, Default)]
pub(crate) struct FlexLine {
    pub(crate) items_on_line: usize,
    /// Sum of clamped flex bases plus main-axis margins
    pub(crate) size_consumed: f32,
    pub(crate) total_flex_grow_factors: f32,
    /// Sum of `-shrink * basis`; negative while any item can shrink
    pub(crate) total_flex_shrink_scaled_factors: f32,
    /// One past the last child index examined for this line
    pub(crate) end_index: usize,
    pub(crate) relative_children: Vec<NodeId>,
    pub(crate) remaining_free_space: f32,
    pub(crate) main_dim: f32,
    pub(crate) cross_dim: f32,
}

/// Per-item state while resolving flexible lengths
#[derive(Debug, Clone, Copy)]
struct FlexItem {
    id: NodeId,
    /// Flex basis clamped by min/max
    basis: f32,
    grow: f32,
    shrink_scaled: f32,
    /// Final main size once the item hit one of its bounds
    frozen: Option<f32>,
}

impl FlexLine {
    fn grow_or_shrink(&self, item: &FlexItem) -> Option<f32> {
        if self.remaining_free_space < 0.0 {
            (item.shrink_scaled != 0.0).then(|| {
                if self.total_flex_shrink_scaled_factors == 0.0 {
                    item.basis + item.shrink_scaled
                } else {
                    item.basis
                        + self.remaining_free_space / self.total_flex_shrink_scaled_factors
                            * item.shrink_scaled
                }
            })
        } else if self.remaining_free_space > 0.0 {
            (item.grow != 0.0).then(|| {
                item.basis + self.remaining_free_space / self.total_flex_grow_factors * item.grow
            })
        } else {
            None
        }
    }
}

impl LayoutPass<'_> {
    /// Compute the flex basis of every child and return the sum of bases
    /// plus main-axis margins.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn compute_flex_basis_for_children(
        &mut self,
        id: NodeId,
        available_inner_width: FloatOptional,
        available_inner_height: FloatOptional,
        width_mode: MeasureMode,
        height_mode: MeasureMode,
        direction: Direction,
        main_axis: FlexDirection,
        perform_layout: bool,
    ) -> f32 {
        let children = self.children(id);
        let main_mode = if main_axis.is_row() { width_mode } else { height_mode };

        // A lone child that can both grow and shrink fills the container
        // exactly, so its basis can start at zero without measuring.
        let mut single_flex_child = None;
        if main_mode == MeasureMode::Exactly {
            for &child in &children {
                let node = self.node(child);
                if !node.is_node_flexible() {
                    continue;
                }
                let zero = FloatOptional::new(0.0);
                if single_flex_child.is_some()
                    || floats_equal(FloatOptional::new(node.resolve_flex_grow()), zero)
                    || floats_equal(FloatOptional::new(node.resolve_flex_shrink()), zero)
                {
                    single_flex_child = None;
                    break;
                }
                single_flex_child = Some(child);
            }
        }

        let (main_dim, cross_dim) = if main_axis.is_row() {
            (available_inner_width, available_inner_height)
        } else {
            (available_inner_height, available_inner_width)
        };

        let mut total_outer_flex_basis = 0.0;
        for child in children {
            self.node_mut(child).resolve_dimension();
            if self.node(child).style.display == Display::None {
                self.zero_out_layout_recursive(child);
                continue;
            }

            if perform_layout {
                let child_direction = self.node(child).resolve_direction(direction);
                self.set_position(child, child_direction, main_dim, cross_dim, available_inner_width);
            }

            if self.node(child).style.position_type == PositionType::Absolute {
                continue;
            }

            if single_flex_child == Some(child) {
                let generation = self.generation;
                let layout = &mut self.node_mut(child).layout;
                layout.computed_flex_basis_generation = generation;
                layout.computed_flex_basis = FloatOptional::new(0.0);
            } else {
                self.compute_flex_basis_for_child(
                    id,
                    child,
                    available_inner_width,
                    width_mode,
                    available_inner_height,
                    available_inner_width,
                    available_inner_height,
                    height_mode,
                    direction,
                );
            }

            let node = self.node(child);
            total_outer_flex_basis += (node.layout.computed_flex_basis
                + node.margin_for_axis(main_axis, available_inner_width))
            .unwrap_or(0.0);
        }

        total_outer_flex_basis
    }

    /// Hypothetical main size of `child`, from its flex basis, its preferred
    /// size or a measurement of its content.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn compute_flex_basis_for_child(
        &mut self,
        id: NodeId,
        child: NodeId,
        width: FloatOptional,
        width_mode: MeasureMode,
        height: FloatOptional,
        owner_width: FloatOptional,
        owner_height: FloatOptional,
        height_mode: MeasureMode,
        direction: Direction,
    ) {
        let generation = self.generation;
        let parent = self.node(id);
        let node = self.node(child);

        let main_axis = parent.style.flex_direction.resolve(direction);
        let is_main_axis_row = main_axis.is_row();
        let main_axis_size = if is_main_axis_row { width } else { height };
        let main_axis_owner_size = if is_main_axis_row { owner_width } else { owner_height };

        let resolved_flex_basis = node.resolve_flex_basis().resolve(main_axis_owner_size);
        let is_row_style_dim_defined = node.is_style_dim_defined(FlexDirection::Row, owner_width);
        let is_column_style_dim_defined =
            node.is_style_dim_defined(FlexDirection::Column, owner_height);

        if resolved_flex_basis.is_defined() && main_axis_size.is_defined() {
            // A basis from an earlier pass may be a percentage of a different owner size
            let stale = node.layout.computed_flex_basis.is_undefined()
                || node.layout.computed_flex_basis_generation != generation
                || node
                    .config
                    .is_experimental_feature_enabled(ExperimentalFeature::WebFlexBasis);
            if stale {
                let padding_and_border = node.padding_and_border_for_axis(main_axis, owner_width);
                let basis = resolved_flex_basis.max(FloatOptional::new(padding_and_border));
                self.node_mut(child).layout.computed_flex_basis = basis;
            }
        } else if is_main_axis_row && is_row_style_dim_defined {
            let padding_and_border = node.padding_and_border_for_axis(FlexDirection::Row, owner_width);
            let basis = node
                .resolved_dimension(FlexDirection::Row.dimension())
                .resolve(owner_width)
                .max(FloatOptional::new(padding_and_border));
            self.node_mut(child).layout.computed_flex_basis = basis;
        } else if !is_main_axis_row && is_column_style_dim_defined {
            let padding_and_border =
                node.padding_and_border_for_axis(FlexDirection::Column, owner_width);
            let basis = node
                .resolved_dimension(FlexDirection::Column.dimension())
                .resolve(owner_height)
                .max(FloatOptional::new(padding_and_border));
            self.node_mut(child).layout.computed_flex_basis = basis;
        } else {
            let mut child_width = FloatOptional::UNDEFINED;
            let mut child_height = FloatOptional::UNDEFINED;
            let mut child_width_mode = MeasureMode::Undefined;
            let mut child_height_mode = MeasureMode::Undefined;

            let margin_row = node.margin_for_axis(FlexDirection::Row, owner_width);
            let margin_column = node.margin_for_axis(FlexDirection::Column, owner_width);

            if is_row_style_dim_defined {
                child_width = node
                    .resolved_dimension(FlexDirection::Row.dimension())
                    .resolve(owner_width)
                    + margin_row;
                child_width_mode = MeasureMode::Exactly;
            }
            if is_column_style_dim_defined {
                child_height = node
                    .resolved_dimension(FlexDirection::Column.dimension())
                    .resolve(owner_height)
                    + margin_column;
                child_height_mode = MeasureMode::Exactly;
            }

            // A scrolling container does not bound its content on the main axis
            let scrolls = parent.style.overflow == Overflow::Scroll;
            if (!is_main_axis_row || !scrolls) && child_width.is_undefined() && width.is_defined() {
                child_width = width;
                child_width_mode = MeasureMode::AtMost;
            }
            if (is_main_axis_row || !scrolls) && child_height.is_undefined() && height.is_defined() {
                child_height = height;
                child_height_mode = MeasureMode::AtMost;
            }

            let aspect_ratio = node.style.aspect_ratio;
            if let Some(ratio) = aspect_ratio.get() {
                if !is_main_axis_row && child_width_mode == MeasureMode::Exactly {
                    child_height = (child_width - margin_row).map(|w| w / ratio) + margin_column;
                    child_height_mode = MeasureMode::Exactly;
                } else if is_main_axis_row && child_height_mode == MeasureMode::Exactly {
                    child_width = (child_height - margin_column).map(|h| h * ratio) + margin_row;
                    child_width_mode = MeasureMode::Exactly;
                }
            }

            // Stretched children take the exact cross size of the container
            let align = align_item(parent, node);
            let has_exact_width = width.is_defined() && width_mode == MeasureMode::Exactly;
            let child_width_stretch =
                align == Align::Stretch && child_width_mode != MeasureMode::Exactly;
            if !is_main_axis_row && !is_row_style_dim_defined && has_exact_width && child_width_stretch {
                child_width = width;
                child_width_mode = MeasureMode::Exactly;
                if let Some(ratio) = aspect_ratio.get() {
                    child_height = (child_width - margin_row).map(|w| w / ratio);
                    child_height_mode = MeasureMode::Exactly;
                }
            }

            let has_exact_height = height.is_defined() && height_mode == MeasureMode::Exactly;
            let child_height_stretch =
                align == Align::Stretch && child_height_mode != MeasureMode::Exactly;
            if is_main_axis_row && !is_column_style_dim_defined && has_exact_height && child_height_stretch {
                child_height = height;
                child_height_mode = MeasureMode::Exactly;
                if let Some(ratio) = aspect_ratio.get() {
                    child_width = (child_height - margin_column).map(|h| h * ratio);
                    child_width_mode = MeasureMode::Exactly;
                }
            }

            constrain_max_size_for_mode(
                node,
                FlexDirection::Row,
                owner_width,
                owner_width,
                &mut child_width_mode,
                &mut child_width,
            );
            constrain_max_size_for_mode(
                node,
                FlexDirection::Column,
                owner_height,
                owner_width,
                &mut child_height_mode,
                &mut child_height,
            );

            self.layout_node_internal(
                child,
                child_width,
                child_height,
                direction,
                child_width_mode,
                child_height_mode,
                owner_width,
                owner_height,
                false,
                "measure",
            );

            let node = self.node(child);
            let measured = node.layout.measured(main_axis.dimension());
            let padding_and_border = node.padding_and_border_for_axis(main_axis, owner_width);
            self.node_mut(child).layout.computed_flex_basis =
                FloatOptional::new(measured.max(padding_and_border));
        }

        self.node_mut(child).layout.computed_flex_basis_generation = generation;
    }

    /// Gather the children that fit on the line starting at `start`.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn collect_flex_line(
        &mut self,
        id: NodeId,
        owner_direction: Direction,
        main_axis_owner_size: FloatOptional,
        available_inner_width: FloatOptional,
        available_inner_main: FloatOptional,
        start: usize,
        line_index: usize,
    ) -> FlexLine {
        let node = self.node(id);
        let main_axis = node
            .style
            .flex_direction
            .resolve(node.resolve_direction(owner_direction));
        let is_wrap = node.style.flex_wrap != Wrap::NoWrap;
        let children = self.children(id);

        let mut line = FlexLine {
            relative_children: Vec::with_capacity(children.len()),
            ..FlexLine::default()
        };

        let mut end = start;
        while end < children.len() {
            let child_id = children[end];
            let child = self.node(child_id);
            if child.style.display == Display::None
                || child.style.position_type == PositionType::Absolute
            {
                end += 1;
                continue;
            }

            let margin_main = child.margin_for_axis(main_axis, available_inner_width);
            let basis = child
                .bound_axis_within_min_max(
                    main_axis,
                    child.layout.computed_flex_basis,
                    main_axis_owner_size,
                )
                .unwrap_or(0.0);

            if is_wrap
                && line.items_on_line > 0
                && FloatOptional::new(line.size_consumed + basis + margin_main) > available_inner_main
            {
                break;
            }

            line.size_consumed += basis + margin_main;
            line.items_on_line += 1;

            if child.is_node_flexible() {
                line.total_flex_grow_factors += child.resolve_flex_grow();
                line.total_flex_shrink_scaled_factors +=
                    -child.resolve_flex_shrink() * child.layout.computed_flex_basis.unwrap_or(0.0);
            }

            line.relative_children.push(child_id);
            self.node_mut(child_id).line_index = line_index;
            end += 1;
        }

        if line.total_flex_grow_factors > 0.0 && line.total_flex_grow_factors < 1.0 {
            line.total_flex_grow_factors = 1.0;
        }
        if line.total_flex_shrink_scaled_factors > 0.0 && line.total_flex_shrink_scaled_factors < 1.0 {
            line.total_flex_shrink_scaled_factors = 1.0;
        }
        line.end_index = end;
        line
    }

    /// Grow or shrink the items of `line` to absorb its free space, then lay
    /// each one out at its final main size.
    ///
    /// Items whose share would break their min/max bounds are frozen at the
    /// bound and the rest is redistributed among the others. Frozen items
    /// stay frozen, so this settles in at most one round per item.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn resolve_flexible_length(
        &mut self,
        id: NodeId,
        line: &mut FlexLine,
        main_axis: FlexDirection,
        cross_axis: FlexDirection,
        main_axis_owner_size: FloatOptional,
        available_inner_main: FloatOptional,
        available_inner_cross: FloatOptional,
        available_inner_width: FloatOptional,
        available_inner_height: FloatOptional,
        flex_basis_overflows: bool,
        measure_mode_cross: MeasureMode,
        perform_layout: bool,
    ) {
        let original_free_space = line.remaining_free_space;

        let mut items: Vec<FlexItem> = line
            .relative_children
            .iter()
            .map(|&child| {
                let node = self.node(child);
                let basis = node
                    .bound_axis_within_min_max(
                        main_axis,
                        node.layout.computed_flex_basis,
                        main_axis_owner_size,
                    )
                    .unwrap_or(0.0);
                FlexItem {
                    id: child,
                    basis,
                    grow: node.resolve_flex_grow(),
                    shrink_scaled: -node.resolve_flex_shrink() * basis,
                    frozen: None,
                }
            })
            .collect();

        let iterations = self.freeze_violating_items(
            line,
            &mut items,
            main_axis,
            available_inner_main,
            available_inner_width,
        );
        self.stats.max_flex_iterations = self.stats.max_flex_iterations.max(iterations);

        let distributed = self.distribute_free_space(
            id,
            line,
            &items,
            main_axis,
            cross_axis,
            available_inner_main,
            available_inner_cross,
            available_inner_width,
            available_inner_height,
            flex_basis_overflows,
            measure_mode_cross,
            perform_layout,
        );

        line.remaining_free_space = original_free_space - distributed;
    }

    /// Freeze items whose flexed size falls outside their min/max bounds,
    /// repeating until a round freezes nothing. Returns the number of rounds.
    fn freeze_violating_items(
        &self,
        line: &mut FlexLine,
        items: &mut [FlexItem],
        main_axis: FlexDirection,
        available_inner_main: FloatOptional,
        available_inner_width: FloatOptional,
    ) -> usize {
        let mut rounds = 0;
        loop {
            rounds += 1;
            let mut delta_free_space = 0.0;
            let mut froze_any = false;

            for item in items.iter_mut().filter(|item| item.frozen.is_none()) {
                let Some(base_size) = line.grow_or_shrink(item) else {
                    continue;
                };
                let bound_size = self.node(item.id).bound_axis(
                    main_axis,
                    FloatOptional::new(base_size),
                    available_inner_main,
                    available_inner_width,
                );
                if base_size.is_nan() || base_size == bound_size {
                    continue;
                }

                item.frozen = Some(bound_size);
                froze_any = true;
                delta_free_space += bound_size - item.basis;
                if line.remaining_free_space < 0.0 {
                    line.total_flex_shrink_scaled_factors -= item.shrink_scaled;
                } else {
                    line.total_flex_grow_factors -= item.grow;
                }
            }

            line.remaining_free_space -= delta_free_space;
            tracing::trace!(
                rounds,
                remaining = line.remaining_free_space,
                froze_any,
                "flex freeze round"
            );
            if !froze_any || rounds > items.len() {
                return rounds;
            }
        }
    }

    /// Size and lay out every item on the line. Returns the space consumed
    /// relative to the items' bases.
    #[allow(clippy::too_many_arguments)]
    fn distribute_free_space(
        &mut self,
        id: NodeId,
        line: &FlexLine,
        items: &[FlexItem],
        main_axis: FlexDirection,
        cross_axis: FlexDirection,
        available_inner_main: FloatOptional,
        available_inner_cross: FloatOptional,
        available_inner_width: FloatOptional,
        available_inner_height: FloatOptional,
        flex_basis_overflows: bool,
        measure_mode_cross: MeasureMode,
        perform_layout: bool,
    ) -> f32 {
        let is_main_axis_row = main_axis.is_row();
        let is_wrap = self.node(id).style.flex_wrap != Wrap::NoWrap;
        let direction = self.node(id).layout.direction;
        let mut delta_free_space = 0.0;

        for item in items {
            let parent = self.node(id);
            let child = self.node(item.id);

            let updated_main_size = match item.frozen {
                Some(size) => size,
                None => match line.grow_or_shrink(item) {
                    Some(size) => child.bound_axis(
                        main_axis,
                        FloatOptional::new(size),
                        available_inner_main,
                        available_inner_width,
                    ),
                    None => item.basis,
                },
            };
            delta_free_space += updated_main_size - item.basis;

            let margin_main = child.margin_for_axis(main_axis, available_inner_width);
            let margin_cross = child.margin_for_axis(cross_axis, available_inner_width);

            let mut child_main_size = FloatOptional::new(updated_main_size + margin_main);
            let mut child_main_mode = MeasureMode::Exactly;
            let mut child_cross_size;
            let mut child_cross_mode;

            let align = align_item(parent, child);
            let cross_margins_auto = child.margin_leading_value(cross_axis).is_auto()
                || child.margin_trailing_value(cross_axis).is_auto();
            let cross_style_defined = child.is_style_dim_defined(cross_axis, available_inner_cross);

            if let Some(ratio) = child.style.aspect_ratio.get() {
                let inner_main = updated_main_size;
                child_cross_size = FloatOptional::new(if is_main_axis_row {
                    inner_main / ratio
                } else {
                    inner_main * ratio
                }) + margin_cross;
                child_cross_mode = MeasureMode::Exactly;
            } else if available_inner_cross.is_defined()
                && !cross_style_defined
                && measure_mode_cross == MeasureMode::Exactly
                && !(is_wrap && flex_basis_overflows)
                && align == Align::Stretch
                && !cross_margins_auto
            {
                child_cross_size = available_inner_cross;
                child_cross_mode = MeasureMode::Exactly;
            } else if !cross_style_defined {
                child_cross_size = available_inner_cross;
                child_cross_mode = if child_cross_size.is_undefined() {
                    MeasureMode::Undefined
                } else {
                    MeasureMode::AtMost
                };
            } else {
                let resolved = child.resolved_dimension(cross_axis.dimension());
                child_cross_size = resolved.resolve(available_inner_cross) + margin_cross;
                let loose_percentage = matches!(resolved, Value::Percent(_))
                    && measure_mode_cross != MeasureMode::Exactly;
                child_cross_mode = if loose_percentage || child_cross_size.is_undefined() {
                    MeasureMode::Undefined
                } else {
                    MeasureMode::Exactly
                };
            }

            constrain_max_size_for_mode(
                child,
                main_axis,
                available_inner_main,
                available_inner_width,
                &mut child_main_mode,
                &mut child_main_size,
            );
            constrain_max_size_for_mode(
                child,
                cross_axis,
                available_inner_cross,
                available_inner_width,
                &mut child_cross_mode,
                &mut child_cross_size,
            );

            // Stretched children are laid out again once the line's cross size is known
            let requires_stretch_layout =
                !cross_style_defined && align == Align::Stretch && !cross_margins_auto;

            let (child_width, child_width_mode, child_height, child_height_mode) = if is_main_axis_row {
                (child_main_size, child_main_mode, child_cross_size, child_cross_mode)
            } else {
                (child_cross_size, child_cross_mode, child_main_size, child_main_mode)
            };

            self.layout_node_internal(
                item.id,
                child_width,
                child_height,
                direction,
                child_width_mode,
                child_height_mode,
                available_inner_width,
                available_inner_height,
                perform_layout && !requires_stretch_layout,
                "flex",
            );

            if self.node(item.id).layout.had_overflow {
                self.node_mut(id).layout.had_overflow = true;
            }
        }

        delta_free_space
    }

    /// Position the items of a line along the main axis and measure the
    /// line's extent on both axes.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn justify_main_axis(
        &mut self,
        id: NodeId,
        line: &mut FlexLine,
        start: usize,
        main_axis: FlexDirection,
        cross_axis: FlexDirection,
        measure_mode_main: MeasureMode,
        measure_mode_cross: MeasureMode,
        main_axis_owner_size: FloatOptional,
        owner_width: FloatOptional,
        available_inner_main: FloatOptional,
        available_inner_cross: FloatOptional,
        available_inner_width: FloatOptional,
        perform_layout: bool,
    ) {
        let node = self.node(id);
        let leading_padding_and_border_main = node.leading_padding_and_border(main_axis, owner_width);
        let trailing_padding_and_border_main =
            node.trailing_padding_and_border(main_axis, owner_width);
        let justify_content = node.style.justify_content;
        let leading_border_main = node.leading_border(main_axis);

        // Under an "at most" constraint only a min size creates free space
        if measure_mode_main == MeasureMode::AtMost && line.remaining_free_space > 0.0 {
            let min_main = node
                .style
                .min_dimension(main_axis.dimension())
                .resolve(main_axis_owner_size);
            line.remaining_free_space = match min_main.get() {
                Some(min_main) => {
                    let min_available_main =
                        min_main - leading_padding_and_border_main - trailing_padding_and_border_main;
                    let occupied = available_inner_main.unwrap_or(0.0) - line.remaining_free_space;
                    (min_available_main - occupied).max(0.0)
                }
                None => 0.0,
            };
        }

        let children = self.children(id);
        let line_children = &children[start..line.end_index];

        let auto_margins: usize = line_children
            .iter()
            .map(|&child| self.node(child))
            .filter(|child| child.style.position_type == PositionType::Relative)
            .map(|child| {
                usize::from(child.margin_leading_value(main_axis).is_auto())
                    + usize::from(child.margin_trailing_value(main_axis).is_auto())
            })
            .sum();

        let mut leading_main_dim = 0.0;
        let mut between_main_dim = 0.0;
        let remaining = line.remaining_free_space;
        let items = line.items_on_line as f32;
        if auto_margins == 0 {
            match justify_content {
                Justify::Center => leading_main_dim = remaining / 2.0,
                Justify::FlexEnd => leading_main_dim = remaining,
                Justify::SpaceBetween => {
                    if line.items_on_line > 1 {
                        between_main_dim = remaining.max(0.0) / (items - 1.0);
                    }
                }
                Justify::SpaceEvenly => {
                    between_main_dim = remaining / (items + 1.0);
                    leading_main_dim = between_main_dim;
                }
                Justify::SpaceAround => {
                    between_main_dim = remaining / items;
                    leading_main_dim = between_main_dim / 2.0;
                }
                Justify::FlexStart => {}
            }
        }
        let auto_margin_share = if auto_margins > 0 {
            remaining / auto_margins as f32
        } else {
            0.0
        };

        line.main_dim = leading_padding_and_border_main + leading_main_dim;
        line.cross_dim = 0.0;

        let mut max_ascent = 0.0f32;
        let mut max_descent = 0.0f32;
        let is_baseline_layout = self.is_baseline_layout(id);
        let can_skip_flex = !perform_layout && measure_mode_cross == MeasureMode::Exactly;
        let main_leading = main_axis.leading_edge();

        for &child_id in line_children {
            let child = self.node(child_id);
            if child.style.display == Display::None {
                continue;
            }

            if child.style.position_type == PositionType::Absolute
                && child.is_leading_position_defined(main_axis)
            {
                if perform_layout {
                    // Absolute children with a leading inset sit exactly there
                    let position = child.leading_position(main_axis, available_inner_main)
                        + leading_border_main
                        + child.leading_margin(main_axis, available_inner_width);
                    self.node_mut(child_id).layout.set_position(main_leading, position);
                }
                continue;
            }

            if child.style.position_type == PositionType::Absolute {
                if perform_layout {
                    let layout = &mut self.node_mut(child_id).layout;
                    let position =
                        layout.position_at(main_leading) + leading_border_main + leading_main_dim;
                    layout.set_position(main_leading, position);
                }
                continue;
            }

            if child.margin_leading_value(main_axis).is_auto() {
                line.main_dim += auto_margin_share;
            }
            let trailing_auto = child.margin_trailing_value(main_axis).is_auto();

            if perform_layout {
                let layout = &mut self.node_mut(child_id).layout;
                let position = layout.position_at(main_leading) + line.main_dim;
                layout.set_position(main_leading, position);
            }

            if trailing_auto {
                line.main_dim += auto_margin_share;
            }

            let child = self.node(child_id);
            if can_skip_flex {
                // Measured sizes were not computed; fall back to the basis
                line.main_dim += between_main_dim
                    + child.margin_for_axis(main_axis, available_inner_width)
                    + child.layout.computed_flex_basis.unwrap_or(0.0);
                line.cross_dim = available_inner_cross.unwrap_or(0.0);
            } else {
                line.main_dim += between_main_dim + child.dim_with_margin(main_axis, available_inner_width);

                if is_baseline_layout {
                    let ascent = self.baseline(child_id)
                        + child.leading_margin(FlexDirection::Column, available_inner_width);
                    let descent = child.layout.measured(FlexDirection::Column.dimension())
                        + child.margin_for_axis(FlexDirection::Column, available_inner_width)
                        - ascent;
                    max_ascent = max_ascent.max(ascent);
                    max_descent = max_descent.max(descent);
                } else {
                    line.cross_dim = line
                        .cross_dim
                        .max(child.dim_with_margin(cross_axis, available_inner_width));
                }
            }
        }

        line.main_dim += trailing_padding_and_border_main;
        if is_baseline_layout {
            line.cross_dim = max_ascent + max_descent;
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::layout::node::NodeId;
    use crate::layout::tree::Tree;
    use crate::layout::types::{Direction, Edge, FlexDirection, Justify, Wrap};
    use crate::layout::value::Value;

    fn row_of(tree: &mut Tree, width: f32, children: &[(f32, f32)]) -> (NodeId, Vec<NodeId>) {
        let root = tree.new_node();
        tree.set_flex_direction(root, FlexDirection::Row).unwrap();
        tree.set_width(root, Value::point(width)).unwrap();
        tree.set_height(root, Value::point(100.0)).unwrap();
        let ids: Vec<_> = children
            .iter()
            .map(|&(basis, grow)| {
                let child = tree.new_node();
                tree.set_flex_basis(child, Value::point(basis)).unwrap();
                tree.set_flex_grow(child, grow).unwrap();
                child
            })
            .collect();
        tree.set_children(root, &ids).unwrap();
        (root, ids)
    }

    #[test]
    fn test_grow_splits_free_space_by_factor() {
        let mut tree = Tree::new();
        let (root, ids) = row_of(&mut tree, 300.0, &[(0.0, 1.0), (0.0, 2.0)]);
        tree.calculate_layout(root, f32::NAN, f32::NAN, Direction::Ltr).unwrap();
        assert_eq!(tree.layout(ids[0]).unwrap().width(), 100.0);
        assert_eq!(tree.layout(ids[1]).unwrap().width(), 200.0);
        assert_eq!(tree.layout(ids[1]).unwrap().left(), 100.0);
    }

    #[test]
    fn test_max_bound_freezes_item_and_redistributes() {
        let mut tree = Tree::new();
        let (root, ids) = row_of(&mut tree, 300.0, &[(0.0, 1.0), (0.0, 1.0), (0.0, 1.0)]);
        tree.set_max_width(ids[0], Value::point(50.0)).unwrap();
        let stats = tree.calculate_layout(root, f32::NAN, f32::NAN, Direction::Ltr).unwrap();

        assert_eq!(tree.layout(ids[0]).unwrap().width(), 50.0);
        assert_eq!(tree.layout(ids[1]).unwrap().width(), 125.0);
        assert_eq!(tree.layout(ids[2]).unwrap().width(), 125.0);
        assert!(stats.max_flex_iterations <= ids.len() + 1);
    }

    #[test]
    fn test_shrink_scales_with_basis() {
        let mut tree = Tree::new();
        let (root, ids) = row_of(&mut tree, 100.0, &[(100.0, 0.0), (50.0, 0.0)]);
        tree.set_flex_shrink(ids[0], 1.0).unwrap();
        tree.set_flex_shrink(ids[1], 1.0).unwrap();
        tree.calculate_layout(root, f32::NAN, f32::NAN, Direction::Ltr).unwrap();

        let first = tree.layout(ids[0]).unwrap().width().unwrap_or(0.0);
        let second = tree.layout(ids[1]).unwrap().width().unwrap_or(0.0);
        assert!((first - 66.666_67).abs() < 0.01 || first == 67.0);
        assert!((first + second - 100.0).abs() < 0.01);
    }

    #[test]
    fn test_wrap_breaks_lines() {
        let mut tree = Tree::new();
        let (root, ids) = row_of(&mut tree, 100.0, &[(60.0, 0.0), (60.0, 0.0)]);
        tree.set_flex_wrap(root, Wrap::Wrap).unwrap();
        for &id in &ids {
            tree.set_height(id, Value::point(20.0)).unwrap();
        }
        tree.calculate_layout(root, f32::NAN, f32::NAN, Direction::Ltr).unwrap();

        assert_eq!(tree.get(ids[0]).unwrap().line_index(), 0);
        assert_eq!(tree.get(ids[1]).unwrap().line_index(), 1);
        assert_eq!(tree.layout(ids[1]).unwrap().top(), 20.0);
        assert_eq!(tree.layout(ids[1]).unwrap().left(), 0.0);
    }

    #[test]
    fn test_justify_center_and_space_around() {
        let mut tree = Tree::new();
        let (root, ids) = row_of(&mut tree, 100.0, &[(20.0, 0.0), (20.0, 0.0)]);
        tree.set_justify_content(root, Justify::Center).unwrap();
        tree.calculate_layout(root, f32::NAN, f32::NAN, Direction::Ltr).unwrap();
        assert_eq!(tree.layout(ids[0]).unwrap().left(), 30.0);

        tree.set_justify_content(root, Justify::SpaceAround).unwrap();
        tree.calculate_layout(root, f32::NAN, f32::NAN, Direction::Ltr).unwrap();
        assert_eq!(tree.layout(ids[0]).unwrap().left(), 15.0);
        assert_eq!(tree.layout(ids[1]).unwrap().left(), 65.0);
    }

    #[test]
    fn test_auto_margin_absorbs_free_space() {
        let mut tree = Tree::new();
        let (root, ids) = row_of(&mut tree, 100.0, &[(20.0, 0.0), (20.0, 0.0)]);
        tree.set_margin(ids[1], Edge::Left, Value::Auto).unwrap();
        tree.calculate_layout(root, f32::NAN, f32::NAN, Direction::Ltr).unwrap();
        assert_eq!(tree.layout(ids[1]).unwrap().left(), 80.0);
    }
}
