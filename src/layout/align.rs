//! Cross-axis alignment, align-content and baselines

use super::engine::{constrain_max_size_for_mode, LayoutPass};
use super::flex::FlexLine;
use super::node::{Node, NodeId};
use super::types::{Align, Dimension, Direction, Display, Edge, FlexDirection, LogLevel, MeasureMode, PositionType};
use super::value::{floats_equal, FloatOptional};

/// Effective cross-axis alignment of `child` inside `parent`
pub(crate) fn align_item(parent: &Node, child: &Node) -> Align {
    let align = if child.style.align_self == Align::Auto {
        parent.style.align_items
    } else {
        child.style.align_self
    };
    // Columns have no baseline to share
    if align == Align::Baseline && parent.style.flex_direction.is_column() {
        return Align::FlexStart;
    }
    align
}

fn cross_margins_auto(child: &Node, cross_axis: FlexDirection) -> (bool, bool) {
    (
        child.margin_leading_value(cross_axis).is_auto(),
        child.margin_trailing_value(cross_axis).is_auto(),
    )
}

impl LayoutPass<'_> {
    /// Distance from the top of `id` to its first line of text
    pub(crate) fn baseline(&self, id: NodeId) -> f32 {
        let node = self.node(id);
        if let Some(baseline) = &node.baseline {
            let width = node.layout.measured(Dimension::Width);
            let height = node.layout.measured(Dimension::Height);
            let value = baseline(node, width, height);
            if value.is_nan() {
                node.config.log(
                    Some(node),
                    LogLevel::Error,
                    "baseline function returned NaN, using the node's height",
                );
                return height;
            }
            return value;
        }

        let mut baseline_child = None;
        for &child_id in &node.children {
            let child = self.node(child_id);
            if child.line_index > 0 {
                break;
            }
            if child.style.position_type == PositionType::Absolute {
                continue;
            }
            if align_item(node, child) == Align::Baseline || child.is_reference_baseline {
                baseline_child = Some(child_id);
                break;
            }
            if baseline_child.is_none() {
                baseline_child = Some(child_id);
            }
        }

        match baseline_child {
            Some(child) => {
                self.baseline(child) + self.node(child).layout.position_at(Edge::Top)
            }
            None => node.layout.measured(Dimension::Height),
        }
    }

    /// Whether any child of a row aligns to the shared baseline
    pub(crate) fn is_baseline_layout(&self, id: NodeId) -> bool {
        let node = self.node(id);
        if node.style.flex_direction.is_column() {
            return false;
        }
        if node.style.align_items == Align::Baseline {
            return true;
        }
        node.children.iter().any(|&child| {
            let style = &self.node(child).style;
            style.position_type == PositionType::Relative && style.align_self == Align::Baseline
        })
    }

    /// Place the children of one line on the cross axis, stretching those
    /// that ask for it.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn align_line_cross_axis(
        &mut self,
        id: NodeId,
        line: &FlexLine,
        start: usize,
        direction: Direction,
        main_axis: FlexDirection,
        cross_axis: FlexDirection,
        leading_padding_and_border_cross: f32,
        total_line_cross_dim: f32,
        container_cross_axis: FloatOptional,
        available_inner_main: FloatOptional,
        available_inner_cross: FloatOptional,
        available_inner_width: FloatOptional,
        available_inner_height: FloatOptional,
    ) {
        let is_main_axis_row = main_axis.is_row();
        let cross_leading = cross_axis.leading_edge();
        let leading_border_cross = self.node(id).leading_border(cross_axis);
        let children = self.children(id);

        for &child_id in &children[start..line.end_index] {
            let parent = self.node(id);
            let child = self.node(child_id);
            if child.style.display == Display::None {
                continue;
            }

            if child.style.position_type == PositionType::Absolute {
                // An inset overrides alignment; otherwise sit inside the border
                let margin = child.leading_margin(cross_axis, available_inner_width);
                let position = if child.is_leading_position_defined(cross_axis) {
                    child.leading_position(cross_axis, available_inner_cross)
                        + leading_border_cross
                        + margin
                } else {
                    leading_border_cross + margin
                };
                self.node_mut(child_id).layout.set_position(cross_leading, position);
                continue;
            }

            let mut leading_cross_dim = leading_padding_and_border_cross;
            let align = align_item(parent, child);
            let (leading_auto, trailing_auto) = cross_margins_auto(child, cross_axis);

            if align == Align::Stretch && !leading_auto && !trailing_auto {
                // Children with a definite cross size are not stretched
                if !child.is_style_dim_defined(cross_axis, available_inner_cross) {
                    let mut child_main_size = FloatOptional::new(
                        child.layout.measured(main_axis.dimension()),
                    );
                    let mut child_cross_size = match child.style.aspect_ratio.get() {
                        Some(ratio) => {
                            let main = child_main_size.unwrap_or(0.0);
                            FloatOptional::new(
                                child.margin_for_axis(cross_axis, available_inner_width)
                                    + if is_main_axis_row { main / ratio } else { main * ratio },
                            )
                        }
                        None => FloatOptional::new(line.cross_dim),
                    };
                    child_main_size =
                        child_main_size + child.margin_for_axis(main_axis, available_inner_width);

                    let mut child_main_mode = MeasureMode::Exactly;
                    let mut child_cross_mode = MeasureMode::Exactly;
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

                    let (child_width, child_height) = if is_main_axis_row {
                        (child_main_size, child_cross_size)
                    } else {
                        (child_cross_size, child_main_size)
                    };
                    let mode_for = |size: FloatOptional| {
                        if size.is_undefined() {
                            MeasureMode::Undefined
                        } else {
                            MeasureMode::Exactly
                        }
                    };

                    self.layout_node_internal(
                        child_id,
                        child_width,
                        child_height,
                        direction,
                        mode_for(child_width),
                        mode_for(child_height),
                        available_inner_width,
                        available_inner_height,
                        true,
                        "stretch",
                    );
                }
            } else {
                let remaining_cross_dim = container_cross_axis.unwrap_or(0.0)
                    - child.dim_with_margin(cross_axis, available_inner_width);

                if leading_auto && trailing_auto {
                    leading_cross_dim += (remaining_cross_dim / 2.0).max(0.0);
                } else if trailing_auto {
                    // Trailing auto margin keeps the child at the start
                } else if leading_auto {
                    leading_cross_dim += remaining_cross_dim.max(0.0);
                } else if align == Align::FlexStart {
                } else if align == Align::Center {
                    leading_cross_dim += remaining_cross_dim / 2.0;
                } else {
                    leading_cross_dim += remaining_cross_dim;
                }
            }

            let layout = &mut self.node_mut(child_id).layout;
            let position = layout.position_at(cross_leading) + total_line_cross_dim + leading_cross_dim;
            layout.set_position(cross_leading, position);
        }
    }

    /// Distribute the container's spare cross space among its lines and
    /// align every child within its line.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn align_content(
        &mut self,
        id: NodeId,
        line_count: usize,
        direction: Direction,
        main_axis: FlexDirection,
        cross_axis: FlexDirection,
        leading_padding_and_border_cross: f32,
        total_line_cross_dim: f32,
        available_inner_cross: FloatOptional,
        available_inner_width: FloatOptional,
        available_inner_height: FloatOptional,
    ) {
        let is_main_axis_row = main_axis.is_row();
        let cross_leading = cross_axis.leading_edge();
        let lines = line_count as f32;

        let mut cross_dim_lead = 0.0;
        let mut current_lead = leading_padding_and_border_cross;
        if let Some(available) = available_inner_cross.get() {
            let remaining = available - total_line_cross_dim;
            let has_spare = available > total_line_cross_dim;
            match self.node(id).style.align_content {
                Align::FlexEnd => current_lead += remaining,
                Align::Center => current_lead += remaining / 2.0,
                Align::Stretch => {
                    if has_spare {
                        cross_dim_lead = remaining / lines;
                    }
                }
                Align::SpaceAround => {
                    if has_spare {
                        current_lead += remaining / (2.0 * lines);
                        if line_count > 1 {
                            cross_dim_lead = remaining / lines;
                        }
                    } else {
                        current_lead += remaining / 2.0;
                    }
                }
                Align::SpaceBetween => {
                    if has_spare && line_count > 1 {
                        cross_dim_lead = remaining / (lines - 1.0);
                    }
                }
                Align::Auto | Align::FlexStart | Align::Baseline => {}
            }
        }

        let children = self.children(id);
        let mut end_index = 0;
        for line in 0..line_count {
            let start_index = end_index;

            // Height of the line and its baseline extents
            let mut line_height = 0.0f32;
            let mut max_ascent = 0.0f32;
            let mut max_descent = 0.0f32;
            let mut index = start_index;
            while index < children.len() {
                let parent = self.node(id);
                let child = self.node(children[index]);
                if child.style.display == Display::None {
                    index += 1;
                    continue;
                }
                if child.style.position_type == PositionType::Relative {
                    if child.line_index != line {
                        break;
                    }
                    if child.is_layout_dim_defined(cross_axis) {
                        line_height = line_height.max(
                            child.layout.measured(cross_axis.dimension())
                                + child.margin_for_axis(cross_axis, available_inner_width),
                        );
                    }
                    if align_item(parent, child) == Align::Baseline {
                        let ascent = self.baseline(children[index])
                            + child.leading_margin(FlexDirection::Column, available_inner_width);
                        let descent = child.layout.measured(Dimension::Height)
                            + child.margin_for_axis(FlexDirection::Column, available_inner_width)
                            - ascent;
                        max_ascent = max_ascent.max(ascent);
                        max_descent = max_descent.max(descent);
                        line_height = line_height.max(max_ascent + max_descent);
                    }
                }
                index += 1;
            }
            end_index = index;
            line_height += cross_dim_lead;

            for &child_id in &children[start_index..end_index] {
                let parent = self.node(id);
                let child = self.node(child_id);
                if child.style.display == Display::None
                    || child.style.position_type != PositionType::Relative
                {
                    continue;
                }

                match align_item(parent, child) {
                    Align::FlexStart => {
                        let position =
                            current_lead + child.leading_margin(cross_axis, available_inner_width);
                        self.node_mut(child_id).layout.set_position(cross_leading, position);
                    }
                    Align::FlexEnd => {
                        let position = current_lead + line_height
                            - child.trailing_margin(cross_axis, available_inner_width)
                            - child.layout.measured(cross_axis.dimension());
                        self.node_mut(child_id).layout.set_position(cross_leading, position);
                    }
                    Align::Center => {
                        let child_size = child.layout.measured(cross_axis.dimension());
                        let position = current_lead + (line_height - child_size) / 2.0;
                        self.node_mut(child_id).layout.set_position(cross_leading, position);
                    }
                    Align::Stretch => {
                        let position =
                            current_lead + child.leading_margin(cross_axis, available_inner_width);
                        let needs_relayout = !child.is_style_dim_defined(cross_axis, available_inner_cross);
                        let measured_width = child.layout.measured(Dimension::Width);
                        let measured_height = child.layout.measured(Dimension::Height);
                        let child_width = if is_main_axis_row {
                            measured_width + child.margin_for_axis(main_axis, available_inner_width)
                        } else {
                            line_height
                        };
                        let child_height = if is_main_axis_row {
                            line_height
                        } else {
                            measured_height + child.margin_for_axis(cross_axis, available_inner_width)
                        };
                        self.node_mut(child_id).layout.set_position(cross_leading, position);

                        // Lines may have grown since the child was measured
                        let unchanged = floats_equal(child_width.into(), measured_width.into())
                            && floats_equal(child_height.into(), measured_height.into());
                        if needs_relayout && !unchanged {
                            self.layout_node_internal(
                                child_id,
                                FloatOptional::new(child_width),
                                FloatOptional::new(child_height),
                                direction,
                                MeasureMode::Exactly,
                                MeasureMode::Exactly,
                                available_inner_width,
                                available_inner_height,
                                true,
                                "multiline-stretch",
                            );
                        }
                    }
                    Align::Baseline => {
                        let position = current_lead + max_ascent - self.baseline(child_id)
                            + child.leading_position(FlexDirection::Column, available_inner_cross);
                        self.node_mut(child_id).layout.set_position(Edge::Top, position);
                    }
                    Align::Auto | Align::SpaceBetween | Align::SpaceAround => {}
                }
            }

            current_lead += line_height;
        }
    }
}
