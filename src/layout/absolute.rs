//! Absolutely positioned children

use super::align::align_item;
use super::engine::LayoutPass;
use super::node::NodeId;
use super::types::{Align, Dimension, Direction, FlexDirection, Justify, MeasureMode, Wrap};
use super::value::FloatOptional;

impl LayoutPass<'_> {
    /// Size an absolute child from its style or insets, lay it out, and
    /// place it against the container's padding box.
    ///
    /// `width` and `height` are the container's inner size.
    pub(crate) fn absolute_layout_child(
        &mut self,
        id: NodeId,
        child: NodeId,
        width: FloatOptional,
        width_mode: MeasureMode,
        height: FloatOptional,
        direction: Direction,
    ) {
        let parent = self.node(id);
        let node = self.node(child);
        let main_axis = parent.style.flex_direction.resolve(direction);
        let cross_axis = main_axis.cross(direction);
        let is_main_axis_row = main_axis.is_row();

        let mut child_width = FloatOptional::UNDEFINED;
        let mut child_height = FloatOptional::UNDEFINED;

        let margin_row = node.margin_for_axis(FlexDirection::Row, width);
        let margin_column = node.margin_for_axis(FlexDirection::Column, width);

        // A definite size wins; otherwise opposite insets span the container
        let axes = [
            (FlexDirection::Row, width, margin_row, &mut child_width),
            (FlexDirection::Column, height, margin_column, &mut child_height),
        ];
        for (axis, axis_size, margin, size) in axes {
            if node.is_style_dim_defined(axis, axis_size) {
                *size = node.resolved_dimension(axis.dimension()).resolve(axis_size) + margin;
            } else if node.is_leading_position_defined(axis) && node.is_trailing_position_defined(axis)
            {
                let span = parent.layout.measured(axis.dimension())
                    - (parent.leading_border(axis) + parent.trailing_border(axis))
                    - (node.leading_position(axis, axis_size)
                        + node.trailing_position(axis, axis_size));
                *size = FloatOptional::new(node.bound_axis(
                    axis,
                    FloatOptional::new(span),
                    axis_size,
                    width,
                ));
            }
        }

        // The aspect ratio needs exactly one known dimension to anchor on
        if child_width.is_undefined() != child_height.is_undefined() {
            if let Some(ratio) = node.style.aspect_ratio.get() {
                if child_width.is_undefined() {
                    child_width = (child_height - margin_column).map(|h| h * ratio) + margin_row;
                } else {
                    child_height = (child_width - margin_row).map(|w| w / ratio) + margin_column;
                }
            }
        }

        if child_width.is_undefined() || child_height.is_undefined() {
            let mode_for = |size: FloatOptional| {
                if size.is_undefined() {
                    MeasureMode::Undefined
                } else {
                    MeasureMode::Exactly
                }
            };
            let mut child_width_mode = mode_for(child_width);
            let child_height_mode = mode_for(child_height);

            // Let content such as text wrap at the container's width
            if !is_main_axis_row
                && child_width.is_undefined()
                && width_mode != MeasureMode::Undefined
                && width > 0.0
            {
                child_width = width;
                child_width_mode = MeasureMode::AtMost;
            }

            self.layout_node_internal(
                child,
                child_width,
                child_height,
                direction,
                child_width_mode,
                child_height_mode,
                child_width,
                child_height,
                false,
                "abs-measure",
            );

            let node = self.node(child);
            child_width = FloatOptional::new(
                node.layout.measured(Dimension::Width)
                    + node.margin_for_axis(FlexDirection::Row, width),
            );
            child_height = FloatOptional::new(
                node.layout.measured(Dimension::Height)
                    + node.margin_for_axis(FlexDirection::Column, width),
            );
        }

        self.layout_node_internal(
            child,
            child_width,
            child_height,
            direction,
            MeasureMode::Exactly,
            MeasureMode::Exactly,
            child_width,
            child_height,
            true,
            "abs-layout",
        );

        let parent = self.node(id);
        let node = self.node(child);
        let justify_content = parent.style.justify_content;
        let flex_wrap = parent.style.flex_wrap;
        let align = align_item(parent, node);
        let (main_size, cross_size) = if is_main_axis_row {
            (width, height)
        } else {
            (height, width)
        };

        let free_space = |axis: FlexDirection| {
            parent.layout.measured(axis.dimension()) - node.layout.measured(axis.dimension())
        };
        let trailing_inset = |axis: FlexDirection, axis_size: FloatOptional| {
            free_space(axis)
                - parent.trailing_border(axis)
                - node.trailing_margin(axis, width)
                - node.trailing_position(axis, axis_size)
        };

        let main_position = if node.is_trailing_position_defined(main_axis)
            && !node.is_leading_position_defined(main_axis)
        {
            Some(trailing_inset(main_axis, main_size))
        } else if !node.is_leading_position_defined(main_axis) {
            match justify_content {
                Justify::Center => Some(free_space(main_axis) / 2.0),
                Justify::FlexEnd => Some(free_space(main_axis)),
                _ => None,
            }
        } else {
            None
        };

        let cross_position = if node.is_trailing_position_defined(cross_axis)
            && !node.is_leading_position_defined(cross_axis)
        {
            Some(trailing_inset(cross_axis, cross_size))
        } else if !node.is_leading_position_defined(cross_axis) {
            if align == Align::Center {
                Some(free_space(cross_axis) / 2.0)
            } else if (align == Align::FlexEnd) != (flex_wrap == Wrap::WrapReverse) {
                Some(free_space(cross_axis))
            } else {
                None
            }
        } else {
            None
        };

        let layout = &mut self.node_mut(child).layout;
        if let Some(position) = main_position {
            layout.set_position(main_axis.leading_edge(), position);
        }
        if let Some(position) = cross_position {
            layout.set_position(cross_axis.leading_edge(), position);
        }
    }

    /// Mirror a child's leading position onto the trailing edge of `axis`
    pub(crate) fn set_child_trailing_position(&mut self, id: NodeId, child: NodeId, axis: FlexDirection) {
        let container = self.node(id).layout.measured(axis.dimension());
        let layout = &mut self.node_mut(child).layout;
        let size = layout.measured(axis.dimension());
        let position = container - size - layout.position_at(axis.leading_edge());
        layout.set_position(axis.trailing_edge(), position);
    }
}
