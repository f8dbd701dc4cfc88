//! A single box in the layout tree and the style resolution rules applied to it

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use slotmap::new_key_type;

use super::config::Config;
use super::results::LayoutResults;
use super::style::{Style, DEFAULT_FLEX_GROW, DEFAULT_FLEX_SHRINK, WEB_DEFAULT_FLEX_SHRINK};
use super::types::{Dimension, Direction, Edge, FlexDirection, MeasureMode, NodeType, PositionType, Size};
use super::value::{computed_edge_value, FloatOptional, Value};

new_key_type! {
    /// Handle to a node stored in a [`Tree`](super::tree::Tree)
    pub struct NodeId;
}

/// Computes the content size of a leaf from the available width and height
pub type MeasureFunc = Rc<dyn Fn(&Node, FloatOptional, MeasureMode, FloatOptional, MeasureMode) -> Size>;

/// Returns the distance from the top of a node to its baseline, given its size
pub type BaselineFunc = Rc<dyn Fn(&Node, f32, f32) -> f32>;

/// Called when a node transitions from clean to dirty
pub type DirtiedFunc = Rc<dyn Fn(&Node)>;

/// Returns extra text to include for a node in tree dumps
pub type PrintFunc = Rc<dyn Fn(&Node) -> String>;

/// A node owns its style and computed layout. Children are referenced by id;
/// `owner` is a back-reference used for dirty propagation and copy-on-write.
#[derive(Clone)]
pub struct Node {
    pub(crate) style: Style,
    pub(crate) layout: LayoutResults,
    pub(crate) children: Vec<NodeId>,
    pub(crate) owner: Option<NodeId>,
    /// Parents that list this node without owning it
    pub(crate) shared_count: usize,
    pub(crate) config: Rc<Config>,
    pub(crate) context: Option<Rc<dyn Any>>,
    pub(crate) measure: Option<MeasureFunc>,
    pub(crate) baseline: Option<BaselineFunc>,
    pub(crate) dirtied: Option<DirtiedFunc>,
    pub(crate) print: Option<PrintFunc>,
    pub(crate) node_type: NodeType,
    pub(crate) has_new_layout: bool,
    pub(crate) is_dirty: bool,
    pub(crate) is_reference_baseline: bool,
    pub(crate) line_index: usize,
    pub(crate) resolved_dimensions: [Value; 2],
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("style", &self.style)
            .field("layout", &self.layout)
            .field("children", &self.children)
            .field("owner", &self.owner)
            .field("shared_count", &self.shared_count)
            .field("node_type", &self.node_type)
            .field("is_dirty", &self.is_dirty)
            .field("has_measure", &self.measure.is_some())
            .finish()
    }
}

impl Node {
    pub fn new(config: Rc<Config>) -> Self {
        let style = if config.use_web_defaults {
            Style::web_defaults()
        } else {
            Style::default()
        };
        Self {
            style,
            layout: LayoutResults::default(),
            children: Vec::new(),
            owner: None,
            shared_count: 0,
            config,
            context: None,
            measure: None,
            baseline: None,
            dirtied: None,
            print: None,
            node_type: NodeType::Default,
            has_new_layout: true,
            is_dirty: false,
            is_reference_baseline: false,
            line_index: 0,
            resolved_dimensions: [Value::Undefined; 2],
        }
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn layout(&self) -> &LayoutResults {
        &self.layout
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn owner(&self) -> Option<NodeId> {
        self.owner
    }

    /// True while a cloned parent lists this node alongside its owner
    pub fn is_shared(&self) -> bool {
        self.shared_count > 0
    }

    pub fn config(&self) -> &Rc<Config> {
        &self.config
    }

    pub fn context(&self) -> Option<&Rc<dyn Any>> {
        self.context.as_ref()
    }

    /// Borrow the context payload as a concrete type
    pub fn context_as<T: 'static>(&self) -> Option<&T> {
        self.context.as_ref().and_then(|c| c.downcast_ref::<T>())
    }

    pub fn is_dirty(&self) -> bool {
        self.is_dirty
    }

    pub fn has_new_layout(&self) -> bool {
        self.has_new_layout
    }

    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    pub fn has_measure_func(&self) -> bool {
        self.measure.is_some()
    }

    pub fn has_baseline_func(&self) -> bool {
        self.baseline.is_some()
    }

    pub fn is_reference_baseline(&self) -> bool {
        self.is_reference_baseline
    }

    /// Index of the flex line this node was placed on by its owner
    pub fn line_index(&self) -> usize {
        self.line_index
    }

    /// Width or height after min/max pinning
    pub fn resolved_dimension(&self, dimension: Dimension) -> Value {
        self.resolved_dimensions[dimension.index()]
    }

    /// Use the max dimension as the preferred one when min and max are equal
    pub(crate) fn resolve_dimension(&mut self) {
        for dimension in [Dimension::Width, Dimension::Height] {
            let max = self.style.max_dimension(dimension);
            self.resolved_dimensions[dimension.index()] =
                if !max.is_undefined() && max == self.style.min_dimension(dimension) {
                    max
                } else {
                    self.style.dimension(dimension)
                };
        }
    }

    pub fn resolve_direction(&self, owner_direction: Direction) -> Direction {
        if self.style.direction == Direction::Inherit {
            if owner_direction != Direction::Inherit {
                owner_direction
            } else {
                Direction::Ltr
            }
        } else {
            self.style.direction
        }
    }

    pub fn resolve_flex_basis(&self) -> Value {
        let basis = self.style.flex_basis;
        if !basis.is_auto() && !basis.is_undefined() {
            return basis;
        }
        if self.style.flex > 0.0 {
            return if self.config.use_web_defaults {
                Value::Auto
            } else {
                Value::ZERO
            };
        }
        Value::Auto
    }

    /// Roots never grow
    pub fn resolve_flex_grow(&self) -> f32 {
        if self.owner.is_none() {
            return 0.0;
        }
        if let Some(grow) = self.style.flex_grow.get() {
            return grow;
        }
        if let Some(flex) = self.style.flex.get() {
            if flex > 0.0 {
                return flex;
            }
        }
        DEFAULT_FLEX_GROW
    }

    /// Roots never shrink
    pub fn resolve_flex_shrink(&self) -> f32 {
        if self.owner.is_none() {
            return 0.0;
        }
        if let Some(shrink) = self.style.flex_shrink.get() {
            return shrink;
        }
        if !self.config.use_web_defaults {
            if let Some(flex) = self.style.flex.get() {
                if flex < 0.0 {
                    return -flex;
                }
            }
        }
        if self.config.use_web_defaults {
            WEB_DEFAULT_FLEX_SHRINK
        } else {
            DEFAULT_FLEX_SHRINK
        }
    }

    pub fn is_node_flexible(&self) -> bool {
        self.style.position_type == PositionType::Relative
            && (self.resolve_flex_grow() != 0.0 || self.resolve_flex_shrink() != 0.0)
    }

    pub fn margin_leading_value(&self, axis: FlexDirection) -> Value {
        let start = self.style.margin(Edge::Start);
        if axis.is_row() && !start.is_undefined() {
            start
        } else {
            self.style.margin(axis.leading_edge())
        }
    }

    pub fn margin_trailing_value(&self, axis: FlexDirection) -> Value {
        let end = self.style.margin(Edge::End);
        if axis.is_row() && !end.is_undefined() {
            end
        } else {
            self.style.margin(axis.trailing_edge())
        }
    }

    /// Margin on the leading side of `axis`; percentages resolve against `width_size`
    pub fn leading_margin(&self, axis: FlexDirection, width_size: FloatOptional) -> f32 {
        let start = self.style.margin(Edge::Start);
        let value = if axis.is_row() && !start.is_undefined() {
            start
        } else {
            computed_edge_value(&self.style.margin, axis.leading_edge(), Value::ZERO)
        };
        value.resolve_margin(width_size).unwrap_or(0.0)
    }

    pub fn trailing_margin(&self, axis: FlexDirection, width_size: FloatOptional) -> f32 {
        let end = self.style.margin(Edge::End);
        let value = if axis.is_row() && !end.is_undefined() {
            end
        } else {
            computed_edge_value(&self.style.margin, axis.trailing_edge(), Value::ZERO)
        };
        value.resolve_margin(width_size).unwrap_or(0.0)
    }

    pub fn margin_for_axis(&self, axis: FlexDirection, width_size: FloatOptional) -> f32 {
        self.leading_margin(axis, width_size) + self.trailing_margin(axis, width_size)
    }

    pub fn leading_border(&self, axis: FlexDirection) -> f32 {
        if axis.is_row() {
            if let Some(start) = self.style.border(Edge::Start).magnitude().get() {
                if start >= 0.0 {
                    return start;
                }
            }
        }
        computed_edge_value(&self.style.border, axis.leading_edge(), Value::ZERO)
            .magnitude()
            .unwrap_or(0.0)
            .max(0.0)
    }

    pub fn trailing_border(&self, axis: FlexDirection) -> f32 {
        if axis.is_row() {
            if let Some(end) = self.style.border(Edge::End).magnitude().get() {
                if end >= 0.0 {
                    return end;
                }
            }
        }
        computed_edge_value(&self.style.border, axis.trailing_edge(), Value::ZERO)
            .magnitude()
            .unwrap_or(0.0)
            .max(0.0)
    }

    pub fn leading_padding(&self, axis: FlexDirection, width_size: FloatOptional) -> f32 {
        if axis.is_row() {
            if let Some(start) = self.style.padding(Edge::Start).resolve(width_size).get() {
                if start >= 0.0 {
                    return start;
                }
            }
        }
        computed_edge_value(&self.style.padding, axis.leading_edge(), Value::ZERO)
            .resolve(width_size)
            .unwrap_or(0.0)
            .max(0.0)
    }

    pub fn trailing_padding(&self, axis: FlexDirection, width_size: FloatOptional) -> f32 {
        if axis.is_row() {
            if let Some(end) = self.style.padding(Edge::End).resolve(width_size).get() {
                if end >= 0.0 {
                    return end;
                }
            }
        }
        computed_edge_value(&self.style.padding, axis.trailing_edge(), Value::ZERO)
            .resolve(width_size)
            .unwrap_or(0.0)
            .max(0.0)
    }

    pub fn leading_padding_and_border(&self, axis: FlexDirection, width_size: FloatOptional) -> f32 {
        self.leading_padding(axis, width_size) + self.leading_border(axis)
    }

    pub fn trailing_padding_and_border(&self, axis: FlexDirection, width_size: FloatOptional) -> f32 {
        self.trailing_padding(axis, width_size) + self.trailing_border(axis)
    }

    pub fn padding_and_border_for_axis(&self, axis: FlexDirection, width_size: FloatOptional) -> f32 {
        self.leading_padding_and_border(axis, width_size)
            + self.trailing_padding_and_border(axis, width_size)
    }

    fn leading_position_value(&self, axis: FlexDirection) -> Value {
        if axis.is_row() {
            let start = computed_edge_value(&self.style.position, Edge::Start, Value::Undefined);
            if !start.is_undefined() {
                return start;
            }
        }
        computed_edge_value(&self.style.position, axis.leading_edge(), Value::Undefined)
    }

    fn trailing_position_value(&self, axis: FlexDirection) -> Value {
        if axis.is_row() {
            let end = computed_edge_value(&self.style.position, Edge::End, Value::Undefined);
            if !end.is_undefined() {
                return end;
            }
        }
        computed_edge_value(&self.style.position, axis.trailing_edge(), Value::Undefined)
    }

    pub fn is_leading_position_defined(&self, axis: FlexDirection) -> bool {
        !self.leading_position_value(axis).is_undefined()
    }

    pub fn is_trailing_position_defined(&self, axis: FlexDirection) -> bool {
        !self.trailing_position_value(axis).is_undefined()
    }

    /// Leading position offset; zero when unset
    pub fn leading_position(&self, axis: FlexDirection, axis_size: FloatOptional) -> f32 {
        self.leading_position_value(axis)
            .resolve(axis_size)
            .unwrap_or(0.0)
    }

    pub fn trailing_position(&self, axis: FlexDirection, axis_size: FloatOptional) -> f32 {
        self.trailing_position_value(axis)
            .resolve(axis_size)
            .unwrap_or(0.0)
    }

    /// Offset of a relatively positioned node: leading wins, else minus trailing
    pub fn relative_position(&self, axis: FlexDirection, axis_size: FloatOptional) -> f32 {
        if self.is_leading_position_defined(axis) {
            self.leading_position(axis, axis_size)
        } else {
            -self.trailing_position(axis, axis_size)
        }
    }

    /// Whether the preferred size on `axis` is a usable definite length
    pub fn is_style_dim_defined(&self, axis: FlexDirection, owner_size: FloatOptional) -> bool {
        match self.resolved_dimension(axis.dimension()) {
            Value::Undefined | Value::Auto => false,
            Value::Point(v) => v >= 0.0,
            Value::Percent(v) => v >= 0.0 && owner_size.is_defined(),
        }
    }

    pub fn is_layout_dim_defined(&self, axis: FlexDirection) -> bool {
        self.layout.measured_dimensions[axis.dimension().index()] >= 0.0
    }

    /// Clamp `value` into the min/max constraints of `axis`
    pub fn bound_axis_within_min_max(
        &self,
        axis: FlexDirection,
        value: FloatOptional,
        axis_size: FloatOptional,
    ) -> FloatOptional {
        let dimension = axis.dimension();
        let min = self.style.min_dimension(dimension).resolve(axis_size);
        let max = self.style.max_dimension(dimension).resolve(axis_size);

        if max >= 0.0 && value > max {
            return max;
        }
        if min >= 0.0 && value < min {
            return min;
        }
        value
    }

    /// Like [`Node::bound_axis_within_min_max`] but never below padding and border
    pub fn bound_axis(
        &self,
        axis: FlexDirection,
        value: FloatOptional,
        axis_size: FloatOptional,
        width_size: FloatOptional,
    ) -> f32 {
        self.bound_axis_within_min_max(axis, value, axis_size)
            .max(FloatOptional::new(
                self.padding_and_border_for_axis(axis, width_size),
            ))
            .unwrap_or(0.0)
    }

    /// Measured size on `axis` plus margins
    pub fn dim_with_margin(&self, axis: FlexDirection, width_size: FloatOptional) -> f32 {
        self.layout.measured(axis.dimension()) + self.margin_for_axis(axis, width_size)
    }
}
