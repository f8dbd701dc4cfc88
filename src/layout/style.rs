//! Per-node style properties

use super::types::{
    Align, Dimension, Direction, Display, Edge, FlexDirection, Justify, Overflow, PositionType,
    Wrap, EDGE_COUNT,
};
use super::value::{Edges, FloatOptional, Value};

pub const DEFAULT_FLEX_GROW: f32 = 0.0;
pub const DEFAULT_FLEX_SHRINK: f32 = 0.0;
pub const WEB_DEFAULT_FLEX_SHRINK: f32 = 1.0;

/// Style of a single node.
///
/// Optional floats (`flex`, `flex_grow`, `flex_shrink`, `aspect_ratio`) are
/// undefined until set; resolution against defaults happens on the node.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub direction: Direction,
    pub flex_direction: FlexDirection,
    pub justify_content: Justify,
    pub align_content: Align,
    pub align_items: Align,
    pub align_self: Align,
    pub position_type: PositionType,
    pub flex_wrap: Wrap,
    pub overflow: Overflow,
    pub display: Display,
    pub flex: FloatOptional,
    pub flex_grow: FloatOptional,
    pub flex_shrink: FloatOptional,
    pub flex_basis: Value,
    pub margin: Edges,
    pub position: Edges,
    pub padding: Edges,
    pub border: Edges,
    pub dimensions: [Value; 2],
    pub min_dimensions: [Value; 2],
    pub max_dimensions: [Value; 2],
    pub aspect_ratio: FloatOptional,
}

impl Style {
    /// Style of a freshly created node; also the baseline the debug dump
    /// compares against
    pub const DEFAULT: Style = Style {
        direction: Direction::Inherit,
        flex_direction: FlexDirection::Column,
        justify_content: Justify::FlexStart,
        align_content: Align::FlexStart,
        align_items: Align::Stretch,
        align_self: Align::Auto,
        position_type: PositionType::Relative,
        flex_wrap: Wrap::NoWrap,
        overflow: Overflow::Visible,
        display: Display::Flex,
        flex: FloatOptional::UNDEFINED,
        flex_grow: FloatOptional::UNDEFINED,
        flex_shrink: FloatOptional::UNDEFINED,
        flex_basis: Value::Auto,
        margin: [Value::Undefined; EDGE_COUNT],
        position: [Value::Undefined; EDGE_COUNT],
        padding: [Value::Undefined; EDGE_COUNT],
        border: [Value::Undefined; EDGE_COUNT],
        dimensions: [Value::Auto; 2],
        min_dimensions: [Value::Undefined; 2],
        max_dimensions: [Value::Undefined; 2],
        aspect_ratio: FloatOptional::UNDEFINED,
    };

    /// Defaults used when a node is created under a web-defaults config
    pub fn web_defaults() -> Self {
        Self {
            flex_direction: FlexDirection::Row,
            align_content: Align::Stretch,
            ..Self::DEFAULT
        }
    }

    pub fn dimension(&self, dimension: Dimension) -> Value {
        self.dimensions[dimension.index()]
    }

    pub fn min_dimension(&self, dimension: Dimension) -> Value {
        self.min_dimensions[dimension.index()]
    }

    pub fn max_dimension(&self, dimension: Dimension) -> Value {
        self.max_dimensions[dimension.index()]
    }

    pub fn margin(&self, edge: Edge) -> Value {
        self.margin[edge.index()]
    }

    pub fn padding(&self, edge: Edge) -> Value {
        self.padding[edge.index()]
    }

    pub fn border(&self, edge: Edge) -> Value {
        self.border[edge.index()]
    }

    pub fn position(&self, edge: Edge) -> Value {
        self.position[edge.index()]
    }
}

impl Default for Style {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_style() {
        let style = Style::default();
        assert_eq!(style.flex_direction, FlexDirection::Column);
        assert_eq!(style.align_items, Align::Stretch);
        assert_eq!(style.flex_basis, Value::Auto);
        assert_eq!(style.dimension(Dimension::Width), Value::Auto);
        assert_eq!(style.min_dimension(Dimension::Height), Value::Undefined);
        assert!(style.flex_grow.is_undefined());
    }

    #[test]
    fn test_web_defaults() {
        let style = Style::web_defaults();
        assert_eq!(style.flex_direction, FlexDirection::Row);
        assert_eq!(style.align_content, Align::Stretch);
        assert_ne!(style, Style::default());
    }
}
