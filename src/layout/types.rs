//! Enumerations shared by styles, layouts and the solver

use std::fmt;
use std::str::FromStr;

/// Error returned when a keyword does not name a variant of a style enum
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKeyword {
    pub kind: &'static str,
    pub keyword: String,
}

impl fmt::Display for UnknownKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} '{}'", self.kind, self.keyword)
    }
}

impl std::error::Error for UnknownKeyword {}

/// Declares a keyword enum with its CSS spelling, `Display` and `FromStr`.
macro_rules! keyword_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Keyword used in fixtures and tree dumps
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownKeyword;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(UnknownKeyword {
                        kind: $kind,
                        keyword: other.to_string(),
                    }),
                }
            }
        }
    };
}

keyword_enum! {
    /// Writing direction
    Direction, "direction" {
        Inherit => "inherit",
        Ltr => "ltr",
        Rtl => "rtl",
    }
}

keyword_enum! {
    FlexDirection, "flex direction" {
        Column => "column",
        ColumnReverse => "column-reverse",
        Row => "row",
        RowReverse => "row-reverse",
    }
}

keyword_enum! {
    Justify, "justify value" {
        FlexStart => "flex-start",
        Center => "center",
        FlexEnd => "flex-end",
        SpaceBetween => "space-between",
        SpaceAround => "space-around",
        SpaceEvenly => "space-evenly",
    }
}

keyword_enum! {
    Align, "align value" {
        Auto => "auto",
        FlexStart => "flex-start",
        Center => "center",
        FlexEnd => "flex-end",
        Stretch => "stretch",
        Baseline => "baseline",
        SpaceBetween => "space-between",
        SpaceAround => "space-around",
    }
}

keyword_enum! {
    PositionType, "position type" {
        Relative => "relative",
        Absolute => "absolute",
    }
}

keyword_enum! {
    Wrap, "wrap mode" {
        NoWrap => "no-wrap",
        Wrap => "wrap",
        WrapReverse => "wrap-reverse",
    }
}

keyword_enum! {
    Overflow, "overflow mode" {
        Visible => "visible",
        Hidden => "hidden",
        Scroll => "scroll",
    }
}

keyword_enum! {
    Display, "display mode" {
        Flex => "flex",
        None => "none",
    }
}

keyword_enum! {
    /// How an available size constrains a measurement
    MeasureMode, "measure mode" {
        /// No constraint
        Undefined => "undefined",
        /// The result must equal the given size
        Exactly => "exactly",
        /// The result may be smaller than the given size
        AtMost => "at-most",
    }
}

keyword_enum! {
    NodeType, "node type" {
        Default => "default",
        /// Leaf with a measure function; its size is never rounded down
        Text => "text",
    }
}

keyword_enum! {
    LogLevel, "log level" {
        Error => "error",
        Warn => "warn",
        Info => "info",
        Debug => "debug",
        Verbose => "verbose",
        Fatal => "fatal",
    }
}

keyword_enum! {
    ExperimentalFeature, "experimental feature" {
        /// Recompute a child's flex basis every time its owner lays it out,
        /// not just once per layout generation
        WebFlexBasis => "web-flex-basis",
    }
}

keyword_enum! {
    /// Logical and physical box edges
    Edge, "edge" {
        Left => "left",
        Top => "top",
        Right => "right",
        Bottom => "bottom",
        Start => "start",
        End => "end",
        Horizontal => "horizontal",
        Vertical => "vertical",
        All => "all",
    }
}

keyword_enum! {
    Dimension, "dimension" {
        Width => "width",
        Height => "height",
    }
}

/// Number of entries in a per-edge style array
pub const EDGE_COUNT: usize = 9;

impl Edge {
    pub fn index(self) -> usize {
        self as usize
    }
}

impl Dimension {
    pub fn index(self) -> usize {
        self as usize
    }
}

impl Default for Direction {
    fn default() -> Self {
        Direction::Inherit
    }
}

impl FlexDirection {
    pub fn is_row(self) -> bool {
        matches!(self, FlexDirection::Row | FlexDirection::RowReverse)
    }

    pub fn is_column(self) -> bool {
        matches!(self, FlexDirection::Column | FlexDirection::ColumnReverse)
    }

    /// Swap row and row-reverse when laying out right to left
    pub fn resolve(self, direction: Direction) -> FlexDirection {
        if direction == Direction::Rtl {
            match self {
                FlexDirection::Row => return FlexDirection::RowReverse,
                FlexDirection::RowReverse => return FlexDirection::Row,
                _ => {}
            }
        }
        self
    }

    /// Axis perpendicular to this one
    pub fn cross(self, direction: Direction) -> FlexDirection {
        if self.is_column() {
            FlexDirection::Row.resolve(direction)
        } else {
            FlexDirection::Column
        }
    }

    /// Physical edge items start from on this axis
    pub fn leading_edge(self) -> Edge {
        match self {
            FlexDirection::Column => Edge::Top,
            FlexDirection::ColumnReverse => Edge::Bottom,
            FlexDirection::Row => Edge::Left,
            FlexDirection::RowReverse => Edge::Right,
        }
    }

    pub fn trailing_edge(self) -> Edge {
        match self {
            FlexDirection::Column => Edge::Bottom,
            FlexDirection::ColumnReverse => Edge::Top,
            FlexDirection::Row => Edge::Right,
            FlexDirection::RowReverse => Edge::Left,
        }
    }

    pub fn dimension(self) -> Dimension {
        if self.is_row() {
            Dimension::Width
        } else {
            Dimension::Height
        }
    }

    pub fn is_reverse(self) -> bool {
        matches!(
            self,
            FlexDirection::RowReverse | FlexDirection::ColumnReverse
        )
    }
}

/// Width and height returned by measure functions
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Sections included in a tree dump
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrintOptions {
    pub layout: bool,
    pub style: bool,
    pub children: bool,
}

impl PrintOptions {
    pub fn all() -> Self {
        Self {
            layout: true,
            style: true,
            children: true,
        }
    }
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self::all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_round_trip_through_from_str() {
        assert_eq!("space-evenly".parse::<Justify>(), Ok(Justify::SpaceEvenly));
        assert_eq!(Align::Baseline.as_str(), "baseline");
        assert_eq!(Wrap::WrapReverse.to_string(), "wrap-reverse");
    }

    #[test]
    fn test_unknown_keyword_error() {
        let err = "diagonal".parse::<FlexDirection>().unwrap_err();
        assert_eq!(err.kind, "flex direction");
        assert!(err.to_string().contains("diagonal"));
    }

    #[test]
    fn test_flex_direction_resolves_for_rtl() {
        assert_eq!(
            FlexDirection::Row.resolve(Direction::Rtl),
            FlexDirection::RowReverse
        );
        assert_eq!(
            FlexDirection::Column.resolve(Direction::Rtl),
            FlexDirection::Column
        );
        assert_eq!(
            FlexDirection::Column.cross(Direction::Rtl),
            FlexDirection::RowReverse
        );
        assert_eq!(
            FlexDirection::RowReverse.cross(Direction::Ltr),
            FlexDirection::Column
        );
    }

    #[test]
    fn test_axis_edges() {
        assert_eq!(FlexDirection::ColumnReverse.leading_edge(), Edge::Bottom);
        assert_eq!(FlexDirection::RowReverse.trailing_edge(), Edge::Left);
        assert_eq!(FlexDirection::Row.dimension(), Dimension::Width);
    }
}
