//! Style values and the optional float used wherever a size may be undefined

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Neg, Sub};

use super::types::{Edge, EDGE_COUNT};

/// Tolerance used when comparing computed sizes
pub const EPSILON: f32 = 0.0001;

/// A float that may be undefined.
///
/// Arithmetic involving an undefined operand yields undefined. Ordering
/// comparisons against an undefined operand are false, except that two
/// undefined values compare equal.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FloatOptional(Option<f32>);

impl FloatOptional {
    pub const UNDEFINED: FloatOptional = FloatOptional(None);

    /// Wrap a float; NaN becomes undefined
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            Self(None)
        } else {
            Self(Some(value))
        }
    }

    pub fn is_undefined(self) -> bool {
        self.0.is_none()
    }

    pub fn is_defined(self) -> bool {
        self.0.is_some()
    }

    pub fn get(self) -> Option<f32> {
        self.0
    }

    pub fn unwrap_or(self, default: f32) -> f32 {
        self.0.unwrap_or(default)
    }

    /// Larger of two values, preferring whichever side is defined
    pub fn max(self, other: FloatOptional) -> FloatOptional {
        match (self.0, other.0) {
            (Some(a), Some(b)) => Self(Some(a.max(b))),
            (Some(_), None) => self,
            _ => other,
        }
    }

    /// Smaller of two values, preferring whichever side is defined
    pub fn min(self, other: FloatOptional) -> FloatOptional {
        match (self.0, other.0) {
            (Some(a), Some(b)) => Self(Some(a.min(b))),
            (Some(_), None) => self,
            _ => other,
        }
    }

    pub fn map(self, f: impl FnOnce(f32) -> f32) -> FloatOptional {
        Self(self.0.map(f))
    }
}

impl From<f32> for FloatOptional {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

impl From<Option<f32>> for FloatOptional {
    fn from(value: Option<f32>) -> Self {
        value.map(Self::new).unwrap_or_default()
    }
}

impl fmt::Display for FloatOptional {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{}", v),
            None => f.write_str("undefined"),
        }
    }
}

impl PartialOrd for FloatOptional {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self.0, other.0) {
            (Some(a), Some(b)) => a.partial_cmp(&b),
            (None, None) => Some(Ordering::Equal),
            _ => None,
        }
    }
}

impl PartialEq<f32> for FloatOptional {
    fn eq(&self, other: &f32) -> bool {
        self.0 == Some(*other)
    }
}

impl PartialOrd<f32> for FloatOptional {
    fn partial_cmp(&self, other: &f32) -> Option<Ordering> {
        self.0.and_then(|v| v.partial_cmp(other))
    }
}

impl Add for FloatOptional {
    type Output = FloatOptional;

    fn add(self, rhs: FloatOptional) -> FloatOptional {
        match (self.0, rhs.0) {
            (Some(a), Some(b)) => Self(Some(a + b)),
            _ => Self::UNDEFINED,
        }
    }
}

impl Add<f32> for FloatOptional {
    type Output = FloatOptional;

    fn add(self, rhs: f32) -> FloatOptional {
        self + FloatOptional::new(rhs)
    }
}

impl Sub for FloatOptional {
    type Output = FloatOptional;

    fn sub(self, rhs: FloatOptional) -> FloatOptional {
        match (self.0, rhs.0) {
            (Some(a), Some(b)) => Self(Some(a - b)),
            _ => Self::UNDEFINED,
        }
    }
}

impl Sub<f32> for FloatOptional {
    type Output = FloatOptional;

    fn sub(self, rhs: f32) -> FloatOptional {
        self - FloatOptional::new(rhs)
    }
}

impl Neg for FloatOptional {
    type Output = FloatOptional;

    fn neg(self) -> FloatOptional {
        Self(self.0.map(|v| -v))
    }
}

/// Compare two optional floats within [`EPSILON`]; two undefined values are equal
pub fn floats_equal(a: FloatOptional, b: FloatOptional) -> bool {
    match (a.get(), b.get()) {
        (Some(a), Some(b)) => (a - b).abs() < EPSILON,
        (None, None) => true,
        _ => false,
    }
}

/// Unit tag of a [`Value`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    Undefined,
    Point,
    Percent,
    Auto,
}

/// A style length
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Value {
    #[default]
    Undefined,
    Point(f32),
    Percent(f32),
    Auto,
}

impl Value {
    pub const ZERO: Value = Value::Point(0.0);

    /// Point value; NaN yields [`Value::Undefined`]
    pub fn point(value: f32) -> Self {
        if value.is_nan() {
            Value::Undefined
        } else {
            Value::Point(value)
        }
    }

    /// Percentage value; NaN yields [`Value::Undefined`]
    pub fn percent(value: f32) -> Self {
        if value.is_nan() {
            Value::Undefined
        } else {
            Value::Percent(value)
        }
    }

    pub fn unit(self) -> Unit {
        match self {
            Value::Undefined => Unit::Undefined,
            Value::Point(_) => Unit::Point,
            Value::Percent(_) => Unit::Percent,
            Value::Auto => Unit::Auto,
        }
    }

    /// Numeric magnitude; undefined for `Auto` and `Undefined`
    pub fn magnitude(self) -> FloatOptional {
        match self {
            Value::Point(v) | Value::Percent(v) => FloatOptional::new(v),
            Value::Undefined | Value::Auto => FloatOptional::UNDEFINED,
        }
    }

    pub fn is_undefined(self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn is_auto(self) -> bool {
        matches!(self, Value::Auto)
    }

    /// Resolve against a reference size
    ///
    /// Percentages of an undefined reference are undefined.
    pub fn resolve(self, reference: FloatOptional) -> FloatOptional {
        match self {
            Value::Undefined | Value::Auto => FloatOptional::UNDEFINED,
            Value::Point(v) => FloatOptional::new(v),
            Value::Percent(v) => reference.map(|r| v * r * 0.01),
        }
    }

    /// Resolve a margin, where `auto` contributes nothing
    pub fn resolve_margin(self, reference: FloatOptional) -> FloatOptional {
        if self.is_auto() {
            FloatOptional::new(0.0)
        } else {
            self.resolve(reference)
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Point(v) => write!(f, "{}px", v),
            Value::Percent(v) => write!(f, "{}%", v),
            Value::Auto => f.write_str("auto"),
        }
    }
}

/// Per-edge style values indexed by [`Edge`]
pub type Edges = [Value; EDGE_COUNT];

/// Look up an edge with CSS shorthand precedence.
///
/// The edge itself wins, then its axis shorthand (`Vertical` for top and
/// bottom, `Horizontal` for left, right, start and end), then `All`.
/// `Start` and `End` never fall back to `default`: they report undefined so
/// callers can tell an explicit logical edge from a physical one.
pub fn computed_edge_value(edges: &Edges, edge: Edge, default: Value) -> Value {
    if !edges[edge.index()].is_undefined() {
        return edges[edge.index()];
    }

    if matches!(edge, Edge::Top | Edge::Bottom) && !edges[Edge::Vertical.index()].is_undefined()
    {
        return edges[Edge::Vertical.index()];
    }

    if matches!(edge, Edge::Left | Edge::Right | Edge::Start | Edge::End)
        && !edges[Edge::Horizontal.index()].is_undefined()
    {
        return edges[Edge::Horizontal.index()];
    }

    if !edges[Edge::All.index()].is_undefined() {
        return edges[Edge::All.index()];
    }

    if matches!(edge, Edge::Start | Edge::End) {
        return Value::Undefined;
    }

    default
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_undefined_and_auto() {
        assert!(Value::Undefined.resolve(FloatOptional::new(100.0)).is_undefined());
        assert!(Value::Auto.resolve(FloatOptional::new(100.0)).is_undefined());
    }

    #[test]
    fn test_resolve_percent_against_undefined_reference() {
        assert!(Value::percent(50.0)
            .resolve(FloatOptional::UNDEFINED)
            .is_undefined());
        assert_eq!(Value::percent(50.0).resolve(FloatOptional::new(300.0)), 150.0);
        assert_eq!(Value::point(12.0).resolve(FloatOptional::UNDEFINED), 12.0);
    }

    #[test]
    fn test_nan_is_never_stored() {
        assert_eq!(Value::point(f32::NAN), Value::Undefined);
        assert!(FloatOptional::new(f32::NAN).is_undefined());
    }

    #[test]
    fn test_undefined_swallows_arithmetic() {
        let undefined = FloatOptional::UNDEFINED;
        let ten = FloatOptional::new(10.0);
        assert!((undefined + ten).is_undefined());
        assert!((ten - undefined).is_undefined());
        assert!((undefined + 5.0).is_undefined());
        assert_eq!(ten + 5.0, 15.0);
        assert!((-undefined).is_undefined());
    }

    #[test]
    fn test_comparisons_with_undefined_are_false() {
        let undefined = FloatOptional::UNDEFINED;
        let ten = FloatOptional::new(10.0);
        assert!(!(undefined > ten));
        assert!(!(undefined < ten));
        assert!(!(ten >= undefined));
        assert!(undefined >= FloatOptional::UNDEFINED);
        assert_eq!(undefined, FloatOptional::UNDEFINED);
    }

    #[test]
    fn test_max_and_min_prefer_defined_side() {
        let undefined = FloatOptional::UNDEFINED;
        assert_eq!(undefined.max(FloatOptional::new(3.0)), 3.0);
        assert_eq!(FloatOptional::new(3.0).min(undefined), 3.0);
        assert_eq!(FloatOptional::new(3.0).max(FloatOptional::new(7.0)), 7.0);
    }

    #[test]
    fn test_floats_equal() {
        assert!(floats_equal(FloatOptional::new(1.0), FloatOptional::new(1.00001)));
        assert!(!floats_equal(FloatOptional::new(1.0), FloatOptional::new(1.1)));
        assert!(floats_equal(FloatOptional::UNDEFINED, FloatOptional::UNDEFINED));
        assert!(!floats_equal(FloatOptional::UNDEFINED, FloatOptional::new(0.0)));
    }

    #[test]
    fn test_value_equality() {
        assert_eq!(Value::Undefined, Value::Undefined);
        assert_eq!(Value::point(4.0), Value::Point(4.0));
        assert_ne!(Value::point(4.0), Value::percent(4.0));
    }

    #[test]
    fn test_edge_precedence_axis_over_all() {
        let mut edges: Edges = [Value::Undefined; EDGE_COUNT];
        edges[Edge::Horizontal.index()] = Value::point(10.0);
        edges[Edge::All.index()] = Value::point(20.0);

        assert_eq!(
            computed_edge_value(&edges, Edge::Left, Value::ZERO),
            Value::point(10.0)
        );
        assert_eq!(
            computed_edge_value(&edges, Edge::Top, Value::ZERO),
            Value::point(20.0)
        );
    }

    #[test]
    fn test_edge_specific_wins() {
        let mut edges: Edges = [Value::Undefined; EDGE_COUNT];
        edges[Edge::Bottom.index()] = Value::point(1.0);
        edges[Edge::Vertical.index()] = Value::point(2.0);
        assert_eq!(
            computed_edge_value(&edges, Edge::Bottom, Value::ZERO),
            Value::point(1.0)
        );
    }

    #[test]
    fn test_edge_default_and_logical_edges() {
        let edges: Edges = [Value::Undefined; EDGE_COUNT];
        assert_eq!(
            computed_edge_value(&edges, Edge::Right, Value::ZERO),
            Value::ZERO
        );
        assert_eq!(
            computed_edge_value(&edges, Edge::Start, Value::ZERO),
            Value::Undefined
        );
    }
}
