//! Computed layout of a node and its measurement cache

use super::types::{Dimension, Direction, Edge, MeasureMode};
use super::value::{floats_equal, FloatOptional};

/// Capacity of the measurement ring buffer
pub const MAX_CACHED_RESULT_COUNT: usize = 16;

/// One remembered measurement: the request and the size it produced
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CachedMeasurement {
    pub available_width: FloatOptional,
    pub available_height: FloatOptional,
    /// `None` marks an empty slot
    pub width_measure_mode: Option<MeasureMode>,
    pub height_measure_mode: Option<MeasureMode>,
    pub computed_width: f32,
    pub computed_height: f32,
}

impl Default for CachedMeasurement {
    fn default() -> Self {
        Self {
            available_width: FloatOptional::new(0.0),
            available_height: FloatOptional::new(0.0),
            width_measure_mode: None,
            height_measure_mode: None,
            computed_width: -1.0,
            computed_height: -1.0,
        }
    }
}

impl CachedMeasurement {
    /// Exact match on the request, as used for nodes without a measure function
    pub(crate) fn matches_request(
        &self,
        available_width: FloatOptional,
        available_height: FloatOptional,
        width_mode: MeasureMode,
        height_mode: MeasureMode,
    ) -> bool {
        floats_equal(self.available_width, available_width)
            && floats_equal(self.available_height, available_height)
            && self.width_measure_mode == Some(width_mode)
            && self.height_measure_mode == Some(height_mode)
    }
}

/// Layout output of a node plus the bookkeeping the solver keeps between passes.
///
/// Position edges are physical (left, top, right, bottom). Margin, border and
/// padding are stored as left, top, right, bottom, start, end; only top,
/// bottom, start and end are written by the solver.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutResults {
    pub(crate) position: [f32; 4],
    pub(crate) dimensions: [FloatOptional; 2],
    pub(crate) margin: [f32; 6],
    pub(crate) border: [f32; 6],
    pub(crate) padding: [f32; 6],
    pub(crate) direction: Direction,

    pub(crate) computed_flex_basis_generation: u32,
    pub(crate) computed_flex_basis: FloatOptional,
    pub(crate) had_overflow: bool,

    pub(crate) generation_count: u32,
    pub(crate) last_owner_direction: Option<Direction>,

    pub(crate) next_cached_measurements_index: usize,
    pub(crate) cached_measurements: [CachedMeasurement; MAX_CACHED_RESULT_COUNT],
    pub(crate) measured_dimensions: [FloatOptional; 2],
    pub(crate) cached_layout: CachedMeasurement,

    pub(crate) did_use_legacy_flag: bool,
    pub(crate) does_legacy_stretch_flag_affect_layout: bool,
}

impl Default for LayoutResults {
    fn default() -> Self {
        Self {
            position: [0.0; 4],
            dimensions: [FloatOptional::UNDEFINED; 2],
            margin: [0.0; 6],
            border: [0.0; 6],
            padding: [0.0; 6],
            direction: Direction::Inherit,
            computed_flex_basis_generation: 0,
            computed_flex_basis: FloatOptional::UNDEFINED,
            had_overflow: false,
            generation_count: 0,
            last_owner_direction: None,
            next_cached_measurements_index: 0,
            cached_measurements: [CachedMeasurement::default(); MAX_CACHED_RESULT_COUNT],
            measured_dimensions: [FloatOptional::UNDEFINED; 2],
            cached_layout: CachedMeasurement::default(),
            did_use_legacy_flag: false,
            does_legacy_stretch_flag_affect_layout: false,
        }
    }
}

impl LayoutResults {
    pub fn left(&self) -> f32 {
        self.position[Edge::Left.index()]
    }

    pub fn top(&self) -> f32 {
        self.position[Edge::Top.index()]
    }

    pub fn right(&self) -> f32 {
        self.position[Edge::Right.index()]
    }

    pub fn bottom(&self) -> f32 {
        self.position[Edge::Bottom.index()]
    }

    /// Undefined until the node has been laid out
    pub fn width(&self) -> FloatOptional {
        self.dimensions[Dimension::Width.index()]
    }

    pub fn height(&self) -> FloatOptional {
        self.dimensions[Dimension::Height.index()]
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn had_overflow(&self) -> bool {
        self.had_overflow
    }

    pub fn did_use_legacy_flag(&self) -> bool {
        self.did_use_legacy_flag
    }

    pub fn does_legacy_stretch_flag_affect_layout(&self) -> bool {
        self.does_legacy_stretch_flag_affect_layout
    }

    /// Resolved margin on a physical or logical edge; `None` for shorthands
    pub fn margin(&self, edge: Edge) -> Option<f32> {
        self.resolved_edge(&self.margin, edge)
    }

    pub fn border(&self, edge: Edge) -> Option<f32> {
        self.resolved_edge(&self.border, edge)
    }

    pub fn padding(&self, edge: Edge) -> Option<f32> {
        self.resolved_edge(&self.padding, edge)
    }

    fn resolved_edge(&self, values: &[f32; 6], edge: Edge) -> Option<f32> {
        let rtl = self.direction == Direction::Rtl;
        match edge {
            Edge::Left if rtl => Some(values[Edge::End.index()]),
            Edge::Left => Some(values[Edge::Start.index()]),
            Edge::Right if rtl => Some(values[Edge::Start.index()]),
            Edge::Right => Some(values[Edge::End.index()]),
            Edge::Top | Edge::Bottom | Edge::Start | Edge::End => Some(values[edge.index()]),
            Edge::Horizontal | Edge::Vertical | Edge::All => None,
        }
    }

    pub(crate) fn measured(&self, dimension: Dimension) -> f32 {
        self.measured_dimensions[dimension.index()].unwrap_or(0.0)
    }

    pub(crate) fn set_position(&mut self, edge: Edge, value: f32) {
        self.position[edge.index()] = value;
    }

    pub(crate) fn position_at(&self, edge: Edge) -> f32 {
        self.position[edge.index()]
    }

    /// Compare positions, sizes and children-independent flags of two layouts
    pub(crate) fn same_geometry(&self, other: &LayoutResults) -> bool {
        let dims_equal = self
            .dimensions
            .iter()
            .zip(other.dimensions.iter())
            .all(|(a, b)| floats_equal(*a, *b));
        self.position == other.position
            && dims_equal
            && self.margin == other.margin
            && self.border == other.border
            && self.padding == other.padding
            && self.direction == other.direction
            && self.had_overflow == other.had_overflow
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_layout_is_undefined() {
        let layout = LayoutResults::default();
        assert!(layout.width().is_undefined());
        assert!(layout.height().is_undefined());
        assert_eq!(layout.left(), 0.0);
        assert_eq!(layout.next_cached_measurements_index, 0);
    }

    #[test]
    fn test_edge_accessors_follow_direction() {
        let mut layout = LayoutResults::default();
        layout.margin[Edge::Start.index()] = 5.0;
        layout.margin[Edge::End.index()] = 7.0;

        layout.direction = Direction::Ltr;
        assert_eq!(layout.margin(Edge::Left), Some(5.0));
        assert_eq!(layout.margin(Edge::Right), Some(7.0));

        layout.direction = Direction::Rtl;
        assert_eq!(layout.margin(Edge::Left), Some(7.0));
        assert_eq!(layout.margin(Edge::Right), Some(5.0));
        assert_eq!(layout.margin(Edge::All), None);
    }

    #[test]
    fn test_empty_cache_slot_never_matches() {
        let slot = CachedMeasurement::default();
        assert!(!slot.matches_request(
            FloatOptional::new(0.0),
            FloatOptional::new(0.0),
            MeasureMode::Exactly,
            MeasureMode::Exactly,
        ));
    }
}
