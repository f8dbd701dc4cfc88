//! Reuse of earlier measurements

use super::node::Node;
use super::results::CachedMeasurement;
use super::rounding::round_value_to_pixel_grid;
use super::types::{FlexDirection, MeasureMode};
use super::value::{floats_equal, FloatOptional};

/// Where a reusable result was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CacheSlot {
    Layout,
    Measurement(usize),
}

fn size_is_exact_and_matches_old_measured_size(
    mode: MeasureMode,
    size: FloatOptional,
    last_computed_size: f32,
) -> bool {
    mode == MeasureMode::Exactly && floats_equal(size, FloatOptional::new(last_computed_size))
}

fn old_size_is_unspecified_and_still_fits(
    mode: MeasureMode,
    size: FloatOptional,
    last_mode: Option<MeasureMode>,
    last_computed_size: f32,
) -> bool {
    mode == MeasureMode::AtMost
        && last_mode == Some(MeasureMode::Undefined)
        && (size >= last_computed_size
            || floats_equal(size, FloatOptional::new(last_computed_size)))
}

fn new_size_is_stricter_and_still_valid(
    mode: MeasureMode,
    size: FloatOptional,
    last_mode: Option<MeasureMode>,
    last_size: FloatOptional,
    last_computed_size: f32,
) -> bool {
    let (Some(size), Some(last_size)) = (size.get(), last_size.get()) else {
        return false;
    };
    last_mode == Some(MeasureMode::AtMost)
        && mode == MeasureMode::AtMost
        && !last_computed_size.is_nan()
        && last_size > size
        && (last_computed_size <= size
            || floats_equal(FloatOptional::new(size), FloatOptional::new(last_computed_size)))
}

/// Whether a measurement taken for `last` still answers a request for the
/// given size and modes.
///
/// Sizes include margins; the margins are removed before comparing against
/// the computed size. With a non-zero `point_scale_factor` the requested and
/// remembered sizes are compared after rounding to the pixel grid.
#[allow(clippy::too_many_arguments)]
pub fn can_use_cached_measurement(
    width_mode: MeasureMode,
    width: FloatOptional,
    height_mode: MeasureMode,
    height: FloatOptional,
    last: &CachedMeasurement,
    margin_row: f32,
    margin_column: f32,
    point_scale_factor: f32,
) -> bool {
    if last.computed_width < 0.0 || last.computed_height < 0.0 {
        return false;
    }

    let round = |value: FloatOptional| {
        if point_scale_factor != 0.0 {
            value.map(|v| round_value_to_pixel_grid(v, point_scale_factor, false, false))
        } else {
            value
        }
    };

    let has_same_width_spec = last.width_measure_mode == Some(width_mode)
        && floats_equal(round(last.available_width), round(width));
    let has_same_height_spec = last.height_measure_mode == Some(height_mode)
        && floats_equal(round(last.available_height), round(height));

    let inner_width = width - margin_row;
    let width_is_compatible = has_same_width_spec
        || size_is_exact_and_matches_old_measured_size(width_mode, inner_width, last.computed_width)
        || old_size_is_unspecified_and_still_fits(
            width_mode,
            inner_width,
            last.width_measure_mode,
            last.computed_width,
        )
        || new_size_is_stricter_and_still_valid(
            width_mode,
            inner_width,
            last.width_measure_mode,
            last.available_width,
            last.computed_width,
        );

    let inner_height = height - margin_column;
    let height_is_compatible = has_same_height_spec
        || size_is_exact_and_matches_old_measured_size(
            height_mode,
            inner_height,
            last.computed_height,
        )
        || old_size_is_unspecified_and_still_fits(
            height_mode,
            inner_height,
            last.height_measure_mode,
            last.computed_height,
        )
        || new_size_is_stricter_and_still_valid(
            height_mode,
            inner_height,
            last.height_measure_mode,
            last.available_height,
            last.computed_height,
        );

    width_is_compatible && height_is_compatible
}

/// Look up a cached result for a request on `node`.
///
/// Leaves with a measure function accept any compatible entry; other nodes
/// only reuse an exact match. Full layouts are only answered from the
/// layout slot.
pub(crate) fn find_cached_result(
    node: &Node,
    available_width: FloatOptional,
    available_height: FloatOptional,
    width_mode: MeasureMode,
    height_mode: MeasureMode,
    owner_width: FloatOptional,
    perform_layout: bool,
) -> Option<CacheSlot> {
    let layout = &node.layout;
    let filled = &layout.cached_measurements[..layout.next_cached_measurements_index];

    if node.measure.is_some() {
        let margin_row = node.margin_for_axis(FlexDirection::Row, owner_width);
        let margin_column = node.margin_for_axis(FlexDirection::Column, owner_width);
        let scale = node.config.point_scale_factor;
        let compatible = |entry: &CachedMeasurement| {
            can_use_cached_measurement(
                width_mode,
                available_width,
                height_mode,
                available_height,
                entry,
                margin_row,
                margin_column,
                scale,
            )
        };

        if compatible(&layout.cached_layout) {
            return Some(CacheSlot::Layout);
        }
        return filled.iter().position(compatible).map(CacheSlot::Measurement);
    }

    if perform_layout {
        return layout
            .cached_layout
            .matches_request(available_width, available_height, width_mode, height_mode)
            .then_some(CacheSlot::Layout);
    }

    filled
        .iter()
        .position(|entry| {
            entry.matches_request(available_width, available_height, width_mode, height_mode)
        })
        .map(CacheSlot::Measurement)
}
