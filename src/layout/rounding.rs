//! Snapping computed layouts to the physical pixel grid

use super::node::NodeId;
use super::tree::Tree;
use super::types::{Dimension, Edge, NodeType};
use super::value::{floats_equal, FloatOptional};

/// Round `value` to the nearest multiple of `1 / point_scale_factor`.
///
/// `force_ceil` and `force_floor` override round-half-up. NaN passes through.
pub fn round_value_to_pixel_grid(
    value: f32,
    point_scale_factor: f32,
    force_ceil: bool,
    force_floor: bool,
) -> f32 {
    let mut scaled = value * point_scale_factor;
    // fraction such that floor(scaled) == scaled - fraction, also for negatives
    let mut fraction = scaled % 1.0;
    if fraction < 0.0 {
        fraction += 1.0;
    }

    let fraction_opt = FloatOptional::new(fraction);
    if floats_equal(fraction_opt, FloatOptional::new(0.0)) {
        scaled -= fraction;
    } else if floats_equal(fraction_opt, FloatOptional::new(1.0)) {
        scaled = scaled - fraction + 1.0;
    } else if force_ceil {
        scaled = scaled - fraction + 1.0;
    } else if force_floor {
        scaled -= fraction;
    } else {
        let round_up = !fraction.is_nan()
            && (fraction > 0.5 || floats_equal(fraction_opt, FloatOptional::new(0.5)));
        scaled = scaled - fraction + if round_up { 1.0 } else { 0.0 };
    }

    if scaled.is_nan() || point_scale_factor.is_nan() {
        f32::NAN
    } else {
        scaled / point_scale_factor
    }
}

fn has_fraction(size: f32, point_scale_factor: f32) -> bool {
    let fraction = FloatOptional::new((size * point_scale_factor) % 1.0);
    !floats_equal(fraction, FloatOptional::new(0.0)) && !floats_equal(fraction, FloatOptional::new(1.0))
}

/// Round positions and sizes of a laid-out subtree.
///
/// Edges are rounded in absolute coordinates so adjacent siblings stay
/// flush. Text nodes round their size up rather than risk truncation.
pub(crate) fn round_to_pixel_grid(
    tree: &mut Tree,
    id: NodeId,
    point_scale_factor: f32,
    absolute_left: f32,
    absolute_top: f32,
) {
    if point_scale_factor == 0.0 {
        return;
    }
    let Some(node) = tree.nodes.get_mut(id) else {
        return;
    };

    let layout = &mut node.layout;
    let node_left = layout.position_at(Edge::Left);
    let node_top = layout.position_at(Edge::Top);
    let node_width = layout.dimensions[Dimension::Width.index()].unwrap_or(f32::NAN);
    let node_height = layout.dimensions[Dimension::Height.index()].unwrap_or(f32::NAN);

    let absolute_node_left = absolute_left + node_left;
    let absolute_node_top = absolute_top + node_top;
    let absolute_node_right = absolute_node_left + node_width;
    let absolute_node_bottom = absolute_node_top + node_height;

    let text_rounding = node.node_type == NodeType::Text;

    layout.set_position(
        Edge::Left,
        round_value_to_pixel_grid(node_left, point_scale_factor, false, text_rounding),
    );
    layout.set_position(
        Edge::Top,
        round_value_to_pixel_grid(node_top, point_scale_factor, false, text_rounding),
    );

    let fractional_width = has_fraction(node_width, point_scale_factor);
    let fractional_height = has_fraction(node_height, point_scale_factor);

    let width = round_value_to_pixel_grid(
        absolute_node_right,
        point_scale_factor,
        text_rounding && fractional_width,
        text_rounding && !fractional_width,
    ) - round_value_to_pixel_grid(absolute_node_left, point_scale_factor, false, text_rounding);
    let height = round_value_to_pixel_grid(
        absolute_node_bottom,
        point_scale_factor,
        text_rounding && fractional_height,
        text_rounding && !fractional_height,
    ) - round_value_to_pixel_grid(absolute_node_top, point_scale_factor, false, text_rounding);

    layout.dimensions = [FloatOptional::new(width), FloatOptional::new(height)];

    for child in node.children.clone() {
        round_to_pixel_grid(
            tree,
            child,
            point_scale_factor,
            absolute_node_left,
            absolute_node_top,
        );
    }
}
