//! Properties every layout pass must uphold

use std::cell::Cell;
use std::rc::Rc;

use pretty_assertions::assert_eq;

use flex_layout::layout::{
    Direction, Edge, FloatOptional, FlexDirection, Justify, LayoutError, Size, Tree, Value,
};
use flex_layout::{lay_out, NodeId, Settings};

fn viewport(width: f32, height: f32) -> Settings {
    Settings {
        width: Some(width),
        height: Some(height),
        ..Settings::default()
    }
}

fn boxes(tree: &Tree, ids: &[NodeId]) -> Vec<(f32, f32, f32, f32)> {
    ids.iter()
        .map(|&id| {
            let layout = tree.layout(id).unwrap();
            (
                layout.left(),
                layout.top(),
                layout.width().unwrap_or(f32::NAN),
                layout.height().unwrap_or(f32::NAN),
            )
        })
        .collect()
}

fn named(source: &str, settings: &Settings, names: &[&str]) -> Vec<(f32, f32, f32, f32)> {
    let laid_out = lay_out(source, settings).unwrap();
    let fixture = &laid_out.fixture;
    let ids: Vec<_> = names.iter().map(|n| fixture.node(n).unwrap()).collect();
    boxes(&fixture.tree, &ids)
}

const MIXED: &str = r#"
node root [flex-direction: row, flex-wrap: wrap, padding: 7, align-content: space-between] {
    node a [flex-grow: 1, min-width: 40, height: 33]
    node b [flex-basis: 30%, margin: auto, height: 12]
    text c "the quick brown fox" [flex-shrink: 1]
    node d [position: absolute, right: 5, bottom: 3, width: 20, aspect-ratio: 2]
    node e [width: 120, height: 20, align-self: center] {
        node f [flex-grow: 1, border: 1, padding: 10%]
    }
}
"#;

#[test]
fn test_relayout_is_bit_identical() {
    let mut laid_out = lay_out(MIXED, &viewport(233.0, 171.0)).unwrap();
    let fixture = &mut laid_out.fixture;
    let ids: Vec<_> = fixture.named_nodes().map(|(_, id)| id).collect();
    let first = boxes(&fixture.tree, &ids);

    fixture
        .tree
        .mark_dirty_and_propagate_to_descendants(fixture.root)
        .unwrap();
    fixture
        .tree
        .calculate_layout(fixture.root, 233.0, 171.0, Direction::Ltr)
        .unwrap();
    let second = boxes(&fixture.tree, &ids);

    assert_eq!(first, second);
}

#[test]
fn test_unchanged_tree_reuses_measurements() {
    let calls = Rc::new(Cell::new(0));
    let mut tree = Tree::new();
    let root = tree.new_node();
    tree.set_flex_direction(root, FlexDirection::Row).unwrap();
    let leaf = tree.new_node();
    let counter = calls.clone();
    tree.set_measure_func(leaf, move |_, width, _, _, _| {
        counter.set(counter.get() + 1);
        Size::new(width.unwrap_or(40.0).min(40.0), 10.0)
    })
    .unwrap();
    tree.add_child(root, leaf).unwrap();

    tree.calculate_layout(root, 200.0, 100.0, Direction::Ltr).unwrap();
    let after_first = calls.get();
    assert!(after_first > 0);

    let stats = tree.calculate_layout(root, 200.0, 100.0, Direction::Ltr).unwrap();
    assert_eq!(calls.get(), after_first);
    assert_eq!(stats.measure_callbacks, 0);
    assert_eq!(stats.cached_layouts, 1);
}

#[test]
fn test_equal_min_and_max_pin_the_size() {
    let grown = named(
        "node root [flex-direction: row] { node a [flex-grow: 1, min-width: 80, max-width: 80] \
         node b [flex-grow: 1] }",
        &viewport(300.0, 50.0),
        &["a", "b"],
    );
    assert_eq!(grown, vec![(0.0, 0.0, 80.0, 50.0), (80.0, 0.0, 220.0, 50.0)]);

    let shrunk = named(
        "node root [flex-direction: row] { node a [flex-basis: 100, flex-shrink: 5, \
         min-width: 80, max-width: 80] }",
        &viewport(40.0, 50.0),
        &["a"],
    );
    assert_eq!(shrunk[0].2, 80.0);
}

#[test]
fn test_undefined_propagates() {
    assert!(Value::Undefined.resolve(FloatOptional::new(100.0)).is_undefined());
    assert!(Value::percent(50.0).resolve(FloatOptional::UNDEFINED).is_undefined());
    assert!((FloatOptional::UNDEFINED + 5.0).is_undefined());
    assert!((FloatOptional::new(5.0) - FloatOptional::UNDEFINED).is_undefined());
    assert!(FloatOptional::new(f32::NAN).is_undefined());

    // A percentage of an unsized owner leaves the child content sized
    let sized = named(
        "node root { node a [width: 50%, height: 10] }",
        &Settings::default(),
        &["a"],
    );
    assert_eq!(sized, vec![(0.0, 0.0, 0.0, 10.0)]);
}

#[test]
fn test_grow_fills_the_line() {
    let sizes = named(
        "node root [flex-direction: row] { node a [flex-basis: 50, flex-grow: 1] \
         node b [flex-basis: 30, flex-grow: 2] node c [flex-basis: 20, flex-grow: 1] }",
        &viewport(300.0, 10.0),
        &["a", "b", "c"],
    );
    let widths: Vec<_> = sizes.iter().map(|b| b.2).collect();
    assert_eq!(widths, vec![100.0, 130.0, 70.0]);
    assert_eq!(widths.iter().sum::<f32>(), 300.0);
}

#[test]
fn test_grow_respects_max_and_conserves_space() {
    let sizes = named(
        "node root [flex-direction: row] { node a [flex-basis: 50, flex-grow: 1] \
         node b [flex-basis: 30, flex-grow: 2, max-width: 100] node c [flex-basis: 20, flex-grow: 1] }",
        &viewport(300.0, 10.0),
        &["a", "b", "c"],
    );
    let widths: Vec<_> = sizes.iter().map(|b| b.2).collect();
    assert_eq!(widths, vec![115.0, 100.0, 85.0]);
    assert_eq!(widths.iter().sum::<f32>(), 300.0);
}

#[test]
fn test_cascading_freezes_stay_under_the_iteration_ceiling() {
    let mut tree = Tree::new();
    let root = tree.new_node();
    tree.set_flex_direction(root, FlexDirection::Row).unwrap();
    let mut children = Vec::new();
    for max in [Some(10.0), Some(50.0), Some(100.0), None] {
        let child = tree.new_node();
        tree.set_flex_grow(child, 1.0).unwrap();
        tree.set_flex_basis(child, Value::point(0.0)).unwrap();
        if let Some(max) = max {
            tree.set_max_width(child, Value::point(max)).unwrap();
        }
        tree.add_child(root, child).unwrap();
        children.push(child);
    }

    let stats = tree.calculate_layout(root, 400.0, 10.0, Direction::Ltr).unwrap();
    let widths: Vec<_> = boxes(&tree, &children).iter().map(|b| b.2).collect();
    assert_eq!(widths, vec![10.0, 50.0, 100.0, 240.0]);
    assert!(stats.max_flex_iterations >= 2);
    assert!(stats.max_flex_iterations <= children.len() + 1);
}

#[test]
fn test_space_between_positions() {
    let mut tree = Tree::new();
    let root = tree.new_node();
    tree.set_flex_direction(root, FlexDirection::Row).unwrap();
    tree.set_justify_content(root, Justify::SpaceBetween).unwrap();
    tree.set_width(root, Value::point(300.0)).unwrap();
    let mut children = Vec::new();
    for _ in 0..3 {
        let child = tree.new_node();
        tree.set_width(child, Value::point(50.0)).unwrap();
        tree.set_flex_shrink(child, 0.0).unwrap();
        tree.add_child(root, child).unwrap();
        children.push(child);
    }
    tree.calculate_layout(root, f32::NAN, f32::NAN, Direction::Ltr)
        .unwrap();

    let lefts: Vec<_> = boxes(&tree, &children).iter().map(|b| b.0).collect();
    assert_eq!(lefts, vec![0.0, 125.0, 250.0]);
}

#[test]
fn test_specific_edges_beat_axis_which_beats_all() {
    let laid_out = lay_out(
        "node root [flex-direction: row] { node a [margin-horizontal: 10, margin: 20, \
         width: 10, height: 10] }",
        &viewport(100.0, 100.0),
    )
    .unwrap();
    let fixture = &laid_out.fixture;
    let layout = fixture.tree.layout(fixture.node("a").unwrap()).unwrap();
    assert_eq!(layout.margin(Edge::Left), Some(10.0));
    assert_eq!(layout.margin(Edge::Top), Some(20.0));
    assert_eq!(layout.left(), 10.0);
    assert_eq!(layout.top(), 20.0);
}

#[test]
fn test_writing_through_a_clone_copies_the_shared_child() {
    let mut tree = Tree::new();
    let a = tree.new_node();
    let c1 = tree.new_node();
    let c2 = tree.new_node();
    tree.set_children(a, &[c1, c2]).unwrap();

    let a_prime = tree.clone_node(a).unwrap();
    assert_eq!(tree.children(a_prime).unwrap()[0], c1);
    assert_eq!(tree.owner(c1).unwrap(), Some(a));

    let c1_prime = tree
        .update_child_style(a_prime, 0, |style| style.flex_grow = FloatOptional::new(1.0))
        .unwrap();
    assert_ne!(c1_prime, c1);
    assert_eq!(tree.owner(c1_prime).unwrap(), Some(a_prime));
    assert_eq!(tree.children(a).unwrap()[0], c1);
    assert!(tree.style(c1).unwrap().flex_grow.is_undefined());
    assert_eq!(tree.style(c1_prime).unwrap().flex_grow.get(), Some(1.0));
}

#[test]
fn test_direct_write_to_a_shared_child_is_refused() {
    let mut tree = Tree::new();
    let a = tree.new_node();
    let c1 = tree.new_node();
    let c2 = tree.new_node();
    tree.set_children(a, &[c1, c2]).unwrap();
    let a_prime = tree.clone_node(a).unwrap();

    let shared = tree.children(a_prime).unwrap()[0];
    let err = tree.set_width(shared, Value::point(77.0)).unwrap_err();
    assert_eq!(err, LayoutError::SharedNode { id: c1 });
    assert_eq!(tree.width(c1).unwrap(), Value::Auto);

    tree.calculate_layout(a, 100.0, 100.0, Direction::Ltr).unwrap();
    assert_eq!(tree.layout(c1).unwrap().width(), 100.0);
}

#[test]
fn test_percent_basis_follows_the_owner_across_layouts() {
    let mut tree = Tree::new();
    let root = tree.new_node();
    tree.set_flex_direction(root, FlexDirection::Row).unwrap();
    let child = tree.new_node();
    tree.set_flex_basis(child, Value::percent(50.0)).unwrap();
    tree.add_child(root, child).unwrap();

    tree.calculate_layout(root, 200.0, 50.0, Direction::Ltr).unwrap();
    assert_eq!(tree.layout(child).unwrap().width(), 100.0);

    tree.calculate_layout(root, 400.0, 50.0, Direction::Ltr).unwrap();
    assert_eq!(tree.layout(child).unwrap().width(), 200.0);

    tree.calculate_layout(root, 200.0, 50.0, Direction::Ltr).unwrap();
    assert_eq!(tree.layout(child).unwrap().width(), 100.0);
}

#[test]
fn test_marking_dirty_twice_is_idempotent() {
    let leaf_calls = Rc::new(Cell::new(0));
    let root_calls = Rc::new(Cell::new(0));

    let mut tree = Tree::new();
    let root = tree.new_node();
    let leaf = tree.new_node();
    tree.set_measure_func(leaf, |_, _, _, _, _| Size::new(10.0, 10.0))
        .unwrap();
    tree.add_child(root, leaf).unwrap();
    tree.calculate_layout(root, 100.0, 100.0, Direction::Ltr).unwrap();
    assert!(!tree.is_dirty(root).unwrap());

    let counter = leaf_calls.clone();
    tree.set_dirtied_func(leaf, move |_| counter.set(counter.get() + 1))
        .unwrap();
    let counter = root_calls.clone();
    tree.set_dirtied_func(root, move |_| counter.set(counter.get() + 1))
        .unwrap();

    tree.mark_dirty(leaf).unwrap();
    tree.mark_dirty(leaf).unwrap();

    assert_eq!(leaf_calls.get(), 1);
    assert_eq!(root_calls.get(), 1);
    assert!(tree.is_dirty(root).unwrap());
}

#[test]
fn test_measure_func_rejects_children() {
    let mut tree = Tree::new();
    let root = tree.new_node();
    let child = tree.new_node();
    tree.add_child(root, child).unwrap();
    assert!(tree
        .set_measure_func(root, |_, _, _, _, _| Size::default())
        .is_err());

    let leaf = tree.new_node();
    tree.set_measure_func(leaf, |_, _, _, _, _| Size::default())
        .unwrap();
    let other = tree.new_node();
    assert!(tree.add_child(leaf, other).is_err());
}
