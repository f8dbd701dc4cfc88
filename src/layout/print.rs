//! Pseudo-HTML dump of a tree for debugging
//!
//! Each node becomes a `<div>` carrying its computed layout and the style
//! properties that differ from a fresh node. Children nest two spaces deeper.

use std::fmt::Write;

use super::error::LayoutError;
use super::node::{Node, NodeId};
use super::style::Style;
use super::tree::Tree;
use super::types::{Dimension, Edge, LogLevel, PrintOptions};
use super::value::{floats_equal, Edges, FloatOptional, Value};

const DEFAULT_STYLE: Style = Style::DEFAULT;

impl Tree {
    /// Render the subtree rooted at `id`
    pub fn to_string_with_options(
        &self,
        id: NodeId,
        options: PrintOptions,
    ) -> Result<String, LayoutError> {
        let mut out = String::new();
        self.write_node(&mut out, id, options, 0)?;
        Ok(out)
    }

    /// Send the rendered subtree to the node's logger at debug level
    pub fn print(&self, id: NodeId, options: PrintOptions) -> Result<(), LayoutError> {
        let dump = self.to_string_with_options(id, options)?;
        let node = self.node(id)?;
        node.config.log(Some(node), LogLevel::Debug, &dump);
        Ok(())
    }

    fn write_node(
        &self,
        out: &mut String,
        id: NodeId,
        options: PrintOptions,
        level: usize,
    ) -> Result<(), LayoutError> {
        let node = self.node(id)?;
        indent(out, level);
        out.push_str("<div ");

        if let Some(print) = &node.print {
            out.push_str(&print(node));
        }

        if options.layout {
            let layout = &node.layout;
            let _ = write!(
                out,
                "layout=\"width: {}; height: {}; top: {}; left: {};\" ",
                layout.dimensions[Dimension::Width.index()],
                layout.dimensions[Dimension::Height.index()],
                layout.top(),
                layout.left(),
            );
        }

        if options.style {
            out.push_str("style=\"");
            write_style(out, node);
            out.push_str("\" ");
        }

        if node.measure.is_some() {
            out.push_str("has-custom-measure=\"true\"");
        }
        out.push('>');

        if options.children && !node.children.is_empty() {
            for &child in &node.children {
                out.push('\n');
                self.write_node(out, child, options, level + 1)?;
            }
            out.push('\n');
            indent(out, level);
        }
        out.push_str("</div>");
        Ok(())
    }
}

fn indent(out: &mut String, level: usize) {
    for _ in 0..level {
        out.push_str("  ");
    }
}

fn write_style(out: &mut String, node: &Node) {
    let style = &node.style;

    macro_rules! keyword_if_changed {
        ($label:literal, $field:ident) => {
            if style.$field != DEFAULT_STYLE.$field {
                let _ = write!(out, concat!($label, ": {}; "), style.$field);
            }
        };
    }

    keyword_if_changed!("flex-direction", flex_direction);
    keyword_if_changed!("justify-content", justify_content);
    keyword_if_changed!("align-items", align_items);
    keyword_if_changed!("align-content", align_content);
    keyword_if_changed!("align-self", align_self);

    write_number(out, "flex-grow", style.flex_grow);
    write_number(out, "flex-shrink", style.flex_shrink);
    if !style.flex_basis.is_auto() {
        write_value(out, "flex-basis", style.flex_basis);
    }
    write_number(out, "flex", style.flex);

    keyword_if_changed!("flex-wrap", flex_wrap);
    keyword_if_changed!("overflow", overflow);
    keyword_if_changed!("display", display);

    write_edges(out, "margin", &style.margin);
    write_edges(out, "padding", &style.padding);
    write_edges(out, "border", &style.border);

    let sizes = [
        ("width", style.dimension(Dimension::Width)),
        ("height", style.dimension(Dimension::Height)),
        ("max-width", style.max_dimension(Dimension::Width)),
        ("max-height", style.max_dimension(Dimension::Height)),
        ("min-width", style.min_dimension(Dimension::Width)),
        ("min-height", style.min_dimension(Dimension::Height)),
    ];
    for (label, value) in sizes {
        if !value.is_auto() {
            write_value(out, label, value);
        }
    }

    keyword_if_changed!("position", position_type);
    for edge in [Edge::Left, Edge::Right, Edge::Top, Edge::Bottom] {
        write_value(out, edge.as_str(), style.position(edge));
    }
}

fn write_number(out: &mut String, label: &str, number: FloatOptional) {
    if let Some(number) = number.get() {
        let _ = write!(out, "{}: {}; ", label, number);
    }
}

fn write_value(out: &mut String, label: &str, value: Value) {
    if !value.is_undefined() {
        let _ = write!(out, "{}: {}; ", label, value);
    }
}

/// Collapse to a single property when the four physical edges are set and
/// agree; otherwise list every set edge, shorthands included
fn write_edges(out: &mut String, label: &str, edges: &Edges) {
    let physical = &edges[..4];
    if !physical[0].is_undefined() && physical.iter().all(|value| *value == physical[0]) {
        write_value_if_not_zero(out, label, edges[Edge::Left.index()]);
        return;
    }
    for &edge in Edge::ALL {
        let name = format!("{}-{}", label, edge.as_str());
        write_value_if_not_zero(out, &name, edges[edge.index()]);
    }
}

fn write_value_if_not_zero(out: &mut String, label: &str, value: Value) {
    if !floats_equal(value.magnitude(), FloatOptional::new(0.0)) {
        write_value(out, label, value);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::layout::types::{Direction, FlexDirection, Justify};

    #[test]
    fn test_fresh_node_prints_empty_style() {
        let mut tree = Tree::new();
        let root = tree.new_node();
        let dump = tree
            .to_string_with_options(
                root,
                PrintOptions {
                    layout: false,
                    style: true,
                    children: true,
                },
            )
            .unwrap();
        assert_eq!(dump, "<div style=\"\" ></div>");
    }

    #[test]
    fn test_only_changed_properties_are_printed() {
        let mut tree = Tree::new();
        let root = tree.new_node();
        tree.set_flex_direction(root, FlexDirection::Row).unwrap();
        tree.set_justify_content(root, Justify::Center).unwrap();
        tree.set_flex_grow(root, 1.0).unwrap();
        tree.set_width(root, Value::point(100.0)).unwrap();
        tree.set_height(root, Value::percent(50.0)).unwrap();
        tree.set_margin(root, Edge::Top, Value::point(4.0)).unwrap();
        tree.set_padding(root, Edge::Left, Value::point(2.0)).unwrap();

        let dump = tree
            .to_string_with_options(
                root,
                PrintOptions {
                    layout: false,
                    style: true,
                    children: false,
                },
            )
            .unwrap();
        assert_eq!(
            dump,
            "<div style=\"flex-direction: row; justify-content: center; flex-grow: 1; \
             margin-top: 4px; padding-left: 2px; width: 100px; height: 50%; \" ></div>"
        );
    }

    #[test]
    fn test_equal_physical_edges_collapse() {
        let mut tree = Tree::new();
        let root = tree.new_node();
        for edge in [Edge::Left, Edge::Top, Edge::Right, Edge::Bottom] {
            tree.set_border(root, edge, 3.0).unwrap();
        }
        let dump = tree
            .to_string_with_options(
                root,
                PrintOptions {
                    layout: false,
                    style: true,
                    children: false,
                },
            )
            .unwrap();
        assert_eq!(dump, "<div style=\"border: 3px; \" ></div>");
    }

    #[test]
    fn test_children_are_indented() {
        let mut tree = Tree::new();
        let root = tree.new_node();
        tree.set_width(root, Value::point(10.0)).unwrap();
        tree.set_height(root, Value::point(20.0)).unwrap();
        let child = tree.new_node();
        tree.set_height(child, Value::point(5.0)).unwrap();
        tree.add_child(root, child).unwrap();
        tree.calculate_layout(root, FloatOptional::UNDEFINED, FloatOptional::UNDEFINED, Direction::Ltr)
            .unwrap();

        let dump = tree
            .to_string_with_options(
                root,
                PrintOptions {
                    layout: true,
                    style: false,
                    children: true,
                },
            )
            .unwrap();
        assert_eq!(
            dump,
            "<div layout=\"width: 10; height: 20; top: 0; left: 0;\" >\n  \
             <div layout=\"width: 10; height: 5; top: 0; left: 0;\" ></div>\n</div>"
        );
    }

    #[test]
    fn test_measured_leaf_is_flagged() {
        let mut tree = Tree::new();
        let leaf = tree.new_node();
        tree.set_measure_func(leaf, |_, _, _, _, _| crate::layout::types::Size::new(1.0, 1.0))
            .unwrap();
        tree.set_print_func(leaf, |_| "data-id=\"leaf\" ".to_string()).unwrap();
        let dump = tree
            .to_string_with_options(
                leaf,
                PrintOptions {
                    layout: false,
                    style: false,
                    children: false,
                },
            )
            .unwrap();
        assert_eq!(dump, "<div data-id=\"leaf\" has-custom-measure=\"true\"></div>");
    }
}
