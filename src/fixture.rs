//! Building node trees from parsed fixtures
//!
//! Every `node` becomes a container and every `text` a leaf whose measure
//! function lays its characters out on a monospace grid. Properties use the
//! CSS names of the style they set.

use std::collections::HashMap;
use std::str::FromStr;

use crate::error::BuildError;
use crate::layout::{
    Config, Edge, FloatOptional, MeasureMode, Node, NodeId, Size, Style, Tree,
    UnknownKeyword, Value,
};
use crate::parser::{Document, NodeDecl, NodeKind, Property, PropertyValue, Spanned};

/// Advance of one character of fixture text
pub const CHAR_WIDTH: f32 = 10.0;
/// Height of one line of fixture text
pub const LINE_HEIGHT: f32 = 10.0;

/// A tree built from a fixture together with the names given to its nodes
pub struct Fixture {
    pub tree: Tree,
    pub root: NodeId,
    names: Vec<(String, NodeId)>,
}

impl Fixture {
    /// Look a node up by the name it was declared with
    pub fn node(&self, name: &str) -> Option<NodeId> {
        self.names
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, id)| *id)
    }

    /// Named nodes in document order
    pub fn named_nodes(&self) -> impl Iterator<Item = (&str, NodeId)> + '_ {
        self.names.iter().map(|(name, id)| (name.as_str(), *id))
    }
}

/// Create a tree for `doc` whose nodes share `config`
pub fn build(doc: &Document, config: Config) -> Result<Fixture, BuildError> {
    let mut builder = Builder {
        tree: Tree::with_config(config),
        names: Vec::new(),
        seen: HashMap::new(),
    };
    let root = builder.build_node(&doc.root)?;
    Ok(Fixture {
        tree: builder.tree,
        root,
        names: builder.names,
    })
}

struct Builder {
    tree: Tree,
    names: Vec<(String, NodeId)>,
    seen: HashMap<String, NodeId>,
}

impl Builder {
    fn build_node(&mut self, decl: &Spanned<NodeDecl>) -> Result<NodeId, BuildError> {
        let id = self.tree.new_node();

        if let Some(name) = &decl.node.name {
            let name_str = name.node.as_str().to_string();
            if self.seen.insert(name_str.clone(), id).is_some() {
                return Err(BuildError::DuplicateName {
                    name: name_str,
                    span: name.span.clone(),
                });
            }
            self.names.push((name_str, id));
        }

        let mut style = self.tree.style(id)?.clone();
        for property in &decl.node.properties {
            if property.node.key.node.as_str() == "reference-baseline" {
                let enabled = flag(&property.node)?;
                self.tree.set_is_reference_baseline(id, enabled)?;
                continue;
            }
            apply_property(&mut style, &property.node)?;
        }
        self.tree.set_style(id, style)?;

        match &decl.node.kind {
            NodeKind::Container => {
                for child in &decl.node.children {
                    let child_id = self.build_node(child)?;
                    self.tree.add_child(id, child_id)?;
                }
            }
            NodeKind::Text(content) => {
                self.tree.set_measure_func(id, text_measure(content))?;
            }
        }

        Ok(id)
    }
}

/// Measure function for a run of monospace text that wraps at the
/// available width.
pub fn text_measure(
    content: &str,
) -> impl Fn(&Node, FloatOptional, MeasureMode, FloatOptional, MeasureMode) -> Size + 'static {
    let chars = content.chars().count() as f32;
    move |_, width, width_mode, height, height_mode| {
        let natural_width = chars * CHAR_WIDTH;
        let measured_width = match (width_mode, width.get()) {
            (MeasureMode::Exactly, Some(w)) => w,
            (MeasureMode::AtMost, Some(w)) => natural_width.min(w),
            _ => natural_width,
        };

        let per_line = (measured_width / CHAR_WIDTH).floor().max(1.0);
        let lines = (chars / per_line).ceil();
        let natural_height = lines * LINE_HEIGHT;
        let measured_height = match (height_mode, height.get()) {
            (MeasureMode::Exactly, Some(h)) => h,
            (MeasureMode::AtMost, Some(h)) => natural_height.min(h),
            _ => natural_height,
        };

        Size::new(measured_width, measured_height)
    }
}

/// Apply one fixture property to `style`
pub fn apply_property(style: &mut Style, property: &Property) -> Result<(), BuildError> {
    let key = property.key.node.as_str();
    match key {
        "direction" => style.direction = keyword(property)?,
        "flex-direction" => style.flex_direction = keyword(property)?,
        "justify-content" => style.justify_content = keyword(property)?,
        "align-items" => style.align_items = keyword(property)?,
        "align-self" => style.align_self = keyword(property)?,
        "align-content" => style.align_content = keyword(property)?,
        "flex-wrap" => style.flex_wrap = keyword(property)?,
        "overflow" => style.overflow = keyword(property)?,
        "display" => style.display = keyword(property)?,
        "position" => style.position_type = keyword(property)?,
        "flex" => style.flex = FloatOptional::new(number(property)?),
        "flex-grow" => style.flex_grow = FloatOptional::new(number(property)?),
        "flex-shrink" => style.flex_shrink = FloatOptional::new(number(property)?),
        "aspect-ratio" => style.aspect_ratio = FloatOptional::new(number(property)?),
        "flex-basis" => style.flex_basis = length(property, true)?,
        "width" => style.dimensions[0] = length(property, true)?,
        "height" => style.dimensions[1] = length(property, true)?,
        "min-width" => style.min_dimensions[0] = length(property, false)?,
        "min-height" => style.min_dimensions[1] = length(property, false)?,
        "max-width" => style.max_dimensions[0] = length(property, false)?,
        "max-height" => style.max_dimensions[1] = length(property, false)?,
        _ => return apply_edge_property(style, property),
    }
    Ok(())
}

/// `margin`, `padding`, `border` with an optional `-edge` suffix, and the
/// inset properties named after an edge
fn apply_edge_property(style: &mut Style, property: &Property) -> Result<(), BuildError> {
    let key = property.key.node.as_str();

    if let Ok(edge) = Edge::from_str(key) {
        style.position[edge.index()] = length(property, false)?;
        return Ok(());
    }

    let (group, edge) = match key.split_once('-') {
        Some((group, suffix)) => match Edge::from_str(suffix) {
            Ok(edge) => (group, edge),
            Err(_) => return Err(unknown(property)),
        },
        None => (key, Edge::All),
    };

    match group {
        "margin" => style.margin[edge.index()] = length(property, true)?,
        "padding" => style.padding[edge.index()] = length(property, false)?,
        "border" => style.border[edge.index()] = Value::point(number(property)?),
        _ => return Err(unknown(property)),
    }
    Ok(())
}

fn unknown(property: &Property) -> BuildError {
    BuildError::UnknownProperty {
        name: property.key.node.to_string(),
        span: property.key.span.clone(),
    }
}

fn invalid(property: &Property, expected: impl Into<String>) -> BuildError {
    BuildError::InvalidValue {
        property: property.key.node.to_string(),
        value: property.value.node.to_string(),
        expected: expected.into(),
        span: property.value.span.clone(),
    }
}

fn keyword<T>(property: &Property) -> Result<T, BuildError>
where
    T: FromStr<Err = UnknownKeyword>,
{
    match &property.value.node {
        PropertyValue::Keyword(word) => {
            T::from_str(word).map_err(|err| invalid(property, format!("a {}", err.kind)))
        }
        _ => Err(invalid(property, "a keyword")),
    }
}

fn number(property: &Property) -> Result<f32, BuildError> {
    match property.value.node {
        PropertyValue::Number(n) => Ok(n),
        _ => Err(invalid(property, "a number")),
    }
}

fn flag(property: &Property) -> Result<bool, BuildError> {
    match &property.value.node {
        PropertyValue::Keyword(word) if word == "true" => Ok(true),
        PropertyValue::Keyword(word) if word == "false" => Ok(false),
        _ => Err(invalid(property, "true or false")),
    }
}

fn length(property: &Property, allow_auto: bool) -> Result<Value, BuildError> {
    match &property.value.node {
        PropertyValue::Number(n) => Ok(Value::point(*n)),
        PropertyValue::Percent(n) => Ok(Value::percent(*n)),
        PropertyValue::Keyword(word) if word == "auto" && allow_auto => Ok(Value::Auto),
        PropertyValue::Keyword(word) if word == "undefined" => Ok(Value::Undefined),
        _ if allow_auto => Err(invalid(property, "a length, a percentage or auto")),
        _ => Err(invalid(property, "a length or a percentage")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Align, FlexDirection, PositionType};
    use crate::parser::parse;

    fn fixture(source: &str) -> Fixture {
        build(&parse(source).unwrap(), Config::default()).unwrap()
    }

    #[test]
    fn test_properties_reach_the_style() {
        let f = fixture(
            "node root [flex-direction: row, align-items: center, width: 50%, margin: auto, \
             padding-left: 4, border-top: 2, left: 3, position: absolute, flex-grow: 2]",
        );
        let style = f.tree.style(f.root).unwrap();
        assert_eq!(style.flex_direction, FlexDirection::Row);
        assert_eq!(style.align_items, Align::Center);
        assert_eq!(style.dimensions[0], Value::percent(50.0));
        assert_eq!(style.margin(Edge::All), Value::Auto);
        assert_eq!(style.padding(Edge::Left), Value::point(4.0));
        assert_eq!(style.border(Edge::Top), Value::point(2.0));
        assert_eq!(style.position(Edge::Left), Value::point(3.0));
        assert_eq!(style.position_type, PositionType::Absolute);
        assert_eq!(style.flex_grow.get(), Some(2.0));
    }

    #[test]
    fn test_children_and_names() {
        let f = fixture("node root { node a node b { text c \"hi\" } }");
        let a = f.node("a").unwrap();
        let b = f.node("b").unwrap();
        let c = f.node("c").unwrap();
        assert_eq!(f.tree.children(f.root).unwrap(), &[a, b]);
        assert_eq!(f.tree.owner(c).unwrap(), Some(b));
        assert!(f.tree.node(c).unwrap().has_measure_func());
        let names: Vec<_> = f.named_nodes().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["root", "a", "b", "c"]);
    }

    #[test]
    fn test_unknown_property_is_reported_with_span() {
        let source = "node [colour: red]";
        let err = build(&parse(source).unwrap(), Config::default()).err().unwrap();
        assert!(matches!(err, BuildError::UnknownProperty { ref name, .. } if name == "colour"));
        assert_eq!(err.span(), Some(6..12));
    }

    #[test]
    fn test_bad_keyword_names_the_kind() {
        let err = build(&parse("node [flex-direction: sideways]").unwrap(), Config::default())
            .err()
            .unwrap();
        assert!(err.to_string().contains("expected a flex direction"));
    }

    #[test]
    fn test_auto_is_not_a_padding() {
        let err = build(&parse("node [padding: auto]").unwrap(), Config::default())
            .err()
            .unwrap();
        assert!(matches!(err, BuildError::InvalidValue { .. }));
    }

    #[test]
    fn test_duplicate_names_are_rejected() {
        let err = build(&parse("node a { node a }").unwrap(), Config::default())
            .err()
            .unwrap();
        assert!(matches!(err, BuildError::DuplicateName { .. }));
    }

    #[test]
    fn test_text_wraps_at_available_width() {
        let measure = text_measure("hello world");
        let node = Node::new(std::rc::Rc::new(Config::default()));
        let size = measure(
            &node,
            FloatOptional::new(50.0),
            MeasureMode::AtMost,
            FloatOptional::UNDEFINED,
            MeasureMode::Undefined,
        );
        assert_eq!(size, Size::new(50.0, 30.0));

        let size = measure(
            &node,
            FloatOptional::UNDEFINED,
            MeasureMode::Undefined,
            FloatOptional::UNDEFINED,
            MeasureMode::Undefined,
        );
        assert_eq!(size, Size::new(110.0, 10.0));
    }
}
