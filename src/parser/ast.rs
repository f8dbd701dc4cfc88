//! Syntax tree of a layout fixture

use std::fmt;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// Valid identifier (alphanumeric, underscore or dash; starts with letter/_)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(pub String);

impl Identifier {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A parsed fixture: exactly one root node
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub root: Spanned<NodeDecl>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Plain container
    Container,
    /// Leaf measured from its text content
    Text(String),
}

/// `node name [props] { children }` or `text name "content" [props]`
#[derive(Debug, Clone, PartialEq)]
pub struct NodeDecl {
    pub kind: NodeKind,
    pub name: Option<Spanned<Identifier>>,
    pub properties: Vec<Spanned<Property>>,
    pub children: Vec<Spanned<NodeDecl>>,
}

impl NodeDecl {
    pub fn name(&self) -> Option<&str> {
        self.name.as_ref().map(|n| n.node.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub key: Spanned<Identifier>,
    pub value: Spanned<PropertyValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Number(f32),
    Percent(f32),
    Keyword(String),
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Number(n) => write!(f, "{}", n),
            PropertyValue::Percent(n) => write!(f, "{}%", n),
            PropertyValue::Keyword(k) => f.write_str(k),
        }
    }
}
