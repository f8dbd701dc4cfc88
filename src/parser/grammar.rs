//! Parser implementation using chumsky

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::parser::ast::*;
use crate::parser::lexer::Token;

/// Parse fixture source into a [`Document`]
pub fn parse(input: &str) -> Result<Document, Vec<crate::ParseError>> {
    let len = input.len();

    let token_iter = crate::parser::lexer::lex(input).map(|(tok, span)| (tok, span.into()));

    // Turn the token iterator into a stream that chumsky can use
    let token_stream = Stream::from_iter(token_iter)
        .map((len..len).into(), |(t, s): (_, _)| (t, s));

    document_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| errs.into_iter().map(|e| e.into()).collect())
}

/// Helper to extract span range from chumsky's MapExtra
fn span_range(e: &impl chumsky::span::Span<Offset = usize>) -> std::ops::Range<usize> {
    e.start()..e.end()
}

fn document_parser<'a, I>() -> impl Parser<'a, I, Document, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    let identifier = select! {
        Token::Ident(s) => Identifier::new(s),
    }
    .map_with(|id, e| Spanned::new(id, span_range(&e.span())));

    let string_literal = select! {
        Token::String(s) => s,
    };

    let number = just(Token::Minus)
        .or_not()
        .then(select! { Token::Number(n) => n })
        .map(|(neg, n)| if neg.is_some() { -n } else { n });

    let value = choice((
        number
            .then(just(Token::Percent).or_not())
            .map(|(n, percent)| {
                if percent.is_some() {
                    PropertyValue::Percent(n)
                } else {
                    PropertyValue::Number(n)
                }
            }),
        select! { Token::Ident(s) => PropertyValue::Keyword(s) },
        // `text` is a node keyword but also a valid keyword value
        just(Token::Text).to(PropertyValue::Keyword("text".to_string())),
    ))
    .map_with(|v, e| Spanned::new(v, span_range(&e.span())))
    .labelled("property value");

    let property = identifier
        .clone()
        .then_ignore(just(Token::Colon))
        .then(value)
        .map_with(|(key, value), e| Spanned::new(Property { key, value }, span_range(&e.span())));

    let property_block = property
        .separated_by(just(Token::Comma))
        .allow_trailing()
        .collect::<Vec<_>>()
        .delimited_by(just(Token::BracketOpen), just(Token::BracketClose));

    let node = recursive(|node| {
        let container = just(Token::Node)
            .ignore_then(identifier.clone().or_not())
            .then(property_block.clone().or_not())
            .then(
                node.repeated()
                    .collect::<Vec<_>>()
                    .delimited_by(just(Token::BraceOpen), just(Token::BraceClose))
                    .or_not(),
            )
            .map(|((name, properties), children)| NodeDecl {
                kind: NodeKind::Container,
                name,
                properties: properties.unwrap_or_default(),
                children: children.unwrap_or_default(),
            });

        let text = just(Token::Text)
            .ignore_then(identifier.clone().or_not())
            .then(string_literal)
            .then(property_block.clone().or_not())
            .map(|((name, content), properties)| NodeDecl {
                kind: NodeKind::Text(content),
                name,
                properties: properties.unwrap_or_default(),
                children: Vec::new(),
            });

        choice((container, text)).map_with(|decl, e| Spanned::new(decl, span_range(&e.span())))
    });

    node.then_ignore(end()).map(|root| Document { root })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_node() {
        let doc = parse("node").unwrap();
        assert_eq!(doc.root.node.kind, NodeKind::Container);
        assert!(doc.root.node.name.is_none());
        assert!(doc.root.node.children.is_empty());
    }

    #[test]
    fn test_parse_properties() {
        let doc = parse("node root [width: 100, height: 50%, flex-direction: row,]").unwrap();
        let props: Vec<_> = doc
            .root
            .node
            .properties
            .iter()
            .map(|p| (p.node.key.node.as_str().to_string(), p.node.value.node.clone()))
            .collect();
        assert_eq!(
            props,
            vec![
                ("width".to_string(), PropertyValue::Number(100.0)),
                ("height".to_string(), PropertyValue::Percent(50.0)),
                ("flex-direction".to_string(), PropertyValue::Keyword("row".to_string())),
            ]
        );
    }

    #[test]
    fn test_parse_negative_number() {
        let doc = parse("node [margin-left: -5]").unwrap();
        assert_eq!(
            doc.root.node.properties[0].node.value.node,
            PropertyValue::Number(-5.0)
        );
    }

    #[test]
    fn test_parse_nested_children() {
        let doc = parse(
            r#"
            node root [width: 100] {
                node a [flex-grow: 1] {
                    text label "hi"
                }
                node b
            }
            "#,
        )
        .unwrap();
        let root = &doc.root.node;
        assert_eq!(root.name(), Some("root"));
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0].node.children.len(), 1);
        assert_eq!(
            root.children[0].node.children[0].node.kind,
            NodeKind::Text("hi".to_string())
        );
        assert_eq!(root.children[1].node.name(), Some("b"));
    }

    #[test]
    fn test_parse_span_covers_node() {
        let source = "node a [width: 1]";
        let doc = parse(source).unwrap();
        assert_eq!(doc.root.span, 0..source.len());
    }

    #[test]
    fn test_second_root_is_rejected() {
        assert!(parse("node a node b").is_err());
    }

    #[test]
    fn test_missing_colon_is_rejected() {
        let errors = parse("node [width 100]").unwrap_err();
        assert!(!errors.is_empty());
    }
}
