//! Flex Layout - a flexbox layout engine with a fixture language
//!
//! The [`layout`] module holds the engine: a node tree with CSS flexbox
//! styles and a solver that computes each node's position and size. The
//! fixture language describes such a tree in text so layouts can be
//! computed from the command line and checked in tests.
//!
//! # Example
//!
//! ```rust
//! use flex_layout::{run, Settings};
//!
//! let settings = Settings { width: Some(100.0), height: Some(100.0), ..Settings::default() };
//! let report = run("node root [flex-direction: row] { node a [flex-grow: 1] node b [width: 30] }", &settings).unwrap();
//! assert!(report.contains("a: left 0, top 0, width 70, height 100"));
//! ```

pub mod error;
pub mod fixture;
pub mod layout;
pub mod parser;
pub mod settings;

use std::fmt::Write;

pub use error::{BuildError, ParseError};
pub use fixture::{build, Fixture};
pub use layout::{Config, LayoutError, LayoutStats, NodeId, PrintOptions, Tree};
pub use parser::{parse, Document};
pub use settings::{Settings, SettingsError};

use thiserror::Error;

/// Errors that can occur anywhere in the fixture pipeline
#[derive(Debug, Error)]
pub enum RunError {
    #[error("parse errors: {}", format_parse_errors(.0))]
    Parse(Vec<ParseError>),

    #[error("build error: {0}")]
    Build(#[from] BuildError),

    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),
}

impl From<Vec<ParseError>> for RunError {
    fn from(errors: Vec<ParseError>) -> Self {
        RunError::Parse(errors)
    }
}

impl RunError {
    /// Render with source context where the error points into the fixture
    pub fn format(&self, source: &str, filename: &str) -> String {
        match self {
            RunError::Parse(errors) => errors
                .iter()
                .map(|e| e.format(source, filename))
                .collect::<Vec<_>>()
                .join("\n"),
            RunError::Build(err) => err.format(source, filename),
            other => other.to_string(),
        }
    }
}

fn format_parse_errors(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// How a laid-out fixture is reported
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// One line per named node
    #[default]
    Table,
    /// The pseudo-HTML tree dump
    Tree,
}

/// A fixture after layout, with the counters of the pass that produced it
pub struct LaidOut {
    pub fixture: Fixture,
    pub stats: LayoutStats,
}

/// Parse, build and lay out a fixture
pub fn lay_out(source: &str, settings: &Settings) -> Result<LaidOut, RunError> {
    let doc = parse(source)?;
    let mut fixture = build(&doc, settings.config()?)?;
    let stats = fixture.tree.calculate_layout(
        fixture.root,
        settings.owner_width(),
        settings.owner_height(),
        settings.direction,
    )?;
    tracing::debug!(
        nodes = fixture.tree.len(),
        layouts = stats.layouts,
        measures = stats.measures,
        cached_layouts = stats.cached_layouts,
        cached_measures = stats.cached_measures,
        "laid out fixture"
    );
    Ok(LaidOut { fixture, stats })
}

/// Lay out a fixture and report named nodes as a table
pub fn run(source: &str, settings: &Settings) -> Result<String, RunError> {
    run_with_format(source, settings, OutputFormat::Table)
}

pub fn run_with_format(
    source: &str,
    settings: &Settings,
    format: OutputFormat,
) -> Result<String, RunError> {
    let laid_out = lay_out(source, settings)?;
    let fixture = &laid_out.fixture;
    match format {
        OutputFormat::Tree => Ok(fixture
            .tree
            .to_string_with_options(fixture.root, PrintOptions::all())?),
        OutputFormat::Table => layout_table(fixture),
    }
}

/// `name: left L, top T, width W, height H` for every named node
pub fn layout_table(fixture: &Fixture) -> Result<String, RunError> {
    let mut out = String::new();
    for (name, id) in fixture.named_nodes() {
        let layout = fixture.tree.layout(id)?;
        let _ = writeln!(
            out,
            "{}: left {}, top {}, width {}, height {}",
            name,
            layout.left(),
            layout.top(),
            layout.width(),
            layout.height()
        );
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport(width: f32, height: f32) -> Settings {
        Settings {
            width: Some(width),
            height: Some(height),
            ..Settings::default()
        }
    }

    #[test]
    fn test_run_reports_named_nodes() {
        let report = run(
            "node root { node a [height: 10] node [height: 5] node b [height: 20] }",
            &viewport(100.0, 100.0),
        )
        .unwrap();
        assert_eq!(
            report,
            "root: left 0, top 0, width 100, height 100\n\
             a: left 0, top 0, width 100, height 10\n\
             b: left 0, top 15, width 100, height 20\n"
        );
    }

    #[test]
    fn test_tree_format() {
        let dump = run_with_format("node [width: 10, height: 10]", &Settings::default(), OutputFormat::Tree)
            .unwrap();
        assert!(dump.starts_with("<div layout=\"width: 10; height: 10; top: 0; left: 0;\""));
        assert!(dump.contains("width: 10px; height: 10px;"));
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = run("node [width 10]", &Settings::default()).unwrap_err();
        assert!(matches!(err, RunError::Parse(_)));
        assert!(err.format("node [width 10]", "bad.flex").contains("bad.flex"));
    }

    #[test]
    fn test_build_error_is_reported() {
        let err = run("node [colour: red]", &Settings::default()).unwrap_err();
        assert!(matches!(err, RunError::Build(BuildError::UnknownProperty { .. })));
    }

    #[test]
    fn test_text_leaf_wraps_in_narrow_column() {
        let settings = viewport(50.0, 100.0);
        let report = run(
            "node root [align-items: flex-start] { text label \"hello world\" }",
            &settings,
        )
        .unwrap();
        assert!(report.contains("label: left 0, top 0, width 50, height 30"));
    }
}
