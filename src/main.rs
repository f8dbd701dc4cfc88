//! Flex Layout CLI
//!
//! Usage:
//!   flex-layout [OPTIONS] [FILE]
//!
//! Options:
//!   -s, --settings <FILE>    Engine and viewport settings (TOML format)
//!   -W, --width <POINTS>     Owner width for the root
//!   -H, --height <POINTS>    Owner height for the root
//!   -d, --direction <DIR>    Owner direction: ltr, rtl or inherit
//!   -t, --tree               Print the pseudo-HTML tree dump instead of a table
//!   -g, --grammar            Show fixture language reference
//!   -v, --verbose            Log layout passes (repeat for solver traces)
//!   -h, --help               Print help

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use flex_layout::layout::Direction;
use flex_layout::{run_with_format, OutputFormat, Settings};

#[derive(Parser)]
#[command(name = "flex-layout")]
#[command(about = "Compute flexbox layouts for node tree fixtures")]
struct Cli {
    /// Input file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Engine and viewport settings (TOML format)
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Owner width for the root; overrides the settings file
    #[arg(short = 'W', long)]
    width: Option<f32>,

    /// Owner height for the root; overrides the settings file
    #[arg(short = 'H', long)]
    height: Option<f32>,

    /// Owner direction; overrides the settings file
    #[arg(short, long)]
    direction: Option<Direction>,

    /// Print the pseudo-HTML tree dump instead of a table
    #[arg(short, long)]
    tree: bool,

    /// Show fixture language reference
    #[arg(short, long)]
    grammar: bool,

    /// Log layout passes; repeat for solver traces
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.grammar {
        print_grammar();
        return;
    }

    // If no input file and stdin is a terminal (interactive), show intro help
    if cli.input.is_none() && io::stdin().is_terminal() {
        print_intro();
        return;
    }

    let mut settings = match &cli.settings {
        Some(path) => match Settings::from_file(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Error loading settings '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => Settings::default(),
    };
    if cli.width.is_some() {
        settings.width = cli.width;
    }
    if cli.height.is_some() {
        settings.height = cli.height;
    }
    if let Some(direction) = cli.direction {
        settings.direction = direction;
    }

    let (source, filename) = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => (content, path.display().to_string()),
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => (buffer, "<stdin>".to_string()),
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    let format = if cli.tree {
        OutputFormat::Tree
    } else {
        OutputFormat::Table
    };
    match run_with_format(&source, &settings, format) {
        Ok(output) => {
            print!("{}", output);
            if format == OutputFormat::Tree {
                println!();
            }
        }
        Err(e) => {
            eprintln!("{}", e.format(&source, &filename));
            std::process::exit(1);
        }
    }
}

/// `RUST_LOG` wins over `-v` when set
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "flex_layout=debug",
        _ => "flex_layout=trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn print_intro() {
    println!(
        r#"Flex Layout - compute flexbox layouts for node tree fixtures

USAGE:
    flex-layout [OPTIONS] [FILE]
    echo '<fixture>' | flex-layout

OPTIONS:
    -s, --settings     Engine and viewport settings (TOML file)
    -W, --width        Owner width for the root
    -H, --height       Owner height for the root
    -d, --direction    Owner direction (ltr, rtl, inherit)
    -t, --tree         Print the pseudo-HTML tree dump
    -g, --grammar      Show fixture language reference
    -v, --verbose      Log layout passes
    -h, --help         Print help

QUICK START:
    echo 'node root [flex-direction: row] {{ node a [flex-grow: 1] node b [width: 30] }}' \
        | flex-layout -W 100 -H 40

This lays out two children in a row and prints each named node's box.
Run --grammar for the fixture syntax."#
    );
}

fn print_grammar() {
    println!(
        r#"FLEX LAYOUT FIXTURES
====================

NODES
-----
node [name] [properties] {{ children }}   Container; children are optional
text [name] "content" [properties]      Leaf measured as monospace text
                                        (10 points per character, 10 per line)

A fixture has exactly one root node.

PROPERTIES
----------
Properties go in brackets after the name:
    node card [width: 50%, padding: 8, flex-direction: row]

Keywords:
    direction         inherit | ltr | rtl
    flex-direction    column | column-reverse | row | row-reverse
    justify-content   flex-start | center | flex-end | space-between |
                      space-around | space-evenly
    align-items       auto | flex-start | center | flex-end | stretch |
    align-self        baseline | space-between | space-around
    align-content
    flex-wrap         no-wrap | wrap | wrap-reverse
    overflow          visible | hidden | scroll
    display           flex | none
    position          relative | absolute

Numbers:
    flex, flex-grow, flex-shrink, aspect-ratio

Lengths (points, percentages, auto where allowed):
    width, height, flex-basis          <n> | <n>% | auto
    min-width, min-height,             <n> | <n>%
    max-width, max-height
    margin[-edge]                      <n> | <n>% | auto
    padding[-edge]                     <n> | <n>%
    border[-edge]                      <n>
    left, top, right, bottom,          <n> | <n>%
    start, end

Edges: left, top, right, bottom, start, end, horizontal, vertical, all

Flags:
    reference-baseline                 true | false

COMMENTS
--------
// line comment
/* block comment */"#
    );
}
