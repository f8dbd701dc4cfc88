//! Flexbox layout engine
//!
//! Nodes live in a [`Tree`] arena and carry a [`Style`]. Calling
//! [`Tree::calculate_layout`] on a root fills in each node's
//! [`LayoutResults`]: a position relative to its owner plus its size,
//! margin, border and padding.

mod absolute;
mod align;
pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
mod flex;
pub mod node;
mod print;
pub mod results;
pub mod rounding;
pub mod style;
pub mod tree;
pub mod types;
pub mod value;

pub use cache::can_use_cached_measurement;
pub use config::{CloneNodeFunc, Config, Logger};
pub use engine::LayoutStats;
pub use error::LayoutError;
pub use node::{BaselineFunc, DirtiedFunc, MeasureFunc, Node, NodeId, PrintFunc};
pub use results::{CachedMeasurement, LayoutResults, MAX_CACHED_RESULT_COUNT};
pub use rounding::round_value_to_pixel_grid;
pub use style::Style;
pub use tree::Tree;
pub use types::*;
pub use value::{floats_equal, FloatOptional, Unit, Value};
