//! Configuration shared by the nodes of one or more trees

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use super::error::LayoutError;
use super::node::{Node, NodeId};
use super::types::{ExperimentalFeature, LogLevel};

/// Receives diagnostic messages; `node` is the node being processed, if any
pub type Logger = Rc<dyn Fn(Option<&Node>, LogLevel, &str)>;

/// Produces the replacement for a shared child when its owner copies its
/// child list. Returning `None` falls back to a plain clone.
pub type CloneNodeFunc = Rc<dyn Fn(&Node, NodeId, usize) -> Option<Node>>;

/// Tunables read by the solver.
///
/// A config is built with the `with_*` methods and then shared behind an
/// [`Rc`]; it is never mutated while a layout pass is running.
#[derive(Clone)]
pub struct Config {
    pub experimental_features: Vec<ExperimentalFeature>,
    pub use_web_defaults: bool,
    pub use_legacy_stretch_behaviour: bool,
    pub should_diff_layout_without_legacy_stretch_behaviour: bool,
    /// Pixels per point used for rounding; zero disables rounding
    pub point_scale_factor: f32,
    /// Dump the tree through the logger after every layout pass
    pub print_tree: bool,
    pub logger: Option<Logger>,
    pub clone_node_callback: Option<CloneNodeFunc>,
    pub context: Option<Rc<dyn Any>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            experimental_features: Vec::new(),
            use_web_defaults: false,
            use_legacy_stretch_behaviour: false,
            should_diff_layout_without_legacy_stretch_behaviour: false,
            point_scale_factor: 1.0,
            print_tree: false,
            logger: None,
            clone_node_callback: None,
            context: None,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("experimental_features", &self.experimental_features)
            .field("use_web_defaults", &self.use_web_defaults)
            .field(
                "use_legacy_stretch_behaviour",
                &self.use_legacy_stretch_behaviour,
            )
            .field("point_scale_factor", &self.point_scale_factor)
            .field("print_tree", &self.print_tree)
            .field("has_logger", &self.logger.is_some())
            .field("has_clone_node_callback", &self.clone_node_callback.is_some())
            .finish()
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the point scale factor used for pixel-grid rounding
    pub fn with_point_scale_factor(mut self, pixels_in_point: f32) -> Result<Self, LayoutError> {
        if pixels_in_point.is_nan() || pixels_in_point < 0.0 {
            return Err(LayoutError::InvalidScaleFactor {
                value: pixels_in_point,
            });
        }
        self.point_scale_factor = pixels_in_point;
        Ok(self)
    }

    /// Enable or disable an experimental feature
    pub fn with_experimental_feature(mut self, feature: ExperimentalFeature, enabled: bool) -> Self {
        self.experimental_features.retain(|f| *f != feature);
        if enabled {
            self.experimental_features.push(feature);
        }
        self
    }

    /// Use CSS defaults: row direction, stretched content and a flex-shrink of 1
    pub fn with_web_defaults(mut self, enabled: bool) -> Self {
        self.use_web_defaults = enabled;
        self
    }

    pub fn with_legacy_stretch_behaviour(mut self, enabled: bool) -> Self {
        self.use_legacy_stretch_behaviour = enabled;
        self
    }

    /// Re-run layouts that relied on legacy stretching and record whether it mattered
    pub fn with_legacy_stretch_diffing(mut self, enabled: bool) -> Self {
        self.should_diff_layout_without_legacy_stretch_behaviour = enabled;
        self
    }

    pub fn with_print_tree(mut self, enabled: bool) -> Self {
        self.print_tree = enabled;
        self
    }

    /// Route diagnostics to a custom logger instead of `tracing`
    pub fn with_logger(
        mut self,
        logger: impl Fn(Option<&Node>, LogLevel, &str) + 'static,
    ) -> Self {
        self.logger = Some(Rc::new(logger));
        self
    }

    pub fn with_clone_node_callback(
        mut self,
        callback: impl Fn(&Node, NodeId, usize) -> Option<Node> + 'static,
    ) -> Self {
        self.clone_node_callback = Some(Rc::new(callback));
        self
    }

    pub fn with_context(mut self, context: Rc<dyn Any>) -> Self {
        self.context = Some(context);
        self
    }

    pub fn is_experimental_feature_enabled(&self, feature: ExperimentalFeature) -> bool {
        self.experimental_features.contains(&feature)
    }

    /// Emit a diagnostic through the configured logger, or `tracing` by default
    pub fn log(&self, node: Option<&Node>, level: LogLevel, message: &str) {
        if let Some(logger) = &self.logger {
            logger(node, level, message);
            return;
        }
        match level {
            LogLevel::Error | LogLevel::Fatal => tracing::error!("{}", message),
            LogLevel::Warn => tracing::warn!("{}", message),
            LogLevel::Info => tracing::info!("{}", message),
            LogLevel::Debug => tracing::debug!("{}", message),
            LogLevel::Verbose => tracing::trace!("{}", message),
        }
    }
}
