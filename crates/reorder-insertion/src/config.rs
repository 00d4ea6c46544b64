#![forbid(unsafe_code)]

//! Engine and per-collection configuration.
//!
//! Serializable settings ([`InsertionConfig`], [`CollectionOptions`]) can be
//! loaded from TOML or JSON. Behavior overrides ([`CollectionHooks`]) are
//! closures and live beside the options; every hook is optional and falls
//! back to the built-in behavior when absent.
//!
//! # Loading
//!
//! ```toml
//! overshoot = 12.0
//!
//! [indicator]
//! id = "drop-line"
//! classes = ["drop-line", "is-accent"]
//! ```
//!
//! ```rust,ignore
//! let config = InsertionConfig::from_toml_file("reorder.toml")?;
//! ```

use std::fmt;
use std::path::Path;

use reorder_core::id::CollectionId;
use serde::{Deserialize, Serialize};

use crate::commit::{SortEvent, TransferEvent};
use crate::registry::CollectionRecord;
use crate::session::DragSession;
use crate::zoning::{DEFAULT_FULL_WIDTH_RATIO, DEFAULT_OVERSHOOT, ZoningParams};

/// Default indicator element id.
pub const DEFAULT_INDICATOR_ID: &str = "insertion-point";

/// Default indicator line thickness in pixels.
pub const DEFAULT_INDICATOR_THICKNESS: f64 = 4.0;

// ---------------------------------------------------------------------------
// InsertionConfig
// ---------------------------------------------------------------------------

/// Engine-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsertionConfig {
    pub indicator: IndicatorConfig,
    /// Reach past the first/last item, in pixels.
    pub overshoot: f64,
    /// Width fraction above which items are treated as a vertical stack.
    pub full_width_ratio: f64,
}

impl Default for InsertionConfig {
    fn default() -> Self {
        Self {
            indicator: IndicatorConfig::default(),
            overshoot: DEFAULT_OVERSHOOT,
            full_width_ratio: DEFAULT_FULL_WIDTH_RATIO,
        }
    }
}

impl InsertionConfig {
    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s).map_err(ConfigError::Toml)?;
        config.into_validated()
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s).map_err(ConfigError::Json)?;
        config.into_validated()
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !self.overshoot.is_finite() || self.overshoot < 0.0 {
            errors.push(format!("overshoot must be >= 0, got {}", self.overshoot));
        }

        if !(self.full_width_ratio > 0.0 && self.full_width_ratio <= 1.0) {
            errors.push(format!(
                "full_width_ratio must be in (0, 1], got {}",
                self.full_width_ratio
            ));
        }

        if !self.indicator.thickness.is_finite() || self.indicator.thickness <= 0.0 {
            errors.push(format!(
                "indicator.thickness must be > 0, got {}",
                self.indicator.thickness
            ));
        }

        if self.indicator.tag.trim().is_empty() {
            errors.push("indicator.tag must not be empty".into());
        }

        if self.indicator.id.trim().is_empty() {
            errors.push("indicator.id must not be empty".into());
        }

        errors
    }

    /// Zoning tunables derived from this config.
    #[must_use]
    pub fn zoning_params(&self) -> ZoningParams {
        ZoningParams {
            overshoot: self.overshoot,
            full_width_ratio: self.full_width_ratio,
        }
    }

    fn into_validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

/// The floating insertion indicator element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    /// Element tag name.
    pub tag: String,
    /// Element id.
    pub id: String,
    pub classes: Vec<String>,
    /// Line thickness in pixels.
    pub thickness: f64,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            tag: "div".into(),
            id: DEFAULT_INDICATOR_ID.into(),
            classes: vec![DEFAULT_INDICATOR_ID.into()],
            thickness: DEFAULT_INDICATOR_THICKNESS,
        }
    }
}

// ---------------------------------------------------------------------------
// CollectionOptions
// ---------------------------------------------------------------------------

/// Opaque class names used for visual feedback.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackClasses {
    /// Applied to an empty collection hovered as a drop target.
    pub drop_zone_class: Option<String>,
    /// Like `drop_zone_class`, for drags started from emulated input.
    pub synth_drop_zone_class: Option<String>,
    /// Applied by the drag lifecycle to dragged items; removed after a drop.
    pub drag_placeholder_class: Option<String>,
}

/// Per-collection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionOptions {
    /// Transfer compatibility group. Collections without a group only accept
    /// drops through a custom `accepts` hook.
    pub group: Option<String>,
    /// Whether items may be reordered inside this collection.
    pub sortable: bool,
    /// Whether this collection accepts items from other collections.
    pub drop_zone: bool,
    /// Reject transfers into collections rendered inside a dragged item.
    pub tree_group: bool,
    /// Child collection that takes over when the pointer is within its
    /// vertical span.
    pub nested: Option<CollectionId>,
    pub classes: FeedbackClasses,
}

impl Default for CollectionOptions {
    fn default() -> Self {
        Self {
            group: None,
            sortable: true,
            drop_zone: true,
            tree_group: false,
            nested: None,
            classes: FeedbackClasses::default(),
        }
    }
}

impl CollectionOptions {
    #[must_use]
    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    #[must_use]
    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    #[must_use]
    pub fn drop_zone(mut self, drop_zone: bool) -> Self {
        self.drop_zone = drop_zone;
        self
    }

    #[must_use]
    pub fn tree_group(mut self, tree_group: bool) -> Self {
        self.tree_group = tree_group;
        self
    }

    #[must_use]
    pub fn nested(mut self, child: CollectionId) -> Self {
        self.nested = Some(child);
        self
    }

    #[must_use]
    pub fn drop_zone_class(mut self, class: impl Into<String>) -> Self {
        self.classes.drop_zone_class = Some(class.into());
        self
    }

    #[must_use]
    pub fn synth_drop_zone_class(mut self, class: impl Into<String>) -> Self {
        self.classes.synth_drop_zone_class = Some(class.into());
        self
    }

    #[must_use]
    pub fn drag_placeholder_class(mut self, class: impl Into<String>) -> Self {
        self.classes.drag_placeholder_class = Some(class.into());
        self
    }
}

// ---------------------------------------------------------------------------
// CollectionHooks
// ---------------------------------------------------------------------------

/// Arguments handed to a custom acceptance predicate.
pub struct AcceptContext<'a, V> {
    /// Collection being hovered.
    pub target: &'a CollectionRecord<V>,
    /// Collection the drag started in.
    pub initial: &'a CollectionRecord<V>,
    /// Collection hovered before this one.
    pub last: &'a CollectionRecord<V>,
    pub session: &'a DragSession<V>,
}

pub type AcceptsFn<V> = Box<dyn Fn(&AcceptContext<'_, V>) -> bool>;
pub type SortHook<V> = Box<dyn Fn(&SortEvent<V>)>;
pub type TransferHook<V> = Box<dyn Fn(&TransferEvent<V>)>;

/// Optional behavior overrides and notification callbacks.
pub struct CollectionHooks<V> {
    pub accepts: Option<AcceptsFn<V>>,
    pub on_sort: Option<SortHook<V>>,
    pub on_transfer: Option<TransferHook<V>>,
}

impl<V> Default for CollectionHooks<V> {
    fn default() -> Self {
        Self {
            accepts: None,
            on_sort: None,
            on_transfer: None,
        }
    }
}

impl<V> CollectionHooks<V> {
    /// No overrides.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the group/drop-zone check with a custom predicate.
    #[must_use]
    pub fn accepts(mut self, predicate: impl Fn(&AcceptContext<'_, V>) -> bool + 'static) -> Self {
        self.accepts = Some(Box::new(predicate));
        self
    }

    /// Called after a reorder inside this collection.
    #[must_use]
    pub fn on_sort(mut self, hook: impl Fn(&SortEvent<V>) + 'static) -> Self {
        self.on_sort = Some(Box::new(hook));
        self
    }

    /// Called after a transfer into or out of this collection.
    #[must_use]
    pub fn on_transfer(mut self, hook: impl Fn(&TransferEvent<V>) + 'static) -> Self {
        self.on_transfer = Some(Box::new(hook));
        self
    }
}

impl<V> fmt::Debug for CollectionHooks<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionHooks")
            .field("accepts", &self.accepts.is_some())
            .field("on_sort", &self.on_sort.is_some())
            .field("on_transfer", &self.on_transfer.is_some())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Configuration loading errors.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    Toml(toml::de::Error),
    /// JSON parse error.
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Toml(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = InsertionConfig::default();
        assert!(config.validate().is_empty());
        assert_eq!(config.indicator.id, "insertion-point");
        assert_eq!(config.indicator.classes, vec!["insertion-point".to_string()]);
        assert_eq!(config.indicator.tag, "div");
        assert_eq!(config.zoning_params(), ZoningParams::default());
    }

    #[test]
    fn toml_overrides_merge_with_defaults() {
        let config = InsertionConfig::from_toml_str(
            r#"
            overshoot = 12.0

            [indicator]
            id = "drop-line"
            "#,
        )
        .unwrap();
        assert_eq!(config.overshoot, 12.0);
        assert_eq!(config.full_width_ratio, DEFAULT_FULL_WIDTH_RATIO);
        assert_eq!(config.indicator.id, "drop-line");
        assert_eq!(config.indicator.tag, "div");
    }

    #[test]
    fn json_out_of_range_ratio_is_rejected() {
        let err = InsertionConfig::from_json_str(r#"{"full_width_ratio": 1.5}"#).unwrap_err();
        match err {
            ConfigError::Validation(errors) => {
                assert_eq!(errors.len(), 1);
                assert!(errors[0].contains("full_width_ratio"));
            }
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[test]
    fn malformed_input_reports_parser() {
        let err = InsertionConfig::from_toml_str("overshoot = [").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
        assert!(std::error::Error::source(&err).is_some());

        let err = InsertionConfig::from_json_str("{").unwrap_err();
        assert!(err.to_string().starts_with("JSON parse error"));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[indicator]\nthickness = 2.0").unwrap();
        let config = InsertionConfig::from_toml_file(file.path()).unwrap();
        assert_eq!(config.indicator.thickness, 2.0);

        let missing = InsertionConfig::from_json_file("/nonexistent/reorder.json").unwrap_err();
        assert!(matches!(missing, ConfigError::Io(_)));
    }

    #[test]
    fn collection_options_defaults_and_builders() {
        let options = CollectionOptions::default();
        assert!(options.sortable);
        assert!(options.drop_zone);
        assert!(!options.tree_group);
        assert_eq!(options.group, None);

        let child = CollectionId::new(9).unwrap();
        let options = CollectionOptions::default()
            .group("board")
            .sortable(false)
            .nested(child)
            .drop_zone_class("is-target");
        assert_eq!(options.group.as_deref(), Some("board"));
        assert!(!options.sortable);
        assert_eq!(options.nested, Some(child));
        assert_eq!(options.classes.drop_zone_class.as_deref(), Some("is-target"));
    }

    #[test]
    fn collection_options_deserialize() {
        let options: CollectionOptions =
            serde_json::from_str(r#"{"group":"todo","drop_zone":false,"nested":4}"#).unwrap();
        assert_eq!(options.group.as_deref(), Some("todo"));
        assert!(!options.drop_zone);
        assert!(options.sortable);
        assert_eq!(options.nested.map(CollectionId::get), Some(4));
    }

    #[test]
    fn hooks_debug_reports_presence() {
        let hooks: CollectionHooks<u8> = CollectionHooks::new().accepts(|_| true);
        let rendered = format!("{hooks:?}");
        assert!(rendered.contains("accepts: true"));
        assert!(rendered.contains("on_sort: false"));
    }
}
