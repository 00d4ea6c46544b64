#![forbid(unsafe_code)]

//! Insertion zones.
//!
//! A [`Zone`] is the rectangle around an item in which the pointer signals
//! "insert here". Every enabled item owns up to two: the ascending zone
//! (insert after the item) and the descending zone (insert before it).
//! Zones are derived from measured rectangles and replaced wholesale on every
//! recomputation; they are never edited in place.

use reorder_core::geometry::{Point, Rect};
use serde::{Deserialize, Serialize};

/// How items are stacked where a zone was computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Items stack top to bottom; the insertion line is horizontal.
    Vertical,
    /// Items sit side by side in a row; the insertion line is vertical.
    Horizontal,
}

impl Orientation {
    /// Returns the stable string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vertical => "vertical",
            Self::Horizontal => "horizontal",
        }
    }
}

/// Which side of an item a resolved zone sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Insert after the item (below it, or to its right).
    Ascending,
    /// Insert before the item (above it, or to its left).
    Descending,
}

impl Direction {
    /// Returns true for [`Direction::Ascending`].
    #[must_use]
    pub const fn is_ascending(self) -> bool {
        matches!(self, Self::Ascending)
    }

    /// Returns the stable string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "ascending",
            Self::Descending => "descending",
        }
    }
}

/// Axis-aligned insertion zone: `[x_min, x_max] x [y_min, y_max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub orientation: Orientation,
}

impl Zone {
    /// Create a zone from its spans.
    #[must_use]
    pub const fn new(x: [f64; 2], y: [f64; 2], orientation: Orientation) -> Self {
        Self {
            x_min: x[0],
            x_max: x[1],
            y_min: y[0],
            y_max: y[1],
            orientation,
        }
    }

    /// Strict containment: points on any edge are outside.
    #[inline]
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x > self.x_min && point.x < self.x_max && point.y > self.y_min && point.y < self.y_max
    }

    /// The zone as a rectangle.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::from_edges(self.x_min, self.y_min, self.x_max, self.y_max)
    }

    /// Coordinate of the insertion line on the primary axis for `direction`.
    ///
    /// Vertical zones place the line at `y_max` (ascending) or `y_min`
    /// (descending); horizontal zones use `x_max`/`x_min`.
    #[must_use]
    pub const fn edge(&self, direction: Direction) -> f64 {
        match (self.orientation, direction) {
            (Orientation::Vertical, Direction::Ascending) => self.y_max,
            (Orientation::Vertical, Direction::Descending) => self.y_min,
            (Orientation::Horizontal, Direction::Ascending) => self.x_max,
            (Orientation::Horizontal, Direction::Descending) => self.x_min,
        }
    }
}

/// The pair of zones owned by one item.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ItemZones {
    pub ascending: Option<Zone>,
    pub descending: Option<Zone>,
}

impl ItemZones {
    /// No zones at all.
    pub const NONE: Self = Self {
        ascending: None,
        descending: None,
    };

    /// Zone for `direction`, if present.
    #[must_use]
    pub const fn get(&self, direction: Direction) -> Option<&Zone> {
        match direction {
            Direction::Ascending => self.ascending.as_ref(),
            Direction::Descending => self.descending.as_ref(),
        }
    }

    /// True when neither zone is present.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.ascending.is_none() && self.descending.is_none()
    }
}
