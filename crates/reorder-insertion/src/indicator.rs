#![forbid(unsafe_code)]

//! The floating insertion indicator.
//!
//! One indicator exists per engine. It is mounted lazily on the host the
//! first time a sortable collection needs it and is then only shown, moved,
//! or hidden.
//!
//! # Placement
//!
//! For a vertical zone the indicator is a horizontal line of `thickness`
//! pixels centred on the zone's insertion edge (`y_max` when ascending,
//! `y_min` when descending), spanning the zone's width. Horizontal zones are
//! the mirror image: a vertical line centred on `x_max`/`x_min` spanning the
//! zone's height.

use reorder_core::geometry::Rect;
use serde::{Deserialize, Serialize};

use crate::config::IndicatorConfig;
use crate::host::Presenter;
use crate::zone::{Direction, Orientation, Zone};

/// Where and how the indicator is drawn, in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorPlacement {
    pub rect: Rect,
    pub orientation: Orientation,
}

impl IndicatorPlacement {
    /// Compute the placement for a resolved zone.
    #[must_use]
    pub fn from_zone(zone: &Zone, direction: Direction, thickness: f64) -> Self {
        let edge = zone.edge(direction);
        let rect = match zone.orientation {
            Orientation::Vertical => Rect::new(
                zone.x_min,
                edge - thickness / 2.0,
                zone.x_max - zone.x_min,
                thickness,
            ),
            Orientation::Horizontal => Rect::new(
                edge - thickness / 2.0,
                zone.y_min,
                thickness,
                zone.y_max - zone.y_min,
            ),
        };
        Self {
            rect,
            orientation: zone.orientation,
        }
    }
}

/// Indicator state mirrored from what the presenter was told.
#[derive(Debug, Clone)]
pub struct InsertionIndicator {
    config: IndicatorConfig,
    mounted: bool,
    placement: Option<IndicatorPlacement>,
}

impl InsertionIndicator {
    #[must_use]
    pub fn new(config: IndicatorConfig) -> Self {
        Self {
            config,
            mounted: false,
            placement: None,
        }
    }

    pub fn config(&self) -> &IndicatorConfig {
        &self.config
    }

    pub const fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub const fn is_visible(&self) -> bool {
        self.placement.is_some()
    }

    /// Current placement while visible.
    pub const fn placement(&self) -> Option<IndicatorPlacement> {
        self.placement
    }

    /// Mount the indicator on the presenter if that has not happened yet.
    pub fn ensure_mounted(&mut self, presenter: &mut impl Presenter) {
        if !self.mounted {
            presenter.mount_indicator(&self.config);
            self.mounted = true;
        }
    }

    /// Show the indicator at `zone` and return the placement used.
    pub fn place(
        &mut self,
        presenter: &mut impl Presenter,
        zone: &Zone,
        direction: Direction,
    ) -> IndicatorPlacement {
        self.ensure_mounted(presenter);
        let placement = IndicatorPlacement::from_zone(zone, direction, self.config.thickness);
        presenter.show_indicator(placement);
        self.placement = Some(placement);
        placement
    }

    /// Hide the indicator. Does nothing before it was mounted.
    pub fn hide(&mut self, presenter: &mut impl Presenter) {
        if self.mounted {
            presenter.hide_indicator();
        }
        self.placement = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        mounts: usize,
        shown: Vec<IndicatorPlacement>,
        hides: usize,
    }

    impl Presenter for Recorder {
        fn mount_indicator(&mut self, _config: &IndicatorConfig) {
            self.mounts += 1;
        }

        fn show_indicator(&mut self, placement: IndicatorPlacement) {
            self.shown.push(placement);
        }

        fn hide_indicator(&mut self) {
            self.hides += 1;
        }
    }

    #[test]
    fn vertical_zone_draws_horizontal_line() {
        let zone = Zone::new([10.0, 210.0], [20.0, 45.0], Orientation::Vertical);
        let asc = IndicatorPlacement::from_zone(&zone, Direction::Ascending, 4.0);
        assert_eq!(asc.rect, Rect::new(10.0, 43.0, 200.0, 4.0));
        let desc = IndicatorPlacement::from_zone(&zone, Direction::Descending, 4.0);
        assert_eq!(desc.rect, Rect::new(10.0, 18.0, 200.0, 4.0));
    }

    #[test]
    fn horizontal_zone_draws_vertical_line() {
        let zone = Zone::new([50.0, 80.0], [0.0, 30.0], Orientation::Horizontal);
        let asc = IndicatorPlacement::from_zone(&zone, Direction::Ascending, 4.0);
        assert_eq!(asc.rect, Rect::new(78.0, 0.0, 4.0, 30.0));
        assert_eq!(asc.orientation, Orientation::Horizontal);
        let desc = IndicatorPlacement::from_zone(&zone, Direction::Descending, 2.0);
        assert_eq!(desc.rect, Rect::new(49.0, 0.0, 2.0, 30.0));
    }

    #[test]
    fn mounts_once_and_tracks_visibility() {
        let mut presenter = Recorder::default();
        let mut indicator = InsertionIndicator::new(IndicatorConfig::default());
        indicator.hide(&mut presenter);
        assert_eq!(presenter.hides, 0);

        let zone = Zone::new([0.0, 100.0], [0.0, 10.0], Orientation::Vertical);
        indicator.place(&mut presenter, &zone, Direction::Ascending);
        indicator.place(&mut presenter, &zone, Direction::Descending);
        assert_eq!(presenter.mounts, 1);
        assert_eq!(presenter.shown.len(), 2);
        assert!(indicator.is_visible());

        indicator.hide(&mut presenter);
        assert!(!indicator.is_visible());
        assert_eq!(presenter.hides, 1);
    }
}
