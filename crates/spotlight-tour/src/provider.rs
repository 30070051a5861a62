#![forbid(unsafe_code)]

//! Provider: the one place a tour is configured and created.
//!
//! # Example
//!
//! ```ignore
//! use spotlight_tour::{BackdropBehavior, SpotlightTourProvider, TourStep};
//!
//! let tour = SpotlightTourProvider::new()
//!     .steps(vec![
//!         TourStep::new("search").title("Search"),
//!         TourStep::new("profile").on_backdrop_press(BackdropBehavior::Stop),
//!     ])
//!     .on_stop(|state| println!("stopped at {} (last: {})", state.index, state.is_last))
//!     .build();
//!
//! let search = tour.attach(0);
//! search.layout(Rect::new(16.0, 48.0, 320.0, 40.0));
//! tour.start();
//! ```

use std::rc::Rc;

use tracing::debug;

use crate::backdrop::BackdropBehavior;
use crate::config::TourConfig;
use crate::machine::TourState;
use crate::step::TourStep;
use crate::tour::{SpotlightTour, StopCallback, TourInner};

/// Builder for a [`SpotlightTour`].
#[derive(Default)]
pub struct SpotlightTourProvider {
    steps: Vec<TourStep>,
    config: TourConfig,
    on_backdrop_press: Option<BackdropBehavior>,
    on_stop: Option<StopCallback>,
}

impl std::fmt::Debug for SpotlightTourProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpotlightTourProvider")
            .field("steps", &self.steps.len())
            .field("config", &self.config)
            .field("on_backdrop_press", &self.on_backdrop_press)
            .field("on_stop", &self.on_stop.is_some())
            .finish()
    }
}

impl SpotlightTourProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The ordered steps of the tour.
    #[must_use]
    pub fn steps(mut self, steps: Vec<TourStep>) -> Self {
        self.steps = steps;
        self
    }

    /// Append a single step.
    #[must_use]
    pub fn step(mut self, step: TourStep) -> Self {
        self.steps.push(step);
        self
    }

    /// Data-driven defaults (backdrop action, shape, overlay, floating).
    #[must_use]
    pub fn config(mut self, config: TourConfig) -> Self {
        self.config = config;
        self
    }

    /// Default backdrop behavior. Takes precedence over `config.backdrop`.
    #[must_use]
    pub fn on_backdrop_press(mut self, behavior: impl Into<BackdropBehavior>) -> Self {
        self.on_backdrop_press = Some(behavior.into());
        self
    }

    /// Called exactly once per stop, including the implicit stop after the
    /// last step.
    #[must_use]
    pub fn on_stop(mut self, callback: impl Fn(TourState) + 'static) -> Self {
        self.on_stop = Some(Rc::new(callback));
        self
    }

    /// Create the shared handle.
    #[must_use]
    pub fn build(self) -> SpotlightTour {
        let backdrop = self
            .on_backdrop_press
            .unwrap_or_else(|| self.config.backdrop.into());
        debug!(
            target: "spotlight.tour",
            steps = self.steps.len(),
            backdrop = ?backdrop,
            "tour provider built"
        );
        SpotlightTour::from_inner(TourInner::new(
            self.steps,
            self.config,
            Some(backdrop),
            self.on_stop,
        ))
    }
}
