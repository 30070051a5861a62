#![forbid(unsafe_code)]

//! What a press on the backdrop does.
//!
//! Resolution order is step override, then provider default, then
//! [`BackdropBehavior::Continue`].

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::tour::SpotlightTour;

/// Callback receiving the live control handle.
pub type BackdropCallback = Rc<dyn Fn(&SpotlightTour)>;

/// Data-only subset of [`BackdropBehavior`], usable in config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackdropAction {
    #[default]
    Continue,
    Stop,
}

/// Behavior for a backdrop press.
#[derive(Clone, Default)]
pub enum BackdropBehavior {
    /// Advance the tour (stops after the last step).
    #[default]
    Continue,
    /// End the tour.
    Stop,
    /// Hand the live handle to the caller. No built-in transition happens.
    Custom(BackdropCallback),
}

impl BackdropBehavior {
    /// Wrap a closure as a custom behavior.
    pub fn custom(callback: impl Fn(&SpotlightTour) + 'static) -> Self {
        Self::Custom(Rc::new(callback))
    }

    /// Perform the behavior against `tour`.
    pub fn apply(&self, tour: &SpotlightTour) {
        match self {
            Self::Continue => tour.next(),
            Self::Stop => tour.stop(),
            Self::Custom(callback) => callback(tour),
        }
    }
}

impl fmt::Debug for BackdropBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Continue => f.write_str("Continue"),
            Self::Stop => f.write_str("Stop"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl From<BackdropAction> for BackdropBehavior {
    fn from(action: BackdropAction) -> Self {
        match action {
            BackdropAction::Continue => Self::Continue,
            BackdropAction::Stop => Self::Stop,
        }
    }
}

/// Pick the behavior for a press: step override, then provider default,
/// then `Continue`.
#[must_use]
pub fn resolve_behavior(
    step: Option<&BackdropBehavior>,
    provider: Option<&BackdropBehavior>,
) -> BackdropBehavior {
    step.or(provider).cloned().unwrap_or_default()
}
