#![forbid(unsafe_code)]

//! Spotlight tour orchestration.
//!
//! # Key Components
//!
//! - [`SpotlightTourProvider`] - builds a tour from steps, config, and callbacks
//! - [`SpotlightTour`] - shared control handle (`start`, `next`, `previous`,
//!   `go_to`, `pause`, `resume`, `stop`)
//! - [`TourStateMachine`] - pure index/status bookkeeping
//! - [`BackdropBehavior`] - what a backdrop press does, with per-step overrides
//! - [`EventBridge`] - change notification for the render layer
//! - [`Attachment`] - RAII registration of a measured element
//!
//! # How it fits in the system
//! Geometry lives in `spotlight-core`. This crate owns the single source of
//! truth for the active step and recomputes the spot whenever the index or
//! the active element's layout changes. Rendering is left to the host.
//!
//! Everything is single-threaded: the handle is `!Send` and every call runs
//! to completion on the UI thread.

pub mod backdrop;
pub mod bridge;
pub mod config;
pub mod error;
pub mod machine;
pub mod provider;
pub mod step;
pub mod tour;

pub use backdrop::{BackdropAction, BackdropBehavior, BackdropCallback, resolve_behavior};
pub use bridge::{EventBridge, Subscription, TourEvent};
pub use config::{OverlayStyle, TourConfig};
pub use error::{ConfigError, StepHookError};
pub use machine::{Op, TourState, TourStateMachine, TourStatus, Transition};
pub use provider::SpotlightTourProvider;
pub use step::{BeforeHook, NavControls, RenderHook, RenderProps, StepView, TourStep};
pub use tour::{Attachment, SpotlightTour, StopCallback};
