#![forbid(unsafe_code)]

//! Spotlight core: geometry reconciliation for guided tours.
//!
//! # Role in the workspace
//! `spotlight-core` owns everything geometric. Attaching elements register
//! their measured rectangles in a [`GeometryRegistry`] keyed by step index;
//! the [`AttachmentResolver`] turns the active index into a [`Spot`] with a
//! backdrop [`Cutout`]; [`floating::place`] positions the tooltip next to it.
//!
//! # How it fits in the system
//! `spotlight-tour` owns the state machine and calls into this crate on
//! every index or layout change. Nothing here knows about tour status.

pub mod floating;
pub mod geometry;
pub mod registry;
pub mod resolver;
pub mod shape;

pub use floating::{FloatingLayout, FloatingOptions, Placement};
pub use geometry::{Insets, Point, Rect, Size};
pub use registry::{AttachmentId, GeometryRegistry, Lookup, StepIndices};
pub use resolver::{AttachmentResolver, ConflictPolicy, Spot};
pub use shape::{Cutout, ShapeKind, ShapeOptions};
