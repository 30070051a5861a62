#![forbid(unsafe_code)]

//! The shared control handle.
//!
//! # Design
//!
//! [`SpotlightTour`] is a cheap, clonable handle to one `Rc<RefCell<..>>`
//! holding the state machine, geometry registry, and provider config. Every
//! clone observes and drives the same tour; there is no second copy of the
//! index or status anywhere.
//!
//! Every operation follows the same shape:
//!
//! 1. Borrow, plan the transition, release.
//! 2. Run the target step's `before` hook, if any, with nothing borrowed.
//! 3. Borrow mutably, re-check nothing moved underneath, apply, refresh the
//!    resolved spot, collect events, release.
//! 4. Queue the bridge events, then run the stop callback and drain the
//!    queue with nothing borrowed.
//!
//! Because nothing is borrowed while user code runs, callbacks may call
//! straight back into the handle. Events from such a nested call are
//! queued behind the outer call's, so listeners always end on the
//! current state.
//!
//! # Failure Modes
//!
//! None of the operations fail. Invalid requests (out-of-range jumps, any
//! navigation on an empty tour, navigation while paused) are logged at
//! `trace` and ignored. A failing `before` hook is logged at `warn` and the
//! tour stays on its current step.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use spotlight_core::{
    AttachmentId, AttachmentResolver, FloatingLayout, GeometryRegistry, Lookup, Point, Rect,
    ShapeOptions, Size, Spot, StepIndices, floating,
};
use tracing::{debug, trace, warn};

use crate::backdrop::{BackdropBehavior, resolve_behavior};
use crate::bridge::{EventBridge, Subscription, TourEvent};
use crate::config::{OverlayStyle, TourConfig};
use crate::machine::{Op, TourState, TourStateMachine, TourStatus, Transition};
use crate::step::{RenderProps, StepView, TourStep};

/// Callback invoked exactly once per stop.
pub type StopCallback = Rc<dyn Fn(TourState)>;

pub(crate) struct TourInner {
    /// Steps of the current (or next) run.
    steps: Rc<[TourStep]>,
    /// Replacement list queued while a run is active.
    queued_steps: Option<Rc<[TourStep]>>,
    machine: TourStateMachine,
    registry: GeometryRegistry,
    resolver: AttachmentResolver,
    config: TourConfig,
    on_backdrop_press: Option<BackdropBehavior>,
    on_stop: Option<StopCallback>,
    /// Last spot surfaced to the bridge.
    spot: Option<Spot>,
    bridge: EventBridge,
}

impl TourInner {
    pub(crate) fn new(
        steps: Vec<TourStep>,
        config: TourConfig,
        on_backdrop_press: Option<BackdropBehavior>,
        on_stop: Option<StopCallback>,
    ) -> Self {
        let steps: Rc<[TourStep]> = steps.into();
        Self {
            machine: TourStateMachine::new(steps.len()),
            steps,
            queued_steps: None,
            registry: GeometryRegistry::new(),
            resolver: AttachmentResolver::new(config.conflict_policy),
            config,
            on_backdrop_press,
            on_stop,
            spot: None,
            bridge: EventBridge::new(),
        }
    }

    fn active_step(&self) -> Option<&TourStep> {
        self.machine.index().and_then(|index| self.steps.get(index))
    }

    fn shape_for(&self, index: usize) -> ShapeOptions {
        self.steps
            .get(index)
            .and_then(|step| step.shape)
            .unwrap_or(self.config.shape)
    }

    /// Re-resolve the active spot; returns an event if it changed.
    fn refresh_spot(&mut self) -> Option<TourEvent> {
        let spot = self.machine.index().and_then(|index| {
            self.resolver
                .resolve(&self.registry, index, &self.shape_for(index))
        });
        if spot == self.spot {
            return None;
        }
        self.spot = spot.clone();
        Some(TourEvent::SpotChanged(spot))
    }

    fn install_queued_steps(&mut self) {
        if self.machine.status().is_active() {
            return;
        }
        if let Some(steps) = self.queued_steps.take() {
            self.machine.set_len(steps.len());
            self.steps = steps;
        }
    }
}

/// Deliverables gathered under the borrow and handed out after release.
struct Outbox {
    events: Vec<TourEvent>,
    bridge: EventBridge,
    on_stop: Option<(StopCallback, TourState)>,
}

impl Outbox {
    /// Events are queued before the stop callback runs, so anything the
    /// callback triggers is delivered after them.
    fn deliver(self) {
        self.bridge.enqueue(self.events);
        if let Some((on_stop, state)) = self.on_stop {
            on_stop(state);
        }
        self.bridge.flush();
    }
}

/// Shared control handle for one tour.
#[derive(Clone)]
pub struct SpotlightTour {
    inner: Rc<RefCell<TourInner>>,
}

impl std::fmt::Debug for SpotlightTour {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("SpotlightTour")
            .field("current", &inner.machine.current())
            .field("status", &inner.machine.status())
            .field("step_count", &inner.steps.len())
            .field("attachments", &inner.registry.len())
            .finish()
    }
}

impl SpotlightTour {
    pub(crate) fn from_inner(inner: TourInner) -> Self {
        Self {
            inner: Rc::new(RefCell::new(inner)),
        }
    }

    // --- observation ---------------------------------------------------

    /// Active step index, `-1` while idle.
    #[must_use]
    pub fn current(&self) -> isize {
        self.inner.borrow().machine.current()
    }

    #[must_use]
    pub fn status(&self) -> TourStatus {
        self.inner.borrow().machine.status()
    }

    /// Snapshot of the active step, `None` while idle.
    #[must_use]
    pub fn state(&self) -> Option<TourState> {
        self.inner.borrow().machine.state()
    }

    /// Steps in the current run (or the next one while idle).
    #[must_use]
    pub fn step_count(&self) -> usize {
        self.inner.borrow().steps.len()
    }

    /// Resolved spot for the active step, `None` if idle or unmeasured.
    #[must_use]
    pub fn spot(&self) -> Option<Spot> {
        self.inner.borrow().spot.clone()
    }

    /// Lookup state for the active step, `None` while idle.
    #[must_use]
    pub fn target_lookup(&self) -> Option<Lookup> {
        let inner = self.inner.borrow();
        let index = inner.machine.index()?;
        Some(inner.resolver.lookup(&inner.registry, index))
    }

    /// Backdrop paint for the active step, falling back to the provider's.
    #[must_use]
    pub fn overlay(&self) -> OverlayStyle {
        let inner = self.inner.borrow();
        inner
            .active_step()
            .and_then(|step| step.overlay.clone())
            .unwrap_or_else(|| inner.config.overlay.clone())
    }

    /// Subscribe to tour events.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, listener: impl Fn(&TourEvent) + 'static) -> Subscription {
        let bridge = self.inner.borrow().bridge.clone();
        bridge.subscribe(listener)
    }

    // --- control -------------------------------------------------------

    /// Begin the tour at step 0. No-op while running or paused, or if there
    /// are no steps.
    pub fn start(&self) {
        self.inner.borrow_mut().install_queued_steps();
        self.drive(Op::Start);
    }

    /// Advance one step. On the last step this stops the tour.
    pub fn next(&self) {
        self.drive(Op::Next);
    }

    /// Go back one step. No-op on the first step.
    pub fn previous(&self) {
        self.drive(Op::Previous);
    }

    /// Jump to `index`. Out-of-range indices are ignored; inspect
    /// [`current`](Self::current) to observe the outcome.
    pub fn go_to(&self, index: isize) {
        match usize::try_from(index) {
            Ok(index) => self.drive(Op::GoTo(index)),
            Err(_) => trace!(target: "spotlight.tour", index, "go_to rejected: negative index"),
        }
    }

    pub fn pause(&self) {
        self.drive(Op::Pause);
    }

    pub fn resume(&self) {
        self.drive(Op::Resume);
    }

    /// End the tour and notify the stop callback.
    pub fn stop(&self) {
        self.drive(Op::Stop);
    }

    /// Replace the step list. Takes effect at the next [`start`](Self::start)
    /// if a run is in progress, immediately otherwise.
    pub fn set_steps(&self, steps: Vec<TourStep>) {
        let mut inner = self.inner.borrow_mut();
        inner.queued_steps = Some(steps.into());
        inner.install_queued_steps();
    }

    /// Handle a press on the backdrop outside the cut-out.
    pub fn press_backdrop(&self) {
        let behavior = {
            let inner = self.inner.borrow();
            if !inner.machine.status().is_active() {
                trace!(target: "spotlight.tour", "backdrop press ignored: idle");
                return;
            }
            resolve_behavior(
                inner
                    .active_step()
                    .and_then(|step| step.on_backdrop_press.as_ref()),
                inner.on_backdrop_press.as_ref(),
            )
        };
        debug!(target: "spotlight.tour", behavior = ?behavior, "backdrop press");
        behavior.apply(self);
    }

    /// Route a press at `point`. Presses inside the cut-out belong to the
    /// highlighted element and are not handled; returns whether the press
    /// was treated as a backdrop press.
    pub fn press_at(&self, point: Point) -> bool {
        let inside = self
            .inner
            .borrow()
            .spot
            .as_ref()
            .is_some_and(|spot| spot.cutout.contains(point));
        if inside || !self.status().is_active() {
            return false;
        }
        self.press_backdrop();
        true
    }

    /// Build the tooltip view for the active step.
    #[must_use]
    pub fn render(&self) -> Option<StepView> {
        let (steps, index) = {
            let inner = self.inner.borrow();
            (Rc::clone(&inner.steps), inner.machine.index()?)
        };
        let step = steps.get(index)?;
        let props = RenderProps {
            index,
            step_count: steps.len(),
            is_first: index == 0,
            is_last: index + 1 == steps.len(),
            step,
            tour: self,
        };
        Some(step.view(&props))
    }

    /// Place a tooltip of `size` next to the active spot inside `viewport`.
    ///
    /// `None` while there is no spot, or if `size` or `viewport` is not finite.
    #[must_use]
    pub fn floating_layout(&self, size: Size, viewport: Rect) -> Option<FloatingLayout> {
        let inner = self.inner.borrow();
        let spot = inner.spot.as_ref()?;
        let options = inner
            .active_step()
            .and_then(|step| step.floating)
            .unwrap_or(inner.config.floating);
        floating::place(spot.cutout.bounds(), size, viewport, &options)
    }

    // --- attachments ---------------------------------------------------

    /// Declare an element attached to one or more steps. The returned guard
    /// releases the registration when dropped.
    #[must_use = "dropping the attachment unregisters it immediately"]
    pub fn attach(&self, indices: impl Into<StepIndices>) -> Attachment {
        let id = self.inner.borrow_mut().registry.register(indices);
        self.settle(Vec::new());
        Attachment {
            tour: Rc::downgrade(&self.inner),
            id,
        }
    }

    /// Number of live attachments.
    #[must_use]
    pub fn attachment_count(&self) -> usize {
        self.inner.borrow().registry.len()
    }

    // --- internals -----------------------------------------------------

    fn drive(&self, op: Op) {
        let (plan, revision, before) = {
            let inner = self.inner.borrow();
            let Some(plan) = inner.machine.plan(op) else {
                trace!(
                    target: "spotlight.tour",
                    op = ?op,
                    status = %inner.machine.status(),
                    current = inner.machine.current(),
                    "ignored"
                );
                return;
            };
            let before = plan
                .entered()
                .and_then(|index| inner.steps.get(index))
                .and_then(|step| step.before.clone());
            (plan, inner.machine.revision(), before)
        };

        if let Some(before) = before
            && let Err(err) = before()
        {
            warn!(target: "spotlight.tour", op = ?op, error = %err, "before hook aborted transition");
            return;
        }

        let outbox = {
            let mut inner = self.inner.borrow_mut();
            if inner.machine.revision() != revision {
                debug!(target: "spotlight.tour", op = ?op, "superseded during before hook");
                return;
            }
            inner.machine.apply(&plan);
            debug!(
                target: "spotlight.tour",
                transition = ?plan,
                status = %inner.machine.status(),
                current = inner.machine.current(),
                "transition"
            );

            let mut events = vec![TourEvent::from(plan)];
            events.extend(inner.refresh_spot());
            let on_stop = match plan {
                Transition::Stopped(state) => inner.on_stop.clone().map(|cb| (cb, state)),
                _ => None,
            };
            Outbox {
                events,
                bridge: inner.bridge.clone(),
                on_stop,
            }
        };
        outbox.deliver();
    }

    /// Refresh the spot after a registry mutation and deliver any change.
    fn settle(&self, mut events: Vec<TourEvent>) {
        let outbox = {
            let mut inner = self.inner.borrow_mut();
            events.extend(inner.refresh_spot());
            Outbox {
                events,
                bridge: inner.bridge.clone(),
                on_stop: None,
            }
        };
        outbox.deliver();
    }
}

/// RAII registration of one attaching element.
///
/// Report every layout pass with [`layout`](Self::layout). Dropping the
/// guard (unmount) releases the registration synchronously. Outliving the
/// tour is harmless: every method becomes a no-op.
pub struct Attachment {
    tour: Weak<RefCell<TourInner>>,
    id: AttachmentId,
}

impl std::fmt::Debug for Attachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attachment")
            .field("id", &self.id.get())
            .field("live", &(self.tour.strong_count() > 0))
            .finish()
    }
}

impl Attachment {
    #[must_use]
    pub fn id(&self) -> AttachmentId {
        self.id
    }

    /// Store a new measurement for this element.
    ///
    /// Updates for a step that is not active are stored silently and only
    /// show up once that step becomes active.
    pub fn layout(&self, rect: Rect) {
        self.mutate(|registry, id| registry.update_layout(id, rect));
    }

    /// Mark the element as re-laying-out; the spot disappears until the next
    /// [`layout`](Self::layout).
    pub fn invalidate(&self) {
        self.mutate(GeometryRegistry::invalidate);
    }

    /// Re-associate this element with a different set of steps.
    pub fn set_indices(&self, indices: impl Into<StepIndices>) {
        let indices = indices.into();
        self.mutate(move |registry, id| registry.set_indices(id, indices));
    }

    /// Steps this element is attached to.
    #[must_use]
    pub fn indices(&self) -> StepIndices {
        let Some(tour) = self.tour.upgrade() else {
            return StepIndices::default();
        };
        let inner = tour.borrow();
        inner.registry.indices_of(self.id).cloned().unwrap_or_default()
    }

    /// Apply a registry change, re-resolving only if the active step could
    /// see it before or after the change.
    fn mutate(&self, f: impl FnOnce(&mut GeometryRegistry, AttachmentId) -> bool) {
        let Some(inner) = self.tour.upgrade() else {
            return;
        };
        let relevant = {
            let mut tour = inner.borrow_mut();
            let resolver = tour.resolver;
            let active = tour.machine.index();
            let touches = |registry: &GeometryRegistry| {
                active.is_some_and(|index| resolver.affects(registry, self.id, index))
            };
            let before = touches(&tour.registry);
            if !f(&mut tour.registry, self.id) {
                return;
            }
            before || touches(&tour.registry)
        };
        if relevant {
            SpotlightTour { inner }.settle(Vec::new());
        } else {
            trace!(
                target: "spotlight.tour",
                id = self.id.get(),
                "registry change does not reach the active step"
            );
        }
    }
}

impl Drop for Attachment {
    fn drop(&mut self) {
        self.mutate(GeometryRegistry::unregister);
    }
}
