#![forbid(unsafe_code)]

//! Change notification for the render layer and other consumers.
//!
//! # Design
//!
//! Subscribers are stored as `Weak` callbacks; the strong `Rc` lives in the
//! [`Subscription`] guard returned to the caller. Dropping the guard
//! unsubscribes. Dead entries are pruned lazily on the next emit.
//!
//! Events go through a FIFO queue. Only the outermost emit drains it; an
//! emit from inside a listener appends and returns. Consumers therefore see
//! events in the order they were produced, and the last [`TourEvent::SpotChanged`]
//! always describes the current spot. The queue is released before each
//! callback runs, so a subscriber may subscribe, unsubscribe, or drive the
//! tour from inside its callback.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use spotlight_core::Spot;
use tracing::{debug_span, trace};

use crate::machine::{TourState, Transition};

/// Something that changed in the tour.
#[derive(Debug, Clone, PartialEq)]
pub enum TourEvent {
    Started { index: usize },
    StepChanged { from: usize, to: usize },
    Paused { index: usize },
    Resumed { index: usize },
    Stopped(TourState),
    /// The spot for the active step changed. `None` means no geometry is
    /// available (unmeasured, unattached, or the tour is idle).
    SpotChanged(Option<Spot>),
}

impl From<Transition> for TourEvent {
    fn from(transition: Transition) -> Self {
        match transition {
            Transition::Started { index } => Self::Started { index },
            Transition::Moved { from, to } => Self::StepChanged { from, to },
            Transition::Paused { index } => Self::Paused { index },
            Transition::Resumed { index } => Self::Resumed { index },
            Transition::Stopped(state) => Self::Stopped(state),
        }
    }
}

impl TourEvent {
    /// Short name for logging.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Started { .. } => "started",
            Self::StepChanged { .. } => "step_changed",
            Self::Paused { .. } => "paused",
            Self::Resumed { .. } => "resumed",
            Self::Stopped(_) => "stopped",
            Self::SpotChanged(_) => "spot_changed",
        }
    }
}

type ListenerRc = Rc<dyn Fn(&TourEvent)>;
type ListenerWeak = Weak<dyn Fn(&TourEvent)>;

#[derive(Default)]
struct BridgeState {
    listeners: Vec<ListenerWeak>,
    pending: VecDeque<TourEvent>,
    dispatching: bool,
}

/// Fan-out of [`TourEvent`]s. Cloning shares the subscriber list and queue.
#[derive(Clone, Default)]
pub struct EventBridge {
    state: Rc<RefCell<BridgeState>>,
}

impl std::fmt::Debug for EventBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("EventBridge")
            .field("listener_count", &state.listeners.len())
            .field("pending", &state.pending.len())
            .field("dispatching", &state.dispatching)
            .finish()
    }
}

impl EventBridge {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. Keep the returned guard alive for as long as
    /// events should be delivered.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, listener: impl Fn(&TourEvent) + 'static) -> Subscription {
        let strong: ListenerRc = Rc::new(listener);
        self.state
            .borrow_mut()
            .listeners
            .push(Rc::downgrade(&strong));
        Subscription { _guard: strong }
    }

    /// Registered listeners, including dead ones not yet pruned.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.state.borrow().listeners.len()
    }

    /// Whether a drain is in progress further up the stack.
    #[must_use]
    pub fn is_dispatching(&self) -> bool {
        self.state.borrow().dispatching
    }

    /// Deliver events in order to every live listener.
    ///
    /// Called from inside a listener, the events are queued behind the ones
    /// still pending and delivered by the outer call.
    pub fn emit(&self, events: &[TourEvent]) {
        self.enqueue(events.iter().cloned());
        self.flush();
    }

    /// Queue events without delivering them.
    pub(crate) fn enqueue(&self, events: impl IntoIterator<Item = TourEvent>) {
        self.state.borrow_mut().pending.extend(events);
    }

    /// Drain the queue unless a drain is already running.
    pub(crate) fn flush(&self) {
        let queued = {
            let mut state = self.state.borrow_mut();
            if state.dispatching || state.pending.is_empty() {
                return;
            }
            state.dispatching = true;
            state.pending.len()
        };
        let _reset = DispatchReset { state: &self.state };
        let _span = debug_span!(
            target: "spotlight.bridge",
            "spotlight.dispatch",
            queued
        )
        .entered();

        loop {
            let (event, listeners) = {
                let mut state = self.state.borrow_mut();
                let Some(event) = state.pending.pop_front() else {
                    break;
                };
                state.listeners.retain(|weak| weak.strong_count() > 0);
                let listeners: Vec<ListenerRc> =
                    state.listeners.iter().filter_map(Weak::upgrade).collect();
                (event, listeners)
            };
            trace!(
                target: "spotlight.bridge",
                kind = event.kind(),
                listeners = listeners.len(),
                "emit"
            );
            for listener in &listeners {
                listener(&event);
            }
        }
    }
}

/// Clears the dispatching flag even if a listener unwinds.
struct DispatchReset<'a> {
    state: &'a RefCell<BridgeState>,
}

impl Drop for DispatchReset<'_> {
    fn drop(&mut self) {
        self.state.borrow_mut().dispatching = false;
    }
}

/// RAII guard for a bridge listener.
pub struct Subscription {
    _guard: ListenerRc,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
