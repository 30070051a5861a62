#![forbid(unsafe_code)]

//! Tour state machine.
//!
//! Pure, deterministic bookkeeping of the active step index and run status.
//! Every operation is first *planned* into a [`Transition`] without touching
//! state, then *applied*. The split lets the shared handle run user hooks
//! between the two without holding a borrow.
//!
//! # Invariants
//!
//! 1. `index` is `Some(i)` with `i < len` iff `status != Idle`.
//! 2. Every [`Op`] is defined for every status; undefined combinations plan
//!    to `None` (no-op).
//! 3. `revision` increments by exactly 1 per applied transition.
//! 4. A tour over zero steps never leaves `Idle`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Run status of a tour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TourStatus {
    #[default]
    Idle,
    Running,
    Paused,
}

impl TourStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Paused => "paused",
        }
    }

    /// Running or paused.
    #[must_use]
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Idle)
    }
}

impl fmt::Display for TourStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot delivered on stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TourState {
    pub index: usize,
    pub is_last: bool,
}

/// A requested operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Start,
    Next,
    Previous,
    GoTo(usize),
    Pause,
    Resume,
    Stop,
}

/// A planned (and later applied) state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Started { index: usize },
    Moved { from: usize, to: usize },
    Paused { index: usize },
    Resumed { index: usize },
    Stopped(TourState),
}

impl Transition {
    /// The step index this transition makes active, if it enters a step.
    ///
    /// `Resumed` re-shows the same step and does not count.
    #[must_use]
    pub const fn entered(&self) -> Option<usize> {
        match *self {
            Self::Started { index } => Some(index),
            Self::Moved { to, .. } => Some(to),
            Self::Paused { .. } | Self::Resumed { .. } | Self::Stopped(_) => None,
        }
    }
}

/// The authoritative index/status holder.
#[derive(Debug, Clone, Default)]
pub struct TourStateMachine {
    len: usize,
    index: Option<usize>,
    status: TourStatus,
    revision: u64,
}

impl TourStateMachine {
    /// Machine over `len` steps, idle.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            len,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Change the step count. Only honored while idle, since a running tour
    /// keeps the list it started with. Returns `true` if applied.
    pub fn set_len(&mut self, len: usize) -> bool {
        if self.status.is_active() {
            return false;
        }
        self.len = len;
        true
    }

    #[must_use]
    pub fn status(&self) -> TourStatus {
        self.status
    }

    /// Active index, `None` while idle.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Active index as a signed value, `-1` while idle.
    #[must_use]
    pub fn current(&self) -> isize {
        self.index
            .and_then(|index| isize::try_from(index).ok())
            .unwrap_or(-1)
    }

    /// Snapshot of the active step, `None` while idle.
    #[must_use]
    pub fn state(&self) -> Option<TourState> {
        self.index.map(|index| TourState {
            index,
            is_last: index + 1 == self.len,
        })
    }

    /// Applied-transition counter.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Compute what `op` would do, without changing anything.
    #[must_use]
    pub fn plan(&self, op: Op) -> Option<Transition> {
        match (op, self.status, self.index) {
            (Op::Start, TourStatus::Idle, _) if self.len > 0 => {
                Some(Transition::Started { index: 0 })
            }
            (Op::Next, TourStatus::Running, Some(index)) => {
                if index + 1 >= self.len {
                    self.plan(Op::Stop)
                } else {
                    Some(Transition::Moved {
                        from: index,
                        to: index + 1,
                    })
                }
            }
            (Op::Previous, TourStatus::Running, Some(index)) if index > 0 => {
                Some(Transition::Moved {
                    from: index,
                    to: index - 1,
                })
            }
            (Op::GoTo(to), TourStatus::Running | TourStatus::Paused, Some(from))
                if to < self.len =>
            {
                if from == to && self.status == TourStatus::Paused {
                    Some(Transition::Resumed { index: from })
                } else if from == to {
                    None
                } else {
                    Some(Transition::Moved { from, to })
                }
            }
            (Op::Pause, TourStatus::Running, Some(index)) => Some(Transition::Paused { index }),
            (Op::Resume, TourStatus::Paused, Some(index)) => Some(Transition::Resumed { index }),
            (Op::Stop, TourStatus::Running | TourStatus::Paused, Some(_)) => {
                self.state().map(Transition::Stopped)
            }
            _ => None,
        }
    }

    /// Commit a planned transition.
    pub fn apply(&mut self, transition: &Transition) {
        match *transition {
            Transition::Started { index } | Transition::Moved { to: index, .. } => {
                self.index = Some(index);
                self.status = TourStatus::Running;
            }
            Transition::Paused { .. } => self.status = TourStatus::Paused,
            Transition::Resumed { .. } => self.status = TourStatus::Running,
            Transition::Stopped(_) => {
                self.index = None;
                self.status = TourStatus::Idle;
            }
        }
        self.revision += 1;
    }

    /// Plan and apply in one step.
    pub fn dispatch(&mut self, op: Op) -> Option<Transition> {
        let transition = self.plan(op)?;
        self.apply(&transition);
        Some(transition)
    }

    pub fn start(&mut self) -> Option<Transition> {
        self.dispatch(Op::Start)
    }

    pub fn next(&mut self) -> Option<Transition> {
        self.dispatch(Op::Next)
    }

    pub fn previous(&mut self) -> Option<Transition> {
        self.dispatch(Op::Previous)
    }

    pub fn go_to(&mut self, index: usize) -> Option<Transition> {
        self.dispatch(Op::GoTo(index))
    }

    pub fn pause(&mut self) -> Option<Transition> {
        self.dispatch(Op::Pause)
    }

    pub fn resume(&mut self) -> Option<Transition> {
        self.dispatch(Op::Resume)
    }

    pub fn stop(&mut self) -> Option<Transition> {
        self.dispatch(Op::Stop)
    }
}
