#![forbid(unsafe_code)]

//! Keyed registry of measured attachment geometry.
//!
//! Every attaching element owns one [`AttachmentId`]. A registration claims
//! one or more step indices and carries the element's last measured
//! [`Rect`], or nothing until the first layout pass lands.
//!
//! # Invariants
//!
//! 1. For every step index, claimants are kept in registration order and the
//!    most recent surviving claimant wins. Re-associating indices counts as a
//!    fresh registration.
//! 2. `claims` never references an id that is absent from `entries`, and an
//!    entry's indices always match the claim lists it appears in.
//! 3. `version` increments by exactly 1 on each mutation that changes what a
//!    lookup could observe.

use ahash::AHashMap;
use smallvec::SmallVec;
use tracing::trace;

use crate::geometry::Rect;

/// Opaque key for a single attaching element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttachmentId(u64);

impl AttachmentId {
    /// Raw numeric value, useful for logging.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Normalized set of step indices an element is attached to.
///
/// Sorted and deduplicated on construction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StepIndices(SmallVec<[usize; 4]>);

impl StepIndices {
    /// Build from any iterator of indices.
    pub fn new(indices: impl IntoIterator<Item = usize>) -> Self {
        let mut inner: SmallVec<[usize; 4]> = indices.into_iter().collect();
        inner.sort_unstable();
        inner.dedup();
        Self(inner)
    }

    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.0.binary_search(&index).is_ok()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }
}

impl From<usize> for StepIndices {
    fn from(index: usize) -> Self {
        Self::new([index])
    }
}

impl<const N: usize> From<[usize; N]> for StepIndices {
    fn from(indices: [usize; N]) -> Self {
        Self::new(indices)
    }
}

impl From<&[usize]> for StepIndices {
    fn from(indices: &[usize]) -> Self {
        Self::new(indices.iter().copied())
    }
}

impl From<Vec<usize>> for StepIndices {
    fn from(indices: Vec<usize>) -> Self {
        Self::new(indices)
    }
}

/// Result of looking up geometry for a step index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup {
    /// The winning claimant has a measured rectangle.
    Measured(Rect),
    /// An element claims the index but has not been measured yet.
    Pending,
    /// No mounted element claims the index.
    Unattached,
}

impl Lookup {
    /// The measured rectangle, if any.
    #[must_use]
    pub fn rect(self) -> Option<Rect> {
        match self {
            Self::Measured(rect) => Some(rect),
            Self::Pending | Self::Unattached => None,
        }
    }
}

#[derive(Debug, Clone)]
struct Registration {
    indices: StepIndices,
    rect: Option<Rect>,
}

/// Arena of attachment registrations keyed by [`AttachmentId`].
#[derive(Debug, Default)]
pub struct GeometryRegistry {
    entries: AHashMap<AttachmentId, Registration>,
    /// Step index -> claimants, oldest first.
    claims: AHashMap<usize, SmallVec<[AttachmentId; 2]>>,
    next_id: u64,
    version: u64,
}

impl GeometryRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a newly mounted element. It has no geometry until
    /// [`update_layout`](Self::update_layout) is called.
    pub fn register(&mut self, indices: impl Into<StepIndices>) -> AttachmentId {
        let indices = indices.into();
        let id = AttachmentId(self.next_id);
        self.next_id += 1;

        self.claim(id, &indices);
        trace!(
            target: "spotlight.registry",
            id = id.0,
            indices = ?indices.as_slice(),
            "attachment registered"
        );
        self.entries.insert(
            id,
            Registration {
                indices,
                rect: None,
            },
        );
        self.version += 1;
        id
    }

    /// Store a fresh layout measurement.
    ///
    /// A non-finite rectangle is treated as an invalidation and leaves the
    /// registration pending. Returns `true` if the stored geometry changed.
    pub fn update_layout(&mut self, id: AttachmentId, rect: Rect) -> bool {
        let rect = rect.is_finite().then_some(rect);
        let Some(entry) = self.entries.get_mut(&id) else {
            return false;
        };
        if entry.rect == rect {
            return false;
        }
        entry.rect = rect;
        self.version += 1;
        trace!(
            target: "spotlight.registry",
            id = id.0,
            rect = ?rect,
            "attachment layout updated"
        );
        true
    }

    /// Forget the measured geometry while a re-layout is in flight.
    ///
    /// Returns `true` if the registration previously had geometry.
    pub fn invalidate(&mut self, id: AttachmentId) -> bool {
        let Some(entry) = self.entries.get_mut(&id) else {
            return false;
        };
        if entry.rect.take().is_none() {
            return false;
        }
        self.version += 1;
        true
    }

    /// Re-associate an element with a new set of indices.
    ///
    /// Old claims are released and new ones taken in one step, so no stale
    /// mapping survives. The measured geometry is kept since it still
    /// describes the same element.
    pub fn set_indices(&mut self, id: AttachmentId, indices: impl Into<StepIndices>) -> bool {
        let indices = indices.into();
        let Some(old) = self.entries.get(&id).map(|entry| entry.indices.clone()) else {
            return false;
        };
        if old == indices {
            return false;
        }
        self.release(id, &old);
        self.claim(id, &indices);
        if let Some(entry) = self.entries.get_mut(&id) {
            entry.indices = indices;
        }
        self.version += 1;
        true
    }

    /// Remove a registration. Returns `true` if it existed.
    pub fn unregister(&mut self, id: AttachmentId) -> bool {
        let Some(entry) = self.entries.remove(&id) else {
            return false;
        };
        self.release(id, &entry.indices);
        self.version += 1;
        trace!(target: "spotlight.registry", id = id.0, "attachment unregistered");
        true
    }

    /// Geometry for a step index under last-write-wins.
    #[must_use]
    pub fn lookup(&self, index: usize) -> Lookup {
        match self.winner(index).and_then(|id| self.entries.get(&id)) {
            Some(Registration {
                rect: Some(rect), ..
            }) => Lookup::Measured(*rect),
            Some(_) => Lookup::Pending,
            None => Lookup::Unattached,
        }
    }

    /// The registration currently answering for `index`.
    #[must_use]
    pub fn winner(&self, index: usize) -> Option<AttachmentId> {
        self.claims.get(&index).and_then(|ids| ids.last().copied())
    }

    /// Every claimant of `index` with its geometry, newest first.
    pub fn claimants(&self, index: usize) -> impl Iterator<Item = (AttachmentId, Option<Rect>)> + '_ {
        self.claims
            .get(&index)
            .into_iter()
            .flat_map(|ids| ids.iter().rev())
            .filter_map(|id| self.entries.get(id).map(|entry| (*id, entry.rect)))
    }

    /// Step indices that share the winning element for `index`.
    ///
    /// Empty if nothing is attached.
    #[must_use]
    pub fn equivalent_indices(&self, index: usize) -> StepIndices {
        self.winner(index)
            .and_then(|id| self.entries.get(&id))
            .map(|entry| entry.indices.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn indices_of(&self, id: AttachmentId) -> Option<&StepIndices> {
        self.entries.get(&id).map(|entry| &entry.indices)
    }

    #[must_use]
    pub fn contains(&self, id: AttachmentId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Number of live registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Mutation counter for dirty-checking.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    fn claim(&mut self, id: AttachmentId, indices: &StepIndices) {
        for index in indices.iter() {
            self.claims.entry(index).or_default().push(id);
        }
    }

    fn release(&mut self, id: AttachmentId, indices: &StepIndices) {
        for index in indices.iter() {
            if let Some(ids) = self.claims.get_mut(&index) {
                ids.retain(|claimant| *claimant != id);
                if ids.is_empty() {
                    self.claims.remove(&index);
                }
            }
        }
    }
}
