#![forbid(unsafe_code)]

//! Resolve the active step index to a single spotlight geometry.
//!
//! Resolution looks at the registry's claimants for the index and produces
//! either a [`Spot`] or nothing. "Nothing" is a steady state: the element may
//! not be mounted yet, or it may be between layout passes after a rotation.
//! The render layer decides whether to draw a full backdrop or wait.

use crate::geometry::Rect;
use crate::registry::{AttachmentId, GeometryRegistry, Lookup, StepIndices};
use crate::shape::{Cutout, ShapeOptions};

/// How to settle several elements claiming the same step index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ConflictPolicy {
    /// The most recent registration answers for the index.
    #[default]
    LastWriteWins,
    /// Every measured claimant contributes to one bounding rectangle.
    Union,
}

/// Resolved target of the active step.
#[derive(Debug, Clone, PartialEq)]
pub struct Spot {
    /// Step index this spot was resolved for.
    pub index: usize,
    /// Measured bounds of the target element(s).
    pub target: Rect,
    /// Hole to punch into the backdrop.
    pub cutout: Cutout,
    /// Every step index sharing the winning element.
    pub shared_with: StepIndices,
}

/// Stateless resolver over a [`GeometryRegistry`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AttachmentResolver {
    policy: ConflictPolicy,
}

impl AttachmentResolver {
    #[must_use]
    pub const fn new(policy: ConflictPolicy) -> Self {
        Self { policy }
    }

    #[must_use]
    pub const fn policy(&self) -> ConflictPolicy {
        self.policy
    }

    /// Target bounds for `index`, without a shape applied.
    #[must_use]
    pub fn target(&self, registry: &GeometryRegistry, index: usize) -> Option<Rect> {
        match self.policy {
            ConflictPolicy::LastWriteWins => registry.lookup(index).rect(),
            ConflictPolicy::Union => registry
                .claimants(index)
                .filter_map(|(_, rect)| rect)
                .reduce(|acc, rect| acc.union(&rect)),
        }
    }

    /// Full spot for `index`, or `None` when no geometry is available.
    #[must_use]
    pub fn resolve(
        &self,
        registry: &GeometryRegistry,
        index: usize,
        shape: &ShapeOptions,
    ) -> Option<Spot> {
        let target = self.target(registry, index)?;
        Some(Spot {
            index,
            target,
            cutout: shape.cutout(target),
            shared_with: registry.equivalent_indices(index),
        })
    }

    /// Whether a change to `id` can affect what `index` resolves to.
    #[must_use]
    pub fn affects(&self, registry: &GeometryRegistry, id: AttachmentId, index: usize) -> bool {
        match self.policy {
            ConflictPolicy::LastWriteWins => registry.winner(index) == Some(id),
            ConflictPolicy::Union => registry
                .indices_of(id)
                .is_some_and(|indices| indices.contains(index)),
        }
    }

    /// Raw lookup state, for callers that want to tell pending from unattached.
    #[must_use]
    pub fn lookup(&self, registry: &GeometryRegistry, index: usize) -> Lookup {
        match self.policy {
            ConflictPolicy::LastWriteWins => registry.lookup(index),
            ConflictPolicy::Union => match self.target(registry, index) {
                Some(rect) => Lookup::Measured(rect),
                None if registry.winner(index).is_some() => Lookup::Pending,
                None => Lookup::Unattached,
            },
        }
    }
}
