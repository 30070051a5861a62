#![forbid(unsafe_code)]

//! Property tests for [`GeometryRegistry`] invariants.
//!
//! Validates:
//! - Lookups always agree with a naive last-write-wins model.
//! - Unregistering never leaves a stale winner behind.
//! - Re-associating indices never leaves the old indices claimed.

use proptest::prelude::*;

use spotlight_core::{AttachmentId, GeometryRegistry, Lookup, Rect};

const MAX_INDEX: usize = 6;

#[derive(Debug, Clone)]
enum Op {
    Register(Vec<usize>),
    Layout(usize, f32),
    Reindex(usize, Vec<usize>),
    Unregister(usize),
}

fn indices_strategy() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(0..MAX_INDEX, 1..4)
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => indices_strategy().prop_map(Op::Register),
        3 => (any::<usize>(), 1.0f32..100.0).prop_map(|(slot, size)| Op::Layout(slot, size)),
        2 => (any::<usize>(), indices_strategy()).prop_map(|(slot, idx)| Op::Reindex(slot, idx)),
        2 => any::<usize>().prop_map(Op::Unregister),
    ]
}

/// Naive model: registration order list of (id, indices, rect).
#[derive(Default)]
struct Model {
    live: Vec<(AttachmentId, Vec<usize>, Option<Rect>)>,
}

impl Model {
    fn lookup(&self, index: usize) -> Lookup {
        match self.live.iter().rev().find(|(_, idx, _)| idx.contains(&index)) {
            Some((_, _, Some(rect))) => Lookup::Measured(*rect),
            Some((_, _, None)) => Lookup::Pending,
            None => Lookup::Unattached,
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn lookup_matches_last_write_wins_model(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let mut registry = GeometryRegistry::new();
        let mut model = Model::default();

        for op in ops {
            match op {
                Op::Register(indices) => {
                    let id = registry.register(indices.clone());
                    model.live.push((id, indices, None));
                }
                Op::Layout(slot, size) => {
                    if model.live.is_empty() { continue; }
                    let slot = slot % model.live.len();
                    let rect = Rect::new(size, size, size, size);
                    registry.update_layout(model.live[slot].0, rect);
                    model.live[slot].2 = Some(rect);
                }
                Op::Reindex(slot, indices) => {
                    if model.live.is_empty() { continue; }
                    let slot = slot % model.live.len();
                    let mut entry = model.live.remove(slot);
                    let mut normalized = indices.clone();
                    normalized.sort_unstable();
                    normalized.dedup();
                    let mut current = entry.1.clone();
                    current.sort_unstable();
                    current.dedup();
                    registry.set_indices(entry.0, indices.clone());
                    if normalized == current {
                        // Unchanged sets keep their registration order.
                        model.live.insert(slot, entry);
                    } else {
                        entry.1 = indices;
                        model.live.push(entry);
                    }
                }
                Op::Unregister(slot) => {
                    if model.live.is_empty() { continue; }
                    let slot = slot % model.live.len();
                    let (id, _, _) = model.live.remove(slot);
                    prop_assert!(registry.unregister(id));
                }
            }

            prop_assert_eq!(registry.len(), model.live.len());
            for index in 0..MAX_INDEX {
                prop_assert_eq!(registry.lookup(index), model.lookup(index));
            }
        }
    }

    #[test]
    fn unregistering_everything_leaves_nothing_attached(
        sets in prop::collection::vec(indices_strategy(), 1..20)
    ) {
        let mut registry = GeometryRegistry::new();
        let ids: Vec<_> = sets.into_iter().map(|set| registry.register(set)).collect();
        for id in ids {
            registry.unregister(id);
        }
        prop_assert!(registry.is_empty());
        for index in 0..MAX_INDEX {
            prop_assert_eq!(registry.lookup(index), Lookup::Unattached);
            prop_assert!(registry.winner(index).is_none());
        }
    }
}
