//! Transfer rules - how one DNA instance moves between containers
//!
//! Every operation here is a pure function of the current
//! [`PlayerInventoryState`]: it computes on a working copy and hands back the
//! new state only if every step succeeded. A rejected move therefore leaves
//! the caller's state untouched, and no path can duplicate or drop an
//! instance.
//!
//! # Overflow resolution
//!
//! When a cross-container drop lands on an occupied slot, the displaced
//! instance is relocated, in order, to:
//!
//! 1. the first empty Inventory slot,
//! 2. the Backpack, if it has spare capacity: an existing hole counts, so the
//!    first hole is reused before appending,
//!
//! and the whole move is rejected with [`TransferError::NoSpaceForDisplaced`]
//! when neither exists. The source slot of the move is still occupied while
//! this runs, so it is never a relocation target. Acquired loot is placed with the same policy.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::aggregates::PlayerInventoryState;
use crate::entities::{Container, ContainerError, DnaInstance};
use crate::ids::InstanceId;
use crate::value_objects::{ContainerKind, SlotRef};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    #[error("nothing to move at {slot}")]
    EmptySource { slot: SlotRef },

    #[error("{slot} is out of range")]
    OutOfRange { slot: SlotRef },

    #[error("no room to relocate displaced instance {displaced}")]
    NoSpaceForDisplaced { displaced: InstanceId },

    #[error("DNA in the temporary backpack must be moved to the inventory before combining")]
    BackpackCannotCombineDirectly,
}

/// Acquired or displaced DNA that found no home. The instance is handed back
/// so the caller decides what happens to it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no free inventory or backpack slot for instance {}", .instance.instance_id())]
pub struct PlacementError {
    pub instance: Box<DnaInstance>,
}

/// What kind of state change a move produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveKind {
    /// Self-drop; nothing changed.
    NoOp,
    /// Swap inside one container.
    Reorder,
    /// Instance crossed from one container to another.
    Transfer,
}

/// Where a displaced instance ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relocation {
    pub instance_id: InstanceId,
    pub to: SlotRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOutcome {
    pub kind: MoveKind,
    pub from: SlotRef,
    pub to: SlotRef,
    pub moved: InstanceId,
    /// Instance that swapped into the source slot during a reorder.
    pub swapped: Option<InstanceId>,
    pub relocated: Option<Relocation>,
    /// Containers whose contents changed, each listed once.
    pub touched: Vec<ContainerKind>,
}

impl MoveOutcome {
    pub fn changed(&self) -> bool {
        self.kind != MoveKind::NoOp
    }
}

/// Result of a bulk backpack pickup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickupOutcome {
    /// `(backpack index before compaction, inventory index, instance)` per move.
    pub moved: Vec<(usize, usize, InstanceId)>,
    /// Instances left in the backpack because the inventory filled up.
    pub remaining: usize,
}

/// Compute the state after moving the instance at `from` onto `to`.
///
/// Returns the new state and an outcome describing the change. On error the
/// input state is the state of record; nothing was mutated.
pub fn move_item(
    state: &PlayerInventoryState,
    from: SlotRef,
    to: SlotRef,
) -> Result<(PlayerInventoryState, MoveOutcome), TransferError> {
    if from.container == ContainerKind::TemporaryBackpack
        && to.container == ContainerKind::Combination
    {
        return Err(TransferError::BackpackCannotCombineDirectly);
    }

    let moved = state
        .container(from.container)
        .get(from.index)
        .map_err(|_| TransferError::OutOfRange { slot: from })?
        .map(DnaInstance::instance_id)
        .ok_or(TransferError::EmptySource { slot: from })?;

    if from == to {
        return Ok((
            state.clone(),
            MoveOutcome {
                kind: MoveKind::NoOp,
                from,
                to,
                moved,
                swapped: None,
                relocated: None,
                touched: Vec::new(),
            },
        ));
    }

    ensure_writable(state, to)?;

    let mut next = state.clone();
    if to.container == ContainerKind::TemporaryBackpack {
        next.backpack_mut()
            .pad_to(to.index)
            .map_err(|_| TransferError::OutOfRange { slot: to })?;
    }

    if from.container == to.container {
        let moving = take_occupied(&mut next, from)?;
        let displaced = write(&mut next, to, Some(moving))?;
        let swapped = displaced.as_ref().map(DnaInstance::instance_id);
        write(&mut next, from, displaced)?;
        return Ok((
            next,
            MoveOutcome {
                kind: MoveKind::Reorder,
                from,
                to,
                moved,
                swapped,
                relocated: None,
                touched: vec![from.container],
            },
        ));
    }

    // The source stays occupied until the displaced instance has a home, so
    // the slot being vacated is never a relocation target.
    let moving = state
        .instance_at(from)
        .cloned()
        .ok_or(TransferError::EmptySource { slot: from })?;
    let displaced = write(&mut next, to, Some(moving))?;

    let relocated = match displaced {
        None => None,
        Some(instance) => {
            let displaced_id = instance.instance_id();
            let slot = place_overflow(&mut next, instance).map_err(|_| {
                TransferError::NoSpaceForDisplaced {
                    displaced: displaced_id,
                }
            })?;
            Some(Relocation {
                instance_id: displaced_id,
                to: slot,
            })
        }
    };

    write(&mut next, from, None)?;

    let mut touched = vec![from.container, to.container];
    if let Some(relocation) = &relocated {
        if !touched.contains(&relocation.to.container) {
            touched.push(relocation.to.container);
        }
    }

    Ok((
        next,
        MoveOutcome {
            kind: MoveKind::Transfer,
            from,
            to,
            moved,
            swapped: None,
            relocated,
            touched,
        },
    ))
}

/// Place an instance using the overflow policy and report where it landed.
///
/// On failure the instance is returned inside the error, untouched.
pub fn place_overflow(
    state: &mut PlayerInventoryState,
    instance: DnaInstance,
) -> Result<SlotRef, PlacementError> {
    if let Some(index) = state.inventory().first_empty_index() {
        let slot = SlotRef::inventory(index);
        return match write(state, slot, Some(instance.clone())) {
            Ok(_) => Ok(slot),
            Err(_) => Err(PlacementError {
                instance: Box::new(instance),
            }),
        };
    }

    if let Some(index) = state.backpack().first_empty_index() {
        let slot = SlotRef::backpack(index);
        if state.backpack_mut().pad_to(index).is_ok()
            && write(state, slot, Some(instance.clone())).is_ok()
        {
            return Ok(slot);
        }
    }

    Err(PlacementError {
        instance: Box::new(instance),
    })
}

/// Move every backpack instance into free inventory slots, in backpack order.
///
/// Each instance is an independent single move; pickup stops when the
/// inventory is full and leaves the rest in the backpack. Holes are compacted
/// afterwards, so remaining entries keep their relative order.
pub fn collect_backpack(state: &PlayerInventoryState) -> (PlayerInventoryState, PickupOutcome) {
    let mut next = state.clone();
    let mut outcome = PickupOutcome::default();

    for index in 0..next.backpack().len() {
        let Some(target) = next.inventory().first_empty_index() else {
            break;
        };
        let Ok(Some(instance)) = next.backpack_mut().take(index) else {
            continue;
        };
        let instance_id = instance.instance_id();
        match write(&mut next, SlotRef::inventory(target), Some(instance)) {
            Ok(_) => outcome.moved.push((index, target, instance_id)),
            Err(_) => return (state.clone(), PickupOutcome::default()),
        }
    }

    next.backpack_mut().compact();
    outcome.remaining = next.backpack().occupied_count();
    (next, outcome)
}

// =============================================================================
// Helpers
// =============================================================================

/// Destination bounds: fixed containers by length, the backpack by capacity.
fn ensure_writable(state: &PlayerInventoryState, slot: SlotRef) -> Result<(), TransferError> {
    let container = state.container(slot.container);
    let limit = match slot.container {
        ContainerKind::Inventory | ContainerKind::Combination => container.len(),
        ContainerKind::TemporaryBackpack => container.capacity(),
    };
    if slot.index < limit {
        Ok(())
    } else {
        Err(TransferError::OutOfRange { slot })
    }
}

fn take_occupied(
    state: &mut PlayerInventoryState,
    slot: SlotRef,
) -> Result<DnaInstance, TransferError> {
    state
        .container_mut(slot.container)
        .take(slot.index)
        .map_err(|_| TransferError::OutOfRange { slot })?
        .ok_or(TransferError::EmptySource { slot })
}

fn write(
    state: &mut PlayerInventoryState,
    slot: SlotRef,
    value: Option<DnaInstance>,
) -> Result<Option<DnaInstance>, TransferError> {
    state
        .container_mut(slot.container)
        .set(slot.index, value)
        .map_err(|err: ContainerError| match err {
            ContainerError::OutOfRange { .. } | ContainerError::Full { .. } => {
                TransferError::OutOfRange { slot }
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{DnaTemplate, COMBINATION_SLOTS};
    use crate::ids::{PlayerId, TemplateId};
    use crate::value_objects::{DnaName, ElementType, Rarity};
    use chrono::Utc;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn dna(label: &str) -> DnaInstance {
        let template = DnaTemplate::new(
            TemplateId::new(format!("dna_{label}")).unwrap(),
            DnaName::new(label).unwrap(),
            ElementType::Fire,
            Rarity::Common,
        );
        DnaInstance::instantiate(&template, Utc::now())
    }

    fn empty_state(inventory: usize, backpack: usize) -> PlayerInventoryState {
        PlayerInventoryState::new(PlayerId::new(), inventory, backpack)
    }

    fn seed(
        mut state: PlayerInventoryState,
        slots: impl IntoIterator<Item = SlotRef>,
    ) -> PlayerInventoryState {
        for slot in slots {
            state = state.with_instance_at(slot, dna("seed")).unwrap();
        }
        state
    }

    fn id_at(state: &PlayerInventoryState, slot: SlotRef) -> Option<InstanceId> {
        state.instance_at(slot).map(DnaInstance::instance_id)
    }

    fn sorted_ids(state: &PlayerInventoryState) -> Vec<InstanceId> {
        let mut ids = state.instance_ids();
        ids.sort_by_key(|id| id.to_uuid());
        ids
    }

    mod scenarios {
        use super::*;

        #[test]
        fn combination_to_empty_inventory_slot() {
            // 10 slots, 9 occupied, slot 9 empty; combination[2] holds X
            let state = seed(empty_state(10, 9), (0..9).map(SlotRef::inventory));
            let x = dna("x");
            let x_id = x.instance_id();
            let state = state.with_instance_at(SlotRef::combination(2), x).unwrap();

            let (next, outcome) =
                move_item(&state, SlotRef::combination(2), SlotRef::inventory(9)).unwrap();

            assert_eq!(id_at(&next, SlotRef::inventory(9)), Some(x_id));
            assert_eq!(id_at(&next, SlotRef::combination(2)), None);
            assert_eq!(outcome.kind, MoveKind::Transfer);
            assert_eq!(outcome.relocated, None);
            assert_eq!(
                outcome.touched,
                vec![ContainerKind::Combination, ContainerKind::Inventory]
            );
        }

        #[test]
        fn displaced_item_overflows_to_backpack_when_inventory_full() {
            let z = dna("z");
            let y = dna("y");
            let (z_id, y_id) = (z.instance_id(), y.instance_id());
            let mut state = empty_state(10, 9);
            for index in (0..10).filter(|i| *i != 3) {
                state = state
                    .with_instance_at(SlotRef::inventory(index), dna("filler"))
                    .unwrap();
            }
            let state = state
                .with_instance_at(SlotRef::inventory(3), z)
                .unwrap()
                .with_instance_at(SlotRef::combination(0), y)
                .unwrap();
            let state = seed(state, [SlotRef::backpack(0), SlotRef::backpack(1)]);

            let (next, outcome) =
                move_item(&state, SlotRef::combination(0), SlotRef::inventory(3)).unwrap();

            assert_eq!(id_at(&next, SlotRef::inventory(3)), Some(y_id));
            assert_eq!(id_at(&next, SlotRef::backpack(2)), Some(z_id));
            assert_eq!(id_at(&next, SlotRef::combination(0)), None);
            assert_eq!(next.backpack().len(), 3);
            assert_eq!(
                outcome.relocated,
                Some(Relocation {
                    instance_id: z_id,
                    to: SlotRef::backpack(2)
                })
            );
            assert!(outcome.touched.contains(&ContainerKind::TemporaryBackpack));
        }

        #[test]
        fn no_space_for_displaced_leaves_everything_unchanged() {
            let state = seed(empty_state(10, 9), (0..10).map(SlotRef::inventory));
            let state = seed(state, (0..9).map(SlotRef::backpack));
            let state = seed(state, [SlotRef::combination(0)]);
            let z_id = id_at(&state, SlotRef::inventory(3)).unwrap();
            let before = state.clone();

            let err =
                move_item(&state, SlotRef::combination(0), SlotRef::inventory(3)).unwrap_err();

            assert_eq!(err, TransferError::NoSpaceForDisplaced { displaced: z_id });
            assert_eq!(state, before);
        }

        #[test]
        fn backpack_cannot_feed_combination() {
            let state = seed(empty_state(10, 9), [SlotRef::backpack(0), SlotRef::backpack(1)]);
            let before = state.clone();

            let err =
                move_item(&state, SlotRef::backpack(1), SlotRef::combination(4)).unwrap_err();

            assert_eq!(err, TransferError::BackpackCannotCombineDirectly);
            assert_eq!(state, before);
        }
    }

    mod same_container {
        use super::*;

        #[test]
        fn self_drop_is_noop() {
            let state = seed(empty_state(4, 4), [SlotRef::inventory(1)]);
            let (next, outcome) =
                move_item(&state, SlotRef::inventory(1), SlotRef::inventory(1)).unwrap();
            assert_eq!(next, state);
            assert_eq!(outcome.kind, MoveKind::NoOp);
            assert!(!outcome.changed());
            assert!(outcome.touched.is_empty());
        }

        #[test]
        fn reorder_swaps_occupants() {
            let state = seed(empty_state(4, 4), [SlotRef::inventory(0), SlotRef::inventory(2)]);
            let a = id_at(&state, SlotRef::inventory(0));
            let b = id_at(&state, SlotRef::inventory(2));

            let (next, outcome) =
                move_item(&state, SlotRef::inventory(0), SlotRef::inventory(2)).unwrap();

            assert_eq!(id_at(&next, SlotRef::inventory(2)), a);
            assert_eq!(id_at(&next, SlotRef::inventory(0)), b);
            assert_eq!(outcome.kind, MoveKind::Reorder);
            assert_eq!(outcome.swapped, b);
            assert_eq!(outcome.touched, vec![ContainerKind::Inventory]);
        }

        #[test]
        fn reorder_into_empty_slot_vacates_source() {
            let state = seed(empty_state(5, 2), [SlotRef::combination(1)]);
            let moved = id_at(&state, SlotRef::combination(1));

            let (next, _) =
                move_item(&state, SlotRef::combination(1), SlotRef::combination(4)).unwrap();

            assert_eq!(id_at(&next, SlotRef::combination(4)), moved);
            assert_eq!(id_at(&next, SlotRef::combination(1)), None);
        }

        #[test]
        fn backpack_move_beyond_length_pads_without_reordering() {
            let state = seed(
                empty_state(2, 6),
                [SlotRef::backpack(0), SlotRef::backpack(1), SlotRef::backpack(2)],
            );
            let ids: Vec<_> = (0..3).map(|i| id_at(&state, SlotRef::backpack(i))).collect();

            let (next, outcome) =
                move_item(&state, SlotRef::backpack(0), SlotRef::backpack(5)).unwrap();

            assert_eq!(outcome.kind, MoveKind::Reorder);
            assert_eq!(next.backpack().len(), 6);
            assert_eq!(id_at(&next, SlotRef::backpack(5)), ids[0]);
            assert_eq!(id_at(&next, SlotRef::backpack(0)), None);
            assert_eq!(id_at(&next, SlotRef::backpack(1)), ids[1]);
            assert_eq!(id_at(&next, SlotRef::backpack(2)), ids[2]);
            assert_eq!(id_at(&next, SlotRef::backpack(3)), None);
        }

        #[test]
        fn backpack_move_beyond_capacity_is_out_of_range() {
            let state = seed(empty_state(2, 3), [SlotRef::backpack(0)]);
            let err = move_item(&state, SlotRef::backpack(0), SlotRef::backpack(3)).unwrap_err();
            assert_eq!(
                err,
                TransferError::OutOfRange {
                    slot: SlotRef::backpack(3)
                }
            );
        }
    }

    mod errors {
        use super::*;

        #[test]
        fn empty_source_is_rejected() {
            let state = empty_state(4, 4);
            let err = move_item(&state, SlotRef::inventory(0), SlotRef::inventory(1)).unwrap_err();
            assert_eq!(
                err,
                TransferError::EmptySource {
                    slot: SlotRef::inventory(0)
                }
            );
        }

        #[test]
        fn empty_source_self_drop_is_still_empty_source() {
            let state = empty_state(4, 4);
            let err = move_item(&state, SlotRef::inventory(2), SlotRef::inventory(2)).unwrap_err();
            assert!(matches!(err, TransferError::EmptySource { .. }));
        }

        #[test]
        fn source_beyond_backpack_length_is_out_of_range() {
            let state = seed(empty_state(4, 9), [SlotRef::backpack(0)]);
            let err = move_item(&state, SlotRef::backpack(3), SlotRef::inventory(0)).unwrap_err();
            assert_eq!(
                err,
                TransferError::OutOfRange {
                    slot: SlotRef::backpack(3)
                }
            );
        }

        #[test]
        fn destination_out_of_range_mutates_nothing() {
            let state = seed(empty_state(4, 4), [SlotRef::inventory(0)]);
            let before = state.clone();
            let err = move_item(
                &state,
                SlotRef::inventory(0),
                SlotRef::combination(COMBINATION_SLOTS),
            )
            .unwrap_err();
            assert!(matches!(err, TransferError::OutOfRange { .. }));
            assert_eq!(state, before);
        }
    }

    mod cross_container {
        use super::*;

        #[test]
        fn inventory_to_combination_with_full_inventory_and_backpack_is_rejected() {
            let state = seed(empty_state(3, 2), (0..3).map(SlotRef::inventory));
            let state = seed(
                state,
                [SlotRef::combination(1), SlotRef::backpack(0), SlotRef::backpack(1)],
            );
            let displaced = id_at(&state, SlotRef::combination(1)).unwrap();
            let before = state.clone();

            let err =
                move_item(&state, SlotRef::inventory(0), SlotRef::combination(1)).unwrap_err();

            assert_eq!(err, TransferError::NoSpaceForDisplaced { displaced });
            assert_eq!(state, before);
        }

        #[test]
        fn inventory_to_combination_relocates_into_backpack_not_source() {
            let state = seed(empty_state(3, 2), (0..3).map(SlotRef::inventory));
            let state = seed(state, [SlotRef::combination(1)]);
            let moving = id_at(&state, SlotRef::inventory(2));
            let displaced = id_at(&state, SlotRef::combination(1)).unwrap();

            let (next, outcome) =
                move_item(&state, SlotRef::inventory(2), SlotRef::combination(1)).unwrap();

            assert_eq!(id_at(&next, SlotRef::combination(1)), moving);
            assert_eq!(id_at(&next, SlotRef::backpack(0)), Some(displaced));
            assert_eq!(id_at(&next, SlotRef::inventory(2)), None);
            assert_eq!(
                outcome.relocated.map(|r| r.to),
                Some(SlotRef::backpack(0))
            );
            assert_eq!(
                outcome.touched,
                vec![
                    ContainerKind::Inventory,
                    ContainerKind::Combination,
                    ContainerKind::TemporaryBackpack
                ]
            );
        }

        #[test]
        fn displaced_prefers_first_empty_inventory_slot() {
            let state = seed(
                empty_state(4, 2),
                [SlotRef::inventory(0), SlotRef::inventory(2), SlotRef::combination(3)],
            );
            let displaced = id_at(&state, SlotRef::inventory(2)).unwrap();

            let (next, _) =
                move_item(&state, SlotRef::combination(3), SlotRef::inventory(2)).unwrap();

            assert_eq!(id_at(&next, SlotRef::inventory(1)), Some(displaced));
        }

        #[test]
        fn backpack_to_inventory_with_both_full_is_rejected() {
            let state = seed(empty_state(2, 2), (0..2).map(SlotRef::inventory));
            let state = seed(state, [SlotRef::backpack(0), SlotRef::backpack(1)]);
            let displaced = id_at(&state, SlotRef::inventory(1)).unwrap();
            let before = state.clone();

            let err = move_item(&state, SlotRef::backpack(0), SlotRef::inventory(1)).unwrap_err();

            assert_eq!(err, TransferError::NoSpaceForDisplaced { displaced });
            assert_eq!(state, before);
        }

        #[test]
        fn backpack_to_full_inventory_appends_displaced_then_clears_source() {
            let state = seed(empty_state(2, 3), (0..2).map(SlotRef::inventory));
            let state = seed(state, [SlotRef::backpack(0), SlotRef::backpack(1)]);
            let moving = id_at(&state, SlotRef::backpack(0));
            let displaced = id_at(&state, SlotRef::inventory(1));

            let (next, _) =
                move_item(&state, SlotRef::backpack(0), SlotRef::inventory(1)).unwrap();

            assert_eq!(id_at(&next, SlotRef::inventory(1)), moving);
            assert_eq!(id_at(&next, SlotRef::backpack(2)), displaced);
            assert_eq!(id_at(&next, SlotRef::backpack(0)), None);
            assert_eq!(next.backpack().len(), 3);
        }

        #[test]
        fn inventory_to_backpack_beyond_length_pads() {
            let state = seed(empty_state(2, 5), [SlotRef::inventory(0), SlotRef::backpack(0)]);
            let moving = id_at(&state, SlotRef::inventory(0));

            let (next, _) =
                move_item(&state, SlotRef::inventory(0), SlotRef::backpack(3)).unwrap();

            assert_eq!(next.backpack().len(), 4);
            assert_eq!(id_at(&next, SlotRef::backpack(3)), moving);
            assert_eq!(id_at(&next, SlotRef::inventory(0)), None);
        }

        #[test]
        fn swap_symmetry_without_overflow() {
            let state = seed(empty_state(4, 4), [SlotRef::inventory(1), SlotRef::backpack(0)]);

            let (there, first) =
                move_item(&state, SlotRef::inventory(1), SlotRef::combination(3)).unwrap();
            assert_eq!(first.relocated, None);
            let (back, _) =
                move_item(&there, SlotRef::combination(3), SlotRef::inventory(1)).unwrap();

            assert_eq!(back, state);
        }
    }

    mod placement {
        use super::*;

        #[test]
        fn fills_inventory_before_backpack() {
            let mut state = seed(empty_state(2, 2), [SlotRef::inventory(0)]);
            assert_eq!(place_overflow(&mut state, dna("a")), Ok(SlotRef::inventory(1)));
            assert_eq!(place_overflow(&mut state, dna("b")), Ok(SlotRef::backpack(0)));
            assert_eq!(place_overflow(&mut state, dna("c")), Ok(SlotRef::backpack(1)));
        }

        #[test]
        fn reuses_backpack_hole_before_appending() {
            let state = seed(
                empty_state(0, 3),
                [SlotRef::backpack(0), SlotRef::backpack(1)],
            );
            let hole = id_at(&state, SlotRef::backpack(0)).unwrap();
            let mut state = state;
            state
                .remove_instance(SlotRef::backpack(0), hole)
                .unwrap();

            assert_eq!(place_overflow(&mut state, dna("a")), Ok(SlotRef::backpack(0)));
            assert_eq!(state.backpack().len(), 2);
        }

        #[test]
        fn unplaceable_instance_is_handed_back() {
            let mut state = seed(empty_state(1, 1), [SlotRef::inventory(0), SlotRef::backpack(0)]);
            let loot = dna("loot");
            let loot_id = loot.instance_id();
            let before = state.clone();

            let err = place_overflow(&mut state, loot).unwrap_err();

            assert_eq!(err.instance.instance_id(), loot_id);
            assert_eq!(state, before);
        }
    }

    mod pickup {
        use super::*;

        #[test]
        fn collects_in_backpack_order_until_inventory_full() {
            let state = seed(empty_state(3, 5), [SlotRef::inventory(1)]);
            let state = seed(
                state,
                [SlotRef::backpack(0), SlotRef::backpack(2), SlotRef::backpack(3)],
            );
            let first = id_at(&state, SlotRef::backpack(0)).unwrap();
            let second = id_at(&state, SlotRef::backpack(2)).unwrap();
            let left = id_at(&state, SlotRef::backpack(3)).unwrap();

            let (next, outcome) = collect_backpack(&state);

            assert_eq!(outcome.moved, vec![(0, 0, first), (2, 2, second)]);
            assert_eq!(outcome.remaining, 1);
            assert_eq!(next.backpack().len(), 1);
            assert_eq!(id_at(&next, SlotRef::backpack(0)), Some(left));
            assert_eq!(sorted_ids(&next), sorted_ids(&state));
        }

        #[test]
        fn empty_backpack_is_noop() {
            let state = empty_state(3, 3);
            let (next, outcome) = collect_backpack(&state);
            assert_eq!(next, state);
            assert!(outcome.moved.is_empty());
        }
    }

    mod properties {
        use super::*;

        fn random_slot(rng: &mut StdRng, state: &PlayerInventoryState) -> SlotRef {
            match rng.gen_range(0..3) {
                0 => SlotRef::inventory(rng.gen_range(0..state.inventory().len() + 1)),
                1 => SlotRef::combination(rng.gen_range(0..COMBINATION_SLOTS + 1)),
                _ => SlotRef::backpack(rng.gen_range(0..state.backpack().capacity() + 1)),
            }
        }

        #[test]
        fn random_move_sequences_conserve_instances() {
            for seed_value in 0..20u64 {
                let mut rng = StdRng::seed_from_u64(seed_value);
                let mut state = seed(empty_state(6, 4), (0..5).map(SlotRef::inventory));
                state = seed(state, [SlotRef::combination(0), SlotRef::backpack(0)]);
                let expected = sorted_ids(&state);

                for _ in 0..200 {
                    let from = random_slot(&mut rng, &state);
                    let to = random_slot(&mut rng, &state);
                    match move_item(&state, from, to) {
                        Ok((next, _)) => state = next,
                        Err(_) => continue,
                    }
                    assert_eq!(sorted_ids(&state), expected);
                    assert_eq!(state.first_duplicate(), None);
                    assert!(state.backpack().len() <= state.backpack().capacity());
                    assert_eq!(state.inventory().len(), 6);
                    assert_eq!(state.combination().len(), COMBINATION_SLOTS);
                }
            }
        }

        #[test]
        fn rejected_moves_never_change_state() {
            let mut rng = StdRng::seed_from_u64(7);
            let state = seed(empty_state(3, 2), (0..3).map(SlotRef::inventory));
            let state = seed(state, [SlotRef::backpack(0), SlotRef::backpack(1)]);
            let state = seed(state, (0..COMBINATION_SLOTS).map(SlotRef::combination));

            for _ in 0..200 {
                let from = random_slot(&mut rng, &state);
                let to = random_slot(&mut rng, &state);
                let before = state.clone();
                if move_item(&state, from, to).is_err() {
                    assert_eq!(state, before);
                }
            }
        }
    }
}
