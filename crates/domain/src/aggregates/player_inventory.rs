//! PlayerInventoryState aggregate - the three containers owned by one player
//!
//! # Rustic DDD Design
//!
//! - **Single owner**: every container lives inside this value; collaborators
//!   read it through accessors and mutate it through its methods.
//! - **Identity invariant**: an `InstanceId` appears in at most one slot across
//!   all three containers. Hydration from a snapshot rejects duplicates; every
//!   mutation path either moves an instance or removes it explicitly.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entities::{
    Backpack, Container, ContainerError, ContainerSnapshot, DnaInstance, FixedContainer,
    COMBINATION_SLOTS,
};
use crate::error::DomainError;
use crate::ids::{InstanceId, PlayerId};
use crate::value_objects::{BodyPart, ContainerKind, SlotRef};

/// Why a staged combination could not be consumed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CombinationError {
    #[error("combination is missing DNA for: {missing:?}")]
    Incomplete { missing: Vec<BodyPart> },
}

/// Why an explicit removal was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemovalError {
    #[error(transparent)]
    OutOfRange(#[from] ContainerError),

    #[error("{slot} is empty")]
    EmptySlot { slot: SlotRef },

    #[error("{slot} no longer holds instance {expected}")]
    InstanceMismatch { slot: SlotRef, expected: InstanceId },
}

/// The five instances consumed by a combination, indexed by body part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinationSet {
    parts: [DnaInstance; COMBINATION_SLOTS],
}

impl CombinationSet {
    pub fn part(&self, part: BodyPart) -> &DnaInstance {
        &self.parts[part.slot_index()]
    }

    pub fn into_parts(self) -> [DnaInstance; COMBINATION_SLOTS] {
        self.parts
    }
}

/// Full serializable state pushed to the persistence backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    pub player_id: PlayerId,
    pub inventory: ContainerSnapshot,
    pub combination: ContainerSnapshot,
    pub backpack: ContainerSnapshot,
}

impl InventorySnapshot {
    pub fn container(&self, kind: ContainerKind) -> &ContainerSnapshot {
        match kind {
            ContainerKind::Inventory => &self.inventory,
            ContainerKind::Combination => &self.combination,
            ContainerKind::TemporaryBackpack => &self.backpack,
        }
    }
}

/// Serializes as an [`InventorySnapshot`]; deserializing goes through
/// [`PlayerInventoryState::from_snapshot`] so the invariants are checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "InventorySnapshot", into = "InventorySnapshot")]
pub struct PlayerInventoryState {
    player_id: PlayerId,
    inventory: FixedContainer,
    combination: FixedContainer,
    backpack: Backpack,
}

impl PlayerInventoryState {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Empty containers sized from configuration.
    pub fn new(player_id: PlayerId, inventory_slots: usize, backpack_capacity: usize) -> Self {
        Self {
            player_id,
            inventory: FixedContainer::inventory(inventory_slots),
            combination: FixedContainer::combination(),
            backpack: Backpack::new(backpack_capacity),
        }
    }

    /// Rebuild state from a persisted snapshot.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if a snapshot section has the wrong
    /// kind or shape, or if any instance id appears more than once.
    pub fn from_snapshot(snapshot: InventorySnapshot) -> Result<Self, DomainError> {
        let InventorySnapshot {
            player_id,
            inventory,
            combination,
            backpack,
        } = snapshot;

        for (expected, section) in [
            (ContainerKind::Inventory, &inventory),
            (ContainerKind::Combination, &combination),
            (ContainerKind::TemporaryBackpack, &backpack),
        ] {
            if section.kind != expected {
                return Err(DomainError::validation(format!(
                    "snapshot section {} has kind {}",
                    expected, section.kind
                )));
            }
        }
        if combination.slots.len() != COMBINATION_SLOTS {
            return Err(DomainError::validation(format!(
                "combination must have {} slots, got {}",
                COMBINATION_SLOTS,
                combination.slots.len()
            )));
        }
        if backpack.slots.len() > backpack.capacity {
            return Err(DomainError::validation(format!(
                "backpack holds {} entries but capacity is {}",
                backpack.slots.len(),
                backpack.capacity
            )));
        }

        let mut state = Self::new(player_id, inventory.slots.len(), backpack.capacity);
        for (index, slot) in inventory.slots.into_iter().enumerate() {
            state.inventory.set(index, slot).map_err(to_validation)?;
        }
        for (index, slot) in combination.slots.into_iter().enumerate() {
            state.combination.set(index, slot).map_err(to_validation)?;
        }
        let backpack_len = backpack.slots.len();
        if backpack_len > 0 {
            state.backpack.pad_to(backpack_len - 1).map_err(to_validation)?;
        }
        for (index, slot) in backpack.slots.into_iter().enumerate() {
            state.backpack.set(index, slot).map_err(to_validation)?;
        }

        if let Some(duplicate) = state.first_duplicate() {
            return Err(DomainError::validation(format!(
                "instance {} appears in more than one slot",
                duplicate
            )));
        }
        Ok(state)
    }

    /// Seed an instance at an exact slot (fixtures, scripted sessions).
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the slot is out of range or
    /// occupied, or if the instance already lives elsewhere in this state.
    pub fn with_instance_at(
        mut self,
        slot: SlotRef,
        instance: DnaInstance,
    ) -> Result<Self, DomainError> {
        if let Some(existing) = self.locate(instance.instance_id()) {
            return Err(DomainError::validation(format!(
                "instance {} already placed at {}",
                instance.instance_id(),
                existing
            )));
        }
        if slot.container == ContainerKind::TemporaryBackpack {
            self.backpack.pad_to(slot.index).map_err(to_validation)?;
        }
        let container = self.container_mut(slot.container);
        if container.get(slot.index).map_err(to_validation)?.is_some() {
            return Err(DomainError::validation(format!("{} is occupied", slot)));
        }
        container
            .set(slot.index, Some(instance))
            .map_err(to_validation)?;
        Ok(self)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn player_id(&self) -> PlayerId {
        self.player_id
    }

    #[inline]
    pub fn inventory(&self) -> &FixedContainer {
        &self.inventory
    }

    #[inline]
    pub fn combination(&self) -> &FixedContainer {
        &self.combination
    }

    #[inline]
    pub fn backpack(&self) -> &Backpack {
        &self.backpack
    }

    pub fn container(&self, kind: ContainerKind) -> &dyn Container {
        match kind {
            ContainerKind::Inventory => &self.inventory,
            ContainerKind::Combination => &self.combination,
            ContainerKind::TemporaryBackpack => &self.backpack,
        }
    }

    pub(crate) fn container_mut(&mut self, kind: ContainerKind) -> &mut dyn Container {
        match kind {
            ContainerKind::Inventory => &mut self.inventory,
            ContainerKind::Combination => &mut self.combination,
            ContainerKind::TemporaryBackpack => &mut self.backpack,
        }
    }

    pub(crate) fn backpack_mut(&mut self) -> &mut Backpack {
        &mut self.backpack
    }

    /// The instance at a slot. Out-of-range reads as empty here; use the
    /// container's `get` when the distinction matters.
    pub fn instance_at(&self, slot: SlotRef) -> Option<&DnaInstance> {
        self.container(slot.container)
            .get(slot.index)
            .ok()
            .flatten()
    }

    /// Where an instance currently lives.
    pub fn locate(&self, instance_id: InstanceId) -> Option<SlotRef> {
        ContainerKind::ALL.into_iter().find_map(|kind| {
            self.container(kind)
                .position_of(instance_id)
                .map(|index| SlotRef::new(kind, index))
        })
    }

    /// Every instance id across all containers, in container then slot order.
    pub fn instance_ids(&self) -> Vec<InstanceId> {
        ContainerKind::ALL
            .into_iter()
            .flat_map(|kind| {
                self.container(kind)
                    .instances()
                    .map(DnaInstance::instance_id)
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    pub fn total_instances(&self) -> usize {
        ContainerKind::ALL
            .into_iter()
            .map(|kind| self.container(kind).occupied_count())
            .sum()
    }

    /// First instance id found in more than one slot, if any.
    pub fn first_duplicate(&self) -> Option<InstanceId> {
        let mut seen = HashSet::new();
        self.instance_ids().into_iter().find(|id| !seen.insert(*id))
    }

    /// Occurrence count per instance id.
    pub fn instance_counts(&self) -> HashMap<InstanceId, usize> {
        let mut counts = HashMap::new();
        for id in self.instance_ids() {
            *counts.entry(id).or_insert(0) += 1;
        }
        counts
    }

    pub fn snapshot(&self) -> InventorySnapshot {
        InventorySnapshot {
            player_id: self.player_id,
            inventory: self.inventory.snapshot(),
            combination: self.combination.snapshot(),
            backpack: self.backpack.snapshot(),
        }
    }

    pub fn container_snapshot(&self, kind: ContainerKind) -> ContainerSnapshot {
        self.container(kind).snapshot()
    }

    // =========================================================================
    // Explicit removal paths
    // =========================================================================

    /// Delete the instance at `slot`, provided it is still `expected`.
    ///
    /// This is the only way an instance leaves the state other than
    /// combination consumption.
    pub fn remove_instance(
        &mut self,
        slot: SlotRef,
        expected: InstanceId,
    ) -> Result<DnaInstance, RemovalError> {
        let container = self.container_mut(slot.container);
        match container.get(slot.index)?.map(DnaInstance::instance_id) {
            None => Err(RemovalError::EmptySlot { slot }),
            Some(current) if current != expected => {
                Err(RemovalError::InstanceMismatch { slot, expected })
            }
            Some(_) => container
                .take(slot.index)?
                .ok_or(RemovalError::EmptySlot { slot }),
        }
    }

    /// Remove all five staged instances for synthesis.
    ///
    /// Nothing is removed unless every body-part slot is filled.
    pub fn consume_combination(&mut self) -> Result<CombinationSet, CombinationError> {
        let missing: Vec<BodyPart> = BodyPart::ALL
            .into_iter()
            .filter(|part| self.combination.body_part(*part).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(CombinationError::Incomplete { missing });
        }

        let mut taken = Vec::with_capacity(COMBINATION_SLOTS);
        for part in BodyPart::ALL {
            if let Ok(Some(instance)) = self.combination.take(part.slot_index()) {
                taken.push(instance);
            }
        }
        let parts: [DnaInstance; COMBINATION_SLOTS] =
            taken.try_into().map_err(|_| CombinationError::Incomplete {
                missing: BodyPart::ALL.to_vec(),
            })?;
        Ok(CombinationSet { parts })
    }
}

fn to_validation(err: ContainerError) -> DomainError {
    DomainError::validation(err.to_string())
}

impl TryFrom<InventorySnapshot> for PlayerInventoryState {
    type Error = DomainError;

    fn try_from(snapshot: InventorySnapshot) -> Result<Self, Self::Error> {
        Self::from_snapshot(snapshot)
    }
}

impl From<PlayerInventoryState> for InventorySnapshot {
    fn from(state: PlayerInventoryState) -> Self {
        state.snapshot()
    }
}
