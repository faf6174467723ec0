//! Container model - bounds-checked slot storage for DNA instances
//!
//! Containers are thin array wrappers. They never validate prior occupancy on
//! write; that belongs to the transfer rules. Out-of-range access fails with
//! [`ContainerError::OutOfRange`] instead of clamping.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entities::DnaInstance;
use crate::ids::InstanceId;
use crate::value_objects::{BodyPart, ContainerKind};

/// Number of combination slots, one per [`BodyPart`].
pub const COMBINATION_SLOTS: usize = 5;

/// A slot either holds an instance or is empty.
pub type Slot = Option<DnaInstance>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContainerError {
    #[error("{container} index {index} is out of range (length {len})")]
    OutOfRange {
        container: ContainerKind,
        index: usize,
        len: usize,
    },

    #[error("{container} is full ({capacity} slots)")]
    Full {
        container: ContainerKind,
        capacity: usize,
    },
}

/// Positional access shared by every container kind.
pub trait Container {
    fn kind(&self) -> ContainerKind;

    /// Current slots, holes included.
    fn slots(&self) -> &[Slot];

    /// Maximum number of slots this container can ever hold.
    fn capacity(&self) -> usize;

    /// Raw positional write. Returns whatever occupied the slot before.
    fn set(&mut self, index: usize, value: Slot) -> Result<Slot, ContainerError>;

    /// First index a new instance could be written to, if any.
    fn first_empty_index(&self) -> Option<usize>;

    /// `Ok(Some)` for an occupied slot, `Ok(None)` for an empty one.
    fn get(&self, index: usize) -> Result<Option<&DnaInstance>, ContainerError> {
        self.slots()
            .get(index)
            .map(Option::as_ref)
            .ok_or_else(|| self.out_of_range(index))
    }

    fn take(&mut self, index: usize) -> Result<Slot, ContainerError> {
        self.set(index, None)
    }

    fn len(&self) -> usize {
        self.slots().len()
    }

    fn is_empty(&self) -> bool {
        self.occupied_count() == 0
    }

    fn occupied_count(&self) -> usize {
        self.slots().iter().filter(|slot| slot.is_some()).count()
    }

    fn is_full(&self) -> bool {
        self.first_empty_index().is_none()
    }

    fn position_of(&self, instance_id: InstanceId) -> Option<usize> {
        self.slots().iter().position(|slot| {
            slot.as_ref()
                .is_some_and(|instance| instance.instance_id() == instance_id)
        })
    }

    fn instances(&self) -> Box<dyn Iterator<Item = &DnaInstance> + '_> {
        Box::new(self.slots().iter().flatten())
    }

    fn snapshot(&self) -> ContainerSnapshot {
        ContainerSnapshot {
            kind: self.kind(),
            capacity: self.capacity(),
            slots: self.slots().to_vec(),
        }
    }

    fn out_of_range(&self, index: usize) -> ContainerError {
        ContainerError::OutOfRange {
            container: self.kind(),
            index,
            len: self.len(),
        }
    }
}

// =============================================================================
// Fixed containers (Inventory, Combination)
// =============================================================================

/// Fixed-length positional container. Its length never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedContainer {
    kind: ContainerKind,
    slots: Vec<Slot>,
}

impl FixedContainer {
    pub fn inventory(slot_count: usize) -> Self {
        Self {
            kind: ContainerKind::Inventory,
            slots: vec![None; slot_count],
        }
    }

    pub fn combination() -> Self {
        Self {
            kind: ContainerKind::Combination,
            slots: vec![None; COMBINATION_SLOTS],
        }
    }

    /// The instance staged for a body part. Only meaningful for combination.
    pub fn body_part(&self, part: BodyPart) -> Option<&DnaInstance> {
        self.slots.get(part.slot_index()).and_then(Option::as_ref)
    }
}

impl Container for FixedContainer {
    fn kind(&self) -> ContainerKind {
        self.kind
    }

    fn slots(&self) -> &[Slot] {
        &self.slots
    }

    fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn set(&mut self, index: usize, value: Slot) -> Result<Slot, ContainerError> {
        let err = self.out_of_range(index);
        let slot = self.slots.get_mut(index).ok_or(err)?;
        Ok(std::mem::replace(slot, value))
    }

    fn first_empty_index(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_none)
    }
}

// =============================================================================
// Temporary backpack
// =============================================================================

/// Bounded, append-oriented overflow list.
///
/// Entries may be emptied in place (holes) without being compacted. The list
/// never grows past `capacity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Backpack {
    slots: Vec<Slot>,
    capacity: usize,
}

impl Backpack {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Append at the end. Fails with `Full` at capacity; holes are not reused.
    pub fn push(&mut self, instance: DnaInstance) -> Result<usize, ContainerError> {
        if self.slots.len() >= self.capacity {
            return Err(ContainerError::Full {
                container: ContainerKind::TemporaryBackpack,
                capacity: self.capacity,
            });
        }
        self.slots.push(Some(instance));
        Ok(self.slots.len() - 1)
    }

    /// Extend with empty entries so that `index` becomes addressable.
    pub fn pad_to(&mut self, index: usize) -> Result<(), ContainerError> {
        if index >= self.capacity {
            return Err(ContainerError::OutOfRange {
                container: ContainerKind::TemporaryBackpack,
                index,
                len: self.capacity,
            });
        }
        if index >= self.slots.len() {
            self.slots.resize(index + 1, None);
        }
        Ok(())
    }

    /// Drop holes while keeping the relative order of the remaining entries.
    pub fn compact(&mut self) {
        self.slots.retain(Option::is_some);
    }

    /// Whether an index is addressable without padding.
    pub fn contains_index(&self, index: usize) -> bool {
        index < self.slots.len()
    }
}

impl Container for Backpack {
    fn kind(&self) -> ContainerKind {
        ContainerKind::TemporaryBackpack
    }

    fn slots(&self) -> &[Slot] {
        &self.slots
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn set(&mut self, index: usize, value: Slot) -> Result<Slot, ContainerError> {
        let err = self.out_of_range(index);
        let slot = self.slots.get_mut(index).ok_or(err)?;
        Ok(std::mem::replace(slot, value))
    }

    /// First hole, else the append position if there is spare capacity.
    ///
    /// A hole left by a deletion or a move out counts as spare capacity, so
    /// overflow placement reuses it before growing the list.
    fn first_empty_index(&self) -> Option<usize> {
        self.slots
            .iter()
            .position(Option::is_none)
            .or_else(|| (self.slots.len() < self.capacity).then_some(self.slots.len()))
    }
}

// =============================================================================
// Snapshots
// =============================================================================

/// Serializable view of one container, handed to render callbacks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerSnapshot {
    pub kind: ContainerKind,
    pub capacity: usize,
    pub slots: Vec<Slot>,
}

impl ContainerSnapshot {
    pub fn instance_ids(&self) -> impl Iterator<Item = InstanceId> + '_ {
        self.slots.iter().flatten().map(DnaInstance::instance_id)
    }
}
