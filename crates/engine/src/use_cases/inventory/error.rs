//! Inventory operation errors.

use dnaforge_domain::{CombinationError, DomainError, InstanceId, TemplateId, TransferError};

use crate::use_cases::sync::SyncError;

/// Errors that can occur during inventory operations.
#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    #[error("Move rejected: {0}")]
    Transfer(#[from] TransferError),
    #[error("Catalog error: {0}")]
    Catalog(#[from] DomainError),
    #[error("No free slot for acquired {template_id} ({instance_id})")]
    Unplaceable {
        template_id: TemplateId,
        instance_id: InstanceId,
    },
    #[error("Combination error: {0}")]
    Combination(#[from] CombinationError),
    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),
}
