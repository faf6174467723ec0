//! Port traits for infrastructure boundaries.
//!
//! Ports exist for:
//! - Persistence (HTTP backend, in-memory store)
//! - Rendering (whatever draws containers)
//! - Confirmation (the modal that guards deletion)
//! - Clock (for testing)

mod error;
mod external;
mod testing;

// =============================================================================
// External Service Ports
// =============================================================================
pub use external::{
    ConfirmationPort, ConfirmationPrompt, FlushRequest, PersistencePort, RenderPort,
};

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use external::{MockConfirmationPort, MockPersistencePort, MockRenderPort};

#[cfg(test)]
pub use testing::MockClockPort;

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::ClockPort;

// =============================================================================
// Error Types
// =============================================================================
pub use error::PersistenceError;
