//! Scripted session input.
//!
//! A script is a JSON array of steps replayed against one session, used by
//! the binary to drive the engine without a UI.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use dnaforge_domain::{GestureEvent, SlotRef, TemplateId};

use super::{PlayerSession, SessionError, SessionEvent};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum ScriptStep {
    Gesture { event: GestureEvent },
    /// Let time pass so long-press timers can fire.
    Wait { ms: u64 },
    Acquire { template_id: TemplateId },
    ConfirmDelete,
    DeclineDelete,
    DeleteWithConfirmation { slot: SlotRef },
    ConsumeCombination,
    PickupBackpack,
}

impl PlayerSession {
    pub async fn run_step(&mut self, step: ScriptStep) -> Result<Vec<SessionEvent>, SessionError> {
        match step {
            ScriptStep::Gesture { event } => self.handle(event).await,
            ScriptStep::Wait { ms } => self.wait(Duration::from_millis(ms)).await,
            ScriptStep::Acquire { template_id } => Ok(vec![self.acquire(&template_id).await?]),
            ScriptStep::ConfirmDelete => Ok(vec![self.confirm_pending().await?]),
            ScriptStep::DeclineDelete => Ok(vec![self.decline_pending()?]),
            ScriptStep::DeleteWithConfirmation { slot } => {
                Ok(self.delete_with_confirmation(slot).await?.into_iter().collect())
            }
            ScriptStep::ConsumeCombination => Ok(vec![self.consume_combination().await?]),
            ScriptStep::PickupBackpack => Ok(vec![self.pickup_backpack().await?]),
        }
    }
}
