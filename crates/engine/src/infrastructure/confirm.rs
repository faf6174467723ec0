//! Headless confirmation: answers every prompt the same way.

use async_trait::async_trait;

use crate::infrastructure::ports::{ConfirmationPort, ConfirmationPrompt};

#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm {
    accept: bool,
}

impl AutoConfirm {
    pub fn accepting() -> Self {
        Self { accept: true }
    }

    pub fn declining() -> Self {
        Self { accept: false }
    }
}

#[async_trait]
impl ConfirmationPort for AutoConfirm {
    async fn confirm(&self, prompt: &ConfirmationPrompt) -> bool {
        tracing::info!(
            slot = %prompt.slot,
            instance_id = %prompt.instance_id,
            accepted = self.accept,
            "{}",
            prompt.message()
        );
        self.accept
    }
}
