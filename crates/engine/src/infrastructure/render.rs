//! Renderer that draws nothing and logs every redraw.

use dnaforge_domain::{ContainerKind, ContainerSnapshot};

use crate::infrastructure::ports::RenderPort;

#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingRenderer;

impl LoggingRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl RenderPort for LoggingRenderer {
    fn render(&self, kind: ContainerKind, snapshot: &ContainerSnapshot) {
        let occupied = snapshot.slots.iter().filter(|slot| slot.is_some()).count();
        let layout: Vec<String> = snapshot
            .slots
            .iter()
            .map(|slot| match slot {
                Some(dna) => dna.name().to_string(),
                None => "-".to_string(),
            })
            .collect();
        tracing::info!(
            container = %kind,
            occupied,
            len = snapshot.slots.len(),
            capacity = snapshot.capacity,
            slots = ?layout,
            "Render container"
        );
    }
}
