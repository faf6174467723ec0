//! Tokio-backed long-press timer.
//!
//! Turns the classifier's `StartTimer` / `CancelTimer` effects into real
//! sleeps. When a timer elapses it sends `TimerElapsed { generation }` back
//! on the session's event channel. At most one timer is armed at a time.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use dnaforge_domain::GestureEvent;

pub struct LongPressTimer {
    events: mpsc::UnboundedSender<GestureEvent>,
    armed: Option<(u64, JoinHandle<()>)>,
}

impl LongPressTimer {
    pub fn new(events: mpsc::UnboundedSender<GestureEvent>) -> Self {
        Self {
            events,
            armed: None,
        }
    }

    /// Arm a timer, aborting whatever was armed before.
    pub fn arm(&mut self, generation: u64, after: Duration) {
        self.disarm();
        let events = self.events.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(after).await;
            // Receiver gone means the session ended.
            let _ = events.send(GestureEvent::TimerElapsed { generation });
        });
        self.armed = Some((generation, handle));
    }

    /// Cancel the timer if `generation` is the one armed.
    pub fn cancel(&mut self, generation: u64) {
        if self.armed_generation() == Some(generation) {
            self.disarm();
        }
    }

    pub fn disarm(&mut self) {
        if let Some((_, handle)) = self.armed.take() {
            handle.abort();
        }
    }

    pub fn armed_generation(&self) -> Option<u64> {
        self.armed
            .as_ref()
            .filter(|(_, handle)| !handle.is_finished())
            .map(|(generation, _)| *generation)
    }
}

impl Drop for LongPressTimer {
    fn drop(&mut self) {
        self.disarm();
    }
}
