//! Gesture classifier - turns raw pointer events into inventory intents
//!
//! The classifier is a pure state machine. It never sleeps or schedules work
//! itself: long-press timing is expressed as [`GestureEffect::StartTimer`] /
//! [`GestureEffect::CancelTimer`] effects carrying a generation number, and the
//! driver feeds back [`GestureEvent::TimerElapsed`] with that generation.
//! Only the live generation is honored, so a timer left over from an earlier
//! press can never promote a later press into jiggle mode.
//!
//! ```text
//!   Idle ──down(occupied)──▶ PressPending ──move>threshold / drag──▶ Dragging
//!    ▲                          │    │                                 │
//!    │◀──────────up─────────────┘    └──timer──▶ JiggleMode ──drag──────┘
//!    │◀──────────────── drop / cancel / outside click ─────────────────┘
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::value_objects::SlotRef;

/// Default hold time before a press enters jiggle mode.
pub const DEFAULT_LONG_PRESS: Duration = Duration::from_millis(500);

/// Default pointer travel (in CSS pixels) that turns a press into a drag.
pub const DEFAULT_DRAG_THRESHOLD_PX: f32 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureConfig {
    pub long_press: Duration,
    pub drag_threshold_px: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            long_press: DEFAULT_LONG_PRESS,
            drag_threshold_px: DEFAULT_DRAG_THRESHOLD_PX,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    fn distance(&self, other: Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Raw input, already hit-tested against slots by the UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GestureEvent {
    PointerDown {
        slot: SlotRef,
        occupied: bool,
        #[serde(default)]
        at: Point,
    },
    PointerMove {
        at: Point,
    },
    /// `slot` is the slot under the pointer on release, if any.
    PointerUp {
        slot: Option<SlotRef>,
    },
    /// Native drag-start fired for the pressed slot.
    DragStart,
    /// `target` is `None` when released over something that is not a slot.
    Drop {
        target: Option<SlotRef>,
    },
    DragCancel,
    TimerElapsed {
        generation: u64,
    },
    OutsideClick,
    Cancel,
    /// The delete badge of a jiggling slot was pressed.
    DeleteAffordance {
        slot: SlotRef,
    },
}

/// What the driver must do in response to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureEffect {
    StartTimer { generation: u64, after: Duration },
    CancelTimer { generation: u64 },
    DragBegan { origin: SlotRef },
    /// Hand a move to the transfer rules.
    Move { from: SlotRef, to: SlotRef },
    TapSelected { slot: SlotRef },
    TapCleared,
    EnteredJiggle,
    ExitedJiggle,
    RequestDelete { slot: SlotRef },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Press {
    pub origin: SlotRef,
    pub start: Point,
    pub occupied: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    PressPending {
        press: Press,
        /// Live long-press timer; empty-slot presses have none.
        timer: Option<u64>,
    },
    Dragging {
        origin: SlotRef,
    },
    JiggleMode {
        press: Option<Press>,
    },
}

/// One player's gesture session.
#[derive(Debug, Clone, Default)]
pub struct GestureClassifier {
    config: GestureConfig,
    state: GestureState,
    pending_tap: Option<SlotRef>,
    next_generation: u64,
}

impl GestureClassifier {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    /// Slot remembered by a first tap, awaiting a second tap.
    pub fn pending_tap(&self) -> Option<SlotRef> {
        self.pending_tap
    }

    pub fn is_jiggling(&self) -> bool {
        matches!(self.state, GestureState::JiggleMode { .. })
    }

    /// Generation of the timer the classifier is currently waiting on.
    pub fn live_timer(&self) -> Option<u64> {
        match self.state {
            GestureState::PressPending { timer, .. } => timer,
            _ => None,
        }
    }

    /// Drop everything and return to `Idle`.
    pub fn reset(&mut self) -> Vec<GestureEffect> {
        let mut effects = Vec::new();
        self.escape(&mut effects);
        effects
    }

    pub fn handle(&mut self, event: GestureEvent) -> Vec<GestureEffect> {
        let mut effects = Vec::new();
        match self.state {
            GestureState::Idle => self.on_idle(event, &mut effects),
            GestureState::PressPending { press, timer } => {
                self.on_press_pending(press, timer, event, &mut effects)
            }
            GestureState::Dragging { origin } => self.on_dragging(origin, event, &mut effects),
            GestureState::JiggleMode { press } => self.on_jiggle(press, event, &mut effects),
        }
        effects
    }

    // =========================================================================
    // Per-state handlers
    // =========================================================================

    fn on_idle(&mut self, event: GestureEvent, effects: &mut Vec<GestureEffect>) {
        match event {
            GestureEvent::PointerDown { slot, occupied, at } => {
                self.begin_press(slot, occupied, at, effects)
            }
            GestureEvent::OutsideClick | GestureEvent::Cancel => self.escape(effects),
            _ => {}
        }
    }

    fn on_press_pending(
        &mut self,
        press: Press,
        timer: Option<u64>,
        event: GestureEvent,
        effects: &mut Vec<GestureEffect>,
    ) {
        match event {
            GestureEvent::PointerDown { slot, occupied, at } => {
                cancel_timer(timer, effects);
                self.state = GestureState::Idle;
                self.begin_press(slot, occupied, at, effects);
            }
            GestureEvent::PointerMove { at } => {
                if press.start.distance(at) > self.config.drag_threshold_px {
                    cancel_timer(timer, effects);
                    self.begin_drag(press, effects);
                }
            }
            GestureEvent::DragStart => {
                cancel_timer(timer, effects);
                self.begin_drag(press, effects);
            }
            GestureEvent::TimerElapsed { generation } => {
                if timer == Some(generation) {
                    self.clear_tap(effects);
                    self.state = GestureState::JiggleMode { press: None };
                    effects.push(GestureEffect::EnteredJiggle);
                }
            }
            GestureEvent::PointerUp { slot } => {
                cancel_timer(timer, effects);
                self.state = GestureState::Idle;
                if slot == Some(press.origin) {
                    self.tap(press, effects);
                }
            }
            GestureEvent::Drop { .. } => {
                cancel_timer(timer, effects);
                self.state = GestureState::Idle;
            }
            GestureEvent::DragCancel | GestureEvent::OutsideClick | GestureEvent::Cancel => {
                cancel_timer(timer, effects);
                self.state = GestureState::Idle;
                self.escape(effects);
            }
            GestureEvent::DeleteAffordance { .. } => {}
        }
    }

    fn on_dragging(&mut self, origin: SlotRef, event: GestureEvent, effects: &mut Vec<GestureEffect>) {
        match event {
            GestureEvent::Drop { target } | GestureEvent::PointerUp { slot: target } => {
                self.state = GestureState::Idle;
                if let Some(to) = target {
                    effects.push(GestureEffect::Move { from: origin, to });
                }
            }
            GestureEvent::DragCancel | GestureEvent::OutsideClick | GestureEvent::Cancel => {
                self.escape(effects);
            }
            GestureEvent::PointerDown { slot, occupied, at } => {
                self.state = GestureState::Idle;
                self.begin_press(slot, occupied, at, effects);
            }
            GestureEvent::PointerMove { .. }
            | GestureEvent::DragStart
            | GestureEvent::TimerElapsed { .. }
            | GestureEvent::DeleteAffordance { .. } => {}
        }
    }

    fn on_jiggle(
        &mut self,
        press: Option<Press>,
        event: GestureEvent,
        effects: &mut Vec<GestureEffect>,
    ) {
        match event {
            GestureEvent::PointerDown { slot, occupied, at } => {
                let press = occupied.then_some(Press {
                    origin: slot,
                    start: at,
                    occupied,
                });
                self.state = GestureState::JiggleMode { press };
            }
            GestureEvent::PointerMove { at } => {
                if let Some(press) = press {
                    if press.start.distance(at) > self.config.drag_threshold_px {
                        effects.push(GestureEffect::ExitedJiggle);
                        self.begin_drag(press, effects);
                    }
                }
            }
            GestureEvent::DragStart => {
                if let Some(press) = press {
                    effects.push(GestureEffect::ExitedJiggle);
                    self.begin_drag(press, effects);
                }
            }
            GestureEvent::PointerUp { .. } => {
                self.state = GestureState::JiggleMode { press: None };
            }
            GestureEvent::DeleteAffordance { slot } => {
                effects.push(GestureEffect::RequestDelete { slot });
            }
            GestureEvent::OutsideClick | GestureEvent::Cancel => self.escape(effects),
            GestureEvent::TimerElapsed { .. }
            | GestureEvent::Drop { .. }
            | GestureEvent::DragCancel => {}
        }
    }

    // =========================================================================
    // Shared transitions
    // =========================================================================

    fn begin_press(
        &mut self,
        slot: SlotRef,
        occupied: bool,
        at: Point,
        effects: &mut Vec<GestureEffect>,
    ) {
        let press = Press {
            origin: slot,
            start: at,
            occupied,
        };
        if occupied {
            let generation = self.next_generation;
            self.next_generation += 1;
            effects.push(GestureEffect::StartTimer {
                generation,
                after: self.config.long_press,
            });
            self.state = GestureState::PressPending {
                press,
                timer: Some(generation),
            };
        } else if self.pending_tap.is_some() {
            // Empty slots are only interesting as a tap-move target.
            self.state = GestureState::PressPending { press, timer: None };
        }
    }

    fn begin_drag(&mut self, press: Press, effects: &mut Vec<GestureEffect>) {
        if press.occupied {
            self.clear_tap(effects);
            self.state = GestureState::Dragging {
                origin: press.origin,
            };
            effects.push(GestureEffect::DragBegan {
                origin: press.origin,
            });
        } else {
            // Nothing to drag from an empty slot; the tap source stays pending.
            self.state = GestureState::Idle;
        }
    }

    fn tap(&mut self, press: Press, effects: &mut Vec<GestureEffect>) {
        match self.pending_tap.take() {
            None if press.occupied => {
                self.pending_tap = Some(press.origin);
                effects.push(GestureEffect::TapSelected { slot: press.origin });
            }
            None => {}
            Some(source) if source == press.origin => effects.push(GestureEffect::TapCleared),
            Some(source) => effects.push(GestureEffect::Move {
                from: source,
                to: press.origin,
            }),
        }
    }

    fn clear_tap(&mut self, effects: &mut Vec<GestureEffect>) {
        if self.pending_tap.take().is_some() {
            effects.push(GestureEffect::TapCleared);
        }
    }

    fn escape(&mut self, effects: &mut Vec<GestureEffect>) {
        match self.state {
            GestureState::PressPending { timer, .. } => cancel_timer(timer, effects),
            GestureState::JiggleMode { .. } => effects.push(GestureEffect::ExitedJiggle),
            GestureState::Idle | GestureState::Dragging { .. } => {}
        }
        self.state = GestureState::Idle;
        self.clear_tap(effects);
    }
}

fn cancel_timer(timer: Option<u64>, effects: &mut Vec<GestureEffect>) {
    if let Some(generation) = timer {
        effects.push(GestureEffect::CancelTimer { generation });
    }
}
