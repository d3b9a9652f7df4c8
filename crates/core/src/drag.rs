//! Pointer-driven reassignment of an entry between event cards.
//!
//! [`DragCoordinator`] is an explicit state machine fed discrete pointer
//! inputs, each stamped with a monotonic time in milliseconds:
//!
//! ```text
//!            pointer_down                 tick / move (delay elapsed)
//!   Idle ─────────────────▶ Armed ──────────────────────────────▶ Dragging
//!    ▲                        │ up, cancel, move > threshold         │
//!    └────────────────────────┴──────────────────────────────────────┘
//!                                   pointer_up (→ MoveIntent), cancel
//! ```
//!
//! Moves while dragging are queued and processed once per [`DragCoordinator::frame`],
//! which does hit testing against the registered drop zones and edge
//! auto-scroll. One coordinator owns at most one drag; drop-zone participants
//! share it through a [`SharedCoordinator`] handle.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;

use crate::entry::MeetEntry;
use crate::types::DbId;

/// Hold time before a press turns into a drag.
pub const DEFAULT_LONG_PRESS_MS: u64 = 500;

/// Movement that cancels a press before the hold time elapses.
pub const DEFAULT_MOVE_THRESHOLD_PX: f64 = 10.0;

/// Distance from the viewport edge that triggers auto-scroll.
pub const DEFAULT_AUTOSCROLL_EDGE_PX: f64 = 50.0;

/// Scroll applied per processed frame while near an edge.
pub const DEFAULT_AUTOSCROLL_STEP_PX: f64 = 10.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Axis-aligned rectangle in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragConfig {
    pub long_press_ms: u64,
    pub move_threshold_px: f64,
    pub autoscroll_edge_px: f64,
    pub autoscroll_step_px: f64,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            long_press_ms: DEFAULT_LONG_PRESS_MS,
            move_threshold_px: DEFAULT_MOVE_THRESHOLD_PX,
            autoscroll_edge_px: DEFAULT_AUTOSCROLL_EDGE_PX,
            autoscroll_step_px: DEFAULT_AUTOSCROLL_STEP_PX,
        }
    }
}

/// Request to relocate one entry to another event, pending execution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoveIntent {
    pub entry: MeetEntry,
    pub source_event_id: DbId,
    pub target_event_id: DbId,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DragState {
    Idle,
    Armed {
        entry: MeetEntry,
        source_event_id: DbId,
        origin: Point,
        pressed_at: u64,
    },
    Dragging {
        entry: MeetEntry,
        source_event_id: DbId,
        pointer: Point,
        hover: Option<DbId>,
        pending: Option<Point>,
    },
}

/// Notifications delivered to subscribed listeners.
#[derive(Debug, Clone, PartialEq)]
pub enum DragEvent {
    Started {
        entry_id: DbId,
        source_event_id: DbId,
    },
    /// Fired right after `Started` so the UI can vibrate.
    HapticCue,
    HoverChanged {
        target_event_id: Option<DbId>,
    },
    Dropped(MoveIntent),
    Cancelled,
}

/// Result of processing one frame of a drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUpdate {
    /// Where to draw the floating proxy of the dragged entry.
    pub proxy: Point,
    pub hover: Option<DbId>,
    /// Vertical scroll to apply to the viewport (negative scrolls up).
    pub scroll_by: f64,
}

/// Listeners must not call back into the coordinator.
pub type DragListener = Box<dyn FnMut(&DragEvent)>;

pub struct DragCoordinator {
    config: DragConfig,
    state: DragState,
    zones: Vec<(DbId, Rect)>,
    /// Zones whose handle was dropped while the coordinator was borrowed.
    retired: Rc<RefCell<Vec<DbId>>>,
    viewport_height: f64,
    enabled: bool,
    listeners: Vec<DragListener>,
}

impl DragCoordinator {
    pub fn new(config: DragConfig) -> Self {
        Self {
            config,
            state: DragState::Idle,
            zones: Vec::new(),
            retired: Rc::default(),
            viewport_height: 0.0,
            enabled: false,
            listeners: Vec::new(),
        }
    }

    /// Enable only for viewers with mutation rights.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled && self.state != DragState::Idle {
            self.cancel();
        }
    }

    pub fn set_viewport_height(&mut self, height: f64) {
        self.viewport_height = height;
    }

    pub fn subscribe(&mut self, listener: DragListener) {
        self.listeners.push(listener);
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn hover_target(&self) -> Option<DbId> {
        match &self.state {
            DragState::Dragging { hover, .. } => *hover,
            _ => None,
        }
    }

    // -----------------------------------------------------------------------
    // Drop zones
    // -----------------------------------------------------------------------

    /// Register or re-measure the drop zone of an event card.
    pub fn register_zone(&mut self, event_id: DbId, rect: Rect) {
        self.sweep_retired();
        match self.zones.iter_mut().find(|(id, _)| *id == event_id) {
            Some(zone) => zone.1 = rect,
            None => self.zones.push((event_id, rect)),
        }
    }

    pub fn unregister_zone(&mut self, event_id: DbId) {
        self.zones.retain(|(id, _)| *id != event_id);
    }

    /// First registered zone containing `point`, skipping retired ones.
    pub fn hit_test(&self, point: Point) -> Option<DbId> {
        let retired = self.retired.borrow();
        self.zones
            .iter()
            .filter(|(id, _)| !retired.contains(id))
            .find(|(_, rect)| rect.contains(point))
            .map(|(id, _)| *id)
    }

    fn sweep_retired(&mut self) {
        let retired = std::mem::take(&mut *self.retired.borrow_mut());
        if !retired.is_empty() {
            self.zones.retain(|(id, _)| !retired.contains(id));
        }
    }

    // -----------------------------------------------------------------------
    // Pointer input
    // -----------------------------------------------------------------------

    /// Press on an entry row. Returns whether the press armed a drag.
    pub fn pointer_down(
        &mut self,
        entry: &MeetEntry,
        source_event_id: DbId,
        position: Point,
        now: u64,
    ) -> bool {
        if !self.enabled || self.state != DragState::Idle {
            return false;
        }
        self.state = DragState::Armed {
            entry: entry.clone(),
            source_event_id,
            origin: position,
            pressed_at: now,
        };
        true
    }

    /// Timer check. Returns whether the drag started on this call.
    pub fn tick(&mut self, now: u64) -> bool {
        let ready = matches!(
            &self.state,
            DragState::Armed { pressed_at, .. }
                if now.saturating_sub(*pressed_at) >= self.config.long_press_ms
        );
        if ready {
            self.start_drag(None);
        }
        ready
    }

    pub fn pointer_move(&mut self, position: Point, now: u64) {
        match &mut self.state {
            DragState::Idle => {}
            DragState::Armed {
                origin, pressed_at, ..
            } => {
                let (origin, elapsed) = (*origin, now.saturating_sub(*pressed_at));
                if elapsed >= self.config.long_press_ms {
                    self.start_drag(Some(position));
                } else if origin.distance_to(position) > self.config.move_threshold_px {
                    // Scroll intent.
                    self.cancel();
                }
            }
            DragState::Dragging { pending, .. } => {
                *pending = Some(position);
            }
        }
    }

    /// Process the latest queued move, if any.
    pub fn frame(&mut self) -> Option<FrameUpdate> {
        let position = match &mut self.state {
            DragState::Dragging { pending, .. } => pending.take()?,
            _ => return None,
        };
        self.sweep_retired();
        let target = self.hit_test(position);
        let scroll_by = self.autoscroll_for(position);

        let mut hover_changed = false;
        if let DragState::Dragging { pointer, hover, .. } = &mut self.state {
            *pointer = position;
            if *hover != target {
                *hover = target;
                hover_changed = true;
            }
        }
        if hover_changed {
            self.emit(DragEvent::HoverChanged {
                target_event_id: target,
            });
        }

        Some(FrameUpdate {
            proxy: position,
            hover: target,
            scroll_by,
        })
    }

    /// Release. Returns a move intent when dropped on another event.
    pub fn pointer_up(&mut self, _now: u64) -> Option<MoveIntent> {
        // Apply a move that arrived after the last frame.
        if matches!(&self.state, DragState::Dragging { pending: Some(_), .. }) {
            self.frame();
        }
        match std::mem::replace(&mut self.state, DragState::Idle) {
            DragState::Idle => None,
            DragState::Armed { .. } => {
                // Tap.
                self.emit(DragEvent::Cancelled);
                None
            }
            DragState::Dragging {
                entry,
                source_event_id,
                hover,
                ..
            } => match hover {
                Some(target_event_id) if target_event_id != source_event_id => {
                    let intent = MoveIntent {
                        entry,
                        source_event_id,
                        target_event_id,
                    };
                    self.emit(DragEvent::Dropped(intent.clone()));
                    Some(intent)
                }
                _ => {
                    self.emit(DragEvent::Cancelled);
                    None
                }
            },
        }
    }

    pub fn cancel(&mut self) {
        if std::mem::replace(&mut self.state, DragState::Idle) != DragState::Idle {
            self.emit(DragEvent::Cancelled);
        }
    }

    fn start_drag(&mut self, pending: Option<Point>) {
        let DragState::Armed {
            entry,
            source_event_id,
            origin,
            ..
        } = std::mem::replace(&mut self.state, DragState::Idle)
        else {
            return;
        };
        let entry_id = entry.id;
        self.state = DragState::Dragging {
            entry,
            source_event_id,
            pointer: origin,
            hover: None,
            pending,
        };
        self.emit(DragEvent::Started {
            entry_id,
            source_event_id,
        });
        self.emit(DragEvent::HapticCue);
    }

    fn autoscroll_for(&self, p: Point) -> f64 {
        if self.viewport_height <= 0.0 {
            return 0.0;
        }
        if p.y < self.config.autoscroll_edge_px {
            -self.config.autoscroll_step_px
        } else if p.y > self.viewport_height - self.config.autoscroll_edge_px {
            self.config.autoscroll_step_px
        } else {
            0.0
        }
    }

    fn emit(&mut self, event: DragEvent) {
        for listener in &mut self.listeners {
            listener(&event);
        }
    }
}

impl Default for DragCoordinator {
    fn default() -> Self {
        Self::new(DragConfig::default())
    }
}

/// Handle shared by the board and every drop-zone participant.
pub type SharedCoordinator = Rc<RefCell<DragCoordinator>>;

pub fn shared(config: DragConfig) -> SharedCoordinator {
    Rc::new(RefCell::new(DragCoordinator::new(config)))
}

/// An event card's registration; unregisters itself when dropped.
pub struct DropZone {
    coordinator: SharedCoordinator,
    retired: Rc<RefCell<Vec<DbId>>>,
    event_id: DbId,
}

impl DropZone {
    pub fn mount(coordinator: &SharedCoordinator, event_id: DbId, rect: Rect) -> Self {
        let retired = {
            let mut c = coordinator.borrow_mut();
            c.register_zone(event_id, rect);
            Rc::clone(&c.retired)
        };
        Self {
            coordinator: Rc::clone(coordinator),
            retired,
            event_id,
        }
    }

    pub fn event_id(&self) -> DbId {
        self.event_id
    }

    pub fn resize(&self, rect: Rect) {
        self.coordinator
            .borrow_mut()
            .register_zone(self.event_id, rect);
    }

    /// Whether the card should render as the current drop target.
    pub fn is_hovered(&self) -> bool {
        self.coordinator.borrow().hover_target() == Some(self.event_id)
    }
}

impl Drop for DropZone {
    fn drop(&mut self) {
        match self.coordinator.try_borrow_mut() {
            Ok(mut coordinator) => coordinator.unregister_zone(self.event_id),
            Err(_) => {
                // Applied on the coordinator's next frame or registration.
                tracing::debug!(
                    event_id = self.event_id,
                    "Coordinator busy; drop zone retired for later removal"
                );
                self.retired.borrow_mut().push(self.event_id);
            }
        }
    }
}
