use std::collections::{BTreeMap, VecDeque};

use panelkit_geom::Vec2;
use panelkit_ui::{ContentAction, PanelKind, ResizeHandle};

#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    // Pointer gestures; offsets are relative to where the gesture grabbed
    DragStarted { kind: PanelKind },
    DragMoved { kind: PanelKind, offset: Vec2 },
    DragFinished { kind: PanelKind },
    ResizeStarted { kind: PanelKind, handle: ResizeHandle },
    ResizeMoved { kind: PanelKind, offset: Vec2 },
    ResizeFinished { kind: PanelKind },

    // Content panel buttons
    ActionPressed(ContentAction),

    // Registry / session
    OpenPanel(PanelKind),
    ClosePanel(PanelKind),
    SessionLeft,
    SessionJoined,
    SettingsChanged,
    Quit,
}

pub struct EventEnvelope {
    pub id: u64,
    pub tick: u64,
    pub kind: Event,
}

pub struct EventQueue {
    // map of tick -> FIFO queue of events
    by_tick: BTreeMap<u64, VecDeque<EventEnvelope>>,
    pub now: u64,
    next_id: u64,
}

impl Default for EventQueue {
    fn default() -> Self {
        Self {
            by_tick: BTreeMap::new(),
            now: 0,
            next_id: 1,
        }
    }
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn alloc_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1).max(1);
        id
    }

    pub fn emit_now(&mut self, kind: Event) -> u64 {
        self.emit_at(self.now, kind)
    }

    pub fn emit_at(&mut self, tick: u64, kind: Event) -> u64 {
        let id = self.alloc_id();
        // Past ticks land in the current bucket so nothing is stranded.
        let tick = tick.max(self.now);
        log::trace!(target: "events", "emit #{} at tick {}: {:?}", id, tick, kind);
        let env = EventEnvelope { id, tick, kind };
        self.by_tick.entry(tick).or_default().push_back(env);
        id
    }

    pub fn emit_after(&mut self, delta: u64, kind: Event) -> u64 {
        self.emit_at(self.now.saturating_add(delta), kind)
    }

    pub fn pop_ready(&mut self) -> Option<EventEnvelope> {
        self.by_tick.get_mut(&self.now)?.pop_front()
    }

    /// Moves to the next tick. Events still queued for the current tick run
    /// first on the next one, ahead of anything already scheduled there.
    pub fn advance_tick(&mut self) {
        let next = self.now.saturating_add(1);
        if next == self.now {
            return;
        }
        if let Some(mut left) = self.by_tick.remove(&self.now) {
            if !left.is_empty() {
                log::debug!(target: "events", "{} events carried over to tick {}", left.len(), next);
                if let Some(scheduled) = self.by_tick.remove(&next) {
                    left.extend(scheduled);
                }
                self.by_tick.insert(next, left);
            }
        }
        self.now = next;
    }

    pub fn pending(&self) -> usize {
        self.by_tick.values().map(VecDeque::len).sum()
    }
}
