use std::collections::{BTreeMap, VecDeque};

use voxland_geom::Vec3;

use crate::input::Action;

pub enum Event {
    // Time housekeeping
    Tick,

    // Input-derived intents
    /// Body-local movement: key vectors times held seconds, before speed.
    MovementRequested { movement: Vec3 },
    LookRequested { dx: f32, dy: f32 },
    EditRequested { action: Action },

    // World/view
    ViewCenterChanged { ccx: i32, ccz: i32 },
    /// Periodic stats line; the handler schedules the next one.
    StatsDue,
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

    /// Schedules at `tick`; ticks already in the past are clamped to now.
    pub fn emit_at(&mut self, tick: u64, kind: Event) -> u64 {
        let id = self.alloc_id();
        let tick = tick.max(self.now);
        let env = EventEnvelope { id, tick, kind };
        self.by_tick.entry(tick).or_default().push_back(env);
        id
    }

    pub fn emit_after(&mut self, delta: u64, kind: Event) -> u64 {
        self.emit_at(self.now + delta, kind)
    }

    pub fn pop_ready(&mut self) -> Option<EventEnvelope> {
        self.by_tick.get_mut(&self.now)?.pop_front()
    }

    /// Moves to the next tick. Events left in the current bucket carry over.
    pub fn advance_tick(&mut self) {
        if let Some(left) = self.by_tick.remove(&self.now) {
            if !left.is_empty() {
                let next = self.now.wrapping_add(1);
                let bucket = self.by_tick.entry(next).or_default();
                for env in left.into_iter().rev() {
                    bucket.push_front(env);
                }
            }
        }
        self.now = self.now.wrapping_add(1);
    }

    pub fn len(&self) -> usize {
        self.by_tick.values().map(VecDeque::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn log_event(tick: u64, ev: &Event) {
    match ev {
        Event::Tick => {
            log::trace!(target: "events", "[tick {}] Tick", tick);
        }
        Event::MovementRequested { movement } => {
            log::trace!(target: "events", "[tick {}] MovementRequested ({:.3}, {:.3}, {:.3})",
                tick, movement.x, movement.y, movement.z);
        }
        Event::LookRequested { dx, dy } => {
            log::trace!(target: "events", "[tick {}] LookRequested dx={:.2} dy={:.2}", tick, dx, dy);
        }
        Event::EditRequested { action } => {
            log::info!(target: "events", "[tick {}] EditRequested {:?}", tick, action);
        }
        Event::ViewCenterChanged { ccx, ccz } => {
            log::info!(target: "events", "[tick {}] ViewCenterChanged cc=({}, {})", tick, ccx, ccz);
        }
        Event::StatsDue => {
            log::trace!(target: "events", "[tick {}] StatsDue", tick);
        }
    }
}
