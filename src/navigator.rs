//! Cyclic list cursor with analog deadzone and step debouncing.

/// Default stick deflection required before a step fires.
pub const DEFAULT_NAV_DEADZONE: f32 = 0.5;
/// Default minimum spacing between accepted steps (seconds).
pub const DEFAULT_NAV_COOLDOWN_SECS: f64 = 0.2;
/// Slack for float frame times, so a step exactly one cooldown later counts.
const COOLDOWN_EPSILON_SECS: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// Map the vertical stick component to a direction; values at or inside
    /// the deadzone produce nothing.
    pub fn from_axis(axis: (f32, f32), deadzone: f32) -> Option<Self> {
        let (_, y) = axis;
        if y > deadzone {
            Some(Direction::Up)
        } else if y < -deadzone {
            Some(Direction::Down)
        } else {
            None
        }
    }
}

/// Navigation tuning shared by every cursor in a session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavTuning {
    pub deadzone: f32,
    pub cooldown_secs: f64,
}

impl Default for NavTuning {
    fn default() -> Self {
        Self {
            deadzone: DEFAULT_NAV_DEADZONE,
            cooldown_secs: DEFAULT_NAV_COOLDOWN_SECS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    pub index: usize,
    /// Frame time of the last accepted step, if any.
    pub last_step_at: Option<f64>,
}

/// Cursor over a list of `len` entries. `index < len` always holds.
#[derive(Debug, Clone, PartialEq)]
pub struct Navigator {
    cursor: Cursor,
    len: usize,
    tuning: NavTuning,
}

impl Navigator {
    /// Returns `None` for an empty list; empty lists are never navigable.
    pub fn new(len: usize, tuning: NavTuning) -> Option<Self> {
        if len == 0 {
            return None;
        }
        Some(Self {
            cursor: Cursor {
                index: 0,
                last_step_at: None,
            },
            len,
            tuning,
        })
    }

    pub fn index(&self) -> usize {
        self.cursor.index
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn cooled_down(&self, now: f64) -> bool {
        match self.cursor.last_step_at {
            Some(last) => now - last + COOLDOWN_EPSILON_SECS >= self.tuning.cooldown_secs,
            None => true,
        }
    }

    /// Move one entry, wrapping at both ends. Returns whether the cursor moved.
    pub fn step(&mut self, direction: Direction, now: f64) -> bool {
        if !self.cooled_down(now) {
            return false;
        }
        self.cursor.index = match direction {
            Direction::Up if self.cursor.index == 0 => self.len - 1,
            Direction::Up => self.cursor.index - 1,
            Direction::Down => (self.cursor.index + 1) % self.len,
        };
        self.cursor.last_step_at = Some(now);
        true
    }

    /// Move straight to `index` without touching the cooldown.
    pub fn jump_to(&mut self, index: usize) -> bool {
        if index >= self.len {
            return false;
        }
        self.cursor.index = index;
        true
    }

    /// Analog entry point: applies the deadzone before debouncing.
    pub fn step_axis(&mut self, axis: (f32, f32), now: f64) -> bool {
        match Direction::from_axis(axis, self.tuning.deadzone) {
            Some(direction) => self.step(direction, now),
            None => false,
        }
    }
}
