use std::collections::HashSet;

use glam::Vec2;

/// Input event types the engine understands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A touch/click began at screen coordinates (x, y).
    PointerDown { x: f32, y: f32 },
    /// A touch/click ended at screen coordinates (x, y).
    PointerUp { x: f32, y: f32 },
    /// A touch/cursor moved to screen coordinates (x, y).
    PointerMove { x: f32, y: f32 },
    /// A key was pressed.
    KeyDown { key_code: u32 },
    /// A key was released.
    KeyUp { key_code: u32 },
    /// A host-defined event (gamepad buttons, UI actions).
    /// `kind` identifies the event type; `a`, `b`, `c` carry arbitrary data.
    Custom { kind: u32, a: f32, b: f32, c: f32 },
}

/// This frame's input events plus state that persists across frames.
/// The host pushes events; the runner clears them after the frame's updates.
pub struct InputQueue {
    events: Vec<InputEvent>,
    held: HashSet<u32>,
    pointer: Vec2,
    pointer_down: bool,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
            held: HashSet::new(),
            pointer: Vec2::ZERO,
            pointer_down: false,
        }
    }

    /// Record an event and fold it into the held state.
    pub fn push(&mut self, event: InputEvent) {
        match event {
            InputEvent::KeyDown { key_code } => {
                self.held.insert(key_code);
            }
            InputEvent::KeyUp { key_code } => {
                self.held.remove(&key_code);
            }
            InputEvent::PointerDown { x, y } => {
                self.pointer = Vec2::new(x, y);
                self.pointer_down = true;
            }
            InputEvent::PointerUp { x, y } => {
                self.pointer = Vec2::new(x, y);
                self.pointer_down = false;
            }
            InputEvent::PointerMove { x, y } => self.pointer = Vec2::new(x, y),
            InputEvent::Custom { .. } => {}
        }
        self.events.push(event);
    }

    /// Drain all pending events. Held state is kept.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Iterate over pending events without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    /// Check if there are pending events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True while the key is held, across frames.
    pub fn is_key_down(&self, key_code: u32) -> bool {
        self.held.contains(&key_code)
    }

    /// True only in the frame the key went down.
    pub fn key_pressed(&self, key_code: u32) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, InputEvent::KeyDown { key_code: k } if *k == key_code))
    }

    /// True only in the frame the key went up.
    pub fn key_released(&self, key_code: u32) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, InputEvent::KeyUp { key_code: k } if *k == key_code))
    }

    /// Last known pointer position in screen coordinates.
    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    pub fn is_pointer_down(&self) -> bool {
        self.pointer_down
    }

    /// Forget events and held state, e.g. when the window loses focus.
    pub fn reset(&mut self) {
        self.events.clear();
        self.held.clear();
        self.pointer_down = false;
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
