//! Keyboard state tracking with both level-triggered and edge-triggered queries.
//!
//! - **Level-triggered (held):** `is_held(key)` is true every frame the key is
//!   physically down. All gameplay intents (movement, jump, restart, quit) are
//!   polled this way once per frame.
//!
//! - **Edge-triggered (just_pressed):** true only until `end_frame()` runs.
//!   The main loop clears it only after at least one fixed simulation step has
//!   consumed it, so a press on a zero-step frame is not lost. Used for
//!   toggles such as the hitbox overlay.

use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Space,
    R,
    Escape,
    F4,
}

pub struct InputState {
    held: HashSet<Key>,
    just_pressed: HashSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            held: HashSet::new(),
            just_pressed: HashSet::new(),
        }
    }

    pub fn key_down(&mut self, key: Key) {
        if self.held.insert(key) {
            self.just_pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.held.remove(&key);
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }

    /// Drop every key, e.g. when the window loses focus and key-up events
    /// would otherwise never arrive.
    pub fn release_all(&mut self) {
        self.held.clear();
        self.just_pressed.clear();
    }

    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}
