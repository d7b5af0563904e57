//! Input Mapper: turns polled key state into player intents once per frame.
//!
//! Everything is level-triggered. Holding jump does not re-trigger in the air
//! because the simulation checks the airborne flag; holding restart or quit
//! is harmless because both are idempotent.

use skyhop_core::input::{InputState, Key};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerIntents {
    pub move_left: bool,
    pub move_right: bool,
    pub jump: bool,
    pub restart: bool,
    pub quit: bool,
}

pub fn map_intents(input: &InputState) -> PlayerIntents {
    PlayerIntents {
        move_left: input.is_held(Key::Left),
        move_right: input.is_held(Key::Right),
        jump: input.is_held(Key::Space) || input.is_held(Key::Up),
        restart: input.is_held(Key::R),
        quit: input.is_held(Key::Escape),
    }
}
