//! Per-frame game-state update.
//!
//! [`GameState`] owns the whole entity store plus score and phase; the main
//! loop calls [`GameState::step`] with the frame's intents and reads the
//! state back to draw it. The step is a total function: gameplay failure
//! (falling out, touching an enemy) is a [`GamePhase`], not an error.
//!
//! Pipeline order within one step:
//!
//!   0. a step that *starts* in a terminal phase only restarts the game
//!   1. cosmetic animation (floating platforms, enemy zoom, background)
//!   2. player 2-frame animation on a fixed cadence
//!   3. horizontal movement, clamped to the left edge of the camera
//!   4. jump, only while not airborne
//!   5. manual restart (ends the step)
//!   6. gravity and vertical integration
//!   7. landing on platform tops (sides and undersides are not resolved)
//!   8. landing clears the airborne flag (only a jump sets it)
//!   9. fall-out check
//!  10. camera follow
//!  11. enemy patrol and enemy contact
//!  12. coin pickup
//!  13. flag contact
//!
//! All motion is scaled by `dt` and collision is done in world space; the
//! camera offset only matters to the renderer and the left movement clamp.

use std::fmt;

use skyhop_core::aabb_overlap;

use crate::controller::PlayerIntents;
use crate::entities::{Background, Facing, Player, World};
use crate::level::{build_background, build_world, LevelDesign};

#[derive(Debug, Clone, Copy)]
pub struct PhysicsConfig {
    /// Vertical acceleration in world units per second squared (negative is down).
    pub gravity: f32,
    pub jump_speed: f32,
    /// Most negative vertical velocity allowed. Keeps one 60 Hz step shorter
    /// than `landing_tolerance` so the player cannot fall through a platform.
    pub max_fall_speed: f32,
    pub move_speed: f32,
    pub landing_tolerance: f32,
    pub fall_out_y: f32,
    /// Camera scrolls so the player stays at most this far right of it.
    pub camera_right_margin: f32,
    /// Player may not walk further than this left of the camera.
    pub camera_left_margin: f32,
    pub anim_frame_seconds: f32,
    pub coin_value: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: -4.0,
            jump_speed: 1.9,
            max_fall_speed: -2.4,
            move_speed: 0.9,
            landing_tolerance: 0.05,
            fall_out_y: -1.0,
            camera_right_margin: 0.3,
            camera_left_margin: 0.95,
            anim_frame_seconds: 0.2,
            coin_value: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LossCause {
    FellOut,
    HitEnemy,
}

impl fmt::Display for LossCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FellOut => f.write_str("fell out of the world"),
            Self::HitEnemy => f.write_str("touched an enemy"),
        }
    }
}

/// Game-over and win are variants of one enum, so they can never both hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Playing,
    GameOver(LossCause),
    Won,
}

impl GamePhase {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Playing)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartCause {
    Manual,
    Automatic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    CoinCollected { index: usize, score: u32 },
    GameOver { cause: LossCause, score: u32 },
    GameWon { score: u32 },
    Restarted { cause: RestartCause },
}

pub struct GameState {
    design: LevelDesign,
    pub config: PhysicsConfig,
    pub player: Player,
    pub world: World,
    pub background: Background,
    pub camera_offset: f32,
    pub score: u32,
    pub phase: GamePhase,
    /// Seconds since the last (re)start; drives the cosmetic sine animations.
    pub elapsed: f32,
}

impl GameState {
    pub fn new(design: LevelDesign, config: PhysicsConfig) -> Self {
        let world = build_world(&design);
        let background = build_background(&design.background);
        Self {
            design,
            config,
            player: Player::spawn(),
            world,
            background,
            camera_offset: 0.0,
            score: 0,
            phase: GamePhase::Playing,
            elapsed: 0.0,
        }
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self.phase, GamePhase::GameOver(_))
    }

    pub fn coins_collected(&self) -> usize {
        self.world.coins.iter().filter(|c| c.collected).count()
    }

    /// Full reset: player, camera, score and phase, and a rebuild of every
    /// entity sequence from the level design.
    pub fn restart(&mut self) {
        self.player = Player::spawn();
        self.world = build_world(&self.design);
        self.background = build_background(&self.design.background);
        self.camera_offset = 0.0;
        self.score = 0;
        self.phase = GamePhase::Playing;
        self.elapsed = 0.0;
    }

    pub fn step(&mut self, intents: PlayerIntents, dt: f32) -> Vec<GameEvent> {
        let mut events = Vec::new();

        if self.phase.is_terminal() {
            self.restart();
            log::info!("Restarted after terminal state");
            events.push(GameEvent::Restarted {
                cause: RestartCause::Automatic,
            });
            return events;
        }

        self.animate(dt);
        self.advance_player_animation(dt);
        self.apply_horizontal_movement(intents, dt);

        if intents.jump && !self.player.is_jumping {
            self.player.velocity_y = self.config.jump_speed;
            self.player.is_jumping = true;
        }

        if intents.restart {
            self.restart();
            log::info!("Restarted by player");
            events.push(GameEvent::Restarted {
                cause: RestartCause::Manual,
            });
            return events;
        }

        self.player.velocity_y = (self.player.velocity_y + self.config.gravity * dt)
            .max(self.config.max_fall_speed);
        self.player.y += self.player.velocity_y * dt;

        if self.resolve_platform_landing() {
            self.player.is_jumping = false;
        }

        if self.player.y < self.config.fall_out_y {
            self.finish(GamePhase::GameOver(LossCause::FellOut), &mut events);
        }

        self.camera_offset = (self.player.x - self.config.camera_right_margin).max(0.0);

        let player_box = self.player.aabb();
        let mut touched_enemy = false;
        for enemy in &mut self.world.enemies {
            enemy.patrol(dt);
            touched_enemy |= aabb_overlap(&player_box, &enemy.aabb());
        }
        if touched_enemy {
            self.finish(GamePhase::GameOver(LossCause::HitEnemy), &mut events);
        }

        if !self.phase.is_terminal() {
            for (index, coin) in self.world.coins.iter_mut().enumerate() {
                if !coin.collected && aabb_overlap(&player_box, &coin.aabb()) {
                    coin.collected = true;
                    self.score += self.config.coin_value;
                    events.push(GameEvent::CoinCollected {
                        index,
                        score: self.score,
                    });
                }
            }
        }

        if !self.phase.is_terminal() && aabb_overlap(&player_box, &self.world.flag.aabb()) {
            self.finish(GamePhase::Won, &mut events);
        }

        events
    }

    fn animate(&mut self, dt: f32) {
        self.elapsed += dt;
        for platform in &mut self.world.platforms {
            platform.animate(self.elapsed);
        }
        for enemy in &mut self.world.enemies {
            enemy.animate(self.elapsed);
        }
        self.background.animate(self.elapsed, dt);
    }

    fn advance_player_animation(&mut self, dt: f32) {
        self.player.anim_time += dt;
        if self.player.anim_time > self.config.anim_frame_seconds {
            self.player.anim_time = 0.0;
            self.player.anim_frame = (self.player.anim_frame + 1) % 2;
        }
    }

    fn apply_horizontal_movement(&mut self, intents: PlayerIntents, dt: f32) {
        let delta = self.config.move_speed * dt;
        if intents.move_right {
            self.player.x += delta;
            self.player.facing = Facing::Right;
        }
        if intents.move_left {
            let left_limit = self.camera_offset - self.config.camera_left_margin;
            self.player.x = (self.player.x - delta).max(left_limit);
            self.player.facing = Facing::Left;
        }
    }

    /// Snap a falling player onto the top of any platform they sank into.
    /// Returns whether the player is standing on something this step.
    fn resolve_platform_landing(&mut self) -> bool {
        let mut on_ground = false;
        for platform in &self.world.platforms {
            if self.player.velocity_y >= 0.0 {
                break;
            }
            let top = platform.top();
            if aabb_overlap(&self.player.aabb(), &platform.aabb())
                && self.player.bottom() > top - self.config.landing_tolerance
            {
                self.player.y = top + self.player.height * 0.5;
                self.player.velocity_y = 0.0;
                on_ground = true;
            }
        }
        on_ground
    }

    /// Enter a terminal phase. Only the first transition out of `Playing`
    /// sticks; later ones in the same step are ignored.
    fn finish(&mut self, phase: GamePhase, events: &mut Vec<GameEvent>) {
        if self.phase.is_terminal() {
            return;
        }
        self.phase = phase;
        match phase {
            GamePhase::GameOver(cause) => {
                log::info!("Game over: player {cause} (score {})", self.score);
                events.push(GameEvent::GameOver {
                    cause,
                    score: self.score,
                });
            }
            GamePhase::Won => {
                log::info!("Level complete (score {})", self.score);
                events.push(GameEvent::GameWon { score: self.score });
            }
            GamePhase::Playing => {}
        }
    }
}
