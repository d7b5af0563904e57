//! Plain value records for everything in the world.
//!
//! Gameplay entities (player, platforms, enemies, coins, flag) take part in
//! collision and scoring. Decorations only animate and render; they never
//! feed back into the simulation.

use skyhop_core::Aabb;

pub const PLAYER_SPAWN_X: f32 = -0.8;
pub const PLAYER_SPAWN_Y: f32 = -0.3;
pub const PLAYER_WIDTH: f32 = 0.1;
pub const PLAYER_HEIGHT: f32 = 0.1;
pub const ENEMY_SIZE: f32 = 0.08;
pub const COIN_SIZE: f32 = 0.05;
pub const FLAG_WIDTH: f32 = 0.1;
pub const FLAG_HEIGHT: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub velocity_y: f32,
    /// Airborne flag; a jump is only accepted while this is false.
    pub is_jumping: bool,
    pub facing: Facing,
    pub anim_time: f32,
    pub anim_frame: u8,
}

impl Player {
    pub fn spawn() -> Self {
        Self {
            x: PLAYER_SPAWN_X,
            y: PLAYER_SPAWN_Y,
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            velocity_y: 0.0,
            is_jumping: false,
            facing: Facing::Right,
            anim_time: 0.0,
            anim_frame: 0,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_center_size(self.x, self.y, self.width, self.height)
    }

    pub fn bottom(&self) -> f32 {
        self.y - self.height * 0.5
    }
}

/// Vertical bobbing for a platform: `y = base_y + amplitude * sin(t * speed + phase)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatMotion {
    pub base_y: f32,
    pub amplitude: f32,
    pub speed: f32,
    pub phase: f32,
}

impl FloatMotion {
    pub fn offset_at(&self, elapsed: f32) -> f32 {
        self.amplitude * (elapsed * self.speed + self.phase).sin()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Platform {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub float: Option<FloatMotion>,
}

impl Platform {
    pub fn aabb(&self) -> Aabb {
        Aabb::from_center_size(self.x, self.y, self.width, self.height)
    }

    pub fn top(&self) -> f32 {
        self.y + self.height * 0.5
    }

    pub fn animate(&mut self, elapsed: f32) {
        if let Some(float) = self.float {
            self.y = float.base_y + float.offset_at(elapsed);
        }
    }
}

/// Cosmetic size pulse. Collision always uses the unscaled extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomPulse {
    pub amplitude: f32,
    pub speed: f32,
    pub phase: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Signed patrol speed in world units per second; the sign is the direction.
    pub velocity: f32,
    pub patrol_left: f32,
    pub patrol_right: f32,
    pub zoom: Option<ZoomPulse>,
    pub zoom_scale: f32,
}

impl Enemy {
    pub fn aabb(&self) -> Aabb {
        Aabb::from_center_size(self.x, self.y, self.width, self.height)
    }

    /// Advance along the patrol line and reflect off whichever bound was
    /// crossed. The position is clamped back onto the bound so it never
    /// leaves `[patrol_left, patrol_right]`.
    pub fn patrol(&mut self, dt: f32) {
        self.x += self.velocity * dt;
        if self.x > self.patrol_right {
            self.x = self.patrol_right;
            self.velocity = -self.velocity.abs();
        } else if self.x < self.patrol_left {
            self.x = self.patrol_left;
            self.velocity = self.velocity.abs();
        }
    }

    pub fn animate(&mut self, elapsed: f32) {
        self.zoom_scale = match self.zoom {
            Some(zoom) => 1.0 + zoom.amplitude * (elapsed * zoom.speed + zoom.phase).sin(),
            None => 1.0,
        };
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Coin {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Collected coins stay in the sequence so indices remain stable.
    pub collected: bool,
}

impl Coin {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            width: COIN_SIZE,
            height: COIN_SIZE,
            collected: false,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_center_size(self.x, self.y, self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Flag {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Flag {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            width: FLAG_WIDTH,
            height: FLAG_HEIGHT,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_center_size(self.x, self.y, self.width, self.height)
    }
}

/// The gameplay half of the entity store, rebuilt wholesale on every restart.
#[derive(Debug, Clone, PartialEq)]
pub struct World {
    pub platforms: Vec<Platform>,
    pub enemies: Vec<Enemy>,
    pub coins: Vec<Coin>,
    pub flag: Flag,
}

// --- Decorations ---------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Cloud {
    pub x: f32,
    pub y: f32,
    pub scale: f32,
    pub bounce_amplitude: f32,
    pub bounce_speed: f32,
    pub bounce_offset: f32,
}

impl Cloud {
    pub fn animate(&mut self, elapsed: f32) {
        self.bounce_offset = self.bounce_amplitude * (elapsed * self.bounce_speed + self.x).sin();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bird {
    pub x: f32,
    pub base_y: f32,
    pub speed: f32,
    /// +1.0 flying right, -1.0 flying left.
    pub direction: f32,
    pub patrol_left: f32,
    pub patrol_right: f32,
    pub bob_offset: f32,
    pub wing_up: bool,
}

impl Bird {
    pub fn animate(&mut self, elapsed: f32, dt: f32) {
        self.x += self.direction * self.speed * dt;
        if self.x > self.patrol_right {
            self.x = self.patrol_right;
            self.direction = -1.0;
        } else if self.x < self.patrol_left {
            self.x = self.patrol_left;
            self.direction = 1.0;
        }
        self.bob_offset = 0.02 * (elapsed * 3.0 + self.patrol_left).sin();
        self.wing_up = (elapsed * 6.0 + self.patrol_right).sin() > 0.0;
    }

    pub fn y(&self) -> f32 {
        self.base_y + self.bob_offset
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mountain {
    pub x: f32,
    pub base_y: f32,
    pub width: f32,
    pub height: f32,
    pub shade: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    pub x: f32,
    pub base_y: f32,
    pub height: f32,
    pub sway_phase: f32,
    pub float_offset: f32,
}

impl Tree {
    pub fn animate(&mut self, elapsed: f32) {
        self.float_offset = 0.005 * (elapsed * 1.5 + self.sway_phase).sin();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub twinkle_phase: f32,
    pub brightness: f32,
}

impl Star {
    pub fn animate(&mut self, elapsed: f32) {
        self.brightness = 0.55 + 0.45 * (elapsed * 2.0 + self.twinkle_phase).sin();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sun {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub rotation: f32,
    pub rotation_speed: f32,
    pub pulse: f32,
}

impl Sun {
    pub fn animate(&mut self, elapsed: f32, dt: f32) {
        self.rotation = (self.rotation + self.rotation_speed * dt) % std::f32::consts::TAU;
        self.pulse = 1.0 + 0.05 * (elapsed * 1.2).sin();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GrassTuft {
    pub x: f32,
    pub y: f32,
    pub height: f32,
}

/// Everything that only exists to be looked at.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Background {
    pub sun: Option<Sun>,
    pub stars: Vec<Star>,
    pub mountains: Vec<Mountain>,
    pub clouds: Vec<Cloud>,
    pub trees: Vec<Tree>,
    pub grass: Vec<GrassTuft>,
    pub birds: Vec<Bird>,
}

impl Background {
    pub fn animate(&mut self, elapsed: f32, dt: f32) {
        if let Some(sun) = &mut self.sun {
            sun.animate(elapsed, dt);
        }
        for star in &mut self.stars {
            star.animate(elapsed);
        }
        for cloud in &mut self.clouds {
            cloud.animate(elapsed);
        }
        for tree in &mut self.trees {
            tree.animate(elapsed);
        }
        for bird in &mut self.birds {
            bird.animate(elapsed, dt);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enemy(x: f32, velocity: f32) -> Enemy {
        Enemy {
            x,
            y: 0.0,
            width: ENEMY_SIZE,
            height: ENEMY_SIZE,
            velocity,
            patrol_left: -0.5,
            patrol_right: 0.5,
            zoom: None,
            zoom_scale: 1.0,
        }
    }

    #[test]
    fn player_spawns_at_documented_position() {
        let player = Player::spawn();
        assert_eq!((player.x, player.y), (-0.8, -0.3));
        assert!(!player.is_jumping);
        assert_eq!(player.facing, Facing::Right);
    }

    #[test]
    fn enemy_reflects_at_right_bound() {
        let mut e = enemy(0.49, 1.0);
        e.patrol(0.1);
        assert_eq!(e.x, 0.5);
        assert!(e.velocity < 0.0);
    }

    #[test]
    fn enemy_reflects_at_left_bound() {
        let mut e = enemy(-0.49, -1.0);
        e.patrol(0.1);
        assert_eq!(e.x, -0.5);
        assert!(e.velocity > 0.0);
    }

    #[test]
    fn enemy_never_leaves_patrol_bounds() {
        let mut e = enemy(0.0, 0.7);
        for i in 0..5_000 {
            // Uneven steps, including ones longer than the whole patrol line.
            let dt = [1.0 / 60.0, 0.003, 0.25, 1.7][i % 4];
            e.patrol(dt);
            assert!(
                e.x >= e.patrol_left && e.x <= e.patrol_right,
                "escaped at step {i}: x = {}",
                e.x
            );
        }
    }

    #[test]
    fn floating_platform_bobs_around_base() {
        let mut platform = Platform {
            x: 0.0,
            y: 0.1,
            width: 0.2,
            height: 0.1,
            float: Some(FloatMotion {
                base_y: 0.1,
                amplitude: 0.03,
                speed: 2.0,
                phase: 0.0,
            }),
        };
        platform.animate(std::f32::consts::FRAC_PI_4);
        assert!((platform.y - 0.13).abs() < 1e-5);
        assert!((platform.top() - 0.18).abs() < 1e-5);
    }

    #[test]
    fn static_platform_ignores_animation() {
        let mut platform = Platform {
            x: 0.0,
            y: -0.5,
            width: 0.5,
            height: 0.1,
            float: None,
        };
        platform.animate(12.0);
        assert_eq!(platform.y, -0.5);
    }

    #[test]
    fn bird_turns_around_at_patrol_edge() {
        let mut bird = Bird {
            x: 0.95,
            base_y: 0.6,
            speed: 0.5,
            direction: 1.0,
            patrol_left: -1.0,
            patrol_right: 1.0,
            bob_offset: 0.0,
            wing_up: false,
        };
        bird.animate(0.0, 0.2);
        assert_eq!(bird.x, 1.0);
        assert_eq!(bird.direction, -1.0);
    }
}
