//! Declarative level data and the Level Builder.
//!
//! A level is authored as JSON (`assets/levels/*.json`) and compiled into the
//! binary. Startup parses and validates it once; every restart then rebuilds
//! the world and background from the validated [`LevelDesign`] instead of
//! patching the live entities, so play-time mutation (enemy direction flips,
//! collected coins, float phases) can never leak into the next attempt.

use serde::Deserialize;

use crate::entities::{
    Background, Bird, Cloud, Coin, Enemy, Flag, FloatMotion, GrassTuft, Mountain, Platform, Star,
    Sun, Tree, World, ZoomPulse, ENEMY_SIZE,
};

pub const BUILTIN_LEVEL_JSON: &str = include_str!("../../../assets/levels/meadow.json");
const SUPPORTED_VERSION: &str = "0.1";

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LevelDesign {
    pub version: String,
    pub level_id: String,
    pub flag: PointSpec,
    pub platforms: Vec<PlatformSpec>,
    #[serde(default)]
    pub enemies: Vec<EnemySpec>,
    #[serde(default)]
    pub coins: Vec<PointSpec>,
    #[serde(default)]
    pub background: BackgroundSpec,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct PointSpec {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct PlatformSpec {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub float: Option<WaveSpec>,
}

/// Amplitude/speed/phase of a sine wave, shared by platform bobbing and
/// enemy zoom pulses.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct WaveSpec {
    pub amplitude: f32,
    pub speed: f32,
    #[serde(default)]
    pub phase: f32,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct EnemySpec {
    pub x: f32,
    pub y: f32,
    pub velocity: f32,
    pub patrol_left: f32,
    pub patrol_right: f32,
    #[serde(default)]
    pub zoom: Option<WaveSpec>,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct BackgroundSpec {
    #[serde(default)]
    pub sun: Option<SunSpec>,
    #[serde(default)]
    pub stars: Vec<StarSpec>,
    #[serde(default)]
    pub mountains: Vec<MountainSpec>,
    #[serde(default)]
    pub clouds: Vec<CloudSpec>,
    #[serde(default)]
    pub trees: Vec<TreeSpec>,
    #[serde(default)]
    pub grass: Vec<GrassSpec>,
    #[serde(default)]
    pub birds: Vec<BirdSpec>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct SunSpec {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    #[serde(default)]
    pub rotation_speed: f32,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct StarSpec {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    #[serde(default)]
    pub twinkle_phase: f32,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct MountainSpec {
    pub x: f32,
    pub base_y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default = "default_shade")]
    pub shade: f32,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct CloudSpec {
    pub x: f32,
    pub y: f32,
    #[serde(default = "default_scale")]
    pub scale: f32,
    #[serde(default)]
    pub bounce_amplitude: f32,
    #[serde(default)]
    pub bounce_speed: f32,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct TreeSpec {
    pub x: f32,
    pub base_y: f32,
    pub height: f32,
    #[serde(default)]
    pub sway_phase: f32,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct GrassSpec {
    pub x: f32,
    pub y: f32,
    pub height: f32,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct BirdSpec {
    pub x: f32,
    pub y: f32,
    pub speed: f32,
    pub patrol_left: f32,
    pub patrol_right: f32,
}

pub fn builtin_design() -> Result<LevelDesign, String> {
    parse_level(BUILTIN_LEVEL_JSON, "builtin level")
}

pub fn parse_level(raw: &str, source: &str) -> Result<LevelDesign, String> {
    let design: LevelDesign = serde_json::from_str(raw)
        .map_err(|e| format!("Failed to parse level JSON {source}: {e}"))?;
    validate_level(&design)?;
    Ok(design)
}

fn validate_level(design: &LevelDesign) -> Result<(), String> {
    if design.version != SUPPORTED_VERSION {
        return Err(format!(
            "Level validation failed: unsupported version '{}'",
            design.version
        ));
    }
    if design.level_id.is_empty() {
        return Err("Level validation failed: level_id is empty".to_string());
    }
    if design.platforms.is_empty() {
        return Err("Level validation failed: platforms array is empty".to_string());
    }
    for (i, platform) in design.platforms.iter().enumerate() {
        if platform.width <= 0.0 || platform.height <= 0.0 {
            return Err(format!(
                "Level validation failed: platform {i} must have positive width and height"
            ));
        }
        if platform.float.is_some_and(|f| f.amplitude < 0.0) {
            return Err(format!(
                "Level validation failed: platform {i} has a negative float amplitude"
            ));
        }
    }
    for (i, enemy) in design.enemies.iter().enumerate() {
        if enemy.patrol_left >= enemy.patrol_right {
            return Err(format!(
                "Level validation failed: enemy {i} patrol_left must be < patrol_right"
            ));
        }
        if enemy.x < enemy.patrol_left || enemy.x > enemy.patrol_right {
            return Err(format!(
                "Level validation failed: enemy {i} starts outside its patrol bounds"
            ));
        }
        if enemy.velocity == 0.0 {
            return Err(format!(
                "Level validation failed: enemy {i} has zero velocity"
            ));
        }
    }
    for (i, bird) in design.background.birds.iter().enumerate() {
        if bird.patrol_left >= bird.patrol_right {
            return Err(format!(
                "Level validation failed: bird {i} patrol_left must be < patrol_right"
            ));
        }
    }
    if design.coins.is_empty() {
        log::warn!(
            "Level '{}' has no coins. This is allowed but often accidental.",
            design.level_id
        );
    }
    Ok(())
}

/// Build the gameplay entities, in authored order.
pub fn build_world(design: &LevelDesign) -> World {
    let platforms = design
        .platforms
        .iter()
        .map(|spec| Platform {
            x: spec.x,
            y: spec.y,
            width: spec.width,
            height: spec.height,
            float: spec.float.map(|wave| FloatMotion {
                base_y: spec.y,
                amplitude: wave.amplitude,
                speed: wave.speed,
                phase: wave.phase,
            }),
        })
        .collect();

    let enemies = design
        .enemies
        .iter()
        .map(|spec| Enemy {
            x: spec.x,
            y: spec.y,
            width: ENEMY_SIZE,
            height: ENEMY_SIZE,
            velocity: spec.velocity,
            patrol_left: spec.patrol_left,
            patrol_right: spec.patrol_right,
            zoom: spec.zoom.map(|wave| ZoomPulse {
                amplitude: wave.amplitude,
                speed: wave.speed,
                phase: wave.phase,
            }),
            zoom_scale: 1.0,
        })
        .collect();

    let coins = design.coins.iter().map(|c| Coin::new(c.x, c.y)).collect();

    World {
        platforms,
        enemies,
        coins,
        flag: Flag::new(design.flag.x, design.flag.y),
    }
}

pub fn build_background(spec: &BackgroundSpec) -> Background {
    Background {
        sun: spec.sun.map(|s| Sun {
            x: s.x,
            y: s.y,
            radius: s.radius,
            rotation: 0.0,
            rotation_speed: s.rotation_speed,
            pulse: 1.0,
        }),
        stars: spec
            .stars
            .iter()
            .map(|s| Star {
                x: s.x,
                y: s.y,
                size: s.size,
                twinkle_phase: s.twinkle_phase,
                brightness: 1.0,
            })
            .collect(),
        mountains: spec
            .mountains
            .iter()
            .map(|m| Mountain {
                x: m.x,
                base_y: m.base_y,
                width: m.width,
                height: m.height,
                shade: m.shade,
            })
            .collect(),
        clouds: spec
            .clouds
            .iter()
            .map(|c| Cloud {
                x: c.x,
                y: c.y,
                scale: c.scale,
                bounce_amplitude: c.bounce_amplitude,
                bounce_speed: c.bounce_speed,
                bounce_offset: 0.0,
            })
            .collect(),
        trees: spec
            .trees
            .iter()
            .map(|t| Tree {
                x: t.x,
                base_y: t.base_y,
                height: t.height,
                sway_phase: t.sway_phase,
                float_offset: 0.0,
            })
            .collect(),
        grass: spec
            .grass
            .iter()
            .map(|g| GrassTuft {
                x: g.x,
                y: g.y,
                height: g.height,
            })
            .collect(),
        birds: spec
            .birds
            .iter()
            .map(|b| Bird {
                x: b.x,
                base_y: b.y,
                speed: b.speed,
                direction: 1.0,
                patrol_left: b.patrol_left,
                patrol_right: b.patrol_right,
                bob_offset: 0.0,
                wing_up: false,
            })
            .collect(),
    }
}

const fn default_shade() -> f32 {
    0.4
}

const fn default_scale() -> f32 {
    1.0
}
