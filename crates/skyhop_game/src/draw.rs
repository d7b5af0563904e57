//! Turns a [`GameState`] into the flat list of shapes the renderer draws.
//!
//! Layers go back to front: sky decorations, far scenery, gameplay entities,
//! the player, and finally the optional hitbox overlay. Decorations carry a
//! parallax factor; gameplay entities are always drawn at their world
//! position (parallax 1.0), which is exactly where they collide.

use std::f32::consts::PI;

use skyhop_core::{Aabb, Transform};
use skyhop_render::{DrawCommand, ShapeKind};

use crate::entities::{Background, Facing, Player, World};
use crate::simulation::GameState;

pub const PARALLAX_SUN: f32 = 0.0;
pub const PARALLAX_STARS: f32 = 0.1;
pub const PARALLAX_MOUNTAINS: f32 = 0.3;
pub const PARALLAX_CLOUDS: f32 = 0.5;
pub const PARALLAX_BIRDS: f32 = 0.8;
pub const PARALLAX_GROUND: f32 = 1.0;

pub const CLEAR_COLOR: [f64; 3] = [0.4, 0.6, 1.0];

const PLATFORM_COLOR: [f32; 4] = [0.0, 0.5, 0.0, 1.0];
const ENEMY_COLOR: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
const COIN_COLOR: [f32; 4] = [1.0, 1.0, 0.0, 1.0];
const FLAG_COLOR: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
const POLE_COLOR: [f32; 4] = [0.5, 0.5, 0.5, 1.0];
const PLAYER_COLOR: [f32; 4] = [0.0, 0.0, 1.0, 1.0];
const EYE_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
const HITBOX_COLOR: [f32; 4] = [0.15, 0.9, 0.15, 0.35];

const SUN_COLOR: [f32; 4] = [1.0, 0.85, 0.2, 1.0];
const SUN_RAYS: u32 = 8;
const CLOUD_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 0.9];
const BIRD_COLOR: [f32; 4] = [0.1, 0.1, 0.15, 1.0];
const TRUNK_COLOR: [f32; 4] = [0.45, 0.3, 0.15, 1.0];
const CANOPY_COLOR: [f32; 4] = [0.1, 0.55, 0.2, 1.0];
const GRASS_COLOR: [f32; 4] = [0.2, 0.7, 0.2, 1.0];

const PLAYER_BOUNCE: f32 = 0.01;
const EYE_SIZE: f32 = 0.02;
const EYE_OFFSET: f32 = 0.02;
const POLE_WIDTH: f32 = 0.02;
const POLE_HEIGHT: f32 = 0.4;

/// Per-layer horizontal shift. A factor of 1.0 keeps the object fixed in the
/// world; 0.0 pins it to the screen.
pub fn parallax_x(x: f32, camera_offset: f32, parallax: f32) -> f32 {
    x + camera_offset * (1.0 - parallax)
}

pub fn build_draw_list(state: &GameState, show_hitboxes: bool) -> Vec<DrawCommand> {
    let mut commands = Vec::with_capacity(256);
    push_background(&mut commands, &state.background, state.camera_offset);
    push_world(&mut commands, &state.world);
    // Hidden on the single frame between a loss and the automatic restart.
    if !state.is_game_over() {
        push_player(&mut commands, &state.player);
    }
    if show_hitboxes {
        push_hitboxes(&mut commands, state);
    }
    commands
}

fn rect(x: f32, y: f32, width: f32, height: f32, color: [f32; 4]) -> DrawCommand {
    DrawCommand::new(
        ShapeKind::Quad,
        Transform::identity().scale(width, height).translate(x, y),
        color,
    )
}

fn circle(x: f32, y: f32, radius: f32, color: [f32; 4]) -> DrawCommand {
    DrawCommand::new(
        ShapeKind::Circle,
        Transform::identity()
            .scale(radius * 2.0, radius * 2.0)
            .translate(x, y),
        color,
    )
}

fn outline(aabb: &Aabb) -> DrawCommand {
    rect(
        aabb.center_x,
        aabb.center_y,
        aabb.width(),
        aabb.height(),
        HITBOX_COLOR,
    )
}

pub fn push_background(out: &mut Vec<DrawCommand>, background: &Background, camera_offset: f32) {
    if let Some(sun) = &background.sun {
        let x = parallax_x(sun.x, camera_offset, PARALLAX_SUN);
        let radius = sun.radius * sun.pulse;
        for ray in 0..SUN_RAYS {
            let angle = sun.rotation + ray as f32 * (2.0 * PI / SUN_RAYS as f32);
            out.push(DrawCommand::new(
                ShapeKind::Triangle,
                Transform::identity()
                    .scale(radius * 0.35, radius * 0.6)
                    .translate(0.0, radius * 1.3)
                    .rotate_z(angle)
                    .translate(x, sun.y),
                SUN_COLOR,
            ));
        }
        out.push(circle(x, sun.y, radius, SUN_COLOR));
    }

    for star in &background.stars {
        let x = parallax_x(star.x, camera_offset, PARALLAX_STARS);
        out.push(DrawCommand::new(
            ShapeKind::Diamond,
            Transform::identity()
                .scale(star.size, star.size)
                .translate(x, star.y),
            [1.0, 1.0, 0.9, star.brightness.clamp(0.0, 1.0)],
        ));
    }

    for mountain in &background.mountains {
        let x = parallax_x(mountain.x, camera_offset, PARALLAX_MOUNTAINS);
        let shade = mountain.shade;
        out.push(DrawCommand::new(
            ShapeKind::Triangle,
            Transform::identity()
                .scale(mountain.width, mountain.height)
                .translate(x, mountain.base_y + mountain.height * 0.5),
            [shade * 0.8, shade * 0.8, shade, 1.0],
        ));
    }

    for cloud in &background.clouds {
        let x = parallax_x(cloud.x, camera_offset, PARALLAX_CLOUDS);
        let y = cloud.y + cloud.bounce_offset;
        let r = 0.06 * cloud.scale;
        out.push(circle(x - r, y, r, CLOUD_COLOR));
        out.push(circle(x + r, y, r, CLOUD_COLOR));
        out.push(circle(x, y + r * 0.6, r * 1.2, CLOUD_COLOR));
    }

    for bird in &background.birds {
        let x = parallax_x(bird.x, camera_offset, PARALLAX_BIRDS);
        let y = bird.y();
        let wing_h = if bird.wing_up { 0.025 } else { -0.025 };
        out.push(DrawCommand::new(
            ShapeKind::Triangle,
            Transform::identity()
                .scale(0.03, wing_h)
                .translate(x - 0.015, y + wing_h * 0.5),
            BIRD_COLOR,
        ));
        out.push(DrawCommand::new(
            ShapeKind::Triangle,
            Transform::identity()
                .scale(0.03, wing_h)
                .translate(x + 0.015, y + wing_h * 0.5),
            BIRD_COLOR,
        ));
        out.push(DrawCommand::new(
            ShapeKind::Diamond,
            Transform::identity().scale(0.02, 0.012).translate(x, y),
            BIRD_COLOR,
        ));
    }

    for tree in &background.trees {
        let x = parallax_x(tree.x, camera_offset, PARALLAX_GROUND);
        let y = tree.base_y + tree.float_offset;
        let trunk_h = tree.height * 0.4;
        out.push(rect(x, y + trunk_h * 0.5, tree.height * 0.12, trunk_h, TRUNK_COLOR));
        out.push(circle(x, y + trunk_h + tree.height * 0.3, tree.height * 0.3, CANOPY_COLOR));
    }

    for tuft in &background.grass {
        let x = parallax_x(tuft.x, camera_offset, PARALLAX_GROUND);
        out.push(DrawCommand::new(
            ShapeKind::Triangle,
            Transform::identity()
                .scale(tuft.height * 0.6, tuft.height)
                .translate(x, tuft.y + tuft.height * 0.5),
            GRASS_COLOR,
        ));
    }
}

pub fn push_world(out: &mut Vec<DrawCommand>, world: &World) {
    for platform in &world.platforms {
        out.push(rect(
            platform.x,
            platform.y,
            platform.width,
            platform.height,
            PLATFORM_COLOR,
        ));
    }

    let flag = &world.flag;
    let pole_x = flag.x - flag.width * 0.5;
    out.push(rect(
        pole_x,
        flag.y + flag.height * 0.5 - POLE_HEIGHT * 0.5,
        POLE_WIDTH,
        POLE_HEIGHT,
        POLE_COLOR,
    ));
    out.push(rect(flag.x, flag.y, flag.width, flag.height, FLAG_COLOR));

    for coin in world.coins.iter().filter(|c| !c.collected) {
        out.push(circle(coin.x, coin.y, coin.width * 0.5, COIN_COLOR));
    }

    for enemy in &world.enemies {
        out.push(DrawCommand::new(
            ShapeKind::Quad,
            Transform::identity()
                .scale(
                    enemy.width * enemy.zoom_scale,
                    enemy.height * enemy.zoom_scale,
                )
                .translate(enemy.x, enemy.y),
            ENEMY_COLOR,
        ));
    }
}

pub fn push_player(out: &mut Vec<DrawCommand>, player: &Player) {
    let y = player.y + f32::from(player.anim_frame) * PLAYER_BOUNCE;
    out.push(rect(player.x, y, player.width, player.height, PLAYER_COLOR));
    let eye_x = match player.facing {
        Facing::Right => player.x + EYE_OFFSET,
        Facing::Left => player.x - EYE_OFFSET,
    };
    out.push(rect(eye_x, y + EYE_OFFSET, EYE_SIZE, EYE_SIZE, EYE_COLOR));
}

/// Collision boxes exactly as the simulation sees them.
fn push_hitboxes(out: &mut Vec<DrawCommand>, state: &GameState) {
    let world = &state.world;
    out.extend(world.platforms.iter().map(|p| outline(&p.aabb())));
    out.extend(world.enemies.iter().map(|e| outline(&e.aabb())));
    out.extend(
        world
            .coins
            .iter()
            .filter(|c| !c.collected)
            .map(|c| outline(&c.aabb())),
    );
    out.push(outline(&world.flag.aabb()));
    out.push(outline(&state.player.aabb()));
}
