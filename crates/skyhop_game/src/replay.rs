use crate::controller::PlayerIntents;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct ReplaySequence {
    #[serde(default = "default_dt")]
    pub fixed_dt: f32,
    pub frames: Vec<ReplayFrame>,
}

/// One recorded frame of held inputs, optionally held for `repeat` steps.
#[derive(Debug, Deserialize, Clone)]
pub struct ReplayFrame {
    #[serde(default)]
    pub left: bool,
    #[serde(default)]
    pub right: bool,
    #[serde(default)]
    pub jump: bool,
    #[serde(default)]
    pub restart: bool,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

impl ReplaySequence {
    pub fn expanded_intents(&self) -> Vec<PlayerIntents> {
        let mut out = Vec::new();
        for frame in &self.frames {
            let intents = PlayerIntents {
                move_left: frame.left,
                move_right: frame.right,
                jump: frame.jump,
                restart: frame.restart,
                quit: false,
            };
            for _ in 0..frame.repeat.max(1) {
                out.push(intents);
            }
        }
        out
    }
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplaySequence, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let replay: ReplaySequence = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse replay JSON {}: {e}", path.display()))?;
    validate_replay(&replay)?;
    Ok(replay)
}

fn validate_replay(replay: &ReplaySequence) -> Result<(), String> {
    if replay.fixed_dt <= 0.0 {
        return Err("Replay validation failed: fixed_dt must be > 0".to_string());
    }
    if replay.frames.is_empty() {
        return Err("Replay validation failed: frames list is empty".to_string());
    }
    Ok(())
}

const fn default_dt() -> f32 {
    1.0 / 60.0
}

const fn default_repeat() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{PLAYER_SPAWN_X, PLAYER_SPAWN_Y};
    use crate::level::builtin_design;
    use crate::simulation::{GameEvent, GameState, LossCause, PhysicsConfig, RestartCause};
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "skyhop_replay_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    fn load_inline(name_hint: &str, raw: &str) -> ReplaySequence {
        let path = temp_file_path(name_hint);
        fs::write(&path, raw).expect("write replay file");
        let replay = load_replay_from_path(&path).expect("replay should load");
        let _ = fs::remove_file(path);
        replay
    }

    fn new_game() -> GameState {
        GameState::new(
            builtin_design().expect("builtin level"),
            PhysicsConfig::default(),
        )
    }

    fn run(replay: &ReplaySequence) -> (GameState, Vec<GameEvent>) {
        let mut game = new_game();
        let mut events = Vec::new();
        for intents in replay.expanded_intents() {
            events.extend(game.step(intents, replay.fixed_dt));
        }
        (game, events)
    }

    #[test]
    fn replay_file_parses_and_expands() {
        let replay = load_inline(
            "parse",
            r#"{
              "fixed_dt": 0.016666667,
              "frames": [
                { "right": true, "repeat": 3 },
                { "jump": true }
              ]
            }"#,
        );
        let expanded = replay.expanded_intents();
        assert_eq!(expanded.len(), 4);
        assert!(expanded[0].move_right && !expanded[0].jump);
        assert!(expanded[3].jump && !expanded[3].move_right);
        assert!(expanded.iter().all(|i| !i.quit));
    }

    #[test]
    fn replay_rejects_bad_timestep() {
        let path = temp_file_path("bad_dt");
        fs::write(&path, r#"{ "fixed_dt": 0.0, "frames": [ {} ] }"#).expect("write replay file");
        let err = load_replay_from_path(&path).expect_err("zero dt must be rejected");
        assert!(err.contains("fixed_dt"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn replay_run_is_deterministic() {
        let replay = load_inline(
            "deterministic",
            r#"{
              "frames": [
                { "repeat": 30 },
                { "right": true, "repeat": 40 },
                { "right": true, "jump": true },
                { "right": true, "repeat": 90 },
                { "left": true, "repeat": 45 }
              ]
            }"#,
        );
        let (run_a, events_a) = run(&replay);
        let (run_b, events_b) = run(&replay);

        assert_eq!(events_a, events_b);
        assert_eq!(run_a.player, run_b.player);
        assert_eq!(run_a.world, run_b.world);
        assert_eq!(run_a.background, run_b.background);
        assert_eq!(run_a.score, run_b.score);
        assert_eq!(run_a.phase, run_b.phase);
        assert_eq!(run_a.camera_offset, run_b.camera_offset);
    }

    #[test]
    fn jump_arc_returns_to_the_same_platform() {
        let replay = load_inline(
            "jump_arc",
            r#"{ "frames": [ { "repeat": 30 }, { "jump": true } ] }"#,
        );
        let (mut game, _) = run(&replay);
        let mut peak = game.player.y;
        for _ in 0..120 {
            game.step(PlayerIntents::default(), replay.fixed_dt);
            peak = peak.max(game.player.y);
        }
        assert!(peak > 0.0, "jump should clear the starting platform, peak {peak}");
        assert!((game.player.y - (-0.4)).abs() < 1e-5);
        assert!(!game.player.is_jumping);
    }

    #[test]
    fn walking_right_runs_into_ground_patrol() {
        let replay = load_inline("walk_right", r#"{ "frames": [ { "right": true, "repeat": 240 } ] }"#);
        let (_, events) = run(&replay);
        let first_terminal = events
            .iter()
            .find(|e| matches!(e, GameEvent::GameOver { .. } | GameEvent::GameWon { .. }));
        assert!(matches!(
            first_terminal,
            Some(GameEvent::GameOver {
                cause: LossCause::HitEnemy,
                ..
            })
        ));
        assert!(events.contains(&GameEvent::Restarted {
            cause: RestartCause::Automatic
        }));
    }

    #[test]
    fn restart_frame_returns_to_spawn() {
        let replay = load_inline(
            "restart",
            r#"{ "frames": [ { "repeat": 30 }, { "right": true, "repeat": 20 }, { "restart": true } ] }"#,
        );
        let (game, events) = run(&replay);
        assert_eq!(
            events.last(),
            Some(&GameEvent::Restarted {
                cause: RestartCause::Manual
            })
        );
        assert_eq!((game.player.x, game.player.y), (PLAYER_SPAWN_X, PLAYER_SPAWN_Y));
        assert_eq!(game.score, 0);
    }
}
