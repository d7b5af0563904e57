//! Plain-text heads-up display written to a terminal (or any `Write`).
//!
//! The renderer has no text pipeline, so score, coin pickups and the end of
//! game banners go to stdout. Write failures are returned to the caller,
//! which logs them and keeps the game running.

use std::io::{self, Write};

use crate::simulation::{GameEvent, GameState};

const RULE: &str = "=====================================";

/// Frames between two status-line refreshes.
pub const REFRESH_INTERVAL_FRAMES: u64 = 10;

pub struct Hud<W: Write> {
    out: W,
}

impl<W: Write> Hud<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn print_instructions(&mut self) -> io::Result<()> {
        writeln!(self.out, "{RULE}")?;
        writeln!(self.out, "           SKYHOP")?;
        writeln!(self.out, "Controls:")?;
        writeln!(self.out, "  LEFT ARROW  - Move left")?;
        writeln!(self.out, "  RIGHT ARROW - Move right")?;
        writeln!(self.out, "  SPACE/UP    - Jump")?;
        writeln!(self.out, "  R           - Restart game")?;
        writeln!(self.out, "  F4          - Toggle hitboxes")?;
        writeln!(self.out, "  ESC         - Quit game")?;
        writeln!(self.out)?;
        writeln!(self.out, "Objectives:")?;
        writeln!(self.out, "  - Collect coins for points")?;
        writeln!(self.out, "  - Avoid red enemies")?;
        writeln!(self.out, "  - Reach the green flag to win")?;
        writeln!(self.out, "{RULE}")?;
        self.out.flush()
    }

    /// Rewrite the status line in place.
    pub fn refresh(&mut self, state: &GameState) -> io::Result<()> {
        write!(
            self.out,
            "\r{}",
            status_line(state.score, state.coins_collected(), state.world.coins.len())
        )?;
        self.out.flush()
    }

    pub fn report(&mut self, event: &GameEvent) -> io::Result<()> {
        match *event {
            GameEvent::GameWon { score } => {
                writeln!(self.out, "\n\n{RULE}")?;
                writeln!(self.out, "   CONGRATULATIONS! YOU WON!")?;
                writeln!(self.out, "   Final Score: {score}")?;
                writeln!(self.out, "{RULE}")?;
            }
            GameEvent::GameOver { cause, score } => {
                writeln!(self.out, "\n\n{RULE}")?;
                writeln!(self.out, "   GAME OVER! You {cause}.")?;
                writeln!(self.out, "   Final Score: {score}")?;
                writeln!(self.out, "{RULE}")?;
            }
            GameEvent::CoinCollected { score, .. } => {
                writeln!(self.out, "\nScore: {score}")?;
            }
            GameEvent::Restarted { .. } => return Ok(()),
        }
        self.out.flush()
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

pub fn status_line(score: u32, coins_collected: usize, coin_count: usize) -> String {
    format!("Score: {score:06}   Coins: {coins_collected}/{coin_count}   ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::builtin_design;
    use crate::simulation::{LossCause, PhysicsConfig, RestartCause};

    fn output(hud: Hud<Vec<u8>>) -> String {
        String::from_utf8(hud.into_inner()).expect("hud output is utf-8")
    }

    #[test]
    fn status_line_pads_score() {
        assert_eq!(status_line(300, 3, 10), "Score: 000300   Coins: 3/10   ");
        assert_eq!(status_line(0, 0, 0), "Score: 000000   Coins: 0/0   ");
    }

    #[test]
    fn refresh_reports_live_state() {
        let mut state = GameState::new(
            builtin_design().expect("builtin level"),
            PhysicsConfig::default(),
        );
        state.world.coins[2].collected = true;
        state.score = 100;

        let mut hud = Hud::new(Vec::new());
        hud.refresh(&state).expect("write to vec");
        let text = output(hud);
        assert!(text.starts_with('\r'));
        assert!(text.contains("Score: 000100"));
        assert!(text.contains("Coins: 1/10"));
    }

    #[test]
    fn banners_carry_final_score() {
        let mut hud = Hud::new(Vec::new());
        hud.report(&GameEvent::GameWon { score: 700 }).expect("write");
        hud.report(&GameEvent::GameOver {
            cause: LossCause::HitEnemy,
            score: 200,
        })
        .expect("write");
        let text = output(hud);
        assert!(text.contains("YOU WON!"));
        assert!(text.contains("Final Score: 700"));
        assert!(text.contains("GAME OVER! You touched an enemy."));
        assert!(text.contains("Final Score: 200"));
    }

    #[test]
    fn coin_pickup_prints_running_score() {
        let mut hud = Hud::new(Vec::new());
        hud.report(&GameEvent::CoinCollected { index: 0, score: 100 })
            .expect("write");
        assert_eq!(output(hud), "\nScore: 100\n");
    }

    #[test]
    fn restart_prints_nothing() {
        let mut hud = Hud::new(Vec::new());
        hud.report(&GameEvent::Restarted {
            cause: RestartCause::Manual,
        })
        .expect("write");
        assert!(output(hud).is_empty());
    }

    #[test]
    fn instructions_list_every_control() {
        let mut hud = Hud::new(Vec::new());
        hud.print_instructions().expect("write");
        let text = output(hud);
        for control in ["LEFT ARROW", "RIGHT ARROW", "SPACE/UP", "R ", "ESC"] {
            assert!(text.contains(control), "missing {control}");
        }
    }
}
