//! Dash MazeX - headless native runner
//!
//! Drives the fixed-timestep loop with a simple autopilot that follows the
//! level's solution path, and logs what happens. Pass a settings JSON path as
//! the first argument to override the defaults.

use std::sync::Arc;
use std::time::Duration;

use dash_mazex::Settings;
use dash_mazex::commentary::{EndPanel, StatsSummary};
use dash_mazex::consts::{MAX_SUBSTEPS, SIM_DT};
use dash_mazex::input::{InputState, Key};
use dash_mazex::renderer::build_frame;
use dash_mazex::sim::{Command, GameEvent, GamePhase, GameSession, Level, Player, apply_command, tick};

/// Frames to run before giving up
const MAX_FRAMES: u32 = 60 * 60 * 10;
/// Levels to clear before stopping
const TARGET_LEVELS: u32 = 3;

struct Runner {
    session: GameSession,
    input: InputState,
    accumulator: f32,
    panel: Option<EndPanel>,
    levels_cleared: u32,
}

impl Runner {
    fn new(session: GameSession) -> Self {
        Self {
            session,
            input: InputState::default(),
            accumulator: 0.0,
            panel: None,
            levels_cleared: 0,
        }
    }

    /// Run simulation ticks for one display frame
    fn update(&mut self, dt: f32) {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = self.input.tick_input(self.session.settings.canvas_width);
            tick(&mut self.session, &input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.clear_intents();
        }

        for event in self.session.drain_events() {
            self.handle_event(event);
        }
    }

    fn handle_event(&mut self, event: GameEvent) {
        match event {
            GameEvent::LevelStarted { level } => log::info!("Level {} started", level),
            GameEvent::Jumped => log::trace!("Jump"),
            GameEvent::LevelComplete(stats) => {
                self.levels_cleared += 1;
                match stats.to_json() {
                    Ok(json) => log::info!("Level stats:\n{}", json),
                    Err(e) => log::warn!("Could not serialize level stats: {}", e),
                }
                self.panel = Some(EndPanel::level_complete(
                    &stats,
                    &self.session.settings,
                    Arc::new(StatsSummary),
                ));
            }
            GameEvent::GameOver { cause } => {
                log::info!("Game over: {:?}", cause);
                self.panel = Some(EndPanel::game_over(cause));
            }
        }
    }

    /// Poll the overlay and press its primary control once enabled
    fn update_panel(&mut self) {
        let Some(panel) = self.panel.as_mut() else {
            return;
        };
        if panel.poll() {
            if let Some(text) = panel.commentary.as_ref().and_then(|slot| slot.display()) {
                log::info!("{}", text);
            }
        } else if panel.is_loading() {
            std::thread::sleep(Duration::from_millis(1));
        }
        if let Some(command) = panel.press(true) {
            self.panel = None;
            apply_command(&mut self.session, command);
        }
    }

    /// Steer toward the next cell on the solution path
    fn autopilot(&mut self) {
        let Some(level) = self.session.level.as_ref() else {
            return;
        };
        let (left, right, jump) = steer(level, &self.session.player);

        set_held(&mut self.input, Key::ArrowLeft, left);
        set_held(&mut self.input, Key::ArrowRight, right);
        if jump {
            self.input.key_pressed(Key::Space);
        }
    }
}

fn set_held(input: &mut InputState, key: Key, down: bool) {
    let held = match key {
        Key::ArrowLeft => input.left_down,
        Key::ArrowRight => input.right_down,
        Key::Space => false,
    };
    if down && !held {
        input.key_pressed(key);
    } else if !down && held {
        input.key_released(key);
    }
}

/// (hold left, hold right, jump) for the ball's position in `level`
fn steer(level: &Level, player: &Player) -> (bool, bool, bool) {
    let i = (player.pos.x / level.layout.cell_w).floor() as isize;
    let j = (player.pos.y / level.layout.cell_h).floor() as isize;
    let Some(here) = level.grid.index(i, j) else {
        return (false, false, false);
    };
    let next = level
        .solution
        .iter()
        .position(|&idx| idx == here)
        .and_then(|k| level.solution.get(k + 1))
        .copied()
        .unwrap_or(level.goal);

    let target = level.center_of(next);
    let dx = target.x - player.pos.x;
    let margin = level.layout.cell_w * 0.1;
    let rising_needed = target.y < player.pos.y - level.layout.cell_h * 0.25;
    (
        dx < -margin,
        dx > margin,
        rising_needed && player.vel.y >= 0.0,
    )
}

fn main() {
    env_logger::init();
    log::info!("Dash MazeX (headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load_or_default(path),
        None => Settings::default(),
    };

    let session = match GameSession::new(settings) {
        Ok(session) => session,
        Err(e) => {
            log::error!("Invalid settings: {}", e);
            std::process::exit(1);
        }
    };

    let mut runner = Runner::new(session);
    apply_command(&mut runner.session, Command::Start);

    // Headless frames are paced at exactly one tick each
    for _ in 0..MAX_FRAMES {
        if runner.session.phase == GamePhase::Playing {
            runner.autopilot();
        }
        runner.update(SIM_DT);
        runner.update_panel();

        let frame = build_frame(&runner.session);
        log::trace!("Frame: {} vertices", frame.vertices.len());

        if runner.levels_cleared >= TARGET_LEVELS {
            break;
        }
    }

    log::info!(
        "Stopped at level {} after clearing {} level(s)",
        runner.session.level_number,
        runner.levels_cleared
    );
}
