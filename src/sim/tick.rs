//! Fixed timestep simulation tick and phase transitions
//!
//! Velocities are in pixels per tick; `dt` only drives the level timer and
//! the obstacle clock.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{WallSegment, circle_hits_any};
use super::state::{GameEvent, GameOverCause, GamePhase, GameSession, Level, Player};
use crate::consts::*;
use crate::stats::{LevelStats, StepCounters};

/// Discrete semantic input (one per key press or classified gesture)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    MoveLeft,
    MoveRight,
    Jump,
}

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Left is held (key down or touch on the left half)
    pub hold_left: bool,
    /// Right is held
    pub hold_right: bool,
    /// Discrete intents since the previous tick, in arrival order
    pub intents: Vec<Intent>,
}

/// Menu/overlay actions that move between phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Start,
    ShowInfo,
    Back,
    Pause,
    Resume,
    Restart,
    Continue,
    Exit,
}

/// Apply a phase command. Returns false if the command does not apply to the
/// current phase (nothing changes in that case).
pub fn apply_command(session: &mut GameSession, command: Command) -> bool {
    use Command::*;
    use GamePhase::*;

    let previous = session.phase;
    let next = match (previous, command) {
        (Menu, Start) => {
            session.regenerate();
            Playing
        }
        (Menu, ShowInfo) => Info,
        (Info, Back) => Menu,
        (Playing, Pause) => Paused,
        (Paused, Resume) => Playing,
        (Paused | LevelComplete | GameOver, Restart) => {
            session.level_number = 1;
            session.regenerate();
            Playing
        }
        (LevelComplete, Continue) => {
            session.level_number += 1;
            session.regenerate();
            Playing
        }
        (Playing | Paused | LevelComplete | GameOver, Exit) => {
            session.level_number = 1;
            session.level = None;
            Menu
        }
        (phase, command) => {
            log::debug!("Ignoring {:?} in {:?}", command, phase);
            return false;
        }
    };

    session.phase = next;
    log::info!(
        "{:?} --{:?}--> {:?} (level {})",
        previous,
        command,
        next,
        session.level_number
    );
    true
}

/// Apply one discrete intent to the ball, counting it.
///
/// Returns the event it produced, if any.
pub fn apply_intent(
    player: &mut Player,
    counters: &mut StepCounters,
    intent: Intent,
) -> Option<GameEvent> {
    match intent {
        Intent::MoveLeft => {
            player.vel.x = -MOVE_SPEED;
            counters.lefts += 1;
            None
        }
        Intent::MoveRight => {
            player.vel.x = MOVE_SPEED;
            counters.rights += 1;
            None
        }
        Intent::Jump => {
            player.vel.y = JUMP_IMPULSE;
            counters.jumps += 1;
            Some(GameEvent::Jumped)
        }
    }
}

/// Gravity then per-axis damping, applied every tick
pub fn integrate_forces(vel: &mut Vec2) {
    vel.y += GRAVITY;
    vel.y *= DAMPING_Y;
    vel.x *= DAMPING_X;
}

/// Move the ball by its velocity, one axis at a time.
///
/// Each axis is clamped to the canvas and then tested against every wall;
/// any hit cancels that axis' move for this tick and zeroes its velocity.
/// The vertical pass sees the already-resolved horizontal position, so the
/// ball slides along a wall it cannot cross.
pub fn move_player(player: &mut Player, walls: &[WallSegment], bounds: Vec2) {
    let r = player.radius;

    let mut new_x = player.pos.x + player.vel.x;
    if new_x - r < 0.0 {
        new_x = r;
        player.vel.x = 0.0;
    } else if new_x + r > bounds.x {
        new_x = bounds.x - r;
        player.vel.x = 0.0;
    }
    if circle_hits_any(Vec2::new(new_x, player.pos.y), r, walls) {
        new_x = player.pos.x;
        player.vel.x = 0.0;
    }
    player.pos.x = new_x;

    let mut new_y = player.pos.y + player.vel.y;
    if new_y - r < 0.0 {
        new_y = r;
        player.vel.y = 0.0;
    } else if new_y + r > bounds.y {
        new_y = bounds.y - r;
        player.vel.y = 0.0;
    }
    if circle_hits_any(Vec2::new(player.pos.x, new_y), r, walls) {
        new_y = player.pos.y;
        player.vel.y = 0.0;
    }
    player.pos.y = new_y;
}

/// True if the ball strictly overlaps any obstacle at clock time `t_ms`
pub fn touches_obstacle(level: &Level, player: &Player, t_ms: f64) -> bool {
    level.obstacles().any(|(center, obstacle)| {
        let pos = obstacle.position(center, t_ms);
        player.pos.distance(pos) < player.radius + obstacle.radius()
    })
}

/// Advance the session by one fixed timestep
pub fn tick(session: &mut GameSession, input: &TickInput, dt: f32) {
    if session.phase != GamePhase::Playing {
        return;
    }

    let GameSession {
        settings,
        phase,
        level,
        player,
        clock_ms,
        events,
        ..
    } = session;
    let Some(level) = level.as_mut() else {
        return;
    };

    *clock_ms += dt as f64 * 1000.0;
    level.elapsed_secs += dt as f64;

    if level.elapsed_secs >= level.allowed_secs as f64 {
        log::info!("Level {}: time up", level.number);
        *phase = GamePhase::GameOver;
        events.push(GameEvent::GameOver {
            cause: GameOverCause::TimeUp,
        });
        return;
    }

    integrate_forces(&mut player.vel);

    for &intent in &input.intents {
        if let Some(event) = apply_intent(player, &mut level.counters, intent) {
            events.push(event);
        }
    }
    if input.hold_left {
        player.vel.x = -MOVE_SPEED;
    }
    if input.hold_right {
        player.vel.x = MOVE_SPEED;
    }

    let bounds = Vec2::new(settings.canvas_width, settings.canvas_height);
    move_player(player, &level.walls, bounds);

    if touches_obstacle(level, player, *clock_ms) {
        log::info!("Level {}: hit an obstacle", level.number);
        *phase = GamePhase::GameOver;
        events.push(GameEvent::GameOver {
            cause: GameOverCause::Obstacle,
        });
        return;
    }

    if level.goal_contains(player.pos) {
        if !level.stats_logged {
            level.stats_logged = true;
            let stats = LevelStats::new(
                level.number,
                level.counters,
                level.elapsed_secs,
                level.allowed_secs,
                level.palette.background,
                level.palette.border,
            );
            log::info!(
                "Level {} complete in {:.2}s ({} steps)",
                stats.level,
                stats.time_taken,
                stats.total_steps
            );
            events.push(GameEvent::LevelComplete(stats));
        }
        *phase = GamePhase::LevelComplete;
    }
}
