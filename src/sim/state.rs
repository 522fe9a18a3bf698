//! Game session, level and player state
//!
//! A [`GameSession`] owns everything for the current level. Regeneration
//! replaces the whole [`Level`]; nothing is carried over between levels.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{WallSegment, build_wall_segments};
use super::graph::{farthest_cell, solve_path};
use super::grid::{Grid, Side};
use super::maze;
use super::obstacles::{Obstacle, place_obstacles};
use crate::cell_center;
use crate::consts::*;
use crate::palette::Palette;
use crate::settings::{ConfigError, Settings, validate_canvas};
use crate::stats::{LevelStats, StepCounters};

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Main menu
    Menu,
    /// Controls/help screen reached from the menu
    Info,
    /// Active gameplay
    Playing,
    /// Simulation frozen
    Paused,
    /// Goal reached, waiting for continue/restart/exit
    LevelComplete,
    /// Run ended
    GameOver,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverCause {
    TimeUp,
    Obstacle,
}

/// Notifications for collaborators outside the simulation (audio, overlays)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    LevelStarted { level: u32 },
    Jumped,
    LevelComplete(LevelStats),
    GameOver { cause: GameOverCause },
}

/// Grid dimensions for a level on a given canvas
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub cols: usize,
    pub rows: usize,
    pub cell_w: f32,
    pub cell_h: f32,
}

impl Layout {
    /// Size the grid for `level`. The canvas must already be validated.
    ///
    /// A canvas too small for two cells is split in two along its longer
    /// side, so the goal can never be the spawn cell.
    pub fn for_level(level: u32, width: f32, height: f32) -> Self {
        let base = base_cell_size(level);
        let mut cols = ((width / base).floor() as usize).max(1);
        let mut rows = ((height / base).floor() as usize).max(1);
        if cols * rows == 1 {
            if width >= height {
                cols = 2;
            } else {
                rows = 2;
            }
        }
        Self {
            cols,
            rows,
            cell_w: width / cols as f32,
            cell_h: height / rows as f32,
        }
    }

    #[inline]
    pub fn min_side(&self) -> f32 {
        self.cell_w.min(self.cell_h)
    }
}

/// Nominal cell size for a level: shrinks 5px per level, never below 20px
pub fn base_cell_size(level: u32) -> f32 {
    let shrink = level.saturating_sub(1) as f32 * CELL_SHRINK_PER_LEVEL;
    (BASE_CELL_SIZE - shrink).max(MIN_CELL_SIZE)
}

/// Seconds allowed to finish a level
pub fn allowed_time(level: u32) -> u32 {
    BASE_ALLOWED_SECS + ALLOWED_SECS_PER_LEVEL * level.saturating_sub(1)
}

/// The player's ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Pixels per tick
    pub vel: Vec2,
    pub radius: f32,
}

impl Player {
    pub fn spawn_at(pos: Vec2, radius: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius,
        }
    }
}

/// Everything generated for one level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    pub number: u32,
    pub layout: Layout,
    pub grid: Grid,
    pub spawn: usize,
    pub goal: usize,
    /// Spawn-to-goal path, kept for reference only
    pub solution: Vec<usize>,
    pub walls: Vec<WallSegment>,
    pub allowed_secs: u32,
    pub elapsed_secs: f64,
    pub palette: Palette,
    pub counters: StepCounters,
    /// Set once the completion statistics have been emitted
    pub stats_logged: bool,
}

impl Level {
    /// Build a fresh level: size, carve, braid, pick spawn/goal, place
    /// obstacles and compile walls.
    pub fn generate<R: Rng + ?Sized>(
        number: u32,
        width: f32,
        height: f32,
        braid_probability: f64,
        rng: &mut R,
    ) -> Self {
        let layout = Layout::for_level(number, width, height);
        let mut grid = Grid::new(layout.cols, layout.rows);

        maze::generate(&mut grid, braid_probability, rng);

        let spawn = choose_spawn(&grid, rng);
        let goal = farthest_cell(&grid, spawn);
        let solution = solve_path(&grid, spawn, goal).unwrap_or_default();

        place_obstacles(
            &mut grid,
            number,
            spawn,
            goal,
            layout.cell_w,
            layout.cell_h,
            rng,
        );
        let walls = build_wall_segments(&grid, layout.cell_w, layout.cell_h);
        let palette = Palette::random(rng);

        log::info!(
            "Level {}: {}x{} grid, spawn {} goal {} ({} steps), {} wall segments",
            number,
            layout.cols,
            layout.rows,
            spawn,
            goal,
            solution.len().saturating_sub(1),
            walls.len()
        );

        Self {
            number,
            layout,
            grid,
            spawn,
            goal,
            solution,
            walls,
            allowed_secs: allowed_time(number),
            elapsed_secs: 0.0,
            palette,
            counters: StepCounters::default(),
            stats_logged: false,
        }
    }

    /// Pixel center of a cell
    pub fn center_of(&self, idx: usize) -> Vec2 {
        let cell = self.grid.cell(idx);
        cell_center(cell.i, cell.j, self.layout.cell_w, self.layout.cell_h)
    }

    /// Top-left and bottom-right corners of the goal cell
    pub fn goal_rect(&self) -> (Vec2, Vec2) {
        let cell = self.grid.cell(self.goal);
        let min = Vec2::new(
            cell.i as f32 * self.layout.cell_w,
            cell.j as f32 * self.layout.cell_h,
        );
        (min, min + Vec2::new(self.layout.cell_w, self.layout.cell_h))
    }

    /// True if `p` lies strictly inside the goal cell
    pub fn goal_contains(&self, p: Vec2) -> bool {
        let (min, max) = self.goal_rect();
        p.x > min.x && p.x < max.x && p.y > min.y && p.y < max.y
    }

    /// Obstacles with their cell centers
    pub fn obstacles(&self) -> impl Iterator<Item = (Vec2, &Obstacle)> + '_ {
        self.grid.cells().iter().filter_map(move |c| {
            c.obstacle.as_ref().map(|o| {
                (
                    cell_center(c.i, c.j, self.layout.cell_w, self.layout.cell_h),
                    o,
                )
            })
        })
    }

    /// Seconds left on the level timer, never negative
    pub fn remaining_secs(&self) -> f64 {
        (self.allowed_secs as f64 - self.elapsed_secs).max(0.0)
    }

    pub fn ball_radius(&self) -> f32 {
        self.layout.min_side() * BALL_RADIUS_FACTOR
    }
}

/// Pick a spawn cell among those with a standing floor, else cell 0
pub fn choose_spawn<R: Rng + ?Sized>(grid: &Grid, rng: &mut R) -> usize {
    let candidates: Vec<usize> = (0..grid.len())
        .filter(|&idx| grid.cell(idx).has_wall(Side::Bottom))
        .collect();
    if candidates.is_empty() {
        return 0;
    }
    candidates[rng.random_range(0..candidates.len())]
}

/// Complete game session: phase, level counter, current level and ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSession {
    pub settings: Settings,
    pub phase: GamePhase,
    /// Level counter; starts at 1, resets on restart/exit
    pub level_number: u32,
    /// Present once a level has been generated
    pub level: Option<Level>,
    pub player: Player,
    /// Simulation clock in milliseconds (advances only while playing)
    pub clock_ms: f64,
    /// Events since the last [`GameSession::drain_events`]
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    #[serde(skip, default = "default_rng")]
    rng: Pcg32,
}

fn default_rng() -> Pcg32 {
    Pcg32::seed_from_u64(rand::random())
}

impl GameSession {
    /// Create a session in the menu. Uses the settings seed when present.
    pub fn new(settings: Settings) -> Result<Self, ConfigError> {
        let seed = settings.seed.unwrap_or_else(rand::random::<u64>);
        Self::with_seed(settings, seed)
    }

    /// Create a session with an explicit RNG seed
    pub fn with_seed(settings: Settings, seed: u64) -> Result<Self, ConfigError> {
        settings.validate()?;
        log::info!("Session created with seed {}", seed);
        Ok(Self {
            settings,
            phase: GamePhase::Menu,
            level_number: 1,
            level: None,
            player: Player::spawn_at(Vec2::ZERO, 0.0),
            clock_ms: 0.0,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        })
    }

    /// Regenerate everything for the current level counter and respawn the ball
    pub fn regenerate(&mut self) {
        let level = Level::generate(
            self.level_number,
            self.settings.canvas_width,
            self.settings.canvas_height,
            self.settings.braid_probability,
            &mut self.rng,
        );
        self.player = Player::spawn_at(level.center_of(level.spawn), level.ball_radius());
        self.level = Some(level);
        self.events.push(GameEvent::LevelStarted {
            level: self.level_number,
        });
    }

    /// Change the canvas size. An active level is regenerated to fit.
    pub fn resize(&mut self, width: f32, height: f32) -> Result<(), ConfigError> {
        validate_canvas(width, height)?;
        self.settings.canvas_width = width;
        self.settings.canvas_height = height;
        if matches!(self.phase, GamePhase::Playing | GamePhase::Paused) {
            self.regenerate();
        }
        Ok(())
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
