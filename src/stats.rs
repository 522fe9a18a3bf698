//! Per-level input counters and the statistics event
//!
//! The statistics payload is handed to the commentary collaborator once per
//! completed level; its JSON field names are part of that contract.

use serde::{Deserialize, Serialize};

use crate::palette::Rgb;

/// Discrete inputs made during a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StepCounters {
    pub jumps: u32,
    pub lefts: u32,
    pub rights: u32,
}

impl StepCounters {
    pub fn total(&self) -> u32 {
        self.jumps + self.lefts + self.rights
    }
}

/// Emitted once when a level is completed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelStats {
    pub level: u32,
    pub jump_count: u32,
    pub left_count: u32,
    pub right_count: u32,
    pub total_steps: u32,
    /// Seconds, rounded to two decimals
    pub time_taken: f64,
    pub allowed_time: u32,
    pub bg_color: Rgb,
    pub grid_border_color: Rgb,
}

impl LevelStats {
    pub fn new(
        level: u32,
        counters: StepCounters,
        elapsed_secs: f64,
        allowed_time: u32,
        bg_color: Rgb,
        grid_border_color: Rgb,
    ) -> Self {
        Self {
            level,
            jump_count: counters.jumps,
            left_count: counters.lefts,
            right_count: counters.rights,
            total_steps: counters.total(),
            time_taken: (elapsed_secs * 100.0).round() / 100.0,
            allowed_time,
            bg_color,
            grid_border_color,
        }
    }

    /// Pretty JSON, as sent to the commentary service
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
