//! HUD text

use crate::sim::state::Level;

/// Remaining time as `Ns`, `Mm Ss` or `Hh Mm Ss` (whole seconds, floored)
pub fn format_time(remaining_secs: f64) -> String {
    let seconds = remaining_secs.max(0.0).floor() as u64;
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else {
        format!("{}h {}m {}s", seconds / 3600, (seconds % 3600) / 60, seconds % 60)
    }
}

/// Lines shown in the top-right corner while playing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HudLines {
    pub time: String,
    pub level: String,
}

impl HudLines {
    pub fn for_level(level: &Level) -> Self {
        Self {
            time: format!("⏳ {}", format_time(level.remaining_secs())),
            level: format!("Lvl: {}", level.number),
        }
    }
}
