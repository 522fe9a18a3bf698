//! End-of-level overlays and the commentary request
//!
//! Completing a level opens a panel whose controls stay disabled while a
//! one-shot commentary request runs on a worker thread. The request never
//! blocks the simulation; its result (or failure) only fills the panel's
//! text slot and enables the controls.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use thiserror::Error;

use crate::Settings;
use crate::sim::state::GameOverCause;
use crate::sim::tick::Command;
use crate::stats::LevelStats;

/// Shown in place of commentary when the request fails
pub const FAILED_TEXT: &str = "Failed to load commentary.";

#[derive(Debug, Error)]
pub enum CommentaryError {
    #[error("commentary service unavailable: {0}")]
    Unavailable(String),
    #[error("commentary response was empty")]
    Empty,
    #[error("commentary task ended without a result")]
    Disconnected,
}

/// Produces a line of commentary for a finished level
pub trait CommentarySource: Send + Sync {
    fn fetch(&self, stats: &LevelStats) -> Result<String, CommentaryError>;
}

/// Offline source that summarizes the statistics itself
#[derive(Debug, Clone, Copy, Default)]
pub struct StatsSummary;

impl CommentarySource for StatsSummary {
    fn fetch(&self, stats: &LevelStats) -> Result<String, CommentaryError> {
        let spare = stats.allowed_time as f64 - stats.time_taken;
        Ok(format!(
            "Level {} in {:.2}s with {} moves and {} jumps, {:.0}s to spare.",
            stats.level,
            stats.time_taken,
            stats.left_count + stats.right_count,
            stats.jump_count,
            spare.max(0.0)
        ))
    }
}

/// Quote commentary for display, dropping any quotes inside it
pub fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('"', ""))
}

/// A commentary request running on a worker thread
#[derive(Debug)]
pub struct PendingCommentary {
    rx: Receiver<Result<String, CommentaryError>>,
}

impl PendingCommentary {
    /// Start fetching commentary for `stats`
    pub fn spawn(source: Arc<dyn CommentarySource>, stats: LevelStats) -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let result = source.fetch(&stats).and_then(|text| {
                if text.trim().is_empty() {
                    Err(CommentaryError::Empty)
                } else {
                    Ok(text)
                }
            });
            // The panel may already be gone
            let _ = tx.send(result);
        });
        Self { rx }
    }

    /// Non-blocking check for the result
    pub fn try_take(&self) -> Option<Result<String, CommentaryError>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(CommentaryError::Disconnected)),
        }
    }
}

/// Commentary area of the level-complete panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentarySlot {
    Loading,
    Text(String),
    Failed,
}

impl CommentarySlot {
    /// Display text; `None` while loading
    pub fn display(&self) -> Option<String> {
        match self {
            CommentarySlot::Loading => None,
            CommentarySlot::Text(text) => Some(quote(text)),
            CommentarySlot::Failed => Some(quote(FAILED_TEXT)),
        }
    }
}

/// One overlay button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelButton {
    pub label: &'static str,
    pub command: Command,
}

/// Level-complete or game-over overlay
#[derive(Debug)]
pub struct EndPanel {
    pub title: &'static str,
    pub primary: PanelButton,
    pub secondary: PanelButton,
    pub controls_enabled: bool,
    /// Present on the level-complete panel only
    pub commentary: Option<CommentarySlot>,
    pending: Option<PendingCommentary>,
}

impl EndPanel {
    /// Panel for a completed level.
    ///
    /// With commentary wanted the controls start disabled and a request is
    /// spawned; otherwise the panel is usable immediately.
    pub fn level_complete(
        stats: &LevelStats,
        settings: &Settings,
        source: Arc<dyn CommentarySource>,
    ) -> Self {
        let pending = settings
            .wants_commentary()
            .then(|| PendingCommentary::spawn(source, stats.clone()));
        if pending.is_none() {
            log::debug!("Commentary skipped for level {}", stats.level);
        }
        Self {
            title: "Level Complete! 🎉",
            primary: PanelButton {
                label: "Continue",
                command: Command::Continue,
            },
            secondary: PanelButton {
                label: "Restart",
                command: Command::Restart,
            },
            controls_enabled: pending.is_none(),
            commentary: pending.as_ref().map(|_| CommentarySlot::Loading),
            pending,
        }
    }

    /// Panel for a finished run; usable immediately
    pub fn game_over(cause: GameOverCause) -> Self {
        log::debug!("Game over panel ({:?})", cause);
        Self {
            title: "Game Over! 💥",
            primary: PanelButton {
                label: "Restart",
                command: Command::Restart,
            },
            secondary: PanelButton {
                label: "Exit",
                command: Command::Exit,
            },
            controls_enabled: true,
            commentary: None,
            pending: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Collect a finished commentary request. Returns true if the panel changed.
    pub fn poll(&mut self) -> bool {
        let Some(result) = self.pending.as_ref().and_then(PendingCommentary::try_take) else {
            return false;
        };
        self.pending = None;
        self.commentary = Some(match result {
            Ok(text) => CommentarySlot::Text(text),
            Err(e) => {
                log::warn!("Commentary failed: {}", e);
                CommentarySlot::Failed
            }
        });
        self.controls_enabled = true;
        true
    }

    /// Command for a button press; ignored while disabled
    pub fn press(&self, primary: bool) -> Option<Command> {
        if !self.controls_enabled {
            return None;
        }
        let button = if primary { &self.primary } else { &self.secondary };
        Some(button.command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::Rgb;
    use crate::stats::StepCounters;
    use std::sync::Mutex;
    use std::time::{Duration, Instant};

    fn stats() -> LevelStats {
        LevelStats::new(
            2,
            StepCounters {
                jumps: 3,
                lefts: 1,
                rights: 2,
            },
            31.5,
            63,
            Rgb::new(240, 230, 170),
            Rgb::new(30, 10, 40),
        )
    }

    struct Fixed(&'static str);

    impl CommentarySource for Fixed {
        fn fetch(&self, _stats: &LevelStats) -> Result<String, CommentaryError> {
            Ok(self.0.to_string())
        }
    }

    struct Failing;

    impl CommentarySource for Failing {
        fn fetch(&self, _stats: &LevelStats) -> Result<String, CommentaryError> {
            Err(CommentaryError::Unavailable("offline".into()))
        }
    }

    /// Blocks until released, and records how often it was asked
    struct Gated {
        gate: Mutex<mpsc::Receiver<()>>,
        calls: Mutex<u32>,
    }

    impl CommentarySource for Gated {
        fn fetch(&self, _stats: &LevelStats) -> Result<String, CommentaryError> {
            *self.calls.lock().unwrap() += 1;
            let _ = self.gate.lock().unwrap().recv();
            Ok("Finally.".into())
        }
    }

    fn poll_until_done(panel: &mut EndPanel) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !panel.poll() {
            assert!(Instant::now() < deadline, "commentary never arrived");
            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn test_quote_strips_inner_quotes() {
        assert_eq!(quote(r#"He said "wow""#), r#""He said wow""#);
    }

    #[test]
    fn test_controls_disabled_until_commentary_arrives() {
        let mut panel = EndPanel::level_complete(&stats(), &Settings::default(), Arc::new(Fixed("Nice \"run\"")));
        assert!(!panel.controls_enabled);
        assert_eq!(panel.press(true), None);
        assert_eq!(panel.commentary, Some(CommentarySlot::Loading));

        poll_until_done(&mut panel);
        assert!(panel.controls_enabled);
        assert_eq!(
            panel.commentary.as_ref().and_then(CommentarySlot::display),
            Some("\"Nice run\"".to_string())
        );
        assert_eq!(panel.press(true), Some(Command::Continue));
        assert_eq!(panel.press(false), Some(Command::Restart));
        // Later polls change nothing
        assert!(!panel.poll());
    }

    #[test]
    fn test_failure_still_enables_controls() {
        let mut panel = EndPanel::level_complete(&stats(), &Settings::default(), Arc::new(Failing));
        poll_until_done(&mut panel);
        assert!(panel.controls_enabled);
        assert_eq!(panel.commentary, Some(CommentarySlot::Failed));
        assert_eq!(
            panel.commentary.as_ref().and_then(CommentarySlot::display),
            Some("\"Failed to load commentary.\"".to_string())
        );
    }

    #[test]
    fn test_empty_response_counts_as_failure() {
        let mut panel = EndPanel::level_complete(&stats(), &Settings::default(), Arc::new(Fixed("  ")));
        poll_until_done(&mut panel);
        assert_eq!(panel.commentary, Some(CommentarySlot::Failed));
    }

    #[test]
    fn test_offline_skips_request() {
        let settings = Settings {
            online: false,
            ..Default::default()
        };
        let source = Arc::new(Gated {
            gate: Mutex::new(mpsc::channel().1),
            calls: Mutex::new(0),
        });
        let mut panel = EndPanel::level_complete(&stats(), &settings, source.clone());
        assert!(panel.controls_enabled);
        assert!(panel.commentary.is_none());
        assert!(!panel.is_loading());
        assert!(!panel.poll());
        assert_eq!(*source.calls.lock().unwrap(), 0);
    }

    #[test]
    fn test_slow_request_does_not_block() {
        let (release, gate) = mpsc::channel();
        let source = Arc::new(Gated {
            gate: Mutex::new(gate),
            calls: Mutex::new(0),
        });
        let mut panel = EndPanel::level_complete(&stats(), &Settings::default(), source);
        for _ in 0..10 {
            assert!(!panel.poll());
        }
        assert!(panel.is_loading());
        release.send(()).unwrap();
        poll_until_done(&mut panel);
        assert_eq!(panel.commentary, Some(CommentarySlot::Text("Finally.".into())));
    }

    #[test]
    fn test_game_over_panel_enabled() {
        let panel = EndPanel::game_over(GameOverCause::TimeUp);
        assert!(panel.controls_enabled);
        assert!(panel.commentary.is_none());
        assert_eq!(panel.press(true), Some(Command::Restart));
        assert_eq!(panel.press(false), Some(Command::Exit));
    }

    #[test]
    fn test_stats_summary() {
        let text = StatsSummary.fetch(&stats()).unwrap();
        assert!(text.starts_with("Level 2 in 31.50s"));
        assert!(text.contains("3 moves"));
    }
}
