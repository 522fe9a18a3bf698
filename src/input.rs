//! Input adapter
//!
//! Turns raw keys, pointer drags and touches into the simulation's
//! [`TickInput`]. Nothing here touches game state directly.

use glam::Vec2;

use crate::sim::tick::{Intent, TickInput};

/// Minimum drag distance (pixels) before a gesture is classified
pub const GESTURE_THRESHOLD: f32 = 20.0;
/// Half-width of the neutral band around the canvas midline for touch steering
pub const HOLD_DEAD_ZONE: f32 = 20.0;

/// Keys the game reacts to while playing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Space,
    ArrowLeft,
    ArrowRight,
}

impl Key {
    /// Intent produced by a single press
    pub fn intent(self) -> Intent {
        match self {
            Key::Space => Intent::Jump,
            Key::ArrowLeft => Intent::MoveLeft,
            Key::ArrowRight => Intent::MoveRight,
        }
    }
}

/// Classify a drag displacement.
///
/// Both axes past the threshold is a diagonal swipe: a horizontal move plus
/// a jump. Otherwise the dominant axis wins, and any vertical swipe jumps.
/// Returns no intents while the drag is still too short.
pub fn classify_swipe(delta: Vec2) -> Vec<Intent> {
    let horizontal = if delta.x < 0.0 {
        Intent::MoveLeft
    } else {
        Intent::MoveRight
    };
    let (ax, ay) = (delta.x.abs(), delta.y.abs());

    if ax > GESTURE_THRESHOLD && ay > GESTURE_THRESHOLD {
        vec![horizontal, Intent::Jump]
    } else if ax > ay && ax > GESTURE_THRESHOLD {
        vec![horizontal]
    } else if ay > ax && ay > GESTURE_THRESHOLD {
        vec![Intent::Jump]
    } else {
        Vec::new()
    }
}

/// One pointer/touch gesture at a time; at most one classification per gesture
#[derive(Debug, Clone, Default)]
pub struct GestureTracker {
    start: Option<Vec2>,
    handled: bool,
}

impl GestureTracker {
    pub fn begin(&mut self, pos: Vec2) {
        self.start = Some(pos);
        self.handled = false;
    }

    /// Feed a drag position. Returns the intents of the gesture the first
    /// time it crosses the threshold, then nothing until the next `begin`.
    pub fn drag(&mut self, pos: Vec2) -> Vec<Intent> {
        let start = *self.start.get_or_insert(pos);
        if self.handled {
            return Vec::new();
        }
        let intents = classify_swipe(pos - start);
        if !intents.is_empty() {
            self.handled = true;
        }
        intents
    }

    /// Release. An unclassified gesture is a tap, which jumps.
    pub fn end(&mut self) -> Option<Intent> {
        let tapped = self.start.take().is_some() && !self.handled;
        self.handled = false;
        tapped.then_some(Intent::Jump)
    }
}

/// Horizontal steering from a held touch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Steer {
    Left,
    Right,
}

/// Steering for a touch held at `x` on a canvas `width` pixels wide
pub fn touch_steer(x: f32, width: f32) -> Option<Steer> {
    let mid = width / 2.0;
    if x < mid - HOLD_DEAD_ZONE {
        Some(Steer::Left)
    } else if x > mid + HOLD_DEAD_ZONE {
        Some(Steer::Right)
    } else {
        None
    }
}

/// Input accumulated between simulation ticks
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub left_down: bool,
    pub right_down: bool,
    /// X of the first active touch, if any
    pub touch_x: Option<f32>,
    pub gesture: GestureTracker,
    pending: Vec<Intent>,
}

impl InputState {
    pub fn key_pressed(&mut self, key: Key) {
        match key {
            Key::ArrowLeft => self.left_down = true,
            Key::ArrowRight => self.right_down = true,
            Key::Space => {}
        }
        self.pending.push(key.intent());
    }

    pub fn key_released(&mut self, key: Key) {
        match key {
            Key::ArrowLeft => self.left_down = false,
            Key::ArrowRight => self.right_down = false,
            Key::Space => {}
        }
    }

    pub fn touch_start(&mut self, pos: Vec2) {
        self.touch_x = Some(pos.x);
        self.gesture.begin(pos);
    }

    pub fn touch_move(&mut self, pos: Vec2) {
        self.touch_x = Some(pos.x);
        let intents = self.gesture.drag(pos);
        self.pending.extend(intents);
    }

    pub fn touch_end(&mut self) {
        self.touch_x = None;
        if let Some(intent) = self.gesture.end() {
            self.pending.push(intent);
        }
    }

    /// Snapshot for the next tick on a canvas `width` pixels wide
    pub fn tick_input(&self, width: f32) -> TickInput {
        let steer = self.touch_x.and_then(|x| touch_steer(x, width));
        TickInput {
            hold_left: self.left_down || steer == Some(Steer::Left),
            hold_right: self.right_down || steer == Some(Steer::Right),
            intents: self.pending.clone(),
        }
    }

    /// Clear one-shot intents after they were processed
    pub fn clear_intents(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_drag_is_unclassified() {
        assert!(classify_swipe(Vec2::new(15.0, -19.0)).is_empty());
        assert!(classify_swipe(Vec2::new(20.0, 0.0)).is_empty());
    }

    #[test]
    fn test_horizontal_swipes() {
        assert_eq!(classify_swipe(Vec2::new(-30.0, 5.0)), vec![Intent::MoveLeft]);
        assert_eq!(classify_swipe(Vec2::new(30.0, -10.0)), vec![Intent::MoveRight]);
    }

    #[test]
    fn test_vertical_swipes_jump() {
        assert_eq!(classify_swipe(Vec2::new(0.0, -40.0)), vec![Intent::Jump]);
        assert_eq!(classify_swipe(Vec2::new(5.0, 40.0)), vec![Intent::Jump]);
    }

    #[test]
    fn test_diagonal_moves_and_jumps() {
        assert_eq!(
            classify_swipe(Vec2::new(-25.0, -25.0)),
            vec![Intent::MoveLeft, Intent::Jump]
        );
        assert_eq!(
            classify_swipe(Vec2::new(50.0, 21.0)),
            vec![Intent::MoveRight, Intent::Jump]
        );
    }

    #[test]
    fn test_gesture_classified_once() {
        let mut g = GestureTracker::default();
        g.begin(Vec2::new(100.0, 100.0));
        assert!(g.drag(Vec2::new(110.0, 100.0)).is_empty());
        assert_eq!(g.drag(Vec2::new(130.0, 100.0)), vec![Intent::MoveRight]);
        assert!(g.drag(Vec2::new(200.0, 100.0)).is_empty());
        assert_eq!(g.end(), None);
    }

    #[test]
    fn test_tap_jumps() {
        let mut g = GestureTracker::default();
        g.begin(Vec2::new(10.0, 10.0));
        assert!(g.drag(Vec2::new(12.0, 11.0)).is_empty());
        assert_eq!(g.end(), Some(Intent::Jump));
        // Release without a press is ignored
        assert_eq!(g.end(), None);
    }

    #[test]
    fn test_touch_steer_dead_zone() {
        assert_eq!(touch_steer(100.0, 800.0), Some(Steer::Left));
        assert_eq!(touch_steer(380.0, 800.0), None);
        assert_eq!(touch_steer(420.0, 800.0), None);
        assert_eq!(touch_steer(421.0, 800.0), Some(Steer::Right));
    }

    #[test]
    fn test_input_state_snapshot() {
        let mut input = InputState::default();
        input.key_pressed(Key::ArrowLeft);
        input.key_pressed(Key::Space);
        let snapshot = input.tick_input(800.0);
        assert!(snapshot.hold_left);
        assert!(!snapshot.hold_right);
        assert_eq!(snapshot.intents, vec![Intent::MoveLeft, Intent::Jump]);

        input.clear_intents();
        input.key_released(Key::ArrowLeft);
        let snapshot = input.tick_input(800.0);
        assert!(!snapshot.hold_left);
        assert!(snapshot.intents.is_empty());
    }

    #[test]
    fn test_touch_hold_and_swipe() {
        let mut input = InputState::default();
        input.touch_start(Vec2::new(700.0, 300.0));
        assert!(input.tick_input(800.0).hold_right);
        input.touch_move(Vec2::new(700.0, 250.0));
        assert_eq!(input.tick_input(800.0).intents, vec![Intent::Jump]);
        input.touch_end();
        let snapshot = input.tick_input(800.0);
        assert!(!snapshot.hold_right);
        // The swipe was handled, so release adds no tap
        assert_eq!(snapshot.intents, vec![Intent::Jump]);
    }
}
