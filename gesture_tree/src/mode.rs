//! Mode state machine.
//!
//! Modes only change from classifier readings and from deleting the focused
//! photo.  The machine is fully connected and re-entering the current mode is
//! a no-op, so a held gesture keeps its focus target instead of re-picking.

use glam::Vec2;
use photo_pool::PhotoPool;
use pose_catalog::{Layout, ObjectId};

use crate::gesture::{Reading, NO_HAND_LABEL};

/// Per-frame decay of the rotation intent while no hand is visible.
pub const INTENT_DECAY: f32 = 0.95;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    #[default]
    Tree,
    Scatter,
    Focus,
    Heart,
}

impl Mode {
    /// Catalog layout this mode animates toward; focus has its own targets.
    pub fn layout(self) -> Option<Layout> {
        match self {
            Mode::Tree    => Some(Layout::Tree),
            Mode::Scatter => Some(Layout::Scatter),
            Mode::Heart   => Some(Layout::Heart),
            Mode::Focus   => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Mode::Tree    => "TREE",
            Mode::Scatter => "SCATTER",
            Mode::Focus   => "FOCUS",
            Mode::Heart   => "HEART",
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ModeState
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct ModeState {
    mode:            Mode,
    focus_target:    Option<ObjectId>,
    rotation_intent: Vec2,
    hand_detected:   bool,
    label:           &'static str,
}

impl Default for ModeState {
    fn default() -> Self {
        ModeState {
            mode:            Mode::Tree,
            focus_target:    None,
            rotation_intent: Vec2::ZERO,
            hand_detected:   false,
            label:           NO_HAND_LABEL,
        }
    }
}

impl ModeState {
    pub fn new() -> Self { Self::default() }

    /// Apply one classifier result (`None` = no hand this frame).
    ///
    /// Entering focus picks a target from `pool` if there is none yet; an
    /// empty pool leaves focus without a target.
    pub fn observe(&mut self, reading: Option<&Reading>, pool: &mut PhotoPool) {
        let Some(reading) = reading else {
            self.hand_detected = false;
            self.rotation_intent *= INTENT_DECAY;
            self.label = NO_HAND_LABEL;
            return;
        };

        self.hand_detected = true;
        self.rotation_intent = reading.rotation_intent;
        self.label = reading.gesture.label();

        match reading.gesture.mode() {
            Some(Mode::Focus) => {
                self.enter(Mode::Focus);
                if self.focus_target.is_none() {
                    self.focus_target = pool.pick_random_focus_target();
                    match self.focus_target {
                        Some(id) => tracing::info!(%id, "focusing photo"),
                        None     => tracing::debug!("focus requested with no photos"),
                    }
                }
            }
            Some(mode) => {
                self.enter(mode);
                self.focus_target = None;
            }
            None => {}
        }
    }

    /// Bookkeeping after a photo left the pool.  Losing the focus target
    /// drops back to the tree.
    pub fn on_photo_removed(&mut self, id: ObjectId) {
        if self.focus_target == Some(id) {
            self.focus_target = None;
            self.enter(Mode::Tree);
        }
    }

    fn enter(&mut self, mode: Mode) {
        if self.mode != mode {
            tracing::info!(from = self.mode.name(), to = mode.name(), "mode change");
            self.mode = mode;
        }
    }

    pub fn mode(&self) -> Mode { self.mode }

    pub fn focus_target(&self) -> Option<ObjectId> { self.focus_target }

    pub fn rotation_intent(&self) -> Vec2 { self.rotation_intent }

    pub fn hand_detected(&self) -> bool { self.hand_detected }

    pub fn label(&self) -> &'static str { self.label }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::Gesture;
    use pose_catalog::{PhotoFrame, TreeShape};

    fn reading(gesture: Gesture) -> Reading {
        Reading { gesture, rotation_intent: Vec2::new(0.2, -0.4) }
    }

    fn pool_with(n: usize) -> PhotoPool {
        let mut pool = PhotoPool::new(&TreeShape::default(), 3);
        for _ in 0..n {
            pool.add_photo(PhotoFrame::for_texture(None));
        }
        pool
    }

    #[test]
    fn starts_in_tree_without_hand() {
        let s = ModeState::new();
        assert_eq!(s.mode(), Mode::Tree);
        assert_eq!(s.label(), NO_HAND_LABEL);
        assert!(!s.hand_detected());
    }

    #[test]
    fn pinch_focuses_a_live_photo() {
        let mut pool = pool_with(3);
        let mut s = ModeState::new();
        s.observe(Some(&reading(Gesture::Pinch)), &mut pool);
        assert_eq!(s.mode(), Mode::Focus);
        let target = s.focus_target().unwrap();
        assert!(pool.contains(target));
        assert_eq!(s.label(), "Pinch (Focus)");
    }

    #[test]
    fn held_pinch_keeps_target() {
        let mut pool = pool_with(5);
        let mut s = ModeState::new();
        s.observe(Some(&reading(Gesture::Pinch)), &mut pool);
        let first = s.focus_target();
        for _ in 0..10 {
            s.observe(Some(&reading(Gesture::Pinch)), &mut pool);
        }
        assert_eq!(s.focus_target(), first);
        assert_eq!(pool.bag().len(), 4);
    }

    #[test]
    fn pinch_on_empty_pool_focuses_nothing() {
        let mut pool = pool_with(0);
        let mut s = ModeState::new();
        s.observe(Some(&reading(Gesture::Pinch)), &mut pool);
        assert_eq!(s.mode(), Mode::Focus);
        assert_eq!(s.focus_target(), None);
    }

    #[test]
    fn other_modes_clear_focus() {
        let mut pool = pool_with(2);
        let mut s = ModeState::new();
        for (g, m) in [(Gesture::Victory, Mode::Heart), (Gesture::OpenHand, Mode::Scatter), (Gesture::Fist, Mode::Tree)] {
            s.observe(Some(&reading(Gesture::Pinch)), &mut pool);
            assert!(s.focus_target().is_some());
            s.observe(Some(&reading(g)), &mut pool);
            assert_eq!(s.mode(), m);
            assert_eq!(s.focus_target(), None);
        }
    }

    #[test]
    fn unclear_hand_holds_mode_and_target() {
        let mut pool = pool_with(2);
        let mut s = ModeState::new();
        s.observe(Some(&reading(Gesture::Pinch)), &mut pool);
        let target = s.focus_target();
        let unclear = Reading { gesture: Gesture::Unclear, rotation_intent: Vec2::new(0.9, 0.9) };
        s.observe(Some(&unclear), &mut pool);
        assert_eq!(s.mode(), Mode::Focus);
        assert_eq!(s.focus_target(), target);
        assert_eq!(s.rotation_intent(), Vec2::new(0.9, 0.9));
        assert_eq!(s.label(), "Hand Detected");
    }

    #[test]
    fn no_hand_decays_intent_and_holds_mode() {
        let mut pool = pool_with(0);
        let mut s = ModeState::new();
        s.observe(Some(&reading(Gesture::OpenHand)), &mut pool);
        let before = s.rotation_intent();
        s.observe(None, &mut pool);
        assert_eq!(s.mode(), Mode::Scatter);
        assert!((s.rotation_intent() - before * INTENT_DECAY).length() < 1e-6);
        assert_eq!(s.label(), NO_HAND_LABEL);
        assert!(!s.hand_detected());
    }

    #[test]
    fn removing_focus_target_returns_to_tree() {
        let mut pool = pool_with(2);
        let mut s = ModeState::new();
        s.observe(Some(&reading(Gesture::Pinch)), &mut pool);
        let target = s.focus_target().unwrap();
        let other = pool.ids().into_iter().find(|&id| id != target).unwrap();

        s.on_photo_removed(other);
        assert_eq!(s.mode(), Mode::Focus);

        s.on_photo_removed(target);
        assert_eq!(s.mode(), Mode::Tree);
        assert_eq!(s.focus_target(), None);
    }

    #[test]
    fn layouts() {
        assert_eq!(Mode::Tree.layout(), Some(Layout::Tree));
        assert_eq!(Mode::Focus.layout(), None);
    }
}
