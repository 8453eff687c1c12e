//! End-to-end choreography scenarios against a headless renderer.

use glam::Vec2;
use gesture_tree::app::{AppConfig, Scene};
use gesture_tree::gesture::HandShape;
use gesture_tree::ingest::{TextureHandle, Thumbnail};
use gesture_tree::mode::Mode;
use gesture_tree::render::NullRenderer;
use pose_catalog::{ObjectId, MAX_DECORATIONS};
use std::collections::HashSet;

const DT: f32 = 1.0 / 60.0;

fn headless(placeholder: bool) -> AppConfig {
    AppConfig {
        decorations: 40,
        snow: 10,
        placeholder,
        window: false,
        ..AppConfig::default()
    }
}

fn texture(w: u32, h: u32) -> TextureHandle {
    TextureHandle { width: w, height: h, thumbnail: Thumbnail::blank() }
}

#[test]
fn add_three_pinch_then_delete_focus() {
    let mut r = NullRenderer::new();
    let mut scene = Scene::new(&headless(false), &mut r);

    let ids: Vec<ObjectId> = (0..3)
        .map(|i| scene.add_photo(Some(&texture(800 + i, 600)), Some(b"img"), &mut r))
        .collect();
    assert_eq!(scene.pool().len(), 3);
    assert_eq!(scene.gallery().len(), 3);

    let pinch = HandShape::Pinch.landmarks(Vec2::splat(0.5));
    scene.tick(DT, Some(&pinch));
    assert_eq!(scene.mode().mode(), Mode::Focus);
    let target = scene.mode().focus_target().expect("a photo to focus");
    assert!(ids.contains(&target));
    assert_eq!(scene.pool().bag().len(), 2);

    // Keep pinching: same target.
    for _ in 0..30 {
        scene.tick(DT, Some(&pinch));
    }
    assert_eq!(scene.mode().focus_target(), Some(target));

    assert!(scene.remove_photo(target, &mut r));
    assert_eq!(scene.mode().mode(), Mode::Tree);
    assert_eq!(scene.mode().focus_target(), None);
    assert!(!r.is_live(target));
    assert!(!scene.pool().bag().contains(target));
    assert_eq!(scene.pool().len(), 2);
    assert_eq!(scene.gallery().len(), 2);
    assert_eq!(scene.pool().bag().len(), 2);

    // Pinching again picks one of the survivors.
    scene.tick(DT, Some(&pinch));
    let next = scene.mode().focus_target().expect("a survivor");
    assert_ne!(next, target);
    assert!(scene.pool().contains(next));
}

#[test]
fn ten_fist_frames_converge_without_overshoot() {
    let mut r = NullRenderer::new();
    let mut scene = Scene::new(&headless(true), &mut r);
    let fist = HandShape::Fist.landmarks(Vec2::new(0.8, 0.3));
    let intent = Vec2::new(-0.4, 0.6);

    let mut prev_gap = Vec2::new(intent.x.abs(), intent.y.abs());
    for _ in 0..10 {
        scene.tick(DT, Some(&fist));
        assert_eq!(scene.mode().mode(), Mode::Tree);
        let rot = scene.stage().rotation();
        let gap = Vec2::new(intent.x - rot.x, intent.y - rot.y);
        // Same side of the target as where it started.
        assert!(gap.x <= 0.0 && gap.y >= 0.0, "overshoot: {:?}", rot);
        assert!(gap.x.abs() < prev_gap.x && gap.y.abs() < prev_gap.y);
        prev_gap = Vec2::new(gap.x.abs(), gap.y.abs());
    }

    let expected = 0.6 * (1.0 - 0.95f32.powi(10));
    assert!((scene.stage().rotation().y - expected).abs() < 1e-4);
}

#[test]
fn unclear_hand_keeps_mode() {
    let mut r = NullRenderer::new();
    let mut scene = Scene::new(&headless(true), &mut r);
    scene.tick(DT, Some(&HandShape::Victory.landmarks(Vec2::splat(0.5))));
    assert_eq!(scene.mode().mode(), Mode::Heart);
    for _ in 0..5 {
        scene.tick(DT, Some(&HandShape::Relaxed.landmarks(Vec2::splat(0.5))));
    }
    assert_eq!(scene.mode().mode(), Mode::Heart);
    assert_eq!(scene.mode().label(), "Hand Detected");
    scene.tick(DT, None);
    assert_eq!(scene.mode().mode(), Mode::Heart);
    assert_eq!(scene.mode().label(), "No Hand Detected");
}

#[test]
fn deletions_keep_pool_renderer_and_gallery_in_step() {
    let mut r = NullRenderer::new();
    let mut scene = Scene::new(&headless(true), &mut r);
    let decorations = 40;
    let mut ids = Vec::new();
    for i in 0..8 {
        ids.push(scene.add_photo(Some(&texture(100, 100 + i)), Some(b"x"), &mut r));
    }
    let pinch = HandShape::Pinch.landmarks(Vec2::splat(0.5));
    let open = HandShape::Open.landmarks(Vec2::splat(0.5));

    for (step, id) in ids.iter().enumerate() {
        let hand = if step % 2 == 0 { &pinch } else { &open };
        scene.tick(DT, Some(hand));
        scene.remove_photo(*id, &mut r);
        // Stale delete is a no-op.
        assert!(!scene.remove_photo(*id, &mut r));

        assert_eq!(r.live_count(), decorations + scene.pool().len());
        assert_eq!(scene.gallery().len(), scene.pool().len() - 1);
        if let Some(f) = scene.mode().focus_target() {
            assert!(scene.pool().contains(f));
        }
        for b in scene.pool().bag().ids() {
            assert!(scene.pool().contains(*b));
        }
    }
    // Only the placeholder is left.
    assert_eq!(scene.pool().len(), 1);
    assert!(scene.gallery().is_empty());
}

#[test]
fn empty_pool_focus_spreads_everything() {
    let mut r = NullRenderer::new();
    let mut scene = Scene::new(&headless(false), &mut r);
    let pinch = HandShape::Pinch.landmarks(Vec2::splat(0.5));
    for _ in 0..400 {
        scene.tick(DT, Some(&pinch));
    }
    assert_eq!(scene.mode().mode(), Mode::Focus);
    assert_eq!(scene.mode().focus_target(), None);
    for d in scene.stage().decorations() {
        assert!((d.pose.position - d.catalog.scatter * 1.5).length() < 1e-2);
    }
}

#[test]
fn ids_stay_unique_with_oversized_decoration_count() {
    let mut r = NullRenderer::new();
    let cfg = AppConfig { decorations: MAX_DECORATIONS + 1, ..headless(true) };
    let mut scene = Scene::new(&cfg, &mut r);
    for i in 0..4 {
        scene.add_photo(Some(&texture(300, 200 + i)), Some(b"p"), &mut r);
    }

    let decorations = scene.stage().decorations().len();
    assert_eq!(decorations, MAX_DECORATIONS);

    let mut seen = HashSet::new();
    for d in scene.stage().decorations() {
        assert!(seen.insert(d.id), "duplicate {}", d.id);
    }
    for id in scene.pool().ids() {
        assert!(seen.insert(id), "duplicate {}", id);
    }
    assert_eq!(r.live_count(), decorations + scene.pool().len());

    // Only the focused photo goes to the camera.
    let pinch = HandShape::Pinch.landmarks(Vec2::splat(0.5));
    for _ in 0..120 {
        scene.tick(DT, Some(&pinch));
    }
    let target = scene.mode().focus_target().expect("a photo to focus");
    for d in scene.stage().decorations() {
        assert!(d.id != target);
        assert!(d.pose.scale.x < 4.0);
    }
}
