//! Renderer seam.
//!
//! The scene never holds render resources itself.  It tells a [`Renderer`]
//! when an id appears or goes away and hands it a borrowed [`Frame`] once per
//! tick; the renderer keeps whatever per-id state it needs.  Input flows back
//! as [`UiCommand`]s.

use std::collections::HashSet;

use glam::Quat;
use photo_pool::PhotoPool;
use pose_catalog::{ChoreographedObject, ObjectId};

use crate::error::SceneError;
use crate::gallery::Gallery;
use crate::ingest::TextureHandle;
use crate::mode::Mode;
use crate::snow::SnowField;
use crate::stage::Star;

/// User requests coming back from the preview.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UiCommand {
    ToggleUi,
    SelectNextPhoto,
    DeleteSelectedPhoto,
    Quit,
}

/// Status line contents.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hud {
    pub mode:    Mode,
    pub label:   &'static str,
    pub photos:  usize,
    pub focus:   Option<ObjectId>,
    pub show_ui: bool,
}

/// Everything visible this tick, borrowed from the scene.
pub struct Frame<'a> {
    pub scene_rotation: Quat,
    pub decorations:    &'a [ChoreographedObject],
    pub photos:         &'a PhotoPool,
    pub star:           &'a Star,
    pub snow:           &'a SnowField,
    pub gallery:        &'a Gallery,
    pub hud:            Hud,
}

pub trait Renderer {
    /// A new object joined the scene.  Photos come with their texture.
    fn spawn(&mut self, obj: &ChoreographedObject, texture: Option<&TextureHandle>);

    /// Release everything held for `id`.  Must tolerate unknown ids.
    fn dispose(&mut self, id: ObjectId);

    fn draw(&mut self, frame: &Frame<'_>) -> Result<(), SceneError>;

    /// Input gathered since the last call.
    fn poll_commands(&mut self) -> Vec<UiCommand> { Vec::new() }

    /// False once the output has gone away (window closed).
    fn is_open(&self) -> bool { true }
}

// ════════════════════════════════════════════════════════════════════════════
// NullRenderer
// ════════════════════════════════════════════════════════════════════════════

/// Headless renderer: tracks which ids are live and counts frames.
#[derive(Debug, Default)]
pub struct NullRenderer {
    live:     HashSet<ObjectId>,
    textured: HashSet<ObjectId>,
    frames:   u64,
    last_hud: Option<Hud>,
}

impl NullRenderer {
    pub fn new() -> Self { Self::default() }

    pub fn is_live(&self, id: ObjectId) -> bool { self.live.contains(&id) }

    pub fn live_count(&self) -> usize { self.live.len() }

    pub fn has_texture(&self, id: ObjectId) -> bool { self.textured.contains(&id) }

    pub fn frames(&self) -> u64 { self.frames }

    pub fn last_hud(&self) -> Option<Hud> { self.last_hud }
}

impl Renderer for NullRenderer {
    fn spawn(&mut self, obj: &ChoreographedObject, texture: Option<&TextureHandle>) {
        self.live.insert(obj.id);
        if texture.is_some() {
            self.textured.insert(obj.id);
        }
    }

    fn dispose(&mut self, id: ObjectId) {
        self.live.remove(&id);
        self.textured.remove(&id);
    }

    fn draw(&mut self, frame: &Frame<'_>) -> Result<(), SceneError> {
        self.frames += 1;
        self.last_hud = Some(frame.hud);
        Ok(())
    }
}
