//! Top-level scene and run loop.
//!
//! `Scene` owns the stage, the photo pool, the mode state, the snow and the
//! gallery.  It is the only place where a photo is added or removed, so the
//! pool, the renderer, the gallery and the mode state always agree on which
//! ids exist.  `run` wires it to a hand feed, the ingestion workers, a
//! renderer and a tick source.

use std::path::PathBuf;
use std::sync::mpsc;

use photo_pool::PhotoPool;
use pose_catalog::{ObjectId, PhotoFrame, TreeShape};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::SceneError;
use crate::gallery::Gallery;
use crate::gesture::{classify, LandmarkSet};
use crate::ingest::{Ingest, TextureHandle, Thumbnail};
use crate::mode::ModeState;
use crate::render::{Frame, Hud, NullRenderer, Renderer, UiCommand};
use crate::snow::SnowField;
use crate::stage::Stage;
use crate::ticker::{FixedRateTicker, TickSource};
use crate::tracking::{spawn_hand_source, HandFeed, ReplayHandSource, SimHandSource};
use crate::visualizer::Visualizer;

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Configuration for the full application.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub seed:        u64,
    pub decorations: usize,
    pub snow:        usize,
    pub tree:        TreeShape,
    pub fps:         u32,
    /// Add one blank photo at start so focus has something to show.
    pub placeholder: bool,
    /// Image files to ingest at start.
    pub photos:      Vec<PathBuf>,
    /// Recorded landmark frames to replay instead of keyboard simulation.
    pub landmarks:   Option<PathBuf>,
    /// Open the preview window; headless otherwise.
    pub window:      bool,
    /// Stop after this many frames.
    pub frames:      Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            seed:        2024,
            decorations: 1200,
            snow:        1000,
            tree:        TreeShape::default(),
            fps:         60,
            placeholder: true,
            photos:      Vec::new(),
            landmarks:   None,
            window:      true,
            frames:      None,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Scene
// ════════════════════════════════════════════════════════════════════════════

pub struct Scene {
    // ── choreography ─────────────────────────────────────────────────────
    stage:   Stage,
    pool:    PhotoPool,
    mode:    ModeState,

    // ── ambience ─────────────────────────────────────────────────────────
    snow:    SnowField,

    // ── user-facing ──────────────────────────────────────────────────────
    gallery: Gallery,
    show_ui: bool,
}

impl Scene {
    /// Build the scene and announce every initial object to `renderer`.
    pub fn new(cfg: &AppConfig, renderer: &mut dyn Renderer) -> Self {
        let mut rng = StdRng::seed_from_u64(cfg.seed);
        let mut scene = Scene {
            stage:   Stage::build(cfg.decorations, &cfg.tree, &mut rng),
            pool:    PhotoPool::new(&cfg.tree, cfg.seed.wrapping_add(1)),
            mode:    ModeState::new(),
            snow:    SnowField::new(cfg.snow, cfg.seed.wrapping_add(2)),
            gallery: Gallery::new(),
            show_ui: true,
        };

        if cfg.placeholder {
            scene.add_photo(None, None, renderer);
        }
        for obj in scene.stage.decorations() {
            renderer.spawn(obj, None);
        }

        tracing::info!(
            decorations = scene.stage.decorations().len(),
            photos      = scene.pool.len(),
            snow        = cfg.snow,
            seed        = cfg.seed,
            "scene ready"
        );
        scene
    }

    // ── photos ───────────────────────────────────────────────────────────

    /// Add a photo.  `bytes` present means it came from the user and gets a
    /// gallery entry.
    pub fn add_photo(
        &mut self,
        texture:  Option<&TextureHandle>,
        bytes:    Option<&[u8]>,
        renderer: &mut dyn Renderer,
    ) -> ObjectId {
        let frame = PhotoFrame::for_texture(texture.map(TextureHandle::size));
        let id = self.pool.add_photo(frame);
        if let Some(obj) = self.pool.get(id) {
            renderer.spawn(obj, texture);
        }
        if let Some(bytes) = bytes {
            let thumb = texture.map(|t| t.thumbnail.clone()).unwrap_or_else(Thumbnail::blank);
            self.gallery.insert(id, thumb, bytes.len());
        }
        tracing::info!(%id, photos = self.pool.len(), "photo added");
        id
    }

    /// Remove a photo everywhere.  Unknown ids are a silent no-op.
    pub fn remove_photo(&mut self, id: ObjectId, renderer: &mut dyn Renderer) -> bool {
        if self.pool.remove_photo(id).is_none() {
            return false;
        }
        renderer.dispose(id);
        self.gallery.remove(id);
        self.mode.on_photo_removed(id);
        tracing::info!(%id, photos = self.pool.len(), "photo removed");
        true
    }

    /// Apply one UI command.  Returns false when the user asked to quit.
    pub fn handle_command(&mut self, cmd: UiCommand, renderer: &mut dyn Renderer) -> bool {
        match cmd {
            UiCommand::ToggleUi        => self.show_ui = !self.show_ui,
            UiCommand::SelectNextPhoto => self.gallery.select_next(),
            UiCommand::DeleteSelectedPhoto => {
                if let Some(id) = self.gallery.selected() {
                    self.remove_photo(id, renderer);
                }
            }
            UiCommand::Quit => return false,
        }
        true
    }

    // ── per-frame tick ───────────────────────────────────────────────────

    /// Classify this frame's hand, update the mode, and move everything.
    pub fn tick(&mut self, dt: f32, hand: Option<&LandmarkSet>) {
        let reading = hand.map(classify);
        self.mode.observe(reading.as_ref(), &mut self.pool);
        self.stage.tick(dt, &self.mode, &mut self.pool);
        self.snow.tick();
    }

    pub fn hud(&self) -> Hud {
        Hud {
            mode:    self.mode.mode(),
            label:   self.mode.label(),
            photos:  self.pool.len(),
            focus:   self.mode.focus_target(),
            show_ui: self.show_ui,
        }
    }

    pub fn frame(&self) -> Frame<'_> {
        Frame {
            scene_rotation: self.stage.scene_quat(),
            decorations:    self.stage.decorations(),
            photos:         &self.pool,
            star:           self.stage.star(),
            snow:           &self.snow,
            gallery:        &self.gallery,
            hud:            self.hud(),
        }
    }

    // ── accessors ────────────────────────────────────────────────────────

    pub fn stage(&self)   -> &Stage     { &self.stage }
    pub fn pool(&self)    -> &PhotoPool { &self.pool }
    pub fn mode(&self)    -> &ModeState { &self.mode }
    pub fn gallery(&self) -> &Gallery   { &self.gallery }
    pub fn show_ui(&self) -> bool       { self.show_ui }
}

// ════════════════════════════════════════════════════════════════════════════
// run(): the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the full application.
///
/// With a window, the keyboard drives a simulated hand unless a landmark
/// recording was given.  Headless runs replay the recording if there is one
/// and otherwise see no hand at all.
pub fn run(cfg: AppConfig) -> Result<(), SceneError> {
    let replay = cfg.landmarks.clone().map(|path| ReplayHandSource::new(path, cfg.fps));

    let (mut renderer, mut feed): (Box<dyn Renderer>, HandFeed) = match (cfg.window, replay) {
        (true, Some(source)) => {
            let vis = Visualizer::new(None)?;
            (Box::new(vis), spawn_hand_source(Box::new(source)))
        }
        (true, None) => {
            let (sim_tx, sim_rx) = mpsc::channel();
            let vis = Visualizer::new(Some(sim_tx))?;
            (Box::new(vis), spawn_hand_source(Box::new(SimHandSource { rx: sim_rx })))
        }
        (false, Some(source)) => (Box::new(NullRenderer::new()), spawn_hand_source(Box::new(source))),
        (false, None)         => (Box::new(NullRenderer::new()), HandFeed::none()),
    };

    let mut ticker = FixedRateTicker::new(cfg.fps);
    if let Some(frames) = cfg.frames {
        ticker = ticker.limited(frames);
    }

    let ingest = Ingest::new();
    if !cfg.photos.is_empty() {
        tracing::info!(files = cfg.photos.len(), "ingesting photos");
        ingest.submit(cfg.photos.iter().cloned());
    }

    let mut scene = Scene::new(&cfg, renderer.as_mut());
    let frames = drive(&mut scene, renderer.as_mut(), &mut feed, &ingest, &mut ticker)?;
    tracing::info!(frames, photos = scene.pool().len(), "scene stopped");
    Ok(())
}

/// The per-tick loop.  Returns the number of frames drawn.
///
/// Order within a tick: finished ingestion, UI commands, hand, choreography,
/// draw.  A photo deleted this tick is therefore already gone when the stage
/// moves and when the frame is drawn.
pub fn drive(
    scene:    &mut Scene,
    renderer: &mut dyn Renderer,
    feed:     &mut HandFeed,
    ingest:   &Ingest,
    ticker:   &mut dyn TickSource,
) -> Result<u64, SceneError> {
    let mut frames = 0;
    while renderer.is_open() {
        let Some(dt) = ticker.next_tick() else { break };

        // 1. Decoded photos
        for photo in ingest.drain() {
            scene.add_photo(Some(&photo.texture), Some(&photo.bytes), renderer);
        }

        // 2. Window input
        for cmd in renderer.poll_commands() {
            if !scene.handle_command(cmd, renderer) {
                return Ok(frames);
            }
        }

        // 3–4. Hand and choreography
        scene.tick(dt, feed.poll());

        // 5. Render
        renderer.draw(&scene.frame())?;
        frames += 1;
    }
    Ok(frames)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
