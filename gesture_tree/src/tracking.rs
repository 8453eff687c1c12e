//! Hand-tracking sources and the per-tick feed that reads them.
//!
//! A [`HandSource`] runs on its own thread and pushes one [`HandFrame`] per
//! processed camera frame into a channel.  The render tick never waits on it:
//! [`HandFeed::poll`] drains whatever arrived and falls back to the previous
//! frame when nothing new is there.  A source that fails to start simply ends
//! its thread; the feed then reports "no hand" for the rest of the session.

use std::fs;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

use glam::Vec2;
use serde::Deserialize;

use crate::error::SceneError;
use crate::gesture::{HandShape, LandmarkSet};

/// Zero or one hand for one processed camera frame.
pub type HandFrame = Option<LandmarkSet>;

// ════════════════════════════════════════════════════════════════════════════
// HandSource trait
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver hand frames over a channel.
pub trait HandSource: Send + 'static {
    fn name(&self) -> &'static str;

    /// Run until the receiver hangs up or the source is exhausted.
    /// An `Err` before the first frame means the tracker never came up.
    fn run(self: Box<Self>, tx: Sender<HandFrame>) -> Result<(), SceneError>;
}

/// Spawn a hand source on its own thread and return the feed reading it.
pub fn spawn_hand_source(source: Box<dyn HandSource>) -> HandFeed {
    let (tx, rx) = mpsc::channel();
    let name = source.name();
    thread::spawn(move || {
        tracing::info!(source = name, "hand tracking started");
        match source.run(tx) {
            Ok(())  => tracing::info!(source = name, "hand tracking finished"),
            Err(e)  => tracing::warn!(source = name, "continuing without gestures: {}", e),
        }
    });
    HandFeed::new(rx)
}

// ════════════════════════════════════════════════════════════════════════════
// HandFeed
// ════════════════════════════════════════════════════════════════════════════

/// Tick-side end of a hand source.
pub struct HandFeed {
    rx:   Option<Receiver<HandFrame>>,
    last: HandFrame,
}

impl HandFeed {
    pub fn new(rx: Receiver<HandFrame>) -> Self {
        HandFeed { rx: Some(rx), last: None }
    }

    /// A feed with no tracker behind it; always reports no hand.
    pub fn none() -> Self {
        HandFeed { rx: None, last: None }
    }

    /// Latest known hand.  Never blocks.
    pub fn poll(&mut self) -> Option<&LandmarkSet> {
        if let Some(rx) = &self.rx {
            loop {
                match rx.try_recv() {
                    Ok(frame)                       => self.last = frame,
                    Err(TryRecvError::Empty)        => break,
                    Err(TryRecvError::Disconnected) => {
                        self.rx = None;
                        self.last = None;
                        break;
                    }
                }
            }
        }
        self.last.as_ref()
    }

    pub fn is_live(&self) -> bool { self.rx.is_some() }
}

// ════════════════════════════════════════════════════════════════════════════
// SimHandSource: keyboard/mouse simulation from the preview window
// ════════════════════════════════════════════════════════════════════════════

/// Raw input from the preview window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimInput {
    /// Show a hand of this shape, or take the hand away.
    Shape(Option<HandShape>),
    /// Mouse position, normalised to the window (0–1, y down).
    Palm(Vec2),
}

/// Hand source driven by [`SimInput`] events.
///
/// Each input produces one frame; between inputs the feed keeps showing the
/// last one, just like a camera that keeps seeing the same hand.
pub struct SimHandSource {
    pub rx: Receiver<SimInput>,
}

impl HandSource for SimHandSource {
    fn name(&self) -> &'static str { "keyboard" }

    fn run(self: Box<Self>, tx: Sender<HandFrame>) -> Result<(), SceneError> {
        let mut shape = None;
        let mut palm  = Vec2::splat(0.5);
        for input in self.rx {
            match input {
                SimInput::Shape(s) => shape = s,
                SimInput::Palm(p)  => palm = p,
            }
            let frame = shape.map(|s: HandShape| s.landmarks(palm));
            if tx.send(frame).is_err() {
                break;
            }
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ReplayHandSource: recorded landmark frames
// ════════════════════════════════════════════════════════════════════════════

#[derive(Deserialize)]
struct RawPoint {
    x: f32,
    y: f32,
}

/// Replays a JSON-lines recording: each line is `null` (no hand) or an array
/// of 21 `{"x":..,"y":..}` points.  Blank lines are skipped.
pub struct ReplayHandSource {
    pub path:   PathBuf,
    pub period: Duration,
}

impl ReplayHandSource {
    pub fn new(path: PathBuf, fps: u32) -> Self {
        ReplayHandSource { path, period: Duration::from_secs(1) / fps.max(1) }
    }
}

/// Parse a whole recording up front.
pub fn parse_recording(text: &str) -> Result<Vec<HandFrame>, SceneError> {
    let mut frames = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let raw: Option<Vec<RawPoint>> = serde_json::from_str(line)
            .map_err(|source| SceneError::Replay { line: i + 1, source })?;
        let frame = match raw {
            None => None,
            Some(points) => {
                let points: Vec<Vec2> = points.iter().map(|p| Vec2::new(p.x, p.y)).collect();
                let set = LandmarkSet::from_slice(&points).ok_or_else(|| {
                    SceneError::TrackerUnavailable(format!(
                        "line {} has {} landmarks, expected 21", i + 1, points.len()
                    ))
                })?;
                Some(set)
            }
        };
        frames.push(frame);
    }
    Ok(frames)
}

impl HandSource for ReplayHandSource {
    fn name(&self) -> &'static str { "replay" }

    fn run(self: Box<Self>, tx: Sender<HandFrame>) -> Result<(), SceneError> {
        let text = fs::read_to_string(&self.path)
            .map_err(|source| SceneError::Io { path: self.path.clone(), source })?;
        let frames = parse_recording(&text)?;
        tracing::info!(frames = frames.len(), path = %self.path.display(), "replaying landmarks");

        for frame in frames {
            if tx.send(frame).is_err() {
                break;
            }
            thread::sleep(self.period);
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
