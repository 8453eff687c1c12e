//! Failures at the collaborator edges.
//!
//! The choreography core itself never fails: stale ids are ignored and an
//! empty photo pool just means nothing gets focused.  Everything here comes
//! from the outside world (tracker start-up, image files, the window), and
//! apart from the window none of it stops the scene.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SceneError {
    /// The hand tracker could not start; the scene keeps running without
    /// gestures.
    #[error("hand tracker unavailable: {0}")]
    TrackerUnavailable(String),

    #[error("landmark replay, line {line}: {source}")]
    Replay {
        line:   usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot read {}: {source}", path.display())]
    Io {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("preview window: {0}")]
    Window(String),
}
