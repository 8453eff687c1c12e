//! Photo ingestion: decode image files on worker threads.
//!
//! Each file gets its own thread and is decoded independently; results come
//! back over a channel that the tick drains at its start, so a photo is added
//! to the scene whole within one tick.  A file that cannot be read or decoded
//! is logged and skipped; the rest of the batch carries on.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use image::GenericImageView;

use crate::error::SceneError;

/// Side of the square preview thumbnail in pixels.
pub const THUMBNAIL_SIDE: u32 = 24;

// ════════════════════════════════════════════════════════════════════════════
// Texture
// ════════════════════════════════════════════════════════════════════════════

/// Small ARGB copy of a picture the software preview can blit.
#[derive(Clone, Debug, PartialEq)]
pub struct Thumbnail {
    pub side:   u32,
    pub pixels: Vec<u32>,
}

impl Thumbnail {
    /// Flat mid-grey square used for the placeholder photo.
    pub fn blank() -> Self {
        let side = THUMBNAIL_SIDE;
        Thumbnail { side, pixels: vec![0xFF80_8080; (side * side) as usize] }
    }

    /// Mean colour, packed ARGB.
    pub fn average(&self) -> u32 {
        if self.pixels.is_empty() {
            return 0xFF80_8080;
        }
        let (mut r, mut g, mut b) = (0u64, 0u64, 0u64);
        for &p in &self.pixels {
            r += ((p >> 16) & 0xFF) as u64;
            g += ((p >> 8) & 0xFF) as u64;
            b += (p & 0xFF) as u64;
        }
        let n = self.pixels.len() as u64;
        0xFF00_0000 | (((r / n) as u32) << 16) | (((g / n) as u32) << 8) | (b / n) as u32
    }
}

/// What the renderer holds for a photo: source size plus a thumbnail.
#[derive(Clone, Debug, PartialEq)]
pub struct TextureHandle {
    pub width:     u32,
    pub height:    u32,
    pub thumbnail: Thumbnail,
}

impl TextureHandle {
    pub fn size(&self) -> (u32, u32) { (self.width, self.height) }
}

/// A decoded file, ready for the photo pool.
#[derive(Clone, Debug)]
pub struct IngestedPhoto {
    pub source:  PathBuf,
    pub texture: TextureHandle,
    /// Original file bytes, kept for the gallery.
    pub bytes:   Vec<u8>,
}

/// Decode an in-memory image into a texture.
pub fn decode_photo(bytes: &[u8]) -> Result<TextureHandle, SceneError> {
    let img = image::load_from_memory(bytes)?;
    let (width, height) = img.dimensions();
    let small = img.thumbnail_exact(THUMBNAIL_SIDE, THUMBNAIL_SIDE).to_rgba8();
    let pixels = small
        .pixels()
        .map(|p| {
            let [r, g, b, _] = p.0;
            0xFF00_0000 | (r as u32) << 16 | (g as u32) << 8 | b as u32
        })
        .collect();
    Ok(TextureHandle {
        width,
        height,
        thumbnail: Thumbnail { side: THUMBNAIL_SIDE, pixels },
    })
}

/// Read and decode one file.
pub fn load_photo(path: &Path) -> Result<IngestedPhoto, SceneError> {
    let bytes = fs::read(path).map_err(|source| SceneError::Io { path: path.to_path_buf(), source })?;
    let texture = decode_photo(&bytes)?;
    Ok(IngestedPhoto { source: path.to_path_buf(), texture, bytes })
}

// ════════════════════════════════════════════════════════════════════════════
// Ingest
// ════════════════════════════════════════════════════════════════════════════

/// Batch ingestion front end.
pub struct Ingest {
    tx: Sender<IngestedPhoto>,
    rx: Receiver<IngestedPhoto>,
}

impl Default for Ingest {
    fn default() -> Self {
        let (tx, rx) = mpsc::channel();
        Ingest { tx, rx }
    }
}

impl Ingest {
    pub fn new() -> Self { Self::default() }

    /// Start decoding a batch of files, one worker per file.
    pub fn submit<I>(&self, paths: I)
    where
        I: IntoIterator<Item = PathBuf>,
    {
        for path in paths {
            let tx = self.tx.clone();
            thread::spawn(move || match load_photo(&path) {
                Ok(photo) => {
                    // Receiver gone means the scene shut down first.
                    let _ = tx.send(photo);
                }
                Err(e) => tracing::warn!(path = %path.display(), "skipping photo: {}", e),
            });
        }
    }

    /// Everything decoded since the last call.  Never blocks.
    pub fn drain(&self) -> Vec<IngestedPhoto> {
        self.rx.try_iter().collect()
    }
}
