//! # photo_pool
//!
//! The set of live photo objects in the scene.
//!
//! [`PhotoPool`] hands out ids from the photo range, places each arrival on
//! the ribbon, and keeps a [`ShuffleBag`] so that focus picks cycle through
//! every photo before any repeats.
//!
//! ## Invariants
//!
//! * Ids are never reused, so no two live photos share one.
//! * The shuffle bag only ever holds ids of live photos, each at most once.
//! * Unknown ids are ignored: removing a stale id is a silent no-op.
//!
//! Mode bookkeeping (dropping the focus when its photo goes away) belongs to
//! the caller; [`PhotoPool::remove_photo`] just reports what it removed.

pub mod bag;

pub use bag::ShuffleBag;

use pose_catalog::{ChoreographedObject, ObjectId, PhotoFrame, RibbonCurve, TreeShape, PHOTO_ID_BASE};
use rand::rngs::StdRng;
use rand::SeedableRng;

// ════════════════════════════════════════════════════════════════════════════
// PhotoPool
// ════════════════════════════════════════════════════════════════════════════

pub struct PhotoPool {
    photos:  Vec<ChoreographedObject>,
    bag:     ShuffleBag,
    ribbon:  RibbonCurve,
    next_id: u32,
    /// Photos ever placed; drives the ribbon slot and never goes down, so a
    /// deletion doesn't make the next arrival land on an occupied slot.
    placed:  usize,
    rng:     StdRng,
}

impl PhotoPool {
    pub fn new(shape: &TreeShape, seed: u64) -> Self {
        Self::with_rng(shape, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(shape: &TreeShape, rng: StdRng) -> Self {
        PhotoPool {
            photos:  Vec::new(),
            bag:     ShuffleBag::new(),
            ribbon:  RibbonCurve::new(shape),
            next_id: PHOTO_ID_BASE,
            placed:  0,
            rng,
        }
    }

    // ── mutation ─────────────────────────────────────────────────────────

    /// Register a new photo and return its id.  Never fails.
    pub fn add_photo(&mut self, frame: PhotoFrame) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;

        let photo = ChoreographedObject::photo(id, self.placed, frame, &self.ribbon, &mut self.rng);
        self.placed += 1;

        self.photos.push(photo);
        self.bag.insert(id);
        tracing::debug!(%id, live = self.photos.len(), "photo added to pool");
        id
    }

    /// Remove a photo and prune it from the shuffle bag.
    ///
    /// Returns the removed record, or `None` if `id` is not live.
    pub fn remove_photo(&mut self, id: ObjectId) -> Option<ChoreographedObject> {
        let index = self.photos.iter().position(|p| p.id == id)?;
        let photo = self.photos.remove(index);
        self.bag.remove(id);
        tracing::debug!(%id, live = self.photos.len(), "photo removed from pool");
        Some(photo)
    }

    /// Pick a random photo for focus without repeating until all came up.
    pub fn pick_random_focus_target(&mut self) -> Option<ObjectId> {
        let live = self.ids();
        let picked = self.bag.draw(&live, &mut self.rng);
        if let Some(id) = picked {
            tracing::debug!(%id, remaining = self.bag.len(), "focus target picked");
        }
        picked
    }

    // ── queries ──────────────────────────────────────────────────────────

    pub fn len(&self) -> usize { self.photos.len() }

    pub fn is_empty(&self) -> bool { self.photos.is_empty() }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.photos.iter().any(|p| p.id == id)
    }

    pub fn get(&self, id: ObjectId) -> Option<&ChoreographedObject> {
        self.photos.iter().find(|p| p.id == id)
    }

    /// Live ids in arrival order.
    pub fn ids(&self) -> Vec<ObjectId> {
        self.photos.iter().map(|p| p.id).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChoreographedObject> {
        self.photos.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ChoreographedObject> {
        self.photos.iter_mut()
    }

    pub fn bag(&self) -> &ShuffleBag { &self.bag }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
