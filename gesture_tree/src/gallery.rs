//! Photo gallery: the list of user-added photos with a selection cursor.
//!
//! Only photos added with bytes appear here; the placeholder does not.
//! Deleting from the gallery goes through the scene so the pool, renderer and
//! mode state stay in step.

use pose_catalog::ObjectId;

use crate::ingest::Thumbnail;

#[derive(Clone, Debug, PartialEq)]
pub struct GalleryEntry {
    pub id:        ObjectId,
    pub thumbnail: Thumbnail,
    /// Size of the original file.
    pub byte_len:  usize,
}

#[derive(Clone, Debug, Default)]
pub struct Gallery {
    entries:  Vec<GalleryEntry>,
    selected: Option<usize>,
}

impl Gallery {
    pub fn new() -> Self { Self::default() }

    pub fn insert(&mut self, id: ObjectId, thumbnail: Thumbnail, byte_len: usize) {
        self.entries.push(GalleryEntry { id, thumbnail, byte_len });
        if self.selected.is_none() {
            self.selected = Some(self.entries.len() - 1);
        }
    }

    /// Drop an entry.  Unknown ids are ignored.  The cursor stays on the
    /// same position, clamped to the shorter list.
    pub fn remove(&mut self, id: ObjectId) -> bool {
        let Some(index) = self.entries.iter().position(|e| e.id == id) else {
            return false;
        };
        self.entries.remove(index);
        self.selected = match self.selected {
            _ if self.entries.is_empty() => None,
            Some(s) if s > index         => Some(s - 1),
            Some(s)                      => Some(s.min(self.entries.len() - 1)),
            None                         => None,
        };
        true
    }

    /// Move the cursor to the next entry, wrapping around.
    pub fn select_next(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        self.selected = Some(match self.selected {
            Some(s) => (s + 1) % self.entries.len(),
            None    => 0,
        });
    }

    pub fn selected(&self) -> Option<ObjectId> {
        self.selected.and_then(|s| self.entries.get(s)).map(|e| e.id)
    }

    pub fn entries(&self) -> &[GalleryEntry] { &self.entries }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gallery(n: u32) -> Gallery {
        let mut g = Gallery::new();
        for i in 0..n {
            g.insert(ObjectId(10_000 + i), Thumbnail::blank(), 100);
        }
        g
    }

    #[test]
    fn first_insert_is_selected() {
        let g = gallery(3);
        assert_eq!(g.selected(), Some(ObjectId(10_000)));
    }

    #[test]
    fn select_wraps() {
        let mut g = gallery(2);
        g.select_next();
        assert_eq!(g.selected(), Some(ObjectId(10_001)));
        g.select_next();
        assert_eq!(g.selected(), Some(ObjectId(10_000)));
    }

    #[test]
    fn removing_selected_moves_to_neighbour() {
        let mut g = gallery(3);
        g.select_next();
        g.select_next();
        assert!(g.remove(ObjectId(10_002)));
        assert_eq!(g.selected(), Some(ObjectId(10_001)));
        assert!(g.remove(ObjectId(10_000)));
        assert_eq!(g.selected(), Some(ObjectId(10_001)));
        assert!(g.remove(ObjectId(10_001)));
        assert_eq!(g.selected(), None);
    }

    #[test]
    fn remove_unknown_is_noop() {
        let mut g = gallery(1);
        assert!(!g.remove(ObjectId(5)));
        assert_eq!(g.len(), 1);
    }
}
