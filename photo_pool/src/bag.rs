//! Shuffle bag: random draws without repeats until every id has come up.

use pose_catalog::ObjectId;
use rand::Rng;

/// Ids still eligible for the current cycle of random picks.
///
/// The bag never holds an id twice.  When it runs dry the next draw refills it
/// with the full live set, so each cycle visits every live id exactly once.
/// The first draw of a new cycle skips the id that closed the previous one,
/// which keeps back-to-back repeats impossible while more than one id exists.
#[derive(Clone, Debug, Default)]
pub struct ShuffleBag {
    ids:       Vec<ObjectId>,
    last_pick: Option<ObjectId>,
}

impl ShuffleBag {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> usize { self.ids.len() }

    pub fn is_empty(&self) -> bool { self.ids.is_empty() }

    pub fn contains(&self, id: ObjectId) -> bool { self.ids.contains(&id) }

    pub fn ids(&self) -> &[ObjectId] { &self.ids }

    /// Add a newly arrived id.  Returns false if it was already present.
    pub fn insert(&mut self, id: ObjectId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    /// Drop an id that is no longer live.  Returns true if it was present.
    pub fn remove(&mut self, id: ObjectId) -> bool {
        if self.last_pick == Some(id) {
            self.last_pick = None;
        }
        match self.ids.iter().position(|&x| x == id) {
            Some(i) => {
                self.ids.swap_remove(i);
                true
            }
            None => false,
        }
    }

    /// Draw one id, refilling from `live` first if the bag is empty.
    ///
    /// Returns `None` only when `live` is empty.
    pub fn draw<R: Rng + ?Sized>(&mut self, live: &[ObjectId], rng: &mut R) -> Option<ObjectId> {
        if live.is_empty() {
            return None;
        }
        if self.ids.is_empty() {
            for &id in live {
                self.insert(id);
            }
            tracing::debug!(size = self.ids.len(), "shuffle bag refilled");
        }

        let avoid = match self.last_pick {
            Some(last) if self.ids.len() > 1 => self.ids.iter().position(|&x| x == last),
            _ => None,
        };
        let index = match avoid {
            Some(skip) => {
                let i = rng.gen_range(0..self.ids.len() - 1);
                if i >= skip { i + 1 } else { i }
            }
            None => rng.gen_range(0..self.ids.len()),
        };

        let picked = self.ids.swap_remove(index);
        self.last_pick = Some(picked);
        Some(picked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn ids(range: std::ops::Range<u32>) -> Vec<ObjectId> {
        range.map(ObjectId).collect()
    }

    #[test]
    fn empty_live_set_draws_nothing() {
        let mut bag = ShuffleBag::new();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(bag.draw(&[], &mut rng), None);
    }

    #[test]
    fn insert_rejects_duplicates() {
        let mut bag = ShuffleBag::new();
        assert!(bag.insert(ObjectId(1)));
        assert!(!bag.insert(ObjectId(1)));
        assert_eq!(bag.len(), 1);
    }

    #[test]
    fn full_cycle_visits_each_once() {
        let live = ids(0..7);
        let mut bag = ShuffleBag::new();
        let mut rng = StdRng::seed_from_u64(2);
        let seen: HashSet<_> = (0..7).filter_map(|_| bag.draw(&live, &mut rng)).collect();
        assert_eq!(seen.len(), 7);
        assert!(bag.is_empty());
    }

    #[test]
    fn no_repeat_across_refill() {
        let live = ids(0..2);
        let mut bag = ShuffleBag::new();
        let mut rng = StdRng::seed_from_u64(3);
        let mut prev = None;
        for _ in 0..200 {
            let got = bag.draw(&live, &mut rng);
            assert_ne!(got, prev);
            prev = got;
        }
    }

    #[test]
    fn single_id_may_repeat() {
        let live = ids(5..6);
        let mut bag = ShuffleBag::new();
        let mut rng = StdRng::seed_from_u64(4);
        assert_eq!(bag.draw(&live, &mut rng), Some(ObjectId(5)));
        assert_eq!(bag.draw(&live, &mut rng), Some(ObjectId(5)));
    }

    #[test]
    fn remove_prunes() {
        let mut bag = ShuffleBag::new();
        bag.insert(ObjectId(1));
        bag.insert(ObjectId(2));
        assert!(bag.remove(ObjectId(1)));
        assert!(!bag.remove(ObjectId(1)));
        assert_eq!(bag.ids(), &[ObjectId(2)]);
    }
}
