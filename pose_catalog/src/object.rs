//! The per-object record the choreography loop animates.

use std::fmt;

use glam::Vec3;
use rand::Rng;

use crate::layout::{tree_position, PoseCatalog, TreeShape};
use crate::ornament::{random_ornament, Finish, PhotoFrame, Shape};
use crate::ribbon::RibbonCurve;

/// First id handed to photos.  Decorations use `0..count`.
pub const PHOTO_ID_BASE: u32 = 10_000;

/// Most decorations a scene may hold; keeps decoration ids below
/// [`PHOTO_ID_BASE`].
pub const MAX_DECORATIONS: usize = PHOTO_ID_BASE as usize;

// ════════════════════════════════════════════════════════════════════════════
// ObjectId / ObjectKind
// ════════════════════════════════════════════════════════════════════════════

/// Stable identity of a scene object; the only link between the choreography
/// record and whatever the renderer holds for it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u32);

impl ObjectId {
    pub fn is_photo_range(self) -> bool { self.0 >= PHOTO_ID_BASE }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Decoration,
    Photo,
}

// ════════════════════════════════════════════════════════════════════════════
// Pose
// ════════════════════════════════════════════════════════════════════════════

/// Transform handed to the renderer.  `rotation` is Euler XYZ in radians.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale:    Vec3,
}

impl Pose {
    pub fn at_origin(rotation: Vec3, scale: Vec3) -> Self {
        Pose { position: Vec3::ZERO, rotation, scale }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ChoreographedObject
// ════════════════════════════════════════════════════════════════════════════

/// One animated object: its immutable catalog plus its live pose.
///
/// Objects are born at the scene origin and fly to their first layout.
#[derive(Clone, Debug)]
pub struct ChoreographedObject {
    pub id:         ObjectId,
    pub kind:       ObjectKind,
    pub shape:      Shape,
    pub finish:     Finish,
    pub catalog:    PoseCatalog,
    /// Resting scale; the focus target temporarily grows past it.
    pub base_scale: Vec3,
    pub pose:       Pose,
}

impl ChoreographedObject {
    /// Decoration `index` of `count`; its id is the index.
    pub fn decoration<R: Rng + ?Sized>(
        index: usize,
        count: usize,
        shape: &TreeShape,
        rng:   &mut R,
    ) -> Self {
        let (form, finish, scale) = random_ornament(rng);
        let tree    = tree_position(index, count, shape, rng);
        let catalog = PoseCatalog::with_tree(tree, rng);
        let base_scale = Vec3::splat(scale);
        ChoreographedObject {
            id: ObjectId(index as u32),
            kind: ObjectKind::Decoration,
            shape: form,
            finish,
            catalog,
            base_scale,
            pose: Pose::at_origin(Vec3::ZERO, base_scale),
        }
    }

    /// Photo number `ordinal` (0-based arrival count) with the given id.
    ///
    /// Its tree entry is its slot on the ribbon, and it starts out already
    /// turned to face away from the trunk.
    pub fn photo<R: Rng + ?Sized>(
        id:      ObjectId,
        ordinal: usize,
        frame:   PhotoFrame,
        ribbon:  &RibbonCurve,
        rng:     &mut R,
    ) -> Self {
        let (slot, facing) = ribbon.photo_slot(ordinal, rng);
        let catalog = PoseCatalog::with_tree(slot, rng);
        ChoreographedObject {
            id,
            kind: ObjectKind::Photo,
            shape: frame.shape(),
            finish: Finish::Paper,
            catalog,
            base_scale: Vec3::ONE,
            pose: Pose::at_origin(facing, Vec3::ONE),
        }
    }

    pub fn is_photo(&self) -> bool { self.kind == ObjectKind::Photo }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn last_decoration_id_stays_below_photos() {
        let mut rng = StdRng::seed_from_u64(1);
        let d = ChoreographedObject::decoration(
            MAX_DECORATIONS - 1, MAX_DECORATIONS, &TreeShape::default(), &mut rng,
        );
        assert!(!d.id.is_photo_range());
    }

    #[test]
    fn decoration_id_is_index() {
        let mut rng = StdRng::seed_from_u64(1);
        let d = ChoreographedObject::decoration(42, 100, &TreeShape::default(), &mut rng);
        assert_eq!(d.id, ObjectId(42));
        assert_eq!(d.kind, ObjectKind::Decoration);
        assert_eq!(d.pose.position, Vec3::ZERO);
        assert_eq!(d.pose.scale, d.base_scale);
    }

    #[test]
    fn photo_sits_on_ribbon() {
        let shape = TreeShape::default();
        let ribbon = RibbonCurve::new(&shape);
        let mut rng = StdRng::seed_from_u64(2);
        let p = ChoreographedObject::photo(
            ObjectId(PHOTO_ID_BASE),
            0,
            PhotoFrame::for_texture(None),
            &ribbon,
            &mut rng,
        );
        assert!(p.is_photo());
        assert!(p.id.is_photo_range());
        assert!((p.catalog.tree - ribbon.point_at(0.1)).length() < 1e-4);
    }

    #[test]
    fn display_is_hash_prefixed() {
        assert_eq!(ObjectId(10_003).to_string(), "#10003");
    }
}
