//! # pose_catalog
//!
//! Precomputed destinations for every object in the holiday scene.
//!
//! Each object is created once with a [`PoseCatalog`]: where it sits when the
//! scene forms a tree, where it floats when the scene scatters into a sphere
//! shell, and where it lands on the heart surface.  Photos additionally get a
//! slot on the gold ribbon spiral [`RibbonCurve`] wound around the tree.
//!
//! All randomness is drawn from a caller-supplied [`rand::Rng`], so the same
//! seed and insertion order always rebuild the same scene.
//!
//! ## Layouts
//!
//! | Layout | Shape |
//! |---|---|
//! | Tree | cone of height `H`, radius shrinking toward the apex |
//! | Scatter | spherical shell, radius 10–30, isotropic |
//! | Heart | parametric heart solid, lifted 5 units above the origin |
//! | Ribbon | 4.5-turn spiral, photos at `t = (0.1 + 0.15·n) mod 0.95` |

pub mod layout;
pub mod object;
pub mod ornament;
pub mod ribbon;

pub use layout::{
    heart_position, rotation_drift, scatter_position, tree_position, Layout, PoseCatalog,
    TreeShape,
};
pub use object::{ChoreographedObject, ObjectId, ObjectKind, Pose, MAX_DECORATIONS, PHOTO_ID_BASE};
pub use ornament::{Finish, PhotoFrame, Shape};
pub use ribbon::{ribbon_fraction, RibbonCurve};
