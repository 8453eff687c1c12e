//! # gesture_tree
//!
//! A holiday tree of ornaments and photos that rearranges itself under hand
//! gestures, previewed in a software-rendered window.
//!
//! ## Gesture → Mode mapping
//!
//! | Gesture | Detection | Mode |
//! |---|---|---|
//! | Pinch | thumb tip and index tip nearly touching | FOCUS: one photo flies to the camera |
//! | Victory | index + middle out, ring + pinky curled | HEART: everything forms a heart |
//! | Fist | fingertips close to the wrist | TREE: back to the cone |
//! | Open hand | fingertips far from the wrist | SCATTER: everything drifts on a shell |
//! | Anything else | hand visible, no match | mode held |
//!
//! The palm position turns the whole scene in every mode.  Without a hand the
//! turn eases back and, in TREE, the tree slowly spins on its own.
//!
//! ## Preview keyboard
//!
//! Without a landmark recording the keyboard stands in for the hand tracker.
//!
//! | Key | Action |
//! |---|---|
//! | `F` / `O` / `P` / `V` | Fist / open hand / pinch / victory |
//! | `M` | Half-curled hand (no gesture) |
//! | `N` | Take the hand away |
//! | mouse | Palm position |
//! | `Tab` | Select next gallery photo |
//! | `Delete` | Remove selected photo |
//! | `H` | Hide/show the overlay |
//! | `Q` | Quit |

pub mod error;
pub mod gesture;
pub mod mode;
pub mod tracking;
pub mod stage;
pub mod snow;
pub mod ingest;
pub mod gallery;
pub mod render;
pub mod ticker;
pub mod visualizer;
pub mod app;

pub use error::SceneError;
