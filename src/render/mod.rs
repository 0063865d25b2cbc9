//! Render and interaction module.
//!
//! This module projects the topology and packet set onto a zoomable,
//! pannable 2-D canvas and maps pointer gestures back onto topology
//! mutations.

pub mod transform;
pub mod scene;
pub mod canvas;
pub mod svg;

// Re-export key types and functions for easier access
pub use transform::{Bounds, ScaleExtent, Size, ViewTransition, ZoomTransform};
pub use scene::{draw_scene, DragPins, Scene};
pub use canvas::{Canvas, Interaction};
pub use svg::scene_to_svg;
