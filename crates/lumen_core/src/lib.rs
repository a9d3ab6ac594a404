//! Lumen Core - scene-build collaborators.
//!
//! Everything here runs at scene-build time, before the render loop starts:
//!
//! - **Mesh**: triangle soup with a bounding box
//! - **STL loading**: ASCII and binary STL files into a `Mesh`
//! - **Image data**: JPG/PNG decoding into a linear float buffer for textures
//!
//! These are the only parts of the system that can fail; errors are returned
//! to the caller, who decides whether to abort or substitute a placeholder.

pub mod image_data;
pub mod mesh;
pub mod stl;

pub use image_data::{ImageData, TextureError};
pub use mesh::Mesh;
pub use stl::{load_stl, read_stl, MeshError};
