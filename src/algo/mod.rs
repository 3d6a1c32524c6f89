//! Mesh analysis and generation support.
//!
//! - **Progress**: stage callbacks for [`MeshBuilder`](crate::generate::MeshBuilder)
//! - **Quality**: minimum-angle statistics over solid triangles

mod progress;
pub mod quality;

pub use progress::Progress;
