//! **Constructive Solid Geometry (CSG)** on triangle meshes, built around
//! Boolean operations (*union*, *intersect*, *subtract*) and plane cuts on
//! polygons stored in [BSP](mesh::bsp) trees.
//!
//! Meshes come in as flat buffers plus a 4×4 transform ([`MeshInput`]),
//! are combined as [`Geometry`] values and go out as flat triangle buffers
//! ([`BufferGeometry`]) tagged with the id of the input triangle each
//! polygon came from.
//!
//! ```
//! use geocsg::{Geometry, MeshInput};
//! use nalgebra::Matrix4;
//!
//! let a = Geometry::from_buffers(&MeshInput::cube(1.0), &Matrix4::identity(), 0, false).unwrap();
//! let b = Geometry::from_buffers(
//!     &MeshInput::cuboid([0.5, 0.0, 0.0], [1.0, 1.0, 1.0]),
//!     &Matrix4::identity(),
//!     a.max_id(),
//!     false,
//! )
//! .unwrap();
//! let buffers = a.subtract(&b).to_buffer_geometry();
//! assert!(buffers.triangle_count() > 0);
//! ```
//!
//! # Features
//! #### Default
//! - **f64**: use f64 as Real
//!
//! #### Optional
//! - **f32**: use f32 as Real, this conflicts with f64

#![forbid(unsafe_code)]
#![deny(unused)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod aabb;
pub mod errors;
pub mod float_types;
pub mod mesh;
pub mod traits;
pub mod triangulated;

#[cfg(any(all(feature = "f64", feature = "f32"), not(any(feature = "f64", feature = "f32"))))]
compile_error!("Either 'f64' or 'f32' feature must be specified, but not both");

pub use aabb::Aabb;
pub use errors::{MeshError, Result};
pub use mesh::buffers::{BufferGeometry, MeshInput, PolygonGroup, RenderMesh};
pub use mesh::geometry::Geometry;
pub use traits::CSGOps;
