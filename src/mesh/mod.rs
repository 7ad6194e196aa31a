//! Polygon soup, BSP trees and the `Geometry` facade

pub mod bsp;
pub mod buffers;
pub mod geometry;
pub mod plane;
pub mod polygon;
pub mod shapes;
pub mod vertex;

pub use geometry::Geometry;
