//! Traits defining BSP tree operations for dependency inversion

use crate::float_types::Real;
use crate::mesh::bsp::node::Node;
use crate::mesh::plane::{BACK, COPLANAR, FRONT, Plane};
use crate::mesh::polygon::Polygon;

/// Core BSP operations trait - implements algorithms on BSP nodes
pub trait BspOps {
    /// Flip every polygon and divider and swap front/back, turning the solid inside out
    fn invert(&self, node: &mut Node);

    /// Remove the parts of `polygons` that lie inside the solid of `node`
    fn clip_polygons(&self, node: &Node, polygons: Vec<Polygon>) -> Vec<Polygon>;

    /// Remove all polygons in `node`'s tree that are inside the `other` tree
    fn clip_to(&self, node: &mut Node, other: &Node);

    /// Insert `polygons` into the tree, splitting them as needed
    fn build(&self, node: &mut Node, polygons: Vec<Polygon>);

    /// Return all polygons in the tree, node first, then front, then back subtree
    fn all_polygons(&self, node: &Node) -> Vec<Polygon>;
}

/// Trait for picking the divider of a fresh node
pub trait SplittingPlaneStrategy {
    /// Pick a splitting plane from a set of polygons
    ///
    /// # Panics
    /// May panic if `polygons` is empty. [`BspOps::build`] never calls it
    /// with an empty set.
    fn pick_best_splitting_plane(&self, polygons: &[Polygon]) -> Plane;
}

/// The plane of the first polygon. This is the default.
///
/// # Panics
/// Panics if `polygons` is empty.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstPolygonStrategy;

impl SplittingPlaneStrategy for FirstPolygonStrategy {
    fn pick_best_splitting_plane(&self, polygons: &[Polygon]) -> Plane {
        polygons[0].plane
    }
}

/// Sampled heuristic that trades spanning polygons against front/back balance
#[derive(Debug, Clone, Copy)]
pub struct BalancedSplittingStrategy {
    pub span_weight: Real,
    pub balance_weight: Real,
}

impl Default for BalancedSplittingStrategy {
    fn default() -> Self {
        Self {
            span_weight: 8.0,
            balance_weight: 1.0,
        }
    }
}

impl SplittingPlaneStrategy for BalancedSplittingStrategy {
    fn pick_best_splitting_plane(&self, polygons: &[Polygon]) -> Plane {
        let mut best_plane = polygons[0].plane;
        let mut best_score = Real::MAX;

        // Take a sample of polygons as candidate planes
        let sample_size = polygons.len().min(20);

        polygons.iter().take(sample_size).for_each(|p| {
            let plane = &p.plane;
            let (num_front, num_back, num_spanning) = polygons
                .iter()
                .map(|poly| match plane.classify_polygon(poly) {
                    COPLANAR => (0, 0, 0),
                    FRONT => (1, 0, 0),
                    BACK => (0, 1, 0),
                    _ => (0, 0, 1),
                })
                .fold((0i64, 0i64, 0i64), |acc, x| (acc.0 + x.0, acc.1 + x.1, acc.2 + x.2));

            let score = self.span_weight * num_spanning as Real
                + self.balance_weight * ((num_front - num_back) as Real).abs();

            if score < best_score {
                best_score = score;
                best_plane = *plane;
            }
        });

        best_plane
    }
}
