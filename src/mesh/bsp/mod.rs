//! Binary Space Partitioning (BSP) tree implementation
//!
//! The algorithms live behind the [`BspOps`] trait; [`Node`] exposes them as
//! inherent methods running [`SerialBspOps`] with the default strategy.

pub mod node;
pub mod serial;
pub mod traits;

pub use node::{Node, is_convex};
pub use serial::SerialBspOps;
pub use traits::{BalancedSplittingStrategy, BspOps, FirstPolygonStrategy, SplittingPlaneStrategy};

use crate::mesh::polygon::Polygon;

impl Node {
    /// Creates a new BSP node from polygons
    pub fn from_polygons(polygons: Vec<Polygon>) -> Self {
        let mut node = Self::new();
        if !polygons.is_empty() {
            node.build(polygons);
        }
        node
    }

    /// Invert all polygons in the BSP tree
    pub fn invert(&mut self) {
        SerialBspOps::new().invert(self);
    }

    /// Remove all polygons in `polygons` that are inside this BSP tree
    pub fn clip_polygons(&self, polygons: Vec<Polygon>) -> Vec<Polygon> {
        SerialBspOps::new().clip_polygons(self, polygons)
    }

    /// Remove all polygons in this BSP tree that are inside the other BSP tree
    pub fn clip_to(&mut self, bsp: &Node) {
        SerialBspOps::new().clip_to(self, bsp);
    }

    /// Return all polygons in this BSP tree
    pub fn all_polygons(&self) -> Vec<Polygon> {
        SerialBspOps::new().all_polygons(self)
    }

    /// Build a BSP tree from the given polygons
    pub fn build(&mut self, polygons: Vec<Polygon>) {
        SerialBspOps::new().build(self, polygons);
    }

    /// Build with a custom divider selection strategy
    pub fn build_with<SP: SplittingPlaneStrategy>(&mut self, polygons: Vec<Polygon>, strategy: SP) {
        SerialBspOps::with_strategy(strategy).build(self, polygons);
    }

    /// True when the polygons of this tree bound a convex solid
    pub fn is_convex(&self) -> bool {
        is_convex(&self.all_polygons())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::float_types::Real;
    use crate::mesh::plane::Plane;
    use crate::mesh::vertex::Vertex;
    use nalgebra::{Point3, Vector3};

    fn square_at_z(z: Real, up: bool) -> Polygon {
        let mut pts = vec![
            Point3::new(0.0, 0.0, z),
            Point3::new(1.0, 0.0, z),
            Point3::new(1.0, 1.0, z),
            Point3::new(0.0, 1.0, z),
        ];
        if !up {
            pts.reverse();
        }
        let n = if up { Vector3::z() } else { -Vector3::z() };
        Polygon::new(pts.into_iter().map(|p| Vertex::new(p, n)).collect(), None)
            .expect("valid square")
    }

    #[test]
    fn build_adopts_first_plane_and_keeps_coplanar() {
        let polys = vec![square_at_z(0.0, true), square_at_z(0.0, false), square_at_z(1.0, true)];
        let node = Node::from_polygons(polys);
        let plane = node.plane.expect("divider");
        assert!((plane.normal.z - 1.0).abs() < 1e-12);
        assert_eq!(node.polygons.len(), 2);
        assert!(node.back.is_none());
        assert_eq!(node.front.as_ref().map(|f| f.polygons.len()), Some(1));
        assert_eq!(node.num_polygons(), 3);
        assert_eq!(node.num_nodes(), 2);
    }

    #[test]
    fn all_polygons_is_node_then_front_then_back() {
        let polys = vec![square_at_z(0.0, true), square_at_z(1.0, true), square_at_z(-1.0, true)];
        let node = Node::from_polygons(polys);
        let zs: Vec<Real> = node.all_polygons().iter().map(|p| p.vertices[0].pos.z).collect();
        assert_eq!(zs, vec![0.0, 1.0, -1.0]);
    }

    #[test]
    fn clip_discards_polygons_behind_leaves() {
        // single plane z = 0 facing up: the solid is everything below it
        let node = Node::from_plane(Plane::from_normal(Vector3::z(), 0.0));
        let kept = node.clip_polygons(vec![square_at_z(1.0, true), square_at_z(-1.0, true)]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].vertices[0].pos.z, 1.0);
    }

    #[test]
    fn clip_routes_coplanar_by_facing() {
        let node = Node::from_plane(Plane::from_normal(Vector3::z(), 0.0));
        let kept = node.clip_polygons(vec![square_at_z(0.0, true), square_at_z(0.0, false)]);
        assert_eq!(kept.len(), 1);
        assert!(kept[0].plane.normal.z > 0.0);
    }

    #[test]
    fn empty_tree_clips_nothing() {
        let node = Node::new();
        let kept = node.clip_polygons(vec![square_at_z(0.0, true)]);
        assert_eq!(kept.len(), 1);
        assert!(node.all_polygons().is_empty());
    }

    #[test]
    fn invert_twice_restores_tree() {
        let polys = vec![square_at_z(0.0, true), square_at_z(1.0, true), square_at_z(-1.0, true)];
        let original = Node::from_polygons(polys);
        let mut node = original.clone();
        node.invert();
        assert!(node.plane.expect("divider").normal.z < 0.0);
        assert!(node.back.is_some());
        node.invert();
        let a: Vec<_> = original.all_polygons().iter().map(|p| p.vertices.clone()).collect();
        let b: Vec<_> = node.all_polygons().iter().map(|p| p.vertices.clone()).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn balanced_strategy_builds_the_same_polygon_set() {
        let polys = vec![square_at_z(0.0, true), square_at_z(1.0, true), square_at_z(-1.0, true)];
        let mut node = Node::new();
        node.build_with(polys, BalancedSplittingStrategy::default());
        assert_eq!(node.num_polygons(), 3);
        // the middle plane splits the set evenly
        assert_eq!(node.plane.expect("divider").w, 0.0);
    }

    #[test]
    fn into_polygons_drains_every_node() {
        let polys = vec![square_at_z(0.0, true), square_at_z(1.0, true), square_at_z(-1.0, true)];
        assert_eq!(Node::from_polygons(polys).into_polygons().len(), 3);
    }
}
