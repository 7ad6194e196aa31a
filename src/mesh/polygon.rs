//! Convex planar polygons, the unit of work of the BSP tree.

use crate::aabb::Aabb;
use crate::float_types::Real;
use crate::mesh::plane::Plane;
use crate::mesh::vertex::Vertex;
use crate::triangulated::Triangulated3D;
use nalgebra::{Point3, Vector3};
use std::sync::Arc;

/// Which half of a split a fragment came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Front,
    Back,
}

/// Split history of a fragment: an immutable snapshot of the polygon that
/// was cut, shared by both halves of that cut.
#[derive(Debug, Clone)]
pub struct SplitOrigin {
    pub parent: Arc<Polygon>,
    pub side: Side,
}

impl SplitOrigin {
    /// True when `self` and `other` are the two halves of one cut.
    pub fn is_sibling_of(&self, other: &SplitOrigin) -> bool {
        Arc::ptr_eq(&self.parent, &other.parent) && self.side != other.side
    }
}

/// A polygon, defined by a list of vertices and the plane they lie on.
///
/// - `id` is the provenance tag of the input triangle this polygon descends
///   from. The core never interprets it, it is only carried along.
/// - `origin` links a split fragment back to the polygon it was cut from,
///   only tracked for tagged polygons.
#[derive(Debug, Clone)]
pub struct Polygon {
    pub vertices: Vec<Vertex>,
    pub plane: Plane,
    pub id: Option<u32>,
    pub origin: Option<SplitOrigin>,
}

impl Polygon {
    /// Create a polygon from ≥3 vertices, deriving its plane from the first three.
    ///
    /// Returns `None` for degenerate input (too few vertices or a near-zero
    /// normal); such polygons must never enter a tree.
    pub fn new(vertices: Vec<Vertex>, id: Option<u32>) -> Option<Self> {
        if vertices.len() < 3 {
            return None;
        }
        let plane = Plane::from_points(&vertices[0].pos, &vertices[1].pos, &vertices[2].pos)?;
        Some(Polygon {
            vertices,
            plane,
            id,
            origin: None,
        })
    }

    /// Build a polygon with a known plane, skipping the plane fit.
    /// The caller guarantees the vertices lie on `plane`.
    pub const fn from_plane(vertices: Vec<Vertex>, plane: Plane, id: Option<u32>) -> Self {
        Polygon {
            vertices,
            plane,
            id,
            origin: None,
        }
    }

    /// Snapshot of `self` to be shared by both halves of a split.
    /// Untagged polygons keep no history.
    pub(crate) fn split_snapshot(&self) -> Option<Arc<Polygon>> {
        self.id.map(|_| Arc::new(self.clone()))
    }

    /// A piece of `self` produced by a split; keeps the plane and id and
    /// links back to `snapshot` when there is one.
    pub(crate) fn fragment(
        &self,
        vertices: Vec<Vertex>,
        side: Side,
        snapshot: Option<&Arc<Polygon>>,
    ) -> Polygon {
        let origin = snapshot.map(|parent| SplitOrigin {
            parent: Arc::clone(parent),
            side,
        });
        Polygon {
            vertices,
            plane: self.plane,
            id: self.id,
            origin,
        }
    }

    /// Reverse winding, flip every vertex normal and the plane.
    pub fn flip(&mut self) {
        self.vertices.reverse();
        self.vertices.iter_mut().for_each(|v| v.flip());
        self.plane.flip();
    }

    /// Classify a vertex against this polygon's plane.
    pub fn classify_vertex(&self, vertex: &Vertex) -> i8 {
        self.plane.orient_point(&vertex.pos)
    }

    /// Classify all vertices of `other` against this polygon's plane.
    pub fn classify_side(&self, other: &Polygon) -> i8 {
        self.plane.classify_polygon(other)
    }

    /// Route `other` into coplanar/front/back buckets of this polygon's plane,
    /// splitting it when it spans the plane.
    pub fn split_polygon(
        &self,
        other: &Polygon,
        coplanar_front: &mut Vec<Polygon>,
        coplanar_back: &mut Vec<Polygon>,
        front: &mut Vec<Polygon>,
        back: &mut Vec<Polygon>,
    ) {
        self.plane
            .split_polygon(other, coplanar_front, coplanar_back, front, back);
    }

    /// Average of the vertex positions.
    pub fn centroid(&self) -> Point3<Real> {
        let sum = self
            .vertices
            .iter()
            .fold(Vector3::zeros(), |acc, v| acc + v.pos.coords);
        Point3::from(sum / self.vertices.len() as Real)
    }

    pub fn bounding_box(&self) -> Aabb {
        Aabb::from_points(self.vertices.iter().map(|v| &v.pos))
    }

    /// Drop split history. Used once vertex data no longer matches the snapshots.
    pub(crate) fn forget_origin(&mut self) {
        self.origin = None;
    }
}

impl Triangulated3D for Polygon {
    /// Fan around the first vertex, preserving winding.
    fn visit_triangles<F>(&self, mut f: F)
    where
        F: FnMut([Vertex; 3]),
    {
        for j in 2..self.vertices.len() {
            f([self.vertices[0], self.vertices[j - 1], self.vertices[j]]);
        }
    }
}
