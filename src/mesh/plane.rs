//! Oriented planes and the point/polygon classification used by the BSP tree.

use crate::float_types::{Real, tolerance};
use crate::mesh::polygon::{Polygon, Side};
use crate::mesh::vertex::Vertex;
use nalgebra::{Point3, Vector3};

// Plane classification bit flags. `FRONT | BACK == SPANNING`.
pub const COPLANAR: i8 = 0;
pub const FRONT: i8 = 1;
pub const BACK: i8 = 2;
pub const SPANNING: i8 = 3;

/// A plane `normal · p = w` with unit `normal` pointing to the front side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Unit normal vector of the plane
    pub normal: Vector3<Real>,
    /// Signed offset along the normal (plane equation: n·p = w)
    pub w: Real,
}

impl Plane {
    /// Create a plane from a normal (normalised here) and offset.
    /// The offset is rescaled with the normal so the plane stays the same.
    pub fn from_normal(normal: Vector3<Real>, w: Real) -> Self {
        let len = normal.norm();
        Plane {
            normal: normal / len,
            w: w / len,
        }
    }

    /// Plane through three points, oriented by `(b - a) × (c - a)`.
    ///
    /// Returns `None` when the points are (nearly) collinear: the sine of the
    /// corner angle at `a` is below the classification tolerance. The test
    /// does not depend on the size of the triangle.
    pub fn from_points(a: &Point3<Real>, b: &Point3<Real>, c: &Point3<Real>) -> Option<Self> {
        let (ab, ac) = (b - a, c - a);
        let normal = ab.cross(&ac);
        let len = normal.norm();
        if len.is_nan() || len <= tolerance() * ab.norm() * ac.norm() {
            return None;
        }
        let normal = normal / len;
        Some(Plane {
            normal,
            w: normal.dot(&a.coords),
        })
    }

    pub const fn normal(&self) -> Vector3<Real> {
        self.normal
    }

    pub const fn offset(&self) -> Real {
        self.w
    }

    /// Reverse the orientation in place: front and back swap.
    pub fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }

    /// Return a flipped copy of this plane
    pub fn flipped(&self) -> Self {
        Plane {
            normal: -self.normal,
            w: -self.w,
        }
    }

    /// Signed distance `normal · p − w`.
    #[inline]
    pub fn signed_distance(&self, point: &Point3<Real>) -> Real {
        self.normal.dot(&point.coords) - self.w
    }

    /// Classify a point as [`COPLANAR`], [`FRONT`] or [`BACK`].
    pub fn orient_point(&self, point: &Point3<Real>) -> i8 {
        let distance = self.signed_distance(point);
        if distance.abs() < tolerance() {
            COPLANAR
        } else if distance > 0.0 {
            FRONT
        } else {
            BACK
        }
    }

    /// Aggregate classification of all vertices of `polygon`.
    ///
    /// Coplanar vertices do not contribute, so a polygon touching the plane
    /// with one edge is still purely [`FRONT`] or [`BACK`].
    pub fn classify_polygon(&self, polygon: &Polygon) -> i8 {
        polygon
            .vertices
            .iter()
            .fold(COPLANAR, |acc, v| acc | self.orient_point(&v.pos))
    }

    /// Route `polygon` into one of four buckets relative to this plane.
    ///
    /// Coplanar polygons go to `coplanar_front` when they face the same way as
    /// the plane, otherwise to `coplanar_back`. Spanning polygons are cut in
    /// two along the plane; a piece with fewer than three vertices is dropped.
    pub fn split_polygon(
        &self,
        polygon: &Polygon,
        coplanar_front: &mut Vec<Polygon>,
        coplanar_back: &mut Vec<Polygon>,
        front: &mut Vec<Polygon>,
        back: &mut Vec<Polygon>,
    ) {
        let eps = tolerance();
        let distances: Vec<Real> = polygon
            .vertices
            .iter()
            .map(|v| self.signed_distance(&v.pos))
            .collect();
        let types: Vec<i8> = distances
            .iter()
            .map(|&d| {
                if d.abs() < eps {
                    COPLANAR
                } else if d > 0.0 {
                    FRONT
                } else {
                    BACK
                }
            })
            .collect();
        let polygon_type = types.iter().fold(COPLANAR, |acc, &t| acc | t);

        match polygon_type {
            COPLANAR => {
                if self.normal.dot(&polygon.plane.normal) > 0.0 {
                    coplanar_front.push(polygon.clone());
                } else {
                    coplanar_back.push(polygon.clone());
                }
            },
            FRONT => front.push(polygon.clone()),
            BACK => back.push(polygon.clone()),
            _ => {
                let vcount = polygon.vertices.len();
                let snapshot = polygon.split_snapshot();
                let mut split_front: Vec<Vertex> = Vec::with_capacity(vcount + 1);
                let mut split_back: Vec<Vertex> = Vec::with_capacity(vcount + 1);

                for i in 0..vcount {
                    let j = (i + 1) % vcount;
                    let (ti, tj) = (types[i], types[j]);
                    let vi = &polygon.vertices[i];
                    let vj = &polygon.vertices[j];

                    if ti != BACK {
                        split_front.push(*vi);
                    }
                    if ti != FRONT {
                        split_back.push(*vi);
                    }
                    if (ti | tj) == SPANNING {
                        // exact crossing point, t = d_i / (d_i - d_j)
                        let t = distances[i] / (distances[i] - distances[j]);
                        let crossing = vi.interpolate(vj, t);
                        split_front.push(crossing);
                        split_back.push(crossing);
                    }
                }

                if split_front.len() >= 3 {
                    front.push(polygon.fragment(split_front, Side::Front, snapshot.as_ref()));
                }
                if split_back.len() >= 3 {
                    back.push(polygon.fragment(split_back, Side::Back, snapshot.as_ref()));
                }
            },
        }
    }

    /// Map the plane through the per-axis scale `diag(sx, sy, sz)`.
    ///
    /// Points in front stay in front. All factors must be non-zero.
    pub fn scale(&mut self, sx: Real, sy: Real, sz: Real) {
        let normal = Vector3::new(self.normal.x / sx, self.normal.y / sy, self.normal.z / sz);
        let len = normal.norm();
        self.normal = normal / len;
        self.w /= len;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle(points: [[Real; 3]; 3]) -> Polygon {
        let verts = points
            .iter()
            .map(|p| Vertex::new(Point3::new(p[0], p[1], p[2]), Vector3::z()))
            .collect();
        Polygon::new(verts, None).expect("valid triangle")
    }

    #[test]
    fn from_points_rejects_collinear() {
        let a = Point3::origin();
        let b = Point3::new(1.0, 0.0, 0.0);
        let c = Point3::new(2.0, 0.0, 0.0);
        assert!(Plane::from_points(&a, &b, &c).is_none());
    }

    #[test]
    fn from_points_is_scale_invariant() {
        let s: Real = 1e-4;
        let a = Point3::origin();
        let b = Point3::new(s, 0.0, 0.0);
        let c = Point3::new(0.0, s, 0.0);
        let plane = Plane::from_points(&a, &b, &c).expect("tiny but well-formed triangle");
        assert!((plane.normal.z - 1.0).abs() < 1e-12);

        // coincident points stay degenerate at any scale
        assert!(Plane::from_points(&a, &a, &c).is_none());
        let far = Point3::new(1e6, 1e6, 1e6);
        let sliver = Point3::new(2e6, 2e6, 2e6 + 1e-6);
        assert!(Plane::from_points(&a, &far, &sliver).is_none());
    }

    #[test]
    fn orient_point_uses_tolerance() {
        let plane = Plane::from_normal(Vector3::z(), 1.0);
        assert_eq!(plane.orient_point(&Point3::new(5.0, 5.0, 1.0 + 1e-7)), COPLANAR);
        assert_eq!(plane.orient_point(&Point3::new(0.0, 0.0, 2.0)), FRONT);
        assert_eq!(plane.orient_point(&Point3::new(0.0, 0.0, 0.0)), BACK);
    }

    #[test]
    fn touching_polygon_is_not_spanning() {
        let plane = Plane::from_normal(Vector3::z(), 0.0);
        let tri = triangle([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]]);
        assert_eq!(plane.classify_polygon(&tri), FRONT);
    }

    #[test]
    fn split_spanning_triangle() {
        let plane = Plane::from_normal(Vector3::x(), 0.0);
        let tri = triangle([[-1.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0]]);
        let (mut cf, mut cb, mut f, mut b) = (Vec::new(), Vec::new(), Vec::new(), Vec::new());
        plane.split_polygon(&tri, &mut cf, &mut cb, &mut f, &mut b);
        assert!(cf.is_empty() && cb.is_empty());
        assert_eq!(f.len(), 1);
        assert_eq!(b.len(), 1);
        assert_eq!(f[0].vertices.len(), 4);
        assert_eq!(b[0].vertices.len(), 3);
        for v in &f[0].vertices {
            assert!(v.pos.x >= -1e-12);
        }
        for v in &b[0].vertices {
            assert!(v.pos.x <= 1e-12);
        }
        // fragments keep the parent plane
        assert_eq!(f[0].plane, tri.plane);
    }

    #[test]
    fn coplanar_bucket_follows_facing() {
        let plane = Plane::from_normal(Vector3::z(), 0.0);
        let up = triangle([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        let mut down = up.clone();
        down.flip();
        let (mut cf, mut cb, mut f, mut b) = (Vec::new(), Vec::new(), Vec::new(), Vec::new());
        plane.split_polygon(&up, &mut cf, &mut cb, &mut f, &mut b);
        plane.split_polygon(&down, &mut cf, &mut cb, &mut f, &mut b);
        assert_eq!(cf.len(), 1);
        assert_eq!(cb.len(), 1);
        assert!(f.is_empty() && b.is_empty());
    }

    #[test]
    fn scale_keeps_points_on_plane() {
        let mut plane = Plane::from_normal(Vector3::new(1.0, 1.0, 0.0), 2.0);
        // (1,1,0) is on the plane x + y = 2
        plane.scale(2.0, 1.0, 1.0);
        assert!(plane.signed_distance(&Point3::new(2.0, 1.0, 0.0)).abs() < 1e-12);
        assert_eq!(plane.orient_point(&Point3::new(10.0, 10.0, 0.0)), FRONT);
    }
}
