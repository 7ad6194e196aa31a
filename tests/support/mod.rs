//! Test support library
//! Provides various helper functions & utilities for tests.

#![allow(dead_code)]

use geocsg::{
    Geometry, MeshInput,
    float_types::Real,
    mesh::{polygon::Polygon, vertex::Vertex},
    triangulated::Triangulated3D,
};
use nalgebra::{Matrix4, Point3, Vector3};

/// Returns the approximate bounding box `[min_x, min_y, min_z, max_x, max_y, max_z]`
/// for a set of polygons.
pub fn bounding_box(polygons: &[Polygon]) -> [Real; 6] {
    let mut min_x = Real::MAX;
    let mut min_y = Real::MAX;
    let mut min_z = Real::MAX;
    let mut max_x = Real::MIN;
    let mut max_y = Real::MIN;
    let mut max_z = Real::MIN;

    for poly in polygons {
        for v in &poly.vertices {
            let p = v.pos;
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            min_z = min_z.min(p.z);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
            max_z = max_z.max(p.z);
        }
    }

    [min_x, min_y, min_z, max_x, max_y, max_z]
}

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

/// Helper to make a simple Polygon in 3D with given vertices.
pub fn make_polygon_3d(points: &[[Real; 3]], id: Option<u32>) -> Polygon {
    let verts = points
        .iter()
        .map(|p| Vertex::new(Point3::new(p[0], p[1], p[2]), Vector3::z()))
        .collect();
    Polygon::new(verts, id).expect("non-degenerate polygon")
}

/// Volume enclosed by a closed polygon soup, positive when faces wind outward.
pub fn signed_volume(polygons: &[Polygon]) -> Real {
    let mut volume = 0.0;
    for polygon in polygons {
        polygon.visit_triangles(|[a, b, c]| {
            volume += a.pos.coords.dot(&b.pos.coords.cross(&c.pos.coords));
        });
    }
    volume / 6.0
}

/// Axis-aligned box geometry with provenance ids starting at `id`.
pub fn cuboid(center: [Real; 3], size: [Real; 3], id: u32) -> Geometry {
    Geometry::from_buffers(&MeshInput::cuboid(center, size), &Matrix4::identity(), id, false)
        .expect("valid box buffers")
}

/// Unit cube centered at `center`.
pub fn unit_cube(center: [Real; 3], id: u32) -> Geometry {
    cuboid(center, [1.0; 3], id)
}
