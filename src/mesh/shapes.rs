//! Primitive meshes as [`MeshInput`] buffers

use crate::float_types::Real;
use crate::mesh::buffers::MeshInput;

impl MeshInput {
    /// Axis-aligned box centered at `center` with edge lengths `size`.
    ///
    /// ```text
    /// Vertex Layout (8 vertices total):
    ///     4-------5
    ///    /|      /|
    ///   0-------1 |
    ///   | |     | |
    ///   | 7-----|-6
    ///   |/      |/
    ///   3-------2
    /// ```
    ///
    /// Twelve indexed triangles wound counter-clockwise seen from outside.
    /// No normals are stored, so a geometry built from it gets flat face normals.
    pub fn cuboid(center: [Real; 3], size: [Real; 3]) -> MeshInput {
        let [cx, cy, cz] = center;
        let [hx, hy, hz] = [size[0] * 0.5, size[1] * 0.5, size[2] * 0.5];
        let (x0, x1) = (cx - hx, cx + hx);
        let (y0, y1) = (cy - hy, cy + hy);
        let (z0, z1) = (cz - hz, cz + hz);

        #[rustfmt::skip]
        let positions = vec![
            x0, y0, z0, // 0
            x1, y0, z0, // 1
            x1, y1, z0, // 2
            x0, y1, z0, // 3
            x0, y0, z1, // 4
            x1, y0, z1, // 5
            x1, y1, z1, // 6
            x0, y1, z1, // 7
        ];

        let faces: [[u32; 4]; 6] = [
            [0, 3, 2, 1], // bottom, -z
            [4, 5, 6, 7], // top, +z
            [0, 1, 5, 4], // front, -y
            [3, 7, 6, 2], // back, +y
            [0, 4, 7, 3], // left, -x
            [1, 2, 6, 5], // right, +x
        ];
        let indices = faces
            .iter()
            .flat_map(|&[a, b, c, d]| [a, b, c, a, c, d])
            .collect();

        MeshInput::new(positions, None, Some(indices))
    }

    /// Cube of edge `size` centered at the origin.
    pub fn cube(size: Real) -> MeshInput {
        Self::cuboid([0.0; 3], [size; 3])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::polygon::Polygon;
    use crate::mesh::vertex::Vertex;
    use nalgebra::{Point3, Vector3};

    #[test]
    fn cuboid_faces_point_outward() {
        let mesh = MeshInput::cuboid([1.0, 2.0, 3.0], [2.0, 2.0, 2.0]);
        assert!(mesh.validate().is_ok());
        assert_eq!(mesh.triangle_count(), 12);

        let center = Point3::new(1.0, 2.0, 3.0);
        for i in 0..mesh.triangle_count() {
            let vertices = mesh
                .triangle(i)
                .iter()
                .map(|&v| {
                    let [x, y, z] = mesh.position(v);
                    Vertex::new(Point3::new(x, y, z), Vector3::zeros())
                })
                .collect();
            let polygon = Polygon::new(vertices, None).expect("non-degenerate face");
            // the center is behind every face
            assert!(polygon.plane.signed_distance(&center) < 0.0);
        }
    }
}
