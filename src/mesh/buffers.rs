//! Flat mesh buffers going into and out of a [`Geometry`](crate::mesh::geometry::Geometry).

use crate::errors::{MeshError, Result};
use crate::float_types::Real;
use nalgebra::Matrix4;

/// An input triangle mesh as flat arrays.
///
/// - `positions`: `x, y, z` per vertex.
/// - `normals`: optional, one `nx, ny, nz` per vertex. When absent each
///   triangle gets its flat face normal.
/// - `indices`: optional triangle list. When absent, consecutive vertex
///   triplets form the triangles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshInput {
    pub positions: Vec<Real>,
    pub normals: Option<Vec<Real>>,
    pub indices: Option<Vec<u32>>,
}

impl MeshInput {
    pub const fn new(positions: Vec<Real>, normals: Option<Vec<Real>>, indices: Option<Vec<u32>>) -> Self {
        Self {
            positions,
            normals,
            indices,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Check array shapes and index ranges.
    pub fn validate(&self) -> Result<()> {
        if self.positions.len() % 3 != 0 {
            return Err(MeshError::PositionsNotTriplets {
                len: self.positions.len(),
            });
        }
        if let Some(normals) = &self.normals {
            if normals.len() != self.positions.len() {
                return Err(MeshError::NormalsLengthMismatch {
                    positions: self.positions.len(),
                    normals: normals.len(),
                });
            }
        }

        let vertex_count = self.vertex_count();
        match &self.indices {
            Some(indices) => {
                if indices.len() % 3 != 0 {
                    return Err(MeshError::IndicesNotTriangles { len: indices.len() });
                }
                if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
                    return Err(MeshError::IndexOutOfRange {
                        index: index as usize,
                        vertex_count,
                    });
                }
            },
            // the implicit index list is 0..vertex_count
            None if vertex_count % 3 != 0 => {
                return Err(MeshError::IndicesNotTriangles { len: vertex_count });
            },
            None => {},
        }
        Ok(())
    }

    pub fn triangle_count(&self) -> usize {
        match &self.indices {
            Some(indices) => indices.len() / 3,
            None => self.vertex_count() / 3,
        }
    }

    /// Vertex indices of triangle `i`. Only meaningful after [`validate`](Self::validate).
    pub(crate) fn triangle(&self, i: usize) -> [usize; 3] {
        match &self.indices {
            Some(indices) => [
                indices[3 * i] as usize,
                indices[3 * i + 1] as usize,
                indices[3 * i + 2] as usize,
            ],
            None => [3 * i, 3 * i + 1, 3 * i + 2],
        }
    }

    pub(crate) fn position(&self, vertex: usize) -> [Real; 3] {
        let p = &self.positions[3 * vertex..3 * vertex + 3];
        [p[0], p[1], p[2]]
    }

    pub(crate) fn normal(&self, vertex: usize) -> Option<[Real; 3]> {
        self.normals.as_ref().map(|n| {
            let n = &n[3 * vertex..3 * vertex + 3];
            [n[0], n[1], n[2]]
        })
    }
}

/// One output polygon's slice of a [`BufferGeometry`], in vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolygonGroup {
    /// First vertex of the polygon's triangles
    pub start: usize,
    /// Number of vertices (three per triangle)
    pub count: usize,
    /// Provenance id of the input triangle the polygon came from
    pub id: Option<u32>,
}

/// Non-indexed triangle buffers ready for upload to a renderer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BufferGeometry {
    pub positions: Vec<f32>,
    pub normals: Vec<f32>,
    pub groups: Vec<PolygonGroup>,
}

impl BufferGeometry {
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.vertex_count() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// A buffer geometry paired with an opaque, caller-defined material.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderMesh<M> {
    pub geometry: BufferGeometry,
    pub material: M,
}

/// Affine transform from 16 numbers in row-major order.
pub fn matrix_from_row_major(elements: &[Real]) -> Result<Matrix4<Real>> {
    if elements.len() != 16 {
        return Err(MeshError::MatrixLength { len: elements.len() });
    }
    Ok(Matrix4::from_row_slice(elements))
}

/// Affine transform from 16 numbers in column-major order (the WebGL layout).
pub fn matrix_from_column_major(elements: &[Real]) -> Result<Matrix4<Real>> {
    if elements.len() != 16 {
        return Err(MeshError::MatrixLength { len: elements.len() });
    }
    Ok(Matrix4::from_column_slice(elements))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_reports_each_shape_error() {
        let bad_positions = MeshInput::new(vec![0.0; 4], None, None);
        assert_eq!(bad_positions.validate(), Err(MeshError::PositionsNotTriplets { len: 4 }));

        let bad_normals = MeshInput::new(vec![0.0; 9], Some(vec![0.0; 6]), None);
        assert_eq!(
            bad_normals.validate(),
            Err(MeshError::NormalsLengthMismatch { positions: 9, normals: 6 })
        );

        let bad_indices = MeshInput::new(vec![0.0; 9], None, Some(vec![0, 1]));
        assert_eq!(bad_indices.validate(), Err(MeshError::IndicesNotTriangles { len: 2 }));

        let out_of_range = MeshInput::new(vec![0.0; 9], None, Some(vec![0, 1, 3]));
        assert_eq!(
            out_of_range.validate(),
            Err(MeshError::IndexOutOfRange { index: 3, vertex_count: 3 })
        );

        let loose_vertices = MeshInput::new(vec![0.0; 12], None, None);
        assert_eq!(loose_vertices.validate(), Err(MeshError::IndicesNotTriangles { len: 4 }));
    }

    #[test]
    fn triangles_with_and_without_indices() {
        let soup = MeshInput::new(vec![0.0; 18], None, None);
        assert!(soup.validate().is_ok());
        assert_eq!(soup.triangle_count(), 2);
        assert_eq!(soup.triangle(1), [3, 4, 5]);

        let indexed = MeshInput::new(vec![0.0; 12], None, Some(vec![0, 1, 2, 2, 3, 0]));
        assert!(indexed.validate().is_ok());
        assert_eq!(indexed.triangle(1), [2, 3, 0]);
    }

    #[test]
    fn matrix_layouts() {
        let mut elements = [0.0; 16];
        elements[3] = 5.0;
        let row = matrix_from_row_major(&elements).expect("16 elements");
        assert_eq!(row[(0, 3)], 5.0);
        let col = matrix_from_column_major(&elements).expect("16 elements");
        assert_eq!(col[(3, 0)], 5.0);
        assert_eq!(
            matrix_from_row_major(&elements[..9]),
            Err(MeshError::MatrixLength { len: 9 })
        );
    }
}
