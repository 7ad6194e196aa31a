//! Input validation errors

/// Problems with the flat buffers handed to [`Geometry::from_buffers`](crate::mesh::geometry::Geometry::from_buffers).
///
/// Geometric degeneracy (zero-area triangles, polygons that vanish during a
/// split) is never an error; those are dropped silently.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MeshError {
    /// The position array does not hold whole `(x, y, z)` triplets
    #[error("position buffer length {len} is not a multiple of 3")]
    PositionsNotTriplets { len: usize },
    /// The normal array does not match the position array one to one
    #[error("normal buffer length {normals} does not match position buffer length {positions}")]
    NormalsLengthMismatch { positions: usize, normals: usize },
    /// The index array does not describe whole triangles
    #[error("index buffer length {len} is not a multiple of 3")]
    IndicesNotTriangles { len: usize },
    /// A triangle refers to a vertex that does not exist
    #[error("vertex index {index} is out of range (vertex count = {vertex_count})")]
    IndexOutOfRange { index: usize, vertex_count: usize },
    /// A flat matrix slice that is not 4×4
    #[error("transform matrix needs 16 elements, got {len}")]
    MatrixLength { len: usize },
}

/// Result alias used by the fallible constructors.
pub type Result<T> = std::result::Result<T, MeshError>;
