//! Struct and functions for working with `Vertex`s from which `Polygon`s are composed.

use crate::float_types::Real;
use nalgebra::{Matrix3, Matrix4, Point3, Vector3};

/// A vertex of a polygon, holding position and normal.
///
/// Vertices are plain values: cloning or splitting a polygon always copies
/// them, nothing ever points back at the polygon that owns them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub pos: Point3<Real>,
    pub normal: Vector3<Real>,
}

impl Vertex {
    /// Create a new [`Vertex`].
    ///
    /// * `pos`    – the position in world space
    /// * `normal` – shading normal; it is **copied verbatim**, so make sure it is
    ///   oriented the way you need it for lighting.
    pub const fn new(pos: Point3<Real>, normal: Vector3<Real>) -> Self {
        Vertex { pos, normal }
    }

    /// Convenience constructor from the six scalars `{x,y,z,nx,ny,nz}`.
    pub fn from_components(x: Real, y: Real, z: Real, nx: Real, ny: Real, nz: Real) -> Self {
        Vertex::new(Point3::new(x, y, z), Vector3::new(nx, ny, nz))
    }

    /// Flip vertex normal in place.
    pub fn flip(&mut self) {
        self.normal = -self.normal;
    }

    /// Position sum; the normal of `self` is kept.
    pub fn add(&self, other: &Vertex) -> Vertex {
        Vertex::new(self.pos + other.pos.coords, self.normal)
    }

    /// Position difference; the normal of `self` is kept.
    pub fn subtract(&self, other: &Vertex) -> Vertex {
        Vertex::new(Point3::from(self.pos - other.pos), self.normal)
    }

    /// Position scaled by `factor`; the normal of `self` is kept.
    pub fn multiply_scalar(&self, factor: Real) -> Vertex {
        Vertex::new(Point3::from(self.pos.coords * factor), self.normal)
    }

    /// Cross product of the positions taken as vectors.
    pub fn cross(&self, other: &Vertex) -> Vertex {
        Vertex::new(Point3::from(self.pos.coords.cross(&other.pos.coords)), self.normal)
    }

    /// Dot product of the positions taken as vectors.
    pub fn dot(&self, other: &Vertex) -> Real {
        self.pos.coords.dot(&other.pos.coords)
    }

    /// Position rescaled to unit length. A zero-length position stays at the origin.
    pub fn normalize(&self) -> Vertex {
        let len = self.pos.coords.norm();
        if len > 0.0 {
            Vertex::new(Point3::from(self.pos.coords / len), self.normal)
        } else {
            *self
        }
    }

    /// Linear interpolation between `self` (`t = 0`) and `other` (`t = 1`).
    ///
    /// Position **and** normal are blended, so both halves of a split polygon
    /// see exactly the same vertex on the cut edge.
    pub fn interpolate(&self, other: &Vertex, t: Real) -> Vertex {
        // p(t) = p0 + t * (p1 - p0)
        let new_pos = self.pos + (other.pos - self.pos) * t;
        // n(t) = n0 + t * (n1 - n0)
        let new_normal = self.normal + (other.normal - self.normal) * t;
        Vertex::new(new_pos, new_normal)
    }

    /// Transform in place by an affine 4×4 matrix.
    ///
    /// The position goes through the full affine map, the normal through the
    /// inverse-transpose of the linear part and is renormalised. A singular
    /// matrix yields NaN normals, which the caller is expected to avoid.
    pub fn apply_matrix4(&mut self, matrix: &Matrix4<Real>) {
        self.transform(matrix, &normal_matrix(matrix));
    }

    /// Same as [`apply_matrix4`](Self::apply_matrix4) with a precomputed normal matrix,
    /// for transforming many vertices by one matrix.
    pub fn transform(&mut self, matrix: &Matrix4<Real>, normal_matrix: &Matrix3<Real>) {
        self.pos = matrix.transform_point(&self.pos);
        let normal = normal_matrix * self.normal;
        let len = normal.norm();
        self.normal = if len > 0.0 { normal / len } else { normal };
    }
}

/// Inverse-transpose of the linear (upper 3×3) part of `matrix`.
///
/// Returns an all-NaN matrix when the linear part is singular so the bad
/// transform shows up in the output instead of being hidden.
pub fn normal_matrix(matrix: &Matrix4<Real>) -> Matrix3<Real> {
    let linear: Matrix3<Real> = matrix.fixed_view::<3, 3>(0, 0).into_owned();
    match linear.try_inverse() {
        Some(inverse) => inverse.transpose(),
        None => Matrix3::from_element(Real::NAN),
    }
}
