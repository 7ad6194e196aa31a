use crate::aabb::Aabb;
use crate::float_types::Real;
use crate::mesh::geometry::Geometry;
use nalgebra::Vector3;

/// Boolean operations on solids
pub trait CSGOps: Sized + Clone {
    fn union(&self, other: &Self) -> Self;
    fn intersect(&self, other: &Self) -> Self;
    fn subtract(&self, other: &Self) -> Self;
    fn bounding_box(&self) -> Aabb;
    fn inverse(&self) -> Self;

    /// Symmetric difference: the space in exactly one of the two solids.
    fn xor(&self, other: &Self) -> Self {
        self.subtract(other).union(&other.subtract(self))
    }

    /// Edge lengths of the bounding box.
    fn extents(&self) -> Vector3<Real> {
        let aabb = self.bounding_box();
        if aabb.is_empty() {
            Vector3::zeros()
        } else {
            aabb.extents()
        }
    }
}

impl CSGOps for Geometry {
    fn union(&self, other: &Self) -> Self {
        Geometry::union(self, other)
    }

    fn intersect(&self, other: &Self) -> Self {
        Geometry::intersect(self, other)
    }

    fn subtract(&self, other: &Self) -> Self {
        Geometry::subtract(self, other)
    }

    fn bounding_box(&self) -> Aabb {
        Geometry::bounding_box(self)
    }

    fn inverse(&self) -> Self {
        Geometry::inverse(self)
    }
}
