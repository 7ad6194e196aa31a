//! Axis-aligned bounding boxes.

use crate::float_types::Real;
use nalgebra::{Point3, Vector3};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub mins: Point3<Real>,
    pub maxs: Point3<Real>,
}

impl Aabb {
    #[inline]
    pub const fn new(mins: Point3<Real>, maxs: Point3<Real>) -> Self {
        Self { mins, maxs }
    }

    /// The empty box: `mins = +MAX`, `maxs = -MAX`, so that any point grows it.
    pub fn empty() -> Self {
        Self::new(
            Point3::new(Real::MAX, Real::MAX, Real::MAX),
            Point3::new(-Real::MAX, -Real::MAX, -Real::MAX),
        )
    }

    pub fn from_points<'a, I>(points: I) -> Self
    where
        I: IntoIterator<Item = &'a Point3<Real>>,
    {
        let mut aabb = Self::empty();
        points.into_iter().for_each(|p| aabb.take_point(p));
        aabb
    }

    /// Grow the box to contain `p`.
    pub fn take_point(&mut self, p: &Point3<Real>) {
        self.mins = self.mins.inf(p);
        self.maxs = self.maxs.sup(p);
    }

    /// Grow the box to contain `other`.
    pub fn merge(&mut self, other: &Aabb) {
        if !other.is_empty() {
            self.take_point(&other.mins);
            self.take_point(&other.maxs);
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mins.x > self.maxs.x || self.mins.y > self.maxs.y || self.mins.z > self.maxs.z
    }

    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        self.maxs.x >= other.mins.x
            && self.mins.x <= other.maxs.x
            && self.maxs.y >= other.mins.y
            && self.mins.y <= other.maxs.y
            && self.maxs.z >= other.mins.z
            && self.mins.z <= other.maxs.z
    }

    #[inline]
    pub fn center(&self) -> Point3<Real> {
        nalgebra::center(&self.mins, &self.maxs)
    }

    /// Edge lengths along x, y and z.
    #[inline]
    pub fn extents(&self) -> Vector3<Real> {
        self.maxs - self.mins
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}
