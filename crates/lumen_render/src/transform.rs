//! Translation and rotation wrappers.
//!
//! A wrapper rewrites the incoming ray into the child's local frame,
//! delegates, then maps the hit point and normal back to world space.
//! Both wrappers precompute a tight world-space bounding box so BVH culling
//! keeps working above transformed subtrees.

use crate::{
    hittable::{HitRecord, Hittable},
    Ray,
};
use lumen_math::{Aabb, Interval, Vec3};

/// Shift a child hittable by a fixed offset.
pub struct Translate {
    object: Box<dyn Hittable>,
    offset: Vec3,
    bbox: Aabb,
}

impl Translate {
    pub fn new(object: Box<dyn Hittable>, offset: Vec3) -> Self {
        let bbox = object.bounding_box().translate(offset);
        Self {
            object,
            offset,
            bbox,
        }
    }
}

impl Hittable for Translate {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let offset_ray = Ray::new(ray.origin - self.offset, ray.direction, ray.time);

        if !self.object.hit(&offset_ray, ray_t, rec) {
            return false;
        }

        rec.p += self.offset;
        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// Rotation axis for [`Rotate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// The two coordinate indices the rotation mixes; the axis coordinate
    /// itself is untouched.
    fn pair(self) -> (usize, usize) {
        match self {
            Axis::X => (1, 2),
            Axis::Y => (0, 2),
            Axis::Z => (0, 1),
        }
    }
}

/// Rotate a vector's mixed coordinate pair; negating `sin_theta` inverts.
fn rotate_pair(mut v: Vec3, axis: Axis, cos_theta: f32, sin_theta: f32) -> Vec3 {
    let (i, j) = axis.pair();
    let a = cos_theta * v[i] - sin_theta * v[j];
    let b = sin_theta * v[i] + cos_theta * v[j];
    v[i] = a;
    v[j] = b;
    v
}

/// Rotate a child hittable around one coordinate axis.
pub struct Rotate {
    object: Box<dyn Hittable>,
    axis: Axis,
    cos_theta: f32,
    sin_theta: f32,
    bbox: Aabb,
}

impl Rotate {
    pub fn new(object: Box<dyn Hittable>, axis: Axis, degrees: f32) -> Self {
        let radians = degrees.to_radians();
        let (sin_theta, cos_theta) = radians.sin_cos();

        // world box: the AABB of the eight rotated corners of the child box
        let child = object.bounding_box();
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);

        for i in 0..2 {
            for j in 0..2 {
                for k in 0..2 {
                    let corner = Vec3::new(
                        if i == 0 { child.x.min } else { child.x.max },
                        if j == 0 { child.y.min } else { child.y.max },
                        if k == 0 { child.z.min } else { child.z.max },
                    );
                    // local-to-world is the inverse of the ray rotation
                    let rotated = rotate_pair(corner, axis, cos_theta, -sin_theta);
                    min = min.min(rotated);
                    max = max.max(rotated);
                }
            }
        }

        Self {
            object,
            axis,
            cos_theta,
            sin_theta,
            bbox: Aabb::from_points(min, max),
        }
    }

    pub fn around_x(object: Box<dyn Hittable>, degrees: f32) -> Self {
        Self::new(object, Axis::X, degrees)
    }

    pub fn around_y(object: Box<dyn Hittable>, degrees: f32) -> Self {
        Self::new(object, Axis::Y, degrees)
    }

    pub fn around_z(object: Box<dyn Hittable>, degrees: f32) -> Self {
        Self::new(object, Axis::Z, degrees)
    }
}

impl Hittable for Rotate {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        // ray into the child's frame
        let origin = rotate_pair(ray.origin, self.axis, self.cos_theta, self.sin_theta);
        let direction = rotate_pair(ray.direction, self.axis, self.cos_theta, self.sin_theta);
        let rotated_ray = Ray::new(origin, direction, ray.time);

        if !self.object.hit(&rotated_ray, ray_t, rec) {
            return false;
        }

        // hit point and normal back into world space
        rec.p = rotate_pair(rec.p, self.axis, self.cos_theta, -self.sin_theta);
        rec.normal = rotate_pair(rec.normal, self.axis, self.cos_theta, -self.sin_theta);

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
