//! Triangle primitive (Möller-Trumbore intersection).

use std::sync::Arc;

use crate::{
    hittable::{HitRecord, Hittable},
    Material, Ray,
};
use lumen_math::{Aabb, Interval, Vec3};

pub struct Triangle {
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    /// Unit face normal; zero for degenerate triangles, which never hit
    normal: Vec3,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Triangle {
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, material: Arc<dyn Material>) -> Self {
        let edge1 = v1 - v0;
        let edge2 = v2 - v0;
        let normal = edge1.cross(edge2).normalize_or_zero();

        let min = v0.min(v1).min(v2);
        let max = v0.max(v1).max(v2);
        let bbox = Aabb::from_points(min, max);

        Self {
            v0,
            v1,
            v2,
            normal,
            material,
            bbox,
        }
    }
}

impl Hittable for Triangle {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;

        let h = ray.direction.cross(edge2);
        let det = edge1.dot(h);

        // parallel ray, or a zero-area triangle
        if det.abs() < 1e-8 {
            return false;
        }

        let inv_det = 1.0 / det;
        let s = ray.origin - self.v0;
        let u = inv_det * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return false;
        }

        let q = s.cross(edge1);
        let v = inv_det * ray.direction.dot(q);
        if v < 0.0 || u + v > 1.0 {
            return false;
        }

        let t = inv_det * edge2.dot(q);
        if !ray_t.surrounds(t) {
            return false;
        }

        rec.t = t;
        rec.p = ray.at(t);
        rec.u = u;
        rec.v = v;
        rec.set_face_normal(ray, self.normal);
        rec.material = self.material.as_ref();

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, Lambertian};

    fn grey() -> Arc<dyn Material> {
        Arc::new(Lambertian::new(Color::splat(0.5)))
    }

    fn standard_triangle() -> Triangle {
        Triangle::new(
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(0.0, 1.0, -1.0),
            grey(),
        )
    }

    #[test]
    fn center_hit() {
        let tri = standard_triangle();
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();

        assert!(tri.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec));
        assert!((rec.t - 1.0).abs() < 1e-5);
        assert!(rec.normal.dot(ray.direction) <= 0.0);
        assert!(tri.bounding_box().contains(rec.p));
    }

    #[test]
    fn barycentric_interior_predicate() {
        let tri = Triangle::new(Vec3::ZERO, Vec3::X, Vec3::Y, grey());
        let mut rec = HitRecord::default();

        // inside: u + v < 1
        let inside = Ray::new_simple(Vec3::new(0.25, 0.25, -1.0), Vec3::Z);
        assert!(tri.hit(&inside, Interval::new(0.001, f32::INFINITY), &mut rec));
        assert!((rec.u - 0.25).abs() < 1e-5);
        assert!((rec.v - 0.25).abs() < 1e-5);

        // beyond the hypotenuse: u + v > 1
        let outside = Ray::new_simple(Vec3::new(0.75, 0.75, -1.0), Vec3::Z);
        assert!(!tri.hit(&outside, Interval::new(0.001, f32::INFINITY), &mut rec));
    }

    #[test]
    fn miss_behind_ray() {
        let tri = standard_triangle();
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        let mut rec = HitRecord::default();

        assert!(!tri.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec));
    }

    #[test]
    fn degenerate_triangle_never_hits() {
        // all three vertices collinear: zero area
        let tri = Triangle::new(
            Vec3::ZERO,
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            grey(),
        );
        let ray = Ray::new_simple(Vec3::new(1.0, 0.0, -1.0), Vec3::Z);
        let mut rec = HitRecord::default();

        assert!(!tri.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec));
    }
}
