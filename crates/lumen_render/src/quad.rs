//! Quad (parallelogram) primitive and the six-quad box helper.

use std::sync::Arc;

use crate::{
    hittable::{HitRecord, Hittable},
    HittableList, Material, Ray,
};
use lumen_math::{Aabb, Interval, Vec3};

/// A parallelogram defined by a corner Q and two edge vectors u, v.
///
/// The plane data (unit normal, plane offset D, and the basis-projection
/// vector w) is precomputed so `hit` is a plane intersection plus two dot
/// products.
pub struct Quad {
    q: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    normal: Vec3,
    d: f32,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Quad {
    pub fn new(q: Vec3, u: Vec3, v: Vec3, material: Arc<dyn Material>) -> Self {
        let n = u.cross(v);
        let normal = n.normalize_or_zero();
        let d = normal.dot(q);
        let w = n / n.dot(n);

        // cover both diagonals so any edge orientation is enclosed
        let bbox = Aabb::surrounding(
            &Aabb::from_points(q, q + u + v),
            &Aabb::from_points(q + u, q + v),
        );

        Self {
            q,
            u,
            v,
            w,
            normal,
            d,
            material,
            bbox,
        }
    }
}

impl Hittable for Quad {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let denom = self.normal.dot(ray.direction);

        // parallel to the plane (or degenerate edges)
        if denom.abs() < 1e-8 {
            return false;
        }

        let t = (self.d - self.normal.dot(ray.origin)) / denom;
        if !ray_t.surrounds(t) {
            return false;
        }

        // express the planar hit point in the (u, v) edge basis
        let p = ray.at(t);
        let planar = p - self.q;
        let alpha = self.w.dot(planar.cross(self.v));
        let beta = self.w.dot(self.u.cross(planar));

        if !(0.0..=1.0).contains(&alpha) || !(0.0..=1.0).contains(&beta) {
            return false;
        }

        rec.t = t;
        rec.p = p;
        rec.u = alpha;
        rec.v = beta;
        rec.set_face_normal(ray, self.normal);
        rec.material = self.material.as_ref();

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// The six quads enclosing the axis-aligned region between two corners.
pub fn make_box(a: Vec3, b: Vec3, material: Arc<dyn Material>) -> HittableList {
    let mut sides = HittableList::new();

    let min = a.min(b);
    let max = a.max(b);

    let dx = Vec3::new(max.x - min.x, 0.0, 0.0);
    let dy = Vec3::new(0.0, max.y - min.y, 0.0);
    let dz = Vec3::new(0.0, 0.0, max.z - min.z);

    // front
    sides.add(Box::new(Quad::new(
        Vec3::new(min.x, min.y, max.z),
        dx,
        dy,
        material.clone(),
    )));
    // right
    sides.add(Box::new(Quad::new(
        Vec3::new(max.x, min.y, max.z),
        -dz,
        dy,
        material.clone(),
    )));
    // back
    sides.add(Box::new(Quad::new(
        Vec3::new(max.x, min.y, min.z),
        -dx,
        dy,
        material.clone(),
    )));
    // left
    sides.add(Box::new(Quad::new(
        Vec3::new(min.x, min.y, min.z),
        dz,
        dy,
        material.clone(),
    )));
    // top
    sides.add(Box::new(Quad::new(
        Vec3::new(min.x, max.y, max.z),
        dx,
        -dz,
        material.clone(),
    )));
    // bottom
    sides.add(Box::new(Quad::new(
        Vec3::new(min.x, min.y, min.z),
        dx,
        dz,
        material,
    )));

    sides
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, Hittable, Lambertian};

    fn grey() -> Arc<dyn Material> {
        Arc::new(Lambertian::new(Color::splat(0.5)))
    }

    fn unit_quad() -> Quad {
        // unit square in the XY plane at z = 0
        Quad::new(Vec3::ZERO, Vec3::X, Vec3::Y, grey())
    }

    #[test]
    fn centroid_hit_has_centered_uv() {
        let quad = unit_quad();
        let ray = Ray::new_simple(Vec3::new(0.5, 0.5, -1.0), Vec3::Z);
        let mut rec = HitRecord::default();

        assert!(quad.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec));
        assert!((rec.t - 1.0).abs() < 1e-6);
        assert!((rec.u - 0.5).abs() < 1e-6);
        assert!((rec.v - 0.5).abs() < 1e-6);
        // ray travels +z, quad normal is +z, so we struck the back face
        assert!(!rec.front_face);
        assert!(rec.normal.dot(ray.direction) <= 0.0);
    }

    #[test]
    fn interior_predicate_bounds_the_parallelogram() {
        let quad = unit_quad();
        let mut rec = HitRecord::default();

        let inside = Ray::new_simple(Vec3::new(0.5, 0.5, -1.0), Vec3::Z);
        assert!(quad.hit(&inside, Interval::new(0.001, f32::INFINITY), &mut rec));

        // alpha would be 1.5: on the plane but outside the quad
        let outside = Ray::new_simple(Vec3::new(1.5, 0.5, -1.0), Vec3::Z);
        assert!(!quad.hit(&outside, Interval::new(0.001, f32::INFINITY), &mut rec));
    }

    #[test]
    fn parallel_ray_misses() {
        let quad = unit_quad();
        let ray = Ray::new_simple(Vec3::new(0.5, 0.5, -1.0), Vec3::X);
        let mut rec = HitRecord::default();

        assert!(!quad.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec));
    }

    #[test]
    fn skewed_edges_use_edge_basis_uv() {
        // edges are not orthogonal; the (alpha, beta) coordinates still
        // parameterize the parallelogram
        let quad = Quad::new(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), Vec3::new(1.0, 1.0, 0.0), grey());
        let target = Vec3::ZERO + 0.25 * Vec3::new(2.0, 0.0, 0.0) + 0.5 * Vec3::new(1.0, 1.0, 0.0);
        let ray = Ray::new_simple(target - Vec3::Z, Vec3::Z);
        let mut rec = HitRecord::default();

        assert!(quad.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec));
        assert!((rec.u - 0.25).abs() < 1e-5);
        assert!((rec.v - 0.5).abs() < 1e-5);
    }

    #[test]
    fn planar_quad_bbox_is_padded() {
        let quad = unit_quad();
        assert!(quad.bounding_box().z.size() >= 1e-4);
    }

    #[test]
    fn box_has_six_sides_and_encloses_region() {
        let sides = make_box(Vec3::ZERO, Vec3::ONE, grey());
        assert_eq!(sides.len(), 6);

        // a ray through the middle hits the near face at z = 1
        let ray = Ray::new_simple(Vec3::new(0.5, 0.5, 3.0), Vec3::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();
        assert!(sides.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec));
        assert!((rec.t - 2.0).abs() < 1e-5);
    }
}
