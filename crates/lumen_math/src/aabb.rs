use crate::{Interval, Ray, Vec3};

/// Axis-aligned bounding box: one interval per axis.
///
/// Construction pads every axis to a minimum width so planar geometry
/// (quads, axis-aligned triangles) never produces a zero-thickness slab.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };

    pub fn new(x: Interval, y: Interval, z: Interval) -> Self {
        let mut aabb = Self { x, y, z };
        aabb.pad_to_minimums();
        aabb
    }

    /// Box spanning two corner points, in any order.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        let x = Interval::new(a.x.min(b.x), a.x.max(b.x));
        let y = Interval::new(a.y.min(b.y), a.y.max(b.y));
        let z = Interval::new(a.z.min(b.z), a.z.max(b.z));

        let mut aabb = Self { x, y, z };
        aabb.pad_to_minimums();
        aabb
    }

    /// The smallest box enclosing two other boxes.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            x: Interval::surrounding(&box0.x, &box1.x),
            y: Interval::surrounding(&box0.y, &box1.y),
            z: Interval::surrounding(&box0.z, &box1.z),
        }
    }

    /// Interval for axis n (0=X, 1=Y, 2=Z).
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Slab test: does the ray cross the box within ray_t?
    pub fn hit(&self, r: &Ray, mut ray_t: Interval) -> bool {
        let ray_orig = r.origin;
        let ray_dir = r.direction;

        // X axis
        let adinv = 1.0 / ray_dir.x;
        let mut t0 = (self.x.min - ray_orig.x) * adinv;
        let mut t1 = (self.x.max - ray_orig.x) * adinv;
        if adinv < 0.0 {
            std::mem::swap(&mut t0, &mut t1);
        }
        ray_t.min = t0.max(ray_t.min);
        ray_t.max = t1.min(ray_t.max);
        if ray_t.max <= ray_t.min {
            return false;
        }

        // Y axis
        let adinv = 1.0 / ray_dir.y;
        let mut t0 = (self.y.min - ray_orig.y) * adinv;
        let mut t1 = (self.y.max - ray_orig.y) * adinv;
        if adinv < 0.0 {
            std::mem::swap(&mut t0, &mut t1);
        }
        ray_t.min = t0.max(ray_t.min);
        ray_t.max = t1.min(ray_t.max);
        if ray_t.max <= ray_t.min {
            return false;
        }

        // Z axis
        let adinv = 1.0 / ray_dir.z;
        let mut t0 = (self.z.min - ray_orig.z) * adinv;
        let mut t1 = (self.z.max - ray_orig.z) * adinv;
        if adinv < 0.0 {
            std::mem::swap(&mut t0, &mut t1);
        }
        ray_t.min = t0.max(ray_t.min);
        ray_t.max = t1.min(ray_t.max);
        if ray_t.max <= ray_t.min {
            return false;
        }

        true
    }

    /// Point containment, used by intersection invariant checks.
    pub fn contains(&self, p: Vec3) -> bool {
        self.x.contains(p.x) && self.y.contains(p.y) && self.z.contains(p.z)
    }

    /// True when every axis of `other` lies within this box.
    pub fn encloses(&self, other: &Aabb) -> bool {
        self.x.min <= other.x.min
            && other.x.max <= self.x.max
            && self.y.min <= other.y.min
            && other.y.max <= self.y.max
            && self.z.min <= other.z.min
            && other.z.max <= self.z.max
    }

    /// The box shifted by an offset vector.
    pub fn translate(&self, offset: Vec3) -> Aabb {
        Aabb::new(
            self.x.add_scalar(offset.x),
            self.y.add_scalar(offset.y),
            self.z.add_scalar(offset.z),
        )
    }

    /// Index of the axis with the longest extent (0=X, 1=Y, 2=Z).
    pub fn longest_axis(&self) -> usize {
        let x_size = self.x.size();
        let y_size = self.y.size();
        let z_size = self.z.size();

        if x_size > y_size && x_size > z_size {
            0
        } else if y_size > z_size {
            1
        } else {
            2
        }
    }

    /// Center point of the box.
    pub fn centroid(&self) -> Vec3 {
        Vec3::new(
            (self.x.min + self.x.max) * 0.5,
            (self.y.min + self.y.max) * 0.5,
            (self.z.min + self.z.max) * 0.5,
        )
    }

    fn pad_to_minimums(&mut self) {
        let delta = 1e-4;
        if self.x.size() < delta {
            self.x = self.x.expand(delta);
        }
        if self.y.size() < delta {
            self.y = self.y.expand(delta);
        }
        if self.z.size() < delta {
            self.z = self.z.expand(delta);
        }
    }
}
