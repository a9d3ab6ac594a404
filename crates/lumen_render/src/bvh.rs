//! Bounding volume hierarchy acceleration structure.
//!
//! A binary tree over primitive AABBs. Construction sorts by centroid along
//! the longest axis of the covering box and splits at the median; traversal
//! walks left first and tightens the search interval with the left hit
//! before descending right.

use std::cmp::Ordering;

use crate::{HitRecord, Hittable, Ray};
use lumen_math::{Aabb, Interval, Vec3};

/// Maximum primitives per leaf node before splitting.
const LEAF_MAX_SIZE: usize = 4;

/// BVH node: a branch with two children, a leaf with a few primitives, or
/// empty (an empty scene).
pub enum BvhNode {
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    Leaf {
        objects: Vec<Box<dyn Hittable>>,
        bbox: Aabb,
    },
    Empty,
}

/// Primitive with its cached bounds and centroid, used during construction.
struct BvhPrimitive {
    bbox: Aabb,
    centroid: Vec3,
    object: Box<dyn Hittable>,
}

impl BvhNode {
    /// Build a BVH over a set of hittables.
    pub fn new(objects: Vec<Box<dyn Hittable>>) -> Self {
        if objects.is_empty() {
            return BvhNode::Empty;
        }

        let primitives: Vec<BvhPrimitive> = objects
            .into_iter()
            .map(|object| {
                let bbox = object.bounding_box();
                BvhPrimitive {
                    bbox,
                    centroid: bbox.centroid(),
                    object,
                }
            })
            .collect();

        Self::build(primitives)
    }

    fn build(mut primitives: Vec<BvhPrimitive>) -> Self {
        let bounds = primitives
            .iter()
            .fold(Aabb::EMPTY, |acc, p| Aabb::surrounding(&acc, &p.bbox));

        if primitives.len() <= LEAF_MAX_SIZE {
            return BvhNode::Leaf {
                objects: primitives.into_iter().map(|p| p.object).collect(),
                bbox: bounds,
            };
        }

        // median split along the widest axis of the covering box
        let axis = bounds.longest_axis();
        primitives.sort_unstable_by(|a, b| {
            a.centroid[axis]
                .partial_cmp(&b.centroid[axis])
                .unwrap_or(Ordering::Equal)
        });

        let right = primitives.split_off(primitives.len() / 2);

        BvhNode::Branch {
            left: Box::new(Self::build(primitives)),
            right: Box::new(Self::build(right)),
            bbox: bounds,
        }
    }
}

impl Hittable for BvhNode {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        match self {
            BvhNode::Empty => false,

            BvhNode::Leaf { objects, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return false;
                }

                let mut hit_anything = false;
                let mut closest = ray_t.max;

                for object in objects {
                    let interval = Interval::new(ray_t.min, closest);
                    if object.hit(ray, interval, rec) {
                        hit_anything = true;
                        closest = rec.t;
                    }
                }
                hit_anything
            }

            BvhNode::Branch { left, right, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return false;
                }

                let hit_left = left.hit(ray, ray_t, rec);

                // only search right up to the closest hit so far
                let right_max = if hit_left { rec.t } else { ray_t.max };
                let hit_right = right.hit(ray, Interval::new(ray_t.min, right_max), rec);

                hit_left || hit_right
            }
        }
    }

    fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Empty => Aabb::EMPTY,
            BvhNode::Leaf { bbox, .. } => *bbox,
            BvhNode::Branch { bbox, .. } => *bbox,
        }
    }
}
