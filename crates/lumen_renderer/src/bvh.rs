//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree of boxes built once over the scene's objects. Each level
//! splits its objects in half along the longest axis of their union box.

use std::sync::Arc;

use crate::hittable::{HitRecord, Hittable};
use lumen_math::{Aabb, Interval, Ray};
use rand::RngCore;

/// Internal BVH node.
///
/// Children are either further nodes or the scene objects themselves. A node
/// built over a single object points both children at that same object.
pub struct BvhNode {
    left: Arc<Hittable>,
    right: Arc<Hittable>,
    bbox: Aabb,
    /// Internal nodes in this subtree, including this one
    nodes: usize,
}

impl BvhNode {
    /// Build a BVH over `objects`. Returns `None` when there is nothing to bound.
    pub fn new(mut objects: Vec<Arc<Hittable>>) -> Option<Self> {
        if objects.is_empty() {
            return None;
        }

        let root = Self::build(&mut objects);
        log::debug!(
            "Built BVH over {} objects: {} internal nodes",
            objects.len(),
            root.nodes
        );
        Some(root)
    }

    /// Recursive construction over a non-empty slice.
    ///
    /// Median split: sort by box minimum on the longest axis, halve, recurse.
    /// Halves of one object become direct children rather than nodes.
    fn build(objects: &mut [Arc<Hittable>]) -> Self {
        let bbox = objects.iter().fold(Aabb::EMPTY, |acc, object| {
            Aabb::surrounding(&acc, &object.bounding_box())
        });

        match objects.len() {
            1 => {
                return Self {
                    left: objects[0].clone(),
                    right: objects[0].clone(),
                    bbox,
                    nodes: 1,
                }
            }
            2 => {
                return Self {
                    left: objects[0].clone(),
                    right: objects[1].clone(),
                    bbox,
                    nodes: 1,
                }
            }
            _ => {}
        }

        let axis = bbox.longest_axis();
        objects.sort_by(|a, b| {
            let a_min = a.bounding_box().axis_interval(axis).min;
            let b_min = b.bounding_box().axis_interval(axis).min;
            a_min.total_cmp(&b_min)
        });

        let mid = objects.len() / 2;
        let (left_objects, right_objects) = objects.split_at_mut(mid);
        let (left, left_nodes) = Self::child(left_objects);
        let (right, right_nodes) = Self::child(right_objects);

        Self {
            left,
            right,
            bbox,
            nodes: 1 + left_nodes + right_nodes,
        }
    }

    fn child(objects: &mut [Arc<Hittable>]) -> (Arc<Hittable>, usize) {
        if objects.len() == 1 {
            return (objects[0].clone(), 0);
        }
        let node = Self::build(objects);
        let nodes = node.nodes;
        (Arc::new(Hittable::Bvh(node)), nodes)
    }

    /// Number of internal nodes in the tree.
    pub fn node_count(&self) -> usize {
        self.nodes
    }

    pub fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        if !self.bbox.hit(ray, ray_t) {
            return None;
        }

        let left = self.left.hit(ray, ray_t, rng);
        // Right side only needs to beat the left hit
        let max = left.as_ref().map_or(ray_t.max, |rec| rec.t);
        let right = self.right.hit(ray, Interval::new(ray_t.min, max), rng);

        right.or(left)
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
