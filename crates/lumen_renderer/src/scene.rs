//! The object collection and its acceleration structure.

use std::sync::Arc;

use crate::hittable::{HitRecord, Hittable, HittableList};
use crate::{BvhNode, SceneError};
use lumen_math::{Interval, Ray};
use rand::RngCore;

/// All objects to render, plus the BVH built over them.
///
/// Objects are added during assembly; `build_acceleration_structure` then
/// freezes the set. Hit queries go through the built root only.
#[derive(Default)]
pub struct Scene {
    objects: Vec<Arc<Hittable>>,
    root: Option<Hittable>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an object. Has no effect on an already built scene's queries.
    pub fn add(&mut self, object: impl Into<Arc<Hittable>>) {
        if self.root.is_some() {
            log::warn!("Object added after the acceleration structure was built; it will not be hit");
        }
        self.objects.push(object.into());
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn is_built(&self) -> bool {
        self.root.is_some()
    }

    /// Build the BVH over every object added so far. Call exactly once.
    pub fn build_acceleration_structure(&mut self) -> Result<(), SceneError> {
        if self.root.is_some() {
            return Err(SceneError::AlreadyBuilt);
        }

        let root = match BvhNode::new(self.objects.clone()) {
            Some(bvh) => Hittable::Bvh(bvh),
            // Nothing to bound: an empty list misses every ray
            None => Hittable::List(HittableList::new()),
        };
        log::debug!("Scene root built over {} objects", self.objects.len());
        self.root = Some(root);
        Ok(())
    }

    /// Closest hit within `ray_t`.
    ///
    /// The acceleration structure must already be built; an unbuilt scene
    /// reports no hits.
    pub fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        debug_assert!(self.is_built(), "hit query on a scene without a BVH");
        self.root.as_ref()?.hit(ray, ray_t, rng)
    }
}
