// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bounding volumes used to frame selections

use nalgebra::{Matrix4, Point3, Vector3};

/// Axis-aligned bounding box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}

impl Aabb {
    /// Inverted box that any point expands
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
            max: Point3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
        }
    }

    /// Check if no point has been added
    pub fn is_empty(&self) -> bool {
        self.max.x < self.min.x || self.max.y < self.min.y || self.max.z < self.min.z
    }

    /// Grow to include a point
    pub fn expand(&mut self, p: &Point3<f32>) {
        self.min = self.min.inf(p);
        self.max = self.max.sup(p);
    }

    /// Grow to include a point after applying a transform
    pub fn expand_transformed(&mut self, matrix: &Matrix4<f32>, p: &Point3<f32>) {
        self.expand(&matrix.transform_point(p));
    }

    /// Box centre
    pub fn center(&self) -> Point3<f32> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Box extent along each axis
    pub fn size(&self) -> Vector3<f32> {
        self.max - self.min
    }

    /// Sphere through the box corners; `None` for an empty box
    pub fn bounding_sphere(&self) -> Option<BoundingSphere> {
        if self.is_empty() {
            return None;
        }
        Some(BoundingSphere {
            center: self.center(),
            radius: self.size().norm() * 0.5,
        })
    }
}

/// Bounding sphere handed to the camera for framing
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingSphere {
    pub center: Point3<f32>,
    pub radius: f32,
}

impl BoundingSphere {
    /// Scale the radius, keeping the centre
    pub fn scaled(mut self, factor: f32) -> Self {
        self.radius *= factor;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_empty_box_has_no_sphere() {
        let aabb = Aabb::empty();
        assert!(aabb.is_empty());
        assert!(aabb.bounding_sphere().is_none());
    }

    #[test]
    fn test_sphere_from_box() {
        let mut aabb = Aabb::empty();
        aabb.expand(&Point3::new(0.0, 0.0, 0.0));
        aabb.expand(&Point3::new(2.0, 2.0, 1.0));

        let sphere = aabb.bounding_sphere().unwrap();
        assert_relative_eq!(sphere.center, Point3::new(1.0, 1.0, 0.5));
        assert_relative_eq!(sphere.radius, 1.5);
        assert_relative_eq!(sphere.scaled(1.5).radius, 2.25);
    }

    #[test]
    fn test_expand_transformed() {
        let mut aabb = Aabb::empty();
        let shift = Matrix4::new_translation(&Vector3::new(10.0, 0.0, 0.0));
        aabb.expand_transformed(&shift, &Point3::origin());
        assert_relative_eq!(aabb.min, Point3::new(10.0, 0.0, 0.0));
    }
}
