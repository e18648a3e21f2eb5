// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Framing a channel's selection

use super::{FillOverlay, OutlineProxy};
use ifc_lite_fragments::{Aabb, BoundingSphere, FragmentIdMap, FragmentManager};
use rustc_hash::FxHashMap;

/// Box around the rendered overlays of a selection
///
/// Fill overlays count when `fills` is given, outline proxies when
/// `outlines` is given. Fragments that are no longer loaded are skipped.
pub fn selection_bounds(
    selection: &FragmentIdMap,
    fills: Option<&FxHashMap<String, FillOverlay>>,
    outlines: Option<&FxHashMap<String, OutlineProxy>>,
    fragments: &dyn FragmentManager,
) -> Aabb {
    let mut aabb = Aabb::empty();
    for fragment_id in selection.keys() {
        let Some(fragment) = fragments.fragment(fragment_id) else {
            continue;
        };
        if let Some(overlay) = fills.and_then(|fills| fills.get(fragment_id)) {
            overlay.expand_bounds(fragment, &mut aabb);
        }
        if let Some(proxy) = outlines.and_then(|outlines| outlines.get(fragment_id)) {
            proxy.expand_bounds(fragment, &mut aabb);
        }
    }
    aabb
}

/// Sphere to hand the camera: the box's bounding sphere scaled by `zoom_factor`
pub fn framing_sphere(aabb: &Aabb, zoom_factor: f32) -> Option<BoundingSphere> {
    aabb.bounding_sphere()
        .map(|sphere| sphere.scaled(zoom_factor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ifc_lite_fragments::{Fragment, FragmentGeometry, FragmentIdMapExt, FragmentRegistry};
    use nalgebra::{Matrix4, Point3, Vector3};
    use rustc_hash::FxHashSet;

    fn registry() -> FragmentRegistry {
        let geometry =
            FragmentGeometry::new(vec![0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0, 2.0, 0.0], vec![0, 1, 2]);
        let fragment = Fragment::new("f", geometry)
            .with_instance("1", Matrix4::identity())
            .with_instance("2", Matrix4::new_translation(&Vector3::new(10.0, 0.0, 0.0)))
            .with_world_matrix(Matrix4::new_translation(&Vector3::new(0.0, 0.0, 4.0)));
        let mut registry = FragmentRegistry::new();
        registry.add_fragment(fragment).unwrap();
        registry
    }

    #[test]
    fn test_bounds_cover_selected_instances_only() {
        let registry = registry();
        let fragment = registry.fragment("f").unwrap();
        let ids: FxHashSet<String> = ["1".to_string()].into_iter().collect();

        let mut overlay = FillOverlay::new(fragment, None);
        overlay.sync(fragment, &ids);
        let fills: FxHashMap<String, FillOverlay> =
            [("f".to_string(), overlay)].into_iter().collect();

        let mut selection = FragmentIdMap::default();
        selection.insert_item("f", "1");

        let aabb = selection_bounds(&selection, Some(&fills), None, &registry);
        assert_relative_eq!(aabb.min, Point3::new(0.0, 0.0, 4.0));
        assert_relative_eq!(aabb.max, Point3::new(2.0, 2.0, 4.0));

        let sphere = framing_sphere(&aabb, 1.5).unwrap();
        assert_relative_eq!(sphere.center, Point3::new(1.0, 1.0, 4.0));
        assert_relative_eq!(sphere.radius, 8.0_f32.sqrt() * 0.5 * 1.5, epsilon = 1e-5);
    }

    #[test]
    fn test_missing_overlays_give_empty_bounds() {
        let registry = registry();
        let mut selection = FragmentIdMap::default();
        selection.insert_item("f", "1");
        selection.insert_item("gone", "7");

        let aabb = selection_bounds(&selection, None, None, &registry);
        assert!(aabb.is_empty());
        assert!(framing_sphere(&aabb, 1.5).is_none());
    }
}
