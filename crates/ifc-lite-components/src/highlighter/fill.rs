// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Colored fill overlays, one per (channel, fragment)

use crate::config::HighlightMaterial;
use ifc_lite_fragments::{Aabb, Fragment};
use nalgebra::Matrix4;
use rustc_hash::FxHashSet;

/// Draw order of fill overlays, above the base fragments
pub const FILL_RENDER_ORDER: i32 = 2;

/// One instance slot of an overlay
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayInstance {
    pub item_ids: Vec<String>,
    pub transform: Matrix4<f32>,
}

/// Overlay sub-mesh drawing a channel's selection over one fragment
///
/// Instanced fragments get one slot per selected element and an active
/// count; slots past the count are stale and not drawn. Block fragments
/// keep a single slot covering every element and a visibility mask.
#[derive(Clone, Debug)]
pub struct FillOverlay {
    materials: Option<Vec<HighlightMaterial>>,
    block: bool,
    instances: Vec<OverlayInstance>,
    count: usize,
    visible_items: FxHashSet<String>,
    pub(crate) attached: bool,
}

impl FillOverlay {
    pub(crate) fn new(fragment: &Fragment, materials: Option<Vec<HighlightMaterial>>) -> Self {
        let block = fragment.is_block_fragment();
        let instances = if block {
            vec![OverlayInstance {
                item_ids: fragment.ids(),
                transform: Matrix4::identity(),
            }]
        } else {
            Vec::new()
        };
        Self {
            materials,
            block,
            count: instances.len(),
            instances,
            visible_items: FxHashSet::default(),
            attached: false,
        }
    }

    /// Rewrite the overlay for the selected elements of its fragment
    pub(crate) fn sync(&mut self, fragment: &Fragment, ids: &FxHashSet<String>) {
        if self.block {
            let transform = fragment
                .instance_transform(0)
                .unwrap_or_else(Matrix4::identity);
            self.instances = vec![OverlayInstance {
                item_ids: fragment.ids(),
                transform,
            }];
            self.count = 1;
            self.visible_items = ids.clone();
            return;
        }

        let mut sorted: Vec<&String> = ids.iter().collect();
        sorted.sort_unstable();

        let mut written = 0;
        for id in sorted {
            let Some(transform) = fragment
                .instance_and_block(id)
                .and_then(|(instance, _)| fragment.instance_transform(instance))
            else {
                log::debug!("Item {} has no instance in fragment {}", id, fragment.id());
                continue;
            };
            let slot = OverlayInstance {
                item_ids: vec![id.clone()],
                transform,
            };
            match self.instances.get_mut(written) {
                Some(existing) => *existing = slot,
                None => self.instances.push(slot),
            }
            written += 1;
        }
        self.count = written;
    }

    /// Materials; `None` draws with the fragment's own material
    pub fn materials(&self) -> Option<&[HighlightMaterial]> {
        self.materials.as_deref()
    }

    pub fn is_block(&self) -> bool {
        self.block
    }

    /// Number of instances drawn
    pub fn count(&self) -> usize {
        self.count
    }

    /// Instances drawn, in slot order
    pub fn instances(&self) -> &[OverlayInstance] {
        &self.instances[..self.count.min(self.instances.len())]
    }

    /// Every written slot, stale ones included
    pub fn allocated(&self) -> usize {
        self.instances.len()
    }

    /// Visibility mask of a block overlay
    pub fn visible_items(&self) -> &FxHashSet<String> {
        &self.visible_items
    }

    /// Whether the overlay is currently in the scene
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn render_order(&self) -> i32 {
        FILL_RENDER_ORDER
    }

    /// Whether the overlay draws an element
    pub fn shows_item(&self, item_id: &str) -> bool {
        if !self.attached {
            return false;
        }
        if self.block {
            return self.visible_items.contains(item_id);
        }
        self.instances()
            .iter()
            .any(|inst| inst.item_ids.iter().any(|id| id == item_id))
    }

    /// Grow a box around the drawn geometry
    pub(crate) fn expand_bounds(&self, fragment: &Fragment, aabb: &mut Aabb) {
        let geometry = fragment.geometry();
        let world = fragment.world_matrix();

        if self.block {
            let Some(instance) = self.instances.first() else {
                return;
            };
            let matrix = world * instance.transform;
            for vertex in 0..geometry.vertex_count() {
                let visible = fragment
                    .vertex_block(vertex)
                    .and_then(|block| fragment.item_id(0, block))
                    .is_some_and(|item| self.visible_items.contains(item));
                if let (true, Some(p)) = (visible, geometry.vertex(vertex)) {
                    aabb.expand_transformed(&matrix, &p);
                }
            }
            return;
        }

        for instance in self.instances() {
            let matrix = world * instance.transform;
            for vertex in 0..geometry.vertex_count() {
                if let Some(p) = geometry.vertex(vertex) {
                    aabb.expand_transformed(&matrix, &p);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ifc_lite_fragments::FragmentGeometry;
    use nalgebra::Vector3;

    fn instanced() -> Fragment {
        let geometry =
            FragmentGeometry::new(vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0], vec![0, 1, 2]);
        (0..3).fold(Fragment::new("f", geometry), |fragment, i| {
            fragment.with_instance(
                i.to_string(),
                Matrix4::new_translation(&Vector3::new(i as f32 * 2.0, 0.0, 0.0)),
            )
        })
    }

    fn set(ids: &[&str]) -> FxHashSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_count_follows_selection() {
        let fragment = instanced();
        let mut overlay = FillOverlay::new(&fragment, None);
        assert_eq!(overlay.count(), 0);

        overlay.sync(&fragment, &set(&["0", "1", "2"]));
        assert_eq!(overlay.count(), 3);

        overlay.sync(&fragment, &set(&["1"]));
        assert_eq!(overlay.count(), 1);
        assert_eq!(overlay.allocated(), 3);
        assert_eq!(overlay.instances()[0].item_ids, vec!["1".to_string()]);
        assert_eq!(
            overlay.instances()[0].transform,
            fragment.instance_transform(1).unwrap()
        );
    }

    #[test]
    fn test_unknown_items_are_not_counted() {
        let fragment = instanced();
        let mut overlay = FillOverlay::new(&fragment, None);
        overlay.sync(&fragment, &set(&["0", "missing"]));
        assert_eq!(overlay.count(), 1);
    }

    #[test]
    fn test_block_overlay_uses_mask() {
        let geometry = FragmentGeometry::new(vec![0.0; 12], vec![0, 1, 2, 1, 2, 3])
            .with_blocks(vec![0, 0, 1, 1]);
        let fragment = Fragment::new("b", geometry)
            .with_block_items(vec!["20".into(), "21".into()], Matrix4::identity());

        let mut overlay = FillOverlay::new(&fragment, None);
        assert!(overlay.is_block());
        assert_eq!(overlay.count(), 1);

        overlay.sync(&fragment, &set(&["21"]));
        overlay.attached = true;
        assert!(overlay.shows_item("21"));
        assert!(!overlay.shows_item("20"));
        assert_eq!(overlay.instances()[0].item_ids.len(), 2);
    }
}
