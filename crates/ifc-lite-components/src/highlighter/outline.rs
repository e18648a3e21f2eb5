// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Invisible proxy meshes feeding the shared outline effect
//!
//! One proxy per fragment, shared by every channel. The proxy mirrors the
//! fragment's buffers; what gets outlined is controlled only through its
//! index buffer (block fragments) or its active instance count.

use ifc_lite_fragments::{Aabb, Fragment};
use nalgebra::Matrix4;
use rustc_hash::FxHashSet;

/// Draw order of outline proxies
pub const OUTLINE_RENDER_ORDER: i32 = 999;

#[derive(Clone, Debug)]
pub struct OutlineProxy {
    block: bool,
    index: Vec<u32>,
    transforms: Vec<Matrix4<f32>>,
    count: usize,
    world_matrix: Matrix4<f32>,
    pub(crate) registered: bool,
}

impl OutlineProxy {
    pub(crate) fn new(fragment: &Fragment) -> Self {
        Self {
            block: fragment.is_block_fragment(),
            index: fragment.geometry().indices.clone(),
            transforms: vec![Matrix4::identity(); fragment.capacity()],
            count: 0,
            world_matrix: *fragment.world_matrix(),
            registered: false,
        }
    }

    /// Outline the selected elements of the fragment
    pub(crate) fn sync(&mut self, fragment: &Fragment, ids: &FxHashSet<String>) {
        if self.block {
            self.index = fragment
                .geometry()
                .indices
                .chunks_exact(3)
                .filter(|triangle| {
                    fragment
                        .vertex_block(triangle[0] as usize)
                        .and_then(|block| fragment.item_id(0, block))
                        .is_some_and(|item| ids.contains(item))
                })
                .flatten()
                .copied()
                .collect();
            return;
        }

        let mut sorted: Vec<&String> = ids.iter().collect();
        sorted.sort_unstable();

        let mut counter = 0;
        for id in sorted {
            let Some(transform) = fragment
                .instance_and_block(id)
                .and_then(|(instance, _)| fragment.instance_transform(instance))
            else {
                continue;
            };
            match self.transforms.get_mut(counter) {
                Some(slot) => *slot = transform,
                None => self.transforms.push(transform),
            }
            counter += 1;
        }
        self.count = counter;
    }

    /// Stop outlining anything
    pub(crate) fn clear(&mut self) {
        if self.block {
            self.index.clear();
        } else {
            self.count = 0;
        }
    }

    /// Follow the fragment's world matrix
    pub(crate) fn sync_world_matrix(&mut self, fragment: &Fragment) {
        self.world_matrix = *fragment.world_matrix();
    }

    pub fn is_block(&self) -> bool {
        self.block
    }

    /// Index buffer of the proxy
    pub fn index(&self) -> &[u32] {
        &self.index
    }

    /// Number of active instances
    pub fn count(&self) -> usize {
        self.count
    }

    /// Active instance transforms
    pub fn transforms(&self) -> &[Matrix4<f32>] {
        &self.transforms[..self.count.min(self.transforms.len())]
    }

    pub fn world_matrix(&self) -> &Matrix4<f32> {
        &self.world_matrix
    }

    /// Whether the proxy is in the outlined-meshes bucket
    pub fn is_registered(&self) -> bool {
        self.registered
    }

    pub fn render_order(&self) -> i32 {
        OUTLINE_RENDER_ORDER
    }

    /// Whether anything is outlined
    pub fn is_empty(&self) -> bool {
        if self.block {
            self.index.is_empty()
        } else {
            self.count == 0
        }
    }

    /// Grow a box around the outlined geometry
    pub(crate) fn expand_bounds(&self, fragment: &Fragment, aabb: &mut Aabb) {
        let geometry = fragment.geometry();

        if self.block {
            let matrix = self.world_matrix
                * fragment
                    .instance_transform(0)
                    .unwrap_or_else(Matrix4::identity);
            for &vertex in &self.index {
                if let Some(p) = geometry.vertex(vertex as usize) {
                    aabb.expand_transformed(&matrix, &p);
                }
            }
            return;
        }

        for transform in self.transforms() {
            let matrix = self.world_matrix * transform;
            for vertex in 0..geometry.vertex_count() {
                if let Some(p) = geometry.vertex(vertex) {
                    aabb.expand_transformed(&matrix, &p);
                }
            }
        }
    }
}
