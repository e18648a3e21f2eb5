// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Renderable fragments
//!
//! A fragment is one geometry batch drawn with instancing. Two layouts exist:
//!
//! - **Instanced**: one block; every instance is one element (`item_ids[0]`).
//! - **Block**: several vertex blocks merged into one instance; block `b`
//!   belongs to element `item_ids[b]` of instance 0.

use crate::{FragmentError, Result};
use nalgebra::{Matrix4, Point3};
use rustc_hash::FxHashMap;

/// Vertex and index buffers of a fragment
#[derive(Clone, Debug, Default)]
pub struct FragmentGeometry {
    /// Vertex positions as flattened [x, y, z, x, y, z, ...]
    pub positions: Vec<f32>,
    /// Triangle indices
    pub indices: Vec<u32>,
    /// Block ID per vertex; empty for single-block geometry
    pub block_ids: Vec<u32>,
}

impl FragmentGeometry {
    /// Create geometry without block attribution
    pub fn new(positions: Vec<f32>, indices: Vec<u32>) -> Self {
        Self {
            positions,
            indices,
            block_ids: Vec::new(),
        }
    }

    /// Attach a per-vertex block ID buffer
    pub fn with_blocks(mut self, block_ids: Vec<u32>) -> Self {
        self.block_ids = block_ids;
        self
    }

    /// Get vertex count
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Vertex position by index
    pub fn vertex(&self, index: usize) -> Option<Point3<f32>> {
        let base = index * 3;
        let p = self.positions.get(base..base + 3)?;
        Some(Point3::new(p[0], p[1], p[2]))
    }
}

/// One instance of a fragment
#[derive(Clone, Debug)]
pub struct FragmentInstance {
    /// Element IDs drawn by this instance (one per block)
    pub item_ids: Vec<String>,
    /// Instance transform
    pub transform: Matrix4<f32>,
    /// Hidden instances stay loaded but are not rendered
    pub hidden: bool,
}

/// Renderable geometry batch representing one or more elements
#[derive(Clone, Debug)]
pub struct Fragment {
    id: String,
    geometry: FragmentGeometry,
    instances: Vec<FragmentInstance>,
    composites: FxHashMap<u32, u32>,
    world_matrix: Matrix4<f32>,
    group_id: Option<String>,
    capacity: usize,
    /// Element ID -> (instance, block)
    item_index: FxHashMap<String, (usize, usize)>,
}

impl Fragment {
    /// Create an empty fragment over the given geometry
    pub fn new(id: impl Into<String>, geometry: FragmentGeometry) -> Self {
        Self {
            id: id.into(),
            geometry,
            instances: Vec::new(),
            composites: FxHashMap::default(),
            world_matrix: Matrix4::identity(),
            group_id: None,
            capacity: 0,
            item_index: FxHashMap::default(),
        }
    }

    /// Add an instance drawing one element
    pub fn with_instance(mut self, item_id: impl Into<String>, transform: Matrix4<f32>) -> Self {
        self.push_instance(vec![item_id.into()], transform);
        self
    }

    /// Add the single instance of a block fragment; `item_ids[b]` owns block `b`
    pub fn with_block_items(mut self, item_ids: Vec<String>, transform: Matrix4<f32>) -> Self {
        self.push_instance(item_ids, transform);
        self
    }

    /// Record that `item_id` decomposes into `count` composite sub-items
    pub fn with_composites(mut self, item_id: u32, count: u32) -> Self {
        self.composites.insert(item_id, count);
        self
    }

    /// Set the world matrix of the fragment mesh
    pub fn with_world_matrix(mut self, matrix: Matrix4<f32>) -> Self {
        self.world_matrix = matrix;
        self
    }

    /// Mark the fragment as part of a model's fragment group
    pub fn in_group(mut self, model_uuid: impl Into<String>) -> Self {
        self.group_id = Some(model_uuid.into());
        self
    }

    /// Reserve instance capacity beyond the current instance count
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    fn push_instance(&mut self, item_ids: Vec<String>, transform: Matrix4<f32>) {
        let instance = self.instances.len();
        for (block, item) in item_ids.iter().enumerate() {
            self.item_index.insert(item.clone(), (instance, block));
        }
        self.instances.push(FragmentInstance {
            item_ids,
            transform,
            hidden: false,
        });
    }

    /// Hide or show every instance drawing `item_id`
    pub fn set_hidden(&mut self, item_id: &str, hidden: bool) {
        if let Some(&(instance, _)) = self.item_index.get(item_id) {
            if let Some(inst) = self.instances.get_mut(instance) {
                inst.hidden = hidden;
            }
        }
    }

    /// Check buffer consistency
    pub fn validate(&self) -> Result<()> {
        let vertex_count = self.geometry.vertex_count() as u32;
        if self.geometry.indices.iter().any(|&i| i >= vertex_count) {
            return Err(FragmentError::invalid_geometry(format!(
                "fragment {} has indices beyond {} vertices",
                self.id, vertex_count
            )));
        }
        if !self.geometry.block_ids.is_empty()
            && self.geometry.block_ids.len() != vertex_count as usize
        {
            return Err(FragmentError::invalid_geometry(format!(
                "fragment {} has {} block IDs for {} vertices",
                self.id,
                self.geometry.block_ids.len(),
                vertex_count
            )));
        }
        Ok(())
    }

    /// Fragment ID
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Geometry buffers
    pub fn geometry(&self) -> &FragmentGeometry {
        &self.geometry
    }

    /// World matrix of the fragment mesh
    pub fn world_matrix(&self) -> &Matrix4<f32> {
        &self.world_matrix
    }

    /// Model UUID of the fragment group this fragment belongs to
    pub fn group_id(&self) -> Option<&str> {
        self.group_id.as_deref()
    }

    /// Composite sub-item count of an element
    pub fn composites(&self, item_id: u32) -> Option<u32> {
        self.composites.get(&item_id).copied()
    }

    /// Number of vertex blocks
    pub fn block_count(&self) -> usize {
        self.geometry
            .block_ids
            .iter()
            .max()
            .map(|&max| max as usize + 1)
            .unwrap_or(1)
    }

    /// Whether several elements share one instance through vertex blocks
    pub fn is_block_fragment(&self) -> bool {
        self.block_count() > 1
    }

    /// Maximum number of instances the mesh can draw
    pub fn capacity(&self) -> usize {
        self.capacity.max(self.instances.len())
    }

    /// Number of instances
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Every element ID drawn by this fragment
    pub fn ids(&self) -> Vec<String> {
        self.instances
            .iter()
            .flat_map(|inst| inst.item_ids.iter().cloned())
            .collect()
    }

    /// Element IDs of visible instances
    pub fn items(&self) -> Vec<String> {
        self.instances
            .iter()
            .filter(|inst| !inst.hidden)
            .flat_map(|inst| inst.item_ids.iter().cloned())
            .collect()
    }

    /// Element IDs of hidden instances
    pub fn hidden_items(&self) -> Vec<String> {
        self.instances
            .iter()
            .filter(|inst| inst.hidden)
            .flat_map(|inst| inst.item_ids.iter().cloned())
            .collect()
    }

    /// Element drawn by an instance/block pair
    pub fn item_id(&self, instance: usize, block: usize) -> Option<&str> {
        let inst = self.instances.get(instance)?;
        let slot = if self.is_block_fragment() { block } else { 0 };
        inst.item_ids.get(slot).map(String::as_str)
    }

    /// Instance and block drawing an element
    pub fn instance_and_block(&self, item_id: &str) -> Option<(usize, usize)> {
        self.item_index.get(item_id).copied()
    }

    /// Block a vertex belongs to
    pub fn vertex_block(&self, vertex: usize) -> Option<usize> {
        if self.geometry.block_ids.is_empty() {
            return (vertex < self.geometry.vertex_count()).then_some(0);
        }
        self.geometry.block_ids.get(vertex).map(|&b| b as usize)
    }

    /// Transform of an instance
    pub fn instance_transform(&self, instance: usize) -> Option<Matrix4<f32>> {
        self.instances.get(instance).map(|inst| inst.transform)
    }
}
