// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory fragment manager

use crate::{Fragment, FragmentError, FragmentManager, ModelData, Result};
use rustc_hash::FxHashMap;

/// Fragment manager backed by owned fragments and model groups
#[derive(Default)]
pub struct FragmentRegistry {
    fragments: FxHashMap<String, Fragment>,
    groups: FxHashMap<String, ModelData>,
}

impl FragmentRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fragment after checking its buffers
    pub fn add_fragment(&mut self, fragment: Fragment) -> Result<()> {
        fragment.validate()?;
        self.fragments.insert(fragment.id().to_string(), fragment);
        Ok(())
    }

    /// Unload a fragment
    pub fn remove_fragment(&mut self, id: &str) -> Result<Fragment> {
        self.fragments
            .remove(id)
            .ok_or_else(|| FragmentError::fragment_not_found(id))
    }

    /// Mutable access to a fragment (visibility changes)
    pub fn fragment_mut(&mut self, id: &str) -> Option<&mut Fragment> {
        self.fragments.get_mut(id)
    }

    /// Register a model's fragment group
    pub fn add_group(&mut self, model: ModelData) {
        self.groups.insert(model.uuid.clone(), model);
    }

    /// Unload a model group and every fragment it references
    pub fn remove_group(&mut self, model_uuid: &str) -> Option<ModelData> {
        let model = self.groups.remove(model_uuid)?;
        for fragment_id in model.fragment_ids() {
            self.fragments.remove(fragment_id);
        }
        Some(model)
    }

    /// Number of loaded fragments
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Check if no fragment is loaded
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

impl FragmentManager for FragmentRegistry {
    fn fragment_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.fragments.keys().cloned().collect();
        ids.sort_unstable();
        ids
    }

    fn fragment(&self, id: &str) -> Option<&Fragment> {
        self.fragments.get(id)
    }

    fn group(&self, model_uuid: &str) -> Option<&ModelData> {
        self.groups.get(model_uuid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ElementRelations, FragmentGeometry};
    use nalgebra::Matrix4;

    fn fragment(id: &str) -> Fragment {
        Fragment::new(id, FragmentGeometry::new(vec![0.0; 9], vec![0, 1, 2]))
            .with_instance("1", Matrix4::identity())
    }

    #[test]
    fn test_add_and_resolve() {
        let mut registry = FragmentRegistry::new();
        registry.add_fragment(fragment("b")).unwrap();
        registry.add_fragment(fragment("a")).unwrap();

        assert_eq!(registry.fragment_ids(), vec!["a".to_string(), "b".to_string()]);
        assert!(registry.contains("a"));
        assert!(registry.remove_fragment("zzz").is_err());
    }

    #[test]
    fn test_remove_group_unloads_fragments() {
        let mut registry = FragmentRegistry::new();
        registry.add_fragment(fragment("a")).unwrap();
        registry.add_fragment(fragment("b")).unwrap();

        let mut model = ModelData::new("m", "Model");
        model.add_key_fragment(0, "a");
        model.add_element(1, vec![0], ElementRelations::new(None, 0));
        registry.add_group(model);

        assert!(registry.group("m").is_some());
        registry.remove_group("m");
        assert!(registry.group("m").is_none());
        assert_eq!(registry.fragment_ids(), vec!["b".to_string()]);
    }
}
