// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fragment classification index
//!
//! Groups the elements of loaded models into named classification systems
//! (`entities`, `storeys`, `model`, `predefinedTypes`, relation systems...)
//! and answers multi-criteria queries against them:
//!
//! ```text
//! system name -> class name -> fragment ID -> element IDs
//! ```
//!
//! A query lists accepted classes per system. An element matches when it is
//! in at least one accepted class of *every* known system in the query.

use crate::{ComponentError, Result};
use ifc_lite_fragments::{
    to_composite_id, CategoryMap, FragmentIdMap, FragmentIdMapExt, FragmentManager, ModelData,
    PropertyMap, RelationKind,
};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Well-known classification system names
pub mod systems {
    /// Elements grouped by IFC category name
    pub const ENTITIES: &str = "entities";
    /// Elements grouped by containing storey name
    pub const STOREYS: &str = "storeys";
    /// Elements grouped by model
    pub const MODEL: &str = "model";
    /// Elements grouped by upper-cased predefined type
    pub const PREDEFINED_TYPES: &str = "predefinedTypes";
}

/// Class used for relations whose relating entity has no name
pub const NO_RELATION_NAME: &str = "NO REL NAME";

/// Classes of one system: class name -> fragment ID -> element IDs
pub type ClassificationSystem = FxHashMap<String, FragmentIdMap>;

/// Every system: system name -> class name -> fragment ID -> element IDs
pub type Classification = FxHashMap<String, ClassificationSystem>;

/// Query: system name -> accepted class names
pub type ClassificationFilter = FxHashMap<String, Vec<String>>;

/// Leaf of the classification tree
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeLeaf {
    /// Category name of the element
    pub entity: String,
    /// First fragment holding the element's geometry
    pub fragment_id: String,
}

/// Elements by storey: storey name -> element ID -> leaf
pub type StoreyBranch = BTreeMap<String, BTreeMap<u32, TreeLeaf>>;

/// Tree branch of one model
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelBranch {
    /// Display name of the model
    pub name: String,
    pub storeys: StoreyBranch,
}

/// Spatial tree: model UUID -> storey name -> element ID -> leaf
pub type ClassificationTree = BTreeMap<String, ModelBranch>;

/// Classification index over the elements of loaded models
///
/// # Example
///
/// ```ignore
/// use ifc_lite_components::{FragmentClassifier, systems};
///
/// let mut classifier = FragmentClassifier::new();
/// classifier.classify_by_entity(&model);
/// classifier.classify_by_storey(&model)?;
///
/// let filter = [
///     (systems::ENTITIES.to_string(), vec!["IFCWALL".to_string()]),
///     (systems::STOREYS.to_string(), vec!["Level 1".to_string()]),
/// ]
/// .into_iter()
/// .collect();
/// let walls_on_level_1 = classifier.find(Some(&filter), &registry);
/// ```
#[derive(Debug)]
pub struct FragmentClassifier {
    systems: Classification,
    tree: ClassificationTree,
    categories: CategoryMap,
    /// Model UUID -> fragments classified from that model
    model_fragments: FxHashMap<String, FxHashSet<String>>,
    /// Model UUID -> classes it filled in the `model` system
    model_classes: FxHashMap<String, FxHashSet<String>>,
}

impl Default for FragmentClassifier {
    fn default() -> Self {
        Self::with_categories(CategoryMap::ifc())
    }
}

impl FragmentClassifier {
    /// Create an empty classifier using the built-in IFC categories
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty classifier with a custom category lookup table
    pub fn with_categories(categories: CategoryMap) -> Self {
        Self {
            systems: Classification::default(),
            tree: ClassificationTree::new(),
            categories,
            model_fragments: FxHashMap::default(),
            model_classes: FxHashMap::default(),
        }
    }

    /// Category lookup table used for entity classes
    pub fn categories(&self) -> &CategoryMap {
        &self.categories
    }

    /// The whole classification
    pub fn get(&self) -> &Classification {
        &self.systems
    }

    /// The spatial tree built by [`build_classification_tree`](Self::build_classification_tree)
    pub fn tree(&self) -> &ClassificationTree {
        &self.tree
    }

    /// Reset to empty
    pub fn dispose(&mut self) {
        self.systems.clear();
        self.tree.clear();
        self.model_fragments.clear();
        self.model_classes.clear();
    }

    /// Drop every entry of a fragment from every class and tree leaf
    ///
    /// Classes and storeys left empty are pruned.
    pub fn remove(&mut self, fragment_id: &str) {
        for system in self.systems.values_mut() {
            for class in system.values_mut() {
                class.remove(fragment_id);
            }
            system.retain(|_, class| !class.is_empty());
        }
        for fragments in self.model_fragments.values_mut() {
            fragments.remove(fragment_id);
        }
        for branch in self.tree.values_mut() {
            for elements in branch.storeys.values_mut() {
                elements.retain(|_, leaf| leaf.fragment_id != fragment_id);
            }
            branch.storeys.retain(|_, elements| !elements.is_empty());
        }
    }

    /// Drop everything classified from one model, including its tree branch
    ///
    /// `model_uuid` is the model's [`uuid`](ModelData::uuid). Classes that
    /// [`classify_by_model`](Self::classify_by_model) created for it go too,
    /// whatever ID they were filed under.
    pub fn remove_model(&mut self, model_uuid: &str) {
        let fragments = self.model_fragments.remove(model_uuid).unwrap_or_default();
        for system in self.systems.values_mut() {
            for class in system.values_mut() {
                for fragment_id in &fragments {
                    class.remove(fragment_id);
                }
            }
            system.retain(|_, class| !class.is_empty());
        }
        let mut classes = self.model_classes.remove(model_uuid).unwrap_or_default();
        classes.insert(model_uuid.to_string());
        if let Some(model_system) = self.systems.get_mut(systems::MODEL) {
            for class in &classes {
                // Still filled by another model
                if self.model_classes.values().any(|other| other.contains(class)) {
                    continue;
                }
                model_system.remove(class);
            }
        }
        self.tree.remove(model_uuid);
        log::debug!(
            "Removed model {} ({} fragments) from classification",
            model_uuid,
            fragments.len()
        );
    }

    /// Select elements matching a filter
    ///
    /// With no filter, every item of every loaded fragment is returned,
    /// hidden ones included. Filter systems that were never classified are
    /// ignored with a warning; if no known system remains the result is
    /// empty. Matching elements that decompose into composites bring their
    /// sub-items (`"id.1"`, `"id.2"`, ...) along.
    pub fn find(
        &self,
        filter: Option<&ClassificationFilter>,
        fragments: &dyn FragmentManager,
    ) -> FragmentIdMap {
        let Some(filter) = filter else {
            return all_items(fragments);
        };

        let mut hits: FxHashMap<&str, FxHashMap<&str, usize>> = FxHashMap::default();
        let mut size = 0;

        for (system_name, classes) in filter {
            let Some(system) = self.systems.get(system_name) else {
                log::warn!("Unknown classification system '{}' ignored", system_name);
                continue;
            };
            size += 1;

            // An element listed under several accepted classes counts once
            let mut matched: FxHashSet<(&str, &str)> = FxHashSet::default();
            for class_name in classes {
                let Some(class) = system.get(class_name) else {
                    continue;
                };
                for (fragment_id, ids) in class {
                    for id in ids {
                        matched.insert((fragment_id.as_str(), id.as_str()));
                    }
                }
            }
            for (fragment_id, id) in matched {
                *hits.entry(fragment_id).or_default().entry(id).or_insert(0) += 1;
            }
        }

        let mut result = FragmentIdMap::default();
        if size == 0 {
            return result;
        }
        for (fragment_id, ids) in hits {
            for (id, count) in ids {
                if count != size {
                    continue;
                }
                result.insert_item(fragment_id, id);
                add_composites(&mut result, fragments, fragment_id, id);
            }
        }
        result
    }

    /// Classify a model's elements under `model` / `model_id`
    pub fn classify_by_model(&mut self, model_id: &str, model: &ModelData) {
        self.ensure_system(systems::MODEL);
        self.model_classes
            .entry(model.uuid.clone())
            .or_default()
            .insert(model_id.to_string());
        for &express_id in model.data.keys() {
            self.save_item(model, systems::MODEL, model_id, express_id);
        }
    }

    /// Classify a model's elements by IFC category name
    ///
    /// Type codes missing from the lookup table land in
    /// [`UNKNOWN_CATEGORY`](ifc_lite_fragments::UNKNOWN_CATEGORY).
    pub fn classify_by_entity(&mut self, model: &ModelData) {
        self.ensure_system(systems::ENTITIES);
        for (&express_id, element) in &model.data {
            let class = self
                .categories
                .name_or_unknown(element.relations.entity_type)
                .to_string();
            self.save_item(model, systems::ENTITIES, &class, express_id);
        }
    }

    /// Classify a model's elements by the name of their containing storey
    ///
    /// Elements without a storey, or whose storey has no properties or
    /// name, are skipped.
    pub fn classify_by_storey(&mut self, model: &ModelData) -> Result<()> {
        require_properties(model)?;
        self.ensure_system(systems::STOREYS);

        let mut skipped = 0;
        for (&express_id, element) in &model.data {
            let Some(name) = storey_name(model, element.relations.containing_storey) else {
                skipped += 1;
                continue;
            };
            let name = name.to_string();
            self.save_item(model, systems::STOREYS, &name, express_id);
        }
        if skipped > 0 {
            log::debug!(
                "{} elements of {} have no named storey",
                skipped,
                model.uuid
            );
        }
        Ok(())
    }

    /// Classify a model's elements by their upper-cased predefined type
    ///
    /// Elements with no property entry or no predefined type are skipped.
    pub fn classify_by_predefined_type(&mut self, model: &ModelData) -> Result<()> {
        require_properties(model)?;
        self.ensure_system(systems::PREDEFINED_TYPES);

        for &express_id in model.data.keys() {
            let Some(predefined) = model
                .property(express_id)
                .and_then(|entity| entity.predefined_type())
            else {
                continue;
            };
            let class = predefined.to_uppercase();
            self.save_item(model, systems::PREDEFINED_TYPES, &class, express_id);
        }
        Ok(())
    }

    /// Classify the related side of every relation entity of one type
    ///
    /// Each relation's related elements land in a class named after its
    /// relating entity ([`NO_RELATION_NAME`] when that has no name), under
    /// `system_name`. Type codes that are not relations leave the index
    /// unchanged.
    pub fn classify_by_relation(
        &mut self,
        model: &ModelData,
        relation: u32,
        system_name: &str,
    ) -> Result<()> {
        let properties = require_properties(model)?;
        let Some(kind) = RelationKind::from_code(relation) else {
            log::debug!("Type code {} is not a relation", relation);
            return Ok(());
        };
        self.ensure_system(system_name);

        for entity in properties.values() {
            if entity.type_code != relation {
                continue;
            }
            let class = entity
                .get_ref(&kind.relating)
                .and_then(|id| model.property(id))
                .and_then(|relating| relating.name())
                .unwrap_or(NO_RELATION_NAME)
                .to_string();
            for related in entity.get_refs(&kind.related) {
                self.save_item(model, system_name, &class, related);
            }
        }
        Ok(())
    }

    /// Build the model -> storey -> element tree
    ///
    /// The model's branch is keyed by its UUID and replaces any earlier
    /// branch of the same model. Elements without a resolvable storey are left out. An element held
    /// by several fragments keeps the first one.
    pub fn build_classification_tree(&mut self, model: &ModelData) -> Result<()> {
        require_properties(model)?;

        let mut branch = StoreyBranch::new();
        for (&express_id, element) in &model.data {
            let Some(storey) = storey_name(model, element.relations.containing_storey) else {
                continue;
            };
            let Some(fragment_id) = model.element_fragments(express_id).first().copied() else {
                continue;
            };
            let entity = self
                .categories
                .name_or_unknown(element.relations.entity_type)
                .to_string();
            branch
                .entry(storey.to_string())
                .or_default()
                .entry(express_id)
                .or_insert_with(|| TreeLeaf {
                    entity,
                    fragment_id: fragment_id.to_string(),
                });
        }

        self.tree.insert(
            model.uuid.clone(),
            ModelBranch {
                name: model.name.clone(),
                storeys: branch,
            },
        );
        Ok(())
    }

    /// Selection for a node of the tree
    ///
    /// `storey` and `element` narrow the selection; `None` takes the whole
    /// level. Returns `None` if the node does not exist.
    pub fn tree_selection(
        &self,
        model_uuid: &str,
        storey: Option<&str>,
        element: Option<u32>,
    ) -> Option<FragmentIdMap> {
        let branch = &self.tree.get(model_uuid)?.storeys;
        let mut result = FragmentIdMap::default();

        let storeys: Vec<&BTreeMap<u32, TreeLeaf>> = match storey {
            Some(name) => vec![branch.get(name)?],
            None => branch.values().collect(),
        };
        for elements in storeys {
            match element {
                Some(id) => {
                    if let Some(leaf) = elements.get(&id) {
                        result.insert_item(&leaf.fragment_id, id.to_string());
                    }
                }
                None => {
                    for (id, leaf) in elements {
                        result.insert_item(&leaf.fragment_id, id.to_string());
                    }
                }
            }
        }
        if element.is_some() && result.is_empty() {
            return None;
        }
        Some(result)
    }

    fn ensure_system(&mut self, system_name: &str) {
        self.systems.entry(system_name.to_string()).or_default();
    }

    /// Add an element's fragments to a class
    fn save_item(&mut self, model: &ModelData, system_name: &str, class: &str, express_id: u32) {
        let fragment_ids = model.element_fragments(express_id);
        if fragment_ids.is_empty() {
            return;
        }
        let class_map = self
            .systems
            .entry(system_name.to_string())
            .or_default()
            .entry(class.to_string())
            .or_default();
        let seen = self.model_fragments.entry(model.uuid.clone()).or_default();
        for fragment_id in fragment_ids {
            class_map.insert_item(fragment_id, express_id.to_string());
            seen.insert(fragment_id.to_string());
        }
    }
}

fn require_properties(model: &ModelData) -> Result<&PropertyMap> {
    model.properties.as_ref().ok_or_else(|| {
        ComponentError::invalid_state(format!("properties of model {} are not loaded", model.uuid))
    })
}

fn storey_name(model: &ModelData, storey: Option<u32>) -> Option<&str> {
    storey
        .and_then(|id| model.property(id))
        .and_then(|entity| entity.name())
}

fn all_items(fragments: &dyn FragmentManager) -> FragmentIdMap {
    let mut result = FragmentIdMap::default();
    for fragment_id in fragments.fragment_ids() {
        let Some(fragment) = fragments.fragment(&fragment_id) else {
            continue;
        };
        let ids = result.entry(fragment_id).or_default();
        ids.extend(fragment.items());
        ids.extend(fragment.hidden_items());
    }
    result
}

/// Add the composite sub-items of a plain element ID
fn add_composites(
    result: &mut FragmentIdMap,
    fragments: &dyn FragmentManager,
    fragment_id: &str,
    id: &str,
) {
    let Ok(base) = id.parse::<u32>() else {
        return;
    };
    let Some(count) = fragments
        .fragment(fragment_id)
        .and_then(|fragment| fragment.composites(base))
    else {
        return;
    };
    for index in 1..count {
        result.insert_item(fragment_id, to_composite_id(base, index));
    }
}
