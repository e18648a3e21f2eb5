// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-model element data produced by the IFC loader
//!
//! A [`ModelData`] is the loaded form of one IFC file: for every element,
//! the fragment keys holding its geometry and its containing storey / type
//! code, plus an optional property bag keyed by express ID.

use crate::{AttributeValue, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Property bag keyed by express ID
pub type PropertyMap = FxHashMap<u32, PropertyEntity>;

/// Containing storey and IFC type code of an element
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementRelations {
    /// Express ID of the containing storey, if the loader resolved one
    pub containing_storey: Option<u32>,
    /// Numeric IFC type code of the element
    pub entity_type: u32,
}

impl ElementRelations {
    /// Create relations for an element
    pub fn new(containing_storey: Option<u32>, entity_type: u32) -> Self {
        Self {
            containing_storey,
            entity_type,
        }
    }
}

/// Loader data for one element
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ElementData {
    /// Fragment keys (see [`ModelData::key_fragments`]) holding the element's geometry
    pub keys: Vec<u32>,
    /// Storey and type relations
    pub relations: ElementRelations,
}

impl ElementData {
    /// Create element data
    pub fn new(keys: Vec<u32>, relations: ElementRelations) -> Self {
        Self { keys, relations }
    }
}

/// An entity in the property bag
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropertyEntity {
    /// Express ID
    pub express_id: u32,
    /// Numeric IFC type code
    pub type_code: u32,
    /// Named attributes (`Name`, `PredefinedType`, `RelatedObjects`, ...)
    #[serde(default)]
    pub attributes: FxHashMap<String, AttributeValue>,
}

impl PropertyEntity {
    /// Create an entity with no attributes
    pub fn new(express_id: u32, type_code: u32) -> Self {
        Self {
            express_id,
            type_code,
            attributes: FxHashMap::default(),
        }
    }

    /// Builder-style attribute setter
    pub fn with(mut self, name: impl Into<String>, value: AttributeValue) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    /// Get attribute by name
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    /// `Name` attribute value
    pub fn name(&self) -> Option<&str> {
        self.get("Name").and_then(|v| v.as_text())
    }

    /// `PredefinedType` attribute value
    pub fn predefined_type(&self) -> Option<&str> {
        self.get("PredefinedType").and_then(|v| v.as_text())
    }

    /// Single entity reference at a named attribute
    pub fn get_ref(&self, name: &str) -> Option<u32> {
        self.get(name).and_then(|v| v.as_ref_id())
    }

    /// Entity references at a named attribute (single reference or list)
    pub fn get_refs(&self, name: &str) -> Vec<u32> {
        self.get(name).map(|v| v.refs()).unwrap_or_default()
    }
}

/// Loaded model: element data, fragment keys and optional properties
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelData {
    /// Stable model identifier
    pub uuid: String,
    /// Display name
    pub name: String,
    /// Element data keyed by express ID
    pub data: BTreeMap<u32, ElementData>,
    /// Fragment key to fragment ID
    pub key_fragments: FxHashMap<u32, String>,
    /// Property bag; `None` when the loader did not resolve properties
    #[serde(default)]
    pub properties: Option<PropertyMap>,
}

impl ModelData {
    /// Create an empty model
    pub fn new(uuid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Decode model data from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Encode model data as JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Whether properties are available
    pub fn has_properties(&self) -> bool {
        self.properties.is_some()
    }

    /// Property entity by express ID
    pub fn property(&self, express_id: u32) -> Option<&PropertyEntity> {
        self.properties.as_ref()?.get(&express_id)
    }

    /// Fragment IDs holding geometry for an element
    ///
    /// Keys without a fragment are skipped.
    pub fn element_fragments(&self, express_id: u32) -> Vec<&str> {
        let Some(element) = self.data.get(&express_id) else {
            return Vec::new();
        };
        element
            .keys
            .iter()
            .filter_map(|key| self.key_fragments.get(key).map(String::as_str))
            .collect()
    }

    /// Every fragment ID referenced by this model
    pub fn fragment_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.key_fragments.values().map(String::as_str).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Add an element (builder helper for loaders and tests)
    pub fn add_element(&mut self, express_id: u32, keys: Vec<u32>, relations: ElementRelations) {
        self.data.insert(express_id, ElementData::new(keys, relations));
    }

    /// Map a fragment key to a fragment ID
    pub fn add_key_fragment(&mut self, key: u32, fragment_id: impl Into<String>) {
        self.key_fragments.insert(key, fragment_id.into());
    }

    /// Add a property entity, creating the property bag if needed
    pub fn add_property(&mut self, entity: PropertyEntity) {
        self.properties
            .get_or_insert_with(PropertyMap::default)
            .insert(entity.express_id, entity);
    }
}
