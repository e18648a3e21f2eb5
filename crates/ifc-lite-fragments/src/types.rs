// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core identifier types shared by the viewer components
//!
//! Element identifiers travel as strings because composite sub-items carry a
//! dotted suffix (`"125.2"`). Fragment identifiers are opaque strings.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

/// Mapping from fragment ID to the element IDs it holds in a group or selection
pub type FragmentIdMap = FxHashMap<String, FxHashSet<String>>;

/// Separator between a base element ID and a composite sub-item index
pub const COMPOSITE_SEPARATOR: char = '.';

/// Build the composite identifier of sub-item `index` of element `base`
pub fn to_composite_id(base: u32, index: u32) -> String {
    format!("{base}{COMPOSITE_SEPARATOR}{index}")
}

/// Strip any composite suffix from an element ID
///
/// `"125.2"` becomes `"125"`; plain IDs are returned unchanged.
pub fn base_item_id(id: &str) -> &str {
    match id.find(COMPOSITE_SEPARATOR) {
        Some(pos) => &id[..pos],
        None => id,
    }
}

/// Parse the numeric base of an element ID, ignoring any composite suffix
pub fn parse_item_id(id: &str) -> Option<u32> {
    base_item_id(id).trim().parse().ok()
}

/// Set-style helpers over [`FragmentIdMap`]
pub trait FragmentIdMapExt {
    /// Add one element to a fragment's set, creating the set if needed
    fn insert_item(&mut self, fragment_id: &str, item_id: impl Into<String>);

    /// Elements present in both maps; fragments left empty are dropped
    fn intersect(&self, other: &FragmentIdMap) -> FragmentIdMap;

    /// Total number of (fragment, element) pairs
    fn item_count(&self) -> usize;
}

impl FragmentIdMapExt for FragmentIdMap {
    fn insert_item(&mut self, fragment_id: &str, item_id: impl Into<String>) {
        self.entry(fragment_id.to_string())
            .or_default()
            .insert(item_id.into());
    }

    fn intersect(&self, other: &FragmentIdMap) -> FragmentIdMap {
        let mut result = FragmentIdMap::default();
        for (fragment_id, ids) in self {
            let Some(other_ids) = other.get(fragment_id) else {
                continue;
            };
            let common: FxHashSet<String> = ids.intersection(other_ids).cloned().collect();
            if !common.is_empty() {
                result.insert(fragment_id.clone(), common);
            }
        }
        result
    }

    fn item_count(&self) -> usize {
        self.values().map(|ids| ids.len()).sum()
    }
}

/// Attribute value of an entity in a model's property bag
///
/// A reduced form of the STEP attribute model: enough to read names,
/// predefined types and relationship references.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    /// Null/undefined value ($)
    Null,
    /// Reference to another entity by express ID
    Ref(u32),
    /// Text value (labels, identifiers, descriptions)
    Text(String),
    /// Enumeration value (.VALUE.)
    Enum(String),
    /// Integer value
    Integer(i64),
    /// Floating point value
    Float(f64),
    /// Boolean value
    Bool(bool),
    /// List of values
    List(Vec<AttributeValue>),
}

impl AttributeValue {
    /// Try to get as entity reference
    pub fn as_ref_id(&self) -> Option<u32> {
        match self {
            AttributeValue::Ref(id) => Some(*id),
            _ => None,
        }
    }

    /// Try to get as text; enumerations count as text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(s) | AttributeValue::Enum(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as list
    pub fn as_list(&self) -> Option<&[AttributeValue]> {
        match self {
            AttributeValue::List(list) => Some(list),
            _ => None,
        }
    }

    /// Collect entity references, accepting a single reference or a list
    pub fn refs(&self) -> Vec<u32> {
        match self {
            AttributeValue::Ref(id) => vec![*id],
            AttributeValue::List(items) => items.iter().filter_map(|v| v.as_ref_id()).collect(),
            _ => Vec::new(),
        }
    }

    /// Check if this is a null value
    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }
}
