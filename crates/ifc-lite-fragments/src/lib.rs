// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC-Lite Fragments - Shared data model and collaborator traits
//!
//! This crate describes an already-loaded IFC model the way the viewer
//! components see it: elements grouped into renderable *fragments*, element
//! relations and property bags, and the external viewer subsystems
//! (fragment manager, raycaster, camera, render scene) as trait seams.
//!
//! # Architecture
//!
//! - [`ModelData`] - Per-model element data (fragment keys, relations, properties)
//! - [`Fragment`] - Geometry batch with instances, blocks and composites
//! - [`FragmentIdMap`] - `fragment ID -> element IDs`, the currency of selections
//! - [`CategoryMap`] - IFC type code to category name lookup
//! - [`FragmentManager`] - Resolves fragment IDs to live fragments
//! - [`Raycaster`], [`CameraControls`], [`RenderScene`] - Viewer collaborators
//!
//! # Example
//!
//! ```ignore
//! use ifc_lite_fragments::{FragmentManager, FragmentRegistry};
//!
//! let mut registry = FragmentRegistry::new();
//! registry.add_group(model);
//! registry.add_fragment(fragment);
//!
//! for id in registry.fragment_ids() {
//!     let fragment = registry.fragment(&id).unwrap();
//!     println!("{}: {} items", id, fragment.items().len());
//! }
//! ```

pub mod bounds;
pub mod categories;
pub mod error;
pub mod fragment;
pub mod model;
pub mod registry;
pub mod traits;
pub mod types;

// Re-export all public types
pub use bounds::*;
pub use categories::*;
pub use error::*;
pub use fragment::*;
pub use model::*;
pub use registry::*;
pub use traits::*;
pub use types::*;
