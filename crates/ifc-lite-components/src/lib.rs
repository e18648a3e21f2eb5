// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC-Lite Components - Classification and selection for fragment viewers
//!
//! Two components working over the fragment model of `ifc-lite-fragments`:
//!
//! - [`FragmentClassifier`] indexes loaded elements into classification
//!   systems (entity type, storey, model, predefined type, relations) and
//!   answers multi-criteria queries with a [`FragmentIdMap`]
//! - [`FragmentHighlighter`] keeps named highlight channels in sync with
//!   pointer interaction and programmatic selection, maintaining fill
//!   overlays and outline proxies for the render scene
//!
//! Viewer subsystems (fragment manager, raycaster, camera, scene) are passed
//! per call through a [`ViewerContext`](ifc_lite_fragments::ViewerContext).
//!
//! # Example
//!
//! ```ignore
//! use ifc_lite_components::{FragmentClassifier, FragmentHighlighter, PointerEvent};
//! use ifc_lite_fragments::ViewerContext;
//!
//! let mut classifier = FragmentClassifier::new();
//! classifier.classify_by_entity(&model);
//! classifier.classify_by_storey(&model)?;
//!
//! let mut highlighter = FragmentHighlighter::default();
//! highlighter.setup(&registry)?;
//!
//! let mut ctx = ViewerContext::new(&registry, &raycaster, &mut scene, &mut camera);
//! highlighter.handle_pointer(PointerEvent::DoubleClick, &mut ctx)?;
//! ```

mod classifier;
mod config;
mod error;
mod events;
mod highlighter;
mod pointer;

#[cfg(test)]
mod test_support;

pub use classifier::{
    systems, Classification, ClassificationFilter, ClassificationSystem, ClassificationTree,
    FragmentClassifier, ModelBranch, StoreyBranch, TreeLeaf, NO_RELATION_NAME,
};
pub use config::{HighlightMaterial, HighlighterConfig, MultipleSelectKey};
pub use error::{ComponentError, Result};
pub use events::{Event, HighlightEvents, SubscriptionId};
pub use highlighter::{
    framing_sphere, selection_bounds, FillOverlay, FragmentHighlighter, OutlineProxy,
    OverlayInstance, PickResult, FILL_RENDER_ORDER, OUTLINE_RENDER_ORDER,
};
pub use pointer::{Modifiers, PointerAction, PointerEvent, PointerState, PRIMARY_BUTTON};

pub use ifc_lite_fragments::FragmentIdMap;
