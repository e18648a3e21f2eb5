// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Viewer collaborator traits
//!
//! The components never own fragments, meshes or the camera. They hold
//! fragment IDs and resolve them through these interfaces on every call.

use crate::{BoundingSphere, Fragment, ModelData};

/// Resolves fragment identifiers to live fragments
///
/// # Example
///
/// ```ignore
/// use ifc_lite_fragments::FragmentManager;
///
/// fn count_items(fragments: &dyn FragmentManager) -> usize {
///     fragments
///         .fragment_ids()
///         .iter()
///         .filter_map(|id| fragments.fragment(id))
///         .map(|f| f.items().len())
///         .sum()
/// }
/// ```
pub trait FragmentManager {
    /// IDs of every loaded fragment
    fn fragment_ids(&self) -> Vec<String>;

    /// Fragment by ID
    ///
    /// # Returns
    /// `None` if the fragment has been unloaded
    fn fragment(&self, id: &str) -> Option<&Fragment>;

    /// Model data of a fragment group, by model UUID
    fn group(&self, model_uuid: &str) -> Option<&ModelData>;

    /// Check if a fragment is loaded
    fn contains(&self, id: &str) -> bool {
        self.fragment(id).is_some()
    }
}

/// Nearest geometry under the pointer
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RayHit {
    /// Fragment whose mesh was struck
    pub fragment_id: String,
    /// First vertex index of the struck face
    pub face_vertex: Option<u32>,
    /// Struck instance
    pub instance_id: Option<u32>,
}

/// Casts the pointer ray against fragment meshes
pub trait Raycaster {
    /// Nearest hit among the given fragment meshes
    fn cast_ray(&self, fragment_ids: &[String]) -> Option<RayHit>;
}

/// Camera controls able to frame a region
pub trait CameraControls {
    /// Frame the sphere, optionally animating the transition
    fn fit_to_sphere(&mut self, sphere: &BoundingSphere, animate: bool);
}

/// Render scene and post-processing effect registry
///
/// Receives lifecycle notifications for the overlay objects owned by the
/// highlighter. The scene reads overlay contents back from the highlighter
/// when it draws.
pub trait RenderScene {
    /// Put a channel's fill overlay for a fragment into the scene
    fn attach_fill(&mut self, channel: &str, fragment_id: &str);

    /// Take a channel's fill overlay for a fragment out of the scene
    fn detach_fill(&mut self, channel: &str, fragment_id: &str);

    /// Release GPU resources of a fill overlay
    fn dispose_fill(&mut self, channel: &str, fragment_id: &str);

    /// Add the invisible outline proxy of a fragment to the scene
    fn add_outline_proxy(&mut self, fragment_id: &str);

    /// Put an outline proxy into the outlined-meshes effect bucket
    fn register_outlined(&mut self, fragment_id: &str);

    /// Release GPU resources of an outline proxy
    fn dispose_outline_proxy(&mut self, fragment_id: &str);

    /// Turn the shared outline effect on or off
    fn set_outline_effect(&mut self, enabled: bool);
}

/// Collaborators needed by one highlighter call
pub struct ViewerContext<'a> {
    pub fragments: &'a dyn FragmentManager,
    pub raycaster: &'a dyn Raycaster,
    pub scene: &'a mut dyn RenderScene,
    pub camera: &'a mut dyn CameraControls,
}

impl<'a> ViewerContext<'a> {
    /// Bundle collaborators for a call
    pub fn new(
        fragments: &'a dyn FragmentManager,
        raycaster: &'a dyn Raycaster,
        scene: &'a mut dyn RenderScene,
        camera: &'a mut dyn CameraControls,
    ) -> Self {
        Self {
            fragments,
            raycaster,
            scene,
            camera,
        }
    }
}
