// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Selection and highlight engine
//!
//! Keeps named highlight channels (`select`, `hover`, `dblclick`, ...) and
//! the overlays that render them:
//!
//! - a [`FillOverlay`] per (channel, fragment), tinted with the channel's
//!   materials
//! - an [`OutlineProxy`] per fragment, shared by every channel that is not
//!   excluded from outlines
//!
//! Every selection change regenerates the overlays of the fragments it
//! touched, then fires the channel's `on_highlight` with the whole channel
//! selection.

mod fill;
mod outline;
mod zoom;

pub use fill::{FillOverlay, OverlayInstance, FILL_RENDER_ORDER};
pub use outline::{OutlineProxy, OUTLINE_RENDER_ORDER};
pub use zoom::{framing_sphere, selection_bounds};

use crate::config::{HighlightMaterial, HighlighterConfig};
use crate::events::HighlightEvents;
use crate::pointer::{PointerAction, PointerEvent, PointerState};
use crate::{ComponentError, Result};
use ifc_lite_fragments::{
    base_item_id, parse_item_id, to_composite_id, FragmentIdMap, FragmentIdMapExt,
    FragmentManager, RenderScene, ViewerContext,
};
use rustc_hash::{FxHashMap, FxHashSet};

/// Element picked by a ray-cast selection
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PickResult {
    /// Picked element ID, without composite suffix
    pub id: String,
    /// Fragments that received the element, struck fragment first
    pub fragments: Vec<String>,
}

/// Named highlight channels and their render overlays
pub struct FragmentHighlighter {
    config: HighlighterConfig,
    enabled: bool,
    materials: FxHashMap<String, Option<Vec<HighlightMaterial>>>,
    selection: FxHashMap<String, FragmentIdMap>,
    events: FxHashMap<String, HighlightEvents>,
    /// Channel -> fragment -> overlay
    fills: FxHashMap<String, FxHashMap<String, FillOverlay>>,
    outlines: FxHashMap<String, OutlineProxy>,
    excluded_outline: FxHashSet<String>,
    outline_material: HighlightMaterial,
    pointer: PointerState,
    events_active: bool,
}

impl Default for FragmentHighlighter {
    fn default() -> Self {
        Self::new(HighlighterConfig::default())
    }
}

impl FragmentHighlighter {
    /// Create a highlighter with no channels
    pub fn new(config: HighlighterConfig) -> Self {
        let outline_material = config.outline_material.clone();
        Self {
            config,
            enabled: true,
            materials: FxHashMap::default(),
            selection: FxHashMap::default(),
            events: FxHashMap::default(),
            fills: FxHashMap::default(),
            outlines: FxHashMap::default(),
            excluded_outline: FxHashSet::default(),
            outline_material,
            pointer: PointerState::default(),
            events_active: false,
        }
    }

    /// Register the default channels and start handling pointer events
    ///
    /// Hover is excluded from outlines; select gets the selection material,
    /// hover and double-click the hover material.
    pub fn setup(&mut self, fragments: &dyn FragmentManager) -> Result<()> {
        self.enabled = true;
        self.outline_material
            .set_hex(HighlighterConfig::SETUP_OUTLINE_COLOR);
        self.excluded_outline.insert(self.config.hover_name.clone());

        let select = self.config.select_name.clone();
        let hover = self.config.hover_name.clone();
        let dblclick = self.config.dblclick_name.clone();
        let selection_material = self.config.selection_material.clone();
        let hover_material = self.config.hover_material.clone();

        self.register_channel(&select, Some(vec![selection_material]), fragments)?;
        self.register_channel(&hover, Some(vec![hover_material.clone()]), fragments)?;
        self.register_channel(&dblclick, Some(vec![hover_material]), fragments)?;

        self.events_active = true;
        log::info!("Highlighter set up with {} channels", self.selection.len());
        Ok(())
    }

    /// Add a highlight channel
    ///
    /// `materials` of `None` draws overlays with the fragments' own
    /// materials. Existing fragments get their overlay for the new channel
    /// right away.
    pub fn register_channel(
        &mut self,
        name: &str,
        materials: Option<Vec<HighlightMaterial>>,
        fragments: &dyn FragmentManager,
    ) -> Result<()> {
        if self.selection.contains_key(name) {
            return Err(ComponentError::already_exists(name));
        }
        self.materials.insert(name.to_string(), materials);
        self.selection
            .insert(name.to_string(), FragmentIdMap::default());
        self.events
            .insert(name.to_string(), HighlightEvents::default());
        log::info!("Registered highlight channel '{}'", name);

        self.update(fragments);
        Ok(())
    }

    /// Give every loaded fragment an overlay per channel and re-sync outline
    /// proxy placement
    ///
    /// Call after loading a model. Does nothing while fills are disabled.
    pub fn update(&mut self, fragments: &dyn FragmentManager) {
        if !self.config.fill_enabled {
            return;
        }
        for fragment_id in fragments.fragment_ids() {
            let Some(fragment) = fragments.fragment(&fragment_id) else {
                continue;
            };
            for (channel, materials) in &self.materials {
                self.fills
                    .entry(channel.clone())
                    .or_default()
                    .entry(fragment_id.clone())
                    .or_insert_with(|| FillOverlay::new(fragment, materials.clone()));
            }
            if let Some(proxy) = self.outlines.get_mut(&fragment_id) {
                proxy.sync_world_matrix(fragment);
            }
        }
    }

    /// Select the element under the pointer into a channel
    ///
    /// No hit clears the channel. Otherwise the picked element, its
    /// composites and every sibling fragment of its fragment group join the
    /// selection. `zoom` of `None` uses the configured default. Returns
    /// `Ok(None)` when disabled, on a miss, or when the hit cannot be
    /// resolved to an element.
    pub fn select_at_pointer(
        &mut self,
        name: &str,
        exclusive: bool,
        zoom: Option<bool>,
        ctx: &mut ViewerContext<'_>,
    ) -> Result<Option<PickResult>> {
        if !self.enabled {
            return Ok(None);
        }
        self.check_channel(name)?;

        let fragments = ctx.fragments;
        let Some(hit) = ctx.raycaster.cast_ray(&fragments.fragment_ids()) else {
            self.clear(Some(name), ctx)?;
            return Ok(None);
        };
        let (Some(fragment), Some(face_vertex), Some(instance)) = (
            fragments.fragment(&hit.fragment_id),
            hit.face_vertex,
            hit.instance_id,
        ) else {
            return Ok(None);
        };
        let Some(item) = fragment
            .vertex_block(face_vertex as usize)
            .and_then(|block| fragment.item_id(instance as usize, block))
        else {
            log::debug!("Hit on {} resolves to no element", hit.fragment_id);
            return Ok(None);
        };
        let item_id = base_item_id(item).to_string();

        if exclusive {
            self.clear(Some(name), ctx)?;
        }

        let mut touched = vec![hit.fragment_id.clone()];
        let group = fragment.group_id().and_then(|uuid| fragments.group(uuid));
        if let (Some(group), Some(express_id)) = (group, parse_item_id(&item_id)) {
            for sibling in group.element_fragments(express_id) {
                if touched.iter().any(|id| id == sibling) {
                    continue;
                }
                if fragments.contains(sibling) {
                    touched.push(sibling.to_string());
                } else {
                    log::debug!("Group fragment {} is not loaded", sibling);
                }
            }
        }

        for fragment_id in &touched {
            self.add_item(name, fragment_id, &item_id, fragments);
            self.regenerate(name, fragment_id, ctx);
        }

        self.notify_highlight(name);
        if zoom.unwrap_or(self.config.zoom_to_selection) {
            self.zoom_selection(name, ctx);
        }

        Ok(Some(PickResult {
            id: item_id,
            fragments: touched,
        }))
    }

    /// Select explicit elements into a channel
    ///
    /// Fragments that are not loaded are skipped.
    pub fn select_by_ids(
        &mut self,
        name: &str,
        ids: &FragmentIdMap,
        exclusive: bool,
        zoom: Option<bool>,
        ctx: &mut ViewerContext<'_>,
    ) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        self.check_channel(name)?;
        if exclusive {
            self.clear(Some(name), ctx)?;
        }

        let fragments = ctx.fragments;
        let mut fragment_ids: Vec<&String> = ids.keys().collect();
        fragment_ids.sort_unstable();

        for fragment_id in fragment_ids {
            if !fragments.contains(fragment_id) {
                log::debug!("Fragment {} is not loaded; selection skipped", fragment_id);
                continue;
            }
            for item_id in &ids[fragment_id] {
                self.add_item(name, fragment_id, item_id, fragments);
            }
            self.regenerate(name, fragment_id, ctx);
        }

        self.notify_highlight(name);
        if zoom.unwrap_or(self.config.zoom_to_selection) {
            self.zoom_selection(name, ctx);
        }
        Ok(())
    }

    /// Clear one channel, or every channel with `None`
    ///
    /// Outlines are cleared too, unless the named channel is excluded from
    /// them. Fires `on_clear` once per cleared channel.
    pub fn clear(&mut self, name: Option<&str>, ctx: &mut ViewerContext<'_>) -> Result<()> {
        let names: Vec<String> = match name {
            Some(name) => {
                self.check_channel(name)?;
                vec![name.to_string()]
            }
            None => {
                let mut names: Vec<String> = self.selection.keys().cloned().collect();
                names.sort_unstable();
                names
            }
        };
        for channel in &names {
            self.clear_fills(channel, ctx.scene);
        }
        if name.map_or(true, |name| !self.excluded_outline.contains(name)) {
            self.clear_outlines();
        }
        Ok(())
    }

    /// React to a pointer event
    ///
    /// Ignored until [`setup`](Self::setup) activates pointer handling.
    pub fn handle_pointer(
        &mut self,
        event: PointerEvent,
        ctx: &mut ViewerContext<'_>,
    ) -> Result<()> {
        if !self.enabled || !self.events_active {
            return Ok(());
        }

        match self.pointer.handle(event, self.config.multiple) {
            PointerAction::Ignore => {}
            PointerAction::Hover => {
                let hover = self.config.hover_name.clone();
                self.select_at_pointer(&hover, self.config.hover_exclusive, Some(false), ctx)?;
            }
            PointerAction::ClearHover => {
                let hover = self.config.hover_name.clone();
                self.check_channel(&hover)?;
                self.clear_fills(&hover, ctx.scene);
            }
            PointerAction::Select { exclusive } => {
                let select = self.config.select_name.clone();
                self.select_at_pointer(&select, exclusive, None, ctx)?;
            }
            PointerAction::DoubleClickSelect => {
                let select = self.config.select_name.clone();
                let dblclick = self.config.dblclick_name.clone();
                self.clear(Some(&select), ctx)?;
                if self
                    .select_at_pointer(&dblclick, true, Some(true), ctx)?
                    .is_some()
                {
                    if let Some(events) = self.events.get_mut(&dblclick) {
                        events.on_double_click.trigger(&());
                    }
                }
            }
        }
        Ok(())
    }

    /// Release every overlay and forget all channels
    pub fn dispose(&mut self, scene: &mut dyn RenderScene) {
        self.events_active = false;
        self.pointer = PointerState::Idle;

        for (channel, overlays) in self.fills.drain() {
            for (fragment_id, overlay) in overlays {
                if overlay.attached {
                    scene.detach_fill(&channel, &fragment_id);
                }
                scene.dispose_fill(&channel, &fragment_id);
            }
        }
        for fragment_id in self.outlines.keys() {
            scene.dispose_outline_proxy(fragment_id);
        }
        self.outlines.clear();

        for events in self.events.values_mut() {
            events.reset();
        }
        self.events.clear();
        self.materials.clear();
        self.selection.clear();
        self.excluded_outline.clear();
        log::info!("Highlighter disposed");
    }

    /// Turn outline maintenance on or off
    ///
    /// Disabling clears current outlines.
    pub fn set_outline_enabled(&mut self, enabled: bool, scene: &mut dyn RenderScene) {
        self.config.outline_enabled = enabled;
        scene.set_outline_effect(enabled);
        if !enabled {
            self.clear_outlines();
        }
    }

    /// Turn fill overlay maintenance on or off
    pub fn set_fill_enabled(&mut self, enabled: bool) {
        self.config.fill_enabled = enabled;
    }

    pub fn config(&self) -> &HighlighterConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable every selection call
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Whether pointer events are being handled
    pub fn events_active(&self) -> bool {
        self.events_active
    }

    /// Materials of every channel
    pub fn get(&self) -> &FxHashMap<String, Option<Vec<HighlightMaterial>>> {
        &self.materials
    }

    /// Materials of one channel
    pub fn materials(&self, name: &str) -> Option<&[HighlightMaterial]> {
        self.materials.get(name)?.as_deref()
    }

    /// Current selection of a channel
    pub fn selection(&self, name: &str) -> Option<&FragmentIdMap> {
        self.selection.get(name)
    }

    /// Registered channel names, sorted
    pub fn channels(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.selection.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Subscribe to a channel's notifications
    pub fn events_mut(&mut self, name: &str) -> Result<&mut HighlightEvents> {
        self.events
            .get_mut(name)
            .ok_or_else(|| ComponentError::not_found(name))
    }

    pub fn fill_overlay(&self, name: &str, fragment_id: &str) -> Option<&FillOverlay> {
        self.fills.get(name)?.get(fragment_id)
    }

    pub fn outline_proxy(&self, fragment_id: &str) -> Option<&OutlineProxy> {
        self.outlines.get(fragment_id)
    }

    /// Material of the shared outline effect
    pub fn outline_material(&self) -> &HighlightMaterial {
        &self.outline_material
    }

    pub fn is_outline_excluded(&self, name: &str) -> bool {
        self.excluded_outline.contains(name)
    }

    /// Keep a channel's selections out of the outline effect
    pub fn exclude_outline(&mut self, name: &str) {
        self.excluded_outline.insert(name.to_string());
    }

    pub fn pointer_state(&self) -> PointerState {
        self.pointer
    }

    fn check_channel(&self, name: &str) -> Result<()> {
        if self.selection.contains_key(name) {
            Ok(())
        } else {
            Err(ComponentError::not_found(name))
        }
    }

    /// Add an element and its composites to a channel
    fn add_item(
        &mut self,
        name: &str,
        fragment_id: &str,
        item_id: &str,
        fragments: &dyn FragmentManager,
    ) {
        let Some(selected) = self.selection.get_mut(name) else {
            return;
        };
        selected.insert_item(fragment_id, item_id);

        let Some(base) = parse_item_id(item_id) else {
            return;
        };
        let Some(count) = fragments
            .fragment(fragment_id)
            .and_then(|fragment| fragment.composites(base))
        else {
            return;
        };
        for index in 1..count {
            selected.insert_item(fragment_id, to_composite_id(base, index));
        }
    }

    fn regenerate(&mut self, name: &str, fragment_id: &str, ctx: &mut ViewerContext<'_>) {
        if self.config.fill_enabled {
            self.update_fill(name, fragment_id, ctx);
        }
        if self.config.outline_enabled {
            self.update_outline(name, fragment_id, ctx);
        }
    }

    fn update_fill(&mut self, name: &str, fragment_id: &str, ctx: &mut ViewerContext<'_>) {
        let Some(ids) = self.selection.get(name).and_then(|s| s.get(fragment_id)) else {
            return;
        };
        let Some(fragment) = ctx.fragments.fragment(fragment_id) else {
            return;
        };
        let materials = self.materials.get(name).cloned().flatten();
        let overlay = self
            .fills
            .entry(name.to_string())
            .or_default()
            .entry(fragment_id.to_string())
            .or_insert_with(|| FillOverlay::new(fragment, materials));

        if !overlay.attached {
            ctx.scene.attach_fill(name, fragment_id);
            overlay.attached = true;
        }
        overlay.sync(fragment, ids);
    }

    fn update_outline(&mut self, name: &str, fragment_id: &str, ctx: &mut ViewerContext<'_>) {
        if self.excluded_outline.contains(name) {
            return;
        }
        let Some(ids) = self.selection.get(name).and_then(|s| s.get(fragment_id)) else {
            return;
        };
        let Some(fragment) = ctx.fragments.fragment(fragment_id) else {
            return;
        };

        let scene = &mut *ctx.scene;
        let proxy = self
            .outlines
            .entry(fragment_id.to_string())
            .or_insert_with(|| {
                scene.add_outline_proxy(fragment_id);
                OutlineProxy::new(fragment)
            });
        if !proxy.registered {
            scene.register_outlined(fragment_id);
            proxy.registered = true;
        }
        proxy.sync(fragment, ids);
    }

    /// Take a channel's fills out of the scene and empty its selection
    fn clear_fills(&mut self, name: &str, scene: &mut dyn RenderScene) {
        if let Some(overlays) = self.fills.get_mut(name) {
            for (fragment_id, overlay) in overlays.iter_mut() {
                if overlay.attached {
                    scene.detach_fill(name, fragment_id);
                    overlay.attached = false;
                }
            }
        }
        if let Some(events) = self.events.get_mut(name) {
            events.on_clear.trigger(&());
        }
        if let Some(selected) = self.selection.get_mut(name) {
            selected.clear();
        }
    }

    fn clear_outlines(&mut self) {
        for proxy in self.outlines.values_mut() {
            proxy.clear();
        }
    }

    fn notify_highlight(&mut self, name: &str) {
        let selected = self.selection.get(name);
        if let (Some(events), Some(selected)) = (self.events.get_mut(name), selected) {
            log::debug!("Channel '{}' highlights {} items", name, selected.item_count());
            events.on_highlight.trigger(selected);
        }
    }

    /// Frame the channel's rendered selection
    fn zoom_selection(&self, name: &str, ctx: &mut ViewerContext<'_>) {
        if !self.config.fill_enabled && !self.config.outline_enabled {
            return;
        }
        let Some(selected) = self.selection.get(name).filter(|s| !s.is_empty()) else {
            return;
        };

        let fills = self.fills.get(name).filter(|_| self.config.fill_enabled);
        let outlines = Some(&self.outlines).filter(|_| self.config.outline_enabled);
        let aabb = selection_bounds(selected, fills, outlines, ctx.fragments);

        let Some(sphere) = framing_sphere(&aabb, self.config.zoom_factor) else {
            log::debug!("Selection '{}' has no rendered geometry to frame", name);
            return;
        };
        ctx.camera.fit_to_sphere(&sphere, true);
    }
}
