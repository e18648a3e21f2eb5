// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Highlighter settings and materials

use crate::Result;
use serde::{Deserialize, Serialize};

/// Visual style of a highlight overlay
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HighlightMaterial {
    /// RGBA color [r, g, b, a] where values are 0.0-1.0
    pub color: [f32; 4],
    /// Blend with what is behind
    pub transparent: bool,
    /// Respect the depth buffer
    pub depth_test: bool,
}

impl HighlightMaterial {
    /// Material from a 0xRRGGBB color and an opacity
    pub fn from_hex(rgb: u32, opacity: f32) -> Self {
        Self {
            color: hex_to_rgba(rgb, opacity),
            transparent: opacity < 1.0,
            depth_test: true,
        }
    }

    /// Replace the RGB part of the color, keeping opacity
    pub fn set_hex(&mut self, rgb: u32) {
        let alpha = self.color[3];
        self.color = hex_to_rgba(rgb, alpha);
    }

    /// Builder-style depth test switch
    pub fn with_depth_test(mut self, depth_test: bool) -> Self {
        self.depth_test = depth_test;
        self
    }
}

fn hex_to_rgba(rgb: u32, alpha: f32) -> [f32; 4] {
    let r = ((rgb >> 16) & 0xFF) as f32 / 255.0;
    let g = ((rgb >> 8) & 0xFF) as f32 / 255.0;
    let b = (rgb & 0xFF) as f32 / 255.0;
    [r, g, b, alpha]
}

/// Modifier key that turns a click into an additive selection
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MultipleSelectKey {
    /// Every click replaces the selection
    None,
    /// Shift+click adds to the selection
    Shift,
    /// Ctrl+click adds to the selection
    #[default]
    Ctrl,
}

/// Highlighter settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlighterConfig {
    /// Modifier for additive click selection
    pub multiple: MultipleSelectKey,
    /// Radius multiplier applied when framing a selection
    pub zoom_factor: f32,
    /// Frame the selection after every selection call by default
    pub zoom_to_selection: bool,
    /// Maintain fill overlays
    pub fill_enabled: bool,
    /// Maintain outline proxies
    pub outline_enabled: bool,
    /// Whether pointer hover replaces the previous hover selection
    pub hover_exclusive: bool,
    /// Channel driven by clicks
    pub select_name: String,
    /// Channel driven by pointer movement
    pub hover_name: String,
    /// Channel driven by double clicks
    pub dblclick_name: String,
    /// Fill material of the select channel
    pub selection_material: HighlightMaterial,
    /// Fill material of the hover and double-click channels
    pub hover_material: HighlightMaterial,
    /// Material of the shared outline effect
    pub outline_material: HighlightMaterial,
}

impl Default for HighlighterConfig {
    fn default() -> Self {
        Self {
            multiple: MultipleSelectKey::Ctrl,
            zoom_factor: 1.5,
            zoom_to_selection: false,
            fill_enabled: true,
            outline_enabled: true,
            hover_exclusive: false,
            select_name: "select".to_string(),
            hover_name: "hover".to_string(),
            dblclick_name: "dblclick".to_string(),
            selection_material: HighlightMaterial::from_hex(0xBCF124, 0.85),
            hover_material: HighlightMaterial::from_hex(0x6528D7, 0.2),
            outline_material: HighlightMaterial::from_hex(0xFFFFFF, 0.4).with_depth_test(false),
        }
    }
}

impl HighlighterConfig {
    /// Outline color applied by `setup`
    pub const SETUP_OUTLINE_COLOR: u32 = 0xF0FF7A;

    /// Parse settings from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize settings to JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
