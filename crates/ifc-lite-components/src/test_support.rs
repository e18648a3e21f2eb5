// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fixtures and mock viewer collaborators shared by the unit tests

use ifc_lite_fragments::{
    AttributeValue, BoundingSphere, CameraControls, ElementRelations, Fragment, FragmentGeometry,
    FragmentRegistry, IfcCategory, ModelData, PropertyEntity, RayHit, Raycaster, RenderScene,
    ViewerContext,
};
use nalgebra::{Matrix4, Vector3};
use rustc_hash::FxHashSet;
use std::cell::RefCell;

pub const MODEL_UUID: &str = "m-1";
pub const MODEL_NAME: &str = "Tower";

/// Raycaster returning a preset hit
#[derive(Default)]
pub struct MockRaycaster {
    pub next_hit: RefCell<Option<RayHit>>,
    pub calls: RefCell<usize>,
}

impl MockRaycaster {
    pub fn aim(&self, fragment_id: &str, face_vertex: u32, instance_id: u32) {
        *self.next_hit.borrow_mut() = Some(RayHit {
            fragment_id: fragment_id.to_string(),
            face_vertex: Some(face_vertex),
            instance_id: Some(instance_id),
        });
    }

    pub fn aim_at_nothing(&self) {
        *self.next_hit.borrow_mut() = None;
    }
}

impl Raycaster for MockRaycaster {
    fn cast_ray(&self, _fragment_ids: &[String]) -> Option<RayHit> {
        *self.calls.borrow_mut() += 1;
        self.next_hit.borrow().clone()
    }
}

/// Scene recording overlay lifecycle notifications
#[derive(Default)]
pub struct MockScene {
    pub attached: FxHashSet<(String, String)>,
    pub outline_proxies: Vec<String>,
    pub outlined: Vec<String>,
    pub disposed_fills: Vec<(String, String)>,
    pub disposed_proxies: Vec<String>,
    pub outline_effect: Option<bool>,
}

impl RenderScene for MockScene {
    fn attach_fill(&mut self, channel: &str, fragment_id: &str) {
        self.attached
            .insert((channel.to_string(), fragment_id.to_string()));
    }

    fn detach_fill(&mut self, channel: &str, fragment_id: &str) {
        self.attached
            .remove(&(channel.to_string(), fragment_id.to_string()));
    }

    fn dispose_fill(&mut self, channel: &str, fragment_id: &str) {
        self.disposed_fills
            .push((channel.to_string(), fragment_id.to_string()));
    }

    fn add_outline_proxy(&mut self, fragment_id: &str) {
        self.outline_proxies.push(fragment_id.to_string());
    }

    fn register_outlined(&mut self, fragment_id: &str) {
        self.outlined.push(fragment_id.to_string());
    }

    fn dispose_outline_proxy(&mut self, fragment_id: &str) {
        self.disposed_proxies.push(fragment_id.to_string());
    }

    fn set_outline_effect(&mut self, enabled: bool) {
        self.outline_effect = Some(enabled);
    }
}

/// Camera recording framing requests
#[derive(Default)]
pub struct MockCamera {
    pub fits: Vec<(BoundingSphere, bool)>,
}

impl CameraControls for MockCamera {
    fn fit_to_sphere(&mut self, sphere: &BoundingSphere, animate: bool) {
        self.fits.push((*sphere, animate));
    }
}

/// Registry plus mock collaborators
#[derive(Default)]
pub struct TestViewer {
    pub registry: FragmentRegistry,
    pub raycaster: MockRaycaster,
    pub scene: MockScene,
    pub camera: MockCamera,
}

impl TestViewer {
    pub fn ctx(&mut self) -> ViewerContext<'_> {
        ViewerContext::new(
            &self.registry,
            &self.raycaster,
            &mut self.scene,
            &mut self.camera,
        )
    }
}

fn text(value: &str) -> AttributeValue {
    AttributeValue::Text(value.to_string())
}

fn triangle() -> FragmentGeometry {
    FragmentGeometry::new(vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0], vec![0, 1, 2])
}

fn offset(x: f32) -> Matrix4<f32> {
    Matrix4::new_translation(&Vector3::new(x, 0.0, 0.0))
}

/// Model with storeys, predefined types, a material relation and composites
///
/// | element | type | storey         | fragments |
/// |---------|------|----------------|-----------|
/// | 10      | wall | Ground Floor   | frag-a    |
/// | 11      | wall | First Floor    | frag-b    |
/// | 12      | slab | Ground Floor   | frag-a    |
/// | 13      | door | (none)         | frag-b    |
/// | 14      | wall | #99 (missing)  | frag-a    |
pub fn tower_model() -> ModelData {
    let wall = IfcCategory::IfcWall.code();
    let mut model = ModelData::new(MODEL_UUID, MODEL_NAME);
    model.add_key_fragment(0, "frag-a");
    model.add_key_fragment(1, "frag-b");

    model.add_element(10, vec![0], ElementRelations::new(Some(1), wall));
    model.add_element(11, vec![1], ElementRelations::new(Some(2), wall));
    model.add_element(
        12,
        vec![0],
        ElementRelations::new(Some(1), IfcCategory::IfcSlab.code()),
    );
    model.add_element(
        13,
        vec![1],
        ElementRelations::new(None, IfcCategory::IfcDoor.code()),
    );
    model.add_element(14, vec![0], ElementRelations::new(Some(99), wall));
    model
}

/// [`tower_model`] with its property bag resolved
pub fn tower_model_with_properties() -> ModelData {
    let storey = IfcCategory::IfcBuildingStorey.code();
    let wall = IfcCategory::IfcWall.code();
    let mut model = tower_model();

    model.add_property(PropertyEntity::new(1, storey).with("Name", text("Ground Floor")));
    model.add_property(PropertyEntity::new(2, storey).with("Name", text("First Floor")));
    model.add_property(
        PropertyEntity::new(10, wall)
            .with("PredefinedType", AttributeValue::Enum("solidwall".into())),
    );
    model.add_property(PropertyEntity::new(11, wall));
    model.add_property(
        PropertyEntity::new(12, IfcCategory::IfcSlab.code())
            .with("PredefinedType", AttributeValue::Enum("FLOOR".into())),
    );
    model.add_property(
        PropertyEntity::new(13, IfcCategory::IfcDoor.code())
            .with("PredefinedType", AttributeValue::Enum("door".into())),
    );

    let material = IfcCategory::IfcRelAssociatesMaterial.code();
    model.add_property(PropertyEntity::new(60, 0).with("Name", text("Concrete")));
    model.add_property(
        PropertyEntity::new(50, material)
            .with("RelatingMaterial", AttributeValue::Ref(60))
            .with(
                "RelatedObjects",
                AttributeValue::List(vec![AttributeValue::Ref(10), AttributeValue::Ref(12)]),
            ),
    );
    model.add_property(
        PropertyEntity::new(51, material)
            .with("RelatingMaterial", AttributeValue::Ref(61))
            .with(
                "RelatedObjects",
                AttributeValue::List(vec![AttributeValue::Ref(11)]),
            ),
    );
    model
}

/// Fragments drawing [`tower_model`]; slab 12 decomposes into three sub-items
pub fn tower_registry() -> FragmentRegistry {
    let mut registry = FragmentRegistry::new();
    let frag_a = Fragment::new("frag-a", triangle())
        .with_instance("10", offset(0.0))
        .with_instance("12", offset(2.0))
        .with_instance("12.1", offset(2.0))
        .with_instance("12.2", offset(2.0))
        .with_instance("14", offset(4.0))
        .with_composites(12, 3)
        .in_group(MODEL_UUID);
    let frag_b = Fragment::new("frag-b", triangle())
        .with_instance("11", offset(0.0))
        .with_instance("13", offset(6.0))
        .in_group(MODEL_UUID);
    registry.add_fragment(frag_a).expect("valid fragment");
    registry.add_fragment(frag_b).expect("valid fragment");
    registry.add_group(tower_model());
    registry
}

/// Viewer scene for selection tests
///
/// - `frag-a`: instanced; items 10, 11, 11.1, 12 at x = 0, 2, 2, 4; item 11 has 2 composites
/// - `frag-b`: block fragment; block 0 is item 20, block 1 is item 21
/// - `frag-c`: instanced; second part of element 10 at x = 10
///
/// Element 10 spans `frag-a` and `frag-c` through the model's fragment keys.
pub fn selection_viewer() -> TestViewer {
    let mut registry = FragmentRegistry::new();

    let frag_a = Fragment::new("frag-a", triangle())
        .with_instance("10", offset(0.0))
        .with_instance("11", offset(2.0))
        .with_instance("11.1", offset(2.0))
        .with_instance("12", offset(4.0))
        .with_composites(11, 2)
        .with_capacity(8)
        .in_group(MODEL_UUID);

    let block_geometry = FragmentGeometry::new(
        vec![
            0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, // block 0
            5.0, 0.0, 0.0, 6.0, 0.0, 0.0, 5.0, 1.0, 0.0, // block 1
        ],
        vec![0, 1, 2, 3, 4, 5],
    )
    .with_blocks(vec![0, 0, 0, 1, 1, 1]);
    let frag_b = Fragment::new("frag-b", block_geometry)
        .with_block_items(vec!["20".into(), "21".into()], Matrix4::identity())
        .in_group(MODEL_UUID);

    let frag_c = Fragment::new("frag-c", triangle())
        .with_instance("10", offset(10.0))
        .in_group(MODEL_UUID);

    registry.add_fragment(frag_a).expect("valid fragment");
    registry.add_fragment(frag_b).expect("valid fragment");
    registry.add_fragment(frag_c).expect("valid fragment");

    let wall = IfcCategory::IfcWall.code();
    let mut model = ModelData::new(MODEL_UUID, MODEL_NAME);
    model.add_key_fragment(0, "frag-a");
    model.add_key_fragment(1, "frag-b");
    model.add_key_fragment(2, "frag-c");
    model.add_element(10, vec![0, 2], ElementRelations::new(None, wall));
    model.add_element(11, vec![0], ElementRelations::new(None, wall));
    model.add_element(12, vec![0], ElementRelations::new(None, wall));
    model.add_element(20, vec![1], ElementRelations::new(None, wall));
    model.add_element(21, vec![1], ElementRelations::new(None, wall));
    registry.add_group(model);

    TestViewer {
        registry,
        ..Default::default()
    }
}
