// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC category lookup by numeric type code
//!
//! Loaded models carry each element's IFC class as the numeric type code
//! assigned by the IFC loader. Classification resolves those codes to the
//! upper-case class name (`IFCWALL`, `IFCSLAB`, ...).

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Class name used when a type code has no entry in the lookup table
pub const UNKNOWN_CATEGORY: &str = "UNKNOWN";

/// IFC categories known to the viewer components
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IfcCategory {
    // ========================================================================
    // Spatial Structure
    // ========================================================================
    IfcProject,
    IfcSite,
    IfcBuilding,
    IfcBuildingStorey,
    IfcSpace,

    // ========================================================================
    // Building Elements
    // ========================================================================
    IfcWall,
    IfcWallStandardCase,
    IfcCurtainWall,
    IfcSlab,
    IfcRoof,
    IfcBeam,
    IfcColumn,
    IfcDoor,
    IfcWindow,
    IfcStair,
    IfcStairFlight,
    IfcRamp,
    IfcRampFlight,
    IfcRailing,
    IfcCovering,
    IfcPlate,
    IfcMember,
    IfcFooting,
    IfcPile,
    IfcBuildingElementProxy,
    IfcOpeningElement,

    // ========================================================================
    // Distribution and Furnishing
    // ========================================================================
    IfcDistributionElement,
    IfcFlowTerminal,
    IfcFlowSegment,
    IfcFlowFitting,
    IfcFurnishingElement,
    IfcFurniture,

    // ========================================================================
    // Relationships
    // ========================================================================
    IfcRelContainedInSpatialStructure,
    IfcRelAggregates,
    IfcRelDefinesByProperties,
    IfcRelDefinesByType,
    IfcRelAssociatesMaterial,
    IfcRelAssignsToGroup,
    IfcRelVoidsElement,
    IfcRelFillsElement,
    IfcRelConnectsPathElements,
    IfcRelSpaceBoundary,
}

impl IfcCategory {
    /// Every category in the built-in table
    pub const ALL: &'static [IfcCategory] = &[
        IfcCategory::IfcProject,
        IfcCategory::IfcSite,
        IfcCategory::IfcBuilding,
        IfcCategory::IfcBuildingStorey,
        IfcCategory::IfcSpace,
        IfcCategory::IfcWall,
        IfcCategory::IfcWallStandardCase,
        IfcCategory::IfcCurtainWall,
        IfcCategory::IfcSlab,
        IfcCategory::IfcRoof,
        IfcCategory::IfcBeam,
        IfcCategory::IfcColumn,
        IfcCategory::IfcDoor,
        IfcCategory::IfcWindow,
        IfcCategory::IfcStair,
        IfcCategory::IfcStairFlight,
        IfcCategory::IfcRamp,
        IfcCategory::IfcRampFlight,
        IfcCategory::IfcRailing,
        IfcCategory::IfcCovering,
        IfcCategory::IfcPlate,
        IfcCategory::IfcMember,
        IfcCategory::IfcFooting,
        IfcCategory::IfcPile,
        IfcCategory::IfcBuildingElementProxy,
        IfcCategory::IfcOpeningElement,
        IfcCategory::IfcDistributionElement,
        IfcCategory::IfcFlowTerminal,
        IfcCategory::IfcFlowSegment,
        IfcCategory::IfcFlowFitting,
        IfcCategory::IfcFurnishingElement,
        IfcCategory::IfcFurniture,
        IfcCategory::IfcRelContainedInSpatialStructure,
        IfcCategory::IfcRelAggregates,
        IfcCategory::IfcRelDefinesByProperties,
        IfcCategory::IfcRelDefinesByType,
        IfcCategory::IfcRelAssociatesMaterial,
        IfcCategory::IfcRelAssignsToGroup,
        IfcCategory::IfcRelVoidsElement,
        IfcCategory::IfcRelFillsElement,
        IfcCategory::IfcRelConnectsPathElements,
        IfcCategory::IfcRelSpaceBoundary,
    ];

    /// Numeric type code as emitted by the IFC loader
    pub fn code(&self) -> u32 {
        match self {
            IfcCategory::IfcProject => 103090709,
            IfcCategory::IfcSite => 4097777520,
            IfcCategory::IfcBuilding => 4031249490,
            IfcCategory::IfcBuildingStorey => 3124254112,
            IfcCategory::IfcSpace => 3856911033,
            IfcCategory::IfcWall => 2391406946,
            IfcCategory::IfcWallStandardCase => 3512223829,
            IfcCategory::IfcCurtainWall => 3495092785,
            IfcCategory::IfcSlab => 1529196076,
            IfcCategory::IfcRoof => 2016517767,
            IfcCategory::IfcBeam => 753842376,
            IfcCategory::IfcColumn => 843113511,
            IfcCategory::IfcDoor => 395920057,
            IfcCategory::IfcWindow => 3304561284,
            IfcCategory::IfcStair => 331165859,
            IfcCategory::IfcStairFlight => 4252922144,
            IfcCategory::IfcRamp => 3024970846,
            IfcCategory::IfcRampFlight => 3283111854,
            IfcCategory::IfcRailing => 2262370178,
            IfcCategory::IfcCovering => 1973544240,
            IfcCategory::IfcPlate => 3171933400,
            IfcCategory::IfcMember => 1073191201,
            IfcCategory::IfcFooting => 900683007,
            IfcCategory::IfcPile => 1687234759,
            IfcCategory::IfcBuildingElementProxy => 1095909175,
            IfcCategory::IfcOpeningElement => 3588315303,
            IfcCategory::IfcDistributionElement => 1945004755,
            IfcCategory::IfcFlowTerminal => 2058353004,
            IfcCategory::IfcFlowSegment => 987401354,
            IfcCategory::IfcFlowFitting => 4278956645,
            IfcCategory::IfcFurnishingElement => 263784265,
            IfcCategory::IfcFurniture => 1509553395,
            IfcCategory::IfcRelContainedInSpatialStructure => 3242617779,
            IfcCategory::IfcRelAggregates => 160246688,
            IfcCategory::IfcRelDefinesByProperties => 4186316022,
            IfcCategory::IfcRelDefinesByType => 781010003,
            IfcCategory::IfcRelAssociatesMaterial => 2655215786,
            IfcCategory::IfcRelAssignsToGroup => 1307041759,
            IfcCategory::IfcRelVoidsElement => 1401173127,
            IfcCategory::IfcRelFillsElement => 3940055652,
            IfcCategory::IfcRelConnectsPathElements => 4189434867,
            IfcCategory::IfcRelSpaceBoundary => 3451746338,
        }
    }

    /// Canonical upper-case class name
    pub fn name(&self) -> &'static str {
        match self {
            IfcCategory::IfcProject => "IFCPROJECT",
            IfcCategory::IfcSite => "IFCSITE",
            IfcCategory::IfcBuilding => "IFCBUILDING",
            IfcCategory::IfcBuildingStorey => "IFCBUILDINGSTOREY",
            IfcCategory::IfcSpace => "IFCSPACE",
            IfcCategory::IfcWall => "IFCWALL",
            IfcCategory::IfcWallStandardCase => "IFCWALLSTANDARDCASE",
            IfcCategory::IfcCurtainWall => "IFCCURTAINWALL",
            IfcCategory::IfcSlab => "IFCSLAB",
            IfcCategory::IfcRoof => "IFCROOF",
            IfcCategory::IfcBeam => "IFCBEAM",
            IfcCategory::IfcColumn => "IFCCOLUMN",
            IfcCategory::IfcDoor => "IFCDOOR",
            IfcCategory::IfcWindow => "IFCWINDOW",
            IfcCategory::IfcStair => "IFCSTAIR",
            IfcCategory::IfcStairFlight => "IFCSTAIRFLIGHT",
            IfcCategory::IfcRamp => "IFCRAMP",
            IfcCategory::IfcRampFlight => "IFCRAMPFLIGHT",
            IfcCategory::IfcRailing => "IFCRAILING",
            IfcCategory::IfcCovering => "IFCCOVERING",
            IfcCategory::IfcPlate => "IFCPLATE",
            IfcCategory::IfcMember => "IFCMEMBER",
            IfcCategory::IfcFooting => "IFCFOOTING",
            IfcCategory::IfcPile => "IFCPILE",
            IfcCategory::IfcBuildingElementProxy => "IFCBUILDINGELEMENTPROXY",
            IfcCategory::IfcOpeningElement => "IFCOPENINGELEMENT",
            IfcCategory::IfcDistributionElement => "IFCDISTRIBUTIONELEMENT",
            IfcCategory::IfcFlowTerminal => "IFCFLOWTERMINAL",
            IfcCategory::IfcFlowSegment => "IFCFLOWSEGMENT",
            IfcCategory::IfcFlowFitting => "IFCFLOWFITTING",
            IfcCategory::IfcFurnishingElement => "IFCFURNISHINGELEMENT",
            IfcCategory::IfcFurniture => "IFCFURNITURE",
            IfcCategory::IfcRelContainedInSpatialStructure => "IFCRELCONTAINEDINSPATIALSTRUCTURE",
            IfcCategory::IfcRelAggregates => "IFCRELAGGREGATES",
            IfcCategory::IfcRelDefinesByProperties => "IFCRELDEFINESBYPROPERTIES",
            IfcCategory::IfcRelDefinesByType => "IFCRELDEFINESBYTYPE",
            IfcCategory::IfcRelAssociatesMaterial => "IFCRELASSOCIATESMATERIAL",
            IfcCategory::IfcRelAssignsToGroup => "IFCRELASSIGNSTOGROUP",
            IfcCategory::IfcRelVoidsElement => "IFCRELVOIDSELEMENT",
            IfcCategory::IfcRelFillsElement => "IFCRELFILLSELEMENT",
            IfcCategory::IfcRelConnectsPathElements => "IFCRELCONNECTSPATHELEMENTS",
            IfcCategory::IfcRelSpaceBoundary => "IFCRELSPACEBOUNDARY",
        }
    }

    /// Look up a category by type code
    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.code() == code)
    }

    /// Check if this is a relationship category
    pub fn is_relation(&self) -> bool {
        self.relation_kind().is_some()
    }

    /// Attribute layout of a relationship category
    pub fn relation_kind(&self) -> Option<RelationKind> {
        let (relating, related) = match self {
            IfcCategory::IfcRelContainedInSpatialStructure => {
                ("RelatingStructure", "RelatedElements")
            }
            IfcCategory::IfcRelAggregates => ("RelatingObject", "RelatedObjects"),
            IfcCategory::IfcRelDefinesByProperties => {
                ("RelatingPropertyDefinition", "RelatedObjects")
            }
            IfcCategory::IfcRelDefinesByType => ("RelatingType", "RelatedObjects"),
            IfcCategory::IfcRelAssociatesMaterial => ("RelatingMaterial", "RelatedObjects"),
            IfcCategory::IfcRelAssignsToGroup => ("RelatingGroup", "RelatedObjects"),
            IfcCategory::IfcRelVoidsElement => ("RelatingBuildingElement", "RelatedOpeningElement"),
            IfcCategory::IfcRelFillsElement => ("RelatingOpeningElement", "RelatedBuildingElement"),
            IfcCategory::IfcRelConnectsPathElements => ("RelatingElement", "RelatedElement"),
            IfcCategory::IfcRelSpaceBoundary => ("RelatingSpace", "RelatedBuildingElement"),
            _ => return None,
        };
        Some(RelationKind {
            category: *self,
            relating: relating.to_string(),
            related: related.to_string(),
        })
    }
}

impl std::fmt::Display for IfcCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Attribute names linking the two sides of a relationship entity
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationKind {
    /// Relationship category
    pub category: IfcCategory,
    /// Attribute holding the single "relating" reference
    pub relating: String,
    /// Attribute holding the "related" reference(s)
    pub related: String,
}

impl RelationKind {
    /// Resolve the layout of a relationship type code
    pub fn from_code(code: u32) -> Option<Self> {
        IfcCategory::from_code(code).and_then(|c| c.relation_kind())
    }
}

/// Type code to class name lookup table
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CategoryMap {
    names: FxHashMap<u32, String>,
}

impl CategoryMap {
    /// Create an empty lookup table
    pub fn new() -> Self {
        Self::default()
    }

    /// Lookup table with every built-in [`IfcCategory`]
    pub fn ifc() -> Self {
        let mut map = Self::new();
        for category in IfcCategory::ALL {
            map.insert(category.code(), category.name());
        }
        map
    }

    /// Register or override a class name for a type code
    pub fn insert(&mut self, code: u32, name: impl Into<String>) {
        self.names.insert(code, name.into());
    }

    /// Class name for a type code
    pub fn get(&self, code: u32) -> Option<&str> {
        self.names.get(&code).map(String::as_str)
    }

    /// Class name for a type code, [`UNKNOWN_CATEGORY`] when absent
    pub fn name_or_unknown(&self, code: u32) -> &str {
        self.get(code).unwrap_or(UNKNOWN_CATEGORY)
    }

    /// Number of registered codes
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
