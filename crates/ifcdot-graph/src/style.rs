//! Node and edge styling rules.

use ifcdot_model::{Entity, IfcClass, RelationshipKind};
use serde::{Deserialize, Serialize};

/// Visual category of a node. Determines its fill color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeCategory {
    Group,
    Spatial,
    Assembly,
    Opening,
    DoorOrWindow,
    Element,
    Structural,
    Other,
}

/// Classification rules, evaluated top to bottom; the first match wins.
/// Doors and windows are elements too, so their rule must precede `Element`.
const RULES: &[(NodeCategory, &[IfcClass])] = &[
    (NodeCategory::Group, &[IfcClass::IfcGroup]),
    (NodeCategory::Spatial, &[IfcClass::IfcSpatialElement]),
    (NodeCategory::Assembly, &[IfcClass::IfcElementAssembly]),
    (NodeCategory::Opening, &[IfcClass::IfcOpeningElement]),
    (
        NodeCategory::DoorOrWindow,
        &[IfcClass::IfcDoor, IfcClass::IfcWindow],
    ),
    (NodeCategory::Element, &[IfcClass::IfcElement]),
    (NodeCategory::Structural, &[IfcClass::IfcStructuralItem]),
];

impl NodeCategory {
    pub fn classify(entity: &Entity) -> Self {
        RULES
            .iter()
            .find(|(_, classes)| classes.iter().any(|class| entity.is_a(*class)))
            .map(|(category, _)| *category)
            .unwrap_or(NodeCategory::Other)
    }

    /// Fill color used in the graph text.
    pub fn fill(self) -> &'static str {
        match self {
            Self::Group => "#ff99ff",
            Self::Spatial => "#ff99cc",
            Self::Assembly => "#ccff99",
            Self::Opening => "#cc99ff",
            Self::DoorOrWindow => "#99ccff",
            Self::Element => "#9999ff",
            Self::Structural => "#99ff99",
            Self::Other => "#ff9999",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dashed,
    Dotted,
}

impl std::fmt::Display for LineStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Solid => write!(f, "solid"),
            Self::Dashed => write!(f, "dashed"),
            Self::Dotted => write!(f, "dotted"),
        }
    }
}

/// Layout weight and line style of the edges produced by one relationship kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeStyle {
    pub weight: u8,
    pub line: LineStyle,
}

impl EdgeStyle {
    pub const HEAVY: u8 = 9;
    pub const LIGHT: u8 = 1;

    pub fn for_kind(kind: RelationshipKind) -> Self {
        let (weight, line) = match kind {
            RelationshipKind::Aggregates => (Self::HEAVY, LineStyle::Solid),
            RelationshipKind::Nests => (Self::HEAVY, LineStyle::Solid),
            RelationshipKind::AssignsToGroup => (Self::LIGHT, LineStyle::Solid),
            RelationshipKind::ConnectsElements => (Self::HEAVY, LineStyle::Dashed),
            RelationshipKind::ConnectsStructuralMember => (Self::LIGHT, LineStyle::Solid),
            RelationshipKind::ContainedInSpatialStructure => (Self::LIGHT, LineStyle::Solid),
            RelationshipKind::FillsElement => (Self::HEAVY, LineStyle::Solid),
            RelationshipKind::VoidsElement => (Self::HEAVY, LineStyle::Solid),
            RelationshipKind::SpaceBoundary => (Self::HEAVY, LineStyle::Dotted),
        };
        Self { weight, line }
    }
}
