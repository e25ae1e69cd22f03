//! Typed access to the relationship kinds the graph cares about.

use ifcdot_core::Result;

use crate::model::{Entity, EntityId};
use crate::schema::IfcClass;

/// Recognized relationship kinds, in classification precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationshipKind {
    Aggregates,
    Nests,
    AssignsToGroup,
    ConnectsElements,
    ConnectsStructuralMember,
    ContainedInSpatialStructure,
    FillsElement,
    VoidsElement,
    SpaceBoundary,
}

impl RelationshipKind {
    pub const ALL: [RelationshipKind; 9] = [
        Self::Aggregates,
        Self::Nests,
        Self::AssignsToGroup,
        Self::ConnectsElements,
        Self::ConnectsStructuralMember,
        Self::ContainedInSpatialStructure,
        Self::FillsElement,
        Self::VoidsElement,
        Self::SpaceBoundary,
    ];

    /// The schema class that defines this kind (subtypes match too).
    pub fn class(self) -> IfcClass {
        match self {
            Self::Aggregates => IfcClass::IfcRelAggregates,
            Self::Nests => IfcClass::IfcRelNests,
            Self::AssignsToGroup => IfcClass::IfcRelAssignsToGroup,
            Self::ConnectsElements => IfcClass::IfcRelConnectsElements,
            Self::ConnectsStructuralMember => IfcClass::IfcRelConnectsStructuralMember,
            Self::ContainedInSpatialStructure => IfcClass::IfcRelContainedInSpatialStructure,
            Self::FillsElement => IfcClass::IfcRelFillsElement,
            Self::VoidsElement => IfcClass::IfcRelVoidsElement,
            Self::SpaceBoundary => IfcClass::IfcRelSpaceBoundary,
        }
    }

    /// First matching kind for a class, or `None` for unrecognized relationships.
    pub fn of(class: IfcClass) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| class.is_a(kind.class()))
    }

    /// Attribute index of the relating role.
    pub fn relating_index(self) -> usize {
        match self {
            Self::Aggregates | Self::Nests => 4,
            Self::AssignsToGroup => 6,
            Self::ConnectsElements => 5,
            Self::ConnectsStructuralMember => 4,
            Self::ContainedInSpatialStructure => 5,
            Self::FillsElement | Self::VoidsElement | Self::SpaceBoundary => 4,
        }
    }

    /// Attribute index of the related role.
    pub fn related_index(self) -> usize {
        match self {
            Self::Aggregates | Self::Nests => 5,
            Self::AssignsToGroup => 4,
            Self::ConnectsElements => 6,
            Self::ConnectsStructuralMember => 5,
            Self::ContainedInSpatialStructure => 4,
            Self::FillsElement | Self::VoidsElement | Self::SpaceBoundary => 5,
        }
    }

    /// Whether the related role is an aggregate (list) rather than a single reference.
    pub fn has_many_related(self) -> bool {
        matches!(
            self,
            Self::Aggregates | Self::Nests | Self::AssignsToGroup | Self::ContainedInSpatialStructure
        )
    }
}

/// A relationship instance with its roles resolved against the model.
///
/// Resolution is per role item: one bad reference does not invalidate the
/// remaining related items.
#[derive(Debug)]
pub struct Relationship<'m> {
    pub id: EntityId,
    pub kind: RelationshipKind,
    pub relating: Result<&'m Entity>,
    pub related: Vec<Result<&'m Entity>>,
}
