//! ifcdot model: loads IFC exchange files into a typed, read-only model.
//!
//! The loader covers what graphing needs: every instance with its class in
//! the IFC hierarchy, role accessors for the recognized relationship kinds,
//! and the decomposition tree (spatial containment, aggregation, nesting).

pub mod archive;
pub mod lexer;
pub mod model;
pub mod relationship;
pub mod schema;
pub mod step;

pub use model::{Decomposition, Entity, EntityId, Model};
pub use relationship::{Relationship, RelationshipKind};
pub use schema::IfcClass;
pub use step::Param;
