//! In-memory model: typed entities, relationship roles, decomposition tree.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use ifcdot_core::{Error, Result};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use tracing::{debug, info, warn};

use crate::archive;
use crate::relationship::{Relationship, RelationshipKind};
use crate::schema::IfcClass;
use crate::step::{self, Param, StepFile};

/// Instance identifier (`#id` in the exchange file).
pub type EntityId = u64;

/// One instance of the model.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    id: EntityId,
    keyword: String,
    class: Option<IfcClass>,
    params: Vec<Param>,
}

impl Entity {
    pub fn new(id: EntityId, keyword: impl Into<String>, params: Vec<Param>) -> Self {
        let keyword = keyword.into();
        let class = IfcClass::from_keyword(&keyword);
        Self {
            id,
            keyword,
            class,
            params,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Schema class, or `None` for classes outside the known hierarchy.
    pub fn class(&self) -> Option<IfcClass> {
        self.class
    }

    /// Schema name (`IfcWall`), falling back to the raw keyword.
    pub fn type_name(&self) -> &str {
        match self.class {
            Some(class) => class.name(),
            None => &self.keyword,
        }
    }

    pub fn is_a(&self, class: IfcClass) -> bool {
        self.class.is_some_and(|c| c.is_a(class))
    }

    pub fn attribute(&self, index: usize) -> Option<&Param> {
        self.params.get(index)
    }
}

/// How a child hangs under its parent in the decomposition tree.
/// Declaration order is the order children are listed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Decomposition {
    Contains,
    Aggregates,
    Nests,
}

impl Decomposition {
    fn of(kind: RelationshipKind) -> Option<Self> {
        match kind {
            RelationshipKind::ContainedInSpatialStructure => Some(Self::Contains),
            RelationshipKind::Aggregates => Some(Self::Aggregates),
            RelationshipKind::Nests => Some(Self::Nests),
            _ => None,
        }
    }
}

/// A loaded model. Read-only once built.
pub struct Model {
    schema: Option<String>,
    entities: Vec<Entity>,
    index: HashMap<EntityId, usize>,
    hierarchy: DiGraph<EntityId, Decomposition>,
    hierarchy_nodes: HashMap<EntityId, NodeIndex>,
    /// Instances of unknown classes that fill a relationship role.
    unclassified_objects: HashSet<EntityId>,
}

impl Model {
    /// Parse exchange-file text.
    pub fn parse(source: &str) -> Result<Self> {
        Ok(Self::from_step(step::parse(source)?))
    }

    /// Load a model from raw bytes: plain text or a zip archive holding one model.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let text = archive::model_text(bytes)?;
        Self::parse(&text)
    }

    /// Load a model from disk.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let model = Self::from_bytes(&bytes)?;
        info!(
            "Loaded {} ({} instances, schema {})",
            path.display(),
            model.len(),
            model.schema().unwrap_or("unknown")
        );
        Ok(model)
    }

    pub fn from_step(file: StepFile) -> Self {
        let entities: Vec<Entity> = file
            .instances
            .into_iter()
            .map(|raw| Entity::new(raw.id, raw.keyword, raw.params))
            .collect();
        Self::from_entities(file.schema, entities)
    }

    /// Build a model from entities in enumeration order.
    pub fn from_entities(schema: Option<String>, entities: Vec<Entity>) -> Self {
        let index = entities
            .iter()
            .enumerate()
            .map(|(pos, e)| (e.id, pos))
            .collect();

        let mut model = Self {
            schema,
            entities,
            index,
            hierarchy: DiGraph::new(),
            hierarchy_nodes: HashMap::new(),
            unclassified_objects: HashSet::new(),
        };
        model.build_hierarchy();
        model.unclassified_objects = model.collect_unclassified_objects();
        model
    }

    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.index.get(&id).map(|&pos| &self.entities[pos])
    }

    /// Everything drawn as a node, in enumeration order: each `IfcObject`,
    /// plus instances of classes missing from [`IfcClass`] that take part in a
    /// recognized relationship (those roles only ever hold objects).
    pub fn objects(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.iter().filter(move |e| {
            e.is_a(IfcClass::IfcObject) || self.unclassified_objects.contains(&e.id)
        })
    }

    /// Entities of a class or any subtype, in enumeration order.
    pub fn entities_of_type(&self, class: IfcClass) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.iter().filter(move |e| e.is_a(class))
    }

    /// Resolve the roles of a relationship instance. `None` when the
    /// instance is not one of the recognized relationship kinds.
    pub fn relationship<'m>(&'m self, entity: &'m Entity) -> Option<Relationship<'m>> {
        let kind = RelationshipKind::of(entity.class?)?;
        let relating = self.resolve(entity, kind.relating_index());
        let related = if kind.has_many_related() {
            self.resolve_many(entity, kind.related_index())
        } else {
            match entity.attribute(kind.related_index()) {
                // Optional roles, e.g. a virtual space boundary without an element.
                Some(Param::Unset) => {
                    debug!("#{} ({}) has no related object", entity.id, kind.class());
                    Vec::new()
                }
                _ => vec![self.resolve(entity, kind.related_index())],
            }
        };

        Some(Relationship {
            id: entity.id,
            kind,
            relating,
            related,
        })
    }

    /// All recognized relationships, in enumeration order.
    pub fn relationships(&self) -> impl Iterator<Item = Relationship<'_>> + '_ {
        self.entities_of_type(IfcClass::IfcRelationship)
            .filter_map(move |e| self.relationship(e))
    }

    /// Direct decomposition children: contained elements, then aggregated
    /// parts, then nested parts, each group in relationship order.
    pub fn hierarchy_children(&self, entity: &Entity) -> Result<Vec<&Entity>> {
        if self.entity(entity.id).is_none() {
            return Err(Error::NotFound(format!(
                "#{} is not part of this model",
                entity.id
            )));
        }

        let Some(&node) = self.hierarchy_nodes.get(&entity.id) else {
            return Ok(Vec::new());
        };

        let mut edges: Vec<_> = self
            .hierarchy
            .edges_directed(node, Direction::Outgoing)
            .collect();
        edges.sort_by_key(|edge| (*edge.weight(), edge.id().index()));

        edges
            .into_iter()
            .map(|edge| {
                let child_id = self.hierarchy[edge.target()];
                self.entity(child_id).ok_or_else(|| {
                    Error::reference(child_id, format!("child of #{} vanished", entity.id))
                })
            })
            .collect()
    }

    fn resolve(&self, rel: &Entity, index: usize) -> Result<&Entity> {
        self.resolve_param(rel, rel.attribute(index), index)
    }

    fn resolve_many(&self, rel: &Entity, index: usize) -> Vec<Result<&Entity>> {
        match rel.attribute(index) {
            Some(Param::List(items)) => items
                .iter()
                .filter(|item| **item != Param::Unset)
                .map(|item| self.resolve_param(rel, Some(item), index))
                .collect(),
            single => vec![self.resolve_param(rel, single, index)],
        }
    }

    fn resolve_param(&self, rel: &Entity, param: Option<&Param>, index: usize) -> Result<&Entity> {
        let Some(param) = param else {
            return Err(Error::reference(
                rel.id,
                format!("attribute {index} is missing"),
            ));
        };
        match param.as_ref_id() {
            Some(id) => self.entity(id).ok_or_else(|| {
                Error::reference(
                    id,
                    format!("attribute {index} of #{} points to a missing instance", rel.id),
                )
            }),
            None => Err(Error::reference(
                rel.id,
                format!("attribute {index} is not an instance reference: {param:?}"),
            )),
        }
    }

    fn build_hierarchy(&mut self) {
        let mut edges = Vec::new();
        for rel in self.relationships() {
            let Some(decomposition) = Decomposition::of(rel.kind) else {
                continue;
            };
            let parent = match rel.relating {
                Ok(parent) => parent.id,
                Err(e) => {
                    debug!("Decomposition #{} skipped: {}", rel.id, e);
                    continue;
                }
            };
            for child in rel.related {
                match child {
                    Ok(child) => edges.push((parent, child.id, decomposition)),
                    Err(e) => debug!("Decomposition #{} item skipped: {}", rel.id, e),
                }
            }
        }

        for (parent, child, decomposition) in edges {
            let from = self.hierarchy_node(parent);
            let to = self.hierarchy_node(child);
            self.hierarchy.add_edge(from, to, decomposition);
        }

        if petgraph::algo::is_cyclic_directed(&self.hierarchy) {
            warn!("Decomposition hierarchy contains a cycle");
        }
    }

    fn collect_unclassified_objects(&self) -> HashSet<EntityId> {
        let mut ids = HashSet::new();
        for rel in self.relationships() {
            let roles = std::iter::once(&rel.relating).chain(rel.related.iter());
            for entity in roles.flatten() {
                if entity.class.is_none() {
                    ids.insert(entity.id);
                }
            }
        }
        if !ids.is_empty() {
            warn!(
                "{} instances of unknown classes take part in relationships",
                ids.len()
            );
        }
        ids
    }

    fn hierarchy_node(&mut self, id: EntityId) -> NodeIndex {
        if let Some(&node) = self.hierarchy_nodes.get(&id) {
            return node;
        }
        let node = self.hierarchy.add_node(id);
        self.hierarchy_nodes.insert(id, node);
        node
    }
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("schema", &self.schema)
            .field("entities", &self.entities.len())
            .field("hierarchy_edges", &self.hierarchy.edge_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    const HOUSE: &str = indoc! {"
        DATA;
        #1=IFCPROJECT('p',$,'Project',$,$,$,$,$,$);
        #2=IFCSITE('s',$,'Site',$,$,$,$,$,.ELEMENT.,$,$,$,$,$);
        #3=IFCBUILDING('b',$,'Building',$,$,$,$,$,.ELEMENT.,$,$,$);
        #4=IFCBUILDINGSTOREY('g',$,'Ground',$,$,$,$,$,.ELEMENT.,0.);
        #5=IFCWALL('w',$,'Wall',$,$,$,$,$,$);
        #6=IFCDOOR('d',$,'Door',$,$,$,$,$,$,$,$,$,$);
        #7=IFCSLAB('f',$,'Floor',$,$,$,$,$,$);
        #10=IFCRELAGGREGATES('r1',$,$,$,#1,(#2));
        #11=IFCRELAGGREGATES('r2',$,$,$,#2,(#3));
        #12=IFCRELAGGREGATES('r3',$,$,$,#3,(#4));
        #13=IFCRELCONTAINEDINSPATIALSTRUCTURE('r4',$,$,$,(#5,#6),#4);
        #14=IFCRELAGGREGATES('r5',$,$,$,#4,(#7));
        #15=IFCRELCONTAINEDINSPATIALSTRUCTURE('r6',$,$,$,(#99,#7),#3);
        #16=IFCRELDEFINESBYPROPERTIES('r7',$,$,$,(#5),#20);
        ENDSEC;
    "};

    #[test]
    fn test_entities_of_type_in_file_order() {
        let model = Model::parse(HOUSE).unwrap();
        let objects: Vec<_> = model
            .entities_of_type(IfcClass::IfcObject)
            .map(|e| e.id())
            .collect();
        assert_eq!(objects, vec![2, 3, 4, 5, 6, 7]);

        let door = model.entity(6).unwrap();
        assert_eq!(door.type_name(), "IfcDoor");
        assert!(door.is_a(IfcClass::IfcElement));
    }

    #[test]
    fn test_relationships_skip_unrecognized() {
        let model = Model::parse(HOUSE).unwrap();
        let ids: Vec<_> = model.relationships().map(|r| r.id).collect();
        assert_eq!(ids, vec![10, 11, 12, 13, 14, 15]);
    }

    #[test]
    fn test_containment_roles_resolved() {
        let model = Model::parse(HOUSE).unwrap();
        let rel = model.relationship(model.entity(13).unwrap()).unwrap();
        assert_eq!(rel.kind, RelationshipKind::ContainedInSpatialStructure);
        assert_eq!(rel.relating.as_ref().unwrap().id(), 4);
        let related: Vec<_> = rel.related.iter().map(|r| r.as_ref().unwrap().id()).collect();
        assert_eq!(related, vec![5, 6]);
    }

    #[test]
    fn test_dangling_reference_is_per_item() {
        let model = Model::parse(HOUSE).unwrap();
        let rel = model.relationship(model.entity(15).unwrap()).unwrap();
        assert_eq!(rel.related.len(), 2);
        assert!(matches!(rel.related[0], Err(Error::Reference { id: 99, .. })));
        assert_eq!(rel.related[1].as_ref().unwrap().id(), 7);
    }

    #[test]
    fn test_hierarchy_children_order() {
        let model = Model::parse(HOUSE).unwrap();
        let storey = model.entity(4).unwrap();
        let children: Vec<_> = model
            .hierarchy_children(storey)
            .unwrap()
            .into_iter()
            .map(|e| e.id())
            .collect();
        // contained elements first, then aggregated parts
        assert_eq!(children, vec![5, 6, 7]);

        let wall = model.entity(5).unwrap();
        assert!(model.hierarchy_children(wall).unwrap().is_empty());
    }

    #[test]
    fn test_unset_optional_role_is_skipped() {
        let model = Model::parse(indoc! {"
            DATA;
            #1=IFCSPACE('sp',$,$,$,$,$,$,$,.ELEMENT.,.INTERNAL.,$);
            #10=IFCRELSPACEBOUNDARY('b',$,$,$,#1,$,$,.VIRTUAL.,.INTERNAL.);
            ENDSEC;
        "})
        .unwrap();
        let rel = model.relationship(model.entity(10).unwrap()).unwrap();
        assert_eq!(rel.relating.as_ref().unwrap().id(), 1);
        assert!(rel.related.is_empty());
    }

    #[test]
    fn test_unknown_classes_in_roles_count_as_objects() {
        let model = Model::parse(indoc! {"
            DATA;
            #1=IFCSITE('s',$,$,$,$,$,$,$,.ELEMENT.,$,$,$,$,$);
            #2=IFCFUTUREWIDGET('x',$,$,$,$,$,$,$);
            #3=IFCFUTUREPOINT((0.,0.,0.));
            #10=IFCRELCONTAINEDINSPATIALSTRUCTURE('r',$,$,$,(#2),#1);
            ENDSEC;
        "})
        .unwrap();
        let objects: Vec<_> = model.objects().map(|e| e.id()).collect();
        assert_eq!(objects, vec![1, 2]);
        assert_eq!(model.entity(2).unwrap().class(), None);
        assert_eq!(model.entity(2).unwrap().type_name(), "IFCFUTUREWIDGET");

        let site = model.entity(1).unwrap();
        let children: Vec<_> = model
            .hierarchy_children(site)
            .unwrap()
            .into_iter()
            .map(|e| e.id())
            .collect();
        assert_eq!(children, vec![2]);
    }

    #[test]
    fn test_hierarchy_children_foreign_entity() {
        let model = Model::parse(HOUSE).unwrap();
        let stranger = Entity::new(500, "IFCWALL", vec![]);
        assert!(matches!(
            model.hierarchy_children(&stranger),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_open_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("house.ifc");
        std::fs::write(&path, HOUSE).unwrap();
        let model = Model::open(&path).unwrap();
        assert_eq!(model.len(), 14);
        assert_eq!(model.schema(), None);
    }
}
