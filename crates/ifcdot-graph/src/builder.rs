//! Graph construction: entities → styled nodes, relationships → edges,
//! decomposition → nested clusters.
//!
//! A build is a pure function of the model and the interest set. When the
//! interest set is non-empty only its members are drawn, and every neighbour
//! one relationship away is reported in [`GraphOutput::expanded_interest`] so
//! the caller can grow the selection one hop per pass.

use std::collections::{BTreeSet, HashMap};

use ifcdot_core::{Error, Result};
use ifcdot_model::{Entity, EntityId, IfcClass, Model, Relationship};
use serde::Serialize;
use tracing::{debug, warn};

use crate::dot::DotWriter;
use crate::style::{EdgeStyle, NodeCategory};

/// Entity identifiers selecting the subgraph of interest. Empty = everything.
pub type InterestSet = BTreeSet<EntityId>;

/// Kind of a recoverable problem met during a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A relationship role does not resolve to an instance.
    UnresolvedReference,
    /// A decomposition subtree could not be walked.
    HierarchyLookup,
    /// An object of a class missing from the schema table; drawn with the
    /// default fill.
    UnknownClass,
}

/// A problem reported instead of aborting the build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// The instance the problem was found on.
    pub entity_id: EntityId,
    pub message: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
    pub clusters: usize,
    pub skipped_references: usize,
}

/// Result of one build pass.
#[derive(Debug, Clone)]
pub struct GraphOutput {
    pub dot: String,
    /// The input interest set plus every excluded one-hop neighbour.
    pub expanded_interest: InterestSet,
    pub diagnostics: Vec<Diagnostic>,
    pub stats: GraphStats,
}

/// Build the graph text for a model.
pub fn build_graph(model: &Model, interest: &InterestSet) -> GraphOutput {
    GraphBuilder::new(model, interest).build()
}

/// Run up to `hops` passes, feeding each pass's expanded interest set into the
/// next. Stops early once the set no longer grows. Returns the last pass.
pub fn expand(model: &Model, interest: &InterestSet, hops: usize) -> GraphOutput {
    let mut current = interest.clone();
    let mut output = build_graph(model, &current);
    for _ in 1..hops {
        if output.expanded_interest == current {
            break;
        }
        current = output.expanded_interest.clone();
        output = build_graph(model, &current);
    }
    output
}

/// Parse a user-supplied list of ids: `12, 34 #56`.
pub fn parse_interest(input: &str) -> Result<InterestSet> {
    input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .trim_start_matches('#')
                .parse::<EntityId>()
                .map_err(|_| Error::InvalidInput(format!("not an entity id: {token:?}")))
        })
        .collect()
}

pub(crate) struct GraphBuilder<'m> {
    pub(crate) model: &'m Model,
    pub(crate) interest: &'m InterestSet,
    pub(crate) labels: HashMap<EntityId, String>,
    pub(crate) dot: DotWriter,
    pub(crate) expanded: InterestSet,
    pub(crate) diagnostics: Vec<Diagnostic>,
    pub(crate) stats: GraphStats,
}

impl<'m> GraphBuilder<'m> {
    fn new(model: &'m Model, interest: &'m InterestSet) -> Self {
        Self {
            model,
            interest,
            labels: HashMap::new(),
            dot: DotWriter::new(),
            expanded: interest.clone(),
            diagnostics: Vec::new(),
            stats: GraphStats::default(),
        }
    }

    fn build(mut self) -> GraphOutput {
        self.emit_nodes();
        self.emit_edges();
        self.emit_clusters();

        debug!(
            "Graph built: {} nodes, {} edges, {} clusters, {} skipped references",
            self.stats.nodes, self.stats.edges, self.stats.clusters, self.stats.skipped_references
        );

        GraphOutput {
            dot: self.dot.finish(),
            expanded_interest: self.expanded,
            diagnostics: self.diagnostics,
            stats: self.stats,
        }
    }

    pub(crate) fn is_filtering(&self) -> bool {
        !self.interest.is_empty()
    }

    /// Whether an entity is drawn in this pass.
    pub(crate) fn is_visible(&self, id: EntityId) -> bool {
        !self.is_filtering() || self.interest.contains(&id)
    }

    /// Labels every accepted object before any edge is considered, then
    /// draws the visible ones.
    fn emit_nodes(&mut self) {
        let model = self.model;
        for entity in model.objects() {
            if is_placeholder(entity) {
                continue;
            }
            if entity.class().is_none() {
                self.unknown_class(entity);
            }

            let label = node_label(entity);
            if self.is_visible(entity.id()) {
                let fill = NodeCategory::classify(entity).fill();
                self.dot.node(&label, fill);
                self.stats.nodes += 1;
            }
            self.labels.insert(entity.id(), label);
        }
    }

    fn emit_edges(&mut self) {
        let model = self.model;
        for relationship in model.relationships() {
            self.emit_relationship(relationship);
        }
    }

    fn emit_relationship(&mut self, relationship: Relationship<'_>) {
        let style = EdgeStyle::for_kind(relationship.kind);
        let relating = match relationship.relating {
            Ok(relating) => relating,
            Err(e) => {
                self.unresolved(relationship.id, e);
                return;
            }
        };

        for related in relationship.related {
            match related {
                Ok(related) => self.consider_edge(relating, related, style),
                Err(e) => self.unresolved(relationship.id, e),
            }
        }
    }

    fn consider_edge(&mut self, relating: &Entity, related: &Entity, style: EdgeStyle) {
        let (a, b) = (relating.id(), related.id());
        // Endpoints without a label were excluded by classification; dropped silently.
        let (Some(from), Some(to)) = (self.labels.get(&a), self.labels.get(&b)) else {
            return;
        };

        if self.is_filtering() {
            match (self.interest.contains(&a), self.interest.contains(&b)) {
                (false, false) => return,
                (true, false) => {
                    self.expanded.insert(b);
                    return;
                }
                (false, true) => {
                    self.expanded.insert(a);
                    return;
                }
                (true, true) => {}
            }
        }

        self.dot.edge(from, to, style);
        self.stats.edges += 1;
    }

    fn unresolved(&mut self, relationship_id: EntityId, error: Error) {
        warn!("Relationship #{} item skipped: {}", relationship_id, error);
        self.stats.skipped_references += 1;
        self.diagnostics.push(Diagnostic {
            kind: DiagnosticKind::UnresolvedReference,
            entity_id: relationship_id,
            message: error.to_string(),
        });
    }

    fn unknown_class(&mut self, entity: &Entity) {
        warn!(
            "#{} has unknown class {}; drawn with the default style",
            entity.id(),
            entity.type_name()
        );
        self.diagnostics.push(Diagnostic {
            kind: DiagnosticKind::UnknownClass,
            entity_id: entity.id(),
            message: format!("unknown class {}", entity.type_name()),
        });
    }

    pub(crate) fn hierarchy_problem(&mut self, entity_id: EntityId, message: String) {
        warn!("Cluster for #{} skipped: {}", entity_id, message);
        self.diagnostics.push(Diagnostic {
            kind: DiagnosticKind::HierarchyLookup,
            entity_id,
            message,
        });
    }
}

/// `#42=IfcDoor`
pub fn node_label(entity: &Entity) -> String {
    format!("#{}={}", entity.id(), entity.type_name())
}

/// Virtual elements mark space boundaries; they are never drawn.
pub(crate) fn is_placeholder(entity: &Entity) -> bool {
    entity.is_a(IfcClass::IfcVirtualElement)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_interest() {
        let set = parse_interest("12, 34 #56\n12").unwrap();
        assert_eq!(set.into_iter().collect::<Vec<_>>(), vec![12, 34, 56]);
        assert!(parse_interest("").unwrap().is_empty());
        assert!(matches!(
            parse_interest("12, wall"),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_node_label() {
        let door = Entity::new(42, "IFCDOOR", vec![]);
        assert_eq!(node_label(&door), "#42=IfcDoor");
    }
}
