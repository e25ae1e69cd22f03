//! Nested clusters for the decomposition hierarchy under each site.

use std::collections::HashSet;

use ifcdot_model::{Entity, EntityId, IfcClass};

use crate::builder::{is_placeholder, GraphBuilder};

/// Deepest decomposition level that is still wrapped in a cluster.
pub const MAX_CLUSTER_DEPTH: usize = 64;

impl GraphBuilder<'_> {
    pub(crate) fn emit_clusters(&mut self) {
        let model = self.model;
        for site in model.entities_of_type(IfcClass::IfcSite) {
            let mut path = HashSet::new();
            self.cluster(site, 0, &mut path);
        }
    }

    /// Emits one cluster block for `entity` (if it has children) and recurses
    /// into each visible child. `path` holds the ancestors being walked.
    fn cluster(&mut self, entity: &Entity, depth: usize, path: &mut HashSet<EntityId>) {
        if is_placeholder(entity) || !self.is_visible(entity.id()) {
            return;
        }

        if depth > MAX_CLUSTER_DEPTH {
            self.hierarchy_problem(
                entity.id(),
                format!("decomposition deeper than {MAX_CLUSTER_DEPTH} levels"),
            );
            return;
        }

        if !path.insert(entity.id()) {
            self.hierarchy_problem(entity.id(), "decomposition cycle".to_string());
            return;
        }

        self.cluster_children(entity, depth, path);
        path.remove(&entity.id());
    }

    fn cluster_children(&mut self, entity: &Entity, depth: usize, path: &mut HashSet<EntityId>) {
        let model = self.model;
        let children = match model.hierarchy_children(entity) {
            Ok(children) => children,
            Err(e) => {
                self.hierarchy_problem(entity.id(), e.to_string());
                return;
            }
        };

        if children.is_empty() {
            return;
        }
        let Some(root_label) = self.labels.get(&entity.id()).cloned() else {
            return;
        };

        self.dot.open_cluster(entity.id());
        self.dot.member(&root_label);

        for child in children {
            if is_placeholder(child) || !self.is_visible(child.id()) {
                continue;
            }
            // Children outside the labelled categories have no node to nest.
            let Some(child_label) = self.labels.get(&child.id()).cloned() else {
                continue;
            };
            self.dot.member(&child_label);
            self.cluster(child, depth + 1, path);
        }

        self.dot.close_cluster();
        self.stats.clusters += 1;
    }
}
