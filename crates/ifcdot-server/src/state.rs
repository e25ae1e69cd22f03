//! Shared application state.

use std::collections::HashMap;
use std::sync::Arc;

use ifcdot_core::IfcDotConfig;
use ifcdot_graph::{Diagnostic, GraphOutput, GraphvizRenderer, InterestSet, Renderer};
use ifcdot_model::Model;
use parking_lot::RwLock;
use serde::Serialize;

/// How many graphs are kept in memory before the oldest are dropped.
pub const MAX_RETAINED_GRAPHS: usize = 32;

/// Everything produced by one build: the model it came from, the graph text
/// and whichever images could be rendered.
#[derive(Debug)]
pub struct GraphArtifacts {
    pub id: String,
    pub filename: String,
    pub model: Arc<Model>,
    pub interest: InterestSet,
    pub output: GraphOutput,
    pub png: Option<Vec<u8>>,
    pub svg: Option<Vec<u8>>,
    pub warnings: Vec<String>,
    pub created_at: i64,
}

/// What the API reports about a stored graph.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphSummary {
    pub id: String,
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    pub entities: usize,
    pub nodes: usize,
    pub edges: usize,
    pub clusters: usize,
    pub interest: Vec<u64>,
    pub expanded_interest: Vec<u64>,
    pub diagnostics: Vec<Diagnostic>,
    pub image_available: bool,
    pub warnings: Vec<String>,
    pub created_at: i64,
}

impl GraphArtifacts {
    pub fn summary(&self) -> GraphSummary {
        GraphSummary {
            id: self.id.clone(),
            filename: self.filename.clone(),
            schema: self.model.schema().map(str::to_string),
            entities: self.model.len(),
            nodes: self.output.stats.nodes,
            edges: self.output.stats.edges,
            clusters: self.output.stats.clusters,
            interest: self.interest.iter().copied().collect(),
            expanded_interest: self.output.expanded_interest.iter().copied().collect(),
            diagnostics: self.output.diagnostics.clone(),
            image_available: self.png.is_some(),
            warnings: self.warnings.clone(),
            created_at: self.created_at,
        }
    }

    /// An unfiltered graph has nothing to expand.
    pub fn is_filtered(&self) -> bool {
        !self.interest.is_empty()
    }
}

/// Shared application state accessible from all route handlers.
pub struct AppState {
    pub config: IfcDotConfig,
    pub renderer: Arc<dyn Renderer>,
    pub http: reqwest::Client,
    pub graphs: RwLock<HashMap<String, Arc<GraphArtifacts>>>,
}

impl AppState {
    pub fn new(config: IfcDotConfig) -> Self {
        let renderer = Arc::new(GraphvizRenderer::new(config.dot_path.clone()));
        Self::with_renderer(config, renderer)
    }

    pub fn with_renderer(config: IfcDotConfig, renderer: Arc<dyn Renderer>) -> Self {
        Self {
            config,
            renderer,
            http: reqwest::Client::new(),
            graphs: RwLock::new(HashMap::new()),
        }
    }

    pub fn graph(&self, id: &str) -> Option<Arc<GraphArtifacts>> {
        self.graphs.read().get(id).cloned()
    }

    /// Store a graph, dropping the oldest ones beyond the retention limit.
    pub fn insert_graph(&self, artifacts: GraphArtifacts) -> Arc<GraphArtifacts> {
        let artifacts = Arc::new(artifacts);
        let mut graphs = self.graphs.write();
        graphs.insert(artifacts.id.clone(), artifacts.clone());

        if graphs.len() > MAX_RETAINED_GRAPHS {
            let mut by_age: Vec<(i64, String)> = graphs
                .values()
                .map(|g| (g.created_at, g.id.clone()))
                .collect();
            by_age.sort();
            let excess = graphs.len() - MAX_RETAINED_GRAPHS;
            for (_, id) in by_age.into_iter().take(excess) {
                graphs.remove(&id);
            }
        }

        artifacts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ifcdot_graph::build_graph;

    fn artifacts(id: &str, created_at: i64) -> GraphArtifacts {
        let model = Arc::new(Model::from_entities(None, Vec::new()));
        let output = build_graph(&model, &InterestSet::new());
        GraphArtifacts {
            id: id.to_string(),
            filename: "model.ifc".to_string(),
            model,
            interest: InterestSet::new(),
            output,
            png: None,
            svg: None,
            warnings: Vec::new(),
            created_at,
        }
    }

    fn state() -> (tempfile::TempDir, AppState) {
        let dir = tempfile::tempdir().unwrap();
        let config = IfcDotConfig::from_env(dir.path()).unwrap();
        (dir, AppState::new(config))
    }

    #[test]
    fn test_oldest_graphs_are_evicted() {
        let (_dir, state) = state();
        for i in 0..(MAX_RETAINED_GRAPHS as i64 + 3) {
            state.insert_graph(artifacts(&format!("g{i}"), i));
        }

        assert_eq!(state.graphs.read().len(), MAX_RETAINED_GRAPHS);
        assert!(state.graph("g0").is_none());
        assert!(state.graph("g2").is_none());
        assert!(state.graph("g3").is_some());
    }

    #[test]
    fn test_summary_of_empty_model() {
        let summary = artifacts("g", 7).summary();
        assert_eq!(summary.nodes, 0);
        assert!(!summary.image_available);
        let json = serde_json::to_value(&summary).unwrap();
        assert!(json.get("expandedInterest").is_some());
        assert!(json.get("schema").is_none());
    }
}
