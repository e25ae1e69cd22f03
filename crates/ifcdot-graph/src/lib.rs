//! ifcdot graph: relationship graphs of IFC models as Graphviz text, and
//! rendering of that text to images.

pub mod builder;
pub mod cluster;
pub mod dot;
pub mod render;
pub mod style;

pub use builder::{
    build_graph, expand, node_label, parse_interest, Diagnostic, DiagnosticKind, GraphOutput,
    GraphStats, InterestSet,
};
pub use cluster::MAX_CLUSTER_DEPTH;
pub use render::{GraphvizRenderer, OutputFormat, Renderer};
pub use style::{EdgeStyle, LineStyle, NodeCategory};
