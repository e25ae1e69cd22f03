//! Graph text writer. One statement per line.

use std::fmt::Write;

use crate::style::EdgeStyle;

/// Accumulates a strict undirected graph description.
#[derive(Debug, Default)]
pub struct DotWriter {
    out: String,
}

impl DotWriter {
    /// Starts the graph with the global layout attributes.
    pub fn new() -> Self {
        let mut writer = Self::default();
        writer.out.push_str("strict graph G {\n");
        writer
            .out
            .push_str("graph [overlap=false,splines=true,rankdir=TB];\n");
        writer
    }

    pub fn node(&mut self, label: &str, fill: &str) {
        let _ = writeln!(self.out, "\"{label}\" [color=\"{fill}\",style=filled];");
    }

    pub fn edge(&mut self, from: &str, to: &str, style: EdgeStyle) {
        let _ = writeln!(
            self.out,
            "\"{from}\"--\"{to}\" [weight={},style={}];",
            style.weight, style.line
        );
    }

    pub fn open_cluster(&mut self, id: u64) {
        let _ = writeln!(self.out, "subgraph id_{id} {{");
        self.out.push_str("cluster=true;\n");
    }

    pub fn member(&mut self, label: &str) {
        let _ = writeln!(self.out, "\"{label}\";");
    }

    pub fn close_cluster(&mut self) {
        self.out.push_str("}\n");
    }

    /// Closes the graph and returns its text.
    pub fn finish(mut self) -> String {
        self.out.push_str("}\n");
        self.out
    }
}
