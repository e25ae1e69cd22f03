//! `ifcdot render`: build a graph from a model on disk without the server.

use std::path::PathBuf;

use ifcdot_core::{Error, Result};
use ifcdot_graph::{expand, parse_interest, InterestSet, OutputFormat, Renderer};
use ifcdot_model::Model;

use crate::pipeline::RENDERER_MISSING_WARNING;

pub const DOT_FILE: &str = "output_graph.dot";
pub const PNG_FILE: &str = "output_graph.png";

pub const RENDER_USAGE: &str =
    "Usage: ifcdot render <model.ifc> [out-dir] [--interest ids] [--hops n]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderArgs {
    pub model: PathBuf,
    pub out_dir: PathBuf,
    pub interest: InterestSet,
    pub hops: usize,
}

impl RenderArgs {
    /// Parse the arguments following `render`.
    pub fn parse(args: &[String]) -> Result<Self> {
        let mut positional = Vec::new();
        let mut interest = InterestSet::new();
        let mut hops = 1;

        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--interest" => {
                    let value = iter.next().ok_or_else(|| missing_value("--interest"))?;
                    interest = parse_interest(value)?;
                }
                "--hops" => {
                    let value = iter.next().ok_or_else(|| missing_value("--hops"))?;
                    hops = value
                        .parse()
                        .map_err(|_| Error::InvalidInput(format!("--hops expects a number, got {value:?}")))?;
                }
                flag if flag.starts_with("--") => {
                    return Err(Error::InvalidInput(format!("unknown option {flag}")));
                }
                _ => positional.push(PathBuf::from(arg)),
            }
        }

        let mut positional = positional.into_iter();
        let model = positional
            .next()
            .ok_or_else(|| Error::InvalidInput("missing model path".to_string()))?;
        let out_dir = positional.next().unwrap_or_else(|| PathBuf::from("."));
        if let Some(extra) = positional.next() {
            return Err(Error::InvalidInput(format!(
                "unexpected argument {}",
                extra.display()
            )));
        }

        Ok(Self {
            model,
            out_dir,
            interest,
            hops,
        })
    }
}

fn missing_value(flag: &str) -> Error {
    Error::InvalidInput(format!("{flag} expects a value"))
}

#[derive(Debug)]
pub struct RenderReport {
    pub dot_path: PathBuf,
    pub png_path: Option<PathBuf>,
    pub entities: usize,
    pub nodes: usize,
    pub edges: usize,
    pub clusters: usize,
    pub filtered: bool,
    pub expanded_interest: InterestSet,
    pub diagnostics: usize,
    pub warnings: Vec<String>,
}

/// Load the model, build the graph and write the artifacts to `out_dir`.
pub fn run_render(args: &RenderArgs, renderer: &dyn Renderer) -> Result<RenderReport> {
    let model = Model::open(&args.model)?;
    let output = expand(&model, &args.interest, args.hops);

    std::fs::create_dir_all(&args.out_dir)?;
    let dot_path = args.out_dir.join(DOT_FILE);
    std::fs::write(&dot_path, &output.dot)?;

    let mut warnings = Vec::new();
    let png_path = match renderer.render(&output.dot, OutputFormat::Png) {
        Ok(png) => {
            let path = args.out_dir.join(PNG_FILE);
            std::fs::write(&path, png)?;
            Some(path)
        }
        Err(e) if e.is_renderer_missing() => {
            warnings.push(RENDERER_MISSING_WARNING.to_string());
            None
        }
        Err(e) => return Err(e),
    };

    Ok(RenderReport {
        dot_path,
        png_path,
        entities: model.len(),
        nodes: output.stats.nodes,
        edges: output.stats.edges,
        clusters: output.stats.clusters,
        filtered: !args.interest.is_empty(),
        expanded_interest: output.expanded_interest,
        diagnostics: output.diagnostics.len(),
        warnings,
    })
}

pub fn print_report(report: &RenderReport) {
    println!("Entities:           {}", report.entities);
    println!("Nodes:              {}", report.nodes);
    println!("Edges:              {}", report.edges);
    println!("Clusters:           {}", report.clusters);
    println!("Diagnostics:        {}", report.diagnostics);
    println!("Graph text:         {}", report.dot_path.display());
    println!(
        "Graph image:        {}",
        report
            .png_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "not rendered".to_string())
    );

    if report.filtered {
        let ids: Vec<String> = report.expanded_interest.iter().map(u64::to_string).collect();
        println!("Next interest set:  {}", ids.join(","));
    }

    if !report.warnings.is_empty() {
        println!();
        println!("Warnings:");
        for w in &report.warnings {
            println!("  - {}", w);
        }
    }
}
