//! Model bytes → graph artifacts. Blocking work; callers run it on the
//! blocking pool.

use std::sync::Arc;

use ifcdot_core::{Error, Result};
use ifcdot_graph::{build_graph, GraphOutput, InterestSet, OutputFormat, Renderer};
use ifcdot_model::Model;
use tracing::{error, info, warn};

use crate::state::GraphArtifacts;

/// Shown when images are skipped because Graphviz is absent.
pub const RENDERER_MISSING_WARNING: &str =
    "Graphviz executable not found. Ensure that Graphviz is installed and added to the system PATH.";

const RENDER_FAILED_WARNING: &str = "The graph image could not be rendered.";

/// Parse a model and build its artifacts.
pub fn build_from_bytes(
    renderer: &dyn Renderer,
    filename: String,
    bytes: &[u8],
    interest: InterestSet,
) -> Result<GraphArtifacts> {
    let model = Model::from_bytes(bytes)?;
    if model.is_empty() {
        return Err(Error::parse(0, "no entity instances found"));
    }
    info!(
        "Loaded {} ({} entities, schema {})",
        filename,
        model.len(),
        model.schema().unwrap_or("unknown")
    );
    Ok(build_artifacts(renderer, Arc::new(model), filename, interest))
}

/// One build pass plus rendering. Never fails: rendering problems become
/// warnings and the graph text is always kept.
pub fn build_artifacts(
    renderer: &dyn Renderer,
    model: Arc<Model>,
    filename: String,
    interest: InterestSet,
) -> GraphArtifacts {
    let output = build_graph(&model, &interest);
    let mut warnings = Vec::new();

    let png = render(renderer, &output, OutputFormat::Png, &mut warnings);
    // No point trying again once the tool is known to be missing.
    let svg = if png.is_some() {
        render(renderer, &output, OutputFormat::Svg, &mut warnings)
    } else {
        None
    };

    GraphArtifacts {
        id: uuid::Uuid::new_v4().to_string(),
        filename,
        model,
        interest,
        output,
        png,
        svg,
        warnings,
        created_at: chrono::Utc::now().timestamp_millis(),
    }
}

fn render(
    renderer: &dyn Renderer,
    output: &GraphOutput,
    format: OutputFormat,
    warnings: &mut Vec<String>,
) -> Option<Vec<u8>> {
    match renderer.render(&output.dot, format) {
        Ok(bytes) => Some(bytes),
        Err(e) if e.is_renderer_missing() => {
            warn!("Skipping {} rendering: {}", format.as_arg(), e);
            push_once(warnings, RENDERER_MISSING_WARNING);
            None
        }
        Err(e) => {
            error!("Rendering {} failed: {}", format.as_arg(), e);
            push_once(warnings, RENDER_FAILED_WARNING);
            None
        }
    }
}

fn push_once(warnings: &mut Vec<String>, warning: &str) {
    if !warnings.iter().any(|w| w == warning) {
        warnings.push(warning.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MissingRenderer;

    impl Renderer for MissingRenderer {
        fn render(&self, _dot: &str, _format: OutputFormat) -> Result<Vec<u8>> {
            Err(Error::RendererNotFound("dot".to_string()))
        }

        fn is_available(&self) -> bool {
            false
        }
    }

    struct EchoRenderer;

    impl Renderer for EchoRenderer {
        fn render(&self, dot: &str, format: OutputFormat) -> Result<Vec<u8>> {
            Ok(format!("{}:{}", format.as_arg(), dot.len()).into_bytes())
        }

        fn is_available(&self) -> bool {
            true
        }
    }

    const SITE_AND_WALL: &str = "ISO-10303-21;\nHEADER;\nFILE_SCHEMA(('IFC4'));\nENDSEC;\nDATA;\n\
        #1=IFCSITE('s',$,$,$,$,$,$,$,$,$,$,$,$,$);\n\
        #2=IFCWALL('w',$,$,$,$,$,$,$,$);\n\
        #3=IFCRELCONTAINEDINSPATIALSTRUCTURE('r',$,$,$,(#2),#1);\n\
        ENDSEC;\nEND-ISO-10303-21;\n";

    #[test]
    fn test_missing_renderer_keeps_dot() {
        let artifacts = build_from_bytes(
            &MissingRenderer,
            "house.ifc".to_string(),
            SITE_AND_WALL.as_bytes(),
            InterestSet::new(),
        )
        .unwrap();

        assert!(artifacts.png.is_none());
        assert!(artifacts.svg.is_none());
        assert_eq!(artifacts.warnings, vec![RENDERER_MISSING_WARNING.to_string()]);
        assert!(artifacts.output.dot.contains("\"#2=IfcWall\""));
        assert_eq!(artifacts.summary().schema.as_deref(), Some("IFC4"));
    }

    #[test]
    fn test_renders_both_formats() {
        let artifacts = build_from_bytes(
            &EchoRenderer,
            "house.ifc".to_string(),
            SITE_AND_WALL.as_bytes(),
            InterestSet::new(),
        )
        .unwrap();

        assert!(artifacts.warnings.is_empty());
        assert!(artifacts.png.unwrap().starts_with(b"png:"));
        assert!(artifacts.svg.unwrap().starts_with(b"svg:"));
    }

    #[test]
    fn test_unparseable_model_is_an_error() {
        let result = build_from_bytes(
            &EchoRenderer,
            "junk.ifc".to_string(),
            b"DATA;\n#1=IFCWALL(;\nENDSEC;",
            InterestSet::new(),
        );
        assert!(result.is_err());

        let empty = build_from_bytes(
            &EchoRenderer,
            "notes.txt".to_string(),
            b"just some notes",
            InterestSet::new(),
        );
        assert!(matches!(empty, Err(Error::Parse { .. })));
    }
}
