//! ifcdot: IFC relationship graphs, served over HTTP or rendered from the CLI.

use std::path::PathBuf;
use std::sync::Arc;

use ifcdot_core::IfcDotConfig;
use ifcdot_graph::GraphvizRenderer;
use ifcdot_server::cli::{self, RenderArgs};
use ifcdot_server::routes;
use ifcdot_server::state::AppState;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn resolve_data_dir() -> PathBuf {
    std::env::var("IFCDOT_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        match args[1].as_str() {
            "render" => {
                let render_args = match RenderArgs::parse(&args[2..]) {
                    Ok(render_args) => render_args,
                    Err(e) => {
                        eprintln!("{}", e);
                        eprintln!("{}", cli::RENDER_USAGE);
                        std::process::exit(1);
                    }
                };
                let dot_path = std::env::var("IFCDOT_DOT_PATH").ok().map(PathBuf::from);
                let renderer = GraphvizRenderer::new(dot_path);
                let report = cli::run_render(&render_args, &renderer)?;
                cli::print_report(&report);
                return Ok(());
            }
            "--help" | "-h" | "help" => {
                println!("ifcdot: relationship graphs of IFC models");
                println!();
                println!("Usage: ifcdot [command]");
                println!();
                println!("Commands:");
                println!("  (none)                                  Start the server");
                println!("  render <model> [out-dir] [--interest ids] [--hops n]");
                println!("                                          Write output_graph.dot/.png");
                println!("  help                                    Show this help message");
                return Ok(());
            }
            _ => {
                eprintln!("Unknown command: {}. Use 'ifcdot help' for usage.", args[1]);
                std::process::exit(1);
            }
        }
    }

    let data_dir = resolve_data_dir();
    info!("Data directory: {}", data_dir.display());

    let config = IfcDotConfig::from_env(&data_dir)?;
    let port = config.port;
    info!("{} example model(s) configured", config.examples.len());

    let state = Arc::new(AppState::new(config));
    if !state.renderer.is_available() {
        warn!("Graphviz not found; graphs will be served as DOT text only");
    }

    let app = routes::build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("ifcdot server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
