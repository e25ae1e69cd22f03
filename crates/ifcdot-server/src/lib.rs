//! ifcdot: web utility that turns an IFC model into a relationship graph.

pub mod cli;
pub mod examples;
pub mod pipeline;
pub mod routes;
pub mod state;
