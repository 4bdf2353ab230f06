//! JSON export implementation.
//!
//! Exports the module graph in JSON format for machine-readable output.

use super::{Direction, Exporter, RenderOptions};
use crate::graph::ModuleGraph;
use serde::Serialize;
use std::io::{self, Write};

/// JSON exporter implementation.
pub struct JsonExporter;

/// Serializable module for JSON output.
#[derive(Serialize)]
struct JsonModule<'a> {
    id: usize,
    key: &'a str,
    path: &'a str,
    name: &'a str,
    version: &'a str,
    label: String,
}

/// Serializable edge for JSON output.
#[derive(Serialize)]
struct JsonEdge {
    from: usize,
    to: usize,
}

/// Summary statistics for JSON output.
#[derive(Serialize)]
struct JsonSummary {
    modules: usize,
    edges: usize,
    sources: usize,
}

/// Root JSON export structure.
#[derive(Serialize)]
struct JsonExport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    root: Option<&'a str>,
    rankdir: &'static str,
    summary: JsonSummary,
    modules: Vec<JsonModule<'a>>,
    edges: Vec<JsonEdge>,
}

impl Exporter for JsonExporter {
    fn export<W: Write>(
        &self,
        graph: &ModuleGraph,
        options: &RenderOptions,
        writer: &mut W,
    ) -> io::Result<()> {
        let modules: Vec<JsonModule<'_>> = graph
            .modules()
            .iter()
            .map(|(key, module)| JsonModule {
                id: module.id,
                key: key.as_str(),
                path: &module.path,
                name: &module.name,
                version: &module.version,
                label: options.label(module),
            })
            .collect();

        let edges: Vec<JsonEdge> = graph
            .dependencies()
            .iter()
            .flat_map(|(&from, targets)| targets.iter().map(move |&to| JsonEdge { from, to }))
            .collect();

        let export = JsonExport {
            root: graph.root_key(),
            rankdir: Direction::for_graph(graph).rankdir(),
            summary: JsonSummary {
                modules: graph.module_count(),
                edges: graph.edge_count(),
                sources: graph.source_count(),
            },
            modules,
            edges,
        };

        let json = serde_json::to_string_pretty(&export)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        writeln!(writer, "{}", json)
    }
}
