//! Export functionality for module graphs.
//!
//! This module provides exporters for writing a [`ModuleGraph`] as a
//! Graphviz DOT description (for piping into `dot`) or as JSON.

pub mod dot;
pub mod json;

use crate::graph::{Module, ModuleGraph};
use std::io::{self, Write};

/// Graphs with more source modules than this are laid out left to right.
pub const HORIZONTAL_LAYOUT_THRESHOLD: usize = 15;

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Graphviz DOT - input for `dot -T svg`
    #[default]
    Dot,
    /// JSON format - machine-readable, full data
    Json,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dot" | "graphviz" => Ok(ExportFormat::Dot),
            "json" => Ok(ExportFormat::Json),
            _ => Err(format!(
                "Unknown export format: '{}'. Valid formats: dot, json",
                s
            )),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Dot => write!(f, "dot"),
            ExportFormat::Json => write!(f, "json"),
        }
    }
}

/// Layout direction hint for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Default Graphviz layout
    TopToBottom,
    /// `rankdir=LR`, used for wide graphs
    LeftToRight,
}

impl Direction {
    /// Picks the direction for a graph based on its number of source modules.
    pub fn for_graph(graph: &ModuleGraph) -> Self {
        if graph.source_count() > HORIZONTAL_LAYOUT_THRESHOLD {
            Direction::LeftToRight
        } else {
            Direction::TopToBottom
        }
    }

    /// Graphviz `rankdir` value.
    pub fn rankdir(&self) -> &'static str {
        match self {
            Direction::TopToBottom => "TB",
            Direction::LeftToRight => "LR",
        }
    }
}

/// Controls how module labels are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Show only the module name, without its path
    pub hide_path: bool,
    /// Leave the version line out of labels
    pub hide_version: bool,
}

impl RenderOptions {
    /// Builds the display label for a module.
    ///
    /// The label is `path/name`, followed by a line break and the version.
    /// Empty components are left out along with their separator.
    ///
    /// ```
    /// use modv::export::RenderOptions;
    /// use modv::graph::Module;
    ///
    /// let module = Module::new(1, "golang.org/x/sys@v0.1.0");
    ///
    /// assert_eq!(RenderOptions::default().label(&module), "golang.org/x/sys\nv0.1.0");
    ///
    /// let options = RenderOptions { hide_path: true, hide_version: true };
    /// assert_eq!(options.label(&module), "sys");
    /// ```
    pub fn label(&self, module: &Module) -> String {
        let mut label = String::new();
        if !self.hide_path && !module.path.is_empty() {
            label.push_str(&module.path);
            label.push('/');
        }
        label.push_str(&module.name);
        if !self.hide_version && !module.version.is_empty() {
            label.push('\n');
            label.push_str(&module.version);
        }
        label
    }
}

/// Trait for exporters.
pub trait Exporter {
    /// Export the graph to the given writer.
    fn export<W: Write>(
        &self,
        graph: &ModuleGraph,
        options: &RenderOptions,
        writer: &mut W,
    ) -> io::Result<()>;
}

/// Export a graph in the specified format.
pub fn export<W: Write>(
    format: ExportFormat,
    graph: &ModuleGraph,
    options: &RenderOptions,
    writer: &mut W,
) -> io::Result<()> {
    match format {
        ExportFormat::Dot => dot::DotExporter.export(graph, options, writer),
        ExportFormat::Json => json::JsonExporter.export(graph, options, writer),
    }
}

/// Render a graph as Graphviz DOT.
pub fn render<W: Write>(
    graph: &ModuleGraph,
    options: &RenderOptions,
    writer: &mut W,
) -> io::Result<()> {
    dot::DotExporter.export(graph, options, writer)
}

/// Export a graph to a string.
pub fn export_to_string(
    format: ExportFormat,
    graph: &ModuleGraph,
    options: &RenderOptions,
) -> io::Result<String> {
    let mut buffer = Vec::new();
    export(format, graph, options, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
