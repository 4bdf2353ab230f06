//! Graphviz DOT export implementation.
//!
//! The output is meant to be piped straight into `dot`:
//!
//! ```text
//! digraph {
//! node [shape=box];
//! 1 [label="example.com/app"]
//! 2 [label="golang.org/x/text\nv0.3.2"]
//! 1 -> 2;
//! }
//! ```

use super::{Direction, Exporter, RenderOptions};
use crate::graph::ModuleGraph;
use std::io::{self, Write};

/// DOT exporter implementation.
pub struct DotExporter;

impl DotExporter {
    /// Escape a label for use inside a DOT double-quoted string.
    ///
    /// Line breaks become the `\n` escape, which Graphviz renders as a
    /// centered line.
    fn escape_label(value: &str) -> String {
        let mut escaped = String::with_capacity(value.len());
        for c in value.chars() {
            match c {
                '"' => escaped.push_str("\\\""),
                '\\' => escaped.push_str("\\\\"),
                '\n' => escaped.push_str("\\n"),
                _ => escaped.push(c),
            }
        }
        escaped
    }
}

impl Exporter for DotExporter {
    fn export<W: Write>(
        &self,
        graph: &ModuleGraph,
        options: &RenderOptions,
        writer: &mut W,
    ) -> io::Result<()> {
        writeln!(writer, "digraph {{")?;

        if Direction::for_graph(graph) == Direction::LeftToRight {
            writeln!(writer, "rankdir=LR;")?;
        }
        writeln!(writer, "node [shape=box];")?;

        for module in graph.modules().values() {
            writeln!(
                writer,
                "{} [label=\"{}\"]",
                module.id,
                Self::escape_label(&options.label(module))
            )?;
        }

        for (from, targets) in graph.dependencies() {
            for to in targets {
                writeln!(writer, "{} -> {};", from, to)?;
            }
        }

        writeln!(writer, "}}")
    }
}
