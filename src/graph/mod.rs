//! Graph module for module dependency modeling.
//!
//! This module provides the [`ModuleGraph`] struct, built from a stream of
//! `parent child` records such as the output of `go mod graph`.
//!
//! # Example
//!
//! ```rust
//! use modv::graph::{ModuleGraph, ParseOptions};
//!
//! let input = "example.com/app golang.org/x/text@v0.3.2\n\
//!              example.com/app rsc.io/quote@v1.5.2\n\
//!              rsc.io/quote@v1.5.2 golang.org/x/text@v0.3.2\n";
//!
//! let graph = ModuleGraph::parse(input.as_bytes(), &ParseOptions::default()).unwrap();
//!
//! assert_eq!(graph.module_count(), 3);
//! assert_eq!(graph.edge_count(), 3);
//! assert_eq!(graph.root_key(), Some("example.com/app"));
//! ```

mod module_graph;

pub use module_graph::{
    build, AdjacencyTable, GraphError, GraphResult, Module, ModuleGraph, ModuleTable, ParseOptions,
};
