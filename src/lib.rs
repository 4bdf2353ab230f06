//! modv - dependency graph visualizer for `go mod graph` style listings
//!
//! This crate turns `parent child` module records into a Graphviz DOT
//! description, with optional version folding, module exclusion and
//! indirect-dependency suppression.
//!
//! ```rust
//! use modv::export::{render, RenderOptions};
//! use modv::graph::{ModuleGraph, ParseOptions};
//!
//! let graph = ModuleGraph::parse("a b\nb c\n".as_bytes(), &ParseOptions::default()).unwrap();
//!
//! let mut dot = Vec::new();
//! render(&graph, &RenderOptions::default(), &mut dot).unwrap();
//! assert!(String::from_utf8(dot).unwrap().contains("1 -> 2;"));
//! ```

pub mod export;
pub mod graph;
pub mod logger;
pub mod parser;
