//! Module graph construction from `parent child` edge listings.
//!
//! Modules are identified by a *module key*: the raw identifier, or the
//! identifier without its `@version` suffix when versions are folded. Every
//! distinct key gets a serial id, starting at 1, in the order it is first seen.
//! Edges are stored per source id, deduplicated, in insertion order.

use std::collections::HashSet;
use std::io::BufRead;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::parser::{identifier, EdgeRecord, ModuleParts};

/// Errors that can occur while building a module graph.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// A non-blank line did not contain two whitespace-separated identifiers.
    #[error("Malformed record on line {line}: expected `<module> <dependency>`, got {record:?}")]
    MalformedRecord { line: usize, record: String },

    /// The input stream could not be read.
    #[error("Failed to read input: {0}")]
    Read(#[from] std::io::Error),
}

/// Result type alias for graph building.
pub type GraphResult<T> = Result<T, GraphError>;

/// Modules keyed by module key, in first-seen (and therefore id) order.
pub type ModuleTable = IndexMap<String, Module>;

/// Target module ids keyed by source module id, in insertion order.
pub type AdjacencyTable = IndexMap<usize, Vec<usize>>;

/// A node in the module graph.
///
/// The fields come from the raw identifier that first produced the module's
/// key. With version folding, later identifiers with other versions reuse
/// this module unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    /// Serial id, unique within a graph, starting at 1
    pub id: usize,
    /// Everything before the last `/` (e.g. "golang.org/x")
    pub path: String,
    /// Final path segment (e.g. "sys")
    pub name: String,
    /// Version after the last `@` (e.g. "v0.3.2"), empty if absent
    pub version: String,
}

impl Module {
    /// Creates a module by splitting a raw identifier.
    ///
    /// ```
    /// use modv::graph::Module;
    ///
    /// let module = Module::new(1, "github.com/fatih/color@v1.7.0");
    /// assert_eq!(module.path, "github.com/fatih");
    /// assert_eq!(module.name, "color");
    /// assert_eq!(module.version, "v1.7.0");
    /// ```
    pub fn new(id: usize, raw: &str) -> Self {
        let parts = ModuleParts::parse(raw);
        Self {
            id,
            path: parts.path.to_string(),
            name: parts.name.to_string(),
            version: parts.version.to_string(),
        }
    }
}

/// Filtering and folding policy applied while building the graph.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Treat identifiers that differ only by version as the same module
    pub fold_versions: bool,
    /// Module keys to leave out of the graph, along with their edges
    pub excluded_modules: HashSet<String>,
    /// Drop every record whose parent is not the root module
    pub skip_indirect: bool,
}

impl ParseOptions {
    /// Creates options with every policy disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds modules to the exclusion set.
    ///
    /// Keys are matched against module keys, so with version folding enabled
    /// they should be given without a version.
    pub fn with_excluded_modules<I, S>(mut self, modules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_modules
            .extend(modules.into_iter().map(Into::into));
        self
    }

    /// Returns the module key for a raw identifier under this policy.
    pub fn module_key<'a>(&self, raw: &'a str) -> &'a str {
        if self.fold_versions {
            identifier::without_version(raw)
        } else {
            raw
        }
    }

    /// Returns true if the given module key is excluded.
    pub fn is_excluded(&self, key: &str) -> bool {
        self.excluded_modules.contains(key)
    }
}

/// A deduplicated graph of module dependencies.
///
/// # Example
///
/// ```rust
/// use modv::graph::{ModuleGraph, ParseOptions};
///
/// let input = "a b\na c\nb c\n";
/// let graph = ModuleGraph::parse(input.as_bytes(), &ParseOptions::default()).unwrap();
///
/// assert_eq!(graph.module_count(), 3);
/// assert_eq!(graph.edge_count(), 3);
/// assert_eq!(graph.dependencies_of(1), &[2, 3]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ModuleGraph {
    modules: ModuleTable,
    dependencies: AdjacencyTable,
    /// Key of the parent on the first record
    root_key: Option<String>,
}

impl ModuleGraph {
    /// Creates a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from a stream of `parent child` lines.
    ///
    /// Reading stops at end of stream. Bytes that are not valid UTF-8 are
    /// replaced with U+FFFD. Blank lines are skipped; any other line without
    /// two identifiers aborts the build with [`GraphError::MalformedRecord`].
    pub fn parse<R: BufRead>(mut reader: R, options: &ParseOptions) -> GraphResult<Self> {
        let mut graph = Self::new();
        let mut buffer = Vec::new();
        let mut line_number = 0;

        loop {
            buffer.clear();
            if reader.read_until(b'\n', &mut buffer)? == 0 {
                break;
            }
            line_number += 1;

            // Invalid UTF-8 is replaced rather than rejected.
            let line = String::from_utf8_lossy(&buffer);
            if line.trim().is_empty() {
                continue;
            }

            let record = EdgeRecord::parse(&line).ok_or_else(|| GraphError::MalformedRecord {
                line: line_number,
                record: line.trim().to_string(),
            })?;
            graph.add_record(record, options);
        }

        debug!(
            lines = line_number,
            modules = graph.module_count(),
            edges = graph.edge_count(),
            "built module graph"
        );
        Ok(graph)
    }

    /// Applies one edge record to the graph.
    ///
    /// The first record ever added fixes the root module. Returns `true` if a
    /// new edge was recorded.
    pub fn add_record(&mut self, record: EdgeRecord<'_>, options: &ParseOptions) -> bool {
        let parent_key = options.module_key(record.parent);
        let child_key = options.module_key(record.child);

        let root_key = self.root_key.get_or_insert_with(|| {
            debug!(root = parent_key, "detected root module");
            parent_key.to_string()
        });

        if options.skip_indirect && root_key.as_str() != parent_key {
            trace!(parent = parent_key, child = child_key, "skipping indirect record");
            return false;
        }

        let from = self.resolve_module(record.parent, parent_key, options);
        let to = self.resolve_module(record.child, child_key, options);

        match (from, to) {
            (Some(from), Some(to)) => self.add_dependency(from, to),
            _ => false,
        }
    }

    /// Looks up or creates the module for `key`, returning its id.
    ///
    /// Excluded keys produce no module.
    fn resolve_module(&mut self, raw: &str, key: &str, options: &ParseOptions) -> Option<usize> {
        if options.is_excluded(key) {
            trace!(module = key, "skipping excluded module");
            return None;
        }

        if let Some(module) = self.modules.get(key) {
            return Some(module.id);
        }

        let id = self.modules.len() + 1;
        trace!(id, module = raw, "adding module");
        self.modules.insert(key.to_string(), Module::new(id, raw));
        Some(id)
    }

    /// Records the edge `from -> to` unless it already exists.
    fn add_dependency(&mut self, from: usize, to: usize) -> bool {
        let targets = self.dependencies.entry(from).or_default();
        // Targets are unique per source.
        if targets.contains(&to) {
            return false;
        }
        targets.push(to);
        true
    }

    /// Returns the module table, in id order.
    pub fn modules(&self) -> &ModuleTable {
        &self.modules
    }

    /// Returns the adjacency table, in insertion order.
    pub fn dependencies(&self) -> &AdjacencyTable {
        &self.dependencies
    }

    /// Returns the targets recorded for `from`, in insertion order.
    pub fn dependencies_of(&self, from: usize) -> &[usize] {
        self.dependencies
            .get(&from)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Gets a module by its key.
    pub fn module(&self, key: &str) -> Option<&Module> {
        self.modules.get(key)
    }

    /// Gets a module by its id.
    pub fn module_by_id(&self, id: usize) -> Option<&Module> {
        // Ids are assigned as `position + 1` and modules are never removed.
        let index = id.checked_sub(1)?;
        self.modules.get_index(index).map(|(_, module)| module)
    }

    /// Returns true if a module with this key is in the graph.
    pub fn contains(&self, key: &str) -> bool {
        self.modules.contains_key(key)
    }

    /// Returns true if the edge `from -> to` is recorded.
    pub fn has_dependency(&self, from: usize, to: usize) -> bool {
        self.dependencies
            .get(&from)
            .is_some_and(|targets| targets.contains(&to))
    }

    /// The root module key, taken from the first record's parent.
    pub fn root_key(&self) -> Option<&str> {
        self.root_key.as_deref()
    }

    /// Number of modules in the graph.
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    /// Number of distinct edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.dependencies.values().map(Vec::len).sum()
    }

    /// Number of modules with at least one outgoing edge.
    pub fn source_count(&self) -> usize {
        self.dependencies.len()
    }

    /// Returns true if the graph has no modules.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Consumes the graph, returning its module and adjacency tables.
    pub fn into_parts(self) -> (ModuleTable, AdjacencyTable) {
        (self.modules, self.dependencies)
    }
}

/// Builds a [`ModuleGraph`] from a stream of `parent child` lines.
///
/// Shorthand for [`ModuleGraph::parse`].
pub fn build<R: BufRead>(reader: R, options: &ParseOptions) -> GraphResult<ModuleGraph> {
    ModuleGraph::parse(reader, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, BufReader, Read};

    const TESTMOD: &str = "github.com/poloxue/testmod golang.org/x/text@v0.3.2
github.com/poloxue/testmod rsc.io/quote/v3@v3.1.0
github.com/poloxue/testmod rsc.io/sampler@v1.3.1
golang.org/x/text@v0.3.2 golang.org/x/tools@v0.0.0-20180917221912-90fa682c2a6e
rsc.io/quote/v3@v3.1.0 rsc.io/sampler@v1.3.0
rsc.io/sampler@v1.3.1 golang.org/x/text@v0.0.0-20170915032832-14c0d48ead0c
rsc.io/sampler@v1.3.0 golang.org/x/text@v0.0.0-20170915032832-14c0d48ead0c";

    fn parse(input: &str, options: &ParseOptions) -> ModuleGraph {
        ModuleGraph::parse(input.as_bytes(), options).unwrap()
    }

    fn folded() -> ParseOptions {
        ParseOptions {
            fold_versions: true,
            ..ParseOptions::default()
        }
    }

    #[test]
    fn test_empty_input() {
        let graph = parse("", &ParseOptions::default());
        assert!(graph.is_empty());
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.root_key().is_none());
    }

    #[test]
    fn test_graph_contains_all_modules() {
        let graph = parse(TESTMOD, &ParseOptions::default());

        let expected = [
            "github.com/poloxue/testmod",
            "golang.org/x/text@v0.3.2",
            "rsc.io/quote/v3@v3.1.0",
            "rsc.io/sampler@v1.3.0",
            "rsc.io/sampler@v1.3.1",
            "golang.org/x/text@v0.0.0-20170915032832-14c0d48ead0c",
            "golang.org/x/tools@v0.0.0-20180917221912-90fa682c2a6e",
        ];

        assert_eq!(graph.module_count(), expected.len());
        for key in expected {
            assert!(graph.contains(key), "module {key:?} expected in graph");
        }
    }

    #[test]
    fn test_graph_contains_all_modules_folding_versions() {
        let graph = parse(TESTMOD, &folded());

        let expected = [
            "github.com/poloxue/testmod",
            "golang.org/x/text",
            "rsc.io/quote/v3",
            "rsc.io/sampler",
            "golang.org/x/tools",
        ];

        assert_eq!(graph.module_count(), expected.len());
        for key in expected {
            assert!(graph.contains(key), "module {key:?} expected in graph");
        }
    }

    #[test]
    fn test_ids_follow_first_occurrence() {
        let graph = parse("a b\na c\nb c\n", &ParseOptions::default());

        assert_eq!(graph.module("a").unwrap().id, 1);
        assert_eq!(graph.module("b").unwrap().id, 2);
        assert_eq!(graph.module("c").unwrap().id, 3);

        let edges: Vec<(usize, Vec<usize>)> = graph
            .dependencies()
            .iter()
            .map(|(from, to)| (*from, to.clone()))
            .collect();
        assert_eq!(edges, vec![(1, vec![2, 3]), (2, vec![3])]);
    }

    #[test]
    fn test_folding_merges_versions_and_edges() {
        let graph = parse("x@1 y@2\nx@1 y@3\n", &folded());

        assert_eq!(graph.module_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert!(graph.has_dependency(1, 2));
    }

    #[test]
    fn test_folding_keeps_first_version() {
        let graph = parse("app lib@v1.0.0\nlib@v2.0.0 dep@v0.1.0\n", &folded());

        let lib = graph.module("lib").unwrap();
        assert_eq!(lib.id, 2);
        assert_eq!(lib.version, "v1.0.0");
        assert!(graph.has_dependency(2, 3));
    }

    #[test]
    fn test_without_folding_versions_are_distinct() {
        let graph = parse("x@1 y@2\nx@1 y@3\n", &ParseOptions::default());

        assert_eq!(graph.module_count(), 3);
        assert_eq!(graph.dependencies_of(1), &[2, 3]);
    }

    #[test]
    fn test_duplicate_edges_recorded_once() {
        let graph = parse("a b\na b\nb c\na b\nb c\n", &ParseOptions::default());

        assert_eq!(graph.dependencies_of(1), &[2]);
        assert_eq!(graph.dependencies_of(2), &[3]);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_skip_indirect_keeps_root_records_only() {
        let options = ParseOptions {
            skip_indirect: true,
            ..ParseOptions::default()
        };
        let graph = parse("root child1\nchild1 child2\n", &options);

        assert_eq!(graph.root_key(), Some("root"));
        assert_eq!(graph.module_count(), 2);
        assert!(!graph.contains("child2"));
        assert_eq!(graph.edge_count(), 1);
        assert!(graph.has_dependency(1, 2));
    }

    #[test]
    fn test_skip_indirect_compares_folded_keys() {
        let options = ParseOptions {
            fold_versions: true,
            skip_indirect: true,
            ..ParseOptions::default()
        };
        let graph = parse("app@v1 a@v1\napp@v2 b@v1\na@v1 c@v1\n", &options);

        assert_eq!(graph.root_key(), Some("app"));
        assert_eq!(graph.module_count(), 3);
        assert!(!graph.contains("c"));
    }

    #[test]
    fn test_excluded_modules_never_appear() {
        let options = ParseOptions::new().with_excluded_modules(["golang.org/x/text@v0.3.2"]);
        let graph = parse(TESTMOD, &options);

        assert!(!graph.contains("golang.org/x/text@v0.3.2"));
        assert_eq!(graph.module_count(), 6);

        // The excluded parent drops the edge but not the child.
        let tools = graph
            .module("golang.org/x/tools@v0.0.0-20180917221912-90fa682c2a6e")
            .unwrap();
        assert!(graph
            .dependencies()
            .values()
            .all(|targets| !targets.contains(&tools.id)));
    }

    #[test]
    fn test_excluded_root_still_sets_root_key() {
        let options = ParseOptions::new().with_excluded_modules(["a"]);
        let graph = parse("a b\nb c\n", &options);

        assert_eq!(graph.root_key(), Some("a"));
        assert!(!graph.contains("a"));
        assert_eq!(graph.module("b").unwrap().id, 1);
        assert!(graph.has_dependency(1, 2));
    }

    #[test]
    fn test_exclusion_order_does_not_matter() {
        let options = ParseOptions::new().with_excluded_modules(["z", "c", "m"]);
        let graph = parse("a b\na c\nb z\nb m\n", &options);

        assert_eq!(graph.module_count(), 2);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_exclusion_matches_folded_key() {
        let options = ParseOptions {
            fold_versions: true,
            ..ParseOptions::default()
        }
        .with_excluded_modules(["golang.org/x/text"]);
        let graph = parse(TESTMOD, &options);

        assert!(!graph.contains("golang.org/x/text"));
        assert_eq!(graph.module_count(), 4);
    }

    #[test]
    fn test_parse_is_deterministic() {
        let first = parse(TESTMOD, &folded());
        let second = parse(TESTMOD, &folded());

        let modules = |graph: &ModuleGraph| -> Vec<(String, Module)> {
            graph
                .modules()
                .iter()
                .map(|(key, module)| (key.clone(), module.clone()))
                .collect()
        };
        let edges = |graph: &ModuleGraph| -> Vec<(usize, Vec<usize>)> {
            graph
                .dependencies()
                .iter()
                .map(|(from, to)| (*from, to.clone()))
                .collect()
        };

        assert_eq!(modules(&first), modules(&second));
        assert_eq!(edges(&first), edges(&second));
    }

    #[test]
    fn test_malformed_record() {
        let err = ModuleGraph::parse("onlyonetoken\n".as_bytes(), &ParseOptions::default())
            .unwrap_err();

        match err {
            GraphError::MalformedRecord { line, record } => {
                assert_eq!(line, 1);
                assert_eq!(record, "onlyonetoken");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_record_reports_line_number() {
        let err = ModuleGraph::parse("a b\n\nc\n".as_bytes(), &ParseOptions::default())
            .unwrap_err();
        assert!(matches!(err, GraphError::MalformedRecord { line: 3, .. }));
    }

    #[test]
    fn test_blank_lines_and_missing_trailing_newline() {
        let graph = parse("a b\n\n   \nb c", &ParseOptions::default());
        assert_eq!(graph.module_count(), 3);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_invalid_utf8_identifiers_are_accepted() {
        let input: &[u8] = b"app lib\xff@v1\nlib\xff@v1 dep\n";
        let graph = ModuleGraph::parse(input, &ParseOptions::default()).unwrap();

        assert_eq!(graph.module_count(), 3);
        let lib = graph.module("lib\u{FFFD}@v1").unwrap();
        assert_eq!(lib.id, 2);
        assert_eq!(lib.name, "lib\u{FFFD}");
        assert_eq!(lib.version, "v1");
        assert!(graph.has_dependency(1, 2));
        assert!(graph.has_dependency(2, 3));
    }

    #[test]
    fn test_read_error_is_propagated() {
        struct FailingReader;

        impl Read for FailingReader {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
            }
        }

        let err = ModuleGraph::parse(BufReader::new(FailingReader), &ParseOptions::default())
            .unwrap_err();
        assert!(matches!(err, GraphError::Read(_)));
    }

    #[test]
    fn test_add_record_incrementally() {
        let options = ParseOptions::default();
        let mut graph = ModuleGraph::new();

        assert!(graph.add_record(EdgeRecord { parent: "a", child: "b" }, &options));
        assert!(!graph.add_record(EdgeRecord { parent: "a", child: "b" }, &options));
        assert!(graph.add_record(EdgeRecord { parent: "b", child: "a" }, &options));

        assert_eq!(graph.source_count(), 2);
        assert_eq!(graph.module_by_id(2).unwrap().name, "b");
        assert!(graph.module_by_id(0).is_none());
        assert!(graph.module_by_id(3).is_none());
    }

    #[test]
    fn test_into_parts() {
        let (modules, dependencies) = build("a b\n".as_bytes(), &ParseOptions::default())
            .unwrap()
            .into_parts();

        assert_eq!(modules.len(), 2);
        assert_eq!(dependencies.get(&1usize), Some(&vec![2]));
    }
}
