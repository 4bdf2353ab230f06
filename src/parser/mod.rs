//! Parser module for modv.
//!
//! Splits the textual input into edge records and module identifiers into
//! their path, name and version components. Nothing here can fail: shape
//! checks are left to the graph builder, which knows the line numbers.
//!
//! # Example
//!
//! ```
//! use modv::parser::{EdgeRecord, ModuleParts};
//!
//! let record = EdgeRecord::parse("github.com/poloxue/testmod rsc.io/quote/v3@v3.1.0").unwrap();
//! let child = ModuleParts::parse(record.child);
//!
//! assert_eq!(child.path, "rsc.io/quote");
//! assert_eq!(child.name, "v3");
//! assert_eq!(child.version, "v3.1.0");
//! ```

pub mod identifier;
pub mod record;

// Re-export commonly used types for convenience
pub use identifier::ModuleParts;
pub use record::EdgeRecord;
