//! # archgraph
//!
//! Extracts a structural architecture graph from a Go source tree.
//!
//! archgraph walks a directory, parses every non-test Go file with
//! tree-sitter, indexes packages, types, functions, and methods, and emits
//! a typed directed graph (import, contains, calls, uses, embeds) that
//! downstream tooling can consume without executing the code.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use archgraph::{analyze, SourceLanguage};
//! use std::path::Path;
//!
//! let graph = analyze(Path::new("."), SourceLanguage::Go)?;
//! let yaml = serde_yaml::to_string(&graph)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Resolution is deliberately conservative: call edges connect only
//! same-package free functions, and type-dependency edges stay inside one
//! package. Cross-package coupling is summarized at the import level.

pub mod analyzer;
pub mod cli;
pub mod error;
pub mod model;
pub mod parser;

// Re-exports for convenience
pub use analyzer::{analyze, GoAnalyzer};
pub use error::{ArchError, Result};
pub use model::{Edge, Entity, FuncId, Graph, LinkKind, MethodId, Node, TypeId};
pub use parser::SourceLanguage;
