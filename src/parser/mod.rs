//! Per-file parsing: the boundary to the external tree-sitter parser.
//!
//! The analyzer consumes the intermediate representation defined here
//! (`ParsedFile` and friends) and never touches syntax trees directly.

pub mod go;

use std::str::FromStr;

use crate::error::ArchError;

pub use go::GoParser;

/// Source dialects the engine can analyze.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceLanguage {
    Go,
}

impl SourceLanguage {
    pub fn name(&self) -> &'static str {
        match self {
            SourceLanguage::Go => "go",
        }
    }
}

impl FromStr for SourceLanguage {
    type Err = ArchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "go" => Ok(SourceLanguage::Go),
            other => Err(ArchError::UnsupportedLanguage(other.to_string())),
        }
    }
}

/// Everything extracted from one source file.
#[derive(Debug, Clone, Default)]
pub struct ParsedFile {
    /// The package-name token from the package clause.
    pub package_name: String,
    /// Import paths, quotes stripped, in declaration order.
    pub imports: Vec<ImportSpec>,
    /// Top-level type declarations, in declaration order.
    pub types: Vec<TypeDecl>,
    /// Top-level function and method declarations, in declaration order.
    pub functions: Vec<FuncDecl>,
}

/// A single import path reference.
#[derive(Debug, Clone)]
pub struct ImportSpec {
    pub path: String,
    pub line: usize,
}

/// Whether a type is defined via fields or via a method set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    /// Struct-like: has (possibly zero) named fields.
    Record,
    /// Method-set only, no fields.
    Interface,
}

/// A top-level type declaration.
#[derive(Debug, Clone)]
pub struct TypeDecl {
    pub name: String,
    pub kind: TypeKind,
    pub line: usize,
    /// Named fields with a resolvable type expression.
    pub fields: Vec<FieldDecl>,
    /// Short names of embedded (anonymous) field types.
    pub embeds: Vec<String>,
}

/// A named struct field.
#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub name: String,
    pub ty: TypeRef,
}

/// An unwrapped type reference: short name plus owning package.
///
/// `package` is `None` when the type lives in the declaring file's own
/// package, or the literal qualifier token for `pkg.Name` expressions;
/// it is never resolved against the import table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    pub name: String,
    pub package: Option<String>,
}

/// A top-level function or method declaration.
#[derive(Debug, Clone)]
pub struct FuncDecl {
    pub name: String,
    /// Pointer-stripped receiver type identifier; `None` for free
    /// functions, possibly empty for receiver shapes the resolver does
    /// not unwrap.
    pub receiver: Option<String>,
    pub line: usize,
    /// Call expressions found in the body, empty for bodyless declarations.
    pub calls: Vec<CallSite>,
}

/// A single call expression inside a function body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    /// The called short name: the bare identifier, or the selector name
    /// for `receiver.Method(...)` calls.
    pub target: String,
    /// The selector's left-hand identifier for method-style calls.
    pub receiver: Option<String>,
    pub line: usize,
}

impl CallSite {
    /// True for selector-style call sites.
    pub fn is_method(&self) -> bool {
        self.receiver.is_some()
    }
}
