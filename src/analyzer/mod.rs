//! The analysis engine: symbol tables and the pipeline driving them.
//!
//! One `GoAnalyzer` value is the whole per-invocation state. It walks the
//! tree, parses each file, populates four symbol tables (packages, types,
//! functions, methods), then derives the graph in a second pass. Nothing
//! survives between invocations.

mod graph;
mod walker;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{ArchError, Result};
use crate::model::{FuncId, Graph, MethodId, TypeId};
use crate::parser::{CallSite, GoParser, ParsedFile, SourceLanguage, TypeKind};

/// Run the analysis for the requested source dialect.
pub fn analyze(root: &Path, language: SourceLanguage) -> Result<Graph> {
    match language {
        SourceLanguage::Go => GoAnalyzer::new().analyze(root),
    }
}

/// Standard-namespace import prefixes, excluded from package import lists
/// alongside any path whose first segment carries no dot.
const STD_NAMESPACES: &[&str] = &[
    "archive/", "bufio", "bytes", "compress/", "container/", "context", "crypto/", "database/",
    "debug/", "embed", "encoding/", "errors", "expvar", "flag", "fmt", "go/", "hash/", "html/",
    "image/", "index/", "io", "log", "math/", "mime/", "net/", "os", "path/", "plugin", "reflect",
    "regexp", "runtime/", "sort", "strconv", "strings", "sync", "syscall", "testing", "text/",
    "time", "unicode/", "unsafe",
];

/// A package: one directory of source files sharing a namespace.
#[derive(Debug, Clone)]
pub struct PackageInfo {
    /// Short name from the package clause of the first file seen.
    pub name: String,
    /// Source directory.
    pub dir: PathBuf,
    /// Retained (non-standard) import paths from all files, in first-seen
    /// order with duplicates dropped.
    pub imports: Vec<String>,
}

/// A type declaration: record or interface.
#[derive(Debug, Clone)]
pub struct TypeInfo {
    pub name: String,
    pub kind: TypeKind,
    pub file: PathBuf,
    pub line: usize,
    pub fields: Vec<FieldInfo>,
    pub embeds: Vec<String>,
}

/// A named struct field with its resolved type.
#[derive(Debug, Clone)]
pub struct FieldInfo {
    pub name: String,
    pub type_name: String,
    /// Owning package of the field type: the declaring package for plain
    /// names, or the literal qualifier token for qualified names.
    pub type_package: String,
}

/// A free function.
#[derive(Debug, Clone)]
pub struct FunctionInfo {
    pub name: String,
    pub file: PathBuf,
    pub line: usize,
    pub calls: Vec<CallSite>,
}

/// A receiver-bound method.
#[derive(Debug, Clone)]
pub struct MethodInfo {
    pub name: String,
    pub receiver: String,
    pub file: PathBuf,
    pub line: usize,
    pub calls: Vec<CallSite>,
}

/// The per-invocation analysis context.
///
/// Tables are `BTreeMap`s so every derived pass iterates in one
/// deterministic order: analyzing the same tree twice yields identical
/// node and edge lists.
pub struct GoAnalyzer {
    root: PathBuf,
    module_path: String,
    packages: BTreeMap<String, PackageInfo>,
    types: BTreeMap<TypeId, TypeInfo>,
    functions: BTreeMap<FuncId, FunctionInfo>,
    methods: BTreeMap<MethodId, MethodInfo>,
}

impl GoAnalyzer {
    pub fn new() -> Self {
        Self {
            root: PathBuf::new(),
            module_path: String::new(),
            packages: BTreeMap::new(),
            types: BTreeMap::new(),
            functions: BTreeMap::new(),
            methods: BTreeMap::new(),
        }
    }

    /// Analyze the source tree under `root` and return its graph.
    ///
    /// Fail-fast: the first traversal or parse error aborts the run with
    /// no graph.
    pub fn analyze(mut self, root: &Path) -> Result<Graph> {
        self.root = root
            .canonicalize()
            .map_err(|source| ArchError::PathResolution {
                path: root.to_path_buf(),
                source,
            })?;
        self.module_path = walker::detect_module_path(&self.root);
        debug!(root = %self.root.display(), module = %self.module_path, "starting analysis");

        let files = walker::collect_source_files(&self.root)?;
        info!(files = files.len(), "discovered source files");

        let mut parser = GoParser::new();
        for file in &files {
            let source = std::fs::read_to_string(file).map_err(|e| ArchError::Parse {
                file: file.clone(),
                message: e.to_string(),
            })?;
            let parsed = parser.parse_file(file, &source)?;
            self.record_file(file, parsed);
        }

        let graph = graph::build(&self);
        info!(
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            "analysis complete"
        );
        Ok(graph)
    }

    /// Merge one parsed file into the symbol tables.
    fn record_file(&mut self, file: &Path, parsed: ParsedFile) {
        let dir = file.parent().unwrap_or(&self.root);
        let pkg_path = self.package_identity(dir);

        let pkg = self
            .packages
            .entry(pkg_path.clone())
            .or_insert_with(|| PackageInfo {
                name: parsed.package_name.clone(),
                dir: dir.to_path_buf(),
                imports: Vec::new(),
            });
        for import in &parsed.imports {
            if !is_std_import(&import.path) && !pkg.imports.contains(&import.path) {
                pkg.imports.push(import.path.clone());
            }
        }

        for ty in parsed.types {
            let id = TypeId::new(pkg_path.clone(), ty.name.clone());
            let fields = ty
                .fields
                .into_iter()
                .map(|f| FieldInfo {
                    name: f.name,
                    type_name: f.ty.name,
                    type_package: f.ty.package.unwrap_or_else(|| pkg_path.clone()),
                })
                .collect();
            self.types.insert(
                id,
                TypeInfo {
                    name: ty.name,
                    kind: ty.kind,
                    file: file.to_path_buf(),
                    line: ty.line,
                    fields,
                    embeds: ty.embeds,
                },
            );
        }

        for func in parsed.functions {
            match func.receiver {
                Some(receiver) => {
                    let id = MethodId::new(pkg_path.clone(), receiver.clone(), func.name.clone());
                    self.methods.insert(
                        id,
                        MethodInfo {
                            name: func.name,
                            receiver,
                            file: file.to_path_buf(),
                            line: func.line,
                            calls: func.calls,
                        },
                    );
                }
                None => {
                    let id = FuncId::new(pkg_path.clone(), func.name.clone());
                    self.functions.insert(
                        id,
                        FunctionInfo {
                            name: func.name,
                            file: file.to_path_buf(),
                            line: func.line,
                            calls: func.calls,
                        },
                    );
                }
            }
        }
    }

    /// Fully qualified package identity for a source directory.
    fn package_identity(&self, dir: &Path) -> String {
        let rel: Vec<String> = dir
            .strip_prefix(&self.root)
            .unwrap_or(dir)
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();

        if rel.is_empty() {
            self.module_path.clone()
        } else if self.module_path.is_empty() {
            rel.join("/")
        } else {
            format!("{}/{}", self.module_path, rel.join("/"))
        }
    }

    pub(crate) fn module_path(&self) -> &str {
        &self.module_path
    }

    pub(crate) fn packages(&self) -> &BTreeMap<String, PackageInfo> {
        &self.packages
    }

    pub(crate) fn types(&self) -> &BTreeMap<TypeId, TypeInfo> {
        &self.types
    }

    pub(crate) fn functions(&self) -> &BTreeMap<FuncId, FunctionInfo> {
        &self.functions
    }

    pub(crate) fn methods(&self) -> &BTreeMap<MethodId, MethodInfo> {
        &self.methods
    }
}

impl Default for GoAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Part of the standard distribution: no dot in the first path segment,
/// or a match against the fixed namespace table.
fn is_std_import(path: &str) -> bool {
    let first = path.split('/').next().unwrap_or(path);
    if !first.contains('.') {
        return true;
    }
    STD_NAMESPACES
        .iter()
        .any(|p| path.starts_with(p) || path == p.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_std_import_filter() {
        assert!(is_std_import("fmt"));
        assert!(is_std_import("net/http"));
        assert!(is_std_import("encoding/json"));
        assert!(!is_std_import("github.com/spf13/cobra"));
        assert!(!is_std_import("example.com/app/store"));
        assert!(!is_std_import("gopkg.in/yaml.v3"));
    }

    #[test]
    fn test_package_identity() {
        let mut a = GoAnalyzer::new();
        a.root = PathBuf::from("/work/app");
        a.module_path = "example.com/app".to_string();

        assert_eq!(a.package_identity(Path::new("/work/app")), "example.com/app");
        assert_eq!(
            a.package_identity(Path::new("/work/app/internal/store")),
            "example.com/app/internal/store"
        );
    }

    #[test]
    fn test_package_identity_without_module_prefix() {
        let mut a = GoAnalyzer::new();
        a.root = PathBuf::from("/work/app");

        assert_eq!(a.package_identity(Path::new("/work/app")), "");
        assert_eq!(a.package_identity(Path::new("/work/app/util")), "util");
    }
}
