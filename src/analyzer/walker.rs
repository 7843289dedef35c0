//! Source discovery: directory walk and module root resolution.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use tracing::debug;

use crate::error::Result;

/// Directories never descended into.
const PRUNED_DIRS: &[&str] = &["vendor", "node_modules", ".git", "bin"];

/// Enumerate the source files to parse under `root`.
///
/// Pruned directories are skipped entirely, non-Go files and `_test.go`
/// files are dropped, and entries come back in lexicographic order so the
/// first file seen for a directory is stable across runs. Any traversal
/// error aborts the walk.
pub fn collect_source_files(root: &Path) -> Result<Vec<PathBuf>> {
    let walk = WalkBuilder::new(root)
        .standard_filters(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(|entry| {
            let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
            let name = entry.file_name().to_string_lossy();
            !(is_dir && PRUNED_DIRS.contains(&name.as_ref()))
        })
        .build();

    let mut files = Vec::new();
    for entry in walk {
        let entry = entry?;
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        let path = entry.into_path();
        if path.extension().and_then(|e| e.to_str()) != Some("go") {
            continue;
        }
        if path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with("_test.go"))
        {
            continue;
        }
        files.push(path);
    }
    Ok(files)
}

/// Extract the declared module path from the `go.mod` at `root`.
///
/// A missing descriptor or missing `module` line yields an empty prefix;
/// package identities then degrade to relative directories. Silent
/// fallback, not an error.
pub fn detect_module_path(root: &Path) -> String {
    let descriptor = root.join("go.mod");
    let Ok(contents) = std::fs::read_to_string(&descriptor) else {
        debug!(path = %descriptor.display(), "no module descriptor, using empty prefix");
        return String::new();
    };

    for line in contents.lines() {
        let line = line.trim();
        if let Some(module) = line.strip_prefix("module ") {
            return module.trim().to_string();
        }
    }
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &Path, rel: &str, contents: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_walk_prunes_and_filters() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        touch(root, "main.go", "package main\n");
        touch(root, "main_test.go", "package main\n");
        touch(root, "README.md", "docs\n");
        touch(root, "vendor/dep/dep.go", "package dep\n");
        touch(root, "node_modules/x/x.go", "package x\n");
        touch(root, "bin/tool.go", "package tool\n");
        touch(root, "internal/store/store.go", "package store\n");

        let files = collect_source_files(root).unwrap();
        let rels: Vec<String> = files
            .iter()
            .map(|f| {
                f.strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect();

        // depth-first walk: internal/ sorts before main.go and is
        // descended into first
        assert_eq!(rels, vec!["internal/store/store.go", "main.go"]);
    }

    #[test]
    fn test_walk_order_is_lexicographic_within_directory() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        touch(root, "pkg/zz.go", "package pkg\n");
        touch(root, "pkg/aa.go", "package pkg\n");

        let files = collect_source_files(root).unwrap();
        let names: Vec<&str> = files
            .iter()
            .map(|f| f.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["aa.go", "zz.go"]);
    }

    #[test]
    fn test_detect_module_path() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        touch(root, "go.mod", "// toolchain notes\nmodule example.com/app\n\ngo 1.22\n");
        assert_eq!(detect_module_path(root), "example.com/app");
    }

    #[test]
    fn test_missing_descriptor_is_silent() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(detect_module_path(tmp.path()), "");
    }

    #[test]
    fn test_descriptor_without_module_line() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "go.mod", "go 1.22\n");
        assert_eq!(detect_module_path(tmp.path()), "");
    }
}
