use std::{
    fs,
    path::{Path, PathBuf},
};

use glob::Pattern;
use walkdir::{DirEntry, WalkDir};

use crate::core::error::{AnalysisError, Result};

pub const SOURCE_EXTENSION: &str = "go";

/// Collect every Go file under `root`, in stable file-name order.
///
/// Skips dot-prefixed names, the vendor directory, and anything matching an
/// ignore pattern (matched against the path relative to `root`). Any walk
/// error aborts the scan.
pub fn collect_source_files(
    root: &Path,
    vendor_dir: &str,
    ignore_patterns: &[Pattern],
) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_skipped(entry, root, vendor_dir, ignore_patterns));

    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_file() && is_source_file(entry.path()) {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

fn is_skipped(entry: &DirEntry, root: &Path, vendor_dir: &str, ignore_patterns: &[Pattern]) -> bool {
    let name = entry.file_name().to_string_lossy();
    if name.starts_with('.') {
        return true;
    }

    let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
    if entry.file_type().is_dir() && is_vendor_dir(relative, vendor_dir) {
        return true;
    }

    ignore_patterns.iter().any(|p| p.matches_path(relative))
}

/// A single-segment vendor name matches at any depth; a longer one only
/// relative to the root.
fn is_vendor_dir(relative: &Path, vendor_dir: &str) -> bool {
    let vendor = Path::new(vendor_dir);
    if vendor.components().count() == 1 {
        relative.file_name() == Some(vendor.as_os_str())
    } else {
        relative == vendor
    }
}

/// Go files directly inside `dir` (non-recursive), sorted by name.
pub fn list_source_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| AnalysisError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| AnalysisError::io(dir, e))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| AnalysisError::io(&path, e))?;
        if file_type.is_file() && is_source_file(&path) {
            files.push(path);
        }
    }
    files.sort();

    Ok(files)
}

fn is_source_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(SOURCE_EXTENSION)
}

#[cfg(test)]
mod tests {
    use std::fs::{self, File};

    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;

    fn relative(files: &[PathBuf], root: &Path) -> Vec<String> {
        files
            .iter()
            .map(|f| f.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn test_collect_go_files_in_order() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("internal/db")).unwrap();
        File::create(root.join("main.go")).unwrap();
        File::create(root.join("config.go")).unwrap();
        File::create(root.join("README.md")).unwrap();
        File::create(root.join("internal/db/db.go")).unwrap();

        let files = collect_source_files(root, "vendor", &[]).unwrap();
        assert_eq!(
            relative(&files, root),
            vec!["config.go", "internal/db/db.go", "main.go"]
        );
    }

    #[test]
    fn test_collect_skips_vendor_and_dot_dirs() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("vendor/github.com/acme/lib")).unwrap();
        fs::create_dir_all(root.join("tools/vendor/x")).unwrap();
        fs::create_dir_all(root.join(".cache")).unwrap();
        File::create(root.join("vendor/github.com/acme/lib/lib.go")).unwrap();
        File::create(root.join("tools/vendor/x/x.go")).unwrap();
        File::create(root.join("tools/tools.go")).unwrap();
        File::create(root.join(".cache/gen.go")).unwrap();
        File::create(root.join(".hidden.go")).unwrap();
        File::create(root.join("app.go")).unwrap();

        let files = collect_source_files(root, "vendor", &[]).unwrap();
        assert_eq!(relative(&files, root), vec!["app.go", "tools/tools.go"]);
    }

    #[test]
    fn test_collect_multi_segment_vendor_dir_only_at_root() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("third_party/go")).unwrap();
        fs::create_dir_all(root.join("sub/third_party/go")).unwrap();
        File::create(root.join("third_party/go/dep.go")).unwrap();
        File::create(root.join("sub/third_party/go/own.go")).unwrap();

        let files = collect_source_files(root, "third_party/go", &[]).unwrap();
        assert_eq!(relative(&files, root), vec!["sub/third_party/go/own.go"]);
    }

    #[test]
    fn test_collect_respects_ignore_patterns() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("testdata")).unwrap();
        File::create(root.join("testdata/fixture.go")).unwrap();
        File::create(root.join("app.go")).unwrap();

        let patterns = vec![Pattern::new("testdata").unwrap()];
        let files = collect_source_files(root, "vendor", &patterns).unwrap();
        assert_eq!(relative(&files, root), vec!["app.go"]);
    }

    #[test]
    fn test_list_source_files_is_not_recursive() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("sub")).unwrap();
        File::create(root.join("b.go")).unwrap();
        File::create(root.join("a.go")).unwrap();
        File::create(root.join("sub/c.go")).unwrap();

        let files = list_source_files(root).unwrap();
        assert_eq!(relative(&files, root), vec!["a.go", "b.go"]);
    }

    #[test]
    fn test_list_source_files_missing_dir() {
        let dir = tempdir().unwrap();
        let err = list_source_files(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, AnalysisError::Io { .. }));
    }
}
