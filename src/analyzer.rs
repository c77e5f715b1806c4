use crate::classify::{classify, FileCategory};
use crate::config::ScanConfig;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};
use walkdir::{DirEntry, WalkDir};

/// A subtree that could not be read during analysis.
///
/// Unreadable subtrees are skipped and noted; they never fail the whole
/// analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedDir {
    /// Path that could not be read
    pub path: String,
    /// Underlying cause
    pub reason: String,
}

/// Snapshot produced by scanning a project root once.
///
/// Held in memory only and superseded wholesale by the next analysis; there
/// are no merge or update semantics. The record is fully serializable so it
/// can be round-tripped through a request/response boundary instead of
/// being parked in process-wide state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    /// Name of the project (root directory name)
    pub project_name: String,

    /// The analyzed root path
    pub root_path: PathBuf,

    /// Relative paths of source files, in scan order
    pub source_files: Vec<String>,

    /// Relative paths of test files, in scan order
    pub test_files: Vec<String>,

    /// Relative paths of configuration files, in scan order
    pub config_files: Vec<String>,

    /// Relative paths of documentation and uncategorized files, in scan order
    pub doc_files: Vec<String>,

    /// Entry-point candidates among the source files
    pub main_modules: Vec<String>,

    /// Rendered directory-structure string
    pub structure: String,

    /// Subtrees skipped because they could not be read
    pub skipped: Vec<SkippedDir>,
}

impl Analysis {
    /// Total number of classified files across all categories.
    #[must_use]
    pub fn total_files(&self) -> usize {
        self.source_files.len()
            + self.test_files.len()
            + self.config_files.len()
            + self.doc_files.len()
    }

    /// Returns the relative paths recorded for a category.
    ///
    /// [`FileCategory::Ignored`] has no list; ignored trees are pruned
    /// before classification.
    #[must_use]
    pub fn files_in(&self, category: FileCategory) -> &[String] {
        match category {
            FileCategory::Source => &self.source_files,
            FileCategory::Test => &self.test_files,
            FileCategory::Config => &self.config_files,
            FileCategory::Documentation => &self.doc_files,
            FileCategory::Ignored => &[],
        }
    }
}

/// Scans project roots and produces [`Analysis`] snapshots.
///
/// The analyzer holds no state between calls; every invocation walks the
/// tree from scratch.
#[derive(Debug, Clone)]
pub struct Analyzer {
    config: ScanConfig,
}

impl Analyzer {
    /// Creates a new analyzer with the given configuration.
    #[must_use]
    pub const fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    /// Returns the analyzer's configuration.
    #[must_use]
    pub const fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Analyzes the project rooted at `root`.
    ///
    /// Walks the tree single-threaded with ignored directories pruned
    /// before descent, classifies every file, renders the directory
    /// structure, and collects entry-point candidates.
    ///
    /// # Errors
    ///
    /// Returns an error if the root does not exist, is not a directory, or
    /// cannot be read. Unreadable subtrees below the root are skipped and
    /// recorded in [`Analysis::skipped`] instead.
    pub fn analyze(&self, root: impl AsRef<Path>) -> Result<Analysis> {
        let root = root.as_ref();

        let metadata = fs::metadata(root).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::not_found(root),
            std::io::ErrorKind::PermissionDenied => Error::permission(root, &e),
            _ => Error::io(root, e),
        })?;

        if !metadata.is_dir() {
            return Err(Error::NotADirectory {
                path: root.to_path_buf(),
            });
        }

        // An unreadable root is fatal; unreadable subtrees are not.
        fs::read_dir(root).map_err(|e| match e.kind() {
            std::io::ErrorKind::PermissionDenied => Error::permission(root, &e),
            _ => Error::io(root, e),
        })?;

        let project_name = project_name_of(root);

        debug!("Analyzing project '{}' at {}", project_name, root.display());

        let mut analysis = Analysis {
            project_name: project_name.clone(),
            root_path: root.to_path_buf(),
            source_files: Vec::new(),
            test_files: Vec::new(),
            config_files: Vec::new(),
            doc_files: Vec::new(),
            main_modules: Vec::new(),
            structure: String::new(),
            skipped: Vec::new(),
        };

        let mut structure_lines = Vec::new();
        let mut seen_main_modules = HashSet::new();

        let ignored_dirs = self.config.ignored_dirs.clone();
        let walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by(|a, b| {
                // Directories before files, then lexicographic by name.
                let a_dir = a.file_type().is_dir();
                let b_dir = b.file_type().is_dir();
                b_dir.cmp(&a_dir).then_with(|| a.file_name().cmp(b.file_name()))
            })
            .into_iter()
            .filter_entry(move |entry| !is_pruned(entry, &ignored_dirs));

        for entry_result in walker {
            let entry = match entry_result {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e
                        .path()
                        .map_or_else(|| root.display().to_string(), |p| p.display().to_string());
                    warn!("Skipping unreadable subtree {}: {}", path, e);
                    analysis.skipped.push(SkippedDir {
                        path,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            let depth = entry.depth();
            if depth == 0 {
                structure_lines.push(format!("{project_name}/"));
                continue;
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            let indent = "    ".repeat(depth);

            if entry.file_type().is_dir() {
                structure_lines.push(format!("{indent}{name}/"));
                continue;
            }

            structure_lines.push(format!("{indent}{name}"));

            let relative = pathdiff::diff_paths(entry.path(), root)
                .unwrap_or_else(|| entry.path().to_path_buf());
            let relative_str = relative_string(&relative);

            let category = classify(&relative, &self.config);
            trace!("{} -> {}", relative_str, category.name());

            match category {
                FileCategory::Source => {
                    if depth <= self.config.main_module_max_depth
                        && self.is_main_module(&relative)
                        && seen_main_modules.insert(relative_str.clone())
                    {
                        analysis.main_modules.push(relative_str.clone());
                    }
                    analysis.source_files.push(relative_str);
                }
                FileCategory::Test => analysis.test_files.push(relative_str),
                FileCategory::Config => analysis.config_files.push(relative_str),
                FileCategory::Documentation => analysis.doc_files.push(relative_str),
                FileCategory::Ignored => {}
            }
        }

        analysis.structure = structure_lines.join("\n");

        debug!(
            "Analysis complete: {} source, {} test, {} config, {} doc, {} skipped",
            analysis.source_files.len(),
            analysis.test_files.len(),
            analysis.config_files.len(),
            analysis.doc_files.len(),
            analysis.skipped.len()
        );

        Ok(analysis)
    }

    fn is_main_module(&self, relative: &Path) -> bool {
        relative
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_lowercase())
            .is_some_and(|stem| self.config.main_module_stems.contains(&stem))
    }
}

/// Analyzes a project root with the given configuration.
///
/// Convenience wrapper around [`Analyzer::analyze`].
///
/// # Errors
///
/// See [`Analyzer::analyze`].
pub fn analyze(root: impl AsRef<Path>, config: &ScanConfig) -> Result<Analysis> {
    Analyzer::new(config.clone()).analyze(root)
}

fn is_pruned(entry: &DirEntry, ignored_dirs: &std::collections::BTreeSet<String>) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && ignored_dirs.contains(entry.file_name().to_string_lossy().as_ref())
}

fn project_name_of(root: &Path) -> String {
    root.canonicalize()
        .ok()
        .as_deref()
        .unwrap_or(root)
        .file_name()
        .map_or_else(|| "project".to_string(), |n| n.to_string_lossy().into_owned())
}

/// Renders a relative path with `/` separators on every platform.
fn relative_string(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    fn analyzer() -> Analyzer {
        Analyzer::new(ScanConfig::default())
    }

    #[test]
    fn test_analyze_mixed_project() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("src/main.py").write_str("print('hi')\n").unwrap();
        temp.child("src/util.py").write_str("def util(): pass\n").unwrap();
        temp.child("tests/test_util.py")
            .write_str("def test_util(): pass\n")
            .unwrap();
        temp.child("config.json").write_str("{}\n").unwrap();

        let analysis = analyzer().analyze(temp.path()).unwrap();

        assert_eq!(
            analysis.source_files,
            vec!["src/main.py".to_string(), "src/util.py".to_string()]
        );
        assert_eq!(analysis.test_files, vec!["tests/test_util.py".to_string()]);
        assert_eq!(analysis.config_files, vec!["config.json".to_string()]);
        assert!(analysis.main_modules.contains(&"src/main.py".to_string()));
    }

    #[test]
    fn test_analyze_empty_directory() {
        let temp = assert_fs::TempDir::new().unwrap();

        let analysis = analyzer().analyze(temp.path()).unwrap();

        assert!(analysis.source_files.is_empty());
        assert!(analysis.test_files.is_empty());
        assert!(analysis.config_files.is_empty());
        assert!(analysis.doc_files.is_empty());
        assert!(analysis.main_modules.is_empty());
        assert_eq!(analysis.structure, format!("{}/", analysis.project_name));
    }

    #[test]
    fn test_analyze_nonexistent_root() {
        let err = analyzer()
            .analyze("/nonexistent/path/that/should/not/exist")
            .unwrap_err();

        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[test]
    fn test_analyze_root_is_a_file() {
        let temp = assert_fs::TempDir::new().unwrap();
        let file = temp.child("plain.txt");
        file.write_str("not a directory").unwrap();

        let err = analyzer().analyze(file.path()).unwrap_err();

        assert!(matches!(err, Error::NotADirectory { .. }));
    }

    #[test]
    fn test_ignored_directories_pruned() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("src/app.py").write_str("app\n").unwrap();
        temp.child("node_modules/lodash/index.js")
            .write_str("module.exports = {}\n")
            .unwrap();
        temp.child("target/debug/build.rs").write_str("fn main() {}\n").unwrap();

        let analysis = analyzer().analyze(temp.path()).unwrap();

        assert_eq!(analysis.source_files, vec!["src/app.py".to_string()]);
        assert!(!analysis.structure.contains("node_modules"));
        assert!(!analysis.structure.contains("target"));
        assert!(!analysis.structure.contains("index.js"));
    }

    #[test]
    fn test_structure_ordering_pinned() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("zeta.py").write_str("z\n").unwrap();
        temp.child("alpha/one.py").write_str("1\n").unwrap();
        temp.child("beta/two.py").write_str("2\n").unwrap();

        let analysis = analyzer().analyze(temp.path()).unwrap();

        let expected = format!(
            "{}/\n    alpha/\n        one.py\n    beta/\n        two.py\n    zeta.py",
            analysis.project_name
        );
        assert_eq!(analysis.structure, expected);
    }

    #[test]
    fn test_main_module_depth_limit() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("main.py").write_str("1\n").unwrap();
        temp.child("src/app.py").write_str("2\n").unwrap();
        temp.child("src/deep/nested/main.py").write_str("3\n").unwrap();

        let analysis = analyzer().analyze(temp.path()).unwrap();

        assert!(analysis.main_modules.contains(&"main.py".to_string()));
        assert!(analysis.main_modules.contains(&"src/app.py".to_string()));
        assert!(!analysis
            .main_modules
            .iter()
            .any(|m| m.contains("deep/nested")));
    }

    #[test]
    fn test_main_modules_are_source_only() {
        let temp = assert_fs::TempDir::new().unwrap();
        // "app" stem, but classified as config by extension
        temp.child("app.yaml").write_str("key: value\n").unwrap();

        let analysis = analyzer().analyze(temp.path()).unwrap();

        assert!(analysis.main_modules.is_empty());
        assert_eq!(analysis.config_files, vec!["app.yaml".to_string()]);
    }

    #[test]
    fn test_documentation_catch_all_listed() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("README.md").write_str("# readme\n").unwrap();
        temp.child("LICENSE").write_str("MIT\n").unwrap();

        let analysis = analyzer().analyze(temp.path()).unwrap();

        assert_eq!(
            analysis.doc_files,
            vec!["LICENSE".to_string(), "README.md".to_string()]
        );
    }

    #[test]
    fn test_analysis_serde_round_trip() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("src/main.py").write_str("x\n").unwrap();

        let analysis = analyzer().analyze(temp.path()).unwrap();
        let json = serde_json::to_string(&analysis).unwrap();
        let restored: Analysis = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.project_name, analysis.project_name);
        assert_eq!(restored.source_files, analysis.source_files);
        assert_eq!(restored.structure, analysis.structure);
    }

    #[test]
    fn test_fresh_snapshot_per_call() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("a.py").write_str("a\n").unwrap();

        let analyzer = analyzer();
        let first = analyzer.analyze(temp.path()).unwrap();

        temp.child("b.py").write_str("b\n").unwrap();
        let second = analyzer.analyze(temp.path()).unwrap();

        assert_eq!(first.source_files.len(), 1);
        assert_eq!(second.source_files.len(), 2);
    }
}
