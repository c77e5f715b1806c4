use crate::error::{Error, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::BTreeSet;

const DEFAULT_MAIN_MODULE_MAX_DEPTH: usize = 2;

/// Directory names pruned from every scan before descent.
const DEFAULT_IGNORED_DIRS: &[&str] = &[
    ".git",
    "__pycache__",
    ".pytest_cache",
    "venv",
    ".venv",
    "node_modules",
    "build",
    "dist",
    "target",
];

/// Extensions recognized as source code (stored without the leading dot).
const DEFAULT_SOURCE_EXTENSIONS: &[&str] = &[
    "py", "js", "ts", "jsx", "tsx", "java", "cpp", "c", "h", "cs", "go", "rs", "php", "rb",
    "swift", "kt", "scala", "r", "m", "mm", "sh", "bat", "ps1", "vue", "html", "css", "scss",
    "sass", "less", "sql", "pl", "lua", "dart", "elm", "fs", "fsx", "fsi", "ml", "mli", "hs",
    "ex", "exs", "clj", "cljs", "cljc", "nim", "cr", "zig", "jl", "v", "vb", "pas", "d",
    "groovy", "gradle", "cmake",
];

/// Filename substrings that mark a file as a test.
const DEFAULT_TEST_PATTERNS: &[&str] = &["test", "spec"];

/// Well-known configuration filenames (matched case-insensitively).
const DEFAULT_CONFIG_FILENAMES: &[&str] = &[
    "package.json",
    "requirements.txt",
    "setup.py",
    "pyproject.toml",
    "setup.cfg",
    "pom.xml",
    "build.gradle",
    "cmakelists.txt",
    "makefile",
    "dockerfile",
    "docker-compose.yml",
    "config.json",
    "settings.json",
    ".env",
    ".gitignore",
    ".eslintrc",
    ".prettierrc",
    "tsconfig.json",
    "webpack.config.js",
    "babel.config.js",
    "jest.config.js",
    "cargo.toml",
    "go.mod",
    "composer.json",
    "gemfile",
    "podfile",
];

/// Extensions recognized as configuration files.
const DEFAULT_CONFIG_EXTENSIONS: &[&str] = &["ini", "cfg", "conf", "env", "toml", "yaml", "yml"];

/// File stems treated as entry-point candidates.
const DEFAULT_MAIN_MODULE_STEMS: &[&str] = &[
    "main",
    "app",
    "__main__",
    "__init__",
    "run",
    "server",
    "index",
    "start",
    "launch",
    "program",
];

/// Configuration for file classification and project analysis.
///
/// Use [`ScanConfig::builder()`] to override the default tables, or
/// [`ScanConfig::default()`] for the stock behavior.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct ScanConfig {
    /// Directory names skipped entirely (pruned before descent)
    pub ignored_dirs: BTreeSet<String>,

    /// Extensions classified as source code, without the leading dot
    pub source_extensions: BTreeSet<String>,

    /// Filename substrings classified as tests
    pub test_patterns: Vec<String>,

    /// Exact filenames classified as configuration
    pub config_filenames: BTreeSet<String>,

    /// Extensions classified as configuration, without the leading dot
    pub config_extensions: BTreeSet<String>,

    /// File stems considered entry-point candidates
    pub main_module_stems: BTreeSet<String>,

    /// Maximum depth from the root at which entry points are detected
    pub main_module_max_depth: usize,
}

impl ScanConfig {
    /// Creates a new configuration builder.
    ///
    /// # Examples
    ///
    /// ```
    /// use ctxbuild::ScanConfig;
    ///
    /// let config = ScanConfig::builder()
    ///     .ignored_dirs(["node_modules", ".git"])
    ///     .source_extensions(["py", "rs"])
    ///     .build()
    ///     .expect("valid configuration");
    /// ```
    #[must_use]
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder::default()
    }

    /// Validates the configuration.
    ///
    /// Malformed configuration is fatal at startup, never per-call.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The source extension set is empty
    /// - Any ignored directory entry is blank or contains a path separator
    /// - Any test pattern is blank
    pub fn validate(&self) -> Result<()> {
        if self.source_extensions.is_empty() {
            return Err(Error::config("source extension set must not be empty"));
        }

        for dir in &self.ignored_dirs {
            if dir.trim().is_empty() {
                return Err(Error::config("ignored directory entries must not be blank"));
            }
            if dir.contains('/') || dir.contains('\\') {
                return Err(Error::config(format!(
                    "ignored directory '{dir}' must be a bare name, not a path"
                )));
            }
        }

        for pattern in &self.test_patterns {
            if pattern.trim().is_empty() {
                return Err(Error::config("test patterns must not be blank"));
            }
        }

        Ok(())
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            ignored_dirs: DEFAULT_IGNORED_DIRS.iter().map(ToString::to_string).collect(),
            source_extensions: DEFAULT_SOURCE_EXTENSIONS
                .iter()
                .map(ToString::to_string)
                .collect(),
            test_patterns: DEFAULT_TEST_PATTERNS.iter().map(ToString::to_string).collect(),
            config_filenames: DEFAULT_CONFIG_FILENAMES
                .iter()
                .map(ToString::to_string)
                .collect(),
            config_extensions: DEFAULT_CONFIG_EXTENSIONS
                .iter()
                .map(ToString::to_string)
                .collect(),
            main_module_stems: DEFAULT_MAIN_MODULE_STEMS
                .iter()
                .map(ToString::to_string)
                .collect(),
            main_module_max_depth: DEFAULT_MAIN_MODULE_MAX_DEPTH,
        }
    }
}

/// Builder for creating a [`ScanConfig`].
///
/// Setters replace the corresponding default table wholesale; omitted
/// tables keep their defaults. Extensions are normalized to lowercase with
/// any leading dot stripped, so `".PY"` and `"py"` are equivalent inputs.
#[derive(Debug, Default)]
pub struct ScanConfigBuilder {
    ignored_dirs: Option<Vec<String>>,
    source_extensions: Option<Vec<String>>,
    test_patterns: Option<Vec<String>>,
    config_filenames: Option<Vec<String>>,
    config_extensions: Option<Vec<String>>,
    main_module_stems: Option<Vec<String>>,
    main_module_max_depth: Option<usize>,
}

fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}

impl ScanConfigBuilder {
    /// Replaces the set of ignored directory names.
    #[must_use]
    pub fn ignored_dirs<I, S>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored_dirs = Some(dirs.into_iter().map(Into::into).collect());
        self
    }

    /// Replaces the set of source extensions.
    #[must_use]
    pub fn source_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.source_extensions = Some(extensions.into_iter().map(Into::into).collect());
        self
    }

    /// Replaces the set of test filename patterns.
    #[must_use]
    pub fn test_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.test_patterns = Some(patterns.into_iter().map(Into::into).collect());
        self
    }

    /// Replaces the set of configuration filenames.
    #[must_use]
    pub fn config_filenames<I, S>(mut self, filenames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config_filenames = Some(filenames.into_iter().map(Into::into).collect());
        self
    }

    /// Replaces the set of configuration extensions.
    #[must_use]
    pub fn config_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config_extensions = Some(extensions.into_iter().map(Into::into).collect());
        self
    }

    /// Replaces the set of entry-point stems.
    #[must_use]
    pub fn main_module_stems<I, S>(mut self, stems: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.main_module_stems = Some(stems.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the maximum depth for entry-point detection.
    #[must_use]
    pub const fn main_module_max_depth(mut self, depth: usize) -> Self {
        self.main_module_max_depth = Some(depth);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails.
    pub fn build(self) -> Result<ScanConfig> {
        let defaults = ScanConfig::default();

        let config = ScanConfig {
            ignored_dirs: self
                .ignored_dirs
                .map_or(defaults.ignored_dirs, |dirs| {
                    dirs.iter().map(|d| d.trim().to_string()).collect()
                }),
            source_extensions: self
                .source_extensions
                .map_or(defaults.source_extensions, |exts| {
                    exts.iter().map(|e| normalize_extension(e)).collect()
                }),
            test_patterns: self
                .test_patterns
                .map_or(defaults.test_patterns, |patterns| {
                    patterns.iter().map(|p| p.trim().to_lowercase()).collect()
                }),
            config_filenames: self
                .config_filenames
                .map_or(defaults.config_filenames, |names| {
                    names.iter().map(|n| n.trim().to_lowercase()).collect()
                }),
            config_extensions: self
                .config_extensions
                .map_or(defaults.config_extensions, |exts| {
                    exts.iter().map(|e| normalize_extension(e)).collect()
                }),
            main_module_stems: self
                .main_module_stems
                .map_or(defaults.main_module_stems, |stems| {
                    stems.iter().map(|s| s.trim().to_lowercase()).collect()
                }),
            main_module_max_depth: self
                .main_module_max_depth
                .unwrap_or(defaults.main_module_max_depth),
        };

        config.validate()?;
        Ok(config)
    }
}

/// Include/exclude glob filter for picking files out of an analysis.
///
/// Used by the one-shot shell to honor `--include-files` and
/// `--exclude-files`. Globs match against the relative path and, for
/// convenience, against the bare filename, so `main.py` selects
/// `src/main.py` without requiring `**/main.py`.
#[derive(Debug, Clone)]
pub struct SelectionFilter {
    include: Option<GlobSet>,
    exclude: Option<GlobSet>,
}

impl SelectionFilter {
    /// Compiles a filter from include and exclude glob lists.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for any malformed glob pattern.
    pub fn new(include: &[String], exclude: &[String]) -> Result<Self> {
        Ok(Self {
            include: Self::compile(include)?,
            exclude: Self::compile(exclude)?,
        })
    }

    /// A filter that selects everything.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            include: None,
            exclude: None,
        }
    }

    fn compile(patterns: &[String]) -> Result<Option<GlobSet>> {
        if patterns.is_empty() {
            return Ok(None);
        }

        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern).map_err(|e| {
                Error::config(format!("invalid glob pattern '{pattern}': {e}"))
            })?;
            builder.add(glob);
        }

        let set = builder
            .build()
            .map_err(|e| Error::config(format!("failed to compile glob set: {e}")))?;
        Ok(Some(set))
    }

    fn matches(set: &GlobSet, relative_path: &str) -> bool {
        if set.is_match(relative_path) {
            return true;
        }
        relative_path
            .rsplit('/')
            .next()
            .is_some_and(|name| set.is_match(name))
    }

    /// Returns true if the relative path passes the filter.
    ///
    /// When include patterns are present only matching paths pass; exclude
    /// patterns then remove matches from that set.
    #[must_use]
    pub fn is_selected(&self, relative_path: &str) -> bool {
        if let Some(include) = &self.include {
            if !Self::matches(include, relative_path) {
                return false;
            }
        }

        if let Some(exclude) = &self.exclude {
            if Self::matches(exclude, relative_path) {
                return false;
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ScanConfig::default();
        assert!(config.ignored_dirs.contains("node_modules"));
        assert!(config.source_extensions.contains("py"));
        assert!(config.config_filenames.contains("config.json"));
        assert_eq!(config.main_module_max_depth, 2);
        config.validate().unwrap();
    }

    #[test]
    fn test_builder_replaces_tables() {
        let config = ScanConfig::builder()
            .ignored_dirs(["vendor"])
            .source_extensions(["py"])
            .build()
            .unwrap();

        assert!(config.ignored_dirs.contains("vendor"));
        assert!(!config.ignored_dirs.contains(".git"));
        assert_eq!(config.source_extensions.len(), 1);
        // Untouched tables keep their defaults
        assert!(config.config_filenames.contains("cargo.toml"));
    }

    #[test]
    fn test_extension_normalization() {
        let config = ScanConfig::builder()
            .source_extensions([".PY", "Rs"])
            .build()
            .unwrap();

        assert!(config.source_extensions.contains("py"));
        assert!(config.source_extensions.contains("rs"));
    }

    #[test]
    fn test_empty_source_extensions_rejected() {
        let result = ScanConfig::builder()
            .source_extensions(Vec::<String>::new())
            .build();

        assert!(result.is_err());
    }

    #[test]
    fn test_ignored_dir_with_separator_rejected() {
        let result = ScanConfig::builder().ignored_dirs(["foo/bar"]).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_selection_filter_include() {
        let filter =
            SelectionFilter::new(&["*.py".to_string()], &[]).unwrap();

        assert!(filter.is_selected("src/main.py"));
        assert!(!filter.is_selected("src/lib.rs"));
    }

    #[test]
    fn test_selection_filter_exclude() {
        let filter =
            SelectionFilter::new(&[], &["generated.py".to_string()]).unwrap();

        assert!(filter.is_selected("src/main.py"));
        assert!(!filter.is_selected("src/generated.py"));
    }

    #[test]
    fn test_selection_filter_bare_filename_matches_nested_path() {
        let filter =
            SelectionFilter::new(&["main.py".to_string()], &[]).unwrap();

        assert!(filter.is_selected("src/main.py"));
        assert!(!filter.is_selected("src/util.py"));
    }

    #[test]
    fn test_selection_filter_all() {
        let filter = SelectionFilter::all();
        assert!(filter.is_selected("anything/at/all.txt"));
    }

    #[test]
    fn test_selection_filter_invalid_glob() {
        let result = SelectionFilter::new(&["[".to_string()], &[]);
        assert!(result.is_err());
    }
}
