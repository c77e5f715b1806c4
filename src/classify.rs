use crate::config::ScanConfig;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path};

/// Category assigned to a file by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    /// Source code
    Source,
    /// Test code
    Test,
    /// Build or tool configuration
    Config,
    /// Documentation and anything else (catch-all)
    Documentation,
    /// Inside an ignored directory
    Ignored,
}

impl FileCategory {
    /// Returns the display name for this category.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Test => "test",
            Self::Config => "config",
            Self::Documentation => "documentation",
            Self::Ignored => "ignored",
        }
    }
}

/// Classifies a file path into exactly one [`FileCategory`].
///
/// Pure function of the path and the configuration tables: no I/O, no
/// errors, deterministic and total. Precedence: ignored directory segment,
/// then test pattern, then config filename/extension, then source
/// extension; everything else is documentation.
#[must_use]
pub fn classify(path: &Path, config: &ScanConfig) -> FileCategory {
    if path
        .components()
        .any(|c| matches!(c, Component::Normal(name) if config.ignored_dirs.contains(&name.to_string_lossy().into_owned())))
    {
        return FileCategory::Ignored;
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    if config
        .test_patterns
        .iter()
        .any(|pattern| file_name.contains(pattern.as_str()))
    {
        return FileCategory::Test;
    }

    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    // `.eslintrc`-style dotfiles count as config alongside the tables.
    if config.config_filenames.contains(&file_name)
        || (file_name.starts_with('.') && file_name.ends_with("rc"))
        || config.config_extensions.contains(&extension)
    {
        return FileCategory::Config;
    }

    if config.source_extensions.contains(&extension) {
        return FileCategory::Source;
    }

    FileCategory::Documentation
}
