use crate::analyzer::Analysis;
use crate::error::{Error, Result};
use crate::task::Task;
use crate::template::{DocumentContext, FileView, TemplateEngine};
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

static BINARY_EXTENSIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "exe", "dll", "so", "dylib", "a", "o", "obj", "png", "jpg", "jpeg", "gif", "bmp", "ico",
        "webp", "mp3", "mp4", "avi", "mkv", "mov", "wav", "flac", "pdf", "doc", "docx", "xls",
        "xlsx", "ppt", "pptx", "zip", "tar", "gz", "bz2", "xz", "7z", "rar", "wasm", "pyc",
        "class",
    ]
    .into_iter()
    .collect()
});

/// Assembles context documents from selected files, a task, and an
/// analysis snapshot.
///
/// File contents are read from disk at assembly time; selecting a path
/// that is not present in the analysis is permitted and includes whatever
/// is on disk. Per-file read failures never abort assembly: the failing
/// file's block is replaced with an inline error marker and assembly
/// continues.
pub struct Assembler {
    engine: TemplateEngine,
}

impl Assembler {
    /// Creates a new assembler.
    ///
    /// # Errors
    ///
    /// Returns an error if the document template fails to register.
    pub fn new() -> Result<Self> {
        Ok(Self {
            engine: TemplateEngine::new()?,
        })
    }

    /// Builds the context document.
    ///
    /// Sections are rendered in a fixed order: header and project
    /// overview, directory structure, the task-specific instruction block,
    /// then one labeled fenced block per selected file in the order given.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptySelection`] when `selected` is empty, a
    /// validation error when the task's required fields are missing, or a
    /// template error if rendering fails. Per-file read failures are
    /// recovered inline, not returned.
    pub fn build(&self, selected: &[String], task: &Task, analysis: &Analysis) -> Result<String> {
        if selected.is_empty() {
            return Err(Error::EmptySelection);
        }
        task.validate()?;

        let kind = task.kind();
        debug!(
            "Assembling '{}' context for '{}' with {} selected files",
            kind,
            analysis.project_name,
            selected.len()
        );

        let files = selected
            .iter()
            .map(|relative| load_file(&analysis.root_path, relative))
            .collect();

        let document = DocumentContext {
            title: kind.title().to_string(),
            intro: kind.intro().to_string(),
            project_name: analysis.project_name.clone(),
            source_file_count: analysis.source_files.len(),
            test_file_count: analysis.test_files.len(),
            main_modules: analysis.main_modules.clone(),
            skipped: analysis
                .skipped
                .iter()
                .map(|s| format!("{} ({})", s.path, s.reason))
                .collect(),
            structure: analysis.structure.clone(),
            instructions: task.instruction_block(),
            files,
            generated_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        };

        self.engine.render(&document)
    }
}

/// Builds a context document with a fresh [`Assembler`].
///
/// Convenience wrapper around [`Assembler::build`].
///
/// # Errors
///
/// See [`Assembler::build`].
pub fn build_context(selected: &[String], task: &Task, analysis: &Analysis) -> Result<String> {
    Assembler::new()?.build(selected, task, analysis)
}

fn load_file(root: &Path, relative: &str) -> FileView {
    let full = root.join(relative);

    if has_binary_extension(&full) {
        warn!("Selected file {} has a binary extension", full.display());
        return FileView::error(relative, "binary file");
    }

    match read_text(&full) {
        Ok(content) => FileView::content(relative, content),
        Err(reason) => {
            warn!("Could not include {}: {}", full.display(), reason);
            FileView::error(relative, reason)
        }
    }
}

fn has_binary_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .is_some_and(|ext| BINARY_EXTENSIONS.contains(ext.as_str()))
}

/// Reads a file as text, reporting a human-readable reason on failure.
///
/// A NUL byte in the leading sample or non-UTF-8 content marks the file as
/// binary rather than failing the whole assembly.
fn read_text(path: &Path) -> std::result::Result<String, String> {
    const SAMPLE_SIZE: usize = 8192;

    let bytes = fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => "file not found".to_string(),
        std::io::ErrorKind::PermissionDenied => "permission denied".to_string(),
        _ => e.to_string(),
    })?;

    let sample = &bytes[..bytes.len().min(SAMPLE_SIZE)];
    if memchr::memchr(0, sample).is_some() {
        return Err("binary content".to_string());
    }

    String::from_utf8(bytes).map_err(|_| "invalid UTF-8 encoding".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::Analyzer;
    use crate::config::ScanConfig;
    use crate::task::{AddFeature, ChangeFunctionality, ExplainArchitecture, Task};
    use assert_fs::prelude::*;

    fn analyze(temp: &assert_fs::TempDir) -> Analysis {
        Analyzer::new(ScanConfig::default())
            .analyze(temp.path())
            .unwrap()
    }

    fn add_feature(description: &str) -> Task {
        Task::AddFeature(AddFeature {
            description: description.to_string(),
            requirements: None,
        })
    }

    #[test]
    fn test_empty_selection_rejected() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("a.py").write_str("a\n").unwrap();
        let analysis = analyze(&temp);

        let err = Assembler::new()
            .unwrap()
            .build(&[], &add_feature("add login"), &analysis)
            .unwrap_err();

        assert!(matches!(err, Error::EmptySelection));
    }

    #[test]
    fn test_invalid_task_rejected() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("a.py").write_str("a\n").unwrap();
        let analysis = analyze(&temp);

        let task = Task::ChangeFunctionality(ChangeFunctionality {
            description: None,
            current_behavior: "sorts ascending".to_string(),
            desired_behavior: String::new(),
        });

        let err = Assembler::new()
            .unwrap()
            .build(&["a.py".to_string()], &task, &analysis)
            .unwrap_err();

        assert!(matches!(
            err,
            Error::MissingField {
                field: "desired_behavior",
                ..
            }
        ));
    }

    #[test]
    fn test_content_included_verbatim() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("hello.txt").write_str("hello\n").unwrap();
        let analysis = analyze(&temp);

        let document = Assembler::new()
            .unwrap()
            .build(&["hello.txt".to_string()], &add_feature("add login"), &analysis)
            .unwrap();

        assert!(document.contains("### hello.txt"));
        assert!(document.contains("```text\nhello\n\n```"));
    }

    #[test]
    fn test_missing_file_becomes_marker_not_error() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("present.py").write_str("ok\n").unwrap();
        let analysis = analyze(&temp);

        let document = Assembler::new()
            .unwrap()
            .build(
                &["present.py".to_string(), "missing.py".to_string()],
                &add_feature("add login"),
                &analysis,
            )
            .unwrap();

        assert!(document.contains("### missing.py"));
        assert!(document.contains("*Error reading file: file not found*"));
        // Partial success: the readable file is still included
        assert!(document.contains("```python\nok\n"));
    }

    #[test]
    fn test_binary_extension_becomes_marker() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("logo.png").write_binary(&[0u8; 32]).unwrap();
        let analysis = analyze(&temp);

        let document = Assembler::new()
            .unwrap()
            .build(&["logo.png".to_string()], &add_feature("add login"), &analysis)
            .unwrap();

        assert!(document.contains("*Error reading file: binary file*"));
    }

    #[test]
    fn test_binary_content_becomes_marker() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("data.dat")
            .write_binary(&[0x68, 0x69, 0x00, 0x01])
            .unwrap();
        let analysis = analyze(&temp);

        let document = Assembler::new()
            .unwrap()
            .build(&["data.dat".to_string()], &add_feature("add login"), &analysis)
            .unwrap();

        assert!(document.contains("*Error reading file: binary content*"));
    }

    #[test]
    fn test_selected_order_preserved() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("a.py").write_str("a\n").unwrap();
        temp.child("b.py").write_str("b\n").unwrap();
        let analysis = analyze(&temp);

        let document = Assembler::new()
            .unwrap()
            .build(
                &["b.py".to_string(), "a.py".to_string()],
                &add_feature("add login"),
                &analysis,
            )
            .unwrap();

        let b_at = document.find("### b.py").unwrap();
        let a_at = document.find("### a.py").unwrap();
        assert!(b_at < a_at);
    }

    #[test]
    fn test_file_outside_analysis_read_from_disk() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("a.py").write_str("a\n").unwrap();
        let analysis = analyze(&temp);

        // Created after the analysis snapshot; no staleness check applies
        temp.child("late.py").write_str("late\n").unwrap();

        let document = Assembler::new()
            .unwrap()
            .build(&["late.py".to_string()], &add_feature("add login"), &analysis)
            .unwrap();

        assert!(document.contains("```python\nlate\n"));
    }

    #[test]
    fn test_instruction_block_contains_description() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("a.py").write_str("a\n").unwrap();
        let analysis = analyze(&temp);

        let document = Assembler::new()
            .unwrap()
            .build(&["a.py".to_string()], &add_feature("add login"), &analysis)
            .unwrap();

        assert!(document.contains("add login"));
        assert!(document.contains("## Request"));
    }

    #[test]
    fn test_explain_architecture_with_defaults() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("a.py").write_str("a\n").unwrap();
        let analysis = analyze(&temp);

        let task = Task::ExplainArchitecture(ExplainArchitecture::default());
        let document = Assembler::new()
            .unwrap()
            .build(&["a.py".to_string()], &task, &analysis)
            .unwrap();

        assert!(document.contains("# Architecture Explanation:"));
        assert!(document.contains("developer-friendly explanation"));
    }

    #[test]
    fn test_section_order_matches_contract() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("a.py").write_str("a\n").unwrap();
        let analysis = analyze(&temp);

        let document = Assembler::new()
            .unwrap()
            .build(&["a.py".to_string()], &add_feature("add login"), &analysis)
            .unwrap();

        let structure = document.find("## Project Structure").unwrap();
        let request = document.find("## Request").unwrap();
        let files = document.find("## Selected Files").unwrap();
        assert!(structure < request);
        assert!(request < files);
    }
}
