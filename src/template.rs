use crate::error::{Error, Result};
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera, Value};

/// Serializable view of the document handed to the template.
#[derive(Debug, Serialize)]
pub(crate) struct DocumentContext {
    pub title: String,
    pub intro: String,
    pub project_name: String,
    pub source_file_count: usize,
    pub test_file_count: usize,
    pub main_modules: Vec<String>,
    pub skipped: Vec<String>,
    pub structure: String,
    pub instructions: String,
    pub files: Vec<FileView>,
    pub generated_at: String,
}

/// One selected file: either its verbatim content or an error marker.
#[derive(Debug, Serialize)]
pub(crate) struct FileView {
    pub path: String,
    pub content: Option<String>,
    pub error: Option<String>,
}

impl FileView {
    pub(crate) fn content(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: Some(content.into()),
            error: None,
        }
    }

    pub(crate) fn error(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: None,
            error: Some(reason.into()),
        }
    }
}

/// Template engine for rendering context documents.
pub(crate) struct TemplateEngine {
    tera: Tera,
}

impl TemplateEngine {
    /// Creates a new engine with the built-in document template.
    ///
    /// # Errors
    ///
    /// Returns an error if template registration fails.
    pub(crate) fn new() -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_template("context", include_str!("../templates/context.tera"))
            .map_err(|e| Error::template("context", &e))?;

        tera.register_filter("detect_language", detect_language_filter);

        Ok(Self { tera })
    }

    /// Renders a document context to the final Markdown string.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub(crate) fn render(&self, document: &DocumentContext) -> Result<String> {
        let mut context = Context::new();
        context.insert("ctx", document);

        self.tera
            .render("context", &context)
            .map_err(|e| Error::template("context", &e))
    }
}

/// Detects the fenced-block language tag from a file path's extension.
fn detect_language_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let Some(path) = value.as_str() else {
        return Ok(Value::String(String::new()));
    };

    let extension = path.rsplit('.').next().unwrap_or("").to_lowercase();
    let language = match extension.as_str() {
        "rs" => "rust",
        "py" => "python",
        "js" => "javascript",
        "ts" => "typescript",
        "jsx" => "jsx",
        "tsx" => "tsx",
        "go" => "go",
        "java" => "java",
        "c" | "h" => "c",
        "cpp" | "cc" | "cxx" | "hpp" | "hh" | "hxx" => "cpp",
        "cs" => "csharp",
        "rb" => "ruby",
        "php" => "php",
        "swift" => "swift",
        "kt" => "kotlin",
        "scala" => "scala",
        "r" => "r",
        "sh" | "bash" => "bash",
        "bat" => "batch",
        "ps1" => "powershell",
        "vue" => "vue",
        "html" | "htm" => "html",
        "css" => "css",
        "scss" => "scss",
        "sass" => "sass",
        "less" => "less",
        "sql" => "sql",
        "json" => "json",
        "yaml" | "yml" => "yaml",
        "toml" => "toml",
        "xml" => "xml",
        "md" | "markdown" => "markdown",
        _ => "text",
    };

    Ok(Value::String(language.to_string()))
}
