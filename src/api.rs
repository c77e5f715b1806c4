//! Request/response boundary for the two core operations.
//!
//! Any RPC-style wrapper (HTTP or otherwise) can expose the core by
//! serializing these types: `analyze` takes a project path and returns the
//! full [`Analysis`], and `build_context` takes the analysis *back* along
//! with the task and file selection. The analysis travels through the
//! boundary on every call; nothing is parked in process-wide state, so
//! concurrent callers can never overwrite each other's project.
//!
//! ## Examples
//!
//! ```no_run
//! use ctxbuild::api::{self, AnalyzeRequest, BuildContextRequest};
//! use ctxbuild::TaskForm;
//!
//! # fn main() -> ctxbuild::Result<()> {
//! let analysis = api::analyze(&AnalyzeRequest {
//!     project_path: "./my-project".into(),
//! })?;
//!
//! let context = api::build_context(&BuildContextRequest {
//!     task: TaskForm {
//!         kind: "explain-architecture".to_string(),
//!         ..TaskForm::default()
//!     },
//!     selected_files: analysis.source_files.clone(),
//!     analysis,
//! })?;
//! # let _ = context;
//! # Ok(())
//! # }
//! ```

use crate::analyzer::{Analysis, Analyzer};
use crate::assembler;
use crate::config::ScanConfig;
use crate::error::Result;
use crate::task::{Task, TaskForm};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Request for the analyze operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    /// Root of the project to analyze
    pub project_path: PathBuf,
}

/// Request for the build-context operation.
///
/// Carries the analysis produced by a prior [`analyze`] call; callers
/// round-trip it rather than relying on server-side session state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildContextRequest {
    /// The task to build context for, in wire form
    pub task: TaskForm,
    /// Relative paths of the files to include, in order
    pub selected_files: Vec<String>,
    /// The analysis snapshot this request is scoped to
    pub analysis: Analysis,
}

/// Analyzes a project with the default scan configuration.
///
/// # Errors
///
/// Returns an error if the project path does not exist, is not a
/// directory, or cannot be read.
pub fn analyze(request: &AnalyzeRequest) -> Result<Analysis> {
    analyze_with(request, &ScanConfig::default())
}

/// Analyzes a project with an explicit scan configuration.
///
/// # Errors
///
/// See [`analyze`].
pub fn analyze_with(request: &AnalyzeRequest, config: &ScanConfig) -> Result<Analysis> {
    Analyzer::new(config.clone()).analyze(&request.project_path)
}

/// Builds a context document from a request.
///
/// Validates the task form (field-specific errors for missing required
/// fields, unknown kinds, and empty selections) and assembles the
/// document against the analysis carried in the request.
///
/// # Errors
///
/// Returns a validation error for a malformed task or empty selection, or
/// a template error if rendering fails.
pub fn build_context(request: &BuildContextRequest) -> Result<String> {
    let task = Task::from_form(&request.task)?;
    assembler::build_context(&request.selected_files, &task, &request.analysis)
}
