//! # ctxbuild
//!
//! A library for turning a codebase into a task-focused LLM prompt context.
//!
//! ## Features
//!
//! - Path-based file classification (source, test, config, documentation)
//! - Single-pass project analysis with ignored directories pruned before
//!   descent
//! - Five task kinds with typed field records and per-kind instruction
//!   templates
//! - Partial-success assembly: unreadable files become inline markers, the
//!   document is still produced
//!
//! ## Quick Start
//!
//! ```no_run
//! use ctxbuild::{analyze, build_context, ScanConfig, Task, AddFeature};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = ScanConfig::default();
//! let analysis = analyze("./my-project", &config)?;
//!
//! let task = Task::AddFeature(AddFeature {
//!     description: "add login".to_string(),
//!     requirements: None,
//! });
//!
//! let selected = analysis.source_files.clone();
//! let document = build_context(&selected, &task, &analysis)?;
//! println!("{document}");
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! The library is three small components in a row:
//! 1. **Classifier**: pure path → category decisions over configured tables
//! 2. **Analyzer**: walks a root, classifies every file, renders the tree
//! 3. **Assembler**: renders the final document from a selection, a task,
//!    and the analysis snapshot

#![warn(
    missing_docs,
    rust_2018_idioms,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(clippy::module_name_repetitions)]

mod analyzer;
mod assembler;
mod classify;
mod config;
mod error;
mod task;
mod template;

pub mod api;

pub use analyzer::{analyze, Analysis, Analyzer, SkippedDir};
pub use assembler::{build_context, Assembler};
pub use classify::{classify, FileCategory};
pub use config::{ScanConfig, ScanConfigBuilder, SelectionFilter};
pub use error::{Error, Result};
pub use task::{
    AddFeature, Audience, ChangeFunctionality, DebugError, ExplainArchitecture,
    ExplainFunctionality, ExplanationLevel, Task, TaskForm, TaskKind,
};
