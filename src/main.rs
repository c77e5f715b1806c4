use anyhow::Context;
use clap::Parser;
use ctxbuild::{build_context, ScanConfig, SelectionFilter, Task, TaskForm, TaskKind};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod interactive;

#[derive(Parser, Debug)]
#[command(
    name = "ctxbuild",
    version,
    author,
    about = "Build LLM prompt contexts from a codebase",
    long_about = "Scan a codebase, classify its files, and assemble a Markdown context \
    document ready to paste into an LLM prompt.\n\n\
    The document contains the project structure, a task-specific instruction block, \
    and the full contents of the selected files.\n\n\
    USAGE EXAMPLES:\n  \
      # Dump an architecture context for the current directory\n  \
      ctxbuild\n\n  \
      # Write a context for a specific project to a file\n  \
      ctxbuild ./my-project --output context.md\n\n  \
      # Build a debugging context\n  \
      ctxbuild ./src --task debug-error --error-context \"fails on startup\"\n\n  \
      # Drive the selection interactively\n  \
      ctxbuild ./my-project --interactive"
)]
struct Cli {
    /// Project root directory to analyze
    #[arg(value_name = "PATH", default_value = ".")]
    project: PathBuf,

    /// Output file for the generated context (stdout when omitted)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Run the interactive prompt flow instead of the one-shot dump
    #[arg(short, long)]
    interactive: bool,

    /// Task kind the context is built for
    #[arg(short, long, value_enum, default_value = "explain-architecture")]
    task: CliTaskKind,

    /// What the feature or change should do
    ///
    /// Required for --task add-feature.
    #[arg(long, value_name = "TEXT")]
    description: Option<String>,

    /// Area of the code to focus on
    ///
    /// Required for --task explain-functionality.
    #[arg(long, value_name = "TEXT")]
    focus_area: Option<String>,

    /// Additional requirements or constraints (add-feature)
    #[arg(long, value_name = "TEXT")]
    requirements: Option<String>,

    /// How the functionality behaves today
    ///
    /// Required for --task change-functionality.
    #[arg(long, value_name = "TEXT")]
    current_behavior: Option<String>,

    /// How the functionality should behave
    ///
    /// Required for --task change-functionality.
    #[arg(long, value_name = "TEXT")]
    desired_behavior: Option<String>,

    /// Depth of explanation: high-level, detailed, or step-by-step
    #[arg(long, value_name = "LEVEL")]
    explanation_level: Option<String>,

    /// Audience for an architecture explanation: developer, technical, or architect
    #[arg(long, value_name = "AUDIENCE")]
    audience: Option<String>,

    /// The error message being investigated (debug-error)
    #[arg(long, value_name = "TEXT")]
    error_message: Option<String>,

    /// When and how the error occurs
    ///
    /// Required for --task debug-error.
    #[arg(long, value_name = "TEXT")]
    error_context: Option<String>,

    /// What should happen instead (debug-error)
    #[arg(long, value_name = "TEXT")]
    expected_behavior: Option<String>,

    /// Glob of files to include (repeatable; bare filenames match anywhere)
    #[arg(long = "include-files", value_name = "GLOB")]
    include_files: Vec<String>,

    /// Glob of files to exclude (repeatable)
    #[arg(long = "exclude-files", value_name = "GLOB")]
    exclude_files: Vec<String>,

    /// Directory names to ignore, replacing the default set (repeatable)
    #[arg(long = "ignored-dirs", value_name = "DIR")]
    ignored_dirs: Vec<String>,

    /// Source extensions to recognize, replacing the default set (repeatable)
    #[arg(long = "extensions", value_name = "EXT")]
    extensions: Vec<String>,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliTaskKind {
    /// Add a new feature
    AddFeature,
    /// Change existing functionality
    ChangeFunctionality,
    /// Explain how something works
    ExplainFunctionality,
    /// Explain the overall architecture
    ExplainArchitecture,
    /// Debug an error or issue
    DebugError,
}

impl From<CliTaskKind> for TaskKind {
    fn from(k: CliTaskKind) -> Self {
        match k {
            CliTaskKind::AddFeature => Self::AddFeature,
            CliTaskKind::ChangeFunctionality => Self::ChangeFunctionality,
            CliTaskKind::ExplainFunctionality => Self::ExplainFunctionality,
            CliTaskKind::ExplainArchitecture => Self::ExplainArchitecture,
            CliTaskKind::DebugError => Self::DebugError,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_tracing(cli.verbose)?;

    let mut builder = ScanConfig::builder();
    if !cli.ignored_dirs.is_empty() {
        builder = builder.ignored_dirs(cli.ignored_dirs.clone());
    }
    if !cli.extensions.is_empty() {
        builder = builder.source_extensions(cli.extensions.clone());
    }
    let config = builder.build().context("Failed to build scan configuration")?;

    if cli.interactive {
        return interactive::run(&cli.project, &config);
    }

    let analysis =
        ctxbuild::analyze(&cli.project, &config).context("Project analysis failed")?;

    let filter = SelectionFilter::new(&cli.include_files, &cli.exclude_files)
        .context("Invalid file selection globs")?;
    let selected: Vec<String> = analysis
        .source_files
        .iter()
        .filter(|path| filter.is_selected(path))
        .cloned()
        .collect();

    let kind: TaskKind = cli.task.into();
    let form = TaskForm {
        kind: kind.id().to_string(),
        description: cli.description,
        focus_area: cli.focus_area,
        requirements: cli.requirements,
        current_behavior: cli.current_behavior,
        desired_behavior: cli.desired_behavior,
        explanation_level: cli.explanation_level,
        audience: cli.audience,
        error_message: cli.error_message,
        error_context: cli.error_context,
        expected_behavior: cli.expected_behavior,
    };
    let task = Task::from_form(&form).context("Invalid task")?;

    let document =
        build_context(&selected, &task, &analysis).context("Context assembly failed")?;

    match cli.output {
        Some(path) => {
            std::fs::write(&path, &document)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Project context written to {}", path.display());
        }
        None => print!("{document}"),
    }

    Ok(())
}

fn setup_tracing(verbosity: u8) -> anyhow::Result<()> {
    let filter = match verbosity {
        0 => EnvFilter::new("ctxbuild=warn"),
        1 => EnvFilter::new("ctxbuild=debug"),
        _ => EnvFilter::new("ctxbuild=trace"),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_thread_ids(false))
        .init();

    Ok(())
}
