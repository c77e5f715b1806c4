//! Interactive line-prompt driver: collects a task and a file selection,
//! then prints the assembled context.

use anyhow::Context;
use ctxbuild::{analyze, build_context, Analysis, ScanConfig, Task, TaskForm, TaskKind};
use std::io::{self, BufRead, Write};
use std::path::Path;

type LineSource<'a> = dyn Iterator<Item = io::Result<String>> + 'a;

pub(crate) fn run(project: &Path, config: &ScanConfig) -> anyhow::Result<()> {
    println!("\nInteractive Context Builder");
    println!("Project: {}\n", project.display());

    let analysis = analyze(project, config).context("Project analysis failed")?;

    println!("Found {} source files", analysis.source_files.len());
    if !analysis.main_modules.is_empty() {
        println!("Main modules: {}", analysis.main_modules.join(", "));
    }

    if analysis.source_files.is_empty() {
        anyhow::bail!("No source files found in {}", project.display());
    }

    let stdin = io::stdin();
    let mut lines: Box<LineSource<'_>> = Box::new(stdin.lock().lines());

    let kind = prompt_task_kind(&mut lines)?;
    let form = prompt_task_fields(kind, &mut lines)?;
    let task = Task::from_form(&form).context("Invalid task")?;

    let selected = prompt_file_selection(&analysis, &mut lines)?;

    let document = build_context(&selected, &task, &analysis)
        .context("Context assembly failed")?;

    let rule = "=".repeat(60);
    println!("\n{rule}");
    println!("GENERATED CONTEXT (ready to copy/paste):");
    println!("{rule}");
    println!("{document}");
    println!("{rule}");

    let save = prompt(&mut lines, "\nSave to file? (y/N): ")?;
    if save.to_lowercase().starts_with('y') {
        let filename = prompt(&mut lines, "Filename (default: context.md): ")?;
        let filename = if filename.is_empty() {
            "context.md".to_string()
        } else {
            filename
        };
        std::fs::write(&filename, &document)
            .with_context(|| format!("Failed to write {filename}"))?;
        println!("Saved to {filename}");
    }

    Ok(())
}

fn prompt(lines: &mut Box<LineSource<'_>>, message: &str) -> anyhow::Result<String> {
    print!("{message}");
    io::stdout().flush()?;

    match lines.next() {
        Some(line) => Ok(line?.trim().to_string()),
        None => anyhow::bail!("input ended unexpectedly"),
    }
}

fn prompt_required(
    lines: &mut Box<LineSource<'_>>,
    message: &str,
) -> anyhow::Result<String> {
    loop {
        let value = prompt(lines, message)?;
        if !value.is_empty() {
            return Ok(value);
        }
        println!("A value is required.");
    }
}

fn prompt_optional(
    lines: &mut Box<LineSource<'_>>,
    message: &str,
) -> anyhow::Result<Option<String>> {
    let value = prompt(lines, message)?;
    Ok(if value.is_empty() { None } else { Some(value) })
}

fn prompt_task_kind(lines: &mut Box<LineSource<'_>>) -> anyhow::Result<TaskKind> {
    println!("\nWhat do you want to do?");
    println!("1. Add a new feature");
    println!("2. Change existing functionality");
    println!("3. Explain how something works");
    println!("4. Explain the overall architecture");
    println!("5. Debug an error/issue");

    loop {
        let choice = prompt(lines, "Choose (1-5): ")?;
        match choice.as_str() {
            "1" => return Ok(TaskKind::AddFeature),
            "2" => return Ok(TaskKind::ChangeFunctionality),
            "3" => return Ok(TaskKind::ExplainFunctionality),
            "4" => return Ok(TaskKind::ExplainArchitecture),
            "5" => return Ok(TaskKind::DebugError),
            _ => println!("Please enter 1, 2, 3, 4, or 5"),
        }
    }
}

fn prompt_task_fields(
    kind: TaskKind,
    lines: &mut Box<LineSource<'_>>,
) -> anyhow::Result<TaskForm> {
    let mut form = TaskForm {
        kind: kind.id().to_string(),
        ..TaskForm::default()
    };

    match kind {
        TaskKind::AddFeature => {
            form.description = Some(prompt_required(lines, "\nDescribe what you want to do: ")?);
            form.requirements = prompt_optional(lines, "Additional requirements? (optional): ")?;
        }
        TaskKind::ChangeFunctionality => {
            form.current_behavior = Some(prompt_required(lines, "\nCurrent behavior: ")?);
            form.desired_behavior = Some(prompt_required(lines, "Desired behavior: ")?);
            form.description = prompt_optional(lines, "Short summary? (optional): ")?;
        }
        TaskKind::ExplainFunctionality => {
            form.focus_area =
                Some(prompt_required(lines, "\nWhat functionality should be explained? ")?);
            form.explanation_level = prompt_optional(
                lines,
                "Explanation level (high-level/detailed/step-by-step, default detailed): ",
            )?;
        }
        TaskKind::ExplainArchitecture => {
            form.audience = prompt_optional(
                lines,
                "\nAudience (developer/technical/architect, default developer): ",
            )?;
            form.focus_area = prompt_optional(lines, "Any specific focus area? (optional): ")?;
        }
        TaskKind::DebugError => {
            form.error_context = Some(prompt_required(lines, "\nWhen does the error occur? ")?);
            form.error_message = prompt_optional(lines, "Error message (optional): ")?;
            form.expected_behavior = prompt_optional(lines, "Expected behavior (optional): ")?;
        }
    }

    Ok(form)
}

fn prompt_file_selection(
    analysis: &Analysis,
    lines: &mut Box<LineSource<'_>>,
) -> anyhow::Result<Vec<String>> {
    println!("\nSelect files to include:");
    println!("0. Include all source files");
    for (i, file) in analysis.source_files.iter().enumerate() {
        println!("{}. {}", i + 1, file);
    }

    let count = analysis.source_files.len();
    loop {
        let input = prompt(
            lines,
            &format!("\nEnter numbers (1-{count}) separated by commas, or 0 for all: "),
        )?;

        if input == "0" {
            return Ok(analysis.source_files.clone());
        }

        match parse_selection(&input, count) {
            Some(indices) => {
                return Ok(indices
                    .into_iter()
                    .map(|i| analysis.source_files[i].clone())
                    .collect());
            }
            None => println!("Invalid selection. Please try again."),
        }
    }
}

/// Parses a comma-separated list of 1-based indices into 0-based indices.
/// Returns `None` on any out-of-range or non-numeric entry.
fn parse_selection(input: &str, count: usize) -> Option<Vec<usize>> {
    let mut indices = Vec::new();
    for part in input.split(',') {
        let n: usize = part.trim().parse().ok()?;
        if n == 0 || n > count {
            return None;
        }
        indices.push(n - 1);
    }
    if indices.is_empty() {
        None
    } else {
        Some(indices)
    }
}
