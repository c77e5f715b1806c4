//! Task descriptors for the five supported context-building intents.
//!
//! Each task kind carries its own strongly-typed field record, and the
//! per-kind instruction text is a pure function of the task value: a
//! dispatch on the tag, not a template engine.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// The five recognized task kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskKind {
    /// Add a new feature
    AddFeature,
    /// Change existing functionality
    ChangeFunctionality,
    /// Explain how specific functionality works
    ExplainFunctionality,
    /// Explain the overall architecture
    ExplainArchitecture,
    /// Debug an error or issue
    DebugError,
}

impl TaskKind {
    /// Returns the ID string for this kind.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::AddFeature => "add-feature",
            Self::ChangeFunctionality => "change-functionality",
            Self::ExplainFunctionality => "explain-functionality",
            Self::ExplainArchitecture => "explain-architecture",
            Self::DebugError => "debug-error",
        }
    }

    /// Returns all task kinds.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::AddFeature,
            Self::ChangeFunctionality,
            Self::ExplainFunctionality,
            Self::ExplainArchitecture,
            Self::DebugError,
        ]
    }

    /// Parse a task kind from its string ID.
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "add-feature" => Some(Self::AddFeature),
            "change-functionality" => Some(Self::ChangeFunctionality),
            "explain-functionality" => Some(Self::ExplainFunctionality),
            "explain-architecture" => Some(Self::ExplainArchitecture),
            "debug-error" => Some(Self::DebugError),
            _ => None,
        }
    }

    /// Document title for this kind.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::AddFeature => "Feature Development",
            Self::ChangeFunctionality => "Functionality Change",
            Self::ExplainFunctionality => "Functionality Explanation",
            Self::ExplainArchitecture => "Architecture Explanation",
            Self::DebugError => "Debug Assistance",
        }
    }

    /// Opening line for this kind.
    #[must_use]
    pub const fn intro(self) -> &'static str {
        match self {
            Self::AddFeature => "I want to add a new feature to my project.",
            Self::ChangeFunctionality => "I want to change how something currently works.",
            Self::ExplainFunctionality => {
                "I need help understanding how specific functionality works."
            }
            Self::ExplainArchitecture => "I need help understanding the overall architecture.",
            Self::DebugError => "I need help debugging an error or issue.",
        }
    }

    const fn focus_line(self) -> &'static str {
        match self {
            Self::AddFeature => {
                "Please help me implement this feature following the existing patterns."
            }
            Self::ChangeFunctionality => "Please help me modify the existing functionality.",
            Self::ExplainFunctionality => "Please explain how this functionality operates.",
            Self::ExplainArchitecture => {
                "Please explain the architectural design and component relationships."
            }
            Self::DebugError => "Please analyze the code and help identify the problem.",
        }
    }
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// Depth of explanation requested for `explain-functionality`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExplanationLevel {
    /// Purpose, inputs/outputs, how it fits the larger system
    HighLevel,
    /// Components, roles and implementation details
    #[default]
    Detailed,
    /// Execution flow walked through step by step
    StepByStep,
}

impl ExplanationLevel {
    /// Parse a level from its string ID.
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "high-level" => Some(Self::HighLevel),
            "detailed" => Some(Self::Detailed),
            "step-by-step" => Some(Self::StepByStep),
            _ => None,
        }
    }
}

/// Target audience for `explain-architecture`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Audience {
    /// Someone who will work in the codebase
    #[default]
    Developer,
    /// Someone evaluating the system design
    Technical,
    /// Someone reviewing patterns and principles
    Architect,
}

impl Audience {
    /// Parse an audience from its string ID.
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "developer" => Some(Self::Developer),
            "technical" => Some(Self::Technical),
            "architect" => Some(Self::Architect),
            _ => None,
        }
    }
}

/// Fields for an `add-feature` task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddFeature {
    /// What the feature should do (required)
    pub description: String,
    /// Additional requirements or constraints
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
}

/// Fields for a `change-functionality` task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeFunctionality {
    /// Short summary of the change
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// How it behaves today (required)
    pub current_behavior: String,
    /// How it should behave (required)
    pub desired_behavior: String,
}

/// Fields for an `explain-functionality` task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplainFunctionality {
    /// The functionality to explain (required)
    pub focus_area: String,
    /// Requested depth of explanation
    #[serde(default)]
    pub level: ExplanationLevel,
}

/// Fields for an `explain-architecture` task. All fields default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExplainArchitecture {
    /// Target audience for the explanation
    #[serde(default)]
    pub audience: Audience,
    /// Optional area to emphasize
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus_area: Option<String>,
}

/// Fields for a `debug-error` task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugError {
    /// When and how the problem occurs (required)
    pub error_context: String,
    /// The error message, if one is produced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// What should happen instead
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_behavior: Option<String>,
}

/// A validated context-building task: one case per kind, each with its own
/// typed field record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Task {
    /// Add a new feature
    #[serde(rename = "add-feature")]
    AddFeature(AddFeature),
    /// Change existing functionality
    #[serde(rename = "change-functionality")]
    ChangeFunctionality(ChangeFunctionality),
    /// Explain how specific functionality works
    #[serde(rename = "explain-functionality")]
    ExplainFunctionality(ExplainFunctionality),
    /// Explain the overall architecture
    #[serde(rename = "explain-architecture")]
    ExplainArchitecture(ExplainArchitecture),
    /// Debug an error or issue
    #[serde(rename = "debug-error")]
    DebugError(DebugError),
}

/// Flat wire form of a task, as collected by shells or an RPC boundary.
///
/// All fields are optional strings; [`Task::from_form`] performs the
/// per-kind required-field validation with field-specific errors so
/// callers can re-prompt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskForm {
    /// Task kind ID, e.g. `add-feature`
    pub kind: String,
    /// Feature or change description
    #[serde(default)]
    pub description: Option<String>,
    /// Area of the code to focus on
    #[serde(default)]
    pub focus_area: Option<String>,
    /// Additional requirements (`add-feature`)
    #[serde(default)]
    pub requirements: Option<String>,
    /// Behavior today (`change-functionality`)
    #[serde(default)]
    pub current_behavior: Option<String>,
    /// Behavior wanted (`change-functionality`)
    #[serde(default)]
    pub desired_behavior: Option<String>,
    /// Explanation depth (`explain-functionality`)
    #[serde(default)]
    pub explanation_level: Option<String>,
    /// Audience (`explain-architecture`)
    #[serde(default)]
    pub audience: Option<String>,
    /// Error message (`debug-error`)
    #[serde(default)]
    pub error_message: Option<String>,
    /// When the error occurs (`debug-error`)
    #[serde(default)]
    pub error_context: Option<String>,
    /// Expected behavior (`debug-error`)
    #[serde(default)]
    pub expected_behavior: Option<String>,
}

fn non_blank(value: Option<&String>) -> Option<String> {
    value
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

impl Task {
    /// Returns the kind tag of this task.
    #[must_use]
    pub const fn kind(&self) -> TaskKind {
        match self {
            Self::AddFeature(_) => TaskKind::AddFeature,
            Self::ChangeFunctionality(_) => TaskKind::ChangeFunctionality,
            Self::ExplainFunctionality(_) => TaskKind::ExplainFunctionality,
            Self::ExplainArchitecture(_) => TaskKind::ExplainArchitecture,
            Self::DebugError(_) => TaskKind::DebugError,
        }
    }

    /// Builds a validated task from a flat form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownTaskKind`] for an unrecognized kind and
    /// [`Error::MissingField`] naming the first missing required field.
    /// Blank strings count as missing.
    pub fn from_form(form: &TaskForm) -> Result<Self> {
        let kind = TaskKind::from_id(form.kind.trim()).ok_or_else(|| Error::UnknownTaskKind {
            kind: form.kind.clone(),
        })?;

        let require = |value: Option<&String>, field: &'static str| {
            non_blank(value).ok_or_else(|| Error::missing_field(kind.id(), field))
        };

        let task = match kind {
            TaskKind::AddFeature => Self::AddFeature(AddFeature {
                description: require(form.description.as_ref(), "description")?,
                requirements: non_blank(form.requirements.as_ref()),
            }),
            TaskKind::ChangeFunctionality => Self::ChangeFunctionality(ChangeFunctionality {
                description: non_blank(form.description.as_ref()),
                current_behavior: require(form.current_behavior.as_ref(), "current_behavior")?,
                desired_behavior: require(form.desired_behavior.as_ref(), "desired_behavior")?,
            }),
            TaskKind::ExplainFunctionality => Self::ExplainFunctionality(ExplainFunctionality {
                focus_area: require(form.focus_area.as_ref(), "focus_area")?,
                level: match non_blank(form.explanation_level.as_ref()) {
                    Some(value) => ExplanationLevel::from_id(&value).ok_or_else(|| {
                        Error::config(format!("unknown explanation level '{value}'"))
                    })?,
                    None => ExplanationLevel::default(),
                },
            }),
            TaskKind::ExplainArchitecture => Self::ExplainArchitecture(ExplainArchitecture {
                audience: match non_blank(form.audience.as_ref()) {
                    Some(value) => Audience::from_id(&value)
                        .ok_or_else(|| Error::config(format!("unknown audience '{value}'")))?,
                    None => Audience::default(),
                },
                focus_area: non_blank(form.focus_area.as_ref()),
            }),
            TaskKind::DebugError => Self::DebugError(DebugError {
                error_context: require(form.error_context.as_ref(), "error_context")?,
                error_message: non_blank(form.error_message.as_ref()),
                expected_behavior: non_blank(form.expected_behavior.as_ref()),
            }),
        };

        Ok(task)
    }

    /// Checks required-field presence on an already constructed task.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingField`] for any blank required field.
    pub fn validate(&self) -> Result<()> {
        let kind = self.kind();
        let check = |value: &str, field: &'static str| {
            if value.trim().is_empty() {
                Err(Error::missing_field(kind.id(), field))
            } else {
                Ok(())
            }
        };

        match self {
            Self::AddFeature(fields) => check(&fields.description, "description"),
            Self::ChangeFunctionality(fields) => {
                check(&fields.current_behavior, "current_behavior")?;
                check(&fields.desired_behavior, "desired_behavior")
            }
            Self::ExplainFunctionality(fields) => check(&fields.focus_area, "focus_area"),
            Self::ExplainArchitecture(_) => Ok(()),
            Self::DebugError(fields) => check(&fields.error_context, "error_context"),
        }
    }

    /// Renders the task-specific instruction block.
    ///
    /// Pure function of the task value: the detail sections interpolate the
    /// task's fields, followed by the per-kind request list.
    #[must_use]
    pub fn instruction_block(&self) -> String {
        let mut out = String::new();

        match self {
            Self::AddFeature(fields) => {
                let _ = writeln!(out, "**Task**: {}\n", fields.description);
                if let Some(requirements) = &fields.requirements {
                    let _ = writeln!(out, "## Requirements\n\n{requirements}\n");
                }
            }
            Self::ChangeFunctionality(fields) => {
                if let Some(description) = &fields.description {
                    let _ = writeln!(out, "**Task**: {description}\n");
                }
                out.push_str("## Current vs Desired Behavior\n\n");
                let _ = writeln!(out, "**Current**: {}", fields.current_behavior);
                let _ = writeln!(out, "**Desired**: {}\n", fields.desired_behavior);
            }
            Self::ExplainFunctionality(fields) => {
                let _ = writeln!(out, "## Focus Area\n\n{}\n", fields.focus_area);
            }
            Self::ExplainArchitecture(fields) => {
                if let Some(focus_area) = &fields.focus_area {
                    let _ = writeln!(out, "## Focus Area\n\n{focus_area}\n");
                }
            }
            Self::DebugError(fields) => {
                out.push_str("## Error Details\n\n");
                if let Some(error_message) = &fields.error_message {
                    let _ = writeln!(out, "**Error Message**: {error_message}");
                }
                let _ = writeln!(out, "**When it occurs**: {}", fields.error_context);
                if let Some(expected_behavior) = &fields.expected_behavior {
                    let _ = writeln!(out, "**Expected behavior**: {expected_behavior}");
                }
                out.push('\n');
            }
        }

        out.push_str("## Request\n\n");
        out.push_str(self.kind().focus_line());
        out.push('\n');
        out.push_str(&self.request_list());

        out
    }

    fn request_list(&self) -> String {
        let items: &[&str] = match self {
            Self::AddFeature(_) => &[
                "Please provide:",
                "1. Implementation approach",
                "2. Required code changes",
                "3. Integration points with existing code",
            ],
            Self::ChangeFunctionality(_) => &[
                "Please provide:",
                "1. Analysis of current implementation",
                "2. Specific changes needed",
                "3. Potential impact on other components",
            ],
            Self::ExplainFunctionality(fields) => match fields.level {
                ExplanationLevel::HighLevel => &[
                    "Please provide a high-level overview focusing on:",
                    "1. Main purpose and responsibilities",
                    "2. Key inputs and outputs",
                    "3. How it fits into the larger system",
                ],
                ExplanationLevel::StepByStep => &[
                    "Please provide a step-by-step walkthrough including:",
                    "1. Detailed execution flow",
                    "2. Key decision points and logic",
                    "3. Data transformations at each step",
                ],
                ExplanationLevel::Detailed => &[
                    "Please provide a detailed explanation including:",
                    "1. How the functionality works",
                    "2. Key components and their roles",
                    "3. Important implementation details",
                ],
            },
            Self::ExplainArchitecture(fields) => match fields.audience {
                Audience::Architect => &[
                    "Please provide an architectural analysis including:",
                    "1. Design patterns and architectural principles",
                    "2. Component relationships and dependencies",
                    "3. Scalability and maintainability considerations",
                ],
                Audience::Technical => &[
                    "Please provide a technical overview including:",
                    "1. High-level system design",
                    "2. Key technologies and frameworks",
                    "3. Data flow and integration points",
                ],
                Audience::Developer => &[
                    "Please provide a developer-friendly explanation including:",
                    "1. Overall structure and organization",
                    "2. Main components and their purposes",
                    "3. How to navigate and work with the project",
                ],
            },
            Self::DebugError(_) => &[
                "Please provide:",
                "1. Analysis of the potential issue",
                "2. Specific code changes needed",
                "3. Explanation of why this fixes the problem",
                "4. Steps to test the fix",
            ],
        };

        let mut out = items.join("\n");
        out.push('\n');
        out
    }
}
