//! Project entity and its lifecycle state machine.
//!
//! A project walks a three-step workflow: brief intake, crew discussion,
//! delivery. All mutation goes through the lifecycle operations here;
//! presentation code never edits fields directly.

use super::brief::Brief;
use super::deliverables::Deliverables;
use super::message::Message;
use crate::error::{DreamCrewError, Result};
use serde::{Deserialize, Serialize};

/// Default display name for a project without a submitted brief.
pub const UNNAMED_PROJECT: &str = "未命名项目";

/// The three workflow steps, stored as their step number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum ProjectStep {
    /// Step 1: brief intake
    Brief = 1,
    /// Step 2: crew discussion
    Discussion = 2,
    /// Step 3: deliverables workspace
    Delivery = 3,
}

impl ProjectStep {
    /// Localized label used by the progress stepper.
    pub fn label(self) -> &'static str {
        match self {
            ProjectStep::Brief => "简报",
            ProjectStep::Discussion => "团队研讨",
            ProjectStep::Delivery => "交付全案",
        }
    }
}

impl From<ProjectStep> for u8 {
    fn from(step: ProjectStep) -> Self {
        step as u8
    }
}

impl TryFrom<u8> for ProjectStep {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            1 => Ok(ProjectStep::Brief),
            2 => Ok(ProjectStep::Discussion),
            3 => Ok(ProjectStep::Delivery),
            other => Err(format!("invalid project step: {other}")),
        }
    }
}

/// A saved project: brief, discussion history, and (once generated)
/// the deliverables document.
///
/// Invariants:
/// - `step` only moves forward, except the explicit delivery→discussion
///   rollback after a failed generation.
/// - `deliverables` is `Some` iff a generation succeeded at least once.
/// - `discussion_history` is append-only between brief submissions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Unique project identifier (UUID format)
    pub id: String,
    /// Human-readable project name, derived from the brief on submit
    pub name: String,
    /// Timestamp when the project was created (ISO 8601 format)
    pub created_at: String,
    /// Timestamp when the project was last updated (ISO 8601 format)
    pub updated_at: String,
    /// Current workflow step
    pub step: ProjectStep,
    /// The project brief
    pub brief: Brief,
    /// Ordered message log mixing user and persona entries
    #[serde(default)]
    pub discussion_history: Vec<Message>,
    /// Generated output document, present once generation has succeeded
    #[serde(default)]
    pub deliverables: Option<Deliverables>,
}

impl Project {
    /// Creates a fresh project at the brief step with default brief values.
    pub fn new() -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: UNNAMED_PROJECT.to_string(),
            created_at: now.clone(),
            updated_at: now,
            step: ProjectStep::Brief,
            brief: Brief::default(),
            discussion_history: Vec::new(),
            deliverables: None,
        }
    }

    /// Submits the brief and advances to the discussion step.
    ///
    /// Clears any previous discussion history and derives the project name
    /// from the brief. Only valid at [`ProjectStep::Brief`].
    ///
    /// # Errors
    ///
    /// [`DreamCrewError::InvalidTransition`] when called from any other step;
    /// [`DreamCrewError::IncompleteBrief`] when a brief field is empty.
    pub fn submit_brief(&mut self, brief: Brief) -> Result<()> {
        self.require_step(ProjectStep::Brief, "submit_brief")?;
        brief.validate()?;

        self.name = format!("{} - {}", brief.industry, brief.topic);
        self.brief = brief;
        self.discussion_history.clear();
        self.step = ProjectStep::Discussion;
        Ok(())
    }

    /// Optimistically advances to the delivery step.
    ///
    /// The caller is expected to roll back via [`Project::revert_to_discussion`]
    /// when the subsequent generation fails. Only valid at
    /// [`ProjectStep::Discussion`].
    pub fn advance_to_delivery(&mut self) -> Result<()> {
        self.require_step(ProjectStep::Discussion, "advance_to_delivery")?;
        self.step = ProjectStep::Delivery;
        Ok(())
    }

    /// Rolls back a failed delivery advance.
    ///
    /// Leaves the discussion history and any previously generated
    /// deliverables untouched. Only valid at [`ProjectStep::Delivery`].
    pub fn revert_to_discussion(&mut self) -> Result<()> {
        self.require_step(ProjectStep::Delivery, "revert_to_discussion")?;
        self.step = ProjectStep::Discussion;
        Ok(())
    }

    /// Appends a message to the discussion history.
    pub fn append_message(&mut self, message: Message) {
        self.discussion_history.push(message);
    }

    /// Replaces the deliverables document. Only valid at
    /// [`ProjectStep::Delivery`].
    pub fn set_deliverables(&mut self, deliverables: Deliverables) -> Result<()> {
        self.require_step(ProjectStep::Delivery, "set_deliverables")?;
        self.deliverables = Some(deliverables);
        Ok(())
    }

    fn require_step(&self, expected: ProjectStep, operation: &'static str) -> Result<()> {
        if self.step != expected {
            return Err(DreamCrewError::InvalidTransition {
                operation,
                step: self.step,
            });
        }
        Ok(())
    }
}

impl Default for Project {
    fn default() -> Self {
        Self::new()
    }
}
