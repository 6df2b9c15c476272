//! Observable project events.
//!
//! Events are published while workflow operations mutate the active project
//! so a renderer can update after every individual change, in particular
//! during the timed message reveal.

use crate::project::{Message, ProjectStep};
use serde::{Deserialize, Serialize};

/// High-level events published by the project workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProjectEvent {
    /// A single message became visible in the discussion history.
    MessageRevealed { message: Message },
    /// The project moved to a different workflow step.
    StepChanged { step: ProjectStep },
    /// The deliverables document was replaced.
    DeliverablesUpdated,
    /// Short user-facing notice (localized text).
    Notice { content: String },
}
