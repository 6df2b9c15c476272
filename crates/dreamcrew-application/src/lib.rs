//! DreamCrew application layer.
//!
//! Hosts the [`ProjectWorkflow`] - the UI-facing operations over the active
//! project - and the oracle-backed discussion and deliverable services it
//! sequences.

pub mod deliverable_service;
pub mod discussion_service;
pub mod workflow;

#[cfg(test)]
mod workflow_test;

pub use deliverable_service::DeliverableService;
pub use discussion_service::{DiscussionService, flatten_transcript};
pub use workflow::{DEFAULT_REVEAL_DELAY, ProjectWorkflow};
