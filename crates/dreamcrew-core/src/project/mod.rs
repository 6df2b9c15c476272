//! Project domain: brief, messages, deliverables, lifecycle, persistence.

mod brief;
mod deliverables;
mod message;
mod model;
mod repository;

pub use brief::{
    Brief, DEFAULT_DURATION, INDUSTRIES, SHOT_COUNTS, USAGE_FORMATS, VISUAL_STYLES,
};
pub use deliverables::{Deliverables, FactCheck, Scene, StrategicPlan, VerificationStatus};
pub use message::{Message, MessageRole};
pub use model::{Project, ProjectStep, UNNAMED_PROJECT};
pub use repository::ProjectRepository;
