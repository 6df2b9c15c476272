//! DreamCrew infrastructure layer: local persistence.

pub mod json_project_store;
pub mod paths;

pub use json_project_store::JsonProjectStore;
pub use paths::DreamCrewPaths;
