//! Project repository trait.
//!
//! Defines the interface for project persistence, decoupling the workflow
//! from the specific storage mechanism (local JSON blob, in-memory store
//! in tests, ...).

use super::model::Project;
use crate::error::Result;
use async_trait::async_trait;

/// An abstract repository for the local project collection.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Lists all stored projects, most recently updated first.
    async fn list_all(&self) -> Result<Vec<Project>>;

    /// Finds a project by its ID.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Project))`: project found
    /// - `Ok(None)`: project not found
    /// - `Err(_)`: storage error
    async fn find_by_id(&self, project_id: &str) -> Result<Option<Project>>;

    /// Inserts or updates a project.
    ///
    /// Stamps `updated_at` with the current time; `created_at` is stamped
    /// only on first insert. Returns the project as persisted.
    async fn upsert(&self, project: &Project) -> Result<Project>;

    /// Deletes a project from storage.
    ///
    /// # Errors
    ///
    /// Returns a NotFound error when no project has the given id.
    async fn delete(&self, project_id: &str) -> Result<()>;
}
