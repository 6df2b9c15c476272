//! JSON file-backed project store.
//!
//! The whole collection lives in one keyed blob (`projects.json`); every
//! mutation is a read-modify-write of the full file. An absent or corrupt
//! blob reads as an empty collection - this store is a local cache, not the
//! source of truth, so a damaged payload must never crash the caller.

use crate::paths::DreamCrewPaths;
use async_trait::async_trait;
use dreamcrew_core::error::{DreamCrewError, Result};
use dreamcrew_core::project::{Project, ProjectRepository};
use std::path::PathBuf;
use tokio::sync::Mutex;

/// [`ProjectRepository`] implementation over a single JSON file.
pub struct JsonProjectStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles. The UI is logically
    /// single-threaded, but the lock keeps the file consistent if two
    /// mutations ever overlap.
    write_lock: Mutex<()>,
}

impl JsonProjectStore {
    /// Creates a store over an explicit file path.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    /// Creates a store at the platform-default location.
    pub fn try_default() -> Result<Self> {
        let paths = DreamCrewPaths::new(None);
        Ok(Self::new(paths.projects_file()?))
    }

    async fn read_collection(&self) -> Vec<Project> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(err) => {
                tracing::warn!(
                    "[JsonProjectStore] Failed to read {}: {}",
                    self.path.display(),
                    err
                );
                return Vec::new();
            }
        };

        match serde_json::from_str(&content) {
            Ok(projects) => projects,
            Err(err) => {
                tracing::warn!(
                    "[JsonProjectStore] Corrupt project collection at {}, treating as empty: {}",
                    self.path.display(),
                    err
                );
                Vec::new()
            }
        }
    }

    async fn write_collection(&self, projects: &[Project]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|err| DreamCrewError::io(err.to_string()))?;
        }
        let payload = serde_json::to_string_pretty(projects)?;
        tokio::fs::write(&self.path, payload)
            .await
            .map_err(|err| DreamCrewError::io(err.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl ProjectRepository for JsonProjectStore {
    async fn list_all(&self) -> Result<Vec<Project>> {
        let mut projects = self.read_collection().await;
        projects.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(projects)
    }

    async fn find_by_id(&self, project_id: &str) -> Result<Option<Project>> {
        Ok(self
            .read_collection()
            .await
            .into_iter()
            .find(|project| project.id == project_id))
    }

    async fn upsert(&self, project: &Project) -> Result<Project> {
        let _guard = self.write_lock.lock().await;
        let mut projects = self.read_collection().await;

        let now = chrono::Utc::now().to_rfc3339();
        let mut stored = project.clone();
        stored.updated_at = now.clone();

        match projects.iter_mut().find(|p| p.id == project.id) {
            Some(existing) => {
                stored.created_at = existing.created_at.clone();
                *existing = stored.clone();
            }
            None => {
                stored.created_at = now;
                projects.push(stored.clone());
            }
        }

        self.write_collection(&projects).await?;
        Ok(stored)
    }

    async fn delete(&self, project_id: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut projects = self.read_collection().await;

        let Some(index) = projects.iter().position(|p| p.id == project_id) else {
            return Err(DreamCrewError::not_found("project", project_id));
        };
        projects.remove(index);

        self.write_collection(&projects).await
    }
}
