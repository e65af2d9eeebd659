//! Multi-project records, index, and active-project pointer.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::storage::{Storage, StorageError};
use crate::id::ProjectId;
use crate::project::{current_timestamp_ms, Project};
use crate::sanitize::parse_stored;

/// Key prefix for per-project records.
pub const PROJECT_KEY_PREFIX: &str = "sketchflow-project-";
/// Key of the project index.
pub const INDEX_KEY: &str = "sketchflow-index";
/// Key of the last-active project pointer.
pub const ACTIVE_KEY: &str = "sketchflow-active";
/// Key of the single-project record written by older builds.
pub const LEGACY_KEY: &str = "sketchflow-project";

/// One row of the project index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexEntry {
    /// Project id.
    pub id: ProjectId,
    /// Project name at last save.
    pub name: String,
    /// Last save time in milliseconds since the Unix epoch.
    pub updated_at: u64,
}

/// Reads and writes projects through a [`Storage`] backend.
///
/// Read paths never fail: unreadable or unparsable records are reported as
/// absent and logged.
#[derive(Debug, Clone)]
pub struct ProjectRepository {
    storage: Arc<dyn Storage>,
}

impl ProjectRepository {
    /// Create a repository over `storage`.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// All indexed projects, most recently updated first.
    #[must_use]
    pub fn list(&self) -> Vec<IndexEntry> {
        let mut entries = self.read_index();
        entries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        entries
    }

    /// Load a project by id.
    #[must_use]
    pub fn load(&self, id: &ProjectId) -> Option<Project> {
        let raw = self.read_key(&project_key(id))?;
        let mut project = parse_stored(&raw)?;
        // The record key is authoritative for the id.
        project.id = id.clone();
        Some(project)
    }

    /// Whether a record exists for `id`.
    #[must_use]
    pub fn contains(&self, id: &ProjectId) -> bool {
        self.read_key(&project_key(id)).is_some()
    }

    /// Write a project, refresh its index entry, and mark it active.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects a write.
    pub fn save(&self, project: &Project) -> Result<(), StorageError> {
        let json = serde_json::to_string(project)
            .map_err(|e| StorageError::Unavailable(format!("serialize failed: {e}")))?;
        self.storage.set(&project_key(&project.id), &json)?;

        let mut index = self.read_index();
        let entry = IndexEntry {
            id: project.id.clone(),
            name: project.name.clone(),
            updated_at: current_timestamp_ms(),
        };
        match index.iter_mut().find(|e| e.id == project.id) {
            Some(existing) => *existing = entry,
            None => index.push(entry),
        }
        self.write_index(&index)?;
        self.set_active(&project.id)
    }

    /// Remove a project record and its index entry.
    ///
    /// Returns whether either existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects a read or write.
    pub fn delete(&self, id: &ProjectId) -> Result<bool, StorageError> {
        let key = project_key(id);
        let had_record = self.storage.get(&key)?.is_some();
        self.storage.remove(&key)?;

        let mut index = self.read_index();
        let before = index.len();
        index.retain(|e| &e.id != id);
        let had_entry = index.len() != before;
        if had_entry {
            self.write_index(&index)?;
        }

        if self.active_id().as_ref() == Some(id) {
            self.storage.remove(ACTIVE_KEY)?;
        }
        Ok(had_record || had_entry)
    }

    /// The last-active project id, if recorded.
    #[must_use]
    pub fn active_id(&self) -> Option<ProjectId> {
        self.read_key(ACTIVE_KEY)
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .map(ProjectId::from_string)
    }

    /// Record `id` as the last-active project.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write.
    pub fn set_active(&self, id: &ProjectId) -> Result<(), StorageError> {
        self.storage.set(ACTIVE_KEY, id.as_str())
    }

    /// Resolve the project to open at startup.
    ///
    /// Tries, in order: the active pointer, the most recently updated
    /// indexed project, a record missing from the index (re-indexed), a
    /// legacy single-project record (migrated to the current layout), and
    /// finally a fresh project.
    #[must_use]
    pub fn load_initial(&self) -> Project {
        if let Some(project) = self.active_id().and_then(|id| self.load(&id)) {
            tracing::debug!(project = %project.id, "Resuming active project");
            return project;
        }

        if let Some(project) = self.list().iter().find_map(|entry| self.load(&entry.id)) {
            tracing::debug!(project = %project.id, "Resuming most recent project");
            return project;
        }

        if let Some(project) = self.unindexed_ids().iter().find_map(|id| self.load(id)) {
            tracing::info!(project = %project.id, "Recovering unindexed project record");
            if let Err(e) = self.save(&project) {
                tracing::warn!("Failed to re-index project: {e}");
            }
            return project;
        }

        if let Some(project) = self.read_key(LEGACY_KEY).and_then(|raw| parse_stored(&raw)) {
            tracing::info!(project = %project.id, "Migrating legacy project record");
            match self.save(&project) {
                Ok(()) => {
                    if let Err(e) = self.storage.remove(LEGACY_KEY) {
                        tracing::warn!("Failed to remove legacy record: {e}");
                    }
                }
                Err(e) => tracing::warn!("Failed to migrate legacy record: {e}"),
            }
            return project;
        }

        tracing::debug!("No stored project; starting fresh");
        Project::new()
    }

    /// Ids of project records present in storage but absent from the index.
    fn unindexed_ids(&self) -> Vec<ProjectId> {
        let keys = match self.storage.keys() {
            Ok(keys) => keys,
            Err(e) => {
                tracing::warn!("Failed to list stored keys: {e}");
                return Vec::new();
            }
        };
        let index = self.read_index();
        keys.iter()
            .filter_map(|key| key.strip_prefix(PROJECT_KEY_PREFIX))
            .map(ProjectId::from_string)
            .filter(|id| !index.iter().any(|entry| &entry.id == id))
            .collect()
    }

    fn read_key(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Failed to read {key}: {e}");
                None
            }
        }
    }

    fn read_index(&self) -> Vec<IndexEntry> {
        let Some(raw) = self.read_key(INDEX_KEY) else {
            return Vec::new();
        };
        match serde_json::from_str::<Vec<serde_json::Value>>(&raw) {
            // Skip malformed rows rather than losing the whole index.
            Ok(rows) => rows
                .into_iter()
                .filter_map(|row| serde_json::from_value(row).ok())
                .collect(),
            Err(e) => {
                tracing::warn!("Failed to parse project index: {e}");
                Vec::new()
            }
        }
    }

    fn write_index(&self, index: &[IndexEntry]) -> Result<(), StorageError> {
        let json = serde_json::to_string(index)
            .map_err(|e| StorageError::Unavailable(format!("serialize failed: {e}")))?;
        self.storage.set(INDEX_KEY, &json)
    }
}

fn project_key(id: &ProjectId) -> String {
    format!("{PROJECT_KEY_PREFIX}{id}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::storage::MemoryStorage;

    fn repo() -> (ProjectRepository, MemoryStorage) {
        let storage = MemoryStorage::new();
        (ProjectRepository::new(Arc::new(storage.clone())), storage)
    }

    #[test]
    fn test_save_and_load() {
        let (repo, _) = repo();
        let mut project = Project::new();
        project.name = "Checkout".to_string();
        repo.save(&project).expect("save");

        let loaded = repo.load(&project.id).expect("load");
        assert_eq!(loaded, project);
        assert_eq!(repo.active_id(), Some(project.id.clone()));
        assert!(repo.contains(&project.id));
    }

    #[test]
    fn test_index_upserts_and_sorts() {
        let (repo, storage) = repo();
        let a = Project::new();
        let b = Project::new();
        repo.save(&a).expect("save a");
        repo.save(&b).expect("save b");
        repo.save(&a).expect("save a again");

        let list = repo.list();
        assert_eq!(list.len(), 2);
        assert!(list[0].updated_at >= list[1].updated_at);

        let raw = storage.get(INDEX_KEY).expect("get").expect("index");
        assert!(raw.contains("updatedAt"));
    }

    #[test]
    fn test_delete_removes_record_and_entry() {
        let (repo, _) = repo();
        let a = Project::new();
        let b = Project::new();
        repo.save(&a).expect("save a");
        repo.save(&b).expect("save b");

        assert!(repo.delete(&a.id).expect("delete"));
        assert!(repo.load(&a.id).is_none());
        assert_eq!(repo.list().len(), 1);
        assert_eq!(repo.active_id(), Some(b.id));

        assert!(!repo.delete(&a.id).expect("delete again"));
        assert!(!repo.delete(&ProjectId::new()).expect("delete unknown"));
        assert_eq!(repo.list().len(), 1);
    }

    #[test]
    fn test_load_initial_recovers_unindexed_record() {
        let (repo, storage) = repo();
        let mut lost = Project::new();
        lost.name = "Lost".to_string();
        storage
            .set(
                &project_key(&lost.id),
                &serde_json::to_string(&lost).expect("json"),
            )
            .expect("seed");

        let loaded = repo.load_initial();
        assert_eq!(loaded.id, lost.id);
        assert_eq!(loaded.name, "Lost");
        assert_eq!(repo.list().len(), 1);
        assert_eq!(repo.active_id(), Some(lost.id));
    }

    #[test]
    fn test_load_initial_prefers_active() {
        let (repo, _) = repo();
        let a = Project::new();
        let b = Project::new();
        repo.save(&b).expect("save b");
        repo.save(&a).expect("save a");
        repo.set_active(&b.id).expect("activate b");

        assert_eq!(repo.load_initial().id, b.id);
    }

    #[test]
    fn test_load_initial_falls_back_to_index() {
        let (repo, storage) = repo();
        let a = Project::new();
        repo.save(&a).expect("save");
        storage.set(ACTIVE_KEY, "missing").expect("point elsewhere");

        assert_eq!(repo.load_initial().id, a.id);
    }

    #[test]
    fn test_load_initial_migrates_legacy() {
        let (repo, storage) = repo();
        let mut legacy = Project::new();
        legacy.name = "Old".to_string();
        storage
            .set(LEGACY_KEY, &serde_json::to_string(&legacy).expect("json"))
            .expect("seed");

        let loaded = repo.load_initial();
        assert_eq!(loaded.name, "Old");
        assert!(storage.get(LEGACY_KEY).expect("get").is_none());
        assert!(repo.load(&loaded.id).is_some());
        assert_eq!(repo.list().len(), 1);
    }

    #[test]
    fn test_load_initial_survives_garbage() {
        let (repo, storage) = repo();
        storage.set(ACTIVE_KEY, "abc").expect("seed");
        storage
            .set(&format!("{PROJECT_KEY_PREFIX}abc"), "{not json")
            .expect("seed");
        storage.set(INDEX_KEY, "also not json").expect("seed");
        storage.set(LEGACY_KEY, "[1,2,3]").expect("seed");

        let project = repo.load_initial();
        assert_eq!(project.screens.len(), 1);
    }

    #[test]
    fn test_index_skips_malformed_rows() {
        let (repo, storage) = repo();
        storage
            .set(
                INDEX_KEY,
                r#"[{"id":"a","name":"A","updatedAt":5},{"bogus":true}]"#,
            )
            .expect("seed");
        let list = repo.list();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].name, "A");
    }
}
