//! engine::resource
//!
//! Classify a selected path as a project, folder or file, and find the
//! project that owns it.
//!
//! # Projects
//!
//! A directory is a project root if it is listed in the configured
//! `projects`, or if it directly contains one of the configured marker files
//! (`.project` by default). The owning project of a path is its nearest
//! project-root ancestor, counting the path itself when it is a directory.
//! With no project root above it, a path belongs to the repository root.
//!
//! # Lookup order
//!
//! Paths are looked up in the snapshot of the start commit. A path absent
//! there (new, untracked work) falls back to the working directory.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::scope::Resource;
use crate::core::types::{Oid, RepoPath};

use super::error::HistoryError;
use super::store::CommitStore;

/// Resolves repository paths into [`Resource`]s.
pub struct ResourceResolver<'s, S: CommitStore + ?Sized> {
    store: &'s S,
    tree: Option<Oid>,
    work_dir: Option<PathBuf>,
    markers: Vec<String>,
    projects: Vec<RepoPath>,
}

impl<'s, S: CommitStore + ?Sized> ResourceResolver<'s, S> {
    /// Resolve against the snapshot `tree` (None for an empty repository).
    pub fn new(store: &'s S, tree: Option<Oid>, markers: Vec<String>) -> Self {
        Self {
            store,
            tree,
            work_dir: None,
            markers,
            projects: Vec::new(),
        }
    }

    /// Fall back to this working directory for paths the snapshot lacks.
    pub fn with_work_dir(mut self, work_dir: impl Into<PathBuf>) -> Self {
        self.work_dir = Some(work_dir.into());
        self
    }

    /// Treat these directories as project roots regardless of markers.
    pub fn with_projects(mut self, projects: Vec<RepoPath>) -> Self {
        self.projects = projects;
        self
    }

    /// Classify `path`.
    ///
    /// # Errors
    ///
    /// [`HistoryError::NotFound`] if the path exists in neither the
    /// snapshot nor the working directory.
    pub fn resolve(&self, path: &RepoPath) -> Result<Resource, HistoryError> {
        let is_dir = self
            .is_dir(path)?
            .ok_or_else(|| HistoryError::not_found(format!("resource '{path}'")))?;

        let search_from = if is_dir {
            Some(path.clone())
        } else {
            path.parent()
        };
        let mut project = RepoPath::root();
        for dir in search_from.iter().flat_map(RepoPath::ancestors) {
            if self.is_project_root(&dir)? {
                project = dir;
                break;
            }
        }

        debug!(path = %path, is_dir, project = %project, "resolved resource");
        Ok(Resource::new(path.clone(), is_dir, project)?)
    }

    /// Whether `dir` is a project root.
    pub fn is_project_root(&self, dir: &RepoPath) -> Result<bool, HistoryError> {
        if self.projects.contains(dir) {
            return Ok(true);
        }
        for marker in &self.markers {
            let candidate = dir.join(marker)?;
            if self.is_dir(&candidate)? == Some(false) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// `Some(is_dir)` if `path` exists, `None` otherwise.
    fn is_dir(&self, path: &RepoPath) -> Result<Option<bool>, HistoryError> {
        if let Some(tree) = &self.tree {
            if let Some(entry) = self.store.entry_at(tree, path)? {
                return Ok(Some(entry.is_dir));
            }
        }
        Ok(self
            .work_dir
            .as_deref()
            .and_then(|root| on_disk(root, path)))
    }
}

fn on_disk(root: &Path, path: &RepoPath) -> Option<bool> {
    let full = if path.is_root() {
        root.to_path_buf()
    } else {
        root.join(path.as_str())
    };
    std::fs::metadata(full).ok().map(|m| m.is_dir())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scope::ResourceKind;
    use crate::engine::memory::{MemoryStore, Tree};
    use chrono::DateTime;

    fn path(s: &str) -> RepoPath {
        RepoPath::new(s).unwrap()
    }

    fn snapshot(files: &[&str]) -> (MemoryStore, Oid) {
        let tree: Tree = files
            .iter()
            .map(|p| (path(p), MemoryStore::blob(p.as_bytes())))
            .collect();
        let mut store = MemoryStore::new();
        let id = store.insert(&[], tree, "init", DateTime::UNIX_EPOCH).unwrap();
        let tree = store.lookup(&id).unwrap().tree;
        (store, tree)
    }

    fn layout() -> (MemoryStore, Oid) {
        snapshot(&[
            "GeneralProject/.project",
            "GeneralProject/folder/test.txt",
            "JavaProject/.project",
            "README.md",
            "docs/guide.md",
        ])
    }

    fn markers() -> Vec<String> {
        vec![".project".to_string()]
    }

    #[test]
    fn classifies_by_kind() {
        let (store, tree) = layout();
        let resolver = ResourceResolver::new(&store, Some(tree), markers());

        let project = resolver.resolve(&path("GeneralProject")).unwrap();
        assert_eq!(project.kind, ResourceKind::Project);
        assert_eq!(project.project, path("GeneralProject"));

        let folder = resolver.resolve(&path("GeneralProject/folder")).unwrap();
        assert_eq!(folder.kind, ResourceKind::Folder);
        assert_eq!(folder.project, path("GeneralProject"));

        let file = resolver.resolve(&path("GeneralProject/folder/test.txt")).unwrap();
        assert_eq!(file.kind, ResourceKind::File);
        assert_eq!(file.project, path("GeneralProject"));
    }

    #[test]
    fn unowned_paths_belong_to_repository_root() {
        let (store, tree) = layout();
        let resolver = ResourceResolver::new(&store, Some(tree), markers());

        let readme = resolver.resolve(&path("README.md")).unwrap();
        assert_eq!(readme.project, RepoPath::root());
        assert_eq!(readme.kind, ResourceKind::File);

        let docs = resolver.resolve(&path("docs")).unwrap();
        assert_eq!(docs.kind, ResourceKind::Folder);

        let root = resolver.resolve(&RepoPath::root()).unwrap();
        assert_eq!(root.kind, ResourceKind::Project);
    }

    #[test]
    fn configured_projects_need_no_marker() {
        let (store, tree) = layout();
        let resolver = ResourceResolver::new(&store, Some(tree), markers())
            .with_projects(vec![path("docs")]);
        let guide = resolver.resolve(&path("docs/guide.md")).unwrap();
        assert_eq!(guide.project, path("docs"));
    }

    #[test]
    fn marker_directory_does_not_count() {
        let (store, tree) = snapshot(&["p/.project/inner", "p/file"]);
        let resolver = ResourceResolver::new(&store, Some(tree), markers());
        assert_eq!(resolver.resolve(&path("p/file")).unwrap().project, RepoPath::root());
    }

    #[test]
    fn missing_path_not_found() {
        let (store, tree) = layout();
        let resolver = ResourceResolver::new(&store, Some(tree), markers());
        assert!(matches!(
            resolver.resolve(&path("GeneralProject/nope.txt")),
            Err(HistoryError::NotFound { .. })
        ));
    }

    #[test]
    fn working_directory_fallback() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("NewProject/src")).unwrap();
        std::fs::write(temp.path().join("NewProject/.project"), "").unwrap();
        std::fs::write(temp.path().join("NewProject/src/lib.txt"), "x").unwrap();

        let (store, tree) = layout();
        let resolver =
            ResourceResolver::new(&store, Some(tree), markers()).with_work_dir(temp.path());
        let file = resolver.resolve(&path("NewProject/src/lib.txt")).unwrap();
        assert_eq!(file.kind, ResourceKind::File);
        assert_eq!(file.project, path("NewProject"));
    }
}
