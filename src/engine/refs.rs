//! engine::refs
//!
//! Branch and tag management.
//!
//! Refs are only ever created, never moved or overwritten: a name that is
//! taken fails with [`HistoryError::RefExists`] and leaves the existing ref
//! alone. Tags with a message are annotated; without one they are
//! lightweight.

use serde::Serialize;
use tracing::info;

use crate::core::types::{BranchName, Oid, RefName, TagName};
use crate::git::{Git, GitError, RefEntry};

use super::error::HistoryError;

/// Kind of a ref.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RefKind {
    Branch,
    Tag,
}

/// A named pointer to a commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ref {
    /// Full ref name (`refs/heads/main`)
    pub name: RefName,
    pub kind: RefKind,
    /// The commit the ref resolves to
    pub target: Oid,
    /// Tag object and message for annotated tags
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation: Option<Annotation>,
}

impl Ref {
    /// Short name (`main`, `v1.0`).
    pub fn short_name(&self) -> &str {
        self.name
            .strip_prefix(RefName::HEADS)
            .or_else(|| self.name.strip_prefix(RefName::TAGS))
            .unwrap_or(self.name.as_str())
    }
}

/// The tag object behind an annotated tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Annotation {
    pub object: Oid,
    pub message: String,
}

/// Creates, resolves and lists refs in one repository.
pub struct RefManager<'g> {
    git: &'g Git,
}

impl<'g> RefManager<'g> {
    pub fn new(git: &'g Git) -> Self {
        Self { git }
    }

    // =========================================================================
    // Creation
    // =========================================================================

    /// Create branch `name` at `target`.
    ///
    /// # Errors
    ///
    /// - [`HistoryError::TargetNotFound`] if `target` is not a commit
    /// - [`HistoryError::RefExists`] if the branch already exists
    pub fn create_branch(&self, name: &BranchName, target: &Oid) -> Result<Ref, HistoryError> {
        self.check_target(target)?;
        let refname = RefName::for_branch(name);
        self.git
            .create_ref(&refname, target, &format!("branch: Created from {target}"))
            .map_err(|e| creation_error(e, &refname, target))?;

        info!(branch = %name, target = %target, "created branch");
        Ok(Ref {
            name: refname,
            kind: RefKind::Branch,
            target: target.clone(),
            annotation: None,
        })
    }

    /// Create tag `name` at `target`, annotated when `message` is given.
    ///
    /// # Errors
    ///
    /// - [`HistoryError::TargetNotFound`] if `target` is not a commit
    /// - [`HistoryError::RefExists`] if the tag already exists
    pub fn create_tag(
        &self,
        name: &TagName,
        target: &Oid,
        message: Option<&str>,
    ) -> Result<Ref, HistoryError> {
        self.check_target(target)?;
        let refname = RefName::for_tag(name);
        if self.git.ref_exists(refname.as_str()) {
            return Err(HistoryError::RefExists { refname });
        }

        let annotation = match message {
            Some(message) => {
                let object = self
                    .git
                    .create_annotated_tag(name.as_str(), target, message)
                    .map_err(|e| creation_error(e, &refname, target))?;
                Some(Annotation {
                    object,
                    message: message.to_string(),
                })
            }
            None => {
                self.git
                    .create_ref(&refname, target, "tag: lightweight")
                    .map_err(|e| creation_error(e, &refname, target))?;
                None
            }
        };

        info!(tag = %name, target = %target, annotated = annotation.is_some(), "created tag");
        Ok(Ref {
            name: refname,
            kind: RefKind::Tag,
            target: target.clone(),
            annotation,
        })
    }

    fn check_target(&self, target: &Oid) -> Result<(), HistoryError> {
        match self.git.commit(target) {
            Ok(_) => Ok(()),
            Err(GitError::ObjectNotFound { .. }) => Err(HistoryError::TargetNotFound {
                target: target.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// The commit a full ref name resolves to, peeling annotated tags.
    ///
    /// # Errors
    ///
    /// [`HistoryError::NotFound`] if the ref does not exist.
    pub fn resolve(&self, refname: &str) -> Result<Oid, HistoryError> {
        self.git
            .try_resolve_ref(refname)?
            .ok_or_else(|| HistoryError::not_found(format!("ref {refname}")))
    }

    /// All branches, sorted by name.
    pub fn list_branches(&self) -> Result<Vec<Ref>, HistoryError> {
        self.list(RefName::HEADS, RefKind::Branch)
    }

    /// All tags, sorted by name.
    pub fn list_tags(&self) -> Result<Vec<Ref>, HistoryError> {
        self.list(RefName::TAGS, RefKind::Tag)
    }

    /// Branches whose tip is `commit`, sorted by name.
    pub fn branches_at(&self, commit: &Oid) -> Result<Vec<BranchName>, HistoryError> {
        let mut names = Vec::new();
        for entry in self.git.list_refs_by_prefix(RefName::HEADS)? {
            if &entry.oid != commit {
                continue;
            }
            if let Some(short) = entry.name.strip_prefix(RefName::HEADS) {
                names.push(BranchName::new(short)?);
            }
        }
        Ok(names)
    }

    fn list(&self, prefix: &str, kind: RefKind) -> Result<Vec<Ref>, HistoryError> {
        self.git
            .list_refs_by_prefix(prefix)?
            .into_iter()
            .map(|entry| self.to_ref(entry, kind))
            .collect()
    }

    fn to_ref(&self, entry: RefEntry, kind: RefKind) -> Result<Ref, HistoryError> {
        let annotation = match entry.tag_object {
            Some(object) => Some(Annotation {
                message: self.git.tag_message(&object)?,
                object,
            }),
            None => None,
        };
        Ok(Ref {
            name: entry.name,
            kind,
            target: entry.oid,
            annotation,
        })
    }
}

fn creation_error(err: GitError, refname: &RefName, target: &Oid) -> HistoryError {
    match err {
        GitError::RefExists { .. } => HistoryError::RefExists {
            refname: refname.clone(),
        },
        GitError::ObjectNotFound { .. } => HistoryError::TargetNotFound {
            target: target.to_string(),
        },
        GitError::InvalidRefName { message } => HistoryError::InvalidName { message },
        other => other.into(),
    }
}
