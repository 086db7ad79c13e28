//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`Oid`] - Git object identifier (SHA-1 or SHA-256 hex)
//! - [`BranchName`] - Validated branch name (short form)
//! - [`TagName`] - Validated tag name (short form)
//! - [`RefName`] - Validated fully-qualified reference name
//! - [`RepoPath`] - Normalized repository-relative path
//!
//! # Validation
//!
//! These types enforce validity at construction time. Invalid values
//! cannot be represented, so the engine never has to re-check them.
//!
//! # Examples
//!
//! ```
//! use lineage::core::types::{BranchName, Oid, RefName, RepoPath};
//!
//! let branch = BranchName::new("feature/history").unwrap();
//! let refname = RefName::for_branch(&branch);
//! assert_eq!(refname.as_str(), "refs/heads/feature/history");
//!
//! let path = RepoPath::new("project/folder/file.txt").unwrap();
//! assert_eq!(path.parent().unwrap().as_str(), "project/folder");
//!
//! assert!(BranchName::new("invalid..name").is_err());
//! assert!(Oid::new("not-a-sha").is_err());
//! assert!(RepoPath::new("../outside").is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid branch name: {0}")]
    InvalidBranchName(String),

    #[error("invalid tag name: {0}")]
    InvalidTagName(String),

    #[error("invalid object id: {0}")]
    InvalidOid(String),

    #[error("invalid ref name: {0}")]
    InvalidRefName(String),

    #[error("invalid repository path: {0}")]
    InvalidPath(String),
}

/// Check a name against git's refname rules (`git check-ref-format`).
///
/// Shared by branch, tag and full ref names; the caller wraps the message
/// in its own error variant.
fn check_refname(name: &str, what: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err(format!("{what} cannot be empty"));
    }
    if name == "@" {
        return Err(format!("{what} cannot be '@' (reserved)"));
    }
    if name.starts_with('/') || name.ends_with('/') {
        return Err(format!("{what} cannot start or end with '/'"));
    }
    if name.ends_with('.') {
        return Err(format!("{what} cannot end with '.'"));
    }
    for bad in ["..", "@{", "//"] {
        if name.contains(bad) {
            return Err(format!("{what} cannot contain '{bad}'"));
        }
    }

    const INVALID_CHARS: [char; 8] = [' ', '~', '^', ':', '\\', '?', '*', '['];
    if let Some(c) = name.chars().find(|c| INVALID_CHARS.contains(c)) {
        return Err(format!("{what} cannot contain '{c}'"));
    }
    if name.chars().any(|c| c.is_ascii_control()) {
        return Err(format!("{what} cannot contain control characters"));
    }

    for component in name.split('/') {
        if component.starts_with('.') {
            return Err("path component cannot start with '.'".to_string());
        }
        if component.ends_with(".lock") {
            return Err("path component cannot end with '.lock'".to_string());
        }
    }

    Ok(())
}

macro_rules! string_newtype_impls {
    ($ty:ident) => {
        impl TryFrom<String> for $ty {
            type Error = TypeError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::new(s)
            }
        }

        impl From<$ty> for String {
            fn from(value: $ty) -> Self {
                value.0
            }
        }

        impl AsRef<str> for $ty {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

/// A git object identifier (SHA-1 or SHA-256).
///
/// OIDs are normalized to lowercase. Ordering is lexicographic on the hex
/// form, which the history walk uses as its final tie-breaker.
///
/// ```
/// use lineage::core::types::Oid;
///
/// let oid = Oid::new("ABC123DEF4567890ABC123DEF4567890ABC12345").unwrap();
/// assert_eq!(oid.as_str(), "abc123def4567890abc123def4567890abc12345");
/// assert_eq!(oid.short(7), "abc123d");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Oid(String);

impl Oid {
    /// Create a new validated object id.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidOid` if the string is not a full hex OID.
    pub fn new(oid: impl Into<String>) -> Result<Self, TypeError> {
        let oid = oid.into().to_ascii_lowercase();
        if oid.len() != 40 && oid.len() != 64 {
            return Err(TypeError::InvalidOid(format!(
                "expected 40 or 64 hex characters, got {}",
                oid.len()
            )));
        }
        if !oid.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TypeError::InvalidOid(
                "object id must be hexadecimal".into(),
            ));
        }
        Ok(Self(oid))
    }

    /// An id from a raw SHA-256 digest.
    pub fn from_sha256(digest: [u8; 32]) -> Self {
        Self(hex::encode(digest))
    }

    /// Check whether a string looks like a (possibly abbreviated) object id.
    ///
    /// Used to decide whether user input should be tried as a commit prefix.
    pub fn is_hex_prefix(s: &str) -> bool {
        (4..=64).contains(&s.len()) && s.chars().all(|c| c.is_ascii_hexdigit())
    }

    /// Get an abbreviated form of the OID.
    pub fn short(&self, len: usize) -> &str {
        &self.0[..len.min(self.0.len())]
    }

    /// Get the object id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

string_newtype_impls!(Oid);

/// A validated branch name in short form (`main`, `feature/x`).
///
/// ```
/// use lineage::core::types::BranchName;
///
/// assert!(BranchName::new("NewBranch").is_ok());
/// assert!(BranchName::new("").is_err());
/// assert!(BranchName::new("has space").is_err());
/// assert!(BranchName::new("-flag").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BranchName(String);

impl BranchName {
    /// Create a new validated branch name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidBranchName` if the name violates git's refname rules.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        if name.starts_with('-') {
            return Err(TypeError::InvalidBranchName(
                "branch name cannot start with '-'".into(),
            ));
        }
        check_refname(&name, "branch name").map_err(TypeError::InvalidBranchName)?;
        Ok(Self(name))
    }

    /// Get the branch name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

string_newtype_impls!(BranchName);

/// A validated tag name in short form (`v1.0`, `NewTag`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TagName(String);

impl TagName {
    /// Create a new validated tag name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidTagName` if the name violates git's refname rules.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        if name.starts_with('-') {
            return Err(TypeError::InvalidTagName(
                "tag name cannot start with '-'".into(),
            ));
        }
        check_refname(&name, "tag name").map_err(TypeError::InvalidTagName)?;
        Ok(Self(name))
    }

    /// Get the tag name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

string_newtype_impls!(TagName);

/// A validated, fully-qualified git reference name.
///
/// ```
/// use lineage::core::types::{RefName, TagName};
///
/// let tag = TagName::new("NewTag").unwrap();
/// assert_eq!(RefName::for_tag(&tag).as_str(), "refs/tags/NewTag");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RefName(String);

impl RefName {
    /// Namespace prefix for local branches.
    pub const HEADS: &'static str = "refs/heads/";
    /// Namespace prefix for tags.
    pub const TAGS: &'static str = "refs/tags/";

    /// Create a new validated ref name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidRefName` if the name violates git's refname rules.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        check_refname(&name, "ref name").map_err(TypeError::InvalidRefName)?;
        Ok(Self(name))
    }

    /// Ref name for a branch (`refs/heads/<branch>`).
    pub fn for_branch(branch: &BranchName) -> Self {
        Self(format!("{}{}", Self::HEADS, branch.as_str()))
    }

    /// Ref name for a tag (`refs/tags/<tag>`).
    pub fn for_tag(tag: &TagName) -> Self {
        Self(format!("{}{}", Self::TAGS, tag.as_str()))
    }

    /// Strip a prefix from the ref name and return the remainder.
    pub fn strip_prefix(&self, prefix: &str) -> Option<&str> {
        self.0.strip_prefix(prefix)
    }

    /// Check if this ref is in the branch namespace.
    pub fn is_branch_ref(&self) -> bool {
        self.0.starts_with(Self::HEADS)
    }

    /// Check if this ref is in the tag namespace.
    pub fn is_tag_ref(&self) -> bool {
        self.0.starts_with(Self::TAGS)
    }

    /// Get the ref name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

string_newtype_impls!(RefName);

/// A normalized repository-relative path.
///
/// Paths use `/` as separator, never start or end with `/`, and contain no
/// empty, `.` or `..` components. The empty path is the repository root.
/// Leading `./`, trailing `/` and repeated separators are normalized away
/// on construction.
///
/// ```
/// use lineage::core::types::RepoPath;
///
/// let p = RepoPath::new("./project//folder/").unwrap();
/// assert_eq!(p.as_str(), "project/folder");
/// assert!(p.starts_with(&RepoPath::new("project").unwrap()));
/// assert!(!p.starts_with(&RepoPath::new("proj").unwrap()));
/// assert!(RepoPath::root().is_root());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RepoPath(String);

impl RepoPath {
    /// Create a new normalized repository path.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidPath` for absolute paths, `..` components,
    /// backslashes or NUL bytes.
    pub fn new(path: impl Into<String>) -> Result<Self, TypeError> {
        let path = path.into();
        if path.starts_with('/') {
            return Err(TypeError::InvalidPath(format!(
                "'{path}' must be relative to the repository root"
            )));
        }
        if path.contains('\\') || path.contains('\0') {
            return Err(TypeError::InvalidPath(format!(
                "'{}' contains a backslash or NUL byte",
                path.escape_debug()
            )));
        }

        let mut components = Vec::new();
        for component in path.split('/') {
            match component {
                "" | "." => continue,
                ".." => {
                    return Err(TypeError::InvalidPath(format!(
                        "'{path}' must not contain '..'"
                    )))
                }
                c => components.push(c),
            }
        }

        Ok(Self(components.join("/")))
    }

    /// The repository root (empty path).
    pub fn root() -> Self {
        Self(String::new())
    }

    /// Whether this is the repository root.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// The containing directory, or `None` for the root.
    pub fn parent(&self) -> Option<RepoPath> {
        if self.is_root() {
            return None;
        }
        Some(match self.0.rfind('/') {
            Some(idx) => Self(self.0[..idx].to_string()),
            None => Self::root(),
        })
    }

    /// Append a child component or relative path.
    pub fn join(&self, child: &str) -> Result<RepoPath, TypeError> {
        if self.is_root() {
            Self::new(child)
        } else {
            Self::new(format!("{}/{}", self.0, child))
        }
    }

    /// Whether `self` equals `prefix` or lies beneath it.
    ///
    /// Matching is by whole components: `a/bc` does not start with `a/b`.
    pub fn starts_with(&self, prefix: &RepoPath) -> bool {
        if prefix.is_root() {
            return true;
        }
        match self.0.strip_prefix(prefix.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }

    /// Iterate over this path and all its ancestors, nearest first,
    /// ending with the root.
    pub fn ancestors(&self) -> impl Iterator<Item = RepoPath> {
        std::iter::successors(Some(self.clone()), |p| p.parent())
    }

    /// Get the path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

string_newtype_impls!(RepoPath);
