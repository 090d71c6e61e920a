//! Path guard: lexical normalization with containment checks.
//!
//! Both functions are pure: they never touch the filesystem. Symlinks that
//! already exist on disk are handled separately by the extractor.

use std::ffi::OsStr;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use crate::Result;
use crate::StageError;
use crate::types::SafePath;

/// Resolves `candidate` against `root`, collapsing `.` and `..` segments.
///
/// `..` is allowed as long as it never climbs above `root`, so
/// `"a/../b"` resolves to `root/b`.
///
/// # Errors
///
/// Returns `PathTraversal` if `candidate` is absolute (or carries a drive
/// prefix) or if the normalized result would leave `root`.
///
/// # Examples
///
/// ```
/// use stagehand_core::security::resolve;
/// use std::path::Path;
///
/// let root = Path::new("/srv/work");
/// assert_eq!(
///     resolve(root, Path::new("a/./b/../c.txt")).unwrap(),
///     Path::new("/srv/work/a/c.txt")
/// );
/// assert!(resolve(root, Path::new("../etc/passwd")).is_err());
/// assert!(resolve(root, Path::new("/etc/passwd")).is_err());
/// ```
pub fn resolve(root: &Path, candidate: &Path) -> Result<PathBuf> {
    let traversal = || StageError::PathTraversal {
        path: candidate.to_path_buf(),
    };

    let mut parts: Vec<&OsStr> = Vec::new();
    for component in candidate.components() {
        match component {
            Component::Normal(part) => parts.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                parts.pop().ok_or_else(traversal)?;
            }
            Component::RootDir | Component::Prefix(_) => return Err(traversal()),
        }
    }

    let root = normalize_lexically(root);
    let mut resolved = root.clone();
    for part in parts {
        resolved.push(part);
    }

    if !resolved.starts_with(&root) {
        return Err(traversal());
    }
    Ok(resolved)
}

/// Resolves an untrusted archive entry name against `root`.
///
/// Stricter than [`resolve`]: entry names come straight from archive
/// headers, so any `..` segment is rejected outright even when it would
/// collapse inside the root. Both `/` and `\` are treated as separators.
///
/// # Errors
///
/// - `PathTraversal` for absolute names, drive prefixes or `..` segments
/// - `SecurityViolation` for NUL bytes or more than `max_depth` segments
///
/// # Examples
///
/// ```
/// use stagehand_core::security::resolve_entry;
/// use std::path::Path;
///
/// let root = Path::new("/srv/work");
/// let safe = resolve_entry(root, "docs/./notes.txt", 32).unwrap();
/// assert_eq!(safe.relative(), Path::new("docs/notes.txt"));
///
/// assert!(resolve_entry(root, "docs/../../evil.txt", 32).is_err());
/// assert!(resolve_entry(root, "..\\evil.txt", 32).is_err());
/// ```
pub fn resolve_entry(root: &Path, name: &str, max_depth: usize) -> Result<SafePath> {
    let traversal = || StageError::PathTraversal {
        path: PathBuf::from(name),
    };

    if name.contains('\0') {
        return Err(StageError::SecurityViolation {
            reason: format!("entry name contains null bytes: {}", name.escape_default()),
        });
    }

    if name.starts_with('/') || name.starts_with('\\') || has_drive_prefix(name) {
        return Err(traversal());
    }

    let mut relative = PathBuf::new();
    let mut depth = 0usize;
    for segment in name.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => return Err(traversal()),
            part => {
                depth += 1;
                relative.push(part);
            }
        }
    }

    if depth > max_depth {
        return Err(StageError::SecurityViolation {
            reason: format!("path depth {depth} exceeds maximum {max_depth}"),
        });
    }

    let root = normalize_lexically(root);
    let resolved = root.join(&relative);
    if !resolved.starts_with(&root) {
        return Err(traversal());
    }

    Ok(SafePath::new(relative, resolved))
}

/// `C:\...`, `C:/...` and bare `C:` names, which Windows resolves outside
/// the destination. On Windows any `C:` prefix counts, since `C:name` is
/// relative to the drive's current directory.
fn has_drive_prefix(name: &str) -> bool {
    match name.as_bytes() {
        [letter, b':', rest @ ..] if letter.is_ascii_alphabetic() => {
            cfg!(windows) || matches!(rest, [] | [b'/' | b'\\', ..])
        }
        _ => false,
    }
}

/// Collapses `.` and `..` without consulting the filesystem.
///
/// Leading `..` segments of a relative path are kept; `..` directly under
/// the filesystem root is dropped.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().collect()
}
