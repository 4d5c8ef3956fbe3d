//! Phase 2/3 loading: instruction bodies and auxiliary resource files.
//!
//! Every access re-checks the containment rule: the resolved path must
//! stay a descendant of the skill's canonical root. Violations fail
//! before any read happens.

use std::path::{Component, Path, PathBuf};

use crate::{
    error::{Error, Result},
    parse,
};

/// Canonicalize a skill directory (symlinks resolved). The result is
/// the containment root for every later resource access.
pub(crate) fn canonical_skill_dir(skill_dir: &Path) -> Result<PathBuf> {
    let canonical = skill_dir.canonicalize()?;
    if !canonical.is_dir() {
        return Err(Error::parse(skill_dir, "skill path is not a directory"));
    }
    Ok(canonical)
}

/// Resolve `relative` against the skill root and enforce containment.
///
/// Rejects absolute inputs outright, normalizes `.`/`..` segments
/// lexically (so traversal is caught without touching the filesystem),
/// then canonicalizes the result and requires it to remain under the
/// canonical root even after symlink expansion.
pub fn contained_path(skill_dir: &Path, relative: &Path) -> Result<PathBuf> {
    let root = canonical_skill_dir(skill_dir)?;
    let violation = || Error::PathViolation {
        skill_dir: root.clone(),
        requested: relative.to_path_buf(),
    };

    if relative.is_absolute() {
        return Err(violation());
    }

    let mut normalized = root.clone();
    for component in relative.components() {
        match component {
            Component::Normal(part) => normalized.push(part),
            Component::CurDir => {},
            Component::ParentDir => {
                normalized.pop();
                if !normalized.starts_with(&root) {
                    return Err(violation());
                }
            },
            Component::RootDir | Component::Prefix(_) => return Err(violation()),
        }
    }

    // Symlinks inside the skill may still point elsewhere.
    let resolved = normalized.canonicalize()?;
    if !resolved.starts_with(&root) {
        return Err(violation());
    }
    Ok(resolved)
}

/// Phase 2: return the manifest's instruction body with leading and
/// trailing blank lines trimmed. A pure substring of the manifest file;
/// the frontmatter is not re-decoded.
pub fn load_instructions(skill_dir: &Path) -> Result<String> {
    let root = canonical_skill_dir(skill_dir)?;
    let manifest_path = parse::find_manifest(&root)?;
    if !manifest_path.starts_with(&root) {
        return Err(Error::PathViolation {
            skill_dir: root,
            requested: manifest_path,
        });
    }
    let content = parse::read_text_limited(&manifest_path)?;
    let (_, body) = parse::split_frontmatter(&content, &manifest_path)?;
    tracing::debug!(manifest = %manifest_path.display(), "loaded skill instructions");
    Ok(trim_blank_lines(&body).to_string())
}

/// Strip leading/trailing blank lines only. Intra-line whitespace of
/// the first and last content lines (e.g. Markdown code indentation)
/// is preserved.
fn trim_blank_lines(body: &str) -> &str {
    let mut start = 0;
    for line in body.split_inclusive('\n') {
        if !line.trim().is_empty() {
            break;
        }
        start += line.len();
    }
    let trimmed = &body[start..];

    // trim_end also eats trailing spaces/tabs on the last content line;
    // give those back, up to that line's terminator.
    let end = trimmed.trim_end().len();
    let tail = &trimmed[end..];
    let keep = tail.find(['\n', '\r']).unwrap_or(tail.len());
    &trimmed[..end + keep]
}

/// Phase 3: read one auxiliary resource as UTF-8 text.
pub fn load_resource(skill_dir: &Path, relative: &Path) -> Result<String> {
    let path = contained_path(skill_dir, relative)?;
    tracing::debug!(resource = %path.display(), "loading skill resource");
    parse::read_text_limited(&path)
}

/// Phase 3, raw-bytes variant for callers that explicitly want binary
/// content. Same containment and size rules as [`load_resource`].
pub fn load_resource_bytes(skill_dir: &Path, relative: &Path) -> Result<Vec<u8>> {
    let path = contained_path(skill_dir, relative)?;
    parse::read_bytes_limited(&path)
}
