use std::{
    fs,
    path::{Path, PathBuf},
};

use async_trait::async_trait;

use crate::{
    error::{Error, Result},
    parse,
    types::SkillMetadata,
    validate::{self, ValidateOptions},
};

/// Phase 1 scan: examine the immediate child directories of `root` (one
/// level, no recursion) and return metadata for every compliant skill,
/// in deterministic visit order (children sorted by name).
///
/// A child that fails parsing or validation is logged and skipped; one
/// broken skill must not abort discovery of the others. Fails wholesale
/// only when `root` itself is missing or not a directory.
pub fn discover_skills(root: &Path) -> Result<Vec<SkillMetadata>> {
    discover_skills_with(root, &ValidateOptions::default())
}

/// [`discover_skills`] with explicit validation options.
pub fn discover_skills_with(root: &Path, opts: &ValidateOptions) -> Result<Vec<SkillMetadata>> {
    if !root.exists() {
        return Err(Error::discovery(root, "directory does not exist"));
    }
    if !root.is_dir() {
        return Err(Error::discovery(root, "not a directory"));
    }

    let mut children: Vec<PathBuf> = fs::read_dir(root)?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    // read_dir order is platform-dependent; sort for run-to-run stability.
    children.sort();

    let mut skills: Vec<SkillMetadata> = Vec::new();
    for child in children {
        if !has_manifest(&child) {
            tracing::debug!(dir = %child.display(), "no manifest, not a skill directory");
            continue;
        }
        match load_single_metadata_with(&child, opts) {
            Ok(meta) => {
                if skills.iter().any(|s| s.name == meta.name) {
                    tracing::warn!(
                        dir = %child.display(),
                        name = %meta.name,
                        "duplicate skill name, keeping the first"
                    );
                    continue;
                }
                skills.push(meta);
            },
            Err(e) => {
                tracing::warn!(dir = %child.display(), %e, "skipping skill directory");
            },
        }
    }
    Ok(skills)
}

fn has_manifest(dir: &Path) -> bool {
    parse::MANIFEST_CANDIDATES
        .iter()
        .any(|candidate| dir.join(candidate).is_file())
}

/// Single-directory variant for callers that already know the path.
/// Unlike the scan, failure raises: there is no surrounding discovery
/// pass to protect. Warning-level findings are logged, not fatal.
pub fn load_single_metadata(skill_dir: &Path) -> Result<SkillMetadata> {
    load_single_metadata_with(skill_dir, &ValidateOptions::default())
}

/// [`load_single_metadata`] with explicit validation options.
pub fn load_single_metadata_with(
    skill_dir: &Path,
    opts: &ValidateOptions,
) -> Result<SkillMetadata> {
    let (skill_dir, manifest) = validate::locate_and_parse(skill_dir)?;
    let report = validate::validate_metadata(&manifest.frontmatter, &skill_dir, opts);
    for warning in &report.warnings {
        tracing::warn!(dir = %skill_dir.display(), "{warning}");
    }
    if !report.is_valid() {
        return Err(Error::validation(skill_dir, report.errors));
    }
    Ok(validate::metadata_from_manifest(manifest, skill_dir))
}

/// Discovers skills from filesystem paths. The seam async hosts depend
/// on instead of the free functions.
#[async_trait]
pub trait SkillDiscoverer: Send + Sync {
    /// Scan and return metadata for all discovered skills.
    async fn discover(&self) -> Result<Vec<SkillMetadata>>;
}

/// Default filesystem-based discoverer over a single root directory.
pub struct FsSkillDiscoverer {
    root: PathBuf,
    options: ValidateOptions,
}

impl FsSkillDiscoverer {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            options: ValidateOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: ValidateOptions) -> Self {
        self.options = options;
        self
    }
}

#[async_trait]
impl SkillDiscoverer for FsSkillDiscoverer {
    async fn discover(&self) -> Result<Vec<SkillMetadata>> {
        discover_skills_with(&self.root, &self.options)
    }
}
