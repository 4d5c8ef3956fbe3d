use std::path::{Path, PathBuf};

use crate::{
    error::{Error, Result},
    parse::{self, Manifest, RawFrontmatter},
    resource,
    types::SkillMetadata,
};

/// Maximum length of a skill name in bytes.
pub const MAX_NAME_LEN: usize = 64;

/// Knobs for rules whose severity varies between deployments.
#[derive(Debug, Clone, Default)]
pub struct ValidateOptions {
    /// Promote a declared-name / directory-name mismatch from a warning
    /// to a hard validation error.
    pub name_must_match_dir: bool,
}

/// Collected outcome of a validation pass. Violations are gathered in
/// rule order rather than short-circuiting so a caller can report every
/// defect at once.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Warnings do not affect validity.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validate a skill name: lowercase alphanumeric runs separated by
/// single hyphens, 1-64 chars.
pub fn validate_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_NAME_LEN
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        && !name.starts_with('-')
        && !name.ends_with('-')
        && !name.contains("--")
}

/// Run the field rules against decoded frontmatter. Never fails for
/// malformed content; every violation lands in the report.
pub fn validate_metadata(
    frontmatter: &RawFrontmatter,
    skill_dir: &Path,
    opts: &ValidateOptions,
) -> ValidationReport {
    let mut report = ValidationReport::default();

    match frontmatter.name.as_deref().map(str::trim) {
        None | Some("") => report.errors.push("missing required field 'name'".into()),
        Some(name) if !validate_name(name) => report.errors.push(format!(
            "invalid name '{name}': must be 1-64 lowercase alphanumeric/hyphen chars"
        )),
        Some(_) => {},
    }

    match frontmatter.description.as_deref().map(str::trim) {
        None => report
            .errors
            .push("missing required field 'description'".into()),
        Some("") => report.errors.push("'description' must not be empty".into()),
        Some(_) => {},
    }

    if let Some(value) = &frontmatter.allowed_tools {
        if let Err(msg) = normalize_allowed_tools(value) {
            report.errors.push(msg);
        }
    }

    if let Some(value) = &frontmatter.metadata {
        if !value.is_mapping() {
            report
                .errors
                .push("'metadata' must be a mapping of string keys to values".into());
        }
    }

    // Declared name vs. containing directory name. Warning-level by
    // default; some deployments promote it to a hard error.
    if let (Some(name), Some(dir_name)) = (
        frontmatter.name.as_deref().map(str::trim),
        skill_dir.file_name().and_then(|n| n.to_str()),
    ) {
        if !name.is_empty() && name != dir_name {
            let msg = format!("name '{name}' does not match directory name '{dir_name}'");
            if opts.name_must_match_dir {
                report.errors.push(msg);
            } else {
                report.warnings.push(msg);
            }
        }
    }

    report
}

/// Locate, parse, and validate the manifest of one skill directory.
///
/// I/O failures, a missing or malformed manifest, and security
/// violations (containment, size ceiling) raise; content-level rule
/// violations come back in the report.
pub fn validate(skill_dir: &Path, opts: &ValidateOptions) -> Result<ValidationReport> {
    let (skill_dir, manifest) = locate_and_parse(skill_dir)?;
    Ok(validate_metadata(&manifest.frontmatter, &skill_dir, opts))
}

/// Canonicalize a skill directory, locate its manifest, and parse it.
/// The resolved manifest must stay inside the canonical root; a symlink
/// pointing elsewhere is a containment violation.
pub(crate) fn locate_and_parse(skill_dir: &Path) -> Result<(PathBuf, Manifest)> {
    let skill_dir = resource::canonical_skill_dir(skill_dir)?;
    let manifest_path = parse::find_manifest(&skill_dir)?;
    if !manifest_path.starts_with(&skill_dir) {
        return Err(Error::PathViolation {
            skill_dir,
            requested: manifest_path,
        });
    }
    let manifest = parse::parse_manifest(&manifest_path)?;
    Ok((skill_dir, manifest))
}

/// Build immutable metadata from frontmatter that already passed
/// validation.
pub(crate) fn metadata_from_manifest(manifest: Manifest, skill_dir: PathBuf) -> SkillMetadata {
    let frontmatter = manifest.frontmatter;
    let allowed_tools = frontmatter
        .allowed_tools
        .as_ref()
        .and_then(|v| normalize_allowed_tools(v).ok())
        .unwrap_or_default();
    let metadata = match frontmatter.metadata {
        Some(serde_yaml::Value::Mapping(m)) => Some(m),
        _ => None,
    };
    SkillMetadata {
        name: frontmatter.name.unwrap_or_default().trim().to_string(),
        description: frontmatter.description.unwrap_or_default().trim().to_string(),
        license: frontmatter.license,
        compatibility: frontmatter.compatibility,
        allowed_tools,
        metadata,
        manifest_path: manifest.path,
        skill_dir,
    }
}

/// Normalize `allowed-tools` into a list of non-empty tool patterns.
/// Accepts a YAML sequence of strings or one comma-separated string.
fn normalize_allowed_tools(value: &serde_yaml::Value) -> std::result::Result<Vec<String>, String> {
    match value {
        serde_yaml::Value::String(s) => {
            let tools: Vec<String> = s.split(',').map(|t| t.trim().to_string()).collect();
            if tools.iter().any(String::is_empty) {
                return Err("'allowed-tools' contains an empty entry".into());
            }
            Ok(tools)
        },
        serde_yaml::Value::Sequence(seq) => {
            let mut tools = Vec::with_capacity(seq.len());
            for item in seq {
                match item {
                    serde_yaml::Value::String(s) if !s.trim().is_empty() => {
                        tools.push(s.trim().to_string());
                    },
                    serde_yaml::Value::String(_) => {
                        return Err("'allowed-tools' contains an empty entry".into());
                    },
                    _ => return Err("'allowed-tools' entries must be strings".into()),
                }
            }
            Ok(tools)
        },
        _ => Err("'allowed-tools' must be a sequence of strings or a comma-separated string".into()),
    }
}
