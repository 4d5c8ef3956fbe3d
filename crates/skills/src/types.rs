use std::path::PathBuf;

use serde::Serialize;

/// Lightweight metadata parsed from a skill's SKILL.md frontmatter.
/// Loaded at discovery time for every skill (Phase 1, cheap), immutable
/// once constructed. Instances are built only by the parse + validate
/// pipeline; re-discovery produces fresh values.
#[derive(Debug, Clone, Serialize)]
pub struct SkillMetadata {
    /// Skill name — lowercase alphanumeric with single hyphens, 1-64 chars.
    pub name: String,
    /// Short human-readable description.
    pub description: String,
    /// SPDX license identifier.
    pub license: Option<String>,
    /// Environment requirements (free text, not interpreted here).
    pub compatibility: Option<String>,
    /// Tool-name patterns this skill is allowed to use. Empty means no
    /// restriction was declared.
    pub allowed_tools: Vec<String>,
    /// User-defined metadata bag. Opaque to the loading engine;
    /// downstream consumers opt into specific keys themselves.
    pub metadata: Option<serde_yaml::Mapping>,
    /// Absolute path to the located SKILL.md file.
    pub manifest_path: PathBuf,
    /// Absolute, canonicalized skill root. All resource resolution is
    /// anchored here.
    pub skill_dir: PathBuf,
}

/// Full skill content: metadata + markdown instruction body.
/// Loaded on demand when a skill is activated (Phase 2).
#[derive(Debug, Clone)]
pub struct SkillContent {
    pub metadata: SkillMetadata,
    pub body: String,
}
