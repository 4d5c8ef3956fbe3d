//! Seed construction for the isolated sub-agent integration flavor.
//!
//! The host owns sub-agent execution; this module only produces the
//! seed prompt (activation header + instructions) and the skill's
//! declared tool restriction for the host to enforce.

use agentskills::{
    error::{Error, Result},
    resource,
    types::SkillMetadata,
};

/// Everything a host needs to run a skill in an isolated sub-agent.
#[derive(Debug, Clone)]
pub struct SkillSeed {
    pub name: String,
    /// System-prompt seed: activation header plus the skill's instructions.
    pub prompt: String,
    /// Declared tool restriction, verbatim. Empty = unrestricted.
    pub allowed_tools: Vec<String>,
}

/// Phase 2 load for the sub-agent pattern.
pub fn build_skill_seed(meta: &SkillMetadata) -> Result<SkillSeed> {
    let instructions = resource::load_instructions(&meta.skill_dir)
        .map_err(|e| Error::activation(meta.name.clone(), e))?;
    let prompt = format!("{}{}", activation_header(meta), instructions);
    tracing::debug!(skill = %meta.name, "built sub-agent seed");
    Ok(SkillSeed {
        name: meta.name.clone(),
        prompt,
        allowed_tools: meta.allowed_tools.clone(),
    })
}

/// Fixed header placed above the instructions on activation, shared by
/// both integration flavors.
pub(crate) fn activation_header(meta: &SkillMetadata) -> String {
    let mut header = format!(
        "# Skill: {}\n\n**Description:** {}\n\n**Skill Directory:** `{}`\n\n",
        meta.name,
        meta.description,
        meta.skill_dir.display()
    );
    if !meta.allowed_tools.is_empty() {
        header.push_str(&format!(
            "**IMPORTANT:** Only use these tools: `{}`\n\n",
            meta.allowed_tools.join(", ")
        ));
    }
    header.push_str("---\n\n# Instructions\n\n");
    header
}
