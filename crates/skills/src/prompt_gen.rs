//! Deterministic rendering of discovered skills for system prompts.

use std::fmt::Write;

use crate::types::SkillMetadata;

/// Render the Phase 1 skills section for a system prompt.
///
/// Pure function of the ordered metadata slice: no I/O, no randomness,
/// byte-identical output for the same input. Skills appear in input
/// order; callers wanting a different ordering sort before calling.
/// Instruction bodies and resource contents never appear here — Phase 1
/// is metadata only.
pub fn generate_skills_prompt(skills: &[SkillMetadata]) -> String {
    if skills.is_empty() {
        return String::new();
    }

    let mut prompt = String::from("\n## Available Skills\n\n");
    prompt.push_str(
        "You have access to specialized skills that provide domain expertise and \
         structured workflows. Skills use progressive disclosure: you see their names \
         and descriptions here, and load full instructions only when a task needs them.\n",
    );

    for skill in skills {
        let _ = write!(
            prompt,
            "\n### {}\n{}\n\n**Location:** `{}`\n",
            skill.name,
            skill.description,
            skill.manifest_path.display()
        );
        if !skill.allowed_tools.is_empty() {
            let _ = writeln!(prompt, "**Allowed Tools:** {}", skill.allowed_tools.join(", "));
        }
        if let Some(compatibility) = &skill.compatibility {
            let _ = writeln!(prompt, "**Requirements:** {compatibility}");
        }
    }

    prompt.push_str(
        "\n**How to Use Skills:**\n\n\
         1. Check whether the user's task matches a skill's description\n\
         2. Read the skill's SKILL.md at the listed location to load its instructions\n\
         3. Follow the workflow the instructions describe\n\
         4. Resolve scripts and references relative to the skill's directory\n",
    );
    prompt
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, std::path::PathBuf};

    fn meta(name: &str, description: &str) -> SkillMetadata {
        SkillMetadata {
            name: name.into(),
            description: description.into(),
            license: None,
            compatibility: None,
            allowed_tools: vec![],
            metadata: None,
            manifest_path: PathBuf::from(format!("/skills/{name}/SKILL.md")),
            skill_dir: PathBuf::from(format!("/skills/{name}")),
        }
    }

    #[test]
    fn test_empty_input_renders_nothing() {
        assert_eq!(generate_skills_prompt(&[]), "");
    }

    #[test]
    fn test_prompt_contains_metadata_and_location() {
        let skills = vec![meta("web-research", "Research topic X")];
        let prompt = generate_skills_prompt(&skills);
        assert!(prompt.contains("## Available Skills"));
        assert!(prompt.contains("### web-research"));
        assert!(prompt.contains("Research topic X"));
        assert!(prompt.contains("/skills/web-research/SKILL.md"));
    }

    #[test]
    fn test_optional_fields_rendered_when_present() {
        let mut skill = meta("docker-helper", "Runs containers");
        skill.allowed_tools = vec!["exec".into(), "read".into()];
        skill.compatibility = Some("Requires docker".into());
        let prompt = generate_skills_prompt(&[skill]);
        assert!(prompt.contains("**Allowed Tools:** exec, read"));
        assert!(prompt.contains("**Requirements:** Requires docker"));
    }

    #[test]
    fn test_input_order_preserved() {
        let skills = vec![meta("zeta", "z"), meta("alpha", "a")];
        let prompt = generate_skills_prompt(&skills);
        let zeta = prompt.find("### zeta").unwrap();
        let alpha = prompt.find("### alpha").unwrap();
        assert!(zeta < alpha);
    }

    #[test]
    fn test_output_is_byte_identical_across_calls() {
        let skills = vec![meta("web-research", "Research topic X"), meta("commit", "Git commits")];
        assert_eq!(generate_skills_prompt(&skills), generate_skills_prompt(&skills));
    }
}
