//! Single `skill` dispatcher tool: the inline integration flavor.
//! Progressive disclosure — metadata sits in the system prompt, full
//! instructions enter context only on activation.

use std::sync::Arc;

use {
    anyhow::{Result, bail},
    async_trait::async_trait,
    serde_json::{Value, json},
};

use {
    agentskills::registry::SkillRegistry,
    crate::{AgentTool, subagent::activation_header},
};

/// Meta-tool dispatching over a shared registry with three actions:
/// `list`, `info`, and `activate` (the default).
pub struct SkillTool {
    registry: Arc<dyn SkillRegistry>,
}

impl SkillTool {
    pub fn new(registry: Arc<dyn SkillRegistry>) -> Self {
        Self { registry }
    }

    async fn list(&self) -> Result<Value> {
        let skills = self.registry.list_skills().await?;
        if skills.is_empty() {
            return Ok(json!({
                "content": "No skills available. Check the skills directory."
            }));
        }
        let mut lines = vec!["Available Skills:".to_string()];
        for skill in &skills {
            lines.push(format!("\n- {}", skill.name));
            lines.push(format!("  {}", skill.description));
            lines.push(format!("  Location: {}", skill.manifest_path.display()));
        }
        Ok(json!({ "content": lines.join("\n") }))
    }

    async fn info(&self, name: &str) -> Result<Value> {
        let meta = self.registry.get(name).await?;
        Ok(serde_json::to_value(&meta)?)
    }

    /// Phase 2: load instructions into the calling agent's context.
    async fn activate(&self, name: &str) -> Result<Value> {
        let content = self.registry.load_skill(name).await?;
        tracing::info!(skill = %name, "activating skill");
        let text = format!("{}{}", activation_header(&content.metadata), content.body);
        Ok(json!({ "content": text }))
    }
}

#[async_trait]
impl AgentTool for SkillTool {
    fn name(&self) -> &str {
        "skill"
    }

    fn description(&self) -> &str {
        "Activate and use specialized agent skills. Skills are instruction sets \
         providing domain expertise and structured workflows; activate one when \
         the user's task matches its description."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["skill_name"],
            "properties": {
                "skill_name": {
                    "type": "string",
                    "description": "Name of the skill (from the available skills list)"
                },
                "action": {
                    "type": "string",
                    "enum": ["activate", "list", "info"],
                    "description": "activate (default): load full instructions; \
                                    list: show all skills; info: show one skill's metadata"
                }
            }
        })
    }

    async fn execute(&self, params: Value) -> Result<Value> {
        let action = params
            .get("action")
            .and_then(|v| v.as_str())
            .unwrap_or("activate");

        if action == "list" {
            return self.list().await;
        }

        let name = params
            .get("skill_name")
            .and_then(|v| v.as_str())
            .ok_or_else(|| anyhow::anyhow!("missing 'skill_name'"))?;

        match action {
            "info" => self.info(name).await,
            "activate" => self.activate(name).await,
            other => bail!("unknown action '{other}', expected activate, list, or info"),
        }
    }
}
