//! Integration adapters over the `agentskills` loading engine.
//!
//! Two flavors share the same core contracts: the inline `skill`
//! dispatcher tool (instructions land in the calling agent's context)
//! and the sub-agent seed builder (instructions seed an isolated agent
//! with a restricted tool set). Neither duplicates validation or
//! security logic; both call into the core.

use {anyhow::Result, async_trait::async_trait};

pub mod skill_tool;
pub mod subagent;

/// Agent-callable tool seam. Hosts register implementations with their
/// own tool registry; the adapters here only implement it.
#[async_trait]
pub trait AgentTool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn parameters_schema(&self) -> serde_json::Value;
    async fn execute(&self, params: serde_json::Value) -> Result<serde_json::Value>;
}
