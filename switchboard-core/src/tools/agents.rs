use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;

use switchboard_types::{Tool, ToolCall, ToolContext};

use crate::registry::AgentRegistry;

/// Tool name the dispatcher intercepts for agent-to-agent delegation.
pub const CALL_AGENT_TOOL: &str = "call_agent";

/// Arguments of a `call_agent` request.
#[derive(Debug, Deserialize)]
pub struct CallAgentArgs {
    pub agent_name: String,
    pub message: String,
}

/// Delegation tool. Registered so its definition appears in tool-spec lists,
/// but execution is owned by the dispatcher: a `call_agent` request becomes a
/// nested task for the target agent, with cycle and depth control applied to
/// the current call chain.
#[derive(Debug)]
pub struct CallAgentTool;

#[async_trait::async_trait]
impl Tool for CallAgentTool {
    fn get_name(&self) -> String {
        CALL_AGENT_TOOL.to_string()
    }
    fn get_description(&self) -> String {
        "Call another agent and get its response".to_string()
    }
    fn get_parameters(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "agent_name": {
                    "type": "string",
                    "description": "The name of the agent to call (e.g., \"weather_agent\")"
                },
                "message": {
                    "type": "string",
                    "description": "The message to send to the agent"
                }
            },
            "required": ["agent_name", "message"]
        })
    }

    async fn execute(
        &self,
        _tool_call: ToolCall,
        _context: Arc<ToolContext>,
    ) -> Result<String, anyhow::Error> {
        // Never reached through the dispatcher, which intercepts the name.
        Err(anyhow::anyhow!(
            "call_agent is handled by the dispatcher and cannot be executed directly"
        ))
    }
}

/// Lists the registered agents so an agent can discover delegation targets.
#[derive(Debug)]
pub struct ListAgentsTool {
    registry: Arc<AgentRegistry>,
}

impl ListAgentsTool {
    pub fn new(registry: Arc<AgentRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait::async_trait]
impl Tool for ListAgentsTool {
    fn get_name(&self) -> String {
        "list_agents".to_string()
    }
    fn get_description(&self) -> String {
        "List all available agents that can be called".to_string()
    }
    fn get_parameters(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {},
            "required": []
        })
    }

    async fn execute(
        &self,
        _tool_call: ToolCall,
        _context: Arc<ToolContext>,
    ) -> Result<String, anyhow::Error> {
        let agents = self.registry.list().await;
        if agents.is_empty() {
            return Ok("No agents available.".to_string());
        }
        let mut lines = vec!["Available agents:".to_string()];
        for agent in agents {
            lines.push(format!("- {}: {}", agent.name, agent.description));
        }
        Ok(lines.join("\n"))
    }
}
