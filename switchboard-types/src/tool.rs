use std::collections::HashMap;
use std::sync::Arc;

use crate::core::{ToolCall, ToolDefinition};

/// Tool execution context: identifies the task on whose behalf the tool runs.
#[derive(Debug, Clone, Default)]
pub struct ToolContext {
    /// Agent executing the tool.
    pub agent_name: String,
    /// Session the conversation belongs to.
    pub session_id: String,
    /// Task the tool call belongs to.
    pub task_id: String,
    /// Additional metadata. Useful in direct inline invocation.
    pub metadata: Option<HashMap<String, serde_json::Value>>,
}

/// Tool trait for implementing tools callable by agents. Implementations are
/// registered once at process start and are immutable afterwards; execution
/// must be a pure function of the validated arguments.
#[async_trait::async_trait]
pub trait Tool: Send + Sync + std::fmt::Debug {
    fn get_name(&self) -> String;

    fn get_description(&self) -> String;

    /// JSON Schema for the tool's arguments, validated before execution.
    fn get_parameters(&self) -> serde_json::Value;

    /// The tool definition advertised to the completion adapter.
    fn get_tool_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.get_name(),
            description: self.get_description(),
            parameters: self.get_parameters(),
        }
    }

    /// Execute the tool with validated arguments, returning the result text.
    async fn execute(
        &self,
        tool_call: ToolCall,
        context: Arc<ToolContext>,
    ) -> Result<String, anyhow::Error>;
}
