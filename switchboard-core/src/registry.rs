use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use switchboard_types::{
    validate_parameters, AgentDefinition, AgentError, Tool, ToolCall, ToolContext, ToolDefinition,
};

#[derive(Debug, Default)]
struct AgentRegistryInner {
    agents: HashMap<String, AgentDefinition>,
    // registration order, for deterministic listing
    order: Vec<String>,
}

/// Registry of agent definitions. Registration and removal are atomic with
/// respect to concurrent reads: every operation takes the single lock, so no
/// reader can observe a half-registered agent.
#[derive(Debug, Default)]
pub struct AgentRegistry {
    inner: RwLock<AgentRegistryInner>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(&self, definition: AgentDefinition) -> Result<(), AgentError> {
        definition.validate()?;
        let mut inner = self.inner.write().await;
        if inner.agents.contains_key(&definition.name) {
            return Err(AgentError::DuplicateAgent(definition.name));
        }
        tracing::info!(agent = %definition.name, "registered agent");
        inner.order.push(definition.name.clone());
        inner.agents.insert(definition.name.clone(), definition);
        Ok(())
    }

    pub async fn get(&self, name: &str) -> Result<AgentDefinition, AgentError> {
        let inner = self.inner.read().await;
        inner
            .agents
            .get(name)
            .cloned()
            .ok_or_else(|| AgentError::AgentNotFound(name.to_string()))
    }

    pub async fn contains(&self, name: &str) -> bool {
        self.inner.read().await.agents.contains_key(name)
    }

    /// All definitions, in registration order.
    pub async fn list(&self) -> Vec<AgentDefinition> {
        let inner = self.inner.read().await;
        inner
            .order
            .iter()
            .filter_map(|name| inner.agents.get(name).cloned())
            .collect()
    }

    pub async fn remove(&self, name: &str) -> Result<AgentDefinition, AgentError> {
        let mut inner = self.inner.write().await;
        let definition = inner
            .agents
            .remove(name)
            .ok_or_else(|| AgentError::AgentNotFound(name.to_string()))?;
        inner.order.retain(|n| n != name);
        tracing::info!(agent = %name, "removed agent");
        Ok(definition)
    }
}

#[derive(Debug, Default)]
struct ToolRegistryInner {
    tools: HashMap<String, Arc<dyn Tool>>,
    order: Vec<String>,
}

/// Registry of callable tools. The catalog is fixed at process start and
/// read-only at request time; `register` replaces by name, so repeating the
/// startup sequence is idempotent.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    inner: RwLock<ToolRegistryInner>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(&self, tool: Arc<dyn Tool>) {
        let name = tool.get_name();
        let mut inner = self.inner.write().await;
        if inner.tools.insert(name.clone(), tool).is_none() {
            inner.order.push(name);
        }
    }

    pub async fn get(&self, name: &str) -> Result<Arc<dyn Tool>, AgentError> {
        let inner = self.inner.read().await;
        inner
            .tools
            .get(name)
            .cloned()
            .ok_or_else(|| AgentError::ToolNotFound(name.to_string()))
    }

    pub async fn list(&self) -> Vec<ToolDefinition> {
        let inner = self.inner.read().await;
        inner
            .order
            .iter()
            .filter_map(|name| inner.tools.get(name))
            .map(|tool| tool.get_tool_definition())
            .collect()
    }

    /// Look up the tool, validate the arguments against its parameter
    /// schema, and invoke it.
    pub async fn execute(
        &self,
        tool_call: &ToolCall,
        context: Arc<ToolContext>,
    ) -> Result<String, AgentError> {
        let tool = self.get(&tool_call.tool_name).await?;

        let mut schema = tool.get_parameters();
        validate_parameters(&mut schema, Some(tool_call.input.clone())).map_err(|e| {
            AgentError::InvalidToolArguments {
                tool: tool_call.tool_name.clone(),
                reason: e.to_string(),
            }
        })?;

        tool.execute(tool_call.clone(), context)
            .await
            .map_err(|e| AgentError::ToolExecution(format!("{}: {}", tool_call.tool_name, e)))
    }
}
