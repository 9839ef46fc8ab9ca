use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::core::{is_identifier_safe, ToolDefinition};
use crate::errors::AgentError;

/// Protocol version advertised on agent cards.
pub const PROTOCOL_VERSION: &str = "0.1";

fn default_model() -> String {
    "gpt-4o".to_string()
}

/// Complete configuration for an agent. Bound tool names are resolved against
/// the tool registry at dispatch time, not at registration time, so an agent
/// may reference a tool that is registered later.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AgentDefinition {
    /// Unique, identifier-safe name. Delegation targets are looked up by it.
    pub name: String,
    /// Human-readable display name.
    #[serde(default)]
    pub display_name: String,
    /// A brief description of the agent's purpose.
    #[serde(default)]
    pub description: String,
    /// Instructions passed as the system prompt on every completion call.
    #[serde(default)]
    pub system_prompt: String,
    /// Opaque model reference handed to the completion adapter.
    #[serde(default = "default_model")]
    pub model: String,
    /// Ordered set of bound tool names.
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
}

impl AgentDefinition {
    pub fn validate(&self) -> Result<(), AgentError> {
        if !is_identifier_safe(&self.name) {
            return Err(AgentError::Validation(format!(
                "agent name '{}' is not identifier-safe",
                self.name
            )));
        }
        Ok(())
    }
}

/// A parameter of an agent skill, lifted from a tool's parameter schema.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct SkillParameter {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type", default = "default_parameter_type")]
    pub parameter_type: String,
    #[serde(default)]
    pub required: bool,
}

fn default_parameter_type() -> String {
    "string".to_string()
}

/// A skill (capability) of an agent, derived from one of its bound tools.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct AgentSkill {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parameters: Vec<SkillParameter>,
}

impl AgentSkill {
    /// Build a skill from an advertised tool definition, extracting parameters
    /// from the schema's `properties`/`required` sections.
    pub fn from_tool(tool: &ToolDefinition) -> Self {
        let required: Vec<String> = tool
            .parameters
            .get("required")
            .and_then(|r| r.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str().map(|s| s.to_string()))
                    .collect()
            })
            .unwrap_or_default();

        let parameters = tool
            .parameters
            .get("properties")
            .and_then(|p| p.as_object())
            .map(|props| {
                props
                    .iter()
                    .map(|(name, info)| SkillParameter {
                        name: name.clone(),
                        description: info
                            .get("description")
                            .and_then(|d| d.as_str())
                            .map(|d| d.to_string()),
                        parameter_type: info
                            .get("type")
                            .and_then(|t| t.as_str())
                            .unwrap_or("string")
                            .to_string(),
                        required: required.iter().any(|r| r == name),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            id: tool.name.clone(),
            name: tool.name.clone(),
            description: Some(tool.description.clone()),
            parameters,
        }
    }
}

/// Public profile describing an agent's capabilities for discovery.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct AgentCard {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
    pub protocol_version: String,
    #[serde(default)]
    pub skills: Vec<AgentSkill>,
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
}

impl AgentCard {
    /// Build a card from a definition plus the tool definitions that actually
    /// resolved. Unresolvable bound tools are simply absent, matching the
    /// best-effort rule used at dispatch.
    pub fn from_definition(definition: &AgentDefinition, tools: &[ToolDefinition]) -> Self {
        let mut metadata = HashMap::new();
        metadata.insert(
            "display_name".to_string(),
            Value::String(definition.display_name.clone()),
        );
        Self {
            name: definition.name.clone(),
            description: Some(definition.description.clone()),
            version: "1.0.0".to_string(),
            protocol_version: PROTOCOL_VERSION.to_string(),
            skills: tools.iter().map(AgentSkill::from_tool).collect(),
            metadata,
        }
    }
}
