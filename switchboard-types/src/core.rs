use anyhow::Context;
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;

/// The role of a message sender.
#[derive(Debug, Serialize, Deserialize, Clone, JsonSchema, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// A message from the end user (or a parent agent delegating work).
    User,
    /// A message produced by the agent itself.
    Agent,
    /// A tool result fed back into the conversation.
    Tool,
}

/// A single typed piece of message content. Every message carries an ordered
/// list of parts; `text` is the minimum every consumer must support.
#[derive(Debug, Serialize, Deserialize, Clone, JsonSchema, PartialEq)]
#[serde(rename_all = "snake_case", tag = "part_type", content = "data")]
pub enum Part {
    Text(String),
    ToolCall(ToolCall),
    ToolResult(ToolResponse),
    Data(Value),
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Message {
    pub id: String,
    pub role: MessageRole,
    pub parts: Vec<Part>,
    pub created_at: DateTime<Utc>,
}

impl Default for Message {
    fn default() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role: MessageRole::User,
            parts: vec![],
            created_at: Utc::now(),
        }
    }
}

impl Message {
    pub fn user(text: String) -> Self {
        Self {
            role: MessageRole::User,
            parts: vec![Part::Text(text)],
            ..Default::default()
        }
    }

    pub fn agent(text: String) -> Self {
        Self {
            role: MessageRole::Agent,
            parts: vec![Part::Text(text)],
            ..Default::default()
        }
    }

    pub fn tool_calls(calls: Vec<ToolCall>) -> Self {
        Self {
            role: MessageRole::Agent,
            parts: calls.into_iter().map(Part::ToolCall).collect(),
            ..Default::default()
        }
    }

    pub fn tool_response(tool_call_id: String, tool_name: String, result: Value) -> Self {
        Self {
            role: MessageRole::Tool,
            parts: vec![Part::ToolResult(ToolResponse {
                tool_call_id,
                tool_name,
                result,
            })],
            ..Default::default()
        }
    }

    /// Concatenated text parts, or None if the message carries no text.
    pub fn as_text(&self) -> Option<String> {
        let parts = self
            .parts
            .iter()
            .filter_map(|part| match part {
                Part::Text(text) => Some(text.clone()),
                _ => None,
            })
            .collect::<Vec<_>>();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("\n\n"))
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, JsonSchema, PartialEq)]
pub struct ToolCall {
    pub tool_call_id: String,
    pub tool_name: String,
    pub input: Value,
}

impl ToolCall {
    pub fn new(tool_name: impl Into<String>, input: Value) -> Self {
        Self {
            tool_call_id: uuid::Uuid::new_v4().to_string(),
            tool_name: tool_name.into(),
            input,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, JsonSchema, PartialEq)]
pub struct ToolResponse {
    pub tool_call_id: String,
    pub tool_name: String,
    pub result: Value,
}

/// Tool shape advertised to the completion adapter.
#[derive(Debug, Serialize, Deserialize, Clone, JsonSchema, PartialEq)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON Schema describing the tool's arguments.
    pub parameters: Value,
}

/// The lifecycle state of a task. Serialized lowercase-hyphenated on the wire.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TaskState {
    #[default]
    Submitted,
    Working,
    InputRequired,
    Completed,
    Canceled,
    Failed,
}

impl TaskState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskState::Completed | TaskState::Canceled | TaskState::Failed
        )
    }

    /// The full transition relation. Terminal states admit no outgoing edges.
    pub fn can_transition(&self, next: TaskState) -> bool {
        match (self, next) {
            (TaskState::Submitted, TaskState::Working) => true,
            (TaskState::Submitted, TaskState::Canceled) => true,
            (TaskState::Working, TaskState::Completed) => true,
            (TaskState::Working, TaskState::InputRequired) => true,
            (TaskState::Working, TaskState::Failed) => true,
            (TaskState::Working, TaskState::Canceled) => true,
            (TaskState::InputRequired, TaskState::Working) => true,
            (TaskState::InputRequired, TaskState::Canceled) => true,
            _ => false,
        }
    }

    /// States in which a task still accepts conversation messages.
    pub fn accepts_messages(&self) -> bool {
        matches!(
            self,
            TaskState::Submitted | TaskState::Working | TaskState::InputRequired
        )
    }
}

impl std::fmt::Display for TaskState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TaskState::Submitted => "submitted",
            TaskState::Working => "working",
            TaskState::InputRequired => "input-required",
            TaskState::Completed => "completed",
            TaskState::Canceled => "canceled",
            TaskState::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

/// An opaque output produced by a task. Empty in the base contract.
#[derive(Debug, Serialize, Deserialize, Clone, JsonSchema, PartialEq)]
pub struct Artifact {
    pub id: String,
    pub name: String,
    pub mime_type: String,
    pub data: String,
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
}

/// One unit of conversational work with an agent. Owned exclusively by the
/// task store; the dispatcher only ever holds a transient copy.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Task {
    pub id: String,
    pub session_id: String,
    pub agent_name: String,
    pub state: TaskState,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub artifacts: Vec<Artifact>,
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn new(agent_name: &str, session_id: Option<&str>) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            session_id: session_id
                .map(|s| s.to_string())
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            agent_name: agent_name.to_string(),
            state: TaskState::Submitted,
            messages: vec![],
            artifacts: vec![],
            metadata: HashMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// The text of the most recent agent message, if any.
    pub fn final_text(&self) -> Option<String> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::Agent)
            .and_then(|m| m.as_text())
    }

    /// Human-readable failure reason recorded under `metadata["error"]`.
    pub fn error_reason(&self) -> Option<&str> {
        self.metadata.get("error").and_then(|v| v.as_str())
    }
}

/// Validate tool-call arguments against a parameter schema before invocation.
/// Normalizes the schema the same way the registry accepts it: an object
/// schema with `required` defaulted to empty.
pub fn validate_parameters(schema: &mut Value, params: Option<Value>) -> anyhow::Result<()> {
    if schema.is_null() {
        return Ok(());
    }

    let params = params.unwrap_or(Value::Null);
    let obj = schema
        .as_object_mut()
        .context("parameters must be an object")?;

    if !obj.contains_key("type") {
        obj.insert("type".to_string(), json!("object"));
    } else if obj["type"].as_str().unwrap_or_default() != "object" {
        return Err(anyhow::anyhow!("type must be an object"));
    }

    if !obj.contains_key("required") {
        obj.insert("required".to_string(), json!([]));
    }

    let validator = jsonschema::validator_for(schema)?;

    validator
        .validate(&params)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    Ok(())
}

/// Identifier-safe names: ASCII alphanumerics and underscores, not starting
/// with a digit. Agent and tool names are looked up by exact match, so the
/// restriction keeps them unambiguous across registries and call chains.
pub fn is_identifier_safe(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_states_serialize_hyphenated() {
        assert_eq!(
            serde_json::to_string(&TaskState::InputRequired).unwrap(),
            "\"input-required\""
        );
        assert_eq!(
            serde_json::to_string(&TaskState::Submitted).unwrap(),
            "\"submitted\""
        );
        let state: TaskState = serde_json::from_str("\"input-required\"").unwrap();
        assert_eq!(state, TaskState::InputRequired);
    }

    #[test]
    fn terminal_states_have_no_outgoing_edges() {
        let all = [
            TaskState::Submitted,
            TaskState::Working,
            TaskState::InputRequired,
            TaskState::Completed,
            TaskState::Canceled,
            TaskState::Failed,
        ];
        for terminal in [TaskState::Completed, TaskState::Canceled, TaskState::Failed] {
            for next in all {
                assert!(!terminal.can_transition(next));
            }
        }
    }

    #[test]
    fn submitted_only_reaches_working_or_canceled() {
        assert!(TaskState::Submitted.can_transition(TaskState::Working));
        assert!(TaskState::Submitted.can_transition(TaskState::Canceled));
        assert!(!TaskState::Submitted.can_transition(TaskState::Completed));
        assert!(!TaskState::Submitted.can_transition(TaskState::InputRequired));
        assert!(!TaskState::Submitted.can_transition(TaskState::Failed));
    }

    #[test]
    fn message_roles_serialize_lowercase() {
        assert_eq!(serde_json::to_string(&MessageRole::Agent).unwrap(), "\"agent\"");
        assert_eq!(serde_json::to_string(&MessageRole::Tool).unwrap(), "\"tool\"");
    }

    #[test]
    fn text_part_round_trip() {
        let part = Part::Text("hello".to_string());
        let serialized = serde_json::to_string(&part).unwrap();
        assert!(serialized.contains("\"part_type\":\"text\""));
        let deserialized: Part = serde_json::from_str(&serialized).unwrap();
        assert_eq!(part, deserialized);
    }

    #[test]
    fn identifier_safety() {
        assert!(is_identifier_safe("utility_assistant"));
        assert!(is_identifier_safe("_private"));
        assert!(!is_identifier_safe("2fast"));
        assert!(!is_identifier_safe("has-dash"));
        assert!(!is_identifier_safe(""));
        assert!(!is_identifier_safe("with space"));
    }

    #[test]
    fn validate_parameters_rejects_missing_required() {
        let mut schema = serde_json::json!({
            "type": "object",
            "properties": {"city": {"type": "string"}},
            "required": ["city"]
        });
        assert!(validate_parameters(&mut schema, Some(serde_json::json!({}))).is_err());
        assert!(
            validate_parameters(&mut schema, Some(serde_json::json!({"city": "Tokyo"}))).is_ok()
        );
    }
}
