pub mod agent;
pub mod core;
pub mod errors;
pub mod stores;
pub mod tool;

pub use agent::{AgentCard, AgentDefinition, AgentSkill, SkillParameter, PROTOCOL_VERSION};
pub use core::{
    is_identifier_safe, validate_parameters, Artifact, Message, MessageRole, Part, Task, TaskState,
    ToolCall, ToolDefinition, ToolResponse,
};
pub use errors::AgentError;
pub use stores::{SessionStore, TaskStore};
pub use tool::{Tool, ToolContext};
