use async_trait::async_trait;
use serde_json::Value;

use crate::core::{Message, Task, TaskState};
use crate::errors::AgentError;

/// Session store: keeps the ordered, append-only conversation history a task
/// belongs to. A session outlives any single task; follow-ups and new tasks
/// may reuse an existing session id.
#[async_trait]
pub trait SessionStore: Send + Sync + std::fmt::Debug {
    /// Allocate a fresh session id with an empty history.
    async fn create_session(&self) -> String;

    async fn append(&self, session_id: &str, message: Message) -> Result<(), AgentError>;

    async fn history(&self, session_id: &str) -> Result<Vec<Message>, AgentError>;
}

/// Task store: owns every task record and is the single place state
/// transitions are enforced. Tasks are never physically deleted; cancellation
/// is a state, not removal.
#[async_trait]
pub trait TaskStore: Send + Sync + std::fmt::Debug {
    /// Create a task in state `submitted`, generating a session id when none
    /// is supplied.
    async fn create(&self, agent_name: &str, session_id: Option<&str>)
        -> Result<Task, AgentError>;

    async fn get(&self, task_id: &str) -> Result<Task, AgentError>;

    /// Append a message to the task transcript. Only valid while the task
    /// still accepts messages (`submitted`, `working`, `input-required`).
    async fn append_message(&self, task_id: &str, message: Message) -> Result<Task, AgentError>;

    /// Apply a state transition. Any edge outside the task state machine,
    /// including every edge out of a terminal state, fails with
    /// `InvalidTaskState` and leaves the task unchanged.
    async fn transition(&self, task_id: &str, state: TaskState) -> Result<Task, AgentError>;

    /// Write a metadata entry, e.g. the failure reason of a failed task.
    async fn annotate(&self, task_id: &str, key: &str, value: Value) -> Result<Task, AgentError>;

    async fn list(&self) -> Result<Vec<Task>, AgentError>;
}
