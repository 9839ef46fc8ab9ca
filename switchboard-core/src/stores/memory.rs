use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use switchboard_types::{
    AgentError, Message, SessionStore, Task, TaskState, TaskStore,
};

/// In-memory session store: session id -> ordered message history.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, Vec<Message>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create_session(&self) -> String {
        let session_id = uuid::Uuid::new_v4().to_string();
        self.sessions
            .write()
            .await
            .insert(session_id.clone(), vec![]);
        session_id
    }

    async fn append(&self, session_id: &str, message: Message) -> Result<(), AgentError> {
        let mut sessions = self.sessions.write().await;
        // Sessions referenced by tasks may not have gone through
        // create_session; they materialize on first append.
        sessions
            .entry(session_id.to_string())
            .or_default()
            .push(message);
        Ok(())
    }

    async fn history(&self, session_id: &str) -> Result<Vec<Message>, AgentError> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(session_id).cloned().unwrap_or_default())
    }
}

/// In-memory task store. The single mutation point for task records; every
/// state change goes through `transition`, which enforces the task state
/// machine.
#[derive(Debug, Default)]
pub struct InMemoryTaskStore {
    tasks: RwLock<HashMap<String, Task>>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn create(
        &self,
        agent_name: &str,
        session_id: Option<&str>,
    ) -> Result<Task, AgentError> {
        let task = Task::new(agent_name, session_id);
        let mut tasks = self.tasks.write().await;
        tasks.insert(task.id.clone(), task.clone());
        tracing::debug!(task_id = %task.id, agent = %agent_name, "created task");
        Ok(task)
    }

    async fn get(&self, task_id: &str) -> Result<Task, AgentError> {
        let tasks = self.tasks.read().await;
        tasks
            .get(task_id)
            .cloned()
            .ok_or_else(|| AgentError::TaskNotFound(task_id.to_string()))
    }

    async fn append_message(&self, task_id: &str, message: Message) -> Result<Task, AgentError> {
        let mut tasks = self.tasks.write().await;
        let task = tasks
            .get_mut(task_id)
            .ok_or_else(|| AgentError::TaskNotFound(task_id.to_string()))?;
        if !task.state.accepts_messages() {
            return Err(AgentError::InvalidTaskState(format!(
                "cannot append message to task {} in state '{}'",
                task_id, task.state
            )));
        }
        task.messages.push(message);
        task.updated_at = chrono::Utc::now();
        Ok(task.clone())
    }

    async fn transition(&self, task_id: &str, state: TaskState) -> Result<Task, AgentError> {
        let mut tasks = self.tasks.write().await;
        let task = tasks
            .get_mut(task_id)
            .ok_or_else(|| AgentError::TaskNotFound(task_id.to_string()))?;
        if !task.state.can_transition(state) {
            return Err(AgentError::InvalidTaskState(format!(
                "task {} cannot transition from '{}' to '{}'",
                task_id, task.state, state
            )));
        }
        tracing::debug!(task_id = %task_id, from = %task.state, to = %state, "task transition");
        task.state = state;
        task.updated_at = chrono::Utc::now();
        Ok(task.clone())
    }

    async fn annotate(&self, task_id: &str, key: &str, value: Value) -> Result<Task, AgentError> {
        let mut tasks = self.tasks.write().await;
        let task = tasks
            .get_mut(task_id)
            .ok_or_else(|| AgentError::TaskNotFound(task_id.to_string()))?;
        task.metadata.insert(key.to_string(), value);
        task.updated_at = chrono::Utc::now();
        Ok(task.clone())
    }

    async fn list(&self) -> Result<Vec<Task>, AgentError> {
        let tasks = self.tasks.read().await;
        let mut all: Vec<Task> = tasks.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(all)
    }
}
