use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use serde_json::json;
use tokio::sync::Mutex;

use switchboard_types::{
    AgentCard, AgentDefinition, AgentError, Message, SessionStore, Task, TaskState, TaskStore,
    ToolCall, ToolContext, ToolDefinition,
};

use crate::completion::{CompletionAdapter, CompletionOutcome};
use crate::config::RuntimeConfig;
use crate::registry::{AgentRegistry, ToolRegistry};
use crate::stores::{InMemorySessionStore, InMemoryTaskStore};
use crate::tools::{register_default_catalog, CallAgentArgs, CALL_AGENT_TOOL};

/// Per-task control block. The run lock serializes orchestration runs against
/// a single task (follow-ups and cancels block until the in-flight run
/// reaches a suspension point); the cancel flag is observed cooperatively at
/// the top of each loop round and before each delegation.
#[derive(Debug, Default)]
struct TaskControl {
    run_lock: Mutex<()>,
    cancel: AtomicBool,
}

/// Drives tasks to completion by alternating completion-adapter calls and
/// tool executions, including recursive delegation to other agents through
/// the `call_agent` tool.
#[derive(Debug)]
pub struct Orchestrator {
    agents: Arc<AgentRegistry>,
    tools: Arc<ToolRegistry>,
    tasks: Arc<dyn TaskStore>,
    sessions: Arc<dyn SessionStore>,
    completion: Arc<dyn CompletionAdapter>,
    config: RuntimeConfig,
    controls: DashMap<String, Arc<TaskControl>>,
}

#[derive(Default)]
pub struct OrchestratorBuilder {
    agents: Option<Arc<AgentRegistry>>,
    tools: Option<Arc<ToolRegistry>>,
    tasks: Option<Arc<dyn TaskStore>>,
    sessions: Option<Arc<dyn SessionStore>>,
    completion: Option<Arc<dyn CompletionAdapter>>,
    config: Option<RuntimeConfig>,
}

impl OrchestratorBuilder {
    pub fn with_agent_registry(mut self, agents: Arc<AgentRegistry>) -> Self {
        self.agents = Some(agents);
        self
    }

    pub fn with_tool_registry(mut self, tools: Arc<ToolRegistry>) -> Self {
        self.tools = Some(tools);
        self
    }

    pub fn with_task_store(mut self, tasks: Arc<dyn TaskStore>) -> Self {
        self.tasks = Some(tasks);
        self
    }

    pub fn with_session_store(mut self, sessions: Arc<dyn SessionStore>) -> Self {
        self.sessions = Some(sessions);
        self
    }

    pub fn with_completion(mut self, completion: Arc<dyn CompletionAdapter>) -> Self {
        self.completion = Some(completion);
        self
    }

    pub fn with_config(mut self, config: RuntimeConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Assemble the orchestrator. Stores and registries default to in-memory
    /// instances with the built-in tool catalog; the completion adapter has
    /// no default and must be supplied.
    pub async fn build(self) -> Result<Orchestrator, AgentError> {
        let completion = self.completion.ok_or_else(|| {
            AgentError::Validation("a completion adapter is required".to_string())
        })?;
        let agents = self.agents.unwrap_or_default();
        let tools = match self.tools {
            Some(tools) => tools,
            None => {
                let tools = Arc::new(ToolRegistry::new());
                register_default_catalog(&tools, agents.clone()).await;
                tools
            }
        };
        Ok(Orchestrator {
            agents,
            tools,
            tasks: self
                .tasks
                .unwrap_or_else(|| Arc::new(InMemoryTaskStore::new())),
            sessions: self
                .sessions
                .unwrap_or_else(|| Arc::new(InMemorySessionStore::new())),
            completion,
            config: self.config.unwrap_or_default(),
            controls: DashMap::new(),
        })
    }
}

impl Orchestrator {
    pub fn builder() -> OrchestratorBuilder {
        OrchestratorBuilder::default()
    }

    // ----- agent management (routing layer passthroughs) -----

    pub async fn register_agent(&self, definition: AgentDefinition) -> Result<(), AgentError> {
        self.agents.register(definition).await
    }

    pub async fn get_agent(&self, name: &str) -> Result<AgentDefinition, AgentError> {
        self.agents.get(name).await
    }

    pub async fn list_agents(&self) -> Vec<AgentDefinition> {
        self.agents.list().await
    }

    pub async fn remove_agent(&self, name: &str) -> Result<AgentDefinition, AgentError> {
        self.agents.remove(name).await
    }

    pub async fn list_tools(&self) -> Vec<ToolDefinition> {
        self.tools.list().await
    }

    /// Discovery card for an agent: its definition plus the skills derived
    /// from the bound tools that currently resolve.
    pub async fn agent_card(&self, name: &str) -> Result<AgentCard, AgentError> {
        let definition = self.agents.get(name).await?;
        let tools = self.resolve_tool_specs(&definition).await;
        Ok(AgentCard::from_definition(&definition, &tools))
    }

    // ----- task lifecycle -----

    /// Create a task for an agent and run it to a terminal-or-suspended
    /// state. Reuses the supplied session, or starts a fresh one.
    pub async fn create_task(
        &self,
        agent_name: &str,
        message: Message,
        session_id: Option<&str>,
    ) -> Result<Task, AgentError> {
        // Resolve before creating anything so an unknown agent surfaces
        // without leaving a task record behind.
        let definition = self.agents.get(agent_name).await?;
        let task = self.tasks.create(agent_name, session_id).await?;
        self.run_task(&task.id, message, vec![definition.name])
            .await
    }

    pub async fn get_task(&self, task_id: &str) -> Result<Task, AgentError> {
        self.tasks.get(task_id).await
    }

    pub async fn list_tasks(&self) -> Result<Vec<Task>, AgentError> {
        self.tasks.list().await
    }

    /// Send a follow-up message to an existing task, resuming its loop.
    /// Blocks until any in-flight run for the task reaches a suspension
    /// point. Terminal tasks cannot be reopened.
    pub async fn post_message(&self, task_id: &str, message: Message) -> Result<Task, AgentError> {
        let task = self.tasks.get(task_id).await?;
        if task.state.is_terminal() {
            return Err(AgentError::InvalidTaskState(format!(
                "cannot send message to task {} in state '{}'",
                task_id, task.state
            )));
        }
        let chain = vec![task.agent_name.clone()];
        self.run_task(task_id, message, chain).await
    }

    /// Request cancellation. If no run is in flight the task is canceled
    /// immediately; otherwise the flag is observed at the next suspension
    /// point and the task never reverts to `working` afterwards.
    pub async fn cancel(&self, task_id: &str) -> Result<Task, AgentError> {
        let task = self.tasks.get(task_id).await?;
        if task.state.is_terminal() {
            return Err(AgentError::InvalidTaskState(format!(
                "cannot cancel task {} in state '{}'",
                task_id, task.state
            )));
        }
        let control = self.control(task_id);
        control.cancel.store(true, Ordering::SeqCst);
        if let Ok(_guard) = control.run_lock.try_lock() {
            let task = self.tasks.transition(task_id, TaskState::Canceled).await?;
            drop(_guard);
            self.controls.remove(task_id);
            return Ok(task);
        }
        tracing::debug!(task_id = %task_id, "cancel requested for in-flight task");
        Ok(task)
    }

    // ----- execution -----

    fn control(&self, task_id: &str) -> Arc<TaskControl> {
        self.controls
            .entry(task_id.to_string())
            .or_default()
            .clone()
    }

    /// One orchestration run against a task. Holds the task's run lock for
    /// the whole run, so concurrent messages serialize into coherent turns.
    async fn run_task(
        &self,
        task_id: &str,
        message: Message,
        chain: Vec<String>,
    ) -> Result<Task, AgentError> {
        let control = self.control(task_id);
        let _guard = control.run_lock.lock().await;

        let task = self.tasks.get(task_id).await?;
        if task.state.is_terminal() {
            // Canceled (or otherwise finished) while this run waited on the
            // lock; the message was never processed.
            if task.state == TaskState::Canceled {
                return Ok(task);
            }
            return Err(AgentError::InvalidTaskState(format!(
                "cannot process message for task {} in state '{}'",
                task_id, task.state
            )));
        }

        let task = self.drive(task_id, message, &chain, &control).await?;

        // A cancel that arrived after the last flag check still wins: the
        // task must not stay suspended once cancellation was requested.
        if !task.state.is_terminal() && control.cancel.load(Ordering::SeqCst) {
            let task = self.tasks.transition(task_id, TaskState::Canceled).await?;
            self.controls.remove(task_id);
            return Ok(task);
        }
        if task.state.is_terminal() {
            self.controls.remove(task_id);
        }
        Ok(task)
    }

    /// The bounded execution loop: alternate completion calls and tool
    /// rounds until a final answer, a clarification, a failure, or the
    /// round cap.
    async fn drive(
        &self,
        task_id: &str,
        user_message: Message,
        chain: &[String],
        control: &TaskControl,
    ) -> Result<Task, AgentError> {
        let task = self.tasks.get(task_id).await?;
        // Resolve the agent before mutating anything; a missing agent
        // surfaces to the caller with the task untouched.
        let definition = self.agents.get(&task.agent_name).await?;
        let session_id = task.session_id.clone();

        if task.state != TaskState::Working {
            self.tasks.transition(task_id, TaskState::Working).await?;
        }
        self.record(task_id, &session_id, user_message).await?;

        let tool_specs = self.resolve_tool_specs(&definition).await;
        let tool_context = Arc::new(ToolContext {
            agent_name: definition.name.clone(),
            session_id: session_id.clone(),
            task_id: task_id.to_string(),
            metadata: None,
        });

        for round in 0..self.config.max_tool_rounds {
            if control.cancel.load(Ordering::SeqCst) {
                tracing::info!(task_id = %task_id, round, "task canceled");
                return self.tasks.transition(task_id, TaskState::Canceled).await;
            }

            let history = self.sessions.history(&session_id).await?;
            let outcome = match self
                .complete_with_retry(&definition, &history, &tool_specs)
                .await
            {
                Ok(outcome) => outcome,
                Err(e) => return self.fail(task_id, e.to_string()).await,
            };

            match outcome {
                CompletionOutcome::Final { text } => {
                    self.record(task_id, &session_id, Message::agent(text)).await?;
                    return self.tasks.transition(task_id, TaskState::Completed).await;
                }
                CompletionOutcome::Clarification { text } => {
                    self.record(task_id, &session_id, Message::agent(text)).await?;
                    return self
                        .tasks
                        .transition(task_id, TaskState::InputRequired)
                        .await;
                }
                CompletionOutcome::ToolCalls { calls } => {
                    self.record(task_id, &session_id, Message::tool_calls(calls.clone()))
                        .await?;
                    // Execute strictly in emission order and append results
                    // in that same order: the transcript stays replayable.
                    for call in calls {
                        let result_text = if call.tool_name == CALL_AGENT_TOOL {
                            if control.cancel.load(Ordering::SeqCst) {
                                return self
                                    .tasks
                                    .transition(task_id, TaskState::Canceled)
                                    .await;
                            }
                            match self.delegate(&call, chain).await {
                                Ok(text) => text,
                                Err(e) if e.is_delegation() || matches!(e, AgentError::Validation(_)) => {
                                    return self.fail(task_id, e.to_string()).await;
                                }
                                Err(e) => return Err(e),
                            }
                        } else {
                            self.execute_tool(&call, tool_context.clone()).await
                        };
                        self.record(
                            task_id,
                            &session_id,
                            Message::tool_response(
                                call.tool_call_id.clone(),
                                call.tool_name.clone(),
                                json!(result_text),
                            ),
                        )
                        .await?;
                    }
                }
            }
        }

        self.fail(
            task_id,
            AgentError::ToolLoopBudgetExceeded(self.config.max_tool_rounds).to_string(),
        )
        .await
    }

    /// Resolve an agent's bound tools against the registry. Tools are
    /// best-effort: a name that does not resolve is omitted from the
    /// advertised list rather than failing the task.
    async fn resolve_tool_specs(&self, definition: &AgentDefinition) -> Vec<ToolDefinition> {
        let mut specs = vec![];
        for name in &definition.tools {
            match self.tools.get(name).await {
                Ok(tool) => specs.push(tool.get_tool_definition()),
                Err(_) => {
                    tracing::debug!(agent = %definition.name, tool = %name, "bound tool did not resolve, omitting");
                }
            }
        }
        specs
    }

    /// Append a message to both the session history and the task transcript.
    async fn record(
        &self,
        task_id: &str,
        session_id: &str,
        message: Message,
    ) -> Result<Task, AgentError> {
        self.sessions.append(session_id, message.clone()).await?;
        self.tasks.append_message(task_id, message).await
    }

    /// Mark the task failed with a human-readable reason in metadata.
    async fn fail(&self, task_id: &str, reason: String) -> Result<Task, AgentError> {
        tracing::warn!(task_id = %task_id, reason = %reason, "task failed");
        self.tasks.annotate(task_id, "error", json!(reason)).await?;
        self.tasks.transition(task_id, TaskState::Failed).await
    }

    /// Call the completion adapter with timeout and a bounded retry budget
    /// for transient failures.
    async fn complete_with_retry(
        &self,
        definition: &AgentDefinition,
        history: &[Message],
        tool_specs: &[ToolDefinition],
    ) -> Result<CompletionOutcome, AgentError> {
        let timeout = self.config.completion_timeout();
        let mut attempts = 0u32;
        loop {
            attempts += 1;
            let call = self
                .completion
                .complete(&definition.system_prompt, history, tool_specs);
            match tokio::time::timeout(timeout, call).await {
                Ok(Ok(outcome)) => return Ok(outcome),
                Ok(Err(e)) if e.transient && attempts <= self.config.transient_retries => {
                    tracing::warn!(agent = %definition.name, error = %e, "transient completion failure, retrying");
                }
                Ok(Err(e)) => return Err(AgentError::Adapter(e.message)),
                Err(_) if attempts <= self.config.transient_retries => {
                    tracing::warn!(agent = %definition.name, "completion call timed out, retrying");
                }
                Err(_) => {
                    return Err(AgentError::Adapter(format!(
                        "completion call timed out after {} attempts",
                        attempts
                    )));
                }
            }
        }
    }

    /// Execute one (non-delegation) tool call. Lookup, validation, and
    /// execution errors all become transcript content so a single failing
    /// tool never aborts a task that could still answer; only timeouts are
    /// retried.
    async fn execute_tool(&self, call: &ToolCall, context: Arc<ToolContext>) -> String {
        let timeout = self.config.tool_timeout();
        let mut attempts = 0u32;
        loop {
            attempts += 1;
            match tokio::time::timeout(timeout, self.tools.execute(call, context.clone())).await {
                Ok(Ok(text)) => return text,
                Ok(Err(e)) => {
                    tracing::warn!(tool = %call.tool_name, error = %e, "tool call failed");
                    return format!("Error executing tool '{}': {}", call.tool_name, e);
                }
                Err(_) if attempts <= self.config.transient_retries => {
                    tracing::warn!(tool = %call.tool_name, "tool call timed out, retrying");
                }
                Err(_) => {
                    return format!(
                        "Tool '{}' timed out after {} attempts",
                        call.tool_name, attempts
                    );
                }
            }
        }
    }

    /// Resolve a `call_agent` request into a nested task execution.
    ///
    /// The call chain is a value threaded through the recursion: the target
    /// is rejected if it already appears on the current path (cycle) or if
    /// the path is at the configured depth cap. The nested task gets its own
    /// isolated session; its final answer or failure reason becomes the tool
    /// result fed back to the parent.
    async fn delegate(&self, call: &ToolCall, chain: &[String]) -> Result<String, AgentError> {
        let args: CallAgentArgs = serde_json::from_value(call.input.clone())
            .map_err(|e| AgentError::Validation(format!("call_agent arguments: {}", e)))?;
        let target = args.agent_name;

        if !self.agents.contains(&target).await {
            return Err(AgentError::UnknownDelegationTarget(target));
        }
        if chain.iter().any(|name| name == &target) {
            return Err(AgentError::DelegationCycle(format!(
                "{} -> {}",
                chain.join(" -> "),
                target
            )));
        }
        if chain.len() >= self.config.max_delegation_depth {
            return Err(AgentError::DelegationDepthExceeded(
                self.config.max_delegation_depth,
            ));
        }

        tracing::info!(chain = %chain.join(" -> "), target = %target, "delegating to agent");
        let nested = self.tasks.create(&target, None).await?;
        let mut next_chain = chain.to_vec();
        next_chain.push(target.clone());

        let nested = Box::pin(self.run_task(&nested.id, Message::user(args.message), next_chain))
            .await?;

        let text = match nested.state {
            TaskState::Completed => nested
                .final_text()
                .unwrap_or_else(|| "Agent did not provide a response.".to_string()),
            TaskState::Failed => format!(
                "Agent '{}' failed: {}",
                target,
                nested.error_reason().unwrap_or("unknown error")
            ),
            state => format!("Agent '{}' ended in state '{}'", target, state),
        };
        Ok(text)
    }
}
