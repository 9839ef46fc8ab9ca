#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("Agent not found: {0}")]
    AgentNotFound(String),
    #[error("Agent already registered: {0}")]
    DuplicateAgent(String),
    #[error("Task not found: {0}")]
    TaskNotFound(String),
    #[error("Tool not found: {0}")]
    ToolNotFound(String),
    #[error("Invalid task state: {0}")]
    InvalidTaskState(String),
    #[error("Invalid arguments for tool '{tool}': {reason}")]
    InvalidToolArguments { tool: String, reason: String },
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Unknown delegation target: {0}")]
    UnknownDelegationTarget(String),
    #[error("Delegation cycle detected: {0}")]
    DelegationCycle(String),
    #[error("Delegation depth exceeded: max {0}")]
    DelegationDepthExceeded(usize),
    #[error("Completion adapter failed: {0}")]
    Adapter(String),
    #[error("Tool execution failed: {0}")]
    ToolExecution(String),
    #[error("ToolLoopBudgetExceeded: no final answer after {0} rounds")]
    ToolLoopBudgetExceeded(usize),
    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),
}

impl AgentError {
    /// Delegation rejections fail the task issuing the `call_agent` request
    /// rather than surfacing to the caller.
    pub fn is_delegation(&self) -> bool {
        matches!(
            self,
            AgentError::UnknownDelegationTarget(_)
                | AgentError::DelegationCycle(_)
                | AgentError::DelegationDepthExceeded(_)
        )
    }
}
