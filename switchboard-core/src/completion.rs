use switchboard_types::{Message, ToolCall, ToolDefinition};

/// What a single completion call produced: exactly one of a final answer, a
/// clarification request, or a batch of tool-call requests.
#[derive(Debug, Clone, PartialEq)]
pub enum CompletionOutcome {
    Final { text: String },
    Clarification { text: String },
    ToolCalls { calls: Vec<ToolCall> },
}

/// Failure from the completion adapter. Transient failures (rate limits,
/// connection resets, timeouts) are retried within the configured budget;
/// anything else fails the task immediately.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct CompletionError {
    pub message: String,
    pub transient: bool,
}

impl CompletionError {
    pub fn transient(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            transient: true,
        }
    }

    pub fn fatal(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            transient: false,
        }
    }
}

/// The language-model invocation boundary. Implementations receive the
/// agent's system prompt, the full session history, and the tool
/// definitions that resolved for this dispatch.
#[async_trait::async_trait]
pub trait CompletionAdapter: Send + Sync + std::fmt::Debug {
    async fn complete(
        &self,
        system_prompt: &str,
        history: &[Message],
        tool_specs: &[ToolDefinition],
    ) -> Result<CompletionOutcome, CompletionError>;
}
