pub mod completion;
pub mod config;
pub mod logging;
pub mod orchestrator;
pub mod registry;
pub mod stores;
pub mod tools;

pub mod types {
    pub use switchboard_types::*;
}

pub use completion::{CompletionAdapter, CompletionError, CompletionOutcome};
pub use config::RuntimeConfig;
pub use orchestrator::{Orchestrator, OrchestratorBuilder};
pub use registry::{AgentRegistry, ToolRegistry};
pub use stores::{InMemorySessionStore, InMemoryTaskStore};
pub use switchboard_types::AgentError;

#[cfg(test)]
mod tests;

#[cfg(test)]
pub use logging::init_logging;
