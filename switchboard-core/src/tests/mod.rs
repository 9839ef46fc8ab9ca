mod registry;
mod tools;

use std::sync::Arc;

use switchboard_types::AgentDefinition;

use crate::completion::CompletionAdapter;
use crate::config::RuntimeConfig;
use crate::orchestrator::Orchestrator;

pub(crate) fn agent(name: &str, system_prompt: &str, tools: &[&str]) -> AgentDefinition {
    AgentDefinition {
        name: name.to_string(),
        display_name: name.to_string(),
        description: format!("Test agent {}", name),
        system_prompt: system_prompt.to_string(),
        model: "gpt-4o".to_string(),
        tools: tools.iter().map(|t| t.to_string()).collect(),
        ..Default::default()
    }
}

pub(crate) async fn orchestrator_with(
    completion: Arc<dyn CompletionAdapter>,
) -> Arc<Orchestrator> {
    Arc::new(
        Orchestrator::builder()
            .with_completion(completion)
            .build()
            .await
            .unwrap(),
    )
}

pub(crate) async fn orchestrator_with_config(
    completion: Arc<dyn CompletionAdapter>,
    config: RuntimeConfig,
) -> Arc<Orchestrator> {
    Arc::new(
        Orchestrator::builder()
            .with_completion(completion)
            .with_config(config)
            .build()
            .await
            .unwrap(),
    )
}
