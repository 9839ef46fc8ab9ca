use std::sync::Arc;

use serde_json::json;

use switchboard_types::{AgentError, ToolCall, ToolContext};

use crate::registry::{AgentRegistry, ToolRegistry};
use crate::tests::agent;
use crate::tools::{register_default_catalog, MultiplyTool, CALL_AGENT_TOOL};

#[tokio::test]
async fn register_then_get_returns_identical_definition() {
    let registry = AgentRegistry::new();
    let definition = agent("utility_assistant", "You are helpful.", &["multiply"]);
    registry.register(definition.clone()).await.unwrap();

    let fetched = registry.get("utility_assistant").await.unwrap();
    assert_eq!(fetched, definition);
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let registry = AgentRegistry::new();
    registry.register(agent("echo", "", &[])).await.unwrap();

    let result = registry.register(agent("echo", "other", &[])).await;
    assert!(matches!(result, Err(AgentError::DuplicateAgent(name)) if name == "echo"));

    // The original registration is untouched.
    assert_eq!(registry.get("echo").await.unwrap().system_prompt, "");
}

#[tokio::test]
async fn list_preserves_registration_order() {
    let registry = AgentRegistry::new();
    for name in ["zeta", "alpha", "mid"] {
        registry.register(agent(name, "", &[])).await.unwrap();
    }
    let names: Vec<String> = registry.list().await.into_iter().map(|a| a.name).collect();
    assert_eq!(names, vec!["zeta", "alpha", "mid"]);
}

#[tokio::test]
async fn remove_agent() {
    let registry = AgentRegistry::new();
    registry.register(agent("gone", "", &[])).await.unwrap();
    registry.remove("gone").await.unwrap();

    assert!(matches!(
        registry.get("gone").await,
        Err(AgentError::AgentNotFound(_))
    ));
    assert!(matches!(
        registry.remove("gone").await,
        Err(AgentError::AgentNotFound(_))
    ));
    assert!(registry.list().await.is_empty());
}

#[tokio::test]
async fn register_rejects_unsafe_names() {
    let registry = AgentRegistry::new();
    let result = registry.register(agent("bad name!", "", &[])).await;
    assert!(matches!(result, Err(AgentError::Validation(_))));
}

#[tokio::test]
async fn tool_registry_lookup_and_catalog() {
    let agents = Arc::new(AgentRegistry::new());
    let tools = ToolRegistry::new();
    register_default_catalog(&tools, agents).await;

    assert!(tools.get("multiply").await.is_ok());
    assert!(matches!(
        tools.get("no_such_tool").await,
        Err(AgentError::ToolNotFound(_))
    ));

    let names: Vec<String> = tools.list().await.into_iter().map(|t| t.name).collect();
    assert!(names.contains(&CALL_AGENT_TOOL.to_string()));
    assert!(names.contains(&"get_weather".to_string()));
}

#[tokio::test]
async fn tool_registration_is_idempotent() {
    let tools = ToolRegistry::new();
    tools.register(Arc::new(MultiplyTool)).await;
    tools.register(Arc::new(MultiplyTool)).await;
    assert_eq!(tools.list().await.len(), 1);
}

#[tokio::test]
async fn tool_execution_validates_arguments() {
    let tools = ToolRegistry::new();
    tools.register(Arc::new(MultiplyTool)).await;
    let context = Arc::new(ToolContext::default());

    let bad = ToolCall::new("multiply", json!({"a": "not a number", "b": 4}));
    let result = tools.execute(&bad, context.clone()).await;
    assert!(matches!(
        result,
        Err(AgentError::InvalidToolArguments { tool, .. }) if tool == "multiply"
    ));

    let missing = ToolCall::new("multiply", json!({"a": 25}));
    assert!(tools.execute(&missing, context.clone()).await.is_err());

    let good = ToolCall::new("multiply", json!({"a": 25, "b": 4}));
    let text = tools.execute(&good, context).await.unwrap();
    assert!(text.contains("100"));
}
