use std::sync::Arc;

use serde_json::json;

use switchboard_types::{Tool, ToolCall, ToolContext};

use crate::registry::AgentRegistry;
use crate::tests::agent;
use crate::tools::{
    CallAgentTool, ConvertUnitsTool, DivideTool, FormatJsonTool, GetForecastTool, GetWeatherTool,
    ListAgentsTool, ReverseTextTool, TextLengthTool,
};

fn context() -> Arc<ToolContext> {
    Arc::new(ToolContext::default())
}

async fn run(tool: &dyn Tool, input: serde_json::Value) -> String {
    tool.execute(ToolCall::new(tool.get_name(), input), context())
        .await
        .unwrap()
}

#[tokio::test]
async fn divide_reports_division_by_zero_as_text() {
    let result = run(&DivideTool, json!({"a": 10.0, "b": 0.0})).await;
    assert_eq!(result, "Error: Cannot divide by zero");
}

#[tokio::test]
async fn convert_units_handles_known_and_unknown_pairs() {
    let result = run(
        &ConvertUnitsTool,
        json!({"value": 100.0, "from_unit": "km", "to_unit": "miles"}),
    )
    .await;
    assert!(result.contains("62.1371"));

    let unsupported = run(
        &ConvertUnitsTool,
        json!({"value": 1.0, "from_unit": "stone", "to_unit": "kg"}),
    )
    .await;
    assert!(unsupported.contains("not supported"));
}

#[tokio::test]
async fn weather_lookup_is_case_insensitive() {
    let result = run(&GetWeatherTool, json!({"city": "Tokyo"})).await;
    assert!(result.contains("Rainy"));
    assert!(result.contains("82%"));

    let missing = run(&GetWeatherTool, json!({"city": "Atlantis"})).await;
    assert!(missing.contains("not available"));
}

#[tokio::test]
async fn forecast_clamps_day_count() {
    let result = run(&GetForecastTool, json!({"city": "london", "days": 99})).await;
    assert!(result.starts_with("7-day forecast"));
    assert!(result.contains("Day 7"));
    assert!(!result.contains("Day 8"));
}

#[tokio::test]
async fn text_tools() {
    assert_eq!(run(&ReverseTextTool, json!({"text": "abc"})).await, "cba");
    assert_eq!(
        run(&TextLengthTool, json!({"text": "hello wide world"})).await,
        "Characters: 16, Words: 3"
    );
}

#[tokio::test]
async fn format_json_reports_parse_errors_as_text() {
    let ok = run(&FormatJsonTool, json!({"data": "{\"a\":1}"})).await;
    assert!(ok.contains("\"a\": 1"));

    let bad = run(&FormatJsonTool, json!({"data": "{oops"})).await;
    assert!(bad.starts_with("Invalid JSON"));
}

#[tokio::test]
async fn list_agents_reads_the_registry() {
    let registry = Arc::new(AgentRegistry::new());
    let tool = ListAgentsTool::new(registry.clone());

    assert_eq!(run(&tool, json!({})).await, "No agents available.");

    registry
        .register(agent("utility_assistant", "", &[]))
        .await
        .unwrap();
    let listing = run(&tool, json!({})).await;
    assert!(listing.contains("utility_assistant"));
}

#[tokio::test]
async fn call_agent_refuses_direct_execution() {
    let result = CallAgentTool
        .execute(
            ToolCall::new(
                "call_agent",
                json!({"agent_name": "x", "message": "hello"}),
            ),
            context(),
        )
        .await;
    assert!(result.is_err());
}
