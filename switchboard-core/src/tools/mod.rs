use std::sync::Arc;

use switchboard_types::Tool;

use crate::registry::{AgentRegistry, ToolRegistry};

mod agents;
mod calculator;
mod utilities;
mod weather;

pub use agents::{CallAgentArgs, CallAgentTool, ListAgentsTool, CALL_AGENT_TOOL};
pub use calculator::{AddTool, ConvertUnitsTool, DivideTool, MultiplyTool, SubtractTool};
pub use utilities::{FormatJsonTool, GetCurrentTimeTool, ReverseTextTool, TextLengthTool};
pub use weather::{GetForecastTool, GetWeatherTool};

/// The fixed tool catalog for a deployment. Registration is idempotent, so
/// calling this more than once at startup is harmless.
pub async fn register_default_catalog(tools: &ToolRegistry, agents: Arc<AgentRegistry>) {
    let catalog: Vec<Arc<dyn Tool>> = vec![
        Arc::new(AddTool),
        Arc::new(SubtractTool),
        Arc::new(MultiplyTool),
        Arc::new(DivideTool),
        Arc::new(ConvertUnitsTool),
        Arc::new(GetCurrentTimeTool),
        Arc::new(TextLengthTool),
        Arc::new(ReverseTextTool),
        Arc::new(FormatJsonTool),
        Arc::new(GetWeatherTool),
        Arc::new(GetForecastTool),
        Arc::new(ListAgentsTool::new(agents)),
        Arc::new(CallAgentTool),
    ];
    for tool in catalog {
        tools.register(tool).await;
    }
}
