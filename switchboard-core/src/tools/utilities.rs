use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;

use switchboard_types::{Tool, ToolCall, ToolContext};

#[derive(Debug)]
pub struct GetCurrentTimeTool;

#[async_trait::async_trait]
impl Tool for GetCurrentTimeTool {
    fn get_name(&self) -> String {
        "get_current_time".to_string()
    }
    fn get_description(&self) -> String {
        "Get the current date and time (UTC)".to_string()
    }
    fn get_parameters(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {},
            "required": []
        })
    }

    async fn execute(
        &self,
        _tool_call: ToolCall,
        _context: Arc<ToolContext>,
    ) -> Result<String, anyhow::Error> {
        let now = chrono::Utc::now();
        Ok(format!(
            "Current time (UTC): {}",
            now.format("%Y-%m-%d %H:%M:%S")
        ))
    }
}

#[derive(Debug, Deserialize)]
struct TextArgs {
    text: String,
}

#[derive(Debug)]
pub struct TextLengthTool;

#[async_trait::async_trait]
impl Tool for TextLengthTool {
    fn get_name(&self) -> String {
        "text_length".to_string()
    }
    fn get_description(&self) -> String {
        "Count characters and words in text".to_string()
    }
    fn get_parameters(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "text": {"type": "string", "description": "The text to analyze"}
            },
            "required": ["text"]
        })
    }

    async fn execute(
        &self,
        tool_call: ToolCall,
        _context: Arc<ToolContext>,
    ) -> Result<String, anyhow::Error> {
        let args: TextArgs = serde_json::from_value(tool_call.input)?;
        let char_count = args.text.chars().count();
        let word_count = args.text.split_whitespace().count();
        Ok(format!("Characters: {}, Words: {}", char_count, word_count))
    }
}

#[derive(Debug)]
pub struct ReverseTextTool;

#[async_trait::async_trait]
impl Tool for ReverseTextTool {
    fn get_name(&self) -> String {
        "reverse_text".to_string()
    }
    fn get_description(&self) -> String {
        "Reverse a string".to_string()
    }
    fn get_parameters(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "text": {"type": "string", "description": "The text to reverse"}
            },
            "required": ["text"]
        })
    }

    async fn execute(
        &self,
        tool_call: ToolCall,
        _context: Arc<ToolContext>,
    ) -> Result<String, anyhow::Error> {
        let args: TextArgs = serde_json::from_value(tool_call.input)?;
        Ok(args.text.chars().rev().collect())
    }
}

#[derive(Debug, Deserialize)]
struct FormatJsonArgs {
    data: String,
}

#[derive(Debug)]
pub struct FormatJsonTool;

#[async_trait::async_trait]
impl Tool for FormatJsonTool {
    fn get_name(&self) -> String {
        "format_json".to_string()
    }
    fn get_description(&self) -> String {
        "Format a JSON string with proper indentation".to_string()
    }
    fn get_parameters(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "data": {"type": "string", "description": "A JSON string to format"}
            },
            "required": ["data"]
        })
    }

    async fn execute(
        &self,
        tool_call: ToolCall,
        _context: Arc<ToolContext>,
    ) -> Result<String, anyhow::Error> {
        let args: FormatJsonArgs = serde_json::from_value(tool_call.input)?;
        match serde_json::from_str::<serde_json::Value>(&args.data) {
            Ok(parsed) => Ok(serde_json::to_string_pretty(&parsed)?),
            Err(e) => Ok(format!("Invalid JSON: {}", e)),
        }
    }
}
