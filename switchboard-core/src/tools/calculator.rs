use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;

use switchboard_types::{Tool, ToolCall, ToolContext};

#[derive(Debug, Deserialize)]
struct BinaryArgs {
    a: f64,
    b: f64,
}

fn number_schema(a_desc: &str, b_desc: &str) -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "a": {"type": "number", "description": a_desc},
            "b": {"type": "number", "description": b_desc}
        },
        "required": ["a", "b"]
    })
}

#[derive(Debug)]
pub struct AddTool;

#[async_trait::async_trait]
impl Tool for AddTool {
    fn get_name(&self) -> String {
        "add".to_string()
    }
    fn get_description(&self) -> String {
        "Add two numbers".to_string()
    }
    fn get_parameters(&self) -> serde_json::Value {
        number_schema("First number", "Second number")
    }

    async fn execute(
        &self,
        tool_call: ToolCall,
        _context: Arc<ToolContext>,
    ) -> Result<String, anyhow::Error> {
        let args: BinaryArgs = serde_json::from_value(tool_call.input)?;
        Ok(format!("{} + {} = {}", args.a, args.b, args.a + args.b))
    }
}

#[derive(Debug)]
pub struct SubtractTool;

#[async_trait::async_trait]
impl Tool for SubtractTool {
    fn get_name(&self) -> String {
        "subtract".to_string()
    }
    fn get_description(&self) -> String {
        "Subtract two numbers".to_string()
    }
    fn get_parameters(&self) -> serde_json::Value {
        number_schema("First number", "Second number")
    }

    async fn execute(
        &self,
        tool_call: ToolCall,
        _context: Arc<ToolContext>,
    ) -> Result<String, anyhow::Error> {
        let args: BinaryArgs = serde_json::from_value(tool_call.input)?;
        Ok(format!("{} - {} = {}", args.a, args.b, args.a - args.b))
    }
}

#[derive(Debug)]
pub struct MultiplyTool;

#[async_trait::async_trait]
impl Tool for MultiplyTool {
    fn get_name(&self) -> String {
        "multiply".to_string()
    }
    fn get_description(&self) -> String {
        "Multiply two numbers".to_string()
    }
    fn get_parameters(&self) -> serde_json::Value {
        number_schema("First number", "Second number")
    }

    async fn execute(
        &self,
        tool_call: ToolCall,
        _context: Arc<ToolContext>,
    ) -> Result<String, anyhow::Error> {
        let args: BinaryArgs = serde_json::from_value(tool_call.input)?;
        Ok(format!("{} × {} = {}", args.a, args.b, args.a * args.b))
    }
}

#[derive(Debug)]
pub struct DivideTool;

#[async_trait::async_trait]
impl Tool for DivideTool {
    fn get_name(&self) -> String {
        "divide".to_string()
    }
    fn get_description(&self) -> String {
        "Divide two numbers".to_string()
    }
    fn get_parameters(&self) -> serde_json::Value {
        number_schema("Dividend (number to be divided)", "Divisor (number to divide by)")
    }

    async fn execute(
        &self,
        tool_call: ToolCall,
        _context: Arc<ToolContext>,
    ) -> Result<String, anyhow::Error> {
        let args: BinaryArgs = serde_json::from_value(tool_call.input)?;
        if args.b == 0.0 {
            // Transcript content, not a tool failure.
            return Ok("Error: Cannot divide by zero".to_string());
        }
        Ok(format!("{} ÷ {} = {}", args.a, args.b, args.a / args.b))
    }
}

#[derive(Debug, Deserialize)]
struct ConvertArgs {
    value: f64,
    from_unit: String,
    to_unit: String,
}

#[derive(Debug)]
pub struct ConvertUnitsTool;

#[async_trait::async_trait]
impl Tool for ConvertUnitsTool {
    fn get_name(&self) -> String {
        "convert_units".to_string()
    }
    fn get_description(&self) -> String {
        "Convert between common units".to_string()
    }
    fn get_parameters(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "value": {"type": "number", "description": "The value to convert"},
                "from_unit": {
                    "type": "string",
                    "description": "Source unit (km, miles, celsius, fahrenheit, kg, lbs, meters, feet)"
                },
                "to_unit": {"type": "string", "description": "Target unit"}
            },
            "required": ["value", "from_unit", "to_unit"]
        })
    }

    async fn execute(
        &self,
        tool_call: ToolCall,
        _context: Arc<ToolContext>,
    ) -> Result<String, anyhow::Error> {
        let args: ConvertArgs = serde_json::from_value(tool_call.input)?;
        let from = args.from_unit.to_lowercase();
        let to = args.to_unit.to_lowercase();
        let value = args.value;

        let result = match (from.as_str(), to.as_str()) {
            ("km", "miles") => Some(value * 0.621371),
            ("miles", "km") => Some(value * 1.60934),
            ("celsius", "fahrenheit") => Some(value * 9.0 / 5.0 + 32.0),
            ("fahrenheit", "celsius") => Some((value - 32.0) * 5.0 / 9.0),
            ("kg", "lbs") => Some(value * 2.20462),
            ("lbs", "kg") => Some(value / 2.20462),
            ("meters", "feet") => Some(value * 3.28084),
            ("feet", "meters") => Some(value / 3.28084),
            _ => None,
        };

        match result {
            Some(converted) => Ok(format!(
                "{} {} = {:.4} {}",
                value, args.from_unit, converted, args.to_unit
            )),
            None => Ok(format!(
                "Conversion from {} to {} is not supported",
                args.from_unit, args.to_unit
            )),
        }
    }
}
