use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;

use switchboard_types::{Tool, ToolCall, ToolContext};

// Fixed demo table; a deployment wires a live provider behind the same tool.
const DEMO_WEATHER: &[(&str, i32, &str, u32)] = &[
    ("new york", 72, "Sunny", 45),
    ("london", 55, "Cloudy", 78),
    ("tokyo", 65, "Rainy", 82),
    ("paris", 60, "Partly Cloudy", 65),
    ("sydney", 78, "Sunny", 55),
    ("bogota", 58, "Cloudy", 72),
];

fn lookup(city: &str) -> Option<(i32, &'static str, u32)> {
    let city = city.to_lowercase();
    DEMO_WEATHER
        .iter()
        .find(|(name, _, _, _)| *name == city)
        .map(|(_, temp, condition, humidity)| (*temp, *condition, *humidity))
}

#[derive(Debug, Deserialize)]
struct WeatherArgs {
    city: String,
}

#[derive(Debug)]
pub struct GetWeatherTool;

#[async_trait::async_trait]
impl Tool for GetWeatherTool {
    fn get_name(&self) -> String {
        "get_weather".to_string()
    }
    fn get_description(&self) -> String {
        "Get the current weather for a city".to_string()
    }
    fn get_parameters(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "city": {
                    "type": "string",
                    "description": "The name of the city (e.g., \"New York\", \"London\", \"Tokyo\")"
                }
            },
            "required": ["city"]
        })
    }

    async fn execute(
        &self,
        tool_call: ToolCall,
        _context: Arc<ToolContext>,
    ) -> Result<String, anyhow::Error> {
        let args: WeatherArgs = serde_json::from_value(tool_call.input)?;
        match lookup(&args.city) {
            Some((temp, condition, humidity)) => Ok(format!(
                "Weather in {}:\n- Temperature: {}°F\n- Condition: {}\n- Humidity: {}%",
                args.city, temp, condition, humidity
            )),
            None => Ok(format!(
                "Weather data not available for {}. Try: New York, London, Tokyo, Paris, Sydney, or Bogota.",
                args.city
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ForecastArgs {
    city: String,
    #[serde(default = "default_forecast_days")]
    days: i64,
}

fn default_forecast_days() -> i64 {
    3
}

#[derive(Debug)]
pub struct GetForecastTool;

#[async_trait::async_trait]
impl Tool for GetForecastTool {
    fn get_name(&self) -> String {
        "get_forecast".to_string()
    }
    fn get_description(&self) -> String {
        "Get a weather forecast for a city".to_string()
    }
    fn get_parameters(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "city": {"type": "string", "description": "The name of the city"},
                "days": {"type": "integer", "description": "Number of days to forecast (1-7)"}
            },
            "required": ["city"]
        })
    }

    async fn execute(
        &self,
        tool_call: ToolCall,
        _context: Arc<ToolContext>,
    ) -> Result<String, anyhow::Error> {
        let args: ForecastArgs = serde_json::from_value(tool_call.input)?;
        let Some((temp, condition, _)) = lookup(&args.city) else {
            return Ok(format!("Forecast not available for {}.", args.city));
        };

        let days = args.days.clamp(1, 7);
        let mut lines = vec![format!("{}-day forecast for {}:", days, args.city)];
        for i in 0..days {
            let temp_variation = (i % 3 - 1) * 5;
            lines.push(format!(
                "- Day {}: {}°F, {}",
                i + 1,
                temp as i64 + temp_variation,
                condition
            ));
        }
        Ok(lines.join("\n"))
    }
}
