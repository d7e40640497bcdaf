//! Weather capability — `get_weather(city)`.
//!
//! The tool itself only validates arguments and shapes the record; where the
//! numbers come from is up to a [`WeatherSource`]. The bundled
//! [`SimulatedWeather`] source returns plausible random conditions so the
//! agent can run end to end without a weather API.

use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use weatherwise_core::error::ToolError;
use weatherwise_core::tool::Tool;

pub const TOOL_NAME: &str = "get_weather";

/// Current conditions for one city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherReport {
    /// The city exactly as requested
    pub city: String,
    /// Degrees Celsius
    pub temperature: i32,
    pub condition: String,
    /// Relative humidity, percent
    pub humidity: u32,
    pub wind_speed: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("weather service unavailable: {0}")]
    Unavailable(String),
}

/// Somewhere current weather can be fetched from.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn current(&self, city: &str) -> Result<WeatherReport, WeatherError>;
}

const CONDITIONS: [&str; 5] = ["Sunny", "Cloudy", "Rainy", "Partly Cloudy", "Windy"];

/// Random but plausible weather. Stateless; safe to share across requests.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimulatedWeather;

impl SimulatedWeather {
    fn sample(city: &str) -> WeatherReport {
        let mut rng = rand::rng();
        WeatherReport {
            city: city.to_string(),
            temperature: rng.random_range(10..35),
            condition: CONDITIONS[rng.random_range(0..CONDITIONS.len())].to_string(),
            humidity: rng.random_range(30..=90),
            wind_speed: rng.random_range(0..=30),
        }
    }
}

#[async_trait]
impl WeatherSource for SimulatedWeather {
    async fn current(&self, city: &str) -> Result<WeatherReport, WeatherError> {
        Ok(Self::sample(city))
    }
}

#[derive(Debug, Deserialize)]
struct GetWeatherArgs {
    city: String,
}

/// The `get_weather` tool.
pub struct GetWeatherTool {
    source: Arc<dyn WeatherSource>,
}

impl GetWeatherTool {
    pub fn new(source: Arc<dyn WeatherSource>) -> Self {
        Self { source }
    }

    /// A tool backed by [`SimulatedWeather`].
    pub fn simulated() -> Self {
        Self::new(Arc::new(SimulatedWeather))
    }
}

#[async_trait]
impl Tool for GetWeatherTool {
    fn name(&self) -> &str {
        TOOL_NAME
    }

    fn description(&self) -> &str {
        "Get the current weather for a city"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "city": {
                    "type": "string",
                    "description": "The name of the city to get weather for"
                }
            },
            "required": ["city"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<serde_json::Value, ToolError> {
        let args: GetWeatherArgs = serde_json::from_value(arguments)
            .map_err(|e| ToolError::InvalidArguments(e.to_string()))?;

        if args.city.trim().is_empty() {
            return Err(ToolError::InvalidArguments("'city' must not be empty".into()));
        }

        let report = self
            .source
            .current(&args.city)
            .await
            .map_err(|e| ToolError::ExecutionFailed {
                tool_name: TOOL_NAME.into(),
                reason: format!("Failed to get weather: {e}"),
            })?;

        serde_json::to_value(report).map_err(|e| ToolError::ExecutionFailed {
            tool_name: TOOL_NAME.into(),
            reason: e.to_string(),
        })
    }
}
