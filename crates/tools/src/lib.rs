//! Capabilities for Weatherwise and the dispatcher that runs them.
//!
//! Tools give the agent the ability to fetch data it cannot know on its
//! own. Today that is current weather by city.

pub mod dispatch;
pub mod weather;

use std::sync::Arc;
use weatherwise_core::error::ToolError;
use weatherwise_core::tool::ToolRegistry;

pub use dispatch::{ToolDispatcher, UNKNOWN_FUNCTION};
pub use weather::{GetWeatherTool, SimulatedWeather, WeatherError, WeatherReport, WeatherSource};

/// Create the default tool registry with all built-in tools.
pub fn default_registry() -> Result<ToolRegistry, ToolError> {
    registry_with_weather(Arc::new(SimulatedWeather))
}

/// Create the built-in registry with a specific weather source.
pub fn registry_with_weather(source: Arc<dyn WeatherSource>) -> Result<ToolRegistry, ToolError> {
    ToolRegistry::new().with(Arc::new(GetWeatherTool::new(source)))
}
