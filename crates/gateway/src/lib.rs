//! HTTP API gateway for Weatherwise.
//!
//! Exposes `POST /ask` for questions, `GET /health`, and an informational
//! root listing the endpoints.
//!
//! Built on Axum for high performance async HTTP.

use axum::extract::DefaultBodyLimit;
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use weatherwise_agent::{AgentAnswer, AgentLoop, AskError, QuestionHandler};
use weatherwise_config::AppConfig;
use weatherwise_core::error::ToolError;
use weatherwise_core::provider::Provider;
use weatherwise_core::tool::ToolRegistry;
use weatherwise_tools::ToolDispatcher;

/// Maximum accepted request body.
pub const BODY_LIMIT_BYTES: usize = 64 * 1024;

/// Shared application state for the gateway.
pub struct GatewayState {
    pub handler: QuestionHandler,
}

type SharedState = Arc<GatewayState>;

/// Build the Axum router with all gateway routes.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/ask", post(ask_handler))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// Wire the tool registry, dispatcher, agent loop, and question handler
/// around a provider, as described by `config`.
pub fn build_question_handler(
    config: &AppConfig,
    provider: Arc<dyn Provider>,
) -> Result<QuestionHandler, ToolError> {
    let registry = weatherwise_tools::default_registry()?;
    Ok(question_handler_with_registry(config, provider, registry))
}

/// Same as [`build_question_handler`], over a caller-supplied registry.
pub fn question_handler_with_registry(
    config: &AppConfig,
    provider: Arc<dyn Provider>,
    registry: ToolRegistry,
) -> QuestionHandler {
    let dispatcher = Arc::new(ToolDispatcher::new(
        Arc::new(registry),
        Duration::from_secs(config.agent.tool_timeout_secs),
    ));

    let mut agent = AgentLoop::new(provider, &config.model, dispatcher);
    if let Some(temperature) = config.temperature {
        agent = agent.with_temperature(temperature);
    }
    if let Some(max_tokens) = config.max_tokens {
        agent = agent.with_max_tokens(max_tokens);
    }

    QuestionHandler::new(Arc::new(agent), &config.agent.system_prompt)
}

/// Start the gateway HTTP server.
///
/// The provider, tools, and agent are built once here and shared by every
/// request.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let provider = weatherwise_providers::build_from_config(&config)?;
    let handler = build_question_handler(&config, provider)?;

    info!(
        provider = %handler.agent().provider_name(),
        model = %handler.agent().model(),
        "Agent ready"
    );

    let app = build_router(Arc::new(GatewayState { handler }));

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Handlers ---

#[derive(Serialize)]
struct RootResponse {
    message: &'static str,
    endpoints: Endpoints,
}

#[derive(Serialize)]
struct Endpoints {
    #[serde(rename = "/ask")]
    ask: &'static str,
    #[serde(rename = "/health")]
    health: &'static str,
}

async fn root_handler() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Weather Expert Agent API",
        endpoints: Endpoints {
            ask: "POST - Ask the weather agent a question",
            health: "GET - Health check",
        },
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Deserialize)]
struct AskRequest {
    /// A missing field is treated like an empty question.
    #[serde(default)]
    question: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
}

/// Wraps [`AskError`] so it can be returned from handlers.
struct ApiError(AskError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            AskError::InvalidQuestion => StatusCode::BAD_REQUEST,
            AskError::Agent(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(ErrorResponse {
            detail: self.0.to_string(),
        });
        (status, body).into_response()
    }
}

async fn ask_handler(
    State(state): State<SharedState>,
    Json(payload): Json<AskRequest>,
) -> Result<Json<AgentAnswer>, ApiError> {
    info!(bytes = payload.question.len(), "ask request");

    match state.handler.ask(&payload.question).await {
        Ok(answer) => Ok(Json(answer)),
        Err(e) => {
            warn!(error = %e, "ask request failed");
            Err(ApiError(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use std::sync::Mutex;
    use tower::ServiceExt;
    use weatherwise_core::error::ProviderError;
    use weatherwise_core::message::{Message, MessageToolCall};
    use weatherwise_core::provider::{ProviderRequest, ProviderResponse};
    use weatherwise_tools::{WeatherError, WeatherReport, WeatherSource};

    /// Replays scripted responses in order and keeps every request it saw.
    struct ScriptedProvider {
        responses: Mutex<Vec<Result<ProviderResponse, ProviderError>>>,
        requests: Mutex<Vec<ProviderRequest>>,
    }

    impl ScriptedProvider {
        fn new(responses: Vec<Result<ProviderResponse, ProviderError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<ProviderRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    /// A weather backend that never answers.
    struct StalledWeather;

    #[async_trait::async_trait]
    impl WeatherSource for StalledWeather {
        async fn current(&self, _city: &str) -> Result<WeatherReport, WeatherError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Err(WeatherError::Unavailable("never reached".into()))
        }
    }

    #[async_trait::async_trait]
    impl Provider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
            self.requests.lock().unwrap().push(request);
            let mut responses = self.responses.lock().unwrap();
            assert!(!responses.is_empty(), "ScriptedProvider exhausted");
            responses.remove(0)
        }
    }

    fn text(content: &str) -> ProviderResponse {
        ProviderResponse {
            message: Message::assistant(content),
            usage: None,
            model: "scripted".into(),
        }
    }

    fn weather_call(city: &str) -> ProviderResponse {
        ProviderResponse {
            message: Message::assistant_tool_calls(
                None,
                vec![MessageToolCall {
                    id: "call_1".into(),
                    name: "get_weather".into(),
                    arguments: format!(r#"{{"city":"{city}"}}"#),
                }],
            ),
            usage: None,
            model: "scripted".into(),
        }
    }

    fn app(responses: Vec<Result<ProviderResponse, ProviderError>>) -> Router {
        let handler =
            build_question_handler(&AppConfig::default(), ScriptedProvider::new(responses)).unwrap();
        build_router(Arc::new(GatewayState { handler }))
    }

    fn post_ask(body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/ask")
            .header("content-type", "application/json")
            .body(body.into())
            .unwrap()
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_endpoint() {
        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app(vec![]).oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert!(body["version"].is_string());
    }

    #[tokio::test]
    async fn root_lists_endpoints() {
        let req = Request::builder().uri("/").body(Body::empty()).unwrap();

        let response = app(vec![]).oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["message"], "Weather Expert Agent API");
        assert!(body["endpoints"]["/ask"].is_string());
        assert!(body["endpoints"]["/health"].is_string());
    }

    #[tokio::test]
    async fn ask_direct_answer() {
        let app = app(vec![Ok(text("Hello! Ask me about the weather."))]);

        let response = app.oneshot(post_ask(r#"{"question":"Hello"}"#)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["answer"], "Hello! Ask me about the weather.");
        assert_eq!(body["tool_used"], false);
    }

    #[tokio::test]
    async fn ask_with_tool_round() {
        let app = app(vec![
            Ok(weather_call("Paris")),
            Ok(text("It's sunny in Paris.")),
        ]);

        let response = app
            .oneshot(post_ask(r#"{"question":"What's the weather in Paris?"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["answer"], "It's sunny in Paris.");
        assert_eq!(body["tool_used"], true);
    }

    #[tokio::test]
    async fn empty_question_is_bad_request() {
        let response = app(vec![])
            .oneshot(post_ask(r#"{"question":"   "}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert!(body["detail"].as_str().unwrap().contains("empty"));
    }

    #[tokio::test]
    async fn missing_question_is_bad_request() {
        let response = app(vec![]).oneshot(post_ask("{}")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_body_is_client_error() {
        let response = app(vec![]).oneshot(post_ask("{not json")).await.unwrap();
        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn oversized_body_rejected() {
        let question = "a".repeat(BODY_LIMIT_BYTES + 1);
        let body = serde_json::json!({ "question": question }).to_string();
        let response = app(vec![]).oneshot(post_ask(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn provider_failure_is_server_error() {
        let app = app(vec![Err(ProviderError::ApiError {
            status_code: 503,
            message: "overloaded".into(),
        })]);

        let response = app.oneshot(post_ask(r#"{"question":"Rain in Oslo?"}"#)).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert!(body["detail"].as_str().unwrap().contains("overloaded"));
    }

    #[tokio::test(start_paused = true)]
    async fn configured_tool_timeout_bounds_the_tool() {
        let mut config = AppConfig::default();
        config.agent.tool_timeout_secs = 2;

        let provider = ScriptedProvider::new(vec![
            Ok(weather_call("Paris")),
            Ok(text("The weather service is not responding.")),
        ]);
        let registry = weatherwise_tools::registry_with_weather(Arc::new(StalledWeather)).unwrap();
        let handler = question_handler_with_registry(&config, provider.clone(), registry);
        let app = build_router(Arc::new(GatewayState { handler }));

        let started = tokio::time::Instant::now();
        let response = app
            .oneshot(post_ask(r#"{"question":"What's the weather in Paris?"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(started.elapsed() < Duration::from_secs(10));

        let requests = provider.requests();
        let tool_message = requests[1].messages.last().unwrap();
        assert_eq!(
            tool_message.text(),
            Some(r#"{"error":"Tool timed out: get_weather after 2s"}"#)
        );
    }

    /// Collects formatted log output for assertions.
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LogBuffer {
        type Writer = LogBuffer;
        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[tokio::test]
    async fn ask_log_reports_question_size_in_bytes() {
        let logs = LogBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let question = "Météo à Zürich?";
        let body = serde_json::json!({ "question": question }).to_string();
        let response = app(vec![Ok(text("Sunny."))]).oneshot(post_ask(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains(&format!("bytes={}", question.len())), "{output}");
        assert!(!output.contains("chars="));
    }
}
