//! REST API for the load planning service.
//!
//! Exposes the planner over HTTP. Uses Axum as the web framework and
//! supports CORS.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::{
    Router,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
#[allow(unused_imports)]
use serde_json::json;
use std::sync::OnceLock;
use tokio::sync::mpsc;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::ReceiverStream;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};
use utoipa::{OpenApi, ToSchema};

use crate::catalog::{default_cargo, default_containers};
use crate::config::{ApiConfig, OptimizerConfig};
use crate::error::PlanError;
use crate::model::{
    CargoItem, CargoType, ContainerType, PackedContainer, PlacedItem, Priority, Solution,
    UnpackedEntry,
};
use crate::optimizer::{generate_solutions_with_config, generate_solutions_with_progress};
use crate::report::{ContainerUsage, SolutionSummary};

#[derive(Clone)]
struct ApiState {
    optimizer_config: OptimizerConfig,
}

static OPENAPI_DOC: OnceLock<utoipa::openapi::OpenApi> = OnceLock::new();

// SRI hashes verified against https://unpkg.com/swagger-ui-dist@5.17.14/ on 2025-10-29.
const SWAGGER_UI_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
    <head>
        <meta charset="utf-8" />
        <title>load-planner API Docs</title>
        <link
            rel="stylesheet"
            href="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui.css"
            integrity="sha384-wxLW6kwyHktdDGr6Pv1zgm/VGJh99lfUbzSn6HNHBENZlCN7W602k9VkGdxuFvPn"
            crossorigin="anonymous"
        />
    </head>
    <body>
        <div id="swagger-ui"></div>
        <script
            src="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui-bundle.js"
            integrity="sha384-wmyclcVGX/WhUkdkATwhaK1X1JtiNrr2EoYJ+diV3vj4v6OC5yCeSu+yW13SYJep"
            crossorigin="anonymous"
        ></script>
        <script
            src="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui-standalone-preset.js"
            integrity="sha384-2YH8WDRaj7V2OqU/trsmzSagmk/E2SutiCsGkdgoQwC9pNUJV1u/141DHB6jgs8t"
            crossorigin="anonymous"
        ></script>
        <script>
            window.onload = function () {
                const ui = SwaggerUIBundle({
                    url: "/docs/openapi.json",
                    dom_id: "#swagger-ui",
                    presets: [SwaggerUIBundle.presets.apis, SwaggerUIStandalonePreset],
                    layout: "StandaloneLayout",
                });
                window.ui = ui;
            };
        </script>
    </body>
    </html>"##;

fn openapi_doc() -> &'static utoipa::openapi::OpenApi {
    OPENAPI_DOC.get_or_init(ApiDoc::openapi)
}

/// Request structure for the planning endpoints.
#[derive(Deserialize, Clone, ToSchema)]
#[schema(
    example = json!({
        "cargo": [
            {
                "id": "SKU-001",
                "name": "Standard carton",
                "length": 50.0,
                "width": 40.0,
                "height": 30.0,
                "weight": 10.0,
                "quantity": 80,
                "canRotate": true,
                "priority": "Low"
            }
        ],
        "containers": [
            {
                "id": "40GP",
                "name": "40GP (general purpose)",
                "length": 1203.0,
                "width": 235.0,
                "height": 239.0,
                "maxWeight": 28000.0,
                "cost": 4500.0
            }
        ]
    })
)]
pub struct PlanRequest {
    pub cargo: Vec<CargoItem>,
    /// Container catalog; the built-in catalog is used when omitted.
    #[serde(default)]
    #[schema(nullable = true)]
    pub containers: Option<Vec<ContainerType>>,
}

impl PlanRequest {
    fn into_parts(self) -> (Vec<CargoItem>, Vec<ContainerType>) {
        let containers = self.containers.unwrap_or_else(default_containers);
        (self.cargo, containers)
    }
}

/// Response with one solution per strategy.
#[derive(Serialize, ToSchema)]
pub struct PlanResponse {
    pub solutions: Vec<Solution>,
    pub summaries: Vec<SolutionSummary>,
    /// One line per solution that left cargo behind.
    pub warnings: Vec<String>,
}

impl PlanResponse {
    /// Creates a PlanResponse from the planner's solutions.
    pub fn from_solutions(solutions: Vec<Solution>) -> Self {
        let summaries = solutions
            .iter()
            .map(SolutionSummary::from_solution)
            .collect();
        let warnings = solutions.iter().filter_map(unpacked_warning).collect();
        Self {
            solutions,
            summaries,
            warnings,
        }
    }
}

fn unpacked_warning(solution: &Solution) -> Option<String> {
    if solution.is_complete() {
        return None;
    }
    let listing = solution
        .unpacked_items
        .iter()
        .map(|entry| format!("{} x{}", entry.cargo_id, entry.quantity))
        .collect::<Vec<_>>()
        .join(", ");
    Some(format!(
        "{}: {} units could not be loaded ({})",
        solution.id,
        solution
            .unpacked_items
            .iter()
            .map(|entry| entry.quantity)
            .sum::<u32>(),
        listing
    ))
}

/// Default catalogs for clients that start from a sample shipment.
#[derive(Serialize, ToSchema)]
pub struct CatalogResponse {
    pub cargo: Vec<CargoItem>,
    pub containers: Vec<ContainerType>,
}

#[derive(Serialize, ToSchema)]
struct ErrorResponse {
    error: String,
    details: String,
}

impl ErrorResponse {
    fn new(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: details.into(),
        }
    }
}

fn error_response(
    status: StatusCode,
    error: impl Into<String>,
    details: impl Into<String>,
) -> Response {
    (status, Json(ErrorResponse::new(error, details))).into_response()
}

fn json_deserialize_error(err: JsonRejection) -> Response {
    error_response(
        StatusCode::UNPROCESSABLE_ENTITY,
        "Invalid JSON data",
        err.to_string(),
    )
}

fn plan_error(err: PlanError) -> Response {
    let error = match &err {
        PlanError::NoEnabledContainers | PlanError::InvalidContainer { .. } => {
            "Invalid container configuration"
        }
        PlanError::EmptyCargo
        | PlanError::InvalidCargo { .. }
        | PlanError::DuplicateCargoId(_) => "Invalid input data",
    };
    warn!(code = err.code(), details = %err, "Rejected plan request");
    error_response(StatusCode::UNPROCESSABLE_ENTITY, error, err.to_string())
}

fn parse_plan_request(
    payload: Result<Json<PlanRequest>, JsonRejection>,
) -> Result<(Vec<CargoItem>, Vec<ContainerType>), Response> {
    match payload {
        Ok(Json(payload)) => Ok(payload.into_parts()),
        Err(err) => Err(json_deserialize_error(err)),
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(handle_plan, handle_plan_stream, handle_catalog_defaults),
    components(
        schemas(
            PlanRequest,
            PlanResponse,
            CatalogResponse,
            ErrorResponse,
            CargoItem,
            CargoType,
            Priority,
            ContainerType,
            Solution,
            PackedContainer,
            PlacedItem,
            UnpackedEntry,
            SolutionSummary,
            ContainerUsage
        )
    ),
    tags((name = "planning", description = "Endpoints for container load planning"))
)]
struct ApiDoc;

fn router(optimizer_config: OptimizerConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let state = ApiState { optimizer_config };

    Router::new()
        // API endpoints
        .route("/plan", post(handle_plan))
        .route("/plan_stream", post(handle_plan_stream))
        .route("/catalog/defaults", get(handle_catalog_defaults))
        // API documentation
        .route("/docs/openapi.json", get(serve_openapi_json))
        .route("/docs", get(serve_openapi_ui))
        .layer(cors)
        .with_state(state)
}

/// Starts the API server.
///
/// Configures CORS for cross-origin requests from the frontend.
/// Blocks until the server is terminated.
pub async fn start_api_server(config: ApiConfig, optimizer_config: OptimizerConfig) {
    let app = router(optimizer_config);

    let addr = config.socket_addr();
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(%addr, error = %err, "Could not bind API server");
            return;
        }
    };

    info!(
        "Server running on http://{}:{}",
        config.display_host(),
        config.port()
    );
    if config.binds_to_all_interfaces() && config.uses_default_host() {
        info!("Local access: http://localhost:{}", config.port());
    }
    info!("Endpoints: POST /plan, POST /plan_stream, GET /catalog/defaults");
    info!("Documentation: GET /docs, GET /docs/openapi.json");

    if let Err(err) = axum::serve(listener, app).await {
        error!(error = %err, "API server terminated with an error");
    }
}

/// Handler for POST /plan endpoint.
///
/// Runs every strategy on the submitted catalogs and returns one solution
/// per strategy together with report summaries.
#[utoipa::path(
    post,
    path = "/plan",
    request_body = PlanRequest,
    responses(
        (status = 200, description = "Load plans, one per strategy", body = PlanResponse),
        (
            status = UNPROCESSABLE_ENTITY,
            description = "Invalid request or container configuration",
            body = ErrorResponse
        )
    ),
    tag = "planning"
)]
async fn handle_plan(
    State(state): State<ApiState>,
    payload: Result<Json<PlanRequest>, JsonRejection>,
) -> Response {
    let (cargo, containers) = match parse_plan_request(payload) {
        Ok(parts) => parts,
        Err(response) => return response,
    };

    info!(
        skus = cargo.len(),
        container_types = containers.len(),
        "New plan request"
    );
    let config = state.optimizer_config.packing_config();
    let solutions =
        match tokio::task::spawn_blocking(move || {
            generate_solutions_with_config(&cargo, &containers, config)
        })
        .await
        {
            Ok(Ok(solutions)) => solutions,
            Ok(Err(err)) => return plan_error(err),
            Err(err) => {
                error!(error = %err, "Planning task failed");
                return error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Planning failed",
                    err.to_string(),
                );
            }
        };

    let response = PlanResponse::from_solutions(solutions);
    for warning in &response.warnings {
        warn!("{}", warning);
    }
    (StatusCode::OK, Json(response)).into_response()
}

/// Handler for POST /plan_stream endpoint (SSE).
///
/// Streams planning events as Server-Sent Events (text/event-stream). The
/// last event is named `result` and carries the full plan response.
#[utoipa::path(
    post,
    path = "/plan_stream",
    request_body = PlanRequest,
    responses(
        (
            status = 200,
            description = "Streams planning events in real-time",
            content_type = "text/event-stream",
            body = String
        ),
        (
            status = UNPROCESSABLE_ENTITY,
            description = "Invalid request or container configuration",
            body = ErrorResponse
        )
    ),
    tag = "planning"
)]
async fn handle_plan_stream(
    State(state): State<ApiState>,
    payload: Result<Json<PlanRequest>, JsonRejection>,
) -> Response {
    let (cargo, containers) = match parse_plan_request(payload) {
        Ok(parts) => parts,
        Err(response) => return response,
    };

    if let Err(err) = crate::optimizer::validate_inputs(&cargo, &containers) {
        return plan_error(err);
    }

    let (tx, rx) = mpsc::channel::<Event>(32);
    let config = state.optimizer_config.packing_config();

    tokio::task::spawn_blocking(move || {
        let result = generate_solutions_with_progress(&cargo, &containers, config, |evt| {
            if let Ok(json) = serde_json::to_string(evt) {
                // A closed receiver only means the client went away.
                let _ = tx.blocking_send(Event::default().data(json));
            }
        });
        let final_event = match result {
            Ok(solutions) => serde_json::to_string(&PlanResponse::from_solutions(solutions))
                .map(|json| Event::default().event("result").data(json)),
            Err(err) => serde_json::to_string(&ErrorResponse::new(err.code(), err.to_string()))
                .map(|json| Event::default().event("error").data(json)),
        };
        if let Ok(event) = final_event {
            let _ = tx.blocking_send(event);
        }
    });

    let stream = ReceiverStream::new(rx).map(Ok::<_, std::convert::Infallible>);
    Sse::new(stream)
        .keep_alive(
            KeepAlive::new()
                .interval(std::time::Duration::from_secs(10))
                .text("keep-alive"),
        )
        .into_response()
}

/// Handler for GET /catalog/defaults endpoint.
#[utoipa::path(
    get,
    path = "/catalog/defaults",
    responses(
        (status = 200, description = "Sample cargo and the standard container catalog", body = CatalogResponse)
    ),
    tag = "planning"
)]
async fn handle_catalog_defaults() -> Json<CatalogResponse> {
    Json(CatalogResponse {
        cargo: default_cargo(),
        containers: default_containers(),
    })
}

async fn serve_openapi_json(State(_state): State<ApiState>) -> impl IntoResponse {
    Json(openapi_doc())
}

async fn serve_openapi_ui(State(_state): State<ApiState>) -> impl IntoResponse {
    Html(SWAGGER_UI_HTML)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    fn state() -> ApiState {
        ApiState {
            optimizer_config: OptimizerConfig::default(),
        }
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Body should be readable");
        serde_json::from_slice(&bytes).expect("Body should be JSON")
    }

    fn request(json: &str) -> PlanRequest {
        serde_json::from_str(json).expect("Should parse valid JSON")
    }

    const SMALL_REQUEST: &str = r#"{
        "cargo": [
            {"id": "A", "length": 10.0, "width": 10.0, "height": 10.0, "weight": 1.0, "quantity": 2}
        ],
        "containers": [
            {"id": "BOX", "name": "Box", "length": 100.0, "width": 100.0, "height": 100.0,
             "maxWeight": 1000.0, "cost": 10.0}
        ]
    }"#;

    #[test]
    fn openapi_doc_lists_expected_paths() {
        let doc = openapi_doc();
        let paths = &doc.paths.paths;
        for path in ["/plan", "/plan_stream", "/catalog/defaults"] {
            assert!(
                paths.contains_key(path),
                "OpenAPI documentation is missing the {} path",
                path
            );
        }
    }

    #[test]
    fn openapi_doc_contains_key_schemas() {
        let doc = openapi_doc();
        let components = doc
            .components
            .as_ref()
            .expect("OpenAPI documentation contains no components");
        let schemas = &components.schemas;
        for name in ["PlanRequest", "PlanResponse", "ErrorResponse", "Solution"] {
            assert!(
                schemas.contains_key(name),
                "Expected schema '{}' is missing from the OpenAPI document",
                name
            );
        }
    }

    #[test]
    fn plan_request_applies_cargo_defaults() {
        let parsed = request(SMALL_REQUEST);
        let item = &parsed.cargo[0];
        assert!(!item.can_rotate);
        assert_eq!(item.priority, Priority::Medium);
        assert_eq!(item.cargo_type, CargoType::Carton);
        assert!(parsed.containers.as_ref().is_some_and(|c| c[0].enabled));
    }

    #[test]
    fn plan_request_without_containers_uses_default_catalog() {
        let parsed = request(r#"{"cargo": []}"#);
        let (_, containers) = parsed.into_parts();
        let ids: Vec<&str> = containers.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["20GP", "40GP", "40HQ"]);
    }

    #[tokio::test]
    async fn plan_returns_one_solution_per_strategy() {
        let response = handle_plan(State(state()), Ok(Json(request(SMALL_REQUEST)))).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        let solutions = body["solutions"].as_array().expect("solutions array");
        assert_eq!(solutions.len(), 2);
        assert_eq!(solutions[0]["id"], "COST_SAVER");
        assert_eq!(solutions[1]["id"], "OPERATION_EFFICIENCY");
        assert_eq!(solutions[0]["containers"][0]["containerId"], "CN-0001");
        assert_eq!(body["summaries"].as_array().map(Vec::len), Some(2));
        assert_eq!(body["warnings"].as_array().map(Vec::len), Some(0));
    }

    #[tokio::test]
    async fn plan_reports_unloadable_cargo_as_warning() {
        let json = r#"{
            "cargo": [
                {"id": "HUGE", "length": 500.0, "width": 10.0, "height": 10.0, "weight": 1.0, "quantity": 3}
            ],
            "containers": [
                {"id": "BOX", "name": "Box", "length": 100.0, "width": 100.0, "height": 100.0,
                 "maxWeight": 1000.0, "cost": 10.0}
            ]
        }"#;
        let response = handle_plan(State(state()), Ok(Json(request(json)))).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["solutions"][0]["unpackedItems"][0]["quantity"], 3);
        let warnings = body["warnings"].as_array().expect("warnings array");
        assert_eq!(warnings.len(), 2);
        assert!(
            warnings[0]
                .as_str()
                .is_some_and(|w| w.contains("HUGE x3"))
        );
    }

    #[tokio::test]
    async fn plan_rejects_empty_cargo() {
        let payload = request(
            r#"{"cargo": [], "containers": [
                {"id": "BOX", "name": "Box", "length": 1.0, "width": 1.0, "height": 1.0,
                 "maxWeight": 1.0, "cost": 1.0}
            ]}"#,
        );
        let response = handle_plan(State(state()), Ok(Json(payload))).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Invalid input data");
        assert_eq!(body["details"], "Cargo list is empty");
    }

    #[tokio::test]
    async fn plan_rejects_all_disabled_containers() {
        let payload = request(
            r#"{"cargo": [
                {"id": "A", "length": 1.0, "width": 1.0, "height": 1.0, "weight": 1.0, "quantity": 1}
            ], "containers": [
                {"id": "BOX", "name": "Box", "length": 1.0, "width": 1.0, "height": 1.0,
                 "maxWeight": 1.0, "cost": 1.0, "enabled": false}
            ]}"#,
        );
        let response = handle_plan(State(state()), Ok(Json(payload))).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Invalid container configuration");
    }

    #[tokio::test]
    async fn plan_stream_validates_before_streaming() {
        let payload = request(r#"{"cargo": []}"#);
        let response = handle_plan_stream(State(state()), Ok(Json(payload))).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn plan_stream_ends_with_result_event() {
        crate::logging::init_test();
        let response = handle_plan_stream(State(state()), Ok(Json(request(SMALL_REQUEST)))).await;
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Stream should complete");
        let text = String::from_utf8(bytes.to_vec()).expect("SSE is UTF-8");
        assert!(text.contains("\"type\":\"StrategyStarted\""));
        assert!(text.contains("\"type\":\"ItemPlaced\""));
        assert!(text.contains("event: result"));
    }

    #[tokio::test]
    async fn catalog_defaults_lists_sample_data() {
        let Json(catalog) = handle_catalog_defaults().await;
        assert_eq!(catalog.cargo.len(), 4);
        assert_eq!(catalog.containers.len(), 3);
    }
}
