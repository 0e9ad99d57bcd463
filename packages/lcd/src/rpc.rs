//! RPC / HTTP surface (§6 "Exposed (RPC)"): the distillation's "out of
//! scope: the RPC transport" excludes only the wire transport, not the
//! service boundary above it. Grounded on the teacher's `network::handlers`
//! + `AppState` pattern: a thin axum router that deserializes, calls the
//! LCD core, serializes the result. All actual semantics live in
//! [`crate::directory`].

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use lcd_core::{DiscoveryEntry, DiscoveryQos};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::directory::LocalCapabilitiesDirectory;
use crate::error::{AddError, LookupError, RemoveError};
use crate::shutdown::{HealthState, ShutdownController};

/// Shared state handed to every handler: the directory and the shutdown
/// controller, teacher's `AppState` convention.
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<LocalCapabilitiesDirectory>,
    pub shutdown: Arc<ShutdownController>,
}

/// Assembles the discovery RPC + health router (§6 "Exposed (RPC)").
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/discovery/providers", post(add_handler).get(lookup_by_domain_interface_handler))
        .route("/discovery/providers/all", post(add_to_all_handler))
        .route("/discovery/providers/{participant_id}", delete(remove_handler))
        .route(
            "/discovery/providers/by-participant/{participant_id}",
            get(lookup_by_participant_id_handler),
        )
        .route("/discovery/maintenance/reregister", post(reregister_handler))
        .route("/discovery/maintenance/remove-stale", post(remove_stale_handler))
        .route("/healthz", get(health_handler))
        .route("/livez", get(liveness_handler))
        .route("/readyz", get(readiness_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct AddRequest {
    pub entry: DiscoveryEntry,
    #[serde(default = "default_true")]
    pub await_global_registration: bool,
    #[serde(default)]
    pub gbids: Vec<String>,
    #[serde(default = "default_user")]
    pub user_id: String,
}

fn default_true() -> bool {
    true
}

fn default_user() -> String {
    "anonymous".to_string()
}

#[derive(Debug, Deserialize)]
pub struct AddToAllRequest {
    pub entry: DiscoveryEntry,
    #[serde(default = "default_user")]
    pub user_id: String,
}

async fn add_handler(
    State(state): State<AppState>,
    Json(req): Json<AddRequest>,
) -> Result<StatusCode, ApiError> {
    let _guard = state.shutdown.in_flight_guard();
    state
        .directory
        .add(req.entry, req.await_global_registration, &req.gbids, &req.user_id)
        .await
        .map_err(ApiError::Add)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn add_to_all_handler(
    State(state): State<AppState>,
    Json(req): Json<AddToAllRequest>,
) -> Result<StatusCode, ApiError> {
    let _guard = state.shutdown.in_flight_guard();
    state
        .directory
        .add_to_all(req.entry, &req.user_id)
        .await
        .map_err(ApiError::Add)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn remove_handler(
    State(state): State<AppState>,
    Path(participant_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let _guard = state.shutdown.in_flight_guard();
    state.directory.remove(&participant_id).await.map_err(ApiError::Remove)?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct LookupByParticipantQuery {
    #[serde(default)]
    pub discovery_qos: Option<String>,
    #[serde(default)]
    pub gbids: Option<String>,
}

async fn lookup_by_participant_id_handler(
    State(state): State<AppState>,
    Path(participant_id): Path<String>,
    Query(query): Query<LookupByParticipantQuery>,
) -> Result<Response, ApiError> {
    let _guard = state.shutdown.in_flight_guard();
    let qos = parse_qos(query.discovery_qos.as_deref())?;
    let gbids = parse_gbids(query.gbids.as_deref());

    let result = state
        .directory
        .lookup_by_participant_id(&participant_id, &qos, &gbids)
        .await
        .map_err(ApiError::Lookup)?;
    Ok(Json(result).into_response())
}

#[derive(Debug, Deserialize)]
pub struct LookupByDomainQuery {
    pub domains: String,
    pub interface_name: String,
    #[serde(default)]
    pub discovery_qos: Option<String>,
    #[serde(default)]
    pub gbids: Option<String>,
}

async fn lookup_by_domain_interface_handler(
    State(state): State<AppState>,
    Query(query): Query<LookupByDomainQuery>,
) -> Result<Response, ApiError> {
    let _guard = state.shutdown.in_flight_guard();
    let domains: Vec<String> = query.domains.split(',').map(str::to_string).filter(|s| !s.is_empty()).collect();
    let qos = parse_qos(query.discovery_qos.as_deref())?;
    let gbids = parse_gbids(query.gbids.as_deref());

    let results = state
        .directory
        .lookup_by_domain_interface(&domains, &query.interface_name, &qos, &gbids)
        .await
        .map_err(ApiError::Lookup)?;
    Ok(Json(results).into_response())
}

#[derive(Debug, Deserialize)]
pub struct RemoveStaleRequest {
    pub max_last_seen_ms: i64,
}

async fn reregister_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    let _guard = state.shutdown.in_flight_guard();
    let count = state.directory.trigger_global_provider_reregistration().await;
    Json(json!({ "reregistered": count }))
}

async fn remove_stale_handler(
    State(state): State<AppState>,
    Json(req): Json<RemoveStaleRequest>,
) -> StatusCode {
    let _guard = state.shutdown.in_flight_guard();
    state.directory.remove_stale_providers_of_cluster_controller(req.max_last_seen_ms).await;
    StatusCode::NO_CONTENT
}

async fn health_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    let health = state.shutdown.health_state();
    Json(json!({
        "state": health.as_str(),
        "local_entries": state.directory.store().local_len(),
        "global_entries": state.directory.store().global_len(),
        "in_flight": state.shutdown.in_flight_count(),
    }))
}

async fn liveness_handler() -> StatusCode {
    StatusCode::OK
}

async fn readiness_handler(State(state): State<AppState>) -> StatusCode {
    if state.shutdown.health_state() == HealthState::Ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

fn parse_qos(raw: Option<&str>) -> Result<DiscoveryQos, ApiError> {
    match raw {
        Some(raw) => serde_json::from_str(raw).map_err(|e| ApiError::BadRequest(e.to_string())),
        None => Ok(DiscoveryQos::default()),
    }
}

fn parse_gbids(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| s.split(',').map(str::to_string).filter(|s| !s.is_empty()).collect())
        .unwrap_or_default()
}

/// Maps core error types onto HTTP status codes + a JSON body, teacher's
/// `ApiError` convention of one enum per RPC surface.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

enum ApiError {
    Add(AddError),
    Remove(RemoveError),
    Lookup(LookupError),
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Add(AddError::Permission(e)) => (StatusCode::FORBIDDEN, e.to_string()),
            ApiError::Add(AddError::Discovery(e)) => (discovery_status(e), e.to_string()),
            ApiError::Remove(RemoveError::Discovery(e)) => (discovery_status(e), e.to_string()),
            ApiError::Lookup(LookupError::Permission(e)) => (StatusCode::BAD_REQUEST, e.to_string()),
            ApiError::Lookup(LookupError::Discovery(e)) => (discovery_status(e), e.to_string()),
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

fn discovery_status(err: lcd_core::DiscoveryError) -> StatusCode {
    use lcd_core::DiscoveryError;
    match err {
        DiscoveryError::InvalidGbid | DiscoveryError::UnknownGbid => StatusCode::BAD_REQUEST,
        DiscoveryError::NoEntryForParticipant | DiscoveryError::NoEntryForSelectedBackends => StatusCode::NOT_FOUND,
        DiscoveryError::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use lcd_core::SystemClock;
    use tower::ServiceExt;

    use crate::access::AllowAllAccessController;
    use crate::config::LcdConfig;
    use crate::gcd::{GcdClient, InMemoryGcdClient};
    use crate::persistence::NullPersistence;
    use crate::router::{MessageRouter, RecordingMessageRouter};

    fn test_state() -> AppState {
        let config = LcdConfig {
            known_gbids: vec!["G1".to_string()],
            ..LcdConfig::default()
        };
        let directory = Arc::new(LocalCapabilitiesDirectory::new(
            Arc::new(InMemoryGcdClient::new()) as Arc<dyn GcdClient>,
            Arc::new(RecordingMessageRouter::new()) as Arc<dyn MessageRouter>,
            Arc::new(AllowAllAccessController),
            Arc::new(NullPersistence),
            Arc::new(SystemClock) as Arc<dyn lcd_core::ClockSource>,
            config,
        ));
        let shutdown = Arc::new(ShutdownController::new());
        shutdown.set_ready();
        AppState { directory, shutdown }
    }

    fn sample_entry_json(pid: &str) -> serde_json::Value {
        json!({
            "participant_id": pid,
            "provider_version": {"major": 1, "minor": 0},
            "domain": "d",
            "interface_name": "I",
            "qos": {
                "scope": "LOCAL",
                "priority": 0,
                "custom_parameters": [],
                "supports_on_change_subscriptions": false
            },
            "last_seen_date_ms": 0,
            "expiry_date_ms": 10_000,
            "public_key_id": ""
        })
    }

    #[tokio::test]
    async fn add_then_lookup_by_participant_round_trips() {
        let state = test_state();
        let router = build_router(state);

        let add_body = json!({ "entry": sample_entry_json("p1") });
        let resp = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/discovery/providers")
                    .header("content-type", "application/json")
                    .body(Body::from(add_body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let resp = router
            .oneshot(
                Request::builder()
                    .uri("/discovery/providers/by-participant/p1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn remove_nonexistent_participant_still_returns_no_content() {
        let state = test_state();
        let router = build_router(state);

        let resp = router
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/discovery/providers/ghost")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn health_endpoints_report_ready() {
        let state = test_state();
        let router = build_router(state);

        let resp = router
            .clone()
            .oneshot(Request::builder().uri("/readyz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = router
            .oneshot(Request::builder().uri("/livez").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn lookup_with_empty_domains_is_bad_request() {
        let state = test_state();
        let router = build_router(state);

        let resp = router
            .oneshot(
                Request::builder()
                    .uri("/discovery/providers?domains=&interface_name=I")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
