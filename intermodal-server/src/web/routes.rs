//! HTTP route handlers.

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::de::DeserializeOwned;
use tracing::{error, warn};

use crate::domain::ModeSet;
use crate::graph::GraphError;
use crate::network::NetworkStats;
use crate::planner::{PlanError, RefineError, SearchError, SearchRequest};
use crate::provider::ItineraryProvider;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router<P: ItineraryProvider + 'static>(state: AppState<P>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/network/stats", get(network_stats::<P>))
        .route("/network/expand", post(expand_network::<P>))
        .route("/journey/plan", post(plan_journey::<P>))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Current network size.
async fn network_stats<P: ItineraryProvider + 'static>(
    State(state): State<AppState<P>>,
) -> Json<NetworkStats> {
    Json(state.planner.network().snapshot().await.stats())
}

/// Query the route planner for the given pairs and grow the network.
async fn expand_network<P: ItineraryProvider + 'static>(
    State(state): State<AppState<P>>,
    body: Bytes,
) -> Result<Json<ExpandNetworkResponse>, AppError> {
    let req: ExpandNetworkRequest = parse_body(&body)?;
    let modes = parse_modes(req.modes.as_deref())
        .map_err(|e| AppError::BadRequest {
            message: e.to_string(),
        })?
        .unwrap_or_else(ModeSet::all);

    let summary = state.planner.expand(&req.pairs, modes).await;
    let stats = state.planner.network().snapshot().await.stats();

    Ok(Json(ExpandNetworkResponse::new(summary, stats)))
}

/// Plan a journey.
async fn plan_journey<P: ItineraryProvider + 'static>(
    State(state): State<AppState<P>>,
    body: Bytes,
) -> Result<Json<PlanJourneyResponse>, AppError> {
    let req: PlanJourneyRequest = parse_body(&body)?;
    let modes = parse_modes(req.modes.as_deref()).map_err(|e| AppError::BadRequest {
        message: e.to_string(),
    })?;

    let mut request = SearchRequest::new(req.origin, req.destination);
    if let Some(modes) = modes {
        request = request.with_modes(modes);
    }

    let journey = state
        .planner
        .plan(&request)
        .await?
        .ok_or_else(|| AppError::NotFound {
            message: "no route found".to_string(),
        })?;

    Ok(Json(PlanJourneyResponse::from_journey(journey)))
}

/// Parse JSON manually so invalid input maps to 400 and the body is logged.
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| {
        warn!(error = %e, body = %String::from_utf8_lossy(body), "Rejected request body");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    BadGateway { message: String },
    Internal { message: String },
}

impl From<SearchError> for AppError {
    fn from(e: SearchError) -> Self {
        match e {
            SearchError::InvalidRequest(msg) => AppError::BadRequest { message: msg },
            _ => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl From<GraphError> for AppError {
    fn from(e: GraphError) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl From<PlanError> for AppError {
    fn from(e: PlanError) -> Self {
        match e {
            PlanError::Search(e) => e.into(),
            PlanError::Refine(e @ RefineError::RefinementGap { .. }) => AppError::BadGateway {
                message: e.to_string(),
            },
            PlanError::Refine(RefineError::Graph(e)) => e.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::BadGateway { message } => (StatusCode::BAD_GATEWAY, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "Request failed");
        } else {
            warn!(%status, %message, "Request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
