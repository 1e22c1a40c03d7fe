use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use crate::{
    analysis::AnalysisEngine,
    chains::ChainClient,
    models::{PersonaError, WalletReport},
    storage::AnalysisStore,
};

/// Shared application state.
pub struct AppState {
    pub engine: AnalysisEngine,
    pub store: Arc<dyn AnalysisStore>,
    pub chain: Arc<dyn ChainClient>,
    pub narrative_configured: bool,
    pub version: String,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub wallet_address: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
    database: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    apis: Option<ApiHealth>,
    timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<String>,
}

#[derive(Serialize)]
struct ApiHealth {
    etherscan: &'static str,
    gemini: &'static str,
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/analyze", post(analyze))
        .route("/health", get(health))
        .layer(cors)
        .with_state(state)
}

pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> anyhow::Result<()> {
    let app = router(state);
    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// POST /analyze: run or replay the persona analysis for one wallet.
async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalyzeRequest>,
) -> Response {
    match state.engine.analyze(&request.wallet_address).await {
        Ok(report) => (StatusCode::OK, Json::<WalletReport>(report)).into_response(),
        Err(e) => error_response(e),
    }
}

fn error_response(e: PersonaError) -> Response {
    match e {
        PersonaError::InvalidAddress(_) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                error: "Invalid wallet address format".to_string(),
            }),
        )
            .into_response(),
        PersonaError::NoFootprint(_) => (
            StatusCode::NOT_FOUND,
            Json(ErrorBody {
                error: "No on-chain footprint found for this wallet".to_string(),
            }),
        )
            .into_response(),
        other => {
            // Internal detail stays in the logs, not the response.
            error!("Analysis failed: {}", other);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    error: "Failed to analyze wallet. Please try again.".to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// GET /health: storage connectivity plus external credential status.
async fn health(State(state): State<Arc<AppState>>) -> Response {
    if let Err(e) = state.store.ping().await {
        error!("Database health check failed: {}", e);
        let body = HealthBody {
            status: "unhealthy",
            database: "error",
            apis: None,
            timestamp: Utc::now().to_rfc3339(),
            version: None,
        };
        return (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response();
    }

    let etherscan = if state.chain.is_configured() {
        match state.chain.probe().await {
            Ok(()) => "healthy",
            Err(_) => "error",
        }
    } else {
        "not_configured"
    };

    let gemini = if state.narrative_configured {
        "configured"
    } else {
        "not_configured"
    };

    let body = HealthBody {
        status: "healthy",
        database: "connected",
        apis: Some(ApiHealth { etherscan, gemini }),
        timestamp: Utc::now().to_rfc3339(),
        version: Some(state.version.clone()),
    };

    (StatusCode::OK, Json(body)).into_response()
}
