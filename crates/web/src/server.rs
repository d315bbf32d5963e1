//! Web server implementation

use crate::config::WebConfig;
use crate::static_files::{self, StaticFiles};
use axum::{
    extract::{rejection::JsonRejection, Path, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use calcweb_common::{format_number, FailureBody, HealthBody, Operation, OperandsPayload, SuccessBody};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Web server state
#[derive(Clone)]
pub struct WebServer {
    state: Arc<WebServerState>,
}

struct WebServerState {
    /// Static file handler
    static_files: StaticFiles,

    cfg: WebConfig,
}

pub async fn serve(cfg: WebConfig) -> anyhow::Result<()> {
    WebServer::new(cfg).serve().await
}

impl WebServer {
    /// Create a new web server
    pub fn new(cfg: WebConfig) -> Self {
        Self {
            state: Arc::new(WebServerState {
                static_files: StaticFiles::new(),
                cfg,
            }),
        }
    }

    pub fn config(&self) -> &WebConfig {
        &self.state.cfg
    }

    /// Create router
    pub fn router(&self) -> Router {
        let mut router = Router::new()
            .route("/", get(index_handler))
            .route("/static/:path", get(static_handler))
            .route("/health", get(health_handler));

        for op in Operation::ALL {
            router = router.route(
                &op.path(),
                post(move |payload: Result<Json<OperandsPayload>, JsonRejection>| {
                    operation_handler(op, payload)
                }),
            );
        }

        router
            .fallback(not_found_handler)
            .layer(middleware::from_fn(log_requests))
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Bind the configured address and serve until the process stops
    pub async fn serve(self) -> anyhow::Result<()> {
        let listener = TcpListener::bind(self.state.cfg.addr).await?;
        self.serve_on(listener).await
    }

    /// Serve on an already bound listener
    pub async fn serve_on(self, listener: TcpListener) -> anyhow::Result<()> {
        info!("calcweb listening on http://{}", listener.local_addr()?);
        axum::serve(listener, self.router()).await?;
        Ok(())
    }
}

impl Default for WebServer {
    fn default() -> Self {
        Self::new(WebConfig::default())
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Failures reported to the page as `{"detail": ..}`
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Operation(#[from] calcweb_common::Error),

    #[error("{0}")]
    InvalidBody(String),

    #[error("Not Found")]
    NotFound,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Operation(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Operation(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::InvalidBody(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(FailureBody::new(self.to_string()))).into_response()
    }
}

// ============================================================================
// Middleware
// ============================================================================

/// Log every request as `METHOD path -> status in N.NNms`
async fn log_requests(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(req).await;

    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
    info!(
        "{} {} -> {} in {:.2}ms",
        method,
        path,
        response.status().as_u16(),
        elapsed_ms
    );
    response
}

// ============================================================================
// Handlers
// ============================================================================

async fn index_handler() -> Response {
    static_files::serve_index()
}

async fn static_handler(
    State(state): State<Arc<WebServerState>>,
    Path(path): Path<String>,
) -> Result<Response, ApiError> {
    state.static_files.serve(&path)
}

async fn health_handler() -> Json<HealthBody> {
    Json(HealthBody::ok())
}

async fn operation_handler(
    op: Operation,
    payload: Result<Json<OperandsPayload>, JsonRejection>,
) -> Result<Json<SuccessBody>, ApiError> {
    let Json(payload) = payload?;
    let (a, b) = payload.operands().inspect_err(|e| {
        warn!("{} rejected operands {:?}, {:?}: {}", op.label(), payload.a, payload.b, e);
    })?;

    match op.apply(a, b) {
        Ok(result) => {
            info!(
                "{}: {} {} {} = {}",
                op.label(),
                format_number(a),
                op.symbol(),
                format_number(b),
                format_number(result)
            );
            Ok(Json(SuccessBody { result }))
        }
        Err(calcweb_common::Error::DivisionByZero) => {
            warn!("Divide by zero: a={} b={}", format_number(a), format_number(b));
            Err(calcweb_common::Error::DivisionByZero.into())
        }
        Err(e) => {
            warn!("{} failed: {}", op.label(), e);
            Err(e.into())
        }
    }
}

async fn not_found_handler() -> ApiError {
    ApiError::NotFound
}
