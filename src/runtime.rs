// src/runtime.rs

//! HTTP listener.
//!
//! Routes:
//! - `GET /health`  → fixed health payload (GET only; HEAD is a 404)
//! - `POST /execute` → assemble body, dispatch, encode
//! - anything else  → `404 {"error":"Route not found"}`
//!
//! `/execute` always answers 200; failures travel as `success: false`.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    body::Body,
    extract::State,
    http::{header, Method, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use futures::StreamExt;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::Span;

use crate::{
    config::Config,
    engine::{encode, AssembledBody, BodyAssembler, Dispatcher, ExecutorError},
    execution_id::ExecutionId,
    sinks::TracingEventSink,
};

/// Shared, read-only per-process state. Each request builds its own
/// assembler, result and sink from it.
#[derive(Debug, Clone)]
pub struct AppState {
    dispatcher: Arc<Dispatcher>,
    max_body_bytes: usize,
}

impl AppState {
    pub fn new(dispatcher: Dispatcher, max_body_bytes: usize) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            max_body_bytes,
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(Dispatcher::from_config(cfg), cfg.limits.max_body_bytes)
    }
}

/* ---------------- server ---------------- */

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health).fallback(not_found))
        .route("/execute", post(execute).fallback(not_found))
        .fallback(not_found)
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &Request<Body>| {
                    tracing::info_span!(
                        "http_request",
                        method = %req.method(),
                        path = %req.uri().path(),
                    )
                })
                .on_response(|res: &Response, latency: Duration, _span: &Span| {
                    tracing::info!(
                        status = res.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "request completed"
                    );
                }),
        )
}

/// Bind the configured address and serve until Ctrl-C.
///
/// A bind failure is returned to the caller and ends the process.
pub async fn serve(cfg: &Config) -> anyhow::Result<()> {
    let socket: SocketAddr = cfg.socket_addr()?;
    let listener = TcpListener::bind(socket).await?;

    tracing::info!("system executor listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(AppState::from_config(cfg)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("system executor stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

/* ---------------- endpoints ---------------- */

async fn health(method: Method) -> Response {
    // axum answers HEAD with the GET handler; only GET is a health check here.
    if method != Method::GET {
        return not_found().await.into_response();
    }
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "healthy",
            "service": "system_executor",
        })),
    )
        .into_response()
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "error": "Route not found",
        })),
    )
}

async fn execute(State(state): State<AppState>, body: Body) -> Response {
    let execution_id = ExecutionId::new();
    let mut sink = TracingEventSink::new();

    let result = match assemble(body, state.max_body_bytes).await {
        Ok(assembled) => {
            state
                .dispatcher
                .dispatch_body(assembled, &execution_id, &mut sink)
                .await
        }
        Err(err) => state
            .dispatcher
            .reject_unread(err, &execution_id, &mut sink),
    };

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        encode(&result),
    )
        .into_response()
}

/// Drain the body stream into a fresh assembler.
async fn assemble(body: Body, capacity: usize) -> Result<AssembledBody, ExecutorError> {
    let mut assembler = BodyAssembler::new(capacity);
    let mut frames = body.into_data_stream();

    while let Some(frame) = frames.next().await {
        let chunk = frame.map_err(|err| ExecutorError::BodyRead(err.to_string()))?;
        // Empty frames are transport noise; only end-of-stream completes the body.
        if !chunk.is_empty() {
            assembler.push(&chunk);
        }
    }

    assembler.push(&[]);
    assembler
        .into_body()
        .ok_or_else(|| ExecutorError::BodyRead("body did not complete".to_string()))
}
