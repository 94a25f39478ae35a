use crate::bot::responder::TeloxideResponder;
use crate::bot::router::{Ack, UpdateRouter};
use crate::bot::update::{IncomingUpdate, RawUpdate};
use crate::bot::webhook::WebhookRegistrar;
use crate::config::BotSettings;
use anyhow::Context;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;
use study_agent_core::tutor::TutorClient;
use tracing::{debug, error, info, warn};

/// Everything a configured webhook needs to serve requests
pub struct BotRuntime {
    router: UpdateRouter,
    registrar: WebhookRegistrar,
}

impl BotRuntime {
    /// Assemble a runtime from its parts
    #[must_use]
    pub fn new(router: UpdateRouter, registrar: WebhookRegistrar) -> Self {
        Self { router, registrar }
    }

    /// Build the production runtime, or `None` when a required key is missing.
    #[must_use]
    pub fn from_settings(settings: &BotSettings) -> Option<Self> {
        let missing = settings.missing_keys();
        if !missing.is_empty() {
            warn!(?missing, "Required keys missing, requests will be answered with 500");
            return None;
        }

        let token = settings.telegram.token()?;
        let tutor = match TutorClient::new(&settings.tutor) {
            Ok(tutor) => tutor,
            Err(e) => {
                error!(error = %e, "Failed to initialize tutor client");
                return None;
            }
        };
        info!(model = %tutor.model_id(), "Tutor client initialized.");

        let telegram = &settings.telegram;
        let responder = TeloxideResponder::new(token, &telegram.telegram_api_url);
        let router = UpdateRouter::new(
            Arc::new(tutor),
            Arc::new(responder),
            telegram.mention_tag(),
        );
        let registrar = WebhookRegistrar::new(
            token,
            &telegram.telegram_api_url,
            &normalize_path(&telegram.webhook_path),
        );

        Some(Self::new(router, registrar))
    }
}

/// Shared state of the HTTP handlers
#[derive(Clone)]
pub struct AppState {
    runtime: Option<Arc<BotRuntime>>,
}

impl AppState {
    /// State for a fully configured bot
    #[must_use]
    pub fn new(runtime: BotRuntime) -> Self {
        Self {
            runtime: Some(Arc::new(runtime)),
        }
    }

    /// State that answers every request with the missing-keys error
    #[must_use]
    pub const fn unconfigured() -> Self {
        Self { runtime: None }
    }

    /// State built from settings
    #[must_use]
    pub fn from_settings(settings: &BotSettings) -> Self {
        Self {
            runtime: BotRuntime::from_settings(settings).map(Arc::new),
        }
    }
}

fn normalize_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

fn missing_keys_response() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"error": "Missing Keys"})),
    )
        .into_response()
}

async fn handle_get(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let Some(runtime) = state.runtime else {
        return missing_keys_response();
    };

    let host = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    match runtime.registrar.register(host).await {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(e) => {
            error!(error = %e, "Webhook setup failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Setup failed", "details": e.to_string()})),
            )
                .into_response()
        }
    }
}

async fn handle_post(
    State(state): State<AppState>,
    body: Result<Json<RawUpdate>, JsonRejection>,
) -> Response {
    let Some(runtime) = state.runtime else {
        return missing_keys_response();
    };

    let ack = match body {
        Ok(Json(raw)) => {
            let update = IncomingUpdate::from(raw);
            debug!(?update, "Incoming update");
            runtime.router.route(update).await
        }
        Err(rejection) => {
            debug!(reason = %rejection, "Unreadable webhook body");
            Ack::NoBody
        }
    };

    (StatusCode::OK, ack.as_str()).into_response()
}

async fn handle_other(State(state): State<AppState>) -> Response {
    if state.runtime.is_none() {
        return missing_keys_response();
    }
    (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed").into_response()
}

/// Build the HTTP app serving the webhook at `path`.
pub fn build_app(state: AppState, path: &str) -> Router {
    Router::new()
        .route(
            &normalize_path(path),
            get(handle_get).post(handle_post).fallback(handle_other),
        )
        .with_state(state)
}

/// Run the webhook HTTP server until Ctrl+C.
///
/// # Errors
///
/// Returns an error if the listen address cannot be bound or the server fails.
pub async fn run_webhook(settings: Arc<BotSettings>) -> anyhow::Result<()> {
    let state = AppState::from_settings(&settings);
    let app = build_app(state, &settings.telegram.webhook_path);

    let listener = tokio::net::TcpListener::bind(&settings.telegram.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", settings.telegram.listen_addr))?;

    info!(
        addr = %listener.local_addr()?,
        path = %normalize_path(&settings.telegram.webhook_path),
        "Webhook server is running..."
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Webhook server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        // Keep serving; the process can still be killed
        std::future::pending::<()>().await;
    }
}
