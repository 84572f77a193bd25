use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use tracing::{error, info};

use crate::config::{AppConfig, COMPETITORS, RECIPIENTS, SIMILARITY_THRESHOLD};
use crate::digest::prelude::{collect_digest, NewsFetcher};
use crate::sender::{digest_subject, format_digest};

pub struct AppState {
    pub config: AppConfig,
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(run_digest).post(run_digest))
        .with_state(Arc::new(state))
}

/// Run the whole pipeline for one trigger. GET and POST behave the same and
/// the request body is ignored. A delivery failure stops the remaining
/// recipient sends and fails the trigger.
async fn run_digest(State(state): State<Arc<AppState>>) -> Result<&'static str, StatusCode> {
    let fetcher = NewsFetcher::new();
    let digest = collect_digest(&fetcher, COMPETITORS, SIMILARITY_THRESHOLD).await;
    info!(articles = digest.len(), "digest assembled");

    let subject = digest_subject();
    let body = format_digest(&digest);
    let sender = state.config.get_sender();

    for recipient in RECIPIENTS {
        if let Err(e) = sender.send_digest(recipient, &subject, &body).await {
            error!(%recipient, error = %e, "digest delivery failed");
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    Ok("OK")
}
