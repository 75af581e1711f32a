use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use tracing::{error, info};

use crate::assets::AssetStore;
use crate::catalog::SpriteSource;
use crate::params::BattleParams;
use crate::scene::SceneBuilder;

/// Shared, read-only collaborators for request handling.
pub struct AppState {
    pub assets: AssetStore,
    pub source: Box<dyn SpriteSource + Send + Sync>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new().route("/battle", get(battle)).with_state(state)
}

async fn battle(State(state): State<Arc<AppState>>, Query(params): Query<BattleParams>) -> Response {
    // Reject before any catalog I/O and before entering the blocking pool.
    if params.require_identifiers().is_err() {
        return (
            StatusCode::BAD_REQUEST,
            "Please provide both pokemon1 and pokemon2 parameters.",
        )
            .into_response();
    }

    // The render is synchronous (blocking catalog fetches, pixel work).
    let result = tokio::task::spawn_blocking(move || {
        SceneBuilder::new(&state.assets, state.source.as_ref()).render(&params)
    })
    .await;

    match result {
        Ok(Ok(png)) => ([(header::CONTENT_TYPE, "image/png")], png).into_response(),
        Ok(Err(e)) if e.is_client_error() => {
            info!(error = %e, "render rejected");
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
        Ok(Err(e)) => {
            error!(error = %e, "render failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to render battle scene").into_response()
        }
        Err(e) => {
            error!(error = %e, "render task panicked");
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to render battle scene").into_response()
        }
    }
}

pub async fn serve(state: Arc<AppState>, bind: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    Ok(())
}
