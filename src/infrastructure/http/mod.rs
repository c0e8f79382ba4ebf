pub mod request_id;

pub use request_id::{request_id_middleware, RequestId, X_REQUEST_ID};

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::controllers::{health, video::VideoController};
use crate::infrastructure::config::Config;
use crate::infrastructure::ffmpeg::Encoder;

/// All routes of the service, with request ids and tracing applied
pub fn build_router(video_controller: Arc<VideoController>, encoder: Arc<dyn Encoder>) -> Router {
    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(encoder);

    let video_routes = Router::new()
        .route("/generate-video", post(VideoController::generate_video))
        .route("/templates/:filename", get(VideoController::download))
        .route("/cleanup", post(VideoController::cleanup))
        .with_state(video_controller);

    Router::new()
        .merge(health_routes)
        .merge(video_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(request_id_middleware)),
        )
}

/// Start the HTTP server with all routes configured
pub async fn start_http_server(
    config: Arc<Config>,
    router: Router,
) -> Result<(), Box<dyn std::error::Error>> {
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, router).await?;

    Ok(())
}
