use std::path::Path;

use anyhow::{Context, Result};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::services::{ServeDir, ServeFile};

use crate::core::models::AppSettings;
use crate::global_constants;

/// `/` answers with the main page; every other path is looked up in the
/// assets directory.
pub fn build_router(assets_dir: &Path) -> Router {
    let index_path = assets_dir.join(global_constants::INDEX_FILE_NAME);

    Router::new()
        .route_service("/", ServeFile::new(index_path))
        .fallback_service(ServeDir::new(assets_dir))
}

pub async fn run_static_server(settings: &AppSettings) -> Result<()> {
    let assets_dir = settings.assets_dir.as_path();
    if !assets_dir.join(global_constants::INDEX_FILE_NAME).exists() {
        log::warn!(
            "[SERVER] No {} found in {:?}, the root page will return 404",
            global_constants::INDEX_FILE_NAME,
            assets_dir
        );
    }

    let addr = format!(
        "{}:{}",
        global_constants::DEFAULT_SERVER_HOST,
        settings.server_port
    );
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    println!("{}", global_constants::STARTUP_BANNER);
    log::info!("[SERVER] {}", "=".repeat(50));
    log::info!("[SERVER] Serving {:?}", assets_dir);
    log::info!("[SERVER] Local:   http://localhost:{}", settings.server_port);
    log::info!("[SERVER] Network: http://{}", addr);
    log::info!("[SERVER] {}", "=".repeat(50));

    axum::serve(listener, build_router(assets_dir))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Static server stopped unexpectedly")?;

    log::info!("[SERVER] Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        log::error!("[SERVER] Failed to listen for shutdown signal: {}", error);
        return;
    }
    log::info!("[SERVER] Shutdown requested");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn assets_fixture() -> tempfile::TempDir {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::write(
            temp_dir.path().join("index.html"),
            "<html><body>Image to Text</body></html>",
        )
        .unwrap();
        std::fs::write(temp_dir.path().join("style.css"), "body { margin: 0; }").unwrap();
        temp_dir
    }

    async fn get(router: Router, uri: &str) -> (StatusCode, String) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8_lossy(&body).to_string())
    }

    #[tokio::test]
    async fn test_root_returns_main_page() {
        let assets = assets_fixture();

        let (status, body) = get(build_router(assets.path()), "/").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Image to Text"));
    }

    #[tokio::test]
    async fn test_static_assets_are_served_from_assets_dir() {
        let assets = assets_fixture();

        let (status, body) = get(build_router(assets.path()), "/style.css").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "body { margin: 0; }");
    }

    #[tokio::test]
    async fn test_unknown_paths_return_not_found() {
        let assets = assets_fixture();

        let (status, _) = get(build_router(assets.path()), "/api/recognize").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
