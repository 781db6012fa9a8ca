// src/reload/server.rs

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::Router;
use tower_http::services::ServeDir;
use tracing::info;

/// Start the static dev server for the pages directory.
///
/// Plain file serving only; the reload transport lives in
/// [`crate::reload::channel`].
pub fn start(dir: PathBuf, port: u16) -> tokio::task::JoinHandle<Result<(), anyhow::Error>> {
    info!(port, dir = %dir.display(), "dev server starting on http://localhost:{port}/");
    tokio::spawn(serve(dir, port))
}

async fn serve(dir: PathBuf, port: u16) -> Result<(), anyhow::Error> {
    let address = SocketAddr::from(([127, 0, 0, 1], port));
    let address = tokio::net::TcpListener::bind(address).await?;

    let router = Router::new().fallback_service(ServeDir::new(dir));

    axum::serve(address, router).await?;

    Ok(())
}
