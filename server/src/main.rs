use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::http::header::CACHE_CONTROL;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use clap::Parser;
use polymesh_shared::MESH_ENDPOINT;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;

mod csrf;
mod handlers;
mod mesh;
mod state;

use crate::handlers::{generate_mesh_handler, index_handler, invalid_request_handler};
use crate::mesh::HttpMeshService;
use crate::state::AppState;

#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    /// Directory holding index.html and the built wasm bundle.
    #[arg(long)]
    public_dir: Option<PathBuf>,
    /// Endpoint of the external mesh generator.
    #[arg(
        long,
        env = "MESH_SERVICE_URL",
        default_value = "http://127.0.0.1:8001/mesh"
    )]
    mesh_service_url: String,
    #[arg(long, default_value_t = 30)]
    mesh_timeout_secs: u64,
}

/// Page routes, the mesh endpoint, and static files for everything else.
fn router(state: AppState, public_dir: &Path) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/draw/", get(index_handler))
        .route(
            MESH_ENDPOINT,
            post(generate_mesh_handler).fallback(invalid_request_handler),
        )
        .fallback_service(ServeDir::new(public_dir).append_index_html_on_directories(false))
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static("no-cache"),
        ))
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let public_dir = args
        .public_dir
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../public"));
    let index_file = public_dir.join("index.html");
    let mesh = HttpMeshService::new(
        args.mesh_service_url.clone(),
        Duration::from_secs(args.mesh_timeout_secs),
    )
    .context("Failed to build mesh service client")?;
    let state = AppState {
        mesh: Arc::new(mesh),
        index_file,
    };

    let app = router(state, &public_dir);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(3000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    log::info!(
        "Polygon editor running at http://localhost:{port} public_dir={} mesh_service={}",
        public_dir.display(),
        args.mesh_service_url
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app).await.context("Server crashed")?;
    Ok(())
}
