//! Web host: registers workers while building an axum router and guards
//! an admin surface with the authorization filters.
//!
//! Run with `cargo run --example axum_host`, then:
//!   curl http://127.0.0.1:3000/
//!   curl http://127.0.0.1:3000/admin/status                 (401)
//!   curl -H 'x-demo-user: alice' http://127.0.0.1:3000/admin/status
//! Stop with Ctrl+C or SIGTERM.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::get,
    Extension, Router,
};
use warden::admin::{admin_gate, AccessFilter, AuthorizationFilter, Principal};
use warden::config::WardenConfig;
use warden::error::WorkerError;
use warden::host::HostEnvironment;
use warden::observability::init_tracing;
use warden::{BackgroundWorkersExt, Coordinator, ProcessHost, ShutdownDetector, Worker};

/// Stand-in for a real background job server.
struct JobServer;

impl Worker for JobServer {
    fn name(&self) -> &str {
        "job-server"
    }

    fn stop(&mut self) -> Result<(), WorkerError> {
        tracing::info!("job server winding down");
        Ok(())
    }

    fn release(&mut self) -> Result<(), WorkerError> {
        tracing::info!("job server released");
        Ok(())
    }
}

/// Demo authentication layer: trusts an `x-demo-user` header. A real
/// deployment derives the principal from its session or token machinery.
async fn demo_auth(mut request: Request<Body>, next: Next) -> Response {
    if let Some(name) = request
        .headers()
        .get("x-demo-user")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
    {
        request.extensions_mut().insert(Principal {
            name: Some(name),
            authenticated: true,
            roles: vec!["staff".into()],
            claims: Vec::new(),
        });
    }
    next.run(request).await
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing("axum_host=info,warden=debug");

    let config = WardenConfig::default();

    let host = Arc::new(ProcessHost::new());
    host.listen_for_signals();

    let handle = ShutdownDetector::install(
        host.clone() as Arc<dyn HostEnvironment>,
        &config.shutdown,
    );
    let coordinator = Coordinator::new(handle.clone());

    let filter: Arc<dyn AccessFilter> = Arc::new(AuthorizationFilter::new().roles("staff"));

    let admin = Router::new()
        .route("/admin/status", get(|| async { "workers running" }))
        .layer(middleware::from_fn(admin_gate))
        .layer(Extension(filter));

    let app = Router::new()
        .route("/", get(|| async { "hello" }))
        .merge(admin)
        .layer(middleware::from_fn(demo_auth))
        .with_background_workers(&coordinator, || {
            Ok(vec![Box::new(JobServer) as Box<dyn Worker>])
        })?;

    let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = handle.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    // Worker teardown rides the same handle the server drained on.
    tokio::time::sleep(Duration::from_millis(200)).await;
    tracing::info!("Shutdown complete");
    Ok(())
}
