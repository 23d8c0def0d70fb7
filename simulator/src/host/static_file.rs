use anyhow::Context;
use log::info;
use serde_json::json;
use spillcore::ingest::columns::DEFAULT_RESOURCE_PATH;
use std::future::Future;
use std::net::SocketAddr;
use std::path::PathBuf;
use warp::{Filter, Rejection, Reply};

/// Routes exposing the source file unchanged, plus a liveness probe.
pub fn routes(source: PathBuf) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let file_route = warp::path(DEFAULT_RESOURCE_PATH.trim_start_matches('/'))
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::fs::file(source));

    let health_route = warp::path("healthz")
        .and(warp::path::end())
        .and(warp::get())
        .map(|| warp::reply::json(&json!({"status": "ok"})));

    file_route
        .map(|file: warp::fs::File| file.into_response())
        .or(health_route.map(|reply: warp::reply::Json| reply.into_response()))
        .unify()
        .with(warp::cors().allow_any_origin().allow_method("GET"))
}

/// Serves `source` on `addr` until `shutdown` resolves.
pub async fn serve<F>(source: PathBuf, addr: SocketAddr, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    anyhow::ensure!(
        source.is_file(),
        "source file {} does not exist",
        source.display()
    );
    let (bound, server) = warp::serve(routes(source.clone()))
        .try_bind_with_graceful_shutdown(addr, shutdown)
        .with_context(|| format!("binding static host to {addr}"))?;
    info!(
        "serving {} at http://{bound}{DEFAULT_RESOURCE_PATH}",
        source.display()
    );
    server.await;
    info!("static host stopped");
    Ok(())
}
