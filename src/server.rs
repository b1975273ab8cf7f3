//! HTTP surface: `POST /progress/query/?db=<name>`.

use actix_web::{App, HttpRequest, HttpResponse, HttpServer, middleware, web};
use anyhow::Context;
use tracing::{error, info, warn};

use crate::config::ServerConfig;
use crate::consts::QUERY_PATH;
use crate::error::ProxyError;
use crate::pipeline::Pipeline;

/// Register the query route. Expects a `web::Data<Pipeline>` in app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource(format!("{QUERY_PATH}{{tail:.*}}"))
            .app_data(web::PayloadConfig::new(usize::MAX))
            .route(web::post().to(run_query))
            .default_service(web::to(method_not_allowed)),
    );
}

/// Bind and serve until shutdown.
pub async fn serve(pipeline: Pipeline, server: ServerConfig) -> anyhow::Result<()> {
    let data = web::Data::new(pipeline);
    let addr = server.bind_addr();

    let http = HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(data.clone())
            .configure(configure)
    })
    .workers(server.workers.max(1))
    .bind(&addr)
    .with_context(|| format!("unable to bind to {addr}"))?;

    info!(%addr, workers = server.workers, "listening");
    http.run().await.context("server terminated")
}

async fn run_query(
    req: HttpRequest,
    body: web::Bytes,
    pipeline: web::Data<Pipeline>,
) -> Result<HttpResponse, ProxyError> {
    let Some(db) = database_param(req.query_string()) else {
        warn!(query = req.query_string(), "rejected query without db");
        return Err(ProxyError::MissingDatabase);
    };

    let result = match pipeline.run(&db, &body).await {
        Ok(result) => result,
        Err(e) => {
            error!(db = %db, error = %e, "query failed");
            return Err(e);
        }
    };

    let payload = serde_json::to_string(&result).map_err(|e| {
        error!(db = %db, error = %e, "failed to encode result");
        ProxyError::from(e)
    })?;

    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .body(payload))
}

async fn method_not_allowed(req: HttpRequest) -> Result<HttpResponse, ProxyError> {
    warn!(method = %req.method(), path = req.path(), "rejected non-POST request");
    Err(ProxyError::MethodNotAllowed)
}

/// First `db` value of the query string, if present and non-empty.
fn database_param(query: &str) -> Option<String> {
    let pairs = web::Query::<Vec<(String, String)>>::from_query(query)
        .ok()?
        .into_inner();
    pairs
        .into_iter()
        .find(|(key, _)| key == "db")
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}
