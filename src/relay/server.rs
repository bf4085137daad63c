use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{get, post, web, App, HttpResponse, HttpServer};
use serde_json::Value;
use tracing::info;

use crate::core::config::RelayConfig;
use crate::relay::{RelayError, RelayForwarder};

#[get("/health")]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().body("Ok")
}

#[post("/api/chat")]
pub async fn chat(
    req: web::Json<Value>,
    forwarder: web::Data<RelayForwarder>,
) -> Result<HttpResponse, RelayError> {
    let response = forwarder.forward(&req.into_inner()).await?;
    Ok(response.into_http_response())
}

/// Browser front ends call the relay from any origin, with any headers.
/// Preflight requests are answered by the middleware.
pub fn cors() -> Cors {
    Cors::permissive()
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health).service(chat);
}

pub async fn startup(config: RelayConfig) -> std::io::Result<()> {
    let forwarder = RelayForwarder::from_config(&config).map_err(std::io::Error::other)?;
    let app_state = web::Data::new(forwarder);

    info!(
        host = %config.host,
        port = config.port,
        upstream = %app_state.upstream_url(),
        "starting relay"
    );

    HttpServer::new(move || {
        App::new()
            .wrap(cors())
            .wrap(Logger::default())
            .app_data(app_state.clone())
            .configure(configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
