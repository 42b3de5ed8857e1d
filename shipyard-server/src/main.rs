#![deny(missing_docs)]
//! Shipyard server executable.
//!
//! Hosts the `/rest/ships` inventory API over PostgreSQL or in-memory storage.

mod config;
mod db;
mod models;
mod openapi;
mod registry;
mod routes;
mod schema;

#[cfg(not(test))]
use actix_cors::Cors;
#[cfg(not(test))]
use actix_web::{App, HttpServer, http::header, web};
#[cfg(not(test))]
use dotenvy::dotenv;

#[cfg(not(test))]
use crate::config::ServerConfig;
#[cfg(not(test))]
use crate::registry::open_registry;
#[cfg(not(test))]
use crate::routes::{AppState, configure};

#[cfg(not(test))]
fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::from_env()
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidInput, err))?;
    let registry = open_registry(&config.storage).map_err(std::io::Error::other)?;
    let state = web::Data::new(AppState::new(registry));
    log::info!(
        "serving ships from {} storage on {}:{}",
        config.storage.label(),
        config.host,
        config.port
    );

    let ServerConfig {
        host,
        port,
        ui_origins,
        ..
    } = config;

    actix_web::rt::System::new().block_on(async move {
        HttpServer::new(move || {
            let mut cors = Cors::default()
                .allowed_methods(vec!["GET", "POST", "DELETE", "OPTIONS"])
                .allowed_headers(vec![header::CONTENT_TYPE])
                .max_age(3600);
            for origin in &ui_origins {
                cors = cors.allowed_origin(origin);
            }
            App::new()
                .wrap(actix_web::middleware::Logger::default())
                .wrap(cors)
                .app_data(state.clone())
                .configure(configure)
        })
        .bind((host, port))?
        .run()
        .await
    })
}

#[cfg(test)]
fn main() {}
