// src/main.rs
mod browser;
mod config;
mod handlers;
mod models;
mod probe;
mod provider;
mod ranking;
mod utils;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use env_logger::Env;
use governor::{RateLimiter, clock::DefaultClock};
use governor::state::keyed::DefaultKeyedStateStore;
use std::net::IpAddr;
use log::{info, warn};
use crate::browser::ServerBrowser;
use crate::config::Config;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    dotenv::dotenv().ok();

    let config = Config::from_env();
    if config.api_token.is_empty() {
        warn!("EDGEGAP_API_TOKEN is not set; provider requests will be rejected");
    }

    let bind_address = std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let bind = format!("{}:{}", bind_address, port);

    let browser = web::Data::new(ServerBrowser::new(config.clone()));

    let server_list_rate_limiter: web::Data<
        RateLimiter<IpAddr, DefaultKeyedStateStore<IpAddr>, DefaultClock>
    > = web::Data::new(RateLimiter::keyed(config.server_list_quota()));

    // Background refresh; the first tick fires immediately so the list is
    // populated as soon as the provider answers.
    let refresher = browser.clone();
    tokio::spawn(async move {
        refresher.run_refresh_loop().await;
    });

    info!("Starting server on {}", bind);
    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(browser.clone())
            .app_data(server_list_rate_limiter.clone())
            .route("/api/servers", web::get().to(handlers::servers::get_servers))
            .route("/health", web::get().to(handlers::index::health))
    })
        .bind(&bind)?
        .run().await
}
