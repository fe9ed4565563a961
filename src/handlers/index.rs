// src/handlers/index.rs
use actix_web::{web, HttpResponse};
use crate::browser::ServerBrowser;
use crate::utils::unix_now;

/// Liveness endpoint for the proxy itself, not the fleet.
pub async fn health(browser: web::Data<ServerBrowser>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "timestamp": unix_now(),
        "servers": browser.current_list().len(),
        "lastRefresh": browser.last_refresh_unix(),
    }))
}
