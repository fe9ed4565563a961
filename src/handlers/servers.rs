// src/handlers/servers.rs
use actix_web::{web, HttpRequest, HttpResponse};
use log::{debug, error};
use governor::{RateLimiter, clock::DefaultClock};
use governor::state::keyed::DefaultKeyedStateStore;
use std::net::IpAddr;
use crate::browser::ServerBrowser;
use crate::utils::{extract_peer_ip, RequestError};

pub async fn get_servers(
    browser: web::Data<ServerBrowser>,
    rate_limiter: web::Data<RateLimiter<IpAddr, DefaultKeyedStateStore<IpAddr>, DefaultClock>>,
    req: HttpRequest,
) -> Result<HttpResponse, RequestError> {
    let peer_ip = extract_peer_ip(&req)?;

    if rate_limiter.check_key(&peer_ip).is_err() {
        error!("Rate limit exceeded for server list for ip: {}", peer_ip);
        return Err(RequestError::RateLimitExceeded);
    }

    let servers = browser.current_list();
    debug!("Serving server list with {} servers", servers.len());

    Ok(HttpResponse::Ok().json(servers.as_ref()))
}
