// src/probe.rs
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use log::debug;
use tokio::sync::Semaphore;
use crate::config::Config;
use crate::models::deployment::{HealthCheckResponse, HealthResult};
use crate::provider::Candidate;

async fn fetch_health(client: &reqwest::Client, url: &str) -> Option<HealthCheckResponse> {
    let response = client.get(url).send().await.ok()?;
    if !response.status().is_success() {
        return None;
    }
    response.json().await.ok()
}

/// Probe one deployment's health endpoint. Timeouts, refused connections,
/// non-2xx responses and unparsable bodies all come back as an offline
/// result; a bad server must never abort the refresh cycle.
pub async fn probe_deployment(
    client: &reqwest::Client,
    address: &str,
    health_port: u16,
    config: &Config,
) -> HealthResult {
    let url = format!("http://{}:{}{}", address, health_port, config.health_check_path);
    let started = Instant::now();

    match tokio::time::timeout(config.probe_timeout(), fetch_health(client, &url)).await {
        Ok(Some(body)) => {
            let ping_ms = started.elapsed().as_millis() as u32;
            debug!(
                "Probe ok for {}: {}/{} players, {}ms",
                url, body.players, body.max_players, ping_ms
            );
            HealthResult {
                healthy: true,
                server_label: body.server,
                players: body.players,
                max_players: body.max_players,
                uptime: body.uptime,
                timestamp: body.timestamp,
                ping_ms,
            }
        }
        Ok(None) => {
            debug!("Probe failed for {}", url);
            HealthResult::offline()
        }
        Err(_) => {
            debug!("Probe timed out for {}", url);
            HealthResult::offline()
        }
    }
}

/// Probe every candidate for this cycle in parallel, bounded by
/// `probe_max_in_flight` permits. Returns once every probe has settled;
/// candidates without a health port are skipped and simply have no entry.
pub async fn probe_all(
    client: &reqwest::Client,
    candidates: &[Candidate],
    config: &Config,
) -> HashMap<String, HealthResult> {
    let semaphore = Arc::new(Semaphore::new(config.probe_max_in_flight));
    let mut handles = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        let health_port = match candidate.health_port {
            Some(port) => port,
            None => continue,
        };
        let semaphore = semaphore.clone();
        let client = client.clone();
        let config = config.clone();
        let request_id = candidate.deployment.request_id.clone();
        let address = candidate.deployment.address().to_string();

        handles.push(tokio::spawn(async move {
            let _permit = semaphore.acquire().await.ok();
            let result = probe_deployment(&client, &address, health_port, &config).await;
            (request_id, result)
        }));
    }

    let mut results = HashMap::with_capacity(handles.len());
    for handle in handles {
        if let Ok((request_id, result)) = handle.await {
            results.insert(request_id, result);
        }
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap as StdHashMap;
    use std::time::Duration;
    use crate::models::deployment::{Deployment, PortMapping};

    fn config_for(path: &str) -> Config {
        Config {
            health_check_path: path.to_string(),
            probe_timeout_ms: 1000,
            ..Config::default()
        }
    }

    fn candidate(id: &str, address: &str, health_port: Option<u16>) -> Candidate {
        Candidate {
            deployment: Deployment {
                request_id: id.to_string(),
                fqdn: String::new(),
                public_ip: address.to_string(),
                city: "Chicago".to_string(),
                country: "US".to_string(),
                continent: String::new(),
                current_status: "Status.READY".to_string(),
                ports: StdHashMap::<String, PortMapping>::new(),
                tags: vec![],
            },
            game_port: 31000,
            health_port,
        }
    }

    #[tokio::test]
    async fn successful_probe_reports_occupancy_and_ping() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/health")
            .with_status(200)
            .with_body(
                r#"{"status":"ok","server":"chicago-1","players":5,"maxPlayers":300,"uptime":120,"timestamp":1700000000}"#,
            )
            .create_async()
            .await;

        let addr = server.socket_address();
        let result = probe_deployment(
            &reqwest::Client::new(),
            &addr.ip().to_string(),
            addr.port(),
            &config_for("/health"),
        )
        .await;

        assert!(result.healthy);
        assert_eq!(result.server_label, "chicago-1");
        assert_eq!(result.players, 5);
        assert_eq!(result.max_players, 300);
    }

    #[tokio::test]
    async fn refused_connection_is_offline() {
        // Port 9 on localhost has nothing listening.
        let result = probe_deployment(
            &reqwest::Client::new(),
            "127.0.0.1",
            9,
            &config_for("/health"),
        )
        .await;
        assert_eq!(result, HealthResult::offline());
    }

    #[tokio::test]
    async fn non_2xx_is_offline() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/health")
            .with_status(503)
            .create_async()
            .await;

        let addr = server.socket_address();
        let result = probe_deployment(
            &reqwest::Client::new(),
            &addr.ip().to_string(),
            addr.port(),
            &config_for("/health"),
        )
        .await;
        assert_eq!(result, HealthResult::offline());
    }

    #[tokio::test]
    async fn garbage_body_is_offline() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/health")
            .with_status(200)
            .with_body("<html>not a health payload</html>")
            .create_async()
            .await;

        let addr = server.socket_address();
        let result = probe_deployment(
            &reqwest::Client::new(),
            &addr.ip().to_string(),
            addr.port(),
            &config_for("/health"),
        )
        .await;
        assert_eq!(result, HealthResult::offline());
    }

    #[tokio::test]
    async fn slow_server_hits_the_probe_deadline() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/health")
            .with_status(200)
            .with_chunked_body(|w| {
                std::thread::sleep(Duration::from_millis(500));
                w.write_all(br#"{"players":5,"maxPlayers":300}"#)
            })
            .create_async()
            .await;

        let config = Config {
            probe_timeout_ms: 50,
            ..config_for("/health")
        };
        let addr = server.socket_address();
        let result = probe_deployment(
            &reqwest::Client::new(),
            &addr.ip().to_string(),
            addr.port(),
            &config,
        )
        .await;
        assert_eq!(result, HealthResult::offline());
    }

    #[tokio::test]
    async fn probe_all_skips_candidates_without_a_health_port() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/health")
            .with_status(200)
            .with_body(r#"{"players":1,"maxPlayers":10}"#)
            .create_async()
            .await;

        let addr = server.socket_address();
        let candidates = vec![
            candidate("probed", &addr.ip().to_string(), Some(addr.port())),
            candidate("unprobeable", "203.0.113.99", None),
        ];

        let results = probe_all(&reqwest::Client::new(), &candidates, &config_for("/health")).await;
        assert!(results.contains_key("probed"));
        assert!(!results.contains_key("unprobeable"));
        assert!(results["probed"].healthy);
    }
}
