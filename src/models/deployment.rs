// src/models/deployment.rs
use std::collections::HashMap;
use serde::Deserialize;

/// Wire format of the Edgegap list-deployments response.
#[derive(Debug, Deserialize)]
pub struct DeploymentListResponse {
    #[serde(default)]
    pub data: Vec<Deployment>,
}

/// One deployment as reported by the provider. Lives for a single refresh
/// cycle and is discarded after the merge.
#[derive(Debug, Clone, Deserialize)]
pub struct Deployment {
    pub request_id: String,
    #[serde(default)]
    pub fqdn: String,
    #[serde(default)]
    pub public_ip: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub continent: String,
    #[serde(default)]
    pub current_status: String,
    #[serde(default)]
    pub ports: HashMap<String, PortMapping>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PortMapping {
    pub external: u16,
    #[serde(rename = "internal")]
    pub internal_port: u16,
    #[serde(default)]
    pub protocol: String,
}

impl Deployment {
    /// Address clients should reach the deployment on. The public IP is
    /// preferred; some providers only populate the FQDN.
    pub fn address(&self) -> &str {
        if self.public_ip.is_empty() {
            &self.fqdn
        } else {
            &self.public_ip
        }
    }

    pub fn external_port(&self, name: &str) -> Option<u16> {
        self.ports.get(name).map(|p| p.external)
    }
}

/// Body of a game server's health endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheckResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub server: String,
    #[serde(default)]
    pub players: u32,
    #[serde(default)]
    pub max_players: u32,
    #[serde(default)]
    pub uptime: u64,
    #[serde(default)]
    pub timestamp: i64,
}

/// Outcome of probing one deployment. A failed or absent probe is an
/// all-zero offline result, not an error.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthResult {
    pub healthy: bool,
    pub server_label: String,
    pub players: u32,
    pub max_players: u32,
    pub uptime: u64,
    pub timestamp: i64,
    pub ping_ms: u32,
}

impl HealthResult {
    pub fn offline() -> Self {
        Self {
            healthy: false,
            server_label: String::new(),
            players: 0,
            max_players: 0,
            uptime: 0,
            timestamp: 0,
            ping_ms: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_provider_deployment_entry() {
        let body = r#"{
            "data": [{
                "request_id": "abc123",
                "fqdn": "abc123.edgegap.net",
                "public_ip": "203.0.113.10",
                "city": "Chicago",
                "country": "United States",
                "continent": "North America",
                "current_status": "Status.READY",
                "ports": {
                    "game": {"external": 31000, "internal": 7777, "protocol": "UDP"},
                    "health": {"external": 31001, "internal": 8080, "protocol": "TCP"}
                },
                "tags": ["production"]
            }]
        }"#;

        let parsed: DeploymentListResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.data.len(), 1);

        let deployment = &parsed.data[0];
        assert_eq!(deployment.request_id, "abc123");
        assert_eq!(deployment.address(), "203.0.113.10");
        assert_eq!(deployment.external_port("game"), Some(31000));
        assert_eq!(deployment.external_port("health"), Some(31001));
        assert_eq!(deployment.external_port("rcon"), None);
        assert_eq!(deployment.ports["game"].internal_port, 7777);
    }

    #[test]
    fn address_falls_back_to_fqdn() {
        let body = r#"{"request_id": "abc123", "fqdn": "abc123.edgegap.net"}"#;
        let deployment: Deployment = serde_json::from_str(body).unwrap();
        assert_eq!(deployment.address(), "abc123.edgegap.net");
    }

    #[test]
    fn parses_health_body_with_missing_fields() {
        let body = r#"{"status": "ok", "players": 5, "maxPlayers": 300}"#;
        let health: HealthCheckResponse = serde_json::from_str(body).unwrap();
        assert_eq!(health.players, 5);
        assert_eq!(health.max_players, 300);
        assert_eq!(health.uptime, 0);
    }
}
