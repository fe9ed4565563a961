// src/models/server.rs
use serde::Serialize;

/// Server entry returned to game clients. Clients connect to
/// `ip_address:port` directly; this proxy only hands out the list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInfo {
    pub server_id: String,
    pub server_name: String,
    pub ip_address: String,
    pub port: u16,
    pub health_port: u16,
    pub region: String,
    pub city: String,
    pub country: String,
    pub current_players: u32,
    pub max_players: u32,
    pub ping_ms: u32,
    pub is_healthy: bool,
    pub status: String,
    pub tags: Vec<String>,
}

impl ServerInfo {
    pub fn connection_address(&self) -> String {
        format!("{}:{}", self.ip_address, self.port)
    }

    /// Display name for client UIs, e.g. "Chicago (5/300 players) - 45ms".
    /// Offline servers never show player counts.
    pub fn display_name(&self) -> String {
        if !self.is_healthy {
            return format!("{} - Offline", self.city);
        }
        format!(
            "{} ({}/{} players) - {}ms",
            self.city, self.current_players, self.max_players, self.ping_ms
        )
    }

    pub fn available_capacity(&self) -> u32 {
        self.max_players.saturating_sub(self.current_players)
    }

    pub fn at_capacity(&self) -> bool {
        self.is_healthy && self.max_players > 0 && self.current_players >= self.max_players
    }
}
