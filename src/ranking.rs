// src/ranking.rs
use std::collections::HashMap;
use crate::models::deployment::HealthResult;
use crate::models::server::ServerInfo;
use crate::provider::Candidate;

/// Lifecycle states that make a deployment unjoinable no matter what its
/// health endpoint says. Edgegap reports these as e.g. "Status.TERMINATED".
fn is_terminal(status: &str) -> bool {
    let status = status.to_ascii_lowercase();
    status.contains("terminat") || status.contains("error")
}

/// Merge the cycle's candidates with their probe results into the public
/// server list. Candidates with no probe result are listed as offline;
/// terminal deployments are excluded entirely.
pub fn aggregate(
    candidates: Vec<Candidate>,
    mut results: HashMap<String, HealthResult>,
) -> Vec<ServerInfo> {
    let mut servers: Vec<ServerInfo> = candidates
        .into_iter()
        .filter(|candidate| !is_terminal(&candidate.deployment.current_status))
        .map(|candidate| {
            let health = results
                .remove(&candidate.deployment.request_id)
                .unwrap_or_else(HealthResult::offline);
            merge(candidate, health)
        })
        .collect();

    sort_servers(&mut servers);
    servers
}

fn merge(candidate: Candidate, health: HealthResult) -> ServerInfo {
    let deployment = candidate.deployment;
    let server_name = if health.server_label.is_empty() {
        deployment.fqdn.clone()
    } else {
        health.server_label.clone()
    };

    // Occupancy and latency are only trusted when this cycle's probe
    // succeeded; an offline result is all zeroes already.
    ServerInfo {
        server_id: deployment.request_id,
        server_name,
        ip_address: if deployment.public_ip.is_empty() {
            deployment.fqdn
        } else {
            deployment.public_ip
        },
        port: candidate.game_port,
        health_port: candidate.health_port.unwrap_or(0),
        region: deployment.continent,
        city: deployment.city,
        country: deployment.country,
        current_players: health.players,
        max_players: health.max_players,
        ping_ms: health.ping_ms,
        is_healthy: health.healthy,
        status: deployment.current_status,
        tags: deployment.tags,
    }
}

/// Healthy servers first; among healthy ones, full servers sort after
/// everything joinable, then lowest ping, then most open slots. The final
/// id comparison keeps the order deterministic across cycles.
pub fn sort_servers(servers: &mut [ServerInfo]) {
    servers.sort_by(|a, b| {
        b.is_healthy
            .cmp(&a.is_healthy)
            .then_with(|| a.at_capacity().cmp(&b.at_capacity()))
            .then_with(|| a.ping_ms.cmp(&b.ping_ms))
            .then_with(|| b.available_capacity().cmp(&a.available_capacity()))
            .then_with(|| a.server_id.cmp(&b.server_id))
    });
}
