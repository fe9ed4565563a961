// src/browser.rs
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use log::{debug, error, info};
use parking_lot::RwLock;
use tokio::time::MissedTickBehavior;
use crate::config::Config;
use crate::models::server::ServerInfo;
use crate::{probe, provider, ranking};

/// Process-wide discovery state: owns the refresh cycle and the single
/// published snapshot that client-facing handlers read. The snapshot is
/// replaced wholesale at the end of each cycle, never mutated, so readers
/// only ever hold the lock long enough to clone an `Arc`.
pub struct ServerBrowser {
    config: Config,
    client: reqwest::Client,
    published: RwLock<Arc<Vec<ServerInfo>>>,
    last_refresh_unix: AtomicU64,
}

impl ServerBrowser {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
            published: RwLock::new(Arc::new(Vec::new())),
            last_refresh_unix: AtomicU64::new(0),
        }
    }

    /// The last completed snapshot. Never blocks on an in-progress cycle.
    pub fn current_list(&self) -> Arc<Vec<ServerInfo>> {
        self.published.read().clone()
    }

    pub fn last_refresh_unix(&self) -> u64 {
        self.last_refresh_unix.load(Ordering::Relaxed)
    }

    fn publish(&self, servers: Vec<ServerInfo>) {
        *self.published.write() = Arc::new(servers);
        self.last_refresh_unix
            .store(crate::utils::unix_now(), Ordering::Relaxed);
    }

    /// One fetch -> probe -> rank -> publish iteration. A provider failure
    /// aborts the cycle and leaves the previous snapshot in place; probe
    /// failures only mark individual servers offline.
    pub async fn run_cycle(&self) {
        let candidates = match provider::fetch_deployments(&self.client, &self.config).await {
            Ok(candidates) => candidates,
            Err(e) => {
                error!("Deployment fetch failed, keeping previous list: {}", e);
                return;
            }
        };

        debug!("Probing {} deployment candidates", candidates.len());
        let results = probe::probe_all(&self.client, &candidates, &self.config).await;
        let servers = ranking::aggregate(candidates, results);

        for server in servers.iter() {
            debug!("{} [{}]", server.display_name(), server.connection_address());
        }
        info!(
            "Published {} servers ({} healthy)",
            servers.len(),
            servers.iter().filter(|s| s.is_healthy).count()
        );
        self.publish(servers);
    }

    /// Background refresh driver. Cycles run strictly back to back; if one
    /// overruns the interval the missed ticks are skipped rather than
    /// letting fetch/probe waves overlap.
    pub async fn run_refresh_loop(&self) {
        let mut ticker = tokio::time::interval(self.config.refresh_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            self.run_cycle().await;
        }
    }
}
