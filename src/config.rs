// src/config.rs
use std::env;
use std::time::Duration;
use std::num::NonZeroU32;
use governor::Quota;

#[derive(Clone)]
pub struct Config {
    // Edgegap provider API
    pub api_url: String,
    pub api_token: String,

    // Refresh cycle
    pub refresh_interval_secs: u64,

    // Health probing
    pub probe_timeout_ms: u64,
    pub probe_max_in_flight: usize,
    pub game_port_name: String,
    pub health_port_name: String,
    pub health_check_path: String,

    // Rate limiting for the client-facing list endpoint
    pub server_list_period_secs: u64,
    pub server_list_burst_limit: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "https://api.edgegap.com".to_string(),
            api_token: String::new(),
            refresh_interval_secs: 10,
            probe_timeout_ms: 2500,
            probe_max_in_flight: 32,
            game_port_name: "game".to_string(),
            health_port_name: "health".to_string(),
            health_check_path: "/health".to_string(),
            server_list_period_secs: 5,
            server_list_burst_limit: 120,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            api_url: env::var("EDGEGAP_API_URL")
                .unwrap_or_else(|_| "https://api.edgegap.com".to_string()),

            api_token: env::var("EDGEGAP_API_TOKEN")
                .unwrap_or_default(),

            refresh_interval_secs: env::var("REFRESH_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),

            probe_timeout_ms: env::var("PROBE_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(2500),

            probe_max_in_flight: env::var("PROBE_MAX_IN_FLIGHT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(32),

            game_port_name: env::var("GAME_PORT_NAME")
                .unwrap_or_else(|_| "game".to_string()),

            health_port_name: env::var("HEALTH_PORT_NAME")
                .unwrap_or_else(|_| "health".to_string()),

            health_check_path: env::var("HEALTH_CHECK_PATH")
                .unwrap_or_else(|_| "/health".to_string()),

            server_list_period_secs: env::var("SERVER_LIST_PERIOD_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),

            server_list_burst_limit: env::var("SERVER_LIST_BURST_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(120),
        }
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn server_list_quota(&self) -> Quota {
        // A zero period or burst from the environment cannot build a quota;
        // clamp to the smallest workable values instead of panicking.
        let period = Duration::from_secs(self.server_list_period_secs.max(1));
        let burst = NonZeroU32::new(self.server_list_burst_limit).unwrap_or(NonZeroU32::MIN);
        Quota::with_period(period).unwrap().allow_burst(burst)
    }
}
