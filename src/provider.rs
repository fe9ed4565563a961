// src/provider.rs
use std::fmt;
use std::time::Duration;
use log::warn;
use reqwest::StatusCode;
use crate::config::Config;
use crate::models::deployment::{Deployment, DeploymentListResponse};

// The list call is cheap on the provider side; anything slower than this
// means the provider is degraded and the cycle should give up.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug)]
pub enum ProviderError {
    Unavailable(String),
    Auth,
    MalformedResponse(String),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(reason) => write!(f, "Provider unavailable: {}", reason),
            Self::Auth => write!(f, "Provider rejected API credentials"),
            Self::MalformedResponse(reason) => {
                write!(f, "Provider response did not parse: {}", reason)
            }
        }
    }
}

/// One deployment paired with the resolved logical ports. A deployment
/// without a health port is still a candidate (it shows as offline); a
/// deployment without a game port is not joinable and is dropped.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub deployment: Deployment,
    pub game_port: u16,
    pub health_port: Option<u16>,
}

/// Fetch the full deployment list from the provider. Atomic: any transport,
/// auth, or decode failure fails the whole fetch rather than returning a
/// partial list.
pub async fn fetch_deployments(
    client: &reqwest::Client,
    config: &Config,
) -> Result<Vec<Candidate>, ProviderError> {
    let url = format!("{}/v1/deployments", config.api_url);
    let request = client
        .get(&url)
        .header("Authorization", config.api_token.as_str())
        .send();

    let response = match tokio::time::timeout(FETCH_TIMEOUT, request).await {
        Ok(Ok(response)) => response,
        Ok(Err(e)) => return Err(ProviderError::Unavailable(e.to_string())),
        Err(_) => return Err(ProviderError::Unavailable("request timed out".to_string())),
    };

    match response.status() {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => return Err(ProviderError::Auth),
        status if !status.is_success() => {
            return Err(ProviderError::Unavailable(format!("provider returned {}", status)));
        }
        _ => {}
    }

    let list: DeploymentListResponse = response
        .json()
        .await
        .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

    Ok(extract_candidates(list.data, config))
}

pub fn extract_candidates(deployments: Vec<Deployment>, config: &Config) -> Vec<Candidate> {
    deployments
        .into_iter()
        .filter_map(|deployment| {
            if deployment.address().is_empty() {
                warn!("Dropping deployment {}: no public address", deployment.request_id);
                return None;
            }

            let game_port = match deployment.external_port(&config.game_port_name) {
                Some(port) => port,
                None => {
                    warn!(
                        "Dropping deployment {}: no '{}' port mapping",
                        deployment.request_id, config.game_port_name
                    );
                    return None;
                }
            };

            let health_port = deployment.external_port(&config.health_port_name);
            if health_port.is_none() {
                warn!(
                    "Deployment {} has no '{}' port mapping, listing as offline",
                    deployment.request_id, config.health_port_name
                );
            }

            Some(Candidate {
                deployment,
                game_port,
                health_port,
            })
        })
        .collect()
}
