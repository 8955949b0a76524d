use std::time::Duration;

use anyhow::Result;
use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::core::config::AppConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceAction {
    TurnOn,
    TurnOff,
    IsOnline,
}

impl DeviceAction {
    pub fn path(self) -> &'static str {
        match self {
            DeviceAction::TurnOn => "turn-on",
            DeviceAction::TurnOff => "turn-off",
            DeviceAction::IsOnline => "is-online",
        }
    }
}

/// Result of one round trip to the remote control API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// HTTP 200 with the raw response body.
    Success(String),
    RemoteError(u16),
    NetworkError(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceStatus {
    Online,
    Offline,
}

impl DeviceStatus {
    /// The endpoint answers `true` when the machine is up. Anything mentioning
    /// "online" or "true" (any case) is also accepted, so `"not true"` reads
    /// as online too.
    pub fn from_body(body: &str) -> Self {
        if body == "true" {
            return DeviceStatus::Online;
        }
        let lowered = body.to_lowercase();
        if lowered.contains("online") || lowered.contains("true") {
            debug!(body, "is-online body accepted by lenient match");
            return DeviceStatus::Online;
        }
        DeviceStatus::Offline
    }
}

/// HTTP client for the single configured machine.
#[derive(Clone)]
pub struct DeviceClient {
    base_url: String,
    client: Client,
}

impl DeviceClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(&config.pc_api_base_url, config.pc_api_timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url_for(&self, action: DeviceAction) -> String {
        format!("{}/{}", self.base_url, action.path())
    }

    pub async fn call(&self, action: DeviceAction) -> ActionOutcome {
        let url = self.url_for(action);
        debug!("GET {}", url);

        let res = match self.client.get(&url).send().await {
            Ok(res) => res,
            Err(e) => return ActionOutcome::NetworkError(e.to_string()),
        };

        if res.status() != StatusCode::OK {
            return ActionOutcome::RemoteError(res.status().as_u16());
        }

        match res.text().await {
            Ok(body) => ActionOutcome::Success(body),
            Err(e) => ActionOutcome::NetworkError(e.to_string()),
        }
    }
}
