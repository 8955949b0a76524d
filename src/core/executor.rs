use anyhow::Result;
use tracing::{error, info};

use crate::core::config::AppConfig;
use crate::core::device::{ActionOutcome, DeviceAction, DeviceClient, DeviceStatus};
use crate::core::intent::Intent;
use crate::core::messages;

/// Turns an [`Intent`] into one remote call and a reply for the user.
pub struct ActionExecutor {
    device: DeviceClient,
}

impl ActionExecutor {
    pub fn new(device: DeviceClient) -> Self {
        info!(
            "Action executor initialized with API base URL: {}",
            device.base_url()
        );
        Self { device }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Ok(Self::new(DeviceClient::from_config(config)?))
    }

    pub async fn execute(&self, intent: Intent) -> String {
        let outcome = self.device.call(action_for(intent)).await;
        reply_for(intent, outcome)
    }
}

pub fn action_for(intent: Intent) -> DeviceAction {
    match intent {
        Intent::PowerOn => DeviceAction::TurnOn,
        Intent::PowerOff => DeviceAction::TurnOff,
        Intent::QueryStatus => DeviceAction::IsOnline,
    }
}

/// Maps every (intent, outcome) pair to a non-empty reply.
pub fn reply_for(intent: Intent, outcome: ActionOutcome) -> String {
    match (intent, outcome) {
        (Intent::PowerOn, ActionOutcome::Success(_)) => {
            info!("PC turned on successfully");
            messages::POWER_ON_OK.to_string()
        }
        (Intent::PowerOff, ActionOutcome::Success(_)) => {
            info!("PC turned off successfully");
            messages::POWER_OFF_OK.to_string()
        }
        (Intent::QueryStatus, ActionOutcome::Success(body)) => {
            match DeviceStatus::from_body(&body) {
                DeviceStatus::Online => {
                    info!("PC is online");
                    messages::STATUS_ONLINE.to_string()
                }
                DeviceStatus::Offline => {
                    info!("PC is offline");
                    messages::STATUS_OFFLINE.to_string()
                }
            }
        }
        (intent, ActionOutcome::RemoteError(code)) => {
            error!("Remote call {} failed with status {}", intent, code);
            match intent {
                Intent::PowerOn => messages::power_on_failed(code),
                Intent::PowerOff => messages::power_off_failed(code),
                Intent::QueryStatus => messages::status_failed(code),
            }
        }
        (intent, ActionOutcome::NetworkError(cause)) => {
            error!("Network error during {}: {}", intent, cause);
            messages::CONNECTION_FAILED.to_string()
        }
    }
}
