use serde::{Deserialize, Serialize};

use crate::notifier::NotificationChannel;

// Rental service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RentalConfig {
    // Used when the caller's data carries no type tag; `None` makes the tag required.
    pub default_bike_type: Option<String>,
    pub notification_channel: NotificationChannel,
}

impl Default for RentalConfig {
    fn default() -> Self {
        Self {
            default_bike_type: Some("mountain".to_string()),
            notification_channel: NotificationChannel::Email,
        }
    }
}

impl RentalConfig {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
