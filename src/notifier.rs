// Rental notifications

use std::sync::Arc;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

// Tells a customer that their rental started.
pub trait Notifier: Send + Sync {
    fn send_rental_notification(&self, customer_id: &str, bike_id: &str);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EmailNotifier;

impl EmailNotifier {
    pub fn message(customer_id: &str, bike_id: &str) -> String {
        format!("Email sent to customer {customer_id}: Bike {bike_id} rented!")
    }
}

impl Notifier for EmailNotifier {
    fn send_rental_notification(&self, customer_id: &str, bike_id: &str) {
        tracing::debug!(customer_id, bike_id, channel = "email", "sending rental notification");
        println!("{}", Self::message(customer_id, bike_id));
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SmsNotifier;

impl SmsNotifier {
    pub fn message(customer_id: &str, bike_id: &str) -> String {
        format!("SMS sent to customer {customer_id}: Bike {bike_id} rented!")
    }
}

impl Notifier for SmsNotifier {
    fn send_rental_notification(&self, customer_id: &str, bike_id: &str) {
        tracing::debug!(customer_id, bike_id, channel = "sms", "sending rental notification");
        println!("{}", Self::message(customer_id, bike_id));
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum NotificationChannel {
    #[default]
    Email,
    Sms,
}

impl NotificationChannel {
    pub fn notifier(self) -> Arc<dyn Notifier> {
        match self {
            NotificationChannel::Email => Arc::new(EmailNotifier),
            NotificationChannel::Sms => Arc::new(SmsNotifier),
        }
    }
}
