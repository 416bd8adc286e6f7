// Bike rental library: catalog store, rental rules and notifications

pub mod bike;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod error;
pub mod notifier;
pub mod registry;
pub mod service;

// Re-export key types for convenience
pub use bike::{Bike, BikeStatus, BikeVariant, ElectricBike, MountainBike, RentalReceipt, RoadBike};
pub use catalog::{BikeRepository, InMemoryBikeRepository};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::RentalConfig;
pub use error::{RentalError, Result};
pub use notifier::{EmailNotifier, NotificationChannel, Notifier, SmsNotifier};
pub use registry::{BikeConstructor, BikeData, BikeRegistry};
pub use service::{RentalService, RentalStats, ReturnOutcome};
