// Bike records, their rental state machine and the per-variant descriptions

use std::{fmt, sync::Arc};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

// Rental state of a single bike. The start time lives inside `Rented`, so a
// bike can never carry a start time while available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BikeStatus {
    Available,
    Rented { since: DateTime<Utc> },
    // No operation moves a bike here yet.
    Maintenance,
}

impl BikeStatus {
    pub fn label(&self) -> &'static str {
        match self {
            BikeStatus::Available => "available",
            BikeStatus::Rented { .. } => "rented",
            BikeStatus::Maintenance => "maintenance",
        }
    }
}

// The part of a bike that differs between kinds of bike.
//
// Adding a new kind means implementing this trait and registering a
// constructor for it in `BikeRegistry`.
pub trait BikeVariant: fmt::Debug + Send + Sync {
    // Tag the factory knows this variant by.
    fn type_tag(&self) -> &'static str;

    // Human readable description for a bike of this variant.
    fn describe(&self, model: &str, price_per_hour: f64) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MountainBike;

impl BikeVariant for MountainBike {
    fn type_tag(&self) -> &'static str {
        "mountain"
    }

    fn describe(&self, model: &str, price_per_hour: f64) -> String {
        format!("Mountain Bike: {model} (${price_per_hour:.2}/hr)")
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RoadBike;

impl BikeVariant for RoadBike {
    fn type_tag(&self) -> &'static str {
        "road"
    }

    fn describe(&self, model: &str, price_per_hour: f64) -> String {
        format!("Road Bike: {model} (${price_per_hour:.2}/hr)")
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ElectricBike {
    pub battery_capacity_wh: f64,
}

impl BikeVariant for ElectricBike {
    fn type_tag(&self) -> &'static str {
        "electric"
    }

    fn describe(&self, model: &str, price_per_hour: f64) -> String {
        format!(
            "Electric Bike: {model} (${price_per_hour:.2}/hr, {}Wh)",
            self.battery_capacity_wh
        )
    }
}

// What a finished rental cost
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentalReceipt {
    pub bike_id: String,
    pub started_at: DateTime<Utc>,
    pub returned_at: DateTime<Utc>,
    pub hours: f64,
    pub cost: f64,
}

#[derive(Debug, Clone)]
pub struct Bike {
    id: String,
    model: String,
    price_per_hour: f64,
    status: BikeStatus,
    variant: Arc<dyn BikeVariant>,
}

impl Bike {
    pub fn new(
        model: impl Into<String>,
        price_per_hour: f64,
        variant: Arc<dyn BikeVariant>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            model: model.into(),
            price_per_hour,
            status: BikeStatus::Available,
            variant,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn price_per_hour(&self) -> f64 {
        self.price_per_hour
    }

    pub fn status(&self) -> BikeStatus {
        self.status
    }

    pub fn type_tag(&self) -> &'static str {
        self.variant.type_tag()
    }

    pub fn variant(&self) -> &dyn BikeVariant {
        self.variant.as_ref()
    }

    pub fn rental_start(&self) -> Option<DateTime<Utc>> {
        match self.status {
            BikeStatus::Rented { since } => Some(since),
            _ => None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.status == BikeStatus::Available
    }

    pub fn description(&self) -> String {
        self.variant.describe(&self.model, self.price_per_hour)
    }

    // Available -> Rented. Returns false and leaves the bike untouched from
    // any other state.
    pub fn rent(&mut self, start_time: DateTime<Utc>) -> bool {
        match self.status {
            BikeStatus::Available => {
                self.status = BikeStatus::Rented { since: start_time };
                true
            }
            BikeStatus::Rented { .. } | BikeStatus::Maintenance => false,
        }
    }

    // Rented -> Available, billing the elapsed hours at the hourly price.
    // `None` when the bike was not rented.
    pub fn end_rental(&mut self, now: DateTime<Utc>) -> Option<RentalReceipt> {
        let BikeStatus::Rented { since } = self.status else {
            return None;
        };

        let hours = hours_between(since, now);
        self.status = BikeStatus::Available;

        Some(RentalReceipt {
            bike_id: self.id.clone(),
            started_at: since,
            returned_at: now,
            hours,
            cost: hours * self.price_per_hour,
        })
    }
}

// Hours from `start` to `end` at millisecond resolution, never negative.
pub fn hours_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    let elapsed_ms = end.signed_duration_since(start).num_milliseconds().max(0);
    elapsed_ms as f64 / MILLIS_PER_HOUR
}
