// Rental service: business rules on top of the catalog store

use std::{fmt, sync::Arc};

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::{
    bike::{Bike, RentalReceipt},
    catalog::BikeRepository,
    clock::{Clock, SystemClock},
    config::RentalConfig,
    error::{RentalError, Result},
    notifier::Notifier,
    registry::{BikeData, BikeRegistry, TYPE_FIELD},
};

// Counters for one service instance
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RentalStats {
    pub bikes_added: usize,
    pub rentals_started: usize,
    pub rentals_refused: usize,
    pub returns_settled: usize,
    pub returns_without_rental: usize,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReturnOutcome {
    Returned(RentalReceipt),
    // The bike exists but was not out on rent; nothing was billed.
    NotRented,
}

impl ReturnOutcome {
    pub fn cost(&self) -> f64 {
        match self {
            ReturnOutcome::Returned(receipt) => receipt.cost,
            ReturnOutcome::NotRented => 0.0,
        }
    }
}

pub struct RentalService {
    repository: Arc<dyn BikeRepository>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    registry: BikeRegistry,
    config: RentalConfig,
    stats: RwLock<RentalStats>,
}

impl fmt::Debug for RentalService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RentalService")
            .field("bikes", &self.repository.len())
            .field("registry", &self.registry)
            .field("config", &self.config)
            .field("stats", &*self.stats.read())
            .finish()
    }
}

impl RentalService {
    pub fn new(repository: Arc<dyn BikeRepository>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            repository,
            notifier,
            clock: Arc::new(SystemClock),
            registry: BikeRegistry::default(),
            config: RentalConfig::default(),
            stats: RwLock::new(RentalStats::default()),
        }
    }

    // Picks the notifier from `config.notification_channel`.
    pub fn from_config(repository: Arc<dyn BikeRepository>, config: RentalConfig) -> Self {
        let notifier = config.notification_channel.notifier();
        Self::new(repository, notifier).with_config(config)
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_registry(mut self, registry: BikeRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_config(mut self, config: RentalConfig) -> Self {
        self.config = config;
        self
    }

    pub fn registry(&self) -> &BikeRegistry {
        &self.registry
    }

    pub fn stats(&self) -> RentalStats {
        self.stats.read().clone()
    }

    // Builds a bike from `data` and stores it, returning its new id.
    //
    // The type tag is read from the `type` field, falling back to the
    // configured default. Nothing is stored when this fails.
    pub fn add_bike(&self, data: &BikeData) -> Result<String> {
        let type_tag = match data.type_tag()? {
            Some(tag) => tag,
            None => self
                .config
                .default_bike_type
                .as_deref()
                .ok_or_else(|| RentalError::MissingField(TYPE_FIELD.to_string()))?,
        };

        let bike = self.registry.build(type_tag, data)?;
        let bike_id = bike.id().to_string();

        info!(bike_id = %bike_id, description = %bike.description(), "bike added");
        self.repository.save(bike);
        self.stats.write().bikes_added += 1;

        Ok(bike_id)
    }

    // Rents the bike to `customer_id`. False when the bike is unknown or
    // not available; the customer is only notified on success.
    pub fn rent_bike(&self, bike_id: &str, customer_id: &str) -> bool {
        let now = self.clock.utc();
        let mut rented = false;

        let found = self
            .repository
            .update(bike_id, &mut |bike: &mut Bike| rented = bike.rent(now));

        if !found {
            debug!(bike_id, "rent requested for unknown bike");
            return false;
        }

        if !rented {
            info!(bike_id, customer_id, "bike is not available for rent");
            self.stats.write().rentals_refused += 1;
            return false;
        }

        info!(bike_id, customer_id, started_at = %now, "rental started");
        self.notifier.send_rental_notification(customer_id, bike_id);
        self.stats.write().rentals_started += 1;

        true
    }

    // Ends the rental of `bike_id` at the current clock time.
    //
    // `None` when the bike is unknown, otherwise whether a rental was
    // actually settled and what it cost.
    pub fn settle_return(&self, bike_id: &str) -> Option<ReturnOutcome> {
        let now = self.clock.utc();
        let mut receipt = None;

        let found = self
            .repository
            .update(bike_id, &mut |bike: &mut Bike| receipt = bike.end_rental(now));

        if !found {
            debug!(bike_id, "return requested for unknown bike");
            return None;
        }

        let outcome = match receipt {
            Some(receipt) => {
                info!(
                    bike_id,
                    hours = receipt.hours,
                    cost = receipt.cost,
                    "return cost settled"
                );
                let mut stats = self.stats.write();
                stats.returns_settled += 1;
                stats.revenue += receipt.cost;
                ReturnOutcome::Returned(receipt)
            }
            None => {
                warn!(bike_id, "returned bike was not rented, nothing billed");
                self.stats.write().returns_without_rental += 1;
                ReturnOutcome::NotRented
            }
        };

        Some(outcome)
    }

    // True whenever the bike exists, rented or not. Use `settle_return` to
    // tell the two apart.
    pub fn return_bike(&self, bike_id: &str) -> bool {
        self.settle_return(bike_id).is_some()
    }

    pub fn bike(&self, bike_id: &str) -> Option<Bike> {
        self.repository.find_by_id(bike_id)
    }

    pub fn available_bikes(&self) -> Vec<Bike> {
        self.repository
            .find_all()
            .into_iter()
            .filter(Bike::is_available)
            .collect()
    }
}
