// Catalog store: the in-memory owner of every bike record

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::{mapref::entry::Entry, DashMap};

use crate::bike::Bike;

// Keyed storage for bike records
pub trait BikeRepository: Send + Sync {
    // Insert or replace the record with the same id
    fn save(&self, bike: Bike);

    fn find_by_id(&self, bike_id: &str) -> Option<Bike>;

    // All records, oldest insertion first
    fn find_all(&self) -> Vec<Bike>;

    // Returns true if a record was removed. Rental state is not checked.
    fn delete(&self, bike_id: &str) -> bool;

    // Runs `apply` on the stored record while holding its lock, so the
    // read-modify-write cannot interleave with another caller on the same
    // bike. Returns false if there is no such bike.
    //
    // `apply` must not call back into the repository.
    fn update(&self, bike_id: &str, apply: &mut dyn FnMut(&mut Bike)) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug)]
struct StoredBike {
    seq: u64,
    bike: Bike,
}

#[derive(Debug, Default)]
pub struct InMemoryBikeRepository {
    bikes: DashMap<String, StoredBike>,
    next_seq: AtomicU64,
}

impl InMemoryBikeRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BikeRepository for InMemoryBikeRepository {
    fn save(&self, bike: Bike) {
        match self.bikes.entry(bike.id().to_string()) {
            Entry::Occupied(mut entry) => entry.get_mut().bike = bike,
            Entry::Vacant(entry) => {
                let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
                entry.insert(StoredBike { seq, bike });
            }
        }
    }

    fn find_by_id(&self, bike_id: &str) -> Option<Bike> {
        self.bikes.get(bike_id).map(|stored| stored.bike.clone())
    }

    fn find_all(&self) -> Vec<Bike> {
        let mut bikes: Vec<(u64, Bike)> = self
            .bikes
            .iter()
            .map(|stored| (stored.seq, stored.bike.clone()))
            .collect();

        bikes.sort_by_key(|(seq, _)| *seq);
        bikes.into_iter().map(|(_, bike)| bike).collect()
    }

    fn delete(&self, bike_id: &str) -> bool {
        self.bikes.remove(bike_id).is_some()
    }

    fn update(&self, bike_id: &str, apply: &mut dyn FnMut(&mut Bike)) -> bool {
        match self.bikes.get_mut(bike_id) {
            Some(mut stored) => {
                apply(&mut stored.bike);
                true
            }
            None => false,
        }
    }

    fn len(&self) -> usize {
        self.bikes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bike::{MountainBike, RoadBike};
    use chrono::{TimeZone, Utc};
    use std::{sync::Arc, thread};

    fn mountain(model: &str) -> Bike {
        Bike::new(model, 10.0, Arc::new(MountainBike))
    }

    #[test]
    fn test_save_and_find() {
        let repo = InMemoryBikeRepository::new();
        let bike = mountain("Trek Marlin");
        let id = bike.id().to_string();

        repo.save(bike);

        let found = repo.find_by_id(&id).unwrap();
        assert_eq!(found.model(), "Trek Marlin");
        assert!(repo.find_by_id("no-such-bike").is_none());
    }

    #[test]
    fn test_save_is_an_upsert() {
        let repo = InMemoryBikeRepository::new();
        let mut bike = mountain("Trek Marlin");
        let id = bike.id().to_string();

        repo.save(bike.clone());
        bike.rent(Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap());
        repo.save(bike.clone());
        repo.save(bike);

        assert_eq!(repo.len(), 1);
        assert!(!repo.find_by_id(&id).unwrap().is_available());
    }

    #[test]
    fn test_find_all_after_delete_keeps_insertion_order() {
        let orders: [[&str; 3]; 3] = [
            ["trek", "allez", "rad"],
            ["rad", "trek", "allez"],
            ["allez", "rad", "trek"],
        ];

        for order in orders {
            for deleted in 0..3 {
                let repo = InMemoryBikeRepository::new();
                let mut ids = Vec::new();
                for model in order {
                    let bike = Bike::new(model, 12.0, Arc::new(RoadBike));
                    ids.push(bike.id().to_string());
                    repo.save(bike);
                }

                assert!(repo.delete(&ids[deleted]));
                assert!(!repo.delete(&ids[deleted]));

                let expected: Vec<&str> = order
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != deleted)
                    .map(|(_, model)| *model)
                    .collect();
                let models: Vec<String> =
                    repo.find_all().iter().map(|b| b.model().to_string()).collect();
                assert_eq!(models, expected, "order {order:?}, deleted index {deleted}");
            }
        }
    }

    #[test]
    fn test_resaving_keeps_original_position() {
        let repo = InMemoryBikeRepository::new();
        let first = mountain("first");
        repo.save(first.clone());
        repo.save(mountain("second"));
        repo.save(first);

        let models: Vec<String> = repo.find_all().iter().map(|b| b.model().to_string()).collect();
        assert_eq!(models, vec!["first", "second"]);
    }

    #[test]
    fn test_update_missing_bike() {
        let repo = InMemoryBikeRepository::new();
        let mut called = false;
        assert!(!repo.update("missing", &mut |_bike: &mut Bike| called = true));
        assert!(!called);
        assert!(repo.is_empty());
    }

    #[test]
    fn test_concurrent_rent_has_one_winner() {
        let repo = Arc::new(InMemoryBikeRepository::new());
        let bike = mountain("Trek Marlin");
        let id = bike.id().to_string();
        repo.save(bike);

        let start = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let repo = repo.clone();
                let id = id.clone();
                thread::spawn(move || {
                    let mut rented = false;
                    repo.update(&id, &mut |bike: &mut Bike| rented = bike.rent(start));
                    rented
                })
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .filter(|rented| *rented)
            .count();

        assert_eq!(winners, 1);
    }
}
