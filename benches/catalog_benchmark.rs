use std::{sync::Arc, thread};

use bike_rental::{Bike, BikeRepository, InMemoryBikeRepository, MountainBike};
use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{seq::SliceRandom, thread_rng, Rng};

fn seeded_catalog(size: usize) -> (Arc<InMemoryBikeRepository>, Vec<String>) {
    let repo = Arc::new(InMemoryBikeRepository::new());
    let mut ids = Vec::with_capacity(size);
    for i in 0..size {
        let bike = Bike::new(format!("model-{i}"), 10.0, Arc::new(MountainBike));
        ids.push(bike.id().to_string());
        repo.save(bike);
    }
    (repo, ids)
}

// Mixed rent/return/lookup traffic from several threads
pub fn catalog_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("bike_catalog");

    for size in [100, 1_000, 10_000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let (repo, ids) = seeded_catalog(size);
            let ids = Arc::new(ids);

            b.iter(|| {
                let mut handles = vec![];
                for _ in 0..4 {
                    let repo = Arc::clone(&repo);
                    let ids = Arc::clone(&ids);

                    handles.push(thread::spawn(move || {
                        let mut rng = thread_rng();
                        let mut rented = 0usize;

                        for _ in 0..250 {
                            let Some(id) = ids.choose(&mut rng) else {
                                continue;
                            };

                            if rng.gen_bool(0.3) {
                                let now = Utc::now();
                                repo.update(id, &mut |bike: &mut Bike| {
                                    if !bike.rent(now) {
                                        bike.end_rental(now);
                                    } else {
                                        rented += 1;
                                    }
                                });
                            } else {
                                black_box(repo.find_by_id(id));
                            }
                        }
                        rented
                    }));
                }

                let rented: usize = handles
                    .into_iter()
                    .map(|handle| handle.join().unwrap_or_default())
                    .sum();
                black_box(rented)
            });
        });
    }

    group.finish();
}

fn find_all_benchmark(c: &mut Criterion) {
    let (repo, _) = seeded_catalog(1_000);
    c.bench_function("find_all_1000", |b| b.iter(|| black_box(repo.find_all())));
}

criterion_group!(benches, catalog_benchmark, find_all_benchmark);
criterion_main!(benches);
