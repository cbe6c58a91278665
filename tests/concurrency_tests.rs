//! Tests for the shared-queue concurrency model
//!
//! The four tasks of a tick share three bounded queues. These tests hammer
//! the queues from several rayon tasks and check that nothing is lost or
//! duplicated and that capacity is never exceeded.

use cafe_queue_simulator::service::{BoundedQueue, Customer, QueueSet, StageTally};
use cafe_queue_simulator::simulation::{ReplicaDriver, ReplicaPhase, SimulationPlan};
use cafe_queue_simulator::types::{ArrivalCurve, SimulationConfig, TaskOrdering};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Test that concurrent producers never push a queue past its capacity
#[test]
fn test_capacity_holds_under_contention() {
    let queue = BoundedQueue::with_capacity(32).unwrap();
    let accepted = AtomicUsize::new(0);
    let rejected = AtomicUsize::new(0);

    rayon::scope(|s| {
        for worker in 0..8 {
            let (queue, accepted, rejected) = (&queue, &accepted, &rejected);
            s.spawn(move |_| {
                for i in 0..100 {
                    match queue.enqueue(Customer::new(0.0, worker * 100 + i)) {
                        Ok(()) => accepted.fetch_add(1, Ordering::Relaxed),
                        Err(_) => rejected.fetch_add(1, Ordering::Relaxed),
                    };
                    assert!(queue.len() <= queue.capacity());
                }
            });
        }
    });

    assert_eq!(accepted.load(Ordering::Relaxed), 32);
    assert_eq!(rejected.load(Ordering::Relaxed), 800 - 32);
    assert_eq!(queue.len(), 32);
}

/// Test that producers, consumers and an evicting sweep account for every customer
#[test]
fn test_mixed_operations_conserve_customers() {
    let queues = QueueSet::new(64).unwrap();
    let tally = Mutex::new(StageTally::default());
    let served = AtomicUsize::new(0);

    rayon::scope(|s| {
        let (queues, tally, served) = (&queues, &tally, &served);
        s.spawn(move |_| {
            let mut local = StageTally::default();
            for i in 0..2_000 {
                local.arrivals += 1;
                if queues.cashier.enqueue(Customer::new(i as f64, i % 6)).is_err() {
                    local.abandonments += 1;
                }
            }
            tally.lock().merge(&local);
        });
        s.spawn(move |_| {
            for _ in 0..2_000 {
                if let Some(mut customer) = queues.cashier.dequeue() {
                    customer.stamp_checkout(customer.arrived_at());
                    if queues.hot_bar.enqueue(customer).is_err() {
                        tally.lock().abandonments += 1;
                    }
                }
            }
        });
        s.spawn(move |_| {
            for _ in 0..2_000 {
                if queues.hot_bar.dequeue().is_some() {
                    served.fetch_add(1, Ordering::Relaxed);
                }
            }
        });
        s.spawn(move |_| {
            let mut evicted = 0;
            for _ in 0..200 {
                for queue in queues.iter() {
                    evicted += queue.drain_over(48) as u64;
                }
            }
            tally.lock().abandonments += evicted;
        });
    });

    let tally = *tally.lock();
    let served = served.load(Ordering::Relaxed) as u64;
    assert_eq!(tally.arrivals, 2_000);
    assert_eq!(tally.arrivals, served + tally.abandonments + queues.total_len() as u64);
}

/// Test that concurrent replicas stepped by hand keep their invariants every tick
#[test]
fn test_concurrent_ticks_keep_replica_invariants() {
    let config = SimulationConfig {
        total_minutes: 60.0,
        arrivals: ArrivalCurve::constant(12.0),
        abandonment_threshold: 20,
        queue_capacity: 24,
        ordering: TaskOrdering::Concurrent,
        ..Default::default()
    };
    let plan = SimulationPlan::new(config).unwrap();
    let mut driver = ReplicaDriver::new(&plan, 0).unwrap();

    // The cashiers may route a few customers to a bar after this tick's sweep
    let bound = plan.config().abandonment_threshold + plan.config().cashiers;

    while driver.step() != ReplicaPhase::Done {
        let state = driver.state();
        for queue in state.queues().iter() {
            assert!(queue.len() <= bound, "threshold sweep left {} waiting", queue.len());
        }
        let counters = state.counters();
        assert_eq!(counters.arrivals, counters.completions + counters.abandonments + state.in_system() as u64);
    }

    let outcome = driver.state().outcome();
    assert!(outcome.abandonments > 0);
    assert!(outcome.is_conserved());
}
