//! Arrivals and admission control

use super::{Customer, QueueSet, StageTally};
use crate::random::RandomStream;
use crate::simulation::{SimulationError, SimulationResult};
use crate::types::{ArrivalCurve, ProductCatalog};
use parking_lot::Mutex;

/// Generates the customers of each tick and sheds load from long queues
#[derive(Debug, Clone, PartialEq)]
pub struct ArrivalProcess {
    rates_per_tick: Vec<f64>,
    mix: Vec<f64>,
    tick_minutes: f64,
    threshold: usize,
}

impl ArrivalProcess {
    /// Precompute the arrival rate of every tick of the horizon
    pub fn new(
        curve: &ArrivalCurve,
        catalog: &ProductCatalog,
        total_ticks: usize,
        tick_minutes: f64,
        threshold: usize,
    ) -> SimulationResult<Self> {
        let rates_per_tick = curve
            .per_tick(total_ticks, tick_minutes)
            .map_err(|_| SimulationError::allocation("arrival rate table", total_ticks))?;

        Ok(Self { rates_per_tick, mix: catalog.mix_probabilities(), tick_minutes, threshold })
    }

    /// Customers per minute during tick `tick`; zero past the horizon
    pub fn rate_at(&self, tick: usize) -> f64 {
        self.rates_per_tick.get(tick).copied().unwrap_or(0.0)
    }

    /// Expected arrivals over the whole horizon
    pub fn expected_arrivals(&self) -> f64 {
        self.rates_per_tick.iter().sum::<f64>() * self.tick_minutes
    }

    /// Queue length above which the oldest waiting customers walk out
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Admit this tick's arrivals into the cashier queue, then balk
    ///
    /// All draws for the tick are taken under a single lock of the replica
    /// stream. Arrivals rejected by a full cashier queue and customers
    /// evicted from any queue longer than the threshold both count as
    /// abandonments.
    pub fn admit(
        &self,
        tick: usize,
        now: f64,
        queues: &QueueSet,
        rng: &Mutex<RandomStream>,
    ) -> StageTally {
        let mut tally = StageTally::default();

        let products: Vec<usize> = {
            let mut rng = rng.lock();
            let count = rng.poisson(self.rate_at(tick) * self.tick_minutes);
            (0..count).map(|_| rng.categorical(&self.mix)).collect()
        };

        tally.arrivals = products.len() as u64;
        for product in products {
            if queues.cashier.enqueue(Customer::new(now, product)).is_err() {
                tally.abandonments += 1;
            }
        }

        for queue in queues.iter() {
            tally.abandonments += queue.drain_over(self.threshold) as u64;
        }

        tally
    }
}
