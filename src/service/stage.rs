//! Service stages
//!
//! A [`ServiceStage`] is a pool of identical servers fed by one input queue.
//! Every tick it first advances its busy servers, retiring finished
//! customers (bars) or routing them on to a bar (cashier), and then lets
//! every idle server, including one that just freed up, admit the next
//! waiting customer.

use super::{QueueSet, Server, StageTally};
use crate::random::RandomStream;
use crate::simulation::{SimulationError, SimulationResult};
use crate::types::{ProductCatalog, StageKind};
use parking_lot::Mutex;
use tracing::debug;

/// Per-product service rates of one stage, in customers per minute
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceRates {
    rates: Vec<f64>,
    fallback: f64,
}

impl ServiceRates {
    /// Rate table indexed by product, with a rate for products it cannot serve
    pub fn new(rates: Vec<f64>, fallback: f64) -> Self {
        Self { rates, fallback }
    }

    /// Rate for `product`
    ///
    /// Missing, zero, negative or non-finite rates are replaced by the
    /// fallback so a misrouted order still gets a finite service time.
    pub fn rate_for(&self, product: usize) -> f64 {
        match self.rates.get(product) {
            Some(&rate) if rate.is_finite() && rate > 0.0 => rate,
            _ => self.fallback,
        }
    }
}

/// One pool of servers (cashiers, hot bar or cold bar)
#[derive(Debug, Clone)]
pub struct ServiceStage {
    kind: StageKind,
    servers: Vec<Server>,
    rates: ServiceRates,
}

impl ServiceStage {
    /// A stage with `pool_size` idle servers
    pub fn new(kind: StageKind, pool_size: usize, rates: ServiceRates) -> SimulationResult<Self> {
        let mut servers = Vec::new();
        servers
            .try_reserve_exact(pool_size)
            .map_err(|_| SimulationError::allocation("server pool", pool_size))?;
        servers.resize_with(pool_size, Server::new);

        debug!(stage = %kind, pool_size, "Created service stage");
        Ok(Self { kind, servers, rates })
    }

    /// Which stage this is
    pub fn kind(&self) -> StageKind {
        self.kind
    }

    /// The server pool
    pub fn servers(&self) -> &[Server] {
        &self.servers
    }

    /// Servers currently holding a customer
    pub fn busy_count(&self) -> usize {
        self.servers.iter().filter(|s| s.is_busy()).count()
    }

    /// Run one tick of this stage at simulated minute `now`
    ///
    /// Finished cashier customers are stamped and pushed to their bar's
    /// queue; if that queue is full they are counted as abandonments.
    /// Finished bar customers add their product's price to the revenue.
    pub fn step(
        &mut self,
        now: f64,
        tick: f64,
        queues: &QueueSet,
        catalog: &ProductCatalog,
        rng: &Mutex<RandomStream>,
    ) -> StageTally {
        let Self { kind, servers, rates } = self;
        let kind = *kind;
        let input = queues.for_stage(kind);
        let mut tally = StageTally::default();

        for server in servers.iter_mut() {
            if let Some(mut customer) = server.advance(tick) {
                if kind.is_terminal() {
                    tally.revenue += catalog.price(customer.product());
                    tally.completions += 1;
                } else {
                    customer.stamp_checkout(now);
                    let bar = catalog.bar(customer.product());
                    if queues.for_bar(bar).enqueue(customer).is_err() {
                        tally.abandonments += 1;
                    }
                }
            }

            let admitted = server.admit(input, |customer| {
                rng.lock().exponential(rates.rate_for(customer.product()))
            });
            if let Some(customer) = admitted {
                tally.wait_time += now - customer.eligible_since(kind);
            }
        }

        tally
    }
}
