//! One independent replica of the cafe
//!
//! A [`ReplicaDriver`] owns a private [`ReplicaState`] (queues, server pools,
//! random stream, counters) and steps it through a fixed number of ticks.
//! Each tick forks four tasks, arrivals plus the three service stages, over
//! the replica's shared queues and joins them before the next tick starts.

use crate::random::RandomStream;
use crate::service::{QueueSet, ServiceStage, StageTally};
use crate::simulation::{ReplicaOutcome, SimulationPlan, SimulationResult};
use crate::types::{StageKind, TaskOrdering};
use parking_lot::Mutex;
use tracing::{debug, instrument};

/// Where a replica is in its run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplicaPhase {
    /// The next tick to execute
    Running {
        /// Tick index
        tick: usize,
    },
    /// Every tick has run
    Done,
}

/// The mutable state of one replica
#[derive(Debug)]
pub struct ReplicaState {
    index: usize,
    seed: u64,
    rng: Mutex<RandomStream>,
    queues: QueueSet,
    cashier: ServiceStage,
    hot_bar: ServiceStage,
    cold_bar: ServiceStage,
    counters: Mutex<StageTally>,
}

impl ReplicaState {
    /// Idle servers, empty queues and a fresh stream for replica `index`
    pub fn new(plan: &SimulationPlan, index: usize) -> SimulationResult<Self> {
        let config = plan.config();
        let seed = config.replica_seed(index);
        let stage = |kind: StageKind| ServiceStage::new(kind, config.pool_size(kind), plan.rates(kind).clone());

        Ok(Self {
            index,
            seed,
            rng: Mutex::new(RandomStream::new(seed)),
            queues: QueueSet::new(config.queue_capacity)?,
            cashier: stage(StageKind::Cashier)?,
            hot_bar: stage(StageKind::HotBar)?,
            cold_bar: stage(StageKind::ColdBar)?,
            counters: Mutex::new(StageTally::default()),
        })
    }

    /// Replica index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Seed of the replica's stream
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The replica's queues
    pub fn queues(&self) -> &QueueSet {
        &self.queues
    }

    /// A stage's server pool
    pub fn stage(&self, kind: StageKind) -> &ServiceStage {
        match kind {
            StageKind::Cashier => &self.cashier,
            StageKind::HotBar => &self.hot_bar,
            StageKind::ColdBar => &self.cold_bar,
        }
    }

    /// Counters accumulated so far
    pub fn counters(&self) -> StageTally {
        *self.counters.lock()
    }

    /// Customers waiting in a queue or held by a server
    pub fn in_system(&self) -> usize {
        self.queues.total_len()
            + StageKind::ALL.iter().map(|&kind| self.stage(kind).busy_count()).sum::<usize>()
    }

    /// Final counters of the replica
    pub fn outcome(&self) -> ReplicaOutcome {
        let counters = self.counters();
        ReplicaOutcome {
            replica: self.index,
            seed: self.seed,
            revenue: counters.revenue,
            wait_time: counters.wait_time,
            completions: counters.completions,
            abandonments: counters.abandonments,
            arrivals: counters.arrivals,
            in_system: self.in_system() as u64,
        }
    }
}

/// Steps one replica through the horizon
#[derive(Debug)]
pub struct ReplicaDriver<'a> {
    plan: &'a SimulationPlan,
    state: ReplicaState,
    phase: ReplicaPhase,
}

impl<'a> ReplicaDriver<'a> {
    /// Build replica `index` of `plan`
    pub fn new(plan: &'a SimulationPlan, index: usize) -> SimulationResult<Self> {
        let state = ReplicaState::new(plan, index)?;
        let phase = if plan.total_ticks() == 0 { ReplicaPhase::Done } else { ReplicaPhase::Running { tick: 0 } };
        Ok(Self { plan, state, phase })
    }

    /// Current phase
    pub fn phase(&self) -> ReplicaPhase {
        self.phase
    }

    /// The replica's state
    pub fn state(&self) -> &ReplicaState {
        &self.state
    }

    /// Execute one tick and return the new phase
    pub fn step(&mut self) -> ReplicaPhase {
        if let ReplicaPhase::Running { tick } = self.phase {
            self.run_tick(tick);
            let next = tick + 1;
            self.phase = if next < self.plan.total_ticks() {
                ReplicaPhase::Running { tick: next }
            } else {
                ReplicaPhase::Done
            };
        }
        self.phase
    }

    /// Run every remaining tick and report the replica's counters
    #[instrument(skip(self), fields(replica = self.state.index, seed = self.state.seed))]
    pub fn run(mut self) -> ReplicaOutcome {
        while self.step() != ReplicaPhase::Done {}

        let outcome = self.state.outcome();
        debug!(
            arrivals = outcome.arrivals,
            completions = outcome.completions,
            abandonments = outcome.abandonments,
            in_system = outcome.in_system,
            revenue = outcome.revenue,
            "Replica finished"
        );
        outcome
    }

    fn run_tick(&mut self, tick: usize) {
        let plan = self.plan;
        let now = plan.tick_time(tick);
        let dt = plan.tick_minutes();
        let catalog = plan.catalog();
        let arrivals = plan.arrivals();

        let ReplicaState { rng, queues, cashier, hot_bar, cold_bar, counters, .. } = &mut self.state;
        let (rng, queues, counters) = (&*rng, &*queues, &*counters);
        let fold = move |tally: StageTally| counters.lock().merge(&tally);

        match plan.config().ordering {
            TaskOrdering::Concurrent => rayon::scope(move |s| {
                s.spawn(move |_| fold(arrivals.admit(tick, now, queues, rng)));
                s.spawn(move |_| fold(cashier.step(now, dt, queues, catalog, rng)));
                s.spawn(move |_| fold(hot_bar.step(now, dt, queues, catalog, rng)));
                s.spawn(move |_| fold(cold_bar.step(now, dt, queues, catalog, rng)));
            }),
            TaskOrdering::Sequential => {
                fold(arrivals.admit(tick, now, queues, rng));
                fold(cashier.step(now, dt, queues, catalog, rng));
                fold(hot_bar.step(now, dt, queues, catalog, rng));
                fold(cold_bar.step(now, dt, queues, catalog, rng));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ArrivalCurve, SimulationConfig};

    fn plan(config: SimulationConfig) -> SimulationPlan {
        SimulationPlan::new(config).unwrap()
    }

    fn short_config(ordering: TaskOrdering) -> SimulationConfig {
        SimulationConfig { total_minutes: 30.0, replicas: 1, ordering, ..Default::default() }
    }

    #[test]
    fn test_initial_state() {
        let plan = plan(short_config(TaskOrdering::Concurrent));
        let driver = ReplicaDriver::new(&plan, 3).unwrap();

        assert_eq!(driver.phase(), ReplicaPhase::Running { tick: 0 });
        assert_eq!(driver.state().index(), 3);
        assert_eq!(driver.state().seed(), 1_234_567 + 3 * 7_919);
        assert_eq!(driver.state().in_system(), 0);
        assert!(driver.state().counters().is_empty());
        assert_eq!(driver.state().stage(StageKind::Cashier).servers().len(), 2);
        assert_eq!(driver.state().stage(StageKind::HotBar).servers().len(), 2);
        assert_eq!(driver.state().stage(StageKind::ColdBar).servers().len(), 1);
    }

    #[test]
    fn test_phase_advances_to_done() {
        let plan = plan(SimulationConfig { total_minutes: 1.0, ..short_config(TaskOrdering::Concurrent) });
        let mut driver = ReplicaDriver::new(&plan, 0).unwrap();

        assert_eq!(driver.step(), ReplicaPhase::Running { tick: 1 });
        assert_eq!(driver.step(), ReplicaPhase::Running { tick: 2 });
        assert_eq!(driver.step(), ReplicaPhase::Running { tick: 3 });
        assert_eq!(driver.step(), ReplicaPhase::Done);
        // Stepping a finished replica is a no-op
        let before = driver.state().counters();
        assert_eq!(driver.step(), ReplicaPhase::Done);
        assert_eq!(driver.state().counters(), before);
    }

    #[test]
    fn test_conservation_after_each_tick() {
        for ordering in [TaskOrdering::Concurrent, TaskOrdering::Sequential] {
            let plan = plan(short_config(ordering));
            let mut driver = ReplicaDriver::new(&plan, 1).unwrap();

            while driver.step() != ReplicaPhase::Done {
                let counters = driver.state().counters();
                let in_system = driver.state().in_system() as u64;
                assert_eq!(counters.arrivals, counters.completions + counters.abandonments + in_system);
            }
        }
    }

    #[test]
    fn test_sequential_replica_is_reproducible() {
        let plan = plan(short_config(TaskOrdering::Sequential));
        let first = ReplicaDriver::new(&plan, 5).unwrap().run();
        let second = ReplicaDriver::new(&plan, 5).unwrap().run();
        assert_eq!(first, second);
        assert!(first.arrivals > 0);
    }

    #[test]
    fn test_zero_arrivals() {
        let config =
            SimulationConfig { arrivals: ArrivalCurve::constant(0.0), ..short_config(TaskOrdering::Concurrent) };
        let plan = plan(config);
        let outcome = ReplicaDriver::new(&plan, 0).unwrap().run();

        assert_eq!(outcome.arrivals, 0);
        assert_eq!(outcome.completions, 0);
        assert_eq!(outcome.abandonments, 0);
        assert_eq!(outcome.revenue, 0.0);
        assert_eq!(outcome.wait_time, 0.0);
        assert_eq!(outcome.in_system, 0);
    }
}
