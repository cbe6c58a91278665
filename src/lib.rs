//! Cafe Queue Simulator
//!
//! A Monte-Carlo simulation of a cafe: customers arrive, queue for a
//! cashier, and are then served at a hot or cold drinks bar depending on
//! what they ordered. Many independent replicas run in parallel and their
//! results are reduced into a handful of headline metrics.
//!
//! # Overview
//!
//! Time advances in fixed ticks. Every tick of every replica forks four
//! tasks that share the replica's three bounded queues:
//!
//! - **Arrivals**: Poisson arrivals at a time-varying rate with a rush window,
//!   followed by threshold-based abandonment on every queue
//! - **Cashier stage**: takes payment and routes each order to its bar
//! - **Hot bar stage** and **cold bar stage**: prepare drinks and book revenue
//!
//! The tasks join before the next tick starts. Replicas never share state;
//! their outcomes are folded into global totals once all have finished.
//!
//! ## Quick Start
//!
//! ```rust
//! use cafe_queue_simulator::*;
//!
//! let config = SimulationConfig {
//!     replicas: 4,
//!     total_minutes: 60.0,
//!     ..Default::default()
//! };
//!
//! let report = SimulationOrchestrator::new(config)?.run()?;
//! println!("{}", report);
//! assert!(report.metrics.abandonment_rate >= 0.0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`types`]: stages, product catalog, arrival curve, identifiers and configuration
//! - [`random`]: per-replica random stream and the distributions drawn from it
//! - [`service`]: customers, bounded queues, servers, service stages and arrivals
//! - [`simulation`]: replica driver, orchestration, statistics, logging and errors
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────── SimulationOrchestrator ────────────────────────┐
//! │  rayon pool: replica 0 │ replica 1 │ ... │ replica R-1                 │
//! └──────────┬─────────────────────────────────────────────────────────────┘
//!            │ per tick: rayon::scope
//!            ▼
//!   Arrivals ──► cashier queue ──► Cashier ──┬──► hot queue ──► Hot bar
//!                                            └──► cold queue ─► Cold bar
//!            │
//!            ▼
//!   ReplicaOutcome ──► GlobalTotals ──► SummaryMetrics
//! ```
#![warn(missing_docs, missing_debug_implementations, unreachable_pub)]

// Module declarations
pub mod random;
pub mod service;
pub mod simulation;
pub mod types;

// Core types and configuration
pub use types::{
    ArrivalCurve, Bar, ConfigError, ConfigValidationError, OutputFormat, Product, ProductCatalog,
    RunId, SimulationConfig, StageKind, TaskOrdering,
};

// Randomness
pub use random::RandomStream;

// Service network
pub use service::{ArrivalProcess, BoundedQueue, Customer, QueueSet, Server, ServiceRates, ServiceStage, StageTally};

// Simulation types and functionality
pub use simulation::{
    GlobalTotals, LoggingConfig, ReplicaDriver, ReplicaOutcome, ReplicaPhase, SimulationError,
    SimulationOrchestrator, SimulationPlan, SimulationReport, SimulationResult, SummaryMetrics,
};
