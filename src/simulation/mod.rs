//! Simulation orchestration and control
//!
//! # Overview
//!
//! - **SimulationPlan**: validated configuration plus precomputed rate tables
//! - **ReplicaDriver**: steps one private replica tick by tick
//! - **SimulationOrchestrator**: runs all replicas in parallel and reduces them
//! - **SimulationReport**: totals, derived metrics and per-replica outcomes
//! - **SimulationError**: setup failures
//!
//! # Usage Example
//!
//! ```rust
//! use cafe_queue_simulator::simulation::*;
//! use cafe_queue_simulator::types::*;
//!
//! let config = SimulationConfig {
//!     replicas: 2,
//!     total_minutes: 30.0,
//!     ordering: TaskOrdering::Sequential,
//!     ..Default::default()
//! };
//!
//! let report = SimulationOrchestrator::new(config).unwrap().run().unwrap();
//! assert_eq!(report.outcomes.len(), 2);
//! assert!(report.is_conserved());
//! ```

pub mod error;
pub mod logging;
pub mod orchestrator;
pub mod plan;
pub mod replica;
pub mod statistics;

// Re-export all public types for convenience
pub use error::*;
pub use logging::*;
pub use orchestrator::*;
pub use plan::*;
pub use replica::*;
pub use statistics::*;
