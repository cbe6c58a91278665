//! Core types and configuration for the cafe simulator
//!
//! This module contains the fundamental data types shared by every other
//! module:
//!
//! - **Enums**: service stages, bars, task ordering and output formats
//! - **Catalog**: products with prices, order mix and service rates, plus the
//!   arrival-rate curve
//! - **Identifiers**: UUID-based run identifiers
//! - **Configuration**: simulation configuration with validation and CLI support
//!
//! # Usage Example
//!
//! ```rust
//! use cafe_queue_simulator::types::*;
//!
//! let config = SimulationConfig {
//!     replicas: 4,
//!     arrivals: ArrivalCurve::constant(1.5),
//!     ..Default::default()
//! };
//! config.validate().unwrap();
//! assert_eq!(config.total_ticks(), 720);
//! ```

pub mod catalog;
pub mod config;
pub mod enums;
pub mod identifiers;

// Re-export all public types for convenience
pub use catalog::*;
pub use config::*;
pub use enums::*;
pub use identifiers::*;
