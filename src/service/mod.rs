//! The cafe's service network
//!
//! Customers enter through [`ArrivalProcess`], wait in a [`BoundedQueue`] for
//! the cashier [`ServiceStage`], and are then routed to the hot or cold bar
//! stage depending on what they ordered.

pub mod arrivals;
pub mod customer;
pub mod queue;
pub mod server;
pub mod stage;
pub mod tally;

pub use arrivals::*;
pub use customer::*;
pub use queue::*;
pub use server::*;
pub use stage::*;
pub use tally::*;
