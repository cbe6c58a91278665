//! Random number generation
//!
//! Every replica owns one [`RandomStream`] seeded from the base seed and its
//! replica index. All randomness of a replica goes through that stream.

pub mod stream;

pub use stream::*;
