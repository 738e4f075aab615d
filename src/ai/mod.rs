//! Computer players.
//!
//! `AiPolicy` implements `Controller` using a `Personality`'s weights and
//! a difficulty that blends the best choice with a random one.

pub mod personality;
pub mod policy;

pub use personality::{Personality, Weights};
pub use policy::AiPolicy;
