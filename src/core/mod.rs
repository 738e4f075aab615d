//! Core engine types: players, state, RNG, configuration, errors.
//!
//! These are the building blocks every other module works with. Rule
//! variants are expressed through `GameConfig` rather than by changing the
//! engine.

pub mod player;
pub mod rng;
pub mod config;
pub mod error;
pub mod state;

pub use player::{PlayerId, PlayerMap, PlayerState};
pub use rng::GameRng;
pub use config::{GameConfig, TurnCounting};
pub use error::{CatalogError, GameError, SelectionFault};
pub use state::{GameState, TurnAction, TurnPhase, TurnRecord};
