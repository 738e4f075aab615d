//! Game rules: scoring, building, the controller seam and the turn engine.
//!
//! - `bonus`: money and points of a city
//! - `build`: build cost, building, discards and the hand cap on `PlayerState`
//! - `controller`: the `Controller` trait every seat is played through
//! - `engine`: `TurnEngine`, which sequences turns and detects the end

pub mod bonus;
pub mod build;
pub mod controller;
pub mod engine;

pub use bonus::{BonusResolver, Yield};
pub use build::{validate_selection, BuildReceipt, Selection};
pub use controller::{
    ActionChoice, Controller, DiscardReason, DiscardRequest, GameView, ScriptedController,
};
pub use engine::{EndReason, GameReport, Standing, TurnEngine};
