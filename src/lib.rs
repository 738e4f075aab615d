//! # city-deck
//!
//! Engine for a turn-based city-building card game.
//!
//! Players share one draw pile. Each turn a player draws income equal to
//! their city's money, then either draws a handful of cards and keeps one,
//! or builds a card from hand by spending other hand cards as its price.
//! Built cards score points and income, some through color bonuses summed
//! across the city. The game ends when a city is complete, the deck runs
//! out, or the turn ceiling is reached.
//!
//! ## Design Principles
//!
//! 1. **Validate, then mutate**: every build and discard is checked in full
//!    before any card moves, so a rejected decision changes nothing.
//!
//! 2. **One randomness source**: all shuffles and AI coin flips come from a
//!    single seeded `GameRng`; a seed reproduces a whole game.
//!
//! 3. **Configuration over constants**: hand cap, city size, turn ceiling
//!    and draw sizes live in `GameConfig`; cards live in a JSON catalog.
//!
//! ## Modules
//!
//! - `core`: Players, game state, RNG, configuration, errors
//! - `cards`: Card definitions and the catalog
//! - `zones`: The shared draw and discard piles
//! - `rules`: Scoring, building, the controller seam and the turn engine
//! - `ai`: Personality-driven computer controller
//! - `tournament`: Repeated AI games for comparing personalities

pub mod core;
pub mod cards;
pub mod zones;
pub mod rules;
pub mod ai;
pub mod tournament;

// Re-export commonly used types
pub use crate::core::{
    CatalogError, GameConfig, GameError, GameRng, GameState, PlayerId, PlayerMap, PlayerState,
    SelectionFault, TurnAction, TurnCounting, TurnPhase, TurnRecord,
};

pub use crate::cards::{CardCatalog, CardDefinition, CardName, Color, ColorBonus, Formula};

pub use crate::zones::DrawPile;

pub use crate::rules::{
    ActionChoice, BonusResolver, BuildReceipt, Controller, DiscardReason, DiscardRequest,
    EndReason, GameReport, GameView, ScriptedController, Selection, Standing, TurnEngine, Yield,
};

pub use crate::ai::{AiPolicy, Personality, Weights};

pub use crate::tournament::{run_battle, BattleConfig, BattleReport, PersonalityRecord};
