//! Game configuration.
//!
//! Rule constants (hand cap, city size that ends the game, turn ceiling,
//! draw-branch sizes) live in `GameConfig` rather than in the engine, so
//! variants can be loaded from JSON or built with the `with_*` methods.

use serde::{Deserialize, Serialize};

/// How the turn counter advances.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnCounting {
    /// Increment after every player's turn.
    #[default]
    PerTurn,
    /// Increment when play wraps back to the first player.
    PerRound,
}

/// Complete game configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Hand size cap enforced at the end of a turn.
    pub max_hand_size: usize,

    /// City size at which the game ends.
    pub city_target: usize,

    /// Turn counter ceiling.
    pub turn_limit: u32,

    /// What the turn counter counts.
    pub turn_counting: TurnCounting,

    /// Cards dealt to each player before the first turn.
    pub starting_hand: usize,

    /// Cards drawn by the draw action.
    pub draw_branch_draws: usize,

    /// How many of the freshly drawn cards must be discarded.
    pub draw_branch_discards: usize,

    /// Rejected controller decisions tolerated in one turn.
    pub max_decision_attempts: u32,

    /// Table capacity.
    pub max_players: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_hand_size: 12,
            city_target: 8,
            turn_limit: 50,
            turn_counting: TurnCounting::PerTurn,
            starting_hand: 5,
            draw_branch_draws: 5,
            draw_branch_discards: 4,
            max_decision_attempts: 8,
            max_players: 6,
        }
    }
}

impl GameConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the hand size cap.
    #[must_use]
    pub fn with_max_hand_size(mut self, max: usize) -> Self {
        self.max_hand_size = max;
        self
    }

    /// Set the city size that ends the game.
    #[must_use]
    pub fn with_city_target(mut self, target: usize) -> Self {
        self.city_target = target;
        self
    }

    /// Set the turn ceiling and what it counts.
    #[must_use]
    pub fn with_turn_limit(mut self, limit: u32, counting: TurnCounting) -> Self {
        self.turn_limit = limit;
        self.turn_counting = counting;
        self
    }

    /// Set the starting hand size.
    #[must_use]
    pub fn with_starting_hand(mut self, size: usize) -> Self {
        self.starting_hand = size;
        self
    }

    /// Set the retry ceiling for rejected decisions.
    #[must_use]
    pub fn with_max_decision_attempts(mut self, attempts: u32) -> Self {
        self.max_decision_attempts = attempts;
        self
    }

    /// Cards kept from the draw action.
    #[must_use]
    pub fn draw_branch_keeps(&self) -> usize {
        self.draw_branch_draws.saturating_sub(self.draw_branch_discards)
    }
}
