//! Error types for the engine and the card catalog.
//!
//! Every rejected action is reported as a `GameError`. Most kinds are
//! recoverable: the engine rejects the decision and asks the controller
//! again. `DeckExhausted` ends the game.

use thiserror::Error;

use crate::cards::CardName;

/// Why a set of chosen hand indices was rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SelectionFault {
    #[error("expected {expected} card(s), got {got}")]
    WrongCount { expected: usize, got: usize },
    #[error("index {index} is out of range for {len} card(s)")]
    OutOfRange { index: usize, len: usize },
    #[error("index {0} chosen more than once")]
    Duplicate(usize),
    #[error("every copy of the card being built was chosen as payment")]
    ConsumesTarget,
}

/// Errors raised by game operations.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("unknown card: {0}")]
    UnknownCard(CardName),
    #[error("card not in hand: {0}")]
    NotInHand(CardName),
    #[error("not enough cards to build {card}: short by {shortfall}")]
    InsufficientHand { card: CardName, shortfall: usize },
    #[error("{prerequisite} must be built before {card}")]
    PrerequisiteUnmet { card: CardName, prerequisite: CardName },
    #[error("invalid selection: {0}")]
    InvalidSelection(#[from] SelectionFault),
    #[error("no cards left to draw")]
    DeckExhausted,
    #[error("controller made {attempts} rejected decisions in one turn")]
    DecisionLimit { attempts: u32 },
    #[error("the game has no players")]
    NoPlayers,
    #[error("the table is full ({max} players)")]
    TableFull { max: usize },
    #[error("needs at least {min} players, got {got}")]
    TooFewPlayers { min: usize, got: usize },
}

impl GameError {
    /// Check whether the turn can continue after this error.
    ///
    /// Recoverable errors reject one decision and return control to the
    /// controller.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            GameError::UnknownCard(_)
                | GameError::NotInHand(_)
                | GameError::InsufficientHand { .. }
                | GameError::PrerequisiteUnmet { .. }
                | GameError::InvalidSelection(_)
        )
    }
}

/// Errors raised while loading a card catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("card defined twice: {0}")]
    DuplicateCard(CardName),
    #[error("{card} refers to unknown card {reference}")]
    MissingReference { card: CardName, reference: CardName },
}
