//! Game state owned by the turn engine.
//!
//! ## GameState
//!
//! Seated players, the active seat, the turn counter, the shared draw pile
//! and the turn history. The history is an `im::Vector` so snapshots handed
//! out for display share structure with the live state.
//!
//! ## TurnPhase
//!
//! Where the active player is within their turn:
//! `IncomeDraw -> ActionChoice -> DrawBranch | BuildBranch -> HandLimit
//! -> ScoreUpdate -> NextPlayer`.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::config::TurnCounting;
use super::player::{PlayerId, PlayerMap, PlayerState};
use crate::cards::CardName;
use crate::zones::DrawPile;

/// Step of the active player's turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnPhase {
    /// Draw cards equal to city money.
    #[default]
    IncomeDraw,
    /// The controller picks draw or build.
    ActionChoice,
    /// Draw the branch cards and discard most of them.
    DrawBranch,
    /// Build one card from hand.
    BuildBranch,
    /// Discard down to the hand cap.
    HandLimit,
    /// Refresh cached points.
    ScoreUpdate,
    /// Pass to the next seat.
    NextPlayer,
}

/// What a player did with their action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnAction {
    /// Drew the branch cards and kept `kept` of them.
    Draw { kept: usize },
    /// Built `card`, spending `cost` cards.
    Build { card: CardName, cost: u32 },
    /// The deck ran out before the action finished.
    Interrupted,
}

/// One completed turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    /// Turn counter when the turn started.
    pub turn: u32,
    /// Acting player.
    pub player: PlayerId,
    /// Cards drawn as income.
    pub income: u32,
    /// The action taken.
    pub action: TurnAction,
    /// Cards discarded to the hand cap.
    pub capped: usize,
    /// Points after the turn.
    pub points: u32,
}

/// Complete game state.
#[derive(Clone, Debug, Serialize)]
pub struct GameState {
    /// Seated players in join order.
    pub players: PlayerMap<PlayerState>,

    /// Active seat.
    pub current: PlayerId,

    /// Turn counter, starting at 0.
    pub turn: u32,

    /// Shared draw and discard piles.
    pub pile: DrawPile,

    /// Step of the active turn.
    pub phase: TurnPhase,

    /// Completed turns, oldest first.
    pub history: Vector<TurnRecord>,

    exhausted: bool,
}

impl GameState {
    /// Create a state with no players around `pile`.
    #[must_use]
    pub fn new(pile: DrawPile) -> Self {
        Self {
            players: PlayerMap::default(),
            current: PlayerId::new(0),
            turn: 0,
            pile,
            phase: TurnPhase::default(),
            history: Vector::new(),
            exhausted: false,
        }
    }

    /// Get player count.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.player_count()
    }

    /// Get a player.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> &PlayerState {
        &self.players[id]
    }

    /// Cards across the pile, every hand and every city.
    ///
    /// Constant for the lifetime of a game.
    #[must_use]
    pub fn total_cards(&self) -> usize {
        self.pile.remaining() + self.players.values().map(PlayerState::card_count).sum::<usize>()
    }

    /// Check whether a draw has failed for lack of cards.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Record that a draw failed for lack of cards.
    pub fn mark_exhausted(&mut self) {
        self.exhausted = true;
    }

    /// Append a completed turn to the history.
    pub fn record_turn(&mut self, record: TurnRecord) {
        self.history.push_back(record);
    }

    /// Pass play to the next seat and advance the turn counter.
    pub fn advance(&mut self, counting: TurnCounting) {
        let count = self.player_count();
        if count == 0 {
            return;
        }
        self.current = self.current.next(count);
        match counting {
            TurnCounting::PerTurn => self.turn += 1,
            TurnCounting::PerRound => {
                if self.current == PlayerId::new(0) {
                    self.turn += 1;
                }
            }
        }
        self.phase = TurnPhase::IncomeDraw;
    }
}
