//! Decision seam between the turn engine and whoever plays a seat.
//!
//! The engine never decides anything for a player. At each choice point it
//! hands a `Controller` a read-only view and validates what comes back:
//!
//! - `choose_action`: draw or build
//! - `choose_build_target`: which card to build
//! - `choose_discard_set`: which hand indices to give up
//!
//! `AiPolicy` is the computer implementation. `ScriptedController` replays
//! fixed answers and is used by tests and tooling.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::cards::{CardCatalog, CardName};
use crate::core::{GameConfig, GameRng, GameState, PlayerId, PlayerState};

use super::build::Selection;

// =============================================================================
// Decisions
// =============================================================================

/// The two actions available each turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionChoice {
    /// Draw the branch cards, keep a few.
    Draw,
    /// Build a card from hand.
    Build,
}

/// Why cards are being discarded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiscardReason {
    /// Paying for `target`. Candidates are the whole hand.
    BuildPayment { target: CardName },
    /// Throwing back freshly drawn cards. Candidates are only those cards.
    DrawBranch,
    /// Hand is over the cap. Candidates are the whole hand.
    HandLimit,
}

/// A request for exactly `count` indices into `candidates`.
#[derive(Clone, Copy, Debug)]
pub struct DiscardRequest<'a> {
    pub catalog: &'a CardCatalog,
    /// The deciding player.
    pub player: &'a PlayerState,
    pub candidates: &'a [CardName],
    pub count: usize,
    pub reason: &'a DiscardReason,
}

// =============================================================================
// Game View
// =============================================================================

/// Read-only snapshot given to a controller.
#[derive(Clone, Copy, Debug)]
pub struct GameView<'a> {
    pub catalog: &'a CardCatalog,
    pub config: &'a GameConfig,
    pub state: &'a GameState,
    /// The deciding player.
    pub player: PlayerId,
}

impl<'a> GameView<'a> {
    /// The deciding player's state.
    #[must_use]
    pub fn me(&self) -> &'a PlayerState {
        self.state.player(self.player)
    }

    /// Cards the deciding player can build now, with their costs.
    #[must_use]
    pub fn buildable(&self) -> Vec<(CardName, u32)> {
        self.me().buildable_cards(self.catalog)
    }
}

// =============================================================================
// Controller
// =============================================================================

/// Makes every decision for one seat.
///
/// Answers are validated by the engine. A rejected build returns the
/// player to the action choice and a rejected discard is asked for again.
/// Too many rejections in one turn end the game with `DecisionLimit`.
pub trait Controller: Send {
    /// Pick draw or build.
    fn choose_action(&mut self, view: &GameView<'_>, rng: &mut GameRng) -> ActionChoice;

    /// Pick a card to build, or `None` to go back to the action choice.
    fn choose_build_target(&mut self, view: &GameView<'_>, rng: &mut GameRng) -> Option<CardName>;

    /// Pick `request.count` distinct indices into `request.candidates`.
    fn choose_discard_set(&mut self, request: &DiscardRequest<'_>, rng: &mut GameRng) -> Selection;
}

/// Replays queued answers.
///
/// When a queue runs dry it falls back to drawing, declining to build, and
/// discarding the first `count` candidates.
#[derive(Clone, Debug, Default)]
pub struct ScriptedController {
    actions: VecDeque<ActionChoice>,
    targets: VecDeque<CardName>,
    discards: VecDeque<Selection>,
}

impl ScriptedController {
    /// Create a controller with empty queues.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an action.
    #[must_use]
    pub fn then_action(mut self, action: ActionChoice) -> Self {
        self.actions.push_back(action);
        self
    }

    /// Queue a build: the build action followed by its target.
    #[must_use]
    pub fn then_build(mut self, card: impl Into<CardName>) -> Self {
        self.actions.push_back(ActionChoice::Build);
        self.targets.push_back(card.into());
        self
    }

    /// Queue a discard selection.
    #[must_use]
    pub fn then_discard(mut self, indices: &[usize]) -> Self {
        self.discards.push_back(indices.iter().copied().collect());
        self
    }

    /// Answers not yet consumed, across all queues.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.actions.len() + self.targets.len() + self.discards.len()
    }
}

impl Controller for ScriptedController {
    fn choose_action(&mut self, _view: &GameView<'_>, _rng: &mut GameRng) -> ActionChoice {
        self.actions.pop_front().unwrap_or(ActionChoice::Draw)
    }

    fn choose_build_target(&mut self, _view: &GameView<'_>, _rng: &mut GameRng) -> Option<CardName> {
        self.targets.pop_front()
    }

    fn choose_discard_set(&mut self, request: &DiscardRequest<'_>, _rng: &mut GameRng) -> Selection {
        self.discards
            .pop_front()
            .unwrap_or_else(|| (0..request.count.min(request.candidates.len())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardDefinition;
    use crate::zones::DrawPile;

    #[test]
    fn test_scripted_replays_in_order() {
        let catalog = CardCatalog::new();
        let config = GameConfig::default();
        let mut state = GameState::new(DrawPile::default());
        state.players.push(PlayerState::new("P"));
        let view = GameView {
            catalog: &catalog,
            config: &config,
            state: &state,
            player: PlayerId::new(0),
        };
        let mut rng = GameRng::new(0);

        let mut controller = ScriptedController::new()
            .then_build("Farm")
            .then_action(ActionChoice::Draw);
        assert_eq!(controller.pending(), 3);

        assert_eq!(controller.choose_action(&view, &mut rng), ActionChoice::Build);
        assert_eq!(controller.choose_build_target(&view, &mut rng), Some("Farm".into()));
        assert_eq!(controller.choose_action(&view, &mut rng), ActionChoice::Draw);

        // Exhausted queues fall back
        assert_eq!(controller.choose_action(&view, &mut rng), ActionChoice::Draw);
        assert_eq!(controller.choose_build_target(&view, &mut rng), None);
    }

    #[test]
    fn test_scripted_discard_fallback() {
        let catalog = CardCatalog::new();
        let player = PlayerState::new("P");
        let candidates: Vec<CardName> = ["A", "B", "C"].into_iter().map(CardName::from).collect();
        let reason = DiscardReason::HandLimit;
        let request = DiscardRequest {
            catalog: &catalog,
            player: &player,
            candidates: &candidates,
            count: 2,
            reason: &reason,
        };
        let mut rng = GameRng::new(0);

        let mut controller = ScriptedController::new().then_discard(&[2, 1]);
        assert_eq!(controller.choose_discard_set(&request, &mut rng).as_slice(), &[2, 1]);
        assert_eq!(controller.choose_discard_set(&request, &mut rng).as_slice(), &[0, 1]);
    }

    #[test]
    fn test_view_of_deciding_seat() {
        let mut catalog = CardCatalog::new();
        catalog.register(CardDefinition::new("Farm").with_supply(2)).unwrap();
        let config = GameConfig::default();
        let mut state = GameState::new(DrawPile::default());
        state.players.push(PlayerState::new("A"));
        state
            .players
            .push(PlayerState::with_cards("B", vec!["Farm".into(), "Farm".into()], vec![]));
        let view = GameView {
            catalog: &catalog,
            config: &config,
            state: &state,
            player: PlayerId::new(1),
        };

        assert_eq!(view.me().name, "B");
        assert_eq!(view.buildable(), vec![(CardName::from("Farm"), 0)]);
    }
}
