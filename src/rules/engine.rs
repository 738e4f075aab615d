//! Turn engine: phase sequencing, end detection and final standings.
//!
//! One call to `play_turn` runs the active player through
//! `IncomeDraw -> ActionChoice -> DrawBranch | BuildBranch -> HandLimit
//! -> ScoreUpdate -> NextPlayer`. Every decision comes from the seat's
//! `Controller` and is validated before anything moves.
//!
//! ## Rejected decisions
//!
//! A rejected build (bad target, unaffordable, bad payment) or a declined
//! target returns the player to the action choice. A bad discard selection
//! is asked for again. Each rejection counts against
//! `GameConfig::max_decision_attempts` for the turn; reaching it fails the
//! game with `GameError::DecisionLimit`.
//!
//! ## Deck exhaustion
//!
//! A draw that finds both piles empty ends the game. Cards drawn before
//! that stay in hand, the turn is recorded as interrupted, and the next
//! `end_condition` check reports `EndReason::DeckExhausted`.

use im::Vector;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cards::{CardCatalog, CardName};
use crate::core::{
    GameConfig, GameError, GameRng, GameState, PlayerId, PlayerState, TurnAction, TurnPhase,
    TurnRecord,
};
use crate::zones::DrawPile;

use super::build::{BuildReceipt, Selection};
use super::controller::{ActionChoice, Controller, DiscardReason, DiscardRequest, GameView};

/// Why a game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum EndReason {
    /// A city reached the target size.
    CityComplete { player: PlayerId },
    /// A draw found both piles empty.
    DeckExhausted,
    /// The turn counter reached its ceiling.
    TurnLimit,
}

impl std::fmt::Display for EndReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EndReason::CityComplete { player } => write!(f, "{player} completed their city"),
            EndReason::DeckExhausted => write!(f, "the deck ran out"),
            EndReason::TurnLimit => write!(f, "the turn limit was reached"),
        }
    }
}

/// A player's final result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Standing {
    pub player: PlayerId,
    pub name: String,
    pub points: u32,
    pub money: u32,
    pub city: Vec<CardName>,
}

/// Outcome of a finished game.
#[derive(Clone, Debug, Serialize)]
pub struct GameReport {
    pub reason: EndReason,
    /// Ranked by points, highest first. Ties keep seat order.
    pub standings: Vec<Standing>,
    /// Turn counter at the end.
    pub turns: u32,
    pub history: Vector<TurnRecord>,
}

impl GameReport {
    /// The top-ranked player.
    #[must_use]
    pub fn winner(&self) -> Option<&Standing> {
        self.standings.first()
    }
}

/// Runs a game between seated controllers.
pub struct TurnEngine<'a> {
    catalog: &'a CardCatalog,
    config: GameConfig,
    state: GameState,
    rng: GameRng,
    controllers: Vec<Box<dyn Controller + 'a>>,
}

impl<'a> TurnEngine<'a> {
    /// Create an engine with a freshly shuffled pile built from `catalog`.
    pub fn new(catalog: &'a CardCatalog, config: GameConfig, seed: u64) -> Self {
        let mut rng = GameRng::new(seed);
        let pile = DrawPile::from_catalog(catalog, &mut rng);
        Self::with_pile(catalog, config, pile, rng)
    }

    /// Create an engine around a prepared pile.
    pub fn with_pile(catalog: &'a CardCatalog, config: GameConfig, pile: DrawPile, rng: GameRng) -> Self {
        Self {
            catalog,
            config,
            state: GameState::new(pile),
            rng,
            controllers: Vec::new(),
        }
    }

    /// Seat a player and deal their starting hand.
    pub fn add_player(
        &mut self,
        name: impl Into<String>,
        controller: impl Controller + 'a,
    ) -> Result<PlayerId, GameError> {
        let id = self.seat(PlayerState::new(name), controller)?;
        self.draw_into(id, self.config.starting_hand);
        Ok(id)
    }

    /// Seat a player exactly as given, without dealing.
    pub fn seat(&mut self, player: PlayerState, controller: impl Controller + 'a) -> Result<PlayerId, GameError> {
        if self.state.player_count() >= self.config.max_players {
            return Err(GameError::TableFull {
                max: self.config.max_players,
            });
        }
        debug!(name = %player.name, "player seated");
        self.controllers.push(Box::new(controller));
        Ok(self.state.players.push(player))
    }

    /// Get the catalog.
    #[must_use]
    pub fn catalog(&self) -> &'a CardCatalog {
        self.catalog
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Get the game state.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Why the game is over, or `None` if it continues.
    #[must_use]
    pub fn end_condition(&self) -> Option<EndReason> {
        if let Some((player, _)) = self
            .state
            .players
            .iter()
            .find(|(_, p)| p.city().len() >= self.config.city_target)
        {
            return Some(EndReason::CityComplete { player });
        }
        if self.state.is_exhausted() {
            return Some(EndReason::DeckExhausted);
        }
        if self.state.turn >= self.config.turn_limit {
            return Some(EndReason::TurnLimit);
        }
        None
    }

    /// Play turns until an end condition holds.
    pub fn run(&mut self) -> Result<GameReport, GameError> {
        if self.state.players.is_empty() {
            return Err(GameError::NoPlayers);
        }
        info!(
            players = self.state.player_count(),
            seed = self.rng.seed(),
            cards = self.state.total_cards(),
            "game started"
        );

        let reason = loop {
            if let Some(reason) = self.end_condition() {
                break reason;
            }
            self.play_turn()?;
        };

        for player in self.state.players.values_mut() {
            player.refresh_points(self.catalog);
        }
        let report = self.report(reason);
        if let Some(winner) = report.winner() {
            info!(%reason, turns = report.turns, winner = %winner.name, points = winner.points, "game over");
        }
        Ok(report)
    }

    /// Play the active player's turn.
    ///
    /// Returns the turn's record. Deck exhaustion is not an error here: it
    /// interrupts the turn and is reported by `end_condition`.
    pub fn play_turn(&mut self) -> Result<TurnRecord, GameError> {
        if self.state.players.is_empty() {
            return Err(GameError::NoPlayers);
        }
        let id = self.state.current;
        let turn = self.state.turn;

        self.state.phase = TurnPhase::IncomeDraw;
        let income = self.state.players[id].compute_money(self.catalog);
        debug!(player = %id, turn, income, "income draw");
        if !self.draw_into(id, income as usize) {
            return Ok(self.interrupt(id, turn, income));
        }

        let mut rejected = 0;
        let action = loop {
            self.state.phase = TurnPhase::ActionChoice;
            let choice = {
                let view = GameView {
                    catalog: self.catalog,
                    config: &self.config,
                    state: &self.state,
                    player: id,
                };
                self.controllers[id.index()].choose_action(&view, &mut self.rng)
            };

            match choice {
                ActionChoice::Draw => {
                    self.state.phase = TurnPhase::DrawBranch;
                    match self.draw_branch(id, &mut rejected)? {
                        Some(kept) => break TurnAction::Draw { kept },
                        None => return Ok(self.interrupt(id, turn, income)),
                    }
                }
                ActionChoice::Build => {
                    self.state.phase = TurnPhase::BuildBranch;
                    match self.build_branch(id) {
                        Ok(Some(receipt)) => {
                            break TurnAction::Build {
                                card: receipt.card,
                                cost: receipt.cost,
                            }
                        }
                        Ok(None) => {
                            debug!(player = %id, "build declined");
                            self.reject(&mut rejected)?;
                        }
                        Err(err) if err.is_recoverable() => {
                            warn!(player = %id, %err, "build rejected");
                            self.reject(&mut rejected)?;
                        }
                        Err(err) => return Err(err),
                    }
                }
            }
        };

        self.state.phase = TurnPhase::HandLimit;
        let attempts = self.config.max_decision_attempts.saturating_sub(rejected).max(1);
        let capped = {
            let catalog = self.catalog;
            let controller = &mut self.controllers[id.index()];
            let rng = &mut self.rng;
            let state = &mut self.state;
            state.players[id]
                .enforce_hand_limit(self.config.max_hand_size, attempts, &mut state.pile, |player, count| {
                    let reason = DiscardReason::HandLimit;
                    let request = DiscardRequest {
                        catalog,
                        player,
                        candidates: player.hand(),
                        count,
                        reason: &reason,
                    };
                    controller.choose_discard_set(&request, rng)
                })?
                .len()
        };

        self.state.phase = TurnPhase::ScoreUpdate;
        let points = self.state.players[id].refresh_points(self.catalog);

        let record = TurnRecord {
            turn,
            player: id,
            income,
            action,
            capped,
            points,
        };
        debug!(player = %id, turn, action = ?record.action, capped, points, "turn complete");
        self.state.record_turn(record.clone());

        self.state.phase = TurnPhase::NextPlayer;
        self.state.advance(self.config.turn_counting);
        Ok(record)
    }

    /// Players ranked by current points, ties in seat order.
    #[must_use]
    pub fn standings(&self) -> Vec<Standing> {
        let mut standings: Vec<Standing> = self
            .state
            .players
            .iter()
            .map(|(player, state)| Standing {
                player,
                name: state.name.clone(),
                points: state.compute_points(self.catalog),
                money: state.compute_money(self.catalog),
                city: state.city().to_vec(),
            })
            .collect();
        standings.sort_by(|a, b| b.points.cmp(&a.points));
        standings
    }

    fn report(&self, reason: EndReason) -> GameReport {
        GameReport {
            reason,
            standings: self.standings(),
            turns: self.state.turn,
            history: self.state.history.clone(),
        }
    }

    /// Draw `count` cards into a hand. Returns `false` if the deck ran out.
    fn draw_into(&mut self, id: PlayerId, count: usize) -> bool {
        for _ in 0..count {
            match self.state.pile.draw_one(&mut self.rng) {
                Ok(card) => self.state.players[id].receive(card),
                Err(_) => {
                    warn!(player = %id, "deck exhausted");
                    self.state.mark_exhausted();
                    return false;
                }
            }
        }
        true
    }

    /// Draw the branch cards and discard the required number of them.
    ///
    /// Returns how many were kept, or `None` if the deck ran out.
    fn draw_branch(&mut self, id: PlayerId, rejected: &mut u32) -> Result<Option<usize>, GameError> {
        let before = self.state.players[id].hand().len();
        if !self.draw_into(id, self.config.draw_branch_draws) {
            return Ok(None);
        }
        let fresh = self.state.players[id].hand().len() - before;
        let required = self.config.draw_branch_discards.min(fresh);

        loop {
            let selection = {
                let player = &self.state.players[id];
                let hand = player.hand();
                let reason = DiscardReason::DrawBranch;
                let request = DiscardRequest {
                    catalog: self.catalog,
                    player,
                    candidates: &hand[hand.len() - fresh..],
                    count: required,
                    reason: &reason,
                };
                self.controllers[id.index()].choose_discard_set(&request, &mut self.rng)
            };

            let state = &mut self.state;
            match state.players[id].discard_recent(fresh, &selection, required, &mut state.pile) {
                Ok(discarded) => {
                    debug!(player = %id, drawn = fresh, discarded = discarded.len(), "draw branch");
                    return Ok(Some(fresh - required));
                }
                Err(err) => {
                    warn!(player = %id, %err, "draw discard rejected");
                    self.reject(rejected)?;
                }
            }
        }
    }

    /// Ask for a target and payment, then build.
    ///
    /// `Ok(None)` means the controller declined to name a target.
    fn build_branch(&mut self, id: PlayerId) -> Result<Option<BuildReceipt>, GameError> {
        let target = {
            let view = GameView {
                catalog: self.catalog,
                config: &self.config,
                state: &self.state,
                player: id,
            };
            self.controllers[id.index()].choose_build_target(&view, &mut self.rng)
        };
        let Some(target) = target else {
            return Ok(None);
        };

        let cost = self.state.players[id].compute_build_cost(target.as_str(), self.catalog)?;
        let chosen: Selection = if cost == 0 {
            Selection::new()
        } else {
            let player = &self.state.players[id];
            let reason = DiscardReason::BuildPayment { target: target.clone() };
            let request = DiscardRequest {
                catalog: self.catalog,
                player,
                candidates: player.hand(),
                count: cost as usize,
                reason: &reason,
            };
            self.controllers[id.index()].choose_discard_set(&request, &mut self.rng)
        };

        let state = &mut self.state;
        let receipt = state.players[id].execute_build(target.as_str(), &chosen, self.catalog, &mut state.pile)?;
        Ok(Some(receipt))
    }

    fn reject(&self, rejected: &mut u32) -> Result<(), GameError> {
        *rejected += 1;
        if *rejected >= self.config.max_decision_attempts {
            return Err(GameError::DecisionLimit { attempts: *rejected });
        }
        Ok(())
    }

    fn interrupt(&mut self, id: PlayerId, turn: u32, income: u32) -> TurnRecord {
        let points = self.state.players[id].refresh_points(self.catalog);
        let record = TurnRecord {
            turn,
            player: id,
            income,
            action: TurnAction::Interrupted,
            capped: 0,
            points,
        };
        self.state.record_turn(record.clone());
        record
    }
}
