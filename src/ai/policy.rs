//! Personality-weighted computer controller.
//!
//! ## Action choice
//!
//! The legal options are every buildable card plus drawing. Each build is
//! scored as
//!
//! ```text
//! points * Δpoints + money * Δmoney + discount * (price - cost) + safety * margin
//! ```
//!
//! where `margin` is the hand left after paying, and drawing is scored as
//! `safety * margin_after_draw + patience`. Hand margins saturate at a
//! comfortable hand size so safety cannot outweigh every build.
//!
//! ## Difficulty
//!
//! With probability `difficulty` the best-scoring option is taken,
//! otherwise one is picked uniformly. Ties go to catalog order, with
//! drawing last.
//!
//! ## Discards
//!
//! Deterministic. Cards linked to nothing go first: a card is linked when
//! it unlocks or discounts another card in hand, or when its own
//! prerequisite or reductions are already in the city. Within each group
//! the lowest-valued candidates go first, then catalog order.

use std::cmp::Ordering;

use crate::cards::{CardCatalog, CardName};
use crate::core::{GameRng, PlayerState};
use crate::rules::bonus::{BonusResolver, Yield};
use crate::rules::build::Selection;
use crate::rules::controller::{ActionChoice, Controller, DiscardReason, DiscardRequest, GameView};

use super::personality::Personality;

/// Hand size past which extra cards add no safety.
const COMFORT_HAND: usize = 4;

/// Safety per card of margin.
const SAFETY_STEP: f64 = 0.25;

/// Value of each card a card is linked to by prerequisite or reduction.
const LINK_VALUE: f64 = 1.0;

/// Computer controller driven by a personality.
#[derive(Clone, Debug)]
pub struct AiPolicy {
    personality: Personality,
    difficulty: f64,
    planned: Option<CardName>,
}

impl AiPolicy {
    /// Create a policy. `difficulty` is clamped to `[0, 1]`.
    #[must_use]
    pub fn new(personality: Personality, difficulty: f64) -> Self {
        let difficulty = if difficulty.is_nan() { 1.0 } else { difficulty.clamp(0.0, 1.0) };
        Self {
            personality,
            difficulty,
            planned: None,
        }
    }

    #[must_use]
    pub fn personality(&self) -> Personality {
        self.personality
    }

    #[must_use]
    pub fn difficulty(&self) -> f64 {
        self.difficulty
    }

    /// Score of building `card` at `cost` for the deciding player.
    #[must_use]
    pub fn score_build(&self, view: &GameView<'_>, card: &CardName, cost: u32) -> f64 {
        let me = view.me();
        let w = self.personality.weights();
        let resolver = BonusResolver::new(view.catalog);

        let points = f64::from(resolver.gain_if_built(Yield::Points, me.city(), card));
        let money = f64::from(resolver.gain_if_built(Yield::Money, me.city(), card));
        let saved = view
            .catalog
            .get(card.as_str())
            .map_or(0, |def| def.price.saturating_sub(cost));
        let margin = me.hand().len().saturating_sub(cost as usize + 1);

        w.points * points + w.money * money + w.discount * f64::from(saved) + w.safety * safety(margin)
    }

    /// Score of taking the draw action.
    #[must_use]
    pub fn draw_score(&self, view: &GameView<'_>) -> f64 {
        let w = self.personality.weights();
        let after = view.me().hand().len() + view.config.draw_branch_keeps();
        w.safety * safety(after) + w.patience
    }

    /// Every legal option with its score.
    ///
    /// Builds come first in catalog order, then drawing as `None`.
    #[must_use]
    pub fn options(&self, view: &GameView<'_>) -> Vec<(Option<CardName>, f64)> {
        let mut buildable = view.buildable();
        buildable.sort_by_key(|(card, _)| view.catalog.position(card.as_str()));

        let mut options: Vec<(Option<CardName>, f64)> = buildable
            .into_iter()
            .map(|(card, cost)| {
                let score = self.score_build(view, &card, cost);
                (Some(card), score)
            })
            .collect();
        options.push((None, self.draw_score(view)));
        options
    }

    /// Prerequisite and reduction links between `card` and `player`'s
    /// other hand cards and city.
    #[must_use]
    pub fn links(catalog: &CardCatalog, player: &PlayerState, card: &CardName) -> usize {
        let Some(def) = catalog.get(card.as_str()) else {
            return 0;
        };
        let enables = player
            .hand()
            .iter()
            .filter(|other| *other != card)
            .filter_map(|other| catalog.get(other.as_str()))
            .filter(|other| other.prerequisite.as_ref() == Some(card) || other.reductions.contains(card))
            .count();
        let supported = def.reductions.iter().filter(|r| player.has_built(r.as_str())).count()
            + usize::from(def.prerequisite.as_ref().is_some_and(|p| player.has_built(p.as_str())));
        enables + supported
    }

    /// How much keeping `card` is worth to `player`.
    #[must_use]
    pub fn card_value(&self, catalog: &CardCatalog, player: &PlayerState, card: &CardName) -> f64 {
        let Some(def) = catalog.get(card.as_str()) else {
            return 0.0;
        };
        let w = self.personality.weights();
        let resolver = BonusResolver::new(catalog);

        let linked = Self::links(catalog, player, card);
        let blocked = def
            .prerequisite
            .as_ref()
            .is_some_and(|p| !player.has_built(p.as_str()) && !player.holds(p.as_str()));

        let points = f64::from(resolver.gain_if_built(Yield::Points, player.city(), card));
        let money = f64::from(resolver.gain_if_built(Yield::Money, player.city(), card));
        let cost = f64::from(def.reduced_price(player.city()));

        let mut value = LINK_VALUE * linked as f64 + w.points * points + w.money * money
            - w.safety * SAFETY_STEP * cost;
        if blocked {
            value -= LINK_VALUE;
        }
        value
    }

    /// Index of the chosen score under the difficulty blend.
    fn pick(&self, scores: &[f64], rng: &mut GameRng) -> usize {
        if scores.is_empty() {
            return 0;
        }
        if rng.gen_bool(self.difficulty) {
            best_index(scores)
        } else {
            rng.gen_range_usize(0..scores.len())
        }
    }
}

/// First index holding the highest score.
fn best_index(scores: &[f64]) -> usize {
    let mut best = 0;
    for (i, score) in scores.iter().enumerate().skip(1) {
        if score.partial_cmp(&scores[best]) == Some(Ordering::Greater) {
            best = i;
        }
    }
    best
}

fn safety(hand: usize) -> f64 {
    hand.min(COMFORT_HAND) as f64 * SAFETY_STEP
}

impl Controller for AiPolicy {
    fn choose_action(&mut self, view: &GameView<'_>, rng: &mut GameRng) -> ActionChoice {
        self.planned = None;
        if view.buildable().is_empty() {
            return ActionChoice::Draw;
        }

        let mut options = self.options(view);
        let scores: Vec<f64> = options.iter().map(|(_, score)| *score).collect();
        let index = self.pick(&scores, rng);
        match options.swap_remove(index).0 {
            Some(card) => {
                self.planned = Some(card);
                ActionChoice::Build
            }
            None => ActionChoice::Draw,
        }
    }

    fn choose_build_target(&mut self, view: &GameView<'_>, _rng: &mut GameRng) -> Option<CardName> {
        if let Some(card) = self.planned.take() {
            return Some(card);
        }
        let options: Vec<(CardName, f64)> = self
            .options(view)
            .into_iter()
            .filter_map(|(card, score)| card.map(|c| (c, score)))
            .collect();
        let scores: Vec<f64> = options.iter().map(|(_, score)| *score).collect();
        options.into_iter().nth(best_index(&scores)).map(|(card, _)| card)
    }

    fn choose_discard_set(&mut self, request: &DiscardRequest<'_>, _rng: &mut GameRng) -> Selection {
        let protected = match request.reason {
            DiscardReason::BuildPayment { target } => request.candidates.iter().position(|c| c == target),
            DiscardReason::DrawBranch | DiscardReason::HandLimit => None,
        };

        let mut ranked: Vec<(usize, bool, f64, usize)> = request
            .candidates
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != protected)
            .map(|(i, card)| {
                let linked = Self::links(request.catalog, request.player, card) > 0;
                let value = self.card_value(request.catalog, request.player, card);
                let order = request.catalog.position(card.as_str()).unwrap_or(usize::MAX);
                (i, linked, value, order)
            })
            .collect();
        ranked.sort_by(|a, b| {
            a.1.cmp(&b.1)
                .then(a.2.partial_cmp(&b.2).unwrap_or(Ordering::Equal))
                .then(a.3.cmp(&b.3))
                .then(a.0.cmp(&b.0))
        });

        ranked.into_iter().take(request.count).map(|(i, ..)| i).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardDefinition, Formula};
    use crate::core::{GameConfig, GameState, PlayerId};
    use crate::zones::DrawPile;

    fn names(list: &[&str]) -> Vec<CardName> {
        list.iter().map(|s| CardName::from(*s)).collect()
    }

    fn catalog() -> CardCatalog {
        let mut catalog = CardCatalog::new();
        catalog
            .register(CardDefinition::new("Junk").with_supply(10))
            .unwrap();
        catalog
            .register(CardDefinition::new("Coin").with_supply(4).with_money(Formula::Fixed(2)))
            .unwrap();
        catalog
            .register(CardDefinition::new("Gem").with_supply(4).with_points(Formula::Fixed(3)))
            .unwrap();
        catalog
            .register(CardDefinition::new("Crown").with_supply(1).with_price(2).with_points(Formula::Fixed(5)))
            .unwrap();
        catalog
    }

    fn state_with(hand: &[&str]) -> GameState {
        let mut state = GameState::new(DrawPile::default());
        state.players.push(PlayerState::with_cards("AI", names(hand), vec![]));
        state
    }

    fn view<'a>(catalog: &'a CardCatalog, config: &'a GameConfig, state: &'a GameState) -> GameView<'a> {
        GameView {
            catalog,
            config,
            state,
            player: PlayerId::new(0),
        }
    }

    #[test]
    fn test_difficulty_clamped() {
        assert_eq!(AiPolicy::new(Personality::Balanced, 2.0).difficulty(), 1.0);
        assert_eq!(AiPolicy::new(Personality::Balanced, -1.0).difficulty(), 0.0);
        assert_eq!(AiPolicy::new(Personality::Balanced, f64::NAN).difficulty(), 1.0);
    }

    #[test]
    fn test_forced_draw_when_nothing_buildable() {
        let catalog = catalog();
        let config = GameConfig::default();
        let state = state_with(&["Crown"]);
        let mut rng = GameRng::new(1);

        let mut ai = AiPolicy::new(Personality::Aggressive, 1.0);
        assert_eq!(ai.choose_action(&view(&catalog, &config, &state), &mut rng), ActionChoice::Draw);
    }

    #[test]
    fn test_personality_drives_target() {
        let catalog = catalog();
        let config = GameConfig::default();
        let state = state_with(&["Junk", "Coin", "Gem", "Junk", "Junk"]);
        let view = view(&catalog, &config, &state);
        let mut rng = GameRng::new(1);

        let mut aggressive = AiPolicy::new(Personality::Aggressive, 1.0);
        assert_eq!(aggressive.choose_action(&view, &mut rng), ActionChoice::Build);
        assert_eq!(aggressive.choose_build_target(&view, &mut rng), Some("Gem".into()));

        let mut economic = AiPolicy::new(Personality::Economic, 1.0);
        assert_eq!(economic.choose_action(&view, &mut rng), ActionChoice::Build);
        assert_eq!(economic.choose_build_target(&view, &mut rng), Some("Coin".into()));
    }

    #[test]
    fn test_target_without_plan_is_best() {
        let catalog = catalog();
        let config = GameConfig::default();
        let state = state_with(&["Junk", "Gem", "Junk"]);
        let view = view(&catalog, &config, &state);
        let mut rng = GameRng::new(1);

        let mut ai = AiPolicy::new(Personality::Aggressive, 0.0);
        assert_eq!(ai.choose_build_target(&view, &mut rng), Some("Gem".into()));
    }

    #[test]
    fn test_zero_difficulty_explores() {
        let catalog = catalog();
        let config = GameConfig::default();
        let state = state_with(&["Junk", "Coin", "Gem", "Junk", "Junk"]);
        let view = view(&catalog, &config, &state);
        let mut rng = GameRng::new(99);

        let mut ai = AiPolicy::new(Personality::Aggressive, 0.0);
        let mut draws = 0;
        let mut targets = std::collections::BTreeSet::new();
        for _ in 0..200 {
            match ai.choose_action(&view, &mut rng) {
                ActionChoice::Draw => draws += 1,
                ActionChoice::Build => {
                    if let Some(card) = ai.choose_build_target(&view, &mut rng) {
                        targets.insert(card);
                    }
                }
            }
        }
        assert!(draws > 0);
        assert_eq!(targets.len(), 3);
    }

    #[test]
    fn test_draw_discard_keeps_best() {
        let catalog = catalog();
        let player = PlayerState::new("AI");
        let candidates = names(&["Junk", "Gem", "Junk", "Coin", "Junk"]);
        let reason = DiscardReason::DrawBranch;
        let request = DiscardRequest {
            catalog: &catalog,
            player: &player,
            candidates: &candidates,
            count: 4,
            reason: &reason,
        };
        let mut rng = GameRng::new(1);

        let mut ai = AiPolicy::new(Personality::Aggressive, 1.0);
        let mut chosen = ai.choose_discard_set(&request, &mut rng);
        chosen.sort_unstable();
        assert_eq!(chosen.as_slice(), &[0, 2, 3, 4]);
    }

    #[test]
    fn test_payment_spares_target() {
        let catalog = catalog();
        let player = PlayerState::with_cards("AI", names(&["Crown", "Gem", "Junk", "Coin"]), vec![]);
        let reason = DiscardReason::BuildPayment { target: "Crown".into() };
        let request = DiscardRequest {
            catalog: &catalog,
            player: &player,
            candidates: player.hand(),
            count: 2,
            reason: &reason,
        };
        let mut rng = GameRng::new(1);

        let mut ai = AiPolicy::new(Personality::Aggressive, 1.0);
        let mut chosen = ai.choose_discard_set(&request, &mut rng);
        chosen.sort_unstable();
        assert_eq!(chosen.as_slice(), &[2, 3]);
    }

    #[test]
    fn test_linked_cards_are_kept() {
        let mut catalog = catalog();
        catalog
            .register(CardDefinition::new("Seal").with_supply(1).with_prerequisite("Junk"))
            .unwrap();
        let player = PlayerState::with_cards("AI", names(&["Junk", "Seal", "Coin"]), vec![]);
        let ai = AiPolicy::new(Personality::Balanced, 1.0);

        let junk = ai.card_value(&catalog, &player, &"Junk".into());
        let alone = ai.card_value(&catalog, &PlayerState::new("AI"), &"Junk".into());
        assert!(junk > alone);

        let orphan = PlayerState::with_cards("AI", names(&["Seal"]), vec![]);
        assert!(ai.card_value(&catalog, &orphan, &"Seal".into()) < 0.0);
    }

    #[test]
    fn test_unlinked_cards_discarded_first() {
        let mut catalog = catalog();
        catalog
            .register(CardDefinition::new("Base").with_supply(2))
            .unwrap();
        catalog
            .register(CardDefinition::new("Tower").with_supply(1).with_prerequisite("Base"))
            .unwrap();
        let player = PlayerState::with_cards("AI", names(&["Tower", "Base", "Gem", "Junk", "Junk", "Junk"]), vec![]);
        let reason = DiscardReason::DrawBranch;
        let request = DiscardRequest {
            catalog: &catalog,
            player: &player,
            candidates: &player.hand()[1..],
            count: 4,
            reason: &reason,
        };
        let mut rng = GameRng::new(1);

        for p in Personality::ALL {
            let mut ai = AiPolicy::new(p, 1.0);
            let mut chosen = ai.choose_discard_set(&request, &mut rng);
            chosen.sort_unstable();
            // Base (candidate 0) unlocks Tower; Gem scores points but links to nothing
            assert_eq!(chosen.as_slice(), &[1, 2, 3, 4], "{p}");
        }
    }
}
