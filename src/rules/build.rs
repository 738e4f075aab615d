//! Build, discard and hand-cap rules on `PlayerState`.
//!
//! Every operation validates completely before it mutates: a rejected
//! build or selection leaves the hand, the city and the draw pile exactly
//! as they were.
//!
//! Chosen indices are removed highest-first so earlier removals never shift
//! the positions of later ones.

use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::cards::{CardCatalog, CardName};
use crate::core::error::{GameError, SelectionFault};
use crate::core::player::PlayerState;
use crate::zones::DrawPile;

/// Hand indices chosen by a controller.
pub type Selection = SmallVec<[usize; 4]>;

/// Result of a successful build.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildReceipt {
    /// The card moved into the city.
    pub card: CardName,
    /// Cards spent, as the reduced price.
    pub cost: u32,
    /// The spent cards, now on the discard pile.
    pub spent: Vec<CardName>,
}

/// Check that `indices` picks exactly `expected` distinct positions below `len`.
pub fn validate_selection(indices: &[usize], expected: usize, len: usize) -> Result<(), SelectionFault> {
    if indices.len() != expected {
        return Err(SelectionFault::WrongCount {
            expected,
            got: indices.len(),
        });
    }
    let mut seen = vec![false; len];
    for &index in indices {
        if index >= len {
            return Err(SelectionFault::OutOfRange { index, len });
        }
        if seen[index] {
            return Err(SelectionFault::Duplicate(index));
        }
        seen[index] = true;
    }
    Ok(())
}

impl PlayerState {
    /// Reduced price of building `card`, or why it cannot be built.
    ///
    /// Checks, in order: the card exists, it is in hand, the hand can pay
    /// the reduced price plus the card itself, and its prerequisite is built.
    pub fn compute_build_cost(&self, card: &str, catalog: &CardCatalog) -> Result<u32, GameError> {
        let def = catalog.lookup(card)?;

        if !self.holds(card) {
            return Err(GameError::NotInHand(def.name.clone()));
        }

        let cost = def.reduced_price(&self.city);

        let needed = cost as usize + 1;
        if needed > self.hand.len() {
            return Err(GameError::InsufficientHand {
                card: def.name.clone(),
                shortfall: needed - self.hand.len(),
            });
        }

        match &def.prerequisite {
            Some(prerequisite) if !def.prerequisite_met(&self.city) => {
                return Err(GameError::PrerequisiteUnmet {
                    card: def.name.clone(),
                    prerequisite: prerequisite.clone(),
                });
            }
            _ => {}
        }

        Ok(cost)
    }

    /// Every distinct card in hand that can be built now, with its cost.
    ///
    /// Listed in first-seen hand order.
    #[must_use]
    pub fn buildable_cards(&self, catalog: &CardCatalog) -> Vec<(CardName, u32)> {
        let mut buildable: Vec<(CardName, u32)> = Vec::new();
        for card in &self.hand {
            if buildable.iter().any(|(c, _)| c == card) {
                continue;
            }
            if let Ok(cost) = self.compute_build_cost(card.as_str(), catalog) {
                buildable.push((card.clone(), cost));
            }
        }
        buildable
    }

    /// Build `card`, spending the hand cards at `chosen`.
    ///
    /// The cost is recomputed here. `chosen` must name exactly `cost`
    /// distinct in-range indices. The instance built is the first copy of
    /// `card` in hand that is not being spent; if every copy is chosen the
    /// selection is rejected.
    pub fn execute_build(
        &mut self,
        card: &str,
        chosen: &[usize],
        catalog: &CardCatalog,
        pile: &mut DrawPile,
    ) -> Result<BuildReceipt, GameError> {
        let cost = self.compute_build_cost(card, catalog)?;
        validate_selection(chosen, cost as usize, self.hand.len())?;

        let target = self
            .hand
            .iter()
            .enumerate()
            .position(|(i, c)| c == card && !chosen.contains(&i))
            .ok_or(SelectionFault::ConsumesTarget)?;

        let mut removal: SmallVec<[usize; 8]> = chosen.iter().copied().collect();
        removal.push(target);
        removal.sort_unstable_by(|a, b| b.cmp(a));

        let mut spent = Vec::with_capacity(chosen.len());
        let mut built = None;
        for index in removal {
            let removed = self.hand.remove(index);
            if index == target {
                built = Some(removed);
            } else {
                spent.push(removed);
            }
        }
        spent.reverse();

        let built = built.unwrap_or_else(|| CardName::from(card));
        self.city.push(built.clone());
        pile.discard_all(spent.iter().cloned());

        debug!(player = %self.name, card = %built, cost, "built card");
        Ok(BuildReceipt {
            card: built,
            cost,
            spent,
        })
    }

    /// Discard exactly `required` cards chosen by hand index.
    ///
    /// Returns the discarded cards in hand order.
    pub fn discard_selection(
        &mut self,
        indices: &[usize],
        required: usize,
        pile: &mut DrawPile,
    ) -> Result<Vec<CardName>, GameError> {
        self.discard_window(0, indices, required, pile)
    }

    /// Discard `required` of the last `recent` cards in hand.
    ///
    /// Indices are relative to that tail: `0` is the oldest of the recent
    /// cards. Used after the draw action, where only the cards just drawn
    /// may be discarded.
    pub fn discard_recent(
        &mut self,
        recent: usize,
        indices: &[usize],
        required: usize,
        pile: &mut DrawPile,
    ) -> Result<Vec<CardName>, GameError> {
        let recent = recent.min(self.hand.len());
        self.discard_window(self.hand.len() - recent, indices, required, pile)
    }

    fn discard_window(
        &mut self,
        offset: usize,
        indices: &[usize],
        required: usize,
        pile: &mut DrawPile,
    ) -> Result<Vec<CardName>, GameError> {
        validate_selection(indices, required, self.hand.len() - offset)?;

        let mut sorted: SmallVec<[usize; 8]> = indices.iter().map(|&i| i + offset).collect();
        sorted.sort_unstable_by(|a, b| b.cmp(a));

        let mut removed: Vec<CardName> = sorted.into_iter().map(|i| self.hand.remove(i)).collect();
        removed.reverse();
        pile.discard_all(removed.iter().cloned());
        Ok(removed)
    }

    /// Discard down to `max_size` cards.
    ///
    /// While the hand is over the cap, `select` is asked for exactly the
    /// excess number of indices. Rejected selections are retried up to
    /// `max_attempts` times before failing with `DecisionLimit`. Calling
    /// this on a hand within the cap does nothing.
    pub fn enforce_hand_limit<F>(
        &mut self,
        max_size: usize,
        max_attempts: u32,
        pile: &mut DrawPile,
        mut select: F,
    ) -> Result<Vec<CardName>, GameError>
    where
        F: FnMut(&PlayerState, usize) -> Selection,
    {
        let mut discarded = Vec::new();
        let mut rejected = 0;

        while self.hand.len() > max_size {
            let excess = self.hand.len() - max_size;
            let chosen = select(self, excess);
            match self.discard_selection(&chosen, excess, pile) {
                Ok(cards) => discarded.extend(cards),
                Err(err) => {
                    rejected += 1;
                    warn!(player = %self.name, %err, "hand limit selection rejected");
                    if rejected >= max_attempts {
                        return Err(GameError::DecisionLimit { attempts: rejected });
                    }
                }
            }
        }

        Ok(discarded)
    }
}
