//! Shared draw pile and discard pile.
//!
//! The `DrawPile` owns every card instance that is not in a hand or a city.
//! Draws pop from the end of a pre-shuffled list; discards only ever go to
//! the discard list, so a draw is a uniformly random pick among the cards
//! that have not been drawn since the last reshuffle.
//!
//! When a draw finds the draw list empty, the discard list is moved over,
//! cleared and shuffled. If both are empty the draw fails with
//! `DeckExhausted`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cards::{CardCatalog, CardName};
use crate::core::error::GameError;
use crate::core::rng::GameRng;

/// The shared deck: draw list plus discard list.
///
/// ## Usage
///
/// ```
/// use city_deck::core::GameRng;
/// use city_deck::zones::DrawPile;
///
/// let mut rng = GameRng::new(42);
/// let mut pile = DrawPile::from_parts(vec!["Farm".into()], vec!["Market".into()]);
///
/// let first = pile.draw_one(&mut rng).unwrap();
/// assert_eq!(first, "Farm");
///
/// // Draw list is empty: the discard is reshuffled in
/// let second = pile.draw_one(&mut rng).unwrap();
/// assert_eq!(second, "Market");
/// assert_eq!(pile.reshuffle_count(), 1);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawPile {
    /// Cards still to draw. The top is the end of the vec.
    draw: Vec<CardName>,

    /// Cards discarded since the last reshuffle.
    discard: Vec<CardName>,

    /// Number of reshuffles performed.
    reshuffles: u32,
}

impl DrawPile {
    /// Build the full supply from a catalog and shuffle it.
    #[must_use]
    pub fn from_catalog(catalog: &CardCatalog, rng: &mut GameRng) -> Self {
        let mut draw = Vec::with_capacity(catalog.total_supply());
        for card in catalog.iter() {
            draw.extend(std::iter::repeat(card.name.clone()).take(card.supply as usize));
        }
        rng.shuffle(&mut draw);

        Self {
            draw,
            discard: Vec::new(),
            reshuffles: 0,
        }
    }

    /// Build a pile from explicit lists, without shuffling.
    ///
    /// The last element of `draw` is drawn first.
    #[must_use]
    pub fn from_parts(draw: Vec<CardName>, discard: Vec<CardName>) -> Self {
        Self {
            draw,
            discard,
            reshuffles: 0,
        }
    }

    /// Draw one card, reshuffling the discard list if the draw list is empty.
    pub fn draw_one(&mut self, rng: &mut GameRng) -> Result<CardName, GameError> {
        if self.draw.is_empty() {
            if self.discard.is_empty() {
                return Err(GameError::DeckExhausted);
            }
            self.reshuffle(rng);
        }
        self.draw.pop().ok_or(GameError::DeckExhausted)
    }

    /// Move the discard list into the draw list and shuffle it.
    fn reshuffle(&mut self, rng: &mut GameRng) {
        self.draw.append(&mut self.discard);
        rng.shuffle(&mut self.draw);
        self.reshuffles += 1;
        debug!(cards = self.draw.len(), reshuffles = self.reshuffles, "reshuffled discard pile");
    }

    /// Put a card on the discard list.
    ///
    /// The caller guarantees the card was in play.
    pub fn discard(&mut self, card: CardName) {
        self.discard.push(card);
    }

    /// Put several cards on the discard list.
    pub fn discard_all(&mut self, cards: impl IntoIterator<Item = CardName>) {
        self.discard.extend(cards);
    }

    /// Cards left in the draw list.
    #[must_use]
    pub fn draw_len(&self) -> usize {
        self.draw.len()
    }

    /// Cards in the discard list.
    #[must_use]
    pub fn discard_len(&self) -> usize {
        self.discard.len()
    }

    /// Cards available to future draws (draw + discard).
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.draw.len() + self.discard.len()
    }

    /// Check whether no draw can succeed.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// The discard list, oldest first.
    #[must_use]
    pub fn discarded(&self) -> &[CardName] {
        &self.discard
    }

    /// Number of reshuffles performed so far.
    #[must_use]
    pub fn reshuffle_count(&self) -> u32 {
        self.reshuffles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardDefinition;

    fn names(prefix: &str, n: usize) -> Vec<CardName> {
        (0..n).map(|i| CardName::new(format!("{prefix}{i}"))).collect()
    }

    #[test]
    fn test_from_catalog_expands_supply() {
        let mut catalog = CardCatalog::new();
        catalog.register(CardDefinition::new("A").with_supply(3)).unwrap();
        catalog.register(CardDefinition::new("B").with_supply(2)).unwrap();
        catalog.register(CardDefinition::new("C").with_supply(0)).unwrap();

        let mut rng = GameRng::new(42);
        let pile = DrawPile::from_catalog(&catalog, &mut rng);

        assert_eq!(pile.draw_len(), 5);
        assert_eq!(pile.discard_len(), 0);

        let mut drawn = Vec::new();
        let mut pile = pile;
        while let Ok(card) = pile.draw_one(&mut rng) {
            drawn.push(card);
        }
        drawn.sort();
        let expected: Vec<CardName> = ["A", "A", "A", "B", "B"].into_iter().map(CardName::from).collect();
        assert_eq!(drawn, expected);
    }

    #[test]
    fn test_same_seed_same_order() {
        let mut catalog = CardCatalog::new();
        for i in 0..10 {
            catalog
                .register(CardDefinition::new(format!("Card{i}")).with_supply(2))
                .unwrap();
        }

        let a = DrawPile::from_catalog(&catalog, &mut GameRng::new(9));
        let b = DrawPile::from_catalog(&catalog, &mut GameRng::new(9));
        assert_eq!(a, b);
    }

    #[test]
    fn test_draw_pops_top() {
        let mut rng = GameRng::new(1);
        let mut pile = DrawPile::from_parts(vec!["A".into(), "B".into()], vec![]);

        assert_eq!(pile.draw_one(&mut rng).unwrap(), "B");
        assert_eq!(pile.draw_one(&mut rng).unwrap(), "A");
        assert_eq!(pile.reshuffle_count(), 0);
    }

    #[test]
    fn test_exhausted_when_both_empty() {
        let mut rng = GameRng::new(1);
        let mut pile = DrawPile::default();

        assert!(pile.is_exhausted());
        assert_eq!(pile.draw_one(&mut rng), Err(GameError::DeckExhausted));
    }

    #[test]
    fn test_single_reshuffle_over_three_draws() {
        let mut rng = GameRng::new(3);
        let mut pile = DrawPile::from_parts(vec!["Top".into()], names("D", 10));

        let drawn: Vec<_> = (0..3).map(|_| pile.draw_one(&mut rng).unwrap()).collect();

        assert_eq!(drawn.len(), 3);
        assert_eq!(drawn[0], "Top");
        assert_eq!(pile.reshuffle_count(), 1);
        assert_eq!(pile.discard_len(), 0);
        assert_eq!(pile.draw_len(), 8);
    }

    #[test]
    fn test_discard_becomes_drawable() {
        let mut rng = GameRng::new(5);
        let mut pile = DrawPile::default();

        pile.discard("A".into());
        pile.discard_all(vec!["B".into(), "C".into()]);
        assert_eq!(pile.discarded().len(), 3);

        let mut drawn: Vec<_> = (0..3).map(|_| pile.draw_one(&mut rng).unwrap()).collect();
        drawn.sort();
        assert_eq!(drawn, vec![CardName::from("A"), "B".into(), "C".into()]);
        assert_eq!(pile.draw_one(&mut rng), Err(GameError::DeckExhausted));
    }
}
