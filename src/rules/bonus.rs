//! Money and points resolution for a city.
//!
//! Each built card resolves its formula independently: a literal adds its
//! value, a color formula adds the city's whole pool for that color. Two
//! cards keyed to the same color therefore each collect the full pool; the
//! pool is counted once per beneficiary card.
//!
//! Cards missing from the catalog contribute nothing. Sums saturate at
//! `u32::MAX`.

use crate::cards::{CardCatalog, CardName, Color, Formula};

/// Which formula of a card to resolve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Yield {
    /// Income, in cards drawn per turn.
    Money,
    /// Score.
    Points,
}

/// Pure resolver over a catalog.
#[derive(Clone, Copy, Debug)]
pub struct BonusResolver<'a> {
    catalog: &'a CardCatalog,
}

impl<'a> BonusResolver<'a> {
    /// Create a resolver for a catalog.
    #[must_use]
    pub fn new(catalog: &'a CardCatalog) -> Self {
        Self { catalog }
    }

    /// Sum of one color's bonus across every card in `city`.
    #[must_use]
    pub fn color_pool(&self, color: Color, city: &[CardName]) -> u32 {
        city.iter()
            .filter_map(|card| self.catalog.get(card.as_str()))
            .map(|def| def.bonus.get(color))
            .fold(0, u32::saturating_add)
    }

    /// Value of one formula evaluated against `city`.
    #[must_use]
    pub fn resolve(&self, formula: Formula, city: &[CardName]) -> u32 {
        match formula {
            Formula::Fixed(v) => v,
            Formula::Color(color) => self.color_pool(color, city),
        }
    }

    /// Total of one yield across `city`.
    #[must_use]
    pub fn total(&self, kind: Yield, city: &[CardName]) -> u32 {
        city.iter()
            .filter_map(|card| self.catalog.get(card.as_str()))
            .map(|def| {
                let formula = match kind {
                    Yield::Money => def.money,
                    Yield::Points => def.points,
                };
                self.resolve(formula, city)
            })
            .fold(0, u32::saturating_add)
    }

    /// Points of `city`.
    #[must_use]
    pub fn points(&self, city: &[CardName]) -> u32 {
        self.total(Yield::Points, city)
    }

    /// Money of `city`.
    #[must_use]
    pub fn money(&self, city: &[CardName]) -> u32 {
        self.total(Yield::Money, city)
    }

    /// Change in a yield if `card` were added to `city`.
    ///
    /// Includes the effect of the new card's bonus on existing color
    /// formulas.
    #[must_use]
    pub fn gain_if_built(&self, kind: Yield, city: &[CardName], card: &CardName) -> u32 {
        let mut extended = city.to_vec();
        extended.push(card.clone());
        self.total(kind, &extended).saturating_sub(self.total(kind, city))
    }
}
