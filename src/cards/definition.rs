//! Card definitions - static card data.
//!
//! `CardDefinition` holds the immutable properties of a card type: how many
//! copies are in the supply, its price, the color bonuses it contributes to
//! a city, and the formulas that turn a built card into money and points.
//!
//! Cards in play are referred to by name only. A hand or a city is a list of
//! `CardName`s; the catalog resolves names to definitions.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Name of a card, the unique key into the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardName(String);

impl CardName {
    /// Create a card name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Borrow the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CardName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CardName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Borrow<str> for CardName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for CardName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for CardName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// The three bonus colors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    /// Blue (civic) bonus.
    Blue,
    /// Red (military/trade) bonus.
    Red,
    /// Green (agricultural) bonus.
    Green,
}

impl Color {
    /// All colors, in catalog column order.
    pub const ALL: [Color; 3] = [Color::Blue, Color::Red, Color::Green];
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Color::Blue => "blue",
            Color::Red => "red",
            Color::Green => "green",
        };
        f.write_str(s)
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "blue" => Ok(Color::Blue),
            "red" => Ok(Color::Red),
            "green" => Ok(Color::Green),
            other => Err(format!("unknown color: {other}")),
        }
    }
}

/// Bonus magnitude a card contributes to each color pool of a city.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorBonus {
    /// Blue magnitude.
    pub blue: u32,
    /// Red magnitude.
    pub red: u32,
    /// Green magnitude.
    pub green: u32,
}

impl ColorBonus {
    /// Magnitude for one color.
    #[must_use]
    pub const fn get(&self, color: Color) -> u32 {
        match color {
            Color::Blue => self.blue,
            Color::Red => self.red,
            Color::Green => self.green,
        }
    }

    /// Set the magnitude for one color.
    pub fn set(&mut self, color: Color, magnitude: u32) {
        match color {
            Color::Blue => self.blue = magnitude,
            Color::Red => self.red = magnitude,
            Color::Green => self.green = magnitude,
        }
    }
}

/// Money or points formula of a card.
///
/// Either a literal value, or a color meaning "the sum of that color's bonus
/// across every card in the city".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Formula {
    /// Literal value.
    Fixed(u32),
    /// Sum of a color pool across the city.
    Color(Color),
}

impl Default for Formula {
    fn default() -> Self {
        Formula::Fixed(0)
    }
}

impl FromStr for Formula {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Formula::Fixed(0));
        }
        if let Ok(v) = s.parse::<u32>() {
            return Ok(Formula::Fixed(v));
        }
        s.parse::<Color>()
            .map(Formula::Color)
            .map_err(|_| format!("invalid formula: {s}"))
    }
}

impl<'de> Deserialize<'de> for Formula {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u32),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(v) => Ok(Formula::Fixed(v)),
            Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// Static card definition.
///
/// ## Example
///
/// ```
/// use city_deck::cards::{CardDefinition, Color, Formula};
///
/// let library = CardDefinition::new("Library")
///     .with_supply(4)
///     .with_price(3)
///     .with_bonus(Color::Blue, 1)
///     .with_points(Formula::Fixed(2))
///     .with_reduction("Chapel");
///
/// assert_eq!(library.price, 3);
/// assert_eq!(library.bonus.get(Color::Blue), 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDefinition {
    /// Unique card name.
    pub name: CardName,

    /// Copies of this card in the shared supply.
    #[serde(default)]
    pub supply: u32,

    /// Base build price, in hand cards spent.
    #[serde(default)]
    pub price: u32,

    /// Color bonuses contributed to the city pools.
    #[serde(default)]
    pub bonus: ColorBonus,

    /// Money produced each turn once built.
    #[serde(default)]
    pub money: Formula,

    /// Points scored once built.
    #[serde(default)]
    pub points: Formula,

    /// Cards that each lower the price by 1 when present in the city.
    #[serde(default)]
    pub reductions: Vec<CardName>,

    /// Card that must already be in the city.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub prerequisite: Option<CardName>,
}

fn empty_as_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<CardName>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .map(CardName::from))
}

impl CardDefinition {
    /// Create a definition with no supply, price 0 and no effects.
    #[must_use]
    pub fn new(name: impl Into<CardName>) -> Self {
        Self {
            name: name.into(),
            supply: 0,
            price: 0,
            bonus: ColorBonus::default(),
            money: Formula::default(),
            points: Formula::default(),
            reductions: Vec::new(),
            prerequisite: None,
        }
    }

    /// Set the supply count.
    #[must_use]
    pub fn with_supply(mut self, supply: u32) -> Self {
        self.supply = supply;
        self
    }

    /// Set the base price.
    #[must_use]
    pub fn with_price(mut self, price: u32) -> Self {
        self.price = price;
        self
    }

    /// Set one color bonus.
    #[must_use]
    pub fn with_bonus(mut self, color: Color, magnitude: u32) -> Self {
        self.bonus.set(color, magnitude);
        self
    }

    /// Set the money formula.
    #[must_use]
    pub fn with_money(mut self, money: Formula) -> Self {
        self.money = money;
        self
    }

    /// Set the points formula.
    #[must_use]
    pub fn with_points(mut self, points: Formula) -> Self {
        self.points = points;
        self
    }

    /// Add a price-reducing card.
    #[must_use]
    pub fn with_reduction(mut self, card: impl Into<CardName>) -> Self {
        self.reductions.push(card.into());
        self
    }

    /// Set the prerequisite card.
    #[must_use]
    pub fn with_prerequisite(mut self, card: impl Into<CardName>) -> Self {
        self.prerequisite = Some(card.into());
        self
    }

    /// Price after applying every reduction present in `city`, floored at 0.
    #[must_use]
    pub fn reduced_price(&self, city: &[CardName]) -> u32 {
        self.reductions
            .iter()
            .filter(|r| city.contains(r))
            .fold(self.price, |price, _| price.saturating_sub(1))
    }

    /// Check whether the prerequisite (if any) is present in `city`.
    #[must_use]
    pub fn prerequisite_met(&self, city: &[CardName]) -> bool {
        self.prerequisite.as_ref().map_or(true, |p| city.contains(p))
    }
}
