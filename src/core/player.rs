//! Player identification, per-player storage and player state.
//!
//! ## PlayerId
//!
//! Type-safe player identifier; seat order is join order.
//!
//! ## PlayerMap
//!
//! Per-player storage backed by `Vec` for O(1) access by `PlayerId`.
//!
//! ## PlayerState
//!
//! A player's hand, city and cached points. Money is never stored: it is
//! recomputed from the city whenever it is needed. Build, discard and
//! hand-cap operations live in `rules::build`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

use crate::cards::{CardCatalog, CardName};
use crate::rules::bonus::BonusResolver;

/// Player identifier supporting up to 255 players.
///
/// Player indices are 0-based: the first player to join is `PlayerId(0)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw player index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The seat after this one, wrapping at `player_count`.
    #[must_use]
    pub fn next(self, player_count: usize) -> Self {
        debug_assert!(player_count > 0);
        Self(((self.index() + 1) % player_count) as u8)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Per-player data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use city_deck::core::{PlayerId, PlayerMap};
///
/// let mut scores: PlayerMap<u32> = PlayerMap::default();
/// let alice = scores.push(0);
/// let bob = scores.push(0);
///
/// scores[bob] = 15;
/// assert_eq!(scores[alice], 0);
/// assert_eq!(scores[PlayerId::new(1)], 15);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: Vec<T>,
}

impl<T> Default for PlayerMap<T> {
    fn default() -> Self {
        Self { data: Vec::new() }
    }
}

impl<T> PlayerMap<T> {
    /// Add an entry for the next seat and return its ID.
    ///
    /// Panics past 255 players.
    pub fn push(&mut self, value: T) -> PlayerId {
        assert!(self.data.len() < 255, "At most 255 players supported");
        let id = PlayerId(self.data.len() as u8);
        self.data.push(value);
        id
    }

    /// Get the number of players.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.data.len()
    }

    /// Check if no player has joined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get a reference to a player's data.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> &T {
        &self.data[player.index()]
    }

    /// Get a mutable reference to a player's data.
    pub fn get_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.data[player.index()]
    }

    /// Iterate over (PlayerId, &T) pairs in seat order.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

    /// Iterate over values in seat order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    /// Iterate over mutable values in seat order.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.data.iter_mut()
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        self.get_mut(player)
    }
}

/// A player's hand, city and cached score.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Display name.
    pub name: String,

    /// Cards held, index-addressable for selections.
    pub(crate) hand: Vec<CardName>,

    /// Built cards in build order.
    pub(crate) city: Vec<CardName>,

    /// Points as of the last `refresh_points`.
    pub(crate) points: u32,
}

impl PlayerState {
    /// Create a player with an empty hand and city.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hand: Vec::new(),
            city: Vec::new(),
            points: 0,
        }
    }

    /// Create a player with the given hand and city.
    pub fn with_cards(name: impl Into<String>, hand: Vec<CardName>, city: Vec<CardName>) -> Self {
        Self {
            name: name.into(),
            hand,
            city,
            points: 0,
        }
    }

    /// Cards in hand.
    #[must_use]
    pub fn hand(&self) -> &[CardName] {
        &self.hand
    }

    /// Built cards.
    #[must_use]
    pub fn city(&self) -> &[CardName] {
        &self.city
    }

    /// Points as of the last refresh.
    #[must_use]
    pub fn points(&self) -> u32 {
        self.points
    }

    /// Total cards held by this player (hand plus city).
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.hand.len() + self.city.len()
    }

    /// Check whether a card is in hand.
    #[must_use]
    pub fn holds(&self, card: &str) -> bool {
        self.hand.iter().any(|c| c == card)
    }

    /// Check whether a card is built.
    #[must_use]
    pub fn has_built(&self, card: &str) -> bool {
        self.city.iter().any(|c| c == card)
    }

    /// Add a drawn card to the hand.
    pub fn receive(&mut self, card: CardName) {
        self.hand.push(card);
    }

    /// Points of the current city. Pure; does not touch the cache.
    #[must_use]
    pub fn compute_points(&self, catalog: &CardCatalog) -> u32 {
        BonusResolver::new(catalog).points(&self.city)
    }

    /// Money of the current city. Pure.
    #[must_use]
    pub fn compute_money(&self, catalog: &CardCatalog) -> u32 {
        BonusResolver::new(catalog).money(&self.city)
    }

    /// Recompute and cache points.
    pub fn refresh_points(&mut self, catalog: &CardCatalog) -> u32 {
        self.points = self.compute_points(catalog);
        self.points
    }
}

impl std::fmt::Display for PlayerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let city: Vec<&str> = self.city.iter().map(CardName::as_str).collect();
        write!(
            f,
            "{} - hand: {} card(s), city: [{}], points: {}",
            self.name,
            self.hand.len(),
            city.join(", "),
            self.points
        )
    }
}
