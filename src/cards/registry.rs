//! Card catalog for definition lookup.
//!
//! The `CardCatalog` stores every card definition for a game. It is
//! read-only once a game starts: the engine queries it by card name and
//! never mutates it.
//!
//! Definitions keep their insertion order ("catalog order"), which the AI
//! uses to break ties deterministically.

use std::path::Path;

use rustc_hash::FxHashMap;
use serde::Deserialize;

use super::definition::{CardDefinition, CardName};
use crate::core::error::{CatalogError, GameError};

const EMBEDDED_CATALOG: &str = include_str!("../../data/catalog.json");

#[derive(Deserialize)]
struct RawCatalog {
    cards: Vec<CardDefinition>,
}

/// Registry of card definitions, keyed by name.
///
/// ## Example
///
/// ```
/// use city_deck::cards::{CardCatalog, CardDefinition};
///
/// let mut catalog = CardCatalog::new();
/// catalog.register(CardDefinition::new("Farm").with_supply(8)).unwrap();
///
/// let farm = catalog.get("Farm").unwrap();
/// assert_eq!(farm.supply, 8);
/// assert_eq!(catalog.total_supply(), 8);
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardCatalog {
    cards: Vec<CardDefinition>,
    index: FxHashMap<CardName, usize>,
}

impl CardCatalog {
    /// Create a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The catalog compiled into the crate.
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_json_str(EMBEDDED_CATALOG)
    }

    /// Parse a catalog from JSON of the form `{"cards": [...]}`.
    ///
    /// Every reduction and prerequisite must name a card in the catalog.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let raw: RawCatalog = serde_json::from_str(json)?;
        let mut catalog = Self::new();
        for card in raw.cards {
            catalog.register(card)?;
        }
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load a catalog from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Register a card definition.
    ///
    /// Fails if a card with the same name already exists.
    pub fn register(&mut self, card: CardDefinition) -> Result<(), CatalogError> {
        if self.index.contains_key(&card.name) {
            return Err(CatalogError::DuplicateCard(card.name));
        }
        self.index.insert(card.name.clone(), self.cards.len());
        self.cards.push(card);
        Ok(())
    }

    /// Check that every cross-reference points at a registered card.
    pub fn validate(&self) -> Result<(), CatalogError> {
        for card in &self.cards {
            let references = card.reductions.iter().chain(card.prerequisite.iter());
            for reference in references {
                if !self.contains(reference.as_str()) {
                    return Err(CatalogError::MissingReference {
                        card: card.name.clone(),
                        reference: reference.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Get a card definition by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CardDefinition> {
        self.index.get(name).map(|&i| &self.cards[i])
    }

    /// Get a card definition, failing with `UnknownCard`.
    pub fn lookup(&self, name: &str) -> Result<&CardDefinition, GameError> {
        self.get(name)
            .ok_or_else(|| GameError::UnknownCard(CardName::from(name)))
    }

    /// Position of a card in catalog order.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Check if a card name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Get the number of distinct cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Total number of card instances across all supply counts.
    #[must_use]
    pub fn total_supply(&self) -> usize {
        self.cards.iter().map(|c| c.supply as usize).sum()
    }

    /// Iterate over all definitions in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &CardDefinition> {
        self.cards.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Color, Formula};

    #[test]
    fn test_register_and_get() {
        let mut catalog = CardCatalog::new();
        catalog.register(CardDefinition::new("Farm").with_supply(3)).unwrap();

        assert_eq!(catalog.get("Farm").unwrap().supply, 3);
        assert!(catalog.get("Castle").is_none());
        assert_eq!(
            catalog.lookup("Castle").unwrap_err(),
            GameError::UnknownCard("Castle".into())
        );
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut catalog = CardCatalog::new();
        catalog.register(CardDefinition::new("Farm")).unwrap();

        let err = catalog.register(CardDefinition::new("Farm")).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateCard(name) if name == "Farm"));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_catalog_order() {
        let mut catalog = CardCatalog::new();
        for name in ["C", "A", "B"] {
            catalog.register(CardDefinition::new(name)).unwrap();
        }

        let names: Vec<_> = catalog.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["C", "A", "B"]);
        assert_eq!(catalog.position("A"), Some(1));
        assert_eq!(catalog.position("Z"), None);
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "cards": [
                {"name": "Farm", "supply": 4, "bonus": {"green": 1}, "points": 1},
                {"name": "Granary", "supply": 2, "price": 2, "points": "green", "prerequisite": "Farm"}
            ]
        }"#;
        let catalog = CardCatalog::from_json_str(json).unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.total_supply(), 6);
        assert_eq!(catalog.get("Farm").unwrap().bonus.get(Color::Green), 1);
        assert_eq!(catalog.get("Granary").unwrap().points, Formula::Color(Color::Green));
    }

    #[test]
    fn test_missing_reference() {
        let json = r#"{"cards": [{"name": "Granary", "prerequisite": "Farm"}]}"#;
        let err = CardCatalog::from_json_str(json).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::MissingReference { ref reference, .. } if reference == "Farm"
        ));
    }

    #[test]
    fn test_bad_json() {
        let err = CardCatalog::from_json_str("{\"cards\": [{\"name\": 3}]}").unwrap_err();
        assert!(matches!(err, CatalogError::Json(_)));
    }

    #[test]
    fn test_embedded_catalog() {
        let catalog = CardCatalog::embedded().unwrap();
        assert!(!catalog.is_empty());
        assert!(catalog.total_supply() > 40);

        // Every blue card is discounted by the administrative center
        for card in catalog.iter().filter(|c| c.bonus.blue > 0) {
            assert!(
                card.reductions.iter().any(|r| r == "Administrative Center"),
                "{} lacks the administrative discount",
                card.name
            );
        }
    }
}
