//! Card system: definitions and the catalog.
//!
//! ## Key Types
//!
//! - `CardName`: Unique card key; hands and cities are lists of names
//! - `Color` / `ColorBonus`: The three bonus colors and per-card magnitudes
//! - `Formula`: Literal or color-keyed money/points value
//! - `CardDefinition`: Static card data
//! - `CardCatalog`: Read-only lookup by name

pub mod definition;
pub mod registry;

pub use definition::{CardDefinition, CardName, Color, ColorBonus, Formula};
pub use registry::CardCatalog;
