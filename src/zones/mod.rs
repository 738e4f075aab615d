//! Shared card zones.
//!
//! Hands and cities belong to `PlayerState`; everything else lives in the
//! shared `DrawPile` (draw list plus discard list).

pub mod draw_pile;

pub use draw_pile::DrawPile;
