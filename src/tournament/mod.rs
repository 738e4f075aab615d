//! Repeated AI-only games for comparing personalities.

pub mod battle;

pub use battle::{run_battle, BattleConfig, BattleReport, PersonalityRecord, MIN_PERSONALITIES};
