//! AI battles: many seeded games between personalities.
//!
//! Each game seats one `AiPolicy` per listed personality, plays under a
//! per-round turn ceiling, and credits the winner's personality. Points and
//! games played are tallied for every seat. A personality listed twice
//! shares one record.

use std::fmt;

use serde::Serialize;
use tracing::info;

use crate::ai::{AiPolicy, Personality};
use crate::cards::CardCatalog;
use crate::core::{GameConfig, GameError, GameRng, TurnCounting};
use crate::rules::TurnEngine;

/// Configuration for a battle.
#[derive(Clone, Debug, PartialEq)]
pub struct BattleConfig {
    /// Games to play.
    pub games: u32,

    /// Battle seed. Each game's seed is forked from it.
    pub seed: u64,

    /// Difficulty of every AI.
    pub difficulty: f64,

    /// Round ceiling per game.
    pub max_rounds: u32,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            games: 10,
            seed: 0,
            difficulty: 1.0,
            max_rounds: 30,
        }
    }
}

/// Fewest personalities a battle accepts.
pub const MIN_PERSONALITIES: usize = 2;

impl BattleConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of games.
    #[must_use]
    pub fn with_games(mut self, games: u32) -> Self {
        self.games = games;
        self
    }

    /// Set the battle seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the difficulty of every AI.
    #[must_use]
    pub fn with_difficulty(mut self, difficulty: f64) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Set the round ceiling per game.
    #[must_use]
    pub fn with_max_rounds(mut self, rounds: u32) -> Self {
        self.max_rounds = rounds;
        self
    }

    /// Rules each battle game is played under.
    #[must_use]
    pub fn game_config(&self) -> GameConfig {
        GameConfig::default().with_turn_limit(self.max_rounds, TurnCounting::PerRound)
    }
}

/// Tally for one personality.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PersonalityRecord {
    pub personality: Personality,
    pub wins: u32,
    pub total_points: u64,
    /// Seats played across all games.
    pub games: u32,
}

impl PersonalityRecord {
    fn new(personality: Personality) -> Self {
        Self {
            personality,
            wins: 0,
            total_points: 0,
            games: 0,
        }
    }

    /// Wins as a percentage of `battle_games`.
    #[must_use]
    pub fn win_rate(&self, battle_games: u32) -> f64 {
        if battle_games == 0 {
            return 0.0;
        }
        f64::from(self.wins) * 100.0 / f64::from(battle_games)
    }

    /// Average final points per seat played.
    #[must_use]
    pub fn avg_points(&self) -> f64 {
        self.total_points as f64 / f64::from(self.games.max(1))
    }
}

/// Outcome of a battle.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BattleReport {
    /// Games played.
    pub games: u32,
    /// Sorted by wins, most first. Ties keep listing order.
    pub entries: Vec<PersonalityRecord>,
}

impl BattleReport {
    /// Record for a personality.
    #[must_use]
    pub fn record(&self, personality: Personality) -> Option<&PersonalityRecord> {
        self.entries.iter().find(|r| r.personality == personality)
    }
}

impl fmt::Display for BattleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Results after {} game(s):", self.games)?;
        for entry in &self.entries {
            writeln!(
                f,
                "{:13} | wins: {:3} ({:5.1}%) | avg points: {:5.1}",
                entry.personality.label(),
                entry.wins,
                entry.win_rate(self.games),
                entry.avg_points()
            )?;
        }
        Ok(())
    }
}

/// Play `config.games` games between `personalities`.
///
/// Fails with `TooFewPlayers` unless at least two personalities are listed.
pub fn run_battle(
    catalog: &CardCatalog,
    personalities: &[Personality],
    config: &BattleConfig,
) -> Result<BattleReport, GameError> {
    if personalities.len() < MIN_PERSONALITIES {
        return Err(GameError::TooFewPlayers {
            min: MIN_PERSONALITIES,
            got: personalities.len(),
        });
    }

    let mut entries: Vec<PersonalityRecord> = Vec::new();
    for &p in personalities {
        if !entries.iter().any(|r| r.personality == p) {
            entries.push(PersonalityRecord::new(p));
        }
    }

    let game_config = config.game_config();
    let mut master = GameRng::new(config.seed);

    for game in 0..config.games {
        let seed = master.fork().seed();
        let mut engine = TurnEngine::new(catalog, game_config.clone(), seed);
        for &p in personalities {
            engine.add_player(format!("AI-{}", p.label()), AiPolicy::new(p, config.difficulty))?;
        }

        let report = engine.run()?;

        for (rank, standing) in report.standings.iter().enumerate() {
            let personality = personalities[standing.player.index()];
            if let Some(entry) = entries.iter_mut().find(|r| r.personality == personality) {
                if rank == 0 {
                    entry.wins += 1;
                }
                entry.total_points += u64::from(standing.points);
                entry.games += 1;
            }
        }

        if let Some(winner) = report.winner() {
            info!(
                game = game + 1,
                seed,
                winner = %winner.name,
                points = winner.points,
                reason = %report.reason,
                "battle game finished"
            );
        }
    }

    entries.sort_by(|a, b| b.wins.cmp(&a.wins));
    Ok(BattleReport {
        games: config.games,
        entries,
    })
}
