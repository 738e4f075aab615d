//! city-sim: run AI games and AI battles from the command line.
//!
//! - `city-sim game` - one AI-only game, printing the final standings
//! - `city-sim battle` - many games between personalities, printing a table
//!
//! Logging goes through `RUST_LOG` (default `info`, `--verbose` for `debug`).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use city_deck::ai::{AiPolicy, Personality};
use city_deck::cards::CardCatalog;
use city_deck::core::GameConfig;
use city_deck::rules::TurnEngine;
use city_deck::tournament::{run_battle, BattleConfig};

#[derive(Parser)]
#[command(name = "city-sim")]
#[command(about = "City-building card game simulator", version)]
struct Cli {
    /// Card catalog JSON (defaults to the built-in catalog)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one AI-only game
    Game {
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Comma-separated personalities, one seat each
        #[arg(long, value_delimiter = ',', default_value = "aggressive,economic")]
        personalities: Vec<Personality>,

        /// 0.0 plays randomly, 1.0 always plays its best option
        #[arg(long, default_value_t = 1.0)]
        difficulty: f64,

        /// Game rules JSON (missing fields use defaults)
        #[arg(long)]
        rules: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compare personalities over many games
    Battle {
        #[arg(long, default_value_t = 10)]
        games: u32,

        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Comma-separated personalities (at least two)
        #[arg(
            long,
            value_delimiter = ',',
            default_value = "aggressive,economic,balanced,defensive,opportunistic"
        )]
        personalities: Vec<Personality>,

        #[arg(long, default_value_t = 1.0)]
        difficulty: f64,

        /// Round ceiling per game
        #[arg(long, default_value_t = 30)]
        max_rounds: u32,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if cli.verbose { "debug" } else { "info" }));
    fmt().with_env_filter(filter).with_target(false).init();

    let catalog = load_catalog(cli.catalog.as_deref())?;

    match cli.command {
        Commands::Game {
            seed,
            personalities,
            difficulty,
            rules,
            json,
        } => play_game(&catalog, seed, &personalities, difficulty, rules.as_deref(), json),
        Commands::Battle {
            games,
            seed,
            personalities,
            difficulty,
            max_rounds,
        } => {
            let config = BattleConfig::new()
                .with_games(games)
                .with_seed(seed)
                .with_difficulty(difficulty)
                .with_max_rounds(max_rounds);
            let report = run_battle(&catalog, &personalities, &config)?;
            print!("{report}");
            Ok(())
        }
    }
}

fn load_catalog(path: Option<&Path>) -> Result<CardCatalog> {
    match path {
        Some(path) => CardCatalog::from_path(path)
            .with_context(|| format!("loading catalog from {}", path.display())),
        None => CardCatalog::embedded().context("loading built-in catalog"),
    }
}

fn play_game(
    catalog: &CardCatalog,
    seed: u64,
    personalities: &[Personality],
    difficulty: f64,
    rules: Option<&Path>,
    json: bool,
) -> Result<()> {
    let config = match rules {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading rules from {}", path.display()))?;
            serde_json::from_str::<GameConfig>(&text).context("parsing rules")?
        }
        None => GameConfig::default(),
    };

    let mut engine = TurnEngine::new(catalog, config, seed);
    for (i, &personality) in personalities.iter().enumerate() {
        engine.add_player(
            format!("AI-{}-{}", i + 1, personality.label()),
            AiPolicy::new(personality, difficulty),
        )?;
    }

    let report = engine.run()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Game over after {} turn(s): {}", report.turns, report.reason);
    for (rank, standing) in report.standings.iter().enumerate() {
        let city: Vec<&str> = standing.city.iter().map(|c| c.as_str()).collect();
        println!(
            "{}. {} - {} point(s), {} money, city: [{}]",
            rank + 1,
            standing.name,
            standing.points,
            standing.money,
            city.join(", ")
        );
    }
    Ok(())
}
