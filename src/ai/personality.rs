//! AI personalities and the weights they put on each signal.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Playing style of a computer seat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Personality {
    /// Chases points.
    Aggressive,
    /// Builds income first.
    Economic,
    /// No strong preference.
    Balanced,
    /// Keeps a large hand.
    Defensive,
    /// Grabs discounted cards.
    Opportunistic,
}

impl Personality {
    pub const ALL: [Personality; 5] = [
        Personality::Aggressive,
        Personality::Economic,
        Personality::Balanced,
        Personality::Defensive,
        Personality::Opportunistic,
    ];

    /// Signal weights for this personality.
    #[must_use]
    pub const fn weights(self) -> Weights {
        match self {
            Personality::Aggressive => Weights {
                points: 1.0,
                money: 0.3,
                safety: 0.1,
                patience: 0.1,
                discount: 0.0,
            },
            Personality::Economic => Weights {
                points: 0.4,
                money: 1.0,
                safety: 0.2,
                patience: 0.3,
                discount: 0.2,
            },
            Personality::Balanced => Weights {
                points: 0.6,
                money: 0.6,
                safety: 0.4,
                patience: 0.3,
                discount: 0.2,
            },
            Personality::Defensive => Weights {
                points: 0.4,
                money: 0.3,
                safety: 1.0,
                patience: 0.5,
                discount: 0.1,
            },
            Personality::Opportunistic => Weights {
                points: 0.8,
                money: 0.5,
                safety: 0.2,
                patience: 0.2,
                discount: 1.0,
            },
        }
    }

    /// Capitalized name for tables.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Personality::Aggressive => "Aggressive",
            Personality::Economic => "Economic",
            Personality::Balanced => "Balanced",
            Personality::Defensive => "Defensive",
            Personality::Opportunistic => "Opportunistic",
        }
    }
}

impl fmt::Display for Personality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label().to_lowercase())
    }
}

impl FromStr for Personality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Personality::ALL
            .into_iter()
            .find(|p| p.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown personality: {s}"))
    }
}

/// Relative weight of each signal in a decision.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Weights {
    /// Projected point gain of a build.
    pub points: f64,
    /// Projected income gain of a build.
    pub money: f64,
    /// Cards left in hand afterwards.
    pub safety: f64,
    /// Flat preference for drawing over building.
    pub patience: f64,
    /// Cards saved by reductions.
    pub discount: f64,
}
