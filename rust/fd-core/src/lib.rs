//! fd-core: dice model, win-probability engine, and configuration.

pub mod config;
pub mod dice;
pub mod probability;

pub use config::{Config, ConfigError, MIN_GAME_DICE};
pub use dice::{DiceError, DiceSet, Die, MIN_FACES};
pub use probability::{
    best_counter, compare, matchups, tie_probability, win_probability, Matchups, Odds,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_nonempty() {
        assert!(!VERSION.is_empty());
    }
}
