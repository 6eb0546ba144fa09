//! fd-game: the interactive console game.
//!
//! Owns the dialogue: menus, the win-probability table shown on help, and the
//! game flow driving `fd_fair` commitments for the first move and both throws.
//! Input and output are generic `BufRead`/`Write` so whole games can be scripted.

pub mod prompt;
pub mod session;
pub mod table;

pub use prompt::{ask, parse_choice, write_menu, MenuChoice};
pub use session::{
    version_info, Game, GameError, GameOptions, GameReport, Outcome, Player, Purpose,
};
pub use table::{render_probability_table, CORNER};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");


#[cfg(test)]
mod session_tests;
