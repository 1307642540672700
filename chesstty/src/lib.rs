//! Play Lichess games from the terminal.
//!
//! The [`session`] module holds the game loop. It consumes events from a
//! [`chess_client::BoardService`], keeps a local board mirror in sync, and
//! prompts for moves on the player's turn.

pub mod commands;
pub mod config;
pub mod input;
pub mod logging;
pub mod output;
pub mod session;
