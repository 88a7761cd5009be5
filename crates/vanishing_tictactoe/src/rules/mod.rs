//! Pure rule evaluation over a board.
//!
//! These functions only read a [`Board`](crate::Board). Move application,
//! eviction, and turn order live in [`Game`](crate::Game).

pub mod draw;
pub mod win;

pub use draw::is_draw;
pub use win::{LINES, check_winner, winning_line};
