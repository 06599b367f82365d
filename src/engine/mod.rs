//! Engine controller for running the search alongside an interactive game.
//!
//! The presentation thread owns a [`GameController`], starts a search when
//! it is the engine's turn and polls once per frame until the move has been
//! played.

mod controller;

pub use controller::{GameController, SearchUpdate};
