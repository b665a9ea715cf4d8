//! # Wanderer Rules
//!
//! The "world bible" crate - world state, character and wildlife definitions,
//! game mechanics enums and tuning configuration.
//! This crate holds data and invariants only; the engines that drive it live
//! in `wanderer_core`.

pub mod config;
pub mod entities;
pub mod mechanics;
pub mod world_state;

pub use config::*;
pub use entities::*;
pub use mechanics::*;
pub use world_state::*;
