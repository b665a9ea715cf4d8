//! # Wanderer Core
//!
//! The simulation engines of the wanderer world. This crate drives the data
//! defined in `wanderer_rules`: villagers talk, the forest lives and the sky
//! changes on its own schedule.
//!
//! ## Core Components
//!
//! - **dialogue**: Condition-gated dialogue trees and the relationship engine
//! - **ecosystem**: Creature vitals, feeding, respawning and energy sharing
//! - **scheduler**: Weather, day cycle and random world incidents on a task queue
//! - **routine**: Idle behaviour of villagers between conversations
//! - **session**: The per-run context tying the engines to one shared world
//!
//! ## Design Philosophy
//!
//! - **Tick-Driven**: Everything advances from one cooperative game loop
//! - **Explicit Context**: The world is owned by a session and passed by reference
//! - **Data, Not Closures**: Conditions and effects are plain serializable values

pub mod dialogue;
pub mod ecosystem;
pub mod error;
pub mod notice;
pub mod random;
pub mod routine;
pub mod scheduler;
pub mod session;

pub use dialogue::*;
pub use ecosystem::*;
pub use error::*;
pub use notice::*;
pub use random::*;
pub use routine::*;
pub use scheduler::*;
pub use session::*;
