//! Session-level errors.

use thiserror::Error;
use wanderer_rules::{ConfigError, EntityId};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no character with id {0} in this session")]
    UnknownCharacter(EntityId),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}
