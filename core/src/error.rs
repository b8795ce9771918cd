//! Error taxonomy shared by the world, the systems and the session.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a player command may be rejected by the world.
///
/// Every variant is locally recoverable: the world leaves its state untouched
/// and reports the rejection through an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum CommandError {
    /// The player cannot afford the requested action.
    #[error("insufficient funds: need {required} gold, have {available}")]
    InsufficientFunds {
        /// Gold required by the action.
        required: u32,
        /// Gold available when the command was applied.
        available: u32,
    },
    /// The requested cell already hosts a tower.
    #[error("cell is already occupied by a tower")]
    CellOccupied,
    /// The requested cell lies on the path or outside the grid.
    #[error("cell is not buildable")]
    CellNotBuildable,
    /// No tower with the provided identifier exists.
    #[error("tower not found")]
    TowerNotFound,
    /// The tower already reached the level cap.
    #[error("tower is already at the maximum level")]
    TowerAtMaxLevel,
    /// The session reached a terminal status and accepts no further intents.
    #[error("session is over")]
    SessionOver,
}

/// Errors raised while validating session configuration.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The provided parameters are jointly infeasible.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl ConfigError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }
}
