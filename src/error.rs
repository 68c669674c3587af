//! Recoverable outcomes of orders and spawn requests.
//!
//! Nothing here is fatal: the system that produces a rejection logs it and carries on.

use bevy::prelude::Entity;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum OrderRejection {
    #[error("agent {0} is no longer live")]
    StaleReference(Entity),

    #[error("no live agents selected")]
    EmptySelection,

    #[error("formation requested for zero agents")]
    InvalidCount,

    #[error("patrol needs exactly one selected agent, {0} selected")]
    PatrolNeedsSingleAgent(usize),

    #[error("cost {cost} exceeds treasury balance {balance:.1}")]
    InsufficientFunds { cost: u32, balance: f32 },
}
