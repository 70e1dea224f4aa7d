//! cascade-engine - board resolution: removal, gravity, refill and the cascade loop.
//!
//! All mutation happens on a board the caller owns. Speculative callers clone first.

pub mod apply;
pub mod cascade;
pub mod config;
pub mod gravity;

pub use apply::apply_swap;
pub use cascade::{resolve, resolve_step, Resolution};
pub use config::{EngineConfig, EngineError, DEFAULT_MAX_CASCADES};
pub use gravity::{apply_gravity, refill, RefillPolicy};
