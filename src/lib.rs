//! Match-three cascade simulator (workspace facade crate).
//!
//! The implementation lives in the crates under `crates/`; this package re-exports them
//! under one name and hosts the `cascade_sim` runner.

pub use cascade_analysis as analysis;
pub use cascade_core as core;
pub use cascade_engine as engine;
pub use cascade_eval as eval;
pub use cascade_search as search;
