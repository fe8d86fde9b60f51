//! Engine module - The inclusion/exclusion decisions
//!
//! Provides:
//! - pruner: Directory pruning before descent
//! - classifier: Ordered file rules

pub mod classifier;
pub mod pruner;
