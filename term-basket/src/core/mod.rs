//! Core types: the [`RuleMiner`] run and its [`MiningReport`].

mod miner;
mod report;

pub use miner::{RuleMiner, RuleMinerBuilder};
pub use report::{MiningReport, MiningStats};
