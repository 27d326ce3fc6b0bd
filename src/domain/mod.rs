//! Core domain types and the analysis pipeline.

pub mod analysis;
pub mod config_validation;
pub mod error;
pub mod metrics;
pub mod portfolio;
pub mod prices;
pub mod returns;
pub mod risk_parity;
pub mod stats;
pub mod universe;
pub mod weights;
