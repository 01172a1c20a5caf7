//! Container load planning.
//!
//! Expands a cargo catalog into units, sorts them into one loading sequence
//! and packs them with an anchor-point heuristic into the container type
//! preferred by each planning strategy.

pub mod aggregate;
pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod filler;
pub mod geometry;
pub mod logging;
pub mod model;
pub mod optimizer;
pub mod placement;
pub mod report;
pub mod sequence;
pub mod strategy;
pub mod types;
