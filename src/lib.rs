#![doc = "Short-burst redistricting search for majority-minority districts"]
mod error;
mod graph;
mod partition;
mod plan;

pub mod burst;
pub mod chain;
pub mod config;
pub mod constraints;
pub mod metrics;
pub mod proposal;

#[doc(inline)]
pub use error::Error;

#[doc(inline)]
pub use graph::{DualGraph, Graph, GraphDocument, GraphSummary, NodeRecord, WeightMatrix};

#[doc(inline)]
pub use plan::{Plan, SeedBudget};

#[doc(inline)]
pub use burst::{BurstOutcome, BurstRecord, BurstSummary, ShortBurstReport, ShortBursts};

#[doc(inline)]
pub use config::BurstConfig;

#[doc(inline)]
pub use metrics::{ideal_population, MajorityMinority, Tally};
