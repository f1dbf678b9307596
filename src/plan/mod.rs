mod io;
mod plan;

pub use plan::{Plan, SeedBudget};
