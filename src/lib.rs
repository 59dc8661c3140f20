//! Retirement portfolio projection engine: Monte Carlo balance
//! trajectories plus deterministic Social Security, federal tax, and
//! healthcare cost calculators, served over HTTP and a CLI.

pub mod api;
pub mod core;
