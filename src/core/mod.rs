pub mod assumptions;
mod engine;
pub mod healthcare;
pub mod social_security;
pub mod tax;
mod types;

pub use engine::{
    DEFAULT_RUN_COUNT, FixedReturns, GaussianReturns, ReturnModel, WITHDRAWAL_ANALYSIS_RUNS,
    calculate_weighted_returns, run_deterministic_projection, run_monte_carlo,
    run_monte_carlo_with, run_monte_carlo_with_budget, sustainable_withdrawal_rate,
    validate_inputs, validate_inputs_with_budget,
};
pub use types::{
    AccountAllocation, BenefitEstimate, FilingStatus, HealthcareCostPoint, InputError,
    ReturnAssumption, RunBudget, SimulationInputs, SimulationResult, TaxAssessment,
    WithdrawalAnalysis,
};
