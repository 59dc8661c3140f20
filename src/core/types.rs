use serde::Serialize;
use thiserror::Error;

/// Inputs rejected before any computation runs. Degenerate-but-defined
/// cases (empty account list, zero income) are not errors; they fall back
/// to documented values instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("starting balance must be a non-negative finite number")]
    InvalidStartingBalance,
    #[error("annual net contribution must be finite")]
    InvalidNetContribution,
    #[error("years must be at least 1")]
    ZeroYears,
    #[error("years must not exceed {max}")]
    YearsOverBudget { max: u32 },
    #[error("run count must be at least 1")]
    ZeroRuns,
    #[error("simulation size {cells} exceeds the budget of {max} trajectory cells")]
    RunsOverBudget { cells: u64, max: u64 },
    #[error("return mean must be finite")]
    InvalidReturnMean,
    #[error("return standard deviation must be non-negative and finite")]
    InvalidReturnStd,
    #[error("account balance must be non-negative and finite")]
    InvalidAccountBalance,
    #[error("allocation percentages must lie within 0-100")]
    AllocationOutOfRange,
    #[error("allocation percentages must sum to 100, got {total}")]
    AllocationSum { total: f64 },
    #[error("portfolio value must be positive for withdrawal analysis")]
    NonPositivePortfolio,
    #[error("annual expenses must be non-negative and finite")]
    InvalidExpenses,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FilingStatus {
    Single,
    MarriedJoint,
    MarriedSeparate,
    HeadOfHousehold,
}

#[derive(Debug, Clone)]
pub struct AccountAllocation {
    pub balance: f64,
    pub stock_pct: f64,
    pub bond_pct: f64,
    pub cash_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnAssumption {
    pub mean: f64,
    pub std_dev: f64,
}

#[derive(Debug, Clone)]
pub struct SimulationInputs {
    pub starting_balance: f64,
    /// Signed: positive while saving, negative while drawing down.
    pub annual_net_contribution: f64,
    pub years: u32,
    pub return_mean: f64,
    pub return_std: f64,
    pub runs: u32,
    pub seed: u64,
}

/// Upper bounds on simulation size, enforced during validation. A cell is
/// one `(run, year)` balance entry, so `max_cells` caps both arena memory
/// and total draw work.
#[derive(Debug, Clone, Copy)]
pub struct RunBudget {
    pub max_years: u32,
    pub max_cells: u64,
}

impl Default for RunBudget {
    fn default() -> Self {
        Self {
            max_years: 120,
            max_cells: 16_000_000,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub percentile10: Vec<f64>,
    pub percentile25: Vec<f64>,
    pub median: Vec<f64>,
    pub percentile75: Vec<f64>,
    pub percentile90: Vec<f64>,
    pub success_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalAnalysis {
    pub rate: f64,
    pub success_probability: f64,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BenefitEstimate {
    pub monthly_benefit: f64,
    pub annual_benefit: f64,
    pub full_retirement_age: f64,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxAssessment {
    pub tax: f64,
    pub effective_rate: f64,
    pub taxable_income: f64,
    pub deduction_applied: f64,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthcareCostPoint {
    pub age: u32,
    pub annual_cost: f64,
}
