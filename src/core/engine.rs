//! Portfolio projection: deterministic compounding, Monte Carlo
//! simulation with percentile banding and a survival metric, allocation-
//! weighted return aggregation, and withdrawal-rate analysis.

use std::time::Instant;

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use rayon::prelude::*;
use tracing::info;

use crate::core::assumptions::{
    BOND_ASSUMPTION, CASH_ASSUMPTION, DEFAULT_ASSUMPTION, STOCK_ASSUMPTION,
};
use crate::core::types::{
    AccountAllocation, InputError, ReturnAssumption, RunBudget, SimulationInputs,
    SimulationResult, WithdrawalAnalysis,
};

pub const DEFAULT_RUN_COUNT: u32 = 10_000;
/// Run count used by the withdrawal-rate analysis.
pub const WITHDRAWAL_ANALYSIS_RUNS: u32 = 5_000;

const PERCENTILE_LEVELS: [f64; 5] = [10.0, 25.0, 50.0, 75.0, 90.0];
const ALLOCATION_SUM_TOLERANCE: f64 = 1e-6;

/// One annual-return draw. Implementations own the distribution; the
/// simulation loop owns the RNG stream, so any model stays reproducible
/// under seeded runs.
pub trait ReturnModel {
    fn draw(&self, rng: &mut dyn RngCore) -> f64;
}

/// Normally distributed annual returns. A zero standard deviation is
/// valid and degenerates to drawing the mean every year.
#[derive(Debug, Clone, Copy)]
pub struct GaussianReturns {
    normal: Normal<f64>,
}

impl GaussianReturns {
    pub fn new(mean: f64, std_dev: f64) -> Result<Self, InputError> {
        if !mean.is_finite() {
            return Err(InputError::InvalidReturnMean);
        }
        if !std_dev.is_finite() || std_dev < 0.0 {
            return Err(InputError::InvalidReturnStd);
        }
        let normal = Normal::new(mean, std_dev).map_err(|_| InputError::InvalidReturnStd)?;
        Ok(Self { normal })
    }
}

impl ReturnModel for GaussianReturns {
    fn draw(&self, rng: &mut dyn RngCore) -> f64 {
        self.normal.sample(rng)
    }
}

/// The same return every year; no randomness consumed.
#[derive(Debug, Clone, Copy)]
pub struct FixedReturns {
    pub annual_return: f64,
}

impl ReturnModel for FixedReturns {
    fn draw(&self, _rng: &mut dyn RngCore) -> f64 {
        self.annual_return
    }
}

pub fn validate_inputs(inputs: &SimulationInputs) -> Result<(), InputError> {
    validate_inputs_with_budget(inputs, &RunBudget::default())
}

pub fn validate_inputs_with_budget(
    inputs: &SimulationInputs,
    budget: &RunBudget,
) -> Result<(), InputError> {
    if !inputs.starting_balance.is_finite() || inputs.starting_balance < 0.0 {
        return Err(InputError::InvalidStartingBalance);
    }
    if !inputs.annual_net_contribution.is_finite() {
        return Err(InputError::InvalidNetContribution);
    }
    if inputs.years == 0 {
        return Err(InputError::ZeroYears);
    }
    if inputs.years > budget.max_years {
        return Err(InputError::YearsOverBudget {
            max: budget.max_years,
        });
    }
    if inputs.runs == 0 {
        return Err(InputError::ZeroRuns);
    }
    if !inputs.return_mean.is_finite() {
        return Err(InputError::InvalidReturnMean);
    }
    if !inputs.return_std.is_finite() || inputs.return_std < 0.0 {
        return Err(InputError::InvalidReturnStd);
    }
    let cells = u64::from(inputs.runs) * (u64::from(inputs.years) + 1);
    if cells > budget.max_cells {
        return Err(InputError::RunsOverBudget {
            cells,
            max: budget.max_cells,
        });
    }
    Ok(())
}

/// Compounds `B[t] = B[t-1]*(1+r) + C` for `years` steps, index 0 holding
/// the starting balance. No floor: a negative balance signals depletion in
/// a withdrawal scenario and is the caller's failure condition.
pub fn run_deterministic_projection(
    starting_balance: f64,
    annual_contribution: f64,
    years: u32,
    annual_return: f64,
) -> Vec<f64> {
    let mut balances = Vec::with_capacity(years as usize + 1);
    let mut balance = starting_balance;
    balances.push(balance);
    for _ in 0..years {
        balance = balance * (1.0 + annual_return) + annual_contribution;
        balances.push(balance);
    }
    balances
}

/// Monte Carlo projection with Gaussian annual returns built from the
/// inputs' mean and standard deviation.
pub fn run_monte_carlo(inputs: &SimulationInputs) -> Result<SimulationResult, InputError> {
    run_monte_carlo_with_budget(inputs, &RunBudget::default())
}

pub fn run_monte_carlo_with_budget(
    inputs: &SimulationInputs,
    budget: &RunBudget,
) -> Result<SimulationResult, InputError> {
    validate_inputs_with_budget(inputs, budget)?;
    let model = GaussianReturns::new(inputs.return_mean, inputs.return_std)?;
    Ok(simulate(inputs, &model))
}

/// Monte Carlo projection drawing returns from a caller-supplied model.
pub fn run_monte_carlo_with<M: ReturnModel + Sync>(
    inputs: &SimulationInputs,
    model: &M,
) -> Result<SimulationResult, InputError> {
    validate_inputs(inputs)?;
    Ok(simulate(inputs, model))
}

fn simulate<M: ReturnModel + Sync>(inputs: &SimulationInputs, model: &M) -> SimulationResult {
    let started = Instant::now();
    let runs = inputs.runs as usize;
    let years = inputs.years as usize;
    let stride = years + 1;

    // One flat (run, year) buffer holds every trajectory; each run owns a
    // disjoint row, so rows fill in parallel and the outcome is identical
    // to a sequential pass for the same base seed.
    let mut arena = vec![0.0_f64; runs * stride];
    arena
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(run, row)| {
            let mut rng = ChaCha8Rng::seed_from_u64(derive_run_seed(inputs.seed, run as u64));
            let mut balance = inputs.starting_balance;
            row[0] = balance;
            for slot in row.iter_mut().skip(1) {
                let annual_return = model.draw(&mut rng);
                balance = balance * (1.0 + annual_return) + inputs.annual_net_contribution;
                // A depleted account cannot go negative and cannot
                // recover through further market returns.
                balance = balance.max(0.0);
                *slot = balance;
            }
        });

    let mut bands: [Vec<f64>; 5] = std::array::from_fn(|_| Vec::with_capacity(stride));
    let mut column = vec![0.0_f64; runs];
    for year in 0..stride {
        for (run, value) in column.iter_mut().enumerate() {
            *value = arena[run * stride + year];
        }
        column.sort_by(|a, b| a.total_cmp(b));
        for (band, level) in bands.iter_mut().zip(PERCENTILE_LEVELS) {
            band.push(column[rank_index(runs, level)]);
        }
    }
    let [percentile10, percentile25, median, percentile75, percentile90] = bands;

    let survivors = arena
        .chunks_exact(stride)
        .filter(|row| row[years] > 0.0)
        .count();
    let success_rate = survivors as f64 / runs as f64;

    info!(
        runs = inputs.runs,
        years = inputs.years,
        success_rate,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "monte carlo projection complete"
    );

    SimulationResult {
        percentile10,
        percentile25,
        median,
        percentile75,
        percentile90,
        success_rate,
    }
}

/// Order-statistic rank for a sorted column of `count` values:
/// `ceil(percentile/100 * count) - 1`, clamped to the valid index range.
/// Systematic selection, deliberately not interpolated.
fn rank_index(count: usize, percentile: f64) -> usize {
    let rank = ((percentile / 100.0) * count as f64).ceil() as i64 - 1;
    rank.clamp(0, count as i64 - 1) as usize
}

fn derive_run_seed(base_seed: u64, run: u64) -> u64 {
    splitmix64(base_seed ^ run.wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Blends the static asset-class assumptions by each account's share of
/// total balance. The standard deviation is a weighted sum of per-class
/// volatilities; cross-asset correlation is deliberately ignored, which
/// understates diversified risk. An empty list or zero total balance
/// yields the balanced default rather than dividing by zero.
pub fn calculate_weighted_returns(
    accounts: &[AccountAllocation],
) -> Result<ReturnAssumption, InputError> {
    for account in accounts {
        validate_allocation(account)?;
    }
    let total_balance: f64 = accounts.iter().map(|account| account.balance).sum();
    if total_balance == 0.0 {
        return Ok(DEFAULT_ASSUMPTION);
    }

    let mut stock_share = 0.0;
    let mut bond_share = 0.0;
    let mut cash_share = 0.0;
    for account in accounts {
        let weight = account.balance / total_balance;
        stock_share += account.stock_pct / 100.0 * weight;
        bond_share += account.bond_pct / 100.0 * weight;
        cash_share += account.cash_pct / 100.0 * weight;
    }

    Ok(ReturnAssumption {
        mean: stock_share * STOCK_ASSUMPTION.mean
            + bond_share * BOND_ASSUMPTION.mean
            + cash_share * CASH_ASSUMPTION.mean,
        std_dev: stock_share * STOCK_ASSUMPTION.std_dev
            + bond_share * BOND_ASSUMPTION.std_dev
            + cash_share * CASH_ASSUMPTION.std_dev,
    })
}

fn validate_allocation(account: &AccountAllocation) -> Result<(), InputError> {
    if !account.balance.is_finite() || account.balance < 0.0 {
        return Err(InputError::InvalidAccountBalance);
    }
    for pct in [account.stock_pct, account.bond_pct, account.cash_pct] {
        if !pct.is_finite() || !(0.0..=100.0).contains(&pct) {
            return Err(InputError::AllocationOutOfRange);
        }
    }
    let total = account.stock_pct + account.bond_pct + account.cash_pct;
    if (total - 100.0).abs() > ALLOCATION_SUM_TOLERANCE {
        return Err(InputError::AllocationSum { total });
    }
    Ok(())
}

/// The raw `expenses / portfolio` ratio, plus the survival probability of
/// actually withdrawing that much each year over the horizon.
pub fn sustainable_withdrawal_rate(
    portfolio: f64,
    annual_expenses: f64,
    years: u32,
    assumption: ReturnAssumption,
    seed: u64,
) -> Result<WithdrawalAnalysis, InputError> {
    if !portfolio.is_finite() || portfolio <= 0.0 {
        return Err(InputError::NonPositivePortfolio);
    }
    if !annual_expenses.is_finite() || annual_expenses < 0.0 {
        return Err(InputError::InvalidExpenses);
    }
    let inputs = SimulationInputs {
        starting_balance: portfolio,
        annual_net_contribution: -annual_expenses,
        years,
        return_mean: assumption.mean,
        return_std: assumption.std_dev,
        runs: WITHDRAWAL_ANALYSIS_RUNS,
        seed,
    };
    let result = run_monte_carlo(&inputs)?;
    Ok(WithdrawalAnalysis {
        rate: annual_expenses / portfolio,
        success_probability: result.success_rate,
    })
}
