//! Healthcare cost estimation: the pre-Medicare age cost curve, the flat
//! Medicare-era figure, and the ACA premium subsidy with its 400% FPL
//! cliff.

use crate::core::assumptions::{
    ACA_CLIFF_FPL_PCT, ACA_FULL_SUBSIDY_FPL_PCT, ACA_MAX_CONTRIBUTION_RATE, FPL_BASE,
    FPL_PER_ADDITIONAL_PERSON, MEDICARE_ANNUAL_COST, MEDICARE_ELIGIBILITY_AGE,
    PRE_MEDICARE_COSTS,
};
use crate::core::types::HealthcareCostPoint;

/// Annual healthcare cost at one age. Ages 65+ pay the flat Medicare
/// figure; 55-64 read the table directly; ages below the table are
/// extrapolated linearly along the first segment's slope and floored at
/// zero.
pub fn annual_cost(age: u32) -> f64 {
    if age >= MEDICARE_ELIGIBILITY_AGE {
        return MEDICARE_ANNUAL_COST;
    }
    let (first_age, first_cost) = PRE_MEDICARE_COSTS[0];
    if age < first_age {
        let (second_age, second_cost) = PRE_MEDICARE_COSTS[1];
        let slope = (second_cost - first_cost) / f64::from(second_age - first_age);
        return (first_cost - slope * f64::from(first_age - age)).max(0.0);
    }
    PRE_MEDICARE_COSTS[(age - first_age) as usize].1
}

/// Cost at every age in the inclusive range, oldest last. An inverted
/// range yields an empty curve.
pub fn cost_curve(from_age: u32, to_age: u32) -> Vec<HealthcareCostPoint> {
    (from_age..=to_age)
        .map(|age| HealthcareCostPoint {
            age,
            annual_cost: annual_cost(age),
        })
        .collect()
}

/// Federal Poverty Level for a household. A size of zero is treated as a
/// single-person household.
pub fn federal_poverty_level(household_size: u32) -> f64 {
    let additional_members = household_size.max(1) - 1;
    FPL_BASE + f64::from(additional_members) * FPL_PER_ADDITIONAL_PERSON
}

/// ACA premium subsidy. The required household contribution is zero at or
/// below 150% FPL and rises linearly to 8.5% of income at 400% FPL; at or
/// above 400% the subsidy drops to zero outright. The subsidy is the
/// premium minus the required contribution, floored at zero and capped at
/// the premium.
pub fn calculate_aca_subsidy(
    household_income: f64,
    household_size: u32,
    annual_premium: f64,
) -> f64 {
    let premium = annual_premium.max(0.0);
    let income = household_income.max(0.0);
    let income_pct = income / federal_poverty_level(household_size) * 100.0;
    if income_pct >= ACA_CLIFF_FPL_PCT {
        return 0.0;
    }
    let contribution_rate = if income_pct <= ACA_FULL_SUBSIDY_FPL_PCT {
        0.0
    } else {
        (income_pct - ACA_FULL_SUBSIDY_FPL_PCT) / (ACA_CLIFF_FPL_PCT - ACA_FULL_SUBSIDY_FPL_PCT)
            * ACA_MAX_CONTRIBUTION_RATE
    };
    (premium - income * contribution_rate).clamp(0.0, premium)
}
