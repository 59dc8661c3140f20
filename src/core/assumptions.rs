//! Fixed reference data: asset-class return assumptions, Social Security
//! bend points and adjustment rates, 2024 federal tax tables, FPL figures,
//! and the healthcare cost tables. Algorithms live elsewhere; this module
//! only holds the numbers and the invariants they must satisfy.

use crate::core::types::{FilingStatus, ReturnAssumption};

pub const STOCK_ASSUMPTION: ReturnAssumption = ReturnAssumption {
    mean: 0.10,
    std_dev: 0.18,
};
pub const BOND_ASSUMPTION: ReturnAssumption = ReturnAssumption {
    mean: 0.04,
    std_dev: 0.06,
};
pub const CASH_ASSUMPTION: ReturnAssumption = ReturnAssumption {
    mean: 0.02,
    std_dev: 0.01,
};

/// Balanced-portfolio fallback when no usable allocation data exists.
pub const DEFAULT_ASSUMPTION: ReturnAssumption = ReturnAssumption {
    mean: 0.07,
    std_dev: 0.15,
};

// Social Security.
pub const AIME_TOP_YEARS: usize = 35;
pub const AIME_DIVISOR_MONTHS: f64 = 420.0;
pub const PIA_FIRST_BEND_POINT: f64 = 1_174.0;
pub const PIA_SECOND_BEND_POINT: f64 = 7_078.0;
pub const PIA_RATE_TO_FIRST_BEND: f64 = 0.90;
pub const PIA_RATE_BETWEEN_BENDS: f64 = 0.32;
pub const PIA_RATE_ABOVE_SECOND_BEND: f64 = 0.15;
/// 5/9 of 1% per month for the first 36 months claimed early.
pub const EARLY_REDUCTION_FIRST_36: f64 = 5.0 / 9.0 / 100.0;
/// 5/12 of 1% per month beyond 36 months early.
pub const EARLY_REDUCTION_BEYOND_36: f64 = 5.0 / 12.0 / 100.0;
/// 2/3 of 1% per month of delay past FRA.
pub const DELAYED_CREDIT_PER_MONTH: f64 = 2.0 / 3.0 / 100.0;
/// Delayed-retirement credits stop accruing at this age.
pub const DELAYED_CREDIT_MAX_AGE: f64 = 70.0;

#[derive(Debug, Clone, Copy)]
pub struct TaxBracket {
    pub upper: f64,
    pub rate: f64,
}

// 2024 federal brackets; each entry taxes income up to `upper` at `rate`.
pub static SINGLE_BRACKETS: [TaxBracket; 7] = [
    TaxBracket { upper: 11_600.0, rate: 0.10 },
    TaxBracket { upper: 47_150.0, rate: 0.12 },
    TaxBracket { upper: 100_525.0, rate: 0.22 },
    TaxBracket { upper: 191_950.0, rate: 0.24 },
    TaxBracket { upper: 243_725.0, rate: 0.32 },
    TaxBracket { upper: 609_350.0, rate: 0.35 },
    TaxBracket { upper: f64::INFINITY, rate: 0.37 },
];

pub static MARRIED_JOINT_BRACKETS: [TaxBracket; 7] = [
    TaxBracket { upper: 23_200.0, rate: 0.10 },
    TaxBracket { upper: 94_300.0, rate: 0.12 },
    TaxBracket { upper: 201_050.0, rate: 0.22 },
    TaxBracket { upper: 383_900.0, rate: 0.24 },
    TaxBracket { upper: 487_450.0, rate: 0.32 },
    TaxBracket { upper: 731_200.0, rate: 0.35 },
    TaxBracket { upper: f64::INFINITY, rate: 0.37 },
];

pub static MARRIED_SEPARATE_BRACKETS: [TaxBracket; 7] = [
    TaxBracket { upper: 11_600.0, rate: 0.10 },
    TaxBracket { upper: 47_150.0, rate: 0.12 },
    TaxBracket { upper: 100_525.0, rate: 0.22 },
    TaxBracket { upper: 191_950.0, rate: 0.24 },
    TaxBracket { upper: 243_725.0, rate: 0.32 },
    TaxBracket { upper: 365_600.0, rate: 0.35 },
    TaxBracket { upper: f64::INFINITY, rate: 0.37 },
];

pub static HEAD_OF_HOUSEHOLD_BRACKETS: [TaxBracket; 7] = [
    TaxBracket { upper: 16_550.0, rate: 0.10 },
    TaxBracket { upper: 63_100.0, rate: 0.12 },
    TaxBracket { upper: 100_500.0, rate: 0.22 },
    TaxBracket { upper: 191_950.0, rate: 0.24 },
    TaxBracket { upper: 243_725.0, rate: 0.32 },
    TaxBracket { upper: 609_350.0, rate: 0.35 },
    TaxBracket { upper: f64::INFINITY, rate: 0.37 },
];

pub fn federal_brackets(status: FilingStatus) -> &'static [TaxBracket] {
    match status {
        FilingStatus::Single => &SINGLE_BRACKETS,
        FilingStatus::MarriedJoint => &MARRIED_JOINT_BRACKETS,
        FilingStatus::MarriedSeparate => &MARRIED_SEPARATE_BRACKETS,
        FilingStatus::HeadOfHousehold => &HEAD_OF_HOUSEHOLD_BRACKETS,
    }
}

pub fn standard_deduction(status: FilingStatus) -> f64 {
    match status {
        FilingStatus::Single => 14_600.0,
        FilingStatus::MarriedJoint => 29_200.0,
        FilingStatus::MarriedSeparate => 14_600.0,
        FilingStatus::HeadOfHousehold => 21_900.0,
    }
}

// Healthcare. Annual pre-Medicare cost (premiums plus typical
// out-of-pocket) by age; strictly increasing toward Medicare eligibility.
pub static PRE_MEDICARE_COSTS: [(u32, f64); 10] = [
    (55, 11_000.0),
    (56, 11_300.0),
    (57, 11_650.0),
    (58, 12_050.0),
    (59, 12_400.0),
    (60, 12_800.0),
    (61, 13_350.0),
    (62, 13_950.0),
    (63, 14_650.0),
    (64, 15_500.0),
];

pub const MEDICARE_ELIGIBILITY_AGE: u32 = 65;
/// Combined Part B, Part D, Medigap, and typical out-of-pocket.
pub const MEDICARE_ANNUAL_COST: f64 = 6_500.0;

// ACA subsidy schedule (2024 single-person FPL base).
pub const FPL_BASE: f64 = 15_060.0;
pub const FPL_PER_ADDITIONAL_PERSON: f64 = 5_380.0;
/// Below this percentage of FPL the required contribution is zero.
pub const ACA_FULL_SUBSIDY_FPL_PCT: f64 = 150.0;
/// At or above this percentage of FPL the subsidy drops to zero.
pub const ACA_CLIFF_FPL_PCT: f64 = 400.0;
/// Required contribution reaches this share of income at the cliff.
pub const ACA_MAX_CONTRIBUTION_RATE: f64 = 0.085;

#[cfg(test)]
mod tests {
    use super::*;

    fn all_statuses() -> [(&'static str, FilingStatus); 4] {
        [
            ("single", FilingStatus::Single),
            ("married_joint", FilingStatus::MarriedJoint),
            ("married_separate", FilingStatus::MarriedSeparate),
            ("head_of_household", FilingStatus::HeadOfHousehold),
        ]
    }

    #[test]
    fn brackets_have_increasing_thresholds_and_rates() {
        for (label, status) in all_statuses() {
            let brackets = federal_brackets(status);
            for pair in brackets.windows(2) {
                assert!(
                    pair[0].upper < pair[1].upper,
                    "{label}: thresholds must strictly increase"
                );
                assert!(
                    pair[0].rate < pair[1].rate,
                    "{label}: rates must strictly increase"
                );
            }
        }
    }

    #[test]
    fn last_bracket_is_unbounded() {
        for (label, status) in all_statuses() {
            let brackets = federal_brackets(status);
            let last = brackets[brackets.len() - 1];
            assert!(
                last.upper.is_infinite(),
                "{label}: top bracket must be unbounded"
            );
        }
    }

    #[test]
    fn deductions_match_2024_values() {
        for (expected, status) in [
            (14_600.0, FilingStatus::Single),
            (29_200.0, FilingStatus::MarriedJoint),
            (14_600.0, FilingStatus::MarriedSeparate),
            (21_900.0, FilingStatus::HeadOfHousehold),
        ] {
            assert_eq!(standard_deduction(status), expected);
        }
    }

    #[test]
    fn pre_medicare_costs_strictly_increase_with_age() {
        for pair in PRE_MEDICARE_COSTS.windows(2) {
            assert_eq!(pair[0].0 + 1, pair[1].0, "table must cover every age");
            assert!(pair[0].1 < pair[1].1, "cost must rise with age");
        }
        assert_eq!(PRE_MEDICARE_COSTS[0].0, 55);
        assert_eq!(
            PRE_MEDICARE_COSTS[PRE_MEDICARE_COSTS.len() - 1].0,
            MEDICARE_ELIGIBILITY_AGE - 1
        );
    }

    #[test]
    fn bend_points_are_ordered() {
        assert!(PIA_FIRST_BEND_POINT > 0.0);
        assert!(PIA_FIRST_BEND_POINT < PIA_SECOND_BEND_POINT);
        assert!(PIA_RATE_TO_FIRST_BEND > PIA_RATE_BETWEEN_BENDS);
        assert!(PIA_RATE_BETWEEN_BENDS > PIA_RATE_ABOVE_SECOND_BEND);
    }

    #[test]
    fn asset_class_assumptions_rank_by_risk() {
        assert!(STOCK_ASSUMPTION.mean > BOND_ASSUMPTION.mean);
        assert!(BOND_ASSUMPTION.mean > CASH_ASSUMPTION.mean);
        assert!(STOCK_ASSUMPTION.std_dev > BOND_ASSUMPTION.std_dev);
        assert!(BOND_ASSUMPTION.std_dev > CASH_ASSUMPTION.std_dev);
    }
}
