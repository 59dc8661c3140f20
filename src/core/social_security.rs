//! Social Security benefit math: AIME from an earnings history, PIA via
//! the bend-point formula, claiming-age adjustment, and the birth-year
//! full-retirement-age schedule.

use crate::core::assumptions::{
    AIME_DIVISOR_MONTHS, AIME_TOP_YEARS, DELAYED_CREDIT_MAX_AGE, DELAYED_CREDIT_PER_MONTH,
    EARLY_REDUCTION_BEYOND_36, EARLY_REDUCTION_FIRST_36, PIA_FIRST_BEND_POINT,
    PIA_RATE_ABOVE_SECOND_BEND, PIA_RATE_BETWEEN_BENDS, PIA_RATE_TO_FIRST_BEND,
    PIA_SECOND_BEND_POINT,
};
use crate::core::types::BenefitEstimate;

/// Average Indexed Monthly Earnings over the top 35 earning years. Fewer
/// than 35 years of history count the missing years as zero, so the
/// divisor stays 420 months. An empty history yields zero.
pub fn calculate_aime(earnings: &[f64], index_factor: f64) -> f64 {
    let mut indexed: Vec<f64> = earnings.iter().map(|wage| wage * index_factor).collect();
    indexed.sort_by(|a, b| b.total_cmp(a));
    let total: f64 = indexed.iter().take(AIME_TOP_YEARS).sum();
    (total / AIME_DIVISOR_MONTHS).max(0.0)
}

/// Primary Insurance Amount from the three-segment bend-point formula:
/// 90% up to the first bend point, 32% between the bend points, 15% above.
pub fn calculate_pia(aime: f64) -> f64 {
    if aime <= 0.0 {
        return 0.0;
    }
    let to_first = aime.min(PIA_FIRST_BEND_POINT) * PIA_RATE_TO_FIRST_BEND;
    let between = (aime.min(PIA_SECOND_BEND_POINT) - PIA_FIRST_BEND_POINT).max(0.0)
        * PIA_RATE_BETWEEN_BENDS;
    let above = (aime - PIA_SECOND_BEND_POINT).max(0.0) * PIA_RATE_ABOVE_SECOND_BEND;
    to_first + between + above
}

/// Monthly benefit after the claiming-age adjustment. Early months reduce
/// the PIA by 5/9 of 1% each for the first 36 and 5/12 of 1% beyond;
/// delayed months add 2/3 of 1% each, with credits stopping at age 70.
pub fn calculate_benefit(aime: f64, claiming_age: f64, full_retirement_age: f64) -> f64 {
    let pia = calculate_pia(aime);
    let months = ((claiming_age - full_retirement_age) * 12.0).round();
    let adjusted = if months < 0.0 {
        let months_early = -months;
        let first_band = months_early.min(36.0);
        let second_band = (months_early - 36.0).max(0.0);
        pia * (1.0
            - first_band * EARLY_REDUCTION_FIRST_36
            - second_band * EARLY_REDUCTION_BEYOND_36)
    } else if months > 0.0 {
        let credited_age = claiming_age.min(DELAYED_CREDIT_MAX_AGE);
        let credit_months = ((credited_age - full_retirement_age) * 12.0).round().max(0.0);
        pia * (1.0 + credit_months * DELAYED_CREDIT_PER_MONTH)
    } else {
        pia
    };
    adjusted.max(0.0)
}

/// Full retirement age by birth year: 65 through 1937, ramping two months
/// per year to 66 across 1938-1942, 66 through 1954, ramping two months
/// per year to 67 across 1955-1959, and 67 from 1960 on.
pub fn full_retirement_age(birth_year: i32) -> f64 {
    match birth_year {
        ..=1937 => 65.0,
        1938..=1942 => 65.0 + f64::from(birth_year - 1937) * 2.0 / 12.0,
        1943..=1954 => 66.0,
        1955..=1959 => 66.0 + f64::from(birth_year - 1954) * 2.0 / 12.0,
        _ => 67.0,
    }
}

pub fn estimate_benefit(aime: f64, claiming_age: f64, full_retirement_age: f64) -> BenefitEstimate {
    let monthly_benefit = calculate_benefit(aime, claiming_age, full_retirement_age);
    BenefitEstimate {
        monthly_benefit,
        annual_benefit: monthly_benefit * 12.0,
        full_retirement_age,
    }
}
