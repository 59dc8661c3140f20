//! Progressive federal tax: bracket walk, standard deduction, taxable
//! income, effective rate. Tables live in `assumptions`.

use crate::core::assumptions::{federal_brackets, standard_deduction};
use crate::core::types::{FilingStatus, TaxAssessment};

/// Tax owed on `income` under the progressive bracket table for the
/// filing status. Each bracket taxes only the income within its range.
/// The caller decides whether `income` is gross or already net of a
/// deduction. Zero or negative income owes zero.
pub fn calculate_federal_tax(income: f64, status: FilingStatus) -> f64 {
    let income = income.max(0.0);
    let mut tax = 0.0;
    let mut lower = 0.0;
    for bracket in federal_brackets(status) {
        if income <= lower {
            break;
        }
        let taxed_in_bracket = income.min(bracket.upper) - lower;
        tax += taxed_in_bracket * bracket.rate;
        lower = bracket.upper;
    }
    tax
}

/// Gross income minus the deduction (standard for the status unless a
/// custom figure is supplied), floored at zero.
pub fn calculate_taxable_income(
    gross_income: f64,
    status: FilingStatus,
    deduction: Option<f64>,
) -> f64 {
    let deduction = deduction.unwrap_or_else(|| standard_deduction(status)).max(0.0);
    (gross_income.max(0.0) - deduction).max(0.0)
}

/// Total tax on deducted income divided by gross income. Zero income has
/// a zero rate; the result always sits below the top marginal rate the
/// income actually reached, because the deduction and the lower brackets
/// pull the average down.
pub fn effective_tax_rate(gross_income: f64, status: FilingStatus) -> f64 {
    if gross_income <= 0.0 {
        return 0.0;
    }
    calculate_federal_tax(calculate_taxable_income(gross_income, status, None), status)
        / gross_income
}

/// Full assessment for one gross-income figure: deduction applied,
/// taxable income, tax owed, and effective rate against gross.
pub fn assess(gross_income: f64, status: FilingStatus, deduction: Option<f64>) -> TaxAssessment {
    let gross = gross_income.max(0.0);
    let deduction_applied = deduction.unwrap_or_else(|| standard_deduction(status)).max(0.0);
    let taxable_income = (gross - deduction_applied).max(0.0);
    let tax = calculate_federal_tax(taxable_income, status);
    let effective_rate = if gross > 0.0 { tax / gross } else { 0.0 };
    TaxAssessment {
        tax,
        effective_rate,
        taxable_income,
        deduction_applied,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, proptest};

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn tax_inside_the_ten_percent_bracket() {
        assert_approx(calculate_federal_tax(10_000.0, FilingStatus::Single), 1_000.0);
    }

    #[test]
    fn tax_exactly_at_the_first_bracket_boundary() {
        assert_approx(calculate_federal_tax(11_600.0, FilingStatus::Single), 1_160.0);
    }

    #[test]
    fn tax_spanning_the_first_two_brackets() {
        let expected = 11_600.0 * 0.10 + 8_400.0 * 0.12;
        assert_approx(calculate_federal_tax(20_000.0, FilingStatus::Single), expected);
    }

    #[test]
    fn tax_for_one_hundred_thousand_single() {
        let expected = 11_600.0 * 0.10 + 35_550.0 * 0.12 + 52_850.0 * 0.22;
        assert_approx(calculate_federal_tax(100_000.0, FilingStatus::Single), expected);
    }

    #[test]
    fn tax_for_married_joint_uses_wider_brackets() {
        let expected = 23_200.0 * 0.10 + 26_800.0 * 0.12;
        assert_approx(
            calculate_federal_tax(50_000.0, FilingStatus::MarriedJoint),
            expected,
        );
    }

    #[test]
    fn tax_on_zero_income_is_zero() {
        assert_approx(calculate_federal_tax(0.0, FilingStatus::Single), 0.0);
    }

    #[test]
    fn tax_on_a_million_reaches_the_top_bracket() {
        let tax = calculate_federal_tax(1_000_000.0, FilingStatus::Single);
        assert_approx(tax, 328_187.75);
        let average = tax / 1_000_000.0;
        assert!(average > 0.30 && average < 0.37);
    }

    #[test]
    fn taxable_income_subtracts_the_standard_deduction() {
        assert_approx(
            calculate_taxable_income(75_000.0, FilingStatus::Single, None),
            60_400.0,
        );
    }

    #[test]
    fn taxable_income_honors_a_custom_deduction() {
        assert_approx(
            calculate_taxable_income(75_000.0, FilingStatus::Single, Some(20_000.0)),
            55_000.0,
        );
    }

    #[test]
    fn taxable_income_never_goes_negative() {
        assert_approx(calculate_taxable_income(5_000.0, FilingStatus::Single, None), 0.0);
        assert_approx(calculate_taxable_income(0.0, FilingStatus::Single, None), 0.0);
    }

    #[test]
    fn effective_rate_sits_below_the_marginal_rate() {
        let rate = effective_tax_rate(75_000.0, FilingStatus::Single);
        // Tax lands on 60_400 after the deduction; the 22% bracket is the
        // highest one touched.
        let expected = (11_600.0 * 0.10 + 35_550.0 * 0.12 + 13_250.0 * 0.22) / 75_000.0;
        assert_approx(rate, expected);
        assert!(rate < 0.22);
    }

    #[test]
    fn effective_rate_is_zero_for_zero_income() {
        assert_approx(effective_tax_rate(0.0, FilingStatus::Single), 0.0);
    }

    #[test]
    fn married_filers_pay_a_lower_effective_rate() {
        let single = effective_tax_rate(100_000.0, FilingStatus::Single);
        let married = effective_tax_rate(100_000.0, FilingStatus::MarriedJoint);
        assert!(married < single);
    }

    #[test]
    fn effective_rate_rises_with_income() {
        let rate_50k = effective_tax_rate(50_000.0, FilingStatus::Single);
        let rate_100k = effective_tax_rate(100_000.0, FilingStatus::Single);
        let rate_200k = effective_tax_rate(200_000.0, FilingStatus::Single);
        assert!(rate_100k > rate_50k);
        assert!(rate_200k > rate_100k);
    }

    #[test]
    fn assessment_fields_are_consistent() {
        let assessment = assess(75_000.0, FilingStatus::Single, None);
        assert_approx(assessment.deduction_applied, 14_600.0);
        assert_approx(assessment.taxable_income, 60_400.0);
        assert_approx(
            assessment.tax,
            calculate_federal_tax(60_400.0, FilingStatus::Single),
        );
        assert_approx(assessment.effective_rate, assessment.tax / 75_000.0);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(48))]

        #[test]
        fn prop_tax_is_monotone_in_income(income in 0u32..1_500_000) {
            let lower = calculate_federal_tax(income as f64, FilingStatus::Single);
            let higher = calculate_federal_tax(income as f64 + 500.0, FilingStatus::Single);
            prop_assert!(higher >= lower);
        }

        #[test]
        fn prop_tax_never_exceeds_top_rate_times_income(income in 0u32..2_000_000) {
            let tax = calculate_federal_tax(income as f64, FilingStatus::Single);
            prop_assert!(tax >= 0.0);
            prop_assert!(tax <= income as f64 * 0.37 + 1e-9);
        }
    }
}
