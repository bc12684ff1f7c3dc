//! Home loan with taxes, insurance, HOA and PMI

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{payoff_date, run_to_payoff};
use crate::error::{require_non_negative, require_positive, CalcError, CalcResult};
use crate::formula::{years_to_months, MONTHS_PER_YEAR};
use crate::schedule::{
    aggregate_yearly, LoanTerms, PaymentPolicy, ScheduleResult, ScheduleSimulator,
    ScheduleSummary, YearlyOptions, YearlyRecord,
};

/// PMI is charged while the balance exceeds this share of the home price
const PMI_LTV_THRESHOLD: f64 = 0.80;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MortgageInput {
    pub home_price: f64,
    pub down_payment: f64,
    pub annual_rate_percent: f64,
    pub term_years: f64,
    pub property_tax_annual: f64,
    pub home_insurance_annual: f64,
    pub hoa_monthly: f64,
    /// Annual PMI premium as a percentage of the original loan
    pub pmi_annual_percent: f64,
    pub extra_monthly: f64,
    pub start_date: Option<NaiveDate>,
}

impl Default for MortgageInput {
    fn default() -> Self {
        Self {
            home_price: 0.0,
            down_payment: 0.0,
            annual_rate_percent: 6.5,
            term_years: 30.0,
            property_tax_annual: 0.0,
            home_insurance_annual: 0.0,
            hoa_monthly: 0.0,
            pmi_annual_percent: 0.5,
            extra_monthly: 0.0,
            start_date: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MortgageOutput {
    pub loan_amount: f64,
    pub down_payment_percent: f64,
    pub principal_and_interest: f64,
    pub monthly_property_tax: f64,
    pub monthly_insurance: f64,
    pub monthly_hoa: f64,
    /// PMI in the first month (zero with a 20% deposit)
    pub monthly_pmi: f64,
    /// Everything due in month 1
    pub total_monthly_payment: f64,
    pub pmi_months: u32,
    pub total_pmi: f64,
    pub summary: ScheduleSummary,
    pub payoff_date: Option<NaiveDate>,
    pub yearly: Vec<YearlyRecord>,
    pub schedule: ScheduleResult,
}

/// Price a home loan and its monthly housing cost
pub fn calculate_mortgage(input: &MortgageInput) -> CalcResult<MortgageOutput> {
    let price = require_positive("home_price", input.home_price)?;
    let down = require_non_negative("down_payment", input.down_payment)?;
    require_non_negative("annual_rate_percent", input.annual_rate_percent)?;
    let tax = require_non_negative("property_tax_annual", input.property_tax_annual)?;
    let insurance = require_non_negative("home_insurance_annual", input.home_insurance_annual)?;
    let hoa = require_non_negative("hoa_monthly", input.hoa_monthly)?;
    let pmi_pct = require_non_negative("pmi_annual_percent", input.pmi_annual_percent)?;
    let extra = require_non_negative("extra_monthly", input.extra_monthly)?;
    if down >= price {
        return Err(CalcError::DepositNotBelowPrice);
    }

    let loan = price - down;
    let term = years_to_months(input.term_years);
    let sim = ScheduleSimulator::new(
        LoanTerms::new(loan, input.annual_rate_percent, term),
        PaymentPolicy::with_extra(extra),
    );
    let schedule = run_to_payoff(&sim)?;

    let pmi_monthly = if down < price * (1.0 - PMI_LTV_THRESHOLD) {
        loan * pmi_pct / 100.0 / MONTHS_PER_YEAR
    } else {
        0.0
    };
    let pmi_months = if pmi_monthly > 0.0 {
        schedule
            .entries
            .iter()
            .filter(|e| e.opening_balance > price * PMI_LTV_THRESHOLD)
            .count() as u32
    } else {
        0
    };

    let monthly_property_tax = tax / MONTHS_PER_YEAR;
    let monthly_insurance = insurance / MONTHS_PER_YEAR;
    let total_monthly_payment = schedule.base_payment
        + extra
        + monthly_property_tax
        + monthly_insurance
        + hoa
        + pmi_monthly;

    let yearly = aggregate_yearly(
        &schedule,
        &YearlyOptions {
            start_date: input.start_date,
            expected_years: None,
        },
    );

    log::debug!(
        "mortgage: loan={:.2} p&i={:.2} pmi_months={}",
        loan,
        schedule.base_payment,
        pmi_months
    );

    Ok(MortgageOutput {
        loan_amount: loan,
        down_payment_percent: down / price * 100.0,
        principal_and_interest: schedule.base_payment,
        monthly_property_tax,
        monthly_insurance,
        monthly_hoa: hoa,
        monthly_pmi: pmi_monthly,
        total_monthly_payment,
        pmi_months,
        total_pmi: pmi_monthly * pmi_months as f64,
        summary: schedule.summary(),
        payoff_date: input.start_date.and_then(|d| payoff_date(d, schedule.months)),
        yearly,
        schedule,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn input() -> MortgageInput {
        MortgageInput {
            home_price: 400_000.0,
            down_payment: 80_000.0,
            annual_rate_percent: 6.0,
            term_years: 30.0,
            property_tax_annual: 4_800.0,
            home_insurance_annual: 1_200.0,
            hoa_monthly: 50.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_twenty_percent_down_has_no_pmi() {
        let out = calculate_mortgage(&input()).unwrap();
        assert_relative_eq!(out.loan_amount, 320_000.0);
        assert_relative_eq!(out.principal_and_interest, 1_918.56, epsilon = 0.01);
        assert_eq!(out.monthly_pmi, 0.0);
        assert_eq!(out.pmi_months, 0);
        // tax 400, insurance 100, HOA 50
        let expected_total = out.principal_and_interest + 400.0 + 100.0 + 50.0;
        assert_relative_eq!(out.total_monthly_payment, expected_total, epsilon = 1e-9);
        assert_eq!(out.summary.months, 360);
    }

    #[test]
    fn test_small_deposit_charges_pmi_until_threshold() {
        let out = calculate_mortgage(&MortgageInput {
            down_payment: 20_000.0,
            pmi_annual_percent: 0.6,
            ..input()
        })
        .unwrap();

        assert_relative_eq!(out.monthly_pmi, 380_000.0 * 0.006 / 12.0, epsilon = 1e-9);
        assert!(out.pmi_months > 0 && out.pmi_months < 360);
        let threshold_entry = &out.schedule.entries[out.pmi_months as usize];
        assert!(threshold_entry.opening_balance <= 320_000.0);
    }

    #[test]
    fn test_calendar_yearly_records() {
        let out = calculate_mortgage(&MortgageInput {
            start_date: NaiveDate::from_ymd_opt(2026, 7, 1),
            ..input()
        })
        .unwrap();
        assert_eq!(out.yearly[0].calendar_year, Some(2026));
        assert_eq!(out.yearly.len(), 31);
        assert_eq!(out.payoff_date, NaiveDate::from_ymd_opt(2056, 6, 1));
    }

    #[test]
    fn test_down_payment_must_be_below_price() {
        assert_eq!(
            calculate_mortgage(&MortgageInput {
                down_payment: 400_000.0,
                ..input()
            }),
            Err(CalcError::DepositNotBelowPrice)
        );
    }
}
