//! Buy-to-let cashflow and yield projection

use serde::{Deserialize, Serialize};

use super::rate_sweep;
use crate::error::{require_non_negative, require_positive, CalcError, CalcResult};
use crate::formula::{interest_only_payment, monthly_payment};
use crate::schedule::{
    aggregate_yearly, LoanTerms, ScheduleSimulator, YearlyOptions, ITERATION_GUARD_MONTHS,
};

/// Largest share of the price a deposit may cover
const MAX_DEPOSIT_SHARE: f64 = 0.9999;

/// Projection years allowed past the end of the mortgage term
const MAX_YEARS_PAST_TERM: u32 = ITERATION_GUARD_MONTHS / 12;

/// How the deposit is specified
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum DepositSpec {
    /// Percentage of the property price
    Percent(f64),
    /// Absolute amount
    Amount(f64),
}

impl Default for DepositSpec {
    fn default() -> Self {
        DepositSpec::Percent(25.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MortgageType {
    #[default]
    InterestOnly,
    Repayment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RentIncreaseKind {
    /// `amount` is a percentage of the current rent
    Percent,
    /// `amount` is added to the monthly rent
    Fixed,
}

/// Rent escalation applied every `every_years` years
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RentIncrease {
    pub every_years: u32,
    pub kind: RentIncreaseKind,
    pub amount: f64,
}

impl RentIncrease {
    /// Monthly rent in projection year `year` (1-based)
    fn rent_in_year(&self, base_rent: f64, year: u32) -> f64 {
        let steps = (year.saturating_sub(1) / self.every_years.max(1)) as i32;
        match self.kind {
            RentIncreaseKind::Percent => base_rent * (1.0 + self.amount / 100.0).powi(steps),
            RentIncreaseKind::Fixed => (base_rent + self.amount * steps as f64).max(0.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuyToLetInput {
    pub property_price: f64,
    pub deposit: DepositSpec,
    pub annual_rate_percent: f64,
    pub term_years: u32,
    pub mortgage_type: MortgageType,
    pub monthly_rent: f64,
    /// Share of the year the property is expected to stand empty
    pub vacancy_percent: f64,
    /// Letting-agent fee as a percentage of collected rent
    pub letting_fee_percent: f64,
    /// Maintenance, insurance, service charges and the like
    pub monthly_costs: f64,
    /// Stamp duty, legal and survey costs paid up front
    pub purchase_costs: f64,
    pub projection_years: u32,
    pub rent_increase: Option<RentIncrease>,
}

impl Default for BuyToLetInput {
    fn default() -> Self {
        Self {
            property_price: 0.0,
            deposit: DepositSpec::default(),
            annual_rate_percent: 5.0,
            term_years: 25,
            mortgage_type: MortgageType::default(),
            monthly_rent: 0.0,
            vacancy_percent: 0.0,
            letting_fee_percent: 0.0,
            monthly_costs: 0.0,
            purchase_costs: 0.0,
            projection_years: 10,
            rent_increase: None,
        }
    }
}

/// One year of the cashflow projection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BuyToLetYear {
    pub year: u32,
    pub monthly_rent: f64,
    /// Rent collected after vacancy
    pub rental_income: f64,
    /// Letting fees plus running costs
    pub operating_costs: f64,
    pub mortgage_payments: f64,
    pub cashflow: f64,
    pub cumulative_cashflow: f64,
    pub mortgage_balance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateSensitivityPoint {
    pub annual_rate_percent: f64,
    pub monthly_mortgage: f64,
    pub monthly_cashflow: f64,
    pub annual_cashflow: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuyToLetOutput {
    pub deposit: f64,
    pub deposit_percent: f64,
    pub loan_amount: f64,
    pub ltv: f64,
    pub monthly_mortgage: f64,
    pub effective_monthly_rent: f64,
    pub letting_fee: f64,
    pub monthly_cashflow: f64,
    pub annual_cashflow: f64,
    pub gross_yield: f64,
    pub net_yield: f64,
    pub cash_invested: f64,
    /// Annual cashflow over cash invested, when any cash is invested
    pub cash_on_cash_return: Option<f64>,
    pub projection: Vec<BuyToLetYear>,
    pub projection_with_increase: Option<Vec<BuyToLetYear>>,
    pub rate_sensitivity: Vec<RateSensitivityPoint>,
}

/// Resolve the deposit into an amount clamped to `[0, 99.99%]` of the price
fn resolve_deposit(price: f64, spec: DepositSpec) -> CalcResult<f64> {
    let requested = match spec {
        DepositSpec::Percent(pct) => price * pct / 100.0,
        DepositSpec::Amount(amount) => amount,
    };
    if !requested.is_finite() {
        return Err(CalcError::InvalidInput {
            field: "deposit",
            reason: "must be a finite number".into(),
        });
    }
    if requested >= price {
        return Err(CalcError::DepositNotBelowPrice);
    }
    Ok(requested.clamp(0.0, price * MAX_DEPOSIT_SHARE))
}

fn mortgage_payment(input: &BuyToLetInput, loan: f64, rate: f64) -> f64 {
    match input.mortgage_type {
        MortgageType::InterestOnly => interest_only_payment(loan, rate),
        MortgageType::Repayment => monthly_payment(loan, rate, input.term_years * 12),
    }
}

/// Rent collected after vacancy, and the letting fee charged on it
fn collected_rent(input: &BuyToLetInput, monthly_rent: f64) -> (f64, f64) {
    let effective = monthly_rent * (1.0 - input.vacancy_percent / 100.0);
    (effective, effective * input.letting_fee_percent / 100.0)
}

/// Mortgage paid and balance outstanding for each of `years` projection years
fn mortgage_by_year(input: &BuyToLetInput, loan: f64, payment: f64, years: u32) -> Vec<(f64, f64)> {
    match input.mortgage_type {
        MortgageType::InterestOnly => (1..=years)
            .map(|year| {
                let paid = if year <= input.term_years { payment * 12.0 } else { 0.0 };
                (paid, loan)
            })
            .collect(),
        MortgageType::Repayment => {
            let terms = LoanTerms::new(loan, input.annual_rate_percent, input.term_years * 12);
            let schedule = ScheduleSimulator::for_terms(terms).run();
            let options = YearlyOptions {
                start_date: None,
                expected_years: Some(years),
            };
            aggregate_yearly(&schedule, &options)
                .into_iter()
                .take(years as usize)
                .map(|r| (r.payment, r.ending_balance))
                .collect()
        }
    }
}

fn project_years(
    input: &BuyToLetInput,
    mortgage: &[(f64, f64)],
    rent_for_year: impl Fn(u32) -> f64,
) -> Vec<BuyToLetYear> {
    let mut cumulative = 0.0;
    mortgage
        .iter()
        .zip(1u32..)
        .map(|(&(mortgage_payments, mortgage_balance), year)| {
            let monthly_rent = rent_for_year(year);
            let (effective, fee) = collected_rent(input, monthly_rent);
            let rental_income = effective * 12.0;
            let operating_costs = (fee + input.monthly_costs) * 12.0;
            let cashflow = rental_income - operating_costs - mortgage_payments;
            cumulative += cashflow;
            BuyToLetYear {
                year,
                monthly_rent,
                rental_income,
                operating_costs,
                mortgage_payments,
                cashflow,
                cumulative_cashflow: cumulative,
                mortgage_balance,
            }
        })
        .collect()
}

/// Project buy-to-let cashflow, yields and rate sensitivity
pub fn project_buy_to_let(input: &BuyToLetInput) -> CalcResult<BuyToLetOutput> {
    let price = require_positive("property_price", input.property_price)?;
    require_non_negative("monthly_rent", input.monthly_rent)?;
    require_non_negative("annual_rate_percent", input.annual_rate_percent)?;
    require_non_negative("monthly_costs", input.monthly_costs)?;
    require_non_negative("purchase_costs", input.purchase_costs)?;
    require_non_negative("letting_fee_percent", input.letting_fee_percent)?;
    if input.term_years == 0 {
        return Err(CalcError::NonPositive { field: "term_years" });
    }
    if !(0.0..=100.0).contains(&input.vacancy_percent) {
        return Err(CalcError::InvalidInput {
            field: "vacancy_percent",
            reason: "must be between 0 and 100".into(),
        });
    }

    let deposit = resolve_deposit(price, input.deposit)?;
    let loan = price - deposit;
    let payment = mortgage_payment(input, loan, input.annual_rate_percent);

    let (effective_rent, letting_fee) = collected_rent(input, input.monthly_rent);
    let operating = letting_fee + input.monthly_costs;
    let monthly_cashflow = effective_rent - operating - payment;
    let annual_cashflow = monthly_cashflow * 12.0;
    let cash_invested = deposit + input.purchase_costs;

    let years = input
        .projection_years
        .min(input.term_years.saturating_add(MAX_YEARS_PAST_TERM));
    let mortgage = mortgage_by_year(input, loan, payment, years);
    let projection = project_years(input, &mortgage, |_| input.monthly_rent);
    let projection_with_increase = input.rent_increase.map(|inc| {
        project_years(input, &mortgage, |year| inc.rent_in_year(input.monthly_rent, year))
    });

    let rate_sensitivity = rate_sweep(input.annual_rate_percent)
        .into_iter()
        .map(|rate| {
            let monthly_mortgage = mortgage_payment(input, loan, rate);
            let monthly_cashflow = effective_rent - operating - monthly_mortgage;
            RateSensitivityPoint {
                annual_rate_percent: rate,
                monthly_mortgage,
                monthly_cashflow,
                annual_cashflow: monthly_cashflow * 12.0,
            }
        })
        .collect();

    log::debug!(
        "buy-to-let: price={:.2} loan={:.2} cashflow={:.2}/month",
        price,
        loan,
        monthly_cashflow
    );

    Ok(BuyToLetOutput {
        deposit,
        deposit_percent: deposit / price * 100.0,
        loan_amount: loan,
        ltv: loan / price * 100.0,
        monthly_mortgage: payment,
        effective_monthly_rent: effective_rent,
        letting_fee,
        monthly_cashflow,
        annual_cashflow,
        gross_yield: input.monthly_rent * 12.0 / price * 100.0,
        net_yield: (effective_rent - operating) * 12.0 / price * 100.0,
        cash_invested,
        cash_on_cash_return: (cash_invested > 0.0).then(|| annual_cashflow / cash_invested * 100.0),
        projection,
        projection_with_increase,
        rate_sensitivity,
    })
}
