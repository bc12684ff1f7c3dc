//! Remortgage break-even analysis

use serde::{Deserialize, Serialize};

use super::ensure_amortizes;
use crate::error::{require_non_negative, require_positive, CalcResult};
use crate::schedule::{
    LoanTerms, PaymentPolicy, ScheduleResult, ScheduleSimulator, ITERATION_GUARD_MONTHS,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemortgageInput {
    pub balance: f64,
    pub current_rate_percent: f64,
    pub current_remaining_months: u32,
    pub new_rate_percent: f64,
    pub new_term_months: u32,
    pub arrangement_fee: f64,
    pub valuation_fee: f64,
    pub legal_fees: f64,
    /// Early repayment charge on the current deal, as a percentage of the balance
    pub early_repayment_charge_percent: f64,
    /// Months over which cumulative costs are compared
    pub horizon_months: u32,
}

impl Default for RemortgageInput {
    fn default() -> Self {
        Self {
            balance: 0.0,
            current_rate_percent: 5.0,
            current_remaining_months: 300,
            new_rate_percent: 5.0,
            new_term_months: 300,
            arrangement_fee: 0.0,
            valuation_fee: 0.0,
            legal_fees: 0.0,
            early_repayment_charge_percent: 0.0,
            horizon_months: 60,
        }
    }
}

/// Cumulative cost of each option at the end of one month
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CumulativeCost {
    pub month: u32,
    pub current: f64,
    pub switch: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemortgageOutput {
    pub current_payment: f64,
    pub new_payment: f64,
    pub monthly_saving: f64,
    pub early_repayment_charge: f64,
    pub total_switching_costs: f64,
    /// First month the switch has cost no more than staying, if within the horizon
    pub break_even_month: Option<u32>,
    pub current_cost_at_horizon: f64,
    pub switch_cost_at_horizon: f64,
    /// `current_cost_at_horizon - switch_cost_at_horizon`
    pub net_saving_at_horizon: f64,
    pub current_interest_at_horizon: f64,
    pub switch_interest_at_horizon: f64,
    pub cumulative_costs: Vec<CumulativeCost>,
}

/// Payment in each month up to the horizon, zero once the loan is repaid
fn payment_in_month(schedule: &ScheduleResult, month: u32) -> f64 {
    schedule
        .entries
        .get(month as usize - 1)
        .map(|e| e.payment)
        .unwrap_or(0.0)
}

/// Compare staying on the current deal against switching with up-front fees
pub fn analyze_remortgage(input: &RemortgageInput) -> CalcResult<RemortgageOutput> {
    let balance = require_positive("balance", input.balance)?;
    require_non_negative("current_rate_percent", input.current_rate_percent)?;
    require_non_negative("new_rate_percent", input.new_rate_percent)?;
    let arrangement = require_non_negative("arrangement_fee", input.arrangement_fee)?;
    let valuation = require_non_negative("valuation_fee", input.valuation_fee)?;
    let legal = require_non_negative("legal_fees", input.legal_fees)?;
    let erc_pct = require_non_negative(
        "early_repayment_charge_percent",
        input.early_repayment_charge_percent,
    )?;
    let current_term = input.current_remaining_months.max(1);
    let new_term = input.new_term_months.max(1);
    // Both loans are repaid long before this, so later months add nothing
    let max_horizon = current_term.max(new_term).saturating_add(ITERATION_GUARD_MONTHS);
    let horizon = input.horizon_months.clamp(1, max_horizon);

    let horizon_policy = PaymentPolicy {
        horizon_months: Some(horizon),
        ..Default::default()
    };
    let current_sim = ScheduleSimulator::new(
        LoanTerms::new(balance, input.current_rate_percent, current_term),
        horizon_policy.clone(),
    );
    let switch_sim = ScheduleSimulator::new(
        LoanTerms::new(balance, input.new_rate_percent, new_term),
        horizon_policy,
    );
    ensure_amortizes(&current_sim)?;
    ensure_amortizes(&switch_sim)?;

    let current = current_sim.run();
    let switch = switch_sim.run();

    let early_repayment_charge = balance * erc_pct / 100.0;
    let total_switching_costs = arrangement + valuation + legal + early_repayment_charge;

    let mut cumulative_costs = Vec::with_capacity(horizon as usize);
    let mut break_even_month = None;
    let (mut current_total, mut switch_total) = (0.0, total_switching_costs);
    for month in 1..=horizon {
        current_total += payment_in_month(&current, month);
        switch_total += payment_in_month(&switch, month);
        if break_even_month.is_none() && switch_total <= current_total {
            break_even_month = Some(month);
        }
        cumulative_costs.push(CumulativeCost {
            month,
            current: current_total,
            switch: switch_total,
        });
    }

    log::debug!(
        "remortgage: fees={:.2} break-even={:?}",
        total_switching_costs,
        break_even_month
    );

    Ok(RemortgageOutput {
        current_payment: current.base_payment,
        new_payment: switch.base_payment,
        monthly_saving: current.base_payment - switch.base_payment,
        early_repayment_charge,
        total_switching_costs,
        break_even_month,
        current_cost_at_horizon: current_total,
        switch_cost_at_horizon: switch_total,
        net_saving_at_horizon: current_total - switch_total,
        current_interest_at_horizon: current.total_interest,
        switch_interest_at_horizon: switch.total_interest,
        cumulative_costs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::monthly_payment;

    fn input() -> RemortgageInput {
        RemortgageInput {
            balance: 200_000.0,
            current_rate_percent: 6.0,
            current_remaining_months: 240,
            new_rate_percent: 4.5,
            new_term_months: 240,
            arrangement_fee: 999.0,
            valuation_fee: 300.0,
            legal_fees: 500.0,
            early_repayment_charge_percent: 0.0,
            horizon_months: 60,
        }
    }

    #[test]
    fn test_break_even_is_first_qualifying_month() {
        let out = analyze_remortgage(&input()).unwrap();
        let saving = monthly_payment(200_000.0, 6.0, 240) - monthly_payment(200_000.0, 4.5, 240);
        let expected = (1_799.0 / saving).ceil() as u32;

        assert_eq!(out.break_even_month, Some(expected));
        let m = expected as usize;
        assert!(out.cumulative_costs[m - 1].switch <= out.cumulative_costs[m - 1].current);
        assert!(out.cumulative_costs[m - 2].switch > out.cumulative_costs[m - 2].current);
        assert!(out.net_saving_at_horizon > 0.0);
        assert_eq!(out.cumulative_costs.len(), 60);
    }

    #[test]
    fn test_never_breaks_even() {
        let out = analyze_remortgage(&RemortgageInput {
            new_rate_percent: 5.95,
            arrangement_fee: 5_000.0,
            horizon_months: 24,
            ..input()
        })
        .unwrap();
        assert_eq!(out.break_even_month, None);
        assert!(out.net_saving_at_horizon < 0.0);
    }

    #[test]
    fn test_no_fees_breaks_even_immediately() {
        let out = analyze_remortgage(&RemortgageInput {
            arrangement_fee: 0.0,
            valuation_fee: 0.0,
            legal_fees: 0.0,
            ..input()
        })
        .unwrap();
        assert_eq!(out.break_even_month, Some(1));
    }

    #[test]
    fn test_early_repayment_charge_counts_as_fee() {
        let out = analyze_remortgage(&RemortgageInput {
            early_repayment_charge_percent: 2.0,
            ..input()
        })
        .unwrap();
        assert_eq!(out.early_repayment_charge, 4_000.0);
        assert_eq!(out.total_switching_costs, 5_799.0);
    }

    #[test]
    fn test_rejects_zero_balance() {
        assert!(analyze_remortgage(&RemortgageInput::default()).is_err());
    }

    #[test]
    fn test_unbounded_horizon_is_capped() {
        let out = analyze_remortgage(&RemortgageInput {
            horizon_months: u32::MAX,
            ..input()
        })
        .unwrap();

        assert_eq!(out.cumulative_costs.len(), (240 + ITERATION_GUARD_MONTHS) as usize);
        let last = out.cumulative_costs.last().unwrap();
        assert_eq!(out.current_cost_at_horizon, last.current);
        assert!(out.break_even_month.is_some());
    }
}
