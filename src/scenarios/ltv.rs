//! Loan-to-value calculation and risk banding

use serde::{Deserialize, Serialize};

use crate::error::{require_non_negative, require_positive, CalcError, CalcResult};

/// LTV above this is flagged as high risk
pub const HIGH_RISK_LTV: f64 = 95.0;

/// Lender LTV bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LtvBand {
    UpTo60,
    UpTo75,
    UpTo80,
    UpTo85,
    UpTo90,
    UpTo95,
    Over95,
}

impl LtvBand {
    /// Determine band from an LTV percentage
    pub fn from_ltv(ltv: f64) -> Self {
        if ltv <= 60.0 {
            LtvBand::UpTo60
        } else if ltv <= 75.0 {
            LtvBand::UpTo75
        } else if ltv <= 80.0 {
            LtvBand::UpTo80
        } else if ltv <= 85.0 {
            LtvBand::UpTo85
        } else if ltv <= 90.0 {
            LtvBand::UpTo90
        } else if ltv <= 95.0 {
            LtvBand::UpTo95
        } else {
            LtvBand::Over95
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LtvBand::UpTo60 => "Up to 60%",
            LtvBand::UpTo75 => "Up to 75%",
            LtvBand::UpTo80 => "Up to 80%",
            LtvBand::UpTo85 => "Up to 85%",
            LtvBand::UpTo90 => "Up to 90%",
            LtvBand::UpTo95 => "Up to 95%",
            LtvBand::Over95 => "Over 95%",
        }
    }
}

/// Which quantity the caller knows
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum LtvBasis {
    LoanAmount(f64),
    DepositAmount(f64),
    DepositPercent(f64),
}

impl Default for LtvBasis {
    fn default() -> Self {
        LtvBasis::LoanAmount(0.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LtvInput {
    pub property_value: f64,
    pub basis: LtvBasis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LtvOutput {
    pub property_value: f64,
    pub loan_amount: f64,
    pub deposit: f64,
    pub deposit_percent: f64,
    pub ltv: f64,
    pub band: LtvBand,
    pub band_label: String,
    pub high_risk: bool,
}

/// Derive loan, deposit and LTV band for a property
pub fn calculate_ltv(input: &LtvInput) -> CalcResult<LtvOutput> {
    let value = require_positive("property_value", input.property_value)?;

    let (loan_amount, deposit) = match input.basis {
        LtvBasis::LoanAmount(loan) => {
            let loan = require_non_negative("loan_amount", loan)?;
            (loan, (value - loan).max(0.0))
        }
        LtvBasis::DepositAmount(deposit) => {
            let deposit = require_non_negative("deposit", deposit)?;
            if deposit > value {
                return Err(CalcError::DepositNotBelowPrice);
            }
            (value - deposit, deposit)
        }
        LtvBasis::DepositPercent(pct) => {
            let pct = require_non_negative("deposit_percent", pct)?;
            if pct > 100.0 {
                return Err(CalcError::DepositNotBelowPrice);
            }
            let deposit = value * pct / 100.0;
            (value - deposit, deposit)
        }
    };

    let ltv = loan_amount / value * 100.0;
    let band = LtvBand::from_ltv(ltv);

    Ok(LtvOutput {
        property_value: value,
        loan_amount,
        deposit,
        deposit_percent: deposit / value * 100.0,
        ltv,
        band,
        band_label: band.label().to_string(),
        high_risk: ltv > HIGH_RISK_LTV,
    })
}
