use serde::{Deserialize, Serialize};

use super::domain::{amount, ValidationError};

const MONTHS_PER_YEAR: u32 = 12;

/// Longest term the EMI calculator quotes.
pub const MAX_TENURE_YEARS: u32 = 50;

/// Failure raised by the closed-form amortization helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AmortizationError {
    #[error("loan term must span at least one month (got {months} months)")]
    InvalidTerm { months: u32 },
    #[error("loan term of {years} years is too long to amortize")]
    TermTooLong { years: u32 },
}

fn monthly_rate(annual_rate_percent: f64) -> f64 {
    annual_rate_percent / 12.0 / 100.0
}

fn term_months(term_years: u32) -> Result<u32, AmortizationError> {
    let months = term_years
        .checked_mul(MONTHS_PER_YEAR)
        .filter(|months| i32::try_from(*months).is_ok())
        .ok_or(AmortizationError::TermTooLong { years: term_years })?;
    if months == 0 {
        return Err(AmortizationError::InvalidTerm { months });
    }
    Ok(months)
}

fn round_to_paise(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Equated monthly installment for a reducing-balance loan, rounded to whole units.
pub fn installment_for(
    principal: f64,
    annual_rate_percent: f64,
    term_years: u32,
) -> Result<f64, AmortizationError> {
    let months = term_months(term_years)?;
    let rate = monthly_rate(annual_rate_percent);

    if rate.abs() < f64::EPSILON {
        return Ok((principal / months as f64).round());
    }

    let growth = (1.0 + rate).powi(months as i32);
    Ok((principal * rate * growth / (growth - 1.0)).round())
}

/// Inverse of [`installment_for`]: the largest principal a given installment amortizes.
pub fn principal_for(
    installment: f64,
    annual_rate_percent: f64,
    term_years: u32,
) -> Result<f64, AmortizationError> {
    let months = term_months(term_years)?;
    let rate = monthly_rate(annual_rate_percent);

    if rate.abs() < f64::EPSILON {
        return Ok((installment * months as f64).round());
    }

    let growth = (1.0 + rate).powi(months as i32);
    Ok((installment * (growth - 1.0) / (rate * growth)).round())
}

/// Single month of a repayment schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub month: u32,
    pub payment: f64,
    pub interest: f64,
    pub principal: f64,
    pub closing_balance: f64,
}

/// Month-by-month amortization table. The last row absorbs rounding drift so the
/// balance closes at exactly zero.
pub fn repayment_schedule(
    principal: f64,
    annual_rate_percent: f64,
    term_years: u32,
) -> Result<Vec<ScheduleEntry>, AmortizationError> {
    let months = term_months(term_years)?;
    let rate = monthly_rate(annual_rate_percent);
    let installment = installment_for(principal, annual_rate_percent, term_years)?;

    let mut balance = principal;
    let mut entries = Vec::with_capacity(months as usize);

    for month in 1..=months {
        let interest = round_to_paise(balance * rate);
        let mut principal_part = round_to_paise(installment - interest);
        if month == months || principal_part > balance {
            principal_part = round_to_paise(balance);
        }
        balance = (balance - principal_part).max(0.0);

        entries.push(ScheduleEntry {
            month,
            payment: round_to_paise(principal_part + interest),
            interest,
            principal: principal_part,
            closing_balance: round_to_paise(balance),
        });

        if balance <= 0.0 {
            break;
        }
    }

    Ok(entries)
}

/// Output of the standalone EMI calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmiQuote {
    pub principal: f64,
    pub annual_rate_percent: f64,
    pub tenure_years: u32,
    pub monthly_installment: f64,
    pub total_payable: f64,
    pub total_interest: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Vec<ScheduleEntry>>,
}

/// Body accepted by the EMI calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmiRequest {
    pub principal: f64,
    pub annual_rate_percent: f64,
    pub tenure_years: u32,
    #[serde(default)]
    pub include_schedule: bool,
}

impl EmiRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        amount("principal", self.principal)?;
        amount("annualRatePercent", self.annual_rate_percent)?;
        if self.tenure_years == 0 {
            return Err(ValidationError::BelowMinimum {
                field: "tenureYears",
                minimum: 1,
            });
        }
        if self.tenure_years > MAX_TENURE_YEARS {
            return Err(ValidationError::AboveMaximum {
                field: "tenureYears",
                maximum: MAX_TENURE_YEARS,
            });
        }
        Ok(())
    }

    pub fn quote(&self) -> Result<EmiQuote, AmortizationError> {
        emi_quote(
            self.principal,
            self.annual_rate_percent,
            self.tenure_years,
            self.include_schedule,
        )
    }
}

pub fn emi_quote(
    principal: f64,
    annual_rate_percent: f64,
    tenure_years: u32,
    include_schedule: bool,
) -> Result<EmiQuote, AmortizationError> {
    let months = term_months(tenure_years)?;
    let monthly_installment = installment_for(principal, annual_rate_percent, tenure_years)?;
    let total_payable = monthly_installment * months as f64;
    let schedule = if include_schedule {
        Some(repayment_schedule(
            principal,
            annual_rate_percent,
            tenure_years,
        )?)
    } else {
        None
    };

    Ok(EmiQuote {
        principal: principal.round(),
        annual_rate_percent,
        tenure_years,
        monthly_installment,
        total_payable,
        total_interest: (total_payable - principal).max(0.0).round(),
        schedule,
    })
}
