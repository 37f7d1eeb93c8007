use super::super::amortization::{installment_for, principal_for, AmortizationError};
use super::super::intake::ApplicationFacts;
use super::config::AffordabilityPolicy;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum AffordabilityOutcome {
    /// Existing obligations already consume the affordable installment.
    Exhausted,
    Approved {
        amount: f64,
        installment: f64,
        clamped: bool,
    },
}

pub(crate) fn allowed_installment(facts: &ApplicationFacts, policy: &AffordabilityPolicy) -> f64 {
    policy.fraction * facts.metric(policy.income_basis) - facts.metric(policy.obligations)
}

/// Reduces `amount` until its installment fits the affordable share of income.
/// Rate and tenure are fixed inputs; only the amount and installment move.
pub(crate) fn clamp_to_capacity(
    facts: &ApplicationFacts,
    policy: &AffordabilityPolicy,
    amount: f64,
    rate: f64,
    tenure_years: u32,
) -> Result<AffordabilityOutcome, AmortizationError> {
    let allowed = allowed_installment(facts, policy);
    if allowed <= 0.0 {
        return Ok(AffordabilityOutcome::Exhausted);
    }

    let projected = installment_for(amount, rate, tenure_years)?;
    if projected <= allowed {
        return Ok(AffordabilityOutcome::Approved {
            amount,
            installment: projected,
            clamped: false,
        });
    }

    let supported = principal_for(allowed, rate, tenure_years)?;
    let amount = amount.min(supported);
    Ok(AffordabilityOutcome::Approved {
        amount,
        installment: installment_for(amount, rate, tenure_years)?,
        clamped: true,
    })
}
