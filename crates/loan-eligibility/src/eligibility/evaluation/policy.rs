use std::fmt;

use super::super::intake::ApplicationFacts;
use super::config::{AmountCeiling, BandThresholds, RatePolicy, TenurePolicy};
use serde::{Deserialize, Serialize};

/// Final disposition of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EligibilityStatus {
    Eligible,
    #[serde(rename = "Conditionally Eligible")]
    ConditionallyEligible,
    #[serde(rename = "Not Eligible")]
    NotEligible,
}

impl EligibilityStatus {
    pub fn label(&self) -> &'static str {
        match self {
            EligibilityStatus::Eligible => "Eligible",
            EligibilityStatus::ConditionallyEligible => "Conditionally Eligible",
            EligibilityStatus::NotEligible => "Not Eligible",
        }
    }

    pub fn is_approved(&self) -> bool {
        !matches!(self, EligibilityStatus::NotEligible)
    }
}

impl fmt::Display for EligibilityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub(crate) fn band(risk_score: u8, thresholds: &BandThresholds) -> EligibilityStatus {
    if risk_score >= thresholds.eligible {
        EligibilityStatus::Eligible
    } else if risk_score >= thresholds.conditional {
        EligibilityStatus::ConditionallyEligible
    } else {
        EligibilityStatus::NotEligible
    }
}

/// Base rate plus every adjustment group's delta, rounded to two decimals.
pub(crate) fn interest_rate(facts: &ApplicationFacts, rate: &RatePolicy, risk_score: u8) -> f64 {
    let adjusted = rate
        .adjustments
        .iter()
        .fold(rate.base_rate, |acc, adjustment| {
            acc + adjustment.delta_for(facts, risk_score)
        });
    (adjusted * 100.0).round() / 100.0
}

pub(crate) fn amount_ceiling(facts: &ApplicationFacts, ceiling: &AmountCeiling) -> f64 {
    match ceiling {
        AmountCeiling::Banded {
            bands,
            default_amount,
        } => bands
            .iter()
            .find(|step| step.when.holds(facts, None))
            .map(|step| step.value)
            .unwrap_or(*default_amount),
        AmountCeiling::FractionOf { basis, .. } => {
            let fraction = ceiling.fraction_for(facts).unwrap_or(0.0);
            facts.metric(*basis) * fraction
        }
    }
}

/// Requested amount capped by the ceiling; products without an explicit
/// request finance up to the ceiling.
pub(crate) fn capped_amount(facts: &ApplicationFacts, ceiling: f64) -> f64 {
    facts
        .requested_amount
        .map(|requested| requested.min(ceiling))
        .unwrap_or(ceiling)
        .max(0.0)
}

/// Preferred tenure clamped into the policy range. Never returns zero for a
/// validated policy.
pub(crate) fn tenure_years(facts: &ApplicationFacts, tenure: &TenurePolicy) -> u32 {
    let maximum = tenure
        .caps
        .iter()
        .find(|step| step.when.holds(facts, None))
        .map(|step| step.value)
        .unwrap_or(tenure.max_years);

    facts
        .preferred_tenure_years
        .min(maximum)
        .max(tenure.min_years)
}

/// Fills `{key}` placeholders from the application labels.
pub(crate) fn render_remark(template: &str, facts: &ApplicationFacts) -> String {
    facts
        .labels
        .iter()
        .fold(template.to_string(), |text, (key, value)| {
            text.replace(&format!("{{{key}}}"), value)
        })
}
