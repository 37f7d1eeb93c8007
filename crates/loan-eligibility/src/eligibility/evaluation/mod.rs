mod affordability;
mod config;
mod policy;
mod rules;
mod standard;

pub use config::{
    AffordabilityPolicy, AmountCeiling, BandThresholds, CategoryPolicy, Condition, HardCheck,
    HardRule, PolicyBook, PolicyError, RateAdjustment, RatePolicy, RemarkSet, ScoreFactor, Step,
    TenurePolicy,
};
pub use policy::EligibilityStatus;

use super::amortization::AmortizationError;
use super::domain::{LoanApplication, LoanCategory};
use super::intake::ApplicationFacts;
use affordability::{clamp_to_capacity, AffordabilityOutcome};
use policy::{amount_ceiling, band, capped_amount, interest_rate, render_remark, tenure_years};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Stateless evaluator that runs an application through its category's policy table.
#[derive(Debug, Clone, Default)]
pub struct EligibilityEngine {
    policies: PolicyBook,
}

impl EligibilityEngine {
    pub fn new(policies: PolicyBook) -> Self {
        Self { policies }
    }

    pub fn standard() -> Self {
        Self::new(PolicyBook::standard())
    }

    pub fn policies(&self) -> &PolicyBook {
        &self.policies
    }

    /// Hard filter, scoring, banding, pricing, tenure, affordability, assembly.
    pub fn evaluate(
        &self,
        application: &LoanApplication,
    ) -> Result<EligibilityDecision, AmortizationError> {
        let facts = ApplicationFacts::from(application);
        let category = facts.category;
        let policy = self.policies.policy(category);

        let rejections = rules::hard_rejections(&facts, policy);
        if !rejections.is_empty() {
            debug!(%category, count = rejections.len(), "hard rejection");
            return Ok(finish(EligibilityDecision::rejected(
                category,
                0,
                Vec::new(),
                rejections,
            )));
        }

        let (components, risk_score) = rules::score_facts(&facts, policy);
        let banded = band(risk_score, &policy.bands);
        debug!(%category, risk_score, status = %banded, "risk score banded");
        if banded == EligibilityStatus::NotEligible {
            return Ok(finish(EligibilityDecision::rejected(
                category,
                risk_score,
                components,
                vec![render_remark(&policy.remarks.below_risk, &facts)],
            )));
        }

        let rate = interest_rate(&facts, &policy.rate, risk_score);
        let ceiling = amount_ceiling(&facts, &policy.ceiling);
        let tenure = tenure_years(&facts, &policy.tenure);
        let amount = capped_amount(&facts, ceiling);
        debug!(%category, rate, ceiling, tenure, amount, "terms derived");

        let (amount, installment, clamped) = match clamp_to_capacity(
            &facts,
            &policy.affordability,
            amount,
            rate,
            tenure,
        )? {
            AffordabilityOutcome::Exhausted => {
                return Ok(finish(EligibilityDecision::rejected(
                    category,
                    risk_score,
                    components,
                    vec![render_remark(
                        &policy.remarks.insufficient_capacity,
                        &facts,
                    )],
                )));
            }
            AffordabilityOutcome::Approved {
                amount,
                installment,
                clamped,
            } => (amount, installment, clamped),
        };

        let downgrade_floor = policy.affordability.downgrade_below * facts.downgrade_reference();
        let status = if banded == EligibilityStatus::Eligible && clamped && amount < downgrade_floor
        {
            debug!(%category, amount, downgrade_floor, "clamped below downgrade floor");
            EligibilityStatus::ConditionallyEligible
        } else {
            banded
        };

        let remark = match status {
            EligibilityStatus::Eligible => &policy.remarks.eligible,
            _ => &policy.remarks.conditional,
        };

        let installment = installment.round().max(0.0) as u64;
        Ok(finish(EligibilityDecision {
            loan_category: category,
            eligibility_status: status,
            risk_score,
            approved_loan_amount: amount.round().max(0.0) as u64,
            interest_rate: rate,
            recommended_tenure_years: tenure,
            estimated_monthly_emi: installment,
            total_payable_amount: installment * tenure as u64 * 12,
            remarks: vec![render_remark(remark, &facts)],
            score_breakdown: components,
        }))
    }
}

fn finish(decision: EligibilityDecision) -> EligibilityDecision {
    info!(
        category = %decision.loan_category,
        status = %decision.eligibility_status,
        risk_score = decision.risk_score,
        approved = decision.approved_loan_amount,
        "eligibility evaluated"
    );
    decision
}

/// Points a single factor contributed, kept for audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: String,
    pub points: u8,
}

/// Response envelope for one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityDecision {
    pub loan_category: LoanCategory,
    pub eligibility_status: EligibilityStatus,
    pub risk_score: u8,
    pub approved_loan_amount: u64,
    pub interest_rate: f64,
    pub recommended_tenure_years: u32,
    #[serde(rename = "estimatedMonthlyEMI")]
    pub estimated_monthly_emi: u64,
    pub total_payable_amount: u64,
    #[serde(with = "remark_list")]
    pub remarks: Vec<String>,
    #[serde(default)]
    pub score_breakdown: Vec<ScoreComponent>,
}

impl EligibilityDecision {
    fn rejected(
        loan_category: LoanCategory,
        risk_score: u8,
        score_breakdown: Vec<ScoreComponent>,
        remarks: Vec<String>,
    ) -> Self {
        Self {
            loan_category,
            eligibility_status: EligibilityStatus::NotEligible,
            risk_score,
            approved_loan_amount: 0,
            interest_rate: 0.0,
            recommended_tenure_years: 0,
            estimated_monthly_emi: 0,
            total_payable_amount: 0,
            remarks,
            score_breakdown,
        }
    }

    pub fn remark_text(&self) -> String {
        self.remarks.join(remark_list::SEPARATOR)
    }
}

/// Remarks travel as one `"; "`-joined string on the wire.
mod remark_list {
    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) const SEPARATOR: &str = "; ";

    pub fn serialize<S>(remarks: &[String], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&remarks.join(SEPARATOR))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let joined = String::deserialize(deserializer)?;
        if joined.is_empty() {
            return Ok(Vec::new());
        }
        Ok(joined.split(SEPARATOR).map(str::to_string).collect())
    }
}
