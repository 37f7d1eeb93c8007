use serde::{Deserialize, Serialize};

use super::super::domain::LoanCategory;
use super::super::intake::{ApplicationFacts, Attribute, Metric};

/// Predicate over normalized application facts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Condition {
    Always,
    AtLeast { metric: Metric, value: f64 },
    AtMost { metric: Metric, value: f64 },
    Above { metric: Metric, value: f64 },
    Within { metric: Metric, min: f64, max: f64 },
    Has { attribute: Attribute },
    All { conditions: Vec<Condition> },
    RiskScoreAtLeast { score: u8 },
}

impl Condition {
    /// `risk_score` is `None` before scoring has run; score predicates never hold then.
    pub fn holds(&self, facts: &ApplicationFacts, risk_score: Option<u8>) -> bool {
        match self {
            Condition::Always => true,
            Condition::AtLeast { metric, value } => facts.metric(*metric) >= *value,
            Condition::AtMost { metric, value } => facts.metric(*metric) <= *value,
            Condition::Above { metric, value } => facts.metric(*metric) > *value,
            Condition::Within { metric, min, max } => {
                let observed = facts.metric(*metric);
                observed >= *min && observed <= *max
            }
            Condition::Has { attribute } => facts.has(*attribute),
            Condition::All { conditions } => conditions
                .iter()
                .all(|condition| condition.holds(facts, risk_score)),
            Condition::RiskScoreAtLeast { score } => {
                risk_score.map(|actual| actual >= *score).unwrap_or(false)
            }
        }
    }
}

/// One rung of a tiered table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step<T> {
    pub when: Condition,
    pub value: T,
}

fn first_match<'a, T>(
    steps: &'a [Step<T>],
    facts: &ApplicationFacts,
    risk_score: Option<u8>,
) -> Option<&'a T> {
    steps
        .iter()
        .find(|step| step.when.holds(facts, risk_score))
        .map(|step| &step.value)
}

/// Gate that rejects outright when it fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HardRule {
    pub reason: String,
    pub check: HardCheck,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HardCheck {
    Requires { condition: Condition },
    /// Supplied down payment must cover the share of collateral the ceiling does not finance.
    MinimumDownPayment,
}

/// Weighted risk factor; the highest matching step wins, else the floor applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreFactor {
    pub label: String,
    pub steps: Vec<Step<u8>>,
    pub floor: u8,
}

impl ScoreFactor {
    pub fn points_for(&self, facts: &ApplicationFacts) -> u8 {
        first_match(&self.steps, facts, None)
            .copied()
            .unwrap_or(self.floor)
    }

    pub fn max_points(&self) -> u8 {
        self.steps
            .iter()
            .map(|step| step.value)
            .fold(self.floor, u8::max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandThresholds {
    pub eligible: u8,
    pub conditional: u8,
}

/// Additive rate delta; each adjustment contributes its first matching step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateAdjustment {
    pub label: String,
    pub steps: Vec<Step<f64>>,
}

impl RateAdjustment {
    pub fn delta_for(&self, facts: &ApplicationFacts, risk_score: u8) -> f64 {
        first_match(&self.steps, facts, Some(risk_score))
            .copied()
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatePolicy {
    pub base_rate: f64,
    pub adjustments: Vec<RateAdjustment>,
}

/// Maximum sanctionable amount before affordability is considered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AmountCeiling {
    /// Fixed amounts keyed to profile bands.
    Banded {
        bands: Vec<Step<f64>>,
        default_amount: f64,
    },
    /// Fraction of a basis value: loan-to-value on collateral or a turnover multiple.
    FractionOf {
        basis: Metric,
        fractions: Vec<Step<f64>>,
        default_fraction: f64,
    },
}

impl AmountCeiling {
    pub fn fraction_for(&self, facts: &ApplicationFacts) -> Option<f64> {
        match self {
            AmountCeiling::Banded { .. } => None,
            AmountCeiling::FractionOf {
                fractions,
                default_fraction,
                ..
            } => Some(
                first_match(fractions, facts, None)
                    .copied()
                    .unwrap_or(*default_fraction),
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenurePolicy {
    pub min_years: u32,
    pub max_years: u32,
    /// Profile-dependent lower maxima; the first match replaces `max_years`.
    #[serde(default)]
    pub caps: Vec<Step<u32>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffordabilityPolicy {
    pub fraction: f64,
    pub income_basis: Metric,
    pub obligations: Metric,
    /// Clamped amounts below this share of the request are downgraded to conditional.
    pub downgrade_below: f64,
}

/// Remark templates; `{key}` placeholders are filled from application labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemarkSet {
    pub eligible: String,
    pub conditional: String,
    pub below_risk: String,
    pub insufficient_capacity: String,
}

/// Complete parameter table for one loan category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryPolicy {
    pub hard_rules: Vec<HardRule>,
    pub score_factors: Vec<ScoreFactor>,
    pub bands: BandThresholds,
    pub rate: RatePolicy,
    pub ceiling: AmountCeiling,
    pub tenure: TenurePolicy,
    pub affordability: AffordabilityPolicy,
    pub remarks: RemarkSet,
}

impl CategoryPolicy {
    /// Highest score the weight table can produce.
    pub fn score_ceiling(&self) -> u32 {
        self.score_factors
            .iter()
            .map(|factor| factor.max_points() as u32)
            .sum()
    }

    fn validate(&self, category: LoanCategory) -> Result<(), PolicyError> {
        if self.tenure.min_years == 0 {
            return Err(PolicyError::ZeroTenure { category });
        }
        let smallest_cap = self
            .tenure
            .caps
            .iter()
            .map(|step| step.value)
            .fold(self.tenure.max_years, u32::min);
        if smallest_cap < self.tenure.min_years {
            return Err(PolicyError::TenureRange { category });
        }
        if self.bands.conditional > self.bands.eligible {
            return Err(PolicyError::BandOrder { category });
        }
        if self.score_ceiling() > u8::MAX as u32 {
            return Err(PolicyError::ScoreOverflow {
                category,
                ceiling: self.score_ceiling(),
            });
        }

        let mut fractions = vec![
            ("affordability.fraction", self.affordability.fraction),
            (
                "affordability.downgrade_below",
                self.affordability.downgrade_below,
            ),
        ];
        if let AmountCeiling::FractionOf {
            fractions: steps,
            default_fraction,
            ..
        } = &self.ceiling
        {
            fractions.push(("ceiling.default_fraction", *default_fraction));
            fractions.extend(steps.iter().map(|step| ("ceiling.fractions", step.value)));
        }
        for (field, value) in fractions {
            if !(value > 0.0 && value <= 1.0) {
                return Err(PolicyError::Fraction {
                    category,
                    field,
                    value,
                });
            }
        }

        Ok(())
    }
}

/// Per-category tables consulted by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyBook {
    pub personal: CategoryPolicy,
    pub home: CategoryPolicy,
    pub education: CategoryPolicy,
    pub vehicle: CategoryPolicy,
    pub business: CategoryPolicy,
}

impl PolicyBook {
    pub fn policy(&self, category: LoanCategory) -> &CategoryPolicy {
        match category {
            LoanCategory::Personal => &self.personal,
            LoanCategory::Home => &self.home,
            LoanCategory::Education => &self.education,
            LoanCategory::Vehicle => &self.vehicle,
            LoanCategory::Business => &self.business,
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn validate(&self) -> Result<(), PolicyError> {
        LoanCategory::ALL
            .iter()
            .try_for_each(|category| self.policy(*category).validate(*category))
    }
}

impl Default for PolicyBook {
    fn default() -> Self {
        Self::standard()
    }
}

/// Structural problems in a policy table.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PolicyError {
    #[error("{category} tenure minimum must be at least one year")]
    ZeroTenure { category: LoanCategory },
    #[error("{category} tenure caps fall below the tenure minimum")]
    TenureRange { category: LoanCategory },
    #[error("{category} conditional band exceeds the eligible band")]
    BandOrder { category: LoanCategory },
    #[error("{category} score weights sum to {ceiling}, above the representable maximum")]
    ScoreOverflow { category: LoanCategory, ceiling: u32 },
    #[error("{category} {field} must be within (0, 1] (found {value})")]
    Fraction {
        category: LoanCategory,
        field: &'static str,
        value: f64,
    },
}
