use super::super::intake::{ApplicationFacts, Metric};
use super::config::{CategoryPolicy, HardCheck, HardRule};
use super::ScoreComponent;

/// Runs every gate and collects the reasons of those that fail. Gates are
/// independent so a single response can report several violations.
pub(crate) fn hard_rejections(facts: &ApplicationFacts, policy: &CategoryPolicy) -> Vec<String> {
    policy
        .hard_rules
        .iter()
        .filter_map(|rule| failing_reason(rule, facts, policy))
        .collect()
}

fn failing_reason(
    rule: &HardRule,
    facts: &ApplicationFacts,
    policy: &CategoryPolicy,
) -> Option<String> {
    match &rule.check {
        HardCheck::Requires { condition } => {
            (!condition.holds(facts, None)).then(|| rule.reason.clone())
        }
        HardCheck::MinimumDownPayment => {
            // Applications without a down payment are financed against the ceiling alone.
            if !facts.has_metric(Metric::DownPayment) {
                return None;
            }
            let financed_share = policy.ceiling.fraction_for(facts)?;
            let required_share = 1.0 - financed_share;
            let required = facts.metric(Metric::CollateralValue) * required_share;

            (facts.metric(Metric::DownPayment) < required).then(|| {
                format!(
                    "{} ({:.0}% required, ₹{:.0})",
                    rule.reason,
                    required_share * 100.0,
                    required
                )
            })
        }
    }
}

/// Sums the weighted factors; the total never exceeds the table's score ceiling.
pub(crate) fn score_facts(
    facts: &ApplicationFacts,
    policy: &CategoryPolicy,
) -> (Vec<ScoreComponent>, u8) {
    let components: Vec<ScoreComponent> = policy
        .score_factors
        .iter()
        .map(|factor| ScoreComponent {
            factor: factor.label.clone(),
            points: factor.points_for(facts),
        })
        .collect();

    let total: u32 = components
        .iter()
        .map(|component| component.points as u32)
        .sum();

    (components, total.min(u8::MAX as u32) as u8)
}
