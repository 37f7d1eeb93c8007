//! Standard lending tables for the five retail products.

use super::super::intake::{Attribute, Metric};
use super::config::{
    AffordabilityPolicy, AmountCeiling, BandThresholds, CategoryPolicy, Condition, HardCheck,
    HardRule, PolicyBook, RateAdjustment, RatePolicy, RemarkSet, ScoreFactor, Step, TenurePolicy,
};

const CONDITIONAL_REMARK: &str =
    "Eligible with reduced loan amount due to EMI burden or risk factors";
const BELOW_RISK_REMARK: &str = "Application does not meet minimum risk criteria";
const EMI_BURDEN_REMARK: &str = "Existing EMI burden too high - no additional loan capacity";

fn at_least(metric: Metric, value: f64) -> Condition {
    Condition::AtLeast { metric, value }
}

fn has(attribute: Attribute) -> Condition {
    Condition::Has { attribute }
}

fn step<T>(when: Condition, value: T) -> Step<T> {
    Step { when, value }
}

fn require(reason: &str, condition: Condition) -> HardRule {
    HardRule {
        reason: reason.to_string(),
        check: HardCheck::Requires { condition },
    }
}

fn age_between(reason: &str, min: f64, max: f64) -> HardRule {
    require(
        reason,
        Condition::Within {
            metric: Metric::ApplicantAge,
            min,
            max,
        },
    )
}

fn tiered(label: &str, metric: Metric, tiers: &[(f64, u8)], floor: u8) -> ScoreFactor {
    ScoreFactor {
        label: label.to_string(),
        steps: tiers
            .iter()
            .map(|(threshold, points)| step(at_least(metric, *threshold), *points))
            .collect(),
        floor,
    }
}

fn by_attribute(label: &str, points: &[(Attribute, u8)], floor: u8) -> ScoreFactor {
    ScoreFactor {
        label: label.to_string(),
        steps: points
            .iter()
            .map(|(attribute, value)| step(has(*attribute), *value))
            .collect(),
        floor,
    }
}

fn adjustment(label: &str, steps: Vec<Step<f64>>) -> RateAdjustment {
    RateAdjustment {
        label: label.to_string(),
        steps,
    }
}

fn credit_score_factor(metric: Metric, points: [u8; 3]) -> ScoreFactor {
    tiered(
        "credit score",
        metric,
        &[(750.0, points[0]), (700.0, points[1])],
        points[2],
    )
}

fn stability_factor() -> ScoreFactor {
    tiered(
        "employment stability",
        Metric::EmploymentStabilityYears,
        &[(5.0, 20), (3.0, 15)],
        8,
    )
}

fn residence_factor() -> ScoreFactor {
    by_attribute("residence", &[(Attribute::OwnedResidence, 10)], 5)
}

fn remarks(eligible: &str, conditional: &str, below_risk: &str, capacity: &str) -> RemarkSet {
    RemarkSet {
        eligible: eligible.to_string(),
        conditional: conditional.to_string(),
        below_risk: below_risk.to_string(),
        insufficient_capacity: capacity.to_string(),
    }
}

impl PolicyBook {
    pub fn standard() -> Self {
        Self {
            personal: personal(),
            home: home(),
            education: education(),
            vehicle: vehicle(),
            business: business(),
        }
    }
}

fn personal() -> CategoryPolicy {
    CategoryPolicy {
        hard_rules: vec![
            age_between("Age not eligible (must be 21-60 years)", 21.0, 60.0),
            require(
                "Minimum monthly income not met (₹25,000 required)",
                at_least(Metric::MonthlyIncome, 25_000.0),
            ),
            require(
                "Low credit score (minimum 650 required)",
                at_least(Metric::CreditScore, 650.0),
            ),
            require(
                "Minimum employment stability not met (1 year required)",
                at_least(Metric::EmploymentStabilityYears, 1.0),
            ),
        ],
        score_factors: vec![
            credit_score_factor(Metric::CreditScore, [30, 22, 15]),
            tiered(
                "income level",
                Metric::MonthlyIncome,
                &[(100_000.0, 25), (60_000.0, 18)],
                10,
            ),
            stability_factor(),
            by_attribute(
                "employment type",
                &[
                    (Attribute::SelfEmployed, 8),
                    (Attribute::PublicSectorEmployer, 15),
                    (Attribute::MultinationalEmployer, 12),
                ],
                10,
            ),
            residence_factor(),
        ],
        bands: BandThresholds {
            eligible: 75,
            conditional: 60,
        },
        rate: RatePolicy {
            base_rate: 11.5,
            adjustments: vec![
                adjustment(
                    "credit tier",
                    vec![
                        step(at_least(Metric::CreditScore, 750.0), -1.0),
                        step(at_least(Metric::CreditScore, 700.0), -0.5),
                    ],
                ),
                adjustment(
                    "self-employed surcharge",
                    vec![step(has(Attribute::SelfEmployed), 1.0)],
                ),
            ],
        },
        ceiling: AmountCeiling::Banded {
            bands: vec![
                step(at_least(Metric::MonthlyIncome, 100_000.0), 4_000_000.0),
                step(at_least(Metric::MonthlyIncome, 60_000.0), 2_500_000.0),
            ],
            default_amount: 1_000_000.0,
        },
        tenure: TenurePolicy {
            min_years: 1,
            max_years: 5,
            caps: Vec::new(),
        },
        affordability: AffordabilityPolicy {
            fraction: 0.50,
            income_basis: Metric::MonthlyIncome,
            obligations: Metric::ExistingObligations,
            downgrade_below: 0.5,
        },
        remarks: remarks(
            "Eligible based on income, credit score, and employment stability",
            CONDITIONAL_REMARK,
            BELOW_RISK_REMARK,
            EMI_BURDEN_REMARK,
        ),
    }
}

fn home() -> CategoryPolicy {
    CategoryPolicy {
        hard_rules: vec![
            age_between("Age not eligible (must be 21-65 years)", 21.0, 65.0),
            require(
                "Low credit score (minimum 650 required)",
                at_least(Metric::CreditScore, 650.0),
            ),
            require(
                "Minimum employment stability not met (2 years required)",
                at_least(Metric::EmploymentStabilityYears, 2.0),
            ),
            require(
                "Invalid property value",
                Condition::Above {
                    metric: Metric::CollateralValue,
                    value: 0.0,
                },
            ),
        ],
        score_factors: vec![
            credit_score_factor(Metric::CreditScore, [30, 22, 15]),
            tiered(
                "combined income",
                Metric::HouseholdIncome,
                &[(150_000.0, 25), (100_000.0, 20), (60_000.0, 15)],
                8,
            ),
            stability_factor(),
            by_attribute(
                "property readiness",
                &[(Attribute::UnderConstruction, 5)],
                8,
            ),
            by_attribute("property location", &[(Attribute::MetroCity, 7)], 4),
            residence_factor(),
        ],
        bands: BandThresholds {
            eligible: 80,
            conditional: 65,
        },
        rate: RatePolicy {
            base_rate: 8.75,
            adjustments: vec![
                adjustment(
                    "credit tier",
                    vec![
                        step(at_least(Metric::CreditScore, 750.0), -0.25),
                        step(at_least(Metric::CreditScore, 700.0), 0.0),
                        step(Condition::Always, 0.25),
                    ],
                ),
                adjustment(
                    "self-employed surcharge",
                    vec![step(has(Attribute::SelfEmployed), 0.5)],
                ),
            ],
        },
        ceiling: AmountCeiling::FractionOf {
            basis: Metric::CollateralValue,
            fractions: vec![step(
                Condition::AtMost {
                    metric: Metric::CollateralValue,
                    value: 3_000_000.0,
                },
                0.90,
            )],
            default_fraction: 0.80,
        },
        tenure: TenurePolicy {
            min_years: 10,
            max_years: 30,
            caps: Vec::new(),
        },
        affordability: AffordabilityPolicy {
            fraction: 0.45,
            income_basis: Metric::HouseholdIncome,
            obligations: Metric::ExistingObligations,
            downgrade_below: 0.7,
        },
        remarks: remarks(
            "Eligible based on income, credit score, and property value",
            CONDITIONAL_REMARK,
            BELOW_RISK_REMARK,
            EMI_BURDEN_REMARK,
        ),
    }
}

fn education() -> CategoryPolicy {
    CategoryPolicy {
        hard_rules: vec![
            age_between("Student age not eligible (must be 18-35 years)", 18.0, 35.0),
            require(
                "Only full-time courses allowed",
                has(Attribute::FullTimeStudy),
            ),
            require(
                "Minimum academic score not met (50% required)",
                at_least(Metric::AcademicScorePercent, 50.0),
            ),
            require(
                "Too many academic backlogs (maximum 2 allowed)",
                Condition::AtMost {
                    metric: Metric::Backlogs,
                    value: 2.0,
                },
            ),
            require(
                "Co-applicant income required",
                Condition::Above {
                    metric: Metric::CoApplicantIncome,
                    value: 0.0,
                },
            ),
            require(
                "Low credit score (minimum 600 required)",
                at_least(Metric::CoApplicantCreditScore, 600.0),
            ),
        ],
        score_factors: vec![
            tiered(
                "academic performance",
                Metric::AcademicScorePercent,
                &[(80.0, 30), (65.0, 22)],
                15,
            ),
            tiered(
                "co-applicant income",
                Metric::CoApplicantIncome,
                &[(60_000.0, 25), (40_000.0, 18)],
                10,
            ),
            credit_score_factor(Metric::CoApplicantCreditScore, [25, 18, 10]),
            by_attribute(
                "institution quality",
                &[
                    (Attribute::GovernmentInstitution, 10),
                    (Attribute::PrivateInstitution, 7),
                ],
                5,
            ),
            tiered(
                "co-applicant stability",
                Metric::CoApplicantStabilityYears,
                &[(5.0, 10), (2.0, 6)],
                3,
            ),
        ],
        bands: BandThresholds {
            eligible: 70,
            conditional: 55,
        },
        rate: RatePolicy {
            base_rate: 9.5,
            adjustments: vec![adjustment(
                "risk tier",
                vec![
                    step(Condition::RiskScoreAtLeast { score: 80 }, -0.5),
                    step(Condition::RiskScoreAtLeast { score: 65 }, 0.0),
                    step(Condition::Always, 0.75),
                ],
            )],
        },
        ceiling: AmountCeiling::Banded {
            bands: vec![
                step(
                    Condition::All {
                        conditions: vec![
                            has(Attribute::GovernmentInstitution),
                            has(Attribute::DomesticStudy),
                        ],
                    },
                    1_000_000.0,
                ),
                step(
                    Condition::All {
                        conditions: vec![
                            has(Attribute::PrivateInstitution),
                            has(Attribute::DomesticStudy),
                        ],
                    },
                    750_000.0,
                ),
                step(has(Attribute::StudyAbroad), 2_000_000.0),
            ],
            default_amount: 750_000.0,
        },
        tenure: TenurePolicy {
            min_years: 5,
            max_years: 15,
            caps: vec![
                step(
                    Condition::Above {
                        metric: Metric::CoApplicantIncome,
                        value: 70_000.0,
                    },
                    8,
                ),
                step(at_least(Metric::CoApplicantIncome, 40_000.0), 10),
            ],
        },
        affordability: AffordabilityPolicy {
            fraction: 0.45,
            income_basis: Metric::CoApplicantIncome,
            obligations: Metric::CoApplicantObligations,
            downgrade_below: 0.5,
        },
        remarks: remarks(
            "Eligible based on academic performance and co-applicant income",
            CONDITIONAL_REMARK,
            "High risk applicant - does not meet minimum risk criteria",
            EMI_BURDEN_REMARK,
        ),
    }
}

fn vehicle() -> CategoryPolicy {
    CategoryPolicy {
        hard_rules: vec![
            age_between("Age not eligible (must be 21-65 years)", 21.0, 65.0),
            require(
                "Low credit score (minimum 650 required)",
                at_least(Metric::CreditScore, 650.0),
            ),
            require(
                "Minimum employment stability not met (1 year required)",
                at_least(Metric::EmploymentStabilityYears, 1.0),
            ),
            require(
                "Invalid vehicle cost",
                Condition::Above {
                    metric: Metric::CollateralValue,
                    value: 0.0,
                },
            ),
            HardRule {
                reason: "Minimum down payment not met".to_string(),
                check: HardCheck::MinimumDownPayment,
            },
        ],
        score_factors: vec![
            credit_score_factor(Metric::CreditScore, [30, 22, 15]),
            tiered(
                "income level",
                Metric::MonthlyIncome,
                &[(80_000.0, 25), (50_000.0, 18), (30_000.0, 12)],
                6,
            ),
            stability_factor(),
            by_attribute("vehicle condition", &[(Attribute::UsedVehicle, 6)], 10),
            by_attribute("vehicle type", &[(Attribute::FourWheeler, 5)], 3),
            residence_factor(),
        ],
        bands: BandThresholds {
            eligible: 75,
            conditional: 60,
        },
        rate: RatePolicy {
            base_rate: 9.25,
            adjustments: vec![
                adjustment(
                    "used vehicle surcharge",
                    vec![step(has(Attribute::UsedVehicle), 1.5)],
                ),
                adjustment(
                    "credit tier",
                    vec![
                        step(at_least(Metric::CreditScore, 750.0), -0.5),
                        step(at_least(Metric::CreditScore, 700.0), 0.0),
                        step(Condition::Always, 0.5),
                    ],
                ),
                adjustment(
                    "self-employed surcharge",
                    vec![step(has(Attribute::SelfEmployed), 0.75)],
                ),
            ],
        },
        ceiling: AmountCeiling::FractionOf {
            basis: Metric::CollateralValue,
            fractions: vec![step(has(Attribute::UsedVehicle), 0.70)],
            default_fraction: 0.90,
        },
        tenure: TenurePolicy {
            min_years: 1,
            max_years: 7,
            caps: vec![step(has(Attribute::TwoWheeler), 5)],
        },
        affordability: AffordabilityPolicy {
            fraction: 0.50,
            income_basis: Metric::MonthlyIncome,
            obligations: Metric::ExistingObligations,
            downgrade_below: 0.5,
        },
        remarks: remarks(
            "Eligible for {vehicle_type} loan based on income and credit profile",
            CONDITIONAL_REMARK,
            BELOW_RISK_REMARK,
            EMI_BURDEN_REMARK,
        ),
    }
}

fn business() -> CategoryPolicy {
    CategoryPolicy {
        hard_rules: vec![
            age_between("Age not eligible (must be 25-65 years)", 25.0, 65.0),
            require(
                "Business age not eligible (minimum 2 years required)",
                at_least(Metric::BusinessAgeYears, 2.0),
            ),
            require(
                "Low credit score (minimum 650 required)",
                at_least(Metric::CreditScore, 650.0),
            ),
            require(
                "Invalid business financials",
                Condition::All {
                    conditions: vec![
                        Condition::Above {
                            metric: Metric::AnnualTurnover,
                            value: 0.0,
                        },
                        Condition::Above {
                            metric: Metric::NetProfit,
                            value: 0.0,
                        },
                    ],
                },
            ),
        ],
        score_factors: vec![
            credit_score_factor(Metric::CreditScore, [25, 18, 12]),
            tiered(
                "business vintage",
                Metric::BusinessAgeYears,
                &[(10.0, 25), (5.0, 20), (3.0, 15)],
                8,
            ),
            tiered(
                "profit margin",
                Metric::ProfitMargin,
                &[(0.25, 20), (0.15, 15), (0.10, 10)],
                5,
            ),
            by_attribute(
                "entity type",
                &[(Attribute::PrivateLimited, 15), (Attribute::Partnership, 12)],
                8,
            ),
            tiered(
                "turnover level",
                Metric::AnnualTurnover,
                &[(10_000_000.0, 15), (5_000_000.0, 12), (2_000_000.0, 8)],
                4,
            ),
        ],
        bands: BandThresholds {
            eligible: 75,
            conditional: 60,
        },
        rate: RatePolicy {
            base_rate: 13.0,
            adjustments: vec![
                adjustment(
                    "credit tier",
                    vec![
                        step(at_least(Metric::CreditScore, 750.0), -1.0),
                        step(at_least(Metric::CreditScore, 700.0), -0.5),
                    ],
                ),
                adjustment(
                    "business vintage discount",
                    vec![step(
                        Condition::Above {
                            metric: Metric::BusinessAgeYears,
                            value: 5.0,
                        },
                        -0.5,
                    )],
                ),
                adjustment(
                    "incorporated entity discount",
                    vec![step(has(Attribute::PrivateLimited), -0.25)],
                ),
            ],
        },
        ceiling: AmountCeiling::FractionOf {
            basis: Metric::AnnualTurnover,
            fractions: Vec::new(),
            default_fraction: 0.25,
        },
        tenure: TenurePolicy {
            min_years: 1,
            max_years: 10,
            caps: Vec::new(),
        },
        affordability: AffordabilityPolicy {
            fraction: 0.60,
            income_basis: Metric::MonthlyNetProfit,
            obligations: Metric::ExistingObligations,
            downgrade_below: 0.6,
        },
        remarks: remarks(
            "Eligible based on business performance and {business_age_years} years of business experience",
            "Eligible with reduced loan amount due to profit capacity or risk factors",
            BELOW_RISK_REMARK,
            "Insufficient business profit to service loan EMI",
        ),
    }
}
