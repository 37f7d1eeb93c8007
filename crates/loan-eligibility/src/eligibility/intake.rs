use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::domain::{
    ApplicantDetails, BusinessType, CityType, CompanyType, EmploymentType, InstitutionType,
    LoanApplication, LoanCategory, PropertyType, ResidenceType, StudyLocation, StudyMode,
    VehicleCondition, VehicleType,
};

/// Numeric observation extracted from an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    ApplicantAge,
    CreditScore,
    MonthlyIncome,
    HouseholdIncome,
    ExistingObligations,
    EmploymentStabilityYears,
    CollateralValue,
    DownPayment,
    AcademicScorePercent,
    Backlogs,
    CoApplicantIncome,
    CoApplicantCreditScore,
    CoApplicantStabilityYears,
    CoApplicantObligations,
    BusinessAgeYears,
    AnnualTurnover,
    NetProfit,
    MonthlyNetProfit,
    ProfitMargin,
}

/// Categorical observation extracted from an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    SelfEmployed,
    PublicSectorEmployer,
    MultinationalEmployer,
    OwnedResidence,
    MetroCity,
    UnderConstruction,
    FullTimeStudy,
    GovernmentInstitution,
    PrivateInstitution,
    DomesticStudy,
    StudyAbroad,
    UsedVehicle,
    TwoWheeler,
    FourWheeler,
    PrivateLimited,
    Partnership,
}

/// Category-neutral view of an application that the rule tables are evaluated against.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationFacts {
    pub category: LoanCategory,
    pub metrics: BTreeMap<Metric, f64>,
    pub attributes: BTreeSet<Attribute>,
    /// `None` when the product finances up to its ceiling (LTV-only vehicle loans).
    pub requested_amount: Option<f64>,
    pub preferred_tenure_years: u32,
    /// Values interpolated into remark templates.
    pub labels: BTreeMap<&'static str, String>,
}

impl ApplicationFacts {
    fn new(category: LoanCategory, preferred_tenure_years: u32) -> Self {
        Self {
            category,
            metrics: BTreeMap::new(),
            attributes: BTreeSet::new(),
            requested_amount: None,
            preferred_tenure_years,
            labels: BTreeMap::new(),
        }
    }

    /// Missing metrics read as zero.
    pub fn metric(&self, metric: Metric) -> f64 {
        self.metrics.get(&metric).copied().unwrap_or(0.0)
    }

    pub fn has_metric(&self, metric: Metric) -> bool {
        self.metrics.contains_key(&metric)
    }

    pub fn has(&self, attribute: Attribute) -> bool {
        self.attributes.contains(&attribute)
    }

    /// Amount the affordability downgrade is measured against.
    pub fn downgrade_reference(&self) -> f64 {
        self.requested_amount
            .unwrap_or_else(|| self.metric(Metric::CollateralValue))
    }

    fn set(&mut self, metric: Metric, value: f64) {
        self.metrics.insert(metric, value);
    }

    fn flag(&mut self, attribute: Attribute, present: bool) {
        if present {
            self.attributes.insert(attribute);
        }
    }

    fn record_applicant(&mut self, applicant: &ApplicantDetails) {
        self.set(Metric::ApplicantAge, applicant.age as f64);
        self.set(Metric::CreditScore, applicant.credit_score as f64);
        self.set(Metric::MonthlyIncome, applicant.monthly_income);
        self.set(Metric::HouseholdIncome, applicant.monthly_income);
        self.set(Metric::ExistingObligations, applicant.existing_emis);
        self.set(
            Metric::EmploymentStabilityYears,
            applicant.employment_stability_years,
        );

        let self_employed = applicant.employment_type == EmploymentType::SelfEmployed;
        self.flag(Attribute::SelfEmployed, self_employed);
        self.flag(
            Attribute::PublicSectorEmployer,
            !self_employed
                && matches!(
                    applicant.company_type,
                    Some(CompanyType::Government | CompanyType::PublicSector)
                ),
        );
        self.flag(
            Attribute::MultinationalEmployer,
            !self_employed && applicant.company_type == Some(CompanyType::Multinational),
        );
        self.flag(
            Attribute::OwnedResidence,
            applicant.residence_type == ResidenceType::Owned,
        );
        self.flag(Attribute::MetroCity, applicant.city_type == CityType::Metro);
    }
}

impl From<&LoanApplication> for ApplicationFacts {
    fn from(application: &LoanApplication) -> Self {
        match application {
            LoanApplication::Personal(app) => {
                let mut facts = Self::new(
                    LoanCategory::Personal,
                    app.loan_details.preferred_tenure_years,
                );
                facts.record_applicant(&app.applicant_details);
                facts.requested_amount = Some(app.loan_details.requested_loan_amount);
                facts
            }
            LoanApplication::Home(app) => {
                let mut facts =
                    Self::new(LoanCategory::Home, app.loan_details.preferred_tenure_years);
                facts.record_applicant(&app.applicant_details);

                let co_applicant_income = app
                    .co_applicant_details
                    .as_ref()
                    .map(|co_applicant| co_applicant.monthly_income)
                    .unwrap_or(0.0);
                facts.set(Metric::CoApplicantIncome, co_applicant_income);
                facts.set(
                    Metric::HouseholdIncome,
                    app.applicant_details.monthly_income + co_applicant_income,
                );
                facts.set(Metric::CollateralValue, app.property_details.property_value);

                // Location scoring follows the property, not the applicant's address.
                facts.attributes.remove(&Attribute::MetroCity);
                facts.flag(
                    Attribute::MetroCity,
                    app.property_details.city_type == CityType::Metro,
                );
                facts.flag(
                    Attribute::UnderConstruction,
                    app.property_details.property_type == PropertyType::UnderConstruction,
                );
                facts.requested_amount = Some(app.loan_details.requested_loan_amount);
                facts
            }
            LoanApplication::Education(app) => {
                let mut facts = Self::new(
                    LoanCategory::Education,
                    app.loan_details.preferred_tenure_years,
                );
                let student = &app.student_details;
                let co_applicant = &app.co_applicant_details;

                facts.set(Metric::ApplicantAge, student.age as f64);
                facts.set(Metric::AcademicScorePercent, student.academic_score_percent);
                facts.set(Metric::Backlogs, student.current_backlogs as f64);
                facts.set(Metric::CoApplicantIncome, co_applicant.monthly_income);
                facts.set(
                    Metric::CoApplicantCreditScore,
                    co_applicant.credit_score as f64,
                );
                facts.set(
                    Metric::CoApplicantStabilityYears,
                    co_applicant.employment_stability_years,
                );
                facts.set(Metric::CoApplicantObligations, co_applicant.existing_emis);

                facts.flag(
                    Attribute::FullTimeStudy,
                    student.mode_of_study == StudyMode::FullTime,
                );
                facts.flag(
                    Attribute::GovernmentInstitution,
                    student.institution_type == InstitutionType::Govt,
                );
                facts.flag(
                    Attribute::PrivateInstitution,
                    student.institution_type == InstitutionType::Private,
                );
                let abroad = app.loan_details.study_location == StudyLocation::Abroad;
                facts.flag(Attribute::StudyAbroad, abroad);
                facts.flag(Attribute::DomesticStudy, !abroad);
                facts.requested_amount = Some(app.loan_details.requested_loan_amount);
                facts
            }
            LoanApplication::Vehicle(app) => {
                let mut facts = Self::new(
                    LoanCategory::Vehicle,
                    app.loan_details.preferred_tenure_years,
                );
                facts.record_applicant(&app.applicant_details);

                let vehicle = &app.vehicle_details;
                facts.set(Metric::CollateralValue, vehicle.vehicle_cost);
                facts.flag(
                    Attribute::UsedVehicle,
                    vehicle.new_or_used == VehicleCondition::Used,
                );
                facts.flag(
                    Attribute::TwoWheeler,
                    vehicle.vehicle_type == VehicleType::TwoWheeler,
                );
                facts.flag(
                    Attribute::FourWheeler,
                    vehicle.vehicle_type == VehicleType::FourWheeler,
                );
                facts
                    .labels
                    .insert("vehicle_type", vehicle.vehicle_type.label().to_string());

                if let Some(down_payment) = app.loan_details.down_payment {
                    facts.set(Metric::DownPayment, down_payment);
                    facts.requested_amount = Some((vehicle.vehicle_cost - down_payment).max(0.0));
                }
                facts
            }
            LoanApplication::Business(app) => {
                let mut facts = Self::new(
                    LoanCategory::Business,
                    app.loan_details.preferred_tenure_years,
                );
                facts.record_applicant(&app.applicant_details);

                let business = &app.business_details;
                facts.set(Metric::BusinessAgeYears, business.business_age_years as f64);
                facts.set(Metric::AnnualTurnover, business.annual_turnover);
                facts.set(Metric::NetProfit, business.net_profit);
                facts.set(Metric::MonthlyNetProfit, business.net_profit / 12.0);
                let margin = if business.annual_turnover > 0.0 {
                    business.net_profit / business.annual_turnover
                } else {
                    0.0
                };
                facts.set(Metric::ProfitMargin, margin);

                facts.flag(
                    Attribute::PrivateLimited,
                    business.business_type == BusinessType::PrivateLimited,
                );
                facts.flag(
                    Attribute::Partnership,
                    business.business_type == BusinessType::Partnership,
                );
                facts.labels.insert(
                    "business_age_years",
                    business.business_age_years.to_string(),
                );
                facts.requested_amount = Some(app.loan_details.requested_loan_amount);
                facts
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eligibility::domain::{
        BusinessDetails, BusinessLoanApplication, HomeCoApplicant, HomeLoanApplication,
        LoanDetails, PropertyDetails,
    };

    fn applicant() -> ApplicantDetails {
        ApplicantDetails {
            age: 40,
            employment_type: EmploymentType::Salaried,
            monthly_income: 90_000.0,
            monthly_expenses: 25_000.0,
            existing_emis: 4_000.0,
            credit_score: 720,
            employment_stability_years: 6.0,
            residence_type: ResidenceType::Owned,
            city_type: CityType::NonMetro,
            company_type: Some(CompanyType::PublicSector),
        }
    }

    #[test]
    fn home_facts_pool_household_income_and_use_property_location() {
        let application = LoanApplication::Home(HomeLoanApplication {
            applicant_details: applicant(),
            property_details: PropertyDetails {
                property_value: 4_000_000.0,
                property_type: PropertyType::UnderConstruction,
                city_type: CityType::Metro,
            },
            loan_details: LoanDetails {
                requested_loan_amount: 3_000_000.0,
                preferred_tenure_years: 20,
            },
            co_applicant_details: Some(HomeCoApplicant {
                monthly_income: 35_000.0,
            }),
        });

        let facts = ApplicationFacts::from(&application);

        assert_eq!(facts.metric(Metric::HouseholdIncome), 125_000.0);
        assert_eq!(facts.metric(Metric::CollateralValue), 4_000_000.0);
        assert!(facts.has(Attribute::MetroCity));
        assert!(facts.has(Attribute::UnderConstruction));
        assert!(facts.has(Attribute::PublicSectorEmployer));
        assert_eq!(facts.requested_amount, Some(3_000_000.0));
    }

    #[test]
    fn business_facts_guard_against_zero_turnover() {
        let application = LoanApplication::Business(BusinessLoanApplication {
            applicant_details: applicant(),
            business_details: BusinessDetails {
                business_type: BusinessType::Partnership,
                business_age_years: 4,
                annual_turnover: 0.0,
                net_profit: 100_000.0,
            },
            loan_details: LoanDetails {
                requested_loan_amount: 500_000.0,
                preferred_tenure_years: 3,
            },
        });

        let facts = ApplicationFacts::from(&application);

        assert_eq!(facts.metric(Metric::ProfitMargin), 0.0);
        assert!(facts.has(Attribute::Partnership));
        assert_eq!(
            facts.labels.get("business_age_years").map(String::as_str),
            Some("4")
        );
    }

    #[test]
    fn missing_metrics_read_as_zero() {
        let application = LoanApplication::Business(BusinessLoanApplication {
            applicant_details: applicant(),
            business_details: BusinessDetails {
                business_type: BusinessType::Proprietorship,
                business_age_years: 2,
                annual_turnover: 1_000_000.0,
                net_profit: 120_000.0,
            },
            loan_details: LoanDetails {
                requested_loan_amount: 200_000.0,
                preferred_tenure_years: 2,
            },
        });

        let facts = ApplicationFacts::from(&application);
        assert!(!facts.has_metric(Metric::AcademicScorePercent));
        assert_eq!(facts.metric(Metric::AcademicScorePercent), 0.0);
    }
}
