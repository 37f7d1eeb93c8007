use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Retail lending product an application is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanCategory {
    Personal,
    Home,
    Education,
    Vehicle,
    Business,
}

impl LoanCategory {
    pub const ALL: [LoanCategory; 5] = [
        LoanCategory::Personal,
        LoanCategory::Home,
        LoanCategory::Education,
        LoanCategory::Vehicle,
        LoanCategory::Business,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            LoanCategory::Personal => "personal",
            LoanCategory::Home => "home",
            LoanCategory::Education => "education",
            LoanCategory::Vehicle => "vehicle",
            LoanCategory::Business => "business",
        }
    }
}

impl fmt::Display for LoanCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown loan category '{0}' (expected personal, home, education, vehicle, or business)")]
pub struct UnknownLoanCategory(pub String);

impl FromStr for LoanCategory {
    type Err = UnknownLoanCategory;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "personal" => Ok(Self::Personal),
            "home" => Ok(Self::Home),
            "education" => Ok(Self::Education),
            "vehicle" => Ok(Self::Vehicle),
            "business" => Ok(Self::Business),
            other => Err(UnknownLoanCategory(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmploymentType {
    Salaried,
    #[serde(rename = "Self-Employed")]
    SelfEmployed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResidenceType {
    Owned,
    Rented,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CityType {
    Metro,
    #[default]
    #[serde(rename = "Non-Metro")]
    NonMetro,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompanyType {
    Private,
    Government,
    #[serde(rename = "MNC")]
    Multinational,
    #[serde(rename = "PSU")]
    PublicSector,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyType {
    Ready,
    #[serde(rename = "Under-Construction")]
    UnderConstruction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StudyMode {
    #[serde(rename = "Full-time")]
    FullTime,
    #[serde(rename = "Part-time")]
    PartTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstitutionType {
    Govt,
    Private,
    Abroad,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StudyLocation {
    India,
    Abroad,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehicleType {
    #[serde(rename = "Two-Wheeler")]
    TwoWheeler,
    #[serde(rename = "Four-Wheeler")]
    FourWheeler,
}

impl VehicleType {
    pub fn label(&self) -> &'static str {
        match self {
            VehicleType::TwoWheeler => "two-wheeler",
            VehicleType::FourWheeler => "four-wheeler",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehicleCondition {
    New,
    Used,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BusinessType {
    Proprietorship,
    Partnership,
    #[serde(rename = "Private Ltd")]
    PrivateLimited,
}

/// Primary applicant snapshot shared by the salaried and self-employed products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantDetails {
    pub age: u32,
    pub employment_type: EmploymentType,
    pub monthly_income: f64,
    #[serde(default)]
    pub monthly_expenses: f64,
    #[serde(default, rename = "existingEMIs")]
    pub existing_emis: f64,
    pub credit_score: u32,
    #[serde(default)]
    pub employment_stability_years: f64,
    pub residence_type: ResidenceType,
    #[serde(default)]
    pub city_type: CityType,
    #[serde(default)]
    pub company_type: Option<CompanyType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanDetails {
    pub requested_loan_amount: f64,
    pub preferred_tenure_years: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDetails {
    pub property_value: f64,
    pub property_type: PropertyType,
    #[serde(default)]
    pub city_type: CityType,
}

/// Earning co-borrower on a home loan; only income is pooled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeCoApplicant {
    #[serde(default)]
    pub monthly_income: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDetails {
    pub age: u32,
    pub mode_of_study: StudyMode,
    pub institution_type: InstitutionType,
    pub academic_score_percent: f64,
    #[serde(default)]
    pub current_backlogs: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationLoanDetails {
    pub requested_loan_amount: f64,
    pub study_location: StudyLocation,
    pub preferred_tenure_years: u32,
}

/// Parent or guardian who services an education loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoApplicantDetails {
    pub monthly_income: f64,
    #[serde(default, rename = "existingEMIs")]
    pub existing_emis: f64,
    pub credit_score: u32,
    #[serde(default)]
    pub employment_stability_years: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDetails {
    pub vehicle_type: VehicleType,
    pub vehicle_cost: f64,
    pub new_or_used: VehicleCondition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleLoanDetails {
    pub preferred_tenure_years: u32,
    #[serde(default)]
    pub down_payment: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessDetails {
    pub business_type: BusinessType,
    pub business_age_years: u32,
    pub annual_turnover: f64,
    pub net_profit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalLoanApplication {
    pub applicant_details: ApplicantDetails,
    pub loan_details: LoanDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeLoanApplication {
    pub applicant_details: ApplicantDetails,
    pub property_details: PropertyDetails,
    pub loan_details: LoanDetails,
    #[serde(default)]
    pub co_applicant_details: Option<HomeCoApplicant>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationLoanApplication {
    pub student_details: StudentDetails,
    pub loan_details: EducationLoanDetails,
    pub co_applicant_details: CoApplicantDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleLoanApplication {
    pub applicant_details: ApplicantDetails,
    pub vehicle_details: VehicleDetails,
    pub loan_details: VehicleLoanDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessLoanApplication {
    pub applicant_details: ApplicantDetails,
    pub business_details: BusinessDetails,
    pub loan_details: LoanDetails,
}

/// Immutable input to a single eligibility evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum LoanApplication {
    Personal(PersonalLoanApplication),
    Home(HomeLoanApplication),
    Education(EducationLoanApplication),
    Vehicle(VehicleLoanApplication),
    Business(BusinessLoanApplication),
}

impl LoanApplication {
    pub fn category(&self) -> LoanCategory {
        match self {
            LoanApplication::Personal(_) => LoanCategory::Personal,
            LoanApplication::Home(_) => LoanCategory::Home,
            LoanApplication::Education(_) => LoanCategory::Education,
            LoanApplication::Vehicle(_) => LoanCategory::Vehicle,
            LoanApplication::Business(_) => LoanCategory::Business,
        }
    }

    /// Decode a category-shaped JSON body.
    pub fn from_json(category: LoanCategory, raw: &str) -> Result<Self, serde_json::Error> {
        Ok(match category {
            LoanCategory::Personal => Self::Personal(serde_json::from_str(raw)?),
            LoanCategory::Home => Self::Home(serde_json::from_str(raw)?),
            LoanCategory::Education => Self::Education(serde_json::from_str(raw)?),
            LoanCategory::Vehicle => Self::Vehicle(serde_json::from_str(raw)?),
            LoanCategory::Business => Self::Business(serde_json::from_str(raw)?),
        })
    }

    /// Boundary validation; the engine assumes these invariants hold.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            LoanApplication::Personal(app) => {
                validate_applicant(&app.applicant_details)?;
                positive("requestedLoanAmount", app.loan_details.requested_loan_amount)
            }
            LoanApplication::Home(app) => {
                validate_applicant(&app.applicant_details)?;
                finite("propertyValue", app.property_details.property_value)?;
                if let Some(co_applicant) = &app.co_applicant_details {
                    amount("coApplicantDetails.monthlyIncome", co_applicant.monthly_income)?;
                }
                positive("requestedLoanAmount", app.loan_details.requested_loan_amount)
            }
            LoanApplication::Education(app) => {
                percentage(
                    "academicScorePercent",
                    app.student_details.academic_score_percent,
                )?;
                let co_applicant = &app.co_applicant_details;
                amount("coApplicantDetails.monthlyIncome", co_applicant.monthly_income)?;
                amount("coApplicantDetails.existingEMIs", co_applicant.existing_emis)?;
                amount(
                    "coApplicantDetails.employmentStabilityYears",
                    co_applicant.employment_stability_years,
                )?;
                positive("requestedLoanAmount", app.loan_details.requested_loan_amount)
            }
            LoanApplication::Vehicle(app) => {
                validate_applicant(&app.applicant_details)?;
                let vehicle_cost = app.vehicle_details.vehicle_cost;
                finite("vehicleCost", vehicle_cost)?;
                let Some(down_payment) = app.loan_details.down_payment else {
                    return Ok(());
                };
                amount("downPayment", down_payment)?;
                if down_payment >= vehicle_cost {
                    return Err(ValidationError::DownPaymentCoversCost {
                        down_payment,
                        vehicle_cost,
                    });
                }
                Ok(())
            }
            LoanApplication::Business(app) => {
                validate_applicant(&app.applicant_details)?;
                finite("annualTurnover", app.business_details.annual_turnover)?;
                finite("netProfit", app.business_details.net_profit)?;
                positive("requestedLoanAmount", app.loan_details.requested_loan_amount)
            }
        }
    }
}

impl From<PersonalLoanApplication> for LoanApplication {
    fn from(value: PersonalLoanApplication) -> Self {
        Self::Personal(value)
    }
}

impl From<HomeLoanApplication> for LoanApplication {
    fn from(value: HomeLoanApplication) -> Self {
        Self::Home(value)
    }
}

impl From<EducationLoanApplication> for LoanApplication {
    fn from(value: EducationLoanApplication) -> Self {
        Self::Education(value)
    }
}

impl From<VehicleLoanApplication> for LoanApplication {
    fn from(value: VehicleLoanApplication) -> Self {
        Self::Vehicle(value)
    }
}

impl From<BusinessLoanApplication> for LoanApplication {
    fn from(value: BusinessLoanApplication) -> Self {
        Self::Business(value)
    }
}

/// Malformed input rejected before the engine runs.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must be a finite number (found {value})")]
    NotFinite { field: &'static str, value: f64 },
    #[error("{field} must not be negative (found {value})")]
    Negative { field: &'static str, value: f64 },
    #[error("{field} must be between 0 and 100 (found {value})")]
    PercentOutOfRange { field: &'static str, value: f64 },
    #[error("{field} must be greater than zero (found {value})")]
    NotPositive { field: &'static str, value: f64 },
    #[error("{field} must be at least {minimum}")]
    BelowMinimum { field: &'static str, minimum: u32 },
    #[error("{field} must be at most {maximum}")]
    AboveMaximum { field: &'static str, maximum: u32 },
    #[error("downPayment {down_payment} leaves nothing to finance on a vehicle costing {vehicle_cost}")]
    DownPaymentCoversCost { down_payment: f64, vehicle_cost: f64 },
}

fn validate_applicant(applicant: &ApplicantDetails) -> Result<(), ValidationError> {
    amount("monthlyIncome", applicant.monthly_income)?;
    amount("monthlyExpenses", applicant.monthly_expenses)?;
    amount("existingEMIs", applicant.existing_emis)?;
    amount("employmentStabilityYears", applicant.employment_stability_years)
}

pub(crate) fn finite(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::NotFinite { field, value })
    }
}

pub(crate) fn amount(field: &'static str, value: f64) -> Result<(), ValidationError> {
    finite(field, value)?;
    if value < 0.0 {
        return Err(ValidationError::Negative { field, value });
    }
    Ok(())
}

fn positive(field: &'static str, value: f64) -> Result<(), ValidationError> {
    amount(field, value)?;
    if value == 0.0 {
        return Err(ValidationError::NotPositive { field, value });
    }
    Ok(())
}

fn percentage(field: &'static str, value: f64) -> Result<(), ValidationError> {
    finite(field, value)?;
    if !(0.0..=100.0).contains(&value) {
        return Err(ValidationError::PercentOutOfRange { field, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parses_case_insensitively() {
        assert_eq!("Home".parse::<LoanCategory>(), Ok(LoanCategory::Home));
        assert_eq!(" vehicle ".parse::<LoanCategory>(), Ok(LoanCategory::Vehicle));
        assert!("mortgage".parse::<LoanCategory>().is_err());
    }

    #[test]
    fn decodes_camel_case_request_body() {
        let raw = r#"{
            "applicantDetails": {
                "age": 30,
                "employmentType": "Self-Employed",
                "monthlyIncome": 90000,
                "monthlyExpenses": 20000,
                "existingEMIs": 5000,
                "creditScore": 760,
                "employmentStabilityYears": 4,
                "residenceType": "Rented",
                "cityType": "Metro",
                "companyType": "MNC",
                "maritalStatus": "Single"
            },
            "loanDetails": { "requestedLoanAmount": 800000, "preferredTenureYears": 4, "purpose": "travel" }
        }"#;

        let application =
            LoanApplication::from_json(LoanCategory::Personal, raw).expect("payload decodes");
        let LoanApplication::Personal(personal) = application else {
            panic!("expected personal application");
        };
        assert_eq!(
            personal.applicant_details.employment_type,
            EmploymentType::SelfEmployed
        );
        assert_eq!(personal.applicant_details.existing_emis, 5000.0);
        assert_eq!(
            personal.applicant_details.company_type,
            Some(CompanyType::Multinational)
        );
    }

    #[test]
    fn validation_rejects_negative_and_non_finite_amounts() {
        let application = LoanApplication::Vehicle(VehicleLoanApplication {
            applicant_details: ApplicantDetails {
                age: 30,
                employment_type: EmploymentType::Salaried,
                monthly_income: 50_000.0,
                monthly_expenses: 0.0,
                existing_emis: 0.0,
                credit_score: 700,
                employment_stability_years: 2.0,
                residence_type: ResidenceType::Owned,
                city_type: CityType::Metro,
                company_type: None,
            },
            vehicle_details: VehicleDetails {
                vehicle_type: VehicleType::FourWheeler,
                vehicle_cost: 800_000.0,
                new_or_used: VehicleCondition::New,
            },
            loan_details: VehicleLoanDetails {
                preferred_tenure_years: 5,
                down_payment: Some(-1.0),
            },
        });

        assert_eq!(
            application.validate(),
            Err(ValidationError::Negative {
                field: "downPayment",
                value: -1.0
            })
        );

        let mut with_nan = application.clone();
        if let LoanApplication::Vehicle(app) = &mut with_nan {
            app.loan_details.down_payment = None;
            app.applicant_details.monthly_income = f64::NAN;
        }
        assert!(matches!(
            with_nan.validate(),
            Err(ValidationError::NotFinite {
                field: "monthlyIncome",
                ..
            })
        ));
    }

    #[test]
    fn validation_rejects_down_payment_covering_the_vehicle() {
        let mut application = VehicleLoanApplication {
            applicant_details: ApplicantDetails {
                age: 34,
                employment_type: EmploymentType::Salaried,
                monthly_income: 80_000.0,
                monthly_expenses: 0.0,
                existing_emis: 0.0,
                credit_score: 760,
                employment_stability_years: 5.0,
                residence_type: ResidenceType::Owned,
                city_type: CityType::Metro,
                company_type: None,
            },
            vehicle_details: VehicleDetails {
                vehicle_type: VehicleType::FourWheeler,
                vehicle_cost: 500_000.0,
                new_or_used: VehicleCondition::Used,
            },
            loan_details: VehicleLoanDetails {
                preferred_tenure_years: 5,
                down_payment: Some(550_000.0),
            },
        };

        assert_eq!(
            LoanApplication::Vehicle(application.clone()).validate(),
            Err(ValidationError::DownPaymentCoversCost {
                down_payment: 550_000.0,
                vehicle_cost: 500_000.0,
            })
        );

        application.loan_details.down_payment = Some(500_000.0);
        assert!(matches!(
            LoanApplication::Vehicle(application.clone()).validate(),
            Err(ValidationError::DownPaymentCoversCost { .. })
        ));

        application.loan_details.down_payment = Some(150_000.0);
        assert_eq!(LoanApplication::Vehicle(application).validate(), Ok(()));
    }

    #[test]
    fn validation_rejects_zero_requested_amount() {
        let raw = r#"{
            "applicantDetails": {
                "age": 30,
                "employmentType": "Salaried",
                "monthlyIncome": 90000,
                "creditScore": 760,
                "employmentStabilityYears": 4,
                "residenceType": "Rented"
            },
            "loanDetails": { "requestedLoanAmount": 0, "preferredTenureYears": 4 }
        }"#;

        let application =
            LoanApplication::from_json(LoanCategory::Personal, raw).expect("payload decodes");
        assert_eq!(
            application.validate(),
            Err(ValidationError::NotPositive {
                field: "requestedLoanAmount",
                value: 0.0,
            })
        );
    }

    #[test]
    fn fractional_year_counts_do_not_decode() {
        let raw = r#"{
            "applicantDetails": {
                "age": 40,
                "employmentType": "Self-Employed",
                "monthlyIncome": 90000,
                "creditScore": 760,
                "residenceType": "Owned"
            },
            "businessDetails": {
                "businessType": "Partnership",
                "businessAgeYears": 5.5,
                "annualTurnover": 8000000,
                "netProfit": 1000000
            },
            "loanDetails": { "requestedLoanAmount": 2000000, "preferredTenureYears": 5 }
        }"#;

        assert!(LoanApplication::from_json(LoanCategory::Business, raw).is_err());
        let whole = raw.replace("5.5", "5");
        assert!(LoanApplication::from_json(LoanCategory::Business, &whole).is_ok());
    }
}
