use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::eligibility::domain::{
    ApplicantDetails, BusinessDetails, BusinessLoanApplication, BusinessType, CityType,
    CoApplicantDetails, CompanyType, EducationLoanApplication, EducationLoanDetails,
    EmploymentType, HomeCoApplicant, HomeLoanApplication, InstitutionType, LoanApplication,
    LoanCategory, LoanDetails, PersonalLoanApplication, PropertyDetails, PropertyType,
    ResidenceType, StudentDetails, StudyLocation, StudyMode, VehicleCondition, VehicleDetails,
    VehicleLoanApplication, VehicleLoanDetails, VehicleType,
};
use crate::eligibility::evaluation::EligibilityEngine;
use crate::eligibility::lenders::{
    CatalogError, LenderCatalog, LenderRule, StaticLenderCatalog,
};
use crate::eligibility::{eligibility_router, EligibilityService};

/// Salaried renter: credit 760, income 90k, four years with the employer.
pub(super) fn applicant() -> ApplicantDetails {
    ApplicantDetails {
        age: 30,
        employment_type: EmploymentType::Salaried,
        monthly_income: 90_000.0,
        monthly_expenses: 25_000.0,
        existing_emis: 5_000.0,
        credit_score: 760,
        employment_stability_years: 4.0,
        residence_type: ResidenceType::Rented,
        city_type: CityType::Metro,
        company_type: Some(CompanyType::Private),
    }
}

pub(super) fn personal_application() -> PersonalLoanApplication {
    PersonalLoanApplication {
        applicant_details: applicant(),
        loan_details: LoanDetails {
            requested_loan_amount: 800_000.0,
            preferred_tenure_years: 4,
        },
    }
}

pub(super) fn home_application() -> HomeLoanApplication {
    HomeLoanApplication {
        applicant_details: ApplicantDetails {
            age: 35,
            monthly_income: 150_000.0,
            existing_emis: 0.0,
            credit_score: 780,
            employment_stability_years: 6.0,
            residence_type: ResidenceType::Owned,
            ..applicant()
        },
        property_details: PropertyDetails {
            property_value: 2_500_000.0,
            property_type: PropertyType::Ready,
            city_type: CityType::Metro,
        },
        loan_details: LoanDetails {
            requested_loan_amount: 3_000_000.0,
            preferred_tenure_years: 20,
        },
        co_applicant_details: None,
    }
}

pub(super) fn education_application() -> EducationLoanApplication {
    EducationLoanApplication {
        student_details: StudentDetails {
            age: 22,
            mode_of_study: StudyMode::FullTime,
            institution_type: InstitutionType::Govt,
            academic_score_percent: 85.0,
            current_backlogs: 0,
        },
        loan_details: EducationLoanDetails {
            requested_loan_amount: 900_000.0,
            study_location: StudyLocation::India,
            preferred_tenure_years: 15,
        },
        co_applicant_details: CoApplicantDetails {
            monthly_income: 80_000.0,
            existing_emis: 5_000.0,
            credit_score: 780,
            employment_stability_years: 8.0,
        },
    }
}

/// Used four-wheeler financed against its value alone.
pub(super) fn vehicle_application() -> VehicleLoanApplication {
    VehicleLoanApplication {
        applicant_details: ApplicantDetails {
            monthly_income: 80_000.0,
            employment_stability_years: 5.0,
            residence_type: ResidenceType::Owned,
            ..applicant()
        },
        vehicle_details: VehicleDetails {
            vehicle_type: VehicleType::FourWheeler,
            vehicle_cost: 500_000.0,
            new_or_used: VehicleCondition::Used,
        },
        loan_details: VehicleLoanDetails {
            preferred_tenure_years: 5,
            down_payment: None,
        },
    }
}

pub(super) fn business_application() -> BusinessLoanApplication {
    BusinessLoanApplication {
        applicant_details: ApplicantDetails {
            age: 40,
            employment_type: EmploymentType::SelfEmployed,
            existing_emis: 20_000.0,
            company_type: None,
            ..applicant()
        },
        business_details: BusinessDetails {
            business_type: BusinessType::PrivateLimited,
            business_age_years: 8,
            annual_turnover: 12_000_000.0,
            net_profit: 2_400_000.0,
        },
        loan_details: LoanDetails {
            requested_loan_amount: 2_000_000.0,
            preferred_tenure_years: 5,
        },
    }
}

pub(super) fn every_category() -> Vec<LoanApplication> {
    vec![
        personal_application().into(),
        home_application().into(),
        education_application().into(),
        vehicle_application().into(),
        business_application().into(),
    ]
}

pub(super) fn engine() -> EligibilityEngine {
    EligibilityEngine::standard()
}

pub(super) fn build_service() -> EligibilityService<StaticLenderCatalog> {
    EligibilityService::new(engine(), Arc::new(StaticLenderCatalog::seeded()))
}

pub(super) struct UnavailableCatalog;

impl LenderCatalog for UnavailableCatalog {
    fn find_rules_by_category(
        &self,
        _category: LoanCategory,
    ) -> Result<Vec<LenderRule>, CatalogError> {
        Err(CatalogError::Unavailable("rule store offline".to_string()))
    }
}

pub(super) fn unavailable_service() -> EligibilityService<UnavailableCatalog> {
    EligibilityService::new(engine(), Arc::new(UnavailableCatalog))
}

pub(super) fn router_with_service(
    service: EligibilityService<StaticLenderCatalog>,
) -> axum::Router {
    eligibility_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn json_request(uri: &str, body: &Value) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::post(uri)
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(
            serde_json::to_vec(body).expect("serialize body"),
        ))
        .expect("valid request")
}
