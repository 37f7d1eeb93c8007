//! Loan eligibility: intake normalization, the rules engine, lender matching, and
//! the borrower-facing tools built on the same amortization math.

pub mod amortization;
pub mod domain;
pub mod evaluation;
pub mod intake;
pub mod lenders;
pub mod profile;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use amortization::{
    emi_quote, installment_for, principal_for, repayment_schedule, AmortizationError, EmiQuote,
    EmiRequest, ScheduleEntry,
};
pub use domain::{
    ApplicantDetails, BusinessDetails, BusinessLoanApplication, BusinessType, CityType,
    CoApplicantDetails, CompanyType, EducationLoanApplication, EducationLoanDetails,
    EmploymentType, HomeCoApplicant, HomeLoanApplication, InstitutionType, LoanApplication,
    LoanCategory, LoanDetails, PersonalLoanApplication, PropertyDetails, PropertyType,
    ResidenceType, StudentDetails, StudyLocation, StudyMode, UnknownLoanCategory,
    ValidationError, VehicleCondition, VehicleDetails, VehicleLoanApplication,
    VehicleLoanDetails, VehicleType,
};
pub use evaluation::{
    EligibilityDecision, EligibilityEngine, EligibilityStatus, PolicyBook, PolicyError,
    ScoreComponent,
};
pub use intake::{ApplicationFacts, Attribute, Metric};
pub use lenders::{
    match_lenders, CatalogError, CsvLenderCatalog, LenderCatalog, LenderMatch, LenderMatches,
    LenderQuery, LenderRule, StaticLenderCatalog,
};
pub use profile::{ProfileCompleteness, UserProfile};
pub use router::eligibility_router;
pub use service::{EligibilityService, EligibilityServiceError};
