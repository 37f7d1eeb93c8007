use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use serde_json::json;

use super::amortization::EmiRequest;
use super::domain::{
    BusinessLoanApplication, EducationLoanApplication, HomeLoanApplication, LoanApplication,
    PersonalLoanApplication, VehicleLoanApplication,
};
use super::lenders::{LenderCatalog, LenderQuery};
use super::profile::UserProfile;
use super::service::{EligibilityService, EligibilityServiceError};

/// Router builder exposing the per-category checks, lender matching, and tools.
pub fn eligibility_router<C>(service: Arc<EligibilityService<C>>) -> Router
where
    C: LenderCatalog + 'static,
{
    Router::new()
        .route(
            "/check-personal-eligibility",
            post(personal_handler::<C>),
        )
        .route("/check-home-eligibility", post(home_handler::<C>))
        .route(
            "/check-education-eligibility",
            post(education_handler::<C>),
        )
        .route("/check-vehicle-eligibility", post(vehicle_handler::<C>))
        .route(
            "/check-business-eligibility",
            post(business_handler::<C>),
        )
        .route("/check-eligibility", post(lender_match_handler::<C>))
        .route("/api/tools/emi", post(emi_handler::<C>))
        .route(
            "/api/profile/completeness",
            post(profile_completeness_handler::<C>),
        )
        .with_state(service)
}

fn respond<T: Serialize>(result: Result<T, EligibilityServiceError>) -> Response {
    match result {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(error) => {
            let status = match &error {
                EligibilityServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
                EligibilityServiceError::Catalog(_) => StatusCode::SERVICE_UNAVAILABLE,
                EligibilityServiceError::Amortization(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            let payload = json!({
                "error": error.to_string(),
            });
            (status, Json(payload)).into_response()
        }
    }
}

fn evaluate<C>(service: &EligibilityService<C>, application: LoanApplication) -> Response
where
    C: LenderCatalog + 'static,
{
    respond(service.evaluate(application))
}

pub(crate) async fn personal_handler<C>(
    State(service): State<Arc<EligibilityService<C>>>,
    Json(application): Json<PersonalLoanApplication>,
) -> Response
where
    C: LenderCatalog + 'static,
{
    evaluate(&service, application.into())
}

pub(crate) async fn home_handler<C>(
    State(service): State<Arc<EligibilityService<C>>>,
    Json(application): Json<HomeLoanApplication>,
) -> Response
where
    C: LenderCatalog + 'static,
{
    evaluate(&service, application.into())
}

pub(crate) async fn education_handler<C>(
    State(service): State<Arc<EligibilityService<C>>>,
    Json(application): Json<EducationLoanApplication>,
) -> Response
where
    C: LenderCatalog + 'static,
{
    evaluate(&service, application.into())
}

pub(crate) async fn vehicle_handler<C>(
    State(service): State<Arc<EligibilityService<C>>>,
    Json(application): Json<VehicleLoanApplication>,
) -> Response
where
    C: LenderCatalog + 'static,
{
    evaluate(&service, application.into())
}

pub(crate) async fn business_handler<C>(
    State(service): State<Arc<EligibilityService<C>>>,
    Json(application): Json<BusinessLoanApplication>,
) -> Response
where
    C: LenderCatalog + 'static,
{
    evaluate(&service, application.into())
}

pub(crate) async fn lender_match_handler<C>(
    State(service): State<Arc<EligibilityService<C>>>,
    Json(query): Json<LenderQuery>,
) -> Response
where
    C: LenderCatalog + 'static,
{
    respond(service.match_lenders(query))
}

pub(crate) async fn emi_handler<C>(
    State(service): State<Arc<EligibilityService<C>>>,
    Json(request): Json<EmiRequest>,
) -> Response
where
    C: LenderCatalog + 'static,
{
    respond(service.emi_quote(request))
}

pub(crate) async fn profile_completeness_handler<C>(
    State(service): State<Arc<EligibilityService<C>>>,
    Json(profile): Json<UserProfile>,
) -> Response
where
    C: LenderCatalog + 'static,
{
    let completeness = service.profile_completeness(&profile);
    (StatusCode::OK, Json(completeness)).into_response()
}
