//! End-to-end checks through the public service facade and HTTP router, driving the
//! engine with the JSON bodies clients actually send.

mod common {
    use std::sync::Arc;

    use loan_eligibility::eligibility::{
        eligibility_router, EligibilityEngine, EligibilityService, StaticLenderCatalog,
    };
    use serde_json::Value;

    pub(super) fn service() -> Arc<EligibilityService<StaticLenderCatalog>> {
        Arc::new(EligibilityService::new(
            EligibilityEngine::standard(),
            Arc::new(StaticLenderCatalog::seeded()),
        ))
    }

    pub(super) fn router() -> axum::Router {
        eligibility_router(service())
    }

    pub(super) fn post(uri: &str, body: &Value) -> axum::http::Request<axum::body::Body> {
        axum::http::Request::post(uri)
            .header(axum::http::header::CONTENT_TYPE, "application/json")
            .body(axum::body::Body::from(
                serde_json::to_vec(body).expect("serialize body"),
            ))
            .expect("valid request")
    }

    pub(super) async fn json_body(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("json payload")
    }
}

use axum::http::StatusCode;
use loan_eligibility::eligibility::{
    installment_for, principal_for, EligibilityStatus, LoanApplication, LoanCategory,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use common::*;

fn personal_body() -> Value {
    json!({
        "applicantDetails": {
            "age": 30,
            "employmentType": "Salaried",
            "monthlyIncome": 90000,
            "monthlyExpenses": 25000,
            "existingEMIs": 5000,
            "creditScore": 760,
            "employmentStabilityYears": 4,
            "residenceType": "Rented",
            "cityType": "Metro",
            "companyType": "Private"
        },
        "loanDetails": {
            "requestedLoanAmount": 800000,
            "preferredTenureYears": 4
        }
    })
}

#[tokio::test]
async fn personal_request_is_priced_and_capped() {
    let response = router()
        .oneshot(post("/check-personal-eligibility", &personal_body()))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = json_body(response).await;
    let status = payload
        .get("eligibilityStatus")
        .and_then(Value::as_str)
        .expect("status present");
    assert!(status == "Eligible" || status == "Conditionally Eligible");
    assert_eq!(payload.get("interestRate"), Some(&json!(10.5)));
    assert_eq!(payload.get("recommendedTenureYears"), Some(&json!(4)));
    let approved = payload
        .get("approvedLoanAmount")
        .and_then(Value::as_u64)
        .expect("amount present");
    assert!(approved <= 800_000);
    assert!(approved <= 2_500_000);
}

#[tokio::test]
async fn home_request_never_exceeds_loan_to_value() {
    let body = json!({
        "applicantDetails": {
            "age": 38,
            "employmentType": "Self-Employed",
            "monthlyIncome": 70000,
            "existingEMIs": 10000,
            "creditScore": 720,
            "employmentStabilityYears": 5,
            "residenceType": "Rented"
        },
        "propertyDetails": {
            "propertyValue": 2500000,
            "propertyType": "Under-Construction",
            "cityType": "Non-Metro"
        },
        "loanDetails": {
            "requestedLoanAmount": 3000000,
            "preferredTenureYears": 25
        },
        "coApplicantDetails": { "monthlyIncome": 60000 }
    });

    let response = router()
        .oneshot(post("/check-home-eligibility", &body))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = json_body(response).await;
    let approved = payload
        .get("approvedLoanAmount")
        .and_then(Value::as_u64)
        .expect("amount present");
    assert!(approved <= 2_250_000);
}

#[tokio::test]
async fn underage_vehicle_request_is_rejected_with_reason() {
    let body = json!({
        "applicantDetails": {
            "age": 18,
            "employmentType": "Salaried",
            "monthlyIncome": 40000,
            "existingEMIs": 0,
            "creditScore": 700,
            "employmentStabilityYears": 1,
            "residenceType": "Rented"
        },
        "vehicleDetails": {
            "vehicleType": "Two-Wheeler",
            "vehicleCost": 120000,
            "newOrUsed": "New"
        },
        "loanDetails": { "preferredTenureYears": 3 }
    });

    let response = router()
        .oneshot(post("/check-vehicle-eligibility", &body))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = json_body(response).await;
    assert_eq!(
        payload.get("eligibilityStatus"),
        Some(&json!("Not Eligible"))
    );
    assert_eq!(payload.get("approvedLoanAmount"), Some(&json!(0)));
    assert_eq!(payload.get("riskScore"), Some(&json!(0)));
    assert!(payload
        .get("remarks")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .contains("Age not eligible"));
}

#[tokio::test]
async fn malformed_body_is_rejected_before_the_engine() {
    let body = json!({ "applicantDetails": { "age": 30 } });

    let response = router()
        .oneshot(post("/check-business-eligibility", &body))
        .await
        .expect("route executes");

    assert!(response.status().is_client_error());
}

#[test]
fn facade_evaluates_typed_applications() {
    let service = service();
    let application =
        LoanApplication::from_json(LoanCategory::Personal, &personal_body().to_string())
            .expect("body decodes");

    let decision = service.evaluate(application).expect("evaluation succeeds");

    assert_eq!(decision.eligibility_status, EligibilityStatus::Eligible);
    assert_eq!(
        decision.total_payable_amount,
        decision.estimated_monthly_emi * 12 * decision.recommended_tenure_years as u64
    );
}

#[test]
fn amortization_round_trip_holds_across_terms() {
    for years in [1, 3, 7, 15, 30] {
        for rate in [6.5, 9.0, 13.75] {
            let installment = 12_500.0;
            let principal = principal_for(installment, rate, years).expect("valid term");
            let back = installment_for(principal, rate, years).expect("valid term");
            assert!(
                (back - installment).abs() <= 1.0,
                "{rate}% over {years}y drifted to {back}"
            );
        }
    }
}
