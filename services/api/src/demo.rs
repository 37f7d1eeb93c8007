use crate::infra::{build_service, LenderStore};
use chrono::{DateTime, Local, Utc};
use clap::Args;
use loan_eligibility::config::EngineConfig;
use loan_eligibility::error::AppError;
use loan_eligibility::eligibility::{
    ApplicantDetails, BusinessDetails, BusinessLoanApplication, BusinessType, CityType,
    CoApplicantDetails, CompanyType, EducationLoanApplication, EducationLoanDetails,
    EligibilityDecision, EligibilityService, EmiQuote, EmiRequest, EmploymentType,
    HomeCoApplicant, HomeLoanApplication, InstitutionType, LenderQuery, LoanApplication,
    LoanCategory, LoanDetails, PersonalLoanApplication, PropertyDetails, PropertyType,
    ResidenceType, StudentDetails, StudyLocation, StudyMode, VehicleCondition, VehicleDetails,
    VehicleLoanApplication, VehicleLoanDetails, VehicleType,
};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// Loan category: personal, home, education, vehicle, or business
    #[arg(long)]
    pub(crate) category: String,
    /// JSON file holding the application body
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// JSON policy book replacing the standard category tables
    #[arg(long)]
    pub(crate) policy: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct LenderArgs {
    /// JSON file holding the lender query
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// CSV lender catalog (defaults to the seeded rules)
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct EmiArgs {
    /// Amount borrowed
    #[arg(long)]
    pub(crate) principal: f64,
    /// Annual interest rate in percent
    #[arg(long)]
    pub(crate) rate: f64,
    /// Term in whole years
    #[arg(long)]
    pub(crate) years: u32,
    /// Print the month-by-month schedule
    #[arg(long)]
    pub(crate) schedule: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Print each decision as JSON instead of a one-line summary
    #[arg(long)]
    pub(crate) json: bool,
}

/// Decision printed by the `evaluate` command.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EvaluationReport {
    evaluated_at: DateTime<Utc>,
    #[serde(flatten)]
    decision: EligibilityDecision,
}

fn engine_config(policy: Option<PathBuf>, catalog: Option<PathBuf>) -> EngineConfig {
    EngineConfig {
        policy_path: policy,
        lender_catalog: catalog,
    }
}

fn read_input(path: &Path) -> Result<String, AppError> {
    Ok(fs::read_to_string(path)?)
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let category: LoanCategory = args.category.parse()?;
    let raw = read_input(&args.input)?;
    let application = LoanApplication::from_json(category, &raw)?;

    let service = build_service(&engine_config(args.policy, None))?;
    let decision = service.evaluate(application)?;

    let report = EvaluationReport {
        evaluated_at: Utc::now(),
        decision,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

pub(crate) fn run_lenders(args: LenderArgs) -> Result<(), AppError> {
    let raw = read_input(&args.input)?;
    let query: LenderQuery = serde_json::from_str(&raw)?;

    let service = build_service(&engine_config(None, args.catalog))?;
    let matches = service.match_lenders(query)?;
    println!("{}", serde_json::to_string_pretty(&matches)?);
    Ok(())
}

pub(crate) fn run_emi(args: EmiArgs) -> Result<(), AppError> {
    let request = EmiRequest {
        principal: args.principal,
        annual_rate_percent: args.rate,
        tenure_years: args.years,
        include_schedule: args.schedule,
    };
    let service = build_service(&EngineConfig::default())?;
    let quote = service.emi_quote(request)?;
    render_quote(&quote);
    Ok(())
}

fn render_quote(quote: &EmiQuote) {
    println!(
        "EMI for {:.0} at {:.2}% over {} years",
        quote.principal, quote.annual_rate_percent, quote.tenure_years
    );
    println!("- Monthly installment: {:.0}", quote.monthly_installment);
    println!("- Total payable: {:.0}", quote.total_payable);
    println!("- Total interest: {:.0}", quote.total_interest);

    if let Some(schedule) = &quote.schedule {
        println!(
            "\n{:>5} {:>12} {:>12} {:>12} {:>14}",
            "Month", "Payment", "Interest", "Principal", "Balance"
        );
        for entry in schedule {
            println!(
                "{:>5} {:>12.2} {:>12.2} {:>12.2} {:>14.2}",
                entry.month, entry.payment, entry.interest, entry.principal, entry.closing_balance
            );
        }
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let service = build_service(&EngineConfig::default())?;

    println!(
        "Loan eligibility demo ({})",
        Local::now().format("%Y-%m-%d %H:%M")
    );
    for application in sample_applications() {
        let category = application.category();
        match service.evaluate(application) {
            Ok(decision) if args.json => {
                println!("{}", serde_json::to_string_pretty(&decision)?);
            }
            Ok(decision) => render_decision(&decision),
            Err(err) => println!("- {category}: rejected at intake: {err}"),
        }
    }

    render_lender_sample(&service);
    Ok(())
}

fn render_decision(decision: &EligibilityDecision) {
    println!(
        "- {}: {} (risk score {})",
        decision.loan_category, decision.eligibility_status, decision.risk_score
    );
    if decision.eligibility_status.is_approved() {
        println!(
            "  Approved {} at {:.2}% over {} years | EMI {} | total payable {}",
            decision.approved_loan_amount,
            decision.interest_rate,
            decision.recommended_tenure_years,
            decision.estimated_monthly_emi,
            decision.total_payable_amount
        );
    }
    println!("  Remarks: {}", decision.remark_text());
    for component in &decision.score_breakdown {
        println!("    - {}: {}", component.factor, component.points);
    }
}

fn render_lender_sample(service: &EligibilityService<LenderStore>) {
    let query = LenderQuery {
        age: 30,
        income: 50_000.0,
        employment: "salaried".to_string(),
        credit_score: 720,
        loan_type: LoanCategory::Personal,
        existing_emi: 10_000.0,
    };

    println!("\nLender match for a salaried applicant earning 50,000/month");
    match service.match_lenders(query) {
        Ok(matches) => {
            for lender in &matches.eligible_banks {
                println!(
                    "- {}: {:.2}% up to {:.0} over {} months",
                    lender.bank, lender.interest_rate, lender.max_amount, lender.tenure
                );
            }
            println!("  {} lender(s) eligible", matches.eligible_count);
        }
        Err(err) => println!("  Lender catalog unavailable: {err}"),
    }
}

fn sample_applicant() -> ApplicantDetails {
    ApplicantDetails {
        age: 32,
        employment_type: EmploymentType::Salaried,
        monthly_income: 95_000.0,
        monthly_expenses: 30_000.0,
        existing_emis: 8_000.0,
        credit_score: 765,
        employment_stability_years: 5.0,
        residence_type: ResidenceType::Rented,
        city_type: CityType::Metro,
        company_type: Some(CompanyType::Multinational),
    }
}

/// One representative application per category.
pub(crate) fn sample_applications() -> Vec<LoanApplication> {
    vec![
        PersonalLoanApplication {
            applicant_details: sample_applicant(),
            loan_details: LoanDetails {
                requested_loan_amount: 600_000.0,
                preferred_tenure_years: 3,
            },
        }
        .into(),
        HomeLoanApplication {
            applicant_details: ApplicantDetails {
                age: 36,
                monthly_income: 140_000.0,
                ..sample_applicant()
            },
            property_details: PropertyDetails {
                property_value: 6_500_000.0,
                property_type: PropertyType::Ready,
                city_type: CityType::Metro,
            },
            loan_details: LoanDetails {
                requested_loan_amount: 5_000_000.0,
                preferred_tenure_years: 20,
            },
            co_applicant_details: Some(HomeCoApplicant {
                monthly_income: 60_000.0,
            }),
        }
        .into(),
        EducationLoanApplication {
            student_details: StudentDetails {
                age: 21,
                mode_of_study: StudyMode::FullTime,
                institution_type: InstitutionType::Private,
                academic_score_percent: 78.0,
                current_backlogs: 0,
            },
            loan_details: EducationLoanDetails {
                requested_loan_amount: 1_200_000.0,
                study_location: StudyLocation::Abroad,
                preferred_tenure_years: 10,
            },
            co_applicant_details: CoApplicantDetails {
                monthly_income: 70_000.0,
                existing_emis: 10_000.0,
                credit_score: 740,
                employment_stability_years: 9.0,
            },
        }
        .into(),
        VehicleLoanApplication {
            applicant_details: sample_applicant(),
            vehicle_details: VehicleDetails {
                vehicle_type: VehicleType::FourWheeler,
                vehicle_cost: 900_000.0,
                new_or_used: VehicleCondition::New,
            },
            loan_details: VehicleLoanDetails {
                preferred_tenure_years: 5,
                down_payment: Some(200_000.0),
            },
        }
        .into(),
        BusinessLoanApplication {
            applicant_details: ApplicantDetails {
                age: 44,
                employment_type: EmploymentType::SelfEmployed,
                company_type: None,
                ..sample_applicant()
            },
            business_details: BusinessDetails {
                business_type: BusinessType::Partnership,
                business_age_years: 6,
                annual_turnover: 8_000_000.0,
                net_profit: 1_000_000.0,
            },
            loan_details: LoanDetails {
                requested_loan_amount: 2_500_000.0,
                preferred_tenure_years: 5,
            },
        }
        .into(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use loan_eligibility::eligibility::EligibilityStatus;
    use std::env;

    #[test]
    fn samples_cover_every_category_and_pass_intake() {
        let service = build_service(&EngineConfig::default()).expect("service builds");
        let samples = sample_applications();

        let categories: Vec<LoanCategory> =
            samples.iter().map(LoanApplication::category).collect();
        assert_eq!(categories, LoanCategory::ALL.to_vec());

        for application in samples {
            let decision = service.evaluate(application).expect("sample evaluates");
            assert!(decision.risk_score <= 100);
            if decision.eligibility_status != EligibilityStatus::NotEligible {
                assert!(decision.approved_loan_amount > 0);
            }
        }
    }

    #[test]
    fn evaluate_command_reads_application_files() {
        let path = env::temp_dir().join(format!(
            "loan-eligibility-demo-{}.json",
            std::process::id()
        ));
        let body = serde_json::to_string(&sample_personal()).expect("serialize");
        fs::write(&path, body).expect("write input");

        let result = run_evaluate(EvaluateArgs {
            category: "personal".to_string(),
            input: path.clone(),
            policy: None,
        });
        fs::remove_file(path).ok();

        assert!(result.is_ok());
    }

    #[test]
    fn evaluate_command_rejects_unknown_categories() {
        let result = run_evaluate(EvaluateArgs {
            category: "gold".to_string(),
            input: PathBuf::from("unused.json"),
            policy: None,
        });
        assert!(matches!(result, Err(AppError::Input(_))));
    }

    #[test]
    fn emi_command_rejects_zero_years() {
        let result = run_emi(EmiArgs {
            principal: 100_000.0,
            rate: 12.0,
            years: 0,
            schedule: false,
        });
        assert!(result.is_err());
    }

    fn sample_personal() -> PersonalLoanApplication {
        match sample_applications().into_iter().next() {
            Some(LoanApplication::Personal(application)) => application,
            other => panic!("expected personal sample, got {other:?}"),
        }
    }
}
