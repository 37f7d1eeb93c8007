use std::sync::Arc;

use tracing::{info, warn};

use super::amortization::{AmortizationError, EmiQuote, EmiRequest};
use super::domain::{LoanApplication, ValidationError};
use super::evaluation::{EligibilityDecision, EligibilityEngine};
use super::lenders::{match_lenders, CatalogError, LenderCatalog, LenderMatches, LenderQuery};
use super::profile::{ProfileCompleteness, UserProfile};

/// Facade composing boundary validation, the eligibility engine, and the lender catalog.
pub struct EligibilityService<C> {
    engine: Arc<EligibilityEngine>,
    catalog: Arc<C>,
}

impl<C> EligibilityService<C>
where
    C: LenderCatalog + 'static,
{
    pub fn new(engine: EligibilityEngine, catalog: Arc<C>) -> Self {
        Self {
            engine: Arc::new(engine),
            catalog,
        }
    }

    pub fn engine(&self) -> &EligibilityEngine {
        &self.engine
    }

    /// Validate and evaluate a single application.
    pub fn evaluate(
        &self,
        application: LoanApplication,
    ) -> Result<EligibilityDecision, EligibilityServiceError> {
        if let Err(error) = application.validate() {
            warn!(category = %application.category(), %error, "application rejected at intake");
            return Err(error.into());
        }
        Ok(self.engine.evaluate(&application)?)
    }

    /// Lenders in the catalog whose published criteria admit the query.
    pub fn match_lenders(
        &self,
        query: LenderQuery,
    ) -> Result<LenderMatches, EligibilityServiceError> {
        query.validate()?;
        let rules = self.catalog.find_rules_by_category(query.loan_type)?;
        let matches = match_lenders(&query, &rules);
        info!(
            loan_type = %query.loan_type,
            eligible = matches.eligible_count,
            "lender match completed"
        );
        Ok(matches)
    }

    pub fn emi_quote(&self, request: EmiRequest) -> Result<EmiQuote, EligibilityServiceError> {
        request.validate()?;
        Ok(request.quote()?)
    }

    pub fn profile_completeness(&self, profile: &UserProfile) -> ProfileCompleteness {
        profile.completeness()
    }
}

/// Error raised by the eligibility service.
#[derive(Debug, thiserror::Error)]
pub enum EligibilityServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Amortization(#[from] AmortizationError),
}
