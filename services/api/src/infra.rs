use loan_eligibility::config::EngineConfig;
use loan_eligibility::error::AppError;
use loan_eligibility::eligibility::{
    CatalogError, CsvLenderCatalog, EligibilityEngine, EligibilityService, LenderCatalog,
    LenderRule, LoanCategory, StaticLenderCatalog,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Lender rules served either from the seeded in-memory set or a CSV export.
pub(crate) enum LenderStore {
    Seeded(StaticLenderCatalog),
    Csv(CsvLenderCatalog),
}

impl LenderStore {
    pub(crate) fn from_path(path: Option<PathBuf>) -> Result<Self, CatalogError> {
        match path {
            Some(path) => Ok(Self::Csv(CsvLenderCatalog::open(path)?)),
            None => Ok(Self::Seeded(StaticLenderCatalog::seeded())),
        }
    }

    pub(crate) fn source(&self) -> String {
        match self {
            LenderStore::Seeded(_) => "seeded".to_string(),
            LenderStore::Csv(catalog) => catalog.path().display().to_string(),
        }
    }
}

impl LenderCatalog for LenderStore {
    fn find_rules_by_category(
        &self,
        category: LoanCategory,
    ) -> Result<Vec<LenderRule>, CatalogError> {
        match self {
            LenderStore::Seeded(catalog) => catalog.find_rules_by_category(category),
            LenderStore::Csv(catalog) => catalog.find_rules_by_category(category),
        }
    }
}

/// Wires the engine and lender store named by the engine configuration.
pub(crate) fn build_service(
    config: &EngineConfig,
) -> Result<EligibilityService<LenderStore>, AppError> {
    let policies = config.policy_book()?;
    let store = LenderStore::from_path(config.lender_catalog.clone())?;
    info!(
        policy = config
            .policy_path
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "standard".to_string()),
        lenders = %store.source(),
        "eligibility engine configured"
    );
    Ok(EligibilityService::new(
        EligibilityEngine::new(policies),
        Arc::new(store),
    ))
}
