use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

use serde::{Deserialize, Deserializer};
use tracing::debug;

use super::super::domain::LoanCategory;
use super::LenderRule;

/// Read-only source of lender rules, keyed by product.
pub trait LenderCatalog: Send + Sync {
    fn find_rules_by_category(
        &self,
        category: LoanCategory,
    ) -> Result<Vec<LenderRule>, CatalogError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("lender catalog unavailable: {0}")]
    Unavailable(String),
    #[error("lender catalog malformed: {0}")]
    Malformed(#[from] csv::Error),
}

/// In-memory catalog.
#[derive(Debug, Clone, Default)]
pub struct StaticLenderCatalog {
    rules: Vec<LenderRule>,
}

impl StaticLenderCatalog {
    pub fn new(rules: Vec<LenderRule>) -> Self {
        Self { rules }
    }

    /// Standard rules for the HDFC and SBI personal products and the Axis education product.
    pub fn seeded() -> Self {
        Self::new(vec![
            LenderRule {
                bank: "HDFC".to_string(),
                loan_type: LoanCategory::Personal,
                min_age: Some(21),
                max_age: None,
                min_income: Some(25_000.0),
                employment: vec!["salaried".to_string()],
                min_credit_score: Some(700),
                max_foir: Some(0.5),
                interest_rate: 10.75,
                max_tenure_months: 60,
                max_loan_amount: 500_000.0,
            },
            LenderRule {
                bank: "SBI".to_string(),
                loan_type: LoanCategory::Personal,
                min_age: Some(21),
                max_age: None,
                min_income: Some(20_000.0),
                employment: vec!["salaried".to_string(), "self-employed".to_string()],
                min_credit_score: Some(680),
                max_foir: Some(0.55),
                interest_rate: 9.9,
                max_tenure_months: 72,
                max_loan_amount: 600_000.0,
            },
            LenderRule {
                bank: "Axis".to_string(),
                loan_type: LoanCategory::Education,
                min_age: Some(18),
                max_age: None,
                min_income: Some(0.0),
                employment: vec!["student".to_string()],
                min_credit_score: Some(0),
                max_foir: None,
                interest_rate: 8.2,
                max_tenure_months: 120,
                max_loan_amount: 750_000.0,
            },
        ])
    }

    pub fn rules(&self) -> &[LenderRule] {
        &self.rules
    }
}

impl LenderCatalog for StaticLenderCatalog {
    fn find_rules_by_category(
        &self,
        category: LoanCategory,
    ) -> Result<Vec<LenderRule>, CatalogError> {
        Ok(self
            .rules
            .iter()
            .filter(|rule| rule.loan_type == category)
            .cloned()
            .collect())
    }
}

/// Catalog backed by a CSV file. Parsed rules are cached and the file is re-read
/// only when its modification time or length changes, so edits are picked up
/// without a restart.
///
/// Columns: `bank, loanType, minAge, maxAge, minIncome, employment, minCreditScore,
/// maxFOIR, interestRate, maxTenureMonths, maxLoanAmount`. Empty cells are absent
/// constraints; `employment` lists kinds separated by `|`.
#[derive(Debug, Clone)]
pub struct CsvLenderCatalog {
    path: PathBuf,
    cache: Arc<Mutex<Option<CachedRules>>>,
}

#[derive(Debug)]
struct CachedRules {
    stamp: FileStamp,
    rules: Arc<Vec<LenderRule>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileStamp {
    modified: Option<SystemTime>,
    len: u64,
}

impl CsvLenderCatalog {
    /// Opens the catalog, failing early when the file cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CatalogError> {
        let catalog = Self {
            path: path.into(),
            cache: Arc::new(Mutex::new(None)),
        };
        catalog.rules()?;
        Ok(catalog)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn unavailable(&self, error: impl std::fmt::Display) -> CatalogError {
        CatalogError::Unavailable(format!("{}: {error}", self.path.display()))
    }

    fn stamp(&self) -> Result<FileStamp, CatalogError> {
        let metadata = fs::metadata(&self.path).map_err(|error| self.unavailable(error))?;
        Ok(FileStamp {
            modified: metadata.modified().ok(),
            len: metadata.len(),
        })
    }

    /// Current rules, parsing the file again only when its stamp moved.
    fn rules(&self) -> Result<Arc<Vec<LenderRule>>, CatalogError> {
        let stamp = self.stamp()?;
        let mut cache = self
            .cache
            .lock()
            .map_err(|_| self.unavailable("rule cache poisoned"))?;

        if let Some(cached) = cache.as_ref().filter(|cached| cached.stamp == stamp) {
            return Ok(Arc::clone(&cached.rules));
        }

        let file = File::open(&self.path).map_err(|error| self.unavailable(error))?;
        let rules = Arc::new(parse_rules(file)?);
        debug!(path = %self.path.display(), rules = rules.len(), "lender catalog reloaded");
        *cache = Some(CachedRules {
            stamp,
            rules: Arc::clone(&rules),
        });
        Ok(rules)
    }
}

impl LenderCatalog for CsvLenderCatalog {
    fn find_rules_by_category(
        &self,
        category: LoanCategory,
    ) -> Result<Vec<LenderRule>, CatalogError> {
        Ok(self
            .rules()?
            .iter()
            .filter(|rule| rule.loan_type == category)
            .cloned()
            .collect())
    }
}

pub(crate) fn parse_rules<R: Read>(reader: R) -> Result<Vec<LenderRule>, CatalogError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rules = Vec::new();

    for record in csv_reader.deserialize::<LenderRow>() {
        rules.push(record?.into());
    }

    Ok(rules)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LenderRow {
    bank: String,
    loan_type: LoanCategory,
    #[serde(default)]
    min_age: Option<u32>,
    #[serde(default)]
    max_age: Option<u32>,
    #[serde(default)]
    min_income: Option<f64>,
    #[serde(default, deserialize_with = "pipe_separated")]
    employment: Vec<String>,
    #[serde(default)]
    min_credit_score: Option<u32>,
    #[serde(default, rename = "maxFOIR")]
    max_foir: Option<f64>,
    interest_rate: f64,
    max_tenure_months: u32,
    max_loan_amount: f64,
}

impl From<LenderRow> for LenderRule {
    fn from(row: LenderRow) -> Self {
        Self {
            bank: row.bank,
            loan_type: row.loan_type,
            min_age: row.min_age,
            max_age: row.max_age,
            min_income: row.min_income,
            employment: row.employment,
            min_credit_score: row.min_credit_score,
            max_foir: row.max_foir,
            interest_rate: row.interest_rate,
            max_tenure_months: row.max_tenure_months,
            max_loan_amount: row.max_loan_amount,
        }
    }
}

fn pipe_separated<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .split('|')
        .map(str::trim)
        .filter(|kind| !kind.is_empty())
        .map(str::to_string)
        .collect())
}
