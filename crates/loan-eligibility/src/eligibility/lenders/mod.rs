//! Lender matching against an externally maintained rule catalog.

mod catalog;

pub use catalog::{CatalogError, CsvLenderCatalog, LenderCatalog, StaticLenderCatalog};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{amount, LoanCategory, ValidationError};

/// One lender's published criteria for a product. Absent constraints always pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LenderRule {
    pub bank: String,
    pub loan_type: LoanCategory,
    #[serde(default)]
    pub min_age: Option<u32>,
    #[serde(default)]
    pub max_age: Option<u32>,
    #[serde(default)]
    pub min_income: Option<f64>,
    /// Accepted employment kinds (`salaried`, `self-employed`, `student`); empty accepts any.
    #[serde(default)]
    pub employment: Vec<String>,
    #[serde(default)]
    pub min_credit_score: Option<u32>,
    #[serde(default, rename = "maxFOIR")]
    pub max_foir: Option<f64>,
    pub interest_rate: f64,
    pub max_tenure_months: u32,
    pub max_loan_amount: f64,
}

impl LenderRule {
    pub fn admits(&self, query: &LenderQuery) -> bool {
        let foir = query.foir();

        self.min_age.map_or(true, |min| query.age >= min)
            && self.max_age.map_or(true, |max| query.age <= max)
            && self.min_income.map_or(true, |min| query.income >= min)
            && (self.employment.is_empty()
                || self
                    .employment
                    .iter()
                    .any(|kind| kind.trim().eq_ignore_ascii_case(query.employment.trim())))
            && self
                .min_credit_score
                .map_or(true, |min| query.credit_score >= min)
            && self.max_foir.map_or(true, |max| foir <= max)
    }
}

/// Applicant summary submitted to the lender matcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LenderQuery {
    pub age: u32,
    pub income: f64,
    pub employment: String,
    pub credit_score: u32,
    pub loan_type: LoanCategory,
    #[serde(default, rename = "existingEMI")]
    pub existing_emi: f64,
}

impl LenderQuery {
    /// Fixed obligations to income. Zero income carries no ratio unless EMIs are owed.
    pub fn foir(&self) -> f64 {
        if self.income > 0.0 {
            self.existing_emi / self.income
        } else if self.existing_emi > 0.0 {
            f64::INFINITY
        } else {
            0.0
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        amount("income", self.income)?;
        amount("existingEMI", self.existing_emi)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LenderMatch {
    pub bank: String,
    pub loan_type: LoanCategory,
    pub interest_rate: f64,
    pub max_amount: f64,
    /// Maximum tenure in months.
    pub tenure: u32,
}

impl From<&LenderRule> for LenderMatch {
    fn from(rule: &LenderRule) -> Self {
        Self {
            bank: rule.bank.clone(),
            loan_type: rule.loan_type,
            interest_rate: rule.interest_rate,
            max_amount: rule.max_loan_amount,
            tenure: rule.max_tenure_months,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LenderMatches {
    pub eligible_banks: Vec<LenderMatch>,
    pub eligible_count: usize,
}

/// Filters `rules` down to those admitting the query, preserving catalog order.
pub fn match_lenders(query: &LenderQuery, rules: &[LenderRule]) -> LenderMatches {
    let eligible_banks: Vec<LenderMatch> = rules
        .iter()
        .filter(|rule| rule.loan_type == query.loan_type && rule.admits(query))
        .map(LenderMatch::from)
        .collect();

    debug!(
        loan_type = %query.loan_type,
        considered = rules.len(),
        matched = eligible_banks.len(),
        "lender rules filtered"
    );

    LenderMatches {
        eligible_count: eligible_banks.len(),
        eligible_banks,
    }
}
