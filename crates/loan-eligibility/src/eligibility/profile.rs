use serde::{Deserialize, Serialize};

/// Borrower profile as captured by the onboarding form. Every field is optional
/// until the borrower fills it in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub employment_status: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub monthly_income: Option<f64>,
    #[serde(default)]
    pub income_source: Option<String>,
}

fn text_present(value: &Option<String>) -> bool {
    value
        .as_deref()
        .map(|text| !text.trim().is_empty())
        .unwrap_or(false)
}

impl UserProfile {
    /// Required fields still missing, in form order. Blank strings count as
    /// missing; a numeric zero counts as present.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let checks = [
            ("fullName", text_present(&self.full_name)),
            ("age", self.age.is_some()),
            ("phone", text_present(&self.phone)),
            ("address", text_present(&self.address)),
            ("employmentStatus", text_present(&self.employment_status)),
            ("email", text_present(&self.email)),
            ("monthlyIncome", self.monthly_income.is_some()),
            ("incomeSource", text_present(&self.income_source)),
        ];

        checks
            .into_iter()
            .filter(|(_, present)| !present)
            .map(|(field, _)| field)
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    pub fn completeness(&self) -> ProfileCompleteness {
        let missing_fields: Vec<String> = self
            .missing_fields()
            .into_iter()
            .map(str::to_string)
            .collect();
        ProfileCompleteness {
            is_complete: missing_fields.is_empty(),
            missing_fields,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileCompleteness {
    pub is_complete: bool,
    pub missing_fields: Vec<String>,
}
