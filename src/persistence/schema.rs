// * Contract data model
// * The aggregate produced by the refinery and consumed by scoring and the job store.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::config::constants::{MAX_AMOUNT, MAX_PARTIES};

/// Scoring category keys, in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Financial,
    Parties,
    Payment,
    Sla,
    Contact,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Financial,
        Category::Parties,
        Category::Payment,
        Category::Sla,
        Category::Contact,
    ];

    /// Returns the key used in `confidence_scores`
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Financial => "financial",
            Category::Parties => "parties",
            Category::Payment => "payment",
            Category::Sla => "sla",
            Category::Contact => "contact",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Legal entity type derived from a party's corporate suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LegalEntity {
    #[serde(rename = "Corporation")]
    Corporation,
    #[serde(rename = "Limited Liability Company")]
    LimitedLiabilityCompany,
    #[serde(rename = "Limited Company")]
    LimitedCompany,
}

impl LegalEntity {
    pub fn as_str(&self) -> &'static str {
        match self {
            LegalEntity::Corporation => "Corporation",
            LegalEntity::LimitedLiabilityCompany => "Limited Liability Company",
            LegalEntity::LimitedCompany => "Limited Company",
        }
    }
}

/// ISO currency codes the financial extractor recognises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usd,
    Cad,
    Eur,
    Gbp,
    Aud,
    Jpy,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Cad => "CAD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Aud => "AUD",
            Currency::Jpy => "JPY",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PartyInfo {
    pub name: String,
    pub legal_entity: Option<LegalEntity>,
    pub registration_details: Option<String>,
    pub signatories: Vec<String>,
    pub roles: Vec<String>,
}

impl PartyInfo {
    /// Creates a party carrying only a name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub quantity: Option<f64>,
    pub unit_price: Option<f64>,
    pub total: Option<f64>,
}

/// A named surcharge such as a setup or late fee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditionalFee {
    pub name: String,
    pub amount: f64,
    pub clause: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FinancialDetails {
    pub line_items: Vec<LineItem>,
    pub total_value: Option<f64>,
    pub currency: Option<Currency>,
    pub tax_info: Option<String>,
    pub additional_fees: Vec<AdditionalFee>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PaymentStructure {
    pub payment_terms: Option<String>,
    pub payment_schedules: Vec<String>,
    pub due_dates: Vec<String>,
    pub payment_methods: Vec<String>,
    pub banking_details: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RevenueClassification {
    pub recurring_payments: bool,
    pub one_time_payments: bool,
    pub subscription_model: Option<String>,
    pub billing_cycle: Option<String>,
    pub renewal_terms: Option<String>,
    pub auto_renewal: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ServiceLevelAgreement {
    pub performance_metrics: Vec<String>,
    pub benchmarks: Vec<String>,
    pub penalty_clauses: Vec<String>,
    pub remedies: Vec<String>,
    pub support_terms: Option<String>,
    pub maintenance_terms: Option<String>,
}

/// Contact lists; a key is only present when its list is non-empty
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emails: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phones: Option<Vec<String>>,
}

impl ContactInfo {
    pub fn is_empty(&self) -> bool {
        self.emails.is_none() && self.phones.is_none()
    }

    pub fn has_emails(&self) -> bool {
        self.emails.as_ref().is_some_and(|e| !e.is_empty())
    }

    pub fn has_phones(&self) -> bool {
        self.phones.as_ref().is_some_and(|p| !p.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AccountInfo {
    pub billing_details: Option<String>,
    pub account_numbers: Vec<String>,
    pub contact_info: ContactInfo,
}

/// Aggregate root for one document's extraction
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExtractedData {
    pub parties: Vec<PartyInfo>,
    pub account_info: Option<AccountInfo>,
    pub financial_details: Option<FinancialDetails>,
    pub payment_structure: Option<PaymentStructure>,
    pub revenue_classification: Option<RevenueClassification>,
    pub sla: Option<ServiceLevelAgreement>,
    pub confidence_scores: BTreeMap<String, f64>,
}

impl ExtractedData {
    /// Returns the confidence for a category (0.0 when unset)
    pub fn confidence(&self, category: Category) -> f64 {
        self.confidence_scores
            .get(category.as_str())
            .copied()
            .unwrap_or(0.0)
    }

    /// True if a party with exactly this name is present
    pub fn has_party(&self, name: &str) -> bool {
        self.parties.iter().any(|p| p.name == name)
    }

    /// Appends a party unless the name exists or the party list is full
    pub fn push_party(&mut self, party: PartyInfo) -> bool {
        if self.parties.len() >= MAX_PARTIES || self.has_party(&party.name) {
            return false;
        }
        self.parties.push(party);
        true
    }

    /// Current authoritative contract value
    pub fn total_value(&self) -> Option<f64> {
        self.financial_details.as_ref().and_then(|f| f.total_value)
    }

    /// Converts to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Converts to pretty JSON string
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Returns true when an amount is inside the accepted open interval
pub fn is_valid_amount(amount: f64) -> bool {
    amount > 0.0 && amount < MAX_AMOUNT
}

/// Severity of a missing field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Criticality {
    High,
    Medium,
    Low,
}

impl fmt::Display for Criticality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Criticality::High => write!(f, "high"),
            Criticality::Medium => write!(f, "medium"),
            Criticality::Low => write!(f, "low"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gap {
    pub field: String,
    pub description: String,
    pub criticality: Criticality,
}

impl Gap {
    pub fn new(field: &str, description: &str, criticality: Criticality) -> Self {
        Self {
            field: field.to_string(),
            description: description.to_string(),
            criticality,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_party_rejects_duplicates() {
        let mut data = ExtractedData::default();
        assert!(data.push_party(PartyInfo::named("Acme Inc.")));
        assert!(!data.push_party(PartyInfo::named("Acme Inc.")));
        assert_eq!(data.parties.len(), 1);
    }

    #[test]
    fn test_push_party_respects_cap() {
        let mut data = ExtractedData::default();
        for i in 0..15 {
            data.push_party(PartyInfo::named(format!("Vendor {} LLC", i)));
        }
        assert_eq!(data.parties.len(), MAX_PARTIES);
    }

    #[test]
    fn test_enum_serialization() {
        assert_eq!(serde_json::to_string(&Currency::Usd).unwrap(), "\"USD\"");
        assert_eq!(
            serde_json::to_string(&LegalEntity::LimitedLiabilityCompany).unwrap(),
            "\"Limited Liability Company\""
        );
        assert_eq!(serde_json::to_string(&Criticality::High).unwrap(), "\"high\"");
    }

    #[test]
    fn test_contact_info_skips_empty_keys() {
        let info = ContactInfo {
            emails: Some(vec!["a@b.com".to_string()]),
            phones: None,
        };
        let json = serde_json::to_string(&info).unwrap();
        assert!(json.contains("emails"));
        assert!(!json.contains("phones"));
    }

    #[test]
    fn test_amount_bounds() {
        assert!(is_valid_amount(0.01));
        assert!(!is_valid_amount(0.0));
        assert!(!is_valid_amount(1_000_000_000.0));
    }
}
