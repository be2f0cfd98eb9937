// * Confidence Scorer
// * Per-category completeness estimate in [0, 1], derived only from which fields are filled.

use std::collections::BTreeMap;

use crate::persistence::schema::{Category, ExtractedData};

// * Additive contributions per category
const FINANCIAL_TOTAL: f64 = 0.4;
const FINANCIAL_CURRENCY: f64 = 0.3;
const FINANCIAL_LINE_ITEMS: f64 = 0.3;

const PARTIES_ONE: f64 = 0.5;
const PARTIES_TWO_OR_MORE: f64 = 0.8;
const PARTY_DETAIL_BONUS: f64 = 0.1;

const PAYMENT_TERMS: f64 = 0.6;
const PAYMENT_METHODS: f64 = 0.4;

const SLA_METRICS: f64 = 0.5;
const SLA_SUPPORT: f64 = 0.5;

const CONTACT_EMAILS: f64 = 0.5;
const CONTACT_PHONES: f64 = 0.5;

/// Computes the five category scores; every key is always present
pub fn confidence_scores(data: &ExtractedData) -> BTreeMap<String, f64> {
    Category::ALL
        .iter()
        .map(|category| (category.as_str().to_string(), category_score(data, *category)))
        .collect()
}

/// Score for a single category, clamped to [0, 1]
pub fn category_score(data: &ExtractedData, category: Category) -> f64 {
    let score = match category {
        Category::Financial => financial_score(data),
        Category::Parties => parties_score(data),
        Category::Payment => payment_score(data),
        Category::Sla => sla_score(data),
        Category::Contact => contact_score(data),
    };
    score.clamp(0.0, 1.0)
}

fn financial_score(data: &ExtractedData) -> f64 {
    let Some(financial) = &data.financial_details else {
        return 0.0;
    };
    let mut score = 0.0;
    if financial.total_value.is_some() {
        score += FINANCIAL_TOTAL;
    }
    if financial.currency.is_some() {
        score += FINANCIAL_CURRENCY;
    }
    if !financial.line_items.is_empty() {
        score += FINANCIAL_LINE_ITEMS;
    }
    score
}

fn parties_score(data: &ExtractedData) -> f64 {
    let mut score = match data.parties.len() {
        0 => return 0.0,
        1 => PARTIES_ONE,
        _ => PARTIES_TWO_OR_MORE,
    };

    for party in &data.parties {
        if !party.signatories.is_empty() {
            score = (score + PARTY_DETAIL_BONUS).min(1.0);
        }
        if party.legal_entity.is_some() {
            score = (score + PARTY_DETAIL_BONUS).min(1.0);
        }
    }
    score
}

fn payment_score(data: &ExtractedData) -> f64 {
    let Some(payment) = &data.payment_structure else {
        return 0.0;
    };
    let mut score = 0.0;
    if payment.payment_terms.is_some() {
        score += PAYMENT_TERMS;
    }
    if !payment.payment_methods.is_empty() {
        score += PAYMENT_METHODS;
    }
    score
}

fn sla_score(data: &ExtractedData) -> f64 {
    let Some(sla) = &data.sla else {
        return 0.0;
    };
    let mut score = 0.0;
    if !sla.performance_metrics.is_empty() {
        score += SLA_METRICS;
    }
    if sla.support_terms.is_some() {
        score += SLA_SUPPORT;
    }
    score
}

fn contact_score(data: &ExtractedData) -> f64 {
    let Some(account) = &data.account_info else {
        return 0.0;
    };
    let mut score = 0.0;
    if account.contact_info.has_emails() {
        score += CONTACT_EMAILS;
    }
    if account.contact_info.has_phones() {
        score += CONTACT_PHONES;
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::schema::{
        AccountInfo, ContactInfo, Currency, FinancialDetails, LegalEntity, LineItem, PartyInfo,
    };

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_empty_aggregate_has_all_keys_at_zero() {
        let scores = confidence_scores(&ExtractedData::default());
        assert_eq!(scores.len(), 5);
        for category in Category::ALL {
            assert_eq!(scores[category.as_str()], 0.0);
        }
    }

    #[test]
    fn test_financial_full() {
        let data = ExtractedData {
            financial_details: Some(FinancialDetails {
                total_value: Some(1000.0),
                currency: Some(Currency::Usd),
                line_items: vec![LineItem::default()],
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(approx(category_score(&data, Category::Financial), 1.0));
    }

    #[test]
    fn test_parties_bonus_capped() {
        let party = PartyInfo {
            name: "Acme Inc.".to_string(),
            legal_entity: Some(LegalEntity::Corporation),
            signatories: vec!["Jane Smith".to_string()],
            ..Default::default()
        };
        let mut second = party.clone();
        second.name = "Globex Corp.".to_string();

        let data = ExtractedData {
            parties: vec![party, second],
            ..Default::default()
        };
        assert!(approx(category_score(&data, Category::Parties), 1.0));
    }

    #[test]
    fn test_single_party_with_entity() {
        let data = ExtractedData {
            parties: vec![PartyInfo {
                name: "Globex LLC".to_string(),
                legal_entity: Some(LegalEntity::LimitedLiabilityCompany),
                ..Default::default()
            }],
            ..Default::default()
        };
        assert!(approx(category_score(&data, Category::Parties), 0.6));
    }

    #[test]
    fn test_contact_phones_only() {
        let data = ExtractedData {
            account_info: Some(AccountInfo {
                contact_info: ContactInfo {
                    emails: None,
                    phones: Some(vec!["(555) 123-4567".to_string()]),
                },
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(approx(category_score(&data, Category::Contact), 0.5));
    }
}
