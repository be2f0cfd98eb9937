// * Score & Gap Analyzer
// * Converts a finished aggregate into a 0-100 score and an ordered list of gaps.
// * Categories are evaluated in a fixed order: financial, parties, payment, sla, contact.

use serde::{Deserialize, Serialize};

use crate::persistence::schema::{Criticality, ExtractedData, Gap};

// * Point budget (sums to 100)
const POINTS_TOTAL_VALUE: f64 = 15.0;
const POINTS_CURRENCY: f64 = 10.0;
const POINTS_LINE_ITEMS: f64 = 5.0;
const POINTS_TWO_PARTIES: f64 = 25.0;
const POINTS_ONE_PARTY: f64 = 15.0;
const POINTS_PAYMENT_TERMS: f64 = 12.0;
const POINTS_PAYMENT_METHODS: f64 = 8.0;
const POINTS_PERFORMANCE_METRICS: f64 = 10.0;
const POINTS_SUPPORT_TERMS: f64 = 5.0;
const POINTS_EMAILS: f64 = 5.0;
const POINTS_PHONES: f64 = 5.0;

/// Points awarded per category
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub financial: f64,
    pub parties: f64,
    pub payment: f64,
    pub sla: f64,
    pub contact: f64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        self.financial + self.parties + self.payment + self.sla + self.contact
    }
}

/// Full analysis result
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreReport {
    pub score: f64,
    pub breakdown: ScoreBreakdown,
    pub gaps: Vec<Gap>,
}

/// Scores an aggregate, returning `(score, gaps)`
pub fn score(data: &ExtractedData) -> (f64, Vec<Gap>) {
    let report = analyze(data);
    (report.score, report.gaps)
}

/// Scores an aggregate with a per-category breakdown
pub fn analyze(data: &ExtractedData) -> ScoreReport {
    let mut gaps = Vec::new();
    let breakdown = ScoreBreakdown {
        financial: financial_points(data, &mut gaps),
        parties: party_points(data, &mut gaps),
        payment: payment_points(data, &mut gaps),
        sla: sla_points(data, &mut gaps),
        contact: contact_points(data, &mut gaps),
    };

    ScoreReport {
        score: breakdown.total(),
        breakdown,
        gaps,
    }
}

fn financial_points(data: &ExtractedData, gaps: &mut Vec<Gap>) -> f64 {
    let Some(financial) = &data.financial_details else {
        gaps.push(Gap::new(
            "financial_details",
            "Missing financial information including total value and currency",
            Criticality::High,
        ));
        return 0.0;
    };

    let mut points = 0.0;
    if financial.total_value.is_some() {
        points += POINTS_TOTAL_VALUE;
    } else {
        gaps.push(Gap::new("total_value", "Missing total contract value", Criticality::High));
    }

    if financial.currency.is_some() {
        points += POINTS_CURRENCY;
    } else {
        gaps.push(Gap::new("currency", "Currency not specified", Criticality::Medium));
    }

    if !financial.line_items.is_empty() {
        points += POINTS_LINE_ITEMS;
    }
    points
}

fn party_points(data: &ExtractedData, gaps: &mut Vec<Gap>) -> f64 {
    match data.parties.len() {
        0 => {
            gaps.push(Gap::new("parties", "No contract parties identified", Criticality::High));
            0.0
        }
        1 => {
            gaps.push(Gap::new(
                "parties",
                "Only one party identified, expected at least two parties",
                Criticality::Medium,
            ));
            POINTS_ONE_PARTY
        }
        _ => POINTS_TWO_PARTIES,
    }
}

fn payment_points(data: &ExtractedData, gaps: &mut Vec<Gap>) -> f64 {
    let Some(payment) = &data.payment_structure else {
        gaps.push(Gap::new(
            "payment_structure",
            "Missing payment terms and methods",
            Criticality::High,
        ));
        return 0.0;
    };

    let mut points = 0.0;
    if payment.payment_terms.is_some() {
        points += POINTS_PAYMENT_TERMS;
    } else {
        gaps.push(Gap::new(
            "payment_terms",
            "Missing payment terms (e.g., Net 30)",
            Criticality::High,
        ));
    }

    if !payment.payment_methods.is_empty() {
        points += POINTS_PAYMENT_METHODS;
    } else {
        gaps.push(Gap::new(
            "payment_methods",
            "Payment methods not specified",
            Criticality::Medium,
        ));
    }
    points
}

fn sla_points(data: &ExtractedData, gaps: &mut Vec<Gap>) -> f64 {
    let Some(sla) = &data.sla else {
        gaps.push(Gap::new("sla", "No service level agreements found", Criticality::Medium));
        return 0.0;
    };

    let mut points = 0.0;
    if !sla.performance_metrics.is_empty() {
        points += POINTS_PERFORMANCE_METRICS;
    } else {
        gaps.push(Gap::new(
            "performance_metrics",
            "Missing SLA performance metrics (uptime, response time)",
            Criticality::Medium,
        ));
    }

    if sla.support_terms.is_some() {
        points += POINTS_SUPPORT_TERMS;
    } else {
        gaps.push(Gap::new("support_terms", "Support terms not defined", Criticality::Low));
    }
    points
}

fn contact_points(data: &ExtractedData, gaps: &mut Vec<Gap>) -> f64 {
    // * No account section, or a contact map with neither list
    let contact = match &data.account_info {
        Some(account) if !account.contact_info.is_empty() => &account.contact_info,
        _ => {
            gaps.push(Gap::new("contact_info", "Missing contact information", Criticality::Low));
            return 0.0;
        }
    };

    let mut points = 0.0;
    if contact.has_emails() {
        points += POINTS_EMAILS;
    } else {
        gaps.push(Gap::new("contact_emails", "Missing contact email addresses", Criticality::Low));
    }

    if contact.has_phones() {
        points += POINTS_PHONES;
    } else {
        gaps.push(Gap::new("contact_phones", "Missing contact phone numbers", Criticality::Low));
    }
    points
}
