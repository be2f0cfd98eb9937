// * Payment Structure Extractor
// * Terms, methods, schedules, due dates and banking details.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

use super::regex_extractor::{all_captures, compile_all, first_capture, push_unique};
use crate::persistence::schema::PaymentStructure;

static TERMS_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_all(&[
        r"(?i)(?:Payment Terms?|Terms?):\s*(Net\s+\d+(?:\s+days?)?)",
        r"(?i)(Net\s+\d+(?:\s+days?)?)",
        r"(?i)payment[\s\w]*?due[\s\w]*?\b(\d+\s+days?)",
        r"(?i)(\d+\s+days?\s*from\s*invoice)",
        r"(?i)due\s*(?:in|within)?\s*(\d+\s*days?)",
        r"(?i)payment\s*within\s*(\d+\s*days?)",
    ])
});

static METHOD_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_all(&[
        r"(?i)(?:Payment Methods?|Methods?|Pay by):\s*([^.]+)",
        r"(?i)(?:via|through|by)\s*(credit card|wire transfer|ACH|check|bank transfer|electronic payment|direct deposit|paypal)",
        r"(?i)(credit card|wire transfer|ACH|check|bank transfer|electronic payment|direct deposit|paypal)",
    ])
});

static METHOD_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,;/&]|\sand\s|\sor\s").expect("Invalid separator regex"));

const METHOD_CONNECTORS: [&str; 5] = ["or", "and", "via", "by", "through"];

// * Canonical method labels, tested in order; every listed keyword must be present.
// ! Order is part of the contract: "ach" is tested before "check".
const METHOD_CANONICAL: [(&[&str], &str); 8] = [
    (&["credit", "card"], "Credit Card"),
    (&["wire", "transfer"], "Wire Transfer"),
    (&["ach"], "ACH"),
    (&["check"], "Check"),
    (&["bank", "transfer"], "Bank Transfer"),
    (&["electronic", "payment"], "Electronic Payment"),
    (&["direct", "deposit"], "Direct Deposit"),
    (&["paypal"], "PayPal"),
];

static SCHEDULE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_all(&[
        r"(?i)(monthly|quarterly|annually|yearly|weekly|bi-weekly)\s*(?:payment|billing|invoicing)",
        r"(?i)(?:payment|billing|invoicing)\s*(monthly|quarterly|annually|yearly|weekly|bi-weekly)",
        r"(?i)(monthly|quarterly|annually|yearly|weekly|bi-weekly)\s*basis",
    ])
});

static DUE_DATE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_all(&[
        r"(?i)due\s*(?:on|by)?\s*(\d{1,2}(?:st|nd|rd|th)?\s*of\s*each\s*month)",
        r"(?i)payment\s*due\s*(\w+\s*\d{1,2},?\s*\d{4})",
        r"(\d{1,2}/\d{1,2}/\d{4})",
    ])
});

static BANKING_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_all(&[
        r"(?i)(?:Account|Acct)\s*(?:Number|#):\s*([A-Z0-9\-]+)",
        r"(?i)(?:Routing|ABA)\s*(?:Number|#):\s*([0-9\-]+)",
        r"(?i)Banking Details?:\s*([^.]+)",
    ])
});

/// Extracts the payment structure from normalized text
pub fn extract_payment(text: &str) -> PaymentStructure {
    let mut schedules = Vec::new();
    for schedule in all_captures(&SCHEDULE_PATTERNS, text) {
        push_unique(&mut schedules, &capitalize(schedule));
    }

    let mut due_dates = Vec::new();
    for date in all_captures(&DUE_DATE_PATTERNS, text) {
        push_unique(&mut due_dates, date);
    }

    PaymentStructure {
        payment_terms: extract_terms(text),
        payment_schedules: schedules,
        due_dates,
        payment_methods: extract_methods(text),
        banking_details: first_capture(&BANKING_PATTERNS, text),
    }
}

/// First payment term, rewritten to "Net ..." when it is a bare day count
pub fn extract_terms(text: &str) -> Option<String> {
    let term = first_capture(&TERMS_PATTERNS, text)?;
    let term = term.split_whitespace().collect::<Vec<_>>().join(" ");

    if !term.contains("Net") && term.to_lowercase().contains("day") {
        return Some(format!("Net {}", term));
    }
    Some(term)
}

/// Canonical payment method labels, as a sorted set
pub fn extract_methods(text: &str) -> Vec<String> {
    let mut found = BTreeSet::new();

    for phrase in all_captures(&METHOD_PATTERNS, text) {
        let lower = phrase.to_lowercase();
        for part in METHOD_SEPARATORS.split(&lower) {
            let part = part.trim();
            if part.len() <= 2 || METHOD_CONNECTORS.contains(&part) {
                continue;
            }
            found.insert(canonical_method(part));
        }
    }

    found.into_iter().collect()
}

/// Maps a lower-cased method phrase to its canonical label
pub fn canonical_method(phrase: &str) -> String {
    METHOD_CANONICAL
        .iter()
        .find(|(keywords, _)| keywords.iter().all(|k| phrase.contains(k)))
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| title_case(phrase))
}

fn capitalize(word: &str) -> String {
    let lower = word.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// * Upper-cases the first letter of every alphabetic run
fn title_case(phrase: &str) -> String {
    let mut out = String::with_capacity(phrase.len());
    let mut at_word_start = true;
    for c in phrase.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_net_terms() {
        assert_eq!(extract_terms("Payment Terms: Net 30"), Some("Net 30".to_string()));
        assert_eq!(extract_terms("Invoices are Net 45 days."), Some("Net 45 days".to_string()));
    }

    #[test]
    fn test_day_count_rewritten_as_net() {
        assert_eq!(
            extract_terms("All invoices are due within 15 days of receipt."),
            Some("Net 15 days".to_string())
        );
    }

    #[test]
    fn test_payment_due_keeps_full_day_count() {
        assert_eq!(extract_terms("Payment due in 45 days."), Some("Net 45 days".to_string()));
        assert_eq!(
            extract_terms("Payment is due within 30 days of invoice."),
            Some("Net 30 days".to_string())
        );
        assert_eq!(
            extract_terms("Payments are due 120 days after receipt."),
            Some("Net 120 days".to_string())
        );
    }

    #[test]
    fn test_no_terms() {
        assert_eq!(extract_terms("Payment upon delivery."), None);
    }

    #[test]
    fn test_method_canonicalization() {
        let methods = extract_methods("Payment Methods: credit card, wire transfer or ACH.");
        assert_eq!(
            methods,
            vec!["ACH".to_string(), "Credit Card".to_string(), "Wire Transfer".to_string()]
        );
    }

    #[test]
    fn test_unknown_method_title_cased() {
        assert_eq!(canonical_method("crypto wallet"), "Crypto Wallet");
        assert_eq!(canonical_method("ach debit"), "ACH");
    }

    #[test]
    fn test_schedules_and_due_dates() {
        let text = "Monthly billing applies. Invoices are issued on a monthly basis and are due on 1st of each month. First invoice 01/15/2025.";
        let payment = extract_payment(text);
        assert_eq!(payment.payment_schedules, vec!["Monthly".to_string()]);
        assert!(payment.due_dates.contains(&"1st of each month".to_string()));
        assert!(payment.due_dates.contains(&"01/15/2025".to_string()));
    }

    #[test]
    fn test_banking_details() {
        let payment = extract_payment("Remit to Account Number: 000123-456. Routing Number: 021000021.");
        assert_eq!(payment.banking_details.as_deref(), Some("000123-456"));
    }
}
