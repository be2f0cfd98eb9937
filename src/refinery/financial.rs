// * Financial Extractor
// * Currency detection, monetary amounts, total-value selection, line items, tax and fees.

use regex::Regex;
use std::sync::LazyLock;

use super::regex_extractor::{compile_all, context_window, first_match, parse_amount};
use crate::config::constants::AMOUNT_CONTEXT_RADIUS;
use crate::persistence::schema::{is_valid_amount, AdditionalFee, Currency, FinancialDetails, LineItem};

// * Currency indicators, tested in order; the first one found anywhere in the text wins.
// ! Order is part of the contract: a bare "$" always resolves to USD.
static CURRENCY_INDICATORS: LazyLock<Vec<(Regex, Currency)>> = LazyLock::new(|| {
    [
        (r"\$", Currency::Usd),
        (r"(?i)\bUSD\b|\bUS\$|\bUS Dollar", Currency::Usd),
        (r"(?i)\bCAD\b|\bCA\$|\bCanadian Dollar", Currency::Cad),
        (r"(?i)\bEUR\b|€|\bEuros?\b", Currency::Eur),
        (r"(?i)\bGBP\b|£|\bBritish Pound", Currency::Gbp),
        (r"(?i)\bAUD\b|\bAU\$|\bAustralian Dollar", Currency::Aud),
        (r"(?i)\bJPY\b|¥|\bJapanese Yen", Currency::Jpy),
    ]
    .into_iter()
    .map(|(p, c)| (Regex::new(p).expect("Invalid currency regex"), c))
    .collect()
});

static MONEY_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_all(&[
        // * Currency-code prefixed
        r"(?i)(?:USD|CAD|EUR|GBP|AUD)\s*([\d,]+\.?\d*)",
        // * Symbol prefixed
        r"\$\s*([\d,]+\.?\d*)",
        r"€\s*([\d,]+\.?\d*)",
        r"£\s*([\d,]+\.?\d*)",
        // * Keyword prefixed
        r"(?i)(?:total|amount|sum|fee|cost|price|value|payment)\s*[:\s]*(?:USD|CAD|EUR|GBP|AUD)?\s*\$?\s*([\d,]+\.?\d*)",
        r"(?i)(?:monthly|annual|yearly)\s*(?:fee|cost|payment)\s*[:\s]*\$?\s*([\d,]+\.?\d*)",
        r"(?i)(?:contract|agreement)\s*(?:value|amount|total)\s*[:\s]*\$?\s*([\d,]+\.?\d*)",
        // * Symbol with trailing code
        r"(?i)\$\s*([\d,]+\.?\d*)\s*(?:USD|CAD|EUR|GBP)?",
    ])
});

// * Words that mark an amount's context as describing the contract total
const TOTAL_INDICATORS: [&str; 9] = [
    "total",
    "sum",
    "amount",
    "contract value",
    "total value",
    "grand total",
    "final amount",
    "total cost",
    "total price",
];

// * "- Hosting: $1,200"
static BULLET_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)(?:^|\n)\s*[-•*]\s*([^:]+?):\s*\$?\s*([\d,]+\.?\d*)")
        .expect("Invalid bullet line item regex")
});

// * "1. Onboarding - $2,500"
static NUMBERED_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)(?:^|\n)\s*(\d+\.?\d*)\.\s*([^:]+?)\s*[-:]\s*\$?\s*([\d,]+\.?\d*)")
        .expect("Invalid numbered line item regex")
});

// * "Licenses - Quantity: 10 - Unit Price: $100 - Total: $1,000"
static QUANTIFIED_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)([A-Za-z][^:]{5,30})\s*[-:]\s*(?:Quantity|Qty):\s*(\d+)\s*[-:]\s*(?:Unit Price|Price):\s*\$?\s*([\d,]+\.?\d*)\s*[-:]\s*(?:Total):\s*\$?\s*([\d,]+\.?\d*)",
    )
    .expect("Invalid quantified line item regex")
});

static TAX_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_all(&[
        r"(?i)(?:tax|VAT|GST|HST)\s*[:\s]*(\d+\.?\d*)\s*%",
        r"(?i)(?:tax|VAT|GST|HST)\s*[:\s]*\$?\s*([\d,]+\.?\d*)",
        r"(?i)(?:plus|including|excluding)\s*(?:tax|VAT|GST|HST)",
    ])
});

static FEE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b((?:setup|set-up|late|processing|installation|onboarding|cancellation|termination)\s+fee)s?\s*(?:of|:|is)?\s*\$\s*([\d,]+\.?\d*)",
    )
    .expect("Invalid fee regex")
});

/// An accepted amount and the text surrounding it
#[derive(Debug, Clone, PartialEq)]
pub struct AmountMatch {
    pub amount: f64,
    pub context: String,
}

/// Extracts financial details from normalized text
pub fn extract_financial(text: &str) -> FinancialDetails {
    let amounts = extract_amounts(text);

    FinancialDetails {
        line_items: extract_line_items(text),
        total_value: select_total_value(&amounts),
        currency: detect_currency(text),
        tax_info: first_match(&TAX_PATTERNS, text),
        additional_fees: extract_fees(text),
    }
}

/// First currency indicator (in priority order) present in the text
pub fn detect_currency(text: &str) -> Option<Currency> {
    CURRENCY_INDICATORS
        .iter()
        .find(|(re, _)| re.is_match(text))
        .map(|(_, currency)| *currency)
}

/// Every in-range amount matched by any money pattern, with its context window
pub fn extract_amounts(text: &str) -> Vec<AmountMatch> {
    let mut matches = Vec::new();

    for pattern in MONEY_PATTERNS.iter() {
        for caps in pattern.captures_iter(text) {
            let (Some(whole), Some(numeral)) = (caps.get(0), caps.get(1)) else {
                continue;
            };

            // * Malformed numerals are skipped, not fatal
            let Ok(amount) = parse_amount(numeral.as_str()) else {
                continue;
            };
            if !is_valid_amount(amount) {
                continue;
            }

            let context = context_window(text, whole.start(), whole.end(), AMOUNT_CONTEXT_RADIUS);
            matches.push(AmountMatch {
                amount,
                context: context.to_string(),
            });
        }
    }

    matches
}

/// Picks the authoritative contract value
///
/// The largest amount whose context mentions a total indicator wins; without one,
/// the largest amount overall. Max, not first-seen, is intentional.
pub fn select_total_value(amounts: &[AmountMatch]) -> Option<f64> {
    let qualified = amounts
        .iter()
        .filter(|m| {
            let lower = m.context.to_lowercase();
            TOTAL_INDICATORS.iter().any(|ind| lower.contains(ind))
        })
        .map(|m| m.amount)
        .fold(None, max_of);

    qualified.or_else(|| amounts.iter().map(|m| m.amount).fold(None, max_of))
}

fn max_of(acc: Option<f64>, value: f64) -> Option<f64> {
    Some(acc.map_or(value, |current| current.max(value)))
}

/// Line items from the bulleted, numbered and quantified shapes
pub fn extract_line_items(text: &str) -> Vec<LineItem> {
    let mut items: Vec<LineItem> = Vec::new();

    let mut push = |item: LineItem| {
        if !items.contains(&item) {
            items.push(item);
        }
    };

    for caps in BULLET_ITEM.captures_iter(text) {
        if let Ok(total) = parse_amount(&caps[2]) {
            push(LineItem {
                description: caps[1].trim().to_string(),
                total: Some(total),
                ..Default::default()
            });
        }
    }

    for caps in NUMBERED_ITEM.captures_iter(text) {
        if let Ok(total) = parse_amount(&caps[3]) {
            push(LineItem {
                description: caps[2].trim().to_string(),
                total: Some(total),
                ..Default::default()
            });
        }
    }

    for caps in QUANTIFIED_ITEM.captures_iter(text) {
        let parsed = (
            parse_amount(&caps[2]),
            parse_amount(&caps[3]),
            parse_amount(&caps[4]),
        );
        if let (Ok(quantity), Ok(unit_price), Ok(total)) = parsed {
            push(LineItem {
                description: caps[1].trim().to_string(),
                quantity: Some(quantity),
                unit_price: Some(unit_price),
                total: Some(total),
            });
        }
    }

    items
}

/// Named surcharges (setup fee, late fee, ...) with their amounts
pub fn extract_fees(text: &str) -> Vec<AdditionalFee> {
    let mut fees: Vec<AdditionalFee> = Vec::new();

    for caps in FEE_PATTERN.captures_iter(text) {
        let Ok(amount) = parse_amount(&caps[2]) else {
            continue;
        };
        if !is_valid_amount(amount) {
            continue;
        }
        let fee = AdditionalFee {
            name: caps[1].to_lowercase(),
            amount,
            clause: caps[0].trim().to_string(),
        };
        if !fees.contains(&fee) {
            fees.push(fee);
        }
    }

    fees
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dollar_sign_resolves_to_usd() {
        assert_eq!(detect_currency("Fee of $100, or 80 EUR"), Some(Currency::Usd));
    }

    #[test]
    fn test_currency_priority_order() {
        // * CAD is tested before GBP regardless of position in the text
        assert_eq!(detect_currency("GBP 100 or CAD 120"), Some(Currency::Cad));
        assert_eq!(detect_currency("Paid in Japanese Yen"), Some(Currency::Jpy));
        assert_eq!(detect_currency("no money here"), None);
    }

    #[test]
    fn test_currency_codes_need_word_boundaries() {
        assert_eq!(detect_currency("Annual audit over the next decade in Europe"), None);
        assert_eq!(detect_currency("Invoiced in euros"), Some(Currency::Eur));
        assert_eq!(detect_currency("Fees: 500 AUD"), Some(Currency::Aud));
    }

    #[test]
    fn test_total_prefers_context_qualified_max() {
        let text = "Setup charge $9,000 due now. Later, the Total: $50,000 and an optional total of $60,000.";
        let details = extract_financial(text);
        assert_eq!(details.total_value, Some(60_000.0));
    }

    #[test]
    fn test_total_falls_back_to_global_max() {
        let text = "Hosting $120. Support $80. Licensing $3,000.";
        let details = extract_financial(text);
        assert_eq!(details.total_value, Some(3_000.0));
        assert_eq!(details.currency, Some(Currency::Usd));
    }

    #[test]
    fn test_out_of_range_amounts_rejected() {
        let text = "Fee: $0 and $2,000,000,000 and $15";
        let amounts = extract_amounts(text);
        assert!(amounts.iter().all(|m| m.amount > 0.0 && m.amount < 1_000_000_000.0));
        assert_eq!(extract_financial(text).total_value, Some(15.0));
    }

    #[test]
    fn test_no_amounts_means_no_total() {
        let details = extract_financial("This agreement has no pricing.");
        assert_eq!(details.total_value, None);
        assert!(details.line_items.is_empty());
    }

    #[test]
    fn test_bullet_line_items() {
        let text = "- Hosting: $1,200\n- Support: $300";
        let items = extract_line_items(text);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].description, "Hosting");
        assert_eq!(items[0].total, Some(1200.0));
        assert_eq!(items[1].total, Some(300.0));
    }

    #[test]
    fn test_numbered_line_item() {
        let items = extract_line_items("1. Onboarding - $2,500");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].description, "Onboarding");
        assert_eq!(items[0].total, Some(2500.0));
    }

    #[test]
    fn test_quantified_line_item() {
        let text = "Seat Licenses - Quantity: 10 - Unit Price: $100 - Total: $1,000";
        let items = extract_line_items(text);
        let item = items.iter().find(|i| i.quantity.is_some()).unwrap();
        assert_eq!(item.quantity, Some(10.0));
        assert_eq!(item.unit_price, Some(100.0));
        assert_eq!(item.total, Some(1000.0));
    }

    #[test]
    fn test_malformed_line_item_skipped() {
        let items = extract_line_items("- Misc: ,");
        assert!(items.is_empty());
    }

    #[test]
    fn test_tax_priority() {
        let details = extract_financial("Prices exclude tax: 8.5% and are plus VAT where due.");
        assert_eq!(details.tax_info.as_deref(), Some("tax: 8.5%"));

        let details = extract_financial("All prices are excluding GST.");
        assert_eq!(details.tax_info.as_deref(), Some("excluding GST"));
    }

    #[test]
    fn test_additional_fees() {
        let fees = extract_fees("A one-time setup fee of $500 applies. Late fee: $25 per invoice.");
        assert_eq!(fees.len(), 2);
        assert_eq!(fees[0].name, "setup fee");
        assert_eq!(fees[0].amount, 500.0);
        assert_eq!(fees[1].name, "late fee");
    }
}
