// * Revenue Classification Extractor

use regex::Regex;
use std::sync::LazyLock;

use super::regex_extractor::{any_match, compile_all, first_capture};
use crate::persistence::schema::RevenueClassification;

static RECURRING_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_all(&[
        r"(?i)recurring|subscription|monthly|quarterly|annually|yearly",
        r"(?i)auto.?renew|automatic.?renewal",
    ])
});

static AUTO_RENEWAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)auto.?renew|automatic.?renewal|automatically\s+renew|renews?\s+automatically")
        .expect("Invalid auto-renewal regex")
});

static ONE_TIME_PATTERNS: LazyLock<Vec<Regex>> =
    LazyLock::new(|| compile_all(&[r"(?i)one.?time|single payment|lump sum"]));

static BILLING_CYCLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(monthly|quarterly|annually|yearly|weekly)").expect("Invalid billing cycle regex")
});

static SUBSCRIPTION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_all(&[
        r"(?i)\b((?:annual|monthly|quarterly|yearly|enterprise|basic|premium|standard|professional)\s+subscription(?:\s+plan)?)",
        r"(?i)\b(subscription)\b",
    ])
});

static RENEWAL_TERMS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_all(&[
        r"(?i)Renewal(?: Terms?)?:\s*([^.]+)",
        r"(?i)\b((?:shall|will)\s+(?:automatically\s+)?renew[^.]{0,120})",
        r"(?i)\b((?:automatically\s+)?renews?\s+(?:automatically\s+)?for[^.]{0,120})",
    ])
});

/// Classifies the revenue model of a contract
pub fn extract_revenue(text: &str) -> RevenueClassification {
    let subscription_model = first_capture(&SUBSCRIPTION_PATTERNS, text).map(|s| {
        if s.eq_ignore_ascii_case("subscription") {
            "Subscription".to_string()
        } else {
            s
        }
    });

    RevenueClassification {
        recurring_payments: any_match(&RECURRING_PATTERNS, text),
        one_time_payments: any_match(&ONE_TIME_PATTERNS, text),
        subscription_model,
        billing_cycle: BILLING_CYCLE
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string()),
        renewal_terms: first_capture(&RENEWAL_TERMS, text),
        auto_renewal: AUTO_RENEWAL.is_match(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recurring_subscription() {
        let revenue = extract_revenue(
            "Customer purchases a Premium subscription billed quarterly. This Agreement will automatically renew for successive one-year terms.",
        );
        assert!(revenue.recurring_payments);
        assert!(revenue.auto_renewal);
        assert_eq!(revenue.billing_cycle.as_deref(), Some("quarterly"));
        assert_eq!(revenue.subscription_model.as_deref(), Some("Premium subscription"));
        assert_eq!(
            revenue.renewal_terms.as_deref(),
            Some("will automatically renew for successive one-year terms")
        );
    }

    #[test]
    fn test_one_time_payment() {
        let revenue = extract_revenue("The fee is payable as a lump sum upon signing.");
        assert!(revenue.one_time_payments);
        assert!(!revenue.recurring_payments);
        assert!(!revenue.auto_renewal);
        assert_eq!(revenue.billing_cycle, None);
        assert_eq!(revenue.subscription_model, None);
    }

    #[test]
    fn test_billing_cycle_first_match() {
        let revenue = extract_revenue("Billed Annually, reviewed monthly.");
        assert_eq!(revenue.billing_cycle.as_deref(), Some("Annually"));
    }

    #[test]
    fn test_bare_subscription() {
        let revenue = extract_revenue("Access is provided on a subscription to the platform.");
        assert_eq!(revenue.subscription_model.as_deref(), Some("Subscription"));
    }
}
