// * Account / Contact Extractor
// * Account numbers, billing details, emails and phone numbers.

use regex::Regex;
use std::sync::LazyLock;

use super::regex_extractor::{all_captures, compile_all, first_capture};
use crate::persistence::schema::{AccountInfo, ContactInfo};

static ACCOUNT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_all(&[
        r"(?i)account[\s#]*:?\s*([A-Z0-9\-]+)",
        r"(?i)customer[\s#]*:?\s*([A-Z0-9\-]+)",
    ])
});

static BILLING_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_all(&[r"(?i)Billing (?:Address|Details|Contact|Information):\s*([^.]+)"])
});

static PATTERN_EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,})").expect("Invalid email regex")
});

// * Parenthesized area code, dash/dot separated, space separated
static PHONE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_all(&[
        r"\((\d{3})\)\s*(\d{3})-?(\d{4})",
        r"(\d{3})[-.](\d{3})[-.](\d{4})",
        r"(\d{3})\s+(\d{3})\s+(\d{4})",
    ])
});

/// Extracts account and contact information
pub fn extract_account(text: &str) -> AccountInfo {
    // * Every labelled match is kept, duplicates included
    let account_numbers = all_captures(&ACCOUNT_PATTERNS, text)
        .map(str::to_string)
        .collect();

    let emails = extract_emails(text);
    let phones = extract_phones(text);

    AccountInfo {
        billing_details: first_capture(&BILLING_PATTERNS, text),
        account_numbers,
        contact_info: ContactInfo {
            emails: (!emails.is_empty()).then_some(emails),
            phones: (!phones.is_empty()).then_some(phones),
        },
    }
}

pub fn extract_emails(text: &str) -> Vec<String> {
    PATTERN_EMAIL
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Phone numbers normalized to "(AAA) PPP-XXXX", pattern order then document order
pub fn extract_phones(text: &str) -> Vec<String> {
    PHONE_PATTERNS
        .iter()
        .flat_map(|re| re.captures_iter(text))
        .map(|caps| format!("({}) {}-{}", &caps[1], &caps[2], &caps[3]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_emails() {
        let emails = extract_emails("Contact legal@acme.com or billing@globex.co.uk for notices.");
        assert_eq!(emails, vec!["legal@acme.com".to_string(), "billing@globex.co.uk".to_string()]);
    }

    #[test]
    fn test_phone_normalization() {
        let phones = extract_phones("Call (555) 123-4567, 555.987.6543 or 555 222 3333.");
        assert_eq!(
            phones,
            vec![
                "(555) 123-4567".to_string(),
                "(555) 987-6543".to_string(),
                "(555) 222-3333".to_string(),
            ]
        );
    }

    #[test]
    fn test_contact_info_only_non_empty() {
        let account = extract_account("Reach us at help@acme.com.");
        assert!(account.contact_info.has_emails());
        assert_eq!(account.contact_info.phones, None);

        let account = extract_account("No contact details.");
        assert!(account.contact_info.is_empty());
    }

    #[test]
    fn test_account_numbers_keep_duplicates() {
        let account = extract_account("Account: AC-1001. Later, Account: AC-1001 again. Customer #: C77");
        assert_eq!(
            account.account_numbers,
            vec!["AC-1001".to_string(), "AC-1001".to_string(), "C77".to_string()]
        );
    }

    #[test]
    fn test_billing_details() {
        let account = extract_account("Billing Address: 1 Main St, Springfield. Thanks.");
        assert_eq!(account.billing_details.as_deref(), Some("1 Main St, Springfield"));
    }
}
