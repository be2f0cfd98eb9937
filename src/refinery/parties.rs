// * Party Extractor
// * Company names by corporate suffix, entity type, roles, registration and signatories.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

use super::regex_extractor::compile_all;
use crate::config::constants::{
    MAX_PARTIES, MAX_PARTY_NAME_LEN, MAX_SIGNATORIES, MAX_SIGNATORY_LEN, MIN_PARTY_NAME_LEN,
    MIN_SIGNATORY_LEN,
};
use crate::persistence::schema::{LegalEntity, PartyInfo};

// * Two tiers: explicit "PARTY A/B:" labels first, then any run of words ending in a suffix
static NAME_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_all(&[
        r"(?im)PARTY\s+[AB]:\s*([A-Za-z][a-zA-Z\s&.,\-']*?(?:Inc\.|LLC|Corp\.|Corporation|Company|Ltd\.|Limited))",
        r"(?im)\b([A-Za-z][a-zA-Z\s&.,\-']{3,40}?(?:Inc\.|LLC|Corp\.|Corporation|Company|Ltd\.|Limited))\b",
    ])
});

static SUFFIX_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:Inc\.?|LLC|Corp\.?|Corporation|Company|Ltd\.?|Limited)\b")
        .expect("Invalid corporate suffix regex")
});

// * Bare entity-type phrases that look like names but are not
static BARE_ENTITY_PHRASES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_all(&[
        r"(?i)^(?:Delaware|California|New York|Nevada)\s+Corporation$",
        r"(?i)^Limited Liability Company$",
    ])
});

const NAME_STOPLIST: [&str; 13] = [
    "the",
    "and",
    "or",
    "of",
    "in",
    "on",
    "at",
    "to",
    "for",
    "legal entity",
    "entity",
    "delaware corporation",
    "limited liability company",
];

// * Entity-type resolution, tested in order; first match wins.
static ENTITY_TYPES: LazyLock<Vec<(Regex, LegalEntity)>> = LazyLock::new(|| {
    [
        (r"(?i)\b(?:Inc\.?|Corporation|Corp\.?)\b", LegalEntity::Corporation),
        (r"(?i)\bLLC\b", LegalEntity::LimitedLiabilityCompany),
        (r"(?i)\b(?:Ltd\.?|Limited)\b", LegalEntity::LimitedCompany),
    ]
    .into_iter()
    .map(|(p, e)| (Regex::new(p).expect("Invalid entity type regex"), e))
    .collect()
});

static SIGNATORY_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_all(&[
        r"(?i)(?:Signed|Signature|By):\s*([A-Z][a-zA-Z\s\.]{3,30})",
        r"(?i)([A-Z][a-zA-Z\s\.]{3,30}),?\s+(?:CEO|CFO|President|Vice President|Director|Manager)",
        r"(?i)(?:CEO|CFO|President|Vice President|Director|Manager):\s*([A-Z][a-zA-Z\s\.]{3,30})",
    ])
});

// * Defined-term role right after a party name: Acme Inc. (the "Client")
static ROLE_AFTER_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)^\s*,?\s*\(\s*(?:the\s+|hereinafter(?:\s+referred\s+to\s+as)?\s+)?["']?([A-Za-z][A-Za-z ]{1,30}?)["']?\s*\)"#,
    )
    .expect("Invalid role regex")
});

// * Incorporation clause right after a party name: Acme Inc., a Delaware corporation
static REGISTRATION_AFTER_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*,?\s*an?\s+((?:[A-Z][a-z]+\s+){1,2}(?i:corporation|limited liability company|limited company|company))",
    )
    .expect("Invalid registration regex")
});

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

/// Extracts up to ten distinct parties in discovery order
pub fn extract_parties(text: &str) -> Vec<PartyInfo> {
    let mut parties: Vec<PartyInfo> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for pattern in NAME_PATTERNS.iter() {
        for caps in pattern.captures_iter(text) {
            let Some(raw) = caps.get(1) else {
                continue;
            };
            let name = clean_name(raw.as_str());
            if seen.contains(&name) || !is_valid_party_name(&name) {
                continue;
            }
            seen.insert(name.clone());

            parties.push(PartyInfo {
                legal_entity: legal_entity_for(&name),
                registration_details: registration_after(text, &name),
                roles: role_after(text, &name).into_iter().collect(),
                signatories: Vec::new(),
                name,
            });
        }
    }

    // * Signatories only ever attach to the first party
    if let Some(first) = parties.first_mut() {
        first.signatories = extract_signatories(text);
    }

    parties.truncate(MAX_PARTIES);
    parties
}

/// Strips a trailing comma and normalizes internal whitespace
fn clean_name(raw: &str) -> String {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_suffix(',').unwrap_or(trimmed);
    WHITESPACE_RUN.replace_all(trimmed, " ").into_owned()
}

/// Validation gate for a cleaned candidate name
pub fn is_valid_party_name(name: &str) -> bool {
    let len = name.chars().count();
    if !(MIN_PARTY_NAME_LEN..=MAX_PARTY_NAME_LEN).contains(&len) {
        return false;
    }
    if name.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    let lower = name.to_lowercase();
    if NAME_STOPLIST.contains(&lower.as_str()) {
        return false;
    }
    if !SUFFIX_TOKEN.is_match(name) {
        return false;
    }
    !BARE_ENTITY_PHRASES.iter().any(|re| re.is_match(name))
}

/// Resolves the entity type from the name's suffix
pub fn legal_entity_for(name: &str) -> Option<LegalEntity> {
    ENTITY_TYPES
        .iter()
        .find(|(re, _)| re.is_match(name))
        .map(|(_, entity)| *entity)
}

/// Text immediately following the first occurrence of `name`
fn tail_after<'t>(text: &'t str, name: &str) -> Option<&'t str> {
    text.find(name).map(|idx| &text[idx + name.len()..])
}

fn role_after(text: &str, name: &str) -> Option<String> {
    let tail = tail_after(text, name)?;
    ROLE_AFTER_NAME
        .captures(tail)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

fn registration_after(text: &str, name: &str) -> Option<String> {
    let tail = tail_after(text, name)?;
    REGISTRATION_AFTER_NAME
        .captures(tail)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

/// Up to three signatory names in pattern order
pub fn extract_signatories(text: &str) -> Vec<String> {
    let mut signatories = Vec::new();

    for pattern in SIGNATORY_PATTERNS.iter() {
        for caps in pattern.captures_iter(text) {
            if signatories.len() >= MAX_SIGNATORIES {
                return signatories;
            }
            let Some(m) = caps.get(1) else {
                continue;
            };
            let candidate = m.as_str().trim();
            let len = candidate.chars().count();
            if (MIN_SIGNATORY_LEN..=MAX_SIGNATORY_LEN).contains(&len) {
                signatories.push(candidate.to_string());
            }
        }
    }

    signatories
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labeled_parties() {
        let parties = extract_parties("PARTY A: Acme Inc. and PARTY B: Globex LLC, effective today.");
        let names: Vec<&str> = parties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Acme Inc.", "Globex LLC"]);
        assert_eq!(parties[0].legal_entity, Some(LegalEntity::Corporation));
        assert_eq!(parties[1].legal_entity, Some(LegalEntity::LimitedLiabilityCompany));
    }

    #[test]
    fn test_no_suffix_no_parties() {
        let parties = extract_parties("This agreement is between Alice and Bob for consulting.");
        assert!(parties.is_empty());
    }

    #[test]
    fn test_name_validation() {
        assert!(is_valid_party_name("Initech Ltd."));
        assert!(!is_valid_party_name("Inc"));
        assert!(!is_valid_party_name("Delaware Corporation"));
        assert!(!is_valid_party_name("limited liability company"));
        assert!(!is_valid_party_name("Widgets and Gadgets"));
        assert!(!is_valid_party_name(&format!("{} LLC", "A".repeat(80))));
    }

    #[test]
    fn test_entity_type_priority() {
        // * Corporation is tested before LLC
        assert_eq!(legal_entity_for("Acme Corp. LLC"), Some(LegalEntity::Corporation));
        assert_eq!(legal_entity_for("Initech Limited"), Some(LegalEntity::LimitedCompany));
        assert_eq!(legal_entity_for("Stark Company"), None);
    }

    #[test]
    fn test_signatories_attach_to_first_party() {
        let text = "PARTY A: Acme Inc. PARTY B: Globex LLC. Signed: Jane Smith";
        let parties = extract_parties(text);
        assert_eq!(parties[0].signatories, vec!["Jane Smith".to_string()]);
        assert!(parties[1].signatories.is_empty());
    }

    #[test]
    fn test_signatories_capped() {
        let text = "By: Alice Jones; By: Bob Brown; By: Carol White; By: Dan Green";
        let signatories = extract_signatories(text);
        assert_eq!(signatories.len(), 3);
    }

    #[test]
    fn test_party_cap_and_uniqueness() {
        let text: String = (0..14)
            .map(|i| format!("PARTY A: Vendor{} LLC. ", (b'a' + i as u8) as char))
            .collect();
        let parties = extract_parties(&text);
        assert_eq!(parties.len(), 10);
        let unique: HashSet<&str> = parties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(unique.len(), parties.len());
    }

    #[test]
    fn test_role_and_registration() {
        let text = "PARTY A: Acme Inc., a Delaware corporation. PARTY B: Globex LLC (the \"Client\").";
        let parties = extract_parties(text);
        let acme = parties.iter().find(|p| p.name == "Acme Inc.").unwrap();
        assert_eq!(acme.registration_details.as_deref(), Some("Delaware corporation"));
        let globex = parties.iter().find(|p| p.name == "Globex LLC").unwrap();
        assert_eq!(globex.roles, vec!["Client".to_string()]);
    }
}
