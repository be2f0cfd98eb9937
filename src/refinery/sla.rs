// * SLA Extractor
// * Performance metrics plus support, maintenance, penalty, remedy and benchmark clauses.

use regex::Regex;
use std::sync::LazyLock;

use super::regex_extractor::{all_captures, compile_all, first_capture, push_unique};
use crate::persistence::schema::ServiceLevelAgreement;

static METRIC_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_all(&[
        r"(?i)(\d+\.?\d*%\s*(?:uptime|availability|performance))",
        r"(?i)((?:uptime|availability):\s*\d+\.?\d*%)",
        r"(?i)(response time[:\s]+(?:maximum\s+)?\d+\s+(?:seconds?|minutes?|hours?))",
        r"(?i)(support response[:\s]+\d+\s+(?:hours?|minutes?))",
        r"(?i)(\d+\s+(?:seconds?|minutes?|hours?)\s+(?:response|support))",
    ])
});

static SUPPORT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_all(&[
        r"(?i)Support(?: Terms)?:\s*([^.]+)",
        r"(?i)\b((?:24/7|24x7|round-the-clock|business[- ]hours?|technical|customer|premium|standard|priority)\s+support\b[^.]{0,100})",
    ])
});

static MAINTENANCE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_all(&[
        r"(?i)Maintenance(?: Terms| Window)?:\s*([^.]+)",
        r"(?i)\b((?:scheduled|planned|routine|preventive)\s+maintenance\b[^.]{0,100})",
    ])
});

static PENALTY_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_all(&[r"(?i)\b((?:penalt(?:y|ies)|liquidated damages)\b[^.]{0,100})"])
});

static REMEDY_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_all(&[r"(?i)\b((?:service credits?|pro-rated refund|refund|credit of)\b[^.]{0,100})"])
});

static BENCHMARK_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_all(&[
        r"(?i)\b((?:minimum|target|guaranteed)\s+(?:uptime|availability|response time|throughput|resolution time)\b[^.]{0,80})",
    ])
});

/// Extracts service-level commitments from normalized text
pub fn extract_sla(text: &str) -> ServiceLevelAgreement {
    ServiceLevelAgreement {
        performance_metrics: collect_unique(&METRIC_PATTERNS, text),
        benchmarks: collect_unique(&BENCHMARK_PATTERNS, text),
        penalty_clauses: collect_unique(&PENALTY_PATTERNS, text),
        remedies: collect_unique(&REMEDY_PATTERNS, text),
        support_terms: first_capture(&SUPPORT_PATTERNS, text),
        maintenance_terms: first_capture(&MAINTENANCE_PATTERNS, text),
    }
}

fn collect_unique(patterns: &[Regex], text: &str) -> Vec<String> {
    let mut items = Vec::new();
    for item in all_captures(patterns, text) {
        push_unique(&mut items, item);
    }
    items
}
