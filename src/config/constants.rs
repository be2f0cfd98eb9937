// * Configuration Constants
// * Central location for extraction limits, scoring thresholds and timeouts

use std::time::Duration;

// * Amounts must fall strictly inside (0, MAX_AMOUNT) to be accepted
pub const MAX_AMOUNT: f64 = 1_000_000_000.0;

// * Characters captured on each side of a monetary match
pub const AMOUNT_CONTEXT_RADIUS: usize = 50;

// * Party limits
pub const MAX_PARTIES: usize = 10;
pub const MAX_SIGNATORIES: usize = 3;
pub const MIN_PARTY_NAME_LEN: usize = 4;
pub const MAX_PARTY_NAME_LEN: usize = 79;

// * Signatory candidates outside this char range are discarded
pub const MIN_SIGNATORY_LEN: usize = 4;
pub const MAX_SIGNATORY_LEN: usize = 49;

// * Oracle request shaping
pub const CLASSIFICATION_TEXT_LIMIT: usize = 1000;
pub const GENERATION_TEXT_LIMIT: usize = 500;
pub const GENERATION_MAX_LENGTH: u32 = 200;
pub const GENERATION_TEMPERATURE: f32 = 0.1;

// * Oracle timeouts
pub const CLASSIFICATION_TIMEOUT: Duration = Duration::from_secs(10);
pub const GENERATION_TIMEOUT: Duration = Duration::from_secs(15);

// * Whole-pipeline bound
pub const PROCESSING_TIMEOUT: Duration = Duration::from_secs(300);

// * Raw text ceiling (mirrors the 50 MiB upload limit)
pub const MAX_TEXT_CHARS: usize = 50 * 1024 * 1024;

// * Job progress milestones reported to the job store
pub const PROGRESS_STARTED: u8 = 10;
pub const PROGRESS_NORMALIZED: u8 = 30;
pub const PROGRESS_EXTRACTED: u8 = 70;
pub const PROGRESS_SCORED: u8 = 90;
pub const PROGRESS_COMPLETE: u8 = 100;

// * Maximum achievable score
pub const MAX_SCORE: f64 = 100.0;
