// * Persistence: the extraction data model and the job-tracking collaborator

pub mod job_store;
pub mod schema;

// * Re-exports for convenient access
pub use job_store::{InMemoryJobStore, JobRecord, JobStatus, JobStore, JobUpdate, StoreResult};
pub use schema::{
    is_valid_amount, AccountInfo, AdditionalFee, Category, ContactInfo, Criticality, Currency,
    ExtractedData, FinancialDetails, Gap, LegalEntity, LineItem, PartyInfo, PaymentStructure,
    RevenueClassification, ServiceLevelAgreement,
};
