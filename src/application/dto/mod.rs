/// Data Transfer Objects for application layer
///
/// DTOs are used to transfer data between the application layer
/// and adapters, keeping the domain layer isolated.
mod audit_report;
mod audit_request;
mod output_format;
mod store_request;

pub use audit_report::AuditReport;
pub use audit_request::{AuditRequest, MAX_JOBS, MIN_JOBS};
pub use output_format::OutputFormat;
pub use store_request::{StoreEntry, StoreReport, StoreRequest};
