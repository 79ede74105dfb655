/// Use cases module containing application business logic orchestration
mod audit_project;
mod fetch_dependency;
mod manage_store;
mod scan_internal;

pub use audit_project::AuditProjectUseCase;
pub use fetch_dependency::DependencyFetcher;
pub use manage_store::ManageStoreUseCase;
pub use scan_internal::InternalScanner;
