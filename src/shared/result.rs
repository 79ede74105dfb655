/// Crate-wide result type.
///
/// `AuditError` and `CacheError` are typed at their source and converted
/// with `?` once they reach a use case or the binary.
pub type Result<T> = std::result::Result<T, anyhow::Error>;
