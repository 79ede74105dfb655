use crate::shared::Result;

/// Destination for a rendered audit report.
///
/// Implemented by stdout and by the file writer behind `--output`.
pub trait OutputPresenter {
    /// Writes `content` as-is. Fails when the destination cannot be written,
    /// including when the target path is a symlink.
    fn present(&self, content: &str) -> Result<()>;
}
