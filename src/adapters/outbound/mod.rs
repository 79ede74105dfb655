//! Concrete implementations of the outbound ports.
//!
//! - `console`: progress on stderr
//! - `filesystem`: go.mod reading, the per-version cache store, report files
//! - `formatters`: table, Markdown and JSON renderings of an `AuditReport`
//! - `process`: the vulnerability scanner and git, run as child processes
pub mod console;
pub mod filesystem;
pub mod formatters;
pub mod process;
