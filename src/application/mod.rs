//! Orchestration between the audit domain and the outside world.
//!
//! `use_cases` drive the audit and store maintenance, `dto` carries requests
//! and reports across the boundary, and `factories` pick the formatter and
//! presenter for a run.
pub mod dto;
pub mod factories;
pub mod use_cases;
