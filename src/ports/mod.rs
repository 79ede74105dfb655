//! Trait seams between the audit core and its adapters.
//!
//! `inbound` holds what the binary calls (audit, store maintenance).
//! `outbound` holds what the use cases need: manifest reading, scanning,
//! source fetching, the cache store, formatting, presenting and progress.
pub mod inbound;
pub mod outbound;
