//! Repository layer between presentation and storage.
//!
//! # Responsibility
//! - Decouple presentation code from the concrete storage implementation.
//!
//! # Invariants
//! - Repository calls forward to the store unchanged; no validation or
//!   transformation happens here.

pub mod contact_repo;
