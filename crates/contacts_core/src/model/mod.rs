//! Domain model for persisted contacts.
//!
//! # Responsibility
//! - Define the record shared by storage, presentation and FFI layers.
//!
//! # Invariants
//! - Every persisted contact is identified by a store-assigned `ContactId`.
//! - Deletion is a hard delete; ids are never reused.

pub mod contact;
