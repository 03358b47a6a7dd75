//! Storage access layer for contacts.
//!
//! # Responsibility
//! - Define typed queries over the `ContactTable` table.
//! - Publish live list snapshots to subscribers whenever the table changes.
//!
//! # Invariants
//! - Published snapshots are ordered by `firstName ASC, id ASC`.
//! - A snapshot is published after every write that changed a row, while the
//!   connection lock is still held, so subscribers never observe snapshots
//!   out of commit order.

pub mod contact_store;
pub mod feed;
