//! Presentation state for the contact list and detail screens.
//!
//! # Responsibility
//! - Hold per-screen state (form buffers, subscribed feeds, route ids).
//! - Run user intents off the UI thread through a per-screen view model.
//! - Model the two-route navigation stack.
//!
//! # Invariants
//! - Presentation state is never authoritative; rendered rows always come
//!   from the store's live feed.
//! - Dropping a screen drops its view model and cancels its in-flight work.

pub mod detail_screen;
pub mod list_screen;
pub mod navigation;
pub mod view_model;
