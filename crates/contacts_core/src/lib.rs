//! Core of the contacts app.
//!
//! Storage, repository, per-screen view models and navigation live here; the
//! host UI renders what these types expose and forwards user events back.

pub mod app;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod presentation;
pub mod repo;
pub mod store;

pub use app::{AppError, ContactsApp, Screen};
pub use config::AppConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::contact::{Contact, ContactId, NewContact};
pub use presentation::detail_screen::{ContactCard, DetailScreen, DetailView};
pub use presentation::list_screen::{ContactForm, FormField, ListRow, ListScreen};
pub use presentation::navigation::{Navigator, Route};
pub use presentation::view_model::{ContactIntent, ContactsViewModel};
pub use repo::contact_repo::ContactRepository;
pub use store::contact_store::{ContactStore, SqliteContactStore, StoreError, StoreResult};
pub use store::feed::{ContactsFeed, ContactsPublisher};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
