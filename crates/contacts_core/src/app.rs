//! Explicit wiring of storage, repository and screens.
//!
//! # Responsibility
//! - Open the database and build the store and repository once per process.
//! - Build a fresh view model for every screen instance.
//! - Own the navigator that decides which screen is current.

use crate::config::AppConfig;
use crate::db::{open_db, open_db_in_memory, DbError};
use crate::logging::init_logging;
use crate::model::contact::ContactId;
use crate::presentation::detail_screen::DetailScreen;
use crate::presentation::list_screen::ListScreen;
use crate::presentation::navigation::{Navigator, Route};
use crate::presentation::view_model::ContactsViewModel;
use crate::repo::contact_repo::ContactRepository;
use crate::store::contact_store::{ContactStore, SqliteContactStore, StoreError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use tokio::runtime::Handle;

#[derive(Debug)]
pub enum AppError {
    Logging(String),
    Io(std::io::Error),
    Db(DbError),
    Store(StoreError),
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Logging(message) => write!(f, "logging init failed: {message}"),
            Self::Io(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Logging(_) => None,
            Self::Io(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<DbError> for AppError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<StoreError> for AppError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// A screen built for one route.
pub enum Screen<S: ContactStore> {
    List(ListScreen<S>),
    Detail(DetailScreen<S>),
}

pub struct ContactsApp<S: ContactStore> {
    repo: ContactRepository<S>,
    runtime: Handle,
    navigator: Navigator,
}

impl ContactsApp<SqliteContactStore> {
    /// Starts logging (when configured) and opens the contacts database.
    pub fn open(config: &AppConfig, runtime: Handle) -> Result<Self, AppError> {
        if let Some(log_dir) = config.log_dir.as_ref() {
            init_logging(&config.log_level, log_dir).map_err(AppError::Logging)?;
        }

        if let Some(parent) = config.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let store = SqliteContactStore::try_new(open_db(&config.db_path)?)?;
        info!("event=app_open module=app status=ok mode=file");
        Ok(Self::from_repository(ContactRepository::new(store), runtime))
    }

    /// Opens an app over a fresh in-memory database.
    pub fn open_in_memory(runtime: Handle) -> Result<Self, AppError> {
        let store = SqliteContactStore::try_new(open_db_in_memory()?)?;
        info!("event=app_open module=app status=ok mode=memory");
        Ok(Self::from_repository(ContactRepository::new(store), runtime))
    }
}

impl<S: ContactStore + 'static> ContactsApp<S> {
    pub fn from_repository(repo: ContactRepository<S>, runtime: Handle) -> Self {
        Self {
            repo,
            runtime,
            navigator: Navigator::new(),
        }
    }

    pub fn repository(&self) -> &ContactRepository<S> {
        &self.repo
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn navigator_mut(&mut self) -> &mut Navigator {
        &mut self.navigator
    }

    pub fn new_view_model(&self) -> ContactsViewModel<S> {
        ContactsViewModel::new(self.repo.clone(), self.runtime.clone())
    }

    pub fn list_screen(&self) -> ListScreen<S> {
        ListScreen::new(self.new_view_model())
    }

    pub fn detail_screen(&self, contact_id: ContactId) -> DetailScreen<S> {
        DetailScreen::new(self.new_view_model(), contact_id)
    }

    pub fn screen_for(&self, route: Route) -> Screen<S> {
        match route {
            Route::List => Screen::List(self.list_screen()),
            Route::Detail { contact_id } => Screen::Detail(self.detail_screen(contact_id)),
        }
    }

    /// Screen for the navigator's current route.
    pub fn current_screen(&self) -> Screen<S> {
        self.screen_for(self.navigator.current())
    }
}
