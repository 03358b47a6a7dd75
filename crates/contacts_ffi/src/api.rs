//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose list/watch/add/delete/detail operations to Dart via FRB.
//! - Route every host intent through one process-wide app and view model so
//!   writes run on background tasks and the host shares the live feed.
//! - Translate core results into plain response envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Sync exports never touch SQLite after the first open; they read the live
//!   snapshot.
//! - Contacts cross the boundary as plain strings plus a numeric id.

use contacts_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    AppConfig, Contact, ContactId, ContactsApp, ContactsFeed, ContactsViewModel, DetailView,
    NewContact, SqliteContactStore,
};
use log::{error, info};
use std::sync::OnceLock;
use tokio::runtime::Runtime;
use tokio::sync::Mutex as AsyncMutex;

const WORKER_THREADS: usize = 2;

static FFI_STATE: OnceLock<Result<FfiState, String>> = OnceLock::new();

/// Process-wide contacts state shared by every exported call.
struct FfiState {
    /// Keeps the worker threads behind `app`'s runtime handle alive.
    _runtime: Runtime,
    app: ContactsApp<SqliteContactStore>,
    view_model: AsyncMutex<ContactsViewModel<SqliteContactStore>>,
    /// Feed consumed by `contacts_watch`; tracks what the host has seen.
    watcher: AsyncMutex<ContactsFeed>,
}

impl FfiState {
    fn open(config: &AppConfig) -> Result<Self, String> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(WORKER_THREADS)
            .thread_name("contacts-worker")
            .build()
            .map_err(|err| format!("contacts runtime init failed: {err}"))?;

        let app = match ContactsApp::open(config, runtime.handle().clone()) {
            Ok(app) => app,
            Err(err) => {
                error!("event=ffi_open module=ffi status=error error={err}");
                // A blocking drop would panic when the caller is itself async.
                runtime.shutdown_background();
                return Err(format!("contacts open failed: {err}"));
            }
        };

        let view_model = app.new_view_model();
        let watcher = view_model.contacts();
        info!("event=ffi_open module=ffi status=ok");
        Ok(Self {
            _runtime: runtime,
            app,
            view_model: AsyncMutex::new(view_model),
            watcher: AsyncMutex::new(watcher),
        })
    }
}

fn state() -> Result<&'static FfiState, String> {
    FFI_STATE
        .get_or_init(|| FfiState::open(&AppConfig::from_env()))
        .as_ref()
        .map_err(|err| err.clone())
}

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Exposes the core crate version.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns an empty string on success and the error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Opens the contacts database off the UI thread.
///
/// Hosts call this once at startup; later sync calls then only read the
/// live snapshot. Returns an empty string on success and the error message
/// on failure. The outcome is cached for the process.
pub async fn contacts_open() -> String {
    match state() {
        Ok(_) => String::new(),
        Err(err) => err,
    }
}

/// One contact as rendered by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactItem {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub email: Option<String>,
}

impl From<Contact> for ContactItem {
    fn from(contact: Contact) -> Self {
        Self {
            id: contact.id,
            first_name: contact.first_name,
            last_name: contact.last_name,
            phone_number: contact.phone_number,
            email: contact.email,
        }
    }
}

/// List response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactListResponse {
    pub ok: bool,
    /// Contacts ordered by first name. Empty on failure.
    pub items: Vec<ContactItem>,
    pub message: String,
}

impl ContactListResponse {
    fn from_snapshot(contacts: Vec<Contact>) -> Self {
        let items = contacts.into_iter().map(ContactItem::from).collect::<Vec<_>>();
        let message = if items.is_empty() {
            "No contacts.".to_string()
        } else {
            format!("{} contact(s).", items.len())
        };
        Self {
            ok: true,
            items,
            message,
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            items: Vec::new(),
            message: message.into(),
        }
    }
}

/// Detail response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDetailResponse {
    /// `false` when the contact does not exist or the lookup failed.
    pub found: bool,
    /// `Name: ..`, `Phone Number: ..`, `Email: ..`; empty when not found.
    pub lines: Vec<String>,
    pub message: String,
}

/// Generic action response envelope for add/delete.
///
/// `ok` means the intent was accepted; the write itself lands in the
/// background and shows up through the live feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactActionResponse {
    pub ok: bool,
    /// Id of the affected contact, when known.
    pub contact_id: Option<i64>,
    pub message: String,
}

impl ContactActionResponse {
    fn success(message: impl Into<String>, contact_id: Option<ContactId>) -> Self {
        Self {
            ok: true,
            contact_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            contact_id: None,
            message: message.into(),
        }
    }
}

/// Returns the current live snapshot, ordered by first name.
///
/// # FFI contract
/// - Sync call; reads the in-memory snapshot once the store is open.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn contacts_list() -> ContactListResponse {
    match state() {
        Ok(state) => {
            ContactListResponse::from_snapshot(state.app.repository().all_contacts().snapshot())
        }
        Err(err) => ContactListResponse::failure(format!("contacts_list failed: {err}")),
    }
}

/// Waits for the next list snapshot the host has not seen yet.
///
/// Hosts loop on this to re-render whenever the table changes. A change
/// published before the call returns immediately.
pub async fn contacts_watch() -> ContactListResponse {
    let state = match state() {
        Ok(state) => state,
        Err(err) => return ContactListResponse::failure(format!("contacts_watch failed: {err}")),
    };
    let mut feed = state.watcher.lock().await;
    match feed.changed().await {
        Some(contacts) => ContactListResponse::from_snapshot(contacts),
        None => ContactListResponse::failure("contacts_watch failed: contact store closed"),
    }
}

/// Queues one contact from the add form.
///
/// Values are stored as given; empty strings are accepted.
///
/// # FFI contract
/// - Async call; the insert runs on a background task.
/// - Never panics. Storage failures are logged, not returned.
pub async fn contacts_add(
    first_name: String,
    last_name: String,
    phone_number: String,
    email: Option<String>,
) -> ContactActionResponse {
    let state = match state() {
        Ok(state) => state,
        Err(err) => return ContactActionResponse::failure(format!("contacts_add failed: {err}")),
    };
    let draft = NewContact::new(first_name, last_name, phone_number, email);
    state.view_model.lock().await.insert(draft);
    ContactActionResponse::success("Contact add queued.", None)
}

/// Queues deletion of one contact by id. Unknown ids succeed as a no-op.
pub async fn contacts_delete(contact_id: i64) -> ContactActionResponse {
    let state = match state() {
        Ok(state) => state,
        Err(err) => {
            return ContactActionResponse::failure(format!("contacts_delete failed: {err}"))
        }
    };
    match state.app.repository().all_contacts().find(contact_id) {
        Some(contact) => {
            state.view_model.lock().await.delete(contact);
            ContactActionResponse::success("Contact delete queued.", Some(contact_id))
        }
        None => ContactActionResponse::success("Contact already absent.", Some(contact_id)),
    }
}

/// Waits until every queued add/delete has settled.
///
/// Returns how many of them failed; failures are already logged.
pub async fn contacts_settle() -> u32 {
    match state() {
        Ok(state) => {
            let failed = state.view_model.lock().await.wait_idle().await;
            u32::try_from(failed).unwrap_or(u32::MAX)
        }
        Err(_) => 0,
    }
}

/// Returns the detail lines for one contact from the live snapshot.
#[flutter_rust_bridge::frb(sync)]
pub fn contact_detail(contact_id: i64) -> ContactDetailResponse {
    let state = match state() {
        Ok(state) => state,
        Err(err) => {
            return ContactDetailResponse {
                found: false,
                lines: Vec::new(),
                message: format!("contact_detail failed: {err}"),
            }
        }
    };
    match state.app.detail_screen(contact_id).view() {
        DetailView::Loaded { card, .. } => ContactDetailResponse {
            found: true,
            lines: card.lines().iter().map(|line| line.to_string()).collect(),
            message: String::new(),
        },
        DetailView::Missing { contact_id } => ContactDetailResponse {
            found: false,
            lines: Vec::new(),
            message: format!("contact {contact_id} not found"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::{
        contact_detail, contacts_add, contacts_delete, contacts_list, contacts_open,
        contacts_settle, contacts_watch, core_version, init_logging, ping, state, FfiState,
        FFI_STATE,
    };
    use contacts_core::AppConfig;
    use std::path::PathBuf;
    use std::sync::OnceLock;
    use std::time::{SystemTime, UNIX_EPOCH};
    use tempfile::TempDir;

    static TEST_DB_DIR: OnceLock<TempDir> = OnceLock::new();

    fn test_db_path() -> PathBuf {
        TEST_DB_DIR
            .get_or_init(|| tempfile::tempdir().unwrap())
            .path()
            .join("nested")
            .join("contacts.sqlite3")
    }

    /// Points the process-wide state at a private database before any
    /// export opens the default one.
    fn use_temp_db() {
        let config = AppConfig::default().with_db_path(test_db_path());
        let opened = FFI_STATE.get_or_init(|| FfiState::open(&config));
        assert!(opened.is_ok(), "{:?}", opened.as_ref().err());
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        format!("{prefix}-{nanos}")
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "/tmp/contacts-logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn open_creates_missing_database_directory() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("a").join("b").join("contacts.sqlite3");

        let opened = FfiState::open(&AppConfig::default().with_db_path(&db_path));

        assert!(opened.is_ok(), "{:?}", opened.err());
        assert!(db_path.exists());
    }

    #[tokio::test]
    async fn shared_state_uses_the_private_database() {
        use_temp_db();
        assert_eq!(contacts_open().await, "");
        assert!(test_db_path().exists());
    }

    #[tokio::test]
    async fn add_then_list_then_detail_then_delete() {
        use_temp_db();
        let token = unique_token("ffi-contact");
        let queued = contacts_add(
            token.clone(),
            "Tester".to_string(),
            "555-0100".to_string(),
            None,
        )
        .await;
        assert!(queued.ok, "{}", queued.message);
        assert_eq!(contacts_settle().await, 0);

        let listed = contacts_list();
        assert!(listed.ok, "{}", listed.message);
        let item = listed
            .items
            .iter()
            .find(|item| item.first_name == token)
            .unwrap();
        assert_eq!(item.email, None);
        let id = item.id;

        let detail = contact_detail(id);
        assert!(detail.found);
        assert_eq!(
            detail.lines,
            vec![
                format!("Name: {token} Tester"),
                "Phone Number: 555-0100".to_string(),
                "Email: ".to_string(),
            ]
        );

        let deleted = contacts_delete(id).await;
        assert!(deleted.ok, "{}", deleted.message);
        assert_eq!(contacts_settle().await, 0);
        assert!(!contacts_list().items.iter().any(|item| item.id == id));
        assert!(!contact_detail(id).found);

        let again = contacts_delete(id).await;
        assert!(again.ok, "{}", again.message);
    }

    #[tokio::test]
    async fn add_is_published_to_the_shared_feed() {
        use_temp_db();
        let mut feed = state().unwrap().app.repository().all_contacts();
        let token = unique_token("ffi-feed");

        contacts_add(token.clone(), "Feed".to_string(), "1".to_string(), None).await;

        let snapshot = feed
            .wait_for(|contacts| contacts.iter().any(|contact| contact.first_name == token))
            .await
            .unwrap();
        assert!(snapshot.iter().any(|contact| contact.first_name == token));
        contacts_settle().await;

        let mut watched = contacts_watch().await;
        while !watched.items.iter().any(|item| item.first_name == token) {
            watched = contacts_watch().await;
        }
        assert!(watched.ok, "{}", watched.message);
    }

    #[tokio::test]
    async fn add_accepts_empty_fields() {
        use_temp_db();
        let queued = contacts_add(String::new(), String::new(), String::new(), Some(String::new()))
            .await;
        assert!(queued.ok, "{}", queued.message);
        assert_eq!(contacts_settle().await, 0);

        let conn = rusqlite::Connection::open(test_db_path()).unwrap();
        let stored: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM ContactTable
                 WHERE firstName = '' AND lastName = '' AND phoneNumber = '' AND email = ''",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert!(stored >= 1);
    }
}
