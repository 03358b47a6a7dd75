//! Contact store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide the typed list/insert/delete queries over `ContactTable`.
//! - Keep SQL details inside the persistence boundary.
//! - Own the live list publisher and refresh it after every write.
//!
//! # Invariants
//! - Lists are ordered by `firstName ASC, id ASC`.
//! - Ids come from `AUTOINCREMENT` and are never reused after deletion.
//! - Deleting an absent id is a no-op and publishes nothing.
//! - A committed write reports success even when refreshing the live list
//!   fails; the refresh failure is logged on its own.
//! - Read paths reject rows that do not fit the `Contact` shape.

use crate::db::DbError;
use crate::model::contact::{Contact, ContactId, NewContact};
use crate::store::feed::{ContactsFeed, ContactsPublisher};
use log::{debug, info, warn};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Mutex;
use std::time::Instant;

const CONTACT_TABLE: &str = "ContactTable";
const CONTACT_COLUMNS: [&str; 5] = ["id", "firstName", "lastName", "phoneNumber", "email"];

const CONTACT_SELECT_SQL: &str = "SELECT
    id,
    firstName,
    lastName,
    phoneNumber,
    email
FROM ContactTable";

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage error for contact persistence and query operations.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    InvalidData(String),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// A thread panicked while holding the connection lock.
    Poisoned,
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted contact data: {message}"),
            Self::MissingRequiredTable(table) => write!(f, "required table missing: {table}"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column missing: {table}.{column}")
            }
            Self::Poisoned => write!(f, "contact store connection lock poisoned"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage access contract for contacts.
///
/// Implementations must be shareable across threads: writes are issued from
/// background tasks while the UI thread reads the live feed.
pub trait ContactStore: Send + Sync {
    /// Subscribes to the live list of all contacts ordered by first name.
    fn subscribe_all(&self) -> ContactsFeed;
    /// Reads one snapshot of all contacts ordered by first name.
    fn list_all(&self) -> StoreResult<Vec<Contact>>;
    /// Reads one contact by id.
    fn get_contact(&self, id: ContactId) -> StoreResult<Option<Contact>>;
    /// Persists a new contact and returns its assigned id.
    fn insert_contact(&self, contact: &NewContact) -> StoreResult<ContactId>;
    /// Removes the row matching `contact.id`, if any.
    fn delete_contact(&self, contact: &Contact) -> StoreResult<()>;
}

/// SQLite-backed contact store.
pub struct SqliteContactStore {
    conn: Mutex<Connection>,
    publisher: ContactsPublisher,
}

impl SqliteContactStore {
    /// Constructs a store from a migrated connection.
    ///
    /// Loads the initial snapshot so the first subscriber sees current rows.
    pub fn try_new(conn: Connection) -> StoreResult<Self> {
        ensure_contact_connection_ready(&conn)?;
        let initial = query_all(&conn)?;
        debug!(
            "event=contact_store_init module=store status=ok rows={}",
            initial.len()
        );
        Ok(Self {
            conn: Mutex::new(conn),
            publisher: ContactsPublisher::new(initial),
        })
    }

    /// Number of live feeds currently subscribed.
    pub fn subscriber_count(&self) -> usize {
        self.publisher.subscriber_count()
    }

    fn with_conn<R>(&self, f: impl FnOnce(&Connection) -> StoreResult<R>) -> StoreResult<R> {
        let guard = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        f(&guard)
    }

    /// Re-reads the table and publishes it. Called with the lock held so
    /// snapshots go out in commit order.
    fn refresh_feed(&self, conn: &Connection, cause: &str) {
        match query_all(conn) {
            Ok(contacts) => self.publisher.publish(contacts),
            Err(err) => warn!(
                "event=contact_feed_refresh module=store status=error cause={cause} error={err}"
            ),
        }
    }
}

impl ContactStore for SqliteContactStore {
    fn subscribe_all(&self) -> ContactsFeed {
        self.publisher.subscribe()
    }

    fn list_all(&self) -> StoreResult<Vec<Contact>> {
        self.with_conn(query_all)
    }

    fn get_contact(&self, id: ContactId) -> StoreResult<Option<Contact>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("{CONTACT_SELECT_SQL} WHERE id = ?1;"))?;
            let mut rows = stmt.query([id])?;
            if let Some(row) = rows.next()? {
                return Ok(Some(parse_contact_row(row)?));
            }
            Ok(None)
        })
    }

    fn insert_contact(&self, contact: &NewContact) -> StoreResult<ContactId> {
        let started_at = Instant::now();
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO ContactTable (
                    firstName,
                    lastName,
                    phoneNumber,
                    email
                ) VALUES (?1, ?2, ?3, ?4);",
                params![
                    contact.first_name.as_str(),
                    contact.last_name.as_str(),
                    contact.phone_number.as_str(),
                    contact.email.as_deref(),
                ],
            )?;
            let id = conn.last_insert_rowid();
            self.refresh_feed(conn, "insert");

            info!(
                "event=contact_insert module=store status=ok contact_id={id} duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(id)
        })
    }

    fn delete_contact(&self, contact: &Contact) -> StoreResult<()> {
        let started_at = Instant::now();
        self.with_conn(|conn| {
            let changed = conn.execute("DELETE FROM ContactTable WHERE id = ?1;", [contact.id])?;
            if changed > 0 {
                self.refresh_feed(conn, "delete");
            }

            info!(
                "event=contact_delete module=store status=ok contact_id={} removed={} duration_ms={}",
                contact.id,
                changed,
                started_at.elapsed().as_millis()
            );
            Ok(())
        })
    }
}

fn query_all(conn: &Connection) -> StoreResult<Vec<Contact>> {
    let mut stmt = conn.prepare(&format!("{CONTACT_SELECT_SQL} ORDER BY firstName ASC, id ASC;"))?;
    let mut rows = stmt.query([])?;
    let mut contacts = Vec::new();
    while let Some(row) = rows.next()? {
        contacts.push(parse_contact_row(row)?);
    }
    Ok(contacts)
}

fn parse_contact_row(row: &Row<'_>) -> StoreResult<Contact> {
    let id: ContactId = row.get("id")?;
    if id <= 0 {
        return Err(StoreError::InvalidData(format!(
            "invalid id value `{id}` in {CONTACT_TABLE}.id"
        )));
    }

    Ok(Contact {
        id,
        first_name: row.get("firstName")?,
        last_name: row.get("lastName")?,
        phone_number: row.get("phoneNumber")?,
        email: row.get("email")?,
    })
}

fn ensure_contact_connection_ready(conn: &Connection) -> StoreResult<()> {
    if !table_exists(conn, CONTACT_TABLE)? {
        return Err(StoreError::MissingRequiredTable(CONTACT_TABLE));
    }

    for column in CONTACT_COLUMNS {
        if !table_has_column(conn, CONTACT_TABLE, column)? {
            return Err(StoreError::MissingRequiredColumn {
                table: CONTACT_TABLE,
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> StoreResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> StoreResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::{ContactStore, SqliteContactStore, StoreError, StoreResult};
    use crate::db::open_db_in_memory;
    use crate::model::contact::NewContact;
    use rusqlite::Connection;
    use std::sync::Arc;

    #[test]
    fn try_new_rejects_unmigrated_connection() {
        let conn = Connection::open_in_memory().unwrap();
        let err = SqliteContactStore::try_new(conn).err().unwrap();
        assert!(matches!(err, StoreError::MissingRequiredTable("ContactTable")));
    }

    #[test]
    fn try_new_rejects_table_without_email_column() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE ContactTable (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                firstName TEXT NOT NULL,
                lastName TEXT NOT NULL,
                phoneNumber TEXT NOT NULL
            );",
        )
        .unwrap();

        let err = SqliteContactStore::try_new(conn).err().unwrap();
        assert!(matches!(
            err,
            StoreError::MissingRequiredColumn {
                table: "ContactTable",
                column: "email"
            }
        ));
    }

    #[test]
    fn initial_snapshot_reflects_existing_rows() {
        let conn = open_db_in_memory().unwrap();
        conn.execute(
            "INSERT INTO ContactTable (firstName, lastName, phoneNumber, email)
             VALUES ('Zed', 'Z', '9', NULL), ('Amy', 'A', '1', 'amy@x.com');",
            [],
        )
        .unwrap();

        let store = SqliteContactStore::try_new(conn).unwrap();
        let names: Vec<String> = store
            .subscribe_all()
            .snapshot()
            .into_iter()
            .map(|contact| contact.first_name)
            .collect();
        assert_eq!(names, vec!["Amy", "Zed"]);
    }

    #[test]
    fn absent_delete_publishes_nothing() {
        let store = SqliteContactStore::try_new(open_db_in_memory().unwrap()).unwrap();
        let id = store
            .insert_contact(&NewContact::new("Ann", "Lee", "1", None))
            .unwrap();
        let mut feed = store.subscribe_all();
        feed.latest();

        let ghost = NewContact::new("Ghost", "", "", None).with_id(id + 100);
        store.delete_contact(&ghost).unwrap();

        assert!(!feed.has_changed());
        assert_eq!(feed.snapshot().len(), 1);
    }

    #[test]
    fn committed_insert_succeeds_when_feed_refresh_fails() {
        let store = SqliteContactStore::try_new(open_db_in_memory().unwrap()).unwrap();
        let mut feed = store.subscribe_all();
        feed.latest();
        // A row with id 0 fails to parse, so the re-read after the insert
        // errors once the insert itself has committed.
        store
            .with_conn(|conn| {
                conn.execute(
                    "INSERT INTO ContactTable (id, firstName, lastName, phoneNumber, email)
                     VALUES (0, 'Bad', 'Row', '0', NULL);",
                    [],
                )?;
                Ok(())
            })
            .unwrap();

        let id = store
            .insert_contact(&NewContact::new("Ann", "Lee", "1", None))
            .unwrap();

        assert!(id > 0);
        assert!(!feed.has_changed());
        let stored: i64 = store
            .with_conn(|conn| {
                Ok(conn.query_row(
                    "SELECT COUNT(*) FROM ContactTable WHERE id = ?1;",
                    [id],
                    |row| row.get(0),
                )?)
            })
            .unwrap();
        assert_eq!(stored, 1);
    }

    #[test]
    fn panic_under_the_connection_lock_poisons_the_store() {
        let store = Arc::new(SqliteContactStore::try_new(open_db_in_memory().unwrap()).unwrap());
        let worker = Arc::clone(&store);
        let crashed = std::thread::spawn(move || {
            worker.with_conn(|_| -> StoreResult<()> { panic!("worker crashed") })
        })
        .join();
        assert!(crashed.is_err());

        assert!(matches!(store.list_all(), Err(StoreError::Poisoned)));
        assert!(matches!(
            store.insert_contact(&NewContact::new("Ann", "Lee", "1", None)),
            Err(StoreError::Poisoned)
        ));
    }
}
