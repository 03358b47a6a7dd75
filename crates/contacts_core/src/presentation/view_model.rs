//! Per-screen view model.
//!
//! # Responsibility
//! - Expose the live "all contacts" feed from the repository.
//! - Fire insert/delete intents as background tasks without blocking the
//!   caller.
//!
//! # Invariants
//! - Every task is tracked in the view model's `JoinSet`; dropping the view
//!   model aborts all tasks that have not finished.
//! - A storage statement that already started runs to completion; SQLite
//!   applies it atomically.
//! - Failed intents are logged and dropped. Nothing is retried.

use crate::model::contact::{Contact, NewContact};
use crate::repo::contact_repo::ContactRepository;
use crate::store::contact_store::{ContactStore, StoreError};
use crate::store::feed::ContactsFeed;
use log::{debug, error, warn};
use std::fmt::{Display, Formatter};
use tokio::runtime::Handle;
use tokio::task::{JoinError, JoinSet};

/// User intent forwarded to the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactIntent {
    Insert,
    Delete,
}

impl ContactIntent {
    fn label(self) -> &'static str {
        match self {
            Self::Insert => "insert",
            Self::Delete => "delete",
        }
    }
}

#[derive(Debug)]
enum IntentError {
    Store(StoreError),
    Blocking(JoinError),
}

impl Display for IntentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Blocking(err) => write!(f, "storage worker failed: {err}"),
        }
    }
}

type IntentOutcome = (ContactIntent, Result<(), IntentError>);

/// State holder for one screen.
pub struct ContactsViewModel<S: ContactStore> {
    repo: ContactRepository<S>,
    runtime: Handle,
    tasks: JoinSet<IntentOutcome>,
}

impl<S: ContactStore + 'static> ContactsViewModel<S> {
    /// Creates a view model whose background work runs on `runtime`.
    pub fn new(repo: ContactRepository<S>, runtime: Handle) -> Self {
        Self {
            repo,
            runtime,
            tasks: JoinSet::new(),
        }
    }

    /// Live feed of all contacts, unmodified from the repository.
    pub fn contacts(&self) -> ContactsFeed {
        self.repo.all_contacts()
    }

    /// Inserts `contact` in the background.
    pub fn insert(&mut self, contact: NewContact) {
        self.launch(ContactIntent::Insert, move |repo| {
            repo.insert_contact(&contact).map(|_| ())
        });
    }

    /// Deletes `contact` in the background.
    pub fn delete(&mut self, contact: Contact) {
        self.launch(ContactIntent::Delete, move |repo| {
            repo.delete_contact(&contact)
        });
    }

    /// Number of launched intents that have not been collected yet.
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    /// Waits until every launched intent has settled.
    ///
    /// Returns how many of them failed. Failures are already logged.
    pub async fn wait_idle(&mut self) -> usize {
        let mut failed = 0;
        while let Some(joined) = self.tasks.join_next().await {
            if !record_outcome(joined) {
                failed += 1;
            }
        }
        failed
    }

    fn launch(
        &mut self,
        intent: ContactIntent,
        work: impl FnOnce(&ContactRepository<S>) -> Result<(), StoreError> + Send + 'static,
    ) {
        self.reap_finished();

        let repo = self.repo.clone();
        self.tasks.spawn_on(
            async move {
                let result = match tokio::task::spawn_blocking(move || work(&repo)).await {
                    Ok(result) => result.map_err(IntentError::Store),
                    Err(err) => Err(IntentError::Blocking(err)),
                };
                (intent, result)
            },
            &self.runtime,
        );
        debug!(
            "event=contact_intent module=presentation status=start intent={} in_flight={}",
            intent.label(),
            self.tasks.len()
        );
    }

    fn reap_finished(&mut self) {
        while let Some(joined) = self.tasks.try_join_next() {
            record_outcome(joined);
        }
    }
}

impl<S: ContactStore> Drop for ContactsViewModel<S> {
    fn drop(&mut self) {
        if self.tasks.is_empty() {
            return;
        }
        warn!(
            "event=view_model_teardown module=presentation status=cancelled in_flight={}",
            self.tasks.len()
        );
        self.tasks.abort_all();
    }
}

/// Logs one joined task and returns whether it succeeded.
fn record_outcome(joined: Result<IntentOutcome, JoinError>) -> bool {
    match joined {
        Ok((intent, Ok(()))) => {
            debug!(
                "event=contact_intent module=presentation status=ok intent={}",
                intent.label()
            );
            true
        }
        Ok((intent, Err(err))) => {
            error!(
                "event=contact_intent module=presentation status=error intent={} error={}",
                intent.label(),
                err
            );
            false
        }
        Err(err) if err.is_cancelled() => {
            debug!("event=contact_intent module=presentation status=cancelled");
            false
        }
        Err(err) => {
            error!(
                "event=contact_intent module=presentation status=error error_code=task_panicked error={}",
                err
            );
            false
        }
    }
}
