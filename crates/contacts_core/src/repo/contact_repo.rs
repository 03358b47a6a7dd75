//! Contact repository facade.
//!
//! # Responsibility
//! - Forward list/insert/delete to a [`ContactStore`] implementation.
//! - Provide a cheaply cloneable handle that background tasks can own.

use crate::model::contact::{Contact, ContactId, NewContact};
use crate::store::contact_store::{ContactStore, StoreResult};
use crate::store::feed::ContactsFeed;
use std::sync::Arc;

/// Forwarding facade over a contact store.
pub struct ContactRepository<S: ContactStore> {
    store: Arc<S>,
}

impl<S: ContactStore> Clone for ContactRepository<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: ContactStore> ContactRepository<S> {
    /// Creates a repository that owns `store`.
    pub fn new(store: S) -> Self {
        Self::from_shared(Arc::new(store))
    }

    /// Creates a repository over an already shared store.
    pub fn from_shared(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Live list of all contacts ordered by first name.
    pub fn all_contacts(&self) -> ContactsFeed {
        self.store.subscribe_all()
    }

    /// One-shot list of all contacts ordered by first name.
    pub fn list_contacts(&self) -> StoreResult<Vec<Contact>> {
        self.store.list_all()
    }

    pub fn get_contact(&self, id: ContactId) -> StoreResult<Option<Contact>> {
        self.store.get_contact(id)
    }

    pub fn insert_contact(&self, contact: &NewContact) -> StoreResult<ContactId> {
        self.store.insert_contact(contact)
    }

    pub fn delete_contact(&self, contact: &Contact) -> StoreResult<()> {
        self.store.delete_contact(contact)
    }
}
