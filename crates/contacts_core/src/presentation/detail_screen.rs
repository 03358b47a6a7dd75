//! Contact detail screen.
//!
//! The screen holds only the route's contact id and resolves the record from
//! the live feed on every render, so it follows deletions made elsewhere.

use crate::model::contact::{Contact, ContactId};
use crate::presentation::navigation::Route;
use crate::presentation::view_model::ContactsViewModel;
use crate::store::contact_store::ContactStore;
use crate::store::feed::ContactsFeed;

/// Display lines of one contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactCard {
    pub name_line: String,
    pub phone_line: String,
    /// Renders an empty value when the email is unset.
    pub email_line: String,
}

impl ContactCard {
    pub fn from_contact(contact: &Contact) -> Self {
        Self {
            name_line: format!("Name: {}", contact.display_name()),
            phone_line: format!("Phone Number: {}", contact.phone_number),
            email_line: format!("Email: {}", contact.email.as_deref().unwrap_or_default()),
        }
    }

    pub fn lines(&self) -> [&str; 3] {
        [&self.name_line, &self.phone_line, &self.email_line]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailView {
    Loaded { contact: Contact, card: ContactCard },
    /// The contact is not in the current snapshot (deleted, or never existed).
    Missing { contact_id: ContactId },
}

pub struct DetailScreen<S: ContactStore> {
    view_model: ContactsViewModel<S>,
    feed: ContactsFeed,
    contact_id: ContactId,
}

impl<S: ContactStore + 'static> DetailScreen<S> {
    pub fn new(view_model: ContactsViewModel<S>, contact_id: ContactId) -> Self {
        let feed = view_model.contacts();
        Self {
            view_model,
            feed,
            contact_id,
        }
    }

    pub fn contact_id(&self) -> ContactId {
        self.contact_id
    }

    pub fn view(&mut self) -> DetailView {
        let snapshot = self.feed.latest();
        match snapshot.into_iter().find(|contact| contact.id == self.contact_id) {
            Some(contact) => DetailView::Loaded {
                card: ContactCard::from_contact(&contact),
                contact,
            },
            None => DetailView::Missing {
                contact_id: self.contact_id,
            },
        }
    }

    pub fn needs_render(&self) -> bool {
        self.feed.has_changed()
    }

    /// Deletes the shown contact and returns the route to go to next.
    ///
    /// A contact that is already gone is left alone.
    pub fn delete(&mut self) -> Route {
        if let Some(contact) = self.feed.find(self.contact_id) {
            self.view_model.delete(contact);
        }
        Route::List
    }

    pub fn back(&self) -> Route {
        Route::List
    }

    pub fn view_model_mut(&mut self) -> &mut ContactsViewModel<S> {
        &mut self.view_model
    }

    pub async fn settle(&mut self) -> usize {
        self.view_model.wait_idle().await
    }
}
