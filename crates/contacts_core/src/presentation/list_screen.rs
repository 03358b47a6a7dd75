//! Contact list screen: add form, live list and row actions.
//!
//! # Responsibility
//! - Buffer the four add-form fields between edits.
//! - Turn form submission into an insert intent and reset the buffers.
//! - Render rows from the live feed and map row actions to intents/routes.
//!
//! # Invariants
//! - Submission never validates; empty buffers are persisted as empty
//!   strings, and the email buffer is always stored as `Some(..)`.
//! - Buffers are empty again right after every submission.

use crate::model::contact::{Contact, NewContact};
use crate::presentation::navigation::Route;
use crate::presentation::view_model::ContactsViewModel;
use crate::store::contact_store::ContactStore;
use crate::store::feed::ContactsFeed;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    FirstName,
    LastName,
    PhoneNumber,
    Email,
}

impl FormField {
    pub const ALL: [FormField; 4] = [
        FormField::FirstName,
        FormField::LastName,
        FormField::PhoneNumber,
        FormField::Email,
    ];

    /// Input label shown next to the field.
    pub fn label(self) -> &'static str {
        match self {
            Self::FirstName => "Enter the first name: ",
            Self::LastName => "Enter the last name: ",
            Self::PhoneNumber => "Enter the phone number: ",
            Self::Email => "Enter the email: ",
        }
    }
}

/// Text buffers of the add form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    first_name: String,
    last_name: String,
    phone_number: String,
    email: String,
}

impl ContactForm {
    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        *self.buffer_mut(field) = value.into();
    }

    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::FirstName => &self.first_name,
            FormField::LastName => &self.last_name,
            FormField::PhoneNumber => &self.phone_number,
            FormField::Email => &self.email,
        }
    }

    pub fn is_empty(&self) -> bool {
        FormField::ALL
            .iter()
            .all(|field| self.value(*field).is_empty())
    }

    /// Moves the buffers into a draft, leaving every buffer empty.
    pub fn take_draft(&mut self) -> NewContact {
        NewContact {
            first_name: std::mem::take(&mut self.first_name),
            last_name: std::mem::take(&mut self.last_name),
            phone_number: std::mem::take(&mut self.phone_number),
            email: Some(std::mem::take(&mut self.email)),
        }
    }

    fn buffer_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::FirstName => &mut self.first_name,
            FormField::LastName => &mut self.last_name,
            FormField::PhoneNumber => &mut self.phone_number,
            FormField::Email => &mut self.email,
        }
    }
}

/// One rendered list row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRow {
    pub contact: Contact,
    /// `"{first} {last}"`.
    pub title: String,
    /// Phone number.
    pub subtitle: String,
}

impl ListRow {
    fn from_contact(contact: Contact) -> Self {
        Self {
            title: contact.display_name(),
            subtitle: contact.phone_number.clone(),
            contact,
        }
    }
}

pub struct ListScreen<S: ContactStore> {
    view_model: ContactsViewModel<S>,
    feed: ContactsFeed,
    form: ContactForm,
}

impl<S: ContactStore + 'static> ListScreen<S> {
    pub fn new(view_model: ContactsViewModel<S>) -> Self {
        let feed = view_model.contacts();
        Self {
            view_model,
            feed,
            form: ContactForm::default(),
        }
    }

    pub fn form(&self) -> &ContactForm {
        &self.form
    }

    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        self.form.set(field, value);
    }

    /// Submits the add form and returns the draft that was sent.
    pub fn submit(&mut self) -> NewContact {
        let draft = self.form.take_draft();
        self.view_model.insert(draft.clone());
        draft
    }

    /// Returns the rows of the latest snapshot and marks it as rendered.
    pub fn rows(&mut self) -> Vec<ListRow> {
        self.feed
            .latest()
            .into_iter()
            .map(ListRow::from_contact)
            .collect()
    }

    /// Whether the store published a snapshot since the last `rows()` call.
    pub fn needs_render(&self) -> bool {
        self.feed.has_changed()
    }

    /// Route for activating `contact`'s row.
    pub fn open_row(&self, contact: &Contact) -> Route {
        Route::detail(contact.id)
    }

    /// Deletes `contact` through the delete affordance of its row.
    pub fn delete_row(&mut self, contact: &Contact) {
        self.view_model.delete(contact.clone());
    }

    pub fn view_model_mut(&mut self) -> &mut ContactsViewModel<S> {
        &mut self.view_model
    }

    /// Waits for every submitted intent of this screen to settle.
    pub async fn settle(&mut self) -> usize {
        self.view_model.wait_idle().await
    }
}
