//! Contact domain model.
//!
//! # Responsibility
//! - Define the persisted `Contact` record and its id-less `NewContact` draft.
//!
//! # Invariants
//! - `id` is assigned by storage on insert and never changes afterwards.
//! - Name/phone/email combinations are not unique; duplicates are allowed.
//! - Field values are stored as given. Empty strings are valid values.

use serde::{Deserialize, Serialize};

/// Store-assigned contact identifier (SQLite `INTEGER PRIMARY KEY`).
pub type ContactId = i64;

/// Contact draft that has not been persisted yet.
///
/// Produced by the add form and consumed by `ContactStore::insert_contact`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContact {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    /// `None` means unset; `Some("")` is stored as an empty string.
    pub email: Option<String>,
}

impl NewContact {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        phone_number: impl Into<String>,
        email: Option<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            phone_number: phone_number.into(),
            email,
        }
    }

    /// Attaches a store-assigned id, producing the persisted record shape.
    pub fn with_id(self, id: ContactId) -> Contact {
        Contact {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            phone_number: self.phone_number,
            email: self.email,
        }
    }
}

/// Persisted contact record.
///
/// Serialized field names follow the `ContactTable` column names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: ContactId,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub email: Option<String>,
}

impl Contact {
    /// Returns `"{first} {last}"` as shown in list rows.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Returns whether `self` carries the same field values as `draft`.
    ///
    /// Ids are not compared; a draft has none.
    pub fn matches_draft(&self, draft: &NewContact) -> bool {
        self.first_name == draft.first_name
            && self.last_name == draft.last_name
            && self.phone_number == draft.phone_number
            && self.email == draft.email
    }
}
