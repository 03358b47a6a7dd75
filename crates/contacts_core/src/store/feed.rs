//! Live contact list feed.
//!
//! A [`ContactsPublisher`] owns the latest snapshot; every [`ContactsFeed`]
//! subscribed to it sees that snapshot immediately and is notified on each
//! later publish. Dropping a feed unsubscribes it.

use crate::model::contact::{Contact, ContactId};
use tokio::sync::watch;

/// Write side of the live contact list.
#[derive(Debug)]
pub struct ContactsPublisher {
    tx: watch::Sender<Vec<Contact>>,
}

impl ContactsPublisher {
    pub fn new(initial: Vec<Contact>) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Replaces the current snapshot and wakes all subscribers.
    pub fn publish(&self, contacts: Vec<Contact>) {
        self.tx.send_replace(contacts);
    }

    pub fn subscribe(&self) -> ContactsFeed {
        ContactsFeed {
            rx: self.tx.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// Read side of the live contact list.
///
/// Cloning a feed creates an independent subscription that starts from the
/// same seen/unseen state.
#[derive(Debug, Clone)]
pub struct ContactsFeed {
    rx: watch::Receiver<Vec<Contact>>,
}

impl ContactsFeed {
    /// Returns the current snapshot without marking it as seen.
    pub fn snapshot(&self) -> Vec<Contact> {
        self.rx.borrow().clone()
    }

    /// Returns the current snapshot and marks it as seen.
    pub fn latest(&mut self) -> Vec<Contact> {
        self.rx.borrow_and_update().clone()
    }

    /// Returns whether a snapshot newer than the last seen one is available.
    ///
    /// A closed publisher reports `false`; its last snapshot stays readable.
    pub fn has_changed(&self) -> bool {
        self.rx.has_changed().unwrap_or(false)
    }

    /// Waits for the next snapshot.
    ///
    /// Returns `None` once the publishing store has been dropped.
    pub async fn changed(&mut self) -> Option<Vec<Contact>> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Waits until a snapshot satisfies `predicate`, checking the current one
    /// first.
    ///
    /// Returns `None` once the publishing store has been dropped.
    pub async fn wait_for(
        &mut self,
        mut predicate: impl FnMut(&[Contact]) -> bool,
    ) -> Option<Vec<Contact>> {
        let snapshot = self
            .rx
            .wait_for(|contacts| predicate(contacts.as_slice()))
            .await
            .ok()?;
        Some(snapshot.clone())
    }

    /// Looks up one contact by id in the current snapshot.
    pub fn find(&self, id: ContactId) -> Option<Contact> {
        self.rx
            .borrow()
            .iter()
            .find(|contact| contact.id == id)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::ContactsPublisher;
    use crate::model::contact::NewContact;

    #[test]
    fn subscribers_see_initial_snapshot_and_later_publishes() {
        let publisher = ContactsPublisher::new(Vec::new());
        let mut feed = publisher.subscribe();
        assert!(feed.latest().is_empty());
        assert!(!feed.has_changed());

        let contact = NewContact::new("Ann", "Lee", "1", None).with_id(1);
        publisher.publish(vec![contact.clone()]);

        assert!(feed.has_changed());
        assert_eq!(feed.latest(), vec![contact.clone()]);
        assert!(!feed.has_changed());
        assert_eq!(feed.find(1), Some(contact));
        assert_eq!(feed.find(2), None);
    }

    #[test]
    fn dropping_a_feed_unsubscribes_it() {
        let publisher = ContactsPublisher::new(Vec::new());
        let first = publisher.subscribe();
        let second = publisher.subscribe();
        assert_eq!(publisher.subscriber_count(), 2);

        drop(first);
        assert_eq!(publisher.subscriber_count(), 1);
        drop(second);
        assert_eq!(publisher.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn changed_returns_none_after_publisher_drop() {
        let publisher = ContactsPublisher::new(Vec::new());
        let mut feed = publisher.subscribe();
        drop(publisher);

        assert!(feed.changed().await.is_none());
        assert!(feed.snapshot().is_empty());
    }
}
