//! Two-route navigation for the contacts screens.
//!
//! # Responsibility
//! - Define the list and detail routes and their path form.
//! - Keep a back stack rooted at the list route.
//!
//! # Invariants
//! - The back stack is never empty and its bottom entry is `Route::List`.
//! - The detail route carries only the contact id; screens resolve the
//!   record from the live feed, so field values never travel through paths.
//! - Malformed paths parse to `None` instead of raising an error.

use crate::model::contact::ContactId;
use std::fmt::{Display, Formatter};

/// Path of the list route.
pub const LIST_ROUTE_PATH: &str = "contacts";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Contact list with the add form.
    List,
    /// Detail of one contact, `contacts/{id}`.
    Detail { contact_id: ContactId },
}

impl Route {
    pub fn detail(contact_id: ContactId) -> Self {
        Self::Detail { contact_id }
    }

    pub fn path(&self) -> String {
        match self {
            Self::List => LIST_ROUTE_PATH.to_string(),
            Self::Detail { contact_id } => format!("{LIST_ROUTE_PATH}/{contact_id}"),
        }
    }

    /// Parses a route path. Leading and trailing `/` are ignored.
    pub fn parse(path: &str) -> Option<Self> {
        let mut segments = path.trim().trim_matches('/').split('/');
        if segments.next()? != LIST_ROUTE_PATH {
            return None;
        }

        let route = match segments.next() {
            None => Self::List,
            Some(raw_id) => {
                let contact_id = raw_id.parse::<ContactId>().ok().filter(|id| *id > 0)?;
                Self::Detail { contact_id }
            }
        };

        if segments.next().is_some() {
            return None;
        }
        Some(route)
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}

/// Back stack of routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    stack: Vec<Route>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            stack: vec![Route::List],
        }
    }

    pub fn current(&self) -> Route {
        self.stack.last().copied().unwrap_or(Route::List)
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Navigates to `route` and returns it.
    ///
    /// The list route pops back to the root instead of stacking a second
    /// list. Navigating to the route already on top is a no-op.
    pub fn navigate(&mut self, route: Route) -> Route {
        match route {
            Route::List => self.stack.truncate(1),
            Route::Detail { .. } if self.current() == route => {}
            Route::Detail { .. } => self.stack.push(route),
        }
        log::debug!(
            "event=navigate module=presentation status=ok route={} depth={}",
            self.current(),
            self.depth()
        );
        self.current()
    }

    /// Pops one route and returns the new top. Stays on the root.
    pub fn back(&mut self) -> Route {
        if self.stack.len() > 1 {
            self.stack.pop();
        }
        self.current()
    }
}
