//! Explicit reload-on-change bookkeeping shared by both panels.
//!
//! Every coordinate change issues a new request through [`Slot::begin`];
//! nothing in flight is cancelled. Responses come back through
//! [`Slot::settle`] in whatever order they resolve.

use crate::{
    error::{ErrorKind, FetchError},
    model::Coordinates,
};

/// How a slot treats a response that resolves after a newer one was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshPolicy {
    /// Whatever resolves last is shown, even if it was requested first.
    /// A slow stale response can overwrite fresher data.
    #[default]
    LastResolvedWins,
    /// Responses older than the latest applied one are dropped.
    DiscardOlder,
}

/// Identifies one issued request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ticket {
    seq: u64,
    coords: Coordinates,
}

impl Ticket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn coords(&self) -> Coordinates {
        self.coords
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    Applied,
    /// The slot was cleared and the failure logged.
    Failed(ErrorKind),
    /// Dropped under [`RefreshPolicy::DiscardOlder`].
    Stale,
}

#[derive(Debug, Clone)]
pub struct Slot<T> {
    name: &'static str,
    policy: RefreshPolicy,
    value: Option<T>,
    requested: Option<Coordinates>,
    shown_for: Option<Coordinates>,
    issued: u64,
    applied: u64,
}

impl<T> Slot<T> {
    pub fn new(name: &'static str, policy: RefreshPolicy) -> Self {
        Self {
            name,
            policy,
            value: None,
            requested: None,
            shown_for: None,
            issued: 0,
            applied: 0,
        }
    }

    pub fn policy(&self) -> RefreshPolicy {
        self.policy
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Coordinates of the most recently issued request.
    pub fn requested(&self) -> Option<Coordinates> {
        self.requested
    }

    /// Coordinates the currently shown value was fetched for.
    pub fn shown_for(&self) -> Option<Coordinates> {
        self.shown_for
    }

    /// Count of requests issued so far.
    pub fn issued(&self) -> u64 {
        self.issued
    }

    pub fn begin(&mut self, coords: Coordinates) -> Ticket {
        self.issued += 1;
        self.requested = Some(coords);
        tracing::debug!(slot = self.name, seq = self.issued, %coords, "request issued");
        Ticket { seq: self.issued, coords }
    }

    pub fn settle(&mut self, ticket: Ticket, result: Result<T, FetchError>) -> Settled {
        if self.policy == RefreshPolicy::DiscardOlder && ticket.seq < self.applied {
            tracing::debug!(
                slot = self.name,
                seq = ticket.seq,
                applied = self.applied,
                "dropping stale response"
            );
            return Settled::Stale;
        }

        if ticket.seq < self.applied {
            tracing::debug!(
                slot = self.name,
                seq = ticket.seq,
                applied = self.applied,
                "older response resolved last and replaces newer data"
            );
        }
        self.applied = ticket.seq;

        match result {
            Ok(value) => {
                self.value = Some(value);
                self.shown_for = Some(ticket.coords);
                Settled::Applied
            }
            Err(err) => {
                err.report(self.name);
                self.value = None;
                self.shown_for = None;
                Settled::Failed(err.kind())
            }
        }
    }
}
