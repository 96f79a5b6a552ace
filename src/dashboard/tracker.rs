//! Request correlation for a single UI region.
//!
//! Every outgoing request takes a [`Ticket`] from its region's
//! [`RequestTracker`]. When the response arrives the controller asks the
//! tracker whether the ticket still matters before touching the document.

/// Monotonic identifier of one outgoing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn sequence(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Default)]
pub struct RequestTracker {
    next: u64,
    latest: Option<u64>,
    /// Tickets below this sequence number were cancelled.
    floor: u64,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket; it supersedes every earlier one.
    pub fn issue(&mut self) -> Ticket {
        let ticket = Ticket(self.next);
        self.next += 1;
        self.latest = Some(ticket.0);
        ticket
    }

    /// True if `ticket` is the most recent, uncancelled request.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest == Some(ticket.0) && self.is_live(ticket)
    }

    /// True if `ticket` has not been cancelled (it may be superseded).
    pub fn is_live(&self, ticket: Ticket) -> bool {
        ticket.0 >= self.floor && ticket.0 < self.next
    }

    /// Invalidate every ticket issued so far.
    pub fn cancel_all(&mut self) {
        self.floor = self.next;
        self.latest = None;
    }

    /// Mark `ticket` as resolved; a later `is_current` check returns false.
    pub fn settle(&mut self, ticket: Ticket) {
        if self.latest == Some(ticket.0) {
            self.latest = None;
        }
    }

    /// True while the latest issued ticket is unresolved.
    pub fn has_pending(&self) -> bool {
        self.latest.is_some()
    }
}
