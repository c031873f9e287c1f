//! Debounced auto-save scheduling
//!
//! The host owns the timer and the network call; this module only decides
//! when a save is due and keeps at most one save in flight. Every edit bumps
//! a revision counter. A save carries the revision it captured, so edits that
//! land while it is in flight leave the lesson dirty and schedule another
//! save once it completes (last write wins).
//!
//! Times are host milliseconds (`Date.now()` or `performance.now()`).

use serde::{Deserialize, Serialize};

/// Quiet period after the last edit before a save is issued
pub const DEFAULT_DEBOUNCE_MS: f64 = 5000.0;

/// Handle for one issued save
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SaveTicket {
    pub id: u64,
    /// Edit revision captured by this save
    pub revision: u64,
}

#[derive(Debug, Clone)]
pub struct AutoSave {
    debounce_ms: f64,
    revision: u64,
    saved_revision: u64,
    last_edit_at: Option<f64>,
    in_flight: Option<SaveTicket>,
    next_ticket: u64,
}

impl Default for AutoSave {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_MS)
    }
}

impl AutoSave {
    pub fn new(debounce_ms: f64) -> Self {
        let debounce_ms = if debounce_ms.is_finite() {
            debounce_ms.max(0.0)
        } else {
            DEFAULT_DEBOUNCE_MS
        };
        Self {
            debounce_ms,
            revision: 0,
            saved_revision: 0,
            last_edit_at: None,
            in_flight: None,
            next_ticket: 1,
        }
    }

    pub fn debounce_ms(&self) -> f64 {
        self.debounce_ms
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Record an edit; restarts the debounce window
    pub fn mark_dirty(&mut self, now_ms: f64) {
        self.revision += 1;
        self.last_edit_at = Some(now_ms);
    }

    /// Edits exist that no completed save has captured
    pub fn is_dirty(&self) -> bool {
        self.revision > self.saved_revision
    }

    pub fn in_flight(&self) -> Option<SaveTicket> {
        self.in_flight
    }

    /// Issue a save if the lesson is dirty, the debounce window has passed
    /// and no other save is in flight.
    pub fn poll(&mut self, now_ms: f64) -> Option<SaveTicket> {
        let quiet_since = self.last_edit_at?;
        if now_ms - quiet_since < self.debounce_ms {
            return None;
        }
        self.issue()
    }

    /// Issue a save right away, ignoring the debounce window (page unload,
    /// explicit publish). Still refuses while another save is in flight.
    pub fn flush(&mut self) -> Option<SaveTicket> {
        self.issue()
    }

    fn issue(&mut self) -> Option<SaveTicket> {
        if self.in_flight.is_some() || !self.is_dirty() {
            return None;
        }
        let ticket = SaveTicket {
            id: self.next_ticket,
            revision: self.revision,
        };
        self.next_ticket += 1;
        self.in_flight = Some(ticket);
        log::debug!("auto-save {} issued at revision {}", ticket.id, ticket.revision);
        Some(ticket)
    }

    /// Report the outcome of a save. Returns false for a ticket that is not
    /// the one in flight; such reports are ignored.
    ///
    /// A failed save keeps the lesson dirty and restarts the debounce window.
    pub fn complete(&mut self, ticket: SaveTicket, ok: bool, now_ms: f64) -> bool {
        if self.in_flight != Some(ticket) {
            log::warn!("ignoring completion of stale auto-save ticket {}", ticket.id);
            return false;
        }
        self.in_flight = None;
        if ok {
            self.saved_revision = self.saved_revision.max(ticket.revision);
        } else {
            log::warn!("auto-save {} failed, retrying after debounce", ticket.id);
            self.last_edit_at = Some(now_ms);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_state_never_saves() {
        let mut saver = AutoSave::default();
        assert_eq!(saver.poll(1_000_000.0), None);
        assert_eq!(saver.flush(), None);
    }

    #[test]
    fn test_debounce_restarts_on_each_edit() {
        let mut saver = AutoSave::new(5000.0);
        saver.mark_dirty(0.0);
        saver.mark_dirty(3000.0);

        assert_eq!(saver.poll(7999.0), None);
        let ticket = saver.poll(8000.0).unwrap();
        assert_eq!(ticket.revision, 2);
    }

    #[test]
    fn test_single_save_in_flight() {
        let mut saver = AutoSave::new(10.0);
        saver.mark_dirty(0.0);
        let first = saver.poll(10.0).unwrap();

        saver.mark_dirty(20.0);
        assert_eq!(saver.poll(100.0), None);
        assert_eq!(saver.flush(), None);

        assert!(saver.complete(first, true, 110.0));
        assert!(saver.is_dirty());

        let second = saver.poll(110.0).unwrap();
        assert_eq!(second.revision, 2);
        assert_ne!(second.id, first.id);
        assert!(saver.complete(second, true, 120.0));
        assert!(!saver.is_dirty());
    }

    #[test]
    fn test_stale_completion_ignored() {
        let mut saver = AutoSave::new(0.0);
        saver.mark_dirty(0.0);
        let ticket = saver.poll(0.0).unwrap();
        let forged = SaveTicket { id: ticket.id + 7, revision: ticket.revision };

        assert!(!saver.complete(forged, true, 1.0));
        assert_eq!(saver.in_flight(), Some(ticket));
    }

    #[test]
    fn test_failed_save_rearms_debounce() {
        let mut saver = AutoSave::new(5000.0);
        saver.mark_dirty(0.0);
        let ticket = saver.poll(5000.0).unwrap();

        assert!(saver.complete(ticket, false, 6000.0));
        assert!(saver.is_dirty());
        assert_eq!(saver.poll(10_999.0), None);
        assert!(saver.poll(11_000.0).is_some());
    }
}
