use crate::clock::{Clock, SystemClock};
use crate::pointer::Pointer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Opaque caller-defined query constraints carried through pagination.
/// A sorted map keeps the serialized form deterministic, which the signed
/// token format requires.
pub type Filters = BTreeMap<String, Vec<String>>;

/// Pagination state for one page boundary, anchored to row values rather
/// than a numeric offset.
///
/// `prev` points at the first row of the current page, `next` at the row
/// just past it. A boundary holding the zero value of `T` marks the first
/// or last page; an unset boundary means the cursor carries no state for
/// that direction at all.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Cursor<T: Pointer> {
    /// Pointer to the first row of the current page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev: Option<T>,

    /// Pointer to the row just past the current page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<T>,

    /// Epoch seconds at encode time.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub issued_at: i64,

    /// Absolute row offset of the current page.
    #[serde(default)]
    pub offset: i64,

    /// Page size.
    #[serde(default)]
    pub limit: i64,

    /// Total row count, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<i64>,

    /// Caller-defined constraints carried through pagination.
    #[serde(default, skip_serializing_if = "Filters::is_empty")]
    pub filters: Filters,

    /// Rows observed since the last reset; never serialized.
    #[serde(skip)]
    pub(crate) cnt: i64,
}

fn is_zero(n: &i64) -> bool {
    *n == 0
}

impl<T: Pointer> PartialEq for Cursor<T> {
    // The transient row counter is not part of cursor identity.
    fn eq(&self, other: &Self) -> bool {
        self.prev == other.prev
            && self.next == other.next
            && self.issued_at == other.issued_at
            && self.offset == other.offset
            && self.limit == other.limit
            && self.total == other.total
            && self.filters == other.filters
    }
}

impl<T: Pointer> Cursor<T> {
    /// Creates a cursor for this page size. A non-positive `total` means
    /// the total row count is unknown.
    pub fn new(limit: i64, total: i64) -> Self {
        Self {
            limit,
            total: (total > 0).then_some(total),
            ..Self::default()
        }
    }

    /// Observes one fetched row. The first observed row becomes the `prev`
    /// boundary and the lookahead row, one past the page size, becomes
    /// `next`. A zero-limit cursor ignores rows.
    pub fn add(&mut self, row: T) {
        if self.limit == 0 {
            return;
        }
        if self.cnt == 0 {
            self.prev = Some(row);
        } else if self.cnt == self.limit {
            self.next = Some(row);
        }
        self.cnt += 1;
    }

    /// True when neither boundary is set. An empty cursor encodes to an
    /// empty token.
    pub fn is_empty(&self) -> bool {
        self.prev.is_none() && self.next.is_none()
    }

    /// Clears the boundaries, timestamp and row counter, keeping
    /// offset/limit/total/filters so the cursor can accumulate the next
    /// fetch pass.
    pub fn reset(&mut self) {
        self.prev = None;
        self.next = None;
        self.issued_at = 0;
        self.cnt = 0;
    }

    /// Current page number, starting at 1.
    pub fn current_page(&self) -> i64 {
        if self.offset == 0 || self.limit == 0 {
            return 1;
        }
        1 + self.offset / self.limit
    }

    /// Total number of pages, when the total row count is known. A
    /// partially filled final page counts as a page.
    pub fn total_pages(&self) -> Option<i64> {
        match self.total {
            Some(total) if self.limit > 0 => Some((total + self.limit - 1) / self.limit),
            _ => None,
        }
    }

    /// True when the cursor was never stamped or its issue time exceeds
    /// the max age.
    pub fn is_expired(&self, max_age: Duration) -> bool {
        self.is_expired_at(max_age, &SystemClock)
    }

    /// Expiry check against an explicit clock.
    pub fn is_expired_at(&self, max_age: Duration, clock: &impl Clock) -> bool {
        self.issued_at == 0 || clock.now() - self.issued_at > max_age.as_secs() as i64
    }
}
