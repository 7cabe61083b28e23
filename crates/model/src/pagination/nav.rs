//! Pure navigation over a populated cursor. Each function derives the
//! cursor of one target page, or `None` when no such page exists — absence
//! is a valid outcome, never an error.

use crate::pagination::cursor::Cursor;
use crate::pointer::Pointer;

/// Cursor of the first page. `None` when the current page already is the
/// first one: no `prev` boundary, a zero `prev` boundary, or offset 0.
pub fn first<T: Pointer>(c: &Cursor<T>) -> Option<Cursor<T>> {
    if c.offset == 0 || c.prev.as_ref()?.is_zero() {
        return None;
    }
    Some(Cursor {
        prev: Some(T::default()),
        offset: 0,
        limit: c.limit,
        total: c.total,
        filters: c.filters.clone(),
        ..Cursor::default()
    })
}

/// Cursor of the previous page. `None` when already on the first page;
/// reaching the start exactly one page back delegates to [`first`].
pub fn prev<T: Pointer>(c: &Cursor<T>) -> Option<Cursor<T>> {
    let boundary = c.prev.as_ref()?;
    if c.offset == 0 || boundary.is_zero() {
        return None;
    }
    if c.offset == c.limit {
        return first(c);
    }
    Some(Cursor {
        prev: Some(boundary.clone()),
        offset: c.offset - c.limit,
        limit: c.limit,
        total: c.total,
        filters: c.filters.clone(),
        ..Cursor::default()
    })
}

/// Cursor of the next page. `None` when the `next` boundary is unset or
/// zero, meaning no further data.
pub fn next<T: Pointer>(c: &Cursor<T>) -> Option<Cursor<T>> {
    let boundary = c.next.as_ref()?;
    if boundary.is_zero() {
        return None;
    }
    Some(Cursor {
        next: Some(boundary.clone()),
        offset: c.offset + c.limit,
        limit: c.limit,
        total: c.total,
        filters: c.filters.clone(),
        ..Cursor::default()
    })
}

/// Cursor of the last page. `None` when the `next` boundary is unset or
/// zero. The target offset comes from the known total, or 0 when the total
/// is unknown; being one page before the end delegates to [`next`].
pub fn last<T: Pointer>(c: &Cursor<T>) -> Option<Cursor<T>> {
    if c.next.as_ref()?.is_zero() {
        return None;
    }
    let offset = match c.total_pages() {
        Some(pages) => c.limit * (pages - 1),
        None => 0,
    };
    if c.offset == offset - c.limit {
        return next(c);
    }
    Some(Cursor {
        next: Some(T::default()),
        offset,
        limit: c.limit,
        total: c.total,
        filters: c.filters.clone(),
        ..Cursor::default()
    })
}
