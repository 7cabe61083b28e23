use model::pagination::cursor::Cursor;
use model::pointer::Pointer;
use model::value::Value;

use crate::order::OrderDir;

const PLACEHOLDER: &str = "?";

/// Translates cursor state into the fragments of one seek-based fetch:
/// the WHERE predicate with its bound arguments, the ORDER BY clause and
/// the row limit. The fetch asks for one row past the page size so the
/// caller can trim to the page and use the extra row to detect a further
/// page.
///
/// Seeks from the `next` boundary run against the reversed index order and
/// include the boundary row (it is the first row of the target page);
/// seeks from `prev` keep the natural order and exclude it (it was already
/// shown). The caller re-reverses fetched rows where the order flipped.
#[derive(Debug, Clone, Default)]
pub struct Statement<'a, T: Pointer> {
    /// Cursor driving the fetch.
    pub cursor: Option<&'a Cursor<T>>,
    /// The table's natural default order.
    pub descending_order: bool,
}

impl<'a, T: Pointer> Statement<'a, T> {
    /// Row count for the LIMIT clause, one past the page size to probe for
    /// more data. Zero when nothing should be fetched.
    pub fn limit(&self) -> i64 {
        match self.cursor {
            Some(c) if c.limit > 0 => c.limit + 1,
            _ => 0,
        }
    }

    /// Seek predicate and its bound arguments. Empty when no boundary
    /// constrains the fetch: no cursor, an empty cursor, or a zero
    /// boundary (first/last page).
    ///
    /// With columns, each one contributes an ` AND {col} {op} ?` fragment;
    /// without, a single unqualified ` {op} ?`.
    pub fn where_condition(&self, columns: &[&str]) -> (String, Vec<Value>) {
        let Some((boundary, pointer)) = self.active() else {
            return (String::new(), Vec::new());
        };
        if pointer.is_zero() {
            return (String::new(), Vec::new());
        }
        let op = self.comparison(boundary);
        let mut sql = String::new();
        if columns.is_empty() {
            sql.push_str(&format!(" {op} {PLACEHOLDER}"));
        } else {
            for col in columns {
                sql.push_str(&format!(" AND {col} {op} {PLACEHOLDER}"));
            }
        }
        (sql, pointer.args())
    }

    /// ORDER BY fragment matching the seek direction. Empty when the
    /// cursor carries no boundary at all; a zero boundary restores the
    /// natural default direction.
    ///
    /// Columns render as `{col} {dir}` comma-joined; without columns the
    /// bare direction keyword comes back.
    pub fn order_by(&self, columns: &[&str]) -> String {
        let Some((boundary, pointer)) = self.active() else {
            return String::new();
        };
        let dir = self.direction(boundary, pointer);
        if columns.is_empty() {
            return dir.to_string();
        }
        columns
            .iter()
            .map(|col| format!("{col} {dir}"))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Active boundary: `next` when set, else `prev`.
    fn active(&self) -> Option<(Boundary, &'a T)> {
        let c = self.cursor?;
        if let Some(p) = &c.next {
            return Some((Boundary::Next, p));
        }
        c.prev.as_ref().map(|p| (Boundary::Prev, p))
    }

    fn comparison(&self, boundary: Boundary) -> &'static str {
        match boundary {
            // Inclusive: next already points at the target page's first row.
            Boundary::Next => {
                if self.descending_order {
                    "<="
                } else {
                    ">="
                }
            }
            // Strict: prev points at a row the client has already seen.
            Boundary::Prev => {
                if self.descending_order {
                    ">"
                } else {
                    "<"
                }
            }
        }
    }

    fn direction(&self, boundary: Boundary, pointer: &T) -> OrderDir {
        let natural = if self.descending_order {
            OrderDir::Desc
        } else {
            OrderDir::Asc
        };
        match boundary {
            // First/last page fetches run in the table's natural order, as
            // do prev seeks; next seeks walk the index in reverse.
            Boundary::Next if !pointer.is_zero() => natural.reversed(),
            _ => natural,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Boundary {
    Next,
    Prev,
}
