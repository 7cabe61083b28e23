use model::clock::Clock;
use model::pagination::cursor::Cursor;
use model::pagination::nav;
use model::pointer::Pointer;
use serde::{Deserialize, Serialize};

use crate::error::{PaginateError, TokenError};
use crate::token::TokenCodec;

/// Opaque tokens of the four navigation targets derived from one observed
/// page. An empty field means "no such page".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub first: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub prev: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub last: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub next: String,
}

impl<C: Clock> TokenCodec<C> {
    /// Derives the first/prev/next/last cursors from a populated cursor
    /// and serializes each of them, signed when `secret` is non-empty.
    /// Any individual failure discards the partial result.
    pub fn paginate<T: Pointer>(
        &self,
        c: &Cursor<T>,
        secret: &[u8],
    ) -> Result<Pagination, PaginateError> {
        Ok(Pagination {
            first: self
                .seal(nav::first(c), secret)
                .map_err(PaginateError::First)?,
            prev: self
                .seal(nav::prev(c), secret)
                .map_err(PaginateError::Prev)?,
            last: self
                .seal(nav::last(c), secret)
                .map_err(PaginateError::Last)?,
            next: self
                .seal(nav::next(c), secret)
                .map_err(PaginateError::Next)?,
        })
    }

    fn seal<T: Pointer>(
        &self,
        c: Option<Cursor<T>>,
        secret: &[u8],
    ) -> Result<String, TokenError> {
        match c {
            None => Ok(String::new()),
            Some(mut c) if secret.is_empty() => self.encode(&mut c),
            Some(mut c) => self.encrypt(&mut c, secret),
        }
    }
}
