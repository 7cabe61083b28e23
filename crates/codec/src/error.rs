use thiserror::Error;

/// Rejection kinds for inbound cursor tokens.
///
/// Every variant maps to a client-facing rejection: a well-formed in-memory
/// cursor cannot fail to serialize, so the encode paths only surface these
/// when fed back a bad token.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Token does not split into exactly two dot-separated segments.
    #[error("parsing: invalid token format")]
    Format,

    /// Base64 alphabet violation in either segment.
    #[error("decoding: {0}")]
    Decode(#[from] base64::DecodeError),

    /// Structurally invalid or truncated JSON payload. Truncation surfaces
    /// as `serde_json::error::Category::Eof` on the source.
    #[error("unmarshalling: {0}")]
    Unmarshal(#[from] serde_json::Error),

    /// HMAC signature mismatch.
    #[error("signature mismatch")]
    Integrity,
}

/// Identifies which navigation target failed while building a
/// [`Pagination`](crate::pagination::Pagination).
#[derive(Debug, Error)]
pub enum PaginateError {
    #[error("first: {0}")]
    First(#[source] TokenError),

    #[error("prev: {0}")]
    Prev(#[source] TokenError),

    #[error("next: {0}")]
    Next(#[source] TokenError),

    #[error("last: {0}")]
    Last(#[source] TokenError),
}
