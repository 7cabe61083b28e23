use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use model::clock::{Clock, SystemClock};
use model::pagination::cursor::Cursor;
use model::pointer::Pointer;
use sha2::Sha256;

use crate::error::TokenError;

type HmacSha256 = Hmac<Sha256>;

/// Delimiter between the payload and its signature. The unpadded URL-safe
/// base64 alphabet cannot produce this byte in either segment.
const SEP: char = '.';

/// Encodes and decodes opaque cursor tokens, plain or HMAC-signed.
///
/// Plain tokens are the unpadded URL-safe base64 of the cursor's JSON
/// form. Signed tokens append a dot and the base64 of an HMAC-SHA256 tag
/// over the payload, so clients cannot forge offsets or filters without
/// the secret.
#[derive(Debug, Clone, Default)]
pub struct TokenCodec<C = SystemClock> {
    clock: C,
}

impl TokenCodec {
    /// Codec stamping encode times from the wall clock.
    pub fn new() -> Self {
        Self { clock: SystemClock }
    }
}

impl<C: Clock> TokenCodec<C> {
    /// Codec stamping encode times from the given clock.
    pub fn with_clock(clock: C) -> Self {
        Self { clock }
    }

    /// Encodes the cursor as a plain token, stamping its `issued_at`.
    /// An empty cursor yields an empty token.
    pub fn encode<T: Pointer>(&self, c: &mut Cursor<T>) -> Result<String, TokenError> {
        if c.is_empty() {
            return Ok(String::new());
        }
        c.issued_at = self.clock.now();
        let payload = serde_json::to_vec(c)?;
        Ok(URL_SAFE_NO_PAD.encode(payload))
    }

    /// Decodes a plain token into a fresh cursor.
    pub fn decode<T: Pointer>(&self, token: &str) -> Result<Cursor<T>, TokenError> {
        let payload = URL_SAFE_NO_PAD.decode(token)?;
        Ok(serde_json::from_slice(&payload)?)
    }

    /// Encodes and signs the cursor:
    /// `payload "." base64url(HMAC-SHA256(payload, secret))`.
    /// An empty cursor yields an empty token.
    pub fn encrypt<T: Pointer>(
        &self,
        c: &mut Cursor<T>,
        secret: &[u8],
    ) -> Result<String, TokenError> {
        let payload = self.encode(c)?;
        if payload.is_empty() {
            return Ok(payload);
        }
        let tag = sign(payload.as_bytes(), secret);
        Ok(format!("{payload}{SEP}{}", URL_SAFE_NO_PAD.encode(tag)))
    }

    /// Verifies the token's signature, then decodes its payload. The
    /// payload is never interpreted before the signature checks out.
    pub fn decrypt<T: Pointer>(
        &self,
        token: &str,
        secret: &[u8],
    ) -> Result<Cursor<T>, TokenError> {
        let mut segments = token.split(SEP);
        let (payload, tag) = match (segments.next(), segments.next(), segments.next()) {
            (Some(payload), Some(tag), None) => (payload, tag),
            _ => {
                tracing::debug!("cursor token rejected: bad segment count");
                return Err(TokenError::Format);
            }
        };
        let claimed = URL_SAFE_NO_PAD.decode(tag)?;
        let mut mac = hmac_sha256(secret);
        mac.update(payload.as_bytes());
        // verify_slice compares in constant time.
        if mac.verify_slice(&claimed).is_err() {
            tracing::debug!("cursor token rejected: signature mismatch");
            return Err(TokenError::Integrity);
        }
        self.decode(payload)
    }
}

fn sign(payload: &[u8], secret: &[u8]) -> Vec<u8> {
    let mut mac = hmac_sha256(secret);
    mac.update(payload);
    mac.finalize().into_bytes().to_vec()
}

fn hmac_sha256(secret: &[u8]) -> HmacSha256 {
    // HMAC accepts keys of any length.
    HmacSha256::new_from_slice(secret).expect("hmac key")
}

#[cfg(test)]
mod tests {
    use super::TokenCodec;
    use crate::error::TokenError;
    use model::clock::FixedClock;
    use model::pagination::cursor::Cursor;
    use model::pointer::List;

    const SECRET: &[u8] = b"ThisIsAnInsecureSecret!";
    const ISSUED_AT: i64 = 1762101336;

    fn codec() -> TokenCodec<FixedClock> {
        TokenCodec::with_clock(FixedClock(ISSUED_AT))
    }

    fn page_two() -> Cursor<i64> {
        let mut c = Cursor::new(3, 10);
        c.offset = 3;
        c.prev = Some(52352);
        c.next = Some(52350);
        c.filters.insert("new".to_string(), vec!["true".to_string()]);
        c
    }

    #[test]
    fn test_encode_empty_cursor_yields_empty_token() {
        let mut c = Cursor::<i64>::new(3, 10);
        assert_eq!(codec().encode(&mut c).unwrap(), "");
        assert_eq!(codec().encrypt(&mut c, SECRET).unwrap(), "");
    }

    #[test]
    fn test_encode_stamps_issued_at() {
        let mut c = page_two();
        codec().encode(&mut c).unwrap();
        assert_eq!(c.issued_at, ISSUED_AT);
    }

    #[test]
    fn test_plain_round_trip() {
        let mut c = page_two();
        let token = codec().encode(&mut c).unwrap();
        assert!(!token.contains('='), "token must be unpadded");

        let back: Cursor<i64> = codec().decode(&token).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn test_plain_round_trip_list_pointer() {
        let mut c = Cursor::<List>::new(3, 0);
        c.prev = Some(List(vec![1.into(), "2024-02-19".into()]));

        let token = codec().encode(&mut c).unwrap();
        let back: Cursor<List> = codec().decode(&token).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn test_decode_rejects_malformed_base64() {
        let err = codec().decode::<i64>("not*base64*at*all").unwrap_err();
        assert!(matches!(err, TokenError::Decode(_)), "got {err:?}");
    }

    #[test]
    fn test_decode_rejects_truncated_json() {
        use base64::Engine as _;
        use base64::engine::general_purpose::URL_SAFE_NO_PAD;

        let token = URL_SAFE_NO_PAD.encode(br#"{"prev":1,"limit""#);
        let err = codec().decode::<i64>(&token).unwrap_err();
        match err {
            TokenError::Unmarshal(e) => {
                assert_eq!(e.classify(), serde_json::error::Category::Eof);
            }
            other => panic!("expected unmarshal error, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_rejects_structurally_invalid_json() {
        use base64::Engine as _;
        use base64::engine::general_purpose::URL_SAFE_NO_PAD;

        let token = URL_SAFE_NO_PAD.encode(b"[1,2,3]");
        let err = codec().decode::<i64>(&token).unwrap_err();
        assert!(matches!(err, TokenError::Unmarshal(_)), "got {err:?}");
    }

    #[test]
    fn test_signed_round_trip() {
        let mut c = page_two();
        let token = codec().encrypt(&mut c, SECRET).unwrap();
        assert_eq!(token.matches('.').count(), 1);

        let back: Cursor<i64> = codec().decrypt(&token, SECRET).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn test_decrypt_rejects_wrong_segment_count() {
        let err = codec().decrypt::<i64>("", SECRET).unwrap_err();
        assert!(matches!(err, TokenError::Format));

        let err = codec().decrypt::<i64>("onlypayload", SECRET).unwrap_err();
        assert!(matches!(err, TokenError::Format));

        let err = codec().decrypt::<i64>("a.b.c", SECRET).unwrap_err();
        assert!(matches!(err, TokenError::Format));
    }

    #[test]
    fn test_decrypt_rejects_tampered_payload() {
        let mut c = page_two();
        let token = codec().encrypt(&mut c, SECRET).unwrap();

        // Flip one payload character to another base64 character so only
        // the signature check can catch it.
        let flipped = flip_char(&token, 1);
        let err = codec().decrypt::<i64>(&flipped, SECRET).unwrap_err();
        assert!(matches!(err, TokenError::Integrity), "got {err:?}");
    }

    #[test]
    fn test_decrypt_rejects_tampered_signature() {
        let mut c = page_two();
        let token = codec().encrypt(&mut c, SECRET).unwrap();

        // Not the final symbol: the strict base64 engine would reject its
        // dirty trailing bits before the signature comparison runs.
        let flipped = flip_char(&token, token.len() - 5);
        let err = codec().decrypt::<i64>(&flipped, SECRET).unwrap_err();
        assert!(matches!(err, TokenError::Integrity), "got {err:?}");
    }

    #[test]
    fn test_decrypt_rejects_wrong_secret() {
        let mut c = page_two();
        let token = codec().encrypt(&mut c, SECRET).unwrap();

        let err = codec().decrypt::<i64>(&token, b"another secret").unwrap_err();
        assert!(matches!(err, TokenError::Integrity), "got {err:?}");
    }

    #[test]
    fn test_decrypt_checks_signature_before_payload() {
        // An unverifiable payload must be reported as an integrity
        // failure, not a decode failure.
        let mut c = page_two();
        let token = codec().encrypt(&mut c, SECRET).unwrap();
        let tag = token.split('.').nth(1).unwrap();

        let forged = format!("AAAA.{tag}");
        let err = codec().decrypt::<i64>(&forged, SECRET).unwrap_err();
        assert!(matches!(err, TokenError::Integrity), "got {err:?}");
    }

    fn flip_char(token: &str, at: usize) -> String {
        let mut bytes = token.as_bytes().to_vec();
        bytes[at] = if bytes[at] == b'A' { b'B' } else { b'A' };
        String::from_utf8(bytes).unwrap()
    }
}
