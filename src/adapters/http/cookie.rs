//! Signed client cookie.
//!
//! The browser holds an opaque random token; the session itself lives in a
//! server-side slot. The cookie value is
//!
//! ```text
//! <token>.<hex hmac-sha256(token)>
//! ```
//!
//! and the slot key is `console:session:<hex sha256(token)>`, so a leaked slot
//! store does not reveal usable cookies. A cookie whose signature does not
//! verify is treated exactly like a missing cookie.

use std::fmt;

use axum::http::{header, HeaderMap, HeaderValue};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::ports::SlotKey;

type HmacSha256 = Hmac<Sha256>;

/// Prefix shared by every session slot key.
pub const SLOT_KEY_PREFIX: &str = "console:session:";

/// Errors building a signer.
#[derive(Debug, thiserror::Error)]
pub enum CookieKeyError {
    #[error("Cookie secret must be at least {min} bytes, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Cookie secret rejected: {0}")]
    Rejected(String),
}

/// Signs and verifies client tokens, and derives their slot keys.
#[derive(Clone)]
pub struct CookieSigner {
    mac: HmacSha256,
}

impl CookieSigner {
    /// Minimum accepted secret length in bytes.
    pub const MIN_SECRET_LEN: usize = 32;

    pub fn new(secret: &[u8]) -> Result<Self, CookieKeyError> {
        if secret.len() < Self::MIN_SECRET_LEN {
            return Err(CookieKeyError::TooShort {
                min: Self::MIN_SECRET_LEN,
                actual: secret.len(),
            });
        }
        let mac = HmacSha256::new_from_slice(secret)
            .map_err(|e| CookieKeyError::Rejected(e.to_string()))?;
        Ok(Self { mac })
    }

    /// A fresh random client token.
    pub fn new_token() -> String {
        Uuid::new_v4().simple().to_string()
    }

    fn signature(&self, token: &str) -> Vec<u8> {
        let mut mac = self.mac.clone();
        mac.update(token.as_bytes());
        mac.finalize().into_bytes().to_vec()
    }

    /// Cookie value for `token`.
    pub fn sign(&self, token: &str) -> String {
        format!("{}.{}", token, hex::encode(self.signature(token)))
    }

    /// Returns the token if `value` carries a valid signature.
    pub fn verify<'a>(&self, value: &'a str) -> Option<&'a str> {
        let (token, signature) = value.rsplit_once('.')?;
        if token.is_empty() {
            return None;
        }
        let provided = hex::decode(signature).ok()?;
        let expected = self.signature(token);

        if provided.len() != expected.len() {
            return None;
        }
        if bool::from(expected.ct_eq(&provided)) {
            Some(token)
        } else {
            None
        }
    }

    /// Slot key for a verified token.
    pub fn slot_key(token: &str) -> SlotKey {
        let digest = Sha256::digest(token.as_bytes());
        SlotKey::new(format!("{}{}", SLOT_KEY_PREFIX, hex::encode(digest)))
    }
}

impl fmt::Debug for CookieSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CookieSigner").finish_non_exhaustive()
    }
}

/// Attributes of the session cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieSettings {
    pub name: String,
    pub secure: bool,
    pub max_age_secs: u64,
}

impl CookieSettings {
    /// `Set-Cookie` value carrying `value`.
    pub fn set_header(&self, value: &str) -> Option<HeaderValue> {
        let mut cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            self.name, value, self.max_age_secs
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        HeaderValue::from_str(&cookie).ok()
    }

    /// `Set-Cookie` value that removes the cookie.
    pub fn clear_header(&self) -> Option<HeaderValue> {
        let mut cookie = format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", self.name);
        if self.secure {
            cookie.push_str("; Secure");
        }
        HeaderValue::from_str(&cookie).ok()
    }

    /// Raw value of this cookie in the request, if present.
    pub fn read<'a>(&self, headers: &'a HeaderMap) -> Option<&'a str> {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|h| h.to_str().ok())
            .flat_map(|h| h.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == self.name)
            .map(|(_, value)| value)
    }
}
