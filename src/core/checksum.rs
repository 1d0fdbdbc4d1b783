//! Request checksums expected by the mobile-app API.
//!
//! Every signed call carries an HMAC-SHA1 of the request subject, a shared
//! secret code and the current hour. The server accepts a checksum only within
//! the hour it was produced in.

use crate::domain::ports::{Clock, SystemClock};
use crate::utils::error::{Result, StudentApiError};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::NaiveDateTime;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use std::fmt;
use std::sync::Arc;

type HmacSha1 = Hmac<Sha1>;

const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:00";

#[derive(Clone)]
pub struct Secrets {
    pub main_key: String,
    pub alt_key: String,
    pub long_key: String,
    pub secret_code: String,
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secrets { .. }")
    }
}

/// `DD/MM/YYYY HH:00`, truncated to the hour.
pub fn format_timestamp(dt: &NaiveDateTime) -> String {
    dt.format(TIMESTAMP_FORMAT).to_string()
}

pub fn hmac_sha1_base64(key: &str, message: &str) -> Result<String> {
    let mut mac =
        HmacSha1::new_from_slice(key.as_bytes()).map_err(|e| StudentApiError::ChecksumError {
            message: format!("invalid HMAC key: {}", e),
        })?;
    mac.update(message.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// The app escapes only `=` and spaces; the value is then form-encoded again
/// on the wire like any other query parameter.
pub fn encode_checksum(raw: &str) -> String {
    raw.replace('=', "%3d").replace(' ', "+")
}

#[derive(Clone)]
pub struct Signer {
    secrets: Secrets,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer").finish_non_exhaustive()
    }
}

impl Signer {
    pub fn new(secrets: Secrets) -> Self {
        Self::with_clock(secrets, Arc::new(SystemClock))
    }

    pub fn with_clock(secrets: Secrets, clock: Arc<dyn Clock>) -> Self {
        Self { secrets, clock }
    }

    pub fn timestamp(&self) -> String {
        format_timestamp(&self.clock.now())
    }

    /// Main checksum, used by nearly every student endpoint.
    pub fn checksum_k(&self, subject: &str, campus_code: &str) -> Result<String> {
        let message = format!(
            "{}{}{}{}",
            subject,
            self.secrets.secret_code,
            campus_code,
            self.timestamp()
        );
        Ok(encode_checksum(&hmac_sha1_base64(&self.secrets.main_key, &message)?))
    }

    /// Same shape as [`Signer::checksum_k`] but keyed with the alternate secret.
    pub fn checksum_y(&self, username: &str, campus_code: &str) -> Result<String> {
        let message = format!(
            "{}{}{}{}",
            username,
            self.secrets.secret_code,
            campus_code,
            self.timestamp()
        );
        Ok(encode_checksum(&hmac_sha1_base64(&self.secrets.alt_key, &message)?))
    }

    pub fn checksum_a(&self, parameter: &str) -> Result<String> {
        let message = format!("{}{}{}", self.secrets.long_key, parameter, self.timestamp());
        Ok(encode_checksum(&hmac_sha1_base64(&self.secrets.main_key, &message)?))
    }
}
