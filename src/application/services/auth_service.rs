//! Authentication service for the admin bearer key.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::AppError;
use serde_json::json;

type HmacSha256 = Hmac<Sha256>;

/// Service for authenticating admin requests via a Bearer key.
///
/// Both the presented token and the configured key are run through
/// HMAC-SHA256 and the digests are compared in constant time, so response
/// timing does not reveal how much of the key a guess matched.
pub struct AuthService {
    admin_key: String,
}

impl AuthService {
    /// Creates a new authentication service.
    pub fn new(admin_key: impl Into<String>) -> Self {
        Self {
            admin_key: admin_key.into(),
        }
    }

    /// HMAC-SHA256 over `value`, keyed by the admin key.
    fn mac(&self, value: &str) -> Result<HmacSha256, AppError> {
        let mut mac = HmacSha256::new_from_slice(self.admin_key.as_bytes()).map_err(|e| {
            AppError::internal("Failed to initialise HMAC", json!({ "reason": e.to_string() }))
        })?;
        mac.update(value.as_bytes());
        Ok(mac)
    }

    /// Checks a raw bearer token against the admin key.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token does not match.
    pub fn authenticate(&self, token: &str) -> Result<(), AppError> {
        let expected = self.mac(&self.admin_key)?.finalize().into_bytes();

        self.mac(token)?.verify_slice(&expected).map_err(|_| {
            AppError::unauthorized("Unauthorized", json!({ "reason": "Invalid admin key" }))
        })
    }

    /// Hex digest identifying the configured key without revealing it.
    pub fn key_fingerprint(&self) -> Result<String, AppError> {
        let digest = self.mac(&self.admin_key)?.finalize().into_bytes();
        Ok(hex::encode(&digest[..4]))
    }
}
