//! Client-credentials authentication against the music catalog.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;
use std::fmt;

/// Bearer credential issued by the catalog token endpoint.
///
/// Obtained once per run and never persisted.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct AuthToken {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

impl AuthToken {
    pub fn new(access_token: &str) -> Self {
        Self {
            access_token: access_token.to_string(),
            token_type: "bearer".to_string(),
            expires_in: 3600,
        }
    }

    /// Value for the `Authorization` header of catalog API calls.
    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

// Keep the secret out of logs.
impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthToken")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// Base64 of `client_id:client_secret`, as used in HTTP Basic authentication.
///
/// # Examples
///
/// ```
/// use newmusic::api_client::basic_credential;
///
/// assert_eq!(basic_credential("id", "secret"), "aWQ6c2VjcmV0");
/// ```
pub fn basic_credential(client_id: &str, client_secret: &str) -> String {
    STANDARD.encode(format!("{client_id}:{client_secret}"))
}
