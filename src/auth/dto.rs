use serde::{Deserialize, Serialize};

/// Request body for registration and login. The `username` field carries the
/// handle, which may be a plain username or an email address.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

/// Uniform `{message}` body returned by the JSON endpoints.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
