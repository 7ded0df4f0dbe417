use serde::{Deserialize, Serialize};

/// Login request body
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// One element of the `answers` array
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SecurityAnswer {
    pub answer: String,
}

/// Security-question verification request body
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VerifySecurityQuestionsRequest {
    /// Must match the email in the path when present
    #[serde(default)]
    pub email: Option<String>,
    pub answers: Vec<SecurityAnswer>,
}

/// `{ "message": ... }` success body
#[derive(Debug, Clone, Serialize)]
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
