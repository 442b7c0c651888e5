//! Response envelopes used by the generation service

use serde::{Deserialize, Serialize};

/// Standard `{ success, data, message }` envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default = "default_success")]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

fn default_success() -> bool {
    true
}

/// Body returned alongside a failed request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub details: Option<ApiErrorDetails>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiErrorDetails {
    #[serde(default)]
    pub suggestions: Vec<String>,
}

impl ApiErrorBody {
    pub fn suggestions(&self) -> Vec<String> {
        self.details
            .as_ref()
            .map(|d| d.suggestions.clone())
            .unwrap_or_default()
    }
}

/// Delete acknowledgement
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteAck {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
}
