use serde::{Deserialize, Serialize};

use crate::errors::ApiError;

/// Body of the plan generation endpoints.
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub preferences: Option<String>,
}

impl GenerateRequest {
    pub fn preferences(&self) -> Result<&str, ApiError> {
        self.preferences
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| ApiError::bad_request("Preferences are required"))
    }
}

#[derive(Debug, Serialize)]
pub struct GeneratedResponse<T> {
    pub message: &'static str,
    pub plan: T,
}
