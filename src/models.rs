//! Core data model for the login flow
//!
//! Everything here is transient: a `LoginOutcome` is produced exactly once
//! per redirect and nothing is persisted beyond the attempt.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::oauth::LoginError;

/// Parsed user profile returned by the Graph API.
///
/// Kept as a raw JSON object because the provider controls the shape; the
/// crate only requests `email` and `name` but passes through whatever the
/// endpoint returns.
pub type UserProfile = serde_json::Map<String, Value>;

/// Result of a single login attempt - the callback surface as a value
///
/// Exactly one of `access_token` / `error` is populated. A present token with
/// an absent profile is a successful login whose profile fetch failed; the
/// token is still usable.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub access_token: Option<String>,
    pub profile: Option<UserProfile>,
    pub error: Option<LoginError>,
    pub authenticated_at: DateTime<Utc>,
}

impl LoginOutcome {
    /// Successful login: a token, and a profile when the fetch succeeded
    #[must_use]
    pub fn success(access_token: String, profile: Option<UserProfile>) -> Self {
        Self {
            access_token: Some(access_token),
            profile,
            error: None,
            authenticated_at: Utc::now(),
        }
    }

    /// Failed login: no token, a single error
    #[must_use]
    pub fn failure(error: LoginError) -> Self {
        Self {
            access_token: None,
            profile: None,
            error: Some(error),
            authenticated_at: Utc::now(),
        }
    }

    /// Whether the attempt produced a usable access token
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.access_token.is_some() && self.error.is_none()
    }
}
