//! User profile fetching
//!
//! A single GET against the Graph API `me` endpoint with the access token as
//! a query parameter. A failed fetch is deliberately downgraded to "no
//! profile" rather than an error: the access token is still usable and the
//! login must not fail because of it.

use async_trait::async_trait;
use log::debug;

use crate::models::UserProfile;

/// Graph API profile endpoint
pub const PROFILE_ENDPOINT: &str = "https://graph.facebook.com/me";

/// Profile fields requested on login
pub const PROFILE_FIELDS: &str = "email,name";

/// Capability trait for fetching a user profile given an access token
///
/// Implemented by [`GraphProfileFetcher`] for production; tests substitute a
/// stub so redirect handling can be exercised without the network.
#[async_trait]
pub trait ProfileFetcher: Send + Sync {
    /// Fetch the user profile for `access_token`
    ///
    /// Resolves to `None` on any transport error or non-object response;
    /// never returns an error.
    async fn fetch(&self, access_token: &str) -> Option<UserProfile>;
}

#[async_trait]
impl<F: ProfileFetcher + ?Sized> ProfileFetcher for std::sync::Arc<F> {
    async fn fetch(&self, access_token: &str) -> Option<UserProfile> {
        (**self).fetch(access_token).await
    }
}

/// Profile fetcher backed by the Graph API
pub struct GraphProfileFetcher {
    client: reqwest::Client,
}

impl GraphProfileFetcher {
    /// Create a fetcher with a fresh HTTP client
    ///
    /// The client keeps no cookie jar and no response cache, so credentials
    /// never leak across requests.
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for GraphProfileFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProfileFetcher for GraphProfileFetcher {
    async fn fetch(&self, access_token: &str) -> Option<UserProfile> {
        let response = match self
            .client
            .get(PROFILE_ENDPOINT)
            .query(&[("fields", PROFILE_FIELDS), ("access_token", access_token)])
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                debug!("Profile fetch failed: {e}");
                return None;
            }
        };

        if !response.status().is_success() {
            debug!("Profile fetch returned status: {}", response.status());
            return None;
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                debug!("Profile response body could not be read: {e}");
                return None;
            }
        };

        profile_from_body(&body)
    }
}

/// Decide a profile from a raw response body
///
/// Only a JSON object counts as a profile; non-JSON bodies and JSON
/// non-objects resolve to `None`.
fn profile_from_body(body: &str) -> Option<UserProfile> {
    let value: serde_json::Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) => {
            debug!("Profile response was not JSON: {e}");
            return None;
        }
    };

    match value {
        serde_json::Value::Object(profile) => Some(profile),
        other => {
            debug!("Profile response was not a JSON object: {other}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_json_body_resolves_with_no_profile() {
        assert!(profile_from_body("<html>temporarily unavailable</html>").is_none());
    }

    #[test]
    fn json_non_object_body_resolves_with_no_profile() {
        assert!(profile_from_body("[1, 2, 3]").is_none());
        assert!(profile_from_body("\"just a string\"").is_none());
        assert!(profile_from_body("null").is_none());
    }

    #[test]
    fn json_object_body_resolves_with_profile() {
        let profile =
            profile_from_body(r#"{"email": "user@example.com", "name": "Test User"}"#).unwrap();
        assert_eq!(
            profile.get("email").and_then(|v| v.as_str()),
            Some("user@example.com")
        );
        assert_eq!(
            profile.get("name").and_then(|v| v.as_str()),
            Some("Test User")
        );
    }
}
