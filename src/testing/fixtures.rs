//! Test fixtures providing pre-built test objects
//!
//! Commonly used settings, providers and redirect URLs so individual tests
//! don't rebuild the same objects, plus a stub profile fetcher that keeps the
//! Graph API out of the loop.

use async_trait::async_trait;
use serde_json::json;
use std::sync::Mutex;

use crate::models::UserProfile;
use crate::oauth::{AuthType, FacebookLogin, ProfileFetcher};
use crate::settings::{ApplicationSettings, FbLoginSettings, LoginSettings};

pub const TEST_CLIENT_ID: &str = "123";
pub const TEST_SCHEME: &str = "fb123";
pub const TEST_STATE: &str = "S1";
pub const TEST_TOKEN: &str = "XYZ";
pub const TEST_EMAIL: &str = "user@example.com";
pub const TEST_NAME: &str = "Test User";

/// Central fixture provider for all test data
pub struct TestFixtures;

impl TestFixtures {
    /// Create standard test settings with a registered Facebook scheme
    #[must_use]
    pub fn settings() -> FbLoginSettings {
        FbLoginSettings {
            application: ApplicationSettings {
                url_schemes: vec!["myapp".to_string(), TEST_SCHEME.to_string()],
            },
            login: LoginSettings {
                auth_type: AuthType::None,
                scopes: vec!["email".to_string(), "public_profile".to_string()],
            },
            ..Default::default()
        }
    }

    /// Create a Facebook provider wired to a stub fetcher
    #[must_use]
    pub fn facebook<F: ProfileFetcher>(fetcher: F) -> FacebookLogin<F> {
        FacebookLogin::with_fetcher(
            TEST_CLIENT_ID,
            format!("{TEST_SCHEME}://authorize"),
            vec!["email".to_string(), "public_profile".to_string()],
            AuthType::None,
            fetcher,
        )
    }

    /// Redirect URL carrying a token and state in the fragment
    #[must_use]
    pub fn redirect_url(token: &str, state: &str) -> String {
        format!("{TEST_SCHEME}://authorize#access_token={token}&state={state}")
    }

    /// Redirect URL carrying a provider error in the query
    #[must_use]
    pub fn error_redirect_url() -> String {
        format!(
            "{TEST_SCHEME}://authorize?error=access_denied\
             &error_reason=user_denied&error_description=Permissions+error"
        )
    }

    /// Profile object matching what the Graph API returns for `email,name`
    #[must_use]
    pub fn profile() -> UserProfile {
        let mut profile = UserProfile::new();
        profile.insert("email".to_string(), json!(TEST_EMAIL));
        profile.insert("name".to_string(), json!(TEST_NAME));
        profile
    }
}

/// Profile fetcher stub with a canned response
///
/// Records every token it is asked to fetch so tests can assert on the
/// number and content of fetch calls.
pub struct StubProfileFetcher {
    profile: Option<UserProfile>,
    must_not_fetch: bool,
    fetched: Mutex<Vec<String>>,
}

impl StubProfileFetcher {
    /// Fetcher that resolves with the standard test profile
    #[must_use]
    pub fn with_profile() -> Self {
        Self {
            profile: Some(TestFixtures::profile()),
            must_not_fetch: false,
            fetched: Mutex::new(Vec::new()),
        }
    }

    /// Fetcher that resolves with no profile, as after a failed fetch
    #[must_use]
    pub fn failing() -> Self {
        Self {
            profile: None,
            must_not_fetch: false,
            fetched: Mutex::new(Vec::new()),
        }
    }

    /// Fetcher that panics when used; for tests where no fetch may happen
    #[must_use]
    pub fn unreachable() -> Self {
        Self {
            profile: None,
            must_not_fetch: true,
            fetched: Mutex::new(Vec::new()),
        }
    }

    /// Tokens this stub was asked to fetch, in order
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn fetched_tokens(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProfileFetcher for StubProfileFetcher {
    async fn fetch(&self, access_token: &str) -> Option<UserProfile> {
        assert!(
            !self.must_not_fetch,
            "profile fetch ran for a login that should have failed earlier"
        );
        self.fetched.lock().unwrap().push(access_token.to_string());
        self.profile.clone()
    }
}
