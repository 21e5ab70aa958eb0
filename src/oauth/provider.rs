//! Login provider capability trait and the Facebook implementation
//!
//! The provider relationship is a capability trait rather than a base class:
//! anything that can build an authorization URL and settle a redirect into a
//! `LoginOutcome` is a login provider.

use async_trait::async_trait;
use log::{debug, info};
use url::Url;

use crate::models::LoginOutcome;
use crate::oauth::profile::{GraphProfileFetcher, ProfileFetcher};
use crate::oauth::redirect::evaluate_redirect;
use crate::oauth::request::{self, AuthType};
use crate::oauth::GrantType;
use crate::settings::FbLoginSettings;

/// Capability trait implemented once per identity provider
#[async_trait]
pub trait LoginProvider: Send + Sync {
    /// Provider name for logging
    fn name(&self) -> &'static str;

    /// Grant type this provider is configured for
    fn grant_type(&self) -> GrantType;

    /// Build the authorization URL the user should be sent to
    fn authorization_url(&self, state: &str) -> Url;

    /// Settle a login redirect into exactly one outcome
    async fn handle_redirect(&self, redirect_url: &str, expected_state: &str) -> LoginOutcome;
}

/// Facebook implicit-grant login provider
pub struct FacebookLogin<F = GraphProfileFetcher> {
    client_id: String,
    redirect_uri: String,
    scopes: Vec<String>,
    auth_type: AuthType,
    grant_type: GrantType,
    fetcher: F,
}

impl FacebookLogin<GraphProfileFetcher> {
    /// Create a provider from application settings
    ///
    /// Runs the URL-scheme configuration resolver: the client id is the digit
    /// run of the registered `fb<digits>` scheme and the redirect URI is
    /// `<scheme>://authorize`.
    ///
    /// # Panics
    ///
    /// Panics if no registered URL scheme matches `fb<digits>`. This is a
    /// startup-configuration error, not a runtime condition.
    #[must_use]
    pub fn from_settings(settings: &FbLoginSettings) -> Self {
        let scheme = settings.facebook_scheme();
        let client_id = settings.client_id().to_string();
        info!("Facebook login configured for client id {client_id} via scheme {scheme}");

        Self {
            client_id,
            redirect_uri: format!("{scheme}://authorize"),
            scopes: settings.login.scopes.clone(),
            auth_type: settings.login.auth_type,
            grant_type: GrantType::Implicit,
            fetcher: GraphProfileFetcher::new(),
        }
    }
}

impl<F: ProfileFetcher> FacebookLogin<F> {
    /// Create a provider with an explicit profile fetcher
    ///
    /// Used by tests to substitute a stub fetcher for the Graph API.
    #[must_use]
    pub fn with_fetcher(
        client_id: impl Into<String>,
        redirect_uri: impl Into<String>,
        scopes: Vec<String>,
        auth_type: AuthType,
        fetcher: F,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            redirect_uri: redirect_uri.into(),
            scopes,
            auth_type,
            grant_type: GrantType::Implicit,
            fetcher,
        }
    }

    /// Override the configured grant type
    ///
    /// The implicit flow is the only supported grant; anything else makes
    /// `handle_redirect` panic. Exists so the configuration guard stays
    /// honest.
    #[must_use]
    pub fn with_grant_type(mut self, grant_type: GrantType) -> Self {
        self.grant_type = grant_type;
        self
    }

    /// Redirect URI registered for this provider
    #[must_use]
    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }
}

#[async_trait]
impl<F: ProfileFetcher> LoginProvider for FacebookLogin<F> {
    fn name(&self) -> &'static str {
        "facebook"
    }

    fn grant_type(&self) -> GrantType {
        self.grant_type
    }

    fn authorization_url(&self, state: &str) -> Url {
        request::authorization_url(
            &self.client_id,
            &self.redirect_uri,
            &self.scopes,
            state,
            self.auth_type,
        )
    }

    /// Settle a login redirect into exactly one outcome
    ///
    /// A redirect with a token and matching state fetches the profile and
    /// succeeds even when the fetch comes back empty. Anything else fails
    /// with the provider-reported error when one is present, or the generic
    /// invalid-redirect error otherwise.
    ///
    /// # Panics
    ///
    /// Panics when the provider is configured for a grant type other than
    /// implicit; unsupported modes are configuration errors.
    async fn handle_redirect(&self, redirect_url: &str, expected_state: &str) -> LoginOutcome {
        assert!(
            self.grant_type == GrantType::Implicit,
            "Facebook login only supports the implicit grant; \
             check the provider's grant type configuration"
        );

        match evaluate_redirect(redirect_url, expected_state) {
            Ok(token) => {
                let profile = self.fetcher.fetch(&token).await;
                debug!(
                    "Facebook login succeeded, profile {}",
                    if profile.is_some() { "present" } else { "absent" }
                );
                LoginOutcome::success(token, profile)
            }
            Err(error) => LoginOutcome::failure(error),
        }
    }
}
