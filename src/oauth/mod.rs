//! OAuth login module
//!
//! This module provides the Facebook implicit-grant login flow: authorization
//! URL construction, redirect parsing with CSRF state validation, and the
//! follow-up profile fetch.

pub mod profile;
pub mod provider;
pub mod redirect;
pub mod request;
pub mod state;

// Re-export provider types
pub use provider::{FacebookLogin, LoginProvider};

// Re-export request building types
pub use request::AuthType;

// Re-export redirect handling types
pub use redirect::RedirectParams;

// Re-export profile fetching types
pub use profile::{GraphProfileFetcher, ProfileFetcher};

// Re-export state generation
pub use state::generate_state;

use std::fmt;
use thiserror::Error;

/// OAuth2 grant types a login provider can service
///
/// This crate only implements the implicit flow; any other configured grant
/// type is a build misconfiguration and handled fatally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantType {
    AuthorizationCode,
    Implicit,
}

/// Provider-reported login failure carried on the redirect
///
/// Facebook duplicates error fields between the fragment and the query, and
/// which fields appear varies by failure mode, so all of them are optional.
/// At least one is present when this struct is constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    pub code: Option<String>,
    pub reason: Option<String>,
    pub description: Option<String>,
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = self.code.as_deref().unwrap_or("unknown");
        write!(f, "{code}")?;
        if let Some(reason) = &self.reason {
            write!(f, " ({reason})")?;
        }
        if let Some(description) = &self.description {
            write!(f, ": {description}")?;
        }
        Ok(())
    }
}

/// Login errors reported through `LoginOutcome`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoginError {
    /// The provider reported a specific failure in the redirect
    #[error("login provider error: {0}")]
    Provider(ProviderError),

    /// The redirect carried no token, or its state did not match the issued
    /// state, and no provider error was found to explain why
    #[error("redirect was missing an access token or a valid state parameter")]
    InvalidRedirect,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_display_includes_all_present_fields() {
        let error = ProviderError {
            code: Some("access_denied".to_string()),
            reason: Some("user_denied".to_string()),
            description: Some("Permissions error".to_string()),
        };
        assert_eq!(
            error.to_string(),
            "access_denied (user_denied): Permissions error"
        );
    }

    #[test]
    fn provider_error_display_handles_missing_code() {
        let error = ProviderError {
            code: None,
            reason: None,
            description: Some("Something went wrong".to_string()),
        };
        assert_eq!(error.to_string(), "unknown: Something went wrong");
    }
}
