//! Redirect URL parsing and validation
//!
//! Facebook's login page redirects back to the app's `fb<app id>://authorize`
//! URL with the token and state in the fragment. Errors may land in the
//! fragment, the query, or both, so error lookup is deliberately liberal and
//! checks the union of the two. That policy, and the evaluation order below,
//! are provider quirks that must be preserved for interoperability.

use log::{debug, error};
use std::collections::HashMap;
use url::Url;

use crate::oauth::{LoginError, ProviderError};

/// Parameters carried on a login redirect, split by where they appeared
#[derive(Debug, Clone)]
pub struct RedirectParams {
    fragment: HashMap<String, String>,
    query: HashMap<String, String>,
}

impl RedirectParams {
    /// Parse a redirect URL into its fragment and query parameter maps
    ///
    /// Returns `None` when the URL itself does not parse; the caller treats
    /// that the same as a redirect with nothing useful on it.
    #[must_use]
    pub fn parse(redirect_url: &str) -> Option<Self> {
        let url = match Url::parse(redirect_url) {
            Ok(url) => url,
            Err(e) => {
                debug!("Failed to parse redirect URL: {e}");
                return None;
            }
        };

        Some(Self {
            fragment: parse_pairs(url.fragment().unwrap_or("")),
            query: parse_pairs(url.query().unwrap_or("")),
        })
    }

    /// Access token, carried in the fragment only (implicit flow)
    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        self.fragment.get("access_token").map(String::as_str)
    }

    /// Anti-forgery state, from the fragment with a query fallback
    #[must_use]
    pub fn state(&self) -> Option<&str> {
        self.fragment
            .get("state")
            .or_else(|| self.query.get("state"))
            .map(String::as_str)
    }

    /// Provider-formatted error, looked up across fragment and query
    ///
    /// Any `error*` field in either location counts; fragment values win when
    /// both carry the same field.
    #[must_use]
    pub fn provider_error(&self) -> Option<ProviderError> {
        let lookup = |key: &str| {
            self.fragment
                .get(key)
                .or_else(|| self.query.get(key))
                .cloned()
        };

        let code = lookup("error").or_else(|| lookup("error_code"));
        let reason = lookup("error_reason");
        let description = lookup("error_description").or_else(|| lookup("error_message"));

        if code.is_none() && reason.is_none() && description.is_none() {
            return None;
        }

        Some(ProviderError {
            code,
            reason,
            description,
        })
    }
}

/// Decide the outcome of a redirect: a token, or exactly one error
///
/// Evaluated in order:
/// 1. A token with a state matching the issued state succeeds.
/// 2. Otherwise a provider-formatted error is surfaced when one is present.
/// 3. Otherwise the generic invalid-redirect error is surfaced.
///
/// An absent state is treated as a mismatch.
///
/// # Errors
///
/// Returns `LoginError::Provider` when the redirect carries a
/// provider-formatted error, and `LoginError::InvalidRedirect` for every
/// other rejection.
pub fn evaluate_redirect(redirect_url: &str, expected_state: &str) -> Result<String, LoginError> {
    let Some(params) = RedirectParams::parse(redirect_url) else {
        error!("Login redirect URL was not parseable");
        return Err(LoginError::InvalidRedirect);
    };

    let token = params.access_token();
    let state_matches = params.state() == Some(expected_state);

    match token {
        Some(token) if state_matches => {
            debug!("Login redirect carried a token with matching state");
            Ok(token.to_string())
        }
        _ => {
            if let Some(provider_error) = params.provider_error() {
                error!("Login provider reported an error: {provider_error}");
                Err(LoginError::Provider(provider_error))
            } else {
                error!(
                    "Login redirect rejected: token {}, state {}",
                    if token.is_some() { "present" } else { "missing" },
                    if params.state().is_some() {
                        "mismatched"
                    } else {
                        "missing"
                    }
                );
                Err(LoginError::InvalidRedirect)
            }
        }
    }
}

fn parse_pairs(raw: &str) -> HashMap<String, String> {
    url::form_urlencoded::parse(raw.as_bytes())
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_with_matching_state_succeeds() {
        let result = evaluate_redirect("fb123://authorize#access_token=XYZ&state=S1", "S1");
        assert_eq!(result.unwrap(), "XYZ");
    }

    #[test]
    fn mismatched_state_is_rejected() {
        let result = evaluate_redirect("fb123://authorize#access_token=XYZ&state=S2", "S1");
        assert_eq!(result.unwrap_err(), LoginError::InvalidRedirect);
    }

    #[test]
    fn absent_state_is_treated_as_mismatch() {
        let result = evaluate_redirect("fb123://authorize#access_token=XYZ", "S1");
        assert_eq!(result.unwrap_err(), LoginError::InvalidRedirect);
    }

    #[test]
    fn missing_token_with_matching_state_is_rejected() {
        let result = evaluate_redirect("fb123://authorize#state=S1", "S1");
        assert_eq!(result.unwrap_err(), LoginError::InvalidRedirect);
    }

    #[test]
    fn state_in_query_matches_token_in_fragment() {
        let result = evaluate_redirect("fb123://authorize?state=S1#access_token=XYZ", "S1");
        assert_eq!(result.unwrap(), "XYZ");
    }

    #[test]
    fn provider_error_in_query_is_surfaced() {
        let result = evaluate_redirect(
            "fb123://authorize?error=access_denied&error_reason=user_denied\
             &error_description=Permissions+error",
            "S1",
        );
        match result.unwrap_err() {
            LoginError::Provider(provider_error) => {
                assert_eq!(provider_error.code.as_deref(), Some("access_denied"));
                assert_eq!(provider_error.reason.as_deref(), Some("user_denied"));
                assert_eq!(
                    provider_error.description.as_deref(),
                    Some("Permissions error")
                );
            }
            LoginError::InvalidRedirect => panic!("expected provider error"),
        }
    }

    #[test]
    fn provider_error_in_fragment_is_surfaced() {
        let result = evaluate_redirect("fb123://authorize#error=server_error", "S1");
        assert!(matches!(result.unwrap_err(), LoginError::Provider(_)));
    }

    #[test]
    fn provider_error_wins_over_generic_error_on_state_mismatch() {
        // Token and (stale) state present, but the provider also reported an
        // error in the query; the specific error must be surfaced.
        let result = evaluate_redirect(
            "fb123://authorize?error_code=190#access_token=XYZ&state=S2",
            "S1",
        );
        match result.unwrap_err() {
            LoginError::Provider(provider_error) => {
                assert_eq!(provider_error.code.as_deref(), Some("190"));
            }
            LoginError::InvalidRedirect => panic!("expected provider error"),
        }
    }

    #[test]
    fn unparseable_redirect_is_generic_error() {
        let result = evaluate_redirect("not a url at all", "S1");
        assert_eq!(result.unwrap_err(), LoginError::InvalidRedirect);
    }

    #[test]
    fn fragment_error_fields_win_over_query_duplicates() {
        let params = RedirectParams::parse(
            "fb123://authorize?error=query_error#error=fragment_error",
        )
        .unwrap();
        let provider_error = params.provider_error().unwrap();
        assert_eq!(provider_error.code.as_deref(), Some("fragment_error"));
    }
}
