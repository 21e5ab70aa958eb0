//! Authorization request building
//!
//! Composes the query parameters for the Facebook authorization URL. This is
//! a pure transformation: the base implicit-flow parameter set, extended with
//! the provider-specific `auth_type` key when one is configured.

use serde::{Deserialize, Serialize};
use url::Url;

/// Facebook authorization dialog endpoint
pub const AUTHORIZATION_ENDPOINT: &str = "https://www.facebook.com/dialog/oauth";

/// Facebook `auth_type` extension parameter
///
/// Alters login-page behavior: `Reauthenticate` forces the user to re-enter
/// credentials, `Rerequest` re-prompts for previously declined permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthType {
    #[default]
    None,
    Reauthenticate,
    Rerequest,
}

impl AuthType {
    /// Query-parameter value, or `None` when no `auth_type` key should be sent
    #[must_use]
    pub fn as_param(self) -> Option<&'static str> {
        match self {
            AuthType::None => None,
            AuthType::Reauthenticate => Some("reauthenticate"),
            AuthType::Rerequest => Some("rerequest"),
        }
    }

    /// Parse a query-parameter value; empty means `None`
    #[must_use]
    pub fn from_param(value: &str) -> Option<Self> {
        match value {
            "" | "none" => Some(AuthType::None),
            "reauthenticate" => Some(AuthType::Reauthenticate),
            "rerequest" => Some(AuthType::Rerequest),
            _ => None,
        }
    }
}

/// Build the authorization query parameters for one login attempt
///
/// The base implicit-flow set, plus `auth_type` when the configured auth type
/// is non-empty.
#[must_use]
pub fn authorization_params(
    client_id: &str,
    redirect_uri: &str,
    scopes: &[String],
    state: &str,
    auth_type: AuthType,
) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("client_id", client_id.to_string()),
        ("redirect_uri", redirect_uri.to_string()),
        ("response_type", "token".to_string()),
        ("state", state.to_string()),
    ];
    if !scopes.is_empty() {
        params.push(("scope", scopes.join(" ")));
    }
    if let Some(auth_type) = auth_type.as_param() {
        params.push(("auth_type", auth_type.to_string()));
    }
    params
}

/// Render the authorization URL for one login attempt
///
/// # Panics
///
/// Panics if the fixed authorization endpoint fails to parse, which would
/// mean a broken build rather than a runtime condition.
#[must_use]
pub fn authorization_url(
    client_id: &str,
    redirect_uri: &str,
    scopes: &[String],
    state: &str,
    auth_type: AuthType,
) -> Url {
    let mut url = Url::parse(AUTHORIZATION_ENDPOINT).expect("invalid authorization endpoint");
    {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in authorization_params(client_id, redirect_uri, scopes, state, auth_type)
        {
            pairs.append_pair(key, &value);
        }
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scopes(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn base_params_include_implicit_response_type() {
        let params = authorization_params(
            "123",
            "fb123://authorize",
            &scopes(&["email"]),
            "S1",
            AuthType::None,
        );
        assert!(params.contains(&("client_id", "123".to_string())));
        assert!(params.contains(&("redirect_uri", "fb123://authorize".to_string())));
        assert!(params.contains(&("response_type", "token".to_string())));
        assert!(params.contains(&("state", "S1".to_string())));
    }

    #[test]
    fn auth_type_rerequest_adds_query_parameter() {
        let params = authorization_params(
            "123",
            "fb123://authorize",
            &scopes(&[]),
            "S1",
            AuthType::Rerequest,
        );
        assert!(params.contains(&("auth_type", "rerequest".to_string())));
    }

    #[test]
    fn auth_type_none_omits_query_parameter() {
        let params = authorization_params(
            "123",
            "fb123://authorize",
            &scopes(&[]),
            "S1",
            AuthType::None,
        );
        assert!(!params.iter().any(|(key, _)| *key == "auth_type"));
    }

    #[test]
    fn scopes_are_space_separated() {
        let url = authorization_url(
            "123",
            "fb123://authorize",
            &scopes(&["email", "public_profile"]),
            "S1",
            AuthType::None,
        );
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("scope".to_string(), "email public_profile".to_string())));
    }

    #[test]
    fn authorization_url_uses_facebook_dialog_endpoint() {
        let url = authorization_url("123", "fb123://authorize", &[], "S1", AuthType::Rerequest);
        assert!(url
            .as_str()
            .starts_with("https://www.facebook.com/dialog/oauth?"));
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("auth_type".to_string(), "rerequest".to_string())));
    }

    #[test]
    fn auth_type_round_trips_through_param_values() {
        assert_eq!(AuthType::from_param("rerequest"), Some(AuthType::Rerequest));
        assert_eq!(
            AuthType::from_param("reauthenticate"),
            Some(AuthType::Reauthenticate)
        );
        assert_eq!(AuthType::from_param(""), Some(AuthType::None));
        assert_eq!(AuthType::from_param("bogus"), None);
        assert_eq!(AuthType::Rerequest.as_param(), Some("rerequest"));
        assert_eq!(AuthType::None.as_param(), None);
    }
}
