#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![deny(warnings)]
#![allow(clippy::multiple_crate_versions)]

/// Version of the fblogin crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod models;
pub mod oauth;
pub mod settings;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

/// Re-export commonly used items
pub use models::{LoginOutcome, UserProfile};
pub use oauth::{
    generate_state, AuthType, FacebookLogin, GrantType, GraphProfileFetcher, LoginError,
    LoginProvider, ProfileFetcher, ProviderError,
};
pub use settings::FbLoginSettings;
