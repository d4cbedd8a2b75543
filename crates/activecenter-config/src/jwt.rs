use std::env;

use crate::parse_var;

const DEFAULT_SECRET: &str = "your-secret-key-change-in-production";

/// Signing configuration shared by token issuance and the authentication guard.
#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    /// Access token lifetime in seconds.
    pub access_token_expiry: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_SECRET.to_string(),
            access_token_expiry: 3600, // 1 hour
        }
    }
}

impl JwtConfig {
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let secret = lookup("JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET not set, using the development default");
            defaults.secret.clone()
        });

        Self {
            secret,
            access_token_expiry: parse_var(&lookup, "JWT_ACCESS_EXPIRY")
                .filter(|v: &i64| *v > 0)
                .unwrap_or(defaults.access_token_expiry),
        }
    }
}
