/// Configuration management
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub server_host: String,
    #[serde(default = "default_port")]
    pub server_port: u16,

    pub database_url: String,

    /// Base64-encoded RSA PEM material, one independent pair per token
    /// class. Parsed once at startup; there is no hot reload.
    pub access_token_private_key: String,
    pub access_token_public_key: String,
    pub refresh_token_private_key: String,
    pub refresh_token_public_key: String,

    /// Access-token lifetime. This is also the revocation exposure window:
    /// an access token issued before its session was invalidated stays
    /// usable until this TTL runs out.
    #[serde(default = "default_access_token_ttl_secs")]
    pub access_token_ttl_secs: i64,
    #[serde(default = "default_refresh_token_ttl_secs")]
    pub refresh_token_ttl_secs: i64,

    /// Symmetric secret for email-verification links.
    pub verification_token_secret: String,
    #[serde(default = "default_verification_token_ttl_secs")]
    pub verification_token_ttl_secs: i64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    1337
}

fn default_access_token_ttl_secs() -> i64 {
    900 // 15 minutes
}

fn default_refresh_token_ttl_secs() -> i64 {
    31_536_000 // 1 year
}

fn default_verification_token_ttl_secs() -> i64 {
    86_400 // 24 hours
}

impl Config {
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::from_env()
    }

    pub fn access_token_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.access_token_ttl_secs)
    }

    pub fn refresh_token_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.refresh_token_ttl_secs)
    }

    pub fn verification_token_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.verification_token_ttl_secs)
    }
}
