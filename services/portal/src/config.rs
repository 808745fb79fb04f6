use serde::Deserialize;

use guidebook_core::config::Config;
use guidebook_session::cookie::CookieOptions;

/// Portal service configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct PortalConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// HMAC secret for the session and pending-activation JWTs.
    pub session_secret: String,
    /// TCP port to listen on. Env var: `PORT`.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Cookie Domain attribute; host-only cookies when unset.
    pub cookie_domain: Option<String>,
    #[serde(default = "default_true")]
    pub cookie_secure: bool,

    pub oss_access_key_id: String,
    pub oss_access_key_secret: String,
    pub oss_bucket: String,
    /// Region endpoint host, without scheme.
    #[serde(default = "default_oss_endpoint")]
    pub oss_endpoint: String,
    #[serde(default = "default_signed_url_ttl")]
    pub signed_url_ttl_secs: u64,

    /// AI drafting is disabled when unset.
    pub gemini_api_key: Option<String>,
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,
    #[serde(default = "default_gemini_base_url")]
    pub gemini_base_url: String,

    /// Body limit for admin upload routes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_port() -> u16 {
    5000
}

fn default_true() -> bool {
    true
}

fn default_oss_endpoint() -> String {
    "oss-cn-beijing.aliyuncs.com".to_owned()
}

fn default_signed_url_ttl() -> u64 {
    1800
}

fn default_gemini_model() -> String {
    "gemini-flash-latest".to_owned()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_owned()
}

fn default_max_upload_bytes() -> usize {
    200 * 1024 * 1024
}

impl Config for PortalConfig {}

impl PortalConfig {
    pub fn cookie_options(&self) -> CookieOptions {
        CookieOptions {
            domain: self.cookie_domain.clone().filter(|d| !d.is_empty()),
            secure: self.cookie_secure,
        }
    }
}
