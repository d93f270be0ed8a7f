//! Server configuration, loaded from environment variables at startup.

/// Runtime configuration for agora-server.
///
/// Every field except the auth service settings has a default so a local
/// server only needs `SUPABASE_URL` and `SUPABASE_KEY`.
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP address to bind (default: `"0.0.0.0:8000"`).
    pub bind_address: String,

    /// sqlx-compatible SQLite URL (default: `"sqlite://agora.db"`).
    pub database_url: String,

    /// `tracing` filter string, e.g. `"info"` or `"debug,tower_http=warn"`.
    pub log_level: String,

    /// When `true`, emit log records as newline-delimited JSON.
    pub log_json: bool,

    /// Comma-separated list of allowed CORS origins. `None` allows any origin;
    /// set `AGORA_CORS_ORIGINS` to `*` or an empty value to get it.
    pub cors_allowed_origins: Option<String>,

    /// Mount the Swagger UI and the OpenAPI document.
    pub enable_swagger: bool,

    /// Base URL of the hosted auth service, e.g. `https://xyz.supabase.co`.
    pub auth_url: Option<String>,

    /// Public (anon) key sent as the `apikey` header to the auth service.
    pub auth_public_key: Option<String>,

    /// Per-provider API keys handed to the completion client.
    pub providers: ProviderKeys,
}

/// API keys for the LLM providers reachable through the gateway.
///
/// A missing key is not an error at startup: calls to that provider fail
/// when they are made.
#[derive(Debug, Clone, Default)]
pub struct ProviderKeys {
    pub openai: Option<String>,
    pub anthropic: Option<String>,
    pub gemini: Option<String>,
    pub groq: Option<String>,
}

impl ProviderKeys {
    pub fn is_empty(&self) -> bool {
        self.openai.is_none() && self.anthropic.is_none() && self.gemini.is_none() && self.groq.is_none()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_owned(),
            database_url: "sqlite://agora.db".to_owned(),
            log_level: "info".to_owned(),
            log_json: false,
            cors_allowed_origins: Some("http://localhost:3000".to_owned()),
            enable_swagger: true,
            auth_url: None,
            auth_public_key: None,
            providers: ProviderKeys::default(),
        }
    }
}

impl Config {
    /// Build [`Config`] from environment variables, falling back to defaults.
    ///
    /// A `.env` file in the working directory is loaded first when present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        let defaults = Self::default();
        Self {
            bind_address: env_or("AGORA_BIND", &defaults.bind_address),
            database_url: env_or("AGORA_DATABASE_URL", &defaults.database_url),
            log_level: env_or("AGORA_LOG", &defaults.log_level),
            log_json: parse_bool("AGORA_LOG_JSON", defaults.log_json),
            cors_allowed_origins: cors_origins(
                std::env::var("AGORA_CORS_ORIGINS").ok(),
                defaults.cors_allowed_origins,
            ),
            enable_swagger: parse_bool("AGORA_ENABLE_SWAGGER", defaults.enable_swagger),
            auth_url: env_opt("SUPABASE_URL"),
            auth_public_key: env_opt("SUPABASE_KEY"),
            providers: ProviderKeys {
                openai: env_opt("OPENAI_API_KEY"),
                anthropic: env_opt("ANTHROPIC_API_KEY"),
                gemini: env_opt("GEMINI_API_KEY"),
                groq: env_opt("GROQ_API_KEY"),
            },
        }
    }
}

// ── private helpers ──────────────────────────────────────────────────────────

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Returns `None` for unset and blank variables alike.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// Unset keeps the default list; blank or `*` allows any origin.
fn cors_origins(raw: Option<String>, default: Option<String>) -> Option<String> {
    match raw.as_deref().map(str::trim) {
        None => default,
        Some("") | Some("*") => None,
        Some(list) => Some(list.to_owned()),
    }
}

fn parse_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(default)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults_allow_local_frontend() {
        let cfg = Config::default();
        assert_eq!(cfg.cors_allowed_origins.as_deref(), Some("http://localhost:3000"));
        assert_eq!(cfg.bind_address, "0.0.0.0:8000");
        assert!(cfg.auth_url.is_none());
    }

    #[test]
    fn blank_variables_are_treated_as_unset() {
        // SAFETY: the key is unique to this test.
        unsafe { std::env::set_var("AGORA_TEST_BLANK_KEY", "   ") };
        assert_eq!(env_opt("AGORA_TEST_BLANK_KEY"), None);
        unsafe { std::env::remove_var("AGORA_TEST_BLANK_KEY") };
    }

    #[test]
    fn cors_wildcard_and_blank_allow_any_origin() {
        let default = Config::default().cors_allowed_origins;
        assert_eq!(cors_origins(None, default.clone()), default);
        assert_eq!(cors_origins(Some("*".into()), default.clone()), None);
        assert_eq!(cors_origins(Some("  ".into()), default.clone()), None);
        assert_eq!(
            cors_origins(Some(" https://a.test,https://b.test ".into()), default),
            Some("https://a.test,https://b.test".to_owned())
        );
    }
}
