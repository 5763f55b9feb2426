use std::net::SocketAddr;

use crate::app_config::{AppConfig, ProviderEndpoint, ProviderKeys};
use crate::ConfigError;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GROK_BASE_URL: &str = "https://api.x.ai/v1";
pub const DEFAULT_READER_BASE_URL: &str = "https://r.jina.ai";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let url = |var: &str, default: &str| -> Result<String, ConfigError> {
        let raw = or_default(var, default);
        if raw.starts_with("http://") || raw.starts_with("https://") {
            Ok(raw.trim_end_matches('/').to_string())
        } else {
            Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("expected an http(s) URL, got '{raw}'"),
            })
        }
    };

    let bind_addr = parse_addr("SALESCOPY_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("SALESCOPY_LOG_LEVEL", "info");

    let keys = ProviderKeys {
        openai: optional("OPENAI_API_KEY"),
        gemini: optional("GEMINI_API_KEY"),
        grok: optional("XAI_API_KEY"),
    };

    let openai = ProviderEndpoint {
        base_url: url("SALESCOPY_OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL)?,
        model: or_default("SALESCOPY_OPENAI_MODEL", "gpt-4o-mini"),
    };
    let gemini = ProviderEndpoint {
        base_url: url("SALESCOPY_GEMINI_BASE_URL", DEFAULT_GEMINI_BASE_URL)?,
        model: or_default("SALESCOPY_GEMINI_MODEL", "gemini-1.5-flash"),
    };
    let grok = ProviderEndpoint {
        base_url: url("SALESCOPY_GROK_BASE_URL", DEFAULT_GROK_BASE_URL)?,
        model: or_default("SALESCOPY_GROK_MODEL", "grok-2-latest"),
    };

    let reader_base_url = url("SALESCOPY_READER_BASE_URL", DEFAULT_READER_BASE_URL)?;
    let reader_max_chars = parse_usize("SALESCOPY_READER_MAX_CHARS", "10000")?;
    let reader_timeout_secs = parse_u64("SALESCOPY_READER_TIMEOUT_SECS", "30")?;
    let provider_timeout_secs = parse_u64("SALESCOPY_PROVIDER_TIMEOUT_SECS", "60")?;
    let rate_limit_per_minute = parse_usize("SALESCOPY_RATE_LIMIT_PER_MINUTE", "60")?;

    for (var, is_zero) in [
        ("SALESCOPY_READER_MAX_CHARS", reader_max_chars == 0),
        ("SALESCOPY_READER_TIMEOUT_SECS", reader_timeout_secs == 0),
        ("SALESCOPY_PROVIDER_TIMEOUT_SECS", provider_timeout_secs == 0),
        ("SALESCOPY_RATE_LIMIT_PER_MINUTE", rate_limit_per_minute == 0),
    ] {
        if is_zero {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
    }

    Ok(AppConfig {
        bind_addr,
        log_level,
        keys,
        openai,
        gemini,
        grok,
        reader_base_url,
        reader_max_chars,
        reader_timeout_secs,
        provider_timeout_secs,
        rate_limit_per_minute,
    })
}
