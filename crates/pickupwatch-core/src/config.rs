use crate::app_config::AppConfig;
use crate::ConfigError;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid (all variables have defaults).
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for
/// testing or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup — no
/// `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var)
            .map(|v| v.trim().to_string())
            .unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let non_empty = |var: &str, default: &str| -> Result<String, ConfigError> {
        let raw = or_default(var, default);
        if raw.is_empty() {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        Ok(raw)
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        match raw.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            _ => Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("expected a boolean, got \"{raw}\""),
            }),
        }
    };

    let sku = non_empty("TARGET_SKU", "MFYQ4KH/A")?;
    let seed_store = non_empty("SEED_STORE", "R764")?;
    let search_nearby = parse_bool("SEARCH_NEARBY", "true")?;
    let pickup_api_base = non_empty("PICKUP_API_BASE", "https://www.apple.com/kr")?;

    let poll_min_secs = parse_u64("POLL_MIN", "10")?;
    let poll_max_secs = parse_u64("POLL_MAX", "15")?;
    if poll_min_secs > poll_max_secs {
        return Err(ConfigError::InvalidEnvVar {
            var: "POLL_MIN".to_string(),
            reason: format!("must be <= POLL_MAX ({poll_min_secs} > {poll_max_secs})"),
        });
    }

    let log_path = PathBuf::from(or_default("LOG_PATH", "availability_log.csv"));

    let notify_device_key = optional("NOTIFY_DEVICE_KEY");
    let notify_server_base = or_default("NOTIFY_SERVER_BASE", "https://api.day.app")
        .trim_end_matches('/')
        .to_string();
    let notify_group = or_default("NOTIFY_GROUP", "pickupwatch");
    let notify_sound = or_default("NOTIFY_SOUND", "minuet");
    let notify_click_url = optional("NOTIFY_CLICK_URL");

    let market_tz_raw = or_default("MARKET_TZ", "Asia/Seoul");
    let market_tz = market_tz_raw
        .parse::<chrono_tz::Tz>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: "MARKET_TZ".to_string(),
            reason: e.to_string(),
        })?;

    let request_timeout_secs = parse_u64("REQUEST_TIMEOUT_SECS", "20")?;
    let user_agent = non_empty("USER_AGENT", DEFAULT_USER_AGENT)?;
    let log_level = or_default("LOG_LEVEL", "info");

    Ok(AppConfig {
        sku,
        seed_store,
        search_nearby,
        pickup_api_base,
        poll_min_secs,
        poll_max_secs,
        log_path,
        notify_device_key,
        notify_server_base,
        notify_group,
        notify_sound,
        notify_click_url,
        market_tz,
        request_timeout_secs,
        user_agent,
        log_level,
    })
}
