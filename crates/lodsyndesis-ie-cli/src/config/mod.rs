//! Configuration loading and resolution.

use lodsyndesis_ie::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_MS};

/// Environment variable overriding the service endpoint.
pub const ENDPOINT_ENV: &str = "LODSYNDESIS_IE_URL";

/// Environment variable overriding the request timeout in milliseconds.
pub const TIMEOUT_ENV: &str = "LODSYNDESIS_IE_TIMEOUT_MS";

/// Resolve the service endpoint: flag, then environment, then the public API.
pub fn resolve_endpoint(explicit: Option<&str>) -> String {
    pick_endpoint(explicit, std::env::var(ENDPOINT_ENV).ok())
}

/// Resolve the request timeout: flag, then environment, then the default.
pub fn resolve_timeout_ms(explicit: Option<u64>) -> u64 {
    pick_timeout(explicit, std::env::var(TIMEOUT_ENV).ok())
}

/// Build the client configuration from CLI flags and the environment.
pub fn resolve_client_config(endpoint: Option<&str>, timeout_ms: Option<u64>) -> ClientConfig {
    ClientConfig {
        base_url: resolve_endpoint(endpoint),
        timeout_ms: resolve_timeout_ms(timeout_ms),
    }
}

fn pick_endpoint(explicit: Option<&str>, env: Option<String>) -> String {
    if let Some(url) = explicit {
        return url.to_string();
    }

    match env {
        Some(url) if !url.trim().is_empty() => url,
        _ => DEFAULT_BASE_URL.to_string(),
    }
}

fn pick_timeout(explicit: Option<u64>, env: Option<String>) -> u64 {
    if let Some(ms) = explicit {
        return ms;
    }

    match env.as_deref().map(str::trim).map(str::parse::<u64>) {
        Some(Ok(ms)) if ms > 0 => ms,
        Some(_) => {
            tracing::warn!("{TIMEOUT_ENV} is not a positive integer, using {DEFAULT_TIMEOUT_MS}");
            DEFAULT_TIMEOUT_MS
        }
        None => DEFAULT_TIMEOUT_MS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_precedence() {
        let env = Some("http://mirror.example/api".to_string());
        assert_eq!(pick_endpoint(Some("http://flag/api"), env.clone()), "http://flag/api");
        assert_eq!(pick_endpoint(None, env), "http://mirror.example/api");
        assert_eq!(pick_endpoint(None, None), DEFAULT_BASE_URL);
        assert_eq!(pick_endpoint(None, Some("  ".to_string())), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_timeout_precedence() {
        assert_eq!(pick_timeout(Some(1500), Some("9000".to_string())), 1500);
        assert_eq!(pick_timeout(None, Some(" 9000 ".to_string())), 9000);
        assert_eq!(pick_timeout(None, None), DEFAULT_TIMEOUT_MS);
    }

    #[test]
    fn test_timeout_garbage_falls_back() {
        assert_eq!(pick_timeout(None, Some("soon".to_string())), DEFAULT_TIMEOUT_MS);
        assert_eq!(pick_timeout(None, Some("0".to_string())), DEFAULT_TIMEOUT_MS);
    }
}
