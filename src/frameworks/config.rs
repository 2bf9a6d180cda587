use std::{env, time::Duration};

use crate::interface_adapters::clients::config::{
    DEFAULT_SHEET_NAME, DEFAULT_SHEETS_API_BASE_URL, DEFAULT_TOKEN_URL, SheetsConfig,
};

// Runtime/server settings read from the process environment at startup.

fn env_var(key: &str) -> Option<String> {
    env::var(key).ok()
}

pub fn http_port() -> u16 {
    http_port_from(env_var)
}

pub fn sheets_http_timeout() -> Duration {
    sheets_http_timeout_from(env_var)
}

// Missing secrets are not fatal here; each spreadsheet call reports them.
pub fn sheets_config() -> SheetsConfig {
    sheets_config_from(env_var)
}

fn http_port_from(lookup: impl Fn(&str) -> Option<String>) -> u16 {
    lookup("FEST_SERVER_PORT")
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000)
}

fn sheets_http_timeout_from(lookup: impl Fn(&str) -> Option<String>) -> Duration {
    let millis = lookup("SHEETS_HTTP_TIMEOUT_MS")
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(10_000);
    Duration::from_millis(millis)
}

fn sheets_config_from(lookup: impl Fn(&str) -> Option<String>) -> SheetsConfig {
    let config = SheetsConfig::new(
        lookup("GOOGLE_SHEETS_ID"),
        lookup("GOOGLE_SHEETS_API_KEY"),
        lookup("GOOGLE_SERVICE_ACCOUNT_EMAIL"),
        lookup("GOOGLE_PRIVATE_KEY"),
    )
    .with_endpoints(
        lookup("SHEETS_API_BASE_URL").unwrap_or_else(|| DEFAULT_SHEETS_API_BASE_URL.to_string()),
        lookup("GOOGLE_TOKEN_URL").unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
    );

    SheetsConfig {
        sheet_name: lookup("SHEET_NAME").unwrap_or_else(|| DEFAULT_SHEET_NAME.to_string()),
        ..config
    }
}
