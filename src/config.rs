use std::{env, time::Duration};

use crate::executor::ExecuteOptions;

pub struct Config {
    pub port: u16,
    /// Default proxy base for executions that do not name one.
    pub proxy: Option<String>,
    pub timeout_ms: u64,
    pub allow_local_files: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8082),
            proxy: env::var("CURL_PROXY").ok().filter(|p| !p.is_empty()),
            timeout_ms: env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(30_000),
            allow_local_files: env::var("ALLOW_LOCAL_FILES")
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        }
    }

    pub fn execute_options(&self) -> ExecuteOptions {
        ExecuteOptions {
            proxy: self.proxy.clone(),
            timeout: Duration::from_millis(self.timeout_ms),
            allow_local_files: self.allow_local_files,
        }
    }
}
