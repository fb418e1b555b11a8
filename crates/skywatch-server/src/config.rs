//! Server configuration from environment.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use skywatch_upstream::BasicAuth;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub aircraft_table_path: PathBuf,
    pub opensky_url: String,
    pub opensky_username: Option<String>,
    pub opensky_password: Option<String>,
    pub opensky_timeout: Duration,
    pub aviationstack_url: String,
    /// Metadata API access key. There is no built-in fallback.
    pub aviationstack_api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            server_port: env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5000),
            aircraft_table_path: env::var("AIRCRAFT_TABLE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data/aircraft_reference.csv")),
            opensky_url: env::var("OPENSKY_URL")
                .unwrap_or_else(|_| "https://opensky-network.org/api".to_string()),
            opensky_username: non_empty_var("OPENSKY_USERNAME"),
            opensky_password: non_empty_var("OPENSKY_PASSWORD"),
            opensky_timeout: Duration::from_secs(
                env::var("OPENSKY_TIMEOUT_S")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(10),
            ),
            aviationstack_url: env::var("AVIATIONSTACK_URL")
                .unwrap_or_else(|_| "http://api.aviationstack.com/v1".to_string()),
            aviationstack_api_key: non_empty_var("AVIATIONSTACK_API_KEY"),
        }
    }

    /// Basic auth for the state-vector API, when both halves are configured.
    pub fn opensky_auth(&self) -> Option<BasicAuth> {
        match (&self.opensky_username, &self.opensky_password) {
            (Some(username), Some(password)) => Some(BasicAuth {
                username: username.clone(),
                password: password.clone(),
            }),
            _ => None,
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
