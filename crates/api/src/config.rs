use chrono_tz::Tz;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long shutdown waits for background tasks, in seconds (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Base URL of the salon backend service.
    pub backend_base_url: String,
    /// Base URL of the booking partner API.
    pub partner_base_url: String,
    /// API key sent to the booking partner on every request.
    pub partner_api_key: String,
    /// Timeout for a single upstream call, in seconds (default: `15`).
    pub upstream_timeout_secs: u64,
    /// IANA zone of the salon's wall clock (default: `UTC`).
    pub salon_timezone: Tz,
    /// Interval between open/closed re-checks, in seconds (default: `60`).
    pub open_status_refresh_secs: u64,
    /// Largest accepted request body, profile photos included (default: 5 MiB).
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                    |
    /// |----------------------------|----------------------------|
    /// | `HOST`                     | `0.0.0.0`                  |
    /// | `PORT`                     | `3000`                     |
    /// | `CORS_ORIGINS`             | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`    | `30`                       |
    /// | `BACKEND_BASE_URL`         | `http://localhost:4000`    |
    /// | `PARTNER_BASE_URL`         | `http://localhost:4100`    |
    /// | `PARTNER_API_KEY`          | empty                      |
    /// | `UPSTREAM_TIMEOUT_SECS`    | `15`                       |
    /// | `SALON_TIMEZONE`           | `UTC`                      |
    /// | `OPEN_STATUS_REFRESH_SECS` | `60`                       |
    /// | `MAX_UPLOAD_BYTES`         | `5242880`                  |
    ///
    /// # Panics
    ///
    /// Panics on unparseable numbers or an unknown time zone name, so that
    /// misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = env_or("HOST", "0.0.0.0");
        let port: u16 = env_or("PORT", "3000")
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = env_or("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = env_or("REQUEST_TIMEOUT_SECS", "30")
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");
        let shutdown_timeout_secs: u64 = env_or("SHUTDOWN_TIMEOUT_SECS", "30")
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let backend_base_url = env_or("BACKEND_BASE_URL", "http://localhost:4000");
        let partner_base_url = env_or("PARTNER_BASE_URL", "http://localhost:4100");
        let partner_api_key = env_or("PARTNER_API_KEY", "");
        if partner_api_key.is_empty() {
            tracing::warn!("PARTNER_API_KEY is not set; booking partner calls will be rejected");
        }

        let upstream_timeout_secs: u64 = env_or("UPSTREAM_TIMEOUT_SECS", "15")
            .parse()
            .expect("UPSTREAM_TIMEOUT_SECS must be a valid u64");
        let salon_timezone: Tz = env_or("SALON_TIMEZONE", "UTC")
            .trim()
            .parse()
            .expect("SALON_TIMEZONE must be an IANA time zone name");
        let open_status_refresh_secs: u64 = env_or("OPEN_STATUS_REFRESH_SECS", "60")
            .parse()
            .expect("OPEN_STATUS_REFRESH_SECS must be a valid u64");
        let max_upload_bytes: usize = env_or("MAX_UPLOAD_BYTES", "5242880")
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            backend_base_url,
            partner_base_url,
            partner_api_key,
            upstream_timeout_secs,
            salon_timezone,
            open_status_refresh_secs,
            max_upload_bytes,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
