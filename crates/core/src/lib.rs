pub mod api;
pub mod domain;

pub mod config {
    /// Compiled default for the analysis service address;
    /// `ANALYSIS_API_BASE_URL` overrides it.
    pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub analysis_api_base_url: Option<String>,
        pub analysis_api_timeout_secs: Option<u64>,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                analysis_api_base_url: std::env::var("ANALYSIS_API_BASE_URL").ok(),
                analysis_api_timeout_secs: std::env::var("ANALYSIS_API_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse::<u64>().ok()),
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
            })
        }

        pub fn base_url(&self) -> &str {
            self.analysis_api_base_url
                .as_deref()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(DEFAULT_BASE_URL)
        }
    }
}
