use std::env;

/// `toLocaleString()` layout for en-US, e.g. `3/14/2025, 4:05:09 PM`
pub const DEFAULT_RETURNED_AT_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

pub const DEFAULT_LOG_FILTER: &str = "rust_lib_borrowease=info";

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub returned_at_format: String,
    pub log_filter: String,
    pub seed_demo: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: default_database_url("default"),
            returned_at_format: DEFAULT_RETURNED_AT_FORMAT.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            seed_demo: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let profile = env::var("PROFILE").unwrap_or_else(|_| "default".to_string());

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| default_database_url(&profile));

        Self {
            database_url,
            returned_at_format: env::var("RETURNED_AT_FORMAT")
                .ok()
                .filter(|f| !f.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_RETURNED_AT_FORMAT.to_string()),
            log_filter: env::var("LOG_FILTER")
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string()),
            seed_demo: env::var("SEED_DEMO").is_ok(),
        }
    }
}

fn default_database_url(profile: &str) -> String {
    if profile == "default" {
        "sqlite://borrowease.db?mode=rwc".to_string()
    } else {
        format!("sqlite://borrowease_{}.db?mode=rwc", profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_database_url_per_profile() {
        assert_eq!(
            default_database_url("default"),
            "sqlite://borrowease.db?mode=rwc"
        );
        assert_eq!(
            default_database_url("school"),
            "sqlite://borrowease_school.db?mode=rwc"
        );
    }

    #[test]
    fn test_default_returned_at_format_matches_locale_string() {
        let ts = chrono::NaiveDate::from_ymd_opt(2025, 3, 14)
            .unwrap()
            .and_hms_opt(16, 5, 9)
            .unwrap();
        assert_eq!(
            ts.format(DEFAULT_RETURNED_AT_FORMAT).to_string(),
            "3/14/2025, 4:05:09 PM"
        );
    }
}
