//! Basket configuration

use clap::Parser;
use jiff::SignedDuration;

/// Cookie name baskets are persisted under unless configured otherwise.
pub const DEFAULT_COOKIE_NAME: &str = "mindsMarketBasket";

/// Path persisted baskets are visible on unless configured otherwise.
pub const DEFAULT_COOKIE_PATH: &str = "/";

/// How long a saved basket lives for unless configured otherwise.
pub const DEFAULT_TTL_SECONDS: u32 = 360;

/// Basket persistence configuration
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "market", about = "Market basket persistence settings", long_about = None)]
pub struct BasketConfig {
    /// Name prefix for persisted basket values
    #[arg(long, env = "BASKET_COOKIE_NAME", default_value = DEFAULT_COOKIE_NAME)]
    pub cookie_name: String,

    /// Path persisted basket values are visible on
    #[arg(long, env = "BASKET_COOKIE_PATH", default_value = DEFAULT_COOKIE_PATH)]
    pub cookie_path: String,

    /// Seconds a saved basket lives for
    #[arg(
        long,
        env = "BASKET_TTL_SECONDS",
        default_value_t = DEFAULT_TTL_SECONDS,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub ttl_seconds: u32,
}

impl BasketConfig {
    /// Load configuration from the environment.
    ///
    /// The host process's own arguments are never parsed.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse_from([env!("CARGO_PKG_NAME")])
    }

    /// Lifetime of a saved basket, never shorter than one second.
    #[must_use]
    pub fn ttl(&self) -> SignedDuration {
        SignedDuration::from_secs(i64::from(self.ttl_seconds.max(1)))
    }
}

impl Default for BasketConfig {
    fn default() -> Self {
        Self {
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            cookie_path: DEFAULT_COOKIE_PATH.to_string(),
            ttl_seconds: DEFAULT_TTL_SECONDS,
        }
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn default_matches_legacy_cookie() {
        let config = BasketConfig::default();

        assert_eq!(config.cookie_name, "mindsMarketBasket");
        assert_eq!(config.cookie_path, "/");
        assert_eq!(config.ttl(), SignedDuration::from_secs(360));
    }

    #[test]
    #[serial]
    fn arguments_override_defaults() -> TestResult {
        let config = BasketConfig::try_parse_from([
            "market",
            "--cookie-name",
            "basket",
            "--ttl-seconds",
            "60",
        ])?;

        assert_eq!(config.cookie_name, "basket");
        assert_eq!(config.ttl(), SignedDuration::from_secs(60));

        Ok(())
    }

    #[test]
    #[serial]
    fn zero_ttl_argument_is_rejected() {
        let result = BasketConfig::try_parse_from(["market", "--ttl-seconds", "0"]);

        assert!(result.is_err(), "expected zero ttl to be rejected");
    }

    #[test]
    fn zero_ttl_field_is_raised_to_one_second() {
        let config = BasketConfig {
            ttl_seconds: 0,
            ..BasketConfig::default()
        };

        assert_eq!(config.ttl(), SignedDuration::from_secs(1));
    }

    #[test]
    #[serial]
    fn load_reads_environment_only() -> TestResult {
        // SAFETY: serialised with every other test touching the environment.
        unsafe {
            std::env::set_var("BASKET_TTL_SECONDS", "90");
        }

        let loaded = BasketConfig::load();

        // SAFETY: as above.
        unsafe {
            std::env::remove_var("BASKET_TTL_SECONDS");
        }

        assert_eq!(loaded?.ttl(), SignedDuration::from_secs(90));

        Ok(())
    }
}
