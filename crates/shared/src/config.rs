//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Statutory filing configuration.
    pub filing: FilingConfig,
}

/// Statutory filing configuration.
///
/// Holds the settings the tax-filing engine needs: the company's tax
/// registration number (used for form headers and the media-file name) and
/// the standard VAT rate used to classify output invoices.
#[derive(Debug, Clone, Deserialize)]
pub struct FilingConfig {
    /// Tax registration number of the filing entity (8 digits).
    pub tax_registration_number: String,
    /// Standard VAT rate as a decimal fraction (e.g., 0.05 for 5%).
    #[serde(default = "default_vat_rate")]
    pub vat_rate: Decimal,
}

fn default_vat_rate() -> Decimal {
    // 5% standard rate
    Decimal::new(5, 2)
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("TABULA")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_vat_rate() {
        assert_eq!(default_vat_rate(), dec!(0.05));
    }

    #[test]
    fn test_load_from_environment() {
        temp_env::with_vars(
            [
                ("TABULA_FILING__TAX_REGISTRATION_NUMBER", Some("12345678")),
                ("TABULA_FILING__VAT_RATE", Some("0.05")),
            ],
            || {
                let config = AppConfig::load().expect("config should load from env");
                assert_eq!(config.filing.tax_registration_number, "12345678");
                assert_eq!(config.filing.vat_rate, dec!(0.05));
            },
        );
    }

    #[test]
    fn test_missing_registration_number_fails() {
        temp_env::with_vars_unset(["TABULA_FILING__TAX_REGISTRATION_NUMBER"], || {
            assert!(AppConfig::load().is_err());
        });
    }
}
