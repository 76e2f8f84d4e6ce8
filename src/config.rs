use config::{Config, ConfigError, Environment, File};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationError};

/// Default values for configuration
const DEFAULT_REORDER_LEVEL: i32 = 5;
const DEFAULT_CURRENCY: &str = "USD";
const CONFIG_FILE: &str = "config/domain";
const ENV_PREFIX: &str = "COMMERCE";

/// Catalog-wide defaults applied to newly created entities.
///
/// Every field has a hard default matching the entity defaults, so the
/// configuration file and environment are both optional.
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct DomainConfig {
    /// Reorder threshold assigned to products that do not specify one.
    #[serde(default = "default_reorder_level")]
    #[validate(range(min = 0, message = "Reorder level cannot be negative"))]
    pub default_reorder_level: i32,

    /// Tax rate assigned to products that do not specify one.
    #[serde(default)]
    #[validate(custom = "validate_tax_rate")]
    pub default_tax_rate: Decimal,

    /// ISO currency code all monetary values are denominated in.
    #[serde(default = "default_currency")]
    #[validate(length(min = 3, max = 3, message = "Currency must be a 3-letter code"))]
    pub currency: String,
}

impl Default for DomainConfig {
    fn default() -> Self {
        Self {
            default_reorder_level: DEFAULT_REORDER_LEVEL,
            default_tax_rate: Decimal::ZERO,
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

/// Errors raised while loading or validating the configuration.
#[derive(Debug, Error)]
pub enum DomainConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(#[from] validator::ValidationErrors),
}

impl DomainConfig {
    /// Loads configuration from the optional `config/domain` file, overlaid
    /// with `COMMERCE_`-prefixed environment variables.
    pub fn load() -> Result<Self, DomainConfigError> {
        let cfg = Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        let domain_config: DomainConfig = cfg.try_deserialize()?;
        domain_config.validate()?;

        tracing::info!(
            default_reorder_level = domain_config.default_reorder_level,
            default_tax_rate = %domain_config.default_tax_rate,
            currency = %domain_config.currency,
            "domain configuration loaded"
        );

        Ok(domain_config)
    }
}

fn default_reorder_level() -> i32 {
    DEFAULT_REORDER_LEVEL
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn validate_tax_rate(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO || *value > Decimal::ONE {
        return Err(ValidationError::new("Tax rate must be between 0.0 and 1.0"));
    }
    Ok(())
}
