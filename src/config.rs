use rust_decimal::Decimal;
use std::path::PathBuf;

/// Default collector commission: 5% of the settled coupon's total
pub const DEFAULT_COMMISSION_RATE: Decimal = Decimal::from_parts(5, 0, 0, false, 2);
pub const DEFAULT_DUE_DAY: u32 = 10;

/// Billing rules the ledger components read
#[derive(Debug, Clone, PartialEq)]
pub struct BillingPolicy {
    pub commission_rate: Decimal,
    pub due_day: u32,
}

impl Default for BillingPolicy {
    fn default() -> Self {
        Self {
            commission_rate: DEFAULT_COMMISSION_RATE,
            due_day: DEFAULT_DUE_DAY,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,

    // JSON seed with categories, activities, zones, lockers and members
    pub catalog_path: Option<PathBuf>,

    pub billing: BillingPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        // Load .env file if it exists (for local development)
        let _ = dotenvy::dotenv();

        let config = config::Config::builder()
            .add_source(config::Environment::default().separator("__"))
            .build()?;

        let commission_rate = match config.get_string("commission_rate") {
            Ok(raw) => raw.parse::<Decimal>().map_err(|e| {
                config::ConfigError::Message(format!("invalid commission_rate {raw:?}: {e}"))
            })?,
            Err(_) => DEFAULT_COMMISSION_RATE,
        };
        if commission_rate.is_sign_negative() || commission_rate > Decimal::ONE {
            return Err(config::ConfigError::Message(format!(
                "commission_rate must be between 0 and 1, got {commission_rate}"
            )));
        }

        let due_day = config.get::<u32>("due_day").unwrap_or(DEFAULT_DUE_DAY);
        if !(1..=28).contains(&due_day) {
            return Err(config::ConfigError::Message(format!(
                "due_day must be between 1 and 28, got {due_day}"
            )));
        }

        Ok(Self {
            host: config.get("host").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: config.get("port")?,
            catalog_path: config.get_string("catalog_path").ok().map(PathBuf::from),
            billing: BillingPolicy {
                commission_rate,
                due_day,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_commission_is_five_percent() {
        assert_eq!(DEFAULT_COMMISSION_RATE, Decimal::new(5, 2));
        assert_eq!(BillingPolicy::default().due_day, 10);
    }
}
