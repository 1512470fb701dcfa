use rust_decimal::Decimal;
#[cfg(feature = "json-schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    confirmation::ConfirmationPollConfig,
    error::ConfigError,
    lifecycle::LoanTerms,
    primitives::{CollateralRatio, MAX_TERM_IN_PERIODS},
};

#[derive(Clone, Debug, Deserialize, Serialize)]
#[cfg_attr(feature = "json-schema", derive(JsonSchema))]
#[serde(deny_unknown_fields)]
pub struct MicroloanConfig {
    #[serde(default = "default_collateral_ratio")]
    pub collateral_ratio: Decimal,
    #[serde(default = "default_max_term_in_periods")]
    pub max_term_in_periods: u8,
    /// Percent of every payment kept by the platform.
    #[serde(default = "default_platform_fee_pct")]
    pub platform_fee_pct: Decimal,
    #[serde(default = "default_user_rejected_markers")]
    pub user_rejected_markers: Vec<String>,
    #[serde(default)]
    pub confirmation: ConfirmationPollConfig,
}

impl Default for MicroloanConfig {
    fn default() -> Self {
        MicroloanConfig {
            collateral_ratio: default_collateral_ratio(),
            max_term_in_periods: default_max_term_in_periods(),
            platform_fee_pct: default_platform_fee_pct(),
            user_rejected_markers: default_user_rejected_markers(),
            confirmation: ConfirmationPollConfig::default(),
        }
    }
}

impl MicroloanConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.loan_terms()?;
        if self.platform_fee_pct < Decimal::ZERO || self.platform_fee_pct > Decimal::ONE_HUNDRED {
            return Err(ConfigError::FeeOutOfRange(self.platform_fee_pct));
        }
        if self.platform_fee_pct * Decimal::from(self.max_term_in_periods) > Decimal::ONE_HUNDRED {
            return Err(ConfigError::BnplFeeOutOfRange {
                platform_fee_pct: self.platform_fee_pct,
                max_term_in_periods: self.max_term_in_periods,
            });
        }
        if self.confirmation.timeout.is_zero() || self.confirmation.initial_delay.is_zero() {
            return Err(ConfigError::EmptyConfirmationWindow);
        }
        Ok(())
    }

    pub fn loan_terms(&self) -> Result<LoanTerms, ConfigError> {
        let collateral_ratio = CollateralRatio::try_new(self.collateral_ratio)
            .map_err(|_| ConfigError::CollateralRatioBelowOne(self.collateral_ratio))?;
        if self.max_term_in_periods == 0 || self.max_term_in_periods > MAX_TERM_IN_PERIODS {
            return Err(ConfigError::MaxTermOutOfRange(self.max_term_in_periods));
        }
        Ok(LoanTerms {
            collateral_ratio,
            max_term_in_periods: self.max_term_in_periods,
        })
    }
}

fn default_collateral_ratio() -> Decimal {
    CollateralRatio::default().into_inner()
}

fn default_max_term_in_periods() -> u8 {
    MAX_TERM_IN_PERIODS
}

fn default_platform_fee_pct() -> Decimal {
    Decimal::ONE
}

fn default_user_rejected_markers() -> Vec<String> {
    vec![
        "cancelled transaction".to_string(),
        "rejected the request".to_string(),
    ]
}

#[cfg(test)]
mod test {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config: MicroloanConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.collateral_ratio, dec!(1.20));
        assert_eq!(config.max_term_in_periods, 6);
        assert_eq!(config.platform_fee_pct, dec!(1));
        assert_eq!(config.user_rejected_markers.len(), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_unknown_fields() {
        assert!(serde_json::from_str::<MicroloanConfig>(r#"{"interest_rate": 5}"#).is_err());
    }

    #[test]
    fn validate_rejects_bad_values() {
        let config = MicroloanConfig {
            collateral_ratio: dec!(0.9),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::CollateralRatioBelowOne(dec!(0.9)))
        );

        let config = MicroloanConfig {
            max_term_in_periods: 7,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::MaxTermOutOfRange(7)));

        let config = MicroloanConfig {
            platform_fee_pct: dec!(-1),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::FeeOutOfRange(dec!(-1))));
    }

    #[test]
    fn validate_bounds_fee_over_longest_term() {
        let config = MicroloanConfig {
            platform_fee_pct: dec!(20),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::BnplFeeOutOfRange {
                platform_fee_pct: dec!(20),
                max_term_in_periods: 6,
            })
        );

        let config = MicroloanConfig {
            platform_fee_pct: dec!(20),
            max_term_in_periods: 5,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[cfg(feature = "json-schema")]
    #[test]
    fn json_schema_describes_durations_as_seconds() {
        let schema = serde_json::to_value(schemars::schema_for!(MicroloanConfig)).unwrap();
        let poll = &schema["definitions"]["ConfirmationPollConfig"]["properties"];
        assert_eq!(poll["timeout"]["type"], "integer");
        assert_eq!(poll["initial_delay"]["type"], "integer");
    }

    #[test]
    fn loan_terms_follow_config() {
        let config: MicroloanConfig =
            serde_json::from_str(r#"{"collateral_ratio": "1.5", "max_term_in_periods": 3}"#)
                .unwrap();
        let terms = config.loan_terms().unwrap();
        assert_eq!(terms.collateral_ratio.into_inner(), dec!(1.5));
        assert_eq!(terms.max_term_in_periods, 3);
    }
}
