#[cfg(feature = "json-schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use std::time::Duration;

/// Bounds on how long and how often a caller polls the ledger for a
/// submitted request to show up.
#[serde_with::serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(JsonSchema))]
#[serde(deny_unknown_fields)]
pub struct ConfirmationPollConfig {
    #[serde_as(as = "serde_with::DurationSeconds<u64>")]
    #[cfg_attr(feature = "json-schema", schemars(with = "u64"))]
    #[serde(default = "default_initial_delay")]
    pub initial_delay: Duration,
    #[serde_as(as = "serde_with::DurationSeconds<u64>")]
    #[cfg_attr(feature = "json-schema", schemars(with = "u64"))]
    #[serde(default = "default_max_delay")]
    pub max_delay: Duration,
    #[serde_as(as = "serde_with::DurationSeconds<u64>")]
    #[cfg_attr(feature = "json-schema", schemars(with = "u64"))]
    #[serde(default = "default_timeout")]
    pub timeout: Duration,
}

impl Default for ConfirmationPollConfig {
    fn default() -> Self {
        ConfirmationPollConfig {
            initial_delay: default_initial_delay(),
            max_delay: default_max_delay(),
            timeout: default_timeout(),
        }
    }
}

impl ConfirmationPollConfig {
    pub fn schedule(&self) -> PollSchedule {
        PollSchedule {
            next: self.initial_delay,
            max: self.max_delay,
            remaining: self.timeout,
        }
    }
}

fn default_initial_delay() -> Duration {
    Duration::from_secs(1)
}

fn default_max_delay() -> Duration {
    Duration::from_secs(16)
}

fn default_timeout() -> Duration {
    Duration::from_secs(120)
}

/// Delays to wait between successive polls. Doubles up to `max_delay` and
/// ends once the waits add up to `timeout`.
#[derive(Clone, Debug)]
pub struct PollSchedule {
    next: Duration,
    max: Duration,
    remaining: Duration,
}

impl Iterator for PollSchedule {
    type Item = Duration;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next.is_zero() || self.max.is_zero() || self.remaining.is_zero() {
            return None;
        }
        let delay = self.next.min(self.max).min(self.remaining);
        self.remaining -= delay;
        self.next = self
            .next
            .checked_mul(2)
            .map_or(self.max, |doubled| doubled.min(self.max));
        Some(delay)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn secs(delays: impl Iterator<Item = Duration>) -> Vec<u64> {
        delays.map(|d| d.as_secs()).collect()
    }

    #[test]
    fn default_schedule_backs_off_until_timeout() {
        let delays = secs(ConfirmationPollConfig::default().schedule());
        assert_eq!(delays, vec![1, 2, 4, 8, 16, 16, 16, 16, 16, 16, 9]);
        assert_eq!(delays.iter().sum::<u64>(), 120);
    }

    #[test]
    fn zero_delay_yields_nothing() {
        let config = ConfirmationPollConfig {
            initial_delay: Duration::ZERO,
            ..Default::default()
        };
        assert_eq!(config.schedule().count(), 0);
    }

    #[test]
    fn deserializes_seconds() {
        let config: ConfirmationPollConfig =
            serde_json::from_str(r#"{"initial_delay": 2, "timeout": 10}"#).unwrap();
        assert_eq!(config.max_delay, Duration::from_secs(16));
        assert_eq!(secs(config.schedule()), vec![2, 4, 4]);
    }
}
