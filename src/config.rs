//! Runtime configuration read from the environment.

use std::env;

use chrono::{Local, NaiveDate};
use tracing::warn;

use crate::scheduler::{IdGenerator, SequentialIds, UuidIds};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdStrategy {
    Uuid,
    Sequential,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub id_strategy: IdStrategy,
    /// Fixed "today" for splitting upcoming and past visits.
    pub today_override: Option<NaiveDate>,
    pub seed_history: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            id_strategy: IdStrategy::Uuid,
            today_override: None,
            seed_history: true,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let id_strategy = match lookup("VIDAMATERNA_ID_STRATEGY").as_deref().map(str::trim) {
            None | Some("") => defaults.id_strategy,
            Some(value) if value.eq_ignore_ascii_case("uuid") => IdStrategy::Uuid,
            Some(value) if value.eq_ignore_ascii_case("sequential") => IdStrategy::Sequential,
            Some(value) => {
                warn!("VIDAMATERNA_ID_STRATEGY '{}' not recognised, using uuid", value);
                defaults.id_strategy
            }
        };

        let today_override = lookup("VIDAMATERNA_TODAY").and_then(|value| {
            NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
                .map_err(|_| warn!("VIDAMATERNA_TODAY '{}' is not YYYY-MM-DD, ignoring", value))
                .ok()
        });

        let seed_history = match lookup("VIDAMATERNA_SEED_HISTORY") {
            None => defaults.seed_history,
            Some(value) => match value.trim().to_lowercase().as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" => false,
                _ => {
                    warn!("VIDAMATERNA_SEED_HISTORY '{}' not recognised, seeding", value);
                    defaults.seed_history
                }
            },
        };

        AppConfig {
            id_strategy,
            today_override,
            seed_history,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.today_override
            .unwrap_or_else(|| Local::now().date_naive())
    }

    pub fn id_generator(&self) -> Box<dyn IdGenerator> {
        match self.id_strategy {
            IdStrategy::Uuid => Box::new(UuidIds),
            IdStrategy::Sequential => Box::new(SequentialIds::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = config_from(&[]);
        assert_eq!(config.id_strategy, IdStrategy::Uuid);
        assert!(config.today_override.is_none());
        assert!(config.seed_history);
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("VIDAMATERNA_ID_STRATEGY", "Sequential"),
            ("VIDAMATERNA_TODAY", "2024-12-01"),
            ("VIDAMATERNA_SEED_HISTORY", "false"),
        ]);
        assert_eq!(config.id_strategy, IdStrategy::Sequential);
        assert_eq!(config.today(), NaiveDate::from_ymd_opt(2024, 12, 1).unwrap());
        assert!(!config.seed_history);

        let mut ids = config.id_generator();
        assert_eq!(ids.next_id(), "apt-1");
    }

    #[test]
    fn bad_values_fall_back() {
        let config = config_from(&[
            ("VIDAMATERNA_ID_STRATEGY", "snowflake"),
            ("VIDAMATERNA_TODAY", "tomorrow"),
            ("VIDAMATERNA_SEED_HISTORY", "maybe"),
        ]);
        assert_eq!(config.id_strategy, IdStrategy::Uuid);
        assert!(config.today_override.is_none());
        assert!(config.seed_history);
    }
}
