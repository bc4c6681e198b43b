use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::Path};

use crate::gap::LapMetric;
use crate::stint::StintStrategy;

/// Defaults for an analysis run, read from a JSON file.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub drivers: Vec<String>,
    pub metric: LapMetric,
    /// `None` picks the strategy from the columns present in the lap table
    pub stint_strategy: Option<StintStrategy>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            drivers: vec!["VER".to_string(), "HAM".to_string()],
            metric: LapMetric::LapTime,
            stint_strategy: None,
        }
    }
}

impl AnalyzerConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        Self::from_json(&data).with_context(|| format!("invalid config JSON in {}", path.display()))
    }

    pub fn from_json(data: &str) -> Result<Self> {
        Ok(serde_json::from_str(data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let cfg = AnalyzerConfig::from_json(r#"{ "metric": "sector2_time" }"#).unwrap();
        assert_eq!(cfg.metric, LapMetric::Sector2Time);
        assert_eq!(cfg.drivers, vec!["VER".to_string(), "HAM".to_string()]);
        assert_eq!(cfg.stint_strategy, None);
    }

    #[test]
    fn test_full_config() {
        let cfg = AnalyzerConfig::from_json(
            r#"{ "drivers": ["LEC"], "metric": "speed", "stint_strategy": "pit_time" }"#,
        )
        .unwrap();
        assert_eq!(cfg.drivers, vec!["LEC".to_string()]);
        assert_eq!(cfg.metric, LapMetric::Speed);
        assert_eq!(cfg.stint_strategy, Some(StintStrategy::PitTime));
    }

    #[test]
    fn test_config_accepts_cli_spellings() {
        let cfg = AnalyzerConfig::from_json(
            r#"{ "metric": "LapTime", "stint_strategy": "pit-time" }"#,
        )
        .unwrap();
        assert_eq!(cfg.metric, LapMetric::LapTime);
        assert_eq!(cfg.stint_strategy, Some(StintStrategy::PitTime));

        let cfg = AnalyzerConfig::from_json(r#"{ "metric": "Sector3Time" }"#).unwrap();
        assert_eq!(cfg.metric, LapMetric::Sector3Time);

        assert!(AnalyzerConfig::from_json(r#"{ "metric": "tyre_age" }"#).is_err());
    }

    #[test]
    fn test_metric_and_strategy_serialize_snake_case() {
        assert_eq!(serde_json::to_string(&LapMetric::Sector1Time).unwrap(), "\"sector1_time\"");
        assert_eq!(serde_json::to_string(&StintStrategy::PitTime).unwrap(), "\"pit_time\"");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = AnalyzerConfig::load("does/not/exist.json").unwrap_err();
        assert!(err.to_string().contains("failed to read config"));
    }
}
