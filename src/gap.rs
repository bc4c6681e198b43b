use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::error::{AnalysisError, Result};
use crate::laps;
use crate::types::{GapRow, LapRecord};

/// Per-lap value that can be charted across drivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LapMetric {
    LapTime,
    Speed,
    Sector1Time,
    Sector2Time,
    Sector3Time,
}

impl LapMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            LapMetric::LapTime => "lap_time",
            LapMetric::Speed => "speed",
            LapMetric::Sector1Time => "sector1_time",
            LapMetric::Sector2Time => "sector2_time",
            LapMetric::Sector3Time => "sector3_time",
        }
    }

    pub fn value(&self, lap: &LapRecord) -> Option<f64> {
        match self {
            LapMetric::LapTime => lap.lap_time_s,
            LapMetric::Speed => lap.speed_trap_kph,
            LapMetric::Sector1Time => lap.sector1_time_s,
            LapMetric::Sector2Time => lap.sector2_time_s,
            LapMetric::Sector3Time => lap.sector3_time_s,
        }
    }
}

impl FromStr for LapMetric {
    type Err = AnalysisError;

    /// Accepts `LapTime`, `lap_time`, `lap time` and so on.
    fn from_str(s: &str) -> Result<Self> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "laptime" => Ok(LapMetric::LapTime),
            "speed" | "speedtrap" => Ok(LapMetric::Speed),
            "sector1time" | "sector1" => Ok(LapMetric::Sector1Time),
            "sector2time" | "sector2" => Ok(LapMetric::Sector2Time),
            "sector3time" | "sector3" => Ok(LapMetric::Sector3Time),
            _ => Err(AnalysisError::UnknownMetric(s.to_string())),
        }
    }
}

impl TryFrom<String> for LapMetric {
    type Error = AnalysisError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<LapMetric> for String {
    fn from(m: LapMetric) -> Self {
        m.as_str().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricPoint {
    pub lap_number: u32,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverSeries {
    pub driver: String,
    pub points: Vec<MetricPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricComparison {
    pub metric: LapMetric,
    pub series: Vec<DriverSeries>,
    /// Selected drivers that produced no points
    pub missing: Vec<String>,
}

/// Gap of every timed lap to the fastest lap time set on the same lap number.
///
/// Laps are grouped by lap number alone, so a lapped car's lap 40 is
/// compared with the leader's lap 40. Laps without a time neither set the
/// reference nor appear in the output.
pub fn gap_to_leader(laps: &[LapRecord]) -> Result<Vec<GapRow>> {
    laps::validate(laps)?;

    let mut by_lap: BTreeMap<u32, Vec<(&str, f64)>> = BTreeMap::new();
    for lap in laps {
        if let Some(t) = lap.lap_time_s {
            by_lap
                .entry(lap.lap_number)
                .or_default()
                .push((lap.driver.as_str(), t));
        }
    }

    let mut rows = Vec::with_capacity(laps.len());
    for (lap_number, mut group) in by_lap {
        let min = group
            .iter()
            .map(|(_, t)| *t)
            .fold(f64::INFINITY, f64::min);
        group.sort_by(|(da, ta), (db, tb)| ta.total_cmp(tb).then_with(|| da.cmp(db)));
        rows.extend(group.into_iter().map(|(driver, t)| GapRow {
            lap_number,
            driver: driver.to_string(),
            lap_time_s: t,
            gap_to_leader_s: t - min,
        }));
    }

    Ok(rows)
}

/// One `(lap_number, value)` series per selected driver for `metric`.
///
/// `laps` is expected to hold representative laps only; that filtering is
/// done by the data provider. A driver without laps, or whose laps all lack
/// the metric, gets an empty series and is listed in `missing`.
pub fn compare_drivers(
    laps: &[LapRecord],
    drivers: &[String],
    metric: LapMetric,
) -> Result<MetricComparison> {
    laps::validate(laps)?;

    let mut series: Vec<DriverSeries> = Vec::with_capacity(drivers.len());
    let mut missing = Vec::new();

    for driver in drivers {
        if series.iter().any(|s| &s.driver == driver) {
            continue;
        }
        let points: Vec<MetricPoint> = laps::pick_driver(laps, driver)
            .iter()
            .filter_map(|lap| {
                metric.value(lap).map(|value| MetricPoint {
                    lap_number: lap.lap_number,
                    value,
                })
            })
            .collect();

        if points.is_empty() {
            tracing::warn!(driver = %driver, ?metric, "no laps to compare");
            missing.push(driver.clone());
        }
        series.push(DriverSeries {
            driver: driver.clone(),
            points,
        });
    }

    Ok(MetricComparison {
        metric,
        series,
        missing,
    })
}
