use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{AnalysisError, Result};
use crate::types::LapRecord;

/// Lap table row shown for a driver: lap number, lap time and sector splits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LapTableRow {
    pub lap_number: u32,
    pub lap_time_s: Option<f64>,
    pub sector1_time_s: Option<f64>,
    pub sector2_time_s: Option<f64>,
    pub sector3_time_s: Option<f64>,
}

impl From<&LapRecord> for LapTableRow {
    fn from(lap: &LapRecord) -> Self {
        Self {
            lap_number: lap.lap_number,
            lap_time_s: lap.lap_time_s,
            sector1_time_s: lap.sector1_time_s,
            sector2_time_s: lap.sector2_time_s,
            sector3_time_s: lap.sector3_time_s,
        }
    }
}

/// Check the shape of a lap table before any analysis runs over it.
///
/// Rejects records without a driver code, zero lap numbers, repeated
/// `(driver, lap_number)` pairs and time columns that cannot be real
/// durations. An empty table is valid.
pub fn validate(laps: &[LapRecord]) -> Result<()> {
    let mut seen: HashSet<(&str, u32)> = HashSet::with_capacity(laps.len());

    for (index, lap) in laps.iter().enumerate() {
        if lap.driver.trim().is_empty() {
            return Err(AnalysisError::MissingDriver { index });
        }
        if lap.lap_number == 0 {
            return Err(AnalysisError::InvalidLapNumber {
                driver: lap.driver.clone(),
                lap_number: lap.lap_number,
            });
        }
        if !seen.insert((lap.driver.as_str(), lap.lap_number)) {
            return Err(AnalysisError::DuplicateLap {
                driver: lap.driver.clone(),
                lap_number: lap.lap_number,
            });
        }

        let durations = [
            ("lap time", lap.lap_time_s),
            ("sector 1 time", lap.sector1_time_s),
            ("sector 2 time", lap.sector2_time_s),
            ("sector 3 time", lap.sector3_time_s),
        ];
        for (field, value) in durations {
            if let Some(v) = value {
                if !v.is_finite() || v <= 0.0 {
                    return Err(invalid_time(lap, field, v));
                }
            }
        }

        // pit timestamps are session clock readings, only finiteness matters
        let stamps = [
            ("pit-in time", lap.pit_in_time_s),
            ("pit-out time", lap.pit_out_time_s),
        ];
        for (field, value) in stamps {
            if let Some(v) = value {
                if !v.is_finite() {
                    return Err(invalid_time(lap, field, v));
                }
            }
        }
    }

    Ok(())
}

fn invalid_time(lap: &LapRecord, field: &'static str, value: f64) -> AnalysisError {
    AnalysisError::InvalidTime {
        driver: lap.driver.clone(),
        lap_number: lap.lap_number,
        field,
        value,
    }
}

/// Laps driven by `driver`, sorted by lap number. Returns owned copies.
pub fn pick_driver(laps: &[LapRecord], driver: &str) -> Vec<LapRecord> {
    let mut picked: Vec<LapRecord> = laps
        .iter()
        .filter(|lap| lap.driver == driver)
        .cloned()
        .collect();
    picked.sort_by_key(|lap| lap.lap_number);
    picked
}

/// Lap with the lowest lap time. Laps without a time are ignored; on a tie
/// the earlier lap wins.
pub fn pick_fastest(laps: &[LapRecord]) -> Option<&LapRecord> {
    laps.iter()
        .filter_map(|lap| lap.lap_time_s.map(|t| (t, lap)))
        .min_by(|(ta, a), (tb, b)| {
            ta.total_cmp(tb)
                .then_with(|| a.lap_number.cmp(&b.lap_number))
        })
        .map(|(_, lap)| lap)
}

pub fn lap_table(laps: &[LapRecord]) -> Vec<LapTableRow> {
    let mut rows: Vec<LapTableRow> = laps.iter().map(LapTableRow::from).collect();
    rows.sort_by_key(|row| row.lap_number);
    rows
}

/// Render seconds as `m:ss.mmm`, the way lap times are read out on a timing screen.
///
/// `None` for negative or non-finite input.
pub fn format_lap_time(seconds: f64) -> Option<String> {
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }
    let total_ms = (seconds * 1000.0).round() as u64;
    let minutes = total_ms / 60_000;
    let secs = (total_ms % 60_000) / 1000;
    let millis = total_ms % 1000;
    Some(format!("{}:{:02}.{:03}", minutes, secs, millis))
}
