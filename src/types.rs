use serde::{Deserialize, Serialize};
use std::fmt;

/// Tyre compound as logged on a lap.
///
/// Anything the provider sends that isn't one of the five known compounds
/// lands in `Unknown`, which still counts as a compound for stint purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Compound {
    Soft,
    Medium,
    Hard,
    Intermediate,
    Wet,
    Unknown,
}

impl Compound {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "SOFT" | "S" => Compound::Soft,
            "MEDIUM" | "M" => Compound::Medium,
            "HARD" | "H" => Compound::Hard,
            "INTERMEDIATE" | "INTER" | "I" => Compound::Intermediate,
            "WET" | "W" => Compound::Wet,
            _ => Compound::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Compound::Soft => "SOFT",
            Compound::Medium => "MEDIUM",
            Compound::Hard => "HARD",
            Compound::Intermediate => "INTERMEDIATE",
            Compound::Wet => "WET",
            Compound::Unknown => "UNKNOWN",
        }
    }
}

impl From<String> for Compound {
    fn from(raw: String) -> Self {
        Compound::parse(&raw)
    }
}

impl From<Compound> for String {
    fn from(c: Compound) -> Self {
        c.as_str().to_string()
    }
}

impl fmt::Display for Compound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One telemetry sample on a lap (car position and speed at a point in time).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySample {
    /// Time since the lap started, seconds
    pub time_s: f64,
    pub speed_kph: f64,
    pub x: f64,
    pub y: f64,
    /// Distance along the lap in meters, when the provider already computed it
    #[serde(default)]
    pub distance_m: Option<f64>,
}

/// One row per driver per lap, as loaded from the session data provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LapRecord {
    pub driver: String,
    pub lap_number: u32,
    #[serde(default)]
    pub lap_time_s: Option<f64>,
    #[serde(default)]
    pub sector1_time_s: Option<f64>,
    #[serde(default)]
    pub sector2_time_s: Option<f64>,
    #[serde(default)]
    pub sector3_time_s: Option<f64>,
    #[serde(default)]
    pub compound: Option<Compound>,
    #[serde(default)]
    pub position: Option<u32>,
    #[serde(default)]
    pub pit_in_time_s: Option<f64>,
    #[serde(default)]
    pub pit_out_time_s: Option<f64>,
    /// Speed trap reading for the lap
    #[serde(default)]
    pub speed_trap_kph: Option<f64>,
    /// Only attached to a driver's fastest lap
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed_trace: Option<Vec<TelemetrySample>>,
}

impl LapRecord {
    /// Bare record with every optional column empty.
    pub fn new(driver: impl Into<String>, lap_number: u32) -> Self {
        Self {
            driver: driver.into(),
            lap_number,
            lap_time_s: None,
            sector1_time_s: None,
            sector2_time_s: None,
            sector3_time_s: None,
            compound: None,
            position: None,
            pit_in_time_s: None,
            pit_out_time_s: None,
            speed_trap_kph: None,
            speed_trace: None,
        }
    }

    pub fn with_lap_time(mut self, lap_time_s: f64) -> Self {
        self.lap_time_s = Some(lap_time_s);
        self
    }

    pub fn with_compound(mut self, compound: Compound) -> Self {
        self.compound = Some(compound);
        self
    }
}

/// Maximal contiguous run of laps for one driver on one compound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stint {
    pub driver: String,
    pub stint_index: usize,
    pub compound: Compound,
    pub start_lap: u32,
    pub end_lap: u32,
    pub duration_laps: u32,
}

impl Stint {
    pub fn contains(&self, lap_number: u32) -> bool {
        (self.start_lap..=self.end_lap).contains(&lap_number)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapRow {
    pub lap_number: u32,
    pub driver: String,
    pub lap_time_s: f64,
    pub gap_to_leader_s: f64,
}

/// Driver code to team mapping from the session's driver list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverInfo {
    pub code: String,
    pub team_name: String,
}
