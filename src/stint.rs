//! Stint reconstruction from lap-by-lap records.
//!
//! Two ways to find where one stint ends and the next begins:
//!
//! * [`StintStrategy::Compound`] run-length encodes the compound column. A
//!   new stint opens whenever the compound differs from the previous retained
//!   lap, or the lap numbers skip. Laps without a compound are dropped first.
//! * [`StintStrategy::PitTime`] ignores compounds and splits on pit activity:
//!   a lap with a pit-out time, or a lap following one with a pit-in time,
//!   opens a new stint.
//!
//! A single mislogged compound lap produces a one-lap stint; nothing here
//! smooths that away.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::error::{AnalysisError, Result};
use crate::laps;
use crate::types::{Compound, LapRecord, Stint};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StintStrategy {
    Compound,
    PitTime,
}

impl StintStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            StintStrategy::Compound => "compound",
            StintStrategy::PitTime => "pit_time",
        }
    }

    /// Compound tagging when any lap carries a compound, pit timing otherwise.
    pub fn select(laps: &[LapRecord]) -> Self {
        if laps.iter().any(|lap| lap.compound.is_some()) {
            StintStrategy::Compound
        } else {
            StintStrategy::PitTime
        }
    }
}

impl FromStr for StintStrategy {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "compound" => Ok(StintStrategy::Compound),
            "pit_time" | "pit" => Ok(StintStrategy::PitTime),
            _ => Err(AnalysisError::UnknownStrategy(s.to_string())),
        }
    }
}

impl TryFrom<String> for StintStrategy {
    type Error = AnalysisError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<StintStrategy> for String {
    fn from(s: StintStrategy) -> Self {
        s.as_str().to_string()
    }
}

/// Best and mean lap time over the timed laps of a stint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StintPace {
    pub stint_index: usize,
    pub timed_laps: usize,
    pub best_lap_time_s: Option<f64>,
    pub mean_lap_time_s: Option<f64>,
}

/// Reconstruct stints for every driver in `laps`.
///
/// Drivers are processed independently and emitted in driver-code order;
/// within a driver, stints are in lap order with `stint_index` from 0. The
/// input is validated and never modified.
pub fn reconstruct_stints(laps: &[LapRecord], strategy: StintStrategy) -> Result<Vec<Stint>> {
    laps::validate(laps)?;

    let mut by_driver: BTreeMap<&str, Vec<&LapRecord>> = BTreeMap::new();
    for lap in laps {
        by_driver.entry(lap.driver.as_str()).or_default().push(lap);
    }

    let mut stints = Vec::new();
    for (driver, mut driver_laps) in by_driver {
        driver_laps.sort_by_key(|lap| lap.lap_number);
        let found = match strategy {
            StintStrategy::Compound => by_compound(driver, &driver_laps),
            StintStrategy::PitTime => by_pit_time(driver, &driver_laps),
        };
        tracing::debug!(driver, stints = found.len(), ?strategy, "reconstructed stints");
        stints.extend(found);
    }

    Ok(stints)
}

fn by_compound(driver: &str, laps: &[&LapRecord]) -> Vec<Stint> {
    let mut builder = StintBuilder::new(driver);
    let mut prev: Option<(u32, Compound)> = None;

    for lap in laps {
        let Some(compound) = lap.compound else {
            continue;
        };
        match prev {
            Some((prev_lap, prev_compound))
                if prev_compound == compound && lap.lap_number == prev_lap + 1 =>
            {
                builder.extend(lap.lap_number)
            }
            _ => builder.open(lap.lap_number, Some(compound)),
        }
        prev = Some((lap.lap_number, compound));
    }

    builder.finish()
}

fn by_pit_time(driver: &str, laps: &[&LapRecord]) -> Vec<Stint> {
    let mut builder = StintBuilder::new(driver);
    let mut prev: Option<&LapRecord> = None;

    for lap in laps {
        let boundary = match prev {
            None => true,
            Some(p) => {
                lap.pit_out_time_s.is_some()
                    || p.pit_in_time_s.is_some()
                    || lap.lap_number != p.lap_number + 1
            }
        };
        if boundary {
            builder.open(lap.lap_number, lap.compound);
        } else {
            builder.extend(lap.lap_number);
            if let Some(c) = lap.compound {
                builder.fill_compound(c);
            }
        }
        prev = Some(*lap);
    }

    builder.finish()
}

/// Accumulates stints for one driver during a left-to-right scan.
struct StintBuilder<'a> {
    driver: &'a str,
    done: Vec<Stint>,
    current: Option<Stint>,
    /// Whether the open stint's compound came from a lap or is the placeholder
    compound_seen: bool,
}

impl<'a> StintBuilder<'a> {
    fn new(driver: &'a str) -> Self {
        Self {
            driver,
            done: Vec::new(),
            current: None,
            compound_seen: false,
        }
    }

    fn open(&mut self, lap_number: u32, compound: Option<Compound>) {
        if let Some(stint) = self.current.take() {
            self.done.push(stint);
        }
        self.compound_seen = compound.is_some();
        self.current = Some(Stint {
            driver: self.driver.to_string(),
            stint_index: self.done.len(),
            compound: compound.unwrap_or(Compound::Unknown),
            start_lap: lap_number,
            end_lap: lap_number,
            duration_laps: 1,
        });
    }

    fn extend(&mut self, lap_number: u32) {
        if let Some(stint) = self.current.as_mut() {
            stint.end_lap = lap_number;
            stint.duration_laps = stint.end_lap - stint.start_lap + 1;
        }
    }

    /// Pit-time stints take the first compound logged inside them.
    fn fill_compound(&mut self, compound: Compound) {
        if self.compound_seen {
            return;
        }
        if let Some(stint) = self.current.as_mut() {
            stint.compound = compound;
            self.compound_seen = true;
        }
    }

    fn finish(mut self) -> Vec<Stint> {
        if let Some(stint) = self.current.take() {
            self.done.push(stint);
        }
        self.done
    }
}

/// Pace over the laps of `stint` that have a lap time.
pub fn stint_pace(stint: &Stint, laps: &[LapRecord]) -> StintPace {
    let times: Vec<f64> = laps
        .iter()
        .filter(|lap| lap.driver == stint.driver && stint.contains(lap.lap_number))
        .filter_map(|lap| lap.lap_time_s)
        .collect();

    let best = times.iter().copied().min_by(|a, b| a.total_cmp(b));
    let mean = if times.is_empty() {
        None
    } else {
        Some(times.iter().sum::<f64>() / times.len() as f64)
    };

    StintPace {
        stint_index: stint.stint_index,
        timed_laps: times.len(),
        best_lap_time_s: best,
        mean_lap_time_s: mean,
    }
}
