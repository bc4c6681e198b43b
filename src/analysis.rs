use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::gap::{self, LapMetric, MetricComparison};
use crate::laps::{self, LapTableRow};
use crate::session::{LapTimeRecord, SessionKey};
use crate::stint::{self, StintPace, StintStrategy};
use crate::telemetry::SpeedTrace;
use crate::types::{DriverInfo, GapRow, LapRecord, Stint};

/// A loaded session: everything the data provider hands over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    pub key: SessionKey,
    pub event_name: String,
    #[serde(default)]
    pub drivers: Vec<DriverInfo>,
    pub laps: Vec<LapRecord>,
}

impl SessionData {
    pub fn team_of(&self, code: &str) -> Option<&str> {
        self.drivers
            .iter()
            .find(|d| d.code == code)
            .map(|d| d.team_name.as_str())
    }
}

/// UI selections, passed in as plain values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub drivers: Vec<String>,
    pub metric: LapMetric,
    /// Chosen from the lap table when not given
    pub strategy: Option<StintStrategy>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverReport {
    pub driver: String,
    pub team_name: Option<String>,
    pub fastest_lap: Option<LapTableRow>,
    pub lap_table: Vec<LapTableRow>,
    pub stints: Vec<Stint>,
    pub stint_pace: Vec<StintPace>,
    pub speed_trace: Option<SpeedTrace>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub key: SessionKey,
    pub event_name: String,
    pub strategy: StintStrategy,
    pub drivers: Vec<DriverReport>,
    pub gaps: Vec<GapRow>,
    pub comparison: MetricComparison,
    /// Fastest-lap rows ready for the datastore
    pub records: Vec<LapTimeRecord>,
    /// Selected drivers with no laps in the session
    pub missing_drivers: Vec<String>,
}

/// Run one analysis request over a loaded session.
///
/// Fails only when the lap table itself is malformed. Drivers without
/// laps still get an (empty) report entry and are listed in
/// `missing_drivers`.
pub fn analyze(session: &SessionData, request: &AnalysisRequest) -> Result<AnalysisReport> {
    laps::validate(&session.laps)?;

    let strategy = request
        .strategy
        .unwrap_or_else(|| StintStrategy::select(&session.laps));
    tracing::info!(
        event = %session.event_name,
        session = %session.key.session_type,
        laps = session.laps.len(),
        drivers = request.drivers.len(),
        ?strategy,
        "analyzing session"
    );

    let mut drivers: Vec<DriverReport> = Vec::with_capacity(request.drivers.len());
    let mut missing_drivers = Vec::new();
    let mut records = Vec::new();

    for code in &request.drivers {
        if drivers.iter().any(|d| &d.driver == code) {
            continue;
        }
        let own = laps::pick_driver(&session.laps, code);
        if own.is_empty() {
            tracing::warn!(driver = %code, "driver has no laps in this session");
            missing_drivers.push(code.clone());
        }

        let report = driver_report(session, code, &own, strategy)?;
        if let Some(fastest) = laps::pick_fastest(&own) {
            records.extend(LapTimeRecord::from_lap(&session.event_name, &session.key, fastest));
        }
        drivers.push(report);
    }

    let gaps = gap::gap_to_leader(&session.laps)?;
    let comparison = gap::compare_drivers(&session.laps, &request.drivers, request.metric)?;

    Ok(AnalysisReport {
        key: session.key,
        event_name: session.event_name.clone(),
        strategy,
        drivers,
        gaps,
        comparison,
        records,
        missing_drivers,
    })
}

fn driver_report(
    session: &SessionData,
    code: &str,
    own: &[LapRecord],
    strategy: StintStrategy,
) -> Result<DriverReport> {
    let stints = stint::reconstruct_stints(own, strategy)?;
    let stint_pace = stints.iter().map(|s| stint::stint_pace(s, own)).collect();

    let fastest = laps::pick_fastest(own);
    let speed_trace = fastest
        .and_then(|lap| lap.speed_trace.as_deref())
        .map(SpeedTrace::from_samples);

    if let Some(lap) = fastest {
        tracing::debug!(
            driver = code,
            lap = lap.lap_number,
            time = %lap.lap_time_s.and_then(laps::format_lap_time).unwrap_or_default(),
            "fastest lap"
        );
    }

    Ok(DriverReport {
        driver: code.to_string(),
        team_name: session.team_of(code).map(str::to_string),
        fastest_lap: fastest.map(LapTableRow::from),
        lap_table: laps::lap_table(own),
        stints,
        stint_pace,
        speed_trace,
    })
}
