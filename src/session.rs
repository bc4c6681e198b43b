use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{AnalysisError, Result};
use crate::types::LapRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SessionType {
    FP1,
    FP2,
    FP3,
    Q,
    SQ,
    R,
}

impl SessionType {
    pub fn code(&self) -> &'static str {
        match self {
            SessionType::FP1 => "FP1",
            SessionType::FP2 => "FP2",
            SessionType::FP3 => "FP3",
            SessionType::Q => "Q",
            SessionType::SQ => "SQ",
            SessionType::R => "R",
        }
    }
}

impl FromStr for SessionType {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fp1" | "practice 1" => Ok(SessionType::FP1),
            "fp2" | "practice 2" => Ok(SessionType::FP2),
            "fp3" | "practice 3" => Ok(SessionType::FP3),
            "q" | "qualifying" => Ok(SessionType::Q),
            "sq" | "sprint qualifying" | "sprint shootout" => Ok(SessionType::SQ),
            "r" | "race" => Ok(SessionType::R),
            _ => Err(AnalysisError::UnknownSessionType(s.to_string())),
        }
    }
}

impl TryFrom<String> for SessionType {
    type Error = AnalysisError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<SessionType> for String {
    fn from(t: SessionType) -> Self {
        t.code().to_string()
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// (season, round, session) triple identifying a loaded session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionKey {
    pub year: u16,
    pub round: u32,
    pub session_type: SessionType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEntry {
    pub event_name: String,
    /// ISO date as published in the calendar
    pub event_date: String,
    pub round_number: u32,
}

/// Season calendar, used to turn an event name into a round number.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventSchedule {
    pub year: u16,
    pub events: Vec<EventEntry>,
}

impl EventSchedule {
    /// Events ordered by round.
    pub fn rounds(&self) -> Vec<&EventEntry> {
        let mut events: Vec<&EventEntry> = self.events.iter().collect();
        events.sort_by_key(|e| e.round_number);
        events
    }

    pub fn resolve_round(&self, event_name: &str) -> Result<u32> {
        self.events
            .iter()
            .find(|e| e.event_name.eq_ignore_ascii_case(event_name.trim()))
            .map(|e| e.round_number)
            .ok_or_else(|| AnalysisError::UnknownEvent(event_name.to_string()))
    }

    pub fn session_key(&self, event_name: &str, session_type: SessionType) -> Result<SessionKey> {
        Ok(SessionKey {
            year: self.year,
            round: self.resolve_round(event_name)?,
            session_type,
        })
    }
}

/// Flat row handed to the external datastore: one driver's lap time in a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LapTimeRecord {
    pub event_name: String,
    pub year: u16,
    pub session_type: SessionType,
    pub driver: String,
    pub lap_time_s: f64,
}

impl LapTimeRecord {
    /// `None` when the lap has no time to store.
    pub fn from_lap(event_name: &str, key: &SessionKey, lap: &LapRecord) -> Option<Self> {
        lap.lap_time_s.map(|lap_time_s| Self {
            event_name: event_name.to_string(),
            year: key.year,
            session_type: key.session_type,
            driver: lap.driver.clone(),
            lap_time_s,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule() -> EventSchedule {
        EventSchedule {
            year: 2025,
            events: vec![
                EventEntry {
                    event_name: "Monaco Grand Prix".to_string(),
                    event_date: "2025-05-25".to_string(),
                    round_number: 8,
                },
                EventEntry {
                    event_name: "Australian Grand Prix".to_string(),
                    event_date: "2025-03-16".to_string(),
                    round_number: 1,
                },
            ],
        }
    }

    #[test]
    fn test_session_type_parsing() {
        assert_eq!("fp2".parse::<SessionType>().unwrap(), SessionType::FP2);
        assert_eq!("Race".parse::<SessionType>().unwrap(), SessionType::R);
        assert_eq!("SQ".parse::<SessionType>().unwrap(), SessionType::SQ);
        assert!("Warmup".parse::<SessionType>().is_err());

        let json = serde_json::to_string(&SessionType::Q).unwrap();
        assert_eq!(json, "\"Q\"");
        assert!(serde_json::from_str::<SessionType>("\"X\"").is_err());
    }

    #[test]
    fn test_resolve_round() {
        let s = schedule();
        assert_eq!(s.resolve_round("monaco grand prix").unwrap(), 8);
        assert_eq!(
            s.resolve_round("Dutch Grand Prix"),
            Err(AnalysisError::UnknownEvent("Dutch Grand Prix".to_string()))
        );
        let rounds: Vec<u32> = s.rounds().iter().map(|e| e.round_number).collect();
        assert_eq!(rounds, vec![1, 8]);

        let key = s.session_key("Australian Grand Prix", SessionType::Q).unwrap();
        assert_eq!(key.round, 1);
        assert_eq!(key.year, 2025);
    }

    #[test]
    fn test_lap_time_record_needs_a_time() {
        let key = SessionKey {
            year: 2025,
            round: 8,
            session_type: SessionType::Q,
        };
        let timed = LapRecord::new("LEC", 12).with_lap_time(70.1);
        let rec = LapTimeRecord::from_lap("Monaco Grand Prix", &key, &timed).unwrap();
        assert_eq!(rec.driver, "LEC");
        assert_eq!(rec.session_type, SessionType::Q);
        assert!(LapTimeRecord::from_lap("Monaco Grand Prix", &key, &LapRecord::new("LEC", 13)).is_none());
    }
}
