use serde::{Deserialize, Serialize};

use crate::types::TelemetrySample;

/// Distance-indexed speed sample, the x axis of a speed trace chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TracePoint {
    /// Distance along lap in meters
    pub distance_m: f64,
    pub speed_kph: f64,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    pub x: f64,
    pub y: f64,
}

/// Speed trace of a single lap, ordered by distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedTrace {
    points: Vec<TracePoint>,
}

impl SpeedTrace {
    /// Build a trace from raw samples.
    ///
    /// When any sample lacks `distance_m`, distance is integrated from speed
    /// over time for the whole lap instead, starting at 0 m on the first
    /// sample.
    pub fn from_samples(samples: &[TelemetrySample]) -> Self {
        let mut ordered: Vec<&TelemetrySample> = samples.iter().collect();
        ordered.sort_by(|a, b| a.time_s.total_cmp(&b.time_s));

        let provided = ordered.iter().all(|s| s.distance_m.is_some());
        let distances: Vec<f64> = if provided {
            ordered.iter().filter_map(|s| s.distance_m).collect()
        } else {
            integrate_distance(&ordered)
        };

        let mut points: Vec<TracePoint> = ordered
            .iter()
            .zip(distances)
            .map(|(s, distance_m)| TracePoint {
                distance_m,
                speed_kph: s.speed_kph,
                x: s.x,
                y: s.y,
            })
            .collect();

        points.sort_by(|a, b| a.distance_m.total_cmp(&b.distance_m));
        Self { points }
    }

    pub fn points(&self) -> &[TracePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Samples between `from_m` and `to_m` inclusive.
    ///
    /// # Returns
    /// `None` when fewer than two samples fall in range, since a single point
    /// can't be drawn as a line.
    pub fn window(&self, from_m: f64, to_m: f64) -> Option<Vec<TracePoint>> {
        if self.points.len() < 2 {
            return None;
        }

        let (lo, hi) = if from_m <= to_m { (from_m, to_m) } else { (to_m, from_m) };
        let picked: Vec<TracePoint> = self
            .points
            .iter()
            .filter(|p| p.distance_m >= lo && p.distance_m <= hi)
            .copied()
            .collect();

        if picked.len() < 2 {
            return None;
        }
        Some(picked)
    }

    pub fn top_speed_kph(&self) -> Option<f64> {
        self.points
            .iter()
            .map(|p| p.speed_kph)
            .max_by(|a, b| a.total_cmp(b))
    }

    pub fn lap_distance_m(&self) -> f64 {
        self.points.last().map(|p| p.distance_m).unwrap_or(0.0)
    }

    /// Car position over the lap, for drawing the circuit outline.
    pub fn track_outline(&self) -> Vec<TrackPoint> {
        self.points
            .iter()
            .map(|p| TrackPoint { x: p.x, y: p.y })
            .collect()
    }
}

/// Cumulative distance from speed (km/h) and time, Δd = v / 3.6 · Δt.
fn integrate_distance(samples: &[&TelemetrySample]) -> Vec<f64> {
    let mut out = Vec::with_capacity(samples.len());
    let mut total = 0.0;
    let mut prev_time: Option<f64> = None;

    for s in samples {
        if let Some(t0) = prev_time {
            let dt = (s.time_s - t0).max(0.0);
            total += s.speed_kph / 3.6 * dt;
        }
        out.push(total);
        prev_time = Some(s.time_s);
    }
    out
}
