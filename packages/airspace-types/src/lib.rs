//! # airspace-types
//!
//! Shared data model for the UAV strategic deconfliction suite.
//!
//! These types are used by:
//! - `deconfliction`: the three-stage detection-and-scoring pipeline
//! - `airspace-sim`: mission template / traffic generation and result export
//! - external visualization tooling: consumes the persisted JSON records
//!
//! ## Coordinate Conventions
//!
//! - **World frame**: shared local Cartesian frame, meters. X/Y horizontal,
//!   Z = altitude above ground.
//! - **Time**: seconds on a shared mission clock. All mission windows and
//!   trajectory queries use this clock.
//!
//! ## Persisted layout
//!
//! `MissionRecord`, `TrafficFileRecord` and `DeconflictionResultRecord` are
//! the bit-stable JSON objects consumed by external visualization tooling.
//! Field names must not change. An unbounded time-to-collision serializes as
//! JSON `null` (serde_json's rendering of `f64::INFINITY`).

use serde::{Deserialize, Serialize};
use std::fmt;

// ── 3D Vector ─────────────────────────────────────────────────────────────────

/// 3D vector in the world frame, meters (positions) or m/s (velocities).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self { x: 0.0, y: 0.0, z: 0.0 }
    }

    pub fn add(&self, other: &Vec3) -> Vec3 {
        Vec3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }

    pub fn sub(&self, other: &Vec3) -> Vec3 {
        Vec3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    pub fn scale(&self, s: f64) -> Vec3 {
        Vec3::new(self.x * s, self.y * s, self.z * s)
    }

    pub fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn dist(&self, other: &Vec3) -> f64 {
        self.sub(other).norm()
    }
}

// ── Waypoint ──────────────────────────────────────────────────────────────────

/// A 3D waypoint on a flight path. Immutable once part of a mission.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Waypoint {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn to_vec3(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Euclidean 3D distance to another waypoint.
    pub fn distance_to(&self, other: &Waypoint) -> f64 {
        self.to_vec3().dist(&other.to_vec3())
    }
}

/// Total polyline length over a waypoint sequence.
pub fn path_length(waypoints: &[Waypoint]) -> f64 {
    waypoints
        .windows(2)
        .map(|pair| pair[0].distance_to(&pair[1]))
        .sum()
}

// ── Severity ──────────────────────────────────────────────────────────────────

/// Conflict severity, ordered from benign to imminent.
///
/// The derived `Ord` follows declaration order, so `severity >= Severity::High`
/// is the clearance test. Never compare the serialized strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    /// No meaningful conflict
    Safe,
    /// Minor proximity, no immediate danger
    Low,
    /// Approaching the safety threshold
    Warning,
    /// Safety buffer violated
    High,
    /// Imminent collision risk
    Critical,
}

impl Severity {
    /// All severities, benign first. Used for report breakdowns.
    pub const ALL: [Severity; 5] = [
        Severity::Safe,
        Severity::Low,
        Severity::Warning,
        Severity::High,
        Severity::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Safe => "SAFE",
            Severity::Low => "LOW",
            Severity::Warning => "WARNING",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Mission ───────────────────────────────────────────────────────────────────

/// Rejection reasons at the mission construction boundary.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MissionError {
    #[error("mission needs at least two waypoints, got {0}")]
    TooFewWaypoints(usize),
    #[error("mission window is empty or inverted: start={start}s end={end}s")]
    InvalidWindow { start: f64, end: f64 },
    #[error("mission times must be non-negative, got {0}s")]
    NegativeTime(f64),
    #[error("cruise speed must be non-negative, got {0} m/s")]
    NegativeCruiseSpeed(f64),
}

/// A time-windowed polyline flight plan flown at a single constant cruise
/// speed.
///
/// When no cruise speed is supplied, it derives as total path length over
/// window duration. When supplied externally, per-segment timing is
/// authoritative inside the trajectory and the window bounds only drive
/// temporal filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct Mission {
    pub waypoints: Vec<Waypoint>,
    /// Window start, seconds on the shared mission clock
    pub start_time: f64,
    /// Window end, seconds. Upper bound for temporal filtering.
    pub end_time: f64,
    /// Stable registry identifier
    pub drone_id: String,
    /// Constant ground speed, m/s
    pub cruise_speed: f64,
}

impl Mission {
    /// Validate and construct a mission. `cruise_speed = None` derives the
    /// speed from path length and window duration.
    pub fn new(
        waypoints: Vec<Waypoint>,
        start_time: f64,
        end_time: f64,
        drone_id: impl Into<String>,
        cruise_speed: Option<f64>,
    ) -> Result<Self, MissionError> {
        if waypoints.len() < 2 {
            return Err(MissionError::TooFewWaypoints(waypoints.len()));
        }
        if start_time < 0.0 || end_time < 0.0 {
            return Err(MissionError::NegativeTime(start_time.min(end_time)));
        }
        if end_time <= start_time {
            return Err(MissionError::InvalidWindow { start: start_time, end: end_time });
        }
        if let Some(speed) = cruise_speed {
            if speed < 0.0 {
                return Err(MissionError::NegativeCruiseSpeed(speed));
            }
        }

        let total = path_length(&waypoints);
        let cruise_speed = cruise_speed.unwrap_or(total / (end_time - start_time));

        Ok(Self {
            waypoints,
            start_time,
            end_time,
            drone_id: drone_id.into(),
            cruise_speed,
        })
    }

    /// Window duration in seconds.
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// Total polyline length in meters.
    pub fn total_distance(&self) -> f64 {
        path_length(&self.waypoints)
    }

    /// Axis-aligned bounding box over the waypoints.
    pub fn bounding_box(&self) -> (Vec3, Vec3) {
        let mut min = self.waypoints[0].to_vec3();
        let mut max = min;
        for wp in &self.waypoints[1..] {
            min.x = min.x.min(wp.x);
            min.y = min.y.min(wp.y);
            min.z = min.z.min(wp.z);
            max.x = max.x.max(wp.x);
            max.y = max.y.max(wp.y);
            max.z = max.z.max(wp.z);
        }
        (min, max)
    }

    /// Mean waypoint altitude. Feeds the altitude-risk ladder; computed once
    /// per mission, not per proximity event.
    pub fn mean_altitude(&self) -> f64 {
        self.waypoints.iter().map(|wp| wp.z).sum::<f64>() / self.waypoints.len() as f64
    }
}

// ── Conflict ──────────────────────────────────────────────────────────────────

/// An assessed close approach between the primary mission and one other
/// mission, collapsed to one representative per 10-second window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conflict {
    /// Time of closest approach within the grouped window, seconds
    pub time: f64,
    /// Primary drone position at closest approach
    pub location: Waypoint,
    pub primary_drone: String,
    pub conflicting_drone: String,
    /// Minimum separation over the grouped window, meters
    pub separation_distance: f64,
    /// Relative velocity magnitude at closest approach, m/s
    pub relative_velocity: f64,
    /// Span of the grouped raw events, seconds
    pub conflict_duration: f64,
    /// Mean-altitude proximity multiplier: 1.0, 1.2, 1.5 or 2.0
    pub altitude_risk_factor: f64,
    /// Combined risk in [0, 1]
    pub risk_score: f64,
    pub severity: Severity,
    /// Separation over closure rate; `f64::INFINITY` when closure is negligible
    pub time_to_collision: f64,
    pub recommendation: String,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] Conflict at t={:.1}s: {} vs {} | Sep={:.1}m, v_rel={:.1}m/s, Risk={:.2}",
            self.severity,
            self.time,
            self.primary_drone,
            self.conflicting_drone,
            self.separation_distance,
            self.relative_velocity,
            self.risk_score,
        )
    }
}

// ── Persisted mission record ──────────────────────────────────────────────────

/// JSON layout of a single mission, as written to `primary_mission.json` and
/// the `traffic` array. `total_distance` and `duration` are derived fields
/// carried for the benefit of downstream tooling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionRecord {
    pub drone_id: String,
    pub start_time: f64,
    pub end_time: f64,
    pub cruise_speed: f64,
    pub waypoints: Vec<Waypoint>,
    pub total_distance: f64,
    pub duration: f64,
}

impl From<&Mission> for MissionRecord {
    fn from(m: &Mission) -> Self {
        Self {
            drone_id: m.drone_id.clone(),
            start_time: m.start_time,
            end_time: m.end_time,
            cruise_speed: m.cruise_speed,
            waypoints: m.waypoints.clone(),
            total_distance: m.total_distance(),
            duration: m.duration(),
        }
    }
}

impl MissionRecord {
    /// Re-validate into a `Mission`. The persisted cruise speed is treated as
    /// externally supplied; the derived fields are discarded.
    pub fn into_mission(self) -> Result<Mission, MissionError> {
        Mission::new(
            self.waypoints,
            self.start_time,
            self.end_time,
            self.drone_id,
            Some(self.cruise_speed),
        )
    }
}

/// Envelope for `traffic_missions.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrafficFileRecord {
    pub metadata: TrafficMetadata,
    pub traffic: Vec<MissionRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrafficMetadata {
    pub num_drones: usize,
    pub airspace_dimensions: AirspaceDimensions,
    pub flight_duration: f64,
    pub velocity: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AirspaceDimensions {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

// ── Persisted deconfliction result ────────────────────────────────────────────

/// Per-check timing and reduction metrics. Produced by the pipeline, embedded
/// verbatim in `deconfliction_results.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckMetrics {
    /// Stage-1 reduction, e.g. "100 → 7"
    pub stage1_reduction: String,
    pub stage1_time_ms: f64,
    pub stage2_time_ms: f64,
    pub stage3_time_ms: f64,
    pub total_time_ms: f64,
    /// Raw proximity events emitted by the occupancy grid
    pub raw_conflicts: usize,
    /// Conflicts after grouping and scoring
    pub assessed_conflicts: usize,
}

/// Maps the persisted `null` back to an unbounded time-to-collision.
fn ttc_from_json<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
}

/// One conflict in the persisted result layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictRecord {
    pub time: f64,
    pub location: Waypoint,
    pub conflicting_drone: String,
    pub severity: Severity,
    pub risk_score: f64,
    pub separation_distance: f64,
    pub relative_velocity: f64,
    #[serde(deserialize_with = "ttc_from_json")]
    pub time_to_collision: f64,
    pub conflict_duration: f64,
    pub altitude_risk_factor: f64,
    pub recommendation: String,
}

impl From<&Conflict> for ConflictRecord {
    fn from(c: &Conflict) -> Self {
        Self {
            time: c.time,
            location: c.location,
            conflicting_drone: c.conflicting_drone.clone(),
            severity: c.severity,
            risk_score: c.risk_score,
            separation_distance: c.separation_distance,
            relative_velocity: c.relative_velocity,
            time_to_collision: c.time_to_collision,
            conflict_duration: c.conflict_duration,
            altitude_risk_factor: c.altitude_risk_factor,
            recommendation: c.recommendation.clone(),
        }
    }
}

/// Full layout of `deconfliction_results.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeconflictionResultRecord {
    pub is_clear: bool,
    pub analysis_time_ms: f64,
    pub metrics: CheckMetrics,
    pub conflicts: Vec<ConflictRecord>,
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn line_mission() -> Mission {
        Mission::new(
            vec![Waypoint::new(0.0, 0.0, 100.0), Waypoint::new(1000.0, 0.0, 100.0)],
            0.0,
            100.0,
            "PRIMARY",
            None,
        )
        .unwrap()
    }

    #[test]
    fn derives_cruise_speed_from_window() {
        let m = line_mission();
        assert!((m.cruise_speed - 10.0).abs() < 1e-9);
        assert!((m.total_distance() - 1000.0).abs() < 1e-9);
        assert!((m.duration() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_single_waypoint() {
        let err = Mission::new(vec![Waypoint::new(0.0, 0.0, 0.0)], 0.0, 10.0, "X", None);
        assert_eq!(err, Err(MissionError::TooFewWaypoints(1)));
    }

    #[test]
    fn rejects_empty_or_inverted_window() {
        let wps = vec![Waypoint::new(0.0, 0.0, 0.0), Waypoint::new(1.0, 0.0, 0.0)];
        assert!(matches!(
            Mission::new(wps.clone(), 10.0, 10.0, "X", None),
            Err(MissionError::InvalidWindow { .. })
        ));
        assert!(matches!(
            Mission::new(wps, 20.0, 10.0, "X", None),
            Err(MissionError::InvalidWindow { .. })
        ));
    }

    #[test]
    fn rejects_negative_time_and_speed() {
        let wps = vec![Waypoint::new(0.0, 0.0, 0.0), Waypoint::new(1.0, 0.0, 0.0)];
        assert!(matches!(
            Mission::new(wps.clone(), -1.0, 10.0, "X", None),
            Err(MissionError::NegativeTime(_))
        ));
        assert!(matches!(
            Mission::new(wps, 0.0, 10.0, "X", Some(-5.0)),
            Err(MissionError::NegativeCruiseSpeed(_))
        ));
    }

    #[test]
    fn zero_cruise_speed_is_accepted() {
        let wps = vec![Waypoint::new(500.0, 0.0, 100.0), Waypoint::new(500.0, 0.0, 100.0)];
        let m = Mission::new(wps, 0.0, 100.0, "HOVER", Some(0.0)).unwrap();
        assert_eq!(m.cruise_speed, 0.0);
        assert_eq!(m.total_distance(), 0.0);
    }

    #[test]
    fn bounding_box_spans_all_waypoints() {
        let m = Mission::new(
            vec![
                Waypoint::new(100.0, -50.0, 10.0),
                Waypoint::new(-20.0, 300.0, 250.0),
                Waypoint::new(40.0, 0.0, 5.0),
            ],
            0.0,
            60.0,
            "BOX",
            None,
        )
        .unwrap();
        let (min, max) = m.bounding_box();
        assert_eq!((min.x, min.y, min.z), (-20.0, -50.0, 5.0));
        assert_eq!((max.x, max.y, max.z), (100.0, 300.0, 250.0));
    }

    #[test]
    fn severity_order_and_strings() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::High > Severity::Warning);
        assert!(Severity::Safe < Severity::Low);
        assert_eq!(
            serde_json::to_string(&Severity::Warning).unwrap(),
            "\"WARNING\""
        );
        let parsed: Severity = serde_json::from_str("\"CRITICAL\"").unwrap();
        assert_eq!(parsed, Severity::Critical);
    }

    #[test]
    fn mission_record_round_trip() {
        let m = Mission::new(
            vec![
                Waypoint::new(0.0, 0.0, 100.0),
                Waypoint::new(1000.0, 500.0, 120.0),
                Waypoint::new(2000.0, 1500.0, 140.0),
            ],
            600.0,
            900.0,
            "TRAFFIC-007",
            Some(15.0),
        )
        .unwrap();

        let record = MissionRecord::from(&m);
        let json = serde_json::to_string(&record).unwrap();
        let back: MissionRecord = serde_json::from_str(&json).unwrap();
        let restored = back.into_mission().unwrap();
        assert_eq!(restored, m);
    }

    #[test]
    fn mission_record_field_names_are_stable() {
        let m = line_mission();
        let value = serde_json::to_value(MissionRecord::from(&m)).unwrap();
        for key in [
            "drone_id",
            "start_time",
            "end_time",
            "cruise_speed",
            "waypoints",
            "total_distance",
            "duration",
        ] {
            assert!(value.get(key).is_some(), "missing key {key}");
        }
        assert_eq!(value["waypoints"][0]["x"], 0.0);
    }

    #[test]
    fn infinite_ttc_serializes_as_null() {
        let record = ConflictRecord {
            time: 10.0,
            location: Waypoint::new(0.0, 0.0, 100.0),
            conflicting_drone: "TRAFFIC-001".into(),
            severity: Severity::Low,
            risk_score: 0.25,
            separation_distance: 80.0,
            relative_velocity: 0.0,
            time_to_collision: f64::INFINITY,
            conflict_duration: 4.0,
            altitude_risk_factor: 1.0,
            recommendation: "ADVISORY - Low risk. Proceed with caution.".into(),
        };
        let value = serde_json::to_value(&record).unwrap();
        assert!(value["time_to_collision"].is_null());

        let back: ConflictRecord = serde_json::from_value(value).unwrap();
        assert!(back.time_to_collision.is_infinite());
    }
}
