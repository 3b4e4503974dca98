//! risk.rs — Stage 3: risk scoring and prioritization
//!
//! Converts raw proximity events into severity-graded, de-duplicated
//! conflict reports. Events are grouped per (other mission, 10-second
//! window); each group collapses to the minimum-separation representative,
//! which is then scored from separation, relative velocity, time to
//! collision, duration and an altitude proximity multiplier.
//!
//! Output ordering is fully deterministic: risk descending, ties broken by
//! earlier time then lexicographic drone id, so hash-map iteration order
//! never leaks into the result.

use std::collections::HashMap;

use airspace_types::{Conflict, Mission, Severity};

use crate::config::RiskConfig;
use crate::occupancy_grid::ProximityEvent;
use crate::trajectory::Trajectory;

/// Grouping window for raw events, seconds.
const GROUP_WINDOW: f64 = 10.0;
/// Relative speeds below this count as no closure (unbounded ttc), m/s.
const MIN_CLOSURE_SPEED: f64 = 0.1;

/// Stage-3 scorer. Also owns the dynamic safety buffer formula the grid is
/// queried with.
pub struct RiskScorer {
    config: RiskConfig,
}

impl RiskScorer {
    pub fn new(config: RiskConfig) -> Self {
        Self { config }
    }

    /// Physics-derived minimum allowed separation:
    /// base + reaction travel + braking distance + GPS uncertainty.
    ///
    /// Queried with the primary's cruise speed before any true relative
    /// speed has been measured, which over-estimates conservatively.
    pub fn dynamic_safety_buffer(&self, relative_velocity: f64) -> f64 {
        let velocity_term = relative_velocity * self.config.reaction_time_s;
        let accel_term = 0.5 * self.config.max_accel_mps2 * self.config.reaction_time_s.powi(2);
        self.config.base_safety_buffer_m + velocity_term + accel_term + self.config.gps_uncertainty_m
    }

    /// Score all raw events into ranked conflicts.
    pub fn assess(
        &self,
        primary: &Mission,
        events: &[ProximityEvent],
        candidates: &HashMap<&str, &Mission>,
    ) -> Vec<Conflict> {
        let primary_traj = Trajectory::new(primary);
        let primary_mean_alt = primary.mean_altitude();

        // Per-candidate derived state, computed once per mission.
        let mut trajectories: HashMap<&str, Trajectory> = HashMap::new();
        let mut mean_alts: HashMap<&str, f64> = HashMap::new();
        for (&id, mission) in candidates {
            trajectories.insert(id, Trajectory::new(mission));
            mean_alts.insert(id, mission.mean_altitude());
        }

        let mut conflicts = Vec::new();
        for ((drone_id, _window), bucket) in group_events(events) {
            let Some(other_traj) = trajectories.get(drone_id.as_str()) else { continue };

            // Representative: closest approach; ties go to the earlier event.
            let representative = bucket
                .iter()
                .min_by(|a, b| {
                    a.separation
                        .total_cmp(&b.separation)
                        .then(a.time.total_cmp(&b.time))
                })
                .expect("bucket is non-empty");
            let t = representative.time;
            let separation = representative.separation;

            let (Some(primary_v), Some(other_v)) =
                (primary_traj.velocity(t), other_traj.velocity(t))
            else {
                continue;
            };
            let relative_velocity = primary_v.sub(&other_v).norm();

            let time_to_collision = if relative_velocity > MIN_CLOSURE_SPEED {
                separation / relative_velocity
            } else {
                f64::INFINITY
            };

            let (t_min, t_max) = bucket.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |acc, e| {
                (acc.0.min(e.time), acc.1.max(e.time))
            });
            let conflict_duration = t_max - t_min;

            let altitude_risk =
                altitude_risk_factor(primary_mean_alt, mean_alts[drone_id.as_str()]);

            let (risk_score, severity) = self.risk_score(
                separation,
                relative_velocity,
                conflict_duration,
                altitude_risk,
                time_to_collision,
            );

            conflicts.push(Conflict {
                time: t,
                location: representative.position,
                primary_drone: primary.drone_id.clone(),
                conflicting_drone: drone_id.clone(),
                separation_distance: separation,
                relative_velocity,
                conflict_duration,
                altitude_risk_factor: altitude_risk,
                risk_score,
                severity,
                time_to_collision,
                recommendation: recommendation(severity, time_to_collision, relative_velocity),
            });
        }

        conflicts.sort_by(|a, b| {
            b.risk_score
                .total_cmp(&a.risk_score)
                .then(a.time.total_cmp(&b.time))
                .then(a.conflicting_drone.cmp(&b.conflicting_drone))
        });
        conflicts
    }

    /// Normalize the four factors to [0, 1] and combine under the altitude
    /// multiplier, clipped to 1.
    fn risk_score(
        &self,
        separation: f64,
        relative_velocity: f64,
        duration: f64,
        altitude_risk: f64,
        ttc: f64,
    ) -> (f64, Severity) {
        let sep_factor = (1.0 - separation / 100.0).max(0.0);
        let vel_factor = (relative_velocity / 40.0).min(1.0);
        let dur_factor = (duration / 30.0).min(1.0);
        // Discontinuous at 5s: anything closer scores full, then a linear
        // ramp down to zero at 25s.
        let ttc_factor = if ttc < 5.0 { 1.0 } else { (1.0 - (ttc - 5.0) / 20.0).max(0.0) };

        let combined = 0.40 * sep_factor + 0.25 * vel_factor + 0.15 * dur_factor + 0.20 * ttc_factor;
        let score = (combined * altitude_risk).min(1.0);

        let severity = if score >= 0.8 {
            Severity::Critical
        } else if score >= 0.6 {
            Severity::High
        } else if score >= 0.4 {
            Severity::Warning
        } else if score >= 0.2 {
            Severity::Low
        } else {
            Severity::Safe
        };

        (score, severity)
    }
}

/// Bucket raw events by (other mission, 10-second window).
fn group_events(events: &[ProximityEvent]) -> HashMap<(String, i64), Vec<&ProximityEvent>> {
    let mut groups: HashMap<(String, i64), Vec<&ProximityEvent>> = HashMap::new();
    for event in events {
        let window = (event.time / GROUP_WINDOW).floor() as i64;
        groups
            .entry((event.drone_id.clone(), window))
            .or_default()
            .push(event);
    }
    groups
}

/// Vertical conflicts are graded on mission *mean* altitudes, not the
/// point-wise separation: two survey patterns sharing a band are dangerous
/// along their whole overlap.
fn altitude_risk_factor(primary_mean_alt: f64, other_mean_alt: f64) -> f64 {
    let vertical_separation = (primary_mean_alt - other_mean_alt).abs();
    if vertical_separation < 30.0 {
        2.0
    } else if vertical_separation < 50.0 {
        1.5
    } else if vertical_separation < 100.0 {
        1.2
    } else {
        1.0
    }
}

fn recommendation(severity: Severity, ttc: f64, relative_velocity: f64) -> String {
    match severity {
        Severity::Critical => {
            if ttc < 5.0 {
                format!(
                    "REJECT - Imminent collision (TTC={ttc:.1}s). Head-on conflict requires rerouting."
                )
            } else {
                "REJECT - Critical separation violation. Mission must be delayed or rerouted."
                    .to_string()
            }
        }
        Severity::High => {
            if relative_velocity > 30.0 {
                format!(
                    "REJECT - High relative velocity ({relative_velocity:.1}m/s). Recommend 60s delay."
                )
            } else {
                "WARN - High risk conflict. Suggest altitude adjustment (+50m) or 30s delay."
                    .to_string()
            }
        }
        Severity::Warning => {
            "CAUTION - Potential conflict detected. Monitor closely or adjust timing.".to_string()
        }
        Severity::Low => "ADVISORY - Low risk. Proceed with caution.".to_string(),
        Severity::Safe => "CLEAR - Acceptable separation maintained.".to_string(),
    }
}
