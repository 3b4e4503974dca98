//! trajectory.rs — Constant-cruise-speed trajectory table
//!
//! Turns a static `Mission` (waypoints + time window) into a 4D view that
//! answers "where is the drone at time t, and how fast is it moving".
//!
//! Segment timing follows the constant-speed model: each segment takes
//! length / cruise_speed seconds. When the cruise speed was supplied
//! externally the segment end-times may land short of (or past) the mission
//! window; inside the window the segment table is authoritative, and a query
//! past the last segment pins to the final waypoint with zero velocity.

use airspace_types::{Mission, Vec3, Waypoint};

/// One polyline leg with absolute timing and a unit direction.
#[derive(Debug, Clone)]
pub struct Segment {
    pub start: Waypoint,
    pub end: Waypoint,
    pub start_time: f64,
    pub end_time: f64,
    pub length: f64,
    pub duration: f64,
    /// Unit direction start → end; zero vector for a zero-length segment
    pub direction: Vec3,
}

/// Read-only interpolation table over one mission.
#[derive(Debug, Clone)]
pub struct Trajectory {
    start_time: f64,
    end_time: f64,
    cruise_speed: f64,
    last_waypoint: Waypoint,
    segments: Vec<Segment>,
}

impl Trajectory {
    /// Build the segment table in one pass over the waypoints.
    pub fn new(mission: &Mission) -> Self {
        let speed = mission.cruise_speed;
        let mut segments = Vec::with_capacity(mission.waypoints.len() - 1);
        let mut current_time = mission.start_time;

        for pair in mission.waypoints.windows(2) {
            let (start, end) = (pair[0], pair[1]);
            let length = start.distance_to(&end);
            let duration = if speed > 0.0 { length / speed } else { 0.0 };
            let direction = if length > 0.0 {
                end.to_vec3().sub(&start.to_vec3()).scale(1.0 / length)
            } else {
                Vec3::zero()
            };

            segments.push(Segment {
                start,
                end,
                start_time: current_time,
                end_time: current_time + duration,
                length,
                duration,
                direction,
            });
            current_time += duration;
        }

        Self {
            start_time: mission.start_time,
            end_time: mission.end_time,
            cruise_speed: speed,
            last_waypoint: *mission.waypoints.last().expect("mission has waypoints"),
            segments,
        }
    }

    pub fn cruise_speed(&self) -> f64 {
        self.cruise_speed
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Interpolated position at `time`, or `None` outside the mission window.
    pub fn position(&self, time: f64) -> Option<Waypoint> {
        if time < self.start_time || time > self.end_time {
            return None;
        }

        for seg in &self.segments {
            if seg.start_time <= time && time <= seg.end_time {
                let progress = if seg.duration > 0.0 {
                    (time - seg.start_time) / seg.duration
                } else {
                    0.0
                };
                let delta = seg.end.to_vec3().sub(&seg.start.to_vec3());
                let pos = seg.start.to_vec3().add(&delta.scale(progress));
                return Some(Waypoint::new(pos.x, pos.y, pos.z));
            }
        }

        // Inside the window but past the last segment end-time: the drone
        // has arrived and holds at the final waypoint.
        Some(self.last_waypoint)
    }

    /// Velocity vector at `time`, or `None` outside the mission window.
    /// Constant per segment; zero once the path is complete.
    pub fn velocity(&self, time: f64) -> Option<Vec3> {
        if time < self.start_time || time > self.end_time {
            return None;
        }

        for seg in &self.segments {
            if seg.start_time <= time && time <= seg.end_time {
                return Some(seg.direction.scale(self.cruise_speed));
            }
        }

        Some(Vec3::zero())
    }
}
