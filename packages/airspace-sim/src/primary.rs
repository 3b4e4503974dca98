//! primary.rs — Primary mission template generators
//!
//! Builds the mission under test from one of four geometric templates:
//! straight line, multi-waypoint tour, grid survey (lawnmower rows) and
//! circular inspection, plus a custom waypoint list. The end time always
//! derives from path length over cruise speed so the constant-speed physics
//! hold exactly.

use airspace_types::{path_length, Mission, MissionError, Waypoint};
use rand::Rng;

use crate::scenarios::AirspaceExtent;

/// Default cruise speed for generated missions, m/s.
pub const DEFAULT_VELOCITY: f64 = 12.0;

pub struct PrimaryMissionGenerator {
    airspace: AirspaceExtent,
    default_velocity: f64,
}

impl PrimaryMissionGenerator {
    pub fn new(airspace: AirspaceExtent, default_velocity: f64) -> Self {
        Self { airspace, default_velocity }
    }

    /// Two-waypoint transit.
    pub fn straight_line(
        &self,
        start: [f64; 3],
        end: [f64; 3],
        start_time: f64,
        velocity: Option<f64>,
        drone_id: &str,
    ) -> Result<Mission, MissionError> {
        let waypoints = vec![
            Waypoint::new(start[0], start[1], start[2]),
            Waypoint::new(end[0], end[1], end[2]),
        ];
        self.mission_from_waypoints(waypoints, start_time, velocity, drone_id)
    }

    /// Random tour over the airspace at altitudes in `altitude_range`.
    pub fn multi_waypoint(
        &self,
        rng: &mut impl Rng,
        num_waypoints: usize,
        altitude_range: (f64, f64),
        start_time: f64,
        velocity: Option<f64>,
        drone_id: &str,
    ) -> Result<Mission, MissionError> {
        let waypoints = (0..num_waypoints)
            .map(|_| {
                Waypoint::new(
                    rng.gen_range(0.0..self.airspace.x_m),
                    rng.gen_range(0.0..self.airspace.y_m),
                    rng.gen_range(altitude_range.0..altitude_range.1),
                )
            })
            .collect();
        self.mission_from_waypoints(waypoints, start_time, velocity, drone_id)
    }

    /// Lawnmower survey: `rows` passes over a `width` × `height` area at a
    /// fixed altitude, alternating direction each row.
    pub fn grid_survey(
        &self,
        origin: [f64; 3],
        width: f64,
        height: f64,
        rows: usize,
        start_time: f64,
        velocity: Option<f64>,
        drone_id: &str,
    ) -> Result<Mission, MissionError> {
        let [x0, y0, z] = origin;
        let row_spacing = if rows > 1 { height / (rows as f64 - 1.0) } else { 0.0 };

        let mut waypoints = Vec::with_capacity(rows * 2);
        for i in 0..rows {
            let y = y0 + i as f64 * row_spacing;
            if i % 2 == 0 {
                waypoints.push(Waypoint::new(x0, y, z));
                waypoints.push(Waypoint::new(x0 + width, y, z));
            } else {
                waypoints.push(Waypoint::new(x0 + width, y, z));
                waypoints.push(Waypoint::new(x0, y, z));
            }
        }
        self.mission_from_waypoints(waypoints, start_time, velocity, drone_id)
    }

    /// Closed ring of `points` stations around `center`.
    pub fn circular_inspection(
        &self,
        center: [f64; 3],
        radius: f64,
        points: usize,
        start_time: f64,
        velocity: Option<f64>,
        drone_id: &str,
    ) -> Result<Mission, MissionError> {
        let [cx, cy, cz] = center;
        let waypoints = (0..=points)
            .map(|i| {
                let angle = std::f64::consts::TAU * i as f64 / points as f64;
                Waypoint::new(cx + radius * angle.cos(), cy + radius * angle.sin(), cz)
            })
            .collect();
        self.mission_from_waypoints(waypoints, start_time, velocity, drone_id)
    }

    /// Explicit waypoint list.
    pub fn custom(
        &self,
        coords: &[[f64; 3]],
        start_time: f64,
        velocity: Option<f64>,
        drone_id: &str,
    ) -> Result<Mission, MissionError> {
        let waypoints = coords.iter().map(|&[x, y, z]| Waypoint::new(x, y, z)).collect();
        self.mission_from_waypoints(waypoints, start_time, velocity, drone_id)
    }

    /// One of the four templates, chosen and parameterized at random.
    pub fn random(
        &self,
        rng: &mut impl Rng,
        start_time: f64,
        velocity: Option<f64>,
        drone_id: &str,
    ) -> Result<Mission, MissionError> {
        match rng.gen_range(0..4) {
            0 => {
                let start = [
                    rng.gen_range(0.0..self.airspace.x_m * 0.3),
                    rng.gen_range(0.0..self.airspace.y_m * 0.3),
                    rng.gen_range(50.0..200.0),
                ];
                let end = [
                    rng.gen_range(self.airspace.x_m * 0.7..self.airspace.x_m),
                    rng.gen_range(self.airspace.y_m * 0.7..self.airspace.y_m),
                    rng.gen_range(50.0..200.0),
                ];
                self.straight_line(start, end, start_time, velocity, drone_id)
            }
            1 => {
                let num_waypoints = rng.gen_range(3..=8);
                let altitude_range = (rng.gen_range(50.0..100.0), rng.gen_range(150.0..250.0));
                self.multi_waypoint(rng, num_waypoints, altitude_range, start_time, velocity, drone_id)
            }
            2 => {
                let origin = [
                    rng.gen_range(0.0..self.airspace.x_m * 0.5),
                    rng.gen_range(0.0..self.airspace.y_m * 0.5),
                    rng.gen_range(80.0..150.0),
                ];
                let width = rng.gen_range(500.0..1500.0);
                let height = rng.gen_range(500.0..1500.0);
                let rows = rng.gen_range(3..=7);
                self.grid_survey(origin, width, height, rows, start_time, velocity, drone_id)
            }
            _ => {
                let center = [
                    rng.gen_range(self.airspace.x_m * 0.3..self.airspace.x_m * 0.7),
                    rng.gen_range(self.airspace.y_m * 0.3..self.airspace.y_m * 0.7),
                    rng.gen_range(80.0..150.0),
                ];
                let radius = rng.gen_range(300.0..800.0);
                let points = rng.gen_range(6..=12);
                self.circular_inspection(center, radius, points, start_time, velocity, drone_id)
            }
        }
    }

    fn mission_from_waypoints(
        &self,
        waypoints: Vec<Waypoint>,
        start_time: f64,
        velocity: Option<f64>,
        drone_id: &str,
    ) -> Result<Mission, MissionError> {
        let velocity = velocity.unwrap_or(self.default_velocity);
        let duration = if velocity > 0.0 { path_length(&waypoints) / velocity } else { 0.0 };
        Mission::new(waypoints, start_time, start_time + duration, drone_id, Some(velocity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn generator() -> PrimaryMissionGenerator {
        PrimaryMissionGenerator::new(
            AirspaceExtent { x_m: 5000.0, y_m: 5000.0, z_m: 1000.0 },
            DEFAULT_VELOCITY,
        )
    }

    #[test]
    fn straight_line_duration_follows_path_length() {
        let m = generator()
            .straight_line([0.0, 0.0, 100.0], [1200.0, 0.0, 100.0], 50.0, None, "PRIMARY")
            .unwrap();
        assert_eq!(m.waypoints.len(), 2);
        assert_eq!(m.start_time, 50.0);
        assert!((m.duration() - 100.0).abs() < 1e-9);
        assert_eq!(m.cruise_speed, 12.0);
    }

    #[test]
    fn grid_survey_alternates_rows() {
        let m = generator()
            .grid_survey([1000.0, 1000.0, 120.0], 2000.0, 2000.0, 6, 0.0, None, "PRIMARY")
            .unwrap();
        assert_eq!(m.waypoints.len(), 12);
        // Row 0 flies west→east, row 1 east→west.
        assert_eq!(m.waypoints[0].x, 1000.0);
        assert_eq!(m.waypoints[1].x, 3000.0);
        assert_eq!(m.waypoints[2].x, 3000.0);
        assert_eq!(m.waypoints[3].x, 1000.0);
        assert!(m.waypoints.iter().all(|wp| wp.z == 120.0));
    }

    #[test]
    fn circular_inspection_closes_the_ring() {
        let m = generator()
            .circular_inspection([2500.0, 2500.0, 200.0], 600.0, 16, 0.0, None, "PRIMARY")
            .unwrap();
        assert_eq!(m.waypoints.len(), 17);
        let first = m.waypoints[0];
        let last = m.waypoints[16];
        assert!(first.distance_to(&last) < 1e-6);
        for wp in &m.waypoints {
            let r = ((wp.x - 2500.0).powi(2) + (wp.y - 2500.0).powi(2)).sqrt();
            assert!((r - 600.0).abs() < 1e-6);
        }
    }

    #[test]
    fn custom_uses_supplied_velocity() {
        let coords = [[0.0, 0.0, 100.0], [3000.0, 0.0, 100.0]];
        let m = generator().custom(&coords, 600.0, Some(15.0), "PRIMARY").unwrap();
        assert_eq!(m.cruise_speed, 15.0);
        assert!((m.duration() - 200.0).abs() < 1e-9);
    }

    #[test]
    fn random_template_is_seed_deterministic() {
        let g = generator();
        let mut rng_a = StdRng::seed_from_u64(42);
        let mut rng_b = StdRng::seed_from_u64(42);
        let a = g.random(&mut rng_a, 0.0, None, "PRIMARY").unwrap();
        let b = g.random(&mut rng_b, 0.0, None, "PRIMARY").unwrap();
        assert_eq!(a, b);
    }
}
