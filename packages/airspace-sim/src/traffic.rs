//! traffic.rs — Background traffic generation
//!
//! Populates the airspace with registered missions drawn from eleven flight
//! patterns: transits, surveillance loops, survey sweeps and inspection
//! profiles. All randomness flows through one seeded RNG so a scenario is
//! reproducible from its seed.

use airspace_types::{path_length, Mission, MissionError, Waypoint};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Uniform};
use tracing::warn;

use crate::scenarios::AirspaceExtent;

/// The available traffic flight patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrafficPattern {
    /// Straight transit across the airspace
    Flyby,
    /// Closed surveillance ring around the airspace center
    Circular,
    /// Closed triangular patrol
    Triangular,
    /// Star-shaped patrol with alternating radii
    Star,
    /// Random waypoint tour
    Random,
    /// Lawnmower surveillance sweep
    Grid,
    /// Ring with jittered radii (photogrammetry mapping)
    Mapping,
    /// Lemniscate loop
    FigureEight,
    /// Helical climb around a tower
    Highrise,
    /// Low-altitude perimeter walk
    Lowrise,
    /// Racetrack holding box
    Holding,
}

impl TrafficPattern {
    pub const ALL: [TrafficPattern; 11] = [
        TrafficPattern::Flyby,
        TrafficPattern::Circular,
        TrafficPattern::Triangular,
        TrafficPattern::Star,
        TrafficPattern::Random,
        TrafficPattern::Grid,
        TrafficPattern::Mapping,
        TrafficPattern::FigureEight,
        TrafficPattern::Highrise,
        TrafficPattern::Lowrise,
        TrafficPattern::Holding,
    ];
}

/// Seeded generator of `TRAFFIC-###` missions.
pub struct TrafficGenerator {
    airspace: AirspaceExtent,
    velocity: f64,
    flight_duration: f64,
    rng: StdRng,
}

impl TrafficGenerator {
    pub fn new(airspace: AirspaceExtent, velocity: f64, flight_duration: f64, seed: u64) -> Self {
        Self { airspace, velocity, flight_duration, rng: StdRng::seed_from_u64(seed) }
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn flight_duration(&self) -> f64 {
        self.flight_duration
    }

    /// Generate `count` missions with randomly chosen patterns.
    pub fn generate(&mut self, count: usize) -> Vec<Mission> {
        let mut missions = Vec::with_capacity(count);
        for i in 0..count {
            let drone_id = format!("TRAFFIC-{i:03}");
            let pattern = TrafficPattern::ALL[self.rng.gen_range(0..TrafficPattern::ALL.len())];
            match self.build(pattern, &drone_id) {
                Ok(mission) => missions.push(mission),
                Err(err) => warn!(%drone_id, ?pattern, %err, "skipping degenerate traffic mission"),
            }
        }
        missions
    }

    fn build(&mut self, pattern: TrafficPattern, drone_id: &str) -> Result<Mission, MissionError> {
        let waypoints = match pattern {
            TrafficPattern::Flyby => self.flyby(),
            TrafficPattern::Circular => self.circular(),
            TrafficPattern::Triangular => self.triangular(),
            TrafficPattern::Star => self.star(),
            TrafficPattern::Random => self.random_tour(),
            TrafficPattern::Grid => self.grid(),
            TrafficPattern::Mapping => self.mapping(),
            TrafficPattern::FigureEight => self.figure_eight(),
            TrafficPattern::Highrise => self.highrise(),
            TrafficPattern::Lowrise => self.lowrise(),
            TrafficPattern::Holding => self.holding(),
        };
        self.mission_from_waypoints(waypoints, drone_id)
    }

    fn cruise_altitude(&mut self) -> f64 {
        Uniform::new(100.0, 300.0).sample(&mut self.rng)
    }

    fn center(&self) -> (f64, f64) {
        (self.airspace.x_m / 2.0, self.airspace.y_m / 2.0)
    }

    fn mission_from_waypoints(
        &self,
        waypoints: Vec<Waypoint>,
        drone_id: &str,
    ) -> Result<Mission, MissionError> {
        let duration = if self.velocity > 0.0 {
            path_length(&waypoints) / self.velocity
        } else {
            self.flight_duration
        };
        Mission::new(waypoints, 0.0, duration, drone_id, Some(self.velocity))
    }

    // ── Simple patterns ───────────────────────────────────────────────────────

    fn flyby(&mut self) -> Vec<Waypoint> {
        let altitude = self.cruise_altitude();
        let start_x = self.rng.gen_range(0.0..self.airspace.x_m * 0.2);
        let start_y = self.rng.gen_range(0.0..self.airspace.y_m);
        let end_x = self.rng.gen_range(self.airspace.x_m * 0.8..self.airspace.x_m);
        let end_y = self.rng.gen_range(0.0..self.airspace.y_m);
        vec![
            Waypoint::new(start_x, start_y, altitude),
            Waypoint::new(end_x, end_y, altitude),
        ]
    }

    fn circular(&mut self) -> Vec<Waypoint> {
        let (cx, cy) = self.center();
        let altitude = self.cruise_altitude();
        closed_ring(cx, cy, altitude, 500.0, 8)
    }

    fn triangular(&mut self) -> Vec<Waypoint> {
        let (cx, cy) = self.center();
        let altitude = self.cruise_altitude();
        let side = 1000.0;
        let height = side * 3.0_f64.sqrt() / 2.0;
        vec![
            Waypoint::new(cx, cy + 2.0 * height / 3.0, altitude),
            Waypoint::new(cx - side / 2.0, cy - height / 3.0, altitude),
            Waypoint::new(cx + side / 2.0, cy - height / 3.0, altitude),
            Waypoint::new(cx, cy + 2.0 * height / 3.0, altitude),
        ]
    }

    fn star(&mut self) -> Vec<Waypoint> {
        let (cx, cy) = self.center();
        let altitude = self.cruise_altitude();
        let outer = 600.0;
        let points = 5;
        (0..=2 * points)
            .map(|i| {
                let r = if i % 2 == 0 { outer } else { outer / 2.0 };
                let angle = std::f64::consts::PI * i as f64 / points as f64;
                Waypoint::new(cx + r * angle.cos(), cy + r * angle.sin(), altitude)
            })
            .collect()
    }

    fn random_tour(&mut self) -> Vec<Waypoint> {
        let n = self.rng.gen_range(5..=10);
        (0..n)
            .map(|_| {
                Waypoint::new(
                    self.rng.gen_range(0.0..self.airspace.x_m),
                    self.rng.gen_range(0.0..self.airspace.y_m),
                    self.rng.gen_range(100.0..300.0),
                )
            })
            .collect()
    }

    // ── Complex patterns ──────────────────────────────────────────────────────

    fn grid(&mut self) -> Vec<Waypoint> {
        let altitude = self.cruise_altitude();
        let (width, height, rows) = (2000.0, 2000.0, 5_usize);
        let y_step = height / (rows as f64 - 1.0);

        let mut waypoints = Vec::with_capacity(rows * 2);
        for i in 0..rows {
            let y = i as f64 * y_step;
            if i % 2 == 0 {
                waypoints.push(Waypoint::new(0.0, y, altitude));
                waypoints.push(Waypoint::new(width, y, altitude));
            } else {
                waypoints.push(Waypoint::new(width, y, altitude));
                waypoints.push(Waypoint::new(0.0, y, altitude));
            }
        }
        waypoints
    }

    fn mapping(&mut self) -> Vec<Waypoint> {
        let (cx, cy) = self.center();
        let altitude = self.cruise_altitude();
        let size = 500.0;
        let jitter = Uniform::new(0.8, 1.2);
        (0..8)
            .map(|i| {
                let angle = std::f64::consts::TAU * i as f64 / 8.0;
                let r = size * jitter.sample(&mut self.rng);
                Waypoint::new(cx + r * angle.cos(), cy + r * angle.sin(), altitude)
            })
            .collect()
    }

    fn figure_eight(&mut self) -> Vec<Waypoint> {
        let (cx, cy) = self.center();
        let altitude = self.cruise_altitude();
        let size = 500.0;
        let n = 20;
        (0..n)
            .map(|i| {
                let t = std::f64::consts::TAU * i as f64 / (n as f64 - 1.0);
                Waypoint::new(cx + size * t.sin(), cy + size * t.sin() * t.cos(), altitude)
            })
            .collect()
    }

    // ── Inspection patterns ───────────────────────────────────────────────────

    fn highrise(&mut self) -> Vec<Waypoint> {
        let (cx, cy) = self.center();
        let (radius, height) = (300.0, 500.0);
        let (levels, per_level) = (5_usize, 8_usize);
        let mut waypoints = Vec::with_capacity(levels * per_level);
        for level in 0..levels {
            let z = (height / levels as f64) * level as f64;
            for i in 0..per_level {
                let angle = std::f64::consts::TAU * i as f64 / per_level as f64;
                waypoints.push(Waypoint::new(
                    cx + radius * angle.cos(),
                    cy + radius * angle.sin(),
                    z,
                ));
            }
        }
        waypoints
    }

    fn lowrise(&mut self) -> Vec<Waypoint> {
        let altitude = Uniform::new(50.0, 100.0).sample(&mut self.rng);
        let (perimeter, n) = (1000.0, 20);
        let step = perimeter / n as f64;
        (0..n)
            .map(|i| {
                Waypoint::new(
                    (i % 4) as f64 * step,
                    ((i / 4) % 4) as f64 * step,
                    altitude,
                )
            })
            .collect()
    }

    fn holding(&mut self) -> Vec<Waypoint> {
        let (cx, cy) = self.center();
        let altitude = self.cruise_altitude();
        let (width, height) = (1000.0, 500.0);
        vec![
            Waypoint::new(cx - width / 2.0, cy - height / 2.0, altitude),
            Waypoint::new(cx + width / 2.0, cy - height / 2.0, altitude),
            Waypoint::new(cx + width / 2.0, cy + height / 2.0, altitude),
            Waypoint::new(cx - width / 2.0, cy + height / 2.0, altitude),
            Waypoint::new(cx - width / 2.0, cy - height / 2.0, altitude),
        ]
    }
}

/// Closed ring of `points` stations; first and last waypoints coincide.
fn closed_ring(cx: f64, cy: f64, altitude: f64, radius: f64, points: usize) -> Vec<Waypoint> {
    (0..=points)
        .map(|i| {
            let angle = std::f64::consts::TAU * i as f64 / points as f64;
            Waypoint::new(cx + radius * angle.cos(), cy + radius * angle.sin(), altitude)
        })
        .collect()
}
