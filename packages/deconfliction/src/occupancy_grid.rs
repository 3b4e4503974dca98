//! occupancy_grid.rs — Stage 2: sparse 4D occupancy grid
//!
//! Buckets candidate trajectories into (x, y, z, t) cells at a fixed spatial
//! cell size and temporal tick, then sweeps the primary trajectory probing
//! the 3×3×3×3 neighborhood of each sample's cell.
//!
//! The neighborhood probe is exact while the safety buffer stays at or below
//! the cell size; beyond that, events at cell-boundary crossings can be
//! under-reported. Operators running faster traffic should scale
//! `cell_size_m` with the buffer.
//!
//! Event emission order follows cell iteration and is treated as unordered
//! downstream.

use std::collections::HashMap;

use airspace_types::{Mission, Waypoint};
use tracing::debug;

use crate::config::GridConfig;
use crate::trajectory::Trajectory;

/// 4D grid cell index: floor-divided position and time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellKey {
    pub ix: i64,
    pub iy: i64,
    pub iz: i64,
    pub it: i64,
}

/// One sampled occupant of a cell.
#[derive(Debug, Clone)]
struct GridEntry {
    drone_id: String,
    position: Waypoint,
}

/// A single sub-buffer close approach detected during the sweep.
#[derive(Debug, Clone)]
pub struct ProximityEvent {
    /// Sample time, seconds
    pub time: f64,
    /// Primary drone position at the sample
    pub position: Waypoint,
    /// The other mission's registry id
    pub drone_id: String,
    /// Separation at the sample, meters
    pub separation: f64,
}

/// Stage-2 grid. Rebuilt for every check and cleared afterwards so the
/// steady-state footprint stays proportional to the registry.
pub struct OccupancyGrid {
    config: GridConfig,
    grid: HashMap<CellKey, Vec<GridEntry>>,
}

impl OccupancyGrid {
    pub fn new(config: GridConfig) -> Self {
        Self { config, grid: HashMap::new() }
    }

    fn cell_key(&self, position: &Waypoint, time: f64) -> CellKey {
        CellKey {
            ix: (position.x / self.config.cell_size_m).floor() as i64,
            iy: (position.y / self.config.cell_size_m).floor() as i64,
            iz: (position.z / self.config.cell_size_m).floor() as i64,
            it: (time / self.config.time_resolution_s).floor() as i64,
        }
    }

    /// Populate the grid by sampling every candidate across its own window
    /// at the configured temporal tick.
    pub fn build(&mut self, candidates: &[&Mission]) {
        self.grid.clear();

        for mission in candidates {
            let traj = Trajectory::new(mission);
            let mut t = mission.start_time;
            while t < mission.end_time {
                if let Some(position) = traj.position(t) {
                    let key = self.cell_key(&position, t);
                    self.grid.entry(key).or_default().push(GridEntry {
                        drone_id: mission.drone_id.clone(),
                        position,
                    });
                }
                t += self.config.time_resolution_s;
            }
        }

        debug!(cells = self.grid.len(), "occupancy grid built");
    }

    /// Sweep the primary trajectory against the grid. The stride adapts to
    /// the buffer and cruise speed so a crossing cannot be stepped over;
    /// a zero cruise speed degrades to the grid tick (IEEE min absorbs the
    /// infinite quotient).
    ///
    /// Emits an event for every occupant strictly closer than
    /// `safety_buffer`; separation exactly equal to the buffer is safe.
    pub fn query(&self, primary: &Mission, safety_buffer: f64) -> Vec<ProximityEvent> {
        let traj = Trajectory::new(primary);
        let dt = (safety_buffer / (2.0 * traj.cruise_speed())).min(self.config.time_resolution_s);

        let mut events = Vec::new();
        let mut t = primary.start_time;
        while t < primary.end_time {
            if let Some(position) = traj.position(t) {
                let center = self.cell_key(&position, t);
                for dx in -1..=1 {
                    for dy in -1..=1 {
                        for dz in -1..=1 {
                            for dt_cell in -1..=1 {
                                let key = CellKey {
                                    ix: center.ix + dx,
                                    iy: center.iy + dy,
                                    iz: center.iz + dz,
                                    it: center.it + dt_cell,
                                };
                                let Some(bucket) = self.grid.get(&key) else { continue };
                                for entry in bucket {
                                    let separation = position.distance_to(&entry.position);
                                    if separation < safety_buffer {
                                        events.push(ProximityEvent {
                                            time: t,
                                            position,
                                            drone_id: entry.drone_id.clone(),
                                            separation,
                                        });
                                    }
                                }
                            }
                        }
                    }
                }
            }
            t += dt;
        }

        events
    }

    /// Drop all buckets. Called between checks to release the transient
    /// working set.
    pub fn clear(&mut self) {
        self.grid.clear();
        self.grid.shrink_to_fit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use airspace_types::Waypoint;

    fn track(id: &str, y: f64) -> Mission {
        Mission::new(
            vec![Waypoint::new(0.0, y, 100.0), Waypoint::new(1000.0, y, 100.0)],
            0.0,
            100.0,
            id,
            None,
        )
        .unwrap()
    }

    #[test]
    fn cell_key_uses_floor_division() {
        let grid = OccupancyGrid::new(GridConfig::default());
        let key = grid.cell_key(&Waypoint::new(-0.5, 199.9, 100.0), 7.2);
        assert_eq!(key, CellKey { ix: -1, iy: 1, iz: 1, it: 7 });
    }

    #[test]
    fn coincident_tracks_produce_events() {
        let primary = track("PRIMARY", 0.0);
        let other = track("OTHER", 10.0);
        let mut grid = OccupancyGrid::new(GridConfig::default());
        grid.build(&[&other]);

        let events = grid.query(&primary, 50.0);
        assert!(!events.is_empty());
        assert!(events.iter().all(|e| e.drone_id == "OTHER"));
        assert!(events.iter().all(|e| e.separation >= 10.0 && e.separation < 50.0));
    }

    #[test]
    fn separation_equal_to_buffer_is_not_an_event() {
        let primary = track("PRIMARY", 0.0);
        let at_buffer = track("AT", 50.0);
        let inside = track("IN", 49.0);
        let mut grid = OccupancyGrid::new(GridConfig::default());

        grid.build(&[&at_buffer]);
        assert!(grid.query(&primary, 50.0).is_empty());

        grid.build(&[&inside]);
        assert!(!grid.query(&primary, 50.0).is_empty());
    }

    #[test]
    fn stationary_target_occupies_every_tick() {
        let primary = track("PRIMARY", 0.0);
        let hover = Mission::new(
            vec![Waypoint::new(500.0, 0.0, 100.0), Waypoint::new(500.0, 0.0, 100.0)],
            0.0,
            100.0,
            "HOVER",
            Some(0.0),
        )
        .unwrap();
        let mut grid = OccupancyGrid::new(GridConfig::default());
        grid.build(&[&hover]);

        let events = grid.query(&primary, 50.0);
        assert!(!events.is_empty());
        // The primary passes directly through the hover point.
        let min_sep = events.iter().map(|e| e.separation).fold(f64::INFINITY, f64::min);
        assert!(min_sep < 1.0);
    }

    #[test]
    fn clear_releases_the_working_set() {
        let other = track("OTHER", 0.0);
        let mut grid = OccupancyGrid::new(GridConfig::default());
        grid.build(&[&other]);
        grid.clear();
        assert!(grid.query(&track("PRIMARY", 0.0), 50.0).is_empty());
    }
}
