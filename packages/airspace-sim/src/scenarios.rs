//! scenarios.rs — Named demo scenarios
//!
//! Each scenario binds an airspace extent, a traffic density, an RNG seed
//! and a primary-mission template, so a demo run is reproducible from its
//! name alone. Counts and seeds can be overridden from the CLI.

/// Axis-aligned airspace box, origin at (0, 0, 0), meters.
#[derive(Debug, Clone, Copy)]
pub struct AirspaceExtent {
    pub x_m: f64,
    pub y_m: f64,
    pub z_m: f64,
}

const STANDARD_AIRSPACE: AirspaceExtent = AirspaceExtent { x_m: 5000.0, y_m: 5000.0, z_m: 1000.0 };

/// How the primary mission is constructed for a scenario.
#[derive(Debug, Clone)]
pub enum PrimaryTemplate {
    /// Pick one of the four geometric templates at random
    Random,
    StraightLine {
        start: [f64; 3],
        end: [f64; 3],
    },
    MultiWaypoint {
        num_waypoints: usize,
        altitude_range: (f64, f64),
    },
    GridSurvey {
        origin: [f64; 3],
        width: f64,
        height: f64,
        rows: usize,
    },
    CircularInspection {
        center: [f64; 3],
        radius: f64,
        points: usize,
    },
    Custom {
        waypoints: Vec<[f64; 3]>,
    },
}

#[derive(Debug, Clone)]
pub struct DemoScenario {
    pub name: &'static str,
    pub description: &'static str,
    pub airspace: AirspaceExtent,
    pub traffic_count: usize,
    pub seed: u64,
    /// Primary mission departure time, seconds
    pub start_time: f64,
    /// Primary cruise speed override; None uses the generator default
    pub velocity: Option<f64>,
    pub template: PrimaryTemplate,
}

/// All built-in scenarios, in menu order.
pub fn all() -> Vec<DemoScenario> {
    vec![
        DemoScenario {
            name: "random",
            description: "Random mission type with 75 traffic drones",
            airspace: STANDARD_AIRSPACE,
            traffic_count: 75,
            seed: 42,
            start_time: 300.0,
            velocity: None,
            template: PrimaryTemplate::Random,
        },
        DemoScenario {
            name: "grid",
            description: "Grid survey mission with 80 traffic drones",
            airspace: STANDARD_AIRSPACE,
            traffic_count: 80,
            seed: 123,
            start_time: 500.0,
            velocity: None,
            template: PrimaryTemplate::GridSurvey {
                origin: [1000.0, 1000.0, 120.0],
                width: 2000.0,
                height: 2000.0,
                rows: 6,
            },
        },
        DemoScenario {
            name: "circular",
            description: "Circular inspection mission with 60 traffic drones",
            airspace: STANDARD_AIRSPACE,
            traffic_count: 60,
            seed: 456,
            start_time: 800.0,
            velocity: None,
            template: PrimaryTemplate::CircularInspection {
                center: [2500.0, 2500.0, 200.0],
                radius: 600.0,
                points: 16,
            },
        },
        DemoScenario {
            name: "straight",
            description: "Straight line mission with 50 traffic drones",
            airspace: STANDARD_AIRSPACE,
            traffic_count: 50,
            seed: 789,
            start_time: 1200.0,
            velocity: None,
            template: PrimaryTemplate::StraightLine {
                start: [0.0, 0.0, 100.0],
                end: [5000.0, 5000.0, 150.0],
            },
        },
        DemoScenario {
            name: "multiwaypoint",
            description: "Multi-waypoint mission with 100 traffic drones",
            airspace: STANDARD_AIRSPACE,
            traffic_count: 100,
            seed: 999,
            start_time: 200.0,
            velocity: None,
            template: PrimaryTemplate::MultiWaypoint {
                num_waypoints: 7,
                altitude_range: (100.0, 300.0),
            },
        },
        DemoScenario {
            name: "custom",
            description: "Custom waypoint path with 65 traffic drones",
            airspace: STANDARD_AIRSPACE,
            traffic_count: 65,
            seed: 111,
            start_time: 600.0,
            velocity: Some(15.0),
            template: PrimaryTemplate::Custom {
                waypoints: vec![
                    [0.0, 0.0, 100.0],
                    [1000.0, 500.0, 120.0],
                    [2000.0, 1500.0, 140.0],
                    [3000.0, 1000.0, 130.0],
                    [4000.0, 2000.0, 150.0],
                    [5000.0, 2500.0, 120.0],
                ],
            },
        },
    ]
}

pub fn by_name(name: &str) -> Option<DemoScenario> {
    all().into_iter().find(|s| s.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_scenario_is_reachable_by_name() {
        for scenario in all() {
            let found = by_name(scenario.name).unwrap();
            assert_eq!(found.seed, scenario.seed);
            assert_eq!(found.traffic_count, scenario.traffic_count);
        }
        assert!(by_name("no-such-scenario").is_none());
    }
}
