//! Property test: the stage-1 filter is conservative with respect to the
//! occupancy grid. Any pair of missions that comes within the dynamic
//! safety buffer at a coarse sample time must survive all three tiers.
//!
//! Cruise speeds are capped at 40 m/s so the dynamic buffer stays under the
//! 200 m coarse acceptance radius, which is the regime the filter is
//! designed for.

use airspace_types::{Mission, Waypoint};
use deconfliction::{FilterConfig, MultiTierFilter, RiskConfig, RiskScorer, Trajectory};
use proptest::prelude::*;

const COARSE_TIME_STEP: f64 = 10.0;

fn waypoint_strategy() -> impl Strategy<Value = Waypoint> {
    (0.0..3000.0f64, 0.0..3000.0f64, 0.0..300.0f64)
        .prop_map(|(x, y, z)| Waypoint::new(x, y, z))
}

fn mission_strategy(id: &'static str) -> impl Strategy<Value = Mission> {
    (
        prop::collection::vec(waypoint_strategy(), 2..5),
        0.0..300.0f64,
        60.0..600.0f64,
        1.0..40.0f64,
    )
        .prop_map(move |(waypoints, start, duration, speed)| {
            Mission::new(waypoints, start, start + duration, id, Some(speed))
                .expect("generated mission is valid")
        })
}

proptest! {
    #[test]
    fn filter_never_rejects_a_buffer_violation(
        primary in mission_strategy("PRIMARY"),
        other in mission_strategy("OTHER"),
    ) {
        let scorer = RiskScorer::new(RiskConfig::default());
        let buffer = scorer.dynamic_safety_buffer(primary.cruise_speed);
        prop_assert!(buffer < 200.0);

        // Coarse-grid sample times over the window intersection, exactly as
        // the filter's third tier walks them.
        let t_start = primary.start_time.max(other.start_time);
        let t_end = primary.end_time.min(other.end_time);
        let primary_traj = Trajectory::new(&primary);
        let other_traj = Trajectory::new(&other);

        let mut violates_buffer = false;
        let mut t = t_start;
        while t < t_end {
            if let (Some(a), Some(b)) = (primary_traj.position(t), other_traj.position(t)) {
                if a.distance_to(&b) <= buffer {
                    violates_buffer = true;
                    break;
                }
            }
            t += COARSE_TIME_STEP;
        }

        if violates_buffer {
            let mut filter = MultiTierFilter::new(FilterConfig::default());
            let survivors = filter.filter(&primary, &[&other]);
            prop_assert_eq!(
                survivors.len(),
                1,
                "filter dropped a pair within the buffer: stats {:?}",
                filter.stats()
            );
        }
    }
}
