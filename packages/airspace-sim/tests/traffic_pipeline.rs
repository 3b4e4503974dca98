//! Full-system tests: dense random traffic through the pipeline, seeded
//! reproducibility, and export artifacts on disk.

use airspace_types::{
    DeconflictionResultRecord, Mission, MissionRecord, TrafficFileRecord, Waypoint,
};
use airspace_sim::export::{export_results, ExportInputs};
use airspace_sim::report::summary_report;
use airspace_sim::scenarios::AirspaceExtent;
use airspace_sim::traffic::TrafficGenerator;
use deconfliction::DeconflictionPipeline;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn short_transit() -> Mission {
    Mission::new(
        vec![Waypoint::new(0.0, 0.0, 100.0), Waypoint::new(1000.0, 0.0, 100.0)],
        0.0,
        100.0,
        "PRIMARY",
        None,
    )
    .unwrap()
}

/// Random transits scattered through a 3000×3000×200 m box with staggered
/// departure times.
fn random_box_traffic(count: usize, seed: u64) -> Vec<Mission> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            let n = rng.gen_range(2..=4);
            let waypoints: Vec<Waypoint> = (0..n)
                .map(|_| {
                    Waypoint::new(
                        rng.gen_range(0.0..3000.0),
                        rng.gen_range(0.0..3000.0),
                        rng.gen_range(0.0..200.0),
                    )
                })
                .collect();
            let start = rng.gen_range(0.0..600.0);
            let speed = 12.0;
            let duration = airspace_types::path_length(&waypoints) / speed;
            Mission::new(waypoints, start, start + duration, format!("TRAFFIC-{i:03}"), Some(speed))
                .unwrap()
        })
        .collect()
}

#[test]
fn dense_random_traffic_is_heavily_filtered_and_fast() {
    let mut pipeline = DeconflictionPipeline::default();
    for mission in random_box_traffic(100, 20240613) {
        pipeline.register(mission);
    }
    assert_eq!(pipeline.mission_count(), 100);

    let result = pipeline.check(&short_transit());

    let stats = pipeline.filter_stats();
    assert_eq!(stats.initial, 100);
    // The tiers must strip at least 80% of the registry before the grid.
    assert!(
        stats.after_coarse <= 20,
        "stage-1 kept too many candidates: {stats:?}"
    );
    assert!(
        result.metrics.total_time_ms < 100.0,
        "check took {:.2} ms",
        result.metrics.total_time_ms
    );
}

#[test]
fn identical_seeds_give_identical_verdicts() {
    let run = || {
        let mut pipeline = DeconflictionPipeline::default();
        let mut gen = TrafficGenerator::new(
            AirspaceExtent { x_m: 3000.0, y_m: 3000.0, z_m: 200.0 },
            12.0,
            600.0,
            4242,
        );
        for mission in gen.generate(60) {
            pipeline.register(mission);
        }
        pipeline.check(&short_transit())
    };

    let a = run();
    let b = run();
    assert_eq!(a.is_clear, b.is_clear);
    assert_eq!(a.conflicts.len(), b.conflicts.len());
    for (ca, cb) in a.conflicts.iter().zip(&b.conflicts) {
        assert_eq!(ca.conflicting_drone, cb.conflicting_drone);
        assert_eq!(ca.time, cb.time);
        assert_eq!(ca.risk_score, cb.risk_score);
        assert_eq!(ca.severity, cb.severity);
    }
}

#[test]
fn export_writes_all_artifacts() {
    let primary = short_transit();
    let airspace = AirspaceExtent { x_m: 3000.0, y_m: 3000.0, z_m: 200.0 };
    let mut gen = TrafficGenerator::new(airspace, 12.0, 600.0, 7);
    let traffic = gen.generate(10);

    let mut pipeline = DeconflictionPipeline::default();
    for mission in &traffic {
        pipeline.register(mission.clone());
    }
    let result = pipeline.check(&primary);
    let report = summary_report(&primary, traffic.len(), &result);

    let dir = tempfile::tempdir().unwrap();
    export_results(
        dir.path(),
        &ExportInputs {
            primary: &primary,
            traffic: &traffic,
            airspace,
            flight_duration: 600.0,
            velocity: 12.0,
            result: &result,
            report: &report,
        },
    )
    .unwrap();

    let primary_json = std::fs::read_to_string(dir.path().join("primary_mission.json")).unwrap();
    let primary_back: MissionRecord = serde_json::from_str(&primary_json).unwrap();
    assert_eq!(primary_back.drone_id, "PRIMARY");
    assert_eq!(primary_back.into_mission().unwrap(), primary);

    let traffic_json = std::fs::read_to_string(dir.path().join("traffic_missions.json")).unwrap();
    let traffic_back: TrafficFileRecord = serde_json::from_str(&traffic_json).unwrap();
    assert_eq!(traffic_back.metadata.num_drones, 10);
    assert_eq!(traffic_back.traffic.len(), 10);

    let results_json =
        std::fs::read_to_string(dir.path().join("deconfliction_results.json")).unwrap();
    let results_back: DeconflictionResultRecord = serde_json::from_str(&results_json).unwrap();
    assert_eq!(results_back.is_clear, result.is_clear);
    assert_eq!(results_back.conflicts.len(), result.conflicts.len());
    assert_eq!(results_back.metrics.stage1_reduction, result.metrics.stage1_reduction);

    let report_txt = std::fs::read_to_string(dir.path().join("summary_report.txt")).unwrap();
    assert!(report_txt.contains("UAV STRATEGIC DECONFLICTION SYSTEM"));
}
