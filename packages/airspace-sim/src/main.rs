//! main.rs — airspace-sim entry point
//!
//! Demo workflow for the deconfliction pipeline:
//!   1. Build the primary mission from the scenario's template
//!   2. Generate seeded background traffic
//!   3. Register traffic and run the three-stage check
//!   4. Print the summary report and optionally export JSON artifacts

use std::path::{Path, PathBuf};

use airspace_types::Mission;
use anyhow::{bail, Context, Result};
use clap::Parser;
use deconfliction::{DeconflictionPipeline, PipelineConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use airspace_sim::export::{self, ExportInputs};
use airspace_sim::primary::{self, PrimaryMissionGenerator};
use airspace_sim::report;
use airspace_sim::scenarios::{self, DemoScenario, PrimaryTemplate};
use airspace_sim::traffic::TrafficGenerator;

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "airspace-sim", about = "UAV strategic deconfliction demo runner")]
struct Args {
    /// Scenario name (see --list)
    #[arg(short, long, default_value = "straight")]
    scenario: String,
    /// List available scenarios and exit
    #[arg(long)]
    list: bool,
    /// Override the scenario's traffic drone count
    #[arg(long)]
    traffic: Option<usize>,
    /// Override the scenario's RNG seed
    #[arg(long)]
    seed: Option<u64>,
    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,
    /// Output directory for JSON artifacts and the text report
    #[arg(short, long)]
    out: Option<PathBuf>,
}

// ── Config structs ────────────────────────────────────────────────────────────

#[derive(Debug, serde::Deserialize)]
struct FullConfig {
    traffic: TrafficTuning,
    #[serde(default)]
    pipeline: PipelineConfig,
}

#[derive(Debug, serde::Deserialize)]
struct TrafficTuning {
    velocity_mps: f64,
    flight_duration_s: f64,
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "airspace_sim=info".into()),
        )
        .init();

    let args = Args::parse();

    if args.list {
        for s in scenarios::all() {
            println!("{:<14} {} (seed {})", s.name, s.description, s.seed);
        }
        return Ok(());
    }

    let config_str = std::fs::read_to_string(&args.config)
        .unwrap_or_else(|_| include_str!("../config.toml").to_string());
    let cfg: FullConfig = toml::from_str(&config_str).context("invalid config.toml")?;

    let Some(mut scenario) = scenarios::by_name(&args.scenario) else {
        bail!("unknown scenario '{}'; use --list to see the menu", args.scenario);
    };
    if let Some(count) = args.traffic {
        scenario.traffic_count = count;
    }
    if let Some(seed) = args.seed {
        scenario.seed = seed;
    }

    run(&scenario, &cfg, args.out.as_deref())
}

fn run(scenario: &DemoScenario, cfg: &FullConfig, out: Option<&Path>) -> Result<()> {
    info!(
        name = scenario.name,
        drones = scenario.traffic_count,
        seed = scenario.seed,
        "running scenario"
    );

    let mut rng = StdRng::seed_from_u64(scenario.seed);
    let generator = PrimaryMissionGenerator::new(scenario.airspace, primary::DEFAULT_VELOCITY);
    let primary_mission = build_primary(&generator, scenario, &mut rng)
        .context("building primary mission")?;
    info!(
        drone_id = %primary_mission.drone_id,
        waypoints = primary_mission.waypoints.len(),
        distance_m = primary_mission.total_distance(),
        "primary mission ready"
    );

    let mut traffic_gen = TrafficGenerator::new(
        scenario.airspace,
        cfg.traffic.velocity_mps,
        cfg.traffic.flight_duration_s,
        scenario.seed,
    );
    let traffic_missions = traffic_gen.generate(scenario.traffic_count);
    info!(count = traffic_missions.len(), "traffic generated");

    let mut pipeline = DeconflictionPipeline::new(cfg.pipeline.clone());
    for mission in &traffic_missions {
        pipeline.register(mission.clone());
    }

    let result = pipeline.check(&primary_mission);
    let summary = report::summary_report(&primary_mission, traffic_missions.len(), &result);
    println!("{summary}");

    if let Some(dir) = out {
        export::export_results(
            dir,
            &ExportInputs {
                primary: &primary_mission,
                traffic: &traffic_missions,
                airspace: scenario.airspace,
                flight_duration: cfg.traffic.flight_duration_s,
                velocity: cfg.traffic.velocity_mps,
                result: &result,
                report: &summary,
            },
        )?;
        info!(dir = %dir.display(), "results exported");
    }

    Ok(())
}

fn build_primary(
    generator: &PrimaryMissionGenerator,
    scenario: &DemoScenario,
    rng: &mut StdRng,
) -> Result<Mission> {
    let mission = match &scenario.template {
        PrimaryTemplate::Random => {
            generator.random(rng, scenario.start_time, scenario.velocity, "PRIMARY")
        }
        PrimaryTemplate::StraightLine { start, end } => {
            generator.straight_line(*start, *end, scenario.start_time, scenario.velocity, "PRIMARY")
        }
        PrimaryTemplate::MultiWaypoint { num_waypoints, altitude_range } => generator
            .multi_waypoint(
                rng,
                *num_waypoints,
                *altitude_range,
                scenario.start_time,
                scenario.velocity,
                "PRIMARY",
            ),
        PrimaryTemplate::GridSurvey { origin, width, height, rows } => generator.grid_survey(
            *origin,
            *width,
            *height,
            *rows,
            scenario.start_time,
            scenario.velocity,
            "PRIMARY",
        ),
        PrimaryTemplate::CircularInspection { center, radius, points } => generator
            .circular_inspection(
                *center,
                *radius,
                *points,
                scenario.start_time,
                scenario.velocity,
                "PRIMARY",
            ),
        PrimaryTemplate::Custom { waypoints } => {
            generator.custom(waypoints, scenario.start_time, scenario.velocity, "PRIMARY")
        }
    }?;
    Ok(mission)
}
