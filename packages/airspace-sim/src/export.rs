//! export.rs — Persisted JSON artifacts
//!
//! Writes the four per-run files consumed by external visualization tooling:
//! `primary_mission.json`, `traffic_missions.json`,
//! `deconfliction_results.json` and `summary_report.txt`. The JSON layouts
//! are the stable records from `airspace-types`.

use std::fs;
use std::path::Path;

use airspace_types::{
    AirspaceDimensions, ConflictRecord, DeconflictionResultRecord, Mission, MissionRecord,
    TrafficFileRecord, TrafficMetadata,
};
use anyhow::{Context, Result};
use deconfliction::CheckResult;

use crate::scenarios::AirspaceExtent;

pub struct ExportInputs<'a> {
    pub primary: &'a Mission,
    pub traffic: &'a [Mission],
    pub airspace: AirspaceExtent,
    pub flight_duration: f64,
    pub velocity: f64,
    pub result: &'a CheckResult,
    pub report: &'a str,
}

pub fn export_results(dir: &Path, inputs: &ExportInputs<'_>) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("creating output directory {}", dir.display()))?;

    let primary_record = MissionRecord::from(inputs.primary);
    write_json(&dir.join("primary_mission.json"), &primary_record)?;

    let traffic_record = TrafficFileRecord {
        metadata: TrafficMetadata {
            num_drones: inputs.traffic.len(),
            airspace_dimensions: AirspaceDimensions {
                x: inputs.airspace.x_m,
                y: inputs.airspace.y_m,
                z: inputs.airspace.z_m,
            },
            flight_duration: inputs.flight_duration,
            velocity: inputs.velocity,
        },
        traffic: inputs.traffic.iter().map(MissionRecord::from).collect(),
    };
    write_json(&dir.join("traffic_missions.json"), &traffic_record)?;

    let result_record = DeconflictionResultRecord {
        is_clear: inputs.result.is_clear,
        analysis_time_ms: inputs.result.metrics.total_time_ms,
        metrics: inputs.result.metrics.clone(),
        conflicts: inputs.result.conflicts.iter().map(ConflictRecord::from).collect(),
    };
    write_json(&dir.join("deconfliction_results.json"), &result_record)?;

    fs::write(dir.join("summary_report.txt"), inputs.report)
        .context("writing summary_report.txt")?;

    Ok(())
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .with_context(|| format!("serializing {}", path.display()))?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
