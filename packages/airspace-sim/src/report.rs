//! report.rs — Text summary report
//!
//! Renders one check into the operator-facing plain-text report: primary
//! mission block, per-stage timings, decision banner, severity breakdown
//! and the top five conflicts with their recommendations.

use airspace_types::{Mission, Severity};
use chrono::Local;
use deconfliction::CheckResult;

const WIDE_RULE: &str =
    "================================================================================";
const RULE: &str =
    "--------------------------------------------------------------------------------";

pub fn summary_report(primary: &Mission, traffic_count: usize, result: &CheckResult) -> String {
    let metrics = &result.metrics;
    let mut lines: Vec<String> = Vec::new();

    lines.push(WIDE_RULE.into());
    lines.push("UAV STRATEGIC DECONFLICTION SYSTEM - SUMMARY REPORT".into());
    lines.push(WIDE_RULE.into());
    lines.push(format!("Generated: {}", Local::now().format("%Y-%m-%d %H:%M:%S")));
    lines.push(String::new());

    lines.push("PRIMARY MISSION".into());
    lines.push(RULE.into());
    lines.push(format!("Drone ID: {}", primary.drone_id));
    lines.push(format!("Waypoints: {}", primary.waypoints.len()));
    lines.push(format!(
        "Time Window: {:.1}s - {:.1}s",
        primary.start_time, primary.end_time
    ));
    lines.push(format!("Duration: {:.1}s", primary.duration()));
    lines.push(format!("Total Distance: {:.1}m", primary.total_distance()));
    lines.push(format!("Cruise Speed: {:.2} m/s", primary.cruise_speed));
    lines.push(String::new());

    lines.push("TRAFFIC ENVIRONMENT".into());
    lines.push(RULE.into());
    lines.push(format!("Total Traffic Drones: {traffic_count}"));
    lines.push(String::new());

    lines.push("DECONFLICTION ANALYSIS".into());
    lines.push(RULE.into());
    lines.push(format!("Stage 1 (Filtering): {:.2} ms", metrics.stage1_time_ms));
    lines.push(format!("Reduction: {}", metrics.stage1_reduction));
    lines.push(format!("Stage 2 (Grid): {:.2} ms", metrics.stage2_time_ms));
    lines.push(format!("Raw conflicts: {}", metrics.raw_conflicts));
    lines.push(format!("Stage 3 (Risk): {:.2} ms", metrics.stage3_time_ms));
    lines.push(format!("Assessed conflicts: {}", metrics.assessed_conflicts));
    lines.push(format!("Total Analysis Time: {:.2} ms", metrics.total_time_ms));
    lines.push(String::new());

    lines.push("DECISION".into());
    lines.push(RULE.into());
    if result.is_clear {
        lines.push("STATUS: MISSION CLEARED - No high-severity conflicts detected.".into());
    } else {
        lines.push("STATUS: MISSION REJECTED - High-severity conflicts detected.".into());
    }
    lines.push(String::new());

    if !result.conflicts.is_empty() {
        lines.push("CONFLICT SUMMARY".into());
        lines.push(RULE.into());
        lines.push(format!("Total Conflicts: {}", result.conflicts.len()));
        for severity in Severity::ALL {
            let count = result.conflicts.iter().filter(|c| c.severity == severity).count();
            lines.push(format!("  {}: {count}", severity.as_str()));
        }
        lines.push(String::new());

        lines.push("TOP 5 HIGHEST RISK CONFLICTS".into());
        lines.push(RULE.into());
        for (i, c) in result.conflicts.iter().take(5).enumerate() {
            lines.push(format!("{}. [{}] vs {}", i + 1, c.severity.as_str(), c.conflicting_drone));
            lines.push(format!(
                "    Risk: {:.3} | Separation: {:.1}m | Time: {:.1}s",
                c.risk_score, c.separation_distance, c.time
            ));
            lines.push(format!("    Recommendation: {}", c.recommendation));
            lines.push(String::new());
        }
    }

    lines.push(WIDE_RULE.into());
    lines.push("END OF REPORT".into());
    lines.push(WIDE_RULE.into());

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use airspace_types::Waypoint;
    use deconfliction::DeconflictionPipeline;

    #[test]
    fn report_carries_decision_and_conflict_sections() {
        let primary = Mission::new(
            vec![Waypoint::new(0.0, 0.0, 100.0), Waypoint::new(1000.0, 0.0, 100.0)],
            0.0,
            100.0,
            "PRIMARY",
            None,
        )
        .unwrap();
        let oncoming = Mission::new(
            vec![Waypoint::new(1000.0, 0.0, 100.0), Waypoint::new(0.0, 0.0, 100.0)],
            0.0,
            100.0,
            "TRAFFIC-000",
            None,
        )
        .unwrap();

        let mut pipeline = DeconflictionPipeline::default();
        pipeline.register(oncoming);
        let result = pipeline.check(&primary);

        let report = summary_report(&primary, 1, &result);
        assert!(report.contains("MISSION REJECTED"));
        assert!(report.contains("TRAFFIC-000"));
        assert!(report.contains("TOP 5 HIGHEST RISK CONFLICTS"));
        assert!(report.contains("Recommendation: REJECT"));
    }

    #[test]
    fn clear_check_omits_conflict_sections() {
        let primary = Mission::new(
            vec![Waypoint::new(0.0, 0.0, 100.0), Waypoint::new(1000.0, 0.0, 100.0)],
            0.0,
            100.0,
            "PRIMARY",
            None,
        )
        .unwrap();
        let mut pipeline = DeconflictionPipeline::default();
        let result = pipeline.check(&primary);

        let report = summary_report(&primary, 0, &result);
        assert!(report.contains("MISSION CLEARED"));
        assert!(!report.contains("CONFLICT SUMMARY"));
    }
}
