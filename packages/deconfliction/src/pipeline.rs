//! pipeline.rs — Three-stage deconfliction orchestrator
//!
//! Owns the mission registry and sequences filter → grid → scoring for one
//! primary mission at a time, short-circuiting as soon as an intermediate
//! result is empty. Each check is synchronous and self-contained; callers
//! wanting concurrent checks run independent pipeline instances over their
//! own registries.

use std::collections::HashMap;
use std::time::Instant;

use airspace_types::{CheckMetrics, Conflict, Mission, Severity};
use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::filters::{FilterStats, MultiTierFilter};
use crate::occupancy_grid::OccupancyGrid;
use crate::risk::RiskScorer;

/// Outcome of one `check` call. Conflicts are ranked by risk, descending.
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// True iff no conflict reached HIGH or CRITICAL severity
    pub is_clear: bool,
    pub conflicts: Vec<Conflict>,
    pub metrics: CheckMetrics,
}

/// Strategic pre-flight deconfliction pipeline.
pub struct DeconflictionPipeline {
    filter: MultiTierFilter,
    grid: OccupancyGrid,
    scorer: RiskScorer,
    missions: HashMap<String, Mission>,
}

impl Default for DeconflictionPipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

impl DeconflictionPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            filter: MultiTierFilter::new(config.filter),
            grid: OccupancyGrid::new(config.grid),
            scorer: RiskScorer::new(config.risk),
            missions: HashMap::new(),
        }
    }

    /// Register a mission in the airspace. Re-registering a drone id
    /// replaces the previous mission (last write wins).
    pub fn register(&mut self, mission: Mission) {
        let drone_id = mission.drone_id.clone();
        if self.missions.insert(drone_id.clone(), mission).is_some() {
            warn!(%drone_id, "drone re-registered, replacing previous mission");
        }
    }

    /// Number of registered missions.
    pub fn mission_count(&self) -> usize {
        self.missions.len()
    }

    /// Stage-1 survivor counts from the most recent check.
    pub fn filter_stats(&self) -> FilterStats {
        self.filter.stats()
    }

    /// Run the full three-stage check for one primary mission.
    pub fn check(&mut self, primary: &Mission) -> CheckResult {
        let total_start = Instant::now();
        let mut metrics = CheckMetrics::default();

        // A registered copy of the primary itself never conflicts with it.
        let others: Vec<&Mission> = self
            .missions
            .values()
            .filter(|m| m.drone_id != primary.drone_id)
            .collect();

        let stage1_start = Instant::now();
        let candidates = self.filter.filter(primary, &others);
        metrics.stage1_time_ms = elapsed_ms(stage1_start);
        metrics.stage1_reduction = format!("{} → {}", others.len(), candidates.len());

        if candidates.is_empty() {
            metrics.total_time_ms = elapsed_ms(total_start);
            info!(
                reduction = %metrics.stage1_reduction,
                total_ms = metrics.total_time_ms,
                "check clear: no spatio-temporal neighbors"
            );
            return CheckResult { is_clear: true, conflicts: Vec::new(), metrics };
        }

        let stage2_start = Instant::now();
        self.grid.build(&candidates);
        let buffer = self.scorer.dynamic_safety_buffer(primary.cruise_speed);
        let events = self.grid.query(primary, buffer);
        metrics.stage2_time_ms = elapsed_ms(stage2_start);
        metrics.raw_conflicts = events.len();

        if events.is_empty() {
            self.grid.clear();
            metrics.total_time_ms = elapsed_ms(total_start);
            info!(
                reduction = %metrics.stage1_reduction,
                buffer_m = buffer,
                total_ms = metrics.total_time_ms,
                "check clear: no proximity events"
            );
            return CheckResult { is_clear: true, conflicts: Vec::new(), metrics };
        }

        let stage3_start = Instant::now();
        let candidate_map: HashMap<&str, &Mission> =
            candidates.iter().map(|m| (m.drone_id.as_str(), *m)).collect();
        let conflicts = self.scorer.assess(primary, &events, &candidate_map);
        metrics.stage3_time_ms = elapsed_ms(stage3_start);
        metrics.assessed_conflicts = conflicts.len();
        metrics.total_time_ms = elapsed_ms(total_start);

        self.grid.clear();

        let is_clear = !conflicts.iter().any(|c| c.severity >= Severity::High);
        info!(
            is_clear,
            reduction = %metrics.stage1_reduction,
            raw = metrics.raw_conflicts,
            assessed = metrics.assessed_conflicts,
            total_ms = metrics.total_time_ms,
            "deconfliction check complete"
        );

        CheckResult { is_clear, conflicts, metrics }
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
