//! filters.rs — Stage 1: multi-tier candidate filter
//!
//! Reduces the full mission registry to the handful of spatio-temporal
//! neighbors worth precise checking. Three cascading tiers, cheapest first:
//!
//! 1. Temporal: drop disjoint time windows (margin-widened)
//! 2. Bounding box: drop non-intersecting flight volumes (margin-widened)
//! 3. Coarse sampling: 10 s stride proximity probe with a 200 m buffer
//!
//! The filter is conservative with respect to the occupancy grid: any pair
//! that comes within the dynamic safety buffer at a coarse sample time
//! survives all three tiers, because the coarse buffer (200 m) dominates the
//! dynamic buffer and the spatial margin (500 m) dominates the coarse buffer.

use airspace_types::{Mission, Vec3};
use tracing::debug;

use crate::config::FilterConfig;
use crate::trajectory::Trajectory;

/// Coarse-tier sampling stride, seconds.
const COARSE_TIME_STEP: f64 = 10.0;
/// Coarse-tier acceptance radius, meters. Must stay above any dynamic
/// safety buffer the grid will be queried with.
const COARSE_BUFFER: f64 = 200.0;

/// Survivor counts after each tier, for operator reporting.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterStats {
    pub initial: usize,
    pub after_temporal: usize,
    pub after_bbox: usize,
    pub after_coarse: usize,
}

/// Stage-1 multi-tier filter.
pub struct MultiTierFilter {
    config: FilterConfig,
    stats: FilterStats,
}

impl MultiTierFilter {
    pub fn new(config: FilterConfig) -> Self {
        Self { config, stats: FilterStats::default() }
    }

    /// Counts recorded by the most recent `filter` call.
    pub fn stats(&self) -> FilterStats {
        self.stats
    }

    /// Run all three tiers in order and return the surviving candidates.
    pub fn filter<'a>(
        &mut self,
        primary: &Mission,
        missions: &[&'a Mission],
    ) -> Vec<&'a Mission> {
        self.stats.initial = missions.len();

        let temporal = self.temporal_tier(primary, missions);
        self.stats.after_temporal = temporal.len();

        let bbox = self.bounding_box_tier(primary, &temporal);
        self.stats.after_bbox = bbox.len();

        let coarse = self.coarse_tier(primary, &bbox);
        self.stats.after_coarse = coarse.len();

        debug!(
            initial = self.stats.initial,
            after_temporal = self.stats.after_temporal,
            after_bbox = self.stats.after_bbox,
            after_coarse = self.stats.after_coarse,
            "stage-1 filter tiers"
        );

        coarse
    }

    /// Tier 1: drop missions whose window misses the primary's widened window.
    /// Windows that exactly touch the widened bound are kept.
    fn temporal_tier<'a>(&self, primary: &Mission, missions: &[&'a Mission]) -> Vec<&'a Mission> {
        let window_start = primary.start_time - self.config.time_margin_s;
        let window_end = primary.end_time + self.config.time_margin_s;

        missions
            .iter()
            .copied()
            .filter(|m| !(m.end_time < window_start || m.start_time > window_end))
            .collect()
    }

    /// Tier 2: drop missions whose bounding box misses the primary's
    /// margin-widened box on any axis.
    fn bounding_box_tier<'a>(
        &self,
        primary: &Mission,
        missions: &[&'a Mission],
    ) -> Vec<&'a Mission> {
        let (mut pmin, mut pmax) = primary.bounding_box();
        let margin = self.config.spatial_margin_m;
        pmin = pmin.sub(&Vec3::new(margin, margin, margin));
        pmax = pmax.add(&Vec3::new(margin, margin, margin));

        missions
            .iter()
            .copied()
            .filter(|m| {
                let (mmin, mmax) = m.bounding_box();
                boxes_intersect(&pmin, &pmax, &mmin, &mmax)
            })
            .collect()
    }

    /// Tier 3: sample both trajectories across the window intersection at a
    /// coarse stride; keep the mission on the first sample within the coarse
    /// buffer. Catches near-parallel paths whose boxes barely overlap.
    fn coarse_tier<'a>(&self, primary: &Mission, missions: &[&'a Mission]) -> Vec<&'a Mission> {
        let primary_traj = Trajectory::new(primary);

        missions
            .iter()
            .copied()
            .filter(|m| {
                let t_start = primary.start_time.max(m.start_time);
                let t_end = primary.end_time.min(m.end_time);
                if t_start >= t_end {
                    return false;
                }

                let traj = Trajectory::new(m);
                let mut t = t_start;
                while t < t_end {
                    if let (Some(p1), Some(p2)) = (primary_traj.position(t), traj.position(t)) {
                        if p1.distance_to(&p2) < COARSE_BUFFER {
                            return true;
                        }
                    }
                    t += COARSE_TIME_STEP;
                }
                false
            })
            .collect()
    }
}

/// Standard AABB intersection: overlap on every axis.
fn boxes_intersect(min1: &Vec3, max1: &Vec3, min2: &Vec3, max2: &Vec3) -> bool {
    min1.x <= max2.x
        && min2.x <= max1.x
        && min1.y <= max2.y
        && min2.y <= max1.y
        && min1.z <= max2.z
        && min2.z <= max1.z
}
