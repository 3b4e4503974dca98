//! # deconfliction
//!
//! Strategic pre-flight deconfliction for a UAV airspace: given a proposed
//! primary mission and a registry of other missions over overlapping time
//! windows, decide whether the primary can fly and, if not, produce a
//! ranked, risk-scored conflict list with recommendations.
//!
//! The pipeline runs three stages per check:
//!
//! 1. **Multi-tier filter**: temporal, bounding-box and coarse-sampling
//!    tiers cut O(10⁴) registered missions down to O(10) neighbors.
//! 2. **4D occupancy grid**: candidate trajectories bucketed by
//!    (x, y, z, t) cell; the primary trajectory sweeps a 3×3×3×3
//!    neighborhood probe at a velocity-adaptive stride.
//! 3. **Risk scoring**: raw proximity events grouped per (mission,
//!    10-second window), scored on separation, closure rate, duration and
//!    altitude band, then ranked deterministically.
//!
//! Every check is synchronous, allocation-transient and free of shared
//! mutable state; independent pipeline instances are embarrassingly
//! parallel.
//!
//! ```
//! use airspace_types::{Mission, Waypoint};
//! use deconfliction::DeconflictionPipeline;
//!
//! let mut pipeline = DeconflictionPipeline::default();
//! let traffic = Mission::new(
//!     vec![Waypoint::new(0.0, 400.0, 120.0), Waypoint::new(2000.0, 400.0, 120.0)],
//!     0.0,
//!     200.0,
//!     "TRAFFIC-001",
//!     None,
//! )
//! .unwrap();
//! pipeline.register(traffic);
//!
//! let primary = Mission::new(
//!     vec![Waypoint::new(0.0, 0.0, 100.0), Waypoint::new(2000.0, 0.0, 100.0)],
//!     0.0,
//!     200.0,
//!     "PRIMARY",
//!     None,
//! )
//! .unwrap();
//! let result = pipeline.check(&primary);
//! println!("clear: {}, conflicts: {}", result.is_clear, result.conflicts.len());
//! ```

pub mod config;
pub mod filters;
pub mod occupancy_grid;
pub mod pipeline;
pub mod risk;
pub mod trajectory;

pub use config::{FilterConfig, GridConfig, PipelineConfig, RiskConfig};
pub use filters::{FilterStats, MultiTierFilter};
pub use occupancy_grid::{CellKey, OccupancyGrid, ProximityEvent};
pub use pipeline::{CheckResult, DeconflictionPipeline};
pub use risk::RiskScorer;
pub use trajectory::{Segment, Trajectory};
