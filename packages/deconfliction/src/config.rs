//! config.rs — Explicit pipeline tuning records
//!
//! Every knob the pipeline exposes lives here as a named field with a
//! documented default. The records deserialize from the `[pipeline]` tables
//! of an operator `config.toml`.

use serde::Deserialize;

/// Stage-1 candidate filter margins.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Widening applied to the primary's time window, seconds
    pub time_margin_s: f64,
    /// Widening applied to each face of the primary's bounding box, meters
    pub spatial_margin_m: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self { time_margin_s: 30.0, spatial_margin_m: 500.0 }
    }
}

/// Stage-2 occupancy grid resolution.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Spatial cell edge, meters. The 81-cell neighborhood probe is exact
    /// only while the dynamic safety buffer stays at or below this.
    pub cell_size_m: f64,
    /// Temporal tick, seconds
    pub time_resolution_s: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { cell_size_m: 100.0, time_resolution_s: 1.0 }
    }
}

/// Stage-3 physics parameters for the dynamic safety buffer.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Minimum allowed separation regardless of speed, meters
    pub base_safety_buffer_m: f64,
    /// Pilot/system reaction time, seconds
    pub reaction_time_s: f64,
    /// Maximum evasion acceleration, m/s²
    pub max_accel_mps2: f64,
    /// GPS positioning uncertainty, meters
    pub gps_uncertainty_m: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            base_safety_buffer_m: 50.0,
            reaction_time_s: 2.5,
            max_accel_mps2: 5.0,
            gps_uncertainty_m: 10.0,
        }
    }
}

/// Aggregate configuration for one pipeline instance.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub filter: FilterConfig,
    pub grid: GridConfig,
    pub risk: RiskConfig,
}
