//! Global display normalisation.
//!
//! One scale factor, derived from positions only, is applied to positions
//! and velocities alike so relative geometry and relative speeds survive.
//! Velocity keeps its AU/day label even though the factor is dimensionless.

use crate::transform::PlanetTable;

/// Largest `|x|` or `|y|` over every position; `0.0` for an empty table.
pub fn max_abs_position(table: &PlanetTable) -> f64 {
    table
        .iter()
        .flat_map(|(_, record)| record.pos)
        .fold(0.0, |max, c| max.max(c.abs()))
}

/// `bound / max_abs`, or `0.0` when every position is zero.
pub fn scale_factor(max_abs: f64, bound: f64) -> f64 {
    if max_abs > 0.0 { bound / max_abs } else { 0.0 }
}

/// Round half away from zero to `decimals` fractional digits.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Scale every position and velocity component, then round. Returns the
/// unrounded scale factor.
pub fn normalize(table: &mut PlanetTable, bound: f64, decimals: u32) -> f64 {
    let max_abs = max_abs_position(table);
    let scale = scale_factor(max_abs, bound);
    tracing::debug!(max_abs_au = max_abs, scale, "normalising positions");

    for record in table.records_mut() {
        for c in record.pos.iter_mut().chain(record.vel.iter_mut()) {
            *c = round_to(*c * scale, decimals);
        }
    }
    scale
}
