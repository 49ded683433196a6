//! Stem volume from field measurements.

use std::f64::consts::PI;

/// Centimeters per meter, for converting DBH.
const CM_PER_M: f64 = 100.0;

/// Compute a tree's stem volume in cubic meters.
///
/// `V = F × (π/4) × D² × H`, with the diameter converted from centimeters
/// to meters first. Inputs are assumed validated: DBH and height positive,
/// form factor in [0.4, 0.6].
///
/// # Arguments
/// - `dbh_cm`: diameter at breast height in centimeters
/// - `height_m`: tree height in meters
/// - `form_factor`: taper correction coefficient
pub fn compute_volume(dbh_cm: f64, height_m: f64, form_factor: f64) -> f64 {
    let diameter_m = dbh_cm / CM_PER_M;
    form_factor * (PI / 4.0) * diameter_m.powi(2) * height_m
}
