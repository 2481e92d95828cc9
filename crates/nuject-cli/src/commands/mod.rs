pub mod run;
pub mod validate;

/// Converts a degree-valued angle from the command line to radians.
pub fn degrees_to_radians(degrees: f64) -> f64 {
    degrees.to_radians()
}
