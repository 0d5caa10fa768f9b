//! Great-circle distance on a spherical Earth.

use lifeline_types::Coordinate;

use crate::error::GeoError;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between `a` and `b` in kilometres.
///
/// No range validation is performed. Out-of-range inputs give a
/// meaningless but finite answer; floating-point error near antipodal
/// points can push the intermediate term past 1 and yield NaN, which
/// callers must tolerate.
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos()
            * b.latitude.to_radians().cos()
            * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Reject coordinates outside the latitude/longitude ranges.
///
/// # Errors
///
/// Returns [`GeoError::CoordinateOutOfRange`] if either component is out of
/// range or not finite.
pub fn validate_coordinate(coordinate: Coordinate) -> Result<Coordinate, GeoError> {
    if coordinate.is_within_range() {
        Ok(coordinate)
    } else {
        Err(GeoError::CoordinateOutOfRange(coordinate))
    }
}
