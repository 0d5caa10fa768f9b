//! Minimum-distance selection over an ordered candidate set.

use lifeline_types::{Coordinate, Facility};

use crate::distance::distance_km;
use crate::error::GeoError;

/// The facility closest to an origin, with its distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nearest<'a> {
    /// The chosen facility.
    pub facility: &'a Facility,
    /// Haversine distance from the origin in kilometres.
    pub distance_km: f64,
}

/// Pick the facility closest to `origin`.
///
/// Linear scan with a running minimum. The comparison is strict, so on a
/// tie the facility that appears first in `candidates` wins. A NaN
/// distance never replaces the current minimum.
///
/// # Errors
///
/// Returns [`GeoError::EmptyCandidates`] if `candidates` is empty.
pub fn nearest(origin: Coordinate, candidates: &[Facility]) -> Result<Nearest<'_>, GeoError> {
    let (first, rest) = candidates.split_first().ok_or(GeoError::EmptyCandidates)?;

    let mut best = Nearest {
        facility: first,
        distance_km: distance_km(origin, first.location),
    };

    for facility in rest {
        let d = distance_km(origin, facility.location);
        // A NaN running minimum is displaced by any real distance.
        if d < best.distance_km || (best.distance_km.is_nan() && !d.is_nan()) {
            best = Nearest {
                facility,
                distance_km: d,
            };
        }
    }

    tracing::trace!(
        facility_id = %best.facility.id,
        distance_km = best.distance_km,
        candidates = candidates.len(),
        "nearest facility selected"
    );

    Ok(best)
}

#[cfg(test)]
mod tests {
    use lifeline_types::FacilityId;

    use super::*;

    fn facility(id: &str, latitude: f64, longitude: f64) -> Facility {
        Facility {
            id: FacilityId::from(id),
            name: format!("Facility {id}"),
            phone: format!("0917000000{id}"),
            location: Coordinate::new(latitude, longitude),
        }
    }

    #[test]
    fn picks_the_closer_facility() {
        let facilities = vec![facility("1", 14.60, 121.02), facility("2", 8.45, 124.63)];
        let origin = Coordinate::new(8.48, 124.65);

        let found = nearest(origin, &facilities);
        assert!(found.is_ok());
        if let Ok(found) = found {
            assert_eq!(found.facility.id, FacilityId::from("2"));
            assert!(found.distance_km < 5.0, "{}", found.distance_km);
            let far = distance_km(origin, Coordinate::new(14.60, 121.02));
            assert!(far > 700.0, "{far}");
        }
    }

    #[test]
    fn tie_goes_to_first_in_input_order() {
        let origin = Coordinate::new(0.0, 0.0);
        let facilities = vec![
            facility("b", 0.0, 1.0),
            facility("a", 0.0, -1.0),
            facility("c", 1.0, 0.0),
        ];
        let found = nearest(origin, &facilities);
        assert!(matches!(found, Ok(n) if n.facility.id == FacilityId::from("b")));
    }

    #[test]
    fn returns_the_minimiser_regardless_of_position() {
        let origin = Coordinate::new(10.0, 10.0);
        let facilities = vec![
            facility("1", 40.0, 40.0),
            facility("2", 20.0, 20.0),
            facility("3", 10.1, 10.1),
            facility("4", -30.0, 10.0),
        ];
        let found = nearest(origin, &facilities);
        assert!(matches!(found, Ok(n) if n.facility.id == FacilityId::from("3")));
    }

    #[test]
    fn empty_candidates_is_a_precondition_violation() {
        let found = nearest(Coordinate::new(0.0, 0.0), &[]);
        assert!(matches!(found, Err(GeoError::EmptyCandidates)));
    }

    #[test]
    fn single_candidate_is_returned() {
        let facilities = vec![facility("only", 51.0, 0.0)];
        let found = nearest(Coordinate::new(-33.0, 151.0), &facilities);
        assert!(matches!(found, Ok(n) if n.facility.id == FacilityId::from("only")));
    }

    #[test]
    fn nan_origin_still_returns_a_facility() {
        let facilities = vec![facility("1", 0.0, 0.0), facility("2", 1.0, 1.0)];
        let found = nearest(Coordinate::new(f64::NAN, 0.0), &facilities);
        assert!(matches!(found, Ok(n) if n.facility.id == FacilityId::from("1")));
    }
}
