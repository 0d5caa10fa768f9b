//! The static facility directory.
//!
//! Loaded once at startup and never mutated. Clones share one
//! `Arc<[Facility]>`, so the directory can be handed to every request
//! without locking.

use std::collections::BTreeSet;
use std::sync::Arc;

use lifeline_types::{Coordinate, Facility, FacilityId};

use crate::distance::validate_coordinate;
use crate::error::GeoError;
use crate::nearest::{Nearest, nearest};

/// Read-only, ordered set of facilities.
#[derive(Debug, Clone, PartialEq)]
pub struct FacilityDirectory {
    facilities: Arc<[Facility]>,
}

impl FacilityDirectory {
    /// Build a directory, keeping the given order.
    ///
    /// An empty directory is allowed; resolving against it fails later
    /// with [`GeoError::EmptyCandidates`].
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::DuplicateFacility`] if two entries share an id,
    /// or [`GeoError::CoordinateOutOfRange`] if a facility location is
    /// outside the valid ranges.
    pub fn new(facilities: Vec<Facility>) -> Result<Self, GeoError> {
        let mut seen: BTreeSet<&FacilityId> = BTreeSet::new();
        for facility in &facilities {
            validate_coordinate(facility.location)?;
            if !seen.insert(&facility.id) {
                return Err(GeoError::DuplicateFacility(facility.id.clone()));
            }
        }

        tracing::debug!(count = facilities.len(), "facility directory loaded");
        Ok(Self {
            facilities: facilities.into(),
        })
    }

    /// The two clinics the mobile app ships with (Cagayan de Oro).
    pub fn default_clinics() -> Self {
        Self {
            facilities: default_facilities().into(),
        }
    }

    /// All facilities in directory order.
    pub fn facilities(&self) -> &[Facility] {
        &self.facilities
    }

    /// Look a facility up by id.
    pub fn get(&self, id: &FacilityId) -> Option<&Facility> {
        self.facilities.iter().find(|f| &f.id == id)
    }

    /// Number of facilities.
    pub fn len(&self) -> usize {
        self.facilities.len()
    }

    /// Whether the directory has no facilities.
    pub fn is_empty(&self) -> bool {
        self.facilities.is_empty()
    }

    /// The facility closest to `origin`.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::EmptyCandidates`] if the directory is empty.
    pub fn nearest(&self, origin: Coordinate) -> Result<Nearest<'_>, GeoError> {
        nearest(origin, &self.facilities)
    }
}

impl Default for FacilityDirectory {
    fn default() -> Self {
        Self::default_clinics()
    }
}

/// Seed data for [`FacilityDirectory::default_clinics`].
pub fn default_facilities() -> Vec<Facility> {
    vec![
        Facility {
            id: FacilityId::from("1"),
            name: String::from("Carmen Clinic"),
            phone: String::from("09171234567"),
            location: Coordinate::new(8.4542, 124.6319),
        },
        Facility {
            id: FacilityId::from("2"),
            name: String::from("Tablon Clinic"),
            phone: String::from("09179876543"),
            location: Coordinate::new(8.4822, 124.6455),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facility(id: &str, latitude: f64, longitude: f64) -> Facility {
        Facility {
            id: FacilityId::from(id),
            name: format!("Facility {id}"),
            phone: String::from("000"),
            location: Coordinate::new(latitude, longitude),
        }
    }

    #[test]
    fn default_clinics_are_two_and_unique() {
        let directory = FacilityDirectory::default_clinics();
        assert_eq!(directory.len(), 2);
        assert!(FacilityDirectory::new(default_facilities()).is_ok());
        assert!(directory.get(&FacilityId::from("2")).is_some());
        assert!(directory.get(&FacilityId::from("9")).is_none());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let result = FacilityDirectory::new(vec![facility("1", 0.0, 0.0), facility("1", 1.0, 1.0)]);
        assert!(matches!(result, Err(GeoError::DuplicateFacility(id)) if id.as_str() == "1"));
    }

    #[test]
    fn rejects_out_of_range_locations() {
        let result = FacilityDirectory::new(vec![facility("1", 120.0, 0.0)]);
        assert!(matches!(result, Err(GeoError::CoordinateOutOfRange(_))));
    }

    #[test]
    fn empty_directory_builds_but_cannot_resolve() {
        let directory = FacilityDirectory::new(Vec::new());
        assert!(directory.is_ok());
        if let Ok(directory) = directory {
            assert!(directory.is_empty());
            assert!(matches!(
                directory.nearest(Coordinate::new(0.0, 0.0)),
                Err(GeoError::EmptyCandidates)
            ));
        }
    }

    #[test]
    fn clones_share_storage() {
        let directory = FacilityDirectory::default_clinics();
        let clone = directory.clone();
        assert!(std::ptr::eq(directory.facilities(), clone.facilities()));
    }

    #[test]
    fn nearest_default_clinic_from_tablon() {
        let directory = FacilityDirectory::default_clinics();
        let found = directory.nearest(Coordinate::new(8.48, 124.65));
        assert!(matches!(found, Ok(n) if n.facility.name == "Tablon Clinic"));
    }
}
