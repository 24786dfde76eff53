use crate::error::ConfigurationError;

use super::{
    disruption::{DisruptionMap, DisruptionSegment},
    location::{Location, LocationIdx, LocationKind},
    vehicle::Vehicle,
};

/// One static problem snapshot. Locations, vehicles and disruptions are
/// immutable after construction; routes refer back into the location
/// catalogue by index only.
#[derive(Debug)]
pub struct RoutingProblem {
    locations: Vec<Location>,
    vehicles: Vec<Vehicle>,
    disruptions: DisruptionMap,
    depot: LocationIdx,
    customers: Vec<LocationIdx>,
    refueling_stations: Vec<LocationIdx>,
}

impl RoutingProblem {
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn disruptions(&self) -> &DisruptionMap {
        &self.disruptions
    }

    pub fn depot(&self) -> LocationIdx {
        self.depot
    }

    pub fn customers(&self) -> &[LocationIdx] {
        &self.customers
    }

    pub fn refueling_stations(&self) -> &[LocationIdx] {
        &self.refueling_stations
    }

    pub fn location(&self, idx: LocationIdx) -> &Location {
        &self.locations[idx]
    }

    pub fn num_locations(&self) -> usize {
        self.locations.len()
    }
}

#[derive(Default)]
pub struct RoutingProblemBuilder {
    locations: Vec<Location>,
    vehicles: Vec<Vehicle>,
    segments: Vec<DisruptionSegment>,
}

impl RoutingProblemBuilder {
    pub fn set_locations(&mut self, locations: Vec<Location>) -> &mut RoutingProblemBuilder {
        self.locations = locations;
        self
    }

    pub fn set_vehicles(&mut self, vehicles: Vec<Vehicle>) -> &mut RoutingProblemBuilder {
        self.vehicles = vehicles;
        self
    }

    pub fn add_disruption_segments(
        &mut self,
        segments: impl IntoIterator<Item = DisruptionSegment>,
    ) -> &mut RoutingProblemBuilder {
        self.segments.extend(segments);
        self
    }

    pub fn build(self) -> Result<RoutingProblem, ConfigurationError> {
        let depot = self
            .locations
            .iter()
            .position(|location| location.is_depot())
            .map(LocationIdx::new)
            .ok_or(ConfigurationError::MissingDepot)?;

        let customers = Self::indices_of(&self.locations, LocationKind::Customer);
        let refueling_stations = Self::indices_of(&self.locations, LocationKind::RefuelingStation);

        Ok(RoutingProblem {
            depot,
            customers,
            refueling_stations,
            disruptions: DisruptionMap::new(self.segments),
            locations: self.locations,
            vehicles: self.vehicles,
        })
    }

    fn indices_of(locations: &[Location], kind: LocationKind) -> Vec<LocationIdx> {
        locations
            .iter()
            .enumerate()
            .filter(|(_, location)| location.kind() == kind)
            .map(|(index, _)| LocationIdx::new(index))
            .collect()
    }
}
