use crate::problem::{
    disruption::DisruptionSegment,
    location::{Location, LocationKind, TimeWindow},
    routing_problem::{RoutingProblem, RoutingProblemBuilder},
    vehicle::{Vehicle, VehicleBuilder},
};

pub(crate) fn depot(id: u32, x: f64, y: f64) -> Location {
    Location::depot(id, x, y)
}

pub(crate) fn customer(id: u32, x: f64, y: f64, demand: f64) -> Location {
    Location::new(
        id,
        x,
        y,
        demand,
        TimeWindow::UNBOUNDED,
        0.0,
        LocationKind::Customer,
    )
}

pub(crate) fn station(id: u32, x: f64, y: f64) -> Location {
    Location::refueling_station(id, x, y)
}

pub(crate) fn vehicle_builder(id: u32) -> VehicleBuilder {
    VehicleBuilder::new(id)
}

pub(crate) fn basic_vehicle(id: u32) -> Vehicle {
    vehicle_builder(id).build()
}

pub(crate) fn build_problem(locations: Vec<Location>, vehicles: Vec<Vehicle>) -> RoutingProblem {
    build_problem_with_disruptions(locations, vehicles, Vec::new())
}

pub(crate) fn build_problem_with_disruptions(
    locations: Vec<Location>,
    vehicles: Vec<Vehicle>,
    segments: Vec<DisruptionSegment>,
) -> RoutingProblem {
    let mut builder = RoutingProblemBuilder::default();
    builder.set_locations(locations);
    builder.set_vehicles(vehicles);
    builder.add_disruption_segments(segments);
    builder.build().unwrap()
}

/// Deterministic scattered instance: `num_customers` customers of demand 10
/// around a depot at the origin, served by `num_vehicles` default vehicles.
pub(crate) fn cluster_problem(num_customers: usize, num_vehicles: usize) -> RoutingProblem {
    let mut locations = vec![depot(0, 0.0, 0.0)];

    for index in 0..num_customers {
        let id = (index + 1) as u32;
        let x = ((index * 7) % 23) as f64;
        let y = ((index * 13) % 19) as f64;
        locations.push(customer(id, x, y, 10.0));
    }

    let vehicles = (1..=num_vehicles)
        .map(|id| basic_vehicle(id as u32))
        .collect();

    build_problem(locations, vehicles)
}
