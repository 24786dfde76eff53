use serde::Serialize;

use crate::problem::{
    location::LocationIdx,
    routing_problem::RoutingProblem,
    vehicle::Vehicle,
};

pub(crate) const TIME_WINDOW_PENALTY: f64 = 500.0;
pub(crate) const CAPACITY_PENALTY: f64 = 1000.0;
pub(crate) const FUEL_PENALTY: f64 = 2000.0;

/// Time units added when fuel drops below the minimum away from a station.
pub(crate) const STRANDED_TIME_PENALTY: f64 = 1000.0;
pub(crate) const LATE_ARRIVAL_FACTOR: f64 = 2.0;

/// Full evaluator output for one vehicle's visiting sequence. Everything a
/// reporting consumer needs without recomputation.
#[derive(Serialize, Debug, Clone, PartialEq, Default)]
pub struct RouteMetrics {
    pub distance: f64,
    pub travel_time: f64,
    pub cost: f64,
    pub demand: f64,
    pub time_window_violations: u32,
    pub capacity_violations: u32,
    pub fuel_violations: u32,
    /// Fuel level after each edge, starting with a full tank.
    pub fuel_levels: Vec<f64>,
    pub stations_used: Vec<LocationIdx>,
}

impl RouteMetrics {
    pub fn has_violations(&self) -> bool {
        self.time_window_violations > 0
            || self.capacity_violations > 0
            || self.fuel_violations > 0
    }
}

/// Simulates one route front to back. Degenerate sequences (fewer than two
/// stops) contribute zeros; there is no failure mode.
pub fn evaluate_route(
    problem: &RoutingProblem,
    vehicle: &Vehicle,
    stops: &[LocationIdx],
) -> RouteMetrics {
    let mut metrics = RouteMetrics {
        fuel_levels: vec![vehicle.max_fuel()],
        ..RouteMetrics::default()
    };

    accumulate_demand(problem, vehicle, stops, &mut metrics);
    accumulate_distance(problem, vehicle, stops, &mut metrics);
    simulate_travel(problem, vehicle, stops, &mut metrics);

    metrics.cost = metrics.distance
        + metrics.travel_time
        + metrics.stations_used.len() as f64 * vehicle.refueling_cost()
        + metrics.time_window_violations as f64 * TIME_WINDOW_PENALTY
        + metrics.capacity_violations as f64 * CAPACITY_PENALTY
        + metrics.fuel_violations as f64 * FUEL_PENALTY;

    metrics
}

fn accumulate_demand(
    problem: &RoutingProblem,
    vehicle: &Vehicle,
    stops: &[LocationIdx],
    metrics: &mut RouteMetrics,
) {
    metrics.demand = stops
        .iter()
        .map(|&stop| problem.location(stop))
        .filter(|location| location.is_customer())
        .map(|location| location.demand())
        .sum();

    // Flagged once per route, not per unit over capacity.
    if metrics.demand > vehicle.capacity() {
        metrics.capacity_violations = 1;
    }
}

fn accumulate_distance(
    problem: &RoutingProblem,
    vehicle: &Vehicle,
    stops: &[LocationIdx],
    metrics: &mut RouteMetrics,
) {
    for edge in stops.windows(2) {
        let current = problem.location(edge[0]);
        let next = problem.location(edge[1]);

        let delay = problem
            .disruptions()
            .edge_delay_minutes(current.point(), next.point());

        // Disruption delay expressed as the distance the vehicle would have
        // covered in that many minutes.
        metrics.distance +=
            current.euclidean_distance(next) + delay * (vehicle.speed() / 60.0);
    }
}

fn simulate_travel(
    problem: &RoutingProblem,
    vehicle: &Vehicle,
    stops: &[LocationIdx],
    metrics: &mut RouteMetrics,
) {
    let payload = metrics.demand;
    let mut current_time = 0.0;
    let mut fuel = vehicle.max_fuel();

    for edge in stops.windows(2) {
        let current = problem.location(edge[0]);
        let next = problem.location(edge[1]);

        let distance = current.euclidean_distance(next);
        let delay = problem
            .disruptions()
            .edge_delay_minutes(current.point(), next.point());
        let travel_time = distance / vehicle.speed() + delay / 60.0;

        fuel -= vehicle.energy_consumption(distance, payload);

        if fuel < vehicle.min_fuel() {
            metrics.fuel_violations += 1;

            if current.is_refueling_station() {
                fuel = vehicle.max_fuel();
                metrics.travel_time += vehicle.refueling_time();
                metrics.stations_used.push(edge[0]);
            } else {
                metrics.travel_time += STRANDED_TIME_PENALTY;
            }
        }

        current_time += travel_time;
        metrics.travel_time += travel_time;
        metrics.fuel_levels.push(fuel);

        if next.is_customer() {
            let window = next.time_window();

            if current_time < window.earliest {
                let wait = window.earliest - current_time;
                current_time = window.earliest;
                metrics.travel_time += wait;
            }

            if current_time > window.latest {
                metrics.time_window_violations += 1;
                metrics.travel_time += (current_time - window.latest) * LATE_ARRIVAL_FACTOR;
            }

            current_time += next.service_time();
            metrics.travel_time += next.service_time();
        }

        // A station visit always refuels, violation or not.
        if next.is_refueling_station() {
            metrics.travel_time += vehicle.refueling_time();
            fuel = vehicle.max_fuel();
            metrics.stations_used.push(edge[1]);
        }
    }
}
