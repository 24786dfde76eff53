use std::cell::OnceCell;

use smallvec::SmallVec;

use crate::problem::{location::LocationIdx, routing_problem::RoutingProblem, vehicle::VehicleIdx};
use crate::solver::evaluation::{self, RouteMetrics};

/// One vehicle's visiting sequence, depot at both ends. Metrics are computed
/// lazily and cached until the stop list is touched.
#[derive(Debug, Clone)]
pub struct Route {
    vehicle: VehicleIdx,
    stops: Vec<LocationIdx>,
    metrics: OnceCell<RouteMetrics>,
}

impl Route {
    pub fn new(vehicle: VehicleIdx, stops: Vec<LocationIdx>) -> Route {
        Route {
            vehicle,
            stops,
            metrics: OnceCell::new(),
        }
    }

    pub fn vehicle_idx(&self) -> VehicleIdx {
        self.vehicle
    }

    pub fn stops(&self) -> &[LocationIdx] {
        &self.stops
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn set_stops(&mut self, stops: Vec<LocationIdx>) {
        self.stops = stops;
        self.metrics = OnceCell::new();
    }

    /// Replaces the stop at `position` and invalidates the cached metrics.
    pub fn swap_stop(&mut self, position: usize, replacement: LocationIdx) {
        self.stops[position] = replacement;
        self.metrics = OnceCell::new();
    }

    pub fn insert_stop(&mut self, position: usize, stop: LocationIdx) {
        self.stops.insert(position, stop);
        self.metrics = OnceCell::new();
    }

    /// Reverses `stops[begin..=end]` in place.
    pub fn reverse_segment(&mut self, begin: usize, end: usize) {
        self.stops[begin..=end].reverse();
        self.metrics = OnceCell::new();
    }

    pub fn metrics(&self, problem: &RoutingProblem) -> &RouteMetrics {
        self.metrics.get_or_init(|| {
            evaluation::evaluate_route(problem, &problem.vehicles()[self.vehicle], &self.stops)
        })
    }

    pub fn cost(&self, problem: &RoutingProblem) -> f64 {
        self.metrics(problem).cost
    }

    pub fn demand(&self, problem: &RoutingProblem) -> f64 {
        self.metrics(problem).demand
    }

    /// Positions of customer stops within the route, depots and stations
    /// excluded.
    pub fn customer_positions(&self, problem: &RoutingProblem) -> SmallVec<[usize; 16]> {
        self.stops
            .iter()
            .enumerate()
            .filter(|&(_, &stop)| problem.location(stop).is_customer())
            .map(|(position, _)| position)
            .collect()
    }
}
