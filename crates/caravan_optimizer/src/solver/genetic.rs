use fxhash::FxHashSet;
use rand::Rng;

use crate::problem::{
    location::LocationIdx, routing_problem::RoutingProblem, vehicle::VehicleIdx,
};

use super::solution::{route::Route, solution::Solution};

/// Swaps one random customer between two random routes, capacity permitting.
/// A swap that would overload either vehicle is abandoned without fallback.
pub fn perturb<R: Rng>(problem: &RoutingProblem, solution: &mut Solution, rng: &mut R) {
    if solution.routes().len() < 2 {
        return;
    }

    let first = rng.random_range(0..solution.routes().len());
    let mut second = rng.random_range(0..solution.routes().len() - 1);
    if second >= first {
        second += 1;
    }

    let positions_a = solution.routes()[first].customer_positions(problem);
    let positions_b = solution.routes()[second].customer_positions(problem);
    if positions_a.is_empty() || positions_b.is_empty() {
        return;
    }

    let position_a = positions_a[rng.random_range(0..positions_a.len())];
    let position_b = positions_b[rng.random_range(0..positions_b.len())];

    let customer_a = solution.routes()[first].stops()[position_a];
    let customer_b = solution.routes()[second].stops()[position_b];

    let demand_a = problem.location(customer_a).demand();
    let demand_b = problem.location(customer_b).demand();

    let capacity_a = problem.vehicles()[solution.routes()[first].vehicle_idx()].capacity();
    let capacity_b = problem.vehicles()[solution.routes()[second].vehicle_idx()].capacity();

    let load_a = solution.routes()[first].demand(problem);
    let load_b = solution.routes()[second].demand(problem);

    if load_a - demand_a + demand_b > capacity_a || load_b - demand_b + demand_a > capacity_b {
        return;
    }

    solution.routes_mut()[first].swap_stop(position_a, customer_b);
    solution.routes_mut()[second].swap_stop(position_b, customer_a);
}

/// Reverses a random customer segment within one random route.
pub fn reverse_segment_mutation<R: Rng>(
    problem: &RoutingProblem,
    solution: &mut Solution,
    rng: &mut R,
) {
    if solution.is_empty() {
        return;
    }

    let index = rng.random_range(0..solution.routes().len());
    let positions = solution.routes()[index].customer_positions(problem);
    if positions.len() < 2 {
        return;
    }

    let start = rng.random_range(0..positions.len() - 1);
    let end = start + 1 + rng.random_range(0..positions.len() - 1 - start);

    solution.routes_mut()[index].reverse_segment(positions[start], positions[end]);
}

/// Crossover: the child copies every parent-A route customer by customer
/// (capacity-checked, duplicates skipped), then takes parent B's customers
/// that are still unassigned, first into routes with spare capacity, then
/// onto vehicles that carry no route yet. Customers that fit nowhere stay
/// unassigned.
pub fn single_point_crossover(
    problem: &RoutingProblem,
    parent_a: &Solution,
    parent_b: &Solution,
) -> Solution {
    let depot = problem.depot();

    let mut assigned: FxHashSet<LocationIdx> = FxHashSet::default();
    let mut used_vehicles: FxHashSet<VehicleIdx> = FxHashSet::default();
    let mut routes: Vec<Route> = Vec::with_capacity(parent_a.routes().len());

    for route in parent_a.routes() {
        let capacity = problem.vehicles()[route.vehicle_idx()].capacity();
        let mut stops = vec![depot];
        let mut load = 0.0;

        for &stop in route.stops() {
            if !problem.location(stop).is_customer() || assigned.contains(&stop) {
                continue;
            }

            let demand = problem.location(stop).demand();
            if load + demand <= capacity {
                load += demand;
                stops.push(stop);
                assigned.insert(stop);
            }
        }

        if stops.len() == 1 {
            continue;
        }

        stops.push(depot);
        used_vehicles.insert(route.vehicle_idx());
        routes.push(Route::new(route.vehicle_idx(), stops));
    }

    let pool: Vec<LocationIdx> = parent_b
        .routes()
        .iter()
        .flat_map(|route| route.stops())
        .copied()
        .filter(|&stop| problem.location(stop).is_customer() && !assigned.contains(&stop))
        .collect();

    let mut child = Solution::new(routes);
    let mut leftovers: Vec<LocationIdx> = Vec::new();

    for customer in pool {
        let demand = problem.location(customer).demand();

        let slot = child.routes().iter().position(|route| {
            let capacity = problem.vehicles()[route.vehicle_idx()].capacity();
            route.demand(problem) + demand <= capacity
        });

        match slot {
            Some(index) => {
                let position = child.routes()[index].len() - 1;
                child.routes_mut()[index].insert_stop(position, customer);
            }
            None => leftovers.push(customer),
        }
    }

    spawn_routes(problem, &mut child, &used_vehicles, leftovers);

    child
}

/// Opens new routes on vehicles the child does not use yet, filling them
/// greedily from the leftover pool.
fn spawn_routes(
    problem: &RoutingProblem,
    child: &mut Solution,
    used_vehicles: &FxHashSet<VehicleIdx>,
    mut leftovers: Vec<LocationIdx>,
) {
    let depot = problem.depot();

    for (index, vehicle) in problem.vehicles().iter().enumerate() {
        if leftovers.is_empty() {
            break;
        }

        let vehicle_idx = VehicleIdx::new(index);
        if used_vehicles.contains(&vehicle_idx) {
            continue;
        }

        let mut stops = vec![depot];
        let mut load = 0.0;

        leftovers.retain(|&customer| {
            let demand = problem.location(customer).demand();
            if load + demand <= vehicle.capacity() {
                load += demand;
                stops.push(customer);
                false
            } else {
                true
            }
        });

        if stops.len() == 1 {
            continue;
        }

        stops.push(depot);
        child.push_route(Route::new(vehicle_idx, stops));
    }
}
