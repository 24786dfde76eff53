use rand::Rng;
use rand::seq::SliceRandom;
use tracing::warn;

use crate::problem::{location::LocationIdx, routing_problem::RoutingProblem, vehicle::VehicleIdx};

use super::solution::{route::Route, solution::Solution};

/// Builds one solution by filling vehicles greedily from a shuffled customer
/// pool. Vehicles that end up with no customers get no route at all.
pub fn build_random_solution<R: Rng>(problem: &RoutingProblem, rng: &mut R) -> Solution {
    let mut pool: Vec<LocationIdx> = problem.customers().to_vec();
    pool.shuffle(rng);

    greedy_fill(problem, pool)
}

/// Deterministic variant used as a fallback when the population cannot be
/// seeded. Customers are taken in catalogue order.
pub fn build_greedy_solution(problem: &RoutingProblem) -> Solution {
    greedy_fill(problem, problem.customers().to_vec())
}

fn greedy_fill(problem: &RoutingProblem, mut pool: Vec<LocationIdx>) -> Solution {
    let depot = problem.depot();
    let mut routes = Vec::with_capacity(problem.vehicles().len());

    for (index, vehicle) in problem.vehicles().iter().enumerate() {
        let mut stops = vec![depot];
        let mut load = 0.0;

        pool.retain(|&customer| {
            let demand = problem.location(customer).demand();
            if load + demand <= vehicle.capacity() {
                load += demand;
                stops.push(customer);
                false
            } else {
                true
            }
        });

        // An idle vehicle contributes no route; a depot-only loop would
        // still pick up disruption delays at the depot.
        if stops.len() == 1 {
            continue;
        }

        stops.push(depot);
        routes.push(Route::new(VehicleIdx::new(index), stops));
    }

    if !pool.is_empty() {
        warn!(
            dropped = pool.len(),
            "fleet capacity exhausted, leaving customers unassigned"
        );
    }

    Solution::new(routes)
}

/// Seeds the initial population. May return fewer than `size` members only
/// when `size` is zero.
pub fn initialize_population<R: Rng>(
    problem: &RoutingProblem,
    size: usize,
    rng: &mut R,
) -> Vec<Solution> {
    (0..size)
        .map(|_| build_random_solution(problem, rng))
        .collect()
}
