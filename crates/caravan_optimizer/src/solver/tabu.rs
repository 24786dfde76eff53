use std::collections::VecDeque;

use crate::problem::routing_problem::RoutingProblem;

use super::solution::solution::Solution;

/// Bounded FIFO of recently visited assignment signatures. Owned by the
/// search that uses it; there is no sharing across searches.
#[derive(Debug, Clone)]
pub struct TabuMemory {
    signatures: VecDeque<u64>,
    capacity: usize,
}

impl TabuMemory {
    pub fn new(capacity: usize) -> TabuMemory {
        TabuMemory {
            signatures: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn contains(&self, signature: u64) -> bool {
        self.signatures.contains(&signature)
    }

    pub fn remember(&mut self, signature: u64) {
        if self.capacity == 0 {
            return;
        }

        if self.signatures.len() == self.capacity {
            self.signatures.pop_front();
        }

        self.signatures.push_back(signature);
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// First-improvement tabu search over inter-route customer swaps.
#[derive(Debug)]
pub struct TabuSearch {
    max_iterations: usize,
    memory: TabuMemory,
}

impl TabuSearch {
    pub fn new(tabu_size: usize, max_iterations: usize) -> TabuSearch {
        TabuSearch {
            max_iterations,
            memory: TabuMemory::new(tabu_size),
        }
    }

    pub fn memory(&self) -> &TabuMemory {
        &self.memory
    }

    /// Iterates first-improving swap moves until no move beats the best cost
    /// or the iteration budget runs out. Never returns a worse solution than
    /// the input.
    pub fn improve(&mut self, problem: &RoutingProblem, solution: &Solution) -> Solution {
        let mut best = solution.clone();
        let mut best_cost = best.total_cost(problem);

        for _ in 0..self.max_iterations {
            let Some((neighbor, cost, signature)) =
                self.first_improving_neighbor(problem, &best, best_cost)
            else {
                break;
            };

            self.memory.remember(signature);
            best = neighbor;
            best_cost = cost;
        }

        best
    }

    fn first_improving_neighbor(
        &self,
        problem: &RoutingProblem,
        current: &Solution,
        best_cost: f64,
    ) -> Option<(Solution, f64, u64)> {
        let routes = current.routes();

        for first in 0..routes.len() {
            for second in first + 1..routes.len() {
                let positions_a = routes[first].customer_positions(problem);
                let positions_b = routes[second].customer_positions(problem);

                let capacity_a = problem.vehicles()[routes[first].vehicle_idx()].capacity();
                let capacity_b = problem.vehicles()[routes[second].vehicle_idx()].capacity();
                let load_a = routes[first].demand(problem);
                let load_b = routes[second].demand(problem);

                for &position_a in &positions_a {
                    for &position_b in &positions_b {
                        let customer_a = routes[first].stops()[position_a];
                        let customer_b = routes[second].stops()[position_b];

                        let demand_a = problem.location(customer_a).demand();
                        let demand_b = problem.location(customer_b).demand();

                        if load_a - demand_a + demand_b > capacity_a
                            || load_b - demand_b + demand_a > capacity_b
                        {
                            continue;
                        }

                        let mut neighbor = current.clone();
                        neighbor.routes_mut()[first].swap_stop(position_a, customer_b);
                        neighbor.routes_mut()[second].swap_stop(position_b, customer_a);

                        let signature = neighbor.assignment_signature();
                        if self.memory.contains(signature) {
                            continue;
                        }

                        let cost = neighbor.total_cost(problem);
                        if cost < best_cost {
                            return Some((neighbor, cost, signature));
                        }
                    }
                }
            }
        }

        None
    }
}
