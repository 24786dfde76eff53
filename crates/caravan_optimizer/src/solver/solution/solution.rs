use std::hash::{Hash, Hasher};

use fixedbitset::FixedBitSet;
use fxhash::FxHasher;

use crate::problem::{location::LocationIdx, routing_problem::RoutingProblem, vehicle::VehicleIdx};

use super::route::Route;

/// A full candidate plan, one route per vehicle.
#[derive(Debug, Clone, Default)]
pub struct Solution {
    routes: Vec<Route>,
}

impl Solution {
    pub fn new(routes: Vec<Route>) -> Solution {
        Solution { routes }
    }

    pub fn empty() -> Solution {
        Solution::default()
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn routes_mut(&mut self) -> &mut [Route] {
        &mut self.routes
    }

    pub fn push_route(&mut self, route: Route) {
        self.routes.push(route);
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn total_cost(&self, problem: &RoutingProblem) -> f64 {
        self.routes.iter().map(|route| route.cost(problem)).sum()
    }

    /// Order-independent fingerprint of the customer-to-vehicle assignment.
    /// Two plans that assign the same customers to the same vehicles hash
    /// equal regardless of visiting order.
    pub fn assignment_signature(&self) -> u64 {
        let mut pairs: Vec<(LocationIdx, VehicleIdx)> = Vec::new();

        for route in &self.routes {
            for &stop in route.stops() {
                pairs.push((stop, route.vehicle_idx()));
            }
        }

        pairs.sort_unstable();

        let mut hasher = FxHasher::default();
        pairs.hash(&mut hasher);
        hasher.finish()
    }

    /// Checks that no customer appears in more than one route or more than
    /// once in the same route.
    pub fn assignment_is_consistent(&self, problem: &RoutingProblem) -> bool {
        let mut seen = FixedBitSet::with_capacity(problem.num_locations());

        for route in &self.routes {
            for &stop in route.stops() {
                if !problem.location(stop).is_customer() {
                    continue;
                }

                if seen.put(stop.get()) {
                    return false;
                }
            }
        }

        true
    }

    /// Customers present in the catalogue but absent from every route.
    pub fn unassigned_customers(&self, problem: &RoutingProblem) -> Vec<LocationIdx> {
        let mut assigned = FixedBitSet::with_capacity(problem.num_locations());

        for route in &self.routes {
            for &stop in route.stops() {
                assigned.insert(stop.get());
            }
        }

        problem
            .customers()
            .iter()
            .copied()
            .filter(|customer| !assigned.contains(customer.get()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utils;

    use super::*;

    fn indices(raw: &[usize]) -> Vec<LocationIdx> {
        raw.iter().copied().map(LocationIdx::new).collect()
    }

    fn two_customer_problem() -> RoutingProblem {
        test_utils::build_problem(
            vec![
                test_utils::depot(0, 0.0, 0.0),
                test_utils::customer(1, 3.0, 4.0, 5.0),
                test_utils::customer(2, 6.0, 8.0, 5.0),
            ],
            vec![test_utils::basic_vehicle(1), test_utils::basic_vehicle(2)],
        )
    }

    #[test]
    fn test_total_cost_sums_over_routes() {
        let problem = two_customer_problem();
        let solution = Solution::new(vec![
            Route::new(VehicleIdx::new(0), indices(&[0, 1, 0])),
            Route::new(VehicleIdx::new(1), indices(&[0, 2, 0])),
        ]);

        let expected = solution.routes()[0].cost(&problem) + solution.routes()[1].cost(&problem);
        assert_eq!(solution.total_cost(&problem), expected);
    }

    #[test]
    fn test_signature_ignores_visiting_order() {
        let forward = Solution::new(vec![Route::new(VehicleIdx::new(0), indices(&[0, 1, 2, 0]))]);
        let backward = Solution::new(vec![Route::new(VehicleIdx::new(0), indices(&[0, 2, 1, 0]))]);

        assert_eq!(forward.assignment_signature(), backward.assignment_signature());
    }

    #[test]
    fn test_signature_distinguishes_assignments() {
        let split = Solution::new(vec![
            Route::new(VehicleIdx::new(0), indices(&[0, 1, 0])),
            Route::new(VehicleIdx::new(1), indices(&[0, 2, 0])),
        ]);
        let swapped = Solution::new(vec![
            Route::new(VehicleIdx::new(0), indices(&[0, 2, 0])),
            Route::new(VehicleIdx::new(1), indices(&[0, 1, 0])),
        ]);

        assert_ne!(split.assignment_signature(), swapped.assignment_signature());
    }

    #[test]
    fn test_duplicate_customer_is_inconsistent() {
        let problem = two_customer_problem();

        let duplicated = Solution::new(vec![
            Route::new(VehicleIdx::new(0), indices(&[0, 1, 0])),
            Route::new(VehicleIdx::new(1), indices(&[0, 1, 2, 0])),
        ]);
        assert!(!duplicated.assignment_is_consistent(&problem));

        let clean = Solution::new(vec![
            Route::new(VehicleIdx::new(0), indices(&[0, 1, 0])),
            Route::new(VehicleIdx::new(1), indices(&[0, 2, 0])),
        ]);
        assert!(clean.assignment_is_consistent(&problem));
    }

    #[test]
    fn test_unassigned_customers_are_reported() {
        let problem = two_customer_problem();
        let partial = Solution::new(vec![Route::new(VehicleIdx::new(0), indices(&[0, 1, 0]))]);

        assert_eq!(partial.unassigned_customers(&problem), indices(&[2]));
    }
}
