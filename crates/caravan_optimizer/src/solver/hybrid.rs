use std::sync::Arc;

use jiff::Timestamp;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::problem::routing_problem::RoutingProblem;

use super::cancellation::CancellationToken;
use super::construction;
use super::genetic;
use super::outcome::{OptimizationOutcome, TerminationReason};
use super::params::OptimizerParams;
use super::solution::solution::Solution;
use super::tabu::TabuSearch;
use super::three_opt;

/// Population-based hybrid: genetic perturbation and recombination, tabu
/// search on every member, 3-opt polish on each generation's champion.
pub struct HybridOptimizer {
    problem: Arc<RoutingProblem>,
    params: OptimizerParams,
}

impl HybridOptimizer {
    pub fn new(problem: Arc<RoutingProblem>, params: OptimizerParams) -> HybridOptimizer {
        HybridOptimizer { problem, params }
    }

    pub fn problem(&self) -> &RoutingProblem {
        &self.problem
    }

    pub fn params(&self) -> &OptimizerParams {
        &self.params
    }

    /// Runs until the generation limit, stagnation, cancellation or the time
    /// budget stops it, whichever comes first. Checks happen at generation
    /// boundaries, so a generation in flight always completes.
    pub fn run(&self, token: &CancellationToken) -> OptimizationOutcome {
        let problem = self.problem.as_ref();
        let start = Timestamp::now();
        let mut rng = SmallRng::seed_from_u64(self.params.seed);

        let mut population =
            construction::initialize_population(problem, self.params.population_size, &mut rng);

        if population.is_empty() {
            warn!("population could not be seeded, falling back to a greedy plan");
            let fallback = construction::build_greedy_solution(problem);
            let cost = fallback.total_cost(problem);
            return OptimizationOutcome::new(
                fallback,
                TerminationReason::FallbackOnly,
                0,
                cost,
                Timestamp::now().duration_since(start),
            );
        }

        let mut best = Self::champion(problem, &population).clone();
        let mut best_cost = best.total_cost(problem);

        let mut tabu = TabuSearch::new(self.params.tabu_size, self.params.tabu_iterations);
        let mut generation = 0;
        let mut stagnation = 0;

        let reason = loop {
            if generation >= self.params.max_generations {
                break TerminationReason::GenerationLimit;
            }
            if stagnation >= self.params.stagnation_threshold {
                break TerminationReason::Stagnated;
            }
            if token.is_cancelled() {
                break TerminationReason::Cancelled;
            }
            if Timestamp::now().duration_since(start) > self.params.time_budget {
                break TerminationReason::TimeBudgetExhausted;
            }

            self.evolve(problem, &mut population, &mut tabu, &mut rng);

            let refined = three_opt::refine(problem, Self::champion(problem, &population));
            let refined_cost = refined.total_cost(problem);

            if refined_cost < best_cost {
                best = refined;
                best_cost = refined_cost;
                stagnation = 0;
                info!(generation, best_cost, "new best solution");
            } else {
                stagnation += 1;
            }

            generation += 1;
            if generation % 10 == 0 {
                debug!(generation, best_cost, stagnation, "generation complete");
            }
        };

        OptimizationOutcome::new(
            best,
            reason,
            generation,
            best_cost,
            Timestamp::now().duration_since(start),
        )
    }

    /// One generation: every member is perturbed, possibly mutated and
    /// recombined, then tabu-improved. A member is replaced only when the
    /// candidate beats it.
    fn evolve(
        &self,
        problem: &RoutingProblem,
        population: &mut [Solution],
        tabu: &mut TabuSearch,
        rng: &mut SmallRng,
    ) {
        for index in 0..population.len() {
            let incumbent_cost = population[index].total_cost(problem);
            let mut candidate = population[index].clone();

            genetic::perturb(problem, &mut candidate, rng);

            if rng.random_bool(self.params.mutation_probability) {
                genetic::reverse_segment_mutation(problem, &mut candidate, rng);
            }

            if population.len() > 1 && rng.random_bool(self.params.crossover_probability) {
                let mut peer = rng.random_range(0..population.len() - 1);
                if peer >= index {
                    peer += 1;
                }
                candidate = genetic::single_point_crossover(problem, &candidate, &population[peer]);
            }

            let candidate = tabu.improve(problem, &candidate);

            if candidate.total_cost(problem) < incumbent_cost {
                population[index] = candidate;
            }
        }
    }

    fn champion<'a>(problem: &RoutingProblem, population: &'a [Solution]) -> &'a Solution {
        population
            .iter()
            .min_by(|a, b| a.total_cost(problem).total_cmp(&b.total_cost(problem)))
            .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use jiff::SignedDuration;

    use crate::test_utils;

    use super::*;

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

    fn small_params() -> OptimizerParams {
        OptimizerParams {
            population_size: 10,
            max_generations: 20,
            stagnation_threshold: 5,
            ..OptimizerParams::default()
        }
    }

    #[test]
    fn test_run_finds_the_single_route_optimum() {
        let problem = Arc::new(two_customer_problem());
        let optimizer = HybridOptimizer::new(problem.clone(), small_params());

        let outcome = optimizer.run(&CancellationToken::new());

        // Both customers are collinear with the depot: serving them on one
        // vehicle costs 20 distance plus 0.4 travel time.
        assert!((outcome.best_cost() - 20.4).abs() < 1e-9);
        assert!(outcome.solution().assignment_is_consistent(&problem));
        assert!(outcome.unassigned_customers(&problem).is_empty());
    }

    #[test]
    fn test_run_splits_demand_across_vehicles_when_needed() {
        let problem = Arc::new(test_utils::build_problem(
            vec![
                test_utils::depot(0, 0.0, 0.0),
                test_utils::customer(1, 3.0, 4.0, 60.0),
                test_utils::customer(2, 6.0, 8.0, 60.0),
            ],
            vec![test_utils::basic_vehicle(1), test_utils::basic_vehicle(2)],
        ));
        let optimizer = HybridOptimizer::new(problem.clone(), small_params());

        let outcome = optimizer.run(&CancellationToken::new());

        assert!((outcome.best_cost() - 30.6).abs() < 1e-9);
        assert!(outcome.unassigned_customers(&problem).is_empty());
        for route in outcome.solution().routes() {
            assert!(route.demand(&problem) <= 100.0);
        }
    }

    #[test]
    fn test_zero_population_returns_greedy_fallback() {
        let problem = Arc::new(two_customer_problem());
        let params = OptimizerParams {
            population_size: 0,
            ..small_params()
        };
        let optimizer = HybridOptimizer::new(problem.clone(), params);

        let outcome = optimizer.run(&CancellationToken::new());

        assert_eq!(outcome.reason(), TerminationReason::FallbackOnly);
        assert_eq!(outcome.generations(), 0);
        assert!(outcome.unassigned_customers(&problem).is_empty());
    }

    #[test]
    fn test_pre_cancelled_token_stops_before_the_first_generation() {
        let problem = Arc::new(two_customer_problem());
        let optimizer = HybridOptimizer::new(problem, small_params());

        let token = CancellationToken::new();
        token.cancel();

        let outcome = optimizer.run(&token);

        assert_eq!(outcome.reason(), TerminationReason::Cancelled);
        assert_eq!(outcome.generations(), 0);
        assert!(outcome.reason().is_truncation());
        // The seeded best is still returned.
        assert!(!outcome.solution().is_empty());
    }

    #[test]
    fn test_zero_time_budget_stops_before_the_first_generation() {
        let problem = Arc::new(two_customer_problem());
        let params = OptimizerParams {
            time_budget: SignedDuration::ZERO,
            ..small_params()
        };
        let optimizer = HybridOptimizer::new(problem, params);

        let outcome = optimizer.run(&CancellationToken::new());

        assert_eq!(outcome.reason(), TerminationReason::TimeBudgetExhausted);
        assert_eq!(outcome.generations(), 0);
    }

    #[test]
    fn test_stagnation_stops_the_run_early() {
        let problem = Arc::new(test_utils::build_problem(
            vec![
                test_utils::depot(0, 0.0, 0.0),
                test_utils::customer(1, 3.0, 4.0, 5.0),
            ],
            vec![test_utils::basic_vehicle(1)],
        ));
        let params = OptimizerParams {
            population_size: 4,
            max_generations: 100,
            stagnation_threshold: 3,
            ..OptimizerParams::default()
        };
        let optimizer = HybridOptimizer::new(problem, params);

        let outcome = optimizer.run(&CancellationToken::new());

        // A single customer leaves nothing to improve.
        assert_eq!(outcome.reason(), TerminationReason::Stagnated);
        assert!(outcome.generations() <= 4);
    }

    #[test]
    fn test_longer_runs_never_return_a_worse_cost() {
        let problem = Arc::new(test_utils::cluster_problem(8, 2));

        let short = OptimizerParams {
            population_size: 10,
            max_generations: 1,
            stagnation_threshold: 100,
            ..OptimizerParams::default()
        };
        let long = OptimizerParams {
            max_generations: 15,
            ..short.clone()
        };

        let short_cost = HybridOptimizer::new(problem.clone(), short)
            .run(&CancellationToken::new())
            .best_cost();
        let long_cost = HybridOptimizer::new(problem, long)
            .run(&CancellationToken::new())
            .best_cost();

        assert!(long_cost <= short_cost);
    }
}
