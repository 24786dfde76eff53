use jiff::SignedDuration;
use serde::Serialize;

use crate::problem::{location::LocationIdx, routing_problem::RoutingProblem};
use crate::solver::evaluation::RouteMetrics;

use super::solution::solution::Solution;

/// Why the optimizer stopped.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    GenerationLimit,
    Stagnated,
    Cancelled,
    TimeBudgetExhausted,
    /// The population could not be seeded; the result is a greedy fallback.
    FallbackOnly,
}

impl TerminationReason {
    /// True when the run ended before exploring its full budget.
    pub fn is_truncation(self) -> bool {
        matches!(
            self,
            TerminationReason::Cancelled | TerminationReason::TimeBudgetExhausted
        )
    }
}

/// Per-route view meant for serialization, external IDs instead of catalogue
/// indices.
#[derive(Serialize, Debug, Clone)]
pub struct RouteReport {
    pub vehicle_id: u32,
    pub stop_ids: Vec<u32>,
    pub metrics: RouteMetrics,
}

/// Result of one optimizer run: the best plan found plus how and when the
/// run ended.
#[derive(Debug)]
pub struct OptimizationOutcome {
    solution: Solution,
    reason: TerminationReason,
    generations: usize,
    best_cost: f64,
    elapsed: SignedDuration,
}

impl OptimizationOutcome {
    pub fn new(
        solution: Solution,
        reason: TerminationReason,
        generations: usize,
        best_cost: f64,
        elapsed: SignedDuration,
    ) -> OptimizationOutcome {
        OptimizationOutcome {
            solution,
            reason,
            generations,
            best_cost,
            elapsed,
        }
    }

    pub fn solution(&self) -> &Solution {
        &self.solution
    }

    pub fn reason(&self) -> TerminationReason {
        self.reason
    }

    pub fn generations(&self) -> usize {
        self.generations
    }

    pub fn best_cost(&self) -> f64 {
        self.best_cost
    }

    pub fn elapsed(&self) -> SignedDuration {
        self.elapsed
    }

    pub fn route_reports(&self, problem: &RoutingProblem) -> Vec<RouteReport> {
        self.solution
            .routes()
            .iter()
            .map(|route| RouteReport {
                vehicle_id: problem.vehicles()[route.vehicle_idx()].external_id(),
                stop_ids: route
                    .stops()
                    .iter()
                    .map(|&stop| problem.location(stop).external_id())
                    .collect(),
                metrics: route.metrics(problem).clone(),
            })
            .collect()
    }

    pub fn unassigned_customers(&self, problem: &RoutingProblem) -> Vec<LocationIdx> {
        self.solution.unassigned_customers(problem)
    }
}
