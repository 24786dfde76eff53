use jiff::SignedDuration;

/// Tuning knobs for the hybrid optimizer. Defaults match the published
/// configuration of the algorithm.
#[derive(Debug, Clone)]
pub struct OptimizerParams {
    pub population_size: usize,
    pub max_generations: usize,
    /// Generations without improvement before the run stops early.
    pub stagnation_threshold: usize,
    pub mutation_probability: f64,
    pub crossover_probability: f64,
    pub tabu_size: usize,
    pub tabu_iterations: usize,
    /// Wall-clock budget checked at generation boundaries.
    pub time_budget: SignedDuration,
    pub seed: u64,
}

impl Default for OptimizerParams {
    fn default() -> OptimizerParams {
        OptimizerParams {
            population_size: 50,
            max_generations: 100,
            stagnation_threshold: 30,
            mutation_probability: 1.0,
            crossover_probability: 1.0,
            tabu_size: 10,
            tabu_iterations: 20,
            time_budget: SignedDuration::from_secs(180),
            seed: 271828,
        }
    }
}
