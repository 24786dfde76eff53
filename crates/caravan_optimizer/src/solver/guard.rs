use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use jiff::SignedDuration;
use tracing::warn;

use crate::error::GuardError;

use super::cancellation::CancellationToken;
use super::hybrid::HybridOptimizer;
use super::outcome::OptimizationOutcome;

/// Hard wall-clock envelope around a worker. At the deadline the worker is
/// asked to stop through its token; after the grace period it is abandoned
/// and its result discarded.
pub struct ExecutionGuard {
    deadline: SignedDuration,
    grace: SignedDuration,
}

impl ExecutionGuard {
    pub fn new(deadline: SignedDuration, grace: SignedDuration) -> ExecutionGuard {
        ExecutionGuard { deadline, grace }
    }

    pub fn deadline(&self) -> SignedDuration {
        self.deadline
    }

    pub fn grace(&self) -> SignedDuration {
        self.grace
    }

    /// Runs `worker` on its own thread. The worker must poll the token it is
    /// handed; an unresponsive worker is not killed, only abandoned.
    pub fn run<F, T>(&self, worker: F) -> Result<T, GuardError>
    where
        F: FnOnce(&CancellationToken) -> T + Send + 'static,
        T: Send + 'static,
    {
        let token = CancellationToken::new();
        let (sender, receiver) = mpsc::channel();

        let worker_token = token.clone();
        let handle = thread::Builder::new()
            .name("caravan-optimizer".into())
            .spawn(move || {
                let result = worker(&worker_token);
                let _ = sender.send(result);
            })
            .expect("failed to spawn the optimizer worker thread");

        match receiver.recv_timeout(to_std(self.deadline)) {
            Ok(result) => {
                let _ = handle.join();
                return Ok(result);
            }
            Err(mpsc::RecvTimeoutError::Timeout) => token.cancel(),
            Err(mpsc::RecvTimeoutError::Disconnected) => return Err(GuardError::WorkerFailed),
        }

        // Deadline passed; the worker has the grace period to wind down.
        match receiver.recv_timeout(to_std(self.grace)) {
            Ok(result) => {
                let _ = handle.join();
                Ok(result)
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                warn!("worker missed the grace period, abandoning it");
                Err(GuardError::WorkerUnresponsive)
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(GuardError::WorkerFailed),
        }
    }

    pub fn run_optimizer(
        &self,
        optimizer: HybridOptimizer,
    ) -> Result<OptimizationOutcome, GuardError> {
        self.run(move |token| optimizer.run(token))
    }
}

impl Default for ExecutionGuard {
    fn default() -> ExecutionGuard {
        ExecutionGuard::new(
            SignedDuration::from_secs(180),
            SignedDuration::from_secs(10),
        )
    }
}

fn to_std(duration: SignedDuration) -> Duration {
    Duration::try_from(duration).unwrap_or(Duration::ZERO)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::solver::outcome::TerminationReason;
    use crate::solver::params::OptimizerParams;
    use crate::test_utils;

    use super::*;

    #[test]
    fn test_fast_worker_finishes_inside_the_deadline() {
        let guard = ExecutionGuard::new(
            SignedDuration::from_secs(30),
            SignedDuration::from_secs(5),
        );

        let result = guard.run(|_token| 42);

        assert_eq!(result, Ok(42));
    }

    #[test]
    fn test_fast_worker_returns_without_waiting_out_the_deadline() {
        let guard = ExecutionGuard::new(
            SignedDuration::from_secs(180),
            SignedDuration::from_secs(10),
        );

        let started = std::time::Instant::now();
        let result = guard.run(|_token| "done");

        assert_eq!(result, Ok("done"));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_optimizer_is_truncated_at_the_deadline() {
        let problem = Arc::new(test_utils::cluster_problem(30, 3));
        let params = OptimizerParams {
            population_size: 20,
            max_generations: 100_000,
            stagnation_threshold: 100_000,
            ..OptimizerParams::default()
        };
        let optimizer = HybridOptimizer::new(problem, params);

        let guard = ExecutionGuard::new(
            SignedDuration::from_millis(50),
            SignedDuration::from_secs(10),
        );

        let outcome = guard.run_optimizer(optimizer).unwrap();

        assert_eq!(outcome.reason(), TerminationReason::Cancelled);
        assert!(outcome.reason().is_truncation());
        assert!(!outcome.solution().is_empty());
    }

    #[test]
    fn test_unresponsive_worker_is_abandoned() {
        let guard = ExecutionGuard::new(
            SignedDuration::from_millis(20),
            SignedDuration::from_millis(20),
        );

        let result = guard.run(|_token| {
            thread::sleep(Duration::from_millis(500));
        });

        assert_eq!(result, Err(GuardError::WorkerUnresponsive));
    }

    #[test]
    fn test_panicking_worker_reports_failure() {
        let guard = ExecutionGuard::new(
            SignedDuration::from_secs(5),
            SignedDuration::from_secs(5),
        );

        let result: Result<(), GuardError> = guard.run(|_token| panic!("worker blew up"));

        assert_eq!(result, Err(GuardError::WorkerFailed));
    }
}
