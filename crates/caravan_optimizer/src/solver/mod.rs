pub mod cancellation;
pub mod construction;
pub mod evaluation;
pub mod genetic;
pub mod guard;
pub mod hybrid;
pub mod outcome;
pub mod params;
pub mod solution;
pub mod tabu;
pub mod three_opt;
