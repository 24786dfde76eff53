pub mod disruption;
pub mod location;
pub mod routing_problem;
pub mod vehicle;
