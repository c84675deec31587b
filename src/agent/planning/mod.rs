pub mod plan;
pub mod planner;

pub use plan::Plan;
