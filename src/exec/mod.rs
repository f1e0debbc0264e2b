//! Subprocess execution
//!
//! A [`CommandPlan`] is built once per run and handed to [`run_plan`], which
//! forwards the standard streams to the child and waits for it.

mod environment;
mod plan;
mod subprocess;

pub use environment::{inherited_value, Environment};
pub use plan::CommandPlan;
pub use subprocess::run_plan;
