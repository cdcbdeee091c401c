//! Application records and the multi-step app provisioning workflow.

pub mod core;
pub mod create;
pub mod model;
