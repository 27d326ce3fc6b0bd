//! Port traits: the seams between the analysis pipeline and the outside world.

pub mod allocator_port;
pub mod config_port;
pub mod data_port;
pub mod report_port;
