//! Port traits: the seams where the excluded web/service layers plug in.

pub mod config_port;
pub mod data_port;
pub mod report_port;
