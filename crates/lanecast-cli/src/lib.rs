//! lanecast CLI library.
//!
//! Input loading, logging setup and the command implementations behind the
//! `lanecast` binary.

pub mod commands;
pub mod input;
pub mod logging;
